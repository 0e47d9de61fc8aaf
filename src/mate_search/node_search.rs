//! Depth-bounded AND/OR recursion proving forced mate.
//!
//! Odd remaining depth means the attacker is to move (OR node), even depth
//! means the defender is to move and in check (AND node). Attacker nodes try
//! checking moves until one child proves mate; defender nodes try every legal
//! evasion and fail on the first one that is not refuted. Depth drops by one
//! per call, so the recursion always bottoms out at the one-ply oracle.
//!
//! Every move is played through a `PlayedMove` guard that undoes it on drop,
//! so the position is restored on every return path.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::mate_search::move_picker::{CandidateMoves, NodeKind};
use crate::position::mate_position::MatePosition;
use crate::position::repetition::DEFAULT_REPETITION_LOOKBACK;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MateSearchStats {
    pub nodes: u64,
    pub or_nodes: u64,
    pub and_nodes: u64,
    pub oracle_calls: u64,
    pub repetition_skips: u64,
}

/// One in-flight mate search over an exclusively borrowed position.
///
/// The recursors accumulate into `stats` and stay aborted once stopped.
/// The root entry resets both; call `reset` before reusing the context for
/// a recursor directly.
pub struct MateSearch<'a, P: MatePosition> {
    pub(crate) pos: &'a mut P,
    pub(crate) repetition_lookback: u16,
    node_limit: Option<u64>,
    stop: Option<&'a AtomicBool>,
    pub(crate) stats: MateSearchStats,
    aborted: bool,
}

impl<'a, P: MatePosition> MateSearch<'a, P> {
    pub fn new(pos: &'a mut P) -> Self {
        Self {
            pos,
            repetition_lookback: DEFAULT_REPETITION_LOOKBACK,
            node_limit: None,
            stop: None,
            stats: MateSearchStats::default(),
            aborted: false,
        }
    }

    #[inline]
    pub fn with_repetition_lookback(mut self, plies: u16) -> Self {
        self.repetition_lookback = plies;
        self
    }

    #[inline]
    pub fn with_node_limit(mut self, limit: Option<u64>) -> Self {
        self.node_limit = limit;
        self
    }

    /// Poll `stop` once per node; a stopped search proves nothing further.
    #[inline]
    pub fn with_stop_flag(mut self, stop: &'a AtomicBool) -> Self {
        self.stop = Some(stop);
        self
    }

    #[inline]
    pub fn stats(&self) -> MateSearchStats {
        self.stats
    }

    /// True once the stop flag or node limit cut the search short. Results
    /// reported as "no mate" are then inconclusive.
    #[inline]
    pub fn aborted(&self) -> bool {
        self.aborted
    }

    /// Clear statistics and the aborted state.
    #[inline]
    pub fn reset(&mut self) {
        self.stats = MateSearchStats::default();
        self.aborted = false;
    }

    /// Count a node, or refuse it if the search has been stopped.
    pub(crate) fn enter_node(&mut self, kind: NodeKind) -> bool {
        if self.aborted {
            return false;
        }
        if self.stop.is_some_and(|stop| stop.load(Ordering::Relaxed)) {
            self.aborted = true;
            return false;
        }
        if self.node_limit.is_some_and(|limit| self.stats.nodes >= limit) {
            self.aborted = true;
            return false;
        }

        self.stats.nodes += 1;
        match kind {
            NodeKind::Or => self.stats.or_nodes += 1,
            NodeKind::And => self.stats.and_nodes += 1,
        }
        true
    }

    /// Make `mv`; the returned guard unmakes it when dropped.
    #[inline]
    pub(crate) fn play<'s>(
        &'s mut self,
        mv: P::Move,
        check_info: &P::CheckInfo,
        gives_check: bool,
    ) -> PlayedMove<'s, 'a, P> {
        let undo = self.pos.do_move(mv, check_info, gives_check);
        PlayedMove {
            search: self,
            mv,
            undo: Some(undo),
        }
    }

    #[inline]
    fn mate_in_1ply(&mut self) -> bool {
        self.stats.oracle_calls += 1;
        self.pos.mate_move_in_1ply().is_some()
    }

    /// Defender to move at two plies remaining.
    ///
    /// Every evasion must allow an immediate mate. An evasion that checks back
    /// escapes along this line, since the attacker would have to answer the
    /// check instead of mating.
    pub fn mate_in_2ply(&mut self) -> bool {
        if !self.enter_node(NodeKind::And) {
            return false;
        }

        let check_info = self.pos.check_info();
        let evasions = CandidateMoves::for_defender(&*self.pos);
        for mv in evasions.iter() {
            if self.pos.move_gives_check(mv, &check_info) {
                return false;
            }

            let mut child = self.play(mv, &check_info, false);
            if !child.mate_in_1ply() {
                return false;
            }
        }
        true
    }

    /// Attacker to move at three plies remaining.
    pub fn mate_in_3ply<const IN_CHECK: bool>(&mut self) -> bool {
        if !self.enter_node(NodeKind::Or) {
            return false;
        }

        let check_info = self.pos.check_info();
        let checks = CandidateMoves::for_attacker::<IN_CHECK, _>(&*self.pos);
        for mv in checks.iter() {
            let mut child = self.play(mv, &check_info, true);
            if child.mate_in_2ply() {
                return true;
            }
        }
        false
    }

    /// Attacker to move with an odd number of plies remaining.
    pub fn mate_in_odd_ply<const IN_CHECK: bool>(&mut self, depth: u8) -> bool {
        debug_assert!(depth % 2 == 1, "odd-ply search called with depth {depth}");
        if depth == 1 {
            return self.mate_in_1ply();
        }
        if !self.enter_node(NodeKind::Or) {
            return false;
        }

        let check_info = self.pos.check_info();
        let checks = CandidateMoves::for_attacker::<IN_CHECK, _>(&*self.pos);
        for mv in checks.iter() {
            let mut child = self.play(mv, &check_info, true);
            if child.mate_in_even_ply(depth - 1) {
                return true;
            }
        }
        false
    }

    /// Defender to move, in check, with an even number of plies remaining.
    pub fn mate_in_even_ply(&mut self, depth: u8) -> bool {
        debug_assert!(
            depth >= 2 && depth % 2 == 0,
            "even-ply search called with depth {depth}"
        );
        if depth == 2 {
            return self.mate_in_2ply();
        }
        if !self.enter_node(NodeKind::And) {
            return false;
        }

        let check_info = self.pos.check_info();
        let evasions = CandidateMoves::for_defender(&*self.pos);
        for mv in evasions.iter() {
            let gives_check = self.pos.move_gives_check(mv, &check_info);
            let mut child = self.play(mv, &check_info, gives_check);

            let refuted = match (depth, gives_check) {
                (4, true) => child.mate_in_3ply::<true>(),
                (4, false) => child.mate_in_3ply::<false>(),
                (_, true) => child.mate_in_odd_ply::<true>(depth - 1),
                (_, false) => child.mate_in_odd_ply::<false>(depth - 1),
            };
            if !refuted {
                return false;
            }
        }
        true
    }
}

/// A move made on the searched position, unmade when the guard drops.
pub(crate) struct PlayedMove<'s, 'a, P: MatePosition> {
    search: &'s mut MateSearch<'a, P>,
    mv: P::Move,
    undo: Option<P::Undo>,
}

impl<'a, P: MatePosition> Deref for PlayedMove<'_, 'a, P> {
    type Target = MateSearch<'a, P>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &*self.search
    }
}

impl<P: MatePosition> DerefMut for PlayedMove<'_, '_, P> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.search
    }
}

impl<P: MatePosition> Drop for PlayedMove<'_, '_, P> {
    fn drop(&mut self) {
        if let Some(undo) = self.undo.take() {
            self.search.pos.undo_move(self.mv, undo);
        }
    }
}
