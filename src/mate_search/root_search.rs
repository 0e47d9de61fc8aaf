//! Root of the mate search: returns the forcing move, not just a verdict.
//!
//! The root is an attacker node like any other, except that a check leading
//! into a repeated position is passed over. A repetition is not a valid
//! forcing continuation, but it is not a refutation either: other checks are
//! still tried. Inner attacker nodes do not apply this filter.

use log::trace;

use crate::mate_search::move_picker::{CandidateMoves, NodeKind};
use crate::mate_search::node_search::MateSearch;
use crate::position::mate_position::MatePosition;

impl<P: MatePosition> MateSearch<'_, P> {
    /// First checking move that forces mate within `depth` plies (odd).
    ///
    /// Clears the statistics and abort state left by an earlier call.
    pub fn mate_move_in_odd_ply(&mut self, depth: u8) -> Option<P::Move> {
        debug_assert!(depth % 2 == 1, "root mate search called with depth {depth}");
        self.reset();
        if !self.enter_node(NodeKind::Or) {
            return None;
        }

        let check_info = self.pos.check_info();
        let checks = if self.pos.in_check() {
            CandidateMoves::for_attacker::<true, _>(&*self.pos)
        } else {
            CandidateMoves::for_attacker::<false, _>(&*self.pos)
        };

        for mv in checks.iter() {
            let mut child = self.play(mv, &check_info, true);

            let repetition = child.pos.repetition_status(child.repetition_lookback);
            if repetition.is_repetition() {
                child.stats.repetition_skips += 1;
                trace!("mate root skips {mv:?}: {repetition:?}");
                continue;
            }

            let mated = if depth == 1 {
                CandidateMoves::for_defender(&*child.pos).is_empty()
            } else {
                child.mate_in_even_ply(depth - 1)
            };
            if mated {
                return Some(mv);
            }
        }
        None
    }
}

/// Search `pos` for a forced mate within `depth` plies and return the first
/// move of the line. `pos` is unchanged on return.
pub fn mate_move_in_odd_ply<P: MatePosition>(pos: &mut P, depth: u8) -> Option<P::Move> {
    MateSearch::new(pos).mate_move_in_odd_ply(depth)
}

/// Boolean form of `mate_move_in_odd_ply`, without the root repetition filter.
pub fn mate_in_odd_ply<P: MatePosition>(pos: &mut P, depth: u8) -> bool {
    let in_check = pos.in_check();
    let mut search = MateSearch::new(pos);
    if in_check {
        search.mate_in_odd_ply::<true>(depth)
    } else {
        search.mate_in_odd_ply::<false>(depth)
    }
}
