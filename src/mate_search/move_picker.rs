//! Candidate selection for mate-search nodes.
//!
//! Attacker (OR) nodes only ever consider checking moves; when the attacker
//! is itself in check those checks must also be legal evasions. Defender
//! (AND) nodes consider every legal evasion. King moves and pinned-piece
//! moves are the only generated evasions that can be self-check, so they are
//! re-validated against the pinned set before the node sees them.

use crate::position::candidate_list::CandidateList;
use crate::position::mate_position::MatePosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Attacker to move: one forcing move is enough.
    Or,
    /// Defender to move: every evasion must be refuted.
    And,
}

#[derive(Debug, Clone)]
pub struct CandidateMoves<M> {
    kind: NodeKind,
    moves: CandidateList<M>,
}

impl<M: Copy> CandidateMoves<M> {
    /// Checking moves for the attacker. With `IN_CHECK` the attacker is in
    /// check and only checks that also evade are kept.
    pub fn for_attacker<const IN_CHECK: bool, P>(pos: &P) -> Self
    where
        P: MatePosition<Move = M>,
    {
        debug_assert_eq!(pos.in_check(), IN_CHECK, "attacker check state mismatch");

        let mut moves = CandidateList::new();
        pos.generate_checks(&mut moves);
        if IN_CHECK {
            let pinned = pos.pinned();
            moves.retain_unordered(|mv| pos.pseudo_legal_move_is_evasion(mv, pinned));
        }
        Self::finish(NodeKind::Or, moves)
    }

    /// Legal evasions for the defender, who must be in check.
    pub fn for_defender<P>(pos: &P) -> Self
    where
        P: MatePosition<Move = M>,
    {
        debug_assert!(pos.in_check(), "defender node entered without check");

        let mut moves = CandidateList::new();
        pos.generate_evasions(&mut moves);
        let pinned = pos.pinned();
        moves.retain_unordered(|mv| pos.pseudo_legal_move_is_legal(mv, pinned));
        Self::finish(NodeKind::And, moves)
    }

    #[inline]
    fn finish(kind: NodeKind, moves: CandidateList<M>) -> Self {
        Self { kind, moves }
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[M] {
        self.moves.as_slice()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = M> + '_ {
        self.moves.iter()
    }
}
