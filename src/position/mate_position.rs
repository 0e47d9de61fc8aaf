//! Board collaborator contract consumed by the mate search.
//!
//! The solver never looks inside a position. It only needs check/pin facts,
//! the two specialised generators, legality validation, make/unmake, the
//! repetition classifier, and a one-ply mate oracle. Any board that can
//! answer these questions can be searched.

use std::fmt::Debug;

use crate::position::candidate_list::CandidateList;
use crate::position::repetition::RepetitionStatus;

pub trait MatePosition {
    /// Compact move descriptor. Generation order is the board's own.
    type Move: Copy + Eq + Debug;
    /// Opaque record returned by `do_move` and consumed by `undo_move`.
    type Undo;
    /// Check context computed once per node before generating moves.
    type CheckInfo;
    /// Set of pieces pinned against the side-to-move's king.
    type Pinned: Copy;

    fn in_check(&self) -> bool;

    fn pinned(&self) -> Self::Pinned;

    fn check_info(&self) -> Self::CheckInfo;

    /// Pseudo-legal moves giving check to the opponent.
    fn generate_checks(&self, moves: &mut CandidateList<Self::Move>);

    /// Pseudo-legal evasions of the current check. King moves into attack and
    /// pinned-piece moves may still be included.
    fn generate_evasions(&self, moves: &mut CandidateList<Self::Move>);

    /// Whether a pseudo-legal move resolves the current check without
    /// exposing the king.
    fn pseudo_legal_move_is_evasion(&self, mv: Self::Move, pinned: Self::Pinned) -> bool;

    /// Whether a pseudo-legal move leaves the king safe.
    fn pseudo_legal_move_is_legal(&self, mv: Self::Move, pinned: Self::Pinned) -> bool;

    fn move_gives_check(&self, mv: Self::Move, check_info: &Self::CheckInfo) -> bool;

    fn do_move(
        &mut self,
        mv: Self::Move,
        check_info: &Self::CheckInfo,
        gives_check: bool,
    ) -> Self::Undo;

    /// Restore exactly the state seen before the matching `do_move`.
    fn undo_move(&mut self, mv: Self::Move, undo: Self::Undo);

    /// Classify the current position against the last `lookback_plies` plies.
    fn repetition_status(&self, lookback_plies: u16) -> RepetitionStatus;

    /// A move that checkmates immediately, if the side to move has one.
    fn mate_move_in_1ply(&mut self) -> Option<Self::Move>;
}
