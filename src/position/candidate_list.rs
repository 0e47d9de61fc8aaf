//! Fixed-capacity candidate buffer filled by the move generator.
//!
//! Every node of the mate search generates into one of these on the stack.
//! The capacity is the largest number of checking moves or check evasions a
//! shogi position can have, so overflowing it means the generator broke its
//! contract and the search aborts.

use arrayvec::ArrayVec;

use crate::mate_search_errors::MateSearchError;

/// Maximum number of moves that can give check or evade check in one position.
pub const MAX_CHECK_MOVES: usize = 73;

#[derive(Debug, Clone)]
pub struct CandidateList<M> {
    moves: ArrayVec<M, MAX_CHECK_MOVES>,
}

impl<M> Default for CandidateList<M> {
    fn default() -> Self {
        Self {
            moves: ArrayVec::new(),
        }
    }
}

impl<M: Copy> CandidateList<M> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a generated move. Panics once the capacity is exceeded.
    #[inline]
    pub fn push(&mut self, mv: M) {
        if self.moves.try_push(mv).is_err() {
            panic!(
                "{}",
                MateSearchError::CandidateOverflow {
                    capacity: MAX_CHECK_MOVES
                }
            );
        }
    }

    /// Keep only the moves accepted by `keep`.
    ///
    /// A rejected move is overwritten by the last unvisited move and the list
    /// shrinks by one, so survivor order is not preserved.
    pub fn retain_unordered<F: FnMut(M) -> bool>(&mut self, mut keep: F) {
        let mut i = 0;
        while i < self.moves.len() {
            if keep(self.moves[i]) {
                i += 1;
            } else {
                self.moves.swap_remove(i);
            }
        }
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
        &self.moves
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = M> + '_ {
        self.moves.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retain_unordered_swaps_in_last_entry() {
        let mut list = CandidateList::new();
        for mv in [1u32, 2, 3, 4, 5] {
            list.push(mv);
        }
        list.retain_unordered(|mv| mv != 2);
        assert_eq!(list.as_slice(), &[1, 5, 3, 4]);

        list.retain_unordered(|mv| mv % 2 == 0);
        assert_eq!(list.as_slice(), &[4]);
    }

    #[test]
    fn fills_to_capacity() {
        let mut list = CandidateList::new();
        for mv in 0..MAX_CHECK_MOVES as u32 {
            list.push(mv);
        }
        assert_eq!(list.len(), MAX_CHECK_MOVES);
    }

    #[test]
    #[should_panic(expected = "candidate capacity of 73 moves")]
    fn overflow_is_fatal() {
        let mut list = CandidateList::new();
        for mv in 0..=MAX_CHECK_MOVES as u32 {
            list.push(mv);
        }
    }
}
