//! Repetition verdicts reported by the position's history classifier.

use std::convert::TryFrom;

use crate::mate_search_errors::MateSearchError;

/// Number of plies the root search looks back when classifying repetitions.
pub const DEFAULT_REPETITION_LOOKBACK: u16 = 16;

/// Outcome of classifying the current position against its recent history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepetitionStatus {
    NotRepetition,
    Draw,
    /// Repetition that wins for the side to move (perpetual check by the opponent).
    Win,
    /// Repetition that loses for the side to move.
    Lose,
    /// Same placement, side to move holds strictly more in hand.
    Superior,
    /// Same placement, side to move holds strictly less in hand.
    Inferior,
}

impl RepetitionStatus {
    #[inline]
    pub const fn is_repetition(self) -> bool {
        !matches!(self, RepetitionStatus::NotRepetition)
    }

    #[inline]
    pub const fn code(self) -> i32 {
        match self {
            RepetitionStatus::NotRepetition => 0,
            RepetitionStatus::Draw => 1,
            RepetitionStatus::Win => 2,
            RepetitionStatus::Lose => 3,
            RepetitionStatus::Superior => 4,
            RepetitionStatus::Inferior => 5,
        }
    }
}

/// Adapter for classifiers that report raw integer codes.
impl TryFrom<i32> for RepetitionStatus {
    type Error = MateSearchError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(RepetitionStatus::NotRepetition),
            1 => Ok(RepetitionStatus::Draw),
            2 => Ok(RepetitionStatus::Win),
            3 => Ok(RepetitionStatus::Lose),
            4 => Ok(RepetitionStatus::Superior),
            5 => Ok(RepetitionStatus::Inferior),
            other => Err(MateSearchError::UnknownRepetitionCode(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_not_repetition_is_clean() {
        assert!(!RepetitionStatus::NotRepetition.is_repetition());
        for status in [
            RepetitionStatus::Draw,
            RepetitionStatus::Win,
            RepetitionStatus::Lose,
            RepetitionStatus::Superior,
            RepetitionStatus::Inferior,
        ] {
            assert!(status.is_repetition(), "{status:?} should count as repetition");
            assert_eq!(RepetitionStatus::try_from(status.code()), Ok(status));
        }
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert_eq!(
            RepetitionStatus::try_from(9),
            Err(MateSearchError::UnknownRepetitionCode(9))
        );
        assert!(RepetitionStatus::try_from(-1).is_err());
    }
}
