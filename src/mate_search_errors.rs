//! Errors used by the mate solver and its synthetic game-tree collaborator.
//!
//! Recoverable failures (bad configuration, an even or zero ply request,
//! a malformed game tree) are returned as `Result<_, MateSearchError>`.
//! Variants describing a broken collaborator contract
//! (`CandidateOverflow`, `UnknownRepetitionCode`) are never returned from a
//! search. They are fatal and reported by panicking with their `Display` text.

use std::error::Error;
use std::fmt;

pub type MateSearchResult<T> = Result<T, MateSearchError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MateSearchError {
    /// A mate search was requested with a ply count that is zero, even, or
    /// above the supported ceiling.
    InvalidPly(u8),

    /// An option name was recognised but its value could not be used.
    InvalidOption { name: String, value: String },

    /// An option name is not known to the solver.
    UnknownOption(String),

    /// The move generator produced more candidates than a single position
    /// can legally hold.
    CandidateOverflow { capacity: usize },

    /// The repetition classifier reported a code outside its enumeration.
    UnknownRepetitionCode(i32),

    /// A synthetic game tree failed validation.
    InvalidTree(String),
}

impl fmt::Display for MateSearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MateSearchError::InvalidPly(ply) => {
                write!(f, "invalid mate search ply {ply}: expected an odd ply in range")
            }
            MateSearchError::InvalidOption { name, value } => {
                write!(f, "invalid value '{value}' for option '{name}'")
            }
            MateSearchError::UnknownOption(name) => write!(f, "unknown option '{name}'"),
            MateSearchError::CandidateOverflow { capacity } => write!(
                f,
                "move generator exceeded the candidate capacity of {capacity} moves"
            ),
            MateSearchError::UnknownRepetitionCode(code) => {
                write!(f, "repetition classifier returned unknown code {code}")
            }
            MateSearchError::InvalidTree(msg) => write!(f, "invalid game tree: {msg}"),
        }
    }
}

impl Error for MateSearchError {}

#[cfg(test)]
mod tests {
    use super::MateSearchError;

    #[test]
    fn display_messages_carry_payloads() {
        assert_eq!(
            MateSearchError::InvalidPly(4).to_string(),
            "invalid mate search ply 4: expected an odd ply in range"
        );
        assert_eq!(
            MateSearchError::CandidateOverflow { capacity: 73 }.to_string(),
            "move generator exceeded the candidate capacity of 73 moves"
        );
        assert_eq!(
            MateSearchError::InvalidOption {
                name: "MatePly".to_owned(),
                value: "x".to_owned()
            }
            .to_string(),
            "invalid value 'x' for option 'MatePly'"
        );
    }
}
