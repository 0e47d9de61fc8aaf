//! Solver configuration and engine-option plumbing.

use crate::mate_search_errors::{MateSearchError, MateSearchResult};
use crate::position::repetition::DEFAULT_REPETITION_LOOKBACK;

/// Largest supported mate ply: the largest odd ply under the host engine's
/// 30-ply ceiling for root mate searches.
///
/// The host engine calls its option `Mate_Root_Search`, defaults it to 25
/// and uses 0 to disable the root search. Here the option is `MatePly`, the
/// default is 7 and 0 is rejected, since a solver call always searches.
pub const MAX_MATE_PLY: u8 = 29;

/// Shortest lookback that can still see a position repeat (four plies).
pub const MIN_REPETITION_LOOKBACK: u16 = 4;

pub const OPTION_MATE_PLY: &str = "MatePly";
pub const OPTION_REPETITION_LOOKBACK: &str = "RepetitionLookback";
pub const OPTION_MATE_NODE_LIMIT: &str = "MateNodeLimit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MateSearchConfig {
    /// Odd ply bound for the root search.
    pub max_ply: u8,
    pub repetition_lookback: u16,
    /// Nodes to visit before giving up; `None` is unlimited.
    pub node_limit: Option<u64>,
}

impl Default for MateSearchConfig {
    fn default() -> Self {
        Self {
            max_ply: 7,
            repetition_lookback: DEFAULT_REPETITION_LOOKBACK,
            node_limit: None,
        }
    }
}

impl MateSearchConfig {
    pub fn validate(&self) -> MateSearchResult<()> {
        validate_ply(self.max_ply)?;
        if self.repetition_lookback < MIN_REPETITION_LOOKBACK {
            return Err(MateSearchError::InvalidOption {
                name: OPTION_REPETITION_LOOKBACK.to_owned(),
                value: self.repetition_lookback.to_string(),
            });
        }
        Ok(())
    }

    /// Apply a `name`/`value` option pair. Names match case-insensitively;
    /// a node limit of `0` means unlimited. The config is left untouched on error.
    pub fn set_option(&mut self, name: &str, value: &str) -> MateSearchResult<()> {
        let invalid = || MateSearchError::InvalidOption {
            name: name.to_owned(),
            value: value.to_owned(),
        };
        let value = value.trim();

        if name.eq_ignore_ascii_case(OPTION_MATE_PLY) {
            let ply = value.parse::<u8>().map_err(|_| invalid())?;
            validate_ply(ply).map_err(|_| invalid())?;
            self.max_ply = ply;
        } else if name.eq_ignore_ascii_case(OPTION_REPETITION_LOOKBACK) {
            let plies = value.parse::<u16>().map_err(|_| invalid())?;
            if plies < MIN_REPETITION_LOOKBACK {
                return Err(invalid());
            }
            self.repetition_lookback = plies;
        } else if name.eq_ignore_ascii_case(OPTION_MATE_NODE_LIMIT) {
            let limit = value.parse::<u64>().map_err(|_| invalid())?;
            self.node_limit = (limit != 0).then_some(limit);
        } else {
            return Err(MateSearchError::UnknownOption(name.to_owned()));
        }
        Ok(())
    }
}

/// A mate ply must be odd and in `1..=MAX_MATE_PLY`.
#[inline]
pub fn validate_ply(ply: u8) -> MateSearchResult<()> {
    if ply % 2 == 1 && ply <= MAX_MATE_PLY {
        Ok(())
    } else {
        Err(MateSearchError::InvalidPly(ply))
    }
}
