//! Seeded random game graphs for property tests and benchmarks.
//!
//! The graph alternates attacker levels and defender levels (always in
//! check) down to `levels` plies. Attackers are in check only after a
//! counter-check. Attacker nodes get a mix of checks and
//! quiet moves, defender nodes a mix of evasions, counter-checks, king moves
//! into attack and pinned-piece moves. Some checks jump back to the defender
//! node they came from, so histories contain real repetitions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_tree::tree_builder::GameTreeBuilder;
use crate::game_tree::tree_position::{EdgeFlags, GameTree, NodeId};
use crate::mate_search_errors::{MateSearchError, MateSearchResult};
use crate::position::candidate_list::MAX_CHECK_MOVES;
use crate::position::repetition::RepetitionStatus;

/// Piece index used for pinned-piece moves.
const PINNED_PIECE: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomTreeParams {
    pub levels: u8,
    pub max_checks: usize,
    pub max_quiet_moves: usize,
    pub max_evasions: usize,
    /// Chance a defender evasion checks back.
    pub counter_check_probability: f64,
    /// Chance a defender evasion is illegal (king into attack or pinned piece).
    pub illegal_evasion_probability: f64,
    /// Chance an attacker check returns to the defender node it came from.
    pub repetition_probability: f64,
    /// Chance a defender node carries a forced repetition verdict.
    pub forced_repetition_probability: f64,
}

impl Default for RandomTreeParams {
    fn default() -> Self {
        Self {
            levels: 7,
            max_checks: 3,
            max_quiet_moves: 1,
            max_evasions: 3,
            counter_check_probability: 0.15,
            illegal_evasion_probability: 0.15,
            repetition_probability: 0.05,
            forced_repetition_probability: 0.05,
        }
    }
}

struct Generator {
    rng: StdRng,
    params: RandomTreeParams,
    builder: GameTreeBuilder,
}

/// Build a random graph whose root is an attacker node not in check.
pub fn random_tree(seed: u64, params: RandomTreeParams) -> MateSearchResult<GameTree> {
    let probabilities = [
        params.counter_check_probability,
        params.illegal_evasion_probability,
        params.repetition_probability,
        params.forced_repetition_probability,
    ];
    if probabilities.iter().any(|p| !(0.0..=1.0).contains(p)) {
        return Err(MateSearchError::InvalidTree(format!(
            "probabilities out of range: {probabilities:?}"
        )));
    }

    let params = RandomTreeParams {
        max_checks: params.max_checks.min(MAX_CHECK_MOVES),
        max_evasions: params.max_evasions.min(MAX_CHECK_MOVES),
        ..params
    };
    let mut generator = Generator {
        rng: StdRng::seed_from_u64(seed),
        params,
        builder: GameTreeBuilder::new(),
    };
    let root = generator.builder.add_node(false);
    generator.expand_attacker(root, false, params.levels, None);
    generator.builder.build()
}

impl Generator {
    /// `previous_defender` is the defender node this attacker node was reached from.
    fn expand_attacker(
        &mut self,
        node: NodeId,
        in_check: bool,
        remaining: u8,
        previous_defender: Option<NodeId>,
    ) {
        if remaining == 0 {
            return;
        }
        let mut mv = 0u16;

        let checks = self.rng.random_range(0..=self.params.max_checks);
        for _ in 0..checks {
            mv += 1;
            let mut flags = EdgeFlags::CHECK;
            if in_check && self.rng.random_bool(0.3) {
                flags = flags.not_evading();
            }

            if let Some(back) = previous_defender {
                if self.rng.random_bool(self.params.repetition_probability) {
                    self.builder.add_edge(node, back, mv, flags);
                    continue;
                }
            }
            let child = self.builder.add_node(true);
            if self.rng.random_bool(self.params.forced_repetition_probability) {
                self.builder.set_repetition(child, RepetitionStatus::Draw);
            }
            self.builder.add_edge(node, child, mv, flags);
            self.expand_defender(child, remaining - 1);
        }

        let quiet = self.rng.random_range(0..=self.params.max_quiet_moves);
        for _ in 0..quiet {
            mv += 1;
            let child = self.builder.add_node(false);
            self.builder.add_edge(node, child, mv, EdgeFlags::QUIET);
        }
    }

    fn expand_defender(&mut self, node: NodeId, remaining: u8) {
        if remaining == 0 {
            return;
        }

        let evasions = self.rng.random_range(0..=self.params.max_evasions);
        for i in 0..evasions {
            let mv = i as u16 + 1;
            let counter_check = self.rng.random_bool(self.params.counter_check_probability);
            let mut flags = if counter_check {
                EdgeFlags::CHECK
            } else {
                EdgeFlags::QUIET
            };
            let mut piece = 0u8;

            if self.rng.random_bool(self.params.illegal_evasion_probability) {
                if self.rng.random_bool(0.5) {
                    flags = flags.king_move().exposing_king();
                } else {
                    self.builder.set_pinned(node, 1u64 << PINNED_PIECE);
                    piece = PINNED_PIECE;
                    flags = flags.exposing_king();
                }
            } else if self.rng.random_bool(0.2) {
                flags = flags.king_move();
            }

            let child = self.builder.add_node(counter_check);
            self.builder.add_piece_edge(node, child, mv, piece, flags);
            self.expand_attacker(child, counter_check, remaining - 1, Some(node));
        }
    }
}
