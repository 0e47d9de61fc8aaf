//! Caller-facing mate solver.
//!
//! Wraps a single `MateSearch` run with configuration checks, a shared stop
//! flag another thread can raise, timing, and logging. The position is
//! borrowed for the duration of one call and handed back unchanged.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::mate_search::node_search::{MateSearch, MateSearchStats};
use crate::mate_search::search_config::{validate_ply, MateSearchConfig};
use crate::mate_search_errors::MateSearchResult;
use crate::position::mate_position::MatePosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MateSearchOutcome<M> {
    pub ply: u8,
    /// First move of a forced mate, if one was proven.
    pub mate_move: Option<M>,
    pub stats: MateSearchStats,
    /// The search was stopped early; `mate_move == None` is then inconclusive.
    pub aborted: bool,
    pub elapsed: Duration,
}

impl<M> MateSearchOutcome<M> {
    #[inline]
    pub fn is_mate(&self) -> bool {
        self.mate_move.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct MateSolver {
    config: MateSearchConfig,
    stop: Arc<AtomicBool>,
}

impl Default for MateSolver {
    fn default() -> Self {
        Self {
            config: MateSearchConfig::default(),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl MateSolver {
    pub fn new(config: MateSearchConfig) -> MateSearchResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    #[inline]
    pub fn config(&self) -> &MateSearchConfig {
        &self.config
    }

    pub fn set_option(&mut self, name: &str, value: &str) -> MateSearchResult<()> {
        self.config.set_option(name, value)
    }

    /// Handle for cancelling searches from another thread.
    #[inline]
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    #[inline]
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Search at the configured ply.
    pub fn solve<P: MatePosition>(
        &self,
        pos: &mut P,
    ) -> MateSearchResult<MateSearchOutcome<P::Move>> {
        self.solve_with_ply(pos, self.config.max_ply)
    }

    /// Search for a forced mate within `ply` plies and return its first move.
    ///
    /// Clears any earlier stop request before starting.
    pub fn solve_with_ply<P: MatePosition>(
        &self,
        pos: &mut P,
        ply: u8,
    ) -> MateSearchResult<MateSearchOutcome<P::Move>> {
        validate_ply(ply)?;
        self.stop.store(false, Ordering::Relaxed);

        debug!("mate search start: ply={ply} in_check={}", pos.in_check());
        let started = Instant::now();

        let mut search = self.search(pos);
        let mate_move = search.mate_move_in_odd_ply(ply);
        let outcome = MateSearchOutcome {
            ply,
            mate_move,
            stats: search.stats(),
            aborted: search.aborted(),
            elapsed: started.elapsed(),
        };

        self.log_outcome(&outcome);
        Ok(outcome)
    }

    /// Existence-only search at `ply`. Repetitions are not filtered at the root.
    pub fn is_mate<P: MatePosition>(&self, pos: &mut P, ply: u8) -> MateSearchResult<bool> {
        validate_ply(ply)?;
        self.stop.store(false, Ordering::Relaxed);

        let in_check = pos.in_check();
        let mut search = self.search(pos);
        let found = if in_check {
            search.mate_in_odd_ply::<true>(ply)
        } else {
            search.mate_in_odd_ply::<false>(ply)
        };
        if search.aborted() {
            warn!("mate existence check at ply {ply} aborted after {} nodes", search.stats().nodes);
        }
        Ok(found)
    }

    fn search<'a, P: MatePosition>(&'a self, pos: &'a mut P) -> MateSearch<'a, P> {
        MateSearch::new(pos)
            .with_repetition_lookback(self.config.repetition_lookback)
            .with_node_limit(self.config.node_limit)
            .with_stop_flag(&self.stop)
    }

    fn log_outcome<M: std::fmt::Debug>(&self, outcome: &MateSearchOutcome<M>) {
        if outcome.aborted {
            warn!(
                "mate search at ply {} aborted after {} nodes",
                outcome.ply, outcome.stats.nodes
            );
        }
        debug!(
            "mate search done: ply={} mate={:?} nodes={} or={} and={} oracle={} skipped_repetitions={} time_ms={}",
            outcome.ply,
            outcome.mate_move,
            outcome.stats.nodes,
            outcome.stats.or_nodes,
            outcome.stats.and_nodes,
            outcome.stats.oracle_calls,
            outcome.stats.repetition_skips,
            outcome.elapsed.as_millis()
        );
    }
}
