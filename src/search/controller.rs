//! The search loop.
//!
//! Each iteration proposes an addition (append random passes to the best
//! list, keep it only if it beats the incumbent by the acceptance margin),
//! then a pruning (drop each pass of the best list on a coin flip, keep it
//! if it is no slower), then refreshes the incumbent's score. There is no
//! convergence test: [`SearchController`] is an unbounded iterator and the
//! caller decides when to stop.

use super::acceptance::{accepts_addition, accepts_pruning};
use crate::core::config::{RefreshPolicy, SearchConfig};
use crate::core::error::{OracleResult, SearchError};
use crate::core::random::RandomSource;
use crate::oracle::{BenchmarkResult, Oracle};
use crate::passes::{mutate_add, mutate_prune, PassCatalog, PassList};

/// Incumbent of the search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub best: PassList,
    /// Latest oracle measurement of `best`.
    pub best_time: BenchmarkResult,
    /// Completed iterations.
    pub iteration: u64,
}

/// One proposed candidate and what happened to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub candidate: PassList,
    pub result: BenchmarkResult,
    pub accepted: bool,
}

/// Everything one iteration did.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    pub iteration: u64,
    pub addition: Attempt,
    pub pruning: Attempt,
    /// Best list and score at the end of the iteration.
    pub best: PassList,
    pub best_time: BenchmarkResult,
}

/// Hill-climbing controller over pass lists.
///
/// Evaluations run strictly one at a time; the oracle overwrites shared
/// build artifacts on every call.
pub struct SearchController<O, R> {
    config: SearchConfig,
    catalog: PassCatalog,
    oracle: O,
    rng: R,
    state: SearchState,
    halted: bool,
}

impl<O: Oracle, R: RandomSource> SearchController<O, R> {
    /// Validate `config`, then measure the configured seed list and start
    /// from it. An invalid configuration is rejected before the oracle runs.
    pub fn new(config: SearchConfig, mut oracle: O, rng: R) -> Result<Self, SearchError> {
        config.validate().map_err(SearchError::Config)?;
        let catalog = config.build_catalog();
        let best = config.seed_passes.clone();
        log::info!("initial passes:\n{}", best.display_block());
        let best_time = oracle.evaluate(&best, config.repetitions)?;
        log::info!("time with initial passes: {}", best_time);

        Ok(Self {
            config,
            catalog,
            oracle,
            rng,
            state: SearchState {
                best,
                best_time,
                iteration: 0,
            },
            halted: false,
        })
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Whether a fatal oracle error has stopped the search.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Give back the oracle, e.g. to write out the final best list.
    pub fn into_parts(self) -> (SearchState, O) {
        (self.state, self.oracle)
    }

    /// Run one full iteration.
    ///
    /// A fatal oracle error halts the controller; later calls to
    /// [`Iterator::next`] return `None`.
    pub fn step(&mut self) -> OracleResult<IterationRecord> {
        let result = self.iterate();
        if result.is_err() {
            self.halted = true;
        }
        result
    }

    fn iterate(&mut self) -> OracleResult<IterationRecord> {
        let iteration = self.state.iteration + 1;
        let repetitions = self.config.repetitions;
        let mut changed = false;

        let (candidate, added) =
            mutate_add(&self.state.best, self.config.max_add, &self.catalog, &mut self.rng);
        log::info!(
            "iteration {}: trying {} added passes:\n{}",
            iteration,
            added.len(),
            added.display_block()
        );
        let result = self.oracle.evaluate(&candidate, repetitions)?;
        let accepted =
            accepts_addition(&result, &self.state.best_time, self.config.accept_threshold);
        if accepted {
            log::info!("new best found: {} (was {})", result, self.state.best_time);
            self.state.best = candidate.clone();
            self.state.best_time = result;
            changed = true;
        } else {
            log::info!("no improvement: {} (best {})", result, self.state.best_time);
        }
        let addition = Attempt {
            candidate,
            result,
            accepted,
        };

        let pruned = mutate_prune(&self.state.best, &mut self.rng);
        let result = self.oracle.evaluate(&pruned, repetitions)?;
        let accepted = accepts_pruning(&result, &self.state.best_time);
        if accepted {
            log::info!(
                "pruning accepted: {} -> {} passes, {}",
                self.state.best.len(),
                pruned.len(),
                result
            );
            self.state.best = pruned.clone();
            self.state.best_time = result;
            changed = true;
        } else {
            log::info!("pruning to {} passes rejected: {}", pruned.len(), result);
        }
        let pruning = Attempt {
            candidate: pruned,
            result,
            accepted,
        };

        if changed || self.config.refresh_policy == RefreshPolicy::Remeasure {
            self.state.best_time = self.oracle.evaluate(&self.state.best, repetitions)?;
        } else {
            // The rejected candidates were the last build inputs.
            self.oracle.stage(&self.state.best)?;
        }
        self.state.iteration = iteration;

        log::info!(
            "iteration {}: current best ({} passes):\n{}",
            iteration,
            self.state.best.len(),
            self.state.best.display_block()
        );
        log::info!("iteration {}: current best time: {}", iteration, self.state.best_time);

        Ok(IterationRecord {
            iteration,
            addition,
            pruning,
            best: self.state.best.clone(),
            best_time: self.state.best_time,
        })
    }
}

impl<O: Oracle, R: RandomSource> Iterator for SearchController<O, R> {
    type Item = OracleResult<IterationRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted {
            return None;
        }
        Some(self.step())
    }
}

impl<O: Oracle, R: RandomSource> std::iter::FusedIterator for SearchController<O, R> {}
