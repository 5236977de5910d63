//! Benchmark oracle.
//!
//! The oracle maps a pass list to a timing signal. Callers treat it as a
//! synchronous, blocking call: it either returns a [`BenchmarkResult`] (a
//! mean time, or the failure sentinel when a benchmark run went wrong) or a
//! fatal [`OracleError`](crate::core::error::OracleError) when the benchmark
//! could not be built or linked at all.

pub mod pass_file;
pub mod toolchain;

pub use pass_file::PassFile;
pub use toolchain::ToolchainOracle;

use crate::core::error::OracleResult;
use crate::passes::PassList;
use std::fmt;

/// Time reported for a failed measurement, in seconds. Larger than any
/// realistic benchmark duration.
pub const SENTINEL_SECS: f64 = 100_000.0;

/// Outcome of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BenchmarkResult {
    /// Mean wall-clock time over `samples` runs.
    Measured { mean_secs: f64, samples: u32 },
    /// A run failed; the evaluation counts as maximally bad.
    Failed,
}

impl BenchmarkResult {
    pub fn measured(mean_secs: f64, samples: u32) -> Self {
        BenchmarkResult::Measured { mean_secs, samples }
    }

    /// Mean time, or [`SENTINEL_SECS`] for a failed measurement.
    pub fn seconds(&self) -> f64 {
        match self {
            BenchmarkResult::Measured { mean_secs, .. } => *mean_secs,
            BenchmarkResult::Failed => SENTINEL_SECS,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, BenchmarkResult::Failed)
    }
}

impl fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchmarkResult::Measured { mean_secs, samples } => {
                write!(f, "{:.4}s (mean of {})", mean_secs, samples)
            }
            BenchmarkResult::Failed => f.write_str("failed"),
        }
    }
}

/// Scores a pass list by building, linking and timing the benchmark.
pub trait Oracle {
    /// Evaluate `passes`, averaging `repetitions` benchmark runs.
    ///
    /// A failing benchmark run yields `Ok(BenchmarkResult::Failed)`; only
    /// build and link failures are errors.
    fn evaluate(&mut self, passes: &PassList, repetitions: u32) -> OracleResult<BenchmarkResult>;

    /// Leave `passes` as the current build input without measuring it.
    fn stage(&mut self, _passes: &PassList) -> OracleResult<()> {
        Ok(())
    }
}

impl<O: Oracle + ?Sized> Oracle for &mut O {
    fn evaluate(&mut self, passes: &PassList, repetitions: u32) -> OracleResult<BenchmarkResult> {
        (**self).evaluate(passes, repetitions)
    }

    fn stage(&mut self, passes: &PassList) -> OracleResult<()> {
        (**self).stage(passes)
    }
}

impl<O: Oracle + ?Sized> Oracle for Box<O> {
    fn evaluate(&mut self, passes: &PassList, repetitions: u32) -> OracleResult<BenchmarkResult> {
        (**self).evaluate(passes, repetitions)
    }

    fn stage(&mut self, passes: &PassList) -> OracleResult<()> {
        (**self).stage(passes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_seconds() {
        assert_eq!(BenchmarkResult::Failed.seconds(), SENTINEL_SECS);
        assert_eq!(BenchmarkResult::measured(1.5, 10).seconds(), 1.5);
        assert!(BenchmarkResult::Failed.is_failed());
    }

    #[test]
    fn test_display() {
        assert_eq!(BenchmarkResult::measured(1.9, 10).to_string(), "1.9000s (mean of 10)");
        assert_eq!(BenchmarkResult::Failed.to_string(), "failed");
    }
}
