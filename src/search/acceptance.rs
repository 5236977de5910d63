//! Acceptance rules.
//!
//! Growth is held to a strict margin so that noise alone cannot lengthen the
//! pipeline; shrinking only has to tie. A failed measurement is never
//! accepted by either rule, whatever the incumbent's score.

use crate::oracle::BenchmarkResult;
use BenchmarkResult::{Failed, Measured};

/// Addition rule: accept iff `candidate <= best * threshold`.
pub fn accepts_addition(
    candidate: &BenchmarkResult,
    best: &BenchmarkResult,
    threshold: f64,
) -> bool {
    match (candidate, best) {
        (Failed, _) => false,
        (Measured { .. }, Failed) => true,
        (Measured { mean_secs: c, .. }, Measured { mean_secs: b, .. }) => *c <= *b * threshold,
    }
}

/// Pruning rule: adopt iff `candidate <= best`.
pub fn accepts_pruning(candidate: &BenchmarkResult, best: &BenchmarkResult) -> bool {
    match (candidate, best) {
        (Failed, _) => false,
        (Measured { .. }, Failed) => true,
        (Measured { mean_secs: c, .. }, Measured { mean_secs: b, .. }) => *c <= *b,
    }
}
