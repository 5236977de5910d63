//! Stochastic hill-climbing over pass lists.

pub mod acceptance;
pub mod controller;

pub use acceptance::{accepts_addition, accepts_pruning};
pub use controller::{Attempt, IterationRecord, SearchController, SearchState};
