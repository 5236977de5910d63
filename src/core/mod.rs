// This module gathers the infrastructure shared by the rest of passtune: the error
// types for fatal oracle failures and configuration problems, the immutable search
// configuration with its TOML loader and validation, and the random-source
// abstraction that keeps mutation outcomes reproducible and scriptable in tests.

//! Core passtune infrastructure.

pub mod config;
pub mod error;
pub mod random;
pub mod test_utils;

pub use config::{RefreshPolicy, SearchConfig, ToolchainConfig};
pub use error::{ConfigError, OracleError, OracleResult, SearchError, Stage};
pub use random::{RandomSource, StdRandom};
