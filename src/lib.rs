//! passtune - search for fast LLVM pass orderings.
//!
//! passtune treats "build the benchmark with this pass list, link it, run it"
//! as an expensive, noisy oracle and hill-climbs over ordered pass lists
//! (repetition allowed) to minimize the measured execution time.
//!
//! # Primary Usage
//!
//! ```ignore
//! use passtune::{SearchConfig, SearchController, StdRandom, ToolchainOracle};
//!
//! let config = SearchConfig::default();
//! let oracle = ToolchainOracle::new(&config.toolchain);
//! let search = SearchController::new(config, oracle, StdRandom::seeded(7))?;
//! for record in search.take(100) {
//!     let record = record?;
//!     println!("{}: {}", record.iteration, record.best_time);
//! }
//! ```
//!
//! # Architecture
//!
//! - [`passes`] - pass names, lists, the catalog and the mutation operators
//! - [`oracle`] - the benchmark oracle and the generated pass file
//! - [`search`] - acceptance rules and the search controller
//! - [`core`] - configuration, errors and the random source

pub mod core;
pub mod oracle;
pub mod passes;
pub mod search;

pub use self::core::{
    ConfigError, OracleError, OracleResult, RandomSource, RefreshPolicy, SearchConfig, SearchError,
    Stage, StdRandom, ToolchainConfig,
};
pub use oracle::{BenchmarkResult, Oracle, PassFile, ToolchainOracle, SENTINEL_SECS};
pub use passes::{PassCatalog, PassList, PassName};
pub use search::{Attempt, IterationRecord, SearchController, SearchState};
