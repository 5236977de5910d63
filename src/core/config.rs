//! Search configuration.
//!
//! A [`SearchConfig`] is built once (defaults, optionally overlaid by a TOML
//! file and command-line flags), validated, and handed to the controller. It
//! is never mutated afterwards.
//!
//! Every field is optional in the file:
//!
//! ```toml
//! seed_passes = ["add_ipsccp_pass", "add_global_dce_pass"]
//! accept_threshold = 0.97
//! max_add = 10
//! repetitions = 10
//! refresh_policy = "remeasure"   # or "retain_accepted"
//!
//! [toolchain]
//! workdir = "."
//! pass_file = "src/llvm_passes.rs"
//! build = ["cargo", "run", "--", "build", "./examples/prime_loop.fix"]
//! link = ["gcc", "./examples/prime_loop.o"]
//! run = ["./a.out"]
//! ```

use crate::core::error::ConfigError;
use crate::passes::{deny_reason, PassCatalog, PassList, PassName};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Passes the search starts from when no seed is configured.
pub const DEFAULT_SEED_PASSES: &[&str] = &[
    "add_scalar_repl_aggregates_pass",
    "add_tail_call_elimination_pass",
    "add_function_inlining_pass",
    "add_global_optimizer_pass",
    "add_ipsccp_pass",
    "add_strip_dead_prototypes_pass",
    "add_ind_var_simplify_pass",
    "add_global_dce_pass",
    "add_promote_memory_to_register_pass",
    "add_dead_store_elimination_pass",
];

pub const DEFAULT_ACCEPT_THRESHOLD: f64 = 0.97;
pub const DEFAULT_MAX_ADD: usize = 10;
pub const DEFAULT_REPETITIONS: u32 = 10;

/// How `best_time` is refreshed at the end of an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Re-measure the best list every iteration and adopt that measurement,
    /// even when the list did not change.
    #[default]
    Remeasure,
    /// Keep the accepted score; re-measure only after the best list changed.
    RetainAccepted,
}

/// External commands and paths the toolchain oracle drives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolchainConfig {
    /// Directory every command runs in. Relative paths resolve against it.
    pub workdir: PathBuf,
    /// Pass-list source file rewritten before every evaluation.
    pub pass_file: PathBuf,
    /// Name of the pass-manager handle in the generated file.
    pub pass_manager: String,
    pub build: Vec<String>,
    pub link: Vec<String>,
    pub run: Vec<String>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            workdir: PathBuf::from("."),
            pass_file: PathBuf::from("src/llvm_passes.rs"),
            pass_manager: "passmgr".to_string(),
            build: argv(&["cargo", "run", "--", "build", "./examples/prime_loop.fix"]),
            link: argv(&["gcc", "./examples/prime_loop.o"]),
            run: argv(&["./a.out"]),
        }
    }
}

impl ToolchainConfig {
    /// The pass file path resolved against `workdir`.
    pub fn pass_file_path(&self) -> PathBuf {
        self.workdir.join(&self.pass_file)
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

/// Immutable configuration of one search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub seed_passes: PassList,
    /// A candidate replaces the incumbent only if
    /// `candidate <= best * accept_threshold`.
    pub accept_threshold: f64,
    /// Upper bound on passes appended per addition.
    pub max_add: usize,
    /// Benchmark runs averaged per evaluation.
    pub repetitions: u32,
    pub refresh_policy: RefreshPolicy,
    /// Replacement for the default catalog. Denylisted names are dropped.
    pub catalog: Option<Vec<PassName>>,
    pub toolchain: ToolchainConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            seed_passes: DEFAULT_SEED_PASSES.iter().copied().collect(),
            accept_threshold: DEFAULT_ACCEPT_THRESHOLD,
            max_add: DEFAULT_MAX_ADD,
            repetitions: DEFAULT_REPETITIONS,
            refresh_policy: RefreshPolicy::default(),
            catalog: None,
            toolchain: ToolchainConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Load from a TOML file. The result is not yet validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            file: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Parse TOML text. `origin` names the source in error messages.
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            file: origin.to_string(),
            source: e,
        })
    }

    /// The catalog this run samples from.
    pub fn build_catalog(&self) -> PassCatalog {
        match &self.catalog {
            Some(names) => PassCatalog::from_names(names),
            None => PassCatalog::llvm_legacy(),
        }
    }

    /// Check every semantic constraint, collecting all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();

        let t = self.accept_threshold;
        if !(t > 0.0 && t < 1.0) {
            errors.push(ConfigError::invalid(
                "accept_threshold",
                t,
                "must be a fraction strictly between 0 and 1",
            ));
        }
        if self.max_add == 0 {
            errors.push(ConfigError::invalid("max_add", self.max_add, "must be at least 1"));
        }
        if self.repetitions == 0 {
            errors.push(ConfigError::invalid(
                "repetitions",
                self.repetitions,
                "must be at least 1",
            ));
        }

        for (i, pass) in self.seed_passes.iter().enumerate() {
            if !pass.is_identifier() {
                errors.push(ConfigError::invalid(
                    &format!("seed_passes[{}]", i),
                    format!("{:?}", pass.as_str()),
                    "is not a valid method name",
                ));
            } else if let Some(reason) = deny_reason(pass.as_str()) {
                log::warn!("seed pass {} is denylisted ({})", pass, reason);
            }
        }

        if let Some(names) = &self.catalog {
            for (i, pass) in names.iter().enumerate() {
                if !pass.is_identifier() {
                    errors.push(ConfigError::invalid(
                        &format!("catalog[{}]", i),
                        format!("{:?}", pass.as_str()),
                        "is not a valid method name",
                    ));
                }
            }
            if self.build_catalog().is_empty() {
                errors.push(ConfigError::Validation(
                    "catalog is empty after removing denylisted passes".to_string(),
                ));
            }
        }

        let tc = &self.toolchain;
        if !PassName::new(tc.pass_manager.as_str()).is_identifier() {
            errors.push(ConfigError::invalid(
                "toolchain.pass_manager",
                format!("{:?}", tc.pass_manager),
                "is not a valid identifier",
            ));
        }
        for (field, cmd) in [
            ("toolchain.build", &tc.build),
            ("toolchain.link", &tc.link),
            ("toolchain.run", &tc.run),
        ] {
            if cmd.first().map_or(true, |program| program.is_empty()) {
                errors.push(ConfigError::invalid(field, format!("{:?}", cmd), "needs a program"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
