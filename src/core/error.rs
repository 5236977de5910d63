// This module defines error types for passtune using the thiserror crate. OracleError
// covers the fatal failures of a benchmark evaluation: the build or link tool exiting
// nonzero, a tool that could not be started, and a pass-list artifact that could not be
// written. Each variant carries the command line and captured output so the driver can
// surface a full diagnostic before aborting. ConfigError covers loading and validating
// the search configuration. A failed benchmark run is not an error: the oracle turns
// it into a sentinel measurement.

//! Error types for passtune.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// External tool stage that an evaluation drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Build,
    Link,
    Run,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Stage::Build => "build",
            Stage::Link => "link",
            Stage::Run => "run",
        })
    }
}

/// Fatal failure of a benchmark evaluation.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("build failed ({status}): {command}")]
    Build {
        command: String,
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },

    #[error("link failed ({status}): {command}")]
    Link {
        command: String,
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },

    #[error("could not start {stage} tool `{command}`: {source}")]
    Spawn {
        stage: Stage,
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write pass file {}: {source}", .path.display())]
    PassFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OracleError {
    /// Every oracle error ends the search.
    pub fn is_fatal(&self) -> bool {
        true
    }

    /// Captured (stdout, stderr) of the failing tool, if it ran.
    pub fn captured_output(&self) -> Option<(&str, &str)> {
        match self {
            OracleError::Build { stdout, stderr, .. }
            | OracleError::Link { stdout, stderr, .. } => Some((stdout.as_str(), stderr.as_str())),
            _ => None,
        }
    }
}

/// Result type alias for oracle operations.
pub type OracleResult<T> = Result<T, OracleError>;

/// Errors arising from configuration loading or validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Field '{field}' has invalid value {value}: {reason}")]
    InvalidField {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, value: impl std::fmt::Display, reason: &str) -> Self {
        ConfigError::InvalidField {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Failure to start or continue a search.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("invalid configuration: {}", join_messages(.0))]
    Config(Vec<ConfigError>),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

fn join_messages(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
