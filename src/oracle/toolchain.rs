// This module implements the oracle that drives the real toolchain. An evaluation writes
// the pass file, runs the build command (which compiles the benchmark with the generated
// pass list), runs the link command, and then times the produced executable the requested
// number of times. Build and link failures are fatal and carry the captured output of the
// failing tool. A failing benchmark run is not: it is logged and the whole evaluation is
// reported as BenchmarkResult::Failed so the acceptance rules reject it. All commands run
// in the configured working directory and overwrite the same artifacts on every call, so
// the oracle must never be shared between concurrent evaluations.

//! Oracle backed by external build, link and run commands.

use super::pass_file::PassFile;
use super::{BenchmarkResult, Oracle};
use crate::core::config::ToolchainConfig;
use crate::core::error::{OracleError, OracleResult, Stage};
use crate::passes::PassList;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::Instant;

/// [`Oracle`] that builds, links and times the benchmark with external tools.
#[derive(Debug, Clone)]
pub struct ToolchainOracle {
    workdir: PathBuf,
    pass_file: PassFile,
    build: Vec<String>,
    link: Vec<String>,
    run: Vec<String>,
}

impl ToolchainOracle {
    pub fn new(config: &ToolchainConfig) -> Self {
        Self {
            workdir: config.workdir.clone(),
            pass_file: PassFile::new(config.pass_file_path(), config.pass_manager.clone()),
            build: config.build.clone(),
            link: config.link.clone(),
            run: config.run.clone(),
        }
    }

    pub fn pass_file(&self) -> &PassFile {
        &self.pass_file
    }

    fn spawn(&self, stage: Stage, argv: &[String]) -> OracleResult<Output> {
        let command = argv.join(" ");
        let (program, args) = argv.split_first().ok_or_else(|| OracleError::Spawn {
            stage,
            command: command.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
        })?;
        log::debug!("{}: {}", stage, command);
        Command::new(program)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| OracleError::Spawn {
                stage,
                command,
                source: e,
            })
    }

    /// Run a build or link step; a nonzero exit is fatal.
    fn check(&self, stage: Stage, argv: &[String]) -> OracleResult<()> {
        let output = self.spawn(stage, argv)?;
        if output.status.success() {
            return Ok(());
        }
        let command = argv.join(" ");
        let status = output.status;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        Err(match stage {
            Stage::Link => OracleError::Link {
                command,
                status,
                stdout,
                stderr,
            },
            _ => OracleError::Build {
                command,
                status,
                stdout,
                stderr,
            },
        })
    }

    /// Time one benchmark run. `None` if it could not start or exited nonzero.
    fn time_run(&self) -> Option<f64> {
        let start = Instant::now();
        let output = match self.spawn(Stage::Run, &self.run) {
            Ok(output) => output,
            Err(e) => {
                log::warn!("benchmark run penalized: {}", e);
                return None;
            }
        };
        let elapsed = start.elapsed().as_secs_f64();
        if !output.status.success() {
            log::warn!(
                "benchmark run penalized: {} exited with {}\nstdout:\n{}\nstderr:\n{}",
                self.run.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr),
            );
            return None;
        }
        log::debug!("run: {:.4}s", elapsed);
        Some(elapsed)
    }
}

impl Oracle for ToolchainOracle {
    fn evaluate(&mut self, passes: &PassList, repetitions: u32) -> OracleResult<BenchmarkResult> {
        self.pass_file.write(passes)?;
        self.check(Stage::Build, &self.build)?;
        self.check(Stage::Link, &self.link)?;

        let repetitions = repetitions.max(1);
        let mut total = 0.0;
        for _ in 0..repetitions {
            match self.time_run() {
                Some(secs) => total += secs,
                None => return Ok(BenchmarkResult::Failed),
            }
        }
        Ok(BenchmarkResult::measured(total / f64::from(repetitions), repetitions))
    }

    fn stage(&mut self, passes: &PassList) -> OracleResult<()> {
        self.pass_file.write(passes)
    }
}
