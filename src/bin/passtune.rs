//! passtune command-line driver.
//!
//! Runs the pass-ordering search until interrupted (or for a fixed number of
//! iterations), printing the progress log on stdout.

use clap::{Args, Parser, Subcommand};
use passtune::passes::DENYLIST;
use passtune::{
    OracleError, PassFile, RefreshPolicy, SearchConfig, SearchController, SearchError,
    StdRandom, ToolchainOracle,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "passtune")]
#[command(about = "Search for fast LLVM optimization pass orderings", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the search (default)
    Search(SearchArgs),

    /// List the pass catalog and the denylist
    Passes,

    /// Print the pass file generated for the seed list
    Render,
}

#[derive(Args, Default)]
struct SearchArgs {
    /// Seed for the random source; omit for a fresh seed each run
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many iterations instead of running until interrupted
    #[arg(short = 'n', long)]
    max_iterations: Option<u64>,

    /// Fraction of the best time an addition must reach to be accepted
    #[arg(long)]
    accept_threshold: Option<f64>,

    /// Maximum passes appended per addition
    #[arg(long)]
    max_add: Option<usize>,

    /// Benchmark runs averaged per evaluation
    #[arg(short, long)]
    repetitions: Option<u32>,

    /// Directory the build, link and run commands execute in
    #[arg(short, long)]
    workdir: Option<PathBuf>,

    /// Keep the accepted score instead of re-measuring an unchanged best
    #[arg(long)]
    retain_accepted_score: bool,
}

impl SearchArgs {
    fn apply(&self, config: &mut SearchConfig) {
        if let Some(t) = self.accept_threshold {
            config.accept_threshold = t;
        }
        if let Some(k) = self.max_add {
            config.max_add = k;
        }
        if let Some(n) = self.repetitions {
            config.repetitions = n;
        }
        if let Some(dir) = &self.workdir {
            config.toolchain.workdir = dir.clone();
        }
        if self.retain_accepted_score {
            config.refresh_policy = RefreshPolicy::RetainAccepted;
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => match SearchConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::from(2);
            }
        },
        None => SearchConfig::default(),
    };

    match cli.command {
        Some(Commands::Search(args)) => search(config, &args),
        None => search(config, &SearchArgs::default()),
        Some(Commands::Passes) => {
            list_passes(&config);
            ExitCode::SUCCESS
        }
        Some(Commands::Render) => {
            let file = PassFile::new(
                config.toolchain.pass_file_path(),
                config.toolchain.pass_manager.clone(),
            );
            print!("{}", file.render(&config.seed_passes));
            ExitCode::SUCCESS
        }
    }
}

fn search(mut config: SearchConfig, args: &SearchArgs) -> ExitCode {
    args.apply(&mut config);
    let rng = match args.seed {
        Some(seed) => StdRandom::seeded(seed),
        None => StdRandom::from_entropy(),
    };
    let oracle = ToolchainOracle::new(&config.toolchain);
    let mut search = match SearchController::new(config, oracle, rng) {
        Ok(search) => search,
        Err(SearchError::Config(errors)) => {
            for e in &errors {
                log::error!("{}", e);
            }
            return ExitCode::from(2);
        }
        Err(SearchError::Oracle(e)) => return fatal(&e),
    };

    let limit = args
        .max_iterations
        .map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));
    for record in search.by_ref().take(limit) {
        if let Err(e) = record {
            return fatal(&e);
        }
    }

    let (state, oracle) = search.into_parts();
    log::info!(
        "stopped after {} iterations; best time {} with {} passes:\n{}",
        state.iteration,
        state.best_time,
        state.best.len(),
        state.best.display_block()
    );
    match oracle.pass_file().write(&state.best) {
        Ok(()) => {
            log::info!("best pass list written to {}", oracle.pass_file().path().display());
            ExitCode::SUCCESS
        }
        Err(e) => fatal(&e),
    }
}

fn fatal(e: &OracleError) -> ExitCode {
    log::error!("{}", e);
    if let Some((stdout, stderr)) = e.captured_output() {
        log::error!("stdout:\n{}", stdout);
        log::error!("stderr:\n{}", stderr);
    }
    log::error!("search aborted");
    ExitCode::FAILURE
}

fn list_passes(config: &SearchConfig) {
    let catalog = config.build_catalog();
    println!("catalog ({} passes):", catalog.len());
    for pass in catalog.passes() {
        println!("  {}", pass);
    }
    println!("denylist:");
    for (pass, reason) in DENYLIST {
        println!("  {} ({})", pass, reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_search_flags() {
        let cli = Cli::try_parse_from([
            "passtune",
            "search",
            "--seed",
            "7",
            "-n",
            "3",
            "--accept-threshold",
            "0.95",
            "--retain-accepted-score",
        ])
        .unwrap();
        let Some(Commands::Search(args)) = cli.command else {
            panic!("expected search subcommand");
        };
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.max_iterations, Some(3));

        let mut config = SearchConfig::default();
        args.apply(&mut config);
        assert_eq!(config.accept_threshold, 0.95);
        assert_eq!(config.refresh_policy, RefreshPolicy::RetainAccepted);
        assert_eq!(config.max_add, 10);
    }

    #[test]
    fn test_cli_defaults_to_search() {
        let cli = Cli::try_parse_from(["passtune", "--config", "p.toml"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, Some(PathBuf::from("p.toml")));
    }

    #[test]
    fn test_cli_verify() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
