//! Linewar CLI - headless matches, batch statistics and configuration.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Linewar - a real-time territory-capture simulation
#[derive(Parser, Debug)]
#[command(name = "linewar")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Simulation configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play one headless match on the classic board
    Run {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum ticks at 60 ticks per simulated second (default: 36000)
        #[arg(short = 't', long, default_value = "36000")]
        max_ticks: u64,

        /// Level to play
        #[arg(short, long, default_value = "0")]
        level: u32,

        /// Leave the player faction idle instead of driving it
        #[arg(long)]
        idle: bool,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Include the final board in JSON output
        #[arg(long)]
        board: bool,
    },

    /// Run many matches in parallel and aggregate the outcomes
    Batch {
        /// Number of matches to run (default: 100)
        #[arg(short, long, default_value = "100")]
        games: u64,

        /// Starting seed (increments for each match)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Maximum ticks per match (default: 36000)
        #[arg(short = 't', long, default_value = "36000")]
        max_ticks: u64,

        /// Level to play
        #[arg(short, long, default_value = "0")]
        level: u32,

        /// Leave the player faction idle instead of driving it
        #[arg(long)]
        idle: bool,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::BatchFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Print the effective configuration as JSON
    Config,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    let result = cli::load_config(args.config.as_deref()).and_then(|config| match args.command {
        Commands::Run {
            seed,
            max_ticks,
            level,
            idle,
            format,
            board,
        } => {
            let options = cli::MatchArgs {
                seed,
                max_ticks,
                level,
                autopilot: !idle,
            };
            cli::run::execute(&config, options, format, board)
        }

        Commands::Batch {
            games,
            seed,
            threads,
            max_ticks,
            level,
            idle,
            format,
            progress,
        } => {
            let options = cli::MatchArgs {
                seed,
                max_ticks,
                level,
                autopilot: !idle,
            };
            cli::batch::execute(&config, options, games, threads, format, progress)
        }

        Commands::Config => cli::config::execute(&config),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
