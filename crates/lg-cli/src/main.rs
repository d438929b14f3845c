//! Headless command-line runner for the LittleGuy simulation.

mod commands;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "littleguy",
    about = "LittleGuy: a desktop toy of a wandering little guy, a ball, and a bed",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the default scene without a window and report what happened
    Simulate {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "600")]
        ticks: u64,

        /// Seconds per tick
        #[arg(long, default_value = "0.016666668")]
        dt: f32,

        /// RNG seed (overrides the configuration file)
        #[arg(short, long)]
        seed: Option<u64>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show the full event log and debug logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the default configuration as JSON
    Config {
        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate {
            ticks,
            dt,
            seed,
            config,
            verbose,
        } => {
            logging::init(verbose);
            commands::simulate::run(ticks, dt, seed, config.as_deref(), verbose)
        }
        Commands::Config { output } => {
            logging::init(false);
            commands::config::run(output.as_deref())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
