//! Gatewalk CLI - Command-line interface for the memory-maze game.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

/// Gatewalk - a memory-maze game with color-sequence gates
#[derive(Parser, Debug)]
#[command(name = "gatewalk")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play the game in an interactive TUI
    Play {
        /// Random seed for challenge sequences (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Data directory (default: ~/.gatewalk)
        #[arg(long)]
        data_dir: Option<std::path::PathBuf>,

        /// Keep progress in memory only, nothing touches disk
        #[arg(long)]
        ephemeral: bool,
    },

    /// Print the built-in maze templates
    Layouts {
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Show or clear saved progress
    Progress {
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Data directory (default: ~/.gatewalk)
        #[arg(long)]
        data_dir: Option<std::path::PathBuf>,

        /// Wipe saved progress instead of showing it
        #[arg(long)]
        clear: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Play {
            seed,
            data_dir,
            ephemeral,
        } => cli::play::execute(seed, data_dir, ephemeral),

        Commands::Layouts { format } => cli::layouts::execute(format),

        Commands::Progress {
            format,
            data_dir,
            clear,
        } => cli::progress::execute(format, data_dir, clear),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
