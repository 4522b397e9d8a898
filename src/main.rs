// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Tripline CLI - itineraries and calendars for your travel journal

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tripline::commands::{self, stats::Ranking, Output};
use tripline::config;

#[derive(Parser)]
#[command(name = "tripline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "TRIPLINE_CONFIG")]
    config: Option<PathBuf>,

    /// Journal file override
    #[arg(short, long)]
    journal: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    no_color: bool,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List a trip's destinations with travel groups collapsed
    Itinerary {
        /// Trip id or name
        trip: String,
    },

    /// Show a trip day by day
    Days {
        /// Trip id or name
        trip: String,
    },

    /// Show every trip overlapping a month
    Month {
        /// Year
        year: i32,

        /// Month (1-12)
        month: u32,
    },

    /// Show a year of mini calendars
    Year {
        /// Year
        year: i32,
    },

    /// Journal totals, or a trip ranking
    Stats {
        /// Rank trips instead of printing totals
        #[arg(long, value_enum)]
        rank: Option<Ranking>,
    },

    /// Export a trip's node/leg graph as Graphviz DOT
    Graph {
        /// Trip id or name
        trip: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (journal, log_level, color)
        key: Option<String>,

        /// Value to set (omit to get)
        value: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = config::load(cli.config.as_deref())?;

    // Initialize logging: -v/-q win over RUST_LOG, which wins over the config file
    let directive = match cli.verbose {
        0 if cli.quiet => Some("error"),
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    };
    let filter = match directive {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let journal = cli.journal.clone().unwrap_or_else(|| settings.journal.clone());
    let out = Output {
        json: cli.json,
        color: settings.color && !cli.no_color,
    };

    // Execute command
    match cli.command {
        Commands::Itinerary { trip } => commands::itinerary::run(&journal, &trip, out),
        Commands::Days { trip } => commands::days::run(&journal, &trip, out),
        Commands::Month { year, month } => commands::month::run(&journal, year, month, out),
        Commands::Year { year } => commands::year::run(&journal, year, out),
        Commands::Stats { rank } => commands::stats::run(&journal, rank, out),
        Commands::Graph { trip, output } => commands::graph::run(&journal, &trip, output),
        Commands::Config { key, value } => {
            let path = cli.config.clone().unwrap_or_else(config::default_path);
            commands::config::run(&settings, &path, key.as_deref(), value.as_deref())
        }
        Commands::Completions { shell } => commands::completions::run(shell, &mut Cli::command()),
    }
}
