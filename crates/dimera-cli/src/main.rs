//! Dimera CLI - rank protein target pairs from the command line.

mod commands;
mod dataset;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "dimera")]
#[command(author, version, about = "Dimera - target pair ranking engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank target pairs from a dataset file
    Rank {
        /// Dataset JSON file (proteins + interactions)
        dataset: String,

        /// Disease indication to rank for
        #[arg(short, long)]
        indication: String,

        /// Patient population context
        #[arg(long, default_value = "unspecified")]
        population: String,

        /// Clinical phenotype context
        #[arg(long, default_value = "unspecified")]
        phenotype: String,

        /// Targeting strategy (synergism, engager, degrader)
        #[arg(short, long, default_value = "synergism")]
        strategy: String,

        /// Keep only the best K pairs
        #[arg(short, long)]
        top_k: Option<usize>,

        /// Tissue weight override, NAME=WEIGHT (repeatable)
        #[arg(long = "tissue", value_name = "NAME=WEIGHT")]
        tissues: Vec<String>,

        /// Explicit candidate pair, A:B (repeatable; default: all
        /// interacting pairs)
        #[arg(long = "pair", value_name = "A:B")]
        pairs: Vec<String>,

        /// Minimum interaction confidence kept at graph build
        #[arg(long, default_value = "0.5")]
        min_confidence: f64,

        /// Seed for deterministic model weights
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Show graph statistics for a dataset file
    Inspect {
        /// Dataset JSON file (proteins + interactions)
        dataset: String,

        /// Minimum interaction confidence kept at graph build
        #[arg(long, default_value = "0.5")]
        min_confidence: f64,
    },

    /// List the curated pathway atlas
    Pathways {
        /// Show only pathways containing this gene symbol
        #[arg(short, long)]
        target: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Commands::Rank {
            dataset,
            indication,
            population,
            phenotype,
            strategy,
            top_k,
            tissues,
            pairs,
            min_confidence,
            seed,
        } => commands::rank::run(commands::rank::RankArgs {
            dataset,
            indication,
            population,
            phenotype,
            strategy,
            top_k,
            tissues,
            pairs,
            min_confidence,
            seed,
        }),
        Commands::Inspect {
            dataset,
            min_confidence,
        } => commands::inspect::run(&dataset, min_confidence),
        Commands::Pathways { target } => commands::pathways::run(target.as_deref()),
    }
}
