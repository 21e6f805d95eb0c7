//! CLI argument definitions using clap
//!
//! Commands:
//! - loandb init --config <path>
//! - loandb validate --kind <kind> [--config <path>]
//! - loandb seed --config <path>
//! - loandb import --config <path> --kind <kind> --file <path>
//! - loandb indexes
//! - loandb stats --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::schema::RecordKind;

/// loandb - validated storage for loan applications, predictions and analytics
#[derive(Parser, Debug)]
#[command(name = "loandb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory layout
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./loandb.json")]
        config: PathBuf,
    },

    /// Validate one JSON record read from stdin
    Validate {
        /// Record kind (loan_application, loan_prediction, loan_analytics)
        #[arg(long)]
        kind: RecordKind,

        /// Configuration file supplying validator options
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Load the bootstrap sample rows
    Seed {
        /// Path to configuration file
        #[arg(long, default_value = "./loandb.json")]
        config: PathBuf,
    },

    /// Import a JSON-lines file into one collection
    Import {
        /// Path to configuration file
        #[arg(long, default_value = "./loandb.json")]
        config: PathBuf,

        /// Record kind of every line in the file
        #[arg(long)]
        kind: RecordKind,

        /// JSON-lines input file
        #[arg(long)]
        file: PathBuf,
    },

    /// Print the index declarations of every collection
    Indexes,

    /// Print record counts per collection
    Stats {
        /// Path to configuration file
        #[arg(long, default_value = "./loandb.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
