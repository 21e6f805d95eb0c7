//! CLI module for loandb
//!
//! Provides command-line interface for:
//! - init: Create the data directory layout
//! - validate: Check one record from stdin
//! - seed: Load the bootstrap rows
//! - import: Batch-load a JSON-lines file
//! - indexes: Show index declarations
//! - stats: Show record counts

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{import, indexes, init, run, run_command, seed, stats, validate};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_rejection, write_response};
