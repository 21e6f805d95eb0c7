//! loandb CLI entry point
//!
//! Parses arguments and dispatches via `cli::run`; prints any error to
//! stderr and exits non-zero. All logic lives in the CLI module.

use loandb::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
