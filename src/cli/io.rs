//! JSON I/O handling for the CLI
//!
//! - Input: one JSON document via stdin
//! - Output: one JSON object per line via stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Read one JSON document from stdin
pub fn read_request() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_request(&input)
}

fn parse_request(input: &str) -> CliResult<Value> {
    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }
    Ok(serde_json::from_str(input)?)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&json!({
        "status": "ok",
        "data": data
    }))
}

/// Write a rejection carrying its violation list to stdout
pub fn write_rejection(code: &str, violations: Value) -> CliResult<()> {
    write_line(&json!({
        "status": "error",
        "code": code,
        "violations": violations
    }))
}

fn write_line(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
