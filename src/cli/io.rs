//! JSON I/O handling for CLI
//!
//! - Input: one JSON object per line
//! - Output: one JSON object per line,
//!   `{"status":"ok","data":...}` or `{"status":"error","code":...,"message":...}`
//! - UTF-8 only

use std::io::{self, BufRead, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Read a single JSON value from stdin
pub fn read_request() -> CliResult<Value> {
    let stdin = io::stdin();
    read_request_from(&mut stdin.lock())
}

/// Read a single JSON value from `input`. The whole input is one value.
pub fn read_request_from(input: &mut impl BufRead) -> CliResult<Value> {
    let mut body = String::new();
    input.read_to_string(&mut body)?;

    if body.trim().is_empty() {
        return Err(CliError::invalid_request("Empty input"));
    }

    let value: Value = serde_json::from_str(&body)?;
    Ok(value)
}

/// Non-blank lines of `input`, each parsed as JSON.
pub fn read_requests<R: BufRead>(input: R) -> impl Iterator<Item = CliResult<Value>> {
    input
        .lines()
        .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
        .map(|line| {
            let line = line.map_err(CliError::from)?;
            serde_json::from_str(&line).map_err(CliError::from)
        })
}

/// Write a success response
pub fn write_response(out: &mut impl Write, data: Value) -> CliResult<()> {
    write_line(
        out,
        &json!({
            "status": "ok",
            "data": data
        }),
    )
}

/// Write an error response
pub fn write_error(out: &mut impl Write, code: &str, message: &str) -> CliResult<()> {
    write_line(
        out,
        &json!({
            "status": "error",
            "code": code,
            "message": message
        }),
    )
}

fn write_line(out: &mut impl Write, response: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *out, response)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
