//! Line writers for the output channel.
//!
//! # Important
//!
//! - **stdout**: exactly one JSON line per invocation
//! - **stderr**: logs and diagnostics (never parsed by the supervisor)
//! - **Never use `println!`**: it may add `\r\n` on Windows

use std::io::Write;

use crate::codec::JsonCodec;
use crate::error::Result;

/// Write a line followed by a single `\n` and flush.
///
/// # Errors
///
/// Returns IO error if write or flush fails.
pub fn write_line<W: Write>(out: &mut W, line: &str) -> std::io::Result<()> {
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()
}

/// Serialize a value as one compact JSON line and write it.
///
/// The value is fully encoded before anything is written, so a failure
/// leaves the output untouched.
///
/// # Errors
///
/// Returns error if serialization or write fails.
pub fn write_json_line<W: Write, T: serde::Serialize>(out: &mut W, value: &T) -> Result<()> {
    let line = JsonCodec::encode_line(value)?;
    write_line(out, &line)?;
    Ok(())
}
