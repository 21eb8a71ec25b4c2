use anyhow::{Context, Result};
use std::io::{self, Read};

/// Read all of stdin into a string.
///
/// An empty payload is returned as-is; the parsers report it as
/// [`anchorage_core::InputError::Empty`].
pub fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin()
        .lock()
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;
    Ok(buf)
}
