//! Command implementations

pub mod completions;
pub mod exists;
pub mod implementations;
pub mod interface;
pub mod interfaces;
pub mod latest;
pub mod type_instance;

use anyhow::{Context, Result};
use serde::Serialize;

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
