//! CLI command handlers. Each one calls a service and writes the payload as
//! pretty JSON.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

pub mod auth;
pub mod dashboard;
pub mod telemetry;

/// Writes `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<W, T>(out: &mut W, value: &T) -> Result<()>
where
    W: Write,
    T: Serialize + ?Sized,
{
    serde_json::to_writer_pretty(&mut *out, value).context("Failed to serialize output")?;
    writeln!(out).context("Failed to write output")?;
    Ok(())
}
