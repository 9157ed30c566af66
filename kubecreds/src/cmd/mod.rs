//! Subcommand implementations.

use std::io;

use kubecreds_common::prelude::*;

pub mod cluster;
pub mod convert;
pub mod types;

/// Write `credentials` to standard output as pretty-printed JSON. Secret
/// values are always redacted.
pub fn print_credentials(credentials: &[Credential]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, credentials)
        .context("could not write credentials")?;
    writeln!(out)?;
    Ok(())
}
