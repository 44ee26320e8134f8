//! Output formatting for command results.

#![deny(clippy::all, clippy::pedantic)]

use serde::Serialize;

use crate::client::CliError;

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered =
        serde_json::to_string_pretty(value).map_err(|err| CliError::Render(err.to_string()))?;
    println!("{rendered}");
    Ok(())
}
