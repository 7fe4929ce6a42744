//! Config command implementation.

use super::CliError;
use super::output::format_config;
use linewar::SimConfig;

/// Print the effective configuration.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub(crate) fn execute(config: &SimConfig) -> Result<(), CliError> {
    println!("{}", format_config(config)?);
    Ok(())
}
