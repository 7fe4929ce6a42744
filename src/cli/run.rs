//! Run command implementation.

use super::output::{JsonRun, format_text};
use super::{CliError, MatchArgs, OutputFormat};
use linewar::SimConfig;
use linewar::headless::run_match_with_snapshot;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the match cannot be set up or output fails.
pub(crate) fn execute(
    config: &SimConfig,
    args: MatchArgs,
    format: OutputFormat,
    include_board: bool,
) -> Result<(), CliError> {
    let seed = args.seed_or_clock();
    let (result, snapshot) = run_match_with_snapshot(config, &args.options(seed))?;

    match format {
        OutputFormat::Text => print!("{}", format_text(&result)),
        OutputFormat::Json => {
            let doc = JsonRun {
                result: &result,
                board: include_board.then_some(&snapshot),
            };
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }

    Ok(())
}
