//! Batch command implementation.

use super::output::{BatchStats, JsonBatch, format_batch_csv, format_batch_text};
use super::{BatchFormat, CliError, MatchArgs};
use indicatif::{ProgressBar, ProgressStyle};
use linewar::{SimConfig, run_match};
use rayon::prelude::*;
use std::time::Instant;

/// Execute the batch command.
///
/// # Errors
///
/// Returns an error if the configuration is unusable or output fails.
pub(crate) fn execute(
    config: &SimConfig,
    args: MatchArgs,
    games: u64,
    threads: Option<usize>,
    format: BatchFormat,
    progress: bool,
) -> Result<(), CliError> {
    config.validate()?;

    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = args.seed_or_clock();

    let pb = if progress {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} matches ({per_sec})")
            .map_err(|e| CliError::new(format!("Bad progress template: {e}")))?
            .progress_chars("=>-");
        let pb = ProgressBar::new(games);
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each thread folds into its own stats; merged once at the end
    let stats = (0..games)
        .into_par_iter()
        .fold(BatchStats::default, |mut local, i| {
            let options = args.options(base_seed.wrapping_add(i));
            match run_match(config, &options) {
                Ok(result) => local.add_result(&result),
                Err(e) => {
                    tracing::warn!(seed = options.seed, error = %e, "match failed to start");
                    local.add_error();
                }
            }
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local
        })
        .reduce(BatchStats::default, |mut a, b| {
            a.merge(&b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    #[allow(clippy::cast_precision_loss)]
    let per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        BatchFormat::Text => {
            println!();
            print!("{}", format_batch_text(&stats));
            println!();
            println!("Duration: {:.2}s ({per_sec:.1} matches/sec)", duration.as_secs_f64());
        }
        BatchFormat::Json => {
            let doc = JsonBatch {
                base_seed,
                level: args.level,
                max_ticks: args.max_ticks,
                autopilot: args.autopilot,
                stats: &stats,
                win_rate: stats.win_rate(),
                mean_ticks: stats.mean_ticks(),
            };
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        BatchFormat::Csv => print!("{}", format_batch_csv(&stats)),
    }

    Ok(())
}
