//! Output formatting utilities for CLI.

use linewar::{MatchResult, Outcome, SimConfig, Snapshot};
use serde::Serialize;
use std::fmt::Write;

/// JSON document for a single match.
#[derive(Debug, Serialize)]
pub(super) struct JsonRun<'a> {
    #[serde(flatten)]
    pub(super) result: &'a MatchResult,
    /// Final board, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) board: Option<&'a Snapshot>,
}

/// Format a match result as human-readable text.
pub(super) fn format_text(result: &MatchResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Match Result (seed: {})", result.seed);
    let verdict = match result.outcome {
        Outcome::Victory => "victory",
        Outcome::Defeat => "defeat",
        Outcome::Ongoing => "undecided (tick limit)",
    };
    let _ = writeln!(output, "  Outcome: {verdict}");
    let _ = writeln!(output, "  Level: {}", result.level);
    let _ = writeln!(output, "  Ticks: {}\n", result.ticks);

    for total in &result.totals {
        let _ = writeln!(
            output,
            "  {:<8} {:>3} nodes {:>6} value",
            total.name, total.nodes, total.value
        );
    }

    output
}

/// Outcome counts over a batch of matches.
#[derive(Debug, Clone, Default, Serialize)]
pub(super) struct BatchStats {
    /// Matches completed.
    pub(super) games_played: u64,
    /// Matches the player won.
    pub(super) victories: u64,
    /// Matches the player lost.
    pub(super) defeats: u64,
    /// Matches stopped by the tick limit.
    pub(super) timeouts: u64,
    /// Matches that failed to start.
    pub(super) errors: u64,
    /// Ticks summed over decided matches.
    decided_ticks: u64,
    /// Shortest decided match.
    pub(super) fastest: Option<u64>,
    /// Longest decided match.
    pub(super) slowest: Option<u64>,
}

impl BatchStats {
    /// Record one match.
    pub(super) fn add_result(&mut self, result: &MatchResult) {
        self.games_played += 1;
        match result.outcome {
            Outcome::Victory => self.victories += 1,
            Outcome::Defeat => self.defeats += 1,
            Outcome::Ongoing => {
                self.timeouts += 1;
                return;
            }
        }
        self.decided_ticks += result.ticks;
        self.fastest = Some(self.fastest.map_or(result.ticks, |t| t.min(result.ticks)));
        self.slowest = Some(self.slowest.map_or(result.ticks, |t| t.max(result.ticks)));
    }

    /// Record a match that could not be set up.
    pub(super) const fn add_error(&mut self) {
        self.errors += 1;
    }

    /// Fold another thread's counts into this one.
    pub(super) fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.victories += other.victories;
        self.defeats += other.defeats;
        self.timeouts += other.timeouts;
        self.errors += other.errors;
        self.decided_ticks += other.decided_ticks;
        self.fastest = min_opt(self.fastest, other.fastest);
        self.slowest = max_opt(self.slowest, other.slowest);
    }

    /// Matches that reached a verdict.
    pub(super) const fn decided(&self) -> u64 {
        self.victories + self.defeats
    }

    /// Share of all completed matches the player won.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.victories as f64 / self.games_played as f64
        }
    }

    /// Mean length of decided matches in ticks.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn mean_ticks(&self) -> Option<f64> {
        let decided = self.decided();
        (decided > 0).then(|| self.decided_ticks as f64 / decided as f64)
    }
}

fn min_opt(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn max_opt(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

/// JSON document for a batch.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatch<'a> {
    pub(super) base_seed: u64,
    pub(super) level: u32,
    pub(super) max_ticks: u64,
    pub(super) autopilot: bool,
    #[serde(flatten)]
    pub(super) stats: &'a BatchStats,
    pub(super) win_rate: f64,
    pub(super) mean_ticks: Option<f64>,
}

/// Format batch statistics as human-readable text.
pub(super) fn format_batch_text(stats: &BatchStats) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Batch Results ({} matches)", stats.games_played);
    let _ = writeln!(output, "═══════════════════════════════════════");
    let _ = writeln!(
        output,
        "  Victories: {:>6} ({:.1}%)",
        stats.victories,
        stats.win_rate() * 100.0
    );
    let _ = writeln!(output, "  Defeats:   {:>6}", stats.defeats);
    let _ = writeln!(output, "  Timeouts:  {:>6}", stats.timeouts);
    if stats.errors > 0 {
        let _ = writeln!(output, "  Errors:    {:>6}", stats.errors);
    }
    if let Some(mean) = stats.mean_ticks() {
        let _ = writeln!(
            output,
            "  Decided in {mean:.0} ticks on average ({}..={})",
            stats.fastest.unwrap_or_default(),
            stats.slowest.unwrap_or_default()
        );
    }

    output
}

/// Format batch statistics as CSV.
pub(super) fn format_batch_csv(stats: &BatchStats) -> String {
    let mut output = String::from("games,victories,defeats,timeouts,errors,win_rate,mean_ticks\n");
    let _ = writeln!(
        output,
        "{},{},{},{},{},{:.4},{}",
        stats.games_played,
        stats.victories,
        stats.defeats,
        stats.timeouts,
        stats.errors,
        stats.win_rate(),
        stats.mean_ticks().map(|m| format!("{m:.1}")).unwrap_or_default()
    );
    output
}

/// Pretty JSON for a configuration.
pub(super) fn format_config(config: &SimConfig) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use linewar::headless::FactionTotal;

    fn result(outcome: Outcome, ticks: u64) -> MatchResult {
        MatchResult {
            seed: 1,
            outcome,
            ticks,
            level: 0,
            totals: vec![FactionTotal {
                name: "blue".to_string(),
                nodes: 4,
                value: 40,
            }],
        }
    }

    #[test]
    fn test_stats_merge() {
        let mut a = BatchStats::default();
        a.add_result(&result(Outcome::Victory, 100));
        a.add_result(&result(Outcome::Ongoing, 500));

        let mut b = BatchStats::default();
        b.add_result(&result(Outcome::Defeat, 300));
        b.add_error();

        a.merge(&b);
        assert_eq!(a.games_played, 3);
        assert_eq!(a.decided(), 2);
        assert_eq!(a.timeouts, 1);
        assert_eq!(a.errors, 1);
        assert_eq!(a.fastest, Some(100));
        assert_eq!(a.slowest, Some(300));
        assert!(a.mean_ticks().is_some_and(|m| (m - 200.0).abs() < 1e-9));
    }

    #[test]
    fn test_csv_header_and_row() {
        let mut stats = BatchStats::default();
        stats.add_result(&result(Outcome::Victory, 60));
        let csv = format_batch_csv(&stats);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("1,1,0,0,0,1.0000,60.0"));
    }

    #[test]
    fn test_text_lists_factions() {
        let text = format_text(&result(Outcome::Defeat, 42));
        assert!(text.contains("Outcome: defeat"));
        assert!(text.contains("blue"));
    }
}
