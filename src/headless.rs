//! Headless matches on a virtual clock.
//!
//! A match runs the classic board at a fixed 60 Hz frame rate without any
//! real waiting. With autopilot on, the player faction is driven by the same
//! decision engine as the autonomous factions, with the primary AI as its
//! rival; otherwise the player just sits on its starting nodes.

use serde::Serialize;

use crate::config::SimConfig;
use crate::error::MatchError;
use crate::game::Outcome;
use crate::simulation::Simulation;
use crate::snapshot::Snapshot;

/// Frames per simulated second.
pub const FRAME_RATE: u64 = 60;

/// Default tick limit: ten simulated minutes.
pub const DEFAULT_MAX_TICKS: u64 = 10 * 60 * FRAME_RATE;

/// Real time at the start of tick `tick`, rounded to whole milliseconds.
#[must_use]
pub const fn virtual_time_ms(tick: u64) -> u64 {
    (tick * 1000 + FRAME_RATE / 2) / FRAME_RATE
}

/// How to run one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Seed for layout and economy.
    pub seed: u64,
    /// Give up after this many ticks.
    pub max_ticks: u64,
    /// Drive the player with the decision engine.
    pub autopilot: bool,
    /// Level to replay the classic board at.
    pub level: u32,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            max_ticks: DEFAULT_MAX_TICKS,
            autopilot: true,
            level: 0,
        }
    }
}

/// A faction's holdings at the end of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactionTotal {
    /// Faction name.
    pub name: String,
    /// Alive nodes held.
    pub nodes: usize,
    /// Sum of held node values.
    pub value: u64,
}

/// Result of one headless match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Seed the match ran with.
    pub seed: u64,
    /// Final outcome; `Ongoing` means the tick limit was reached.
    pub outcome: Outcome,
    /// Ticks simulated.
    pub ticks: u64,
    /// Level played.
    pub level: u32,
    /// Holdings of every faction that still holds something.
    pub totals: Vec<FactionTotal>,
}

impl MatchResult {
    /// Whether the match hit the tick limit without a decision.
    #[must_use]
    pub const fn timed_out(&self) -> bool {
        !self.outcome.is_terminal()
    }
}

/// Play one match to a terminal outcome or the tick limit.
///
/// # Errors
///
/// Returns [`MatchError`] if the configuration is invalid or the board cannot
/// be laid out.
pub fn run_match(config: &SimConfig, options: &MatchOptions) -> Result<MatchResult, MatchError> {
    play(config, options).map(|(result, _)| result)
}

/// Like [`run_match`], also returning the final board.
///
/// # Errors
///
/// Same as [`run_match`].
pub fn run_match_with_snapshot(
    config: &SimConfig,
    options: &MatchOptions,
) -> Result<(MatchResult, Snapshot), MatchError> {
    play(config, options)
}

fn play(config: &SimConfig, options: &MatchOptions) -> Result<(MatchResult, Snapshot), MatchError> {
    let mut sim = Simulation::with_seed(config.clone(), options.seed, 0)?;
    if options.level > 0 {
        sim.reset(options.level);
    }
    sim.set_autopilot(options.autopilot);

    let mut outcome = Outcome::Ongoing;
    while sim.tick() < options.max_ticks {
        outcome = sim.step(virtual_time_ms(sim.tick()));
        if outcome.is_terminal() {
            break;
        }
    }
    tracing::debug!(seed = options.seed, %outcome, ticks = sim.tick(), "match finished");

    let result = MatchResult {
        seed: options.seed,
        outcome,
        ticks: sim.tick(),
        level: sim.level(),
        totals: totals(&sim),
    };
    Ok((result, sim.snapshot()))
}

fn totals(sim: &Simulation) -> Vec<FactionTotal> {
    let board = sim.board();
    sim.roster()
        .iter()
        .map(|f| FactionTotal {
            name: f.name.clone(),
            nodes: board.count_held(f.id),
            value: board.total_value(f.id),
        })
        .filter(|t| t.nodes > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_clock() {
        assert_eq!(virtual_time_ms(0), 0);
        assert_eq!(virtual_time_ms(1), 17);
        assert_eq!(virtual_time_ms(2), 33);
        assert_eq!(virtual_time_ms(60), 1000);
    }

    #[test]
    fn test_short_match_times_out() {
        let options = MatchOptions {
            seed: 4,
            max_ticks: 30,
            ..MatchOptions::default()
        };
        let result = run_match(&SimConfig::default(), &options).unwrap();
        assert!(result.timed_out());
        assert_eq!(result.ticks, 30);
        assert!(result.totals.iter().any(|t| t.name == "blue"));
    }

    #[test]
    fn test_same_seed_same_result() {
        let options = MatchOptions {
            seed: 11,
            max_ticks: 3_000,
            ..MatchOptions::default()
        };
        let a = run_match(&SimConfig::default(), &options).unwrap();
        let b = run_match(&SimConfig::default(), &options).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_level_applied() {
        let options = MatchOptions {
            seed: 2,
            max_ticks: 1,
            level: 10,
            autopilot: false,
        };
        let result = run_match(&SimConfig::default(), &options).unwrap();
        assert_eq!(result.level, 10);
        let yellow = result.totals.iter().find(|t| t.name == "yellow").unwrap();
        assert_eq!(yellow.value, 4 * 5);
    }

    #[test]
    fn test_snapshot_matches_result() {
        let options = MatchOptions {
            seed: 5,
            max_ticks: 120,
            ..MatchOptions::default()
        };
        let (result, snapshot) = run_match_with_snapshot(&SimConfig::default(), &options).unwrap();
        assert_eq!(snapshot.tick, result.ticks);
        assert_eq!(snapshot.nodes.len(), 17);
        let blue = result.totals.iter().find(|t| t.name == "blue").unwrap();
        let drawn: u64 = snapshot
            .nodes
            .iter()
            .filter(|n| n.owner == "blue")
            .map(|n| u64::from(n.value))
            .sum();
        assert_eq!(blue.value, drawn);
    }
}
