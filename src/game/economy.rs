//! Economy: periodic probabilistic growth of node values.
//!
//! Once per real-time interval every alive node below the growth cap rolls
//! for growth. Nodes above half the cap grow slowly (30% chance of +1).
//! Smaller nodes get a 50% chance of +1 and, failing that, a chance at a +10
//! jackpot.
//!
//! # Jackpot
//!
//! Each node tracks the time of its last jackpot. For the first
//! `jackpot_grace_ms` after it the jackpot chance is the base value; after
//! that it rises by `jackpot_increment` per whole second, capped at 1.0. A
//! jackpot resets the node's timer.
//!
//! The decision logic is split into pure functions of the roll so it can be
//! tested without a generator.

use rand::Rng;
use tracing::trace;

use crate::game::{Board, FactionId};

/// Chance of +1 for a node above half the growth cap.
pub const UPPER_GROWTH_CHANCE: f64 = 0.3;

/// Chance of +1 for a node at or below half the growth cap.
pub const BASE_GROWTH_CHANCE: f64 = 0.5;

/// Value added by a jackpot.
pub const JACKPOT_BONUS: u32 = 10;

/// Economy tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EconomyParams {
    /// Milliseconds between economy steps.
    pub interval_ms: u64,
    /// Growth stops at this value.
    pub growth_cap: u32,
    /// Jackpot chance right after a jackpot.
    pub jackpot_base: f64,
    /// Milliseconds after a jackpot before the chance starts rising.
    pub jackpot_grace_ms: u64,
    /// Chance added per whole second past the grace period.
    pub jackpot_increment: f64,
}

/// Outcome of one node's growth roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    /// No change.
    None,
    /// Gained one.
    Step,
    /// Gained [`JACKPOT_BONUS`].
    Jackpot,
}

/// Jackpot chance `elapsed_ms` after a node's last jackpot.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn jackpot_probability(elapsed_ms: u64, params: &EconomyParams) -> f64 {
    if elapsed_ms < params.jackpot_grace_ms {
        return params.jackpot_base;
    }
    let seconds_over = (elapsed_ms - params.jackpot_grace_ms) / 1000;
    (params.jackpot_base + params.jackpot_increment * seconds_over as f64).min(1.0)
}

/// Decide growth for a node of `value` given a uniform `roll` in `[0, 1)`.
///
/// Below half the cap a single roll is split into bands: `[0, 0.5)` grows by
/// one, the next `0.5 * jackpot` hits the jackpot, anything else is nothing.
/// This is the same as a jackpot roll taken only when the +1 roll fails.
#[must_use]
pub fn growth_for_roll(value: u32, jackpot: f64, roll: f64, params: &EconomyParams) -> Growth {
    if value >= params.growth_cap {
        return Growth::None;
    }
    if value > params.growth_cap / 2 {
        return if roll < UPPER_GROWTH_CHANCE {
            Growth::Step
        } else {
            Growth::None
        };
    }
    if roll < BASE_GROWTH_CHANCE {
        Growth::Step
    } else if roll < BASE_GROWTH_CHANCE + (1.0 - BASE_GROWTH_CHANCE) * jackpot {
        Growth::Jackpot
    } else {
        Growth::None
    }
}

/// Per-node economy timers.
#[derive(Debug, Clone)]
pub struct Economy {
    params: EconomyParams,
    last_step_ms: Option<u64>,
    last_jackpot_ms: Vec<u64>,
}

/// Totals from one economy step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EconomyReport {
    /// Nodes that grew by one.
    pub steps: u32,
    /// Nodes that hit the jackpot.
    pub jackpots: u32,
}

impl Economy {
    /// Create economy state for a board of `node_count` nodes at `now_ms`.
    #[must_use]
    pub fn new(params: EconomyParams, node_count: usize, now_ms: u64) -> Self {
        Self {
            params,
            last_step_ms: None,
            last_jackpot_ms: vec![now_ms; node_count],
        }
    }

    /// Tuning in use.
    #[must_use]
    pub const fn params(&self) -> &EconomyParams {
        &self.params
    }

    /// Current jackpot chance of node `index` at `now_ms`.
    #[must_use]
    pub fn jackpot_chance(&self, index: usize, now_ms: u64) -> f64 {
        let last = self.last_jackpot_ms.get(index).copied().unwrap_or(now_ms);
        jackpot_probability(now_ms.saturating_sub(last), &self.params)
    }

    /// Run the economy if an interval has passed since the last run.
    ///
    /// The first call only arms the timer. Every node below the cap rolls,
    /// empty ones included. `ai` nodes that are alive also get
    /// `level_bonus` on top of their roll, never past the growth cap.
    /// Returns `None` when the interval has not elapsed.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        board: &mut Board,
        ai: FactionId,
        level_bonus: u32,
        now_ms: u64,
        rng: &mut R,
    ) -> Option<EconomyReport> {
        let Some(last) = self.last_step_ms else {
            self.last_step_ms = Some(now_ms);
            return None;
        };
        if now_ms.saturating_sub(last) < self.params.interval_ms {
            return None;
        }
        self.last_step_ms = Some(now_ms);

        let cap = self.params.growth_cap;
        let mut report = EconomyReport::default();

        for (index, node) in board.nodes_mut().iter_mut().enumerate() {
            if node.is_alive() && node.owner == ai && node.value < cap {
                node.value = node.value.saturating_add(level_bonus).min(cap);
            }

            let jackpot = self.jackpot_chance(index, now_ms);
            match growth_for_roll(node.value, jackpot, rng.r#gen::<f64>(), &self.params) {
                Growth::None => {}
                Growth::Step => {
                    node.value += 1;
                    report.steps += 1;
                }
                Growth::Jackpot => {
                    node.value += JACKPOT_BONUS;
                    report.jackpots += 1;
                    if let Some(t) = self.last_jackpot_ms.get_mut(index) {
                        *t = now_ms;
                    }
                    trace!(node = index, value = node.value, "jackpot");
                }
            }
        }

        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Node, Point, Seat};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    const BLUE: FactionId = FactionId::new(0);
    const YELLOW: FactionId = FactionId::new(1);

    fn params() -> EconomyParams {
        EconomyParams {
            interval_ms: 1000,
            growth_cap: 100,
            jackpot_base: 0.0063,
            jackpot_grace_ms: 10_000,
            jackpot_increment: 0.005,
        }
    }

    #[test]
    fn test_jackpot_probability_grows_after_grace() {
        let p = params();
        assert!((jackpot_probability(0, &p) - 0.0063).abs() < 1e-12);
        assert!((jackpot_probability(9_999, &p) - 0.0063).abs() < 1e-12);
        assert!((jackpot_probability(10_999, &p) - 0.0063).abs() < 1e-12);
        assert!((jackpot_probability(12_000, &p) - 0.0163).abs() < 1e-12);
        assert!((jackpot_probability(10_000_000, &p) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_growth_bands_low_value() {
        let p = params();
        assert_eq!(growth_for_roll(10, 0.1, 0.0, &p), Growth::Step);
        assert_eq!(growth_for_roll(10, 0.1, 0.49, &p), Growth::Step);
        assert_eq!(growth_for_roll(10, 0.1, 0.54, &p), Growth::Jackpot);
        assert_eq!(growth_for_roll(10, 0.1, 0.56, &p), Growth::None);
        // A certain jackpot covers every roll the +1 misses
        assert_eq!(growth_for_roll(10, 1.0, 0.99, &p), Growth::Jackpot);
    }

    #[test]
    fn test_growth_upper_half_never_jackpots() {
        let p = params();
        assert_eq!(growth_for_roll(51, 1.0, 0.29, &p), Growth::Step);
        assert_eq!(growth_for_roll(51, 1.0, 0.3, &p), Growth::None);
        assert_eq!(growth_for_roll(51, 1.0, 0.6, &p), Growth::None);
    }

    #[test]
    fn test_growth_stops_at_cap() {
        let p = params();
        assert_eq!(growth_for_roll(100, 1.0, 0.0, &p), Growth::None);
        assert_eq!(growth_for_roll(150, 1.0, 0.0, &p), Growth::None);
    }

    #[test]
    fn test_first_tick_only_arms() {
        let mut board = Board::new(vec![Node::new(Point::default(), BLUE, 10, 30.0, Seat::Player)]).unwrap();
        let mut economy = Economy::new(params(), 1, 0);
        let mut rng = SmallRng::seed_from_u64(1);

        assert!(economy.tick(&mut board, YELLOW, 0, 5_000, &mut rng).is_none());
        assert!(economy.tick(&mut board, YELLOW, 0, 5_999, &mut rng).is_none());
        assert!(economy.tick(&mut board, YELLOW, 0, 6_000, &mut rng).is_some());
    }

    #[test]
    fn test_tick_regrows_empty_and_skips_capped() {
        let mut board = Board::new(vec![
            Node::new(Point::default(), BLUE, 0, 30.0, Seat::Player),
            Node::new(Point::default(), BLUE, 100, 30.0, Seat::Player),
        ])
        .unwrap();
        let mut economy = Economy::new(params(), 2, 0);
        let mut rng = SmallRng::seed_from_u64(7);

        economy.tick(&mut board, YELLOW, 0, 0, &mut rng);
        for t in 1..50 {
            economy.tick(&mut board, YELLOW, 0, t * 1000, &mut rng);
        }
        // An empty node regrows under its last owner
        assert!(board.nodes()[0].value > 0);
        assert_eq!(board.nodes()[0].owner, BLUE);
        assert_eq!(board.nodes()[1].value, 100);
    }

    #[test]
    fn test_empty_ai_node_gets_no_level_bonus() {
        let mut board = Board::new(vec![Node::new(Point::default(), YELLOW, 0, 30.0, Seat::Ai)])
            .unwrap();
        let mut economy = Economy::new(params(), 1, 0);
        let mut rng = SmallRng::seed_from_u64(11);

        economy.tick(&mut board, YELLOW, 5, 0, &mut rng);
        economy.tick(&mut board, YELLOW, 5, 1000, &mut rng);

        // One roll at most, never the bonus
        assert!(board.nodes()[0].value <= JACKPOT_BONUS);
        assert_ne!(board.nodes()[0].value, 5);
    }

    #[test]
    fn test_jackpot_resets_timer_to_base() {
        let mut board = Board::new(vec![Node::new(Point::default(), BLUE, 1, 30.0, Seat::Player)])
            .unwrap();
        let mut economy = Economy::new(params(), 1, 0);
        let mut rng = SmallRng::seed_from_u64(5);

        let mut now = 1_000_000;
        economy.tick(&mut board, YELLOW, 0, now, &mut rng);
        // Long past the grace period the chance saturates
        assert!((economy.jackpot_chance(0, now) - 1.0).abs() < 1e-12);

        let mut jackpots = 0;
        for _ in 0..40 {
            now += 1000;
            let report = economy.tick(&mut board, YELLOW, 0, now, &mut rng).unwrap();
            jackpots += report.jackpots;
            if jackpots > 0 {
                break;
            }
        }
        assert_eq!(jackpots, 1);

        let base = params().jackpot_base;
        assert!((economy.jackpot_chance(0, now) - base).abs() < 1e-12);
        assert!((economy.jackpot_chance(0, now + 5_000) - base).abs() < 1e-12);
        assert!(economy.jackpot_chance(0, now + 20_000) > base);
    }

    #[test]
    fn test_level_bonus_for_ai_only() {
        let mut board = Board::new(vec![
            Node::new(Point::default(), YELLOW, 60, 30.0, Seat::Ai),
            Node::new(Point::default(), BLUE, 60, 30.0, Seat::Player),
            Node::new(Point::default(), YELLOW, 98, 30.0, Seat::Ai),
        ])
        .unwrap();
        let mut economy = Economy::new(params(), 3, 0);
        let mut rng = SmallRng::seed_from_u64(3);

        economy.tick(&mut board, YELLOW, 5, 0, &mut rng);
        economy.tick(&mut board, YELLOW, 5, 1000, &mut rng);

        // Upper-half growth adds at most one on top of the bonus
        assert!((65..=66).contains(&board.nodes()[0].value));
        assert!((60..=61).contains(&board.nodes()[1].value));
        // Bonus is clamped at the cap and capped nodes do not roll
        assert_eq!(board.nodes()[2].value, 100);
    }

    #[test]
    fn test_values_never_exceed_cap() {
        let mut board = Board::new(
            (0..20)
                .map(|i| Node::new(Point::default(), YELLOW, i * 5 + 1, 30.0, Seat::Ai))
                .collect(),
        )
        .unwrap();
        let mut economy = Economy::new(params(), 20, 0);
        let mut rng = SmallRng::seed_from_u64(11);

        economy.tick(&mut board, YELLOW, 3, 0, &mut rng);
        for t in 1..500 {
            economy.tick(&mut board, YELLOW, 3, t * 1000, &mut rng);
        }
        assert!(board.nodes().iter().all(|n| n.value <= 100));
    }
}
