//! Game state management and the per-tick pipeline.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SimConfig;
use crate::error::LayoutError;
use crate::game::{
    Arena, Board, Deal, Economy, EconomyReport, FactionId, LaunchParams, Roster, advance_projectiles,
    annihilate, assert_invariants, classic_board, deal, launch, prune_paths, scatter,
};

/// Terminal state of a board as seen by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The player still holds nodes and so does someone else.
    Ongoing,
    /// The player holds no alive node.
    Defeat,
    /// Every alive node belongs to the player.
    Victory,
}

impl Outcome {
    /// Evaluate `board` from the point of view of `player`.
    ///
    /// A board with no alive node is still ongoing, since empty nodes regrow.
    #[must_use]
    pub fn of(board: &Board, player: FactionId) -> Self {
        let mut alive = 0usize;
        let mut held = 0usize;
        for (_, node) in board.alive() {
            alive += 1;
            if node.owner == player {
                held += 1;
            }
        }
        if alive == 0 {
            Self::Ongoing
        } else if held == 0 {
            Self::Defeat
        } else if held == alive {
            Self::Victory
        } else {
            Self::Ongoing
        }
    }

    /// Whether the outcome ends the level.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ongoing => write!(f, "ongoing"),
            Self::Defeat => write!(f, "defeat"),
            Self::Victory => write!(f, "victory"),
        }
    }
}

/// What one tick did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Projectiles that reached their destination.
    pub arrivals: usize,
    /// Paths dropped by pruning.
    pub pruned: usize,
    /// Projectiles launched.
    pub launched: usize,
    /// Hostile pairs cancelled.
    pub annihilated: usize,
    /// Economy totals, if the economy ran this tick.
    pub economy: Option<EconomyReport>,
    /// Board outcome after the tick.
    pub outcome: Outcome,
}

/// Complete board state plus the timers that drive it.
#[derive(Debug, Clone)]
pub struct GameState {
    roster: Roster,
    board: Board,
    arena: Arena,
    launch: LaunchParams,
    economy: Economy,
    annihilation_proximity: f64,
    annihilation_interval: u64,
    tick: u64,
    level: u32,
}

impl GameState {
    /// Create a game state around an existing board at `now_ms`.
    #[must_use]
    pub fn new(roster: Roster, board: Board, config: &SimConfig, now_ms: u64) -> Self {
        let economy = Economy::new(config.economy(), board.nodes().len(), now_ms);
        Self {
            roster,
            board,
            arena: config.arena(),
            launch: config.launch(),
            economy,
            annihilation_proximity: config.annihilation_proximity,
            annihilation_interval: config.annihilation_interval.max(1),
            tick: 0,
            level: 0,
        }
    }

    /// Create the classic opening with the classic roster.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] if the neutral nodes cannot be placed.
    pub fn classic<R: Rng + ?Sized>(
        config: &SimConfig,
        rng: &mut R,
        now_ms: u64,
    ) -> Result<Self, LayoutError> {
        let roster = Roster::classic();
        let board = classic_board(&roster, &config.arena(), rng)?;
        Ok(Self::new(roster, board, config, now_ms))
    }

    /// The faction roster.
    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The board, mutably.
    pub const fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// The board together with the roster, for callers that mutate one while
    /// reading the other.
    pub(crate) const fn board_and_roster(&mut self) -> (&mut Board, &Roster) {
        (&mut self.board, &self.roster)
    }

    /// Arena geometry.
    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Ticks advanced so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Current level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Economy timers.
    #[must_use]
    pub const fn economy(&self) -> &Economy {
        &self.economy
    }

    /// Board outcome right now.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        Outcome::of(&self.board, self.roster.player())
    }

    /// Advance the board by one tick.
    ///
    /// Stages run in a fixed order: projectile motion and capture, path
    /// pruning, launching at the current tick, the tick increment followed by
    /// annihilation on interval ticks, the real-time economy, and finally
    /// outcome evaluation.
    pub fn advance<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) -> TickReport {
        let arrivals = advance_projectiles(&mut self.board);

        let pruned = prune_paths(&mut self.board);
        assert_invariants(&self.board);

        let launched = launch(&mut self.board, self.tick, &self.launch);
        self.tick += 1;

        let annihilated = if self.tick % self.annihilation_interval == 0 {
            annihilate(&mut self.board, self.annihilation_proximity)
        } else {
            0
        };

        let economy = self.economy.tick(
            &mut self.board,
            self.roster.primary_ai(),
            self.level / 10,
            now_ms,
            rng,
        );
        if let Some(report) = economy {
            debug!(
                tick = self.tick,
                steps = report.steps,
                jackpots = report.jackpots,
                "economy"
            );
        }

        TickReport {
            arrivals,
            pruned,
            launched,
            annihilated,
            economy,
            outcome: self.outcome(),
        }
    }

    /// Replay `level` on the current positions.
    pub fn replay(&mut self, level: u32) {
        self.level = level;
        deal(&mut self.board, &self.roster, Deal::Replay, level);
        info!(level, "level reset");
    }

    /// Re-deal positions and values for a harder `level`.
    ///
    /// On error the board and level are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] if the new positions cannot be placed.
    pub fn advance_level<R: Rng + ?Sized>(
        &mut self,
        level: u32,
        rng: &mut R,
    ) -> Result<(), LayoutError> {
        scatter(&mut self.board, &self.arena, rng)?;
        self.level = level;
        deal(&mut self.board, &self.roster, Deal::Advance, level);
        info!(level, "advanced to level");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Node, NodeId, Point, Seat};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn roster() -> Roster {
        Roster::classic()
    }

    fn state(nodes: Vec<Node>) -> GameState {
        GameState::new(roster(), Board::new(nodes).unwrap(), &SimConfig::default(), 0)
    }

    fn node(x: f64, owner: FactionId, value: u32) -> Node {
        Node::new(Point::new(x, 300.0), owner, value, 30.0, Seat::Neutral)
    }

    #[test]
    fn test_outcome_rules() {
        let r = roster();
        let (blue, yellow) = (r.player(), r.primary_ai());

        let board = Board::new(vec![node(0.0, blue, 3), node(100.0, yellow, 0)]).unwrap();
        assert_eq!(Outcome::of(&board, blue), Outcome::Victory);

        let board = Board::new(vec![node(0.0, blue, 0), node(100.0, yellow, 4)]).unwrap();
        assert_eq!(Outcome::of(&board, blue), Outcome::Defeat);

        let board = Board::new(vec![node(0.0, blue, 2), node(100.0, yellow, 4)]).unwrap();
        assert_eq!(Outcome::of(&board, blue), Outcome::Ongoing);

        let board = Board::new(vec![node(0.0, blue, 0), node(100.0, yellow, 0)]).unwrap();
        assert_eq!(Outcome::of(&board, blue), Outcome::Ongoing);

        let board = Board::new(Vec::new()).unwrap();
        assert_eq!(Outcome::of(&board, blue), Outcome::Ongoing);
    }

    #[test]
    fn test_first_launch_after_cooldown() {
        let r = roster();
        let mut s = state(vec![node(0.0, r.player(), 10), node(600.0, r.primary_ai(), 10)]);
        s.board_mut()
            .create_path(NodeId::new(0), NodeId::new(1), r.player())
            .unwrap();
        let mut rng = SmallRng::seed_from_u64(0);

        // Value 10 waits 33 ticks counted from tick 0
        for _ in 0..33 {
            assert_eq!(s.advance(0, &mut rng).launched, 0);
        }
        assert_eq!(s.advance(0, &mut rng).launched, 1);
        assert_eq!(s.board().projectiles().len(), 1);
        assert_eq!(s.tick(), 34);
    }

    #[test]
    fn test_projectile_travels_and_weakens() {
        let r = roster();
        let mut s = state(vec![node(0.0, r.player(), 10), node(100.0, r.primary_ai(), 10)]);
        s.board_mut()
            .create_path(NodeId::new(0), NodeId::new(1), r.player())
            .unwrap();
        let mut rng = SmallRng::seed_from_u64(0);

        // Launch at tick 33, then 70 units to cover before the radius is reached
        for _ in 0..34 {
            s.advance(0, &mut rng);
        }
        s.board_mut().remove_path(NodeId::new(0), NodeId::new(1));
        for _ in 0..70 {
            s.advance(0, &mut rng);
        }
        assert!(s.board().projectiles().is_empty());
        assert_eq!(s.board().nodes()[1].value, 9);
        assert_eq!(s.board().nodes()[0].value, 9);
    }

    #[test]
    fn test_annihilation_only_on_interval() {
        let r = roster();
        let mut s = state(vec![node(0.0, r.player(), 1), node(1000.0, r.primary_ai(), 1)]);
        let mut rng = SmallRng::seed_from_u64(0);
        for owner in [r.player(), r.primary_ai()] {
            s.board_mut().projectiles.push(crate::game::Projectile {
                position: Point::new(500.0, 0.0),
                velocity: Point::new(0.0, 0.0),
                destination: NodeId::new(0),
                owner,
            });
        }

        for _ in 0..9 {
            s.advance(0, &mut rng);
        }
        assert_eq!(s.board().projectiles().len(), 2);
        assert_eq!(s.advance(0, &mut rng).annihilated, 1);
        assert!(s.board().projectiles().is_empty());
    }

    #[test]
    fn test_replay_and_advance_level() {
        let config = SimConfig::default();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut s = GameState::classic(&config, &mut rng, 0).unwrap();
        let before: Vec<_> = s.board().nodes().iter().map(|n| n.position).collect();

        s.replay(5);
        let after: Vec<_> = s.board().nodes().iter().map(|n| n.position).collect();
        assert_eq!(before, after);
        assert_eq!(s.board().nodes()[4].value, 4);

        s.advance_level(6, &mut rng).unwrap();
        assert_eq!(s.level(), 6);
        assert_eq!(s.board().nodes()[4].value, 16);
        assert_eq!(s.board().nodes()[0].value, 10);
    }
}
