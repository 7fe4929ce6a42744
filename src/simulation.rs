//! The simulation facade consumed by an input or presentation layer.
//!
//! [`Simulation`] owns the game state, the decision-engine timers and the
//! random source. Each [`Simulation::step`] runs the due AI activations and
//! then one tick of the board pipeline. Once a step reports a terminal
//! outcome the simulation stays latched on it until [`Simulation::reset`] or
//! [`Simulation::advance_level`] is called.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info};

use crate::ai::{AiParams, Scheduler};
use crate::config::SimConfig;
use crate::error::{BoardError, LayoutError, MatchError};
use crate::game::{Board, FactionId, GameState, NodeId, Outcome, Roster};
use crate::snapshot::Snapshot;

/// A running session: board, AI and outcome latch.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    state: GameState,
    scheduler: Scheduler,
    ai: AiParams,
    rng: SmallRng,
    ai_enabled: bool,
    autopilot: bool,
    outcome: Outcome,
}

impl Simulation {
    /// Start a classic session seeded from system entropy.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] if the configuration is invalid or the board
    /// cannot be laid out.
    pub fn new(config: SimConfig, now_ms: u64) -> Result<Self, MatchError> {
        Self::with_rng(config, SmallRng::from_entropy(), now_ms)
    }

    /// Start a classic session with a fixed seed.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] if the configuration is invalid or the board
    /// cannot be laid out.
    pub fn with_seed(config: SimConfig, seed: u64, now_ms: u64) -> Result<Self, MatchError> {
        Self::with_rng(config, SmallRng::seed_from_u64(seed), now_ms)
    }

    /// Start a classic session with the given random source.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] if the configuration is invalid or the board
    /// cannot be laid out.
    pub fn with_rng(config: SimConfig, mut rng: SmallRng, now_ms: u64) -> Result<Self, MatchError> {
        config.validate()?;
        let state = GameState::classic(&config, &mut rng, now_ms)?;
        Ok(Self::assemble(config, state, rng, now_ms))
    }

    /// Start a session on a caller-built board.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Config`] if the configuration is invalid.
    pub fn from_board(
        config: SimConfig,
        roster: Roster,
        board: Board,
        seed: u64,
        now_ms: u64,
    ) -> Result<Self, MatchError> {
        config.validate()?;
        let state = GameState::new(roster, board, &config, now_ms);
        Ok(Self::assemble(config, state, SmallRng::seed_from_u64(seed), now_ms))
    }

    fn assemble(config: SimConfig, state: GameState, rng: SmallRng, now_ms: u64) -> Self {
        let scheduler = Scheduler::new(state.roster(), &config, now_ms);
        let ai = config.ai();
        Self {
            config,
            state,
            scheduler,
            ai,
            rng,
            ai_enabled: true,
            autopilot: false,
            outcome: Outcome::Ongoing,
        }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Game state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// The board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        self.state.board()
    }

    /// The board, mutably, for input-layer gestures.
    pub const fn board_mut(&mut self) -> &mut Board {
        self.state.board_mut()
    }

    /// The faction roster.
    #[must_use]
    pub const fn roster(&self) -> &Roster {
        self.state.roster()
    }

    /// Decision-engine timers.
    #[must_use]
    pub const fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Ticks advanced so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.state.tick()
    }

    /// Current level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.state.level()
    }

    /// Latched outcome: `Ongoing` until a step ends the level.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Whether autonomous factions act.
    #[must_use]
    pub const fn ai_enabled(&self) -> bool {
        self.ai_enabled
    }

    /// Switch autonomous factions on or off.
    pub fn set_ai_enabled(&mut self, enabled: bool) {
        if self.ai_enabled != enabled {
            info!(enabled, "AI toggled");
        }
        self.ai_enabled = enabled;
    }

    /// Whether the player faction is driven by the decision engine.
    #[must_use]
    pub const fn autopilot(&self) -> bool {
        self.autopilot
    }

    /// Let the decision engine play for the player, against the primary AI.
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    /// Create a path unless one with the same endpoints exists.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] for a handle not on the board or a self loop.
    pub fn create_path(
        &mut self,
        source: NodeId,
        destination: NodeId,
        owner: FactionId,
    ) -> Result<bool, BoardError> {
        self.state.board_mut().create_path(source, destination, owner)
    }

    /// Remove the path from `source` to `destination`, if present.
    pub fn remove_path(&mut self, source: NodeId, destination: NodeId) -> bool {
        self.state.board_mut().remove_path(source, destination)
    }

    /// Advance one frame at real time `now_ms`.
    ///
    /// While an outcome is latched nothing moves and the outcome is returned.
    pub fn step(&mut self, now_ms: u64) -> Outcome {
        if self.outcome.is_terminal() {
            return self.outcome;
        }

        let (board, roster) = self.state.board_and_roster();
        if self.autopilot {
            let (player, rival) = (roster.player(), roster.primary_ai());
            self.scheduler.drive(board, player, rival, &self.ai, now_ms);
        }
        if self.ai_enabled {
            let acted = self.scheduler.run(board, roster, &self.ai, now_ms);
            if !acted.is_empty() {
                debug!(now_ms, factions = acted.len(), "AI activations");
            }
        }

        let report = self.state.advance(now_ms, &mut self.rng);
        if report.outcome.is_terminal() {
            info!(
                outcome = %report.outcome,
                tick = self.state.tick(),
                level = self.state.level(),
                "level over"
            );
            self.outcome = report.outcome;
        }
        report.outcome
    }

    /// Replay `level` on the current positions and clear the latch.
    pub fn reset(&mut self, level: u32) {
        self.state.replay(level);
        self.outcome = Outcome::Ongoing;
    }

    /// Move on to a freshly scattered `level` and clear the latch.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] if the new positions cannot be placed; the
    /// board and the latch are left unchanged.
    pub fn advance_level(&mut self, level: u32) -> Result<(), LayoutError> {
        self.state.advance_level(level, &mut self.rng)?;
        self.outcome = Outcome::Ongoing;
        Ok(())
    }

    /// Read-only view of the whole board.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, self.outcome)
    }
}
