//! Activation timers and the neutral takeover rule.

use std::collections::HashMap;

use crate::ai::{Activation, AiParams, activate};
use crate::config::SimConfig;
use crate::game::{Board, FactionId, Roster};

/// Per-faction activation timers.
///
/// A faction acts when at least the cooldown has passed since its last
/// activation. Initial delays are modelled as timestamps in the future, so
/// they read as zero elapsed until the clock catches up. A faction without a
/// timestamp counts as having last acted at time 0.
#[derive(Debug, Clone)]
pub struct Scheduler {
    cooldown_ms: u64,
    last_activation: HashMap<FactionId, u64>,
}

impl Scheduler {
    /// Create timers for every autonomous faction of `roster` at `now_ms`,
    /// each pushed back by its configured initial delay.
    #[must_use]
    pub fn new(roster: &Roster, config: &SimConfig, now_ms: u64) -> Self {
        let last_activation = roster
            .autonomous()
            .map(|id| (id, now_ms.saturating_add(config.initial_delay(roster.name(id)))))
            .collect();
        Self {
            cooldown_ms: config.ai_cooldown_ms,
            last_activation,
        }
    }

    /// Milliseconds between two activations of one faction.
    #[must_use]
    pub const fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }

    /// Time of the last activation of `faction`, if one was recorded.
    #[must_use]
    pub fn last_activation(&self, faction: FactionId) -> Option<u64> {
        self.last_activation.get(&faction).copied()
    }

    /// Pass the activation gate for `faction` at `now_ms`.
    ///
    /// On success the timestamp is reset before anything else happens.
    pub fn ready(&mut self, faction: FactionId, now_ms: u64) -> bool {
        let last = self.last_activation(faction).unwrap_or(0);
        if now_ms.saturating_sub(last) < self.cooldown_ms {
            return false;
        }
        self.last_activation.insert(faction, now_ms);
        true
    }

    /// Factions that get a chance to act this step.
    ///
    /// Normally every autonomous faction. When none of them holds an alive
    /// node and the neutral faction holds more nodes than the player, the
    /// neutral faction stands in for them, for this step only.
    #[must_use]
    pub fn contenders(board: &Board, roster: &Roster) -> Vec<FactionId> {
        let autonomous: Vec<FactionId> = roster.autonomous().collect();
        let wiped_out = board
            .alive()
            .all(|(_, node)| !autonomous.contains(&node.owner));
        if wiped_out && board.count_held(roster.neutral()) > board.count_held(roster.player()) {
            vec![roster.neutral()]
        } else {
            autonomous
        }
    }

    /// Activate every contender whose cooldown has elapsed, in roster order.
    pub fn run(
        &mut self,
        board: &mut Board,
        roster: &Roster,
        params: &AiParams,
        now_ms: u64,
    ) -> Vec<Activation> {
        Self::contenders(board, roster)
            .into_iter()
            .filter_map(|faction| self.drive(board, faction, roster.player(), params, now_ms))
            .collect()
    }

    /// Activate a single faction against `rival` if its cooldown has elapsed.
    pub fn drive(
        &mut self,
        board: &mut Board,
        faction: FactionId,
        rival: FactionId,
        params: &AiParams,
        now_ms: u64,
    ) -> Option<Activation> {
        self.ready(faction, now_ms)
            .then(|| activate(board, faction, rival, params))
    }
}
