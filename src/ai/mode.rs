//! Tactical mode classification.

use std::fmt;

use serde::Serialize;

use crate::ai::AiParams;
use crate::game::{Board, FactionId, NodeId};

/// Tactical mode, recomputed on every activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Attack the nearest non-own node.
    Develop,
    /// Pick off weak nodes of third parties.
    Develop2,
    /// Reinforce an attacked node and snipe weak nodes.
    Fight,
    /// Outmatched: snipe weak nodes and scatter attacked ones.
    Guerilla,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Develop => "develop",
            Self::Develop2 => "develop2",
            Self::Fight => "fight",
            Self::Guerilla => "guerilla",
        };
        f.write_str(name)
    }
}

/// Board figures a faction bases its mode on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    /// Sum of own alive node values.
    pub my_total: u64,
    /// Sum of the rival's alive node values.
    pub rival_total: u64,
    /// Own alive nodes.
    pub my_count: usize,
    /// Alive nodes of every faction.
    pub total_count: usize,
    /// Whether a rival path currently targets an own node.
    pub under_attack: bool,
}

impl Assessment {
    /// Measure `board` for faction `me` against `rival`.
    #[must_use]
    pub fn of(board: &Board, me: FactionId, rival: FactionId) -> Self {
        Self {
            my_total: board.total_value(me),
            rival_total: board.total_value(rival),
            my_count: board.count_held(me),
            total_count: board.alive().count(),
            under_attack: first_attacked(board, me, rival).is_some(),
        }
    }

    /// Pick the mode, highest priority first: guerilla, fight, develop2,
    /// develop.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn classify(&self, params: &AiParams) -> Mode {
        if self.rival_total as f64 > self.my_total as f64 * params.guerilla_ratio {
            Mode::Guerilla
        } else if self.under_attack {
            Mode::Fight
        } else if self.my_count >= self.total_count / 2 {
            Mode::Develop2
        } else {
            Mode::Develop
        }
    }
}

/// Destination of the first `rival` path that targets a node `me` holds.
#[must_use]
pub fn first_attacked(board: &Board, me: FactionId, rival: FactionId) -> Option<NodeId> {
    board
        .paths()
        .iter()
        .filter(|p| p.owner() == rival)
        .map(|p| p.destination())
        .find(|&id| board.node(id).is_some_and(|n| n.is_held_by(me)))
}
