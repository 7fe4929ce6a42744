//! Game layer for Linewar.
//!
//! Implements the board rules the decision engine and the input layer act on:
//! - Factions, nodes, supply paths and projectiles
//! - Projectile motion, capture and annihilation
//! - Path pruning and launch scheduling
//! - Economy (periodic growth and jackpots)
//! - Board layouts and level dealing
//! - The per-tick pipeline and terminal outcome

mod board;
mod combat;
mod economy;
mod faction;
mod invariants;
mod launch;
mod layout;
mod state;

pub use board::{Board, Node, NodeId, Path, Point, Projectile, Seat};
pub use combat::{Arrival, advance_projectiles, annihilate, resolve_arrival};
pub use economy::{
    BASE_GROWTH_CHANCE, Economy, EconomyParams, EconomyReport, Growth, JACKPOT_BONUS,
    UPPER_GROWTH_CHANCE, growth_for_roll, jackpot_probability,
};
pub use faction::{Faction, FactionId, Rgb, Roster};
pub use invariants::{InvariantViolation, SANITY_MAX_NODE_VALUE, assert_invariants, check_invariants};
pub use launch::{LaunchParams, MIN_COOLDOWN, dynamic_cooldown, is_valid, launch, prune_paths};
pub use layout::{
    Arena, CLASSIC_AI_START_VALUE, CLASSIC_NEUTRAL_COUNT, Deal, MAX_PLACEMENT_ATTEMPTS,
    NEUTRAL_START_VALUE, PLAYER_START_VALUE, classic_board, deal, scatter, seat_value,
};
pub use state::{GameState, Outcome, TickReport};
