// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Linewar: a real-time territory-capture simulation.
//!
//! Factions own nodes and connect them with directed supply paths. Every
//! path periodically launches a projectile that captures, reinforces or
//! wears down its destination. Autonomous factions are driven by a
//! cooldown-gated decision engine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI / headless runner / input     │
//! ├─────────────────────────────────────┤
//! │   Simulation (step, reset, level)   │
//! ├──────────────────┬──────────────────┤
//! │  Decision engine │   Tick pipeline  │
//! ├──────────────────┴──────────────────┤
//! │   Board: nodes, paths, projectiles  │
//! └─────────────────────────────────────┘
//! ```
//!
//! Real time is always passed in as `now_ms`; nothing in the crate reads a
//! clock. Randomness comes from an injectable [`rand::rngs::SmallRng`].

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod gesture;
pub mod headless;
pub mod simulation;
pub mod snapshot;

pub use config::SimConfig;
pub use error::{BoardError, ConfigError, LayoutError, MatchError};

// Re-export key game types at crate root for convenience
pub use game::{Board, FactionId, GameState, Node, NodeId, Outcome, Path, Point, Projectile, Roster};
pub use headless::{MatchOptions, MatchResult, run_match};
pub use simulation::Simulation;
pub use snapshot::Snapshot;
