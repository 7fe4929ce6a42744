//! Decision engine for autonomous factions.
//!
//! Each autonomous faction acts at most once per cooldown. An activation
//! runs a fixed policy against the shared board:
//!
//! 1. Overflow: strong nodes push their surplus to a weak ally, or failing
//!    that to the weakest foreign node.
//! 2. Severing: own paths feeding an already saturated own node are cut.
//! 3. Mode: guerilla, fight, develop2 or develop, recomputed from scratch.
//! 4. Mode actions: at most a handful of new paths.
//!
//! The engine only creates and removes paths. Node values change through the
//! tick pipeline alone.

mod mode;
mod policy;
mod scheduler;

pub use mode::{Assessment, Mode, first_attacked};
pub use policy::{Activation, activate};
pub use scheduler::Scheduler;

/// Decision-engine thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiParams {
    /// Nodes above this value push their surplus elsewhere.
    pub overflow_threshold: u32,
    /// Own nodes below this value may receive overflow.
    pub overflow_recipient_below: u32,
    /// Nodes below this value never act as an overflow source.
    pub overflow_min_source: u32,
    /// An attacked own node below this value gets reinforcements.
    pub reinforce_below: u32,
    /// Third-party nodes below this value are develop2 targets.
    pub develop_target_below: u32,
    /// Foreign nodes below this value are sniped in fight and guerilla mode.
    pub snipe_target_below: u32,
    /// Rival total above this multiple of own total means guerilla mode.
    pub guerilla_ratio: f64,
}

impl Default for AiParams {
    fn default() -> Self {
        Self {
            overflow_threshold: 50,
            overflow_recipient_below: 40,
            overflow_min_source: 5,
            reinforce_below: 20,
            develop_target_below: 5,
            snipe_target_below: 3,
            guerilla_ratio: 1.5,
        }
    }
}
