//! Simulation configuration.
//!
//! Every tunable of the engine lives in [`SimConfig`]. It deserializes from
//! JSON with any field optional, falling back to the classic game's values.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ai::AiParams;
use crate::error::ConfigError;
use crate::game::{Arena, EconomyParams, LaunchParams};

/// Full configuration surface of the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Launch cooldown in ticks for a source of value 0.
    pub base_cooldown: u32,
    /// How strongly source value shortens the launch cooldown.
    pub speed_factor: f64,
    /// Distance a projectile covers per tick.
    pub projectile_speed: f64,
    /// Economy growth stops at this value.
    pub growth_cap: u32,
    /// Milliseconds between economy steps.
    pub economy_interval_ms: u64,
    /// Jackpot chance right after a jackpot.
    pub jackpot_base: f64,
    /// Milliseconds after a jackpot before its chance starts rising.
    pub jackpot_grace_ms: u64,
    /// Jackpot chance added per whole second past the grace period.
    pub jackpot_increment: f64,
    /// Milliseconds between activations of one autonomous faction.
    pub ai_cooldown_ms: u64,
    /// One-off delay before a faction's first activation, by faction name.
    pub ai_initial_delay_ms: BTreeMap<String, u64>,
    /// Hostile projectiles closer than this cancel each other.
    pub annihilation_proximity: f64,
    /// Ticks between annihilation checks.
    pub annihilation_interval: u64,
    /// Nodes above this value push their surplus elsewhere.
    pub overflow_threshold: u32,
    /// Own nodes below this value may receive overflow.
    pub overflow_recipient_below: u32,
    /// Nodes below this value never act as an overflow source.
    pub overflow_min_source: u32,
    /// An attacked own node below this value gets reinforcements.
    pub reinforce_below: u32,
    /// Neutral or minor nodes below this value are expansion targets.
    pub develop_target_below: u32,
    /// Hostile nodes below this value are opportunistic targets.
    pub snipe_target_below: u32,
    /// Rival total above this multiple of own total triggers guerilla mode.
    pub guerilla_ratio: f64,
    /// Arena width.
    pub arena_width: f64,
    /// Arena height.
    pub arena_height: f64,
    /// Radius of every node.
    pub node_radius: f64,
    /// A pointer within this distance of a path segment cuts it.
    pub cut_tolerance: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        let ai_initial_delay_ms = [("yellow", 2000), ("purple", 2000), ("cyan", 2000)]
            .into_iter()
            .map(|(name, delay)| (name.to_string(), delay))
            .collect();

        Self {
            base_cooldown: 50,
            speed_factor: 0.05,
            projectile_speed: 1.0,
            growth_cap: 100,
            economy_interval_ms: 1000,
            jackpot_base: 0.0063,
            jackpot_grace_ms: 10_000,
            jackpot_increment: 0.005,
            ai_cooldown_ms: 1000,
            ai_initial_delay_ms,
            annihilation_proximity: 10.0,
            annihilation_interval: 10,
            overflow_threshold: 50,
            overflow_recipient_below: 40,
            overflow_min_source: 5,
            reinforce_below: 20,
            develop_target_below: 5,
            snipe_target_below: 3,
            guerilla_ratio: 1.5,
            arena_width: 1200.0,
            arena_height: 600.0,
            node_radius: 30.0,
            cut_tolerance: 8.0,
        }
    }
}

impl SimConfig {
    /// Load and validate a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or if a
    /// value is out of range.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse and validate a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid JSON for this schema
    /// or a value is out of range.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        }
        fn probability(p: f64) -> bool {
            (0.0..=1.0).contains(&p)
        }

        if self.base_cooldown == 0 {
            return invalid("base_cooldown", "must be positive");
        }
        if !(self.speed_factor >= 0.0) {
            return invalid("speed_factor", "must be non-negative");
        }
        if !(self.projectile_speed > 0.0) {
            return invalid("projectile_speed", "must be positive");
        }
        if self.growth_cap == 0 {
            return invalid("growth_cap", "must be positive");
        }
        if self.economy_interval_ms == 0 {
            return invalid("economy_interval_ms", "must be positive");
        }
        if !probability(self.jackpot_base) {
            return invalid("jackpot_base", "must be within [0, 1]");
        }
        if !probability(self.jackpot_increment) {
            return invalid("jackpot_increment", "must be within [0, 1]");
        }
        if self.annihilation_interval == 0 {
            return invalid("annihilation_interval", "must be positive");
        }
        if !(self.annihilation_proximity >= 0.0) {
            return invalid("annihilation_proximity", "must be non-negative");
        }
        if !(self.guerilla_ratio > 0.0) {
            return invalid("guerilla_ratio", "must be positive");
        }
        if !(self.node_radius > 0.0) {
            return invalid("node_radius", "must be positive");
        }
        if !(self.arena_width > 0.0 && self.arena_height > 0.0) {
            return invalid("arena_width", "arena must have positive size");
        }
        if !(self.cut_tolerance >= 0.0) {
            return invalid("cut_tolerance", "must be non-negative");
        }
        Ok(())
    }

    /// Launch timing slice of the configuration.
    #[must_use]
    pub fn launch(&self) -> LaunchParams {
        LaunchParams {
            base_cooldown: self.base_cooldown,
            speed_factor: self.speed_factor,
            projectile_speed: self.projectile_speed,
        }
    }

    /// Economy slice of the configuration.
    #[must_use]
    pub fn economy(&self) -> EconomyParams {
        EconomyParams {
            interval_ms: self.economy_interval_ms,
            growth_cap: self.growth_cap,
            jackpot_base: self.jackpot_base,
            jackpot_grace_ms: self.jackpot_grace_ms,
            jackpot_increment: self.jackpot_increment,
        }
    }

    /// Arena geometry slice of the configuration.
    #[must_use]
    pub fn arena(&self) -> Arena {
        Arena {
            width: self.arena_width,
            height: self.arena_height,
            node_radius: self.node_radius,
        }
    }

    /// Decision-engine slice of the configuration.
    #[must_use]
    pub fn ai(&self) -> AiParams {
        AiParams {
            overflow_threshold: self.overflow_threshold,
            overflow_recipient_below: self.overflow_recipient_below,
            overflow_min_source: self.overflow_min_source,
            reinforce_below: self.reinforce_below,
            develop_target_below: self.develop_target_below,
            snipe_target_below: self.snipe_target_below,
            guerilla_ratio: self.guerilla_ratio,
        }
    }

    /// Initial activation delay for the faction called `name`.
    #[must_use]
    pub fn initial_delay(&self, name: &str) -> u64 {
        self.ai_initial_delay_ms.get(name).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.initial_delay("yellow"), 2000);
        assert_eq!(config.initial_delay("green"), 0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json(r#"{ "growth_cap": 80, "ai_cooldown_ms": 500 }"#).unwrap();
        assert_eq!(config.growth_cap, 80);
        assert_eq!(config.ai_cooldown_ms, 500);
        assert_eq!(config.base_cooldown, 50);
    }

    #[test]
    fn test_rejects_bad_probability() {
        let err = SimConfig::from_json(r#"{ "jackpot_base": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "jackpot_base",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_nan_speed() {
        let config = SimConfig {
            speed_factor: f64::NAN,
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = SimConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "annihilation_interval": 5 }}"#).unwrap();

        let config = SimConfig::load(file.path()).unwrap();
        assert_eq!(config.annihilation_interval, 5);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SimConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_json_round_trip() {
        let config = SimConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SimConfig::from_json(&json).unwrap(), config);
    }
}
