//! Factions and the roster.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable handle for a faction.
///
/// Factions are compared by handle only; two factions sharing a display color
/// are still different factions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FactionId(u8);

impl FactionId {
    /// Create a handle from a roster index.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Position of this faction in its roster.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Display color of a faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// A competitor on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Faction {
    /// Handle of this faction.
    pub id: FactionId,
    /// Lowercase display name, also the key for per-faction configuration.
    pub name: String,
    /// Display color.
    pub color: Rgb,
}

/// The fixed set of factions for a session.
///
/// Exactly one faction is player-controlled, one is the primary autonomous
/// faction and one is neutral. Any others are minor factions that may hold no
/// nodes on the current board.
#[derive(Debug, Clone)]
pub struct Roster {
    factions: Vec<Faction>,
    player: FactionId,
    primary_ai: FactionId,
    neutral: FactionId,
}

impl Roster {
    /// Build a roster from `(name, color)` pairs and the indices of the three
    /// distinguished factions.
    ///
    /// Returns `None` if an index is out of range, two roles share a
    /// faction, or there are more than 255 factions.
    #[must_use]
    pub fn new(
        entries: &[(&str, Rgb)],
        player: usize,
        primary_ai: usize,
        neutral: usize,
    ) -> Option<Self> {
        let count = u8::try_from(entries.len()).ok()?;
        let len = usize::from(count);
        if player >= len || primary_ai >= len || neutral >= len {
            return None;
        }
        if player == primary_ai || player == neutral || primary_ai == neutral {
            return None;
        }

        let factions = (0..count)
            .zip(entries)
            .map(|(i, (name, color))| Faction {
                id: FactionId(i),
                name: (*name).to_string(),
                color: *color,
            })
            .collect();

        Some(Self {
            factions,
            player: FactionId(u8::try_from(player).ok()?),
            primary_ai: FactionId(u8::try_from(primary_ai).ok()?),
            neutral: FactionId(u8::try_from(neutral).ok()?),
        })
    }

    /// The classic eight-faction roster: blue player, yellow AI, gray
    /// neutral, then purple, cyan, green, orange and red.
    #[must_use]
    pub fn classic() -> Self {
        let entries = [
            ("blue", Rgb(0, 0, 255)),
            ("yellow", Rgb(255, 255, 0)),
            ("gray", Rgb(128, 128, 128)),
            ("purple", Rgb(128, 0, 128)),
            ("cyan", Rgb(0, 255, 255)),
            ("green", Rgb(0, 255, 0)),
            ("orange", Rgb(255, 165, 0)),
            ("red", Rgb(255, 0, 0)),
        ];
        let factions = (0u8..)
            .zip(entries)
            .map(|(i, (name, color))| Faction {
                id: FactionId(i),
                name: name.to_string(),
                color,
            })
            .collect();
        Self {
            factions,
            player: FactionId(0),
            primary_ai: FactionId(1),
            neutral: FactionId(2),
        }
    }

    /// The player-controlled faction.
    #[must_use]
    pub const fn player(&self) -> FactionId {
        self.player
    }

    /// The primary autonomous faction.
    #[must_use]
    pub const fn primary_ai(&self) -> FactionId {
        self.primary_ai
    }

    /// The neutral, harvestable faction.
    #[must_use]
    pub const fn neutral(&self) -> FactionId {
        self.neutral
    }

    /// Look up a faction by handle.
    #[must_use]
    pub fn get(&self, id: FactionId) -> Option<&Faction> {
        self.factions.get(id.index())
    }

    /// Display name of a faction, or `"?"` for a foreign handle.
    #[must_use]
    pub fn name(&self, id: FactionId) -> &str {
        self.get(id).map_or("?", |f| f.name.as_str())
    }

    /// Look up a faction by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<FactionId> {
        self.factions.iter().find(|f| f.name == name).map(|f| f.id)
    }

    /// All factions in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &Faction> {
        self.factions.iter()
    }

    /// Factions that act on their own: everything but the player and neutral.
    pub fn autonomous(&self) -> impl Iterator<Item = FactionId> + '_ {
        self.factions
            .iter()
            .map(|f| f.id)
            .filter(|&id| id != self.player && id != self.neutral)
    }

    /// Number of factions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factions.len()
    }

    /// Whether the roster is empty. A valid roster never is.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factions.is_empty()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::classic()
    }
}

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "faction {}", self.0)
    }
}
