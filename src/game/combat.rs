//! Projectile arrival and cross-faction annihilation.
//!
//! A projectile that reaches its destination either captures an empty node,
//! reinforces a node of its own faction, or wears down a hostile one by one.
//! Projectiles of different factions that pass close to each other cancel.

use crate::game::{Board, FactionId, Node};

/// What a projectile did to the node it reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    /// The node was empty and now belongs to the projectile's faction.
    Captured,
    /// The node belonged to the projectile's faction and gained one.
    Reinforced,
    /// The node belonged to another faction and lost one.
    Weakened,
}

/// Apply one arriving projectile of `owner` to `node`.
///
/// An empty node is taken over at value 1. A hostile node is decremented but
/// keeps its owner, even when it reaches exactly 0; the next hit of any
/// faction then captures it.
pub fn resolve_arrival(node: &mut Node, owner: FactionId) -> Arrival {
    if node.value == 0 {
        node.owner = owner;
        node.value = 1;
        Arrival::Captured
    } else if node.owner == owner {
        node.value = node.value.saturating_add(1);
        Arrival::Reinforced
    } else {
        node.value -= 1;
        Arrival::Weakened
    }
}

/// Move every projectile one step and resolve the ones that arrived.
///
/// A projectile has arrived when its distance to the destination's current
/// centre is within the destination's radius. Arrived projectiles are removed
/// whatever the outcome. Returns the number of arrivals.
pub fn advance_projectiles(board: &mut Board) -> usize {
    let mut projectiles = std::mem::take(&mut board.projectiles);
    let before = projectiles.len();

    projectiles.retain_mut(|projectile| {
        projectile.advance();
        let Some(node) = board.node_mut(projectile.destination) else {
            // Destination vanished from the arena; the unit has nowhere to go.
            return false;
        };
        if projectile.position.distance(node.position) <= node.radius {
            resolve_arrival(node, projectile.owner);
            false
        } else {
            true
        }
    });

    let arrived = before - projectiles.len();
    board.projectiles = projectiles;
    arrived
}

/// Cancel pairs of hostile projectiles that are closer than `proximity`.
///
/// The scan walks the list once. For each index it looks forward for the
/// first projectile of another faction in range; if found, both are removed
/// and the projectile that slid into the same index is examined next. This is
/// a greedy pass, not a maximal matching, so some close pairs can survive
/// until the next check. Returns the number of pairs removed.
pub fn annihilate(board: &mut Board, proximity: f64) -> usize {
    let projectiles = &mut board.projectiles;
    let mut pairs = 0;
    let mut i = 0;

    while i < projectiles.len() {
        let partner = (i + 1..projectiles.len()).find(|&j| {
            let (a, b) = (&projectiles[i], &projectiles[j]);
            a.owner != b.owner && a.position.distance(b.position) < proximity
        });

        if let Some(j) = partner {
            // j > i, so removing j first keeps i valid
            projectiles.remove(j);
            projectiles.remove(i);
            pairs += 1;
        } else {
            i += 1;
        }
    }

    pairs
}
