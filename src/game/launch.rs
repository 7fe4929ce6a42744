//! Path pruning and launch scheduling.

use crate::game::{Board, Path, Projectile};

/// Launch timing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchParams {
    /// Cooldown in ticks for a source of value 0.
    pub base_cooldown: u32,
    /// How strongly source value shortens the cooldown.
    pub speed_factor: f64,
    /// Distance a projectile covers per tick.
    pub projectile_speed: f64,
}

/// Shortest cooldown any path can have, in ticks.
pub const MIN_COOLDOWN: u64 = 2;

/// Ticks a path must wait between launches for a source of `value`.
///
/// `max(2, floor(base / (1 + value * factor)))`: stronger sources fire faster.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn dynamic_cooldown(value: u32, params: &LaunchParams) -> u64 {
    let scaled = f64::from(params.base_cooldown) / (1.0 + f64::from(value) * params.speed_factor);
    // scaled is non-negative and at most base_cooldown
    (scaled.floor() as u64).max(MIN_COOLDOWN)
}

/// Whether `path` may keep emitting: its source is alive and still held by
/// the faction that created the path.
#[must_use]
pub fn is_valid(board: &Board, path: &Path) -> bool {
    board
        .node(path.source())
        .is_some_and(|node| node.is_held_by(path.owner()))
}

/// Drop every path whose source is empty or has changed hands.
///
/// Returns the number of paths removed.
pub fn prune_paths(board: &mut Board) -> usize {
    let paths = std::mem::take(&mut board.paths);
    let before = paths.len();
    board.paths = paths.into_iter().filter(|p| is_valid(board, p)).collect();
    before - board.paths.len()
}

/// Fire every path whose cooldown has elapsed at tick `now`.
///
/// Each launch spawns one projectile at the source's centre aimed at the
/// destination's current centre, costs the source one value, and restarts
/// the path's cooldown. Sources drained earlier in the same pass stop firing.
/// Returns the number of projectiles launched.
pub fn launch(board: &mut Board, now: u64, params: &LaunchParams) -> usize {
    let mut launched = 0;

    for i in 0..board.paths.len() {
        let (source, destination, last) = {
            let path = &board.paths[i];
            (path.source(), path.destination(), path.last_launch)
        };
        let Some(target) = board.node(destination).map(|n| n.position) else {
            continue;
        };
        let Some(node) = board.node_mut(source) else {
            continue;
        };
        if node.value == 0 {
            continue;
        }
        if now.saturating_sub(last) < dynamic_cooldown(node.value, params) {
            continue;
        }

        node.value -= 1;
        let projectile = Projectile {
            position: node.position,
            velocity: node.position.heading_to(target, params.projectile_speed),
            destination,
            owner: node.owner,
        };
        board.projectiles.push(projectile);
        board.paths[i].last_launch = now;
        launched += 1;
    }

    launched
}
