//! Board invariants - sanity checks that detect bugs.
//!
//! These should never trigger in a correctly implemented simulation. They
//! are bug detectors, not gameplay limits.

use crate::game::{Board, is_valid};

/// Sanity bound: no node should ever hold more than this.
///
/// Growth stops at the cap and captures add one per projectile, so even a
/// long game stays orders of magnitude below this.
pub const SANITY_MAX_NODE_VALUE: u32 = 1_000_000;

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check structural invariants of a board right after path pruning.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(board: &Board) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for (id, node) in board.iter() {
        if node.value > SANITY_MAX_NODE_VALUE {
            violations.push(InvariantViolation {
                message: format!(
                    "Node {id} has value {} > sanity max {SANITY_MAX_NODE_VALUE}",
                    node.value
                ),
            });
        }
    }

    for (i, path) in board.paths().iter().enumerate() {
        if !is_valid(board, path) {
            violations.push(InvariantViolation {
                message: format!(
                    "Path {} -> {} survived pruning without a live source",
                    path.source(),
                    path.destination()
                ),
            });
        }
        let duplicate = board.paths()[..i]
            .iter()
            .any(|p| p.connects(path.source(), path.destination()));
        if duplicate {
            violations.push(InvariantViolation {
                message: format!(
                    "Duplicate path {} -> {}",
                    path.source(),
                    path.destination()
                ),
            });
        }
    }

    for projectile in board.projectiles() {
        if board.node(projectile.destination).is_none() {
            violations.push(InvariantViolation {
                message: format!(
                    "Projectile heading for missing node {}",
                    projectile.destination
                ),
            });
        }
    }

    violations
}

/// Assert all board invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(board: &Board) {
    let violations = check_invariants(board);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Board invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_board: &Board) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{FactionId, Node, NodeId, Point, Seat};

    #[test]
    fn test_clean_board() {
        let mut board = Board::new(vec![
            Node::new(Point::new(0.0, 0.0), FactionId::new(0), 5, 30.0, Seat::Player),
            Node::new(Point::new(90.0, 0.0), FactionId::new(1), 5, 30.0, Seat::Ai),
        ])
        .unwrap();
        board
            .create_path(NodeId::new(0), NodeId::new(1), FactionId::new(0))
            .unwrap();
        assert!(check_invariants(&board).is_empty());
    }

    #[test]
    fn test_stale_path_detected() {
        let mut board = Board::new(vec![
            Node::new(Point::new(0.0, 0.0), FactionId::new(0), 5, 30.0, Seat::Player),
            Node::new(Point::new(90.0, 0.0), FactionId::new(1), 5, 30.0, Seat::Ai),
        ])
        .unwrap();
        board
            .create_path(NodeId::new(0), NodeId::new(1), FactionId::new(1))
            .unwrap();
        let violations = check_invariants(&board);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].to_string().contains("survived pruning"));
    }
}
