//! Serializable read-only views of the board for rendering and reports.

use serde::Serialize;

use crate::game::{GameState, NodeId, Outcome, Point};

/// A node as a renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    /// Arena index.
    pub id: u16,
    /// Centre.
    pub position: Point,
    /// Name of the owning faction.
    pub owner: String,
    /// Strength.
    pub value: u32,
    /// Capture radius.
    pub radius: f64,
}

/// A path as a renderer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathView {
    /// Source node index.
    pub source: u16,
    /// Destination node index.
    pub destination: u16,
    /// Name of the faction that created the path.
    pub owner: String,
}

/// A projectile as a renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileView {
    /// Current position.
    pub position: Point,
    /// Name of the owning faction.
    pub owner: String,
    /// Destination node index.
    pub destination: u16,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Ticks advanced so far.
    pub tick: u64,
    /// Current level.
    pub level: u32,
    /// Latched outcome.
    pub outcome: Outcome,
    /// Nodes in arena order.
    pub nodes: Vec<NodeView>,
    /// Paths in creation order.
    pub paths: Vec<PathView>,
    /// Projectiles in launch order.
    pub projectiles: Vec<ProjectileView>,
}

impl Snapshot {
    /// Capture `state` together with the latched `outcome`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn capture(state: &GameState, outcome: Outcome) -> Self {
        let roster = state.roster();
        let board = state.board();
        // Node handles are bounded by u16::MAX
        let index = |id: NodeId| id.index() as u16;

        Self {
            tick: state.tick(),
            level: state.level(),
            outcome,
            nodes: board
                .iter()
                .map(|(id, node)| NodeView {
                    id: index(id),
                    position: node.position,
                    owner: roster.name(node.owner).to_string(),
                    value: node.value,
                    radius: node.radius,
                })
                .collect(),
            paths: board
                .paths()
                .iter()
                .map(|path| PathView {
                    source: index(path.source()),
                    destination: index(path.destination()),
                    owner: roster.name(path.owner()).to_string(),
                })
                .collect(),
            projectiles: board
                .projectiles()
                .iter()
                .map(|p| ProjectileView {
                    position: p.position,
                    owner: roster.name(p.owner).to_string(),
                    destination: index(p.destination),
                })
                .collect(),
        }
    }
}
