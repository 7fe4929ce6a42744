//! Pointer gestures on the board, without any windowing code.
//!
//! A press on a node the controller may use starts a link gesture: dragging
//! over further usable nodes adds them as sources, and releasing over any
//! node creates one path from every source to it. A press on empty space
//! starts a cut gesture instead: dragging across a usable path removes it.

use crate::error::BoardError;
use crate::game::{Board, FactionId, Node, NodeId, Path, Point};

/// Who is issuing gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controller {
    /// Faction the user plays.
    pub faction: FactionId,
    /// An admin may use any node and cut any path.
    pub admin: bool,
}

impl Controller {
    /// A regular player of `faction`.
    #[must_use]
    pub const fn player(faction: FactionId) -> Self {
        Self {
            faction,
            admin: false,
        }
    }

    /// Whether this controller may start paths from `node`.
    #[must_use]
    pub fn can_use(self, node: &Node) -> bool {
        self.admin || node.owner == self.faction
    }

    /// Whether this controller may cut `path`.
    #[must_use]
    pub fn can_cut(self, path: &Path) -> bool {
        self.admin || path.owner() == self.faction
    }
}

/// A gesture in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    /// Collecting source nodes for new paths.
    Link {
        /// Sources in the order they were swept over.
        sources: Vec<NodeId>,
    },
    /// Cutting paths the pointer crosses.
    Cut,
}

impl Gesture {
    /// Start a gesture at `point`.
    #[must_use]
    pub fn begin(board: &Board, controller: Controller, point: Point) -> Self {
        match usable_node_at(board, controller, point) {
            Some(id) => Self::Link { sources: vec![id] },
            None => Self::Cut,
        }
    }

    /// Move the pointer to `point`.
    ///
    /// A link gesture picks up the usable node under the pointer. A cut
    /// gesture removes the path under the pointer and returns its endpoints.
    pub fn extend(
        &mut self,
        board: &mut Board,
        controller: Controller,
        point: Point,
        tolerance: f64,
    ) -> Option<(NodeId, NodeId)> {
        match self {
            Self::Link { sources } => {
                if let Some(id) = usable_node_at(board, controller, point) {
                    if !sources.contains(&id) {
                        sources.push(id);
                    }
                }
                None
            }
            Self::Cut => cut_path_at(board, controller, point, tolerance),
        }
    }

    /// Finish the gesture at `point`.
    ///
    /// A link gesture released over a node creates a path from every source
    /// other than that node, owned by the source's current owner. Released
    /// over empty space it does nothing. Returns the number of paths created.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] if a collected source is no longer on the board.
    pub fn release(self, board: &mut Board, point: Point) -> Result<usize, BoardError> {
        let Self::Link { sources } = self else {
            return Ok(0);
        };
        let Some(target) = board.node_at(point) else {
            return Ok(0);
        };

        let mut created = 0;
        for source in sources.into_iter().filter(|&s| s != target) {
            let owner = board.node(source).ok_or(BoardError::UnknownNode(source))?.owner;
            created += usize::from(board.create_path(source, target, owner)?);
        }
        Ok(created)
    }

    /// Sources collected so far; empty for a cut gesture.
    #[must_use]
    pub fn sources(&self) -> &[NodeId] {
        match self {
            Self::Link { sources } => sources,
            Self::Cut => &[],
        }
    }
}

/// Remove the first path passing within `tolerance` of `point`.
///
/// Only the first path in range is considered: if the controller may not cut
/// it, nothing is removed. Returns the endpoints of the removed path.
pub fn cut_path_at(
    board: &mut Board,
    controller: Controller,
    point: Point,
    tolerance: f64,
) -> Option<(NodeId, NodeId)> {
    let path = board.path_near(point, tolerance)?;
    if !controller.can_cut(path) {
        return None;
    }
    let ends = (path.source(), path.destination());
    board.remove_path(ends.0, ends.1);
    Some(ends)
}

fn usable_node_at(board: &Board, controller: Controller, point: Point) -> Option<NodeId> {
    board
        .iter()
        .find(|(_, n)| point.distance(n.position) <= n.radius && controller.can_use(n))
        .map(|(id, _)| id)
}
