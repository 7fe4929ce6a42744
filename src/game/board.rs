//! Board entities: nodes, supply paths and projectiles.
//!
//! The board is an arena. Nodes are addressed by [`NodeId`] handles that stay
//! valid for the lifetime of the board; level changes rewrite node fields in
//! place and never reorder the arena.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::error::BoardError;
use crate::game::FactionId;

/// A point or vector in arena coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Dot product with another vector.
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Vector of length `speed` pointing from `self` toward `target`.
    ///
    /// Coincident points yield a vector along the positive x axis.
    #[must_use]
    pub fn heading_to(self, target: Self, speed: f64) -> Self {
        let angle = (target.y - self.y).atan2(target.x - self.x);
        Self::new(angle.cos() * speed, angle.sin() * speed)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Stable handle for a node on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u16);

impl NodeId {
    /// Create a handle from an arena index.
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Arena index of this node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The allegiance a node starts each level with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    /// Dealt to the player faction.
    Player,
    /// Dealt to the primary autonomous faction.
    Ai,
    /// Dealt to the neutral faction.
    Neutral,
}

/// A capturable point on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Centre of the node.
    pub position: Point,
    /// Owning faction. Only meaningful while `value > 0`.
    pub owner: FactionId,
    /// Strength. Zero means the node is empty and capturable by anyone.
    pub value: u32,
    /// Capture radius.
    pub radius: f64,
    /// Starting allegiance used when a level is dealt.
    pub seat: Seat,
}

impl Node {
    /// Create a node.
    #[must_use]
    pub const fn new(position: Point, owner: FactionId, value: u32, radius: f64, seat: Seat) -> Self {
        Self {
            position,
            owner,
            value,
            radius,
            seat,
        }
    }

    /// Whether the node holds any value.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.value > 0
    }

    /// Whether the node is alive and owned by `faction`.
    #[must_use]
    pub fn is_held_by(&self, faction: FactionId) -> bool {
        self.value > 0 && self.owner == faction
    }
}

/// A standing directed supply line that emits projectiles while valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    source: NodeId,
    destination: NodeId,
    owner: FactionId,
    /// Tick of the most recent launch.
    pub(crate) last_launch: u64,
}

impl Path {
    /// Source node.
    #[must_use]
    pub const fn source(&self) -> NodeId {
        self.source
    }

    /// Destination node.
    #[must_use]
    pub const fn destination(&self) -> NodeId {
        self.destination
    }

    /// Faction that created the path. Fixed for the path's lifetime.
    #[must_use]
    pub const fn owner(&self) -> FactionId {
        self.owner
    }

    /// Tick of the most recent launch (0 before the first).
    #[must_use]
    pub const fn last_launch(&self) -> u64 {
        self.last_launch
    }

    /// Whether the path connects `source` to `destination`.
    #[must_use]
    pub fn connects(&self, source: NodeId, destination: NodeId) -> bool {
        self.source == source && self.destination == destination
    }
}

/// A unit in flight toward a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    /// Current position.
    pub position: Point,
    /// Displacement per tick, fixed at launch.
    pub velocity: Point,
    /// Node the projectile is heading for.
    pub destination: NodeId,
    /// Faction the projectile fights for.
    pub owner: FactionId,
}

impl Projectile {
    /// Advance one tick.
    pub fn advance(&mut self) {
        self.position = self.position + self.velocity;
    }
}

/// The shared board: node arena, paths and projectiles.
#[derive(Debug, Clone, Default)]
pub struct Board {
    nodes: Vec<Node>,
    pub(crate) paths: Vec<Path>,
    pub(crate) projectiles: Vec<Projectile>,
}

impl Board {
    /// Most nodes a board can hold; handles are 16-bit.
    pub const MAX_NODES: usize = u16::MAX as usize;

    /// Create a board from nodes in arena order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::TooManyNodes`] if more than [`Self::MAX_NODES`]
    /// nodes are supplied.
    pub fn new(nodes: Vec<Node>) -> Result<Self, BoardError> {
        if nodes.len() > Self::MAX_NODES {
            return Err(BoardError::TooManyNodes(nodes.len()));
        }
        Ok(Self {
            nodes,
            paths: Vec::new(),
            projectiles: Vec::new(),
        })
    }

    /// All nodes in arena order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node handles with their nodes, in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (Self::id_at(i), node))
    }

    /// Alive nodes (value > 0) in arena order.
    pub fn alive(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.iter().filter(|(_, node)| node.is_alive())
    }

    /// Alive nodes owned by `faction`, in arena order.
    pub fn held_by(&self, faction: FactionId) -> impl Iterator<Item = (NodeId, &Node)> {
        self.iter().filter(move |(_, node)| node.is_held_by(faction))
    }

    /// Number of alive nodes owned by `faction`.
    #[must_use]
    pub fn count_held(&self, faction: FactionId) -> usize {
        self.held_by(faction).count()
    }

    /// Sum of values over nodes owned by `faction`.
    #[must_use]
    pub fn total_value(&self, faction: FactionId) -> u64 {
        self.held_by(faction).map(|(_, n)| u64::from(n.value)).sum()
    }

    /// Look up a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Look up a node mutably.
    #[must_use]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Mutable access to every node, for level dealing.
    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// All standing paths in creation order.
    #[must_use]
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// All projectiles in flight, in launch order.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Whether a path from `source` to `destination` exists.
    #[must_use]
    pub fn has_path(&self, source: NodeId, destination: NodeId) -> bool {
        self.paths.iter().any(|p| p.connects(source, destination))
    }

    /// Create a path unless one with the same endpoints already exists.
    ///
    /// Returns `Ok(true)` if a path was created and `Ok(false)` if it
    /// already existed.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownNode`] for a handle not on this board and
    /// [`BoardError::SelfLoop`] if both endpoints are the same node.
    pub fn create_path(
        &mut self,
        source: NodeId,
        destination: NodeId,
        owner: FactionId,
    ) -> Result<bool, BoardError> {
        self.check(source)?;
        self.check(destination)?;
        if source == destination {
            return Err(BoardError::SelfLoop(source));
        }
        if self.has_path(source, destination) {
            return Ok(false);
        }
        self.paths.push(Path {
            source,
            destination,
            owner,
            last_launch: 0,
        });
        Ok(true)
    }

    /// Remove the path from `source` to `destination`.
    ///
    /// Returns `true` if a path was removed.
    pub fn remove_path(&mut self, source: NodeId, destination: NodeId) -> bool {
        let before = self.paths.len();
        self.paths.retain(|p| !p.connects(source, destination));
        self.paths.len() != before
    }

    /// Put a projectile in flight outside of any path.
    pub fn spawn_projectile(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    /// Drop every path and projectile.
    pub fn clear_traffic(&mut self) {
        self.paths.clear();
        self.projectiles.clear();
    }

    /// The first node whose disc contains `point`.
    #[must_use]
    pub fn node_at(&self, point: Point) -> Option<NodeId> {
        self.iter()
            .find(|(_, node)| point.distance(node.position) <= node.radius)
            .map(|(id, _)| id)
    }

    /// The first path whose segment passes within `tolerance` of `point`.
    ///
    /// Distance is measured perpendicular to the segment and only counts when
    /// the foot of the perpendicular falls inside the segment. Paths between
    /// coincident nodes are skipped.
    #[must_use]
    pub fn path_near(&self, point: Point, tolerance: f64) -> Option<&Path> {
        self.paths.iter().find(|path| {
            let (Some(a), Some(b)) = (self.node(path.source), self.node(path.destination)) else {
                return false;
            };
            segment_distance(point, a.position, b.position).is_some_and(|d| d < tolerance)
        })
    }

    fn check(&self, id: NodeId) -> Result<(), BoardError> {
        if id.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(BoardError::UnknownNode(id))
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn id_at(index: usize) -> NodeId {
        // Board::new bounds the arena to MAX_NODES entries
        NodeId(index as u16)
    }
}

/// Perpendicular distance from `p` to the segment `a`-`b`, if the foot of the
/// perpendicular lies on the segment.
fn segment_distance(p: Point, a: Point, b: Point) -> Option<f64> {
    let ab = b - a;
    let length = ab.x.hypot(ab.y);
    if length <= f64::EPSILON {
        return None;
    }
    if (p - a).dot(ab) < 0.0 || (p - b).dot(a - b) < 0.0 {
        return None;
    }
    let cross = ab.y * p.x - ab.x * p.y + b.x * a.y - b.y * a.x;
    Some(cross.abs() / length)
}
