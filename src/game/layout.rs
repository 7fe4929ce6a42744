//! Board layouts and level dealing.
//!
//! The classic opening puts four player nodes in the top-left corner, four
//! AI nodes in the bottom-right corner and scatters neutral nodes across the
//! arena. Later levels re-deal every position: player seats lean left, AI
//! seats lean right, neutral seats are uniform.

// Placement uses intentional casts for coordinate sampling
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use rand::Rng;

use crate::error::LayoutError;
use crate::game::{Board, Node, Point, Roster, Seat};

/// Placement attempts per node before giving up.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

/// Number of neutral nodes on the classic board.
pub const CLASSIC_NEUTRAL_COUNT: usize = 9;

/// Starting value of a player seat.
pub const PLAYER_START_VALUE: u32 = 10;

/// Starting value of an AI seat on the classic board.
pub const CLASSIC_AI_START_VALUE: u32 = 10;

/// Starting value of a neutral seat.
pub const NEUTRAL_START_VALUE: u32 = 5;

/// Margin kept clear along the arena edges when re-dealing.
const EDGE: f64 = 100.0;

/// Extra gap kept between node discs when re-dealing.
const GAP: f64 = 10.0;

/// Arena geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    /// Width in arena units.
    pub width: f64,
    /// Height in arena units.
    pub height: f64,
    /// Radius of every node.
    pub node_radius: f64,
}

/// How a level sets node values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deal {
    /// Replay a level on the same positions: AI seats start at `3 + level / 5`.
    Replay,
    /// A freshly shuffled, harder level: AI seats start at `10 + level`.
    Advance,
}

/// Starting value for `seat` under `deal` at `level`.
#[must_use]
pub fn seat_value(seat: Seat, deal: Deal, level: u32) -> u32 {
    match (seat, deal) {
        (Seat::Player, _) => PLAYER_START_VALUE,
        (Seat::Neutral, _) => NEUTRAL_START_VALUE,
        (Seat::Ai, Deal::Replay) => 3 + level / 5,
        (Seat::Ai, Deal::Advance) => 10u32.saturating_add(level),
    }
}

/// Build the classic opening board.
///
/// # Errors
///
/// Returns [`LayoutError`] if the neutral nodes cannot be placed.
pub fn classic_board<R: Rng + ?Sized>(
    roster: &Roster,
    arena: &Arena,
    rng: &mut R,
) -> Result<Board, LayoutError> {
    let r = arena.node_radius;
    let player = [(100.0, 100.0), (200.0, 100.0), (100.0, 200.0), (200.0, 200.0)];
    let ai = [(1100.0, 500.0), (1000.0, 500.0), (1100.0, 400.0), (1000.0, 400.0)];

    let mut nodes: Vec<Node> = player
        .iter()
        .map(|&(x, y)| Node::new(Point::new(x, y), roster.player(), PLAYER_START_VALUE, r, Seat::Player))
        .chain(ai.iter().map(|&(x, y)| {
            Node::new(Point::new(x, y), roster.primary_ai(), CLASSIC_AI_START_VALUE, r, Seat::Ai)
        }))
        .collect();

    let (lo_x, hi_x) = (2.0 * r, arena.width - 2.0 * r);
    let (lo_y, hi_y) = (2.0 * r, arena.height - 2.0 * r);
    if lo_x > hi_x || lo_y > hi_y {
        return Err(too_small(arena));
    }

    for index in nodes.len()..nodes.len() + CLASSIC_NEUTRAL_COUNT {
        let taken: Vec<Point> = nodes.iter().map(|n| n.position).collect();
        let position = place(rng, index, &taken, 2.0 * r, |rng| {
            Point::new(
                f64::from(rng.gen_range(lo_x as i32..=hi_x as i32)),
                f64::from(rng.gen_range(lo_y as i32..=hi_y as i32)),
            )
        })?;
        nodes.push(Node::new(position, roster.neutral(), NEUTRAL_START_VALUE, r, Seat::Neutral));
    }

    Ok(Board::new(nodes)?)
}

/// Reassign owners and values from seats, keep positions, clear traffic.
pub fn deal(board: &mut Board, roster: &Roster, kind: Deal, level: u32) {
    for node in board.nodes_mut() {
        node.owner = match node.seat {
            Seat::Player => roster.player(),
            Seat::Ai => roster.primary_ai(),
            Seat::Neutral => roster.neutral(),
        };
        node.value = seat_value(node.seat, kind, level);
    }
    board.clear_traffic();
}

/// Draw fresh positions for every node according to its seat.
///
/// The board is left untouched if placement fails.
///
/// # Errors
///
/// Returns [`LayoutError`] if the arena is too small or a node cannot be
/// placed within [`MAX_PLACEMENT_ATTEMPTS`].
pub fn scatter<R: Rng + ?Sized>(
    board: &mut Board,
    arena: &Arena,
    rng: &mut R,
) -> Result<(), LayoutError> {
    let r = arena.node_radius;
    let half = (arena.width / 2.0).floor();
    let lo_y = EDGE + r;
    let hi_y = arena.height - EDGE - r;
    let span = half - EDGE - r;
    if hi_y < lo_y || span < 0.0 || arena.width - EDGE - r < EDGE + r {
        return Err(too_small(arena));
    }

    // Player seats first, then AI, then neutral, as the arena fills up
    let mut order: Vec<usize> = Vec::with_capacity(board.nodes().len());
    for seat in [Seat::Player, Seat::Ai, Seat::Neutral] {
        order.extend(
            board
                .nodes()
                .iter()
                .enumerate()
                .filter(|(_, n)| n.seat == seat)
                .map(|(i, _)| i),
        );
    }

    let mut positions = vec![Point::default(); board.nodes().len()];
    let mut taken = Vec::with_capacity(order.len());
    for &index in &order {
        let seat = board.nodes()[index].seat;
        let position = place(rng, index, &taken, 2.0 * r + GAP, |rng| {
            let y = f64::from(rng.gen_range(lo_y as i32..=hi_y as i32));
            let u: f64 = rng.r#gen();
            let x = match seat {
                // Squaring the sample pushes player seats toward the left edge
                Seat::Player => (EDGE + r + span * u * u).floor(),
                Seat::Ai => (arena.width - EDGE - r - span * u * u).floor(),
                Seat::Neutral => {
                    f64::from(rng.gen_range((EDGE + r) as i32..=(arena.width - EDGE - r) as i32))
                }
            };
            Point::new(x, y)
        })?;
        positions[index] = position;
        taken.push(position);
    }

    for (node, position) in board.nodes_mut().iter_mut().zip(positions) {
        node.position = position;
    }
    Ok(())
}

/// Rejection-sample a point at least `clearance` away from every taken one.
fn place<R, F>(
    rng: &mut R,
    index: usize,
    taken: &[Point],
    clearance: f64,
    mut sample: F,
) -> Result<Point, LayoutError>
where
    R: Rng + ?Sized,
    F: FnMut(&mut R) -> Point,
{
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let candidate = sample(rng);
        if taken.iter().all(|p| p.distance(candidate) > clearance) {
            return Ok(candidate);
        }
    }
    Err(LayoutError::NoRoom {
        index,
        attempts: MAX_PLACEMENT_ATTEMPTS,
    })
}

fn too_small(arena: &Arena) -> LayoutError {
    LayoutError::ArenaTooSmall {
        width: arena.width,
        height: arena.height,
        radius: arena.node_radius,
    }
}
