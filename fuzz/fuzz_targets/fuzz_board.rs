#![no_main]

//! Board fuzzer.
//!
//! Builds an arbitrary board, then interleaves path creation, removal and
//! cut gestures with simulation steps. The tick pipeline checks the board
//! invariants itself in debug builds; this target also checks that paths
//! stay unique and that a latched outcome never changes.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use linewar::game::Seat;
use linewar::gesture::{Controller, cut_path_at};
use linewar::{Board, Node, NodeId, Outcome, Point, Roster, SimConfig, Simulation};

#[derive(Arbitrary, Debug)]
struct FuzzNode {
    owner: u8,
    value: u8,
    x: u16,
    y: u16,
}

#[derive(Arbitrary, Debug)]
enum FuzzAction {
    Link { source: u8, destination: u8, owner: u8 },
    Unlink { source: u8, destination: u8 },
    Cut { x: u16, y: u16, admin: bool },
    Step { frames: u8 },
}

#[derive(Arbitrary, Debug)]
struct BoardInput {
    nodes: Vec<FuzzNode>,
    actions: Vec<FuzzAction>,
    seed: u64,
    autopilot: bool,
}

fuzz_target!(|input: BoardInput| {
    let roster = Roster::classic();
    let factions = roster.len();
    let faction = |raw: u8| {
        roster
            .iter()
            .nth(usize::from(raw) % factions)
            .map(|f| f.id)
            .unwrap_or(roster.neutral())
    };

    let nodes: Vec<Node> = input
        .nodes
        .iter()
        .take(24)
        .map(|n| {
            Node::new(
                Point::new(f64::from(n.x % 1200), f64::from(n.y % 600)),
                faction(n.owner),
                u32::from(n.value % 120),
                30.0,
                Seat::Neutral,
            )
        })
        .collect();
    if nodes.len() < 2 {
        return;
    }
    let count = nodes.len() as u16;

    let Ok(board) = Board::new(nodes) else {
        return;
    };
    let Ok(mut sim) =
        Simulation::from_board(SimConfig::default(), roster.clone(), board, input.seed, 0)
    else {
        return;
    };
    sim.set_autopilot(input.autopilot);

    let mut now = 0u64;
    let mut latched = Outcome::Ongoing;

    for action in input.actions.iter().take(64) {
        match action {
            FuzzAction::Link { source, destination, owner } => {
                let (s, d) = (u16::from(*source) % count, u16::from(*destination) % count);
                let result = sim.create_path(NodeId::new(s), NodeId::new(d), faction(*owner));
                assert_eq!(result.is_err(), s == d);
            }
            FuzzAction::Unlink { source, destination } => {
                let (s, d) = (u16::from(*source) % count, u16::from(*destination) % count);
                sim.remove_path(NodeId::new(s), NodeId::new(d));
                assert!(!sim.board().has_path(NodeId::new(s), NodeId::new(d)));
            }
            FuzzAction::Cut { x, y, admin } => {
                let controller = Controller {
                    faction: roster.player(),
                    admin: *admin,
                };
                let point = Point::new(f64::from(x % 1200), f64::from(y % 600));
                cut_path_at(sim.board_mut(), controller, point, 8.0);
            }
            FuzzAction::Step { frames } => {
                for _ in 0..(frames % 120) {
                    let outcome = sim.step(now);
                    now += 17;
                    if latched.is_terminal() {
                        assert_eq!(outcome, latched);
                    }
                    latched = outcome;
                }
            }
        }

        let paths = sim.board().paths();
        for (i, path) in paths.iter().enumerate() {
            assert!(
                paths[..i]
                    .iter()
                    .all(|p| !p.connects(path.source(), path.destination())),
                "duplicate path {} -> {}",
                path.source(),
                path.destination()
            );
        }
    }
});
