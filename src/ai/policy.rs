//! One activation of the decision policy.
//!
//! Every rule reads the board as it stands and creates paths through
//! [`Board::create_path`], so repeated activations never duplicate a path.
//! A rule whose candidate set is empty does nothing.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::ai::{AiParams, Assessment, Mode, first_attacked};
use crate::game::{Board, FactionId, NodeId, Point};

/// What one activation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    /// Faction that acted.
    pub faction: FactionId,
    /// Mode chosen this activation.
    pub mode: Mode,
    /// Paths created.
    pub created: usize,
    /// Paths severed.
    pub severed: usize,
}

/// Run the full policy once for faction `me` against `rival`.
pub fn activate(board: &mut Board, me: FactionId, rival: FactionId, params: &AiParams) -> Activation {
    let mut created = overflow(board, me, params);
    let severed = sever_saturated(board, me, params);

    let mode = Assessment::of(board, me, rival).classify(params);
    let mine: Vec<NodeId> = board.held_by(me).map(|(id, _)| id).collect();

    if !mine.is_empty() {
        created += match mode {
            Mode::Develop => develop(board, me, &mine),
            Mode::Develop2 => develop2(board, me, rival, &mine, params),
            Mode::Fight => fight(board, me, rival, &mine, params),
            Mode::Guerilla => guerilla(board, me, &mine, params),
        };
    }

    debug!(faction = %me, %mode, created, severed, "activation");
    Activation {
        faction: me,
        mode,
        created,
        severed,
    }
}

/// Push surplus from every node above the overflow threshold.
///
/// The nearest own node below the recipient bound is preferred; without one
/// the weakest alive foreign node is targeted.
fn overflow(board: &mut Board, me: FactionId, params: &AiParams) -> usize {
    let mine: Vec<(NodeId, Point, u32)> = board
        .held_by(me)
        .map(|(id, n)| (id, n.position, n.value))
        .collect();
    let mut created = 0;

    for &(source, position, value) in &mine {
        if value < params.overflow_min_source || value <= params.overflow_threshold {
            continue;
        }
        let ally = mine
            .iter()
            .filter(|&&(id, _, v)| id != source && v < params.overflow_recipient_below)
            .min_by(|a, b| position.distance(a.1).total_cmp(&position.distance(b.1)))
            .map(|&(id, _, _)| id);
        let recipient = ally.or_else(|| {
            board
                .alive()
                .filter(|(_, n)| n.owner != me)
                .min_by_key(|(_, n)| n.value)
                .map(|(id, _)| id)
        });
        if let Some(destination) = recipient {
            created += usize::from(link(board, source, destination, me, "overflow"));
        }
    }

    created
}

/// Cut own paths whose destination is an own node above the overflow
/// threshold.
fn sever_saturated(board: &mut Board, me: FactionId, params: &AiParams) -> usize {
    let doomed: Vec<(NodeId, NodeId)> = board
        .paths()
        .iter()
        .filter(|p| p.owner() == me)
        .filter(|p| {
            board
                .node(p.destination())
                .is_some_and(|n| n.owner == me && n.value > params.overflow_threshold)
        })
        .map(|p| (p.source(), p.destination()))
        .collect();

    for &(source, destination) in &doomed {
        board.remove_path(source, destination);
        debug!(faction = %me, %source, %destination, "severed");
    }
    doomed.len()
}

/// Attack from the globally nearest (own, foreign) pair.
fn develop(board: &mut Board, me: FactionId, mine: &[NodeId]) -> usize {
    let mut best: Option<(f64, NodeId, NodeId)> = None;
    for (target, node) in board.alive().filter(|(_, n)| n.owner != me) {
        for &source in mine {
            let Some(from) = board.node(source) else {
                continue;
            };
            let d = from.position.distance(node.position);
            if best.is_none_or(|(nearest, _, _)| d < nearest) {
                best = Some((d, source, target));
            }
        }
    }

    match best {
        Some((_, source, target)) => usize::from(link(board, source, target, me, "develop")),
        None => 0,
    }
}

/// Attack the first weak node held by a third party.
fn develop2(
    board: &mut Board,
    me: FactionId,
    rival: FactionId,
    mine: &[NodeId],
    params: &AiParams,
) -> usize {
    let target = board
        .alive()
        .find(|(_, n)| n.owner != me && n.owner != rival && n.value < params.develop_target_below)
        .map(|(id, _)| id);
    target.map_or(0, |t| attack(board, me, mine, t, "develop2"))
}

/// Reinforce the first attacked node if it is weak, then snipe.
fn fight(
    board: &mut Board,
    me: FactionId,
    rival: FactionId,
    mine: &[NodeId],
    params: &AiParams,
) -> usize {
    let mut created = 0;

    let weak = first_attacked(board, me, rival)
        .filter(|&id| board.node(id).is_some_and(|n| n.value < params.reinforce_below));
    if let Some(attacked) = weak {
        let helper = mine
            .iter()
            .copied()
            .find(|&src| src != attacked && !board.has_path(src, attacked));
        if let Some(source) = helper {
            created += usize::from(link(board, source, attacked, me, "reinforce"));
        }
    }

    created + snipe(board, me, mine, params)
}

/// Snipe, then move value out of every attacked node.
///
/// Each attacked node sends to the first own node that is neither itself
/// nor under attack and has no path from it yet.
fn guerilla(board: &mut Board, me: FactionId, mine: &[NodeId], params: &AiParams) -> usize {
    let mut created = snipe(board, me, mine, params);

    let attacked: BTreeSet<NodeId> = board
        .paths()
        .iter()
        .filter(|p| p.owner() != me)
        .map(|p| p.destination())
        .filter(|&id| board.node(id).is_some_and(|n| n.is_held_by(me)))
        .collect();

    for &source in &attacked {
        let haven = mine
            .iter()
            .copied()
            .find(|&dst| dst != source && !attacked.contains(&dst) && !board.has_path(source, dst));
        if let Some(destination) = haven {
            created += usize::from(link(board, source, destination, me, "disperse"));
        }
    }

    created
}

/// Attack the first very weak foreign node, whoever holds it.
fn snipe(board: &mut Board, me: FactionId, mine: &[NodeId], params: &AiParams) -> usize {
    let target = board
        .alive()
        .find(|(_, n)| n.owner != me && n.value < params.snipe_target_below)
        .map(|(id, _)| id);
    target.map_or(0, |t| attack(board, me, mine, t, "snipe"))
}

/// Send from the own node nearest to `target`.
fn attack(board: &mut Board, me: FactionId, mine: &[NodeId], target: NodeId, reason: &str) -> usize {
    let Some(goal) = board.node(target).map(|n| n.position) else {
        return 0;
    };
    let attacker = mine
        .iter()
        .filter_map(|&id| board.node(id).map(|n| (id, n.position.distance(goal))))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id);
    attacker.map_or(0, |source| usize::from(link(board, source, target, me, reason)))
}

/// Create a path owned by `me`, returning whether a new path exists now.
fn link(board: &mut Board, source: NodeId, destination: NodeId, me: FactionId, reason: &str) -> bool {
    match board.create_path(source, destination, me) {
        Ok(created) => {
            if created {
                debug!(faction = %me, %source, %destination, reason, "path created");
            }
            created
        }
        Err(err) => {
            warn!(faction = %me, %err, reason, "decision engine produced an unusable path");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Node, Roster, Seat};

    struct Fixture {
        roster: Roster,
        board: Board,
    }

    impl Fixture {
        fn new(nodes: &[(f64, f64, char, u32)]) -> Self {
            let roster = Roster::classic();
            let nodes = nodes
                .iter()
                .map(|&(x, y, who, value)| {
                    let owner = match who {
                        'p' => roster.player(),
                        'a' => roster.primary_ai(),
                        'n' => roster.neutral(),
                        _ => roster.by_name("purple").unwrap(),
                    };
                    Node::new(Point::new(x, y), owner, value, 30.0, Seat::Neutral)
                })
                .collect();
            Self {
                board: Board::new(nodes).unwrap(),
                roster,
            }
        }

        fn act(&mut self) -> Activation {
            let (ai, player) = (self.roster.primary_ai(), self.roster.player());
            activate(&mut self.board, ai, player, &AiParams::default())
        }

        fn paths(&self) -> Vec<(u16, u16)> {
            self.board
                .paths()
                .iter()
                .map(|p| (id(p.source()), id(p.destination())))
                .collect()
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn id(n: NodeId) -> u16 {
        n.index() as u16
    }

    fn n(i: u16) -> NodeId {
        NodeId::new(i)
    }

    #[test]
    fn test_overflow_prefers_weak_ally() {
        let mut f = Fixture::new(&[
            (0.0, 0.0, 'a', 60),
            (500.0, 0.0, 'a', 10),
            (100.0, 0.0, 'p', 1),
            (900.0, 0.0, 'p', 80),
        ]);
        f.act();
        let overflow: Vec<_> = f.paths().into_iter().filter(|&(s, _)| s == 0).collect();
        assert_eq!(overflow, vec![(0, 1)]);
    }

    #[test]
    fn test_overflow_falls_back_to_weakest_foreign() {
        let mut f = Fixture::new(&[
            (0.0, 0.0, 'a', 60),
            (500.0, 0.0, 'n', 5),
            (800.0, 0.0, 'p', 4),
            (900.0, 0.0, 'p', 7),
        ]);
        f.act();
        assert!(f.board.has_path(n(0), n(2)));
    }

    #[test]
    fn test_overflow_needs_strictly_above_threshold() {
        let mut f = Fixture::new(&[(0.0, 0.0, 'a', 50), (500.0, 0.0, 'a', 10), (900.0, 0.0, 'p', 10)]);
        f.act();
        assert!(!f.board.has_path(n(0), n(1)));
    }

    #[test]
    fn test_severs_path_into_saturated_ally() {
        let mut f = Fixture::new(&[(0.0, 0.0, 'a', 10), (500.0, 0.0, 'a', 55), (900.0, 0.0, 'p', 10)]);
        let ai = f.roster.primary_ai();
        f.board.create_path(n(0), n(1), ai).unwrap();

        let activation = f.act();
        assert_eq!(activation.severed, 1);
        assert!(!f.board.has_path(n(0), n(1)));
    }

    #[test]
    fn test_develop_uses_nearest_pair() {
        let mut f = Fixture::new(&[
            (0.0, 0.0, 'a', 10),
            (300.0, 0.0, 'a', 10),
            (700.0, 0.0, 'n', 5),
            (380.0, 0.0, 'n', 5),
            (1000.0, 0.0, 'p', 10),
            (1100.0, 0.0, 'p', 10),
        ]);
        let activation = f.act();
        assert_eq!(activation.mode, Mode::Develop);
        assert_eq!(f.paths(), vec![(1, 3)]);

        // A second activation adds nothing new
        assert_eq!(f.act().created, 0);
        assert_eq!(f.paths().len(), 1);
    }

    #[test]
    fn test_develop2_skips_player_targets() {
        let mut f = Fixture::new(&[
            (0.0, 0.0, 'a', 12),
            (100.0, 0.0, 'a', 12),
            (200.0, 0.0, 'p', 2),
            (700.0, 0.0, 'n', 4),
        ]);
        let activation = f.act();
        assert_eq!(activation.mode, Mode::Develop2);
        assert_eq!(f.paths(), vec![(1, 3)]);
    }

    #[test]
    fn test_fight_reinforces_then_snipes() {
        let mut f = Fixture::new(&[
            (0.0, 0.0, 'a', 15),
            (100.0, 0.0, 'a', 15),
            (600.0, 0.0, 'p', 20),
            (900.0, 0.0, 'n', 2),
            (950.0, 0.0, 'n', 30),
            (990.0, 0.0, 'n', 30),
        ]);
        let player = f.roster.player();
        f.board.create_path(n(2), n(0), player).unwrap();

        let activation = f.act();
        assert_eq!(activation.mode, Mode::Fight);
        assert!(f.board.has_path(n(1), n(0)));
        assert!(f.board.has_path(n(1), n(3)));
        assert_eq!(activation.created, 2);
    }

    #[test]
    fn test_fight_no_reinforcement_for_strong_node() {
        let mut f = Fixture::new(&[
            (0.0, 0.0, 'a', 25),
            (100.0, 0.0, 'a', 15),
            (600.0, 0.0, 'p', 20),
            (950.0, 0.0, 'n', 30),
            (990.0, 0.0, 'n', 30),
        ]);
        let player = f.roster.player();
        f.board.create_path(n(2), n(0), player).unwrap();

        let activation = f.act();
        assert_eq!(activation.mode, Mode::Fight);
        assert_eq!(activation.created, 0);
    }

    #[test]
    fn test_guerilla_disperses_attacked_nodes() {
        let mut f = Fixture::new(&[
            (0.0, 0.0, 'a', 5),
            (100.0, 0.0, 'a', 5),
            (200.0, 0.0, 'a', 5),
            (600.0, 0.0, 'p', 40),
        ]);
        let player = f.roster.player();
        f.board.create_path(n(3), n(1), player).unwrap();

        let activation = f.act();
        assert_eq!(activation.mode, Mode::Guerilla);
        // No weak target exists, dispersal still happens
        assert!(f.board.has_path(n(1), n(0)));
        assert_eq!(activation.created, 1);
    }

    #[test]
    fn test_guerilla_snipes_player_nodes_too() {
        let mut f = Fixture::new(&[
            (0.0, 0.0, 'a', 5),
            (500.0, 0.0, 'p', 2),
            (600.0, 0.0, 'p', 40),
        ]);
        let activation = f.act();
        assert_eq!(activation.mode, Mode::Guerilla);
        assert!(f.board.has_path(n(0), n(1)));
    }

    #[test]
    fn test_no_own_nodes_is_noop() {
        let mut f = Fixture::new(&[(0.0, 0.0, 'n', 5), (600.0, 0.0, 'p', 40)]);
        let activation = f.act();
        assert_eq!(activation.created, 0);
        assert!(f.board.paths().is_empty());
    }
}
