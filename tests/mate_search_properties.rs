use plum_tsume::game_tree::random_tree::{random_tree, RandomTreeParams};
use plum_tsume::game_tree::tree_position::{GameTree, NodeId, TreeEdge, TreeMove, TreeNode};
use plum_tsume::mate_search::move_picker::CandidateMoves;
use plum_tsume::mate_search::node_search::MateSearch;
use plum_tsume::mate_search::root_search::{mate_in_odd_ply, mate_move_in_odd_ply};
use plum_tsume::mate_search::solver::MateSolver;
use plum_tsume::position::mate_position::MatePosition;
use plum_tsume::position::repetition::RepetitionStatus;

const SEEDS: std::ops::Range<u64> = 0..150;
const PLIES: [u8; 4] = [1, 3, 5, 7];

fn tree_for(seed: u64) -> GameTree {
    random_tree(seed, RandomTreeParams::default()).expect("random tree should build")
}

// Direct recursion over the graph data, independent of the trait plumbing.

fn legal(edge: &TreeEdge, node: &TreeNode) -> bool {
    let pinned = node.pinned & (1u64 << edge.piece) != 0;
    !((edge.flags.king_move || pinned) && edge.flags.exposes_king)
}

fn attacker_moves<'t>(tree: &'t GameTree, id: NodeId) -> impl Iterator<Item = &'t TreeEdge> {
    let node = tree.node(id);
    node.edges.iter().filter(move |edge| {
        edge.flags.gives_check && (!node.in_check || edge.flags.evades) && legal(edge, node)
    })
}

fn defender_moves<'t>(tree: &'t GameTree, id: NodeId) -> impl Iterator<Item = &'t TreeEdge> {
    let node = tree.node(id);
    node.edges
        .iter()
        .filter(move |edge| edge.flags.evades && legal(edge, node))
}

fn is_mated(tree: &GameTree, id: NodeId) -> bool {
    tree.node(id).in_check && defender_moves(tree, id).next().is_none()
}

fn reference_or(tree: &GameTree, id: NodeId, depth: u8) -> bool {
    if depth == 1 {
        return attacker_moves(tree, id).any(|edge| is_mated(tree, edge.to));
    }
    attacker_moves(tree, id).any(|edge| reference_and(tree, edge.to, depth - 1))
}

fn reference_and(tree: &GameTree, id: NodeId, depth: u8) -> bool {
    if depth == 2 {
        return defender_moves(tree, id)
            .all(|edge| !edge.flags.gives_check && reference_or(tree, edge.to, 1));
    }
    defender_moves(tree, id).all(|edge| reference_or(tree, edge.to, depth - 1))
}

fn reference_root(tree: &GameTree, depth: u8) -> Option<TreeMove> {
    attacker_moves(tree, tree.root())
        .filter(|edge| tree.node(edge.to).forced_repetition.is_none())
        .find(|edge| {
            if depth == 1 {
                is_mated(tree, edge.to)
            } else {
                reference_and(tree, edge.to, depth - 1)
            }
        })
        .map(|edge| edge.mv)
}

#[test]
fn boolean_search_matches_reference_recursion() {
    let mut mates = 0;
    for seed in SEEDS {
        let tree = tree_for(seed);
        for ply in PLIES {
            let mut pos = tree.position();
            let found = mate_in_odd_ply(&mut pos, ply);
            assert_eq!(
                found,
                reference_or(&tree, tree.root(), ply),
                "seed {seed} ply {ply}"
            );
            mates += found as usize;
        }
    }
    // The generator parameters should produce both outcomes.
    assert!(mates > 0);
    assert!(mates < SEEDS.count() * PLIES.len());
}

#[test]
fn root_search_matches_reference_root() {
    for seed in SEEDS {
        let tree = tree_for(seed);
        for ply in PLIES {
            let mut pos = tree.position();
            assert_eq!(
                mate_move_in_odd_ply(&mut pos, ply),
                reference_root(&tree, ply),
                "seed {seed} ply {ply}"
            );
        }
    }
}

#[test]
fn searches_leave_position_unchanged_and_are_idempotent() {
    for seed in SEEDS {
        let tree = tree_for(seed);
        for ply in PLIES {
            let mut pos = tree.position();
            let before = pos.clone();

            let first_move = mate_move_in_odd_ply(&mut pos, ply);
            assert_eq!(pos, before, "root search moved the position (seed {seed})");
            let second_move = mate_move_in_odd_ply(&mut pos, ply);
            assert_eq!(first_move, second_move);

            let first = mate_in_odd_ply(&mut pos, ply);
            let second = mate_in_odd_ply(&mut pos, ply);
            assert_eq!(first, second);
            assert_eq!(pos, before, "boolean search moved the position (seed {seed})");
        }
    }
}

#[test]
fn returned_move_leads_to_a_proven_defender_node() {
    for seed in SEEDS {
        let tree = tree_for(seed);
        for ply in PLIES {
            let mut pos = tree.position();
            let Some(mv) = mate_move_in_odd_ply(&mut pos, ply) else {
                continue;
            };
            assert!(mate_in_odd_ply(&mut pos, ply), "root found mate the boolean path missed");

            pos.play(mv).expect("returned move is playable");
            if ply == 1 {
                assert!(CandidateMoves::for_defender(&pos).is_empty());
            } else {
                assert!(
                    MateSearch::new(&mut pos).mate_in_even_ply(ply - 1),
                    "seed {seed} ply {ply} move {mv:?}"
                );
            }
        }
    }
}

#[test]
fn root_never_returns_a_repeating_move() {
    let params = RandomTreeParams {
        forced_repetition_probability: 0.3,
        ..RandomTreeParams::default()
    };
    let mut skipped = 0;
    for seed in SEEDS {
        let tree = random_tree(seed, params).expect("random tree should build");
        for ply in PLIES {
            let mut pos = tree.position();
            let mut search = MateSearch::new(&mut pos);
            let found = search.mate_move_in_odd_ply(ply);
            skipped += search.stats().repetition_skips;
            drop(search);
            if let Some(mv) = found {
                pos.play(mv).expect("returned move is playable");
                assert_eq!(
                    pos.repetition_status(16),
                    RepetitionStatus::NotRepetition,
                    "seed {seed} ply {ply}"
                );
            }
        }
    }
    assert!(skipped > 0);
}

#[test]
fn solver_agrees_with_free_functions() {
    let solver = MateSolver::default();
    for seed in SEEDS.take(40) {
        let tree = tree_for(seed);
        let mut pos = tree.position();
        let outcome = solver.solve_with_ply(&mut pos, 5).expect("ply is valid");
        assert!(!outcome.aborted);
        assert_eq!(outcome.mate_move, mate_move_in_odd_ply(&mut pos, 5));
        assert_eq!(
            solver.is_mate(&mut pos, 5).expect("ply is valid"),
            mate_in_odd_ply(&mut pos, 5)
        );
    }
}
