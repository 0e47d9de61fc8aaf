//! Explicit game graph implementing the mate-search board contract.
//!
//! Each node is a position; each edge is a move annotated with the facts a
//! real board would compute (does it check, does it evade, is it a king or
//! pinned-piece move that exposes the king). `TreePosition` walks the graph
//! with a make/unmake history so the solver can be run, measured, and its
//! restoration discipline verified without a full shogi board.

use crate::mate_search_errors::{MateSearchError, MateSearchResult};
use crate::position::candidate_list::CandidateList;
use crate::position::mate_position::MatePosition;
use crate::position::repetition::RepetitionStatus;

pub type NodeId = usize;

/// Move label, unique among the edges leaving one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeMove(pub u16);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeFlags {
    pub gives_check: bool,
    /// Only meaningful when the mover is in check.
    pub evades: bool,
    pub king_move: bool,
    /// Self-check. Only honoured for king moves and pinned pieces.
    pub exposes_king: bool,
}

impl EdgeFlags {
    pub const CHECK: EdgeFlags = EdgeFlags {
        gives_check: true,
        evades: true,
        king_move: false,
        exposes_king: false,
    };

    pub const QUIET: EdgeFlags = EdgeFlags {
        gives_check: false,
        evades: true,
        king_move: false,
        exposes_king: false,
    };

    #[inline]
    pub const fn king_move(mut self) -> Self {
        self.king_move = true;
        self
    }

    #[inline]
    pub const fn exposing_king(mut self) -> Self {
        self.exposes_king = true;
        self
    }

    #[inline]
    pub const fn not_evading(mut self) -> Self {
        self.evades = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEdge {
    pub mv: TreeMove,
    pub to: NodeId,
    /// Piece index (`0..64`) checked against the node's pinned mask.
    pub piece: u8,
    pub flags: EdgeFlags,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNode {
    pub in_check: bool,
    pub pinned: u64,
    /// Verdict reported regardless of history when set.
    pub forced_repetition: Option<RepetitionStatus>,
    pub edges: Vec<TreeEdge>,
}

impl TreeNode {
    #[inline]
    fn edge(&self, mv: TreeMove) -> Option<&TreeEdge> {
        self.edges.iter().find(|edge| edge.mv == mv)
    }

    /// Legality of a pseudo-legal edge; only king and pinned moves can fail.
    #[inline]
    fn edge_is_legal(edge: &TreeEdge, pinned: u64) -> bool {
        let pinned_piece = pinned & (1u64 << (edge.piece & 63)) != 0;
        if edge.flags.king_move || pinned_piece {
            !edge.flags.exposes_king
        } else {
            true
        }
    }

    fn has_legal_evasion(&self) -> bool {
        self.edges
            .iter()
            .any(|edge| edge.flags.evades && Self::edge_is_legal(edge, self.pinned))
    }
}

/// Validated, immutable game graph. Build one with `GameTreeBuilder`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameTree {
    pub(crate) nodes: Vec<TreeNode>,
    pub(crate) root: NodeId,
}

impl GameTree {
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Position at the root with empty history.
    #[inline]
    pub fn position(&self) -> TreePosition<'_> {
        TreePosition::new(self, self.root)
    }

    /// Position at `start` with empty history.
    pub fn position_at(&self, start: NodeId) -> MateSearchResult<TreePosition<'_>> {
        if start >= self.nodes.len() {
            return Err(MateSearchError::InvalidTree(format!(
                "start node {start} does not exist"
            )));
        }
        Ok(TreePosition::new(self, start))
    }
}

#[derive(Debug, Clone)]
pub struct TreePosition<'t> {
    tree: &'t GameTree,
    current: NodeId,
    history: Vec<NodeId>,
}

/// Check context for a tree node: just the node it was computed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeCheckInfo {
    pub node: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeUndo {
    previous: NodeId,
}

impl PartialEq for TreePosition<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree)
            && self.current == other.current
            && self.history == other.history
    }
}

impl Eq for TreePosition<'_> {}

impl<'t> TreePosition<'t> {
    fn new(tree: &'t GameTree, start: NodeId) -> Self {
        Self {
            tree,
            current: start,
            history: Vec::new(),
        }
    }

    #[inline]
    pub fn current(&self) -> NodeId {
        self.current
    }

    /// Nodes visited before the current one, oldest first.
    #[inline]
    pub fn history(&self) -> &[NodeId] {
        &self.history
    }

    #[inline]
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    #[inline]
    fn node(&self) -> &'t TreeNode {
        &self.tree.nodes[self.current]
    }

    /// Play a move outside of a search, e.g. to replay a solution line.
    pub fn play(&mut self, mv: TreeMove) -> MateSearchResult<()> {
        let Some(edge) = self.node().edge(mv) else {
            return Err(MateSearchError::InvalidTree(format!(
                "move {mv:?} is not playable from node {}",
                self.current
            )));
        };
        self.history.push(self.current);
        self.current = edge.to;
        Ok(())
    }
}

impl<'t> MatePosition for TreePosition<'t> {
    type Move = TreeMove;
    type Undo = TreeUndo;
    type CheckInfo = TreeCheckInfo;
    type Pinned = u64;

    #[inline]
    fn in_check(&self) -> bool {
        self.node().in_check
    }

    #[inline]
    fn pinned(&self) -> u64 {
        self.node().pinned
    }

    #[inline]
    fn check_info(&self) -> TreeCheckInfo {
        TreeCheckInfo { node: self.current }
    }

    fn generate_checks(&self, moves: &mut CandidateList<TreeMove>) {
        for edge in self.node().edges.iter().filter(|e| e.flags.gives_check) {
            moves.push(edge.mv);
        }
    }

    fn generate_evasions(&self, moves: &mut CandidateList<TreeMove>) {
        for edge in self.node().edges.iter().filter(|e| e.flags.evades) {
            moves.push(edge.mv);
        }
    }

    fn pseudo_legal_move_is_evasion(&self, mv: TreeMove, pinned: u64) -> bool {
        self.node()
            .edge(mv)
            .is_some_and(|edge| edge.flags.evades && TreeNode::edge_is_legal(edge, pinned))
    }

    fn pseudo_legal_move_is_legal(&self, mv: TreeMove, pinned: u64) -> bool {
        self.node()
            .edge(mv)
            .is_some_and(|edge| TreeNode::edge_is_legal(edge, pinned))
    }

    fn move_gives_check(&self, mv: TreeMove, check_info: &TreeCheckInfo) -> bool {
        debug_assert_eq!(check_info.node, self.current, "stale check info");
        self.node()
            .edge(mv)
            .is_some_and(|edge| edge.flags.gives_check)
    }

    fn do_move(
        &mut self,
        mv: TreeMove,
        check_info: &TreeCheckInfo,
        _gives_check: bool,
    ) -> TreeUndo {
        debug_assert_eq!(check_info.node, self.current, "stale check info");
        let Some(edge) = self.node().edge(mv) else {
            panic!("move {mv:?} is not playable from node {}", self.current);
        };
        let undo = TreeUndo {
            previous: self.current,
        };
        self.history.push(self.current);
        self.current = edge.to;
        undo
    }

    fn undo_move(&mut self, mv: TreeMove, undo: TreeUndo) {
        debug_assert!(
            self.tree.nodes[undo.previous]
                .edge(mv)
                .is_some_and(|edge| edge.to == self.current),
            "undo of {mv:?} does not match the last move"
        );
        let previous = self.history.pop();
        debug_assert_eq!(previous, Some(undo.previous));
        self.current = undo.previous;
    }

    fn repetition_status(&self, lookback_plies: u16) -> RepetitionStatus {
        if let Some(status) = self.node().forced_repetition {
            return status;
        }
        let ply = self.history.len();
        let mut distance = 2usize;
        while distance <= lookback_plies as usize && distance <= ply {
            if self.history[ply - distance] == self.current {
                return RepetitionStatus::Draw;
            }
            distance += 2;
        }
        RepetitionStatus::NotRepetition
    }

    fn mate_move_in_1ply(&mut self) -> Option<TreeMove> {
        let node = self.node();
        node.edges
            .iter()
            .filter(|edge| edge.flags.gives_check)
            .filter(|edge| !node.in_check || edge.flags.evades)
            .filter(|edge| TreeNode::edge_is_legal(edge, node.pinned))
            .find(|edge| {
                let target = &self.tree.nodes[edge.to];
                target.in_check && !target.has_legal_evasion()
            })
            .map(|edge| edge.mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_tree::tree_builder::GameTreeBuilder;

    #[test]
    fn do_and_undo_restore_position() {
        let mut b = GameTreeBuilder::new();
        let root = b.add_node(false);
        let checked = b.add_node(true);
        b.add_edge(root, checked, 1, EdgeFlags::CHECK);
        let tree = b.build().expect("tree should validate");

        let mut pos = tree.position();
        let before = pos.clone();
        let ci = pos.check_info();
        let undo = pos.do_move(TreeMove(1), &ci, true);
        assert_eq!(pos.current(), checked);
        assert!(pos.in_check());
        pos.undo_move(TreeMove(1), undo);
        assert_eq!(pos, before);
    }

    #[test]
    fn one_ply_oracle_finds_mate_and_ignores_escapable_checks() {
        let mut b = GameTreeBuilder::new();
        let root = b.add_node(false);
        let escapable = b.add_node(true);
        let mated = b.add_node(true);
        let after_escape = b.add_node(false);
        b.add_edge(root, escapable, 1, EdgeFlags::CHECK);
        b.add_edge(root, mated, 2, EdgeFlags::CHECK);
        b.add_edge(escapable, after_escape, 10, EdgeFlags::QUIET);
        let tree = b.build().expect("tree should validate");

        let mut pos = tree.position();
        assert_eq!(pos.mate_move_in_1ply(), Some(TreeMove(2)));
    }

    #[test]
    fn king_move_into_attack_does_not_count_as_escape() {
        let mut b = GameTreeBuilder::new();
        let root = b.add_node(false);
        let checked = b.add_node(true);
        let after = b.add_node(false);
        b.add_edge(root, checked, 1, EdgeFlags::CHECK);
        b.add_edge(checked, after, 5, EdgeFlags::QUIET.king_move().exposing_king());
        let tree = b.build().expect("tree should validate");

        let mut pos = tree.position();
        assert_eq!(pos.mate_move_in_1ply(), Some(TreeMove(1)));
    }

    #[test]
    fn revisiting_a_node_at_even_distance_is_a_draw() {
        let mut b = GameTreeBuilder::new();
        let a = b.add_node(false);
        let d = b.add_node(true);
        let a2 = b.add_node(false);
        b.add_edge(a, d, 1, EdgeFlags::CHECK);
        b.add_edge(d, a2, 2, EdgeFlags::QUIET);
        b.add_edge(a2, d, 3, EdgeFlags::CHECK);
        let tree = b.build().expect("tree should validate");

        let mut pos = tree.position();
        pos.play(TreeMove(1)).expect("playable");
        assert_eq!(pos.repetition_status(16), RepetitionStatus::NotRepetition);
        pos.play(TreeMove(2)).expect("playable");
        pos.play(TreeMove(3)).expect("playable");
        assert_eq!(pos.repetition_status(16), RepetitionStatus::Draw);
        assert_eq!(pos.repetition_status(1), RepetitionStatus::NotRepetition);
    }

    #[test]
    fn pinned_piece_moves_are_revalidated() {
        let mut b = GameTreeBuilder::new();
        let root = b.add_node(true);
        let after = b.add_node(false);
        b.set_pinned(root, 1 << 4);
        b.add_piece_edge(root, after, 1, 4, EdgeFlags::QUIET.exposing_king());
        let tree = b.build().expect("tree should validate");

        let pos = tree.position();
        assert!(!pos.pseudo_legal_move_is_legal(TreeMove(1), pos.pinned()));
        assert!(pos.pseudo_legal_move_is_legal(TreeMove(1), 0));
        assert!(!pos.pseudo_legal_move_is_legal(TreeMove(9), 0));
    }
}
