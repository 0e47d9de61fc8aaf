//! Incremental construction and validation of `GameTree` graphs.

use std::collections::HashSet;

use crate::game_tree::tree_position::{EdgeFlags, GameTree, NodeId, TreeEdge, TreeMove, TreeNode};
use crate::mate_search_errors::{MateSearchError, MateSearchResult};
use crate::position::repetition::RepetitionStatus;

/// Builds a game graph node by node. The first node added is the root.
#[derive(Debug, Clone, Default)]
pub struct GameTreeBuilder {
    nodes: Vec<TreeNode>,
}

impl GameTreeBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, in_check: bool) -> NodeId {
        self.nodes.push(TreeNode {
            in_check,
            ..TreeNode::default()
        });
        self.nodes.len() - 1
    }

    pub fn set_pinned(&mut self, node: NodeId, pinned: u64) -> &mut Self {
        self.nodes[node].pinned = pinned;
        self
    }

    pub fn set_repetition(&mut self, node: NodeId, status: RepetitionStatus) -> &mut Self {
        self.nodes[node].forced_repetition = Some(status);
        self
    }

    pub fn add_edge(&mut self, from: NodeId, to: NodeId, mv: u16, flags: EdgeFlags) -> &mut Self {
        self.add_piece_edge(from, to, mv, 0, flags)
    }

    pub fn add_piece_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        mv: u16,
        piece: u8,
        flags: EdgeFlags,
    ) -> &mut Self {
        self.nodes[from].edges.push(TreeEdge {
            mv: TreeMove(mv),
            to,
            piece,
            flags,
        });
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Validate the graph and freeze it.
    ///
    /// Rejected: an empty graph, dangling targets, duplicate move labels at a
    /// node, pieces outside `0..64`, a checking move that lands on a node not in
    /// check (or the reverse), and self-check flags on moves that are neither
    /// king moves nor pinned-piece moves.
    pub fn build(self) -> MateSearchResult<GameTree> {
        if self.nodes.is_empty() {
            return Err(MateSearchError::InvalidTree("tree has no nodes".to_owned()));
        }

        for (id, node) in self.nodes.iter().enumerate() {
            let mut seen = HashSet::with_capacity(node.edges.len());
            for edge in &node.edges {
                let Some(target) = self.nodes.get(edge.to) else {
                    return Err(MateSearchError::InvalidTree(format!(
                        "node {id} move {} targets missing node {}",
                        edge.mv.0, edge.to
                    )));
                };
                if !seen.insert(edge.mv) {
                    return Err(MateSearchError::InvalidTree(format!(
                        "node {id} has duplicate move {}",
                        edge.mv.0
                    )));
                }
                if edge.piece >= 64 {
                    return Err(MateSearchError::InvalidTree(format!(
                        "node {id} move {} uses piece index {}",
                        edge.mv.0, edge.piece
                    )));
                }
                if edge.flags.gives_check != target.in_check {
                    return Err(MateSearchError::InvalidTree(format!(
                        "node {id} move {} check flag disagrees with node {}",
                        edge.mv.0, edge.to
                    )));
                }
                let pinned_piece = node.pinned & (1u64 << edge.piece) != 0;
                if edge.flags.exposes_king && !edge.flags.king_move && !pinned_piece {
                    return Err(MateSearchError::InvalidTree(format!(
                        "node {id} move {} exposes the king without a king or pinned piece",
                        edge.mv.0
                    )));
                }
            }
        }

        Ok(GameTree {
            nodes: self.nodes,
            root: 0,
        })
    }
}
