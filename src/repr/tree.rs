//! Arena-allocated decision tree and read-only accessors.
//!
//! The tree is stored as a flat arena of nodes addressed by [`NodeId`], with
//! index 0 as the root. This avoids recursive `Box` allocations, keeps
//! traversal cache-friendly, and gives both recursive and explicit-stack
//! walks for free. Nodes hold either a class prediction (leaves, with their
//! training-time class histogram) or a `(feature, threshold)` split with two
//! child ids.
//!
//! Trees are immutable once built; construction happens in
//! `training::TreeGrower`.

use ndarray::ArrayView1;

/// Index of a node inside the tree arena.
pub type NodeId = u32;

/// The root node id.
pub const ROOT: NodeId = 0;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    /// Terminal node: majority-class prediction plus the class histogram of
    /// the training samples that reached it.
    Leaf {
        prediction: usize,
        histogram: Vec<u32>,
    },
    /// Internal node: samples with `value <= threshold` on `feature` go left.
    Split {
        feature: usize,
        threshold: f64,
        left: NodeId,
        right: NodeId,
    },
}

/// Structural validation errors for [`Tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeValidationError {
    /// Tree has no nodes.
    EmptyTree,
    /// A child pointer references an out-of-bounds node.
    ChildOutOfBounds {
        node: NodeId,
        side: &'static str,
        child: NodeId,
        n_nodes: usize,
    },
    /// A node references itself as a child.
    SelfLoop { node: NodeId },
    /// A node was reached by more than one path (DAG) or due to a cycle.
    DuplicateVisit { node: NodeId },
    /// A cycle was detected during traversal.
    CycleDetected { node: NodeId },
    /// A node exists in storage but is unreachable from the root.
    UnreachableNode { node: NodeId },
}

/// An immutable, fully built classification tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub(crate) fn from_nodes(nodes: Vec<Node>) -> Self {
        debug_assert!(!nodes.is_empty(), "a built tree has at least a root leaf");
        Self { nodes }
    }

    /// Number of nodes in the tree.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaf nodes.
    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Check if a node is a leaf.
    #[inline]
    pub fn is_leaf(&self, node: NodeId) -> bool {
        matches!(self.nodes[node as usize], Node::Leaf { .. })
    }

    /// `(feature, threshold)` of an internal node, `None` for leaves.
    #[inline]
    pub fn split(&self, node: NodeId) -> Option<(usize, f64)> {
        match self.nodes[node as usize] {
            Node::Split {
                feature, threshold, ..
            } => Some((feature, threshold)),
            Node::Leaf { .. } => None,
        }
    }

    /// `(left, right)` children of an internal node, `None` for leaves.
    #[inline]
    pub fn children(&self, node: NodeId) -> Option<(NodeId, NodeId)> {
        match self.nodes[node as usize] {
            Node::Split { left, right, .. } => Some((left, right)),
            Node::Leaf { .. } => None,
        }
    }

    /// Predicted class of a leaf, `None` for internal nodes.
    #[inline]
    pub fn leaf_prediction(&self, node: NodeId) -> Option<usize> {
        match self.nodes[node as usize] {
            Node::Leaf { prediction, .. } => Some(prediction),
            Node::Split { .. } => None,
        }
    }

    /// Training-time class histogram of a leaf, `None` for internal nodes.
    #[inline]
    pub fn leaf_histogram(&self, node: NodeId) -> Option<&[u32]> {
        match &self.nodes[node as usize] {
            Node::Leaf { histogram, .. } => Some(histogram),
            Node::Split { .. } => None,
        }
    }

    /// Maximum root-to-leaf depth (a single-leaf tree has depth 0).
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(NodeId, usize)> = vec![(ROOT, 0)];
        while let Some((node, depth)) = stack.pop() {
            match self.nodes[node as usize] {
                Node::Leaf { .. } => max_depth = max_depth.max(depth),
                Node::Split { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        max_depth
    }

    /// Traverse from the root to the leaf this sample falls into.
    ///
    /// At each internal node the sample goes left if
    /// `sample[feature] <= threshold`, right otherwise. Cost is O(depth).
    #[inline]
    pub fn traverse_to_leaf(&self, sample: ArrayView1<'_, f64>) -> NodeId {
        let mut node = ROOT;
        loop {
            match self.nodes[node as usize] {
                Node::Leaf { .. } => return node,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if sample[feature] <= threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Predict the class for a single sample.
    #[inline]
    pub fn predict_row(&self, sample: ArrayView1<'_, f64>) -> usize {
        let leaf = self.traverse_to_leaf(sample);
        match self.nodes[leaf as usize] {
            Node::Leaf { prediction, .. } => prediction,
            // traverse_to_leaf only returns leaves
            Node::Split { .. } => unreachable!(),
        }
    }

    /// Validate basic structural invariants for this tree.
    ///
    /// Intended for debug checks and tests: each node must be reachable from
    /// the root by exactly one path, child ids must be in bounds, and there
    /// must be no cycles.
    pub fn validate(&self) -> Result<(), TreeValidationError> {
        let n_nodes = self.nodes.len();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }

        // Iterative DFS with color marking.
        // 0 = unvisited, 1 = visiting, 2 = done
        let mut color = vec![0u8; n_nodes];
        let mut stack: Vec<(NodeId, u8)> = vec![(ROOT, 0)];

        while let Some((node, phase)) = stack.pop() {
            let node_usize = node as usize;

            match phase {
                0 => {
                    match color[node_usize] {
                        0 => {}
                        1 => return Err(TreeValidationError::CycleDetected { node }),
                        2 => return Err(TreeValidationError::DuplicateVisit { node }),
                        _ => unreachable!(),
                    }

                    color[node_usize] = 1;
                    stack.push((node, 1));

                    if let Node::Split { left, right, .. } = self.nodes[node_usize] {
                        if left == node || right == node {
                            return Err(TreeValidationError::SelfLoop { node });
                        }
                        for (side, child) in [("left", left), ("right", right)] {
                            if child as usize >= n_nodes {
                                return Err(TreeValidationError::ChildOutOfBounds {
                                    node,
                                    side,
                                    child,
                                    n_nodes,
                                });
                            }
                        }
                        stack.push((right, 0));
                        stack.push((left, 0));
                    }
                }
                1 => {
                    color[node_usize] = 2;
                }
                _ => unreachable!(),
            }
        }

        for (i, &c) in color.iter().enumerate() {
            if c == 0 {
                return Err(TreeValidationError::UnreachableNode { node: i as u32 });
            }
        }

        Ok(())
    }
}
