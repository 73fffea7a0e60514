//! Recursive partition-based tree construction.
//!
//! The grower owns no samples itself: it receives the sample permutation as
//! a mutable slice and hands each child build a disjoint sub-slice obtained
//! from `split_at_mut`. Exclusive range ownership per in-flight node build is
//! the only synchronization discipline in the whole trainer; the borrow
//! checker enforces it, which is what makes the optional `rayon::join`
//! recursion safe without any locking.
//!
//! Every node derives its children's RNG seeds from its own stream before
//! recursing, so the resulting tree depends only on the fit seed and never
//! on scheduling. Sequential and parallel builds produce identical arenas.

use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::data::TrainingSet;
use crate::error::Error;
use crate::repr::{Node, NodeId, Tree};
use crate::utils::Parallelism;

use super::split::{best_split, gini, majority_class, SplitWorkspace};
use super::TreeParams;

/// Node ranges shorter than this are always built on the current thread.
const PARALLEL_SUBTREE_MIN: usize = 512;

/// Builds one decision tree over a sample permutation range.
pub(crate) struct TreeGrower<'a> {
    data: TrainingSet<'a>,
    max_features: usize,
    depth_limit: Option<u32>,
    parallelism: Parallelism,
}

impl<'a> TreeGrower<'a> {
    pub fn new(data: TrainingSet<'a>, params: &TreeParams, parallelism: Parallelism) -> Self {
        Self {
            data,
            max_features: params.feature_subset.max_features(data.n_features()),
            depth_limit: params.depth_limit,
            parallelism,
        }
    }

    /// Grow a tree over the full permutation.
    pub fn grow(&self, samples: &mut [usize], seed: u64) -> Result<Tree, Error> {
        let mut nodes = Vec::new();
        let mut workspace = SplitWorkspace::new(self.data.n_classes(), self.data.n_features());
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        self.build(samples, 0, &mut rng, &mut workspace, &mut nodes)?;
        Ok(Tree::from_nodes(nodes))
    }

    /// Build the node owning `samples`, returning its arena id.
    ///
    /// Nodes are laid out pre-order: parent, then the whole left subtree,
    /// then the whole right subtree. The grafting path below reproduces the
    /// same layout.
    fn build(
        &self,
        samples: &mut [usize],
        depth: u32,
        rng: &mut Xoshiro256PlusPlus,
        workspace: &mut SplitWorkspace,
        nodes: &mut Vec<Node>,
    ) -> Result<NodeId, Error> {
        let range_len = samples.len();
        let histogram = self.data.class_histogram(samples);
        let impurity = gini(&histogram, range_len);

        if range_len <= 1 || impurity == 0.0 {
            return Ok(push_leaf(nodes, histogram));
        }

        if let Some(limit) = self.depth_limit {
            if depth >= limit {
                return Err(Error::ResourceExceeded { limit });
            }
        }

        let candidate = best_split(
            &self.data,
            samples,
            &histogram,
            impurity,
            self.max_features,
            rng,
            workspace,
            self.parallelism,
        );
        let Some(candidate) = candidate else {
            // No cut strictly improves on this node's impurity.
            return Ok(push_leaf(nodes, histogram));
        };

        let split = partition_samples(&self.data, samples, candidate.feature, candidate.threshold);
        if split != candidate.left_len {
            return Err(Error::invariant(format!(
                "partition sent {split} of {range_len} samples left, sweep expected {}",
                candidate.left_len
            )));
        }

        let id = nodes.len() as NodeId;
        nodes.push(Node::Leaf {
            prediction: 0,
            histogram: Vec::new(),
        }); // placeholder until both children exist

        // Child seeds come from the parent stream, fixed before recursing.
        let left_seed = rng.next_u64();
        let right_seed = rng.next_u64();

        let (left_samples, right_samples) = samples.split_at_mut(split);

        let (left, right) = if self.parallelism.is_parallel() && range_len >= PARALLEL_SUBTREE_MIN {
            let (left_fragment, right_fragment) = self.parallelism.maybe_join(
                || self.build_fragment(left_samples, depth + 1, left_seed),
                || self.build_fragment(right_samples, depth + 1, right_seed),
            );
            let left = graft(nodes, left_fragment?);
            let right = graft(nodes, right_fragment?);
            (left, right)
        } else {
            let mut left_rng = Xoshiro256PlusPlus::seed_from_u64(left_seed);
            let left = self.build(left_samples, depth + 1, &mut left_rng, workspace, nodes)?;
            let mut right_rng = Xoshiro256PlusPlus::seed_from_u64(right_seed);
            let right = self.build(right_samples, depth + 1, &mut right_rng, workspace, nodes)?;
            (left, right)
        };

        nodes[id as usize] = Node::Split {
            feature: candidate.feature,
            threshold: candidate.threshold,
            left,
            right,
        };
        Ok(id)
    }

    /// Build a subtree into its own arena, for concurrent child builds.
    fn build_fragment(
        &self,
        samples: &mut [usize],
        depth: u32,
        seed: u64,
    ) -> Result<Vec<Node>, Error> {
        let mut nodes = Vec::new();
        let mut workspace = SplitWorkspace::new(self.data.n_classes(), self.data.n_features());
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        self.build(samples, depth, &mut rng, &mut workspace, &mut nodes)?;
        Ok(nodes)
    }
}

fn push_leaf(nodes: &mut Vec<Node>, histogram: Vec<u32>) -> NodeId {
    let id = nodes.len() as NodeId;
    nodes.push(Node::Leaf {
        prediction: majority_class(&histogram),
        histogram,
    });
    id
}

/// Splice a subtree arena onto the end of `nodes`, returning the grafted
/// root's id. Child ids inside the fragment are local and get offset.
fn graft(nodes: &mut Vec<Node>, fragment: Vec<Node>) -> NodeId {
    let offset = nodes.len() as NodeId;
    nodes.extend(fragment.into_iter().map(|node| match node {
        Node::Split {
            feature,
            threshold,
            left,
            right,
        } => Node::Split {
            feature,
            threshold,
            left: left + offset,
            right: right + offset,
        },
        leaf => leaf,
    }));
    offset
}

/// Reorder `samples` in place so values `<= threshold` on `feature` come
/// first; returns the left-side length.
///
/// Two-pointer scan: the left cursor advances over samples that belong left,
/// everything else is swapped back to a retreating right cursor. After this
/// returns, the two sides stay disjoint for the rest of the build.
pub(crate) fn partition_samples(
    data: &TrainingSet<'_>,
    samples: &mut [usize],
    feature: usize,
    threshold: f64,
) -> usize {
    let mut left = 0;
    let mut right = samples.len();
    while left < right {
        if data.feature(samples[left], feature) <= threshold {
            left += 1;
        } else {
            right -= 1;
            samples.swap(left, right);
        }
    }
    left
}
