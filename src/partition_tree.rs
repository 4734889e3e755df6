//! Static k-d partition tree over a 3D point snapshot.
//!
//! Nodes live in a single arena and refer to their children by [`NodeId`]. Every node
//! owns a contiguous slice of the permuted id array, so a subtree's points can be
//! enumerated without visiting its leaves. All traversals use explicit stacks.
//!
//! Spatial queries (nearest, radius, box, cuboid) are implemented in [`crate::queries`].

use std::time::Instant;

use glam::DVec3;
use tracing::{debug, warn};

use crate::bounds::Bounds;
use crate::error::{IndexError, Result};

const DEFAULT_MAX_POINTS_PER_LEAF: usize = 16;
const DEFAULT_MAX_DEPTH: usize = 20;

/// Ordered chain of region bounds from the root down to one node.
pub type RegionPath = Vec<Bounds>;

/// How the cutting axis of a node is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum SplitAxis {
    /// x, y, z in turn by depth
    Cycle,
    /// Axis of the largest extent of the node's bounds
    #[default]
    WidestExtent,
}

/// Where along the cutting axis a node is split.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum SplitThreshold {
    /// Median coordinate; children get equal point counts
    #[default]
    Median,
    /// Middle of the node's bounds; falls back to the median if one side would be empty
    Midpoint,
}

/// Build parameters for [`PartitionTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TreeConfig {
    /// A node with at most this many points becomes a leaf
    pub max_points_per_leaf: usize,
    /// Nodes at this depth are never split
    pub max_depth: usize,
    /// Cutting axis rule
    pub split_axis: SplitAxis,
    /// Cutting threshold rule
    pub split_threshold: SplitThreshold,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            max_points_per_leaf: DEFAULT_MAX_POINTS_PER_LEAF,
            max_depth: DEFAULT_MAX_DEPTH,
            split_axis: SplitAxis::default(),
            split_threshold: SplitThreshold::default(),
        }
    }
}

impl TreeConfig {
    /// Sets the leaf size bound.
    #[must_use]
    pub fn with_max_points_per_leaf(mut self, max_points_per_leaf: usize) -> Self {
        self.max_points_per_leaf = max_points_per_leaf;
        self
    }

    /// Sets the depth bound.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the cutting axis rule.
    #[must_use]
    pub fn with_split_axis(mut self, split_axis: SplitAxis) -> Self {
        self.split_axis = split_axis;
        self
    }

    /// Sets the cutting threshold rule.
    #[must_use]
    pub fn with_split_threshold(mut self, split_threshold: SplitThreshold) -> Self {
        self.split_threshold = split_threshold;
        self
    }
}

/// Handle to a node of one [`PartitionTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the tree's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum NodeKind {
    Leaf,
    Branch {
        axis: usize,
        value: f64,
        left: NodeId,
        right: NodeId,
    },
}

/// One region of the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    pub(crate) bounds: Bounds,
    pub(crate) depth: usize,
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) kind: NodeKind,
}

impl TreeNode {
    /// Exact bounds of the node's points.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Distance from the root (root = 0).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of points in the subtree.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false; every node holds at least one point.
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// True if the node has no children.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf)
    }

    /// Low-side child.
    pub fn left(&self) -> Option<NodeId> {
        match self.kind {
            NodeKind::Branch { left, .. } => Some(left),
            NodeKind::Leaf => None,
        }
    }

    /// High-side child.
    pub fn right(&self) -> Option<NodeId> {
        match self.kind {
            NodeKind::Branch { right, .. } => Some(right),
            NodeKind::Leaf => None,
        }
    }

    /// Cutting axis and threshold; points below the threshold descend left.
    pub fn split(&self) -> Option<(usize, f64)> {
        match self.kind {
            NodeKind::Branch { axis, value, .. } => Some((axis, value)),
            NodeKind::Leaf => None,
        }
    }
}

/// Binary space partition over a fixed snapshot of points.
///
/// # Examples
/// ```
/// use glam::DVec3;
/// use pointloc::{PartitionTree, TreeConfig};
///
/// let points: Vec<DVec3> = (0..64).map(|i| DVec3::new(i as f64, 0.0, 0.0)).collect();
/// let config = TreeConfig::default().with_max_points_per_leaf(8);
/// let tree = PartitionTree::build(&points, config).unwrap();
///
/// assert_eq!(tree.max_level(), 3);
/// assert_eq!(tree.count_at_level(3), 8);
/// assert_eq!(tree.count_at_level(-1), 0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct PartitionTree {
    pub(crate) config: TreeConfig,
    pub(crate) points: Vec<DVec3>,
    /// Point ids permuted so that every node covers `ids[start..end]`
    pub(crate) ids: Vec<usize>,
    /// Arena; the root is at index 0
    pub(crate) nodes: Vec<TreeNode>,
}

impl PartitionTree {
    /// Builds a tree over a copy of `points`; point `i` gets id `i`.
    ///
    /// # Errors
    /// Returns [`IndexError::InvalidInput`] if `points` is empty or holds a non-finite coordinate.
    pub fn build(points: &[DVec3], config: TreeConfig) -> Result<Self> {
        if points.is_empty() {
            return Err(IndexError::invalid("no points to build"));
        }
        if !points.iter().all(|p| p.is_finite()) {
            return Err(IndexError::invalid("point coordinates must be finite"));
        }

        let started = Instant::now();
        let mut tree = PartitionTree {
            config,
            points: points.to_vec(),
            ids: (0..points.len()).collect(),
            nodes: Vec::with_capacity(2 * points.len() / config.max_points_per_leaf.max(1) + 1),
        };

        let root_bounds = tree.range_bounds(0, points.len());
        tree.nodes.push(TreeNode {
            bounds: root_bounds,
            depth: 0,
            start: 0,
            end: points.len(),
            kind: NodeKind::Leaf,
        });

        let mut pending = vec![NodeId(0)];
        while let Some(id) = pending.pop() {
            if let Some((left, right)) = tree.split_node(id) {
                pending.push(right);
                pending.push(left);
            }
        }

        debug!(
            points = tree.points.len(),
            nodes = tree.nodes.len(),
            max_level = tree.max_level(),
            elapsed = ?started.elapsed(),
            "built partition tree"
        );
        Ok(tree)
    }

    /// Splits a leaf in place if the build rules allow it, returning the new children.
    fn split_node(&mut self, id: NodeId) -> Option<(NodeId, NodeId)> {
        let TreeNode {
            bounds,
            depth,
            start,
            end,
            ..
        } = self.nodes[id.0];
        let count = end - start;
        if count <= self.config.max_points_per_leaf.max(1) || depth >= self.config.max_depth {
            return None;
        }

        let extent = bounds.extent();
        let axis = match self.config.split_axis {
            SplitAxis::Cycle if extent[depth % 3] > 0.0 => depth % 3,
            _ => bounds.widest_axis(),
        };
        if extent[axis] <= 0.0 {
            // all points coincide
            return None;
        }

        let (mid, value) = match self.config.split_threshold {
            SplitThreshold::Midpoint => {
                let value = bounds.center()[axis];
                let m = self.partition_by(start, end, axis, |c| c < value);
                if m == 0 || m == count {
                    self.median_split(start, end, axis)
                } else {
                    (start + m, value)
                }
            }
            SplitThreshold::Median => self.median_split(start, end, axis),
        };

        let left = self.push_node(start, mid, depth + 1);
        let right = self.push_node(mid, end, depth + 1);
        self.nodes[id.0].kind = NodeKind::Branch {
            axis,
            value,
            left,
            right,
        };
        Some((left, right))
    }

    /// Cuts `ids[start..end]` at its median on `axis`.
    ///
    /// Returns the first index of the high side and the threshold; every coordinate
    /// on the low side is strictly below the threshold.
    fn median_split(&mut self, start: usize, end: usize, axis: usize) -> (usize, f64) {
        let points = &self.points;
        let half = (end - start) / 2;
        let (_, nth, _) = self.ids[start..end]
            .select_nth_unstable_by(half, |&a, &b| points[a][axis].total_cmp(&points[b][axis]));
        let median = points[*nth][axis];

        let below = self.partition_by(start, end, axis, |c| c < median);
        if below > 0 {
            return (start + below, median);
        }

        // the median is also the minimum: cut just above it
        let at_most = self.partition_by(start, end, axis, |c| c <= median);
        let next = self.ids[start + at_most..end]
            .iter()
            .map(|&id| self.points[id][axis])
            .fold(f64::INFINITY, f64::min);
        (start + at_most, next)
    }

    /// Moves ids whose coordinate on `axis` satisfies `low` to the front of the range.
    fn partition_by<F>(&mut self, start: usize, end: usize, axis: usize, low: F) -> usize
    where
        F: Fn(f64) -> bool,
    {
        let slice = &mut self.ids[start..end];
        let mut m = 0;
        for i in 0..slice.len() {
            if low(self.points[slice[i]][axis]) {
                slice.swap(m, i);
                m += 1;
            }
        }
        m
    }

    fn push_node(&mut self, start: usize, end: usize, depth: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        let bounds = self.range_bounds(start, end);
        self.nodes.push(TreeNode {
            bounds,
            depth,
            start,
            end,
            kind: NodeKind::Leaf,
        });
        id
    }

    fn range_bounds(&self, start: usize, end: usize) -> Bounds {
        let first = self.points[self.ids[start]];
        let mut bounds = Bounds::from_point(first);
        for &id in &self.ids[start + 1..end] {
            bounds.expand(self.points[id]);
        }
        bounds
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True for a default-constructed tree that indexes nothing.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Parameters the tree was built with.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Position of point `id` in the build snapshot.
    pub fn point(&self, id: usize) -> Option<DVec3> {
        self.points.get(id).copied()
    }

    /// Bounds of all points.
    pub fn bounds(&self) -> Option<Bounds> {
        self.nodes.first().map(|root| root.bounds)
    }

    /// The root region.
    pub fn root(&self) -> Option<NodeId> {
        (!self.nodes.is_empty()).then_some(NodeId(0))
    }

    /// Node lookup; `None` for handles that do not belong to this tree.
    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Point ids owned by a node's subtree.
    pub fn point_ids(&self, id: NodeId) -> &[usize] {
        self.nodes
            .get(id.0)
            .map_or(&[], |node| &self.ids[node.start..node.end])
    }

    /// Deepest node depth, or -1 for an empty tree.
    pub fn max_level(&self) -> i32 {
        let Some(root) = self.root() else {
            return -1;
        };
        let mut deepest = 0;
        let mut stack = vec![(root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = &self.nodes[id.0];
            if let NodeKind::Branch { left, right, .. } = node.kind {
                stack.push((right, depth + 1));
                stack.push((left, depth + 1));
            }
        }
        depth_to_level(deepest)
    }

    /// Nodes at depth `level`, left to right.
    ///
    /// Negative levels yield nothing; levels past [`max_level`](Self::max_level)
    /// are clamped to it.
    pub fn nodes_at_level(&self, level: i32) -> Vec<NodeId> {
        let mut found = Vec::new();
        let Ok(level) = usize::try_from(level) else {
            return found;
        };
        let Some(root) = self.root() else {
            return found;
        };
        let target = level.min(usize::try_from(self.max_level()).unwrap_or(0));

        let mut stack = vec![(root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            if depth == target {
                found.push(id);
                continue;
            }
            if let NodeKind::Branch { left, right, .. } = self.nodes[id.0].kind {
                stack.push((right, depth + 1));
                stack.push((left, depth + 1));
            }
        }
        found
    }

    /// Number of regions at depth `level`.
    ///
    /// A negative level counts 0. A level past the deepest one reports the
    /// count at the deepest level instead of 0.
    pub fn count_at_level(&self, level: i32) -> usize {
        self.nodes_at_level(level).len()
    }

    /// Bounds of the regions at depth `level`, with the clamping of
    /// [`count_at_level`](Self::count_at_level).
    pub fn regions_at_level(&self, level: i32) -> Vec<Bounds> {
        self.nodes_at_level(level)
            .into_iter()
            .map(|id| self.nodes[id.0].bounds)
            .collect()
    }

    /// Leaf region containing `p`, following each node's split rule from the root.
    ///
    /// Returns `None` when `p` lies outside the root region.
    pub fn locate_region(&self, p: DVec3) -> Option<NodeId> {
        let root = self.root()?;
        if !self.nodes[root.0].bounds.contains_point(p) {
            return None;
        }
        let mut id = root;
        while let NodeKind::Branch {
            axis,
            value,
            left,
            right,
        } = self.nodes[id.0].kind
        {
            id = if p[axis] < value { left } else { right };
        }
        Some(id)
    }

    /// Depth of `target`, found by identity search from the root.
    pub fn node_level(&self, target: NodeId) -> Option<usize> {
        self.path_ids(target).map(|path| path.len() - 1)
    }

    /// Bounds of every node from the root down to `target`, inclusive.
    ///
    /// An empty path means `target` is not reachable in this tree.
    pub fn path_to_node(&self, target: NodeId) -> RegionPath {
        match self.path_ids(target) {
            Some(path) => path.into_iter().map(|id| self.nodes[id.0].bounds).collect(),
            None => {
                warn!(node = target.0, "node is not reachable from the root");
                RegionPath::new()
            }
        }
    }

    /// Root-to-leaf path of the region containing `p`; empty when `p` is outside.
    pub fn region_path_for_point(&self, p: DVec3) -> RegionPath {
        self.locate_region(p)
            .map(|leaf| self.path_to_node(leaf))
            .unwrap_or_default()
    }

    fn path_ids(&self, target: NodeId) -> Option<Vec<NodeId>> {
        let root = self.root()?;
        let mut path: Vec<NodeId> = Vec::new();
        let mut stack = vec![(root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            path.truncate(depth);
            path.push(id);
            if id == target {
                return Some(path);
            }
            if let NodeKind::Branch { left, right, .. } = self.nodes[id.0].kind {
                stack.push((right, depth + 1));
                stack.push((left, depth + 1));
            }
        }
        None
    }
}

fn depth_to_level(depth: usize) -> i32 {
    i32::try_from(depth).unwrap_or(i32::MAX)
}
