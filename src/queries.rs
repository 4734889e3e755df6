//! Spatial query implementations for [`PartitionTree`].
//!
//! Every query walks the arena with an explicit stack and prunes subtrees by
//! their exact node bounds. Methods taking a `results` vector clear it first.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::DVec3;

use crate::bounds::Bounds;
use crate::cuboid::Cuboid;
use crate::partition_tree::{NodeId, NodeKind, PartitionTree};

/// A point id with its squared distance to the query position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    /// Point id
    pub id: usize,
    /// Squared Euclidean distance to the query position
    pub distance_squared: f64,
}

impl Eq for Neighbor {}

impl Ord for Neighbor {
    /// Closer first, lower id first among equal distances.
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance_squared
            .total_cmp(&other.distance_squared)
            .then(self.id.cmp(&other.id))
    }
}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartitionTree {
    /// Up to `k` closest points within `max_distance_squared`, sorted by [`Neighbor`] order.
    ///
    /// Branch and bound: the child nearer to `p` is visited first, and a subtree is
    /// skipped once its bounds are farther than the current k-th best.
    fn nearest_within(&self, p: DVec3, k: usize, max_distance_squared: f64) -> Vec<Neighbor> {
        let Some(root) = self.root() else {
            return Vec::new();
        };
        if k == 0 {
            return Vec::new();
        }

        // max-heap: the worst kept candidate is on top
        let mut best: BinaryHeap<Neighbor> = BinaryHeap::with_capacity(k + 1);
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index()];
            let reach = node.bounds.distance_squared_to(p);
            if reach > max_distance_squared || worse_than_kept(&best, k, reach) {
                continue;
            }
            match node.kind {
                NodeKind::Leaf => {
                    for &point_id in &self.ids[node.start..node.end] {
                        let candidate = Neighbor {
                            id: point_id,
                            distance_squared: self.points[point_id].distance_squared(p),
                        };
                        if candidate.distance_squared > max_distance_squared {
                            continue;
                        }
                        if best.len() < k {
                            best.push(candidate);
                        } else if best.peek().is_some_and(|worst| candidate < *worst) {
                            let _ = best.pop();
                            best.push(candidate);
                        }
                    }
                }
                NodeKind::Branch { left, right, .. } => {
                    let (near, far) = self.order_children(left, right, p);
                    stack.push(far);
                    stack.push(near);
                }
            }
        }
        best.into_sorted_vec()
    }

    fn order_children(&self, left: NodeId, right: NodeId, p: DVec3) -> (NodeId, NodeId) {
        let dl = self.nodes[left.index()].bounds.distance_squared_to(p);
        let dr = self.nodes[right.index()].bounds.distance_squared_to(p);
        if dr < dl { (right, left) } else { (left, right) }
    }

    /// Id of the point closest to `p`; lower ids win ties.
    ///
    /// `None` only for an empty tree.
    pub fn find_closest_point(&self, p: DVec3) -> Option<usize> {
        self.nearest_within(p, 1, f64::INFINITY)
            .first()
            .map(|n| n.id)
    }

    /// Closest point no farther than `radius` from `p`, with its squared distance.
    ///
    /// Returns `None` when no point lies within `radius`.
    pub fn find_closest_point_within_radius(&self, radius: f64, p: DVec3) -> Option<Neighbor> {
        if radius < 0.0 || radius.is_nan() {
            return None;
        }
        self.nearest_within(p, 1, radius * radius).first().copied()
    }

    /// The `n` closest points to `p`, nearest first, ties broken by lower id.
    ///
    /// Fewer than `n` ids are returned when the tree holds fewer points.
    pub fn find_closest_n_points(&self, n: usize, p: DVec3, results: &mut Vec<usize>) {
        results.clear();
        results.extend(
            self.nearest_within(p, n, f64::INFINITY)
                .iter()
                .map(|neighbor| neighbor.id),
        );
    }

    /// All points whose distance to `p` is at most `radius`, in no particular order.
    ///
    /// An infinite radius takes every point; a negative or NaN radius takes none.
    pub fn find_points_within_radius(&self, radius: f64, p: DVec3, results: &mut Vec<usize>) {
        results.clear();
        let Some(root) = self.root() else {
            return;
        };
        if radius < 0.0 || radius.is_nan() {
            return;
        }
        let radius_squared = radius * radius;

        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index()];
            if node.bounds.distance_squared_to(p) > radius_squared {
                continue;
            }
            match node.kind {
                NodeKind::Leaf => results.extend(
                    self.ids[node.start..node.end]
                        .iter()
                        .copied()
                        .filter(|&i| self.points[i].distance_squared(p) <= radius_squared),
                ),
                NodeKind::Branch { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
    }

    /// All points inside the closed box `area`.
    ///
    /// Subtrees whose bounds miss `area` are pruned; subtrees fully inside it are
    /// taken whole without testing each point.
    pub fn find_points_within_area(&self, area: &Bounds, results: &mut Vec<usize>) {
        results.clear();
        let Some(root) = self.root() else {
            return;
        };

        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index()];
            if !area.intersects(&node.bounds) {
                continue;
            }
            if area.contains_bounds(&node.bounds) {
                results.extend_from_slice(&self.ids[node.start..node.end]);
                continue;
            }
            match node.kind {
                NodeKind::Leaf => results.extend(
                    self.ids[node.start..node.end]
                        .iter()
                        .copied()
                        .filter(|&i| area.contains_point(self.points[i])),
                ),
                NodeKind::Branch { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
    }

    /// All points inside `cuboid`.
    ///
    /// The candidates of the cuboid's enclosing box are collected first, then each
    /// one is checked against the 6 face planes.
    pub fn find_points_within_cuboid(&self, cuboid: &Cuboid, results: &mut Vec<usize>) {
        self.find_points_within_area(&cuboid.bounds(), results);
        let planes = cuboid.half_spaces();
        results.retain(|&i| {
            let p = self.points[i];
            planes.iter().all(|plane| plane.signed_distance(p) <= 0.0)
        });
    }
}

fn worse_than_kept(best: &BinaryHeap<Neighbor>, k: usize, distance_squared: f64) -> bool {
    best.len() >= k
        && best
            .peek()
            .is_some_and(|worst| distance_squared > worst.distance_squared)
}
