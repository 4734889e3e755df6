//! # pointloc - k-d partition tree and point locator for 3D point sets
//!
//! A Rust library for spatial queries over static 3D point sets, such as the
//! vertices of a scanned surface mesh.
//!
//! ## Features
//!
//! - **Partition Tree**: recursive binary subdivision with exact per-region bounds,
//!   level statistics and root-to-region paths
//! - **Point Locator**: lazy, generation-tracked rebuilds with nearest, k-nearest,
//!   radius and box queries
//! - **Cuboid Queries**: points inside arbitrary (non-axis-aligned) hexahedra
//! - **Cylinder Queries**: points near an axis, found by a sphere sweep
//! - **OBB Fitting**: oriented bounding boxes from principal directions
//! - **Region Frames**: 8-corner / 12-edge wireframes of any region
//!
//! ## Quick Start
//!
//! ```rust
//! use glam::DVec3;
//! use pointloc::prelude::*;
//!
//! // A 10 x 10 x 10 lattice of points
//! let cloud: PointCloud = (0..1000)
//!     .map(|i| DVec3::new((i % 10) as f64, ((i / 10) % 10) as f64, (i / 100) as f64))
//!     .collect();
//!
//! // The tree is built on the first query
//! let mut locator = PointLocator::new(cloud);
//!
//! // Points inside an axis-aligned box
//! let mut results = Vec::new();
//! locator
//!     .find_points_within_area(&Bounds::from_array([0.0, 1.0, 0.0, 1.0, 0.0, 1.0]), &mut results)
//!     .unwrap();
//! assert_eq!(results.len(), 8);
//!
//! // Points within 1.0 of the z axis through (5, 5, 0)
//! CylinderSearch::default()
//!     .find(&mut locator, DVec3::new(5.0, 5.0, 0.0), DVec3::Z, 1.0, &mut results)
//!     .unwrap();
//! assert_eq!(results.len(), 50);
//!
//! // Region statistics of the built tree
//! let tree = locator.tree().unwrap();
//! assert_eq!(tree.count_at_level(0), 1);
//! assert_eq!(tree.count_at_level(-1), 0);
//! ```
//!
//! ## How It Works
//!
//! Nodes are stored in a flat arena and reference their children by index. Each
//! node owns a contiguous range of a permuted id array and the exact bounds of
//! those points, so queries prune by bounds and can take whole subtrees at once.
//! Traversals use explicit stacks and never recurse.

pub mod bounds;
pub mod cuboid;
pub mod cylinder;
pub mod error;
pub mod frame;
pub mod locator;
pub mod obb;
pub mod partition_tree;
pub mod prelude;
pub mod queries;

pub use bounds::{BOX_EDGES, Bounds};
pub use cuboid::{Cuboid, HalfSpace};
pub use cylinder::{
    CylinderSearch, MAX_SPHERE_CENTERS, generate_sphere_centers, projection_range,
};
pub use error::IndexError;
pub use frame::RegionFrame;
pub use locator::{PointCloud, PointLocator, PointSet};
pub use obb::{Obb, compute_obb};
pub use partition_tree::{
    NodeId, PartitionTree, RegionPath, SplitAxis, SplitThreshold, TreeConfig, TreeNode,
};
pub use queries::Neighbor;

#[cfg(test)]
mod component_tests;
