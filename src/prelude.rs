//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the crate.
//! Users can import everything they need with:
//!
//! ```
//! use pointloc::prelude::*;
//! ```

pub use crate::{
    Bounds, Cuboid, CylinderSearch, IndexError, Neighbor, NodeId, Obb, PartitionTree,
    PointCloud, PointLocator, PointSet, RegionFrame, RegionPath, SplitAxis, SplitThreshold,
    TreeConfig, compute_obb,
};
