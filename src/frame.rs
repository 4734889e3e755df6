//! Wireframe view of regions: 8 corners and 12 edges per box.

use glam::DVec3;

use crate::bounds::{BOX_EDGES, Bounds};
use crate::cuboid::Cuboid;
use crate::obb::Obb;
use crate::partition_tree::PartitionTree;

/// Corners and edges of one box, ready for line rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionFrame {
    corners: [DVec3; 8],
}

impl RegionFrame {
    /// Frame of an axis-aligned box.
    pub fn from_bounds(bounds: &Bounds) -> Self {
        RegionFrame {
            corners: bounds.corners(),
        }
    }

    /// Frame of a general cuboid.
    pub fn from_cuboid(cuboid: &Cuboid) -> Self {
        RegionFrame {
            corners: *cuboid.corners(),
        }
    }

    /// Frame spanned from `corner` by three edge vectors.
    pub fn from_corner_axes(corner: DVec3, axes: [DVec3; 3]) -> Self {
        RegionFrame::from_cuboid(&Cuboid::from_corner_edges(corner, axes))
    }

    /// Frame of an oriented bounding box.
    pub fn from_obb(obb: &Obb) -> Self {
        RegionFrame::from_cuboid(&obb.to_cuboid())
    }

    /// The 8 corners, numbered as in [`crate::bounds`].
    pub fn corners(&self) -> &[DVec3; 8] {
        &self.corners
    }

    /// The 12 edges as segments: bottom, top, then vertical.
    pub fn edges(&self) -> [(DVec3, DVec3); 12] {
        BOX_EDGES.map(|[a, b]| (self.corners[a], self.corners[b]))
    }

    /// Axis-aligned bounds of the corners.
    pub fn bounds(&self) -> Bounds {
        Cuboid::new(self.corners).bounds()
    }
}

impl PartitionTree {
    /// Frames of the regions at depth `level`, with the clamping of
    /// [`count_at_level`](Self::count_at_level).
    pub fn frames_at_level(&self, level: i32) -> Vec<RegionFrame> {
        self.regions_at_level(level)
            .iter()
            .map(RegionFrame::from_bounds)
            .collect()
    }

    /// Frames along the root-to-leaf path of the region containing `p`.
    pub fn frames_for_point(&self, p: DVec3) -> Vec<RegionFrame> {
        self.region_path_for_point(p)
            .iter()
            .map(RegionFrame::from_bounds)
            .collect()
    }
}
