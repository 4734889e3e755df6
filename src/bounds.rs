//! Axis-aligned bounds and the fixed corner/edge numbering shared by cuboids and frames.
//!
//! Corner `i` of a box takes the high side of axis `k` when bit `k` of `i` is set:
//!
//! ```text
//!        6-------7
//!       /|      /|        z
//!      4-------5 |        |  y
//!      | 2-----|-3        | /
//!      |/      |/         |/
//!      0-------1          +---- x
//! ```

use glam::DVec3;

/// Edges of a box as corner index pairs: 4 bottom, 4 top, 4 vertical.
///
/// Every pair differs in exactly one bit, so each edge runs parallel to one axis.
pub const BOX_EDGES: [[usize; 2]; 12] = [
    [0, 1], [1, 3], [3, 2], [2, 0], // bottom (z low)
    [4, 5], [5, 7], [7, 6], [6, 4], // top (z high)
    [0, 4], [1, 5], [2, 6], [3, 7], // vertical
];

/// Closed axis-aligned box in 3D.
///
/// Invariant: `min <= max` on every axis.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    /// Low corner (inclusive)
    pub min: DVec3,
    /// High corner (inclusive)
    pub max: DVec3,
}

impl Bounds {
    /// Creates bounds from two corners.
    ///
    /// Debug-asserts that `min <= max` on all axes.
    pub fn new(min: DVec3, max: DVec3) -> Self {
        debug_assert!(
            min.cmple(max).all(),
            "bounds min must be <= max on all axes"
        );
        Bounds { min, max }
    }

    /// Creates bounds from the `(xmin, xmax, ymin, ymax, zmin, zmax)` layout.
    pub fn from_array(b: [f64; 6]) -> Self {
        Bounds::new(DVec3::new(b[0], b[2], b[4]), DVec3::new(b[1], b[3], b[5]))
    }

    /// Returns the `(xmin, xmax, ymin, ymax, zmin, zmax)` layout.
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.min.x, self.max.x, self.min.y, self.max.y, self.min.z, self.max.z,
        ]
    }

    /// Degenerate bounds holding a single point.
    pub fn from_point(p: DVec3) -> Self {
        Bounds { min: p, max: p }
    }

    /// Smallest bounds enclosing all `points`, or `None` if there are none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = DVec3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds::from_point(first);
        for p in iter {
            bounds.expand(p);
        }
        Some(bounds)
    }

    /// Grows the bounds to include `p`.
    #[inline]
    pub fn expand(&mut self, p: DVec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Side lengths per axis.
    #[inline]
    pub fn extent(&self) -> DVec3 {
        self.max - self.min
    }

    /// Geometric center.
    #[inline]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Axis (0 = x, 1 = y, 2 = z) with the largest extent; x wins ties, then y.
    pub fn widest_axis(&self) -> usize {
        let e = self.extent();
        if e.x >= e.y && e.x >= e.z {
            0
        } else if e.y >= e.z {
            1
        } else {
            2
        }
    }

    /// Closed containment test.
    #[inline]
    pub fn contains_point(&self, p: DVec3) -> bool {
        self.min.cmple(p).all() && p.cmple(self.max).all()
    }

    /// True if `other` lies entirely inside these bounds.
    #[inline]
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        self.min.cmple(other.min).all() && other.max.cmple(self.max).all()
    }

    /// True if the two closed boxes share any point, boundaries included.
    #[inline]
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    /// Squared distance from `p` to the closest point of the box; zero inside.
    #[inline]
    pub fn distance_squared_to(&self, p: DVec3) -> f64 {
        let below = (self.min - p).max(DVec3::ZERO);
        let above = (p - self.max).max(DVec3::ZERO);
        (below + above).length_squared()
    }

    /// Corner `i` following the bit convention (bit `k` selects the high side of axis `k`).
    #[inline]
    pub fn corner(&self, i: usize) -> DVec3 {
        DVec3::new(
            if i & 1 != 0 { self.max.x } else { self.min.x },
            if i & 2 != 0 { self.max.y } else { self.min.y },
            if i & 4 != 0 { self.max.z } else { self.min.z },
        )
    }

    /// All 8 corners in bit-convention order.
    pub fn corners(&self) -> [DVec3; 8] {
        std::array::from_fn(|i| self.corner(i))
    }
}
