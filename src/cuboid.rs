//! General hexahedra given by 8 corners, and the exact half-space containment test.

use glam::DVec3;

use crate::bounds::Bounds;

/// Faces as corner quadruples under the bit convention, wound around each face.
const FACES: [[usize; 4]; 6] = [
    [0, 2, 6, 4], // x low
    [1, 3, 7, 5], // x high
    [0, 1, 5, 4], // y low
    [2, 3, 7, 6], // y high
    [0, 1, 3, 2], // z low
    [4, 5, 7, 6], // z high
];

/// Below this length a face normal is not normalized.
const DEGENERATE_NORMAL: f64 = 1e-12;

/// Possibly non-axis-aligned box given by 8 ordered corners.
///
/// Corner `i` lies on the high side of local axis `k` when bit `k` of `i` is set,
/// the same numbering [`Bounds::corner`] uses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cuboid {
    corners: [DVec3; 8],
}

/// Oriented plane `normal · p + offset = 0`; the cuboid interior is the non-positive side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HalfSpace {
    /// Outward normal, unit length unless the face was degenerate
    pub normal: DVec3,
    /// Plane offset
    pub offset: f64,
}

impl HalfSpace {
    /// Signed value of the plane equation at `p`.
    #[inline]
    pub fn signed_distance(&self, p: DVec3) -> f64 {
        self.normal.dot(p) + self.offset
    }
}

impl Cuboid {
    /// Wraps 8 corners that already follow the bit convention.
    pub fn new(corners: [DVec3; 8]) -> Self {
        Cuboid { corners }
    }

    /// Axis-aligned cuboid with the corners of `bounds`.
    pub fn from_bounds(bounds: &Bounds) -> Self {
        Cuboid::new(bounds.corners())
    }

    /// Cuboid spanned from `origin` by three edge vectors.
    ///
    /// Corner `i` is `origin` plus every `edges[k]` whose bit `k` is set in `i`.
    pub fn from_corner_edges(origin: DVec3, edges: [DVec3; 3]) -> Self {
        Cuboid::new(std::array::from_fn(|i| {
            (0..3)
                .filter(|k| i & (1 << k) != 0)
                .fold(origin, |acc, k| acc + edges[k])
        }))
    }

    /// Cuboid centred at `center` with unit `axes` and `half_extents` along them.
    pub fn from_center_axes(center: DVec3, axes: [DVec3; 3], half_extents: DVec3) -> Self {
        let half = half_extents.to_array();
        Cuboid::new(std::array::from_fn(|i| {
            (0..3).fold(center, |acc, k| {
                let sign = if i & (1 << k) != 0 { 1.0 } else { -1.0 };
                acc + axes[k] * (sign * half[k])
            })
        }))
    }

    /// The 8 corners.
    pub fn corners(&self) -> &[DVec3; 8] {
        &self.corners
    }

    /// Average of the corners.
    pub fn centroid(&self) -> DVec3 {
        self.corners.iter().copied().sum::<DVec3>() / 8.0
    }

    /// Enclosing axis-aligned bounds.
    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::from_point(self.corners[0]);
        for &c in &self.corners[1..] {
            bounds.expand(c);
        }
        bounds
    }

    /// The 6 face planes, oriented so the centroid is on the non-positive side.
    pub fn half_spaces(&self) -> [HalfSpace; 6] {
        let centroid = self.centroid();
        FACES.map(|[a, b, c, _]| {
            let p0 = self.corners[a];
            let cross = (self.corners[b] - p0).cross(self.corners[c] - p0);
            let length = cross.length();
            // degenerate faces keep the raw cross product
            let normal = if length > DEGENERATE_NORMAL {
                cross / length
            } else {
                cross
            };
            let plane = HalfSpace {
                normal,
                offset: -normal.dot(p0),
            };
            if plane.signed_distance(centroid) > 0.0 {
                HalfSpace {
                    normal: -plane.normal,
                    offset: -plane.offset,
                }
            } else {
                plane
            }
        })
    }

    /// Exact containment: `p` is on the non-positive side of all 6 planes.
    pub fn contains_point(&self, p: DVec3) -> bool {
        self.half_spaces()
            .iter()
            .all(|plane| plane.signed_distance(p) <= 0.0)
    }
}
