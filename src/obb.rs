//! Oriented bounding box fitting from principal directions.
//!
//! The box axes come from the covariance of the points: the dominant eigenvector by
//! power iteration, a second one by power iteration constrained orthogonal to the
//! first, and their cross product. The result is approximate, not the minimum-volume
//! box, and near-isotropic point sets may yield arbitrary (but orthogonal) axes.

use glam::{DMat3, DVec3};

use crate::cuboid::Cuboid;
use crate::error::{IndexError, Result};

const MAX_ITERATIONS: usize = 100;
const CONVERGED_DOT: f64 = 0.9999;

/// Oriented bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obb {
    /// Box center
    pub center: DVec3,
    /// Orthonormal axes, dominant direction first
    pub axes: [DVec3; 3],
    /// Half side lengths along `axes`
    pub half_extents: DVec3,
}

impl Obb {
    /// Corners under the cuboid bit convention: bit `k` picks `+half_extents[k]` along `axes[k]`.
    pub fn corners(&self) -> [DVec3; 8] {
        *self.to_cuboid().corners()
    }

    /// The box as a general cuboid.
    pub fn to_cuboid(&self) -> Cuboid {
        Cuboid::from_center_axes(self.center, self.axes, self.half_extents)
    }
}

/// Fits an oriented bounding box to `points`.
///
/// # Errors
/// Returns [`IndexError::InvalidInput`] if `points` is empty.
///
/// # Examples
/// ```
/// use glam::DVec3;
/// use pointloc::compute_obb;
///
/// let points: Vec<DVec3> = (0..=10)
///     .flat_map(|i| [DVec3::new(i as f64, 0.0, 0.0), DVec3::new(i as f64, 1.0, 0.0)])
///     .collect();
/// let obb = compute_obb(&points).unwrap();
/// assert!((obb.half_extents.x - 5.0).abs() < 1e-2);
/// ```
pub fn compute_obb(points: &[DVec3]) -> Result<Obb> {
    if points.is_empty() {
        return Err(IndexError::invalid("cannot fit a box to an empty point set"));
    }

    let mean = compute_mean(points);
    let cov = compute_covariance(points, mean);

    let u = power_iteration(&cov).normalize_or_zero();
    let v = orthogonal_iteration(&cov, u).normalize_or_zero();
    let w = u.cross(v).normalize_or_zero();
    let axes = [u, v, w];

    let mut lo = DVec3::splat(f64::INFINITY);
    let mut hi = DVec3::splat(f64::NEG_INFINITY);
    for &p in points {
        let d = p - mean;
        let proj = DVec3::new(d.dot(u), d.dot(v), d.dot(w));
        lo = lo.min(proj);
        hi = hi.max(proj);
    }

    let mid = (lo + hi) * 0.5;
    let center = mean + u * mid.x + v * mid.y + w * mid.z;

    Ok(Obb {
        center,
        axes,
        half_extents: (hi - lo) * 0.5,
    })
}

fn compute_mean(points: &[DVec3]) -> DVec3 {
    points.iter().copied().sum::<DVec3>() / points.len() as f64
}

/// Population covariance (divided by N) of the points about `mean`.
fn compute_covariance(points: &[DVec3], mean: DVec3) -> DMat3 {
    let mut sum = DMat3::ZERO;
    for &p in points {
        let d = p - mean;
        // outer product d * d^T, column by column
        sum += DMat3::from_cols(d * d.x, d * d.y, d * d.z);
    }
    sum * (1.0 / points.len() as f64)
}

fn power_iteration(mat: &DMat3) -> DVec3 {
    let mut b = DVec3::ONE.normalize();
    for _ in 0..MAX_ITERATIONS {
        let next = (*mat * b).normalize_or_zero();
        if next == DVec3::ZERO {
            break;
        }
        let converged = next.dot(b) > CONVERGED_DOT;
        b = next;
        if converged {
            break;
        }
    }
    b
}

fn orthogonal_iteration(mat: &DMat3, u: DVec3) -> DVec3 {
    let reject = |x: DVec3| x - u * x.dot(u);
    // seed (0, 1, 0), or x when the first axis is y itself
    let mut v = reject(DVec3::Y)
        .try_normalize()
        .unwrap_or_else(|| reject(DVec3::X).normalize_or_zero());
    for _ in 0..MAX_ITERATIONS {
        let next = reject(*mat * v).normalize_or_zero();
        if next == DVec3::ZERO {
            break;
        }
        let converged = next.dot(v) > CONVERGED_DOT;
        v = next;
        if converged {
            break;
        }
    }
    v
}
