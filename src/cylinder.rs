//! Cylindrical neighborhood search by sphere sweep.
//!
//! A chain of overlapping spheres along the axis gathers candidates through the
//! locator's radius query, then an exact perpendicular-distance test keeps the
//! points inside the cylinder. The sweep is over-inclusive on purpose: spheres of
//! radius `r * radius_ratio` every `r * interval_ratio` along the axis cover the
//! whole cylinder of radius `r` as long as `radius_ratio² >= 1 + interval_ratio² / 4`.

use std::collections::HashSet;

use glam::DVec3;
use tracing::debug;

use crate::bounds::Bounds;
use crate::error::{IndexError, Result};
use crate::locator::{PointLocator, PointSet};

/// Sphere radius over cylinder radius; also the overhang past each end of the span.
pub const DEFAULT_RADIUS_RATIO: f64 = 1.224_744_871_391_589;

/// Sphere spacing over cylinder radius.
///
/// Halfway between two centers `√2 / 2` apart, a point on the cylinder surface is
/// `√(1 + 0.5)` radii from both, which is exactly [`DEFAULT_RADIUS_RATIO`].
pub const DEFAULT_INTERVAL_RATIO: f64 = std::f64::consts::SQRT_2;

/// Below this length a direction vector is rejected, and two centers count as equal.
const EPSILON: f64 = 1e-8;

/// Upper bound on the sphere centers of one sweep.
pub const MAX_SPHERE_CENTERS: usize = 1 << 20;

/// Sphere-sweep parameters for cylinder queries.
///
/// # Examples
/// ```
/// use glam::DVec3;
/// use pointloc::{CylinderSearch, PointCloud, PointLocator};
///
/// let cloud: PointCloud = (0..=10)
///     .flat_map(|i| [DVec3::new(i as f64, 0.0, 0.0), DVec3::new(i as f64, 0.0, 3.0)])
///     .collect();
/// let mut locator = PointLocator::new(cloud);
///
/// let mut ids = Vec::new();
/// CylinderSearch::default()
///     .find(&mut locator, DVec3::ZERO, DVec3::X, 1.0, &mut ids)
///     .unwrap();
/// assert_eq!(ids.len(), 11);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CylinderSearch {
    /// Sphere radius as a multiple of the cylinder radius; also the axial overhang
    pub radius_ratio: f64,
    /// Sphere spacing as a multiple of the cylinder radius
    pub interval_ratio: f64,
}

impl Default for CylinderSearch {
    fn default() -> Self {
        CylinderSearch {
            radius_ratio: DEFAULT_RADIUS_RATIO,
            interval_ratio: DEFAULT_INTERVAL_RATIO,
        }
    }
}

impl CylinderSearch {
    /// Sets the sphere radius ratio.
    #[must_use]
    pub fn with_radius_ratio(mut self, radius_ratio: f64) -> Self {
        self.radius_ratio = radius_ratio;
        self
    }

    /// Sets the sphere spacing ratio.
    #[must_use]
    pub fn with_interval_ratio(mut self, interval_ratio: f64) -> Self {
        self.interval_ratio = interval_ratio;
        self
    }

    /// Ids of the points within `radius` of the infinite line through `origin` along
    /// `direction`, restricted to the extent of the point set. Order is unspecified.
    ///
    /// # Errors
    /// Returns [`IndexError::InvalidInput`] if `direction` is shorter than 1e-8, if
    /// `radius` or the ratios are not positive and finite, if the sweep would need
    /// more than [`MAX_SPHERE_CENTERS`] spheres, or if the locator has to build and cannot.
    pub fn find<P: PointSet>(
        &self,
        locator: &mut PointLocator<P>,
        origin: DVec3,
        direction: DVec3,
        radius: f64,
        results: &mut Vec<usize>,
    ) -> Result<()> {
        results.clear();
        let length = direction.length();
        if !length.is_finite() || length < EPSILON {
            return Err(IndexError::invalid("direction vector is zero"));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(IndexError::invalid("cylinder radius must be positive and finite"));
        }
        if !(self.radius_ratio.is_finite() && self.interval_ratio.is_finite())
            || self.radius_ratio <= 0.0
            || self.interval_ratio <= 0.0
        {
            return Err(IndexError::invalid("sweep ratios must be positive"));
        }
        let u = direction / length;

        let bounds = locator
            .build()?
            .bounds()
            .ok_or(IndexError::invalid("no points to build"))?;
        let (min_proj, max_proj) = projection_range(&bounds, origin, u);

        let sphere_radius = radius * self.radius_ratio;
        let start = origin + u * (min_proj - sphere_radius);
        let end = origin + u * (max_proj + sphere_radius);
        let centers = generate_sphere_centers(start, end, radius * self.interval_ratio)?;

        let mut candidates = Vec::new();
        self.unique_points_in_spheres(locator, &centers, sphere_radius, &mut candidates)?;

        let radius_squared = radius * radius;
        let tree = locator.build()?;
        results.extend(candidates.into_iter().filter(|&id| {
            tree.point(id).is_some_and(|p| {
                let v = p - origin;
                let along = v.dot(u);
                (v.length_squared() - along * along).max(0.0) <= radius_squared
            })
        }));

        debug!(
            spheres = centers.len(),
            accepted = results.len(),
            "cylinder search"
        );
        Ok(())
    }

    /// Union of the radius queries around every center, without duplicates,
    /// in first-seen order.
    ///
    /// # Errors
    /// Fails only if the locator has to build and cannot.
    pub fn unique_points_in_spheres<P: PointSet>(
        &self,
        locator: &mut PointLocator<P>,
        centers: &[DVec3],
        sphere_radius: f64,
        results: &mut Vec<usize>,
    ) -> Result<()> {
        results.clear();
        let tree = locator.build()?;
        let mut seen = HashSet::new();
        let mut hits = Vec::new();
        for &center in centers {
            tree.find_points_within_radius(sphere_radius, center, &mut hits);
            for &id in &hits {
                if seen.insert(id) {
                    results.push(id);
                }
            }
        }
        Ok(())
    }
}

/// Sphere centers from `start` to `end`, `interval` apart.
///
/// The first center is `start` and the last is `end`; only the final gap may be
/// shorter than `interval`. Coincident endpoints give the single center `start`.
///
/// # Errors
/// Returns [`IndexError::InvalidInput`] if `interval` is not positive and finite, or
/// if the span would need more than [`MAX_SPHERE_CENTERS`] centers.
pub fn generate_sphere_centers(start: DVec3, end: DVec3, interval: f64) -> Result<Vec<DVec3>> {
    if !interval.is_finite() || interval <= 0.0 {
        return Err(IndexError::invalid("sphere interval must be positive and finite"));
    }
    let diff = end - start;
    let total = diff.length();
    if total < EPSILON {
        return Ok(vec![start]);
    }
    let u = diff / total;

    let steps = (total / interval).ceil();
    if !steps.is_finite() || steps >= (MAX_SPHERE_CENTERS - 1) as f64 {
        return Err(IndexError::invalid("too many sphere centers"));
    }
    // steps + 1 centers, plus possibly `end`, stay within MAX_SPHERE_CENTERS
    let count = steps as usize + 1;
    let mut centers: Vec<DVec3> = (0..count)
        .map(|i| start + u * (i as f64 * interval).min(total))
        .collect();

    if centers.last().is_some_and(|last| last.distance(end) > EPSILON) {
        centers.push(end);
    }
    Ok(centers)
}

/// Smallest and largest projection of the corners of `bounds` onto the unit
/// direction `u`, measured from `origin`.
pub fn projection_range(bounds: &Bounds, origin: DVec3, u: DVec3) -> (f64, f64) {
    bounds
        .corners()
        .iter()
        .map(|&c| (c - origin).dot(u))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
            (lo.min(t), hi.max(t))
        })
}
