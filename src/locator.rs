//! Point locator: owns a point set and the lifecycle of its partition tree.
//!
//! The tree is rebuilt lazily. Each build records the generation of the locator's
//! own settings and of the point set; a query rebuilds only if either has moved
//! since. Query methods take `&mut self` because they may rebuild, so mutation is
//! serialized by the borrow checker. For shared read access from several threads,
//! call [`PointLocator::force_build`] once and query [`PointLocator::tree`].

use glam::DVec3;
use tracing::{debug, trace, warn};

use crate::bounds::Bounds;
use crate::cuboid::Cuboid;
use crate::error::{IndexError, Result};
use crate::partition_tree::{PartitionTree, TreeConfig};
use crate::queries::Neighbor;

/// Source of the points to index.
pub trait PointSet {
    /// Number of points; ids run from 0 to this count.
    fn number_of_points(&self) -> usize;

    /// Position of point `id`, with `id < number_of_points()`.
    fn point(&self, id: usize) -> DVec3;

    /// Bounds of all points, `None` when there are none.
    fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points((0..self.number_of_points()).map(|id| self.point(id)))
    }

    /// Marker that increases whenever the points change.
    fn generation(&self) -> u64;
}

/// In-memory point set that bumps its generation on every mutation.
#[derive(Clone, Debug, Default)]
pub struct PointCloud {
    points: Vec<DVec3>,
    generation: u64,
}

impl PointCloud {
    /// Creates an empty cloud.
    pub fn new() -> Self {
        PointCloud::default()
    }

    /// Creates an empty cloud with room for `capacity` points.
    pub fn with_capacity(capacity: usize) -> Self {
        PointCloud {
            points: Vec::with_capacity(capacity),
            generation: 0,
        }
    }

    /// Appends a point and returns its id.
    pub fn add_point(&mut self, p: DVec3) -> usize {
        self.points.push(p);
        self.generation += 1;
        self.points.len() - 1
    }

    /// Moves point `id`; returns false if there is no such point.
    pub fn set_point(&mut self, id: usize, p: DVec3) -> bool {
        match self.points.get_mut(id) {
            Some(slot) => {
                *slot = p;
                self.generation += 1;
                true
            }
            None => false,
        }
    }

    /// Removes every point.
    pub fn clear(&mut self) {
        self.points.clear();
        self.generation += 1;
    }

    /// All positions, indexed by id.
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the cloud holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<Vec<DVec3>> for PointCloud {
    fn from(points: Vec<DVec3>) -> Self {
        PointCloud {
            points,
            generation: 1,
        }
    }
}

impl FromIterator<DVec3> for PointCloud {
    fn from_iter<I: IntoIterator<Item = DVec3>>(iter: I) -> Self {
        PointCloud::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl PointSet for PointCloud {
    fn number_of_points(&self) -> usize {
        self.points.len()
    }

    fn point(&self, id: usize) -> DVec3 {
        self.points[id]
    }

    fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.points.iter().copied())
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

/// Generations observed by the last successful build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BuildStamp {
    locator: u64,
    data: u64,
}

/// Lazily built partition tree over a [`PointSet`].
///
/// # Examples
/// ```
/// use glam::DVec3;
/// use pointloc::{PointCloud, PointLocator};
///
/// let cloud: PointCloud = (0..100).map(|i| DVec3::new(i as f64, 0.0, 0.0)).collect();
/// let mut locator = PointLocator::new(cloud);
///
/// assert_eq!(locator.find_closest_point(DVec3::new(41.7, 3.0, 0.0)).unwrap(), Some(42));
///
/// let mut ids = Vec::new();
/// locator.find_points_within_radius(1.0, DVec3::new(10.0, 0.0, 0.0), &mut ids).unwrap();
/// ids.sort();
/// assert_eq!(ids, vec![9, 10, 11]);
/// ```
#[derive(Debug)]
pub struct PointLocator<P> {
    data_set: P,
    config: TreeConfig,
    use_existing_structure: bool,
    generation: u64,
    tree: Option<PartitionTree>,
    stamp: Option<BuildStamp>,
}

impl<P: PointSet> PointLocator<P> {
    /// Creates a locator with the default [`TreeConfig`]; nothing is built yet.
    pub fn new(data_set: P) -> Self {
        PointLocator::with_config(data_set, TreeConfig::default())
    }

    /// Creates a locator with explicit build parameters.
    pub fn with_config(data_set: P, config: TreeConfig) -> Self {
        PointLocator {
            data_set,
            config,
            use_existing_structure: false,
            generation: 0,
            tree: None,
            stamp: None,
        }
    }

    /// The indexed point set.
    pub fn data_set(&self) -> &P {
        &self.data_set
    }

    /// Mutable access to the point set; changes it makes are picked up through
    /// its generation on the next query.
    pub fn data_set_mut(&mut self) -> &mut P {
        &mut self.data_set
    }

    /// Gives back the point set.
    pub fn into_data_set(self) -> P {
        self.data_set
    }

    /// Build parameters.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Replaces the build parameters; the next query rebuilds.
    pub fn set_config(&mut self, config: TreeConfig) {
        if config != self.config {
            self.config = config;
            self.modified();
        }
    }

    /// Whether an existing tree is kept even when it is out of date.
    pub fn use_existing_structure(&self) -> bool {
        self.use_existing_structure
    }

    /// Keeps any existing tree regardless of later changes to the point set.
    pub fn set_use_existing_structure(&mut self, on: bool) {
        if on != self.use_existing_structure {
            self.use_existing_structure = on;
            self.modified();
        }
    }

    /// Marks the locator's own state as changed.
    pub fn modified(&mut self) {
        self.generation += 1;
    }

    /// The current tree, if one has been built.
    pub fn tree(&self) -> Option<&PartitionTree> {
        self.tree.as_ref()
    }

    /// Bounds recorded by the last build.
    pub fn bounds(&self) -> Option<Bounds> {
        self.tree.as_ref().and_then(PartitionTree::bounds)
    }

    /// True if a tree exists and both generations match the last build.
    ///
    /// A tree kept through [`set_use_existing_structure`](Self::set_use_existing_structure)
    /// after a change is not up to date, even though queries do not rebuild it.
    pub fn is_up_to_date(&self) -> bool {
        self.tree.is_some() && self.stamp == Some(self.current_stamp())
    }

    fn current_stamp(&self) -> BuildStamp {
        BuildStamp {
            locator: self.generation,
            data: self.data_set.generation(),
        }
    }

    /// Builds the tree unless the existing one is current or reuse is switched on.
    ///
    /// # Errors
    /// Returns [`IndexError::InvalidInput`] if a
    /// build is needed and the point set is empty or holds non-finite coordinates.
    /// Any previous tree is kept in that case.
    pub fn build(&mut self) -> Result<&PartitionTree> {
        if self.is_up_to_date() {
            trace!("partition tree is up to date");
        } else if self.tree.is_some() && self.use_existing_structure {
            // the stamp stays at the last real build
            debug!("keeping existing partition tree");
        } else {
            self.build_internal()?;
        }
        self.built_tree()
    }

    /// Rebuilds the tree unconditionally.
    ///
    /// # Errors
    /// Same as [`build`](Self::build).
    pub fn force_build(&mut self) -> Result<&PartitionTree> {
        self.build_internal()?;
        self.built_tree()
    }

    fn built_tree(&self) -> Result<&PartitionTree> {
        self.tree
            .as_ref()
            .ok_or(IndexError::invalid("no points to build"))
    }

    /// Discards the tree; the next query builds a new one.
    pub fn free_search_structure(&mut self) {
        self.tree = None;
        self.stamp = None;
    }

    fn build_internal(&mut self) -> Result<()> {
        let stamp = self.current_stamp();
        let points: Vec<DVec3> = (0..self.data_set.number_of_points())
            .map(|id| self.data_set.point(id))
            .collect();
        match PartitionTree::build(&points, self.config) {
            Ok(tree) => {
                self.tree = Some(tree);
                self.stamp = Some(stamp);
                Ok(())
            }
            Err(err) => {
                warn!(%err, "partition tree build rejected");
                Err(err)
            }
        }
    }

    /// Id of the point closest to `x`.
    ///
    /// # Errors
    /// Fails only if a needed rebuild fails, see [`build`](Self::build).
    pub fn find_closest_point(&mut self, x: DVec3) -> Result<Option<usize>> {
        Ok(self.build()?.find_closest_point(x))
    }

    /// Closest point within `radius` of `x` with its squared distance, `None` if there is none.
    ///
    /// # Errors
    /// Fails only if a needed rebuild fails, see [`build`](Self::build).
    pub fn find_closest_point_within_radius(
        &mut self,
        radius: f64,
        x: DVec3,
    ) -> Result<Option<Neighbor>> {
        Ok(self.build()?.find_closest_point_within_radius(radius, x))
    }

    /// The `n` closest points to `x`, nearest first, ties broken by id.
    ///
    /// # Errors
    /// Fails only if a needed rebuild fails, see [`build`](Self::build).
    pub fn find_closest_n_points(
        &mut self,
        n: usize,
        x: DVec3,
        results: &mut Vec<usize>,
    ) -> Result<()> {
        self.build()?.find_closest_n_points(n, x, results);
        Ok(())
    }

    /// All points within `radius` of `x`, unordered.
    ///
    /// # Errors
    /// Fails only if a needed rebuild fails, see [`build`](Self::build).
    pub fn find_points_within_radius(
        &mut self,
        radius: f64,
        x: DVec3,
        results: &mut Vec<usize>,
    ) -> Result<()> {
        self.build()?.find_points_within_radius(radius, x, results);
        Ok(())
    }

    /// All points inside the closed box `area`.
    ///
    /// # Errors
    /// Fails only if a needed rebuild fails, see [`build`](Self::build).
    pub fn find_points_within_area(
        &mut self,
        area: &Bounds,
        results: &mut Vec<usize>,
    ) -> Result<()> {
        self.build()?.find_points_within_area(area, results);
        Ok(())
    }

    /// All points inside `cuboid`: box candidates first, then the exact plane test.
    ///
    /// # Errors
    /// Fails only if a needed rebuild fails, see [`build`](Self::build).
    pub fn find_points_within_cuboid(
        &mut self,
        cuboid: &Cuboid,
        results: &mut Vec<usize>,
    ) -> Result<()> {
        self.build()?.find_points_within_cuboid(cuboid, results);
        Ok(())
    }
}
