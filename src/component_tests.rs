//! Component tests for the partition tree and its geometry - each method on its own
//! Small hand-built inputs whose answers can be worked out on paper

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use crate::{
        BOX_EDGES, Bounds, Cuboid, IndexError, MAX_SPHERE_CENTERS, NodeId, PartitionTree,
        SplitAxis, SplitThreshold, TreeConfig, compute_obb, generate_sphere_centers,
        projection_range,
    };

    fn line(n: usize) -> Vec<DVec3> {
        (0..n).map(|i| DVec3::new(i as f64, 0.0, 0.0)).collect()
    }

    fn lattice(n: usize) -> Vec<DVec3> {
        let mut points = Vec::with_capacity(n * n * n);
        for z in 0..n {
            for y in 0..n {
                for x in 0..n {
                    points.push(DVec3::new(x as f64, y as f64, z as f64));
                }
            }
        }
        points
    }

    fn all_nodes(tree: &PartitionTree) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = tree.root().into_iter().collect();
        while let Some(id) = stack.pop() {
            found.push(id);
            if let Some(node) = tree.node(id) {
                stack.extend(node.left());
                stack.extend(node.right());
            }
        }
        found
    }

    fn build(points: &[DVec3], max_points_per_leaf: usize) -> PartitionTree {
        let config = TreeConfig::default().with_max_points_per_leaf(max_points_per_leaf);
        PartitionTree::build(points, config).unwrap()
    }

    fn sorted(mut ids: Vec<usize>) -> Vec<usize> {
        ids.sort_unstable();
        ids
    }

    // ============================================================================
    // ERROR TESTS
    // ============================================================================

    #[test]
    fn test_error_message() {
        let err = IndexError::invalid("direction vector is zero");
        assert_eq!(err.to_string(), "invalid input: direction vector is zero");
    }

    // ============================================================================
    // BOUNDS TESTS
    // ============================================================================

    #[test]
    fn test_bounds_array_layout() {
        let b = Bounds::from_array([0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(b.min, DVec3::new(0.0, 2.0, 4.0));
        assert_eq!(b.max, DVec3::new(1.0, 3.0, 5.0));
        assert_eq!(b.to_array(), [0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_bounds_corner_numbering() {
        let b = Bounds::new(DVec3::ZERO, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.corner(0), DVec3::ZERO);
        assert_eq!(b.corner(1), DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(b.corner(2), DVec3::new(0.0, 2.0, 0.0));
        assert_eq!(b.corner(4), DVec3::new(0.0, 0.0, 3.0));
        assert_eq!(b.corner(6), DVec3::new(0.0, 2.0, 3.0));
        assert_eq!(b.corner(7), DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.corners()[5], b.corner(5));
    }

    #[test]
    fn test_box_edges_connect_neighbouring_corners() {
        for [a, b] in BOX_EDGES {
            assert_eq!((a ^ b).count_ones(), 1, "edge {a}-{b} must differ in one bit");
        }
        assert!(BOX_EDGES[..4].iter().all(|[a, b]| a & 4 == 0 && b & 4 == 0), "bottom face");
        assert!(BOX_EDGES[4..8].iter().all(|[a, b]| a & 4 != 0 && b & 4 != 0), "top face");
        assert!(BOX_EDGES[8..].iter().all(|[a, b]| a ^ b == 4), "vertical edges");

        let mut uses = [0; 8];
        for [a, b] in BOX_EDGES {
            uses[a] += 1;
            uses[b] += 1;
        }
        assert_eq!(uses, [3; 8], "every corner meets 3 edges");
    }

    #[test]
    fn test_bounds_from_points() {
        assert!(Bounds::from_points(std::iter::empty()).is_none());
        let b = Bounds::from_points([
            DVec3::new(1.0, -2.0, 0.0),
            DVec3::new(-1.0, 5.0, 3.0),
            DVec3::new(0.0, 0.0, -4.0),
        ])
        .unwrap();
        assert_eq!(b.min, DVec3::new(-1.0, -2.0, -4.0));
        assert_eq!(b.max, DVec3::new(1.0, 5.0, 3.0));
        assert_eq!(b.widest_axis(), 2);
    }

    #[test]
    fn test_bounds_widest_axis_ties_prefer_x() {
        let b = Bounds::new(DVec3::ZERO, DVec3::splat(2.0));
        assert_eq!(b.widest_axis(), 0);
        let b = Bounds::new(DVec3::ZERO, DVec3::new(1.0, 2.0, 2.0));
        assert_eq!(b.widest_axis(), 1);
    }

    #[test]
    fn test_bounds_closed_containment() {
        let b = Bounds::new(DVec3::ZERO, DVec3::ONE);
        assert!(b.contains_point(DVec3::ZERO));
        assert!(b.contains_point(DVec3::ONE));
        assert!(b.contains_point(DVec3::new(1.0, 0.5, 0.0)));
        assert!(!b.contains_point(DVec3::new(1.0 + 1e-9, 0.5, 0.5)));

        let touching = Bounds::new(DVec3::new(1.0, 0.0, 0.0), DVec3::new(2.0, 1.0, 1.0));
        assert!(b.intersects(&touching), "shared faces intersect");
        let apart = Bounds::new(DVec3::new(1.5, 0.0, 0.0), DVec3::new(2.0, 1.0, 1.0));
        assert!(!b.intersects(&apart));

        let inner = Bounds::new(DVec3::splat(0.25), DVec3::splat(0.75));
        assert!(b.contains_bounds(&inner));
        assert!(b.contains_bounds(&b));
        assert!(!inner.contains_bounds(&b));
    }

    #[test]
    fn test_bounds_distance() {
        let b = Bounds::new(DVec3::ZERO, DVec3::ONE);
        assert_eq!(b.distance_squared_to(DVec3::splat(0.5)), 0.0);
        assert_eq!(b.distance_squared_to(DVec3::new(3.0, 0.5, 0.5)), 4.0);
        assert_eq!(b.distance_squared_to(DVec3::splat(2.0)), 3.0);
        assert_eq!(b.distance_squared_to(DVec3::new(-1.0, 2.0, 0.5)), 2.0);
    }

    // ============================================================================
    // CUBOID TESTS
    // ============================================================================

    #[test]
    fn test_cuboid_from_bounds_containment() {
        let c = Cuboid::from_bounds(&Bounds::new(DVec3::ZERO, DVec3::splat(10.0)));
        assert!(c.contains_point(DVec3::splat(5.0)));
        assert!(c.contains_point(DVec3::ZERO), "corners are inside");
        assert!(c.contains_point(DVec3::new(10.0, 3.0, 0.0)), "faces are inside");
        assert!(!c.contains_point(DVec3::new(10.5, 3.0, 3.0)));
        assert!(!c.contains_point(DVec3::new(3.0, -0.5, 3.0)));
        assert_eq!(c.centroid(), DVec3::splat(5.0));
    }

    #[test]
    fn test_cuboid_half_spaces_face_outward() {
        let axes = [
            DVec3::new(1.0, 1.0, 0.0).normalize(),
            DVec3::new(-1.0, 1.0, 0.0).normalize(),
            DVec3::Z,
        ];
        let half = DVec3::new(2.0, 1.0, 0.5);
        let c = Cuboid::from_center_axes(DVec3::new(3.0, 1.0, -2.0), axes, half);
        for plane in c.half_spaces() {
            assert!((plane.normal.length() - 1.0).abs() < 1e-12, "unit normals");
            assert!(plane.signed_distance(c.centroid()) < 0.0, "centroid on the inner side");
        }
    }

    #[test]
    fn test_rotated_cuboid_rejects_points_in_its_bounds() {
        let axes = [
            DVec3::new(1.0, 1.0, 0.0).normalize(),
            DVec3::new(-1.0, 1.0, 0.0).normalize(),
            DVec3::Z,
        ];
        let c = Cuboid::from_center_axes(DVec3::ZERO, axes, DVec3::ONE);
        let corner_gap = DVec3::new(0.9, 0.9, 0.0);
        assert!(c.bounds().contains_point(corner_gap));
        assert!(!c.contains_point(corner_gap), "outside the rotated faces");
        assert!(c.contains_point(DVec3::new(1.2, 0.0, 0.0)));
        assert!(c.contains_point(DVec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_cuboid_from_corner_edges() {
        let edges = [DVec3::X * 2.0, DVec3::Y * 3.0, DVec3::Z * 4.0];
        let c = Cuboid::from_corner_edges(DVec3::ONE, edges);
        assert_eq!(c.corners()[0], DVec3::ONE);
        assert_eq!(c.corners()[3], DVec3::new(3.0, 4.0, 1.0));
        assert_eq!(c.corners()[7], DVec3::new(3.0, 4.0, 5.0));
        assert_eq!(c.bounds(), Bounds::new(DVec3::ONE, DVec3::new(3.0, 4.0, 5.0)));
    }

    // ============================================================================
    // OBB TESTS
    // ============================================================================

    #[test]
    fn test_obb_empty_input() {
        assert!(matches!(compute_obb(&[]), Err(IndexError::InvalidInput { .. })));
    }

    #[test]
    fn test_obb_single_point() {
        let p = DVec3::new(1.0, 2.0, 3.0);
        let obb = compute_obb(&[p]).unwrap();
        assert!(obb.center.distance(p) < 1e-12);
        assert!(obb.half_extents.length() < 1e-12);
    }

    #[test]
    fn test_obb_of_axis_aligned_grid() {
        let mut points = Vec::new();
        for x in 0..=20 {
            for y in 0..=4 {
                for z in 0..=2 {
                    points.push(DVec3::new(x as f64, y as f64, z as f64));
                }
            }
        }
        let obb = compute_obb(&points).unwrap();

        assert!((obb.half_extents.x - 10.0).abs() < 1e-2, "got {}", obb.half_extents.x);
        assert!((obb.half_extents.y - 2.0).abs() < 1e-2, "got {}", obb.half_extents.y);
        assert!((obb.half_extents.z - 1.0).abs() < 1e-2, "got {}", obb.half_extents.z);
        assert!(obb.axes[0].dot(DVec3::X).abs() > 0.999);
        assert!(obb.axes[1].dot(DVec3::Y).abs() > 0.999);
        assert!(obb.axes[2].dot(DVec3::Z).abs() > 0.999);
        assert!(obb.center.distance(DVec3::new(10.0, 2.0, 1.0)) < 1e-2);
    }

    #[test]
    fn test_obb_axes_orthonormal_and_corners_follow_bits() {
        let points: Vec<DVec3> = (0..50)
            .map(|i| {
                let t = i as f64;
                DVec3::new(t, 0.5 * t + (t * 0.7).sin(), 0.2 * t + (t * 1.3).cos())
            })
            .collect();
        let obb = compute_obb(&points).unwrap();
        for i in 0..3 {
            assert!((obb.axes[i].length() - 1.0).abs() < 1e-9);
            for j in (i + 1)..3 {
                assert!(obb.axes[i].dot(obb.axes[j]).abs() < 1e-9, "axes {i} and {j}");
            }
        }
        for (i, corner) in obb.corners().iter().enumerate() {
            let local = *corner - obb.center;
            for k in 0..3 {
                let along = local.dot(obb.axes[k]);
                let expected = if i & (1 << k) != 0 { 1.0 } else { -1.0 };
                assert!((along - expected * obb.half_extents[k]).abs() < 1e-9);
            }
        }
    }

    // ============================================================================
    // BUILD TESTS
    // ============================================================================

    #[test]
    fn test_default_tree_is_empty() {
        let tree = PartitionTree::default();
        assert!(tree.is_empty());
        assert_eq!(tree.max_level(), -1);
        assert_eq!(tree.count_at_level(0), 0);
        assert!(tree.root().is_none());
        assert!(tree.bounds().is_none());
        assert_eq!(tree.find_closest_point(DVec3::ZERO), None);
    }

    #[test]
    fn test_build_rejects_empty_input() {
        let err = PartitionTree::build(&[], TreeConfig::default()).unwrap_err();
        assert!(matches!(err, IndexError::InvalidInput { .. }));
    }

    #[test]
    fn test_build_rejects_non_finite_coordinates() {
        let points = [DVec3::ZERO, DVec3::new(1.0, f64::NAN, 0.0)];
        assert!(PartitionTree::build(&points, TreeConfig::default()).is_err());
        let points = [DVec3::ZERO, DVec3::new(f64::INFINITY, 0.0, 0.0)];
        assert!(PartitionTree::build(&points, TreeConfig::default()).is_err());
    }

    #[test]
    fn test_build_single_point() {
        let tree = PartitionTree::build(&[DVec3::ONE], TreeConfig::default()).unwrap();
        let root = tree.root().unwrap();
        assert_eq!(tree.max_level(), 0);
        assert_eq!(tree.count_at_level(0), 1);
        assert_eq!(tree.locate_region(DVec3::ONE), Some(root));
        assert_eq!(tree.path_to_node(root).len(), 1);
        assert_eq!(tree.point_ids(root), &[0]);
    }

    #[test]
    fn test_build_levels_of_a_line() {
        let tree = build(&line(64), 8);
        assert_eq!(tree.max_level(), 3);
        for (level, expected) in [(0, 1), (1, 2), (2, 4), (3, 8)] {
            assert_eq!(tree.count_at_level(level), expected, "level {level}");
        }
        assert_eq!(tree.count_at_level(-1), 0);
        assert_eq!(tree.count_at_level(8), 8, "past the deepest level clamps to it");

        let halves = tree.regions_at_level(1);
        assert_eq!(halves[0].min.x, 0.0);
        assert_eq!(halves[0].max.x, 31.0);
        assert_eq!(halves[1].min.x, 32.0);
        assert_eq!(halves[1].max.x, 63.0);
        assert!(tree.regions_at_level(-3).is_empty());
    }

    #[test]
    fn test_node_bounds_are_exact() {
        let tree = build(&lattice(7), 5);
        for id in all_nodes(&tree) {
            let node = tree.node(id).unwrap();
            let ids = tree.point_ids(id);
            assert_eq!(ids.len(), node.len());
            let positions = ids.iter().map(|&i| tree.point(i).unwrap());
            let expected = Bounds::from_points(positions).unwrap();
            assert_eq!(node.bounds(), expected, "node {}", id.index());
        }
    }

    #[test]
    fn test_children_partition_parent() {
        let tree = build(&lattice(6), 3);
        for id in all_nodes(&tree) {
            let node = tree.node(id).unwrap();
            let (Some(left), Some(right), Some((axis, value))) =
                (node.left(), node.right(), node.split())
            else {
                assert!(node.is_leaf());
                continue;
            };
            let (l, r) = (tree.node(left).unwrap(), tree.node(right).unwrap());
            assert_eq!(l.len() + r.len(), node.len());
            assert!(!l.is_empty() && !r.is_empty());
            assert_eq!(l.depth(), node.depth() + 1);
            for &i in tree.point_ids(left) {
                assert!(tree.point(i).unwrap()[axis] < value);
            }
            for &i in tree.point_ids(right) {
                assert!(tree.point(i).unwrap()[axis] >= value);
            }
        }
    }

    #[test]
    fn test_split_below_repeated_median() {
        let mut points = vec![DVec3::ZERO; 8];
        points.extend([DVec3::new(5.0, 0.0, 0.0); 2]);
        let tree = build(&points, 2);
        let root = tree.node(tree.root().unwrap()).unwrap();
        assert_eq!(root.split(), Some((0, 5.0)));
        assert_eq!(tree.node(root.left().unwrap()).unwrap().len(), 8);
        assert_eq!(tree.node(root.right().unwrap()).unwrap().len(), 2);
        assert_eq!(tree.max_level(), 1);
    }

    #[test]
    fn test_coincident_points_stay_in_one_leaf() {
        let points = vec![DVec3::new(3.0, 3.0, 3.0); 100];
        let tree = build(&points, 4);
        assert_eq!(tree.max_level(), 0);
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_max_depth_bounds_the_tree() {
        let config = TreeConfig::default()
            .with_max_points_per_leaf(1)
            .with_max_depth(3);
        let tree = PartitionTree::build(&lattice(10), config).unwrap();
        assert_eq!(tree.max_level(), 3);
        assert_eq!(tree.count_at_level(3), 8);
    }

    #[test]
    fn test_cycle_axis_by_depth() {
        let config = TreeConfig::default()
            .with_max_points_per_leaf(8)
            .with_split_axis(SplitAxis::Cycle);
        let tree = PartitionTree::build(&lattice(8), config).unwrap();
        for (level, axis) in [(0, 0), (1, 1), (2, 2)] {
            for id in tree.nodes_at_level(level) {
                let split = tree.node(id).unwrap().split();
                assert_eq!(split.map(|(a, _)| a), Some(axis), "level {level}");
            }
        }
        let root = tree.node(tree.root().unwrap()).unwrap();
        assert_eq!(root.split(), Some((0, 4.0)));
    }

    #[test]
    fn test_midpoint_threshold() {
        let mut points = line(10);
        points.push(DVec3::new(100.0, 0.0, 0.0));
        let config = TreeConfig::default()
            .with_max_points_per_leaf(2)
            .with_split_threshold(SplitThreshold::Midpoint);
        let tree = PartitionTree::build(&points, config).unwrap();
        let root = tree.node(tree.root().unwrap()).unwrap();
        assert_eq!(root.split(), Some((0, 50.0)));
        assert_eq!(tree.point_ids(root.right().unwrap()), &[10]);
    }

    // ============================================================================
    // REGION LOOKUP TESTS
    // ============================================================================

    #[test]
    fn test_locate_region_finds_owning_leaf() {
        let points = lattice(6);
        let tree = build(&points, 4);
        for (i, &p) in points.iter().enumerate() {
            let leaf = tree.locate_region(p).unwrap();
            assert!(tree.node(leaf).unwrap().is_leaf());
            assert!(tree.point_ids(leaf).contains(&i), "point {i} not in its leaf");
        }
    }

    #[test]
    fn test_locate_region_outside_root() {
        let tree = PartitionTree::build(&lattice(3), TreeConfig::default()).unwrap();
        assert_eq!(tree.locate_region(DVec3::new(-0.1, 1.0, 1.0)), None);
        assert!(tree.region_path_for_point(DVec3::splat(5.0)).is_empty());
    }

    #[test]
    fn test_path_to_node_nests_from_root() {
        let tree = build(&lattice(8), 2);
        let root = tree.root().unwrap();
        assert_eq!(tree.path_to_node(root), vec![tree.bounds().unwrap()]);
        assert_eq!(tree.node_level(root), Some(0));

        for leaf in all_nodes(&tree).into_iter().filter(|&id| tree.node(id).unwrap().is_leaf()) {
            let depth = tree.node(leaf).unwrap().depth();
            let path = tree.path_to_node(leaf);
            assert_eq!(path.len(), depth + 1);
            assert_eq!(tree.node_level(leaf), Some(depth));
            assert_eq!(path[0], tree.bounds().unwrap());
            assert_eq!(*path.last().unwrap(), tree.node(leaf).unwrap().bounds());
            for pair in path.windows(2) {
                assert!(pair[0].contains_bounds(&pair[1]));
            }
        }
    }

    #[test]
    fn test_path_to_foreign_node_is_empty() {
        let small = PartitionTree::build(&[DVec3::ZERO], TreeConfig::default()).unwrap();
        let big = build(&lattice(5), 2);
        let foreign = *big.nodes_at_level(big.max_level()).last().unwrap();
        assert!(small.node(foreign).is_none());
        assert!(small.path_to_node(foreign).is_empty());
        assert_eq!(small.node_level(foreign), None);
        assert!(small.point_ids(foreign).is_empty());
    }

    // ============================================================================
    // QUERY TESTS
    // ============================================================================

    #[test]
    fn test_closest_point_ties_prefer_lower_id() {
        let points = [DVec3::new(1.0, 0.0, 0.0), DVec3::new(-1.0, 0.0, 0.0)];
        let tree = PartitionTree::build(&points, TreeConfig::default()).unwrap();
        assert_eq!(tree.find_closest_point(DVec3::ZERO), Some(0));

        let points = [DVec3::ONE, DVec3::ONE, DVec3::ONE];
        let tree = PartitionTree::build(&points, TreeConfig::default()).unwrap();
        assert_eq!(tree.find_closest_point(DVec3::ZERO), Some(0));
    }

    #[test]
    fn test_closest_point_within_radius() {
        let tree = build(&line(10), 2);
        let p = DVec3::new(4.5, 0.0, 0.0);
        assert_eq!(tree.find_closest_point_within_radius(0.3, p), None);
        let hit = tree.find_closest_point_within_radius(0.5, p).unwrap();
        assert_eq!(hit.id, 4);
        assert_eq!(hit.distance_squared, 0.25);
        assert_eq!(tree.find_closest_point_within_radius(-1.0, p), None);
        assert_eq!(tree.find_closest_point_within_radius(f64::NAN, p), None);
    }

    #[test]
    fn test_closest_n_points() {
        let tree = build(&line(10), 2);
        let mut results = Vec::new();
        tree.find_closest_n_points(3, DVec3::new(4.4, 0.0, 0.0), &mut results);
        assert_eq!(results, vec![4, 5, 3]);

        tree.find_closest_n_points(0, DVec3::ZERO, &mut results);
        assert!(results.is_empty());

        tree.find_closest_n_points(100, DVec3::ZERO, &mut results);
        assert_eq!(results, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_points_within_radius_is_closed() {
        let tree = build(&line(10), 2);
        let mut results = Vec::new();
        tree.find_points_within_radius(1.0, DVec3::new(5.0, 0.0, 0.0), &mut results);
        assert_eq!(sorted(results.clone()), vec![4, 5, 6]);

        tree.find_points_within_radius(-1.0, DVec3::ZERO, &mut results);
        assert!(results.is_empty(), "a negative radius clears previous results");
    }

    #[test]
    fn test_points_within_infinite_radius() {
        let tree = build(&line(10), 2);
        let mut results = Vec::new();
        tree.find_points_within_radius(f64::INFINITY, DVec3::ZERO, &mut results);
        assert_eq!(sorted(results.clone()), (0..10).collect::<Vec<_>>(), "every point is in reach");

        let nearest = tree.find_closest_point_within_radius(f64::INFINITY, DVec3::ZERO);
        assert_eq!(nearest.map(|n| n.id), Some(0), "both radius queries accept infinity");

        tree.find_points_within_radius(f64::NAN, DVec3::ZERO, &mut results);
        assert!(results.is_empty(), "a NaN radius takes nothing");
    }

    #[test]
    fn test_points_within_area_is_closed() {
        let tree = build(&lattice(3), 2);
        let mut results = Vec::new();
        let corner_cube = Bounds::from_array([0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
        tree.find_points_within_area(&corner_cube, &mut results);
        assert_eq!(results.len(), 8);

        let far_cube = Bounds::from_array([5.0, 6.0, 5.0, 6.0, 5.0, 6.0]);
        tree.find_points_within_area(&far_cube, &mut results);
        assert!(results.is_empty());

        let covering = Bounds::from_array([-1.0, 3.0, -1.0, 3.0, -1.0, 3.0]);
        tree.find_points_within_area(&covering, &mut results);
        assert_eq!(sorted(results.clone()), (0..27).collect::<Vec<_>>());
    }

    #[test]
    fn test_axis_aligned_cuboid_is_exact() {
        let points = lattice(11);
        let tree = build(&points, 8);
        let mut results = Vec::new();
        let cube = Cuboid::from_bounds(&Bounds::new(DVec3::ZERO, DVec3::splat(10.0)));
        tree.find_points_within_cuboid(&cube, &mut results);
        assert_eq!(results.len(), points.len());

        let inner = Bounds::new(DVec3::splat(2.0), DVec3::new(4.0, 5.0, 6.0));
        let mut by_area = Vec::new();
        tree.find_points_within_area(&inner, &mut by_area);
        tree.find_points_within_cuboid(&Cuboid::from_bounds(&inner), &mut results);
        assert_eq!(sorted(results), sorted(by_area));
    }

    #[test]
    fn test_rotated_cuboid_query() {
        let points = [DVec3::new(1.2, 0.0, 0.0), DVec3::new(0.9, 0.9, 0.0), DVec3::ZERO];
        let tree = PartitionTree::build(&points, TreeConfig::default()).unwrap();
        let axes = [
            DVec3::new(1.0, 1.0, 0.0).normalize(),
            DVec3::new(-1.0, 1.0, 0.0).normalize(),
            DVec3::Z,
        ];
        let mut results = Vec::new();
        let rotated = Cuboid::from_center_axes(DVec3::ZERO, axes, DVec3::ONE);
        tree.find_points_within_cuboid(&rotated, &mut results);
        assert_eq!(sorted(results), vec![0, 2]);
    }

    // ============================================================================
    // SWEEP HELPER TESTS
    // ============================================================================

    #[test]
    fn test_sphere_centers_spacing() {
        let end = DVec3::new(10.0, 0.0, 0.0);
        let centers = generate_sphere_centers(DVec3::ZERO, end, 3.0).unwrap();
        let xs: Vec<f64> = centers.iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![0.0, 3.0, 6.0, 9.0, 10.0]);

        let centers = generate_sphere_centers(DVec3::ZERO, end, 5.0).unwrap();
        assert_eq!(centers.len(), 3);
        assert_eq!(*centers.last().unwrap(), end);
    }

    #[test]
    fn test_sphere_centers_diagonal() {
        let start = DVec3::new(-1.0, 2.0, 0.5);
        let end = DVec3::new(4.0, -3.0, 7.0);
        let centers = generate_sphere_centers(start, end, 0.7).unwrap();
        assert_eq!(centers[0], start);
        assert!(centers.last().unwrap().distance(end) < 1e-9);
        for pair in centers[..centers.len() - 1].windows(2) {
            assert!((pair[0].distance(pair[1]) - 0.7).abs() < 1e-9);
        }
        let last_gap = centers[centers.len() - 2].distance(centers[centers.len() - 1]);
        assert!(last_gap > 0.0 && last_gap <= 0.7 + 1e-9);
    }

    #[test]
    fn test_sphere_centers_degenerate() {
        let p = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!(generate_sphere_centers(p, p, 1.0).unwrap(), vec![p]);
        assert!(generate_sphere_centers(DVec3::ZERO, DVec3::ONE, 0.0).is_err());
        assert!(generate_sphere_centers(DVec3::ZERO, DVec3::ONE, -2.0).is_err());
    }

    #[test]
    fn test_sphere_centers_count_is_capped() {
        let end = DVec3::new(1000.0, 0.0, 0.0);
        let err = generate_sphere_centers(DVec3::ZERO, end, 1e-6).unwrap_err();
        assert!(matches!(err, IndexError::InvalidInput { .. }), "7e8 centers are refused");

        let interval = 1000.0 / (MAX_SPHERE_CENTERS - 2) as f64;
        let centers = generate_sphere_centers(DVec3::ZERO, end, interval * 1.000_001).unwrap();
        assert!(centers.len() <= MAX_SPHERE_CENTERS, "got {} centers", centers.len());
    }

    #[test]
    fn test_prelude_covers_tree_configuration() {
        use crate::prelude::*;

        let config = TreeConfig::default()
            .with_split_axis(SplitAxis::Cycle)
            .with_split_threshold(SplitThreshold::Midpoint);
        let tree = PartitionTree::build(&line(16), config.with_max_points_per_leaf(4)).unwrap();
        assert_eq!(tree.config().split_axis, SplitAxis::Cycle);
        assert_eq!(tree.count_at_level(2), 4);
    }

    #[test]
    fn test_projection_range() {
        let b = Bounds::new(DVec3::ZERO, DVec3::ONE);
        assert_eq!(projection_range(&b, DVec3::ZERO, DVec3::X), (0.0, 1.0));
        assert_eq!(projection_range(&b, DVec3::new(0.5, 0.0, 0.0), -DVec3::X), (-0.5, 0.5));
        let (lo, hi) = projection_range(&b, DVec3::ZERO, DVec3::ONE.normalize());
        assert!(lo.abs() < 1e-12);
        assert!((hi - 3.0_f64.sqrt()).abs() < 1e-12);
    }
}
