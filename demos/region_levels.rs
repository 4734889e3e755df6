//! Walk the regions of a partition tree level by level.
//!
//! Builds a tree over a sampled sphere surface and prints region counts per level,
//! the root-to-leaf path of one point, and the wireframe of the leaf holding it.
//!
//! ```bash
//! RUST_LOG=debug cargo run --example region_levels
//! ```

use glam::DVec3;
use pointloc::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Fibonacci sphere: 2000 well-spread points on the unit sphere
    let n = 2000;
    let golden = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
    let cloud: PointCloud = (0..n)
        .map(|i| {
            let y = 1.0 - 2.0 * (i as f64 + 0.5) / n as f64;
            let r = (1.0 - y * y).sqrt();
            let theta = golden * i as f64;
            DVec3::new(r * theta.cos(), y, r * theta.sin())
        })
        .collect();

    let config = TreeConfig::default().with_max_points_per_leaf(32);
    let mut locator = PointLocator::with_config(cloud, config);
    let tree = match locator.build() {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("build failed: {err}");
            return;
        }
    };

    println!("=== Region Levels ===\n");
    let max_level = tree.max_level();
    println!(
        "points: {}, nodes: {}, max level: {max_level}",
        tree.len(),
        tree.node_count()
    );
    for level in 0..=tree.max_level() {
        println!("  level {level:>2}: {:>4} regions", tree.count_at_level(level));
    }
    let past = max_level + 3;
    println!("  level {past:>2}: {:>4} regions (clamped)", tree.count_at_level(past));
    println!("  level {:>2}: {:>4} regions", -1, tree.count_at_level(-1));

    let p = DVec3::new(0.0, 1.0, 0.0);
    let query = match tree.find_closest_point(p) {
        Some(id) => tree.point(id).unwrap_or(p),
        None => return,
    };
    println!("\nPath to the region of {query}:");
    for (depth, bounds) in tree.region_path_for_point(query).iter().enumerate() {
        println!("  depth {depth:>2}: min {} max {}", bounds.min, bounds.max);
    }

    if let Some(leaf) = tree.frames_for_point(query).last() {
        println!("\nLeaf wireframe:");
        for (a, b) in leaf.edges() {
            println!("  {a} -> {b}");
        }
    }
}
