//! Find the points near an axis with the sphere-sweep cylinder search.
//!
//! ```bash
//! RUST_LOG=debug cargo run --example cylinder_search
//! ```

use glam::DVec3;
use pointloc::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // A 20 x 20 x 20 lattice with unit spacing
    let cloud: PointCloud = (0..8000)
        .map(|i| DVec3::new((i % 20) as f64, ((i / 20) % 20) as f64, (i / 400) as f64))
        .collect();
    let mut locator = PointLocator::new(cloud);
    let mut results = Vec::new();

    println!("=== Cylinder Search Example ===\n");

    // Query 1: vertical line through a lattice column
    let search = CylinderSearch::default();
    match search.find(&mut locator, DVec3::new(10.0, 10.0, 0.0), DVec3::Z, 0.5, &mut results) {
        Ok(()) => {
            println!("Query 1: radius 0.5 around the column at (10, 10):");
            println!("  Found {} points", results.len());
            assert_eq!(results.len(), 20, "one column of the lattice");
            println!("  ✓ Correct!\n");
        }
        Err(err) => eprintln!("query 1 failed: {err}"),
    }

    // Query 2: diagonal axis, wider radius
    let direction = DVec3::new(1.0, 1.0, 1.0);
    match search.find(&mut locator, DVec3::ZERO, direction, 1.5, &mut results) {
        Ok(()) => {
            println!("Query 2: radius 1.5 around the main diagonal:");
            println!("  Found {} points", results.len());
            let u = direction.normalize();
            let farthest = results
                .iter()
                .filter_map(|&id| locator.tree()?.point(id))
                .map(|p| (p - p.dot(u) * u).length())
                .fold(0.0, f64::max);
            println!("  Farthest from the axis: {farthest:.3}\n");
        }
        Err(err) => eprintln!("query 2 failed: {err}"),
    }

    // Query 3: a zero direction is rejected
    match search.find(&mut locator, DVec3::ZERO, DVec3::ZERO, 1.0, &mut results) {
        Ok(()) => println!("Query 3 unexpectedly succeeded"),
        Err(err) => println!("Query 3: zero direction rejected: {err}"),
    }

    info!(points = locator.data_set().len(), "done");
}
