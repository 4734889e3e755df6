//! Fit an oriented bounding box to a slanted slab and query the points inside it.
//!
//! ```bash
//! cargo run --example cuboid_query
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

    // A thin slab tilted 45 degrees about z, plus scattered noise around it
    let along = DVec3::new(1.0, 1.0, 0.0).normalize();
    let across = DVec3::new(-1.0, 1.0, 0.0).normalize();
    let mut slab = Vec::new();
    for i in 0..40 {
        for j in 0..4 {
            for k in 0..10 {
                let (i, j, k) = (i as f64, j as f64, k as f64);
                slab.push(along * i * 0.5 + across * j * 0.25 + DVec3::Z * k * 0.5);
            }
        }
    }
    let mut cloud = PointCloud::from(slab.clone());
    for i in 0..200 {
        let t = i as f64;
        let noise = DVec3::new((t * 0.37).sin() * 20.0, (t * 0.73).cos() * 20.0, t * 0.02);
        let _ = cloud.add_point(noise);
    }

    println!("=== Cuboid Query Example ===\n");

    let obb = match compute_obb(&slab) {
        Ok(obb) => obb,
        Err(err) => {
            eprintln!("box fit failed: {err}");
            return;
        }
    };
    println!("OBB center:       {}", obb.center);
    println!("OBB half extents: {}", obb.half_extents);
    println!("OBB main axis:    {}", obb.axes[0]);

    let mut locator = PointLocator::new(cloud);
    let mut grown = obb;
    grown.half_extents += DVec3::splat(1e-6);

    let mut in_box = Vec::new();
    let mut in_bounds = Vec::new();
    let cuboid = grown.to_cuboid();
    if let Err(err) = locator.find_points_within_cuboid(&cuboid, &mut in_box) {
        eprintln!("cuboid query failed: {err}");
        return;
    }
    if let Err(err) = locator.find_points_within_area(&cuboid.bounds(), &mut in_bounds) {
        eprintln!("area query failed: {err}");
        return;
    }

    println!("\nPoints in the fitted box:       {}", in_box.len());
    println!("Points in its axis-aligned box: {}", in_bounds.len());
    assert!(in_box.len() >= slab.len(), "every slab point lies in its own box");
    assert!(in_box.len() <= in_bounds.len(), "exact test only removes candidates");

    println!("\nBox wireframe:");
    for (a, b) in RegionFrame::from_obb(&obb).edges() {
        println!("  {a} -> {b}");
    }
}
