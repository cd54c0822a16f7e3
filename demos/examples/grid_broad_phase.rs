// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial hash broad phase.
//!
//! Scatter boxes, query a region, then move one across cells.
//!
//! Run:
//! - `cargo run -p kinema_demos --example grid_broad_phase`

use kinema_geom::Aabb;
use kinema_grid::SpatialHash;

fn main() {
    let mut grid = SpatialHash::new(64.0);
    let mut entries = Vec::new();
    for i in 0..10_u32 {
        let x = f64::from(i) * 40.0;
        entries.push(grid.insert(i, Aabb::from_coords(x, 0.0, x + 20.0, 20.0)));
    }
    let first = Aabb::from_coords(0.0, 0.0, 100.0, 100.0);
    println!("cells under the first 100 units: {:?}", grid.key(&first));

    let region = Aabb::from_coords(0.0, 0.0, 100.0, 30.0);
    let candidates = grid.unfiltered_search(&region);
    println!("candidates in {region:?}: {candidates:?}");
    assert!(candidates.contains(&0) && candidates.contains(&2), "0 and 2 lie in the region");

    // Move id 9 from the far end to the origin.
    let moved = grid.update_entry(entries[9], Aabb::from_coords(0.0, 40.0, 10.0, 50.0));
    println!("id 9 now covers cells {:?}", moved.keys);
    assert!(grid.unfiltered_search(&region).contains(&9));
    println!("world bounds: {:?}", grid.boundaries());
}
