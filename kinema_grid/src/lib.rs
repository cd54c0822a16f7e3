// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kinema Grid: a uniform spatial hash for broad-phase collision queries.
//!
//! The plane is cut into square cells of a fixed size (64 units unless configured otherwise).
//! Each id is listed in every cell its AABB overlaps, so a query only has to look at the
//! buckets under the query box. Results are candidates, not hits: ids come back deduplicated
//! but no exact overlap test is run. Pair this with [`kinema_geom::Aabb::intersects`] and
//! [`kinema_geom::sat`] for the narrow phase.
//!
//! - [`SpatialHash`]: the index. Ids are any `Copy + Ord` handle.
//! - [`Entry`]: what [`SpatialHash::insert`] hands back; keep it to update or remove the id later.
//! - [`CellRange`]: the inclusive cell rectangle an AABB maps to.
//!
//! Cell coordinates are `floor(coord / cell_size)` per axis, so an AABB whose max edge lands
//! exactly on a cell boundary is also listed in the next cell.
//! Coordinates are 64-bit and saturate, so boxes far from the origin still land in a cell.
//! A box covering more than [`MAX_LISTED_CELLS`] cells is not bucketed at all: it is returned
//! by every search.
//!
//! ## Example
//!
//! ```rust
//! use kinema_geom::Aabb;
//! use kinema_grid::SpatialHash;
//!
//! let mut grid = SpatialHash::new(64.0);
//! let a = grid.insert(1_u32, Aabb::from_coords(0.0, 0.0, 10.0, 10.0));
//! let _b = grid.insert(2_u32, Aabb::from_coords(500.0, 500.0, 510.0, 510.0));
//!
//! let near: Vec<u32> = grid.unfiltered_search(&Aabb::from_coords(0.0, 0.0, 20.0, 20.0));
//! assert_eq!(near, vec![1]);
//!
//! // Moving inside the same cell keeps the entry; crossing cells rebuckets it.
//! let a = grid.update_entry(a, Aabb::from_coords(2.0, 2.0, 12.0, 12.0));
//! let a = grid.update_entry(a, Aabb::from_coords(470.0, 470.0, 480.0, 480.0));
//! assert_eq!(a.keys.x1, 7);
//! assert!(grid.unfiltered_search(&Aabb::from_coords(0.0, 0.0, 20.0, 20.0)).is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod hash;
mod types;

pub use hash::{DEFAULT_CELL_SIZE, MAX_LISTED_CELLS, SpatialHash};
pub use types::{CellRange, Entry};
