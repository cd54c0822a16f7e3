// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kinema Geom: Kurbo-native 2D collision geometry.
//!
//! This crate holds the value types and pure functions the rest of Kinema builds on:
//!
//! - [`Point`]: Kurbo's point, plus [`rotate_point`], [`min_points`], and [`max_points`].
//! - [`Aabb`]: an axis-aligned box with strict [`Aabb::intersects`].
//! - [`Polygon`]: an ordered, implicitly closed vertex list that can be rotated, shifted,
//!   reduced to its [`Aabb`], and tested for containment.
//! - [`Rect`]: the `x`/`y`/`w`/`h` rectangle used for redraw regions and entity snapshots.
//! - [`sat`]: a separating-axis test for convex polygons that yields an [`Mtv`].
//!
//! Touching shapes do not intersect. Every overlap test in this crate uses strict comparisons,
//! so two boxes that share an edge report no contact.
//!
//! ## Example
//!
//! ```rust
//! use kinema_geom::{Point, Polygon, Rect, sat};
//!
//! let a = Polygon::from_rect(&Rect::new(0.0, 0.0, 10.0, 10.0));
//! let b = Polygon::from_rect(&Rect::new(8.0, 2.0, 10.0, 10.0));
//!
//! let mtv = sat(&a, &b).unwrap().expect("boxes overlap");
//! assert_eq!(mtv.overlap, 2.0);
//! assert_eq!((mtv.x, mtv.y), (1.0, 0.0));
//!
//! // Rotating a quarter turn about the first vertex keeps vertex order.
//! let turned = a.rotate(Point::new(0.0, 0.0), 90.0);
//! assert_eq!(turned.points[1], Point::new(0.0, 10.0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod aabb;
mod point;
mod polygon;
mod rect;
mod sat;

pub use aabb::Aabb;
pub use point::{
    Point, add_points, cos_sin, edge, max_point, max_points, min_point, min_points, rotate_point,
    shift, subtract_points,
};
pub use polygon::Polygon;
pub use rect::Rect;
pub use sat::{Mtv, sat};

/// Errors produced by geometric tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GeomError {
    /// The polygon has no edge of non-zero length, so it yields no separating axis.
    #[error("polygon with {vertices} vertices has no usable edge")]
    DegeneratePolygon {
        /// Number of vertices in the rejected polygon.
        vertices: usize,
    },
}

/// Round toward negative infinity without relying on `std`.
#[inline]
pub(crate) fn floor(v: f64) -> f64 {
    // Beyond 2^52 every finite f64 is already integral.
    if !(-4.5e15..=4.5e15).contains(&v) {
        return v;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "the value is within the exactly representable integer range."
    )]
    let f = (v as i64) as f64;
    if f > v { f - 1.0 } else { f }
}

/// Round toward positive infinity without relying on `std`.
#[inline]
pub(crate) fn ceil(v: f64) -> f64 {
    -floor(-v)
}
