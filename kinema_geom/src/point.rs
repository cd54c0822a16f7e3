// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point helpers. Points are immutable values; every function returns a new point.

use kurbo::Vec2;

pub use kurbo::Point;

/// Cosine and sine values this close to zero are snapped to exactly zero.
const TRIG_SNAP: f64 = 1e-10;

/// Cosine and sine of an angle given in degrees.
///
/// Results within `1e-10` of zero are snapped to `0.0`, so quarter turns and full turns
/// map integer coordinates onto integer coordinates exactly.
pub fn cos_sin(degrees: f64) -> (f64, f64) {
    let v = Vec2::from_angle(degrees.to_radians());
    (snap(v.x), snap(v.y))
}

#[inline]
fn snap(v: f64) -> f64 {
    if v > -TRIG_SNAP && v < TRIG_SNAP {
        0.0
    } else {
        v
    }
}

/// Rotate `p` about `origin` by `degrees` (positive turns from +x toward +y).
///
/// A point equal to the origin is returned unchanged.
///
/// ```
/// use kinema_geom::{Point, rotate_point};
///
/// let p = rotate_point(Point::new(4.0, 1.0), Point::new(3.0, 1.0), 90.0);
/// assert_eq!(p, Point::new(3.0, 2.0));
/// ```
pub fn rotate_point(p: Point, origin: Point, degrees: f64) -> Point {
    if p == origin {
        return p;
    }
    let (cos, sin) = cos_sin(degrees);
    let a = p - origin;
    Point::new(
        origin.x + a.x * cos - a.y * sin,
        origin.y + a.x * sin + a.y * cos,
    )
}

/// Elementwise minimum of two points.
pub fn min_point(a: Point, b: Point) -> Point {
    Point::new(a.x.min(b.x), a.y.min(b.y))
}

/// Elementwise maximum of two points.
pub fn max_point(a: Point, b: Point) -> Point {
    Point::new(a.x.max(b.x), a.y.max(b.y))
}

/// Elementwise minimum over a set of points, seeded with `+∞`.
///
/// An empty set yields `(+∞, +∞)`.
pub fn min_points(points: impl IntoIterator<Item = Point>) -> Point {
    points.into_iter().fold(Point::new(f64::INFINITY, f64::INFINITY), min_point)
}

/// Elementwise maximum over a set of points, seeded with `−∞`.
///
/// An empty set yields `(−∞, −∞)`.
pub fn max_points(points: impl IntoIterator<Item = Point>) -> Point {
    points.into_iter().fold(Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY), max_point)
}

/// The vector from `a` to `b`.
pub fn edge(a: Point, b: Point) -> Vec2 {
    b - a
}

/// Translate a point.
pub fn shift(p: Point, dx: f64, dy: f64) -> Point {
    Point::new(p.x + dx, p.y + dy)
}

/// Componentwise sum of two points.
pub fn add_points(a: Point, b: Point) -> Point {
    Point::new(a.x + b.x, a.y + b.y)
}

/// Componentwise difference `a - b`, as a point.
pub fn subtract_points(a: Point, b: Point) -> Point {
    Point::new(a.x - b.x, a.y - b.y)
}
