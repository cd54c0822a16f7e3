// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned bounding boxes.

use kurbo::Point;

use crate::Rect;
use crate::point::{max_point, max_points, min_point, min_points};

/// Axis-aligned bounding box given by its minimum and maximum corners.
///
/// Boxes built from geometry satisfy `min.x <= max.x` and `min.y <= max.y`.
/// A box reduced from an empty point set is inverted (`+∞` min, `−∞` max) and
/// intersects nothing.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point,
    /// Maximum corner.
    pub max: Point,
}

impl Aabb {
    /// Create a box from its corners.
    pub const fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Create a box from `min_x`, `min_y`, `max_x`, `max_y`.
    pub const fn from_coords(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    /// Smallest box containing every point.
    pub fn from_points(points: impl IntoIterator<Item = Point> + Clone) -> Self {
        Self::new(min_points(points.clone()), max_points(points))
    }

    /// Width (`max.x - min.x`).
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Height (`max.y - min.y`).
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Center point.
    pub fn center(&self) -> Point {
        self.min.midpoint(self.max)
    }

    /// Strict overlap test. Boxes that only touch along an edge or corner do not intersect.
    ///
    /// ```
    /// use kinema_geom::Aabb;
    ///
    /// let a = Aabb::from_coords(0.0, 0.0, 10.0, 10.0);
    /// assert!(a.intersects(&Aabb::from_coords(5.0, 5.0, 15.0, 15.0)));
    /// assert!(!a.intersects(&Aabb::from_coords(10.0, 0.0, 20.0, 10.0)));
    /// ```
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Whether `other` lies entirely inside this box (edges may coincide).
    pub fn contains(&self, other: &Self) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Self) -> Self {
        Self::new(min_point(self.min, other.min), max_point(self.max, other.max))
    }

    /// Translate the box.
    pub fn shift(&self, dx: f64, dy: f64) -> Self {
        Self::from_coords(
            self.min.x + dx,
            self.min.y + dy,
            self.max.x + dx,
            self.max.y + dy,
        )
    }

    /// The box as an `x`/`y`/`w`/`h` rectangle.
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.min.x, self.min.y, self.width(), self.height())
    }
}

impl From<kurbo::Rect> for Aabb {
    fn from(r: kurbo::Rect) -> Self {
        let r = r.abs();
        Self::from_coords(r.x0, r.y0, r.x1, r.y1)
    }
}

impl From<Aabb> for kurbo::Rect {
    fn from(a: Aabb) -> Self {
        Self::new(a.min.x, a.min.y, a.max.x, a.max.y)
    }
}

impl From<Rect> for Aabb {
    fn from(r: Rect) -> Self {
        r.to_aabb()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_box_inside_another_intersects() {
        let a = Aabb::from_coords(200.0, 200.0, 200.0, 200.0);
        let b = Aabb::from_coords(100.0, 100.0, 300.0, 300.0);
        let c = Aabb::from_coords(10.0, 10.0, 100.0, 100.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!c.intersects(&a));
    }

    #[test]
    fn touching_boxes_do_not_intersect() {
        let a = Aabb::from_coords(0.0, 0.0, 10.0, 10.0);
        let right = Aabb::from_coords(10.0, 0.0, 20.0, 10.0);
        let corner = Aabb::from_coords(10.0, 10.0, 20.0, 20.0);
        assert!(!a.intersects(&right));
        assert!(!a.intersects(&corner));
    }

    #[test]
    fn from_points_and_union() {
        let a = Aabb::from_points([Point::new(3.0, -1.0), Point::new(-2.0, 4.0)]);
        assert_eq!(a, Aabb::from_coords(-2.0, -1.0, 3.0, 4.0));
        let b = Aabb::from_coords(0.0, 0.0, 10.0, 1.0);
        assert_eq!(a.union(&b), Aabb::from_coords(-2.0, -1.0, 10.0, 4.0));
        assert!(a.union(&b).contains(&a));
    }

    #[test]
    fn empty_point_set_intersects_nothing() {
        let empty = Aabb::from_points(core::iter::empty());
        assert!(!empty.intersects(&Aabb::from_coords(-1e9, -1e9, 1e9, 1e9)));
    }

    #[test]
    fn kurbo_round_trip_normalizes() {
        let a = Aabb::from(kurbo::Rect::new(10.0, 10.0, 0.0, 5.0));
        assert_eq!(a, Aabb::from_coords(0.0, 5.0, 10.0, 10.0));
        let r: kurbo::Rect = a.into();
        assert_eq!(r.width(), 10.0);
        assert_eq!(a.to_rect(), Rect::new(0.0, 5.0, 10.0, 5.0));
    }
}
