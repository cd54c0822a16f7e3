// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polygons as ordered, implicitly closed vertex lists.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Point, Vec2};

use crate::point::rotate_point;
use crate::{Aabb, Rect};

/// An ordered vertex sequence; the last vertex connects back to the first.
///
/// Collision hulls built from rectangles list their corners as top-left, top-right,
/// bottom-right, bottom-left (`(x, y)`, `(x + w, y)`, `(x + w, y + h)`, `(x, y + h)`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    /// Vertices in order.
    pub points: Vec<Point>,
}

impl Polygon {
    /// Create a polygon from its vertices.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// The four corners of a rectangle.
    pub fn from_rect(r: &Rect) -> Self {
        Self::new(vec![
            Point::new(r.x, r.y),
            Point::new(r.x + r.w, r.y),
            Point::new(r.x + r.w, r.y + r.h),
            Point::new(r.x, r.y + r.h),
        ])
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the polygon has no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Rotate every vertex about `origin`; vertex count and order are preserved.
    pub fn rotate(&self, origin: Point, degrees: f64) -> Self {
        Self::new(
            self.points
                .iter()
                .map(|&p| rotate_point(p, origin, degrees))
                .collect(),
        )
    }

    /// Translate every vertex.
    pub fn shift(&self, dx: f64, dy: f64) -> Self {
        let d = Vec2::new(dx, dy);
        Self::new(self.points.iter().map(|&p| p + d).collect())
    }

    /// Whether this is an axis-aligned rectangle in the corner order [`Polygon::from_rect`] emits.
    pub fn is_rect(&self) -> bool {
        let [p0, p1, p2, p3] = self.points[..] else {
            return false;
        };
        p0.x == p3.x && p0.y == p1.y && p2.y == p3.y && p1.x == p2.x
    }

    /// Smallest box containing every vertex.
    pub fn to_aabb(&self) -> Aabb {
        Aabb::from_points(self.points.iter().copied())
    }

    /// Edge vectors `v[i + 1] - v[i]`, wrapping from the last vertex to the first.
    pub fn edges(&self) -> impl Iterator<Item = Vec2> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| self.points[(i + 1) % n] - self.points[i])
    }

    /// Average of the vertices.
    pub fn centroid(&self) -> Point {
        if self.points.is_empty() {
            return Point::ZERO;
        }
        let sum = self
            .points
            .iter()
            .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
        #[allow(
            clippy::cast_precision_loss,
            reason = "vertex counts are far below 2^52."
        )]
        let n = self.points.len() as f64;
        (sum / n).to_point()
    }

    /// Even-odd point containment. Points exactly on an edge may land on either side.
    ///
    /// ```
    /// use kinema_geom::{Point, Polygon, Rect};
    ///
    /// let square = Polygon::from_rect(&Rect::new(0.0, 0.0, 4.0, 4.0));
    /// let diamond = square.rotate(Point::new(2.0, 2.0), 45.0);
    /// assert!(diamond.contains_point(Point::new(2.0, 0.0)));
    /// assert!(!diamond.contains_point(Point::new(0.2, 0.2)));
    /// ```
    pub fn contains_point(&self, p: Point) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[j];
            if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

impl From<Rect> for Polygon {
    fn from(r: Rect) -> Self {
        Self::from_rect(&r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(p: &[(f64, f64)]) -> Vec<Point> {
        p.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn rect_corners_in_order() {
        let p = Polygon::from_rect(&Rect::new(3.0, 1.0, 1.0, 2.0));
        assert_eq!(p.points, pts(&[(3.0, 1.0), (4.0, 1.0), (4.0, 3.0), (3.0, 3.0)]));
        assert!(p.is_rect());
    }

    #[test]
    fn quarter_turn_about_first_corner() {
        let p = Polygon::from_rect(&Rect::new(3.0, 1.0, 1.0, 2.0));
        let r = p.rotate(Point::new(3.0, 1.0), 90.0);
        assert_eq!(r.points, pts(&[(3.0, 1.0), (3.0, 2.0), (1.0, 2.0), (1.0, 1.0)]));
        assert_eq!(r.len(), p.len());
        assert!(!r.is_rect());
    }

    #[test]
    fn shift_and_bounds() {
        let p = Polygon::new(pts(&[(0.0, 0.0), (4.0, 1.0), (1.0, 3.0)])).shift(1.0, -1.0);
        assert_eq!(p.points[1], Point::new(5.0, 0.0));
        assert_eq!(p.to_aabb(), Aabb::from_coords(1.0, -1.0, 5.0, 2.0));
    }

    #[test]
    fn is_rect_rejects_other_shapes() {
        assert!(!Polygon::new(pts(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)])).is_rect());
        assert!(!Polygon::new(pts(&[(0.0, 0.0), (2.0, 0.0), (3.0, 1.0), (0.0, 1.0)])).is_rect());
    }

    #[test]
    fn edges_wrap_around() {
        let p = Polygon::from_rect(&Rect::new(0.0, 0.0, 2.0, 1.0));
        let e: Vec<Vec2> = p.edges().collect();
        assert_eq!(
            e,
            [
                Vec2::new(2.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(-2.0, 0.0),
                Vec2::new(0.0, -1.0)
            ]
        );
        assert_eq!(p.centroid(), Point::new(1.0, 0.5));
    }

    #[test]
    fn contains_point_even_odd() {
        let tri = Polygon::new(pts(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]));
        assert!(tri.contains_point(Point::new(2.0, 2.0)));
        assert!(!tri.contains_point(Point::new(8.0, 8.0)));
        assert!(!tri.contains_point(Point::new(-1.0, 5.0)));
        assert!(!Polygon::new(pts(&[(0.0, 0.0), (1.0, 1.0)])).contains_point(Point::new(0.5, 0.5)));
    }
}
