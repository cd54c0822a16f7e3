// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `x`/`y`/`w`/`h` rectangle form.

use alloc::vec::Vec;

use kurbo::Point;

use crate::{Aabb, Polygon, ceil, floor};

/// Axis-aligned rectangle stored as origin plus size.
///
/// This is the shape entity state is expressed in and the form redraw regions are merged in.
/// Convert with [`Rect::to_aabb`] and [`Polygon::from_rect`] for the collision paths.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Rect {
    /// Create a rectangle.
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// `x + w`.
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// `y + h`.
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// `w * h`.
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// Strict overlap test; shared edges are not an overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Smallest rectangle covering both.
    pub fn merge(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let r = self.right().max(other.right());
        let b = self.bottom().max(other.bottom());
        Self::new(x, y, r - x, b - y)
    }

    /// Merge consecutive, overlapping rectangles into each other.
    ///
    /// Walks the list from the back; whenever a rectangle overlaps its successor the two are
    /// replaced by their merge. Only neighbors are compared, so disjoint runs survive as-is.
    /// This is a cheap coalescing step for redraw regions, where rectangles that disturb each
    /// other tend to be recorded next to each other.
    ///
    /// ```
    /// use kinema_geom::Rect;
    ///
    /// let mut set = vec![
    ///     Rect::new(0.0, 0.0, 10.0, 10.0),
    ///     Rect::new(5.0, 5.0, 10.0, 10.0),
    ///     Rect::new(100.0, 100.0, 1.0, 1.0),
    /// ];
    /// Rect::merge_overlapping(&mut set);
    /// assert_eq!(set, vec![Rect::new(0.0, 0.0, 15.0, 15.0), Rect::new(100.0, 100.0, 1.0, 1.0)]);
    /// ```
    pub fn merge_overlapping(set: &mut Vec<Self>) {
        if set.len() < 2 {
            return;
        }
        let mut n = set.len() - 1;
        while n > 0 {
            n -= 1;
            if set[n].overlaps(&set[n + 1]) {
                set[n] = set[n].merge(&set[n + 1]);
                set.remove(n + 1);
            }
        }
    }

    /// Minimum bounding rectangle of a set, or `None` for an empty set.
    pub fn bounding(set: impl IntoIterator<Item = Self>) -> Option<Self> {
        set.into_iter().reduce(|mbr, r| mbr.merge(&r))
    }

    /// Smallest rectangle with integer coordinates enclosing this one.
    pub fn integer_bounds(&self) -> Self {
        let x = floor(self.x);
        let y = floor(self.y);
        Self::new(x, y, ceil(self.right()) - x, ceil(self.bottom()) - y)
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Whether `other` lies entirely inside this rectangle (edges may coincide).
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Corners as an [`Aabb`].
    pub fn to_aabb(&self) -> Aabb {
        Aabb::from_coords(self.x, self.y, self.right(), self.bottom())
    }

    /// Corners as a four-vertex [`Polygon`].
    pub fn to_polygon(&self) -> Polygon {
        Polygon::from_rect(self)
    }
}

impl From<kurbo::Rect> for Rect {
    fn from(r: kurbo::Rect) -> Self {
        let r = r.abs();
        Self::new(r.x0, r.y0, r.width(), r.height())
    }
}

impl From<Rect> for kurbo::Rect {
    fn from(r: Rect) -> Self {
        Self::new(r.x, r.y, r.right(), r.bottom())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(9.0, 9.0, 5.0, 5.0)));
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 5.0, 5.0)));
    }

    #[test]
    fn merge_covers_both() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(-5.0, 5.0, 10.0, 20.0);
        assert_eq!(a.merge(&b), Rect::new(-5.0, 0.0, 15.0, 25.0));
    }

    #[test]
    fn merge_overlapping_chains_from_the_back() {
        let mut set = vec![
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(8.0, 0.0, 10.0, 10.0),
            Rect::new(16.0, 0.0, 10.0, 10.0),
        ];
        Rect::merge_overlapping(&mut set);
        assert_eq!(set, vec![Rect::new(0.0, 0.0, 26.0, 10.0)]);
    }

    #[test]
    fn merge_overlapping_keeps_disjoint() {
        let mut set = vec![Rect::new(0.0, 0.0, 1.0, 1.0), Rect::new(5.0, 5.0, 1.0, 1.0)];
        Rect::merge_overlapping(&mut set);
        assert_eq!(set.len(), 2);
        let mut single = vec![Rect::new(0.0, 0.0, 1.0, 1.0)];
        Rect::merge_overlapping(&mut single);
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn bounding_set() {
        assert_eq!(Rect::bounding([]), None);
        let mbr = Rect::bounding([
            Rect::new(0.0, 0.0, 1.0, 1.0),
            Rect::new(10.0, -4.0, 2.0, 2.0),
        ]);
        assert_eq!(mbr, Some(Rect::new(0.0, -4.0, 12.0, 5.0)));
    }

    #[test]
    fn integer_bounds_enclose() {
        let r = Rect::new(0.5, -1.25, 2.0, 2.0).integer_bounds();
        assert_eq!(r, Rect::new(0.0, -2.0, 3.0, 3.0));
        let exact = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(exact.integer_bounds(), exact);
    }

    #[test]
    fn containment() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_point(Point::new(10.0, 0.0)));
        assert!(!r.contains_point(Point::new(10.5, 0.0)));
        assert!(r.contains_rect(&Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(!r.contains_rect(&Rect::new(1.0, 1.0, 10.0, 1.0)));
        assert_eq!(r.area(), 100.0);
    }
}
