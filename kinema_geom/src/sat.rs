// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Separating-axis test for convex polygons.

use alloc::vec::Vec;

use kurbo::Vec2;

use crate::{GeomError, Polygon};

/// Minimum translation vector: the unit axis of least penetration and the depth along it.
///
/// The axis points from the first polygon passed to [`sat`] toward the second, so moving
/// the second polygon by `overlap` along `(x, y)` separates the pair.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Mtv {
    /// Axis x component.
    pub x: f64,
    /// Axis y component.
    pub y: f64,
    /// Penetration depth along the axis; always positive.
    pub overlap: f64,
}

impl Mtv {
    /// Unit axis.
    pub fn axis(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// `axis * overlap`.
    pub fn translation(&self) -> Vec2 {
        self.axis() * self.overlap
    }
}

/// Test two convex polygons for overlap.
///
/// Returns `Ok(None)` when some edge normal of either polygon separates them (touching counts
/// as separated), otherwise the axis with the smallest overlap, earliest axis first on ties.
/// Axes are taken from the edges of `a`, then the edges of `b`; zero-length edges are skipped.
///
/// A polygon without a single edge of non-zero length is rejected with
/// [`GeomError::DegeneratePolygon`].
///
/// ```
/// use kinema_geom::{Polygon, Rect, sat};
///
/// let a = Polygon::from_rect(&Rect::new(0.0, 0.0, 10.0, 10.0));
/// let far = Polygon::from_rect(&Rect::new(20.0, 0.0, 10.0, 10.0));
/// assert_eq!(sat(&a, &far), Ok(None));
/// ```
pub fn sat(a: &Polygon, b: &Polygon) -> Result<Option<Mtv>, GeomError> {
    let axes_a = axes(a)?;
    let axes_b = axes(b)?;

    if a.is_rect() && b.is_rect() && is_upright(a) && is_upright(b) {
        return Ok(rect_overlap(a, b));
    }

    let mut best: Option<(Vec2, f64)> = None;
    for axis in axes_a.into_iter().chain(axes_b) {
        let (a_min, a_max) = project(a, axis);
        let (b_min, b_max) = project(b, axis);
        let overlap = a_max.min(b_max) - a_min.max(b_min);
        if overlap <= 0.0 {
            return Ok(None);
        }
        if best.is_none_or(|(_, o)| overlap < o) {
            best = Some((axis, overlap));
        }
    }

    Ok(best.map(|(axis, overlap)| oriented(a, b, axis, overlap)))
}

/// Unit edge normals `(-e.y, e.x) / |e|`.
fn axes(p: &Polygon) -> Result<Vec<Vec2>, GeomError> {
    let out: Vec<Vec2> = p
        .edges()
        .filter_map(|e| {
            let len = e.hypot();
            (len > 0.0).then(|| Vec2::new(-e.y, e.x) / len)
        })
        .collect();
    if out.is_empty() {
        return Err(GeomError::DegeneratePolygon { vertices: p.len() });
    }
    Ok(out)
}

fn project(p: &Polygon, axis: Vec2) -> (f64, f64) {
    p.points
        .iter()
        .map(|v| v.to_vec2().dot(axis))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| {
            (lo.min(d), hi.max(d))
        })
}

fn oriented(a: &Polygon, b: &Polygon, axis: Vec2, overlap: f64) -> Mtv {
    let between = b.centroid() - a.centroid();
    let axis = if between.dot(axis) < 0.0 { -axis } else { axis };
    Mtv {
        x: axis.x,
        y: axis.y,
        overlap,
    }
}

/// Positive width and height in `from_rect` corner order.
fn is_upright(p: &Polygon) -> bool {
    p.points[1].x > p.points[0].x && p.points[3].y > p.points[0].y
}

/// Axis-aligned fast path.
///
/// An upright rectangle's normals are `(0, 1)`, `(-1, 0)`, `(0, -1)`, `(1, 0)` in that order,
/// and opposite normals measure the same overlap. The general walk therefore picks `(0, 1)`
/// unless the x overlap is strictly smaller, in which case it picks `(-1, 0)`; the picked
/// axis is then oriented toward `b`.
fn rect_overlap(a: &Polygon, b: &Polygon) -> Option<Mtv> {
    let (a0, a2) = (a.points[0], a.points[2]);
    let (b0, b2) = (b.points[0], b.points[2]);
    let ox = a2.x.min(b2.x) - a0.x.max(b0.x);
    let oy = a2.y.min(b2.y) - a0.y.max(b0.y);
    if ox <= 0.0 || oy <= 0.0 {
        return None;
    }
    let (axis, overlap) = if ox < oy {
        (Vec2::new(-1.0, 0.0), ox)
    } else {
        (Vec2::new(0.0, 1.0), oy)
    };
    Some(oriented(a, b, axis, overlap))
}
