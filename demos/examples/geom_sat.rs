// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Separating-axis basics.
//!
//! Build two rectangles, rotate one, and read the minimum translation vector.
//!
//! Run:
//! - `cargo run -p kinema_demos --example geom_sat`

use kinema_geom::{Point, Polygon, Rect, sat};

fn main() {
    let a = Polygon::from_rect(&Rect::new(0.0, 0.0, 10.0, 10.0));
    let b = Polygon::from_rect(&Rect::new(8.0, 2.0, 10.0, 10.0));

    // Upright rectangles take the fast path.
    let mtv = sat(&a, &b).unwrap().expect("rectangles overlap");
    println!("upright: axis {:?}, overlap {}", mtv.axis(), mtv.overlap);
    assert_eq!(mtv.overlap, 2.0, "overlap along x is the smaller one");

    // Push b out of a along the vector.
    let pushed = b.shift(mtv.translation().x, mtv.translation().y);
    assert!(sat(&a, &pushed).unwrap().is_none(), "touching is not overlapping");

    // A diamond reaches further than its bounding square suggests along the diagonals only.
    let diamond = a.rotate(Point::new(5.0, 5.0), 45.0);
    println!("diamond bounds: {:?}", diamond.to_aabb());
    let far = Polygon::from_rect(&Rect::new(11.0, 11.0, 5.0, 5.0));
    assert!(sat(&diamond, &far).unwrap().is_none());
    let near = Polygon::from_rect(&Rect::new(11.5, 3.0, 5.0, 5.0));
    let hit = sat(&diamond, &near).unwrap().expect("tip pokes into near");
    println!("diamond vs near: axis {:?}, overlap {:.3}", hit.axis(), hit.overlap);
}
