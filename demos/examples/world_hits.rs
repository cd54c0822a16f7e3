// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit checks in a world.
//!
//! A ball rolls through two walls; each contact is reported once when it starts and once when
//! it ends.
//!
//! Run:
//! - `cargo run -p kinema_demos --example world_hits`

use kinema_geom::Rect;
use kinema_world::{Event, EventKind, HullShape, World};
use kurbo::Vec2;

fn main() {
    let mut world = World::new();
    let ball = world.spawn(Rect::new(0.0, 0.0, 10.0, 10.0));
    world.collision(ball, HullShape::Rect).unwrap();
    world.enable_motion(ball).unwrap();
    world.set_velocity(ball, Vec2::new(60.0, 0.0)).unwrap();

    for x in [40.0, 90.0] {
        let wall = world.spawn(Rect::new(x, -20.0, 5.0, 50.0));
        world.collision(wall, HullShape::Rect).unwrap();
        world.add_tag(wall, "wall").unwrap();
    }

    world.check_hits(ball, &["wall"]).unwrap();
    world
        .bind(ball, EventKind::HitOn, |w, id, ev| {
            if let Event::HitOn { hits, .. } = ev {
                for hit in hits {
                    println!(
                        "frame {}: {id} hit {} (push {:?})",
                        w.frame(),
                        hit.other,
                        hit.mtv.translation()
                    );
                }
            }
        })
        .unwrap();
    world
        .bind(ball, EventKind::HitOff, |w, id, ev| {
            if let Event::HitOff { others, .. } = ev {
                println!("frame {}: {id} left {others:?}", w.frame());
            }
        })
        .unwrap();

    for _ in 0..120 {
        world.tick(1000.0 / 60.0).unwrap();
    }
    println!("ball ended at {:?}", world.pos(ball).unwrap());
}
