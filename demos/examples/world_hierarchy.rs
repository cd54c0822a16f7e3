// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parent and child entities.
//!
//! A turret is attached to a tank. Moving the tank drags the turret; spinning the tank about its
//! center swings the turret around with it.
//!
//! Run:
//! - `cargo run -p kinema_demos --example world_hierarchy`

use kinema_geom::Rect;
use kinema_world::{OriginAlign, World};

fn main() {
    let mut world = World::new();
    let tank = world.spawn(Rect::new(0.0, 0.0, 40.0, 20.0));
    let turret = world.spawn(Rect::new(30.0, 8.0, 20.0, 4.0));
    world.attach(tank, turret).unwrap();

    world.set_position(tank, 100.0, 50.0).unwrap();
    println!("turret after move: {:?}", world.pos(turret).unwrap());
    assert_eq!(world.pos(turret).unwrap().x, 130.0, "turret follows the tank");

    world.set_origin_align(tank, OriginAlign::Center).unwrap();
    world.enable_angular_motion(tank).unwrap();
    world.set_angular_velocity(tank, 90.0).unwrap();
    for _ in 0..10 {
        world.tick(100.0).unwrap();
    }
    println!(
        "tank rotation {:.1}, turret rotation {:.1} at {:?}",
        world.rotation(tank).unwrap(),
        world.rotation(turret).unwrap(),
        world.pos(turret).unwrap()
    );
    println!("tank bounds {:?}", world.aabb(tank).unwrap());
}
