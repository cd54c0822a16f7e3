// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kinema World: a frame-driven arena of 2D entities with geometry, collision, and kinematics.
//!
//! Each entity is an axis-aligned rectangle with a rotation about a pivot, a z-order, and
//! optional capabilities layered on top:
//!
//! - Collision: a rotated rectangle hull, entered into a [`kinema_grid::SpatialHash`] and
//!   tested with [`kinema_geom::sat`]. See [`World::collision`] and [`World::hit`].
//! - Motion: per-frame integration of linear velocity and acceleration. See
//!   [`World::enable_motion`] and [`World::enable_gravity`].
//! - Angular motion: the same for rotation. See [`World::enable_angular_motion`].
//!
//! ## Change protocol
//!
//! Every geometric mutation goes through the world. A mutation that changes nothing does
//! nothing. Otherwise the prior rectangle is snapshotted, the new value applied, cached
//! bounds marked stale, and events delivered to the entity's handlers:
//!
//! | Mutation           | Events                                             |
//! |--------------------|----------------------------------------------------|
//! | position           | [`Event::Move`], [`Event::Invalidate`]             |
//! | width, height      | [`Event::Resize`], [`Event::Move`], [`Event::Invalidate`] |
//! | rotation           | [`Event::Rotate`], [`Event::Invalidate`]           |
//! | z                  | [`Event::Reorder`], [`Event::Invalidate`]          |
//! | origin             | [`Event::OriginChanged`], [`Event::Invalidate`]    |
//!
//! The world reacts to these events itself: children attached with [`World::attach`] follow
//! their parent's moves and rotations, and collision hulls follow their entity.
//!
//! ## Frames
//!
//! [`World::tick`] runs pre-frame handlers, then delivers [`Event::UpdateFrame`] to every live,
//! non-frozen entity in slot order, then runs post-frame handlers. Integrators and hit checks
//! hang off that event.
//!
//! ## Example
//!
//! ```rust
//! use kinema_geom::Rect;
//! use kinema_world::{Event, EventKind, HullShape, World};
//! use kurbo::Vec2;
//! use std::{cell::Cell, rc::Rc};
//!
//! let mut world = World::new();
//! let ball = world.spawn(Rect::new(0.0, 0.0, 10.0, 10.0));
//! let wall = world.spawn(Rect::new(30.0, 0.0, 10.0, 50.0));
//! for e in [ball, wall] {
//!     world.collision(e, HullShape::Rect)?;
//! }
//! world.add_tag(wall, "wall")?;
//!
//! world.enable_motion(ball)?;
//! world.set_velocity(ball, Vec2::new(100.0, 0.0))?;
//! world.check_hits(ball, &["wall"])?;
//!
//! let hits = Rc::new(Cell::new(0));
//! let seen = hits.clone();
//! world.bind(ball, EventKind::HitOn, move |_, _, ev| {
//!     if let Event::HitOn { hits, .. } = ev {
//!         seen.set(seen.get() + hits.len());
//!     }
//! })?;
//!
//! // 100 ms per frame moves the ball 10 units; it overlaps the wall on the third frame.
//! for _ in 0..4 {
//!     world.tick(100.0)?;
//! }
//! assert_eq!(hits.get(), 1);
//! # Ok::<(), kinema_world::WorldError>(())
//! ```
//!
//! This crate is `no_std` and uses `alloc`. The world is single-threaded.

#![no_std]

extern crate alloc;

mod collision;
mod config;
mod error;
mod event;
mod motion;
mod pool;
mod types;
mod world;

pub use config::WorldConfig;
pub use error::WorldError;
pub use event::{
    Event, EventKind, FrameHandler, FrameInfo, Handler, HandlerId, HitCallback, HitData,
    HitEndCallback, HitKind,
};
pub use motion::{AngularMotion, LinearMotion};
pub use pool::{PoolError, PoolSlot, RectPool};
pub use types::{
    Axis, Capabilities, Direction, EntityId, FramePhase, HullShape, OriginAlign, Property,
};
pub use world::World;
