// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear and angular kinematics integrated once per frame.
//!
//! Both integrators use constant acceleration over the frame:
//!
//! ```text
//! delta = v * dt + a * dt² / 2
//! v    += a * dt
//! ```
//!
//! with `dt` in seconds. Velocities are in units (or degrees) per second.

use kurbo::Vec2;

use kinema_geom::Aabb;

use crate::World;
use crate::error::WorldError;
use crate::event::{Action, Event, EventKind, FrameInfo};
use crate::types::{Capabilities, EntityId};

/// Linear motion state.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LinearMotion {
    /// Units per second.
    pub velocity: Vec2,
    /// Units per second squared.
    pub acceleration: Vec2,
    /// Displacement applied by the last tick.
    pub delta: Vec2,
    direction: (i8, i8),
}

/// Angular motion state.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AngularMotion {
    /// Degrees per second.
    pub velocity: f64,
    /// Degrees per second squared.
    pub acceleration: f64,
    /// Rotation applied by the last tick.
    pub delta: f64,
    direction: i8,
}

fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

impl World {
    /// Integrate linear velocity and acceleration every frame.
    pub fn enable_motion(&mut self, id: EntityId) -> Result<(), WorldError> {
        let e = self.entity_mut(id)?;
        if e.caps.contains(Capabilities::MOTION) {
            return Ok(());
        }
        e.caps.insert(Capabilities::MOTION);
        self.listen(id, EventKind::UpdateFrame, Action::LinearTick)?;
        Ok(())
    }

    /// Stop linear integration. Velocity and acceleration are kept.
    pub fn disable_motion(&mut self, id: EntityId) -> Result<(), WorldError> {
        self.entity_mut(id)?
            .caps
            .remove(Capabilities::MOTION | Capabilities::GRAVITY);
        self.unlisten_where(id, |a| matches!(a, Action::LinearTick))
    }

    /// Integrate rotational velocity and acceleration every frame.
    pub fn enable_angular_motion(&mut self, id: EntityId) -> Result<(), WorldError> {
        let e = self.entity_mut(id)?;
        if e.caps.contains(Capabilities::ANGULAR_MOTION) {
            return Ok(());
        }
        e.caps.insert(Capabilities::ANGULAR_MOTION);
        self.listen(id, EventKind::UpdateFrame, Action::AngularTick)?;
        Ok(())
    }

    /// Stop angular integration. Velocity and acceleration are kept.
    pub fn disable_angular_motion(&mut self, id: EntityId) -> Result<(), WorldError> {
        self.entity_mut(id)?.caps.remove(Capabilities::ANGULAR_MOTION);
        self.unlisten_where(id, |a| matches!(a, Action::AngularTick))
    }

    /// Accelerate downward at the world's gravity, enabling linear motion if needed.
    pub fn enable_gravity(&mut self, id: EntityId) -> Result<(), WorldError> {
        self.enable_motion(id)?;
        let gravity = self.config().gravity;
        let e = self.entity_mut(id)?;
        e.caps.insert(Capabilities::GRAVITY);
        e.linear.acceleration.y = gravity;
        Ok(())
    }

    /// Stop accelerating downward.
    pub fn disable_gravity(&mut self, id: EntityId) -> Result<(), WorldError> {
        let e = self.entity_mut(id)?;
        if e.caps.contains(Capabilities::GRAVITY) {
            e.caps.remove(Capabilities::GRAVITY);
            e.linear.acceleration.y = 0.0;
        }
        Ok(())
    }

    /// Linear motion state.
    pub fn linear_motion(&self, id: EntityId) -> Result<LinearMotion, WorldError> {
        Ok(self.entity(id)?.linear)
    }

    /// Angular motion state.
    pub fn angular_motion(&self, id: EntityId) -> Result<AngularMotion, WorldError> {
        Ok(self.entity(id)?.angular)
    }

    /// Linear velocity in units per second.
    pub fn velocity(&self, id: EntityId) -> Result<Vec2, WorldError> {
        Ok(self.entity(id)?.linear.velocity)
    }

    /// Linear acceleration in units per second squared.
    pub fn acceleration(&self, id: EntityId) -> Result<Vec2, WorldError> {
        Ok(self.entity(id)?.linear.acceleration)
    }

    /// Displacement applied by the last linear tick.
    pub fn motion_delta(&self, id: EntityId) -> Result<Vec2, WorldError> {
        Ok(self.entity(id)?.linear.delta)
    }

    /// Set the linear velocity in units per second.
    pub fn set_velocity(&mut self, id: EntityId, velocity: Vec2) -> Result<(), WorldError> {
        self.entity_mut(id)?.linear.velocity = velocity;
        Ok(())
    }

    /// Set the linear acceleration in units per second squared.
    pub fn set_acceleration(&mut self, id: EntityId, acceleration: Vec2) -> Result<(), WorldError> {
        self.entity_mut(id)?.linear.acceleration = acceleration;
        Ok(())
    }

    /// Zero velocity, acceleration, and the last delta.
    ///
    /// The remembered direction is kept, so the next tick that moves the entity reports a
    /// change of direction.
    pub fn reset_motion(&mut self, id: EntityId) -> Result<(), WorldError> {
        let m = &mut self.entity_mut(id)?.linear;
        m.velocity = Vec2::ZERO;
        m.acceleration = Vec2::ZERO;
        m.delta = Vec2::ZERO;
        Ok(())
    }

    /// Set the rotational velocity in degrees per second.
    pub fn set_angular_velocity(&mut self, id: EntityId, velocity: f64) -> Result<(), WorldError> {
        self.entity_mut(id)?.angular.velocity = velocity;
        Ok(())
    }

    /// Set the rotational acceleration in degrees per second squared.
    pub fn set_angular_acceleration(
        &mut self,
        id: EntityId,
        acceleration: f64,
    ) -> Result<(), WorldError> {
        self.entity_mut(id)?.angular.acceleration = acceleration;
        Ok(())
    }

    /// Zero rotational velocity, acceleration, and the last delta.
    pub fn reset_angular_motion(&mut self, id: EntityId) -> Result<(), WorldError> {
        let m = &mut self.entity_mut(id)?.angular;
        m.velocity = 0.0;
        m.acceleration = 0.0;
        m.delta = 0.0;
        Ok(())
    }

    /// Bounds swept by the last linear tick: the current bounds joined with the bounds before
    /// the move.
    pub fn ccdbr(&self, id: EntityId) -> Result<Aabb, WorldError> {
        let e = self.entity(id)?;
        let now = e.aabb();
        let d = e.linear.delta;
        Ok(now.union(&now.shift(-d.x, -d.y)))
    }

    pub(crate) fn linear_tick(&mut self, id: EntityId, info: FrameInfo) -> Result<(), WorldError> {
        let dt = info.dt / 1000.0;
        let m = &mut self.entity_mut(id)?.linear;
        let delta = m.velocity * dt + m.acceleration * (0.5 * dt * dt);
        m.velocity += m.acceleration * dt;
        m.delta = delta;
        let direction = (sign(m.velocity.x), sign(m.velocity.y));
        let turned = direction != m.direction;
        m.direction = direction;

        let mut outcome = Ok(());
        if turned {
            outcome = self.trigger(
                id,
                &Event::NewDirection {
                    x: direction.0,
                    y: direction.1,
                },
            );
        }
        if delta == Vec2::ZERO {
            return outcome;
        }
        let Ok(e) = self.entity(id) else {
            return outcome;
        };
        let r = e.rect;
        outcome.and(self.set_position(id, r.x + delta.x, r.y + delta.y))
    }

    pub(crate) fn angular_tick(&mut self, id: EntityId, info: FrameInfo) -> Result<(), WorldError> {
        let dt = info.dt / 1000.0;
        let e = self.entity_mut(id)?;
        let previous = e.rotation;
        let m = &mut e.angular;
        let delta = m.velocity * dt + 0.5 * m.acceleration * dt * dt;
        m.velocity += m.acceleration * dt;
        m.delta = delta;
        let direction = sign(m.velocity);
        let turned = direction != m.direction;
        m.direction = direction;

        let mut outcome = Ok(());
        if turned {
            outcome = self.trigger(id, &Event::NewRotationDirection(direction));
        }
        if delta == 0.0 || !self.is_alive(id) {
            return outcome;
        }
        outcome = outcome.and(self.set_rotation(id, previous + delta));
        if self.is_alive(id) {
            outcome = outcome.and(self.trigger(id, &Event::Rotated { previous }));
        }
        outcome
    }
}
