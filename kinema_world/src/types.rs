// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the world: entity identifiers, capability flags, and property keys.

use core::fmt;

/// Identifier for an entity in the [`World`](crate::World).
///
/// A small, copyable handle consisting of a slot index and a generation counter.
///
/// - On spawn, a fresh slot is allocated with generation `1`.
/// - On destroy, the slot is freed; any existing `EntityId` for it is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct id.
///
/// Stale ids never alias a different live entity because the generation must match.
/// Use [`World::is_alive`](crate::World::is_alive) to check liveness.
///
/// Ids order by slot first, which is also the order entities are ticked in.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EntityId(pub(crate) u32, pub(crate) u32);

impl EntityId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Slot index. Slots are reused after an entity is destroyed.
    pub const fn slot(self) -> u32 {
        self.0
    }

    /// Generation of the slot this id was issued for.
    pub const fn generation(self) -> u32 {
        self.1
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.0, self.1)
    }
}

bitflags::bitflags! {
    /// Capabilities and state attached to an entity.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Has a collision hull and a spatial hash entry.
        const COLLISION      = 0b0000_0001;
        /// Integrates linear velocity and acceleration each tick.
        const MOTION         = 0b0000_0010;
        /// Integrates rotational velocity and acceleration each tick.
        const ANGULAR_MOTION = 0b0000_0100;
        /// Vertical acceleration is pinned to the world's gravity.
        const GRAVITY        = 0b0000_1000;
        /// Skipped by ticks and parent cascades, and absent from the spatial hash.
        const FROZEN         = 0b0001_0000;
    }
}

/// Numeric entity properties readable with [`World::get`](crate::World::get) and
/// writable with [`World::set`](crate::World::set).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    /// Left edge.
    X,
    /// Top edge.
    Y,
    /// Width.
    W,
    /// Height.
    H,
    /// Z-order. Fractional writes round up to the next integer.
    Z,
    /// Rotation in degrees.
    Rotation,
    /// Rotation pivot, relative to the entity.
    OriginX,
    /// Rotation pivot, relative to the entity.
    OriginY,
    /// World-space pivot `x + origin_x`; writing it moves the entity.
    Ox,
    /// World-space pivot `y + origin_y`; writing it moves the entity.
    Oy,
    /// Linear velocity.
    Vx,
    /// Linear velocity.
    Vy,
    /// Linear acceleration.
    Ax,
    /// Linear acceleration.
    Ay,
    /// Rotational velocity in degrees per second.
    VRotation,
    /// Rotational acceleration in degrees per second squared.
    ARotation,
    /// Rotation applied by the last angular tick. Read-only.
    DRotation,
}

/// A size axis, carried by [`Event::Resize`](crate::Event::Resize).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Width.
    W,
    /// Height.
    H,
}

/// Compass directions for [`World::move_dir`](crate::World::move_dir).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Negative y.
    N,
    /// Negative y, positive x.
    NE,
    /// Positive x.
    E,
    /// Positive y, positive x.
    SE,
    /// Positive y.
    S,
    /// Positive y, negative x.
    SW,
    /// Negative x.
    W,
    /// Negative y, negative x.
    NW,
}

impl Direction {
    /// Unit steps per axis.
    pub(crate) const fn steps(self) -> (f64, f64) {
        match self {
            Self::N => (0.0, -1.0),
            Self::NE => (1.0, -1.0),
            Self::E => (1.0, 0.0),
            Self::SE => (1.0, 1.0),
            Self::S => (0.0, 1.0),
            Self::SW => (-1.0, 1.0),
            Self::W => (-1.0, 0.0),
            Self::NW => (-1.0, -1.0),
        }
    }
}

/// Named rotation pivots for [`World::set_origin_align`](crate::World::set_origin_align).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OriginAlign {
    /// Middle of the entity.
    Center,
    /// Top-left corner.
    TopLeft,
    /// Middle of the top edge.
    TopCenter,
    /// Top-right corner.
    TopRight,
    /// Middle of the left edge.
    MiddleLeft,
    /// Middle of the right edge.
    MiddleRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Middle of the bottom edge.
    BottomCenter,
    /// Bottom-right corner.
    BottomRight,
}

impl OriginAlign {
    /// Parse `"center"`, `"centre"`, or `"<top|middle|bottom> <left|center|right>"`.
    ///
    /// A single word other than the center spellings also means center.
    pub fn parse(s: &str) -> Option<Self> {
        let mut words = s.split_whitespace();
        let first = words.next()?;
        let Some(second) = words.next() else {
            return Some(Self::Center);
        };
        if words.next().is_some() {
            return None;
        }
        let row = match first {
            "top" => 0,
            "middle" | "center" | "centre" => 1,
            "bottom" => 2,
            _ => return None,
        };
        let col = match second {
            "left" => 0,
            "center" | "centre" | "middle" => 1,
            "right" => 2,
            _ => return None,
        };
        Some(match (row, col) {
            (0, 0) => Self::TopLeft,
            (0, 1) => Self::TopCenter,
            (0, _) => Self::TopRight,
            (1, 0) => Self::MiddleLeft,
            (1, 1) => Self::Center,
            (1, _) => Self::MiddleRight,
            (_, 0) => Self::BottomLeft,
            (_, 1) => Self::BottomCenter,
            _ => Self::BottomRight,
        })
    }

    /// Fractions of width and height.
    pub(crate) const fn fractions(self) -> (f64, f64) {
        match self {
            Self::Center => (0.5, 0.5),
            Self::TopLeft => (0.0, 0.0),
            Self::TopCenter => (0.5, 0.0),
            Self::TopRight => (1.0, 0.0),
            Self::MiddleLeft => (0.0, 0.5),
            Self::MiddleRight => (1.0, 0.5),
            Self::BottomLeft => (0.0, 1.0),
            Self::BottomCenter => (0.5, 1.0),
            Self::BottomRight => (1.0, 1.0),
        }
    }
}

/// Collision hull shapes that can be requested with [`World::collision`](crate::World::collision).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum HullShape {
    /// The entity's rectangle, rotated with it.
    #[default]
    Rect,
    /// Not supported; requesting it logs an error.
    Circle,
    /// Not supported; requesting it logs an error.
    Polygon,
}

/// Phases of a frame for [`World::bind_frame`](crate::World::bind_frame).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FramePhase {
    /// Before any entity is updated.
    Pre,
    /// After every entity has been updated.
    Post,
}
