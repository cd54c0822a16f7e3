// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events, handlers, and the per-entity listener table.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt;

use kinema_geom::{Mtv, Rect};

use crate::World;
use crate::types::{Axis, EntityId};

/// Elapsed-time payload of [`Event::UpdateFrame`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameInfo {
    /// Frame counter, starting at 1 for the first tick.
    pub frame: u64,
    /// Time since the previous frame, in milliseconds.
    pub dt: f64,
}

/// How a hit was confirmed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HitKind {
    /// Separating-axis test on the rotated hulls.
    Sat,
}

/// One confirmed overlap reported by [`World::hit`](crate::World::hit).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HitData {
    /// The entity overlapped.
    pub other: EntityId,
    /// Minimum translation vector, pointing from the querying entity toward `other`.
    pub mtv: Mtv,
    /// Test used.
    pub kind: HitKind,
}

/// Everything an entity can be told about.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Position or size changed; carries the rectangle from before the change.
    Move {
        /// `x`, `y`, `w`, `h` before the change.
        prior: Rect,
    },
    /// Width or height changed by `amount`. Followed by a [`Event::Move`].
    Resize {
        /// New size minus old size.
        amount: f64,
        /// Which dimension.
        axis: Axis,
    },
    /// Rotation changed by `delta` degrees (new minus old).
    Rotate {
        /// Degrees turned.
        delta: f64,
    },
    /// Z-order changed.
    Reorder,
    /// Any geometric change; cached bounds are stale.
    Invalidate,
    /// The rotation pivot moved relative to the entity.
    OriginChanged,
    /// A frame is being processed.
    UpdateFrame(FrameInfo),
    /// New overlaps with entities carrying `tag` began this frame.
    HitOn {
        /// The tag being checked.
        tag: String,
        /// Only the overlaps that are new.
        hits: Vec<HitData>,
    },
    /// Overlaps with entities carrying `tag` ended this frame.
    HitOff {
        /// The tag being checked.
        tag: String,
        /// Entities no longer overlapped.
        others: Vec<EntityId>,
    },
    /// The sign of the linear velocity changed on some axis.
    NewDirection {
        /// `-1`, `0`, or `1`.
        x: i8,
        /// `-1`, `0`, or `1`.
        y: i8,
    },
    /// The sign of the rotational velocity changed.
    NewRotationDirection(i8),
    /// An angular tick turned the entity.
    Rotated {
        /// Rotation before the tick.
        previous: f64,
    },
    /// The entity is about to be destroyed.
    Remove,
    /// The entity was frozen.
    Freeze,
    /// The entity was unfrozen.
    Unfreeze,
}

/// Keys for binding handlers, one per [`Event`] variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs, reason = "each variant mirrors the Event variant of the same name")]
pub enum EventKind {
    Move,
    Resize,
    Rotate,
    Reorder,
    Invalidate,
    OriginChanged,
    UpdateFrame,
    HitOn,
    HitOff,
    NewDirection,
    NewRotationDirection,
    Rotated,
    Remove,
    Freeze,
    Unfreeze,
}

impl Event {
    /// The key handlers for this event are bound under.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Move { .. } => EventKind::Move,
            Self::Resize { .. } => EventKind::Resize,
            Self::Rotate { .. } => EventKind::Rotate,
            Self::Reorder => EventKind::Reorder,
            Self::Invalidate => EventKind::Invalidate,
            Self::OriginChanged => EventKind::OriginChanged,
            Self::UpdateFrame(_) => EventKind::UpdateFrame,
            Self::HitOn { .. } => EventKind::HitOn,
            Self::HitOff { .. } => EventKind::HitOff,
            Self::NewDirection { .. } => EventKind::NewDirection,
            Self::NewRotationDirection(_) => EventKind::NewRotationDirection,
            Self::Rotated { .. } => EventKind::Rotated,
            Self::Remove => EventKind::Remove,
            Self::Freeze => EventKind::Freeze,
            Self::Unfreeze => EventKind::Unfreeze,
        }
    }
}

/// Identifies a bound handler so it can be unbound.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandlerId(pub(crate) u64);

/// A user event handler.
pub type Handler = Rc<dyn Fn(&mut World, EntityId, &Event)>;

/// A frame-phase handler.
pub type FrameHandler = Rc<dyn Fn(&mut World, FrameInfo)>;

/// Callback run every frame while hits are occurring; the flag is `true` on the first such frame.
pub type HitCallback = Rc<dyn Fn(&mut World, EntityId, &[HitData], bool)>;

/// Callback run once when hits stop occurring.
pub type HitEndCallback = Rc<dyn Fn(&mut World, EntityId)>;

pub(crate) struct OnHit {
    pub(crate) tag: String,
    pub(crate) on: HitCallback,
    pub(crate) off: Option<HitEndCallback>,
    pub(crate) hitting: Cell<bool>,
}

/// What a listener does when its event fires.
#[derive(Clone)]
pub(crate) enum Action {
    /// Shift non-frozen children by the size and position delta.
    Cascade,
    /// Turn non-frozen children with their parent.
    CascadeRotation,
    /// Mark the collision hull stale and keep the spatial hash entry current.
    Hull,
    /// Linear integration.
    LinearTick,
    /// Angular integration.
    AngularTick,
    /// Per-frame hit diffing for a tag.
    HitCheck(String),
    /// Per-frame hit callbacks.
    OnHit(Rc<OnHit>),
    User(Handler),
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cascade => f.write_str("Cascade"),
            Self::CascadeRotation => f.write_str("CascadeRotation"),
            Self::Hull => f.write_str("Hull"),
            Self::LinearTick => f.write_str("LinearTick"),
            Self::AngularTick => f.write_str("AngularTick"),
            Self::HitCheck(tag) => f.debug_tuple("HitCheck").field(tag).finish(),
            Self::OnHit(h) => f.debug_tuple("OnHit").field(&h.tag).finish(),
            Self::User(_) => f.write_str("User"),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Listener {
    pub(crate) id: HandlerId,
    pub(crate) kind: EventKind,
    pub(crate) action: Action,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_variants() {
        assert_eq!(Event::Move { prior: Rect::default() }.kind(), EventKind::Move);
        assert_eq!(
            Event::UpdateFrame(FrameInfo { frame: 1, dt: 16.0 }).kind(),
            EventKind::UpdateFrame
        );
        assert_eq!(Event::NewRotationDirection(-1).kind(), EventKind::NewRotationDirection);
        assert_eq!(Event::Unfreeze.kind(), EventKind::Unfreeze);
    }
}
