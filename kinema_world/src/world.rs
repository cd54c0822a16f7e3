// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core world implementation: entity arena, geometric state, hierarchy, dispatch, and ticks.

use alloc::collections::BTreeSet;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::Cell;

use kinema_geom::{Aabb, Point, Polygon, Rect, rotate_point};
use kinema_grid::SpatialHash;

use crate::collision::CollisionState;
use crate::config::WorldConfig;
use crate::error::WorldError;
use crate::event::{Action, Event, EventKind, FrameHandler, FrameInfo, HandlerId, Listener};
use crate::motion::{AngularMotion, LinearMotion};
use crate::pool::{PoolSlot, RectPool};
use crate::types::{Axis, Capabilities, Direction, EntityId, FramePhase, OriginAlign, Property};

/// Cached `{base, rotated}` bounds.
#[derive(Copy, Clone, Debug)]
enum BoundsCache {
    Stale,
    Valid { base: Aabb, rotated: Aabb },
}

#[derive(Debug)]
pub(crate) struct Entity {
    generation: u32,
    pub(crate) rect: Rect,
    pub(crate) rotation: f64,
    pub(crate) origin: Point,
    z: i64,
    global_z: i64,
    pub(crate) caps: Capabilities,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    bounds: Cell<BoundsCache>,
    tags: BTreeSet<String>,
    listeners: Vec<Listener>,
    pub(crate) collision: Option<CollisionState>,
    pub(crate) linear: LinearMotion,
    pub(crate) angular: AngularMotion,
}

impl Entity {
    fn new(generation: u32, rect: Rect, global_z: i64, listeners: Vec<Listener>) -> Self {
        Self {
            generation,
            rect,
            rotation: 0.0,
            origin: Point::ZERO,
            z: 0,
            global_z,
            caps: Capabilities::empty(),
            parent: None,
            children: Vec::new(),
            bounds: Cell::new(BoundsCache::Stale),
            tags: BTreeSet::new(),
            listeners,
            collision: None,
            linear: LinearMotion::default(),
            angular: AngularMotion::default(),
        }
    }

    /// The rotation pivot in world space.
    pub(crate) fn world_origin(&self) -> Point {
        Point::new(self.rect.x + self.origin.x, self.rect.y + self.origin.y)
    }

    /// The rectangle's corners, rotated about the world origin.
    pub(crate) fn corners(&self) -> Polygon {
        let upright = Polygon::from_rect(&self.rect);
        if self.rotation == 0.0 {
            return upright;
        }
        upright.rotate(self.world_origin(), self.rotation)
    }

    fn bounds(&self) -> (Aabb, Aabb) {
        if let BoundsCache::Valid { base, rotated } = self.bounds.get() {
            return (base, rotated);
        }
        let base = self.rect.to_aabb();
        let rotated = if self.rotation == 0.0 {
            base
        } else {
            self.corners().to_aabb()
        };
        self.bounds.set(BoundsCache::Valid { base, rotated });
        (base, rotated)
    }

    /// Bounds of the rotated rectangle.
    pub(crate) fn aabb(&self) -> Aabb {
        self.bounds().1
    }

    fn invalidate_bounds(&self) {
        self.bounds.set(BoundsCache::Stale);
    }

    pub(crate) fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub(crate) fn is_frozen(&self) -> bool {
        self.caps.contains(Capabilities::FROZEN)
    }
}

/// A single geometric mutation, routed through [`World::change`].
#[derive(Copy, Clone, Debug)]
enum Change {
    Position(f64, f64),
    Width(f64),
    Height(f64),
    Rotation(f64),
    Z(i64),
    Origin(Point),
}

/// Arena of entities with geometric state, collision hulls, and kinematics.
///
/// All mutation goes through the world so that events fire, caches stay coherent, and the
/// spatial hash tracks every collidable entity. The world is single-threaded; handlers run
/// synchronously, inside the call that triggered them.
pub struct World {
    config: WorldConfig,
    entities: Vec<Option<Entity>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    pub(crate) grid: SpatialHash<EntityId>,
    pool: RectPool,
    frame: u64,
    next_handler: u64,
    frame_listeners: Vec<(HandlerId, FramePhase, FrameHandler)>,
}

impl core::fmt::Debug for World {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.entities.len();
        let alive = self.entities.iter().filter(|e| e.is_some()).count();
        f.debug_struct("World")
            .field("config", &self.config)
            .field("entities_total", &total)
            .field("entities_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("frame", &self.frame)
            .field("grid", &self.grid)
            .field("pool_depth", &self.pool.depth())
            .finish_non_exhaustive()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create an empty world with the default configuration.
    pub fn new() -> Self {
        Self::from_valid_config(WorldConfig::default())
    }

    /// Create an empty world after validating `config`.
    pub fn with_config(config: WorldConfig) -> Result<Self, WorldError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: WorldConfig) -> Self {
        Self {
            config,
            entities: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            grid: SpatialHash::new(config.cell_size),
            pool: RectPool::new(),
            frame: 0,
            next_handler: 0,
            frame_listeners: Vec::new(),
        }
    }

    /// The configuration this world was built with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Number of frames ticked so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Bounding box of every collidable, non-frozen entity.
    pub fn boundaries(&mut self) -> Aabb {
        self.grid.boundaries()
    }

    /// Candidate ids listed in the spatial hash cells under `aabb`.
    pub fn unfiltered_search(&self, aabb: &Aabb) -> Vec<EntityId> {
        self.grid.unfiltered_search(aabb)
    }

    /// The snapshot pool. Its depth is zero whenever no change is being dispatched.
    pub fn pool(&self) -> &RectPool {
        &self.pool
    }

    // ----- arena -----

    /// Create an entity occupying `rect`, with no rotation, origin at its top-left, and z `0`.
    pub fn spawn(&mut self, rect: Rect) -> EntityId {
        let listeners = vec![
            Listener {
                id: self.next_handler_id(),
                kind: EventKind::Move,
                action: Action::Cascade,
            },
            Listener {
                id: self.next_handler_id(),
                kind: EventKind::Rotate,
                action: Action::CascadeRotation,
            },
        ];
        let idx = if let Some(idx) = self.free_list.pop() {
            self.generations[idx] = self.generations[idx].saturating_add(1);
            idx
        } else {
            self.entities.push(None);
            self.generations.push(1);
            self.entities.len() - 1
        };
        let generation = self.generations[idx];
        #[allow(
            clippy::cast_possible_truncation,
            reason = "EntityId uses 32-bit indices by design."
        )]
        let id = EntityId::new(idx as u32, generation);
        let global_z = self.global_z(0, id);
        self.entities[idx] = Some(Entity::new(generation, rect, global_z, listeners));
        log::trace!("spawned {id} at {rect:?}");
        id
    }

    /// Destroy an entity and, recursively, its children.
    ///
    /// [`Event::Remove`] is delivered to the entity before anything is torn down. The entity is
    /// unlinked from its parent, dropped from the spatial hash, and its slot is freed.
    pub fn destroy(&mut self, id: EntityId) -> Result<(), WorldError> {
        self.entity(id)?;
        let mut outcome = self.trigger(id, &Event::Remove);
        if !self.is_alive(id) {
            return outcome;
        }

        let children = core::mem::take(&mut self.entity_mut(id)?.children);
        for child in children {
            if let Ok(c) = self.entity_mut(child) {
                c.parent = None;
                outcome = outcome.and(self.destroy(child));
            }
        }

        let (e, grid) = self.entity_and_grid(id)?;
        if let Some(entry) = e.collision.as_mut().and_then(|c| c.entry.take()) {
            grid.remove(&entry);
        }
        if let Some(parent) = e.parent.take() {
            if let Ok(p) = self.entity_mut(parent) {
                p.children.retain(|c| *c != id);
            }
        }
        self.entities[id.idx()] = None;
        self.free_list.push(id.idx());
        log::trace!("destroyed {id}");
        outcome
    }

    /// Whether `id` refers to a live entity.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entity(id).is_ok()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.entities.iter().filter(|e| e.is_some()).count()
    }

    /// Whether the world has no live entities.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live entity ids in slot order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter().enumerate().filter_map(|(idx, e)| {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "EntityId uses 32-bit indices by design."
            )]
            let idx = idx as u32;
            e.as_ref().map(|e| EntityId::new(idx, e.generation))
        })
    }

    pub(crate) fn entity(&self, id: EntityId) -> Result<&Entity, WorldError> {
        self.entities
            .get(id.idx())
            .and_then(Option::as_ref)
            .filter(|e| e.generation == id.1)
            .ok_or(WorldError::StaleEntity(id))
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, WorldError> {
        self.entities
            .get_mut(id.idx())
            .and_then(Option::as_mut)
            .filter(|e| e.generation == id.1)
            .ok_or(WorldError::StaleEntity(id))
    }

    /// Borrow an entity and the spatial hash at the same time.
    pub(crate) fn entity_and_grid(
        &mut self,
        id: EntityId,
    ) -> Result<(&mut Entity, &mut SpatialHash<EntityId>), WorldError> {
        let Self { entities, grid, .. } = self;
        let e = entities
            .get_mut(id.idx())
            .and_then(Option::as_mut)
            .filter(|e| e.generation == id.1)
            .ok_or(WorldError::StaleEntity(id))?;
        Ok((e, grid))
    }

    // ----- capabilities and tags -----

    /// Capability and state flags.
    pub fn capabilities(&self, id: EntityId) -> Result<Capabilities, WorldError> {
        Ok(self.entity(id)?.caps)
    }

    pub(crate) fn require(&self, id: EntityId, capability: Capabilities) -> Result<(), WorldError> {
        if self.entity(id)?.caps.contains(capability) {
            Ok(())
        } else {
            Err(WorldError::MissingCapability {
                entity: id,
                capability,
            })
        }
    }

    /// Label an entity; [`World::hit`] filters candidates by tag.
    pub fn add_tag(&mut self, id: EntityId, tag: &str) -> Result<(), WorldError> {
        self.entity_mut(id)?.tags.insert(String::from(tag));
        Ok(())
    }

    /// Remove a label. Returns whether it was present.
    pub fn remove_tag(&mut self, id: EntityId, tag: &str) -> Result<bool, WorldError> {
        Ok(self.entity_mut(id)?.tags.remove(tag))
    }

    /// Whether the entity carries `tag`. Stale ids carry nothing.
    pub fn has_tag(&self, id: EntityId, tag: &str) -> bool {
        self.entity(id).is_ok_and(|e| e.has_tag(tag))
    }

    // ----- events -----

    fn next_handler_id(&mut self) -> HandlerId {
        self.next_handler += 1;
        HandlerId(self.next_handler)
    }

    pub(crate) fn listen(
        &mut self,
        id: EntityId,
        kind: EventKind,
        action: Action,
    ) -> Result<HandlerId, WorldError> {
        self.entity(id)?;
        let handler = self.next_handler_id();
        self.entity_mut(id)?.listeners.push(Listener {
            id: handler,
            kind,
            action,
        });
        Ok(handler)
    }

    pub(crate) fn unlisten_where(
        &mut self,
        id: EntityId,
        mut pred: impl FnMut(&Action) -> bool,
    ) -> Result<(), WorldError> {
        self.entity_mut(id)?.listeners.retain(|l| !pred(&l.action));
        Ok(())
    }

    /// Run `handler` whenever `kind` is triggered on the entity.
    ///
    /// Handlers run in the order they were bound, after any built-in reactions bound earlier.
    pub fn bind(
        &mut self,
        id: EntityId,
        kind: EventKind,
        handler: impl Fn(&mut Self, EntityId, &Event) + 'static,
    ) -> Result<HandlerId, WorldError> {
        self.listen(id, kind, Action::User(Rc::new(handler)))
    }

    /// Remove a handler. Returns whether it was bound.
    pub fn unbind(&mut self, id: EntityId, handler: HandlerId) -> Result<bool, WorldError> {
        let listeners = &mut self.entity_mut(id)?.listeners;
        let before = listeners.len();
        listeners.retain(|l| l.id != handler);
        Ok(listeners.len() != before)
    }

    /// Deliver an event to the entity's handlers for its kind.
    ///
    /// The handler list is captured before the first one runs, so handlers may bind or unbind
    /// freely. Dispatch stops early if a handler destroys the entity. Every handler runs even
    /// if an earlier one failed; the first failure is returned.
    pub fn trigger(&mut self, id: EntityId, event: &Event) -> Result<(), WorldError> {
        let kind = event.kind();
        let actions: Vec<Action> = self
            .entity(id)?
            .listeners
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.action.clone())
            .collect();
        let mut outcome = Ok(());
        for action in actions {
            if !self.is_alive(id) {
                break;
            }
            outcome = outcome.and(self.run(id, action, event));
        }
        outcome
    }

    fn run(&mut self, id: EntityId, action: Action, event: &Event) -> Result<(), WorldError> {
        match action {
            Action::Cascade => self.cascade(id, event),
            Action::CascadeRotation => self.cascade_rotation(id, event),
            Action::Hull => self.sync_hull(id),
            Action::LinearTick => match event {
                Event::UpdateFrame(info) => self.linear_tick(id, *info),
                _ => Ok(()),
            },
            Action::AngularTick => match event {
                Event::UpdateFrame(info) => self.angular_tick(id, *info),
                _ => Ok(()),
            },
            Action::HitCheck(tag) => self.report_hits(id, &tag),
            Action::OnHit(on_hit) => self.poll_on_hit(id, &on_hit),
            Action::User(handler) => {
                handler(self, id, event);
                Ok(())
            }
        }
    }

    /// Run `handler` once per frame, before or after entities are updated.
    pub fn bind_frame(
        &mut self,
        phase: FramePhase,
        handler: impl Fn(&mut Self, FrameInfo) + 'static,
    ) -> HandlerId {
        let id = self.next_handler_id();
        self.frame_listeners.push((id, phase, Rc::new(handler)));
        id
    }

    /// Remove a frame handler. Returns whether it was bound.
    pub fn unbind_frame(&mut self, handler: HandlerId) -> bool {
        let before = self.frame_listeners.len();
        self.frame_listeners.retain(|(id, _, _)| *id != handler);
        self.frame_listeners.len() != before
    }

    /// Advance one frame of `dt_ms` milliseconds.
    ///
    /// Pre-frame handlers run first, then every live, non-frozen entity receives
    /// [`Event::UpdateFrame`] in slot order, then post-frame handlers run. Entities see each
    /// other's state as of the moment their own update runs; there is no snapshot isolation
    /// between entities within a frame.
    pub fn tick(&mut self, dt_ms: f64) -> Result<(), WorldError> {
        self.frame += 1;
        let info = FrameInfo {
            frame: self.frame,
            dt: dt_ms,
        };
        log::trace!("frame {} ({dt_ms} ms)", self.frame);

        self.run_frame_phase(FramePhase::Pre, info);
        let ids: Vec<EntityId> = self.entities().collect();
        let mut outcome = Ok(());
        for id in ids {
            let Ok(e) = self.entity(id) else {
                continue;
            };
            if e.is_frozen() {
                continue;
            }
            outcome = outcome.and(self.trigger(id, &Event::UpdateFrame(info)));
        }
        self.run_frame_phase(FramePhase::Post, info);
        outcome
    }

    fn run_frame_phase(&mut self, phase: FramePhase, info: FrameInfo) {
        let handlers: Vec<FrameHandler> = self
            .frame_listeners
            .iter()
            .filter(|(_, p, _)| *p == phase)
            .map(|(_, _, h)| h.clone())
            .collect();
        for handler in handlers {
            handler(self, info);
        }
    }

    // ----- geometric state -----

    fn global_z(&self, z: i64, id: EntityId) -> i64 {
        z.saturating_mul(self.config.z_stride)
            .saturating_add(i64::from(id.0))
    }

    /// Route one mutation through the change protocol.
    ///
    /// No-ops return immediately. Otherwise the prior rectangle is snapshotted in the pool,
    /// the value applied, bounds marked stale, the field's events triggered followed by
    /// [`Event::Invalidate`], and the snapshot released. The release happens even if a
    /// handler failed.
    fn change(&mut self, id: EntityId, change: Change) -> Result<(), WorldError> {
        let e = self.entity(id)?;
        let unchanged = match change {
            Change::Position(x, y) => e.rect.x == x && e.rect.y == y,
            Change::Width(w) => e.rect.w == w,
            Change::Height(h) => e.rect.h == h,
            Change::Rotation(r) => e.rotation == r,
            Change::Z(z) => e.z == z,
            Change::Origin(o) => e.origin == o,
        };
        if unchanged {
            return Ok(());
        }
        let prior = e.rect;
        let snapshot = self.pool.copy(prior);
        let outcome = self.apply(id, change, snapshot);
        let released = self.pool.recycle(snapshot).map_err(WorldError::from);
        outcome.and(released)
    }

    fn apply(
        &mut self,
        id: EntityId,
        change: Change,
        snapshot: PoolSlot,
    ) -> Result<(), WorldError> {
        let prior = self.pool.rect(snapshot);
        let z_key = match change {
            Change::Z(z) => self.global_z(z, id),
            _ => 0,
        };
        let e = self.entity_mut(id)?;
        let moved = Event::Move { prior };
        let (first, second) = match change {
            Change::Position(x, y) => {
                e.rect.x = x;
                e.rect.y = y;
                (moved, None)
            }
            Change::Width(w) => {
                let amount = w - e.rect.w;
                e.rect.w = w;
                (
                    Event::Resize {
                        amount,
                        axis: Axis::W,
                    },
                    Some(moved),
                )
            }
            Change::Height(h) => {
                let amount = h - e.rect.h;
                e.rect.h = h;
                (
                    Event::Resize {
                        amount,
                        axis: Axis::H,
                    },
                    Some(moved),
                )
            }
            Change::Rotation(r) => {
                let delta = r - e.rotation;
                e.rotation = r;
                (Event::Rotate { delta }, None)
            }
            Change::Z(z) => {
                e.z = z;
                e.global_z = z_key;
                (Event::Reorder, None)
            }
            Change::Origin(o) => {
                e.origin = o;
                (Event::OriginChanged, None)
            }
        };
        e.invalidate_bounds();

        let mut outcome = self.trigger(id, &first);
        if let Some(second) = second {
            if self.is_alive(id) {
                outcome = outcome.and(self.trigger(id, &second));
            }
        }
        if self.is_alive(id) {
            outcome = outcome.and(self.trigger(id, &Event::Invalidate));
        }
        outcome
    }

    /// Current `x`, `y`, `w`, `h`.
    pub fn pos(&self, id: EntityId) -> Result<Rect, WorldError> {
        Ok(self.entity(id)?.rect)
    }

    /// Bounds of the entity's rotated rectangle, recomputed if stale.
    pub fn aabb(&self, id: EntityId) -> Result<Aabb, WorldError> {
        Ok(self.entity(id)?.aabb())
    }

    /// Bounds of the unrotated rectangle.
    pub fn base_aabb(&self, id: EntityId) -> Result<Aabb, WorldError> {
        Ok(self.entity(id)?.bounds().0)
    }

    /// `w * h`.
    pub fn area(&self, id: EntityId) -> Result<f64, WorldError> {
        Ok(self.entity(id)?.rect.area())
    }

    /// Rotation in degrees.
    pub fn rotation(&self, id: EntityId) -> Result<f64, WorldError> {
        Ok(self.entity(id)?.rotation)
    }

    /// Rotation pivot relative to the entity.
    pub fn origin(&self, id: EntityId) -> Result<Point, WorldError> {
        Ok(self.entity(id)?.origin)
    }

    /// Z-order.
    pub fn z(&self, id: EntityId) -> Result<i64, WorldError> {
        Ok(self.entity(id)?.z)
    }

    /// Ordering key `z * z_stride + slot`; ties in `z` order by slot.
    pub fn global_z_of(&self, id: EntityId) -> Result<i64, WorldError> {
        Ok(self.entity(id)?.global_z)
    }

    /// Set `x` and `y` together, triggering a single [`Event::Move`].
    pub fn set_position(&mut self, id: EntityId, x: f64, y: f64) -> Result<(), WorldError> {
        self.change(id, Change::Position(x, y))
    }

    /// Set `x`.
    pub fn set_x(&mut self, id: EntityId, x: f64) -> Result<(), WorldError> {
        let y = self.entity(id)?.rect.y;
        self.change(id, Change::Position(x, y))
    }

    /// Set `y`.
    pub fn set_y(&mut self, id: EntityId, y: f64) -> Result<(), WorldError> {
        let x = self.entity(id)?.rect.x;
        self.change(id, Change::Position(x, y))
    }

    /// Set the width.
    pub fn set_w(&mut self, id: EntityId, w: f64) -> Result<(), WorldError> {
        self.change(id, Change::Width(w))
    }

    /// Set the height.
    pub fn set_h(&mut self, id: EntityId, h: f64) -> Result<(), WorldError> {
        self.change(id, Change::Height(h))
    }

    /// Set width then height.
    pub fn set_size(&mut self, id: EntityId, w: f64, h: f64) -> Result<(), WorldError> {
        let outcome = self.set_w(id, w);
        outcome.and(self.set_h(id, h))
    }

    /// Set the rotation in degrees; triggers [`Event::Rotate`] with the difference.
    pub fn set_rotation(&mut self, id: EntityId, degrees: f64) -> Result<(), WorldError> {
        self.change(id, Change::Rotation(degrees))
    }

    /// Set the z-order and recompute the global ordering key.
    pub fn set_z(&mut self, id: EntityId, z: i64) -> Result<(), WorldError> {
        self.change(id, Change::Z(z))
    }

    /// Set the rotation pivot relative to the entity.
    ///
    /// Rotation already applied is not redone about the new pivot.
    pub fn set_origin(&mut self, id: EntityId, x: f64, y: f64) -> Result<(), WorldError> {
        self.change(id, Change::Origin(Point::new(x, y)))
    }

    /// Set the rotation pivot to a named point of the current rectangle.
    pub fn set_origin_align(&mut self, id: EntityId, align: OriginAlign) -> Result<(), WorldError> {
        let r = self.entity(id)?.rect;
        let (fx, fy) = align.fractions();
        self.set_origin(id, r.w * fx, r.h * fy)
    }

    /// Move the entity so its world-space pivot `x` is `ox`.
    pub fn set_ox(&mut self, id: EntityId, ox: f64) -> Result<(), WorldError> {
        let origin = self.entity(id)?.origin;
        self.set_x(id, ox - origin.x)
    }

    /// Move the entity so its world-space pivot `y` is `oy`.
    pub fn set_oy(&mut self, id: EntityId, oy: f64) -> Result<(), WorldError> {
        let origin = self.entity(id)?.origin;
        self.set_y(id, oy - origin.y)
    }

    /// Shift position and size by the given amounts.
    pub fn shift(
        &mut self,
        id: EntityId,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
    ) -> Result<(), WorldError> {
        let r = self.entity(id)?.rect;
        let mut outcome = self.set_position(id, r.x + dx, r.y + dy);
        if dw != 0.0 && self.is_alive(id) {
            outcome = outcome.and(self.set_w(id, r.w + dw));
        }
        if dh != 0.0 && self.is_alive(id) {
            outcome = outcome.and(self.set_h(id, r.h + dh));
        }
        outcome
    }

    /// Step `by` units in a compass direction; diagonals step `by` on both axes.
    pub fn move_dir(&mut self, id: EntityId, dir: Direction, by: f64) -> Result<(), WorldError> {
        let (sx, sy) = dir.steps();
        self.shift(id, sx * by, sy * by, 0.0, 0.0)
    }

    /// Turn the entity by `degrees` about a world-space `pivot`.
    ///
    /// The entity's own rotation grows by `degrees` and its pivot is carried around `pivot`.
    pub fn rotate_about(
        &mut self,
        id: EntityId,
        degrees: f64,
        pivot: Point,
    ) -> Result<(), WorldError> {
        let e = self.entity(id)?;
        let origin = e.origin;
        let rotation = e.rotation;
        let carried = rotate_point(e.world_origin(), pivot, degrees);
        let outcome = self.set_rotation(id, rotation + degrees);
        if !self.is_alive(id) {
            return outcome;
        }
        outcome.and(self.set_position(id, carried.x - origin.x, carried.y - origin.y))
    }

    /// Read a numeric property.
    pub fn get(&self, id: EntityId, prop: Property) -> Result<f64, WorldError> {
        let e = self.entity(id)?;
        #[allow(
            clippy::cast_precision_loss,
            reason = "z-orders are far below 2^52."
        )]
        let z = e.z as f64;
        Ok(match prop {
            Property::X => e.rect.x,
            Property::Y => e.rect.y,
            Property::W => e.rect.w,
            Property::H => e.rect.h,
            Property::Z => z,
            Property::Rotation => e.rotation,
            Property::OriginX => e.origin.x,
            Property::OriginY => e.origin.y,
            Property::Ox => e.world_origin().x,
            Property::Oy => e.world_origin().y,
            Property::Vx => e.linear.velocity.x,
            Property::Vy => e.linear.velocity.y,
            Property::Ax => e.linear.acceleration.x,
            Property::Ay => e.linear.acceleration.y,
            Property::VRotation => e.angular.velocity,
            Property::ARotation => e.angular.acceleration,
            Property::DRotation => e.angular.delta,
        })
    }

    /// Write a numeric property through the matching mutator.
    ///
    /// `Z` rounds fractional values up. Motion properties are plain state and trigger nothing.
    pub fn set(&mut self, id: EntityId, prop: Property, value: f64) -> Result<(), WorldError> {
        match prop {
            Property::X => self.set_x(id, value),
            Property::Y => self.set_y(id, value),
            Property::W => self.set_w(id, value),
            Property::H => self.set_h(id, value),
            Property::Z => self.set_z(id, ceil_to_i64(value)),
            Property::Rotation => self.set_rotation(id, value),
            Property::OriginX => {
                let o = self.entity(id)?.origin;
                self.set_origin(id, value, o.y)
            }
            Property::OriginY => {
                let o = self.entity(id)?.origin;
                self.set_origin(id, o.x, value)
            }
            Property::Ox => self.set_ox(id, value),
            Property::Oy => self.set_oy(id, value),
            Property::Vx => {
                self.entity_mut(id)?.linear.velocity.x = value;
                Ok(())
            }
            Property::Vy => {
                self.entity_mut(id)?.linear.velocity.y = value;
                Ok(())
            }
            Property::Ax => {
                self.entity_mut(id)?.linear.acceleration.x = value;
                Ok(())
            }
            Property::Ay => {
                self.entity_mut(id)?.linear.acceleration.y = value;
                Ok(())
            }
            Property::VRotation => {
                self.entity_mut(id)?.angular.velocity = value;
                Ok(())
            }
            Property::ARotation => {
                self.entity_mut(id)?.angular.acceleration = value;
                Ok(())
            }
            Property::DRotation => Err(WorldError::ReadOnlyProperty(prop)),
        }
    }

    // ----- hierarchy -----

    /// Parent, if attached.
    pub fn parent(&self, id: EntityId) -> Result<Option<EntityId>, WorldError> {
        Ok(self.entity(id)?.parent)
    }

    /// Children in attach order.
    pub fn children(&self, id: EntityId) -> Result<&[EntityId], WorldError> {
        Ok(&self.entity(id)?.children)
    }

    /// Attach `child` to `parent`, detaching it from any previous parent first.
    ///
    /// From then on the child follows the parent's moves, resizes, and rotations, and is
    /// destroyed with it.
    pub fn attach(&mut self, parent: EntityId, child: EntityId) -> Result<(), WorldError> {
        self.attach_all(parent, &[child])
    }

    /// Attach several children to `parent`, in order.
    ///
    /// Every child is checked before any is attached: if one is stale or would close a cycle,
    /// nothing changes.
    pub fn attach_all(
        &mut self,
        parent: EntityId,
        children: &[EntityId],
    ) -> Result<(), WorldError> {
        self.entity(parent)?;
        for &child in children {
            self.entity(child)?;
            let mut cursor = Some(parent);
            while let Some(at) = cursor {
                if at == child {
                    return Err(WorldError::CyclicAttach { parent, child });
                }
                cursor = self.entity(at)?.parent;
            }
        }
        for &child in children {
            if let Some(old) = self.entity(child)?.parent {
                if old == parent {
                    continue;
                }
                self.detach(old, Some(child))?;
            }
            self.entity_mut(parent)?.children.push(child);
            self.entity_mut(child)?.parent = Some(parent);
        }
        Ok(())
    }

    /// Detach one child, or every child when `child` is `None`.
    pub fn detach(&mut self, parent: EntityId, child: Option<EntityId>) -> Result<(), WorldError> {
        let Some(child) = child else {
            let children = core::mem::take(&mut self.entity_mut(parent)?.children);
            for c in children {
                if let Ok(c) = self.entity_mut(c) {
                    c.parent = None;
                }
            }
            return Ok(());
        };
        let p = self.entity_mut(parent)?;
        let Some(pos) = p.children.iter().position(|c| *c == child) else {
            return Err(WorldError::NotAttached { parent, child });
        };
        p.children.remove(pos);
        if let Ok(c) = self.entity_mut(child) {
            c.parent = None;
        }
        Ok(())
    }

    fn cascade(&mut self, id: EntityId, event: &Event) -> Result<(), WorldError> {
        let Event::Move { prior } = event else {
            return Ok(());
        };
        let e = self.entity(id)?;
        if e.children.is_empty() {
            return Ok(());
        }
        let r = e.rect;
        let (dx, dy, dw, dh) = (r.x - prior.x, r.y - prior.y, r.w - prior.w, r.h - prior.h);
        let children = e.children.clone();
        let mut outcome = Ok(());
        for child in children {
            match self.entity(child) {
                Ok(c) if !c.is_frozen() => {
                    outcome = outcome.and(self.shift(child, dx, dy, dw, dh));
                }
                _ => {}
            }
        }
        outcome
    }

    fn cascade_rotation(&mut self, id: EntityId, event: &Event) -> Result<(), WorldError> {
        let Event::Rotate { delta } = *event else {
            return Ok(());
        };
        let e = self.entity(id)?;
        if e.children.is_empty() {
            return Ok(());
        }
        let pivot = e.world_origin();
        let children = e.children.clone();
        let mut outcome = Ok(());
        for child in children {
            match self.entity(child) {
                Ok(c) if !c.is_frozen() => {
                    outcome = outcome.and(self.rotate_about(child, delta, pivot));
                }
                _ => {}
            }
        }
        outcome
    }

    // ----- freezing -----

    /// Freeze an entity: it stops receiving frame updates, ignores parent cascades, and
    /// leaves the spatial hash until unfrozen.
    pub fn freeze(&mut self, id: EntityId) -> Result<(), WorldError> {
        let (e, grid) = self.entity_and_grid(id)?;
        if e.is_frozen() {
            return Ok(());
        }
        e.caps.insert(Capabilities::FROZEN);
        if let Some(entry) = e.collision.as_mut().and_then(|c| c.entry.take()) {
            grid.remove(&entry);
        }
        self.trigger(id, &Event::Freeze)
    }

    /// Undo [`World::freeze`], reinserting the entity into the spatial hash if it collides.
    pub fn unfreeze(&mut self, id: EntityId) -> Result<(), WorldError> {
        let (e, grid) = self.entity_and_grid(id)?;
        if !e.is_frozen() {
            return Ok(());
        }
        e.caps.remove(Capabilities::FROZEN);
        let aabb = e.aabb();
        if let Some(c) = e.collision.as_mut() {
            c.entry = Some(grid.insert(id, aabb));
            c.invalidate_hull();
        }
        self.trigger(id, &Event::Unfreeze)
    }

    // ----- spatial queries -----

    /// Whether the point lies on the entity.
    ///
    /// Collidable entities test against their rotated hull; others against their rectangle.
    pub fn is_at(&mut self, id: EntityId, p: Point) -> Result<bool, WorldError> {
        if let Some(hull) = self.hull(id)? {
            return Ok(hull.contains_point(p));
        }
        Ok(self.entity(id)?.rect.contains_point(p))
    }

    /// Whether `rect` lies entirely inside the entity's bounds.
    pub fn contains(&self, id: EntityId, rect: &Rect) -> Result<bool, WorldError> {
        Ok(self.aabb(id)?.contains(&rect.to_aabb()))
    }

    /// Whether the entity's bounds lie entirely inside `rect`.
    pub fn within(&self, id: EntityId, rect: &Rect) -> Result<bool, WorldError> {
        Ok(rect.to_aabb().contains(&self.aabb(id)?))
    }

    /// Strict overlap of the entity's bounds with `rect`.
    pub fn intersect_rect(&self, id: EntityId, rect: &Rect) -> Result<bool, WorldError> {
        Ok(self.aabb(id)?.intersects(&rect.to_aabb()))
    }

    /// Strict overlap of two entities' bounds.
    pub fn intersect_entity(&self, a: EntityId, b: EntityId) -> Result<bool, WorldError> {
        Ok(self.aabb(a)?.intersects(&self.aabb(b)?))
    }
}

/// Round up to an integer, saturating at the `i64` range.
fn ceil_to_i64(v: f64) -> i64 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "z-orders are small integers; out-of-range values saturate."
    )]
    let i = v as i64;
    #[allow(
        clippy::cast_precision_loss,
        reason = "only compared against the value it came from."
    )]
    let back = i as f64;
    if back < v { i.saturating_add(1) } else { i }
}
