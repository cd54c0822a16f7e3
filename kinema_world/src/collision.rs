// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collision hulls, narrow-phase hit queries, and per-frame hit diffing.
//!
//! A collidable entity keeps a rotated polygon hull and one entry in the world's spatial hash.
//! The hull is rebuilt lazily: geometric changes only mark it stale and move the hash entry.
//!
//! Hit checks remember, per tag, which entities were overlapped last frame. Each frame the
//! current overlaps are compared against that set: newly overlapped entities are reported with
//! [`Event::HitOn`], entities no longer overlapped with [`Event::HitOff`].

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;

use kinema_geom::{Polygon, sat};
use kinema_grid::Entry;

use crate::World;
use crate::error::WorldError;
use crate::event::{
    Action, Event, EventKind, HandlerId, HitCallback, HitData, HitEndCallback, HitKind, OnHit,
};
use crate::types::{Capabilities, EntityId, HullShape};

#[derive(Clone, Debug)]
pub(crate) enum HullCache {
    Stale,
    Valid { base: Polygon, rotated: Polygon },
}

#[derive(Debug)]
pub(crate) struct CollisionState {
    shape: HullShape,
    hull: HullCache,
    pub(crate) entry: Option<Entry<EntityId>>,
    /// Entities overlapped last frame, per checked tag.
    checks: BTreeMap<String, BTreeSet<EntityId>>,
}

impl CollisionState {
    pub(crate) fn invalidate_hull(&mut self) {
        self.hull = HullCache::Stale;
    }
}

impl World {
    /// Give the entity a collision hull and enter it into the spatial hash.
    ///
    /// Only [`HullShape::Rect`] is supported; other shapes log an error and leave the entity
    /// unchanged. Calling this again on a collidable entity just rebuilds the hull.
    pub fn collision(&mut self, id: EntityId, shape: HullShape) -> Result<(), WorldError> {
        let (e, grid) = self.entity_and_grid(id)?;
        if shape != HullShape::Rect {
            log::error!("{id}: {shape:?} hulls are not supported");
            return Ok(());
        }
        if let Some(c) = e.collision.as_mut() {
            c.invalidate_hull();
            return Ok(());
        }
        e.caps.insert(Capabilities::COLLISION);
        let entry = (!e.is_frozen()).then(|| grid.insert(id, e.aabb()));
        e.collision = Some(CollisionState {
            shape,
            hull: HullCache::Stale,
            entry,
            checks: BTreeMap::new(),
        });
        for kind in [EventKind::Invalidate, EventKind::Resize, EventKind::Rotate] {
            self.listen(id, kind, Action::Hull)?;
        }
        Ok(())
    }

    /// Drop the hull, the spatial hash entry, and every hit check.
    pub fn remove_collision(&mut self, id: EntityId) -> Result<(), WorldError> {
        let (e, grid) = self.entity_and_grid(id)?;
        let Some(mut c) = e.collision.take() else {
            return Ok(());
        };
        e.caps.remove(Capabilities::COLLISION);
        if let Some(entry) = c.entry.take() {
            grid.remove(&entry);
        }
        self.unlisten_where(id, |a| {
            matches!(a, Action::Hull | Action::HitCheck(_) | Action::OnHit(_))
        })
    }

    /// Shape of the entity's hull, if it has one.
    pub fn hull_shape(&self, id: EntityId) -> Result<Option<HullShape>, WorldError> {
        Ok(self.entity(id)?.collision.as_ref().map(|c| c.shape))
    }

    /// The rotated hull, rebuilt first if stale. `None` if the entity is not collidable.
    pub fn hull(&mut self, id: EntityId) -> Result<Option<&Polygon>, WorldError> {
        let e = self.entity_mut(id)?;
        let stale = e
            .collision
            .as_ref()
            .is_some_and(|c| matches!(c.hull, HullCache::Stale));
        if stale {
            let base = Polygon::from_rect(&e.rect);
            let rotated = e.corners();
            if let Some(c) = e.collision.as_mut() {
                c.hull = HullCache::Valid { base, rotated };
            }
        }
        Ok(e.collision.as_ref().and_then(|c| match &c.hull {
            HullCache::Valid { rotated, .. } => Some(rotated),
            HullCache::Stale => None,
        }))
    }

    /// The unrotated hull, rebuilt first if stale.
    pub fn base_hull(&mut self, id: EntityId) -> Result<Option<&Polygon>, WorldError> {
        self.hull(id)?;
        let e = self.entity(id)?;
        Ok(e.collision.as_ref().and_then(|c| match &c.hull {
            HullCache::Valid { base, .. } => Some(base),
            HullCache::Stale => None,
        }))
    }

    /// Mark the hull stale and move the spatial hash entry to the current bounds.
    pub(crate) fn sync_hull(&mut self, id: EntityId) -> Result<(), WorldError> {
        let (e, grid) = self.entity_and_grid(id)?;
        let aabb = e.aabb();
        let frozen = e.is_frozen();
        let Some(c) = e.collision.as_mut() else {
            return Ok(());
        };
        c.invalidate_hull();
        if frozen {
            return Ok(());
        }
        if let Some(entry) = c.entry {
            c.entry = Some(grid.update_entry(entry, aabb));
        }
        Ok(())
    }

    /// Every collidable entity tagged `tag` whose hull overlaps this entity's hull.
    ///
    /// Candidates come from the spatial hash and are filtered by a strict bounds overlap
    /// before the separating-axis test. Each result carries the minimum translation vector,
    /// pointing from this entity toward the other. An empty result means no hits.
    ///
    /// Hulls that cannot be tested (all edges of zero length) are skipped.
    pub fn hit(&mut self, id: EntityId, tag: &str) -> Result<Vec<HitData>, WorldError> {
        self.require(id, Capabilities::COLLISION)?;
        let area = self.aabb(id)?;
        let Some(mine) = self.hull(id)?.cloned() else {
            return Ok(Vec::new());
        };

        let mut hits = Vec::new();
        for other in self.grid.unfiltered_search(&area) {
            if other == id {
                continue;
            }
            let Ok(o) = self.entity(other) else {
                continue;
            };
            if !o.caps.contains(Capabilities::COLLISION)
                || !o.has_tag(tag)
                || !area.intersects(&o.aabb())
            {
                continue;
            }
            let Some(theirs) = self.hull(other)? else {
                continue;
            };
            match sat(&mine, theirs) {
                Ok(Some(mtv)) => hits.push(HitData {
                    other,
                    mtv,
                    kind: HitKind::Sat,
                }),
                Ok(None) => {}
                Err(err) => log::debug!("skipping {other} against {id}: {err}"),
            }
        }
        Ok(hits)
    }

    /// Report overlaps with entities tagged with any of `tags` as they begin and end.
    ///
    /// Every frame, new overlaps trigger [`Event::HitOn`] and ended ones [`Event::HitOff`].
    /// Checking a tag that is already checked does nothing.
    pub fn check_hits(&mut self, id: EntityId, tags: &[&str]) -> Result<(), WorldError> {
        self.require(id, Capabilities::COLLISION)?;
        for &tag in tags {
            let Some(c) = self.entity_mut(id)?.collision.as_mut() else {
                continue;
            };
            if c.checks.contains_key(tag) {
                continue;
            }
            c.checks.insert(String::from(tag), BTreeSet::new());
            self.listen(id, EventKind::UpdateFrame, Action::HitCheck(String::from(tag)))?;
        }
        Ok(())
    }

    /// Stop checking the given tags, or every tag when `tags` is `None`.
    pub fn ignore_hits(&mut self, id: EntityId, tags: Option<&[&str]>) -> Result<(), WorldError> {
        let selected = |t: &str| tags.is_none_or(|tags| tags.iter().any(|s| *s == t));
        if let Some(c) = self.entity_mut(id)?.collision.as_mut() {
            c.checks.retain(|t, _| !selected(t.as_str()));
        }
        self.unlisten_where(id, |a| matches!(a, Action::HitCheck(t) if selected(t.as_str())))
    }

    /// Forget who was overlapped, so current overlaps are reported as new next frame.
    ///
    /// Applies to the given tags, or every checked tag when `tags` is `None`.
    pub fn reset_hit_checks(
        &mut self,
        id: EntityId,
        tags: Option<&[&str]>,
    ) -> Result<(), WorldError> {
        if let Some(c) = self.entity_mut(id)?.collision.as_mut() {
            for (tag, seen) in &mut c.checks {
                if tags.is_none_or(|tags| tags.iter().any(|t| *t == tag.as_str())) {
                    seen.clear();
                }
            }
        }
        Ok(())
    }

    pub(crate) fn report_hits(&mut self, id: EntityId, tag: &str) -> Result<(), WorldError> {
        let hits = self.hit(id, tag)?;
        let Some(seen) = self
            .entity_mut(id)?
            .collision
            .as_mut()
            .and_then(|c| c.checks.get_mut(tag))
        else {
            return Ok(());
        };
        let current: BTreeSet<EntityId> = hits.iter().map(|h| h.other).collect();
        let ended: Vec<EntityId> = seen.difference(&current).copied().collect();
        let started: Vec<HitData> = hits.into_iter().filter(|h| !seen.contains(&h.other)).collect();
        *seen = current;

        let mut outcome = Ok(());
        if !started.is_empty() {
            outcome = self.trigger(
                id,
                &Event::HitOn {
                    tag: String::from(tag),
                    hits: started,
                },
            );
        }
        if !ended.is_empty() && self.is_alive(id) {
            outcome = outcome.and(self.trigger(
                id,
                &Event::HitOff {
                    tag: String::from(tag),
                    others: ended,
                },
            ));
        }
        outcome
    }

    /// Call `on` every frame the entity overlaps something tagged `tag`, and `off` once when
    /// it stops.
    ///
    /// `on` receives the full hit list and a flag that is `true` on the first frame of a run
    /// of overlapping frames.
    pub fn on_hit(
        &mut self,
        id: EntityId,
        tag: &str,
        on: impl Fn(&mut Self, EntityId, &[HitData], bool) + 'static,
        off: Option<HitEndCallback>,
    ) -> Result<HandlerId, WorldError> {
        self.require(id, Capabilities::COLLISION)?;
        let on: HitCallback = Rc::new(on);
        let watch = OnHit {
            tag: String::from(tag),
            on,
            off,
            hitting: Cell::new(false),
        };
        self.listen(id, EventKind::UpdateFrame, Action::OnHit(Rc::new(watch)))
    }

    pub(crate) fn poll_on_hit(&mut self, id: EntityId, watch: &OnHit) -> Result<(), WorldError> {
        let hits = self.hit(id, &watch.tag)?;
        if !hits.is_empty() {
            let first = !watch.hitting.replace(true);
            (watch.on)(self, id, &hits, first);
        } else if watch.hitting.replace(false) {
            if let Some(off) = &watch.off {
                off(self, id);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::cell::RefCell;

    use kinema_geom::{Aabb, Point, Rect};

    fn collider(world: &mut World, x: f64, y: f64, w: f64, h: f64, tag: &str) -> EntityId {
        let e = world.spawn(Rect::new(x, y, w, h));
        world.collision(e, HullShape::Rect).unwrap();
        world.add_tag(e, tag).unwrap();
        e
    }

    #[test]
    fn hit_reports_mtv_toward_other() {
        let mut world = World::new();
        let a = collider(&mut world, 0.0, 0.0, 10.0, 10.0, "box");
        let b = collider(&mut world, 8.0, 2.0, 10.0, 10.0, "box");
        let hits = world.hit(a, "box").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].other, b);
        assert_eq!(hits[0].mtv.overlap, 2.0);
        assert_eq!((hits[0].mtv.x, hits[0].mtv.y), (1.0, 0.0));
        assert_eq!(hits[0].kind, HitKind::Sat);
    }

    #[test]
    fn hit_filters_tag_self_and_touching() {
        let mut world = World::new();
        let a = collider(&mut world, 0.0, 0.0, 10.0, 10.0, "wall");
        let _untagged = collider(&mut world, 5.0, 5.0, 10.0, 10.0, "floor");
        let _touching = collider(&mut world, 10.0, 0.0, 10.0, 10.0, "wall");
        let plain = world.spawn(Rect::new(1.0, 1.0, 2.0, 2.0));
        world.add_tag(plain, "wall").unwrap();
        assert!(world.hit(a, "wall").unwrap().is_empty());
    }

    #[test]
    fn degenerate_hull_is_skipped_both_ways() {
        let mut world = World::new();
        let outer = collider(&mut world, 0.0, 0.0, 10.0, 10.0, "outer");
        let dot = collider(&mut world, 5.0, 5.0, 0.0, 0.0, "dot");
        // A point strictly inside still passes the bounds pre-filter.
        assert!(world.aabb(outer).unwrap().intersects(&world.aabb(dot).unwrap()));

        assert_eq!(world.hit(outer, "dot"), Ok(vec![]));
        assert_eq!(world.hit(dot, "outer"), Ok(vec![]));

        world.check_hits(dot, &["outer"]).unwrap();
        world.tick(16.0).unwrap();
        assert!(world.hit(outer, "dot").unwrap().is_empty());
    }

    #[test]
    fn hit_requires_collision() {
        let mut world = World::new();
        let e = world.spawn(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(
            world.hit(e, "x"),
            Err(WorldError::MissingCapability {
                entity: e,
                capability: Capabilities::COLLISION
            })
        );
    }

    #[test]
    fn unsupported_shapes_are_ignored() {
        let mut world = World::new();
        let e = world.spawn(Rect::new(0.0, 0.0, 1.0, 1.0));
        world.collision(e, HullShape::Circle).unwrap();
        assert!(!world.capabilities(e).unwrap().contains(Capabilities::COLLISION));
        assert_eq!(world.hull_shape(e).unwrap(), None);
    }

    #[test]
    fn rotated_hulls_collide_by_shape() {
        let mut world = World::new();
        let a = collider(&mut world, 0.0, 0.0, 10.0, 10.0, "t");
        let b = collider(&mut world, 12.0, 0.0, 10.0, 10.0, "t");
        assert!(world.hit(a, "t").unwrap().is_empty());

        // A 45 degree turn about the center pokes the corners out past x = 12.
        world.set_origin(a, 5.0, 5.0).unwrap();
        world.set_rotation(a, 45.0).unwrap();
        let hits = world.hit(a, "t").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].other, b);
    }

    #[test]
    fn grid_follows_moves() {
        let mut world = World::new();
        let a = collider(&mut world, 0.0, 0.0, 10.0, 10.0, "t");
        world.set_position(a, 500.0, 500.0).unwrap();
        let near_origin = world.unfiltered_search(&Aabb::from_coords(0.0, 0.0, 10.0, 10.0));
        assert!(!near_origin.contains(&a));
        let there = world.unfiltered_search(&Aabb::from_coords(500.0, 500.0, 501.0, 501.0));
        assert_eq!(there, vec![a]);
        assert_eq!(world.boundaries(), Aabb::from_coords(500.0, 500.0, 510.0, 510.0));
    }

    #[test]
    fn frozen_entities_leave_the_grid() {
        let mut world = World::new();
        let a = collider(&mut world, 0.0, 0.0, 10.0, 10.0, "t");
        let b = collider(&mut world, 5.0, 5.0, 10.0, 10.0, "t");
        world.freeze(b).unwrap();
        assert!(world.hit(a, "t").unwrap().is_empty());
        world.unfreeze(b).unwrap();
        assert_eq!(world.hit(a, "t").unwrap().len(), 1);
    }

    #[test]
    fn destroyed_entities_leave_the_grid() {
        let mut world = World::new();
        let a = collider(&mut world, 0.0, 0.0, 10.0, 10.0, "t");
        let b = collider(&mut world, 5.0, 5.0, 10.0, 10.0, "t");
        world.destroy(b).unwrap();
        assert!(world.hit(a, "t").unwrap().is_empty());
        world.remove_collision(a).unwrap();
        assert!(world.unfiltered_search(&Aabb::from_coords(0.0, 0.0, 10.0, 10.0)).is_empty());
    }

    #[test]
    fn is_at_uses_rotated_hull() {
        let mut world = World::new();
        let a = collider(&mut world, 0.0, 0.0, 10.0, 10.0, "t");
        world.set_rotation(a, 90.0).unwrap();
        assert!(world.is_at(a, Point::new(-5.0, 5.0)).unwrap());
        assert!(!world.is_at(a, Point::new(5.0, 5.0)).unwrap());
    }

    #[test]
    fn hit_checks_diff_frames() {
        let mut world = World::new();
        let a = collider(&mut world, 0.0, 0.0, 10.0, 10.0, "t");
        let b = collider(&mut world, 5.0, 0.0, 10.0, 10.0, "t");
        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in [EventKind::HitOn, EventKind::HitOff] {
            let log = log.clone();
            world
                .bind(a, kind, move |_, _, ev| log.borrow_mut().push(ev.clone()))
                .unwrap();
        }
        world.check_hits(a, &["t", "t"]).unwrap();

        world.tick(16.0).unwrap();
        world.tick(16.0).unwrap();
        assert_eq!(log.borrow().len(), 1, "an ongoing overlap is reported once");
        assert!(matches!(&log.borrow()[0], Event::HitOn { hits, .. } if hits[0].other == b));

        world.set_x(b, 100.0).unwrap();
        world.tick(16.0).unwrap();
        assert_eq!(
            log.borrow()[1],
            Event::HitOff {
                tag: String::from("t"),
                others: vec![b]
            }
        );

        world.set_x(b, 5.0).unwrap();
        world.tick(16.0).unwrap();
        world.reset_hit_checks(a, None).unwrap();
        world.tick(16.0).unwrap();
        assert_eq!(log.borrow().len(), 4, "reset makes overlaps new again");

        world.ignore_hits(a, Some(&["t"])).unwrap();
        world.set_x(b, 100.0).unwrap();
        world.tick(16.0).unwrap();
        assert_eq!(log.borrow().len(), 4);
    }

    #[test]
    fn on_hit_runs_while_overlapping() {
        let mut world = World::new();
        let a = collider(&mut world, 0.0, 0.0, 10.0, 10.0, "t");
        let b = collider(&mut world, 5.0, 0.0, 10.0, 10.0, "t");
        let firsts = Rc::new(RefCell::new(Vec::new()));
        let ended = Rc::new(Cell::new(0));
        let (f, e) = (firsts.clone(), ended.clone());
        world
            .on_hit(
                a,
                "t",
                move |_, _, _, first| f.borrow_mut().push(first),
                Some(Rc::new(move |_: &mut World, _: EntityId| e.set(e.get() + 1))),
            )
            .unwrap();
        world.tick(16.0).unwrap();
        world.tick(16.0).unwrap();
        world.set_x(b, 100.0).unwrap();
        world.tick(16.0).unwrap();
        world.tick(16.0).unwrap();
        assert_eq!(*firsts.borrow(), [true, false]);
        assert_eq!(ended.get(), 1);
    }
}
