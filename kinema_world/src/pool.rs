// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack of reusable rectangle records.
//!
//! Every geometric change snapshots the entity's prior rectangle here for the duration of
//! its event dispatch. Dispatch can nest (a parent's move shifts its children, whose moves
//! shift theirs), so snapshots are taken and released strictly last-in, first-out. The pool
//! checks that order on every release.

use alloc::vec::Vec;

use kinema_geom::Rect;

/// Handle to an acquired pool record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PoolSlot(usize);

/// Pool misuse.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// A record was released while a later acquisition was still outstanding.
    #[error("released slot {slot} out of order; slot {top} is on top")]
    OutOfOrder {
        /// The slot being released.
        slot: usize,
        /// The most recently acquired slot still outstanding.
        top: usize,
    },
    /// Nothing is acquired.
    #[error("released a slot with nothing acquired")]
    Empty,
}

/// Growable LIFO pool of [`Rect`] records.
///
/// Records are never freed; the pool keeps its high-water mark so steady-state use does not
/// allocate.
#[derive(Clone, Debug, Default)]
pub struct RectPool {
    records: Vec<Rect>,
    pointer: usize,
}

impl RectPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a record holding `x`, `y`, `w`, `h`.
    pub fn get(&mut self, x: f64, y: f64, w: f64, h: f64) -> PoolSlot {
        self.copy(Rect::new(x, y, w, h))
    }

    /// Acquire a record holding a copy of `rect`.
    pub fn copy(&mut self, rect: Rect) -> PoolSlot {
        if self.records.len() <= self.pointer {
            self.records.push(rect);
        } else {
            self.records[self.pointer] = rect;
        }
        let slot = PoolSlot(self.pointer);
        self.pointer += 1;
        slot
    }

    /// Contents of an acquired record.
    ///
    /// Released records keep their last value until reused.
    pub fn rect(&self, slot: PoolSlot) -> Rect {
        self.records.get(slot.0).copied().unwrap_or_default()
    }

    /// Release the most recently acquired record.
    ///
    /// Releasing anything else fails and leaves the pool unchanged.
    pub fn recycle(&mut self, slot: PoolSlot) -> Result<(), PoolError> {
        let Some(top) = self.pointer.checked_sub(1) else {
            return Err(PoolError::Empty);
        };
        if slot.0 != top {
            return Err(PoolError::OutOfOrder { slot: slot.0, top });
        }
        self.pointer = top;
        Ok(())
    }

    /// Number of outstanding acquisitions.
    pub fn depth(&self) -> usize {
        self.pointer
    }

    /// Number of records allocated so far.
    pub fn capacity(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_acquire_release() {
        let mut pool = RectPool::new();
        let a = pool.copy(Rect::new(1.0, 2.0, 3.0, 4.0));
        let b = pool.get(5.0, 6.0, 7.0, 8.0);
        assert_eq!(pool.depth(), 2);
        assert_eq!(pool.rect(a), Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(pool.rect(b).x, 5.0);
        pool.recycle(b).unwrap();
        pool.recycle(a).unwrap();
        assert_eq!(pool.depth(), 0);
    }

    #[test]
    fn records_are_reused() {
        let mut pool = RectPool::new();
        for i in 0..10 {
            let s = pool.get(f64::from(i), 0.0, 1.0, 1.0);
            pool.recycle(s).unwrap();
        }
        assert_eq!(pool.capacity(), 1);
    }

    #[test]
    fn out_of_order_release_is_rejected() {
        let mut pool = RectPool::new();
        let a = pool.get(0.0, 0.0, 1.0, 1.0);
        let b = pool.get(0.0, 0.0, 2.0, 2.0);
        assert_eq!(pool.recycle(a), Err(PoolError::OutOfOrder { slot: 0, top: 1 }));
        assert_eq!(pool.depth(), 2);
        pool.recycle(b).unwrap();
        pool.recycle(a).unwrap();
        assert_eq!(pool.recycle(a), Err(PoolError::Empty));
    }
}
