// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The spatial hash itself.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use core::fmt::Debug;

use kinema_geom::Aabb;
use kurbo::Point;

use crate::types::{CellRange, Entry};

/// Cell size used when none is given.
pub const DEFAULT_CELL_SIZE: f64 = 64.0;

/// Largest number of cells an id is listed in individually.
///
/// An AABB spanning more cells than this is kept on a separate list that every search
/// returns, so inserting or moving it never walks an unbounded number of buckets.
pub const MAX_LISTED_CELLS: usize = 4096;

/// Uniform-grid spatial hash.
///
/// Buckets are keyed by `(column, row)`. Alongside the buckets the hash remembers the last
/// AABB each id was indexed with, which is what [`SpatialHash::boundaries`] reports from.
///
/// Ids whose AABB covers more than [`MAX_LISTED_CELLS`] cells are not bucketed; they are
/// candidates for every query instead.
///
/// Two dirty flags keep [`SpatialHash::boundaries`] lazy:
/// - the cell extent goes stale whenever an id is inserted or removed;
/// - the coordinate extent goes stale whenever an id moves without changing cells.
pub struct SpatialHash<I: Copy + Ord + Debug> {
    cell_size: f64,
    cells: BTreeMap<(i64, i64), Vec<I>>,
    oversized: BTreeSet<I>,
    extents: BTreeMap<I, Aabb>,
    bounds_dirty: bool,
    coords_dirty: bool,
    bounds: Aabb,
}

impl<I: Copy + Ord + Debug> SpatialHash<I> {
    /// Create an empty hash with square cells of `cell_size`.
    pub fn new(cell_size: f64) -> Self {
        debug_assert!(cell_size > 0.0, "cell size must be positive");
        Self {
            cell_size,
            cells: BTreeMap::new(),
            oversized: BTreeSet::new(),
            extents: BTreeMap::new(),
            bounds_dirty: false,
            coords_dirty: false,
            bounds: empty_bounds(),
        }
    }

    /// Side length of a cell.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    #[inline]
    fn floor_to_i64(v: f64) -> i64 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "cell coordinates saturate at the i64 range; NaN maps to 0."
        )]
        let i = v as i64;
        if (i as f64) > v { i.saturating_sub(1) } else { i }
    }

    fn is_oversized(keys: CellRange) -> bool {
        keys.len() > MAX_LISTED_CELLS
    }

    /// The inclusive cell range an AABB overlaps.
    pub fn key(&self, aabb: &Aabb) -> CellRange {
        let c = self.cell_size;
        CellRange {
            x1: Self::floor_to_i64(aabb.min.x / c),
            y1: Self::floor_to_i64(aabb.min.y / c),
            x2: Self::floor_to_i64(aabb.max.x / c),
            y2: Self::floor_to_i64(aabb.max.y / c),
        }
    }

    /// List `id` in every cell `aabb` overlaps.
    pub fn insert(&mut self, id: I, aabb: Aabb) -> Entry<I> {
        let keys = self.key(&aabb);
        if Self::is_oversized(keys) {
            log::debug!("{id:?} spans {} cells; listed as oversized", keys.len());
            self.oversized.insert(id);
        } else {
            for cell in keys.cells() {
                self.cells.entry(cell).or_default().push(id);
            }
        }
        self.extents.insert(id, aabb);
        self.bounds_dirty = true;
        Entry { keys, id }
    }

    /// Drop `entry.id` from every cell in `entry.keys`. Empty buckets are released.
    pub fn remove(&mut self, entry: &Entry<I>) {
        self.unlist(entry);
        self.extents.remove(&entry.id);
        self.bounds_dirty = true;
    }

    fn unlist(&mut self, entry: &Entry<I>) {
        if Self::is_oversized(entry.keys) {
            self.oversized.remove(&entry.id);
            return;
        }
        for cell in entry.keys.cells() {
            if let Some(bucket) = self.cells.get_mut(&cell) {
                bucket.retain(|&other| other != entry.id);
                if bucket.is_empty() {
                    self.cells.remove(&cell);
                }
            }
        }
    }

    /// Remove and reinsert unconditionally, returning the new entry.
    pub fn refresh(&mut self, entry: Entry<I>, aabb: Aabb) -> Entry<I> {
        self.unlist(&entry);
        let fresh = self.insert(entry.id, aabb);
        log::trace!(
            "rebucketed {:?}: {:?} -> {:?}",
            entry.id,
            entry.keys,
            fresh.keys
        );
        fresh
    }

    /// Bring an entry up to date with a new AABB.
    ///
    /// If the AABB still maps to the same cells the entry is returned unchanged and only the
    /// coordinate extent is marked stale; otherwise this is [`SpatialHash::refresh`].
    pub fn update_entry(&mut self, entry: Entry<I>, aabb: Aabb) -> Entry<I> {
        if self.key(&aabb) != entry.keys {
            return self.refresh(entry, aabb);
        }
        self.extents.insert(entry.id, aabb);
        self.coords_dirty = true;
        entry
    }

    /// Every id listed in a cell `aabb` overlaps, deduplicated and in ascending order.
    ///
    /// No exact test is made; callers filter the candidates themselves. Oversized ids are
    /// always included.
    pub fn unfiltered_search(&self, aabb: &Aabb) -> Vec<I> {
        let range = self.key(aabb);
        let mut set = self.oversized.clone();
        if range.len() > self.cells.len() {
            for (&(x, y), bucket) in &self.cells {
                if range.contains(x, y) {
                    set.extend(bucket.iter().copied());
                }
            }
        } else {
            for cell in range.cells() {
                if let Some(bucket) = self.cells.get(&cell) {
                    set.extend(bucket.iter().copied());
                }
            }
        }
        set.into_iter().collect()
    }

    /// Ids listed in a single cell. Oversized ids are not listed in any cell.
    pub fn cell(&self, column: i64, row: i64) -> &[I] {
        self.cells
            .get(&(column, row))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Bounding box of everything in the hash.
    ///
    /// Only ids listed in the outermost occupied columns and rows are consulted. The result
    /// is cached until an insert, removal, or in-cell move marks it stale. An empty hash
    /// reports an inverted box (`+∞` min, `−∞` max).
    pub fn boundaries(&mut self) -> Aabb {
        if !self.bounds_dirty && !self.coords_dirty {
            return self.bounds;
        }

        let mut min_col = i64::MAX;
        let mut max_col = i64::MIN;
        let mut min_row = i64::MAX;
        let mut max_row = i64::MIN;
        for &(x, y) in self.cells.keys() {
            min_col = min_col.min(x);
            max_col = max_col.max(x);
            min_row = min_row.min(y);
            max_row = max_row.max(y);
        }

        let mut bounds = empty_bounds();
        for id in &self.oversized {
            if let Some(e) = self.extents.get(id) {
                bounds = bounds.union(e);
            }
        }
        for (&(x, y), bucket) in &self.cells {
            let on_edge = x == min_col || x == max_col || y == min_row || y == max_row;
            if !on_edge {
                continue;
            }
            for id in bucket {
                let Some(e) = self.extents.get(id) else {
                    continue;
                };
                if x == min_col {
                    bounds.min.x = bounds.min.x.min(e.min.x);
                }
                if x == max_col {
                    bounds.max.x = bounds.max.x.max(e.max.x);
                }
                if y == min_row {
                    bounds.min.y = bounds.min.y.min(e.min.y);
                }
                if y == max_row {
                    bounds.max.y = bounds.max.y.max(e.max.y);
                }
            }
        }

        self.bounds = bounds;
        self.bounds_dirty = false;
        self.coords_dirty = false;
        bounds
    }

    /// Number of distinct ids indexed.
    pub fn len(&self) -> usize {
        self.extents.len()
    }

    /// Whether nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.extents.is_empty()
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.oversized.clear();
        self.extents.clear();
        self.bounds_dirty = true;
    }
}

impl<I: Copy + Ord + Debug> Default for SpatialHash<I> {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

fn empty_bounds() -> Aabb {
    Aabb::new(
        Point::new(f64::INFINITY, f64::INFINITY),
        Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
    )
}

impl<I: Copy + Ord + Debug> Debug for SpatialHash<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpatialHash")
            .field("cell_size", &self.cell_size)
            .field("ids", &self.extents.len())
            .field("cells", &self.cells.len())
            .field("oversized", &self.oversized.len())
            .field("bounds_dirty", &self.bounds_dirty)
            .field("coords_dirty", &self.coords_dirty)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn bx(x0: f64, y0: f64, x1: f64, y1: f64) -> Aabb {
        Aabb::from_coords(x0, y0, x1, y1)
    }

    #[test]
    fn key_floors_each_corner() {
        let g: SpatialHash<u32> = SpatialHash::new(64.0);
        let k = g.key(&bx(-1.0, 63.9, 64.0, 130.0));
        assert_eq!(
            k,
            CellRange {
                x1: -1,
                y1: 0,
                x2: 1,
                y2: 2
            }
        );
    }

    #[test]
    fn inserted_id_is_found_by_its_own_box() {
        let mut g = SpatialHash::new(64.0);
        let aabb = bx(10.0, 10.0, 200.0, 40.0);
        let e = g.insert(7_u32, aabb);
        assert_eq!(e.id, 7);
        assert_eq!(e.keys.len(), 4);
        assert_eq!(g.unfiltered_search(&aabb), vec![7]);
        for cell in e.keys.cells() {
            assert_eq!(g.cell(cell.0, cell.1), &[7]);
        }
    }

    #[test]
    fn search_deduplicates_across_cells() {
        let mut g = SpatialHash::new(10.0);
        g.insert(1_u32, bx(0.0, 0.0, 35.0, 35.0));
        g.insert(2_u32, bx(5.0, 5.0, 6.0, 6.0));
        assert_eq!(g.unfiltered_search(&bx(0.0, 0.0, 40.0, 40.0)), vec![1, 2]);
    }

    #[test]
    fn update_entry_same_cells_keeps_entry() {
        let mut g = SpatialHash::new(64.0);
        let e = g.insert(1_u32, bx(1.0, 1.0, 10.0, 10.0));
        let _ = g.boundaries();
        let same = g.update_entry(e, bx(2.0, 2.0, 11.0, 11.0));
        assert_eq!(same, e);
        assert!(g.coords_dirty);
        assert_eq!(g.boundaries(), bx(2.0, 2.0, 11.0, 11.0));
    }

    #[test]
    fn update_entry_changed_cells_moves_buckets() {
        let mut g = SpatialHash::new(64.0);
        let e = g.insert(1_u32, bx(1.0, 1.0, 10.0, 10.0));
        let moved = g.update_entry(e, bx(100.0, 1.0, 110.0, 10.0));
        assert_ne!(moved.keys, e.keys);
        assert!(g.cell(0, 0).is_empty());
        assert_eq!(g.cell(1, 0), &[1]);
        assert!(g.unfiltered_search(&bx(0.0, 0.0, 20.0, 20.0)).is_empty());
    }

    #[test]
    fn remove_drops_id_and_empty_buckets() {
        let mut g = SpatialHash::new(64.0);
        let a = g.insert(1_u32, bx(0.0, 0.0, 100.0, 100.0));
        let _b = g.insert(2_u32, bx(0.0, 0.0, 5.0, 5.0));
        g.remove(&a);
        assert_eq!(g.len(), 1);
        assert_eq!(g.cell(0, 0), &[2]);
        assert!(g.cell(1, 1).is_empty());
        assert_eq!(g.cells.len(), 1);
    }

    #[test]
    fn refresh_is_unconditional() {
        let mut g = SpatialHash::new(64.0);
        let e = g.insert(1_u32, bx(0.0, 0.0, 5.0, 5.0));
        let r = g.refresh(e, bx(0.0, 0.0, 5.0, 5.0));
        assert_eq!(r, e);
        assert_eq!(g.cell(0, 0), &[1]);
    }

    #[test]
    fn boundaries_cover_outermost_cells() {
        let mut g: SpatialHash<u32> = SpatialHash::new(64.0);
        let empty = g.boundaries();
        assert!(empty.min.x > empty.max.x);

        g.insert(1, bx(-100.0, 10.0, -90.0, 20.0));
        g.insert(2, bx(300.0, 400.0, 310.0, 420.0));
        g.insert(3, bx(50.0, 50.0, 60.0, 60.0));
        assert_eq!(g.boundaries(), bx(-100.0, 10.0, 310.0, 420.0));

        let e = g.insert(4, bx(1000.0, -5.0, 1001.0, 1.0));
        assert_eq!(g.boundaries(), bx(-100.0, -5.0, 1001.0, 420.0));
        g.remove(&e);
        assert_eq!(g.boundaries(), bx(-100.0, 10.0, 310.0, 420.0));
    }

    #[test]
    fn far_negative_box_is_found_by_its_own_box() {
        let mut g = SpatialHash::new(64.0);
        let far = bx(-1e12, 0.0, -1e12 + 10.0, 10.0);
        let e = g.insert(1_u32, far);
        assert!(e.keys.x1 <= e.keys.x2);
        assert_eq!(g.unfiltered_search(&far), vec![1]);

        let edge = bx(-1e300, -1e300, -1e300, -1e300);
        let e = g.insert(2_u32, edge);
        assert_eq!(e.keys.x1, i64::MIN);
        assert!(g.unfiltered_search(&edge).contains(&2));
    }

    #[test]
    fn very_wide_box_is_listed_as_oversized() {
        let mut g = SpatialHash::new(64.0);
        let wide = bx(-2e11, 0.0, 10.0, 10.0);
        let e = g.insert(1_u32, wide);
        assert!(e.keys.len() > MAX_LISTED_CELLS);
        assert!(g.cells.is_empty());
        let small = g.insert(2_u32, bx(5000.0, 5000.0, 5001.0, 5001.0));

        assert_eq!(g.unfiltered_search(&wide), vec![1]);
        assert_eq!(g.unfiltered_search(&bx(5000.0, 5000.0, 5001.0, 5001.0)), vec![1, 2]);
        assert_eq!(g.boundaries(), bx(-2e11, 0.0, 5001.0, 5001.0));

        let e = g.update_entry(e, bx(0.0, 0.0, 1.0, 1.0));
        assert_eq!(g.cell(0, 0), &[1]);
        assert!(g.oversized.is_empty());
        g.remove(&e);
        g.remove(&small);
        assert!(g.is_empty());
        assert!(g.cells.is_empty());
    }

    #[test]
    fn huge_query_scans_occupied_cells() {
        let mut g = SpatialHash::new(1.0);
        g.insert(1_u32, bx(3.0, 3.0, 4.0, 4.0));
        g.insert(2_u32, bx(-9e15, 7.0, -9e15, 7.0));
        let everything = bx(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::INFINITY);
        assert_eq!(g.unfiltered_search(&everything), vec![1, 2]);
        assert_eq!(g.unfiltered_search(&bx(-1e18, 0.0, 0.0, 10.0)), vec![2]);
    }

    #[test]
    fn clear_empties() {
        let mut g = SpatialHash::default();
        g.insert(1_u32, bx(0.0, 0.0, 1.0, 1.0));
        g.clear();
        assert!(g.is_empty());
        assert!(g.unfiltered_search(&bx(0.0, 0.0, 1.0, 1.0)).is_empty());
        assert_eq!(g.cell_size(), DEFAULT_CELL_SIZE);
    }
}
