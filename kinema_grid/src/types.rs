// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell ranges and index entries.

/// Inclusive rectangle of cell coordinates.
///
/// `x1..=x2` by `y1..=y2`; an AABB inside a single cell has `x1 == x2` and `y1 == y2`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// First column.
    pub x1: i64,
    /// First row.
    pub y1: i64,
    /// Last column (inclusive).
    pub x2: i64,
    /// Last row (inclusive).
    pub y2: i64,
}

impl CellRange {
    /// Iterate over every `(column, row)` in the range, row by row.
    pub fn cells(self) -> impl Iterator<Item = (i64, i64)> {
        (self.y1..=self.y2).flat_map(move |y| (self.x1..=self.x2).map(move |x| (x, y)))
    }

    /// Whether `(column, row)` lies inside the range.
    pub fn contains(self, column: i64, row: i64) -> bool {
        (self.x1..=self.x2).contains(&column) && (self.y1..=self.y2).contains(&row)
    }

    /// Number of cells covered, saturating at `usize::MAX`.
    pub fn len(self) -> usize {
        let w = i128::from(self.x2) - i128::from(self.x1) + 1;
        let h = i128::from(self.y2) - i128::from(self.y1) + 1;
        usize::try_from(w.max(0).saturating_mul(h.max(0))).unwrap_or(usize::MAX)
    }

    /// Whether the range covers no cell.
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// Handle describing where an id currently sits in a [`SpatialHash`](crate::SpatialHash).
///
/// Entries are plain values; the index does not track them. Pass the latest entry back to
/// [`update_entry`](crate::SpatialHash::update_entry), [`refresh`](crate::SpatialHash::refresh),
/// or [`remove`](crate::SpatialHash::remove).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Entry<I> {
    /// Cells the id was listed in.
    pub keys: CellRange,
    /// The indexed id.
    pub id: I,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn cells_cover_range_row_major() {
        let r = CellRange {
            x1: -1,
            y1: 0,
            x2: 0,
            y2: 1,
        };
        let cells: Vec<_> = r.cells().collect();
        assert_eq!(cells, [(-1, 0), (0, 0), (-1, 1), (0, 1)]);
        assert_eq!(r.len(), 4);
        assert!(!r.is_empty());
    }

    #[test]
    fn inverted_range_is_empty() {
        let r = CellRange {
            x1: 2,
            y1: 0,
            x2: 1,
            y2: 0,
        };
        assert!(r.is_empty());
        assert_eq!(r.cells().count(), 0);
    }

    #[test]
    fn full_range_len_saturates() {
        let r = CellRange {
            x1: i64::MIN,
            y1: i64::MIN,
            x2: i64::MAX,
            y2: i64::MAX,
        };
        assert_eq!(r.len(), usize::MAX);
        assert!(r.contains(0, -7));
        assert!(!CellRange::default().contains(1, 0));
    }
}
