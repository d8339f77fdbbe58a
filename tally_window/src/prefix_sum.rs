// Copyright 2025 the Tally Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rows with individual heights and a lazily repaired prefix-sum cache.

use alloc::vec::Vec;

use crate::{ResizableRowExtents, RowExtents, Scalar};

/// A [`RowExtents`] that stores one height per row.
///
/// Row tops are kept in a prefix-sum table with one extra trailing entry for
/// the total height. Changing a height only marks the table dirty from that
/// row on; the next query repairs it up to the row it needs, so a burst of
/// updates costs one pass and steady-state lookups are O(1) (offsets) or
/// O(log n) (offset to row).
#[derive(Clone, Default, Debug)]
pub struct MeasuredRows<S: Scalar> {
    heights: Vec<S>,
    /// `tops[i]` is the top of row `i`; `tops[heights.len()]` is the total height.
    tops: Vec<S>,
    /// First entry of `tops` that may be stale.
    dirty_from: usize,
}

impl<S: Scalar> MeasuredRows<S> {
    /// Creates an empty layout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            tops: alloc::vec![S::zero()],
            dirty_from: 0,
        }
    }

    /// Creates a layout with one row per height.
    #[must_use]
    pub fn from_heights<I>(heights: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        let mut rows = Self::new();
        for height in heights {
            rows.heights.push(sanitize(height));
        }
        rows.tops.resize(rows.heights.len() + 1, S::zero());
        rows
    }

    /// Sets the height of `row`, growing the layout with zero-height rows if needed.
    pub fn set_height(&mut self, row: usize, height: S) {
        if row >= self.heights.len() {
            self.resize(row + 1);
        }
        self.heights[row] = sanitize(height);
        // `tops[row]` only depends on rows before it.
        self.dirty_from = self.dirty_from.min(row + 1);
    }

    /// Appends one row at the end of the layout.
    pub fn push(&mut self, height: S) {
        self.heights.push(sanitize(height));
        self.tops.push(S::zero());
        self.dirty_from = self.dirty_from.min(self.heights.len());
    }

    /// Grows or truncates to `rows` rows; new rows are zero-height.
    pub fn resize(&mut self, rows: usize) {
        let kept = self.heights.len().min(rows);
        self.heights.resize(rows, S::zero());
        self.tops.resize(rows + 1, S::zero());
        self.dirty_from = self.dirty_from.min(kept + 1);
    }

    /// Drops every row.
    pub fn clear(&mut self) {
        self.resize(0);
    }

    /// Brings `tops[..=through]` up to date.
    fn repair_through(&mut self, through: usize) {
        let through = through.min(self.heights.len());
        if self.dirty_from > through {
            return;
        }
        // `tops[0]` is always zero; start the running sum from the last clean entry.
        let first = self.dirty_from.max(1);
        if self.dirty_from == 0 {
            self.tops[0] = S::zero();
        }
        let mut top = self.tops[first - 1];
        for row in first..=through {
            top = top + self.heights[row - 1];
            self.tops[row] = top;
        }
        self.dirty_from = through + 1;
    }

    /// Top of `row`; rows past the end report the total height.
    pub fn top_of(&mut self, row: usize) -> S {
        let row = row.min(self.heights.len());
        self.repair_through(row);
        self.tops[row]
    }

    /// Height of the first `rows` rows.
    pub fn height_of_first(&mut self, rows: usize) -> S {
        self.top_of(rows)
    }
}

fn sanitize<S: Scalar>(height: S) -> S {
    debug_assert!(
        height.is_finite(),
        "row heights must be finite; got {height:?}"
    );
    if height.is_sign_negative() {
        S::zero()
    } else {
        height
    }
}

impl<S: Scalar> RowExtents for MeasuredRows<S> {
    type Scalar = S;

    fn row_count(&self) -> usize {
        self.heights.len()
    }

    fn total_height(&mut self) -> S {
        self.top_of(self.heights.len())
    }

    fn height_of(&mut self, row: usize) -> S {
        self.heights.get(row).copied().unwrap_or_else(S::zero)
    }

    fn offset_of(&mut self, row: usize) -> S {
        self.top_of(row)
    }

    fn row_at_offset(&mut self, offset: S) -> usize {
        let rows = self.heights.len();
        if rows == 0 {
            return 0;
        }
        self.repair_through(rows);
        let target = offset.max(S::zero());
        // Number of row tops at or above `target`; the covering row is the last of them.
        let at_or_above = self.tops[..rows].partition_point(|top| *top <= target);
        at_or_above.saturating_sub(1).min(rows - 1)
    }
}

impl<S: Scalar> ResizableRowExtents for MeasuredRows<S> {
    fn set_row_count(&mut self, rows: usize) {
        self.resize(rows);
    }
}
