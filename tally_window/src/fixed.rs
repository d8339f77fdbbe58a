// Copyright 2025 the Tally Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rows that all share one height.

use crate::{ResizableRowExtents, RowExtents, Scalar};

/// A [`RowExtents`] where every row has the same height.
///
/// Every query is a multiplication or a division, so no cache is needed.
#[derive(Debug, Clone, Copy)]
pub struct UniformRows<S: Scalar> {
    rows: usize,
    height: S,
}

impl<S: Scalar> UniformRows<S> {
    /// Creates a layout of `rows` rows, each `height` tall.
    ///
    /// Negative heights are clamped to zero.
    #[must_use]
    pub fn new(rows: usize, height: S) -> Self {
        Self {
            rows,
            height: clamp_height(height),
        }
    }

    /// Changes the shared row height.
    pub fn set_height(&mut self, height: S) {
        debug_assert!(
            height.is_finite(),
            "UniformRows height must be finite; got {height:?}"
        );
        self.height = clamp_height(height);
    }

    /// The shared row height.
    #[must_use]
    pub const fn height(&self) -> S {
        self.height
    }
}

fn clamp_height<S: Scalar>(height: S) -> S {
    if height.is_sign_negative() {
        S::zero()
    } else {
        height
    }
}

impl<S: Scalar> RowExtents for UniformRows<S> {
    type Scalar = S;

    fn row_count(&self) -> usize {
        self.rows
    }

    fn total_height(&mut self) -> S {
        S::from_usize(self.rows) * self.height
    }

    fn height_of(&mut self, row: usize) -> S {
        if row < self.rows {
            self.height
        } else {
            S::zero()
        }
    }

    fn offset_of(&mut self, row: usize) -> S {
        S::from_usize(row.min(self.rows)) * self.height
    }

    fn row_at_offset(&mut self, offset: S) -> usize {
        if self.rows == 0 || self.height <= S::zero() {
            return 0;
        }
        let row = (offset / self.height).floor_to_isize().max(0);
        #[allow(
            clippy::cast_sign_loss,
            reason = "`row` was clamped to be non-negative above"
        )]
        let row = row as usize;
        row.min(self.rows - 1)
    }
}

impl<S: Scalar> ResizableRowExtents for UniformRows<S> {
    fn set_row_count(&mut self, rows: usize) {
        self.rows = rows;
    }
}

#[cfg(test)]
mod tests {
    use super::UniformRows;
    use crate::{ResizableRowExtents, RowExtents};

    #[test]
    fn offsets_are_linear_in_the_row_index() {
        let mut rows = UniformRows::new(57, 32.0_f64);
        assert_eq!(rows.total_height(), 57.0 * 32.0);
        assert_eq!(rows.offset_of(0), 0.0);
        assert_eq!(rows.offset_of(20), 640.0);
        assert_eq!(rows.offset_of(1000), 57.0 * 32.0);
        assert_eq!(rows.height_of(56), 32.0);
        assert_eq!(rows.height_of(57), 0.0);
    }

    #[test]
    fn offset_lookup_clamps_into_the_row_range() {
        let mut rows = UniformRows::new(5, 10.0_f32);
        assert_eq!(rows.row_at_offset(-3.0), 0);
        assert_eq!(rows.row_at_offset(9.9), 0);
        assert_eq!(rows.row_at_offset(10.0), 1);
        assert_eq!(rows.row_at_offset(49.0), 4);
        assert_eq!(rows.row_at_offset(500.0), 4);
    }

    #[test]
    fn resizing_keeps_the_height() {
        let mut rows = UniformRows::new(0, -4.0_f32);
        assert_eq!(rows.height(), 0.0);
        rows.set_height(18.0);
        rows.set_row_count(3);
        assert_eq!(rows.total_height(), 54.0);
    }
}
