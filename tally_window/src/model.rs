// Copyright 2025 the Tally Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row extent traits and the visible-row query.

use crate::Scalar;

/// Answer to a visibility query: which rows to realize and how much space surrounds them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRows<S: Scalar> {
    /// First row to realize (inclusive).
    pub start: usize,
    /// One past the last row to realize (exclusive).
    pub end: usize,

    /// Height of all rows before `start`; the render core's leading spacer.
    pub before_extent: S,
    /// Height of all rows from `end` onwards; the trailing spacer.
    pub after_extent: S,
    /// Height of the whole grid body.
    pub content_extent: S,
}

impl<S: Scalar> VisibleRows<S> {
    /// An empty result with all extents at zero.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            start: 0,
            end: 0,
            before_extent: S::zero(),
            after_extent: S::zero(),
            content_extent: S::zero(),
        }
    }

    /// Returns `true` if no rows are visible.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Number of realized rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// The realized rows as an inclusive `(start, stop)` pair, or `None` when empty.
    ///
    /// This is the shape data sources use for range requests.
    #[must_use]
    pub const fn inclusive(&self) -> Option<(usize, usize)> {
        if self.start == self.end {
            None
        } else {
            Some((self.start, self.end - 1))
        }
    }
}

/// Vertical layout of the rows `0..row_count()` of a grid body.
///
/// Offsets and heights share the coordinate space of the scroll offset
/// (normally logical pixels). Queries that may fill a cache take `&mut self`.
pub trait RowExtents {
    /// Coordinate type.
    type Scalar: Scalar;

    /// Number of rows laid out.
    fn row_count(&self) -> usize;

    /// Returns `true` if there are no rows.
    fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Height of all rows together.
    fn total_height(&mut self) -> Self::Scalar;

    /// Height of one row. Never negative; zero for out-of-range rows.
    fn height_of(&mut self, row: usize) -> Self::Scalar;

    /// Distance from the top of the grid body to the top of `row`.
    ///
    /// `offset_of(0)` is zero and `offset_of(i + 1) == offset_of(i) + height_of(i)`.
    /// Rows at or past `row_count()` report the total height.
    fn offset_of(&mut self, row: usize) -> Self::Scalar;

    /// The row covering `offset`, clamped to `0..row_count()` (zero for an empty layout).
    fn row_at_offset(&mut self, offset: Self::Scalar) -> usize;
}

/// A [`RowExtents`] whose row count follows the data source.
pub trait ResizableRowExtents: RowExtents {
    /// Grows or shrinks the layout to `rows` rows.
    fn set_row_count(&mut self, rows: usize);
}

/// Computes which rows intersect a viewport, widened by overscan on each side.
///
/// - `scroll_offset`: top of the viewport in grid body coordinates.
/// - `viewport_extent`: height of the viewport.
/// - `overscan_before` / `overscan_after`: extra distance realized above and
///   below the viewport so fast scrolling does not reveal blank space.
///
/// Negative inputs are treated as zero.
pub fn compute_visible_rows<M>(
    rows: &mut M,
    scroll_offset: M::Scalar,
    viewport_extent: M::Scalar,
    overscan_before: M::Scalar,
    overscan_after: M::Scalar,
) -> VisibleRows<M::Scalar>
where
    M: RowExtents,
{
    let zero = <M::Scalar as Scalar>::zero();
    let count = rows.row_count();
    if count == 0 {
        return VisibleRows::empty();
    }

    let content_extent = rows.total_height().max(zero);
    if content_extent <= zero {
        // Every row collapsed to zero height.
        return VisibleRows::empty();
    }

    let top = (scroll_offset.max(zero) - overscan_before.max(zero)).max(zero);
    let bottom = (scroll_offset.max(zero) + viewport_extent.max(zero) + overscan_after.max(zero))
        .min(content_extent);

    if bottom <= top {
        let top = top.min(content_extent);
        return VisibleRows {
            start: 0,
            end: 0,
            before_extent: top,
            after_extent: (content_extent - top).max(zero),
            content_extent,
        };
    }

    let mut start = rows.row_at_offset(top).min(count - 1);
    while start > 0 && rows.offset_of(start) > top {
        start -= 1;
    }

    let mut end = start;
    while end < count && rows.offset_of(end) < bottom {
        end += 1;
    }

    let before_extent = rows.offset_of(start);
    let after_extent = (content_extent - rows.offset_of(end)).max(zero);

    VisibleRows {
        start,
        end,
        before_extent,
        after_extent,
        content_extent,
    }
}
