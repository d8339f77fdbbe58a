// Copyright 2025 the Tally Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll state plus a cached visible-row query.

use crate::{RowExtents, Scalar, VisibleRows, compute_visible_rows};

/// Where a row should land when scrolled into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAlign {
    /// Row top at the viewport top.
    Start,
    /// Row centered in the viewport.
    Center,
    /// Row bottom at the viewport bottom.
    End,
    /// Smallest scroll that makes the row fully visible; no scroll if it already is.
    Nearest,
}

/// Scroll offset, viewport height, and overscan over a [`RowExtents`] layout.
///
/// The last [`VisibleRows`] answer is cached and recomputed only after the
/// scroll position, viewport, overscan, or layout changed.
#[derive(Debug)]
pub struct RowWindow<M: RowExtents> {
    rows: M,
    scroll_offset: M::Scalar,
    viewport_extent: M::Scalar,
    overscan_before: M::Scalar,
    overscan_after: M::Scalar,

    stale: bool,
    cached: VisibleRows<M::Scalar>,
}

impl<M: RowExtents> RowWindow<M> {
    /// Creates a window over `rows`, scrolled to the top, with the same overscan on both sides.
    #[must_use]
    pub fn new(rows: M, viewport_extent: M::Scalar, overscan: M::Scalar) -> Self {
        let zero = M::Scalar::zero();
        Self {
            rows,
            scroll_offset: zero,
            viewport_extent: viewport_extent.max(zero),
            overscan_before: overscan.max(zero),
            overscan_after: overscan.max(zero),
            stale: true,
            cached: VisibleRows::empty(),
        }
    }

    /// The row layout.
    #[must_use]
    pub fn rows(&self) -> &M {
        &self.rows
    }

    /// Mutable access to the row layout; the cached answer is discarded.
    pub fn rows_mut(&mut self) -> &mut M {
        self.stale = true;
        &mut self.rows
    }

    /// Replaces the row layout.
    pub fn replace_rows(&mut self, rows: M) -> M {
        self.stale = true;
        core::mem::replace(&mut self.rows, rows)
    }

    /// Current scroll offset.
    #[must_use]
    pub const fn scroll_offset(&self) -> M::Scalar {
        self.scroll_offset
    }

    /// Moves the viewport top to `offset` (negative values clamp to zero).
    pub fn set_scroll_offset(&mut self, offset: M::Scalar) {
        let offset = offset.max(M::Scalar::zero());
        if offset != self.scroll_offset {
            self.scroll_offset = offset;
            self.stale = true;
        }
    }

    /// Scrolls by `delta`.
    pub fn scroll_by(&mut self, delta: M::Scalar) {
        self.set_scroll_offset(self.scroll_offset + delta);
    }

    /// Current viewport height.
    #[must_use]
    pub const fn viewport_extent(&self) -> M::Scalar {
        self.viewport_extent
    }

    /// Sets the viewport height, e.g. after a resize.
    pub fn set_viewport_extent(&mut self, extent: M::Scalar) {
        let extent = extent.max(M::Scalar::zero());
        if extent != self.viewport_extent {
            self.viewport_extent = extent;
            self.stale = true;
        }
    }

    /// Sets the overscan distances above and below the viewport.
    pub fn set_overscan(&mut self, before: M::Scalar, after: M::Scalar) {
        let zero = M::Scalar::zero();
        let (before, after) = (before.max(zero), after.max(zero));
        if before != self.overscan_before || after != self.overscan_after {
            self.overscan_before = before;
            self.overscan_after = after;
            self.stale = true;
        }
    }

    /// Overscan above the viewport.
    #[must_use]
    pub const fn overscan_before(&self) -> M::Scalar {
        self.overscan_before
    }

    /// Overscan below the viewport.
    #[must_use]
    pub const fn overscan_after(&self) -> M::Scalar {
        self.overscan_after
    }

    /// Rows to realize for the current scroll state.
    #[must_use]
    pub fn visible_rows(&mut self) -> VisibleRows<M::Scalar> {
        if self.stale {
            self.cached = compute_visible_rows(
                &mut self.rows,
                self.scroll_offset,
                self.viewport_extent,
                self.overscan_before,
                self.overscan_after,
            );
            self.stale = false;
        }
        self.cached
    }

    /// Top of `row`, without touching the cached visible rows.
    pub fn row_offset(&mut self, row: usize) -> M::Scalar {
        self.rows.offset_of(row)
    }

    /// Height of `row`.
    pub fn row_height(&mut self, row: usize) -> M::Scalar {
        self.rows.height_of(row)
    }

    /// Height of all rows.
    pub fn content_extent(&mut self) -> M::Scalar {
        self.rows.total_height()
    }

    /// Largest scroll offset that keeps the viewport inside the content.
    #[must_use]
    pub fn max_scroll_offset(&mut self) -> M::Scalar {
        let content = self.rows.total_height();
        if content > self.viewport_extent {
            content - self.viewport_extent
        } else {
            M::Scalar::zero()
        }
    }

    /// Pulls the scroll offset back inside the content, e.g. after the row count shrank.
    pub fn clamp_scroll_to_content(&mut self) {
        let max = self.max_scroll_offset();
        if self.scroll_offset > max {
            self.set_scroll_offset(max);
        }
    }

    /// Returns `true` if any part of `row` lies inside the viewport (overscan excluded).
    #[must_use]
    pub fn is_row_visible(&mut self, row: usize) -> bool {
        if row >= self.rows.row_count() {
            return false;
        }
        let top = self.rows.offset_of(row);
        let bottom = top + self.rows.height_of(row);
        bottom > self.scroll_offset && top < self.scroll_offset + self.viewport_extent
    }

    /// Scrolls so that `row` is shown with the given alignment.
    ///
    /// Rows past the end are clamped to the last row.
    pub fn scroll_to_row(&mut self, row: usize, align: ScrollAlign) {
        let count = self.rows.row_count();
        if count == 0 {
            self.set_scroll_offset(M::Scalar::zero());
            return;
        }
        let row = row.min(count - 1);
        let zero = M::Scalar::zero();
        let top = self.rows.offset_of(row);
        let bottom = top + self.rows.height_of(row);
        let viewport = self.viewport_extent;

        let offset = match align {
            ScrollAlign::Start => top,
            ScrollAlign::End => (bottom - viewport).max(zero),
            ScrollAlign::Center => {
                let two = M::Scalar::from_usize(2);
                ((top + bottom - viewport) / two).max(zero)
            }
            ScrollAlign::Nearest => {
                if top < self.scroll_offset {
                    top
                } else if bottom > self.scroll_offset + viewport {
                    (bottom - viewport).max(zero)
                } else {
                    self.scroll_offset
                }
            }
        };
        self.set_scroll_offset(offset);
    }
}
