// Copyright 2025 the Tally Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tally Window: row windowing for virtualized data grids.
//!
//! This crate answers the two geometric questions a virtualized grid body asks
//! on every scroll, resize, or content-size change:
//!
//! - where does row `i` start (its pixel offset), and
//! - which rows intersect the viewport `[top, top + height)`.
//!
//! The building blocks are:
//!
//! - [`Scalar`]: `f32`/`f64` abstraction for offsets and heights.
//! - [`RowExtents`]: the vertical layout of rows `0..row_count()`.
//! - [`UniformRows`]: every row has the same height.
//! - [`MeasuredRows`]: per-row heights with a lazily repaired prefix-sum table.
//! - [`SizedRows`] / [`RowLayout`]: layouts driven by a [`RowHeight`] policy,
//!   either a constant or a pure `index -> height` function.
//! - [`compute_visible_rows`]: visible range plus leading/trailing spacer
//!   heights, widened by overscan.
//! - [`RowWindow`]: scroll offset, viewport, and overscan over a layout, with
//!   a cached [`VisibleRows`] answer and [`ScrollAlign`]-based scrolling.
//!
//! The crate knows nothing about data loading or rendering. The data grid in
//! `tally_grid` resizes the layout as rows become known and asks it for
//! visible ranges; a render core positions row views using the returned
//! offsets and spacers.
//!
//! ## Minimal example
//!
//! ```rust
//! use tally_window::{RowWindow, UniformRows};
//!
//! // 57 rows, 32 logical pixels each, in a 320 pixel viewport.
//! let mut window = RowWindow::new(UniformRows::new(57, 32.0), 320.0, 64.0);
//! window.set_scroll_offset(640.0);
//!
//! let visible = window.visible_rows();
//! assert_eq!(visible.start, 18);
//! assert_eq!(visible.end, 32);
//! assert_eq!(visible.before_extent, 18.0 * 32.0);
//! ```
//!
//! ## Rows sized by a function
//!
//! ```rust
//! use tally_window::{RowExtents, RowHeight, RowLayout, ResizableRowExtents};
//!
//! // Group header rows every 10 rows are taller.
//! let policy = RowHeight::per_row(|row| if row % 10 == 0 { 48.0_f32 } else { 32.0 });
//! let mut rows = RowLayout::new(&policy, 20);
//! assert_eq!(rows.offset_of(11), 48.0 + 9.0 * 32.0 + 48.0);
//!
//! // Learning about more rows only measures the new ones.
//! rows.set_row_count(57);
//! assert_eq!(rows.row_count(), 57);
//! ```
//!
//! All coordinates are expected to be finite and non-negative.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod fixed;
mod model;
mod prefix_sum;
mod scalar;
mod sized;
mod virtual_list;

pub use fixed::UniformRows;
pub use model::{ResizableRowExtents, RowExtents, VisibleRows, compute_visible_rows};
pub use prefix_sum::MeasuredRows;
pub use scalar::Scalar;
pub use sized::{RowHeight, RowLayout, SizeFn, SizedRows};
pub use virtual_list::{RowWindow, ScrollAlign};
