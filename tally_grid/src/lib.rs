// Copyright 2025 the Tally Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tally Grid: the data side of a virtualized data grid.
//!
//! A grid body that shows thousands of rows cannot hold them all, and cannot
//! render them all. This crate keeps track of which rows are resident, loads
//! the missing ones page by page as they scroll into view, and filters the
//! resident rows locally when the user searches.
//!
//! - [`PagedDataSource`]: the backing rows, the set of loaded pages, and the
//!   switch between remote paging ([`ModeKind::Remote`]) and local filtering
//!   ([`ModeKind::Filtered`]). Pages come from a [`PageFetcher`].
//! - [`WindowedListEngine`]: maps a pixel viewport onto rows using the
//!   `tally_window` layouts, forwards unloaded ranges to the source, and hands
//!   the render core either a row or a placeholder.
//! - [`SourceConfig`] / [`EngineConfig`]: construction-time settings.
//! - [`Column`] and [`distribute_column_widths`]: cell accessors and width
//!   sharing for the columns a render core draws.
//!
//! Everything runs on one thread. Range requests return a [`LoadTask`] future
//! that the host polls on its local executor; at most one is in flight per
//! source, and [`PagedDataSource::reset`] makes outstanding results stale.
//!
//! ## Example
//!
//! ```rust
//! use core::num::NonZeroUsize;
//!
//! use futures::executor::block_on;
//! use tally_grid::{
//!     BoxError, EngineConfig, FetchedPage, ModeKind, PagedDataSource, SourceConfig,
//!     WindowedListEngine,
//! };
//!
//! let source = PagedDataSource::new(
//!     SourceConfig::<String>::new()
//!         .with_page_size(NonZeroUsize::new(20).unwrap())
//!         .with_fetcher(|page: usize, size: usize| async move {
//!             let first = (page - 1) * size;
//!             let data = (first..(first + size).min(57)).map(|i| format!("order {i}")).collect();
//!             Ok::<_, BoxError>(FetchedPage::new(data, 57))
//!         })
//!         .with_filter(|row: &String, term: &str| row.contains(term)),
//! );
//! let mut engine = WindowedListEngine::new(source, EngineConfig::<f64>::new());
//!
//! // The render core reports rows 0..=9; page 1 loads.
//! if let Some(task) = engine.on_visible_range_change(0, 9) {
//!     block_on(task);
//! }
//! assert_eq!(engine.total_items(), 57);
//! assert!(engine.has_next_page());
//!
//! // Searching filters what is resident and stops fetching.
//! engine.set_search_term("order 1");
//! assert_eq!(engine.source().mode_kind(), ModeKind::Filtered);
//! assert_eq!(engine.total_items(), 11);
//! assert!(!engine.has_next_page());
//! ```
//!
//! Logging goes through `tracing`; install a subscriber to see request, merge,
//! and filter events.

mod columns;
mod config;
mod engine;
mod error;
mod fetch;
mod mode;
mod pages;
mod slots;
mod source;

pub use columns::{Column, distribute_column_widths};
pub use config::{EngineConfig, FilterFn, KeyFn, SourceConfig};
pub use engine::{RenderedRow, RowKey, ViewportWindow, VisibleRow, WindowedListEngine};
pub use error::{BoxError, LoadError};
pub use fetch::{FetchFuture, FetchedPage, PageFetcher};
pub use mode::ModeKind;
pub use pages::{page_of, page_rows};
pub use slots::SlotState;
pub use source::{LoadTask, PagedDataSource};

pub use tally_window::{RowHeight, ScrollAlign, VisibleRows};
