// Copyright 2025 the Tally Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The windowed list engine: viewport geometry in front of a paged data source.

use core::fmt;
use std::rc::Rc;

use futures::task::{LocalSpawn, LocalSpawnExt as _, SpawnError};
use tally_window::{
    ResizableRowExtents, RowExtents, RowHeight, RowLayout, RowWindow, Scalar, ScrollAlign,
    VisibleRows,
};
use tracing::trace;

use crate::{Column, EngineConfig, KeyFn, LoadError, LoadTask, PagedDataSource};

/// The rows a render core currently shows, as an inclusive index range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportWindow {
    /// First visible row.
    pub start_index: usize,
    /// Last visible row (inclusive).
    pub stop_index: usize,
}

/// What to draw for one row.
#[derive(Debug, PartialEq, Eq)]
pub enum VisibleRow<T> {
    /// The row is loaded.
    Item(Rc<T>),
    /// The row is not loaded yet; draw a skeleton.
    Placeholder,
}

impl<T> VisibleRow<T> {
    /// The item, if loaded.
    #[must_use]
    pub fn item(&self) -> Option<&T> {
        match self {
            Self::Item(item) => Some(item),
            Self::Placeholder => None,
        }
    }

    /// Returns `true` for placeholders.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }
}

/// Render identity of a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    /// Key produced by the key extractor.
    Item(String),
    /// Positional fallback for placeholders or when no extractor is set.
    Index(usize),
}

/// A row resolved through column accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedRow {
    /// Cell texts, one per column.
    Cells {
        /// Row index.
        index: usize,
        /// Render identity.
        key: RowKey,
        /// Cell texts in column order.
        cells: Vec<String>,
    },
    /// Skeleton descriptor for a row that is not loaded.
    Placeholder {
        /// Row index.
        index: usize,
    },
}

/// Maps a pixel viewport onto rows of a [`PagedDataSource`] and requests the
/// pages that scroll into view.
///
/// The engine only reads the data source; every mutation goes through the
/// source's own operations. Row heights are cached as prefix sums and are
/// extended when the source learns about more rows, so row offsets are O(1)
/// amortized for fixed heights and per-row sizing functions alike.
///
/// ```rust
/// use futures::executor::block_on;
/// use tally_grid::{
///     BoxError, EngineConfig, FetchedPage, PagedDataSource, SourceConfig, WindowedListEngine,
/// };
///
/// let source = PagedDataSource::new(SourceConfig::<usize>::new().with_fetcher(
///     |page: usize, size: usize| async move {
///         let first = (page - 1) * size;
///         let data = (first..(first + size).min(57)).collect();
///         Ok::<_, BoxError>(FetchedPage::new(data, 57))
///     },
/// ));
/// let config = EngineConfig::<f64>::new().with_viewport_extent(400.0);
/// let mut engine = WindowedListEngine::new(source, config);
///
/// let window = engine.visible_range(0.0, 400.0).unwrap();
/// if let Some(task) = engine.on_visible_range_change(window.start_index, window.stop_index) {
///     block_on(task);
/// }
/// assert!(engine.is_item_loaded(0));
/// assert_eq!(engine.row_count(), 57);
/// ```
pub struct WindowedListEngine<T, S: Scalar = f64> {
    source: PagedDataSource<T>,
    window: RowWindow<RowLayout<S>>,
    key_fn: Option<KeyFn<T>>,
}

impl<T: 'static, S: Scalar> WindowedListEngine<T, S> {
    /// Creates an engine over `source`.
    #[must_use]
    pub fn new(source: PagedDataSource<T>, config: EngineConfig<S>) -> Self {
        let rows = RowLayout::new(&config.row_height, source.row_count());
        Self {
            source,
            window: RowWindow::new(rows, config.viewport_extent, config.overscan),
            key_fn: None,
        }
    }

    /// Sets the key extractor used for [`row_key`](Self::row_key).
    #[must_use]
    pub fn with_key_extractor(mut self, key_fn: impl Fn(&T, usize) -> String + 'static) -> Self {
        self.key_fn = Some(Rc::new(key_fn));
        self
    }

    /// The data source.
    #[must_use]
    pub fn source(&self) -> &PagedDataSource<T> {
        &self.source
    }

    /// Brings the layout's row count in line with the source.
    fn sync_rows(&mut self) {
        let rows = self.source.row_count();
        if self.window.rows().row_count() != rows {
            trace!(
                message = "grid.layout",
                from = self.window.rows().row_count(),
                to = rows
            );
            self.window.rows_mut().set_row_count(rows);
        }
    }

    /// Rows to lay out, including placeholders.
    pub fn row_count(&mut self) -> usize {
        self.sync_rows();
        self.window.rows().row_count()
    }

    /// Whether row `index` can be rendered.
    #[must_use]
    pub fn is_item_loaded(&self, index: usize) -> bool {
        self.source.is_loaded(index)
    }

    /// Pixel offset of the top of row `index`.
    pub fn compute_row_offset(&mut self, index: usize) -> S {
        self.sync_rows();
        self.window.row_offset(index)
    }

    /// Height of row `index`.
    pub fn row_height(&mut self, index: usize) -> S {
        self.sync_rows();
        self.window.row_height(index)
    }

    /// Height of all rows.
    pub fn content_extent(&mut self) -> S {
        self.sync_rows();
        self.window.content_extent()
    }

    /// Replaces the sizing policy. Cached offsets are discarded unless the policy is unchanged.
    pub fn set_row_height(&mut self, height: RowHeight<S>) {
        if self.window.rows().policy().same_policy(&height) {
            return;
        }
        let rows = self.source.row_count();
        self.window.replace_rows(RowLayout::new(&height, rows));
    }

    /// Sets overscan above and below the viewport.
    pub fn set_overscan(&mut self, before: S, after: S) {
        self.window.set_overscan(before, after);
    }

    /// Rows intersecting the viewport `[scroll_offset, scroll_offset + viewport_extent)`,
    /// plus overscan.
    pub fn visible_rows(&mut self, scroll_offset: S, viewport_extent: S) -> VisibleRows<S> {
        self.sync_rows();
        self.window.set_viewport_extent(viewport_extent);
        self.window.set_scroll_offset(scroll_offset);
        self.window.visible_rows()
    }

    /// The visible rows as an inclusive window, or `None` when nothing is visible.
    pub fn visible_range(
        &mut self,
        scroll_offset: S,
        viewport_extent: S,
    ) -> Option<ViewportWindow> {
        self.visible_rows(scroll_offset, viewport_extent)
            .inclusive()
            .map(|(start_index, stop_index)| ViewportWindow {
                start_index,
                stop_index,
            })
    }

    /// The scroll offset last applied through this engine.
    #[must_use]
    pub fn scroll_offset(&self) -> S {
        self.window.scroll_offset()
    }

    /// Scrolls so `index` is shown with `align`; returns the new scroll offset.
    pub fn scroll_to_index(&mut self, index: usize, align: ScrollAlign) -> S {
        self.sync_rows();
        self.window.scroll_to_row(index, align);
        self.window.scroll_offset()
    }

    /// Reacts to a new visible range: if any row in `start..=stop` is missing,
    /// asks the source for it.
    ///
    /// Returns the load task when one was started. The task is independent of
    /// the engine; poll it on the UI executor. While a request is in flight,
    /// further calls return `None`; once it settles, the next call picks up
    /// whatever is still missing.
    ///
    /// # Panics
    ///
    /// Panics if `start > stop`.
    pub fn on_visible_range_change(&mut self, start: usize, stop: usize) -> Option<LoadTask> {
        assert!(
            start <= stop,
            "row range is inverted: start {start} > stop {stop}"
        );
        if self.source.is_range_loaded(start, stop) {
            return None;
        }
        self.source.request_range(start, stop)
    }

    /// [`on_visible_range_change`](Self::on_visible_range_change), handing the
    /// task straight to `spawner`. Returns whether a load was started.
    ///
    /// # Errors
    ///
    /// Fails if the executor has shut down.
    pub fn spawn_visible_range_change<Sp>(
        &mut self,
        start: usize,
        stop: usize,
        spawner: &Sp,
    ) -> Result<bool, SpawnError>
    where
        Sp: LocalSpawn + ?Sized,
    {
        match self.on_visible_range_change(start, stop) {
            Some(task) => spawner.spawn_local(task).map(|()| true),
            None => Ok(false),
        }
    }

    /// Row `index`, or a placeholder if it is not loaded.
    #[must_use]
    pub fn get_visible_row(&self, index: usize) -> VisibleRow<T> {
        match self.source.item(index) {
            Some(item) => VisibleRow::Item(item),
            None => VisibleRow::Placeholder,
        }
    }

    /// Row `index` resolved through `columns`.
    #[must_use]
    pub fn render_row(&self, index: usize, columns: &[Column<T, S>]) -> RenderedRow {
        match self.source.item(index) {
            Some(item) => RenderedRow::Cells {
                index,
                key: self.key_for(&item, index),
                cells: columns.iter().map(|column| column.cell(&item)).collect(),
            },
            None => RenderedRow::Placeholder { index },
        }
    }

    /// Render identity of row `index`.
    #[must_use]
    pub fn row_key(&self, index: usize) -> RowKey {
        match self.source.item(index) {
            Some(item) => self.key_for(&item, index),
            None => RowKey::Index(index),
        }
    }

    fn key_for(&self, item: &T, index: usize) -> RowKey {
        match &self.key_fn {
            Some(key_fn) => RowKey::Item(key_fn(item, index)),
            None => RowKey::Index(index),
        }
    }

    /// Applies a search term to the source and keeps the scroll position inside the new content.
    pub fn set_search_term(&mut self, term: &str) {
        self.source.set_search_term(term);
        self.sync_rows();
        self.window.clamp_scroll_to_content();
    }

    /// Leaves filtered mode; the remote rows come back as they were.
    pub fn clear_filter(&mut self) {
        self.source.clear_filter();
        self.sync_rows();
        self.window.clamp_scroll_to_content();
    }

    /// Resets the source and scrolls back to the top.
    pub fn reset(&mut self) {
        self.source.reset();
        self.sync_rows();
        self.window.set_scroll_offset(S::zero());
    }

    /// Server total or filtered length.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.source.total_items()
    }

    /// Whether more rows can be fetched.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.source.has_next_page()
    }

    /// Whether a request is in flight.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.source.loading()
    }

    /// The last fetch failure.
    #[must_use]
    pub fn error(&self) -> Option<LoadError> {
        self.source.error()
    }
}

impl<T, S: Scalar> fmt::Debug for WindowedListEngine<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowedListEngine")
            .field("source", &self.source)
            .field("window", &self.window)
            .field("key_fn", &self.key_fn.is_some())
            .finish()
    }
}
