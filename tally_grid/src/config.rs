// Copyright 2025 the Tally Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction-time settings for the data source and the engine.

use core::fmt;
use core::num::NonZeroUsize;
use std::rc::Rc;

use tally_window::{RowHeight, Scalar};

use crate::PageFetcher;

/// Search predicate: does `item` match `term`?
pub type FilterFn<T> = Rc<dyn Fn(&T, &str) -> bool>;

/// Stable render identity for a row.
pub type KeyFn<T> = Rc<dyn Fn(&T, usize) -> String>;

/// Settings for a [`PagedDataSource`](crate::PagedDataSource).
///
/// ```rust
/// use core::num::NonZeroUsize;
/// use tally_grid::{BoxError, FetchedPage, SourceConfig};
///
/// let config = SourceConfig::<usize>::new()
///     .with_page_size(NonZeroUsize::new(50).unwrap())
///     .with_fetcher(|page: usize, size: usize| async move {
///         let first = (page - 1) * size;
///         Ok::<_, BoxError>(FetchedPage::new((first..first + size).collect(), 1_000))
///     })
///     .with_filter(|row: &usize, term: &str| row.to_string().contains(term));
/// assert_eq!(config.page_size().get(), 50);
/// ```
pub struct SourceConfig<T> {
    pub(crate) page_size: NonZeroUsize,
    pub(crate) initial_data: Vec<T>,
    pub(crate) total_item_count: Option<usize>,
    pub(crate) fetcher: Option<Rc<dyn PageFetcher<T>>>,
    pub(crate) filter: Option<FilterFn<T>>,
}

impl<T> SourceConfig<T> {
    /// Page size used when none is configured.
    pub const DEFAULT_PAGE_SIZE: NonZeroUsize = NonZeroUsize::new(20).unwrap();

    /// A purely local source with no rows, no fetcher, and no search.
    #[must_use]
    pub fn new() -> Self {
        Self {
            page_size: Self::DEFAULT_PAGE_SIZE,
            initial_data: Vec::new(),
            total_item_count: None,
            fetcher: None,
            filter: None,
        }
    }

    /// Rows per page.
    #[must_use]
    pub fn with_page_size(mut self, page_size: NonZeroUsize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Rows available before any fetch; they occupy the first pages.
    #[must_use]
    pub fn with_initial_data(mut self, rows: Vec<T>) -> Self {
        self.initial_data = rows;
        self
    }

    /// Server-side total known up front, so placeholders cover rows not yet fetched.
    #[must_use]
    pub fn with_total_item_count(mut self, total: usize) -> Self {
        self.total_item_count = Some(total);
        self
    }

    /// Enables remote paging.
    #[must_use]
    pub fn with_fetcher(mut self, fetcher: impl PageFetcher<T> + 'static) -> Self {
        self.fetcher = Some(Rc::new(fetcher));
        self
    }

    /// Enables search.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Fn(&T, &str) -> bool + 'static) -> Self {
        self.filter = Some(Rc::new(filter));
        self
    }

    /// Rows per page.
    #[must_use]
    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }
}

impl<T> Default for SourceConfig<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SourceConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("page_size", &self.page_size)
            .field("initial_data", &self.initial_data.len())
            .field("total_item_count", &self.total_item_count)
            .field("fetcher", &self.fetcher.is_some())
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

/// Geometry settings for a [`WindowedListEngine`](crate::WindowedListEngine).
#[derive(Debug, Clone)]
pub struct EngineConfig<S: Scalar> {
    pub(crate) row_height: RowHeight<S>,
    pub(crate) viewport_extent: S,
    pub(crate) overscan: S,
}

impl<S: Scalar> EngineConfig<S> {
    /// Default row height, an empty viewport, and no overscan.
    #[must_use]
    pub fn new() -> Self {
        Self {
            row_height: RowHeight::default(),
            viewport_extent: S::zero(),
            overscan: S::zero(),
        }
    }

    /// Row sizing policy.
    #[must_use]
    pub fn with_row_height(mut self, row_height: RowHeight<S>) -> Self {
        self.row_height = row_height;
        self
    }

    /// Initial viewport height.
    #[must_use]
    pub fn with_viewport_extent(mut self, extent: S) -> Self {
        self.viewport_extent = extent;
        self
    }

    /// Distance realized above and below the viewport.
    #[must_use]
    pub fn with_overscan(mut self, overscan: S) -> Self {
        self.overscan = overscan;
        self
    }
}

impl<S: Scalar> Default for EngineConfig<S> {
    fn default() -> Self {
        Self::new()
    }
}
