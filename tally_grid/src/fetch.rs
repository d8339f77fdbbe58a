// Copyright 2025 the Tally Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The page fetching seam.

use core::future::Future;

use futures::future::LocalBoxFuture;

use crate::BoxError;

/// One page of rows plus the server-side row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage<T> {
    /// Rows of the page, in order. At most `page_size` rows are kept.
    pub data: Vec<T>,
    /// Total number of rows the server reports for the whole result set.
    pub total: usize,
}

impl<T> FetchedPage<T> {
    /// Creates a page.
    #[must_use]
    pub fn new(data: Vec<T>, total: usize) -> Self {
        Self { data, total }
    }
}

/// Future returned by [`PageFetcher::fetch_page`].
pub type FetchFuture<T> = LocalBoxFuture<'static, Result<FetchedPage<T>, BoxError>>;

/// Loads one page of rows from wherever they live.
///
/// The grid calls this at most once per missing page and never twice at the
/// same time for one data source. Any closure
/// `Fn(page, page_size) -> impl Future<Output = Result<FetchedPage<T>, BoxError>>`
/// implements this trait.
pub trait PageFetcher<T> {
    /// Fetches the 1-based `page` of `page_size` rows.
    fn fetch_page(&self, page: usize, page_size: usize) -> FetchFuture<T>;
}

impl<T, F, Fut> PageFetcher<T> for F
where
    F: Fn(usize, usize) -> Fut,
    Fut: Future<Output = Result<FetchedPage<T>, BoxError>> + 'static,
{
    fn fetch_page(&self, page: usize, page_size: usize) -> FetchFuture<T> {
        Box::pin(self(page, page_size))
    }
}
