// Copyright 2025 the Tally Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors surfaced through the data source's `error` observable.

use std::sync::Arc;

use thiserror::Error;

/// Error type returned by page fetchers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A failure recorded by [`PagedDataSource`](crate::PagedDataSource).
///
/// Failures never escape as panics or `Err` returns; they are stored on the
/// source and cleared by the next range request or a reset.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// The fetcher rejected a page. That page and any later page of the same
    /// request stayed unloaded and are retried by the next overlapping request.
    #[error("failed to fetch page {page}: {source}")]
    Fetch {
        /// The 1-based page that failed.
        page: usize,
        /// The fetcher's error.
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
}

impl LoadError {
    pub(crate) fn fetch(page: usize, source: BoxError) -> Self {
        Self::Fetch {
            page,
            source: Arc::from(source),
        }
    }

    /// The page the failure belongs to.
    #[must_use]
    pub fn page(&self) -> usize {
        match self {
            Self::Fetch { page, .. } => *page,
        }
    }
}
