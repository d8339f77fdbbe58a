// Copyright 2025 the Tally Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scripted order backend shared by the integration tests.

#![allow(
    dead_code,
    unreachable_pub,
    reason = "each test binary uses a different subset of the backend"
)]

use core::future::Future;
use core::num::NonZeroUsize;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use futures::channel::oneshot;
use tally_grid::{BoxError, FetchedPage, PageFetcher, PagedDataSource, SourceConfig};

/// One row of the order list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: usize,
    pub customer: String,
}

/// The order the backend serves at position `id`. Every eighth customer matches "foo".
pub fn order(id: usize) -> Order {
    let customer = if id % 8 == 0 {
        format!("foo freight {id}")
    } else {
        format!("acme {id}")
    };
    Order { id, customer }
}

pub const PAGE_SIZE: NonZeroUsize = NonZeroUsize::new(20).unwrap();

#[derive(Debug, Default)]
struct BackendState {
    total: usize,
    calls: Vec<usize>,
    outstanding: usize,
    max_outstanding: usize,
    failing: Option<usize>,
    deferred: bool,
    parked: VecDeque<(usize, oneshot::Sender<()>)>,
}

/// Serves `total` orders page by page and records how it was called.
///
/// In deferred mode every fetch parks until the test calls
/// [`release_next`](Self::release_next).
#[derive(Debug, Clone)]
pub struct OrderBackend {
    state: Rc<RefCell<BackendState>>,
}

impl OrderBackend {
    pub fn new(total: usize) -> Self {
        Self {
            state: Rc::new(RefCell::new(BackendState {
                total,
                ..BackendState::default()
            })),
        }
    }

    /// Fetches wait for [`release_next`](Self::release_next).
    pub fn deferred(self) -> Self {
        self.state.borrow_mut().deferred = true;
        self
    }

    /// Makes `page` fail, or nothing fail for `None`.
    pub fn fail_on(&self, page: Option<usize>) {
        self.state.borrow_mut().failing = page;
    }

    /// Pages requested so far, in call order.
    pub fn calls(&self) -> Vec<usize> {
        self.state.borrow().calls.clone()
    }

    /// Most fetches ever outstanding at once.
    pub fn max_outstanding(&self) -> usize {
        self.state.borrow().max_outstanding
    }

    /// Pages waiting for release.
    pub fn parked(&self) -> Vec<usize> {
        self.state.borrow().parked.iter().map(|(page, _)| *page).collect()
    }

    /// Lets the oldest parked fetch resolve. Returns its page.
    pub fn release_next(&self) -> Option<usize> {
        let (page, gate) = self.state.borrow_mut().parked.pop_front()?;
        let _ = gate.send(());
        Some(page)
    }

    pub fn fetcher(&self) -> impl PageFetcher<Order> + use<> {
        let backend = self.clone();
        move |page: usize, page_size: usize| backend.fetch(page, page_size)
    }

    fn fetch(
        &self,
        page: usize,
        page_size: usize,
    ) -> impl Future<Output = Result<FetchedPage<Order>, BoxError>> + use<> {
        let gate = {
            let mut state = self.state.borrow_mut();
            state.calls.push(page);
            state.outstanding += 1;
            state.max_outstanding = state.max_outstanding.max(state.outstanding);
            if state.deferred {
                let (tx, rx) = oneshot::channel();
                state.parked.push_back((page, tx));
                Some(rx)
            } else {
                None
            }
        };
        let backend = self.clone();
        async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            let mut state = backend.state.borrow_mut();
            state.outstanding -= 1;
            if state.failing == Some(page) {
                return Err(format!("page {page} unavailable").into());
            }
            let first = (page - 1) * page_size;
            let data = (first..(first + page_size).min(state.total))
                .map(order)
                .collect();
            Ok(FetchedPage::new(data, state.total))
        }
    }
}

/// Remote order source with search on the customer name.
pub fn order_source(backend: &OrderBackend) -> PagedDataSource<Order> {
    PagedDataSource::new(order_config(backend))
}

pub fn order_config(backend: &OrderBackend) -> SourceConfig<Order> {
    SourceConfig::new()
        .with_page_size(PAGE_SIZE)
        .with_fetcher(backend.fetcher())
        .with_filter(|order: &Order, term: &str| order.customer.contains(term))
}
