// Copyright 2025 the Tally Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The paged data source: fetch coordination, positional merging, and mode switching.

use core::cell::RefCell;
use core::fmt;
use core::future::Future;
use core::num::NonZeroUsize;
use std::rc::Rc;

use futures::FutureExt as _;
use futures::future::LocalBoxFuture;
use tracing::{debug, trace, warn};

use crate::mode::{FilteredView, Mode, ModeKind};
use crate::pages::{LoadedPages, PageList, page_of, page_rows, pages_for_len, pages_spanning};
use crate::slots::{SlotArray, SlotState};
use crate::{FetchedPage, FilterFn, LoadError, PageFetcher, SourceConfig};

/// A pending range load. Poll it to completion on the UI thread's executor.
pub type LoadTask = LocalBoxFuture<'static, ()>;

/// Rows of a grid, loaded page by page or filtered locally.
///
/// A `PagedDataSource` is a cheap handle: clones share the same state. All
/// mutation happens on one thread, through [`request_range`](Self::request_range),
/// [`set_search_term`](Self::set_search_term), [`clear_filter`](Self::clear_filter),
/// and [`reset`](Self::reset).
///
/// At most one range request is in flight at a time. A request fetches its
/// missing pages in ascending order and commits each page before fetching the
/// next, so a failure part-way through keeps the pages already merged.
/// [`reset`](Self::reset) and mode switches advance a generation counter; a
/// fetch that resolves under an older generation is dropped.
///
/// The filter predicate and fetcher are called while the source is borrowed
/// and must not call back into it. That includes dropping a [`LoadTask`]: a
/// task dropped while the source is borrowed cannot release the in-flight
/// flag, and the source stays `loading` from then on.
pub struct PagedDataSource<T> {
    shared: Rc<RefCell<SourceState<T>>>,
}

impl<T> Clone for PagedDataSource<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

struct SourceState<T> {
    page_size: NonZeroUsize,
    fetcher: Option<Rc<dyn PageFetcher<T>>>,
    filter: Option<FilterFn<T>>,
    initial: Vec<Rc<T>>,
    initial_total: Option<usize>,

    slots: SlotArray<T>,
    loaded: LoadedPages,
    mode: Mode,
    /// Row count as last reported by the server (or configured up front).
    remote_total: usize,
    /// Whether `remote_total` is authoritative enough to clamp requests.
    total_known: bool,
    remote_has_next: bool,
    loading: bool,
    error: Option<LoadError>,
    generation: u64,
}

impl<T> SourceState<T> {
    fn new(config: SourceConfig<T>) -> Self {
        let SourceConfig {
            page_size,
            initial_data,
            total_item_count,
            fetcher,
            filter,
        } = config;
        let initial: Vec<Rc<T>> = initial_data.into_iter().map(Rc::new).collect();
        let mut state = Self {
            page_size,
            fetcher,
            filter,
            slots: SlotArray::from_rows(&initial),
            initial,
            initial_total: total_item_count,
            loaded: LoadedPages::default(),
            mode: Mode::Remote,
            remote_total: 0,
            total_known: false,
            remote_has_next: false,
            loading: false,
            error: None,
            generation: 0,
        };
        state.restore_initial();
        state
    }

    fn restore_initial(&mut self) {
        self.slots = SlotArray::from_rows(&self.initial);
        self.loaded = LoadedPages::covering(self.initial.len(), self.page_size);
        self.mode = Mode::Remote;
        self.remote_total = self.initial_total.unwrap_or(self.initial.len());
        self.total_known = self.initial_total.is_some() || self.fetcher.is_none();
        self.remote_has_next = self.fetcher.is_some();
        self.error = None;
    }

    /// Makes any in-flight request stale and forgets its placeholders.
    fn advance_generation(&mut self) {
        self.generation += 1;
        self.slots.clear_pending();
    }

    fn total_items(&self) -> usize {
        match &self.mode {
            Mode::Remote => self.remote_total,
            Mode::Filtered(view) => view.matches.len(),
        }
    }

    fn has_next_page(&self) -> bool {
        match self.mode {
            Mode::Remote => self.remote_has_next,
            Mode::Filtered(_) => false,
        }
    }

    fn is_loaded(&self, index: usize) -> bool {
        match &self.mode {
            Mode::Remote => {
                index < self.remote_total && self.loaded.contains(page_of(index, self.page_size))
            }
            Mode::Filtered(view) => index < view.matches.len(),
        }
    }

    fn item(&self, index: usize) -> Option<Rc<T>> {
        let position = match &self.mode {
            Mode::Remote if self.is_loaded(index) => index,
            Mode::Remote => return None,
            Mode::Filtered(view) => *view.matches.get(index)?,
        };
        self.slots.get(position).cloned()
    }

    fn row_count(&self) -> usize {
        match &self.mode {
            Mode::Remote => self
                .remote_total
                .max(self.slots.present_end() + usize::from(self.remote_has_next)),
            Mode::Filtered(view) => view.matches.len(),
        }
    }

    fn merge_page(&mut self, page: usize, fetched: FetchedPage<T>) {
        let FetchedPage { mut data, total } = fetched;
        let size = self.page_size.get();
        let rows = page_rows(page, self.page_size);
        if data.len() > size {
            warn!(
                message = "grid.oversized_page",
                page,
                received = data.len(),
                page_size = size
            );
            data.truncate(size);
        }
        let received = data.len();
        let expected = rows.end.min(total).saturating_sub(rows.start);
        if received < expected {
            warn!(message = "grid.short_page", page, received, expected);
        }

        for (position, item) in rows.clone().zip(data) {
            self.slots.set_present(position, Rc::new(item));
        }
        self.slots.clear_pending();

        self.remote_total = total;
        self.total_known = true;
        self.remote_has_next = rows.end < total;
        self.loaded.insert(page);
        debug!(
            message = "grid.merge",
            page,
            received,
            total,
            has_next_page = self.remote_has_next,
            loaded_pages = self.loaded.len()
        );
    }

    fn leave_filter(&mut self) {
        if let Mode::Filtered(view) = &self.mode {
            debug!(message = "grid.filter", outcome = "cleared", term = %view.term);
            self.mode = Mode::Remote;
            self.advance_generation();
        }
    }
}

impl<T: 'static> PagedDataSource<T> {
    /// Creates a source from `config`.
    #[must_use]
    pub fn new(config: SourceConfig<T>) -> Self {
        Self {
            shared: Rc::new(RefCell::new(SourceState::new(config))),
        }
    }

    /// A source over rows already in memory, with no paging and no search.
    #[must_use]
    pub fn local(rows: Vec<T>) -> Self {
        Self::new(SourceConfig::new().with_initial_data(rows))
    }

    /// Starts loading the pages overlapping rows `start..=stop`.
    ///
    /// Returns `None` when nothing needs to happen: the source is filtered,
    /// has no fetcher, already has a request in flight, the range lies past
    /// the known total, or every page in the range is resident. Otherwise the
    /// returned task fetches the missing pages when polled, in ascending order.
    /// Once a merged page reports the total, pages past it are not fetched,
    /// even if the request reached further.
    ///
    /// The in-flight flag is taken before this returns, so callers may fire
    /// many requests in a burst and only the first produces a task. Dropping
    /// the task before it finishes releases the flag.
    ///
    /// # Panics
    ///
    /// Panics if `start > stop`.
    pub fn request_range(&self, start: usize, stop: usize) -> Option<LoadTask> {
        self.claim(start, stop)
            .map(|request| request.run().boxed_local())
    }

    /// Like [`request_range`](Self::request_range), but always returns a future.
    ///
    /// The request is claimed immediately; the future resolves when it settles
    /// or at once when there was nothing to do.
    pub fn load_range(&self, start: usize, stop: usize) -> impl Future<Output = ()> + use<T> {
        let task = self.request_range(start, stop);
        async move {
            if let Some(task) = task {
                task.await;
            }
        }
    }

    fn claim(&self, start: usize, stop: usize) -> Option<InFlight<T>> {
        assert!(
            start <= stop,
            "row range is inverted: start {start} > stop {stop}"
        );
        let mut state = self.shared.borrow_mut();
        if state.mode.kind() == ModeKind::Filtered {
            trace!(message = "grid.request", outcome = "filtered", start, stop);
            return None;
        }
        let Some(fetcher) = state.fetcher.clone() else {
            trace!(message = "grid.request", outcome = "local", start, stop);
            return None;
        };
        if state.loading {
            trace!(message = "grid.request", outcome = "busy", start, stop);
            return None;
        }
        let stop = if state.total_known {
            if start >= state.remote_total {
                trace!(
                    message = "grid.request",
                    outcome = "past_end",
                    start,
                    total = state.remote_total
                );
                return None;
            }
            stop.min(state.remote_total - 1)
        } else {
            stop
        };

        let page_size = state.page_size;
        let last = page_of(stop, page_size);
        let page = state
            .loaded
            .first_missing(page_of(start, page_size)..=last)?;

        state.slots.mark_pending(page_rows(page, page_size));
        state.loading = true;
        state.error = None;
        debug!(
            message = "grid.request",
            outcome = "started",
            start,
            stop,
            first_page = page,
            last_page = last,
            generation = state.generation
        );
        Some(InFlight {
            shared: Rc::clone(&self.shared),
            fetcher,
            page_size,
            generation: state.generation,
            pending: Some(page),
            last,
            merged: PageList::new(),
        })
    }

    /// Switches to filtered mode for `term`, or back to remote mode for `""`.
    ///
    /// Ignored when no filter predicate is configured. Repeating the current
    /// term is a no-op. Entering filtered mode drops any fetch in flight.
    pub fn set_search_term(&self, term: &str) {
        let mut state = self.shared.borrow_mut();
        let Some(filter) = state.filter.clone() else {
            debug!(message = "grid.filter", outcome = "no_predicate");
            return;
        };
        if term.is_empty() {
            state.leave_filter();
            return;
        }
        if state.mode.term() == Some(term) {
            return;
        }
        if state.mode.kind() == ModeKind::Remote {
            state.advance_generation();
        }
        let matches: Vec<usize> = state
            .slots
            .present()
            .filter_map(|(position, item)| filter(item, term).then_some(position))
            .collect();
        debug!(
            message = "grid.filter",
            outcome = "applied",
            term,
            matches = matches.len(),
            resident = state.slots.present_end()
        );
        state.mode = Mode::Filtered(FilteredView {
            term: term.to_owned(),
            matches,
        });
    }

    /// Returns to remote mode, restoring the unfiltered rows exactly as they were.
    ///
    /// `has_next_page` comes back as it stood before the filter: `true` only
    /// when a fetcher exists and the last merged page left more to load.
    pub fn clear_filter(&self) {
        self.shared.borrow_mut().leave_filter();
    }

    /// Restores the state the source was created with.
    ///
    /// A request in flight keeps the in-flight flag until its current fetch
    /// resolves; its result is then discarded.
    pub fn reset(&self) {
        let mut state = self.shared.borrow_mut();
        state.generation += 1;
        state.restore_initial();
        debug!(
            message = "grid.reset",
            generation = state.generation,
            in_flight = state.loading
        );
    }
}

impl<T> PagedDataSource<T> {
    /// Whether row `index` of the current view can be rendered.
    ///
    /// Remote mode: the row is below the total and its page is resident.
    /// Filtered mode: the row is below the filtered length.
    #[must_use]
    pub fn is_loaded(&self, index: usize) -> bool {
        self.shared.borrow().is_loaded(index)
    }

    /// Whether every row in `start..=stop` is loaded.
    #[must_use]
    pub fn is_range_loaded(&self, start: usize, stop: usize) -> bool {
        let state = self.shared.borrow();
        if start > stop {
            return true;
        }
        if stop >= state.total_items() {
            return false;
        }
        match state.mode {
            Mode::Remote => pages_spanning(start, stop, state.page_size)
                .all(|page| state.loaded.contains(page)),
            Mode::Filtered(_) => true,
        }
    }

    /// Row `index` of the current view, if loaded.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<Rc<T>> {
        self.shared.borrow().item(index)
    }

    /// Rows in the current view: the server total, or the filtered length.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.shared.borrow().total_items()
    }

    /// Whether more rows can be fetched. Always `false` when filtered or local.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.shared.borrow().has_next_page()
    }

    /// Whether a range request is in flight.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.shared.borrow().loading
    }

    /// The last fetch failure, cleared by the next request or a reset.
    #[must_use]
    pub fn error(&self) -> Option<LoadError> {
        self.shared.borrow().error.clone()
    }

    /// Rows a render core should lay out.
    ///
    /// While the total is unknown and more pages exist, this includes one
    /// trailing placeholder row so that scrolling to the end requests the
    /// next page.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.shared.borrow().row_count()
    }

    /// Current mode.
    #[must_use]
    pub fn mode_kind(&self) -> ModeKind {
        self.shared.borrow().mode.kind()
    }

    /// The active search term, if filtered.
    #[must_use]
    pub fn search_term(&self) -> Option<String> {
        self.shared.borrow().mode.term().map(str::to_owned)
    }

    /// Resident page numbers, ascending.
    #[must_use]
    pub fn loaded_pages(&self) -> Vec<usize> {
        self.shared.borrow().loaded.sorted()
    }

    /// Rows per page.
    #[must_use]
    pub fn page_size(&self) -> NonZeroUsize {
        self.shared.borrow().page_size
    }

    /// What the backing array holds at `position`, independent of the mode.
    #[must_use]
    pub fn slot_state(&self, position: usize) -> SlotState {
        self.shared.borrow().slots.state(position)
    }

    /// One past the last backing position holding a row.
    #[must_use]
    pub fn resident_len(&self) -> usize {
        self.shared.borrow().slots.present_end()
    }

    /// Counter advanced by every reset and mode switch.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.shared.borrow().generation
    }

    /// Whether a fetcher is configured.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.shared.borrow().fetcher.is_some()
    }
}

impl<T> fmt::Debug for PagedDataSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.borrow();
        f.debug_struct("PagedDataSource")
            .field("mode", &state.mode.kind())
            .field("page_size", &state.page_size)
            .field("total_items", &state.total_items())
            .field("has_next_page", &state.has_next_page())
            .field("loaded_pages", &state.loaded.sorted())
            .field("loading", &state.loading)
            .field("error", &state.error)
            .field("generation", &state.generation)
            .finish_non_exhaustive()
    }
}

/// A claimed range request. Owns the in-flight flag until dropped.
///
/// Pages are taken one at a time: only the page being fetched is pending, and
/// the next missing page is chosen after each merge. A merged page that
/// reveals the end of the result set pulls `last` in, so a request made before
/// the total was known stops at the last real page.
struct InFlight<T> {
    shared: Rc<RefCell<SourceState<T>>>,
    fetcher: Rc<dyn PageFetcher<T>>,
    page_size: NonZeroUsize,
    generation: u64,
    /// Page being fetched; its rows are pending.
    pending: Option<usize>,
    /// Last page of the request.
    last: usize,
    merged: PageList,
}

impl<T> InFlight<T> {
    fn is_stale(&self) -> bool {
        self.shared.borrow().generation != self.generation
    }

    async fn run(mut self) {
        while let Some(page) = self.pending {
            if self.is_stale() {
                trace!(message = "grid.stale", page, phase = "before_fetch");
                return;
            }
            trace!(message = "grid.fetch", page, page_size = self.page_size.get());
            let outcome = self.fetcher.fetch_page(page, self.page_size.get()).await;

            let mut state = self.shared.borrow_mut();
            if state.generation != self.generation {
                trace!(
                    message = "grid.stale",
                    page,
                    started = self.generation,
                    current = state.generation
                );
                return;
            }
            match outcome {
                Ok(fetched) => state.merge_page(page, fetched),
                Err(source) => {
                    warn!(message = "grid.fetch_failed", page, error = %source);
                    state.error = Some(LoadError::fetch(page, source));
                    return;
                }
            }
            self.merged.push(page);

            self.last = self
                .last
                .min(pages_for_len(state.remote_total, self.page_size));
            self.pending = state.loaded.first_missing(page + 1..=self.last);
            if let Some(next) = self.pending {
                state.slots.mark_pending(page_rows(next, self.page_size));
            } else {
                debug!(
                    message = "grid.settled",
                    pages = ?self.merged.as_slice(),
                    total = state.remote_total
                );
            }
        }
    }
}

impl<T> Drop for InFlight<T> {
    fn drop(&mut self) {
        // Only reachable when a fetcher or filter drops the task from inside a callback.
        let Ok(mut state) = self.shared.try_borrow_mut() else {
            warn!(
                message = "grid.guard_borrowed",
                pending = ?self.pending,
                generation = self.generation
            );
            return;
        };
        state.loading = false;
        if state.generation == self.generation && self.pending.is_some() {
            state.slots.clear_pending();
        }
    }
}
