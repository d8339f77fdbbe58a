// Copyright 2025 the Tally Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Switching between remote paging and local filtering.

mod support;

use std::rc::Rc;

use futures::executor::{LocalPool, block_on};
use futures::task::LocalSpawnExt as _;
use tally_grid::{
    EngineConfig, ModeKind, PagedDataSource, ScrollAlign, SlotState, WindowedListEngine,
};

use support::{Order, OrderBackend, order_source};

/// What a render core can observe of a source.
#[derive(Debug, PartialEq)]
struct Snapshot {
    mode: ModeKind,
    total: usize,
    rows: usize,
    has_next: bool,
    pages: Vec<usize>,
    items: Vec<Option<Rc<Order>>>,
}

fn snapshot(source: &PagedDataSource<Order>) -> Snapshot {
    Snapshot {
        mode: source.mode_kind(),
        total: source.total_items(),
        rows: source.row_count(),
        has_next: source.has_next_page(),
        pages: source.loaded_pages(),
        items: (0..source.row_count()).map(|index| source.item(index)).collect(),
    }
}

fn two_pages_loaded(backend: &OrderBackend) -> PagedDataSource<Order> {
    let source = order_source(backend);
    block_on(source.load_range(0, 39));
    assert_eq!(source.loaded_pages(), [1, 2]);
    source
}

#[test]
fn search_filters_resident_rows_without_fetching() {
    let backend = OrderBackend::new(57);
    let source = two_pages_loaded(&backend);

    source.set_search_term("foo");
    assert_eq!(source.mode_kind(), ModeKind::Filtered);
    assert_eq!(source.search_term().as_deref(), Some("foo"));
    assert_eq!(source.total_items(), 5);
    assert_eq!(source.row_count(), 5);
    assert!(!source.has_next_page());
    assert!(source.is_loaded(4));
    assert!(!source.is_loaded(5));

    let ids: Vec<usize> = (0..5).map(|index| source.item(index).unwrap().id).collect();
    assert_eq!(ids, [0, 8, 16, 24, 32]);

    assert!(source.request_range(0, 4).is_none());
    assert!(source.request_range(40, 56).is_none());
    assert_eq!(backend.calls(), [1, 2]);
}

#[test]
fn clearing_the_filter_restores_the_exact_remote_view() {
    let backend = OrderBackend::new(57);
    let source = two_pages_loaded(&backend);
    let before = snapshot(&source);

    source.set_search_term("foo");
    let filtered = snapshot(&source);
    let generation = source.generation();

    source.set_search_term("foo");
    assert_eq!(snapshot(&source), filtered);
    assert_eq!(source.generation(), generation, "same term is a no-op");

    source.clear_filter();
    assert_eq!(snapshot(&source), before);
    source.clear_filter();
    assert_eq!(snapshot(&source), before);

    source.set_search_term("foo");
    source.set_search_term("");
    assert_eq!(snapshot(&source), before);
}

#[test]
fn changing_the_term_recomputes_from_the_backing_rows() {
    let backend = OrderBackend::new(57);
    let source = two_pages_loaded(&backend);

    source.set_search_term("foo");
    assert_eq!(source.total_items(), 5);

    source.set_search_term("acme 3");
    let ids: Vec<usize> = (0..source.total_items())
        .map(|index| source.item(index).unwrap().id)
        .collect();
    assert_eq!(ids, [3, 30, 31, 33, 34, 35, 36, 37, 38, 39]);

    source.set_search_term("nobody");
    assert_eq!(source.total_items(), 0);
    assert!(!source.is_loaded(0));
}

#[test]
fn entering_a_filter_drops_the_fetch_in_flight() {
    let backend = OrderBackend::new(57).deferred();
    let source = order_source(&backend);
    let mut pool = LocalPool::new();

    let task = source.request_range(0, 19).unwrap();
    pool.spawner().spawn_local(task).unwrap();
    pool.run_until_stalled();
    backend.release_next();
    pool.run_until_stalled();

    let task = source.request_range(20, 39).unwrap();
    pool.spawner().spawn_local(task).unwrap();
    pool.run_until_stalled();
    assert_eq!(source.slot_state(25), SlotState::Pending);

    source.set_search_term("foo");
    assert_eq!(source.slot_state(25), SlotState::Absent);
    assert_eq!(source.total_items(), 3);

    backend.release_next();
    pool.run_until_stalled();
    assert!(!source.loading());
    assert_eq!(source.total_items(), 3, "the stale page is not merged");

    source.clear_filter();
    assert_eq!(source.loaded_pages(), [1]);
    assert!(source.has_next_page());
    assert_eq!(source.total_items(), 57);

    let task = source.request_range(20, 39).unwrap();
    pool.spawner().spawn_local(task).unwrap();
    pool.run_until_stalled();
    backend.release_next();
    pool.run_until_stalled();
    assert_eq!(source.loaded_pages(), [1, 2]);
}

#[test]
fn engine_keeps_the_scroll_position_inside_filtered_content() {
    let backend = OrderBackend::new(57);
    let mut engine = WindowedListEngine::new(
        two_pages_loaded(&backend),
        EngineConfig::<f64>::new().with_viewport_extent(200.0),
    );
    assert_eq!(engine.scroll_to_index(39, ScrollAlign::Start), 39.0 * 40.0);

    engine.set_search_term("foo");
    assert_eq!(engine.row_count(), 5);
    assert_eq!(engine.scroll_offset(), 0.0);
    assert!(engine.on_visible_range_change(0, 4).is_none());
    assert_eq!(engine.get_visible_row(1).item().map(|order| order.id), Some(8));

    engine.clear_filter();
    assert_eq!(engine.row_count(), 57);
    assert_eq!(engine.get_visible_row(1).item().map(|order| order.id), Some(1));

    engine.reset();
    assert_eq!(engine.source().mode_kind(), ModeKind::Remote);
    assert_eq!(engine.source().loaded_pages(), Vec::<usize>::new());
    assert_eq!(engine.row_count(), 1);
}
