// Copyright 2025 the Tally Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drives a grid body over a mock order backend and prints what a render core would draw.
//!
//! Run with `RUST_LOG=tally_grid=trace cargo run -p tally_demos` to see every
//! request, fetch, and merge.

use core::num::NonZeroUsize;

use futures::executor::LocalPool;
use futures::future;
use tally_grid::{
    BoxError, Column, EngineConfig, FetchedPage, PagedDataSource, RenderedRow, RowHeight,
    ScrollAlign, SourceConfig, WindowedListEngine, distribute_column_widths,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const TOTAL_ORDERS: usize = 57;
const VIEWPORT: f64 = 240.0;
const PAGE_SIZE: NonZeroUsize = NonZeroUsize::new(20).unwrap();

#[derive(Debug, Clone)]
struct Order {
    id: usize,
    customer: String,
    pallets: u32,
    in_transit: bool,
}

fn mock_order(id: usize) -> Order {
    const CUSTOMERS: [&str; 4] = ["Northwind", "Foo Freight", "Acme Cargo", "Blue Harbor"];
    Order {
        id,
        customer: CUSTOMERS[id % CUSTOMERS.len()].to_owned(),
        pallets: u32::try_from(id % 7).unwrap_or(0) + 1,
        in_transit: id % 3 == 0,
    }
}

/// Serves pages of mock orders. A real backend would be an HTTP call.
fn fetch_orders(
    page: usize,
    page_size: usize,
) -> future::Ready<Result<FetchedPage<Order>, BoxError>> {
    let first = (page - 1) * page_size;
    let data = (first..(first + page_size).min(TOTAL_ORDERS))
        .map(mock_order)
        .collect();
    future::ready(Ok(FetchedPage::new(data, TOTAL_ORDERS)))
}

fn columns() -> Vec<Column<Order>> {
    vec![
        Column::new("Order", |order: &Order| format!("#{:04}", order.id)).with_width(80.0),
        Column::new("Customer", |order: &Order| order.customer.clone()),
        Column::new("Pallets", |order: &Order| order.pallets.to_string()).with_width(70.0),
        Column::new("Status", |order: &Order| {
            let status = if order.in_transit { "in transit" } else { "delivered" };
            status.to_owned()
        }),
    ]
}

/// One frame: compute the visible rows, request what is missing, print.
fn frame(engine: &mut WindowedListEngine<Order>, pool: &mut LocalPool, scroll_offset: f64) {
    let Some(window) = engine.visible_range(scroll_offset, VIEWPORT) else {
        info!(message = "demo.frame", scroll_offset, rows = 0);
        return;
    };
    match engine.spawn_visible_range_change(window.start_index, window.stop_index, &pool.spawner())
    {
        Ok(started) => info!(
            message = "demo.frame",
            scroll_offset,
            start = window.start_index,
            stop = window.stop_index,
            started
        ),
        Err(err) => error!(message = "demo.spawn_failed", error = %err),
    }
    // Placeholders first, as the render core would draw them before the page arrives.
    print_rows(engine, window.start_index, window.stop_index);
    pool.run_until_stalled();
    print_rows(engine, window.start_index, window.stop_index);
}

fn print_rows(engine: &WindowedListEngine<Order>, start: usize, stop: usize) {
    let columns = columns();
    for index in start..=stop {
        match engine.render_row(index, &columns) {
            RenderedRow::Cells { cells, key, .. } => {
                println!("  {key:?}: {}", cells.join(" | "));
            }
            RenderedRow::Placeholder { index } => println!("  row {index}: ..."),
        }
    }
    println!(
        "  [{} of {} rows, more: {}, loading: {}]",
        stop + 1 - start,
        engine.total_items(),
        engine.has_next_page(),
        engine.loading()
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tally_grid=debug")),
        )
        .init();

    let source = PagedDataSource::new(
        SourceConfig::<Order>::new()
            .with_page_size(PAGE_SIZE)
            .with_fetcher(fetch_orders)
            .with_filter(|order: &Order, term: &str| {
                order.customer.to_lowercase().contains(&term.to_lowercase())
            }),
    );
    let mut engine = WindowedListEngine::new(
        source,
        EngineConfig::new()
            .with_row_height(RowHeight::Fixed(24.0))
            .with_viewport_extent(VIEWPORT)
            .with_overscan(48.0),
    )
    .with_key_extractor(|order: &Order, _| format!("order-{}", order.id));
    let mut pool = LocalPool::new();

    let widths = distribute_column_widths(640.0, &columns());
    info!(message = "demo.columns", widths = ?widths);

    println!("top of the list");
    frame(&mut engine, &mut pool, 0.0);
    frame(&mut engine, &mut pool, 0.0);

    println!("jump to the last order");
    let offset = engine.scroll_to_index(TOTAL_ORDERS - 1, ScrollAlign::End);
    frame(&mut engine, &mut pool, offset);

    println!("search for \"foo\"");
    engine.set_search_term("foo");
    let offset = engine.scroll_offset();
    frame(&mut engine, &mut pool, offset);

    println!("clear the search");
    engine.set_search_term("");
    frame(&mut engine, &mut pool, 0.0);

    println!("reset");
    engine.reset();
    frame(&mut engine, &mut pool, 0.0);
}
