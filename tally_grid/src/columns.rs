// Copyright 2025 the Tally Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column accessors and width distribution.

use core::fmt;
use std::rc::Rc;

use tally_window::Scalar;

/// A grid column: a title, a cell accessor, and an optional fixed width.
pub struct Column<T, S: Scalar = f64> {
    title: String,
    accessor: Rc<dyn Fn(&T) -> String>,
    width: Option<S>,
}

impl<T, S: Scalar> Column<T, S> {
    /// A column that takes an equal share of the free width.
    pub fn new(title: impl Into<String>, accessor: impl Fn(&T) -> String + 'static) -> Self {
        Self {
            title: title.into(),
            accessor: Rc::new(accessor),
            width: None,
        }
    }

    /// Pins the column to `width`.
    #[must_use]
    pub fn with_width(mut self, width: S) -> Self {
        self.width = Some(width);
        self
    }

    /// Header text.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The pinned width, if any.
    #[must_use]
    pub fn width(&self) -> Option<S> {
        self.width
    }

    /// Cell text for `item`.
    pub fn cell(&self, item: &T) -> String {
        (self.accessor)(item)
    }
}

impl<T, S: Scalar> Clone for Column<T, S> {
    fn clone(&self) -> Self {
        Self {
            title: self.title.clone(),
            accessor: Rc::clone(&self.accessor),
            width: self.width,
        }
    }
}

impl<T, S: Scalar> fmt::Debug for Column<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("title", &self.title)
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

/// Splits `available` width between `columns`.
///
/// Pinned columns get their width. The rest share what remains equally;
/// if pinned widths already exceed `available`, unpinned columns get zero.
pub fn distribute_column_widths<T, S: Scalar>(available: S, columns: &[Column<T, S>]) -> Vec<S> {
    let zero = S::zero();
    let mut pinned_total = zero;
    let mut flexible = 0_usize;
    for column in columns {
        match column.width {
            Some(width) => pinned_total = pinned_total + width.max(zero),
            None => flexible += 1,
        }
    }
    let share = if flexible == 0 {
        zero
    } else {
        (available - pinned_total).max(zero) / S::from_usize(flexible)
    };
    columns
        .iter()
        .map(|column| column.width.map_or(share, |width| width.max(zero)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{Column, distribute_column_widths};

    struct Order {
        id: u32,
        carrier: &'static str,
    }

    fn columns() -> Vec<Column<Order>> {
        vec![
            Column::new("Order", |o: &Order| format!("#{}", o.id)).with_width(120.0),
            Column::new("Carrier", |o: &Order| o.carrier.to_owned()),
            Column::new("Status", |_: &Order| "in transit".to_owned()),
        ]
    }

    #[test]
    fn unpinned_columns_share_the_rest() {
        let widths = distribute_column_widths(920.0, &columns());
        assert_eq!(widths, [120.0, 400.0, 400.0]);
    }

    #[test]
    fn pinned_overflow_leaves_nothing_to_share() {
        let widths = distribute_column_widths(100.0, &columns());
        assert_eq!(widths, [120.0, 0.0, 0.0]);
    }

    #[test]
    fn accessors_render_cells() {
        let cols = columns();
        let order = Order {
            id: 42,
            carrier: "DHL",
        };
        let cells: Vec<String> = cols.iter().map(|c| c.cell(&order)).collect();
        assert_eq!(cells, ["#42", "DHL", "in transit"]);
        assert_eq!(cols[0].title(), "Order");
        assert_eq!(cols[1].width(), None);
    }
}
