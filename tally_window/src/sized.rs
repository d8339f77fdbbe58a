// Copyright 2025 the Tally Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row layouts driven by a sizing policy.

use alloc::rc::Rc;
use core::fmt;

use crate::{MeasuredRows, ResizableRowExtents, RowExtents, Scalar, UniformRows};

/// A pure function from row index to row height.
pub type SizeFn<S> = Rc<dyn Fn(usize) -> S>;

/// How tall the rows of a grid are.
#[derive(Clone)]
pub enum RowHeight<S: Scalar> {
    /// Every row has the same height.
    Fixed(S),
    /// Each row's height comes from a function of its index.
    ///
    /// The function must be pure: its results are cached until the policy is replaced.
    PerRow(SizeFn<S>),
}

impl<S: Scalar> RowHeight<S> {
    /// Height used when nothing else is configured, in logical pixels.
    pub const DEFAULT_PIXELS: usize = 40;

    /// Wraps a sizing function.
    pub fn per_row(size_fn: impl Fn(usize) -> S + 'static) -> Self {
        Self::PerRow(Rc::new(size_fn))
    }

    /// Returns `true` when both policies are known to produce the same layout.
    ///
    /// Fixed heights compare by value. Sizing functions compare by identity of
    /// the shared closure, so re-wrapping the same closure counts as a change.
    #[must_use]
    pub fn same_policy(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Fixed(a), Self::Fixed(b)) => a == b,
            (Self::PerRow(a), Self::PerRow(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<S: Scalar> Default for RowHeight<S> {
    fn default() -> Self {
        Self::Fixed(S::from_usize(Self::DEFAULT_PIXELS))
    }
}

impl<S: Scalar> fmt::Debug for RowHeight<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(height) => f.debug_tuple("Fixed").field(height).finish(),
            Self::PerRow(_) => f.write_str("PerRow(..)"),
        }
    }
}

/// Rows sized by a [`SizeFn`], with heights cached in a [`MeasuredRows`].
///
/// Growing the row count evaluates the function for the new rows only, so a
/// grid that learns its total one page at a time never re-measures rows it
/// already knows.
#[derive(Clone)]
pub struct SizedRows<S: Scalar> {
    size_fn: SizeFn<S>,
    cache: MeasuredRows<S>,
}

impl<S: Scalar> SizedRows<S> {
    /// Creates a layout of `rows` rows measured by `size_fn`.
    #[must_use]
    pub fn new(size_fn: SizeFn<S>, rows: usize) -> Self {
        let cache = MeasuredRows::from_heights((0..rows).map(|row| size_fn(row)));
        Self { size_fn, cache }
    }

    /// The sizing function.
    #[must_use]
    pub fn size_fn(&self) -> &SizeFn<S> {
        &self.size_fn
    }
}

impl<S: Scalar> fmt::Debug for SizedRows<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SizedRows")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl<S: Scalar> RowExtents for SizedRows<S> {
    type Scalar = S;

    fn row_count(&self) -> usize {
        self.cache.row_count()
    }

    fn total_height(&mut self) -> S {
        self.cache.total_height()
    }

    fn height_of(&mut self, row: usize) -> S {
        self.cache.height_of(row)
    }

    fn offset_of(&mut self, row: usize) -> S {
        self.cache.offset_of(row)
    }

    fn row_at_offset(&mut self, offset: S) -> usize {
        self.cache.row_at_offset(offset)
    }
}

impl<S: Scalar> ResizableRowExtents for SizedRows<S> {
    fn set_row_count(&mut self, rows: usize) {
        let known = self.cache.row_count();
        if rows <= known {
            self.cache.resize(rows);
            return;
        }
        for row in known..rows {
            self.cache.push((self.size_fn)(row));
        }
    }
}

/// The row layout selected by a [`RowHeight`] policy.
#[derive(Debug, Clone)]
pub enum RowLayout<S: Scalar> {
    /// Constant height.
    Uniform(UniformRows<S>),
    /// Per-row sizing function.
    Sized(SizedRows<S>),
}

impl<S: Scalar> RowLayout<S> {
    /// Builds the layout for `height` with `rows` rows.
    #[must_use]
    pub fn new(height: &RowHeight<S>, rows: usize) -> Self {
        match height {
            RowHeight::Fixed(h) => Self::Uniform(UniformRows::new(rows, *h)),
            RowHeight::PerRow(size_fn) => Self::Sized(SizedRows::new(Rc::clone(size_fn), rows)),
        }
    }

    /// The policy this layout was built from.
    #[must_use]
    pub fn policy(&self) -> RowHeight<S> {
        match self {
            Self::Uniform(rows) => RowHeight::Fixed(rows.height()),
            Self::Sized(rows) => RowHeight::PerRow(Rc::clone(rows.size_fn())),
        }
    }
}

impl<S: Scalar> Default for RowLayout<S> {
    fn default() -> Self {
        Self::new(&RowHeight::default(), 0)
    }
}

impl<S: Scalar> RowExtents for RowLayout<S> {
    type Scalar = S;

    fn row_count(&self) -> usize {
        match self {
            Self::Uniform(rows) => rows.row_count(),
            Self::Sized(rows) => rows.row_count(),
        }
    }

    fn total_height(&mut self) -> S {
        match self {
            Self::Uniform(rows) => rows.total_height(),
            Self::Sized(rows) => rows.total_height(),
        }
    }

    fn height_of(&mut self, row: usize) -> S {
        match self {
            Self::Uniform(rows) => rows.height_of(row),
            Self::Sized(rows) => rows.height_of(row),
        }
    }

    fn offset_of(&mut self, row: usize) -> S {
        match self {
            Self::Uniform(rows) => rows.offset_of(row),
            Self::Sized(rows) => rows.offset_of(row),
        }
    }

    fn row_at_offset(&mut self, offset: S) -> usize {
        match self {
            Self::Uniform(rows) => rows.row_at_offset(offset),
            Self::Sized(rows) => rows.row_at_offset(offset),
        }
    }
}

impl<S: Scalar> ResizableRowExtents for RowLayout<S> {
    fn set_row_count(&mut self, rows: usize) {
        match self {
            Self::Uniform(layout) => layout.set_row_count(rows),
            Self::Sized(layout) => layout.set_row_count(rows),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::cell::Cell;

    use super::{RowHeight, RowLayout, SizedRows};
    use crate::{ResizableRowExtents, RowExtents};

    #[test]
    fn growing_measures_only_new_rows() {
        let calls = Rc::new(Cell::new(0_usize));
        let counter = Rc::clone(&calls);
        let size_fn = Rc::new(move |row: usize| {
            counter.set(counter.get() + 1);
            if row % 2 == 0 { 20.0_f32 } else { 30.0 }
        });
        let mut rows = SizedRows::new(size_fn, 4);
        assert_eq!(calls.get(), 4);
        assert_eq!(rows.total_height(), 100.0);

        rows.set_row_count(6);
        assert_eq!(calls.get(), 6);
        assert_eq!(rows.offset_of(5), 120.0);

        rows.set_row_count(2);
        assert_eq!(calls.get(), 6);
        assert_eq!(rows.total_height(), 50.0);
    }

    #[test]
    fn layout_follows_policy() {
        let mut fixed = RowLayout::new(&RowHeight::Fixed(25.0_f64), 4);
        assert_eq!(fixed.offset_of(3), 75.0);
        assert!(matches!(fixed.policy(), RowHeight::Fixed(h) if h == 25.0));

        let mut sized = RowLayout::new(&RowHeight::per_row(|row| (row + 1) as f64), 3);
        assert_eq!(sized.total_height(), 6.0);
        sized.set_row_count(4);
        assert_eq!(sized.offset_of(3), 6.0);
        assert_eq!(sized.height_of(3), 4.0);
    }

    #[test]
    fn policy_identity() {
        let a = RowHeight::<f32>::per_row(|_| 10.0);
        let b = a.clone();
        let c = RowHeight::<f32>::per_row(|_| 10.0);
        assert!(a.same_policy(&b));
        assert!(!a.same_policy(&c));
        assert!(RowHeight::Fixed(4.0_f32).same_policy(&RowHeight::Fixed(4.0)));
        assert!(RowHeight::<f32>::default().same_policy(&RowHeight::Fixed(40.0)));
    }
}
