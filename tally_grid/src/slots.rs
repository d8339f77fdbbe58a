// Copyright 2025 the Tally Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positional row storage with explicit holes.

use core::ops::Range;
use std::rc::Rc;

/// What a row position currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Never requested, or its request failed or went stale.
    Absent,
    /// Its page is being fetched.
    Pending,
    /// Holds a row.
    Present,
}

/// The backing array: one slot per row position, grown as rows arrive.
///
/// Positions past the end of the vector are absent. At most one page is
/// pending at a time, so pending rows are kept as a range instead of being
/// written into the vector; a request far past the resident rows allocates
/// nothing until its rows arrive.
#[derive(Debug)]
pub(crate) struct SlotArray<T> {
    slots: Vec<Option<Rc<T>>>,
    /// One past the last present slot.
    present_end: usize,
    pending: Range<usize>,
}

impl<T> SlotArray<T> {
    pub(crate) fn from_rows(rows: &[Rc<T>]) -> Self {
        Self {
            slots: rows.iter().map(|row| Some(Rc::clone(row))).collect(),
            present_end: rows.len(),
            pending: 0..0,
        }
    }

    pub(crate) fn state(&self, index: usize) -> SlotState {
        if self.get(index).is_some() {
            SlotState::Present
        } else if self.pending.contains(&index) {
            SlotState::Pending
        } else {
            SlotState::Absent
        }
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Rc<T>> {
        self.slots.get(index)?.as_ref()
    }

    pub(crate) fn present_end(&self) -> usize {
        self.present_end
    }

    pub(crate) fn set_present(&mut self, index: usize, item: Rc<T>) {
        if self.slots.len() <= index {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(item);
        self.present_end = self.present_end.max(index + 1);
    }

    /// Marks the absent rows of `rows` as pending, replacing any earlier pending range.
    pub(crate) fn mark_pending(&mut self, rows: Range<usize>) {
        self.pending = rows;
    }

    /// Pending rows that never arrived go back to absent.
    pub(crate) fn clear_pending(&mut self) {
        self.pending = 0..0;
    }

    /// Present rows with their positions, in order.
    pub(crate) fn present(&self) -> impl Iterator<Item = (usize, &Rc<T>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| Some((index, slot.as_ref()?)))
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::{SlotArray, SlotState};

    #[test]
    fn holes_are_explicit() {
        let mut slots = SlotArray::from_rows(&[Rc::new('a'), Rc::new('b')]);
        assert_eq!(slots.state(1), SlotState::Present);
        assert_eq!(slots.state(7), SlotState::Absent);

        slots.mark_pending(0..6);
        assert_eq!(slots.state(0), SlotState::Present);
        assert_eq!(slots.state(4), SlotState::Pending);

        slots.set_present(4, Rc::new('e'));
        slots.clear_pending();
        assert_eq!(slots.state(3), SlotState::Absent);
        assert_eq!(slots.state(4), SlotState::Present);
        assert_eq!(slots.present_end(), 5);

        let present: Vec<_> = slots.present().map(|(i, c)| (i, **c)).collect();
        assert_eq!(present, [(0, 'a'), (1, 'b'), (4, 'e')]);
    }

    #[test]
    fn far_pending_pages_allocate_nothing() {
        let mut slots = SlotArray::<u8>::from_rows(&[]);
        let far = usize::MAX - 40..usize::MAX - 20;
        slots.mark_pending(far.clone());
        assert_eq!(slots.state(far.start), SlotState::Pending);
        assert_eq!(slots.state(far.end), SlotState::Absent);
        assert_eq!(slots.present_end(), 0);
        assert!(slots.get(far.start).is_none());
    }
}
