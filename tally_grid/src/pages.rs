// Copyright 2025 the Tally Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page arithmetic and the set of resident pages.

use core::num::NonZeroUsize;
use core::ops::{Range, RangeInclusive};

use hashbrown::HashSet;
use smallvec::SmallVec;

/// Pages merged by one range request; visible ranges rarely span more than a few.
pub(crate) type PageList = SmallVec<[usize; 4]>;

/// The 1-based page that holds row `index`.
#[must_use]
pub fn page_of(index: usize, page_size: NonZeroUsize) -> usize {
    index / page_size.get() + 1
}

/// Row positions covered by `page` (1-based).
#[must_use]
pub fn page_rows(page: usize, page_size: NonZeroUsize) -> Range<usize> {
    debug_assert!(page >= 1, "page numbers start at 1");
    let size = page_size.get();
    (page - 1) * size..page.saturating_mul(size)
}

/// Pages touched by the inclusive row range `start..=stop`, in ascending order.
pub(crate) fn pages_spanning(
    start: usize,
    stop: usize,
    page_size: NonZeroUsize,
) -> impl Iterator<Item = usize> {
    page_of(start, page_size)..=page_of(stop, page_size)
}

/// Number of pages needed to hold `len` rows.
pub(crate) fn pages_for_len(len: usize, page_size: NonZeroUsize) -> usize {
    len.div_ceil(page_size.get())
}

/// Page numbers whose rows have been fetched and merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct LoadedPages {
    pages: HashSet<usize>,
}

impl LoadedPages {
    /// Pages `1..=n` for `n` pages of rows already on hand.
    pub(crate) fn covering(len: usize, page_size: NonZeroUsize) -> Self {
        Self {
            pages: (1..=pages_for_len(len, page_size)).collect(),
        }
    }

    pub(crate) fn contains(&self, page: usize) -> bool {
        self.pages.contains(&page)
    }

    /// The lowest page of `pages` that is not resident.
    ///
    /// Stops after at most `len() + 1` pages, however wide `pages` is.
    pub(crate) fn first_missing(&self, mut pages: RangeInclusive<usize>) -> Option<usize> {
        pages.find(|page| !self.pages.contains(page))
    }

    pub(crate) fn insert(&mut self, page: usize) {
        self.pages.insert(page);
    }

    pub(crate) fn len(&self) -> usize {
        self.pages.len()
    }

    /// The page numbers in ascending order.
    pub(crate) fn sorted(&self) -> Vec<usize> {
        let mut pages: Vec<usize> = self.pages.iter().copied().collect();
        pages.sort_unstable();
        pages
    }
}

#[cfg(test)]
mod tests {
    use core::num::NonZeroUsize;

    use super::{LoadedPages, page_of, page_rows, pages_spanning};

    const TWENTY: NonZeroUsize = NonZeroUsize::new(20).unwrap();

    #[test]
    fn rows_map_to_one_based_pages() {
        assert_eq!(page_of(0, TWENTY), 1);
        assert_eq!(page_of(19, TWENTY), 1);
        assert_eq!(page_of(20, TWENTY), 2);
        assert_eq!(page_of(56, TWENTY), 3);
        assert_eq!(page_rows(3, TWENTY), 40..60);
        let last = page_of(usize::MAX, TWENTY);
        assert_eq!(page_rows(last, TWENTY).end, usize::MAX);
    }

    #[test]
    fn spans_are_ascending_and_inclusive() {
        let pages: Vec<_> = pages_spanning(40, 119, TWENTY).collect();
        assert_eq!(pages, [3, 4, 5, 6]);
        let single: Vec<_> = pages_spanning(5, 5, TWENTY).collect();
        assert_eq!(single, [1]);
    }

    #[test]
    fn initial_rows_cover_whole_pages() {
        assert_eq!(LoadedPages::covering(0, TWENTY).len(), 0);
        assert_eq!(LoadedPages::covering(12, TWENTY).sorted(), [1]);
        assert_eq!(LoadedPages::covering(41, TWENTY).sorted(), [1, 2, 3]);
    }

    #[test]
    fn first_missing_skips_resident_pages() {
        let mut pages = LoadedPages::covering(40, TWENTY);
        pages.insert(4);
        assert_eq!(pages.first_missing(1..=6), Some(3));
        assert_eq!(pages.first_missing(4..=4), None);
        assert_eq!(pages.first_missing(5..=2), None);
        assert_eq!(pages.first_missing(1..=usize::MAX), Some(3));
    }
}
