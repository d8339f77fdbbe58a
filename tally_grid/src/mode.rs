// Copyright 2025 the Tally Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Remote paging versus local filtering.

/// Which view of the rows a data source presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    /// All rows, loaded page by page as they scroll into view.
    Remote,
    /// Resident rows matching the search term; nothing more is fetched.
    Filtered,
}

/// Resident rows matching a search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FilteredView {
    pub(crate) term: String,
    /// Backing-array positions of the matching rows, ascending.
    pub(crate) matches: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Mode {
    Remote,
    Filtered(FilteredView),
}

impl Mode {
    pub(crate) fn kind(&self) -> ModeKind {
        match self {
            Self::Remote => ModeKind::Remote,
            Self::Filtered(_) => ModeKind::Filtered,
        }
    }

    pub(crate) fn term(&self) -> Option<&str> {
        match self {
            Self::Remote => None,
            Self::Filtered(view) => Some(&view.term),
        }
    }
}
