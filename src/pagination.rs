// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::Serialize;
use std::num::NonZeroUsize;

use crate::filter::FilterCriteria;

/// Rows per page. The consumer may resize it to fit the display, so it is
/// passed into every paginated call instead of living in a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    pub fn new(rows: usize) -> Option<Self> {
        NonZeroUsize::new(rows).map(PageSize)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }

    pub fn offset(self, page: usize) -> usize {
        page.saturating_mul(self.get())
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize(NonZeroUsize::new(crate::config::DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN))
    }
}

/// `ceil(total_rows / page_size)`, except that an empty set still has one
/// (empty) page so page 0 is always a valid position.
pub fn page_count(total_rows: usize, page_size: PageSize) -> usize {
    total_rows.div_ceil(page_size.get()).max(1)
}

/// The position of one independent view: which page, under which filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub page: usize,
    pub filter: FilterCriteria,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new(FilterCriteria::default())
    }
}

impl ViewState {
    pub fn new(filter: FilterCriteria) -> Self {
        ViewState { page: 0, filter }
    }

    /// Moves to `page` if it lies in `[0, page_count)`; otherwise the state
    /// is returned unchanged.
    pub fn go_to(self, page: i64, page_count: usize) -> Self {
        match usize::try_from(page) {
            Ok(p) if p < page_count => ViewState { page: p, ..self },
            _ => self,
        }
    }

    /// Relative move, e.g. `-1` for previous page.
    pub fn step(self, by: i64, page_count: usize) -> Self {
        let target = i64::try_from(self.page)
            .ok()
            .and_then(|p| p.checked_add(by))
            .unwrap_or(-1);
        self.go_to(target, page_count)
    }

    /// A new filter starts again from the first page.
    pub fn with_filter(self, filter: FilterCriteria) -> Self {
        ViewState::new(filter)
    }

    /// Pulls the page back inside range after the row count shrank.
    pub fn clamped(self, page_count: usize) -> Self {
        let last = page_count.saturating_sub(1);
        if self.page > last {
            ViewState { page: last, ..self }
        } else {
            self
        }
    }
}
