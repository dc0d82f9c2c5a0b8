//! Page windows over the visible collection.

use serde::Serialize;

use crate::types::PageNo;

/// Default page size used by list screens.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Result of projecting a collection length onto pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageProjection {
    /// `max(1, ceil(len / page_size))`.
    pub total_pages: usize,
    /// Requested page clamped to `[1, total_pages]`.
    pub current_page: PageNo,
    /// Window start (inclusive) into the visible collection.
    pub start: usize,
    /// Window end (exclusive) into the visible collection.
    pub end: usize,
}

impl PageProjection {
    /// Slices `items` to this window.
    pub fn window<'a, R>(&self, items: &'a [R]) -> &'a [R] {
        let end = self.end.min(items.len());
        let start = self.start.min(end);
        &items[start..end]
    }
}

/// Number of pages for `len` items; never below one.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Pure projection of `(len, page_size, current_page)`.
pub fn project(len: usize, page_size: usize, current_page: PageNo) -> PageProjection {
    let page_size = page_size.max(1);
    let total_pages = total_pages(len, page_size);
    let current_page = current_page.clamp(1, total_pages);
    let start = (current_page - 1) * page_size;
    let end = (start + page_size).min(len);
    PageProjection {
        total_pages,
        current_page,
        start: start.min(len),
        end,
    }
}

/// Current page state for one list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    current_page: PageNo,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pager {
    /// Pager on page one; a zero page size is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// 1-indexed current page.
    pub fn current_page(&self) -> PageNo {
        self.current_page
    }

    /// Back to page one (filter change, scope switch).
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Moves to `page`, clamped against a collection of `len` items.
    pub fn set_page(&mut self, page: PageNo, len: usize) -> PageProjection {
        let projection = project(len, self.page_size, page);
        self.current_page = projection.current_page;
        projection
    }

    /// Moves one page forward, stopping at the last page.
    pub fn next(&mut self, len: usize) -> PageProjection {
        self.set_page(self.current_page.saturating_add(1), len)
    }

    /// Moves one page back, stopping at page one.
    pub fn prev(&mut self, len: usize) -> PageProjection {
        self.set_page(self.current_page.saturating_sub(1), len)
    }

    /// Clamps the current page after the collection changed size.
    /// Returns true when the page moved.
    pub fn clamp_to(&mut self, len: usize) -> bool {
        let before = self.current_page;
        self.set_page(before, len);
        before != self.current_page
    }

    /// Projection of the current page over `len` items.
    pub fn projection(&self, len: usize) -> PageProjection {
        project(len, self.page_size, self.current_page)
    }
}
