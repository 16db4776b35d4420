//! Browse session state: the active filter, the full result set of the last
//! query and the page currently shown.
use std::ops::Range;
use std::sync::Arc;

use super::data::{FilterState, GameSummary};
use super::library::{Library, LibraryError};
use super::query;

/// Games shown per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Full, unpaged result of the most recent query.
///
/// The rows sit behind an `Arc` and are only ever swapped as a whole, so a
/// clone of the cache never sees a half-replaced result.
#[derive(Debug, Clone, Default)]
pub struct ResultCache {
    rows: Arc<Vec<GameSummary>>,
}

impl ResultCache {
    pub fn replace(&mut self, rows: Vec<GameSummary>) {
        self.rows = Arc::new(rows);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in `start..end`, clamped to the cache; empty if `start >= len`
    pub fn slice(&self, start: usize, end: usize) -> &[GameSummary] {
        let end = end.min(self.rows.len());
        if start >= end {
            return &[];
        }
        &self.rows[start..end]
    }
}

/// Fixed-size paging over a result set of known length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    current_page: usize,
}

impl Paginator {
    /// `page_size` of zero is treated as one
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 0,
        }
    }

    /// `max(1, ceil(len / page_size))`
    pub fn total_pages(len: usize, page_size: usize) -> usize {
        len.div_ceil(page_size.max(1)).max(1)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn reset(&mut self) {
        self.current_page = 0;
    }

    pub fn has_next(&self, len: usize) -> bool {
        self.current_page + 1 < Self::total_pages(len, self.page_size)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 0
    }

    /// Advance one page; no-op on the last page
    pub fn next(&mut self, len: usize) {
        if self.has_next(len) {
            self.current_page += 1;
        }
    }

    /// Go back one page; no-op on the first page
    pub fn previous(&mut self) {
        if self.has_previous() {
            self.current_page -= 1;
        }
    }

    /// Index range of the current page (may run past `len`; callers clamp)
    pub fn current_range(&self) -> Range<usize> {
        let start = self.current_page * self.page_size;
        start..start + self.page_size
    }

    /// The rows of the current page
    pub fn current_slice<'a>(&self, cache: &'a ResultCache) -> &'a [GameSummary] {
        let range = self.current_range();
        cache.slice(range.start, range.end)
    }
}

/// A filter, its results and the page being viewed.
///
/// The presentation layer drives this through [`apply_filter`],
/// [`next_page`] and [`previous_page`] only.
///
/// [`apply_filter`]: BrowseSession::apply_filter
/// [`next_page`]: BrowseSession::next_page
/// [`previous_page`]: BrowseSession::previous_page
#[derive(Debug, Clone)]
pub struct BrowseSession {
    filter: FilterState,
    cache: ResultCache,
    pages: Paginator,
}

impl BrowseSession {
    pub fn new(page_size: usize) -> Self {
        Self {
            filter: FilterState::default(),
            cache: ResultCache::default(),
            pages: Paginator::new(page_size),
        }
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn pages(&self) -> &Paginator {
        &self.pages
    }

    /// Run `filter` against the library and make it current.
    ///
    /// On success the cache is replaced, the page resets to zero and the
    /// number of matches is returned. On failure nothing changes: the
    /// previous filter, results and page stay as they were.
    pub fn apply_filter(
        &mut self,
        filter: FilterState,
        library: &Library,
    ) -> Result<usize, LibraryError> {
        let rows = library.scan(&query::build(&filter))?;
        let found = rows.len();

        self.filter = filter;
        self.cache.replace(rows);
        self.pages.reset();

        log::debug!("filter {:?} matched {} games", self.filter, found);
        Ok(found)
    }

    pub fn next_page(&mut self) {
        self.pages.next(self.cache.len());
    }

    pub fn previous_page(&mut self) {
        self.pages.previous();
    }

    pub fn has_next_page(&self) -> bool {
        self.pages.has_next(self.cache.len())
    }

    pub fn has_previous_page(&self) -> bool {
        self.pages.has_previous()
    }

    pub fn total_pages(&self) -> usize {
        Paginator::total_pages(self.cache.len(), self.pages.page_size())
    }

    /// Rows on the page currently shown
    pub fn current_page(&self) -> &[GameSummary] {
        self.pages.current_slice(&self.cache)
    }
}
