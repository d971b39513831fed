//! The pagination engine and per-view browse state.

use serde::{Deserialize, Serialize};

use crate::models::GameRecord;

use super::engine::{filter_and_sort, FilterSpec, SortKey};

/// Number of cards per page in the stock grid layout.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// One page sliced out of an ordered view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The records on this page, in view order.
    pub items: Vec<T>,
    /// The 1-based page index that was requested.
    pub page: usize,
    /// Total number of pages in the view; zero for an empty view.
    pub total_pages: usize,
}

/// Slice a fixed-size page out of an ordered view.
///
/// `page` is 1-based. An index past the last page yields an empty page
/// rather than an error, and `total_pages` is zero when the view is empty
/// or the page size is zero (nothing to show, nothing to crash on).
pub fn paginate<T: Clone>(view: &[T], page_size: usize, page: usize) -> Page<T> {
    let total_pages = if page_size == 0 {
        0
    } else {
        view.len().div_ceil(page_size)
    };
    let start = page.saturating_sub(1).saturating_mul(page_size);
    let end = start.saturating_add(page_size).min(view.len());
    let items = if start < end {
        view[start..end].to_vec()
    } else {
        Vec::new()
    };
    Page {
        items,
        page,
        total_pages,
    }
}

/// Browse state for one catalog view: the active filter, sort order and
/// page index.
///
/// Any change to the filter or the sort order resets the page to 1, so page
/// state never survives a query change. Both the general catalog view and
/// the search-results view are the same engine with different named
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseSession {
    filter: FilterSpec,
    sort: SortKey,
    page: usize,
    page_size: usize,
}

impl BrowseSession {
    /// A catalog view: trending first.
    pub fn catalog(page_size: usize) -> Self {
        Self::with_sort(page_size, SortKey::CATALOG_DEFAULT)
    }

    /// A search-results view: most relevant first.
    pub fn search(page_size: usize) -> Self {
        Self::with_sort(page_size, SortKey::SEARCH_DEFAULT)
    }

    fn with_sort(page_size: usize, sort: SortKey) -> Self {
        Self {
            filter: FilterSpec::default(),
            sort,
            page: 1,
            page_size,
        }
    }

    /// The active filter.
    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    /// The active sort order.
    pub fn sort(&self) -> SortKey {
        self.sort
    }

    /// The current 1-based page index.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Replace the whole filter, resetting to the first page.
    pub fn set_filter(&mut self, filter: FilterSpec) {
        self.filter = filter;
        self.page = 1;
    }

    /// Change the sort order, resetting to the first page.
    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.page = 1;
    }

    /// Change the category filter (`None` meaning "All"), resetting to the
    /// first page.
    pub fn set_category(&mut self, category: Option<crate::models::Category>) {
        self.filter.category = category;
        self.page = 1;
    }

    /// Change the search query, resetting to the first page. A blank query
    /// clears the search filter.
    pub fn set_search(&mut self, query: &str) {
        let trimmed = query.trim();
        self.filter.search = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        };
        self.page = 1;
    }

    /// Move one page forward, clamped to the last page of the view.
    pub fn next_page(&mut self, total_pages: usize) {
        self.page = (self.page + 1).min(total_pages.max(1));
    }

    /// Move one page back, clamped to the first page.
    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Run the query engine over `games` and slice the current page.
    pub fn run(&self, games: &[GameRecord]) -> Page<GameRecord> {
        let view = filter_and_sort(games, &self.filter, self.sort);
        paginate(&view, self.page_size, self.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[test]
    fn pages_concatenate_back_to_the_view() {
        let view: Vec<u32> = (0..25).collect();
        let total_pages = paginate(&view, 10, 1).total_pages;
        assert_eq!(total_pages, 3);

        let mut rebuilt = Vec::new();
        for page in 1..=total_pages {
            rebuilt.extend(paginate(&view, 10, page).items);
        }
        assert_eq!(rebuilt, view);
    }

    #[test]
    fn page_past_the_end_is_empty_not_an_error() {
        let view: Vec<u32> = (0..5).collect();
        let page = paginate(&view, 10, 7);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn empty_view_has_zero_pages() {
        let page = paginate::<u32>(&[], 10, 1);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn zero_page_size_yields_zero_pages() {
        let view: Vec<u32> = (0..5).collect();
        let page = paginate(&view, 0, 1);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn last_page_may_be_partial() {
        let view: Vec<u32> = (0..11).collect();
        let page = paginate(&view, 4, 3);
        assert_eq!(page.items, vec![8, 9, 10]);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn filter_changes_reset_the_page() {
        let mut session = BrowseSession::catalog(DEFAULT_PAGE_SIZE);
        session.next_page(5);
        session.next_page(5);
        assert_eq!(session.page(), 3);

        session.set_category(Some(Category::Horror));
        assert_eq!(session.page(), 1);

        session.next_page(5);
        session.set_sort(SortKey::Rating);
        assert_eq!(session.page(), 1);

        session.next_page(5);
        session.set_search("zombie");
        assert_eq!(session.page(), 1);
    }

    #[test]
    fn navigation_clamps_to_view_bounds() {
        let mut session = BrowseSession::catalog(DEFAULT_PAGE_SIZE);
        session.prev_page();
        assert_eq!(session.page(), 1);
        session.next_page(2);
        session.next_page(2);
        session.next_page(2);
        assert_eq!(session.page(), 2);
    }

    #[test]
    fn view_defaults_differ_by_name() {
        assert_eq!(BrowseSession::catalog(12).sort(), SortKey::Trending);
        assert_eq!(BrowseSession::search(12).sort(), SortKey::Relevance);
    }
}
