//! Page accumulation shared by every "load more" list.

use movos_core::MediaSummary;

/// Result of a load-more request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The next page arrived and this many items were appended.
    Loaded(usize),
    /// A load for the same list was already in flight; nothing was fetched.
    AlreadyLoading,
    /// The fetch failed; the list is unchanged.
    Failed,
    /// The list was reset or replaced while the fetch was in flight.
    Stale,
    /// There is no list to extend.
    NoContext,
}

/// Items accumulated from consecutive pages, with an in-flight guard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginatedFeed {
    items: Vec<MediaSummary>,
    page: u32,
    loading: bool,
}

impl PaginatedFeed {
    /// A feed whose first page is `items`.
    pub fn from_first_page(items: Vec<MediaSummary>) -> Self {
        Self {
            items,
            page: 1,
            loading: false,
        }
    }

    /// An empty feed whose first page is still being fetched.
    pub fn first_page_pending() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            loading: true,
        }
    }

    pub fn items(&self) -> &[MediaSummary] {
        &self.items
    }

    /// Highest page loaded so far.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Marks a load in flight and returns the page to fetch, or `None` when
    /// one is already running.
    pub fn begin_load(&mut self) -> Option<u32> {
        if self.loading {
            return None;
        }
        self.loading = true;
        Some(self.page + 1)
    }

    /// Appends a fetched page and advances the page counter.
    pub fn finish_load(&mut self, items: Vec<MediaSummary>) -> usize {
        let added = items.len();
        self.items.extend(items);
        self.page += 1;
        self.loading = false;
        added
    }

    /// Clears the in-flight flag after a failed fetch.
    pub fn abort_load(&mut self) {
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use movos_core::test_fixtures::page_of;

    #[test]
    fn test_guarded_append() {
        let mut feed = PaginatedFeed::from_first_page(page_of("top", 0, 20));
        assert_eq!(feed.begin_load(), Some(2));
        assert_eq!(feed.begin_load(), None);

        assert_eq!(feed.finish_load(page_of("top", 20, 20)), 20);
        assert_eq!(feed.items().len(), 40);
        assert_eq!(feed.page(), 2);
        assert!(!feed.is_loading());
    }

    #[test]
    fn test_abort_keeps_state() {
        let mut feed = PaginatedFeed::from_first_page(page_of("top", 0, 20));
        feed.begin_load();
        feed.abort_load();

        assert_eq!(feed.items().len(), 20);
        assert_eq!(feed.page(), 1);
        assert_eq!(feed.begin_load(), Some(2));
    }
}
