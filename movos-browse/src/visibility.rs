//! Decides which "load more" affordance is shown.

use crate::shell::Tab;

/// Scroll position of the active list.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub content_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, viewport_height: f64, content_height: f64) -> Self {
        Self {
            scroll_top,
            viewport_height,
            content_height,
        }
    }
}

/// The list a "load more" button would extend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadMoreContext {
    SeeAll,
    Genre,
    SearchResults,
}

/// Screen state the active context is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub tab: Tab,
    pub see_all_open: bool,
    pub genre_selected: bool,
    pub has_search_results: bool,
}

impl ViewState {
    /// At most one list can be extended at a time.
    pub fn active_context(&self) -> Option<LoadMoreContext> {
        match self.tab {
            Tab::Home if self.see_all_open => Some(LoadMoreContext::SeeAll),
            Tab::Search if self.genre_selected => Some(LoadMoreContext::Genre),
            Tab::Search if self.has_search_results => Some(LoadMoreContext::SearchResults),
            _ => None,
        }
    }
}

/// Shows the affordance once the viewport is within a threshold of the end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadMoreVisibility {
    threshold_px: f64,
}

impl Default for LoadMoreVisibility {
    fn default() -> Self {
        Self::new(300.0)
    }
}

impl LoadMoreVisibility {
    pub fn new(threshold_px: f64) -> Self {
        Self { threshold_px }
    }

    pub fn near_bottom(&self, metrics: ScrollMetrics) -> bool {
        metrics.scroll_top + metrics.viewport_height >= metrics.content_height - self.threshold_px
    }

    /// The visible affordance for `view`, if any.
    pub fn evaluate(&self, view: ViewState, metrics: ScrollMetrics) -> Option<LoadMoreContext> {
        view.active_context()
            .filter(|_| self.near_bottom(metrics))
    }
}
