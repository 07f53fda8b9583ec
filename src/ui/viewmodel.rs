//! Owned snapshots of feed state for presentation.
//!
//! A [`FeedViewModel`] is produced by [`FeedState::snapshot`] and holds no
//! references into the state, so a renderer can keep it while the controller
//! moves on. It contains no business logic, only display-ready data.
//!
//! [`FeedState::snapshot`]: crate::app::FeedState::snapshot

use crate::domain::ImageItem;

/// Everything a renderer needs to draw the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedViewModel {
    /// Accumulated items in display order.
    pub items: Vec<ImageItem>,

    /// Last requested page.
    pub page: u32,

    /// Active search term, shown in the search box.
    pub search_term: Option<String>,

    /// Active category, highlighted in the category strip.
    pub category: Option<String>,

    /// Active filters, category first.
    pub chips: Vec<FilterChip>,

    /// Whether a page-1 query is outstanding.
    pub is_refreshing: bool,

    /// Whether a next-page query is outstanding.
    pub is_loading_more: bool,

    /// Whether the near-end latch is set.
    pub end_reached: bool,

    /// Hits reported by the most recent successful reply.
    pub total_hits: u64,
}

impl FeedViewModel {
    /// Whether the feed shows nothing and nothing is on its way.
    #[must_use]
    pub fn is_empty_result(&self) -> bool {
        self.items.is_empty() && !self.is_refreshing && !self.is_loading_more
    }
}

/// One active filter as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChip {
    /// Facet name, or `"category"`.
    pub name: String,

    /// Active value.
    pub value: String,

    /// Colour facets render as a swatch instead of a text label.
    pub is_color: bool,
}
