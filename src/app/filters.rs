//! Active category and facet selection.
//!
//! [`FilterState`] is plain data. It does not know about search terms; the
//! mutual exclusion between a search term and a category is enforced by the
//! event handler.

use crate::domain::query::FACET_COLORS;
use crate::domain::Facets;
use crate::ui::FilterChip;

/// Category plus facet filters currently applied to the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    category: Option<String>,
    facets: Facets,
}

impl FilterState {
    /// Creates an empty selection: no category, no facets.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            category: None,
            facets: Facets::new(),
        }
    }

    /// Currently selected category.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Currently applied facets.
    #[must_use]
    pub const fn facets(&self) -> &Facets {
        &self.facets
    }

    /// Whether neither a category nor any facet is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.facets.is_empty()
    }

    /// Selects `category`, or clears it with `None`. Facets are untouched.
    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category;
    }

    /// Replaces the whole facet mapping with `facets`.
    ///
    /// Keys absent from `facets` are dropped, not merged.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixfeed::app::FilterState;
    /// use pixfeed::Facets;
    ///
    /// let mut filters = FilterState::new();
    /// filters.apply_facets(Facets::from([("order".into(), "popular".into())]));
    /// filters.apply_facets(Facets::from([("colors".into(), "red".into())]));
    ///
    /// assert_eq!(filters.facets().len(), 1);
    /// assert_eq!(filters.facets().get("colors").map(String::as_str), Some("red"));
    /// ```
    pub fn apply_facets(&mut self, facets: Facets) {
        self.facets = facets;
    }

    /// Removes every facet. Returns whether anything was removed.
    pub fn reset_facets(&mut self) -> bool {
        let had_facets = !self.facets.is_empty();
        self.facets.clear();
        had_facets
    }

    /// Removes exactly the facet `name`, returning its previous value.
    pub fn clear_facet(&mut self, name: &str) -> Option<String> {
        self.facets.remove(name)
    }

    /// Active filters as display chips, category first.
    #[must_use]
    pub fn chips(&self) -> Vec<FilterChip> {
        let category = self.category.iter().map(|value| FilterChip {
            name: "category".to_string(),
            value: value.clone(),
            is_color: false,
        });
        let facets = self.facets.iter().map(|(name, value)| FilterChip {
            name: name.clone(),
            value: value.clone(),
            is_color: name == FACET_COLORS,
        });
        category.chain(facets).collect()
    }
}
