//! Query parameters sent to the image source.
//!
//! A [`QueryParameters`] value is built fresh for every fetch from the feed
//! state at trigger time and never mutated afterwards. Serialization to the
//! wire happens in [`QueryParameters::to_url`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// Facet name → active value. Ordered so serialization is deterministic.
pub type Facets = BTreeMap<String, String>;

/// Number of items requested per page.
pub const PAGE_SIZE: u32 = 26;

/// Facet sorting results (`popular`, `latest`).
pub const FACET_ORDER: &str = "order";
/// Facet restricting orientation (`horizontal`, `vertical`).
pub const FACET_ORIENTATION: &str = "orientation";
/// Facet restricting media type (`photo`, `illustration`, `vector`).
pub const FACET_TYPE: &str = "type";
/// Facet restricting dominant colour (`red`, `grayscale`, ...).
pub const FACET_COLORS: &str = "colors";

/// Every facet the catalog understands.
pub const FACET_NAMES: [&str; 4] = [FACET_ORDER, FACET_ORIENTATION, FACET_TYPE, FACET_COLORS];

/// Parameters of a single remote query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParameters {
    /// 1-based page number.
    pub page: u32,
    /// Free-text search term, sent as `q`.
    pub search_term: Option<String>,
    /// Catalog category, sent as `category`.
    pub category: Option<String>,
    /// Facet filters, sent with their names as keys.
    pub facets: Facets,
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            page: 1,
            search_term: None,
            category: None,
            facets: Facets::new(),
        }
    }
}

impl QueryParameters {
    /// User-dependent key/value pairs in wire order.
    ///
    /// Always contains `page`; `q` and `category` only when set; facets
    /// follow with their keys passed through verbatim.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixfeed::QueryParameters;
    ///
    /// let params = QueryParameters {
    ///     page: 2,
    ///     search_term: Some("cat".into()),
    ///     ..Default::default()
    /// };
    /// assert_eq!(
    ///     params.query_pairs(),
    ///     vec![("page".to_string(), "2".to_string()), ("q".to_string(), "cat".to_string())]
    /// );
    /// ```
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(3 + self.facets.len());
        pairs.push(("page".to_string(), self.page.to_string()));
        if let Some(term) = &self.search_term {
            pairs.push(("q".to_string(), term.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category".to_string(), category.clone()));
        }
        pairs.extend(
            self.facets
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        pairs
    }

    /// Builds the full request URL against `base`.
    ///
    /// Fixed parameters (`key`, `per_page`, `safesearch`, `editors_choice`)
    /// come first, then [`query_pairs`](Self::query_pairs). Values are
    /// form-encoded, so a search for `red flowers` is sent as
    /// `q=red+flowers`.
    #[must_use]
    pub fn to_url(&self, base: &Url, api_key: &str) -> Url {
        let mut url = base.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("key", api_key)
                .append_pair("per_page", &PAGE_SIZE.to_string())
                .append_pair("safesearch", "true")
                .append_pair("editors_choice", "true");
            for (name, value) in self.query_pairs() {
                query.append_pair(&name, &value);
            }
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://pixabay.com/api/").unwrap()
    }

    #[test]
    fn fixed_parameters_are_always_present() {
        let url = QueryParameters::default().to_url(&base(), "secret");
        assert_eq!(
            url.query(),
            Some("key=secret&per_page=26&safesearch=true&editors_choice=true&page=1")
        );
    }

    #[test]
    fn search_term_is_encoded() {
        let params = QueryParameters {
            search_term: Some("red flowers & bees".into()),
            ..Default::default()
        };
        let url = params.to_url(&base(), "k");
        let query = url.query().unwrap();
        assert!(query.ends_with("&page=1&q=red+flowers+%26+bees"), "{query}");
    }

    #[test]
    fn facets_follow_category_with_verbatim_keys() {
        let mut facets = Facets::new();
        facets.insert(FACET_ORIENTATION.into(), "vertical".into());
        facets.insert(FACET_COLORS.into(), "red".into());
        let params = QueryParameters {
            page: 3,
            search_term: None,
            category: Some("nature".into()),
            facets,
        };

        let names: Vec<String> = params.query_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["page", "category", "colors", "orientation"]);
    }

    #[test]
    fn base_url_query_is_preserved() {
        let base = Url::parse("http://localhost:8080/api/?lang=en").unwrap();
        let url = QueryParameters::default().to_url(&base, "k");
        assert!(url.query().unwrap().starts_with("lang=en&key=k"));
    }
}
