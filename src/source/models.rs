//! Wire models for the Pixabay search API.
//!
//! These mirror the JSON response and are kept apart from the domain
//! [`ImageItem`] so the feed never depends on the API's field naming.

use crate::domain::{ImageItem, ResultPage};
use serde::Deserialize;

/// Top-level search response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Total matches in the catalog.
    #[serde(default)]
    pub total: u64,

    /// Matches reachable through the API (capped by the service).
    #[serde(default, rename = "totalHits")]
    pub total_hits: u64,

    /// The page of hits. A missing array means the response is malformed.
    pub hits: Option<Vec<Hit>>,
}

/// One hit as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct Hit {
    /// Stable image id.
    pub id: u64,

    /// Pixabay page for the image.
    #[serde(rename = "pageURL")]
    pub page_url: Option<String>,

    /// Comma-separated tag list, e.g. `"flower, blossom, spring"`.
    #[serde(default)]
    pub tags: String,

    /// Small thumbnail, at most 150 px on the long side.
    #[serde(rename = "previewURL", default)]
    pub preview_url: String,

    /// Medium rendition, at most 640 px on the long side.
    #[serde(rename = "webformatURL", default)]
    pub webformat_url: String,

    /// Scaled rendition up to 1280 px. Absent for some accounts.
    #[serde(rename = "largeImageURL")]
    pub large_image_url: Option<String>,

    /// Original width in pixels.
    #[serde(rename = "imageWidth", default)]
    pub image_width: u32,

    /// Original height in pixels.
    #[serde(rename = "imageHeight", default)]
    pub image_height: u32,

    /// Uploader's user name.
    pub user: Option<String>,
}

impl From<Hit> for ImageItem {
    fn from(hit: Hit) -> Self {
        Self {
            id: hit.id,
            width: hit.image_width,
            height: hit.image_height,
            preview_url: hit.preview_url,
            webformat_url: hit.webformat_url,
            large_image_url: hit.large_image_url,
            page_url: hit.page_url,
            tags: hit
                .tags
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect(),
            user: hit.user,
        }
    }
}

impl SearchResponse {
    /// Converts to a domain page, or `None` if `hits` was absent.
    #[must_use]
    pub fn into_page(self) -> Option<ResultPage> {
        let hits = self.hits?;
        Some(ResultPage {
            items: hits.into_iter().map(ImageItem::from).collect(),
            total_hits: self.total_hits,
        })
    }
}
