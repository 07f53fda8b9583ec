//! Image catalog records.
//!
//! [`ImageItem`] is the unit the feed accumulates; [`ResultPage`] is one
//! page of them as returned by an image source. The feed controller only
//! relies on `id` for identity; the remaining fields are carried through for
//! presentation.

use serde::{Deserialize, Serialize};

/// A single image from the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageItem {
    /// Stable identifier assigned by the catalog.
    pub id: u64,
    /// Width of the original image in pixels.
    pub width: u32,
    /// Height of the original image in pixels.
    pub height: u32,
    /// Small preview rendition (used for grid thumbnails).
    pub preview_url: String,
    /// Medium rendition (used for the detail view).
    pub webformat_url: String,
    /// Full-size rendition, when the catalog exposes one.
    pub large_image_url: Option<String>,
    /// Catalog page for the image.
    pub page_url: Option<String>,
    /// Descriptive tags in catalog order.
    pub tags: Vec<String>,
    /// Uploader display name.
    pub user: Option<String>,
}

impl ImageItem {
    /// Creates an item with the given identity and dimensions and no URLs.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixfeed::ImageItem;
    ///
    /// let item = ImageItem::new(7, 1920, 1080);
    /// assert_eq!(item.id, 7);
    /// assert!(item.tags.is_empty());
    /// ```
    #[must_use]
    pub const fn new(id: u64, width: u32, height: u32) -> Self {
        Self {
            id,
            width,
            height,
            preview_url: String::new(),
            webformat_url: String::new(),
            large_image_url: None,
            page_url: None,
            tags: Vec::new(),
            user: None,
        }
    }

    /// Width divided by height, or `None` when the height is unknown.
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f64> {
        (self.height > 0).then(|| f64::from(self.width) / f64::from(self.height))
    }

    /// Whether the image is taller than it is wide.
    #[must_use]
    pub fn is_portrait(&self) -> bool {
        self.aspect_ratio().is_some_and(|ratio| ratio < 1.0)
    }

    /// Last path segment of the preview URL, used as a download file name.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixfeed::ImageItem;
    ///
    /// let mut item = ImageItem::new(1, 640, 480);
    /// item.preview_url = "https://cdn.pixabay.com/photo/2024/01/01/cat-123_150.jpg".into();
    /// assert_eq!(item.file_name(), Some("cat-123_150.jpg"));
    /// ```
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.preview_url
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
    }
}

/// One page of results from an image source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    /// Items in server order.
    pub items: Vec<ImageItem>,
    /// Number of hits reachable through the API for the query.
    pub total_hits: u64,
}

impl ResultPage {
    /// Creates a page whose `total_hits` equals its own length.
    #[must_use]
    pub fn new(items: Vec<ImageItem>) -> Self {
        let total_hits = items.len() as u64;
        Self { items, total_hits }
    }

    /// Number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_handles_zero_height() {
        assert_eq!(ImageItem::new(1, 100, 0).aspect_ratio(), None);
        assert!(!ImageItem::new(1, 100, 0).is_portrait());
    }

    #[test]
    fn portrait_detection() {
        assert!(ImageItem::new(1, 600, 900).is_portrait());
        assert!(!ImageItem::new(2, 900, 600).is_portrait());
    }

    #[test]
    fn file_name_is_none_without_preview() {
        assert_eq!(ImageItem::new(1, 1, 1).file_name(), None);
    }
}
