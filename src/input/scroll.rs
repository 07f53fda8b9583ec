//! Near-end detection for a scrolling list.

use serde::{Deserialize, Serialize};

/// Slack, in pixels, below which the viewport counts as at the end.
pub const NEAR_END_SLACK: f64 = 1.0;

/// One scroll position report from the list view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    /// Total height of the rendered content.
    pub content_height: f64,
    /// Height of the visible area.
    pub viewport_height: f64,
    /// Distance scrolled from the top.
    pub scroll_offset: f64,
}

impl ScrollMetrics {
    /// Creates a report from the raw triple.
    #[must_use]
    pub const fn new(content_height: f64, viewport_height: f64, scroll_offset: f64) -> Self {
        Self {
            content_height,
            viewport_height,
            scroll_offset,
        }
    }

    /// Whether the viewport is within [`NEAR_END_SLACK`] of the bottom.
    ///
    /// Content shorter than the viewport is always at its end.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixfeed::input::ScrollMetrics;
    ///
    /// assert!(ScrollMetrics::new(2000.0, 800.0, 1199.0).is_near_end());
    /// assert!(!ScrollMetrics::new(2000.0, 800.0, 1000.0).is_near_end());
    /// ```
    #[must_use]
    pub fn is_near_end(&self) -> bool {
        self.scroll_offset >= self.content_height - self.viewport_height - NEAR_END_SLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        assert!(ScrollMetrics::new(1000.0, 400.0, 599.0).is_near_end());
        assert!(!ScrollMetrics::new(1000.0, 400.0, 598.9).is_near_end());
    }

    #[test]
    fn short_content_is_at_end() {
        assert!(ScrollMetrics::new(300.0, 400.0, 0.0).is_near_end());
    }
}
