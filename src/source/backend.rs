//! Image source abstraction.
//!
//! The controller never talks HTTP. It hands [`QueryParameters`] to the fetch
//! worker, which calls an [`ImageSource`]. Swapping the source (a live API, a
//! scripted fake in tests) changes nothing upstream.

use crate::domain::{FetchFailure, QueryParameters, ResultPage};
use async_trait::async_trait;

/// A remote, paginated image catalog.
///
/// Implementations must be safe to call concurrently: the worker issues a
/// replace and an append query at the same time when the user changes the
/// selection mid-scroll.
///
/// # Implementations
///
/// - [`PixabaySource`](super::PixabaySource): the Pixabay REST API
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use pixfeed::source::ImageSource;
/// use pixfeed::{FetchFailure, ImageItem, QueryParameters, ResultPage};
///
/// struct Fixed;
///
/// #[async_trait]
/// impl ImageSource for Fixed {
///     async fn fetch(&self, params: &QueryParameters) -> Result<ResultPage, FetchFailure> {
///         Ok(ResultPage::new(vec![ImageItem::new(u64::from(params.page), 1, 1)]))
///     }
/// }
/// ```
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetches the page described by `params`.
    ///
    /// Identical parameters must describe the same query; the source may
    /// still return different items if the catalog changed in between.
    ///
    /// # Errors
    ///
    /// [`FetchFailure::Transport`] for network errors, timeouts and
    /// non-success statuses; [`FetchFailure::MalformedResponse`] when the
    /// body lacks the expected result structure.
    async fn fetch(&self, params: &QueryParameters) -> Result<ResultPage, FetchFailure>;
}
