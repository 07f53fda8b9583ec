//! Domain layer: the value types the feed controller reasons about.
//!
//! Nothing here performs I/O. The types are shared by the controller, the
//! fetch worker and image sources.
//!
//! - [`error`]: error types and result alias
//! - [`image`]: catalog items and result pages
//! - [`query`]: query parameters and their wire form

pub mod error;
pub mod image;
pub mod query;

pub use error::{FeedError, FetchFailure, Result};
pub use image::{ImageItem, ResultPage};
pub use query::{Facets, QueryParameters, PAGE_SIZE};
