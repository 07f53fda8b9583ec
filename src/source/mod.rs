//! Remote image sources.
//!
//! - `backend`: the [`ImageSource`] trait the worker calls
//! - `models`: wire types of the Pixabay search API
//! - `pixabay`: the Pixabay HTTP client

pub mod backend;
pub mod models;
pub mod pixabay;

pub use backend::ImageSource;
pub use pixabay::{PixabaySource, DEFAULT_BASE_URL};
