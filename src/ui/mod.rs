//! Presentation layer: owned view models and a plain-text renderer.
//!
//! ```text
//! FeedState → snapshot → FeedViewModel → render → stdout
//! ```
//!
//! - [`viewmodel`]: snapshot types handed to renderers
//! - [`renderer`]: line-oriented renderer used by the terminal driver

pub mod renderer;
pub mod viewmodel;

pub use renderer::{render, render_lines};
pub use viewmodel::{FeedViewModel, FilterChip};
