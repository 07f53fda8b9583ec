//! Background fetch execution.
//!
//! - `messages`: request/reply types with trace context propagation
//! - `handler`: the worker spawning one task per request

pub mod handler;
pub mod messages;

pub use handler::FetchWorker;
pub use messages::{FetchReply, FetchRequest, TraceContext};
