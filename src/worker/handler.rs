//! Fetch worker: runs queries on the tokio runtime.
//!
//! Each [`FetchRequest`] becomes one spawned task that calls the
//! [`ImageSource`] and sends a [`FetchReply`] back over an unbounded channel.
//! Tasks are never cancelled; superseded replies are dropped by the
//! controller's generation check instead. A source that panics still
//! produces a reply, as a transport failure.

use crate::domain::FetchFailure;
use crate::source::ImageSource;
use crate::worker::{FetchReply, FetchRequest};
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Executes fetch requests concurrently and reports their outcomes.
#[derive(Clone)]
pub struct FetchWorker {
    source: Arc<dyn ImageSource>,
    replies: mpsc::UnboundedSender<FetchReply>,
}

impl FetchWorker {
    /// Creates a worker calling `source` and the receiver its replies arrive
    /// on.
    #[must_use]
    pub fn new(source: Arc<dyn ImageSource>) -> (Self, mpsc::UnboundedReceiver<FetchReply>) {
        let (replies, receiver) = mpsc::unbounded_channel();
        (Self { source, replies }, receiver)
    }

    /// Spawns a task executing `request`.
    ///
    /// The task's span is parented to the span that created the request when
    /// the request carries a trace context. Must be called from within a
    /// tokio runtime.
    pub fn dispatch(&self, request: FetchRequest) -> JoinHandle<()> {
        let span = tracing::debug_span!(
            "fetch",
            generation = request.generation,
            mode = %request.mode,
            page = request.params.page
        );
        attach_parent(&span, &request);

        let source = Arc::clone(&self.source);
        let replies = self.replies.clone();

        tokio::spawn(
            async move {
                let outcome = AssertUnwindSafe(source.fetch(&request.params))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|panic| Err(panicked(panic.as_ref())));
                match &outcome {
                    Ok(page) => tracing::debug!(items = page.len(), "fetch succeeded"),
                    Err(error) => tracing::debug!(error = %error, "fetch failed"),
                }
                if replies.send(request.reply(outcome)).is_err() {
                    tracing::debug!("reply channel closed, dropping reply");
                }
            }
            .instrument(span),
        )
    }
}

fn panicked(payload: &(dyn Any + Send)) -> FetchFailure {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    tracing::error!(message = %message, "image source panicked");
    FetchFailure::Transport(format!("image source panicked: {message}"))
}

fn attach_parent(span: &tracing::Span, request: &FetchRequest) {
    use tracing_opentelemetry::OpenTelemetrySpanExt;

    if let Some(parent) = request
        .trace_context
        .as_ref()
        .and_then(super::TraceContext::to_otel_context)
    {
        span.set_parent(parent);
    }
}
