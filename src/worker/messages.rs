//! Fetch request and reply types exchanged with the fetch worker.
//!
//! Every request is tagged with the generation the controller allocated for
//! it; the worker echoes the generation in its reply so the controller can
//! discard replies that were superseded while in flight. Requests also carry
//! an optional [`TraceContext`] so the worker task's span joins the trace of
//! the event that issued the request.

use crate::app::FetchMode;
use crate::domain::{FetchFailure, QueryParameters, ResultPage};
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-task span propagation.
///
/// Captures the current trace and span IDs from OpenTelemetry so a span
/// opened on another tokio task can be parented to the issuing span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across tasks.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the current
    /// span context is invalid.
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            tracing::trace!("no valid span context to capture");
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }

    /// Rebuilds a remote OpenTelemetry context from the captured IDs.
    ///
    /// Returns `None` if either ID is not valid hex.
    #[must_use]
    pub fn to_otel_context(&self) -> Option<opentelemetry::Context> {
        use opentelemetry::trace::{
            SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
        };

        let trace_id = TraceId::from_hex(&self.trace_id).ok()?;
        let span_id = SpanId::from_hex(&self.parent_span_id).ok()?;
        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        span_context
            .is_valid()
            .then(|| opentelemetry::Context::new().with_remote_span_context(span_context))
    }
}

/// Generates one constructor per fetch mode that attaches the current trace
/// context.
macro_rules! fetch_request_builders {
    ( $( $builder_name:ident => $mode:ident ),* $(,)? ) => {
        impl FetchRequest {
            $(
                #[doc = concat!("Creates a `", stringify!($mode), "` request with the current trace context.")]
                #[must_use]
                pub fn $builder_name(generation: u64, params: QueryParameters) -> Self {
                    Self {
                        generation,
                        mode: FetchMode::$mode,
                        params,
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

fetch_request_builders! {
    replace => Replace,
    append => Append,
}

/// A query the controller wants executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Strictly increasing tag allocated by the controller.
    pub generation: u64,

    /// Whether the reply replaces or extends the item list.
    pub mode: FetchMode,

    /// Parameters snapshotted at trigger time.
    pub params: QueryParameters,

    /// Trace context for linking spans across tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_context: Option<TraceContext>,
}

impl FetchRequest {
    /// Builds the reply for this request from a fetch outcome.
    #[must_use]
    pub fn reply(&self, outcome: Result<ResultPage, FetchFailure>) -> FetchReply {
        FetchReply {
            generation: self.generation,
            mode: self.mode,
            page: self.params.page,
            outcome,
        }
    }
}

/// Outcome of a [`FetchRequest`], sent from the worker back to the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchReply {
    /// Generation of the request this answers.
    pub generation: u64,

    /// Mode of the request this answers.
    pub mode: FetchMode,

    /// Page number that was requested.
    pub page: u32,

    /// The result page, or why there is none.
    pub outcome: Result<ResultPage, FetchFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_set_mode_and_generation() {
        let request = FetchRequest::append(4, QueryParameters::default());
        assert_eq!(request.mode, FetchMode::Append);
        assert_eq!(request.generation, 4);
        // No OpenTelemetry layer is installed in unit tests.
        assert!(request.trace_context.is_none());
    }

    #[test]
    fn reply_echoes_request_identity() {
        let params = QueryParameters {
            page: 3,
            ..Default::default()
        };
        let request = FetchRequest::replace(9, params);
        let reply = request.reply(Err(FetchFailure::Transport("timeout".into())));

        assert_eq!(reply.generation, 9);
        assert_eq!(reply.mode, FetchMode::Replace);
        assert_eq!(reply.page, 3);
    }

    #[test]
    fn otel_context_round_trips_ids() {
        use opentelemetry::trace::TraceContextExt;

        let context = TraceContext {
            trace_id: "4bf92f3577b34da6a3ce929d0e0e4736".into(),
            parent_span_id: "00f067aa0ba902b7".into(),
        };
        let otel = context.to_otel_context().unwrap();
        let span_ref = otel.span();
        let span_context = span_ref.span_context();

        assert!(span_context.is_remote());
        assert_eq!(format!("{:016x}", span_context.span_id()), context.parent_span_id);
    }

    #[test]
    fn invalid_ids_yield_no_context() {
        let zeroed = TraceContext {
            trace_id: "0".repeat(32),
            parent_span_id: "0".repeat(16),
        };
        assert!(zeroed.to_otel_context().is_none());

        let garbage = TraceContext {
            trace_id: "not-hex".into(),
            parent_span_id: "zz".into(),
        };
        assert!(garbage.to_otel_context().is_none());
    }
}
