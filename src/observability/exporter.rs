//! OpenTelemetry span exporter writing OTLP-shaped JSON lines.
//!
//! Each exported batch becomes one line holding a `resourceSpans` document,
//! the same shape an OTLP/HTTP JSON collector accepts, so trace files can be
//! replayed into standard tooling.

use super::file_writer::RotatingFile;
use futures_util::future::BoxFuture;
use opentelemetry::trace::{SpanId, SpanKind, Status, TraceError};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use serde::Serialize;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Instrumentation scope recorded for every span.
pub const SCOPE_NAME: &str = "pixfeed";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument {
    resource_spans: Vec<ResourceSpans>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourceSpans {
    resource: OtlpResource,
    scope_spans: Vec<ScopeSpans>,
}

#[derive(Serialize)]
struct OtlpResource {
    attributes: Vec<OtlpAttribute>,
}

#[derive(Serialize)]
struct ScopeSpans {
    scope: OtlpScope,
    spans: Vec<OtlpSpan>,
}

#[derive(Serialize)]
struct OtlpScope {
    name: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OtlpSpan {
    trace_id: String,
    span_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    parent_span_id: String,
    name: String,
    kind: u8,
    start_time_unix_nano: String,
    end_time_unix_nano: String,
    attributes: Vec<OtlpAttribute>,
    events: Vec<OtlpEvent>,
    status: OtlpStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OtlpEvent {
    time_unix_nano: String,
    name: String,
    attributes: Vec<OtlpAttribute>,
}

#[derive(Serialize)]
struct OtlpStatus {
    code: u8,
    #[serde(skip_serializing_if = "String::is_empty")]
    message: String,
}

#[derive(Serialize)]
struct OtlpAttribute {
    key: String,
    value: OtlpValue,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum OtlpValue {
    BoolValue(bool),
    IntValue(String),
    DoubleValue(f64),
    StringValue(String),
}

impl From<&Value> for OtlpValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Bool(b) => Self::BoolValue(*b),
            // OTLP JSON encodes 64-bit integers as strings.
            Value::I64(i) => Self::IntValue(i.to_string()),
            Value::F64(f) => Self::DoubleValue(*f),
            Value::String(s) => Self::StringValue(s.as_str().to_string()),
            Value::Array(_) => Self::StringValue(value.as_str().into_owned()),
            _ => Self::StringValue(value.as_str().into_owned()),
        }
    }
}

fn attribute(key: impl ToString, value: &Value) -> OtlpAttribute {
    OtlpAttribute {
        key: key.to_string(),
        value: OtlpValue::from(value),
    }
}

fn attributes(pairs: &[KeyValue]) -> Vec<OtlpAttribute> {
    pairs.iter().map(|kv| attribute(&kv.key, &kv.value)).collect()
}

fn unix_nanos(time: SystemTime) -> String {
    time.duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default()
        .to_string()
}

const fn kind_code(kind: &SpanKind) -> u8 {
    match kind {
        SpanKind::Internal => 1,
        SpanKind::Server => 2,
        SpanKind::Client => 3,
        SpanKind::Producer => 4,
        SpanKind::Consumer => 5,
    }
}

impl From<&SpanData> for OtlpSpan {
    fn from(span: &SpanData) -> Self {
        let (code, message) = match &span.status {
            Status::Unset => (0, String::new()),
            Status::Ok => (1, String::new()),
            Status::Error { description } => (2, description.to_string()),
        };

        Self {
            trace_id: format!("{:032x}", span.span_context.trace_id()),
            span_id: format!("{:016x}", span.span_context.span_id()),
            parent_span_id: if span.parent_span_id == SpanId::INVALID {
                String::new()
            } else {
                format!("{:016x}", span.parent_span_id)
            },
            name: span.name.to_string(),
            kind: kind_code(&span.span_kind),
            start_time_unix_nano: unix_nanos(span.start_time),
            end_time_unix_nano: unix_nanos(span.end_time),
            attributes: attributes(&span.attributes),
            events: span
                .events
                .iter()
                .map(|event| OtlpEvent {
                    time_unix_nano: unix_nanos(event.timestamp),
                    name: event.name.to_string(),
                    attributes: attributes(&event.attributes),
                })
                .collect(),
            status: OtlpStatus { code, message },
        }
    }
}

/// Span exporter appending one JSON document per batch to a rotating file.
#[derive(Debug)]
pub struct JsonLinesExporter {
    file: RotatingFile,
    resource: Resource,
    is_shutdown: bool,
}

impl JsonLinesExporter {
    /// Creates an exporter writing to `file` and tagging batches with
    /// `resource`.
    #[must_use]
    pub const fn new(file: RotatingFile, resource: Resource) -> Self {
        Self {
            file,
            resource,
            is_shutdown: false,
        }
    }

    fn document(&self, batch: &[SpanData]) -> ExportDocument {
        ExportDocument {
            resource_spans: vec![ResourceSpans {
                resource: OtlpResource {
                    attributes: self
                        .resource
                        .iter()
                        .map(|(key, value)| attribute(key, value))
                        .collect(),
                },
                scope_spans: vec![ScopeSpans {
                    scope: OtlpScope { name: SCOPE_NAME },
                    spans: batch.iter().map(OtlpSpan::from).collect(),
                }],
            }],
        }
    }

    fn write_batch(&mut self, batch: &[SpanData]) -> ExportResult {
        let line = serde_json::to_string(&self.document(batch))
            .map_err(|e| TraceError::from(e.to_string()))?;
        self.file
            .write_line(&line)
            .map_err(|e| TraceError::from(e.to_string()))
    }
}

impl SpanExporter for JsonLinesExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = if self.is_shutdown {
            Err(TraceError::from("exporter is shut down"))
        } else {
            self.write_batch(&batch)
        };
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown = true;
    }

    fn set_resource(&mut self, resource: &Resource) {
        self.resource = resource.clone();
    }
}

/// Builds a tracer provider exporting every finished span to `file_path`.
#[must_use]
pub fn create_tracer_provider(file_path: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = JsonLinesExporter::new(RotatingFile::new(file_path), resource.clone());

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::{Span, Tracer, TracerProvider as _};

    #[test]
    fn finished_spans_are_written_as_otlp_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("otlp.json");
        let resource = Resource::new(vec![KeyValue::new("service.name", "pixfeed-test")]);
        let provider = create_tracer_provider(path.clone(), resource);

        let tracer = provider.tracer("test");
        let mut span = tracer.start("fetch");
        span.set_attribute(KeyValue::new("page", 2_i64));
        span.end();
        for result in provider.force_flush() {
            result.unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let line = contents.lines().next().unwrap();
        let doc: serde_json::Value = serde_json::from_str(line).unwrap();
        let resource_spans = &doc["resourceSpans"][0];
        let span = &resource_spans["scopeSpans"][0]["spans"][0];

        let service = resource_spans["resource"]["attributes"]
            .as_array()
            .unwrap()
            .iter()
            .find(|attr| attr["key"] == "service.name")
            .unwrap();
        assert_eq!(service["value"]["stringValue"], "pixfeed-test");
        assert_eq!(span["name"], "fetch");
        assert_eq!(span["attributes"][0]["value"]["intValue"], "2");
        assert_eq!(span["traceId"].as_str().map(str::len), Some(32));
        assert!(span.get("parentSpanId").is_none());
    }
}
