//! Tracing subscriber setup.

use super::exporter::{create_tracer_provider, SCOPE_NAME};
use crate::domain::Result;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use std::path::{Path, PathBuf};
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name of the trace file inside the data directory.
pub const TRACE_FILE_NAME: &str = "pixfeed-otlp.json";

/// Installs the global subscriber, exporting spans to the data directory.
///
/// Returns the trace file path. Only the first successful call in a process
/// installs a subscriber; later calls still report the path.
///
/// # Errors
///
/// Returns [`FeedError::Io`](crate::FeedError::Io) if the data directory
/// cannot be created.
pub fn init_tracing(config: &Config) -> Result<PathBuf> {
    init_tracing_in(config, &crate::infrastructure::get_data_dir())
}

/// Same as [`init_tracing`] with an explicit output directory.
///
/// # Errors
///
/// Returns [`FeedError::Io`](crate::FeedError::Io) if `dir` cannot be
/// created.
pub fn init_tracing_in(config: &Config, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let trace_file = dir.join(TRACE_FILE_NAME);

    let resource = Resource::new(vec![
        opentelemetry::KeyValue::new("service.name", SCOPE_NAME),
        opentelemetry::KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = create_tracer_provider(trace_file.clone(), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SCOPE_NAME));

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.trace_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("global subscriber already installed");
    }

    Ok(trace_file)
}
