//! OpenTelemetry tracing with file-based export.
//!
//! ```text
//! tracing spans → tracing-opentelemetry → SDK provider → JsonLinesExporter → RotatingFile
//! ```
//!
//! Spans land in `pixfeed-otlp.json` in the data directory, one OTLP JSON
//! document per line, rotated at 10 MB with 3 backups.
//!
//! The filter comes from `RUST_LOG` when set, else `Config::trace_level`,
//! else `info`.
//!
//! # Usage
//!
//! ```no_run
//! use pixfeed::observability::init_tracing;
//! use pixfeed::Config;
//!
//! let trace_file = init_tracing(&Config::default())?;
//! tracing::info!(path = %trace_file.display(), "tracing active");
//! # Ok::<(), pixfeed::FeedError>(())
//! ```

mod exporter;
mod file_writer;
mod init;

pub use exporter::{create_tracer_provider, JsonLinesExporter};
pub use file_writer::RotatingFile;
pub use init::{init_tracing, init_tracing_in, TRACE_FILE_NAME};
