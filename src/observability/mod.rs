//! OpenTelemetry tracing with file-based OTLP export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK TracerProvider → JsonFileExporter → rotating file
//! ```
//!
//! - Traces go to `~/.local/share/zellij/zlistings/zlistings-otlp.json`
//!   (`/host/...` inside the sandbox), one OTLP JSON document per line
//! - The file rotates at 10 MB, keeping 3 numbered backups
//! - The level comes from the `trace_level` plugin option, default `"info"`
//!
//! Spans worth knowing: `handle_event` (every event, debug). The store logs
//! each request's lifecycle as events: `issuing fetch`, `scheduling retry`,
//! `fetch settled`, `fetch failed`.

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, trace_file};
