//! Span exporter writing OTLP JSON lines to a local file.
//!
//! A Zellij plugin has no collector to talk to, so exported spans go to a
//! rotating file under the plugin data directory instead of the network.

use super::file_writer::FileWriter;
use super::span_formatter::{SpanFormatter, SCOPE_NAME};
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;

/// Writes one OTLP JSON document per export batch.
#[derive(Debug)]
struct JsonFileExporter {
    writer: FileWriter,
    formatter: SpanFormatter,
    is_shutdown: bool,
}

impl JsonFileExporter {
    fn new(writer: FileWriter, resource: &Resource) -> Self {
        Self {
            writer,
            formatter: SpanFormatter::new(resource),
            is_shutdown: false,
        }
    }

    fn write_batch(&self, batch: &[SpanData]) -> ExportResult {
        if self.is_shutdown {
            return Err(TraceError::from("exporter is shut down"));
        }
        let line = self
            .formatter
            .format_batch(batch)
            .map_err(|e| TraceError::from(format!("failed to encode spans: {e}")))?;
        self.writer
            .write_line(&line)
            .map_err(|e| TraceError::from(format!("failed to write {}: {e}", self.writer.path().display())))
    }
}

impl SpanExporter for JsonFileExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = self.write_batch(&batch);
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown = true;
    }
}

/// Builds a tracer provider that exports every finished span immediately.
///
/// The plugin is single-threaded wasm without an async runtime, so the
/// simple (synchronous) span processor is used instead of a batching one.
pub fn create_tracer_provider(file_path: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = JsonFileExporter::new(FileWriter::new(file_path), &resource);

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}

/// Name under which the plugin's tracer is registered.
pub const TRACER_NAME: &str = SCOPE_NAME;
