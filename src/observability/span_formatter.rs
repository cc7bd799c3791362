//! OTLP JSON encoding of exported spans.
//!
//! Each export batch becomes one `ExportTraceServiceRequest` document, the
//! shape accepted by OTLP/HTTP collectors and by `otel-desktop-viewer`
//! style file importers. The document is modelled with serde types rather
//! than assembled by hand.

use opentelemetry::trace::{SpanId, SpanKind, Status};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use opentelemetry_sdk::resource::Resource;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Instrumentation scope written into every batch.
pub const SCOPE_NAME: &str = "zlistings";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportTraceRequest {
    resource_spans: Vec<ResourceSpans>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourceSpans {
    resource: OtlpResource,
    scope_spans: Vec<ScopeSpans>,
}

#[derive(Debug, Serialize)]
struct OtlpResource {
    attributes: Vec<OtlpKeyValue>,
}

#[derive(Debug, Serialize)]
struct ScopeSpans {
    scope: Scope,
    spans: Vec<OtlpSpan>,
}

#[derive(Debug, Serialize)]
struct Scope {
    name: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OtlpSpan {
    trace_id: String,
    span_id: String,
    /// Empty for root spans.
    parent_span_id: String,
    name: String,
    kind: u8,
    start_time_unix_nano: String,
    end_time_unix_nano: String,
    attributes: Vec<OtlpKeyValue>,
    events: Vec<OtlpEvent>,
    links: Vec<OtlpLink>,
    status: OtlpStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OtlpEvent {
    time_unix_nano: String,
    name: String,
    attributes: Vec<OtlpKeyValue>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OtlpLink {
    trace_id: String,
    span_id: String,
    attributes: Vec<OtlpKeyValue>,
}

#[derive(Debug, Serialize)]
struct OtlpStatus {
    code: u8,
    message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct OtlpKeyValue {
    key: String,
    value: AnyValue,
}

/// OTLP `AnyValue`. 64-bit integers travel as strings, per the OTLP JSON
/// mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
enum AnyValue {
    BoolValue(bool),
    IntValue(String),
    DoubleValue(f64),
    StringValue(String),
}

impl From<&Value> for AnyValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Bool(b) => Self::BoolValue(*b),
            Value::I64(i) => Self::IntValue(i.to_string()),
            Value::F64(f) => Self::DoubleValue(*f),
            Value::String(s) => Self::StringValue(s.to_string()),
            Value::Array(_) => Self::StringValue(value.to_string()),
        }
    }
}

fn key_values(attributes: &[KeyValue]) -> Vec<OtlpKeyValue> {
    attributes
        .iter()
        .map(|kv| OtlpKeyValue {
            key: kv.key.to_string(),
            value: AnyValue::from(&kv.value),
        })
        .collect()
}

fn unix_nanos(time: SystemTime) -> String {
    time.duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos().to_string()
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

/// Encodes span batches against a fixed resource.
pub struct SpanFormatter {
    resource: Vec<OtlpKeyValue>,
}

impl SpanFormatter {
    pub fn new(resource: &Resource) -> Self {
        let resource = resource
            .iter()
            .map(|(key, value)| OtlpKeyValue {
                key: key.to_string(),
                value: AnyValue::from(value),
            })
            .collect();
        Self { resource }
    }

    /// Serializes `batch` as a single-line OTLP JSON document.
    ///
    /// # Errors
    ///
    /// Fails only if serde cannot serialize a value, which for these types
    /// means a non-finite float attribute.
    pub fn format_batch(&self, batch: &[SpanData]) -> serde_json::Result<String> {
        let request = ExportTraceRequest {
            resource_spans: vec![ResourceSpans {
                resource: OtlpResource {
                    attributes: self.resource.clone(),
                },
                scope_spans: vec![ScopeSpans {
                    scope: Scope {
                        name: SCOPE_NAME,
                        version: env!("CARGO_PKG_VERSION"),
                    },
                    spans: batch.iter().map(Self::span).collect(),
                }],
            }],
        };
        serde_json::to_string(&request)
    }

    fn span(span: &SpanData) -> OtlpSpan {
        let (code, message) = match &span.status {
            Status::Unset => (0, String::new()),
            Status::Ok => (1, String::new()),
            Status::Error { description } => (2, description.to_string()),
        };

        OtlpSpan {
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
            attributes: key_values(&span.attributes),
            events: span
                .events
                .iter()
                .map(|event| OtlpEvent {
                    time_unix_nano: unix_nanos(event.timestamp),
                    name: event.name.to_string(),
                    attributes: key_values(&event.attributes),
                })
                .collect(),
            links: span
                .links
                .iter()
                .map(|link| OtlpLink {
                    trace_id: format!("{:032x}", link.span_context.trace_id()),
                    span_id: format!("{:016x}", link.span_context.span_id()),
                    attributes: key_values(&link.attributes),
                })
                .collect(),
            status: OtlpStatus { code, message },
        }
    }
}

impl std::fmt::Debug for SpanFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanFormatter")
            .field("resource_attributes", &self.resource.len())
            .finish()
    }
}
