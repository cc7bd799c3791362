//! Tracing subscriber setup.

use super::tracer::{self, TRACER_NAME};
use crate::runtime::paths::data_dir;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use std::path::PathBuf;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name of the active trace file inside [`data_dir`].
pub const TRACE_FILE_NAME: &str = "zlistings-otlp.json";

/// Default filter when `trace_level` is not configured.
pub const DEFAULT_TRACE_LEVEL: &str = "info";

/// Full path of the active trace file.
#[must_use]
pub fn trace_file() -> PathBuf {
    data_dir().join(TRACE_FILE_NAME)
}

/// Installs the global subscriber: an [`EnvFilter`] built from
/// `config.trace_level` in front of an OpenTelemetry layer exporting to
/// [`trace_file`].
///
/// `trace_level` accepts any `EnvFilter` directive, e.g. `"debug"` or
/// `"zlistings::store=trace,info"`. An invalid directive falls back to
/// [`DEFAULT_TRACE_LEVEL`].
///
/// Tracing is optional: if the data directory cannot be created the plugin
/// runs without a subscriber. Calling this more than once is harmless; only
/// the first call installs anything.
///
/// # Example
///
/// ```rust
/// use zlistings::observability::init_tracing;
/// use zlistings::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let dir = data_dir();
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }

    let filter = env_filter(config.trace_level.as_deref());
    let resource = Resource::new(vec![
        KeyValue::new("service.name", "zlistings"),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = tracer::create_tracer_provider(trace_file(), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(TRACER_NAME));

    let _ = tracing_subscriber::registry().with(filter).with(otel_layer).try_init();
}

fn env_filter(level: Option<&str>) -> EnvFilter {
    let level = level.unwrap_or(DEFAULT_TRACE_LEVEL);
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_TRACE_LEVEL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_file_lives_in_data_dir() {
        assert_eq!(trace_file(), PathBuf::from("/host/.local/share/zellij/zlistings/zlistings-otlp.json"));
    }

    #[test]
    fn invalid_level_falls_back() {
        assert_eq!(env_filter(Some("zlistings=loud")).to_string(), DEFAULT_TRACE_LEVEL);
        assert_eq!(env_filter(Some("debug")).to_string(), "debug");
    }
}
