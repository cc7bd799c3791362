//! zlistings: a Zellij plugin for searching a listing directory.
//!
//! zlistings puts a search box in a Zellij pane, backed by a REST directory
//! API. It provides:
//! - Search-as-you-type against `GET /api/listings`, from the second character on
//! - A result cache with a freshness window, request de-duplication and
//!   background refresh of stale entries
//! - Automatic retries with backoff for transient network failures
//! - Keyboard and mouse selection over the results, ending on a detail page
//! - Protection against slow responses overwriting newer results
#![allow(clippy::multiple_crate_versions)]
//!
//! # Architecture
//!
//! The crate follows a layered, sans-IO architecture: the library never
//! performs I/O. Everything effectful is an [`Action`] executed by the plugin
//! shim, and every completion comes back as an [`Event`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs, shim.rs)              │  ← Entry point, wasm only
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, action emission                  │
//! │  - Search session, cursor, detail page              │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Store Layer   │   │ Runtime       │
//! │ (ui/)         │   │ (store/)      │   │ (runtime/)    │
//! │ - Rendering   │   │ - Cache       │   │ - Timer queue │
//! │ - Theming     │   │ - Retry       │   │ - Request ctx │
//! │ - Components  │   │ - Tickets     │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain Layer (domain/)                             │
//! │  - Listing, paginated result, query parameters      │
//! │  - Error types                                      │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry tracing, file-based OTLP export    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/zlistings.wasm" {
//!         api_url "http://localhost:3000"
//!         freshness_secs "30"
//!         blur_reset "cancel_on_focus"
//!         theme "catppuccin-mocha"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! See [`Config`] for every option.
//!
//! # Examples
//!
//! ```rust
//! use zlistings::{handle_event, initialize, Action, Config, Event, Route};
//!
//! let mut state = initialize(&Config::default())?;
//!
//! for c in "ca".chars() {
//!     handle_event(&mut state, &Event::Char(c), 0)?;
//! }
//! let request = state.store.in_flight();
//! assert_eq!(request, 1);
//!
//! let (_, actions) = handle_event(&mut state, &Event::Open(Route::Detail(7)), 5)?;
//! assert!(matches!(actions[0], Action::HttpGet { .. }));
//! # Ok::<(), zlistings::ListingsError>(())
//! ```
//!
//! # Platform Support
//!
//! - **Target**: `wasm32-wasip1` (Zellij WASM runtime)
//! - **Native builds**: the library and its tests build natively; the binary
//!   only does something useful inside Zellij

pub mod app;
pub mod domain;
pub mod observability;
pub mod runtime;
pub mod store;
pub mod ui;

pub use app::{handle_event, Action, AppState, BlurResetPolicy, Event, Route};
pub use domain::{Listing, ListingsError, PaginatedResult, QueryParams, Result};
pub use ui::Theme;

use app::SearchSettings;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;
use store::{ListingStore, QueryCache, RetryPolicy};
use url::Url;

/// Default base URL of the directory API.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Plugin configuration parsed from Zellij's configuration system.
///
/// # Example
///
/// ```kdl
/// plugin location="file:/path/to/zlistings.wasm" {
///     api_url "https://directory.example/v1"
///     min_query_len "2"
///     search_limit "10"
///     freshness_secs "30"
///     max_retries "2"
///     retry_backoff_ms "300"
///     request_timeout_ms "10000"
///     blur_reset_delay_ms "200"
///     blur_reset "unconditional"
///     cache_capacity "64"
///     theme_file "/path/to/theme.toml"
///     trace_level "debug"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the directory API. `/api/listings` is appended to its path.
    pub api_url: String,

    /// Characters required before a search is issued. Default: 2
    pub min_query_len: usize,

    /// Page size of search queries. Default: 10
    pub search_limit: u32,

    /// Age in seconds below which cached pages are served without refetching.
    /// Default: 30
    pub freshness_secs: u64,

    /// Additional attempts after a transient failure. Default: 2
    pub max_retries: u32,

    /// Delay before the first retry; doubles for each further one. Default: 300
    pub retry_backoff_ms: u64,

    /// Per-attempt timeout. Default: 10000
    pub request_timeout_ms: u64,

    /// Delay between losing focus and closing the result panel. Default: 200
    pub blur_reset_delay_ms: u64,

    /// Whether refocusing cancels the delayed blur reset.
    pub blur_reset: BlurResetPolicy,

    /// Number of distinct queries kept in the cache. Default: 64
    pub cache_capacity: usize,

    /// Built-in theme name to use.
    ///
    /// Options: `catppuccin-mocha`, `catppuccin-latte`. Ignored if
    /// `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file.
    ///
    /// Takes precedence over `theme_name`. See [`ui::theme`] for format.
    pub theme_file: Option<String>,

    /// Tracing level for OpenTelemetry spans.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            min_query_len: app::search::DEFAULT_MIN_QUERY_LEN,
            search_limit: domain::query::DEFAULT_LIMIT,
            freshness_secs: 30,
            max_retries: store::retry::DEFAULT_MAX_RETRIES,
            retry_backoff_ms: store::retry::DEFAULT_BACKOFF_MS,
            request_timeout_ms: store::retry::DEFAULT_REQUEST_TIMEOUT_MS,
            blur_reset_delay_ms: app::search::DEFAULT_BLUR_RESET_DELAY_MS,
            blur_reset: BlurResetPolicy::default(),
            cache_capacity: store::cache::DEFAULT_CAPACITY,
            theme_name: None,
            theme_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Values that fail to parse are logged at `warn` and replaced by their
    /// default. Unknown keys are ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use zlistings::{BlurResetPolicy, Config};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("api_url".to_string(), "https://directory.example".to_string());
    /// map.insert("freshness_secs".to_string(), "60".to_string());
    /// map.insert("max_retries".to_string(), "many".to_string());
    /// map.insert("blur_reset".to_string(), "unconditional".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.api_url, "https://directory.example");
    /// assert_eq!(config.freshness_secs, 60);
    /// assert_eq!(config.max_retries, 2);
    /// assert_eq!(config.blur_reset, BlurResetPolicy::Unconditional);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();

        Self {
            api_url: config
                .get("api_url")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.api_url),
            min_query_len: parse_or(config, "min_query_len", defaults.min_query_len),
            search_limit: parse_or(config, "search_limit", defaults.search_limit),
            freshness_secs: parse_or(config, "freshness_secs", defaults.freshness_secs),
            max_retries: parse_or(config, "max_retries", defaults.max_retries),
            retry_backoff_ms: parse_or(config, "retry_backoff_ms", defaults.retry_backoff_ms),
            request_timeout_ms: parse_or(config, "request_timeout_ms", defaults.request_timeout_ms),
            blur_reset_delay_ms: parse_or(config, "blur_reset_delay_ms", defaults.blur_reset_delay_ms),
            blur_reset: parse_or(config, "blur_reset", defaults.blur_reset),
            cache_capacity: parse_or(config, "cache_capacity", defaults.cache_capacity),
            theme_name: config.get("theme").cloned(),
            theme_file: config.get("theme_file").cloned(),
            trace_level: config.get("trace_level").cloned(),
        }
    }

    /// Checks values that have no sensible fallback.
    ///
    /// # Errors
    ///
    /// Returns [`ListingsError::Config`] if `api_url` is not an absolute
    /// http(s) URL, or if `min_query_len` or `search_limit` is zero.
    pub fn validate(&self) -> Result<()> {
        self.api_base()?;
        if self.min_query_len == 0 {
            return Err(ListingsError::Config("min_query_len must be at least 1".to_string()));
        }
        if self.search_limit == 0 {
            return Err(ListingsError::Config("search_limit must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Parses `api_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ListingsError::Config`] for unparseable URLs and for
    /// schemes other than `http` and `https`.
    pub fn api_base(&self) -> Result<Url> {
        let url = Url::parse(&self.api_url)
            .map_err(|e| ListingsError::Config(format!("invalid api_url {:?}: {e}", self.api_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ListingsError::Config(format!(
                "api_url must use http or https, got {}",
                url.scheme()
            )));
        }
        Ok(url)
    }

    #[must_use]
    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            min_query_len: self.min_query_len,
            limit: self.search_limit,
            blur_reset_delay_ms: self.blur_reset_delay_ms,
            blur_policy: self.blur_reset,
        }
    }

    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_backoff_ms: self.retry_backoff_ms,
            request_timeout_ms: self.request_timeout_ms,
        }
    }

    #[must_use]
    pub fn query_cache(&self) -> QueryCache {
        let freshness_ms = i64::try_from(self.freshness_secs.saturating_mul(1000)).unwrap_or(i64::MAX);
        QueryCache::new(freshness_ms, self.cache_capacity)
    }

    fn theme(&self) -> Theme {
        if let Some(theme_file) = &self.theme_file {
            return Theme::from_file(runtime::paths::expand_tilde(theme_file)).unwrap_or_else(|e| {
                tracing::warn!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            });
        }

        self.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
            Theme::from_name(theme_name).unwrap_or_else(|| {
                tracing::warn!(theme_name = %theme_name, "unknown theme, using default");
                Theme::default()
            })
        })
    }
}

fn parse_or<T>(config: &BTreeMap<String, String>, key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    let Some(raw) = config.get(key) else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|e| {
        tracing::warn!(key, value = %raw, error = %e, "invalid config value, using default");
        default
    })
}

/// Initializes the plugin state from configuration.
///
/// Creates the listing store with the configured cache and retry policy,
/// loads the theme (from file, name, or default) and starts on an empty,
/// focused search page.
///
/// # Errors
///
/// Returns [`ListingsError::Config`] if the configuration fails
/// [`Config::validate`].
///
/// # Example
///
/// ```rust
/// use zlistings::{initialize, Config, Route};
///
/// let state = initialize(&Config::default())?;
/// assert_eq!(state.route(), Route::Search);
/// # Ok::<(), zlistings::ListingsError>(())
/// ```
pub fn initialize(config: &Config) -> Result<AppState> {
    tracing::debug!(api_url = %config.api_url, "initializing zlistings plugin");

    config.validate()?;
    let store = ListingStore::new(config.api_base()?, config.retry_policy(), config.query_cache());

    Ok(AppState::new(store, config.search_settings(), config.theme()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn empty_map_gives_defaults() {
        assert_eq!(Config::from_zellij(&BTreeMap::new()), Config::default());
    }

    #[test]
    fn parses_every_numeric_option() {
        let config = Config::from_zellij(&map(&[
            ("min_query_len", "3"),
            ("search_limit", "25"),
            ("freshness_secs", "5"),
            ("max_retries", "0"),
            ("retry_backoff_ms", "50"),
            ("request_timeout_ms", "2500"),
            ("blur_reset_delay_ms", "0"),
            ("cache_capacity", "8"),
        ]));

        assert_eq!(config.min_query_len, 3);
        assert_eq!(config.search_limit, 25);
        assert_eq!(config.query_cache().len(), 0);
        assert_eq!(config.retry_policy().max_retries, 0);
        assert_eq!(config.retry_policy().base_backoff_ms, 50);
        assert_eq!(config.retry_policy().request_timeout_ms, 2500);
        assert_eq!(config.search_settings().blur_reset_delay_ms, 0);
        assert_eq!(config.cache_capacity, 8);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = Config::from_zellij(&map(&[
            ("search_limit", "-1"),
            ("blur_reset", "sometimes"),
            ("api_url", "   "),
        ]));
        assert_eq!(config.search_limit, 10);
        assert_eq!(config.blur_reset, BlurResetPolicy::CancelOnFocus);
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn rejects_unusable_api_url() {
        for url in ["not a url", "ftp://files.example", "mailto:someone@example.com"] {
            let config = Config {
                api_url: url.to_string(),
                ..Config::default()
            };
            assert!(matches!(config.validate(), Err(ListingsError::Config(_))), "{url}");
            assert!(initialize(&config).is_err());
        }
    }

    #[test]
    fn rejects_zero_limits() {
        let config = Config {
            search_limit: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let config = Config {
            theme_name: Some("neon".to_string()),
            ..Config::default()
        };
        let state = initialize(&config).unwrap();
        assert_eq!(state.theme.name, Theme::default().name);
    }
}
