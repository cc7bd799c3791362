//! Retry policy and HTTP response classification.
//!
//! Every response is classified into a decoded page or a [`ListingsError`].
//! Only [`ListingsError::NetworkTransient`] failures are retried, with a
//! doubling backoff, up to a fixed number of extra attempts.

use crate::domain::{ListingsError, PaginatedResult, Result};

/// Default number of additional attempts after the first one fails.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default delay before the first retry.
pub const DEFAULT_BACKOFF_MS: u64 = 300;

/// Default per-attempt timeout.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Retry and timeout settings applied to every fetch.
///
/// # Examples
///
/// ```
/// use zlistings::store::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.backoff_ms(1), 300);
/// assert_eq!(policy.backoff_ms(2), 600);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_backoff_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_backoff_ms: DEFAULT_BACKOFF_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl RetryPolicy {
    /// Decides whether `err` earns another attempt, given how many retries
    /// have already been spent on the current fetch.
    #[must_use]
    pub const fn should_retry(&self, err: &ListingsError, retries_used: u32) -> bool {
        err.is_retryable() && retries_used < self.max_retries
    }

    /// Delay before retry number `retry` (1-based).
    #[must_use]
    pub fn backoff_ms(&self, retry: u32) -> u64 {
        let shift = retry.saturating_sub(1).min(16);
        self.base_backoff_ms.saturating_mul(1 << shift)
    }
}

/// Turns a raw HTTP completion into a page or a classified failure.
///
/// Status `0` is what Zellij reports when the request never reached a
/// server.
///
/// # Errors
///
/// - [`ListingsError::NetworkTransient`] for status 0, 408, 429 and 5xx
/// - [`ListingsError::Malformed`] for any other non-2xx status, or a 2xx
///   body that does not decode into a valid page
pub fn classify_response(status: u16, body: &[u8]) -> Result<PaginatedResult> {
    match status {
        200..=299 => PaginatedResult::from_slice(body),
        0 => Err(ListingsError::NetworkTransient("request did not reach the server".to_string())),
        408 | 429 | 500..=599 => Err(ListingsError::NetworkTransient(format!("server answered HTTP {status}"))),
        _ => Err(ListingsError::Malformed(format!("server rejected request with HTTP {status}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::fixtures::{body, listing};

    #[test]
    fn backoff_doubles_per_retry() {
        let policy = RetryPolicy {
            base_backoff_ms: 100,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff_ms(1), 100);
        assert_eq!(policy.backoff_ms(2), 200);
        assert_eq!(policy.backoff_ms(3), 400);
    }

    #[test]
    fn retries_stop_at_budget() {
        let policy = RetryPolicy::default();
        let transient = ListingsError::NetworkTransient("503".into());
        assert!(policy.should_retry(&transient, 0));
        assert!(policy.should_retry(&transient, 1));
        assert!(!policy.should_retry(&transient, 2));
        assert!(!policy.should_retry(&ListingsError::Malformed("400".into()), 0));
    }

    #[test]
    fn classifies_statuses() {
        for status in [0, 408, 429, 500, 503] {
            let err = classify_response(status, b"").unwrap_err();
            assert!(err.is_retryable(), "status {status}");
        }
        for status in [400, 401, 404] {
            let err = classify_response(status, b"").unwrap_err();
            assert!(matches!(err, ListingsError::Malformed(_)), "status {status}");
        }
    }

    #[test]
    fn decodes_successful_body() {
        let page = classify_response(200, &body(vec![listing(1, "Cafe")])).unwrap();
        assert_eq!(page.data[0].title, "Cafe");
        assert!(matches!(classify_response(200, b"{}"), Err(ListingsError::Malformed(_))));
    }
}
