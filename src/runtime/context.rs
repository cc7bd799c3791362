//! Web request context encoding.
//!
//! Zellij's `web_request` echoes an opaque string map back in the matching
//! `WebRequestResult` event. The request id is stored there so a response
//! can be matched to the attempt that produced it, whatever order responses
//! arrive in.

use std::collections::BTreeMap;

/// Identifier of one HTTP attempt. Retries get a fresh id.
pub type RequestId = u64;

/// Context key carrying the request id.
pub const REQUEST_ID_KEY: &str = "zlistings.request_id";

/// Builds the context map attached to an outgoing request.
#[must_use]
pub fn request_context(request: RequestId) -> BTreeMap<String, String> {
    BTreeMap::from([(REQUEST_ID_KEY.to_string(), request.to_string())])
}

/// Extracts the request id from a response context.
///
/// Returns `None` for responses that did not originate from this plugin or
/// whose context was mangled.
#[must_use]
pub fn request_id_from_context(context: &BTreeMap<String, String>) -> Option<RequestId> {
    context.get(REQUEST_ID_KEY)?.parse().ok()
}

/// Headers sent with every listings request.
#[must_use]
pub fn json_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Accept".to_string(), "application/json".to_string()),
        ("Content-Type".to_string(), "application/json".to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_survives_context_round_trip() {
        assert_eq!(request_id_from_context(&request_context(17)), Some(17));
    }

    #[test]
    fn foreign_context_is_ignored() {
        let mut context = BTreeMap::new();
        assert_eq!(request_id_from_context(&context), None);
        context.insert(REQUEST_ID_KEY.to_string(), "not-a-number".to_string());
        assert_eq!(request_id_from_context(&context), None);
    }
}
