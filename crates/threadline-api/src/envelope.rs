//! # Response Envelope
//!
//! Every backend response is wrapped the same way:
//!
//! ```json
//! { "success": true, "data": { ... }, "message": "optional text" }
//! ```
//!
//! ```text
//!   status  success  →  result
//!   ──────  ───────     ──────────────────────────────────────────────
//!   2xx     true        Ok(data)              (missing data → null)
//!   2xx     <empty>     Ok(null)              (e.g. 204 No Content)
//!   2xx     false       Server{status, message or fallback}
//!   2xx     <garbage>   Decode
//!   4xx/5xx  any        Server{status, message or status fallback}
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: Option<String>,
}

fn default_success() -> bool {
    true
}

/// Unwraps a raw response into its `data` payload.
pub fn into_payload(status: u16, body: &[u8]) -> ApiResult<Value> {
    if !(200..300).contains(&status) {
        // Error bodies are best effort: proxies return HTML, timeouts return nothing
        let message = serde_json::from_slice::<Envelope>(body)
            .ok()
            .and_then(|e| e.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| status_fallback(status).to_string());
        return Err(ApiError::Server { status, message });
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    let envelope: Envelope = serde_json::from_slice(body)?;
    if !envelope.success {
        let message = envelope
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| status_fallback(status).to_string());
        return Err(ApiError::Server { status, message });
    }

    Ok(envelope.data)
}

fn status_fallback(status: u16) -> &'static str {
    match status {
        401 => "Your session has expired. Please sign in again.",
        403 => "You are not allowed to do that.",
        404 => "The requested item could not be found.",
        429 => "Too many requests. Please wait a moment and try again.",
        500..=599 => "The server ran into a problem. Please try again.",
        _ => "Request failed. Please try again.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_returns_data() {
        let body = br#"{"success": true, "data": {"totalItems": 2}}"#;
        assert_eq!(into_payload(200, body).unwrap(), json!({"totalItems": 2}));
    }

    #[test]
    fn test_missing_data_is_null() {
        let body = br#"{"success": true, "message": "Cart cleared"}"#;
        assert_eq!(into_payload(200, body).unwrap(), Value::Null);
    }

    #[test]
    fn test_empty_success_body_is_null() {
        assert_eq!(into_payload(204, b"").unwrap(), Value::Null);
        assert_eq!(into_payload(200, b" \n").unwrap(), Value::Null);
    }

    #[test]
    fn test_error_status_uses_envelope_message() {
        let body = br#"{"success": false, "message": "Insufficient stock"}"#;
        let err = into_payload(400, body).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Server { status: 400, ref message } if message == "Insufficient stock"
        ));
    }

    #[test]
    fn test_error_status_without_body_falls_back() {
        let err = into_payload(502, b"<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(
            err.user_message(),
            "The server ran into a problem. Please try again."
        );
    }

    #[test]
    fn test_success_false_on_2xx_is_business_error() {
        let body = br#"{"success": false, "message": "Coupon expired"}"#;
        let err = into_payload(200, body).unwrap_err();
        assert!(err.is_business());
        assert_eq!(err.user_message(), "Coupon expired");
    }

    #[test]
    fn test_garbage_2xx_is_decode_error() {
        let err = into_payload(200, b"not json").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
