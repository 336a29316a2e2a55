//! # API Error Types
//!
//! Everything that can go wrong between a call site and the backend.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        API Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │    Business     │  │      Network            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Server         │  │  Network                │ │
//! │  │  InvalidUrl     │  │  (status +      │  │  Timeout                │ │
//! │  │  ConfigLoad...  │  │   message)      │  │  (no response arrived)  │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │    Protocol     │  2xx that did not match the envelope or the       │
//! │  │    Decode       │  expected payload shape                           │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `Server` error means the backend answered and said no; its message is
//! user-facing text. `Network` and `Timeout` mean nothing usable came back.
//! Call sites must keep those two cases apart.

use thiserror::Error;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Shown when no server message exists (connection failures, timeouts).
pub const NETWORK_FALLBACK_MESSAGE: &str =
    "Unable to reach the server. Check your connection and try again.";

/// Shown when the server answered with something we could not read.
pub const UNEXPECTED_FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Business Errors
    // =========================================================================
    /// The backend responded with a rejection.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    // =========================================================================
    // Network Errors
    // =========================================================================
    /// The request never reached the server or no response arrived.
    #[error("Network error: {0}")]
    Network(String),

    /// The client timeout elapsed before a response arrived.
    #[error("Request timed out after {secs} seconds")]
    Timeout { secs: u64 },

    // =========================================================================
    // Protocol Errors
    // =========================================================================
    /// A 2xx response that did not match the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ApiError {
    fn from(err: toml::de::Error) -> Self {
        ApiError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ApiError {
    fn from(err: toml::ser::Error) -> Self {
        ApiError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ApiError {
    /// Returns true if no response arrived (connection failure or timeout).
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Timeout { .. })
    }

    /// Returns true if the backend answered with a rejection.
    pub fn is_business(&self) -> bool {
        matches!(self, ApiError::Server { .. })
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidConfig(_)
                | ApiError::InvalidUrl(_)
                | ApiError::ConfigLoadFailed(_)
                | ApiError::ConfigSaveFailed(_)
        )
    }

    /// HTTP status of a server rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text safe to show the user.
    ///
    /// Server rejections are shown verbatim. Network failures carry no
    /// structured message, so they get a generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server { message, .. } => message.clone(),
            ApiError::Network(_) | ApiError::Timeout { .. } => {
                NETWORK_FALLBACK_MESSAGE.to_string()
            }
            ApiError::Decode(_) => UNEXPECTED_FALLBACK_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert!(ApiError::Network("connection refused".into()).is_network());
        assert!(ApiError::Timeout { secs: 30 }.is_network());
        assert!(!ApiError::Server {
            status: 400,
            message: "Insufficient stock".into()
        }
        .is_network());

        assert!(ApiError::InvalidUrl("ftp://x".into()).is_config_error());
        assert!(!ApiError::Decode("bad".into()).is_config_error());
    }

    #[test]
    fn test_user_message() {
        let err = ApiError::Server {
            status: 409,
            message: "Insufficient stock for Linen Kurta".into(),
        };
        assert_eq!(err.user_message(), "Insufficient stock for Linen Kurta");
        assert_eq!(err.status(), Some(409));

        let err = ApiError::Network("dns error".into());
        assert_eq!(err.user_message(), NETWORK_FALLBACK_MESSAGE);

        let err = ApiError::Decode("missing field `total`".into());
        assert_eq!(err.user_message(), UNEXPECTED_FALLBACK_MESSAGE);
    }
}
