//! # Command Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in threadline-shop                        │
//! │                                                                         │
//! │  ApiError ─────────┐                                                    │
//! │  StoreError ───────┤                                                    │
//! │  CheckoutError ────┼──► CommandError { code, message } ──► stderr       │
//! │  CoreError ────────┤        │                                           │
//! │  io / serde_json ──┘        └──► exit code                              │
//! │                                                                         │
//! │  --json: {"code": "BUSINESS", "message": "Product is out of stock"}     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;
use threadline_api::ApiError;
use threadline_core::CoreError;
use threadline_store::{CheckoutError, StoreError};

pub type CommandResult<T> = Result<T, CommandError>;

/// Error returned from a command.
#[derive(Debug, Clone, Error, Serialize)]
#[error("{message}")]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input rejected before any request was sent
    Validation,

    /// The server answered 404
    NotFound,

    /// The server rejected the request
    Business,

    /// The server could not be reached or did not answer in time
    Network,

    /// Config file or URL problem
    Config,

    /// Command not available for the signed-in role
    Forbidden,

    /// Checkout was driven out of order
    Checkout,

    /// Gateway failure or unverified payment
    Payment,

    Internal,
}

impl CommandError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CommandError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CommandError::new(ErrorCode::Validation, message)
    }

    pub fn forbidden(what: &str) -> Self {
        CommandError::new(
            ErrorCode::Forbidden,
            format!("{what} is not available for your account"),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CommandError::new(ErrorCode::Internal, message)
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self.code {
            ErrorCode::Validation | ErrorCode::Checkout => 2,
            ErrorCode::NotFound | ErrorCode::Business => 3,
            ErrorCode::Network => 4,
            ErrorCode::Config => 5,
            ErrorCode::Forbidden => 6,
            ErrorCode::Payment => 7,
            ErrorCode::Internal => 1,
        }
    }
}

impl From<ApiError> for CommandError {
    fn from(err: ApiError) -> Self {
        let code = match &err {
            e if e.is_config_error() => ErrorCode::Config,
            e if e.is_network() => ErrorCode::Network,
            ApiError::Server { status: 404, .. } => ErrorCode::NotFound,
            ApiError::Server { .. } => ErrorCode::Business,
            _ => {
                tracing::error!(error = %err, "Unexpected API failure");
                ErrorCode::Internal
            }
        };
        CommandError::new(code, err.user_message())
    }
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Api(e) => e.into(),
            StoreError::Validation(e) => CommandError::validation(e.to_string()),
            other @ StoreError::UpdateInFlight => {
                CommandError::new(ErrorCode::Business, other.to_string())
            }
        }
    }
}

impl From<CheckoutError> for CommandError {
    fn from(err: CheckoutError) -> Self {
        let code = match &err {
            CheckoutError::Validation(_)
            | CheckoutError::EmptyCart
            | CheckoutError::NoAddressSelected
            | CheckoutError::UnknownAddress(_) => ErrorCode::Validation,
            CheckoutError::AlreadySubmitting | CheckoutError::InvalidTransition { .. } => {
                ErrorCode::Checkout
            }
            CheckoutError::Business(_) => ErrorCode::Business,
            CheckoutError::Network(_) => ErrorCode::Network,
            CheckoutError::Unexpected(_) => ErrorCode::Internal,
        };
        CommandError::new(code, err.user_message())
    }
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        CommandError::validation(err.to_string())
    }
}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::internal(format!("Terminal I/O failed: {err}"))
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(err: serde_json::Error) -> Self {
        CommandError::internal(format!("Could not render output: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use threadline_core::ValidationError;

    #[test]
    fn test_api_error_codes() {
        let err = CommandError::from(ApiError::Server {
            status: 404,
            message: "Order not found".into(),
        });
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Order not found");

        let err = CommandError::from(ApiError::Timeout { secs: 30 });
        assert_eq!(err.code, ErrorCode::Network);
        assert_eq!(err.exit_code(), 4);

        let err = CommandError::from(ApiError::InvalidUrl("ftp://x".into()));
        assert_eq!(err.code, ErrorCode::Config);
    }

    #[test]
    fn test_checkout_error_codes() {
        assert_eq!(
            CommandError::from(CheckoutError::EmptyCart).code,
            ErrorCode::Validation
        );
        assert_eq!(
            CommandError::from(CheckoutError::AlreadySubmitting).code,
            ErrorCode::Checkout
        );
        let err = CommandError::from(CheckoutError::Business("Out of stock".into()));
        assert_eq!(err.code, ErrorCode::Business);
        assert_eq!(err.message, "Out of stock");
    }

    #[test]
    fn test_serializes_code_and_message() {
        let err = CommandError::from(StoreError::from(ValidationError::Required {
            field: "city".into(),
        }));
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION");
        assert_eq!(json["message"], "city is required");
    }
}
