//! # Store Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Store Error Flow                                 │
//! │                                                                         │
//! │  ValidationError ──► StoreError::Validation ──┐                         │
//! │  ApiError ─────────► StoreError::Api ─────────┼──► CheckoutError        │
//! │  (gate)            ► StoreError::UpdateInFlight┘    (see checkout.rs)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use threadline_api::ApiError;
use threadline_core::ValidationError;

/// Result type alias for slice operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Input rejected before any request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A quantity update is still outstanding; this one was dropped.
    #[error("A cart update is already in progress")]
    UpdateInFlight,
}

impl StoreError {
    /// Text for the inline alert / error banner.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, StoreError::Api(e) if e.is_network())
    }
}
