//! # threadline-core: Domain Types for the Threadline Storefront
//!
//! Entities, money math and client-side rules shared by every other crate.
//! Nothing in here talks to the network.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Threadline Client Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Screens / shop-cli commands                        │   │
//! │  │    Cart ──► Checkout ──► OrderSuccess | PaymentGateway          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │      threadline-store (slices, checkout orchestration)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │      threadline-api (REST client, envelope, errors)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ threadline-core (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ validation│  │   │
//! │  │   │ Cart      │  │   Money   │  │ Preview   │  │  address  │  │   │
//! │  │   │ Order     │  │  TaxRate  │  │ (display) │  │  quantity │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities as the backend returns them (Cart, Order, Wallet, ...)
//! - [`money`] - Money in integer paise with rupee wire encoding
//! - [`pricing`] - Display-only checkout price preview
//! - [`validation`] - Pre-request input checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use threadline_core::money::Money;
//! use threadline_core::pricing::PricePreview;
//!
//! let preview = PricePreview::for_subtotal(Money::from_rupees(600));
//! assert!(preview.shipping.is_zero());
//! assert_eq!(preview.tax, Money::from_rupees(108));
//! ```

pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use pricing::PricePreview;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single cart line.
pub const MAX_ITEM_QUANTITY: i64 = 10;

/// Subtotals strictly above this (in paise) ship free in the preview.
pub const FREE_SHIPPING_THRESHOLD_PAISE: i64 = 500_00;

/// Flat shipping fee (in paise) shown in the preview below the threshold.
pub const FLAT_SHIPPING_FEE_PAISE: i64 = 50_00;

/// GST applied in the checkout preview, in basis points (18%).
pub const GST_RATE_BPS: u32 = 1800;

/// Smallest wallet withdrawal a reseller may request (in paise).
pub const MIN_WITHDRAWAL_PAISE: i64 = 100_00;
