//! # threadline-store: Client State and Checkout
//!
//! Mirrors the backend into per-domain slices and runs the checkout state
//! machine that turns a cart into exactly one order.
//!
//! ## Module Organization
//! ```text
//! threadline_store/
//! ├── lib.rs          ◄─── You are here
//! ├── slice.rs        ◄─── Slice trait + SliceCell (reducer behind a lock)
//! ├── slices/         ◄─── cart, orders, addresses, reseller, notifications
//! ├── checkout.rs     ◄─── CheckoutSession phase machine
//! ├── payment.rs      ◄─── PaymentGateway seam, PaymentFlow
//! ├── navigation.rs   ◄─── Route, RouteTree per role
//! ├── store.rs        ◄─── Store (all slices over one ApiClient)
//! └── error.rs        ◄─── StoreError
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use threadline_api::{ApiClient, AuthToken, ClientConfig};
//! use threadline_store::{CheckoutOutcome, Store};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::load_or_default(None);
//! let api = ApiClient::from_config(&config, AuthToken::new(config.auth.token.clone()))?;
//! let store = Store::new(api);
//!
//! let checkout = store.checkout();
//! checkout.begin().await?;
//! checkout.confirm()?;
//! match checkout.place_order().await? {
//!     CheckoutOutcome::Confirmed(order) => println!("Placed {}", order.order_no),
//!     CheckoutOutcome::AwaitingPayment(order) => println!("Pay {} for {}", order.total, order.order_no),
//! }
//! # Ok(())
//! # }
//! ```

pub mod checkout;
pub mod error;
pub mod navigation;
pub mod payment;
pub mod slice;
pub mod slices;
pub mod store;

pub use checkout::{
    CheckoutError, CheckoutOutcome, CheckoutPhase, CheckoutSession, CheckoutSnapshot,
    ExitDecision, PLACING_ORDER_NOTICE,
};
pub use error::{StoreError, StoreResult};
pub use navigation::{Route, RouteTree, Screen};
pub use payment::{GatewayResult, MockPaymentGateway, PaymentFlow, PaymentGateway, PaymentOutcome};
pub use slice::{Slice, SliceCell};
pub use slices::*;
pub use store::Store;
