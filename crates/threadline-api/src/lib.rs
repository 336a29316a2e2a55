//! # threadline-api: REST Client for the Threadline Backend
//!
//! A single configured request/response wrapper: base URL, bearer-token
//! injection, envelope unwrapping and an error taxonomy that keeps
//! "the server said no" apart from "the server never answered".
//!
//! ## Module Organization
//! ```text
//! threadline_api/
//! ├── lib.rs          ◄─── You are here
//! ├── config.rs       ◄─── ClientConfig (TOML + env overrides)
//! ├── auth.rs         ◄─── In-memory bearer token
//! ├── transport.rs    ◄─── Transport trait, HttpTransport (reqwest)
//! ├── envelope.rs     ◄─── {success, data, message?} unwrapping
//! ├── client.rs       ◄─── ApiClient + endpoint group accessors
//! ├── endpoints/      ◄─── cart, addresses, orders, payments, ...
//! ├── requests.rs     ◄─── Request bodies, gateway order, feeds
//! └── error.rs        ◄─── ApiError
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use threadline_api::{ApiClient, AuthToken, ClientConfig};
//!
//! # async fn example() -> threadline_api::ApiResult<()> {
//! let config = ClientConfig::load(None)?;
//! let client = ApiClient::from_config(&config, AuthToken::new(config.auth.token.clone()))?;
//!
//! let cart = client.cart().fetch().await?;
//! println!("{} items, {}", cart.total_items, cart.total_price);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod requests;
pub mod transport;

pub use auth::AuthToken;
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, NETWORK_FALLBACK_MESSAGE};
pub use requests::*;
pub use transport::{ApiRequest, HttpTransport, Method, MockTransport, Transport};
