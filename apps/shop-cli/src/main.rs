//! # Threadline Shop Entry Point
//!
//! ```text
//! main.rs ────► tokio runtime
//! lib.rs ─────► tracing, argument parsing, config, dispatch
//! commands/ ──► cart, checkout, orders, wallet, notifications, config
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Setup lives in lib.rs so integration tests can drive it
    threadline_shop::run().await
}
