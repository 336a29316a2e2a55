//! # Threadline Shop
//!
//! Command-line shell over the storefront client.
//!
//! ## Module Organization
//! ```text
//! threadline_shop/
//! ├── lib.rs          ◄─── You are here (arguments, tracing, dispatch)
//! ├── context.rs      ◄─── AppContext: Store + role tree + output mode
//! ├── gateway.rs      ◄─── TerminalGateway (payment SDK stand-in)
//! ├── commands/       ◄─── cart, checkout, orders, wallet, notifications, config
//! └── error.rs        ◄─── CommandError { code, message }
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize Logging (stderr, RUST_LOG or --verbose)                  │
//! │  2. Parse arguments                                                     │
//! │  3. Load ClientConfig: defaults → client.toml → THREADLINE_* env        │
//! │     → --api-url                                                         │
//! │  4. Build Store over one ApiClient, RouteTree for the configured role   │
//! │  5. Dispatch the command                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod context;
pub mod error;
pub mod gateway;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use threadline_api::ClientConfig;
use threadline_store::PaymentGateway;
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::cart::CartCommand;
use commands::checkout::CheckoutArgs;
use commands::config::ConfigCommand;
use commands::notifications::NotificationsCommand;
use commands::orders::OrdersCommand;
use commands::wallet::WalletCommand;
use context::AppContext;
use error::{CommandError, CommandResult};
use gateway::TerminalGateway;

#[derive(Debug, Parser)]
#[command(name = "threadline-shop", version, about = "Threadline storefront client")]
pub struct Cli {
    /// Path to client.toml
    #[arg(long, global = true, env = "THREADLINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging for threadline crates
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// View and edit the cart
    #[command(subcommand)]
    Cart(CartCommand),

    /// Place an order for the current cart
    Checkout(CheckoutArgs),

    /// Order history
    #[command(subcommand)]
    Orders(OrdersCommand),

    /// Reseller wallet
    #[command(subcommand)]
    Wallet(WalletCommand),

    /// Notification feed
    #[command(subcommand)]
    Notifications(NotificationsCommand),

    /// Client configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Parses the process arguments and runs one command.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let json = cli.json;
    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e, json);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Runs an already-parsed command line, collecting payments on the terminal.
pub async fn execute(cli: Cli) -> CommandResult<()> {
    execute_with(cli, Arc::new(TerminalGateway)).await
}

/// Runs an already-parsed command line against the given payment gateway.
pub async fn execute_with(cli: Cli, gateway: Arc<dyn PaymentGateway>) -> CommandResult<()> {
    let mut config = ClientConfig::load(cli.config.clone())?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
        config.validate()?;
    }
    info!(base_url = %config.api.base_url, role = ?config.role(), "Client configured");

    if let Command::Config(command) = cli.command {
        return commands::config::run(&config, cli.config, command, cli.json);
    }

    let ctx = AppContext::new(&config, cli.json)?.with_gateway(gateway);
    match cli.command {
        Command::Cart(command) => commands::cart::run(&ctx, command).await,
        Command::Checkout(args) => commands::checkout::run(&ctx, args).await,
        Command::Orders(command) => commands::orders::run(&ctx, command).await,
        Command::Wallet(command) => commands::wallet::run(&ctx, command).await,
        Command::Notifications(command) => commands::notifications::run(&ctx, command).await,
        Command::Config(_) => Ok(()),
    }
}

fn report(error: &CommandError, json: bool) {
    if json {
        match serde_json::to_string(error) {
            Ok(body) => eprintln!("{body}"),
            Err(_) => eprintln!("error: {}", error.message),
        }
    } else {
        eprintln!("error: {}", error.message);
    }
}

/// Initializes the tracing subscriber on stderr so stdout stays parseable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=threadline_store=trace` - Trace one crate
/// - Default: warnings, plus info for threadline crates
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,threadline=debug,reqwest=warn"
    } else {
        "warn,threadline=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use threadline_core::{OrderStatus, PaymentMethod};

    #[test]
    fn test_parse_checkout() {
        let cli = Cli::try_parse_from([
            "threadline-shop",
            "checkout",
            "--address",
            "a1",
            "--payment",
            "upi",
            "-y",
        ])
        .unwrap();
        match cli.command {
            Command::Checkout(args) => {
                assert_eq!(args.address.as_deref(), Some("a1"));
                assert_eq!(args.payment, Some(PaymentMethod::Upi));
                assert!(args.yes);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "threadline-shop",
            "orders",
            "list",
            "--status",
            "shipped",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Command::Orders(OrdersCommand::List {
                status: Some(OrderStatus::Shipped),
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_unknown_payment_method() {
        assert!(
            Cli::try_parse_from(["threadline-shop", "checkout", "--payment", "bitcoin"]).is_err()
        );
    }
}
