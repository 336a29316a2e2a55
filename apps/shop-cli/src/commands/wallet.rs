//! Reseller wallet commands.

use clap::Subcommand;
use serde::Serialize;
use threadline_core::{Money, Wallet, Withdrawal};
use threadline_store::Route;

use crate::context::AppContext;
use crate::error::CommandResult;

#[derive(Debug, Subcommand)]
pub enum WalletCommand {
    /// Show balances and recent withdrawals
    Show,

    /// Request a payout, in rupees
    Withdraw { amount: f64 },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WalletView {
    wallet: Wallet,
    withdrawals: Vec<Withdrawal>,
}

pub async fn run(ctx: &AppContext, command: WalletCommand) -> CommandResult<()> {
    ctx.require(&Route::Wallet)?;
    let reseller = &ctx.store.reseller;

    match command {
        WalletCommand::Show => {
            let (wallet, withdrawals) =
                tokio::join!(reseller.fetch_wallet(), reseller.fetch_withdrawals());
            let view = WalletView {
                wallet: wallet?,
                withdrawals: withdrawals?,
            };
            ctx.emit(&view, |view| {
                print_wallet(&view.wallet);
                for w in &view.withdrawals {
                    println!("  {}  {}  {:?}", w.id, w.amount, w.status);
                }
            })
        }
        WalletCommand::Withdraw { amount } => {
            let withdrawal = reseller
                .request_withdrawal(Money::try_from(amount)?)
                .await?;
            ctx.emit(&withdrawal, |w| {
                println!("Withdrawal {} of {} requested.", w.id, w.amount);
                if let Some(wallet) = reseller.snapshot().wallet {
                    print_wallet(&wallet);
                }
            })
        }
    }
}

fn print_wallet(wallet: &Wallet) {
    println!("  Available  {}", wallet.available_balance);
    println!("  Pending    {}", wallet.pending_balance);
    println!("  Earned     {}", wallet.total_earned);
    println!("  Withdrawn  {}", wallet.total_withdrawn);
}
