//! # Checkout Command
//!
//! ```text
//! begin() ──► select address / payment ──► confirm() ──► prompt [y/N]
//!                                                          │
//!                                       no ◄───────────────┤
//!                              cancel_confirm()            │ yes
//!                                                          ▼
//!                                                    place_order()
//!                                                     │         │
//!                                                 COD │         │ UPI / card
//!                                                     ▼         ▼
//!                                              print order   complete_payment()
//! ```

use clap::Args;
use threadline_core::PaymentMethod;
use threadline_store::{CheckoutOutcome, CheckoutSnapshot, Route};
use tracing::info;

use super::orders::{print_order, report_payment};
use super::{is_yes, prompt};
use crate::context::AppContext;
use crate::error::CommandResult;

#[derive(Debug, Args)]
pub struct CheckoutArgs {
    /// Saved address id (default address if omitted)
    #[arg(short, long)]
    pub address: Option<String>,

    /// cod, upi or card
    #[arg(short, long)]
    pub payment: Option<PaymentMethod>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

pub async fn run(ctx: &AppContext, args: CheckoutArgs) -> CommandResult<()> {
    ctx.require(&Route::Checkout)?;
    let session = ctx.store.checkout();

    session.begin().await?;
    if let Some(address_id) = &args.address {
        session.select_address(address_id)?;
    }
    if let Some(method) = args.payment {
        session.select_payment_method(method)?;
    }
    session.confirm()?;

    if !ctx.json {
        print_summary(&session.snapshot());
    }
    if !args.yes && !is_yes(&prompt("Place this order? [y/N] ").await?) {
        session.cancel_confirm()?;
        eprintln!("Order not placed.");
        return Ok(());
    }

    match session.place_order().await? {
        CheckoutOutcome::Confirmed(order) => ctx.emit(&order, |order| {
            println!("Order placed. Pay on delivery.");
            print_order(order);
        }),
        CheckoutOutcome::AwaitingPayment(order) => {
            info!(order_no = %order.order_no, "Order awaiting online payment");
            let outcome = session.complete_payment(&ctx.payments()).await?;
            report_payment(ctx, outcome)
        }
    }
}

fn print_summary(snapshot: &CheckoutSnapshot) {
    if let Some(address) = snapshot
        .selected_address_id
        .as_deref()
        .and_then(|id| snapshot.addresses.iter().find(|a| a.id == id))
    {
        println!(
            "Deliver to  {}, {}, {} {}",
            address.name, address.address_line1, address.city, address.pincode
        );
    }
    println!("Payment     {}", snapshot.payment_method);
    if let Some(preview) = &snapshot.preview {
        println!("Subtotal    {}", preview.subtotal);
        println!("Shipping    {}", preview.shipping);
        println!("GST         {}", preview.tax);
        println!("Total       {} (final amount confirmed by the store)", preview.total);
    }
}
