//! Order history commands.

use clap::Subcommand;
use threadline_api::OrderFilter;
use threadline_core::{Order, OrderStatus, PaymentStatus};
use threadline_store::{PaymentOutcome, Route};
use tracing::info;

use crate::context::AppContext;
use crate::error::{CommandError, CommandResult, ErrorCode};

#[derive(Debug, Subcommand)]
pub enum OrdersCommand {
    /// List your orders
    List {
        #[arg(short, long)]
        status: Option<OrderStatus>,

        #[arg(short, long)]
        page: Option<u32>,

        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Show one order
    Show { order_id: String },

    /// Cancel a pending or confirmed order
    Cancel {
        order_id: String,

        #[arg(short, long)]
        reason: Option<String>,
    },

    /// Pay for an online order that is still unpaid
    Pay { order_id: String },
}

pub async fn run(ctx: &AppContext, command: OrdersCommand) -> CommandResult<()> {
    let orders = &ctx.store.orders;

    match command {
        OrdersCommand::List {
            status,
            page,
            limit,
        } => {
            ctx.require(&Route::Orders)?;
            let filter = OrderFilter {
                status,
                page,
                limit,
            };
            let list = orders.fetch_orders(&filter).await?;
            ctx.emit(&list, |list| {
                if list.is_empty() {
                    println!("No orders yet.");
                }
                for order in list {
                    println!(
                        "  {}  {}  payment {}  {}",
                        order.order_no, order.order_status, order.payment_status, order.total
                    );
                }
            })
        }
        OrdersCommand::Show { order_id } => {
            ctx.require(&Route::OrderDetail {
                order_id: order_id.clone(),
            })?;
            let order = orders.fetch_order(&order_id).await?;
            ctx.emit(&order, print_order)
        }
        OrdersCommand::Cancel { order_id, reason } => {
            ctx.require(&Route::OrderDetail {
                order_id: order_id.clone(),
            })?;
            let current = orders.fetch_order(&order_id).await?;
            ensure_cancellable(&current)?;

            let cancelled = orders.cancel_order(&order_id, reason).await?;
            ctx.emit(&cancelled, |order| {
                println!("Order {} is now {}.", order.order_no, order.order_status)
            })
        }
        OrdersCommand::Pay { order_id } => {
            ctx.require(&Route::OrderDetail {
                order_id: order_id.clone(),
            })?;
            let order = orders.fetch_order(&order_id).await?;
            ensure_payable(&order)?;
            ctx.require(&Route::PaymentGateway {
                order: order.clone(),
            })?;

            info!(order_no = %order.order_no, "Retrying online payment");
            let outcome = ctx.payments().settle(&order).await;
            report_payment(ctx, outcome)
        }
    }
}

/// Prints a settled payment, or turns a failed or unverified one into the
/// command's error.
pub(crate) fn report_payment(ctx: &AppContext, outcome: PaymentOutcome) -> CommandResult<()> {
    match outcome {
        PaymentOutcome::Settled(order) => ctx.emit(&order, |order| {
            println!("Payment received.");
            print_order(order);
        }),
        PaymentOutcome::Failed { order, reason } => Err(CommandError::new(
            ErrorCode::Payment,
            format!(
                "{reason}. Order {} is waiting for payment; run `threadline-shop orders pay {}` to try again.",
                order.order_no, order.id
            ),
        )),
        unverified @ PaymentOutcome::Unverified { .. } => Err(CommandError::new(
            ErrorCode::Payment,
            unverified.support_message().unwrap_or_default(),
        )),
    }
}

/// Online, not yet paid, and still open.
fn ensure_payable(order: &Order) -> CommandResult<()> {
    let problem = if !order.payment_method.is_online() {
        "is cash on delivery".to_string()
    } else if matches!(
        order.payment_status,
        PaymentStatus::Completed | PaymentStatus::Refunded
    ) {
        "is already paid".to_string()
    } else if matches!(
        order.order_status,
        OrderStatus::Cancelled | OrderStatus::Returned
    ) {
        format!("is {}", order.order_status)
    } else {
        return Ok(());
    };
    Err(CommandError::new(
        ErrorCode::Business,
        format!("Order {} {problem}", order.order_no),
    ))
}

/// Hides the cancel action the way the order screen does. The server has
/// the final word.
fn ensure_cancellable(order: &Order) -> CommandResult<()> {
    if order.order_status.is_cancellable() {
        Ok(())
    } else {
        Err(CommandError::new(
            ErrorCode::Business,
            format!(
                "Order {} is {} and can no longer be cancelled",
                order.order_no, order.order_status
            ),
        ))
    }
}

pub(crate) fn print_order(order: &Order) {
    println!("Order {} ({})", order.order_no, order.id);
    println!(
        "  Status    {} / payment {} ({})",
        order.order_status, order.payment_status, order.payment_method
    );
    for item in &order.items {
        println!("  {} × {}  {}", item.name, item.quantity, item.total);
    }
    println!("  Subtotal  {}", order.subtotal);
    println!("  Shipping  {}", order.shipping);
    println!("  GST       {}", order.tax);
    println!("  Total     {}", order.total);

    let address = &order.shipping_address;
    println!(
        "  Ship to   {}, {}, {} {}",
        address.name, address.address_line1, address.city, address.pincode
    );
    if let Some(payment_id) = &order.payment_id {
        println!("  Payment   {payment_id}");
    }
}
