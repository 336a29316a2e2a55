//! # Cart Commands
//!
//! ```text
//! cart show ─────────────────────► fetch_cart()
//! cart add <product> [-q N] ─────► add_to_cart()
//! cart update <line> -q N ───────► update_cart_item()
//! cart remove <line> ────────────► remove_from_cart()
//! cart clear ────────────────────► clear_cart()
//! ```
//!
//! Totals printed are the server's echo; the shipping and GST lines are a
//! preview only.

use clap::Subcommand;
use threadline_core::{Cart, Money, PricePreview};
use threadline_store::Route;
use tracing::debug;

use crate::context::AppContext;
use crate::error::CommandResult;

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Show the cart with a price preview
    Show,

    /// Add a product
    Add {
        product_id: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: i64,

        /// Reseller markup per unit, in rupees
        #[arg(short, long)]
        markup: Option<f64>,
    },

    /// Change a line's quantity
    Update {
        item_id: String,

        #[arg(short, long)]
        quantity: i64,

        /// Reseller markup per unit, in rupees
        #[arg(short, long)]
        markup: Option<f64>,
    },

    /// Remove a line
    Remove { item_id: String },

    /// Empty the cart
    Clear,
}

pub async fn run(ctx: &AppContext, command: CartCommand) -> CommandResult<()> {
    ctx.require(&Route::Cart)?;
    let cart = &ctx.store.cart;

    let updated = match command {
        CartCommand::Show => cart.fetch_cart().await?,
        CartCommand::Add {
            product_id,
            quantity,
            markup,
        } => {
            debug!(product_id = %product_id, quantity, "cart add");
            cart.add_to_cart(&product_id, quantity, markup_to_money(markup)?)
                .await?
        }
        CartCommand::Update {
            item_id,
            quantity,
            markup,
        } => {
            let markup = match markup {
                Some(rupees) => Money::try_from(rupees)?,
                // Keep the line's current markup
                None => cart
                    .fetch_cart()
                    .await?
                    .item(&item_id)
                    .map(|line| line.resell_price)
                    .unwrap_or_default(),
            };
            cart.update_cart_item(&item_id, quantity, markup).await?
        }
        CartCommand::Remove { item_id } => cart.remove_from_cart(&item_id).await?,
        CartCommand::Clear => cart.clear_cart().await?,
    };

    ctx.emit(&updated, print_cart)
}

fn markup_to_money(markup: Option<f64>) -> CommandResult<Money> {
    Ok(markup.map(Money::try_from).transpose()?.unwrap_or_default())
}

pub(crate) fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    for line in &cart.items {
        println!(
            "  [{}] {} × {}  {}",
            line.id, line.product.name, line.quantity, line.final_price
        );
        if line.resell_price.is_positive() {
            println!("        markup {}", line.resell_price);
        }
    }

    let preview = PricePreview::for_subtotal(cart.total_price);
    println!("  {} items", cart.total_items);
    println!("  Subtotal  {}", preview.subtotal);
    if preview.has_free_shipping() {
        println!("  Shipping  FREE");
    } else {
        println!("  Shipping  {}", preview.shipping);
    }
    println!("  GST (est) {}", preview.tax);
    println!("  Total     {}", preview.total);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_defaults_to_zero() {
        assert_eq!(markup_to_money(None).unwrap(), Money::zero());
        assert_eq!(
            markup_to_money(Some(49.5)).unwrap(),
            Money::from_paise(4950)
        );
        assert!(markup_to_money(Some(f64::NAN)).is_err());
    }
}
