//! Terminal stand-in for the payment SDK.
//!
//! Prints the gateway order and reads back the payment id and signature
//! the SDK would have returned. A blank payment id cancels.

use async_trait::async_trait;
use threadline_api::GatewayOrder;
use threadline_core::Order;
use threadline_store::{GatewayResult, PaymentGateway};
use tracing::warn;

use crate::commands::prompt;

#[derive(Debug, Default)]
pub struct TerminalGateway;

#[async_trait]
impl PaymentGateway for TerminalGateway {
    async fn collect(&self, order: &Order, gateway_order: &GatewayOrder) -> GatewayResult {
        eprintln!(
            "Pay {} {} for order {} (gateway order {})",
            gateway_order.amount, gateway_order.currency, order.order_no, gateway_order.gateway_order_id
        );

        let payment_id = match prompt("Payment ID (blank to cancel): ").await {
            Ok(id) if id.is_empty() => return GatewayResult::Cancelled,
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "Could not read payment id");
                return GatewayResult::Failed { reason: e.message };
            }
        };
        match prompt("Signature: ").await {
            Ok(signature) => GatewayResult::Success {
                payment_id,
                signature,
            },
            Err(e) => GatewayResult::Failed { reason: e.message },
        }
    }
}
