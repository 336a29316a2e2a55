//! # Payment Gateway Handoff
//!
//! Online orders are created first and paid afterwards through a
//! third-party SDK. Nothing the SDK reports is trusted until the backend
//! has verified it.
//!
//! ## Settlement Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       PaymentFlow::settle                               │
//! │                                                                         │
//! │  POST /payments/create-order ──✗──► Failed (nothing charged)            │
//! │            │                                                            │
//! │            ▼                                                            │
//! │  gateway.collect(..)                                                    │
//! │     ├── Failed / Cancelled ──► POST /payments/failure (best effort)     │
//! │     │                          ──► Failed                               │
//! │     └── Success{payment_id, signature}                                  │
//! │            │                                                            │
//! │            ▼                                                            │
//! │  POST /payments/verify                                                  │
//! │     ├── ok ──────────────────► Settled (orders slice updated)           │
//! │     └── error (any kind) ────► Unverified { payment_id }                │
//! │                                 money may have moved: never claim       │
//! │                                 success or failure, send to support     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use threadline_api::{ApiClient, GatewayOrder, PaymentFailureRequest, VerifyPaymentRequest};
use threadline_core::Order;
use tracing::{error, info, warn};

use crate::navigation::Route;
use crate::slices::OrdersStore;

/// What the gateway SDK reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayResult {
    Success {
        payment_id: String,
        signature: String,
    },
    Failed {
        reason: String,
    },
    Cancelled,
}

/// Seam over the third-party payment SDK.
#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Opens the gateway for `gateway_order` and waits for its callback.
    async fn collect(&self, order: &Order, gateway_order: &GatewayOrder) -> GatewayResult;
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    /// Verified by the backend.
    Settled(Order),
    /// Nothing was charged, or the gateway reported a failure. Retryable.
    Failed { order: Order, reason: String },
    /// The gateway took the payment but verification did not succeed.
    Unverified {
        order: Order,
        payment_id: String,
        message: String,
    },
}

impl PaymentOutcome {
    pub fn order(&self) -> &Order {
        match self {
            PaymentOutcome::Settled(order)
            | PaymentOutcome::Failed { order, .. }
            | PaymentOutcome::Unverified { order, .. } => order,
        }
    }

    pub fn route(&self) -> Route {
        match self {
            PaymentOutcome::Settled(order) => Route::OrderSuccess {
                order: order.clone(),
            },
            PaymentOutcome::Failed { order, .. } => Route::PaymentGateway {
                order: order.clone(),
            },
            PaymentOutcome::Unverified { order, .. } => Route::OrderDetail {
                order_id: order.id.clone(),
            },
        }
    }

    /// Text for the ambiguous case, quoting the gateway payment id.
    pub fn support_message(&self) -> Option<String> {
        match self {
            PaymentOutcome::Unverified {
                order, payment_id, ..
            } => Some(format!(
                "We received payment {payment_id} for order {} but could not confirm it yet. \
                 Please contact support with this payment ID.",
                order.order_no
            )),
            _ => None,
        }
    }
}

/// Drives one order through the gateway and verification.
#[derive(Clone)]
pub struct PaymentFlow {
    api: ApiClient,
    orders: OrdersStore,
    gateway: Arc<dyn PaymentGateway>,
}

impl PaymentFlow {
    pub fn new(api: ApiClient, orders: OrdersStore, gateway: Arc<dyn PaymentGateway>) -> Self {
        PaymentFlow {
            api,
            orders,
            gateway,
        }
    }

    pub async fn settle(&self, order: &Order) -> PaymentOutcome {
        let payments = self.api.payments();

        let gateway_order = match payments.create_gateway_order(&order.id).await {
            Ok(gateway_order) => gateway_order,
            Err(e) => {
                warn!(order_id = %order.id, error = %e, "Could not open gateway order");
                return PaymentOutcome::Failed {
                    order: order.clone(),
                    reason: e.user_message(),
                };
            }
        };

        info!(
            order_id = %order.id,
            gateway_order_id = %gateway_order.gateway_order_id,
            amount = %gateway_order.amount,
            "Handing off to payment gateway"
        );

        let (payment_id, signature) = match self.gateway.collect(order, &gateway_order).await {
            GatewayResult::Success {
                payment_id,
                signature,
            } => (payment_id, signature),
            GatewayResult::Failed { reason } => {
                return self.fail(order, &gateway_order, reason).await;
            }
            GatewayResult::Cancelled => {
                return self
                    .fail(order, &gateway_order, "Payment cancelled".to_string())
                    .await;
            }
        };

        let request = VerifyPaymentRequest {
            order_id: order.id.clone(),
            gateway_order_id: gateway_order.gateway_order_id.clone(),
            payment_id: payment_id.clone(),
            signature,
        };
        match payments.verify(&request).await {
            Ok(verified) => {
                info!(order_id = %verified.id, payment_id = %payment_id, "Payment verified");
                self.orders.apply_update(verified.clone());
                PaymentOutcome::Settled(verified)
            }
            Err(e) => {
                error!(
                    order_id = %order.id,
                    payment_id = %payment_id,
                    error = %e,
                    "Gateway reported success but verification failed"
                );
                PaymentOutcome::Unverified {
                    order: order.clone(),
                    payment_id,
                    message: e.user_message(),
                }
            }
        }
    }

    async fn fail(&self, order: &Order, gateway_order: &GatewayOrder, reason: String) -> PaymentOutcome {
        warn!(order_id = %order.id, reason = %reason, "Payment not completed");

        let request = PaymentFailureRequest {
            order_id: order.id.clone(),
            gateway_order_id: gateway_order.gateway_order_id.clone(),
            reason: reason.clone(),
        };
        if let Err(e) = self.api.payments().report_failure(&request).await {
            warn!(order_id = %order.id, error = %e, "Failed to report payment failure");
        }

        PaymentOutcome::Failed {
            order: order.clone(),
            reason,
        }
    }
}

impl std::fmt::Debug for PaymentFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentFlow").finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
