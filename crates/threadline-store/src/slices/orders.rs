//! # Orders Slice
//!
//! Order list plus the order currently on screen.
//!
//! ```text
//! create_order ─────────► selected_order = created, prepended to items
//! fetch_orders ─────────► items = server list (verbatim)
//! fetch_order ──────────► selected_order = order, items[i] replaced by id
//! cancel_order ─────────► items[i] replaced by id (+ selected if same id)
//! update_payment_status ► items[i] replaced by id (+ selected if same id)
//! any failure ──────────► error set, items and selected_order untouched
//! ```

use serde::Serialize;
use threadline_api::{
    ApiClient, CancelOrderRequest, CheckoutRequest, OrderFilter, UpdatePaymentRequest,
};
use threadline_core::{Order, PaymentStatus};
use tracing::{info, warn};

use crate::error::StoreResult;
use crate::slice::{Slice, SliceCell};

// =============================================================================
// State
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderOp {
    Create,
    FetchAll,
    FetchOne,
    UpdatePayment,
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrdersAction {
    Pending(OrderOp),
    Created(Order),
    Listed(Vec<Order>),
    /// Detail fetch: becomes the selected order.
    Fetched(Order),
    /// Status change on an existing order (payment or cancel).
    Updated(Order),
    Rejected(OrderOp, String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersState {
    pub items: Vec<Order>,
    pub selected_order: Option<Order>,
    pub loading: bool,
    pub error: Option<String>,
}

impl OrdersState {
    /// Replaces the list entry with the same id. Returns false if absent.
    fn replace_in_place(&mut self, order: &Order) -> bool {
        match self.items.iter_mut().find(|o| o.id == order.id) {
            Some(slot) => {
                *slot = order.clone();
                true
            }
            None => false,
        }
    }

    pub fn order(&self, order_id: &str) -> Option<&Order> {
        self.items.iter().find(|o| o.id == order_id)
    }
}

impl Slice for OrdersState {
    type Action = OrdersAction;

    fn reduce(&mut self, action: OrdersAction) {
        match action {
            OrdersAction::Pending(_) => {
                self.loading = true;
                self.error = None;
            }
            OrdersAction::Created(order) => {
                self.loading = false;
                if !self.replace_in_place(&order) {
                    self.items.insert(0, order.clone());
                }
                self.selected_order = Some(order);
            }
            OrdersAction::Listed(orders) => {
                self.loading = false;
                self.items = orders;
            }
            OrdersAction::Fetched(order) => {
                self.loading = false;
                self.replace_in_place(&order);
                self.selected_order = Some(order);
            }
            OrdersAction::Updated(order) => {
                self.loading = false;
                self.replace_in_place(&order);
                if self
                    .selected_order
                    .as_ref()
                    .is_some_and(|s| s.id == order.id)
                {
                    self.selected_order = Some(order);
                }
            }
            OrdersAction::Rejected(_, message) => {
                self.loading = false;
                self.error = Some(message);
            }
        }
    }
}

// =============================================================================
// Store
// =============================================================================

#[derive(Debug, Clone)]
pub struct OrdersStore {
    state: SliceCell<OrdersState>,
    api: ApiClient,
}

impl OrdersStore {
    pub fn new(api: ApiClient) -> Self {
        OrdersStore {
            state: SliceCell::new(),
            api,
        }
    }

    pub fn snapshot(&self) -> OrdersState {
        self.state.snapshot()
    }

    pub fn selected_order(&self) -> Option<Order> {
        self.state.with_state(|s| s.selected_order.clone())
    }

    /// The single point that turns cart + address + payment method into an
    /// order.
    pub async fn create_order(
        &self,
        request: &CheckoutRequest,
        idempotency_key: &str,
    ) -> StoreResult<Order> {
        self.state.dispatch(OrdersAction::Pending(OrderOp::Create));
        match self.api.orders().checkout(request, idempotency_key).await {
            Ok(order) => {
                self.state.dispatch(OrdersAction::Created(order.clone()));
                Ok(order)
            }
            Err(e) => {
                warn!(error = %e, "Order creation failed");
                self.reject(OrderOp::Create, e.user_message());
                Err(e.into())
            }
        }
    }

    pub async fn fetch_orders(&self, filter: &OrderFilter) -> StoreResult<Vec<Order>> {
        self.state.dispatch(OrdersAction::Pending(OrderOp::FetchAll));
        match self.api.orders().list(filter).await {
            Ok(orders) => {
                self.state.dispatch(OrdersAction::Listed(orders.clone()));
                Ok(orders)
            }
            Err(e) => {
                self.reject(OrderOp::FetchAll, e.user_message());
                Err(e.into())
            }
        }
    }

    pub async fn fetch_order(&self, order_id: &str) -> StoreResult<Order> {
        self.state.dispatch(OrdersAction::Pending(OrderOp::FetchOne));
        match self.api.orders().get(order_id).await {
            Ok(order) => {
                self.state.dispatch(OrdersAction::Fetched(order.clone()));
                Ok(order)
            }
            Err(e) => {
                self.reject(OrderOp::FetchOne, e.user_message());
                Err(e.into())
            }
        }
    }

    pub async fn update_payment_status(
        &self,
        order_id: &str,
        payment_status: PaymentStatus,
        payment_id: Option<String>,
    ) -> StoreResult<Order> {
        let request = UpdatePaymentRequest {
            payment_status,
            payment_id,
        };
        self.state
            .dispatch(OrdersAction::Pending(OrderOp::UpdatePayment));
        match self.api.orders().update_payment(order_id, &request).await {
            Ok(order) => {
                info!(order_id = %order.id, status = %order.payment_status, "Payment status updated");
                self.state.dispatch(OrdersAction::Updated(order.clone()));
                Ok(order)
            }
            Err(e) => {
                self.reject(OrderOp::UpdatePayment, e.user_message());
                Err(e.into())
            }
        }
    }

    pub async fn cancel_order(&self, order_id: &str, reason: Option<String>) -> StoreResult<Order> {
        self.state.dispatch(OrdersAction::Pending(OrderOp::Cancel));
        match self
            .api
            .orders()
            .cancel(order_id, &CancelOrderRequest { reason })
            .await
        {
            Ok(order) => {
                info!(order_id = %order.id, "Order cancelled");
                self.state.dispatch(OrdersAction::Updated(order.clone()));
                Ok(order)
            }
            Err(e) => {
                self.reject(OrderOp::Cancel, e.user_message());
                Err(e.into())
            }
        }
    }

    /// Applies an order the payment flow got back from verification.
    pub(crate) fn apply_update(&self, order: Order) {
        self.state.dispatch(OrdersAction::Updated(order));
    }

    fn reject(&self, op: OrderOp, message: String) {
        self.state.dispatch(OrdersAction::Rejected(op, message));
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
