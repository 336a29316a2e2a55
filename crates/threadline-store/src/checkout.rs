//! # Checkout Session
//!
//! One pass through the checkout screen, from entry to a placed order.
//!
//! ## Phase Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Phases                                    │
//! │                                                                         │
//! │   Idle ──begin()──► AddressesLoading ──ok──► Ready ◄──────────────┐     │
//! │    ▲                      │                  │  ▲                 │     │
//! │    └────────── error ─────┘      confirm()   │  │ cancel_confirm()│     │
//! │                                              ▼  │                 │     │
//! │                                           Confirming              │     │
//! │                                              │                    │     │
//! │                                place_order() │     any failure ───┘     │
//! │                                              ▼                          │
//! │                                         PlacingOrder ◄── exit blocked   │
//! │                                         │          │                    │
//! │                                     COD │          │ UPI / card         │
//! │                                         ▼          ▼                    │
//! │                                   Succeeded   AwaitingGateway           │
//! │                                         ▲          │ complete_payment() │
//! │                                         │          ▼                    │
//! │                                         └─ ok ─ VerifyingPayment        │
//! │                                                    │ unverified         │
//! │                                                    ▼                    │
//! │                                            PaymentUnverified            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Submission Gate
//! The phase check and the switch to `PlacingOrder` happen under one lock,
//! so a second `place_order` racing the first sees `PlacingOrder` and is
//! rejected with [`CheckoutError::AlreadySubmitting`]. The lock is released
//! before the request is awaited. If the caller stops waiting (timeout,
//! cancellation, screen torn down) the session falls back to `Ready` with
//! the same idempotency key, as it would after a network failure.
//!
//! ## Idempotency
//! Each attempt carries an `Idempotency-Key`. It is kept when the outcome
//! is unknown (network failure, unreadable response) so a retry cannot
//! create a second order, and replaced after a definite answer (order
//! created, or rejected by the server).

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use thiserror::Error;
use threadline_api::{ApiError, CheckoutRequest};
use threadline_core::validation::validate_checkout_address;
use threadline_core::{
    Address, Cart, Order, PaymentMethod, PricePreview, ShippingAddress, ValidationError,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::StoreError;
use crate::navigation::Route;
use crate::payment::{PaymentFlow, PaymentOutcome};
use crate::slices::{default_or_first, AddressesStore, CartStore, OrdersStore};

/// Shown while an order is being placed and the user tries to leave.
pub const PLACING_ORDER_NOTICE: &str = "Please wait while we place your order";

// =============================================================================
// Phase
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum CheckoutPhase {
    Idle,
    AddressesLoading,
    Ready,
    Confirming,
    PlacingOrder,
    Succeeded {
        order: Order,
    },
    AwaitingGateway {
        order: Order,
    },
    VerifyingPayment {
        order: Order,
    },
    PaymentUnverified {
        order: Order,
        #[serde(rename = "paymentId")]
        payment_id: String,
    },
}

impl CheckoutPhase {
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutPhase::Idle => "idle",
            CheckoutPhase::AddressesLoading => "addresses_loading",
            CheckoutPhase::Ready => "ready",
            CheckoutPhase::Confirming => "confirming",
            CheckoutPhase::PlacingOrder => "placing_order",
            CheckoutPhase::Succeeded { .. } => "succeeded",
            CheckoutPhase::AwaitingGateway { .. } => "awaiting_gateway",
            CheckoutPhase::VerifyingPayment { .. } => "verifying_payment",
            CheckoutPhase::PaymentUnverified { .. } => "payment_unverified",
        }
    }

    /// Selections may change in these phases.
    pub fn is_editable(&self) -> bool {
        matches!(self, CheckoutPhase::Ready | CheckoutPhase::Confirming)
    }
}

// =============================================================================
// Errors and Outcomes
// =============================================================================

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Please select a delivery address")]
    NoAddressSelected,

    #[error("Address {0} is not one of your saved addresses")]
    UnknownAddress(String),

    #[error("Your order is already being placed")]
    AlreadySubmitting,

    #[error("Cannot {action} while checkout is {phase}")]
    InvalidTransition {
        phase: &'static str,
        action: &'static str,
    },

    /// The server understood the request and said no.
    #[error("{0}")]
    Business(String),

    /// The request may or may not have reached the server.
    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    Unexpected(String),
}

impl CheckoutError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// The server gave a definite answer, so the attempt is closed.
    fn is_definite(&self) -> bool {
        matches!(self, CheckoutError::Business(_))
    }
}

impl From<StoreError> for CheckoutError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(e) => CheckoutError::Validation(e),
            StoreError::Api(e) if e.is_network() => CheckoutError::Network(e.user_message()),
            StoreError::Api(ApiError::Server { message, .. }) => CheckoutError::Business(message),
            StoreError::Api(e) => CheckoutError::Unexpected(e.user_message()),
            other @ StoreError::UpdateInFlight => CheckoutError::Unexpected(other.user_message()),
        }
    }
}

/// Where a placed order goes next.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    /// Cash on delivery: nothing left to pay.
    Confirmed(Order),
    /// Online method: the gateway still has to collect.
    AwaitingPayment(Order),
}

impl CheckoutOutcome {
    pub fn order(&self) -> &Order {
        match self {
            CheckoutOutcome::Confirmed(order) | CheckoutOutcome::AwaitingPayment(order) => order,
        }
    }

    pub fn route(&self) -> Route {
        match self {
            CheckoutOutcome::Confirmed(order) => Route::OrderSuccess {
                order: order.clone(),
            },
            CheckoutOutcome::AwaitingPayment(order) => Route::PaymentGateway {
                order: order.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDecision {
    Allowed,
    Blocked(&'static str),
}

/// Everything the checkout screen renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSnapshot {
    pub phase: CheckoutPhase,
    pub cart: Option<Cart>,
    pub addresses: Vec<Address>,
    pub selected_address_id: Option<String>,
    pub payment_method: PaymentMethod,
    pub preview: Option<PricePreview>,
    pub error: Option<String>,
}

// =============================================================================
// Session
// =============================================================================

#[derive(Debug)]
struct Attempt {
    phase: CheckoutPhase,
    cart: Option<Cart>,
    addresses: Vec<Address>,
    selected_address_id: Option<String>,
    payment_method: PaymentMethod,
    error: Option<String>,
    idempotency_key: String,
}

impl Attempt {
    fn new() -> Self {
        Attempt {
            phase: CheckoutPhase::Idle,
            cart: None,
            addresses: Vec::new(),
            selected_address_id: None,
            payment_method: PaymentMethod::default(),
            error: None,
            idempotency_key: new_idempotency_key(),
        }
    }

    fn invalid(&self, action: &'static str) -> CheckoutError {
        if self.phase == CheckoutPhase::PlacingOrder {
            return CheckoutError::AlreadySubmitting;
        }
        CheckoutError::InvalidTransition {
            phase: self.phase.name(),
            action,
        }
    }

    fn ensure_editable(&self, action: &'static str) -> Result<(), CheckoutError> {
        if self.phase.is_editable() {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn selected_address(&self) -> Option<&Address> {
        let id = self.selected_address_id.as_deref()?;
        self.addresses.iter().find(|a| a.id == id)
    }

    /// Cart non-empty, an address selected and complete. Builds the
    /// request from the current selection.
    fn checkout_request(&self) -> Result<CheckoutRequest, CheckoutError> {
        match &self.cart {
            Some(cart) if !cart.is_empty() => {}
            _ => return Err(CheckoutError::EmptyCart),
        }
        let address = self
            .selected_address()
            .ok_or(CheckoutError::NoAddressSelected)?;
        validate_checkout_address(address)?;

        Ok(CheckoutRequest {
            shipping_address: ShippingAddress::from(address),
            payment_method: self.payment_method,
            address_id: Some(address.id.clone()),
        })
    }
}

fn new_idempotency_key() -> String {
    Uuid::new_v4().to_string()
}

/// Restores `fallback` if an awaited step is dropped before it records its
/// own result.
struct Rollback<'a> {
    attempt: &'a Mutex<Attempt>,
    fallback: Option<CheckoutPhase>,
}

impl<'a> Rollback<'a> {
    fn new(attempt: &'a Mutex<Attempt>, fallback: CheckoutPhase) -> Self {
        Rollback {
            attempt,
            fallback: Some(fallback),
        }
    }

    fn disarm(mut self) {
        self.fallback = None;
    }
}

impl Drop for Rollback<'_> {
    fn drop(&mut self) {
        if let Some(fallback) = self.fallback.take() {
            let mut attempt = self.attempt.lock().unwrap_or_else(PoisonError::into_inner);
            warn!(
                from = attempt.phase.name(),
                to = fallback.name(),
                "Checkout step abandoned before it completed"
            );
            attempt.phase = fallback;
        }
    }
}

/// Drives the checkout screen against the shared slices.
///
/// Cheap to create; a fresh session starts in [`CheckoutPhase::Idle`].
#[derive(Debug)]
pub struct CheckoutSession {
    cart: CartStore,
    addresses: AddressesStore,
    orders: OrdersStore,
    attempt: Mutex<Attempt>,
}

impl CheckoutSession {
    pub fn new(cart: CartStore, addresses: AddressesStore, orders: OrdersStore) -> Self {
        CheckoutSession {
            cart,
            addresses,
            orders,
            attempt: Mutex::new(Attempt::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Attempt> {
        self.attempt.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn phase(&self) -> CheckoutPhase {
        self.lock().phase.clone()
    }

    pub fn snapshot(&self) -> CheckoutSnapshot {
        let attempt = self.lock();
        CheckoutSnapshot {
            phase: attempt.phase.clone(),
            cart: attempt.cart.clone(),
            addresses: attempt.addresses.clone(),
            selected_address_id: attempt.selected_address_id.clone(),
            payment_method: attempt.payment_method,
            preview: attempt
                .cart
                .as_ref()
                .map(|c| PricePreview::for_subtotal(c.total_price)),
            error: attempt.error.clone(),
        }
    }

    /// Client-side totals for the current cart. Display only: the order
    /// the server returns is authoritative.
    pub fn preview(&self) -> Option<PricePreview> {
        self.lock()
            .cart
            .as_ref()
            .map(|c| PricePreview::for_subtotal(c.total_price))
    }

    /// Screen entry. Fetches cart and addresses together, once.
    ///
    /// A previous selection survives if the address still exists; otherwise
    /// the default (or first) address is preselected.
    pub async fn begin(&self) -> Result<(), CheckoutError> {
        {
            let mut attempt = self.lock();
            if matches!(
                attempt.phase,
                CheckoutPhase::PlacingOrder | CheckoutPhase::VerifyingPayment { .. }
            ) {
                return Err(attempt.invalid("reload checkout"));
            }
            attempt.phase = CheckoutPhase::AddressesLoading;
            attempt.error = None;
        }

        debug!("Loading checkout");
        let (cart, addresses) =
            tokio::join!(self.cart.fetch_cart(), self.addresses.fetch_addresses());

        let mut attempt = self.lock();
        match (cart, addresses) {
            (Ok(cart), Ok(addresses)) => {
                let kept = attempt
                    .selected_address_id
                    .take()
                    .filter(|id| addresses.iter().any(|a| &a.id == id));
                attempt.selected_address_id =
                    kept.or_else(|| default_or_first(&addresses).map(|a| a.id.clone()));
                info!(
                    items = cart.total_items,
                    addresses = addresses.len(),
                    "Checkout ready"
                );
                attempt.cart = Some(cart);
                attempt.addresses = addresses;
                attempt.phase = CheckoutPhase::Ready;
                Ok(())
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "Checkout failed to load");
                let err = CheckoutError::from(e);
                attempt.phase = CheckoutPhase::Idle;
                attempt.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    pub fn select_address(&self, address_id: &str) -> Result<(), CheckoutError> {
        let mut attempt = self.lock();
        attempt.ensure_editable("change the address")?;
        if !attempt.addresses.iter().any(|a| a.id == address_id) {
            return Err(CheckoutError::UnknownAddress(address_id.to_string()));
        }
        attempt.selected_address_id = Some(address_id.to_string());
        Ok(())
    }

    pub fn select_payment_method(&self, method: PaymentMethod) -> Result<(), CheckoutError> {
        let mut attempt = self.lock();
        attempt.ensure_editable("change the payment method")?;
        attempt.payment_method = method;
        Ok(())
    }

    /// Opens the confirmation prompt if the gate passes.
    pub fn confirm(&self) -> Result<(), CheckoutError> {
        let mut attempt = self.lock();
        attempt.ensure_editable("confirm")?;
        if let Err(e) = attempt.checkout_request() {
            attempt.error = Some(e.user_message());
            return Err(e);
        }
        attempt.error = None;
        attempt.phase = CheckoutPhase::Confirming;
        Ok(())
    }

    pub fn cancel_confirm(&self) -> Result<(), CheckoutError> {
        let mut attempt = self.lock();
        if attempt.phase != CheckoutPhase::Confirming {
            return Err(attempt.invalid("dismiss confirmation"));
        }
        attempt.phase = CheckoutPhase::Ready;
        Ok(())
    }

    /// Places the order from the latest selection.
    ///
    /// Exactly one request is sent per accepted call. On failure the
    /// session returns to `Ready` with every selection intact.
    pub async fn place_order(&self) -> Result<CheckoutOutcome, CheckoutError> {
        let (request, key) = {
            let mut attempt = self.lock();
            if attempt.phase != CheckoutPhase::Confirming {
                let err = attempt.invalid("place the order");
                debug!(phase = attempt.phase.name(), "Order submission rejected");
                return Err(err);
            }
            let request = match attempt.checkout_request() {
                Ok(request) => request,
                Err(e) => {
                    attempt.phase = CheckoutPhase::Ready;
                    attempt.error = Some(e.user_message());
                    return Err(e);
                }
            };
            attempt.phase = CheckoutPhase::PlacingOrder;
            attempt.error = None;
            (request, attempt.idempotency_key.clone())
        };
        let rollback = Rollback::new(&self.attempt, CheckoutPhase::Ready);

        info!(
            payment_method = %request.payment_method,
            idempotency_key = %key,
            "Placing order"
        );
        let result = self.orders.create_order(&request, &key).await;
        rollback.disarm();

        let mut attempt = self.lock();
        match result {
            Ok(order) => {
                self.cart.invalidate();
                attempt.idempotency_key = new_idempotency_key();
                attempt.cart = None;

                let outcome = if order.payment_method.is_online() {
                    attempt.phase = CheckoutPhase::AwaitingGateway {
                        order: order.clone(),
                    };
                    CheckoutOutcome::AwaitingPayment(order)
                } else {
                    attempt.phase = CheckoutPhase::Succeeded {
                        order: order.clone(),
                    };
                    CheckoutOutcome::Confirmed(order)
                };
                info!(order_no = %outcome.order().order_no, total = %outcome.order().total, "Order placed");
                Ok(outcome)
            }
            Err(e) => {
                let err = CheckoutError::from(e);
                if err.is_definite() {
                    attempt.idempotency_key = new_idempotency_key();
                }
                warn!(error = %err, "Order not placed");
                attempt.phase = CheckoutPhase::Ready;
                attempt.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// Runs the gateway for an order waiting on payment.
    ///
    /// A failed or cancelled payment leaves the order awaiting payment so
    /// the user can try again.
    pub async fn complete_payment(
        &self,
        flow: &PaymentFlow,
    ) -> Result<PaymentOutcome, CheckoutError> {
        let order = {
            let mut attempt = self.lock();
            let order = match &attempt.phase {
                CheckoutPhase::AwaitingGateway { order } => order.clone(),
                _ => return Err(attempt.invalid("start payment")),
            };
            attempt.phase = CheckoutPhase::VerifyingPayment {
                order: order.clone(),
            };
            order
        };
        let rollback = Rollback::new(
            &self.attempt,
            CheckoutPhase::AwaitingGateway {
                order: order.clone(),
            },
        );

        let outcome = flow.settle(&order).await;
        rollback.disarm();

        let mut attempt = self.lock();
        attempt.phase = match &outcome {
            PaymentOutcome::Settled(order) => CheckoutPhase::Succeeded {
                order: order.clone(),
            },
            PaymentOutcome::Failed { order, reason } => {
                attempt.error = Some(reason.clone());
                CheckoutPhase::AwaitingGateway {
                    order: order.clone(),
                }
            }
            PaymentOutcome::Unverified {
                order, payment_id, ..
            } => {
                attempt.error = outcome.support_message();
                CheckoutPhase::PaymentUnverified {
                    order: order.clone(),
                    payment_id: payment_id.clone(),
                }
            }
        };
        Ok(outcome)
    }

    /// Back navigation and dismiss gestures ask here first.
    pub fn request_exit(&self) -> ExitDecision {
        if self.lock().phase == CheckoutPhase::PlacingOrder {
            ExitDecision::Blocked(PLACING_ORDER_NOTICE)
        } else {
            ExitDecision::Allowed
        }
    }

    #[cfg(test)]
    fn idempotency_key(&self) -> String {
        self.lock().idempotency_key.clone()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use threadline_api::{ApiClient, ApiRequest, ApiResult, Method, MockTransport, Transport};

    /// Loads normally, then never answers the order submission.
    struct StalledCheckout(MockTransport);

    #[async_trait]
    impl Transport for StalledCheckout {
        async fn send(&self, request: ApiRequest) -> ApiResult<Value> {
            if request.path == "/orders/checkout" {
                return std::future::pending().await;
            }
            self.0.send(request).await
        }
    }

    fn cart_json(lines: usize) -> Value {
        let items: Vec<Value> = (0..lines)
            .map(|i| {
                json!({
                    "_id": format!("line-{i}"),
                    "product": {"_id": format!("p-{i}"), "name": "Linen Kurta", "price": 300},
                    "quantity": 1,
                    "finalPrice": 300
                })
            })
            .collect();
        json!({"items": items, "totalItems": lines, "totalPrice": 300 * lines})
    }

    fn addresses_json() -> Value {
        json!([
            {"_id": "a1", "name": "Asha", "phone": "9876543210", "addressLine1": "12 MG Road",
             "city": "Pune", "state": "MH", "pincode": "411001"},
            {"_id": "a2", "name": "Asha", "phone": "9876543210", "addressLine1": "4 Park St",
             "city": "Kolkata", "state": "WB", "pincode": "700016", "isDefault": true},
            {"_id": "a3", "name": "  ", "phone": "9876543210", "addressLine1": "1 Nowhere",
             "city": "Pune", "state": "MH", "pincode": "411001"}
        ])
    }

    fn order_json(method: &str) -> Value {
        json!({
            "_id": "o-1", "orderNo": "TL-1001",
            "shippingAddress": {
                "name": "Asha", "phone": "9876543210", "addressLine1": "4 Park St",
                "city": "Kolkata", "state": "WB", "pincode": "700016"
            },
            "paymentMethod": method,
            "subtotal": 600, "shipping": 0, "tax": 108, "total": 708
        })
    }

    fn loading_transport(lines: usize) -> MockTransport {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r| r.method == Method::Get && r.path == "/cart")
            .returning(move |_| Ok(cart_json(lines)));
        transport
            .expect_send()
            .withf(|r| r.method == Method::Get && r.path == "/addresses")
            .returning(|_| Ok(addresses_json()));
        transport
    }

    fn session(transport: MockTransport) -> CheckoutSession {
        session_over(Arc::new(transport))
    }

    fn session_over(transport: Arc<dyn Transport>) -> CheckoutSession {
        let api = ApiClient::new(transport);
        CheckoutSession::new(
            CartStore::new(api.clone()),
            AddressesStore::new(api.clone()),
            OrdersStore::new(api),
        )
    }

    #[tokio::test]
    async fn test_begin_preselects_default_address() {
        let session = session(loading_transport(2));
        session.begin().await.unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, CheckoutPhase::Ready);
        assert_eq!(snapshot.selected_address_id.as_deref(), Some("a2"));
        assert_eq!(snapshot.payment_method, PaymentMethod::Cod);

        let preview = snapshot.preview.unwrap();
        assert_eq!(preview.subtotal, threadline_core::Money::from_rupees(600));
        assert_eq!(preview.total, threadline_core::Money::from_rupees(708));
    }

    #[tokio::test]
    async fn test_reentry_keeps_existing_selection() {
        let session = session(loading_transport(1));
        session.begin().await.unwrap();
        session.select_address("a1").unwrap();

        session.begin().await.unwrap();
        assert_eq!(session.snapshot().selected_address_id.as_deref(), Some("a1"));
    }

    #[tokio::test]
    async fn test_confirm_gate_order() {
        let session = session(loading_transport(0));
        session.begin().await.unwrap();
        assert!(matches!(session.confirm(), Err(CheckoutError::EmptyCart)));
        assert_eq!(session.phase(), CheckoutPhase::Ready);
        assert_eq!(
            session.snapshot().error.as_deref(),
            Some("Your cart is empty")
        );
    }

    #[tokio::test]
    async fn test_incomplete_address_fails_validation() {
        let session = session(loading_transport(1));
        session.begin().await.unwrap();
        session.select_address("a3").unwrap();

        let err = session.confirm().unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::Required { ref field }) if field == "name"
        ));
    }

    #[tokio::test]
    async fn test_address_missing_phone_loads_and_fails_gate() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r| r.method == Method::Get && r.path == "/cart")
            .returning(|_| Ok(cart_json(1)));
        transport
            .expect_send()
            .withf(|r| r.method == Method::Get && r.path == "/addresses")
            .returning(|_| {
                Ok(json!([
                    {"_id": "a1", "name": "Asha", "phone": "9876543210", "addressLine1": "12 MG Road",
                     "city": "Pune", "state": "MH", "pincode": "411001", "isDefault": true},
                    {"_id": "a2", "name": "Ravi", "addressLine1": "4 Park St",
                     "city": "Kolkata", "state": "WB", "pincode": "700016"}
                ]))
            });
        let session = session(transport);

        session.begin().await.unwrap();
        assert_eq!(session.snapshot().selected_address_id.as_deref(), Some("a1"));
        session.confirm().unwrap();
        session.cancel_confirm().unwrap();

        session.select_address("a2").unwrap();
        let err = session.confirm().unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::Required { ref field }) if field == "phone"
        ));
        assert_eq!(session.phase(), CheckoutPhase::Ready);
    }

    #[tokio::test]
    async fn test_abandoned_submission_returns_to_ready() {
        let session = session_over(Arc::new(StalledCheckout(loading_transport(1))));
        session.begin().await.unwrap();
        session.confirm().unwrap();
        let key = session.idempotency_key();

        let waited = tokio::time::timeout(Duration::from_millis(50), session.place_order()).await;
        assert!(waited.is_err());

        assert_eq!(session.phase(), CheckoutPhase::Ready);
        assert_eq!(session.request_exit(), ExitDecision::Allowed);
        assert_eq!(session.idempotency_key(), key);
        assert_eq!(session.snapshot().selected_address_id.as_deref(), Some("a2"));
        session.confirm().unwrap();
    }

    #[tokio::test]
    async fn test_selection_rejected_outside_editable_phases() {
        let session = session(MockTransport::new());
        assert!(matches!(
            session.select_payment_method(PaymentMethod::Upi),
            Err(CheckoutError::InvalidTransition { phase: "idle", .. })
        ));
        assert!(matches!(
            session.place_order().await,
            Err(CheckoutError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_address_is_rejected() {
        let session = session(loading_transport(1));
        session.begin().await.unwrap();
        assert!(matches!(
            session.select_address("nope"),
            Err(CheckoutError::UnknownAddress(_))
        ));
    }

    #[tokio::test]
    async fn test_business_failure_rotates_key_network_failure_keeps_it() {
        let mut transport = loading_transport(1);
        let mut calls = 0;
        transport
            .expect_send()
            .times(2)
            .withf(|r| r.path == "/orders/checkout" && r.idempotency_key.is_some())
            .returning(move |_| {
                calls += 1;
                if calls == 1 {
                    Err(ApiError::Network("connection reset".into()))
                } else {
                    Err(ApiError::Server {
                        status: 409,
                        message: "Product is out of stock".into(),
                    })
                }
            });
        let session = session(transport);
        session.begin().await.unwrap();
        let first_key = session.idempotency_key();

        session.confirm().unwrap();
        let err = session.place_order().await.unwrap_err();
        assert!(matches!(err, CheckoutError::Network(_)));
        assert_eq!(session.phase(), CheckoutPhase::Ready);
        assert_eq!(session.idempotency_key(), first_key);

        session.confirm().unwrap();
        let err = session.place_order().await.unwrap_err();
        assert_eq!(err.user_message(), "Product is out of stock");
        assert_ne!(session.idempotency_key(), first_key);
        assert_eq!(session.snapshot().selected_address_id.as_deref(), Some("a2"));
    }

    #[tokio::test]
    async fn test_cod_order_succeeds_and_invalidates_cart() {
        let mut transport = loading_transport(2);
        transport
            .expect_send()
            .once()
            .withf(|r| {
                let body = r.body.clone().unwrap_or_default();
                r.path == "/orders/checkout"
                    && body["paymentMethod"] == "cod"
                    && body["addressId"] == "a2"
                    && body["shippingAddress"]["city"] == "Kolkata"
            })
            .returning(|_| Ok(order_json("cod")));
        let session = session(transport);
        session.begin().await.unwrap();
        session.confirm().unwrap();

        let outcome = session.place_order().await.unwrap();
        assert!(matches!(outcome, CheckoutOutcome::Confirmed(_)));
        assert_eq!(
            outcome.route().screen(),
            crate::navigation::Screen::OrderSuccess
        );
        assert!(matches!(session.phase(), CheckoutPhase::Succeeded { .. }));
        assert!(!session.cart.is_confirmed_empty());
        assert_eq!(session.request_exit(), ExitDecision::Allowed);
    }

    #[tokio::test]
    async fn test_online_order_awaits_gateway() {
        let mut transport = loading_transport(1);
        transport
            .expect_send()
            .once()
            .withf(|r| r.path == "/orders/checkout")
            .returning(|_| Ok(order_json("upi")));
        let session = session(transport);
        session.begin().await.unwrap();
        session.select_payment_method(PaymentMethod::Upi).unwrap();
        session.confirm().unwrap();

        let outcome = session.place_order().await.unwrap();
        assert_eq!(
            outcome.route().screen(),
            crate::navigation::Screen::PaymentGateway
        );
        assert!(matches!(
            session.phase(),
            CheckoutPhase::AwaitingGateway { .. }
        ));
    }

    #[test]
    fn test_store_error_mapping() {
        let err = CheckoutError::from(StoreError::from(ApiError::Timeout { secs: 30 }));
        assert!(matches!(err, CheckoutError::Network(_)));

        let err = CheckoutError::from(StoreError::from(ApiError::Decode("bad".into())));
        assert!(matches!(err, CheckoutError::Unexpected(_)));

        let err = CheckoutError::from(StoreError::from(ApiError::Server {
            status: 400,
            message: "Minimum order not met".into(),
        }));
        assert_eq!(err.user_message(), "Minimum order not met");
    }
}
