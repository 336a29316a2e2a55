//! # Cart Slice
//!
//! Local mirror of the server-side cart.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Slice Operations                                │
//! │                                                                         │
//! │  Screen Action          Store Op                 Request                │
//! │  ─────────────          ────────                 ───────                │
//! │  Focus cart ──────────► fetch_cart() ──────────► GET /cart              │
//! │  Add product ─────────► add_to_cart() ─────────► POST /cart/items       │
//! │  +/- quantity ────────► update_cart_item() ────► PUT /cart/items/:id    │
//! │  Remove ──────────────► remove_from_cart() ────► DELETE /cart/items/:id │
//! │  Clear ───────────────► clear_cart() ──────────► DELETE /cart/clear     │
//! │                                                                         │
//! │  Fulfilled: items/totalItems/totalPrice replaced verbatim (no merge)    │
//! │  Rejected:  error set, previous cart kept                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Emptiness
//! A cart that was never fetched is *unknown*, not empty. Only a successful
//! fetch or clear that came back with zero lines makes
//! [`CartState::is_confirmed_empty`] true, so a stale local copy can never
//! block a legitimate checkout.
//!
//! ## In-Flight Tracking
//! `loading` stays set until every outstanding operation has settled. An
//! operation whose future is dropped before the response arrives settles as
//! [`CartAction::Abandoned`], which releases its share of `loading` (and
//! the update gate) without touching the cart or the error.

use std::future::Future;

use serde::Serialize;
use threadline_api::{AddToCartRequest, ApiClient, ApiResult, UpdateCartItemRequest};
use threadline_core::validation::{validate_quantity, validate_resell_price};
use threadline_core::{Cart, Money};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::slice::{Slice, SliceCell};

// =============================================================================
// State
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOp {
    Fetch,
    Add,
    Update,
    Remove,
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    Pending(CartOp),
    Fulfilled(CartOp, Cart),
    Rejected(CartOp, String),
    /// The caller stopped waiting; the outcome is unknown.
    Abandoned(CartOp),
    /// The server changed the cart behind our back (e.g. order placed).
    Invalidate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    pub cart: Cart,
    /// True while any operation is outstanding.
    pub loading: bool,
    /// Outstanding operations.
    pub pending: u32,
    /// True while a quantity update is outstanding.
    pub updating: bool,
    pub error: Option<String>,
    /// Set by a fulfilled fetch/clear, reset by invalidation.
    pub synced: bool,
}

impl CartState {
    pub fn is_confirmed_empty(&self) -> bool {
        self.synced && self.cart.is_empty()
    }
}

impl Slice for CartState {
    type Action = CartAction;

    fn reduce(&mut self, action: CartAction) {
        match action {
            CartAction::Pending(op) => {
                self.pending += 1;
                self.error = None;
                if op == CartOp::Update {
                    self.updating = true;
                }
            }
            CartAction::Fulfilled(op, cart) => {
                self.cart = cart;
                if matches!(op, CartOp::Fetch | CartOp::Clear) {
                    self.synced = true;
                }
                self.settled(op);
            }
            CartAction::Rejected(op, message) => {
                self.error = Some(message);
                self.settled(op);
            }
            CartAction::Abandoned(op) => self.settled(op),
            CartAction::Invalidate => {
                self.synced = false;
            }
        }
        self.loading = self.pending > 0;
    }
}

impl CartState {
    fn settled(&mut self, op: CartOp) {
        self.pending = self.pending.saturating_sub(1);
        if op == CartOp::Update {
            self.updating = false;
        }
    }
}

/// One outstanding cart request. Dropped unsettled, it dispatches
/// [`CartAction::Abandoned`].
struct InFlight<'a> {
    state: &'a SliceCell<CartState>,
    op: CartOp,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, action: CartAction) {
        self.settled = true;
        self.state.dispatch(action);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            debug!(op = ?self.op, "Cart operation abandoned");
            self.state.dispatch(CartAction::Abandoned(self.op));
        }
    }
}

// =============================================================================
// Store
// =============================================================================

#[derive(Debug, Clone)]
pub struct CartStore {
    state: SliceCell<CartState>,
    api: ApiClient,
}

impl CartStore {
    pub fn new(api: ApiClient) -> Self {
        CartStore {
            state: SliceCell::new(),
            api,
        }
    }

    pub fn snapshot(&self) -> CartState {
        self.state.snapshot()
    }

    pub fn is_confirmed_empty(&self) -> bool {
        self.state.with_state(CartState::is_confirmed_empty)
    }

    /// Marks the local copy stale without a request.
    pub fn invalidate(&self) {
        self.state.dispatch(CartAction::Invalidate);
    }

    pub async fn fetch_cart(&self) -> StoreResult<Cart> {
        let flight = self.start(CartOp::Fetch);
        settle(flight, self.api.cart().fetch()).await
    }

    pub async fn add_to_cart(
        &self,
        product_id: &str,
        quantity: i64,
        resell_price: Money,
    ) -> StoreResult<Cart> {
        validate_quantity(quantity)?;
        validate_resell_price(resell_price)?;

        let request = AddToCartRequest::new(product_id, quantity).with_resell_price(resell_price);
        let flight = self.start(CartOp::Add);
        settle(flight, self.api.cart().add_item(&request)).await
    }

    /// Changes a line's quantity/markup.
    ///
    /// Dropped with [`StoreError::UpdateInFlight`] while a previous update
    /// has not completed; the gate opens again when that request finishes,
    /// whatever its outcome, or when its caller stops waiting for it.
    pub async fn update_cart_item(
        &self,
        item_id: &str,
        quantity: i64,
        resell_price: Money,
    ) -> StoreResult<Cart> {
        validate_quantity(quantity)?;
        validate_resell_price(resell_price)?;

        let admitted = self.state.with_state_mut(|state| {
            if state.updating {
                return false;
            }
            state.reduce(CartAction::Pending(CartOp::Update));
            true
        });
        if !admitted {
            debug!(item_id = %item_id, "Dropping quantity change, update in flight");
            return Err(StoreError::UpdateInFlight);
        }

        let flight = InFlight {
            state: &self.state,
            op: CartOp::Update,
            settled: false,
        };

        let request = UpdateCartItemRequest {
            quantity,
            resell_price,
        };
        settle(flight, self.api.cart().update_item(item_id, &request)).await
    }

    pub async fn remove_from_cart(&self, item_id: &str) -> StoreResult<Cart> {
        let flight = self.start(CartOp::Remove);
        settle(flight, self.api.cart().remove_item(item_id)).await
    }

    pub async fn clear_cart(&self) -> StoreResult<Cart> {
        let flight = self.start(CartOp::Clear);
        settle(flight, self.api.cart().clear()).await
    }

    fn start(&self, op: CartOp) -> InFlight<'_> {
        self.state.dispatch(CartAction::Pending(op));
        InFlight {
            state: &self.state,
            op,
            settled: false,
        }
    }
}

async fn settle<F>(flight: InFlight<'_>, call: F) -> StoreResult<Cart>
where
    F: Future<Output = ApiResult<Cart>>,
{
    let op = flight.op;
    match call.await {
        Ok(cart) => {
            debug!(?op, total_items = cart.total_items, total = %cart.total_price, "Cart updated");
            flight.settle(CartAction::Fulfilled(op, cart.clone()));
            Ok(cart)
        }
        Err(e) => {
            warn!(?op, error = %e, "Cart operation failed");
            flight.settle(CartAction::Rejected(op, e.user_message()));
            Err(e.into())
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
