//! # Store
//!
//! The composed client state: one store per domain slice, all sharing one
//! [`ApiClient`]. Cloning a slice store shares its state.

use std::sync::Arc;

use threadline_api::ApiClient;

use crate::checkout::CheckoutSession;
use crate::payment::{PaymentFlow, PaymentGateway};
use crate::slices::{AddressesStore, CartStore, NotificationsStore, OrdersStore, ResellerStore};

#[derive(Debug, Clone)]
pub struct Store {
    pub cart: CartStore,
    pub orders: OrdersStore,
    pub addresses: AddressesStore,
    pub reseller: ResellerStore,
    pub notifications: NotificationsStore,
    api: ApiClient,
}

impl Store {
    pub fn new(api: ApiClient) -> Self {
        Store {
            cart: CartStore::new(api.clone()),
            orders: OrdersStore::new(api.clone()),
            addresses: AddressesStore::new(api.clone()),
            reseller: ResellerStore::new(api.clone()),
            notifications: NotificationsStore::new(api.clone()),
            api,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// A fresh checkout session over the shared cart, addresses and orders.
    pub fn checkout(&self) -> CheckoutSession {
        CheckoutSession::new(
            self.cart.clone(),
            self.addresses.clone(),
            self.orders.clone(),
        )
    }

    pub fn payments(&self, gateway: Arc<dyn PaymentGateway>) -> PaymentFlow {
        PaymentFlow::new(self.api.clone(), self.orders.clone(), gateway)
    }
}
