//! # Addresses Slice
//!
//! Saved addresses, read-only from the client's side. Checkout selects one;
//! it never owns it.

use serde::Serialize;
use threadline_api::ApiClient;
use threadline_core::Address;
use tracing::warn;

use crate::error::StoreResult;
use crate::slice::{Slice, SliceCell};

#[derive(Debug, Clone, PartialEq)]
pub enum AddressesAction {
    Pending,
    Fulfilled(Vec<Address>),
    Rejected(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressesState {
    pub items: Vec<Address>,
    pub loading: bool,
    pub error: Option<String>,
}

impl AddressesState {
    pub fn default_or_first(&self) -> Option<&Address> {
        default_or_first(&self.items)
    }
}

/// The default address, else the first one, else none.
pub fn default_or_first(addresses: &[Address]) -> Option<&Address> {
    addresses
        .iter()
        .find(|a| a.is_default)
        .or_else(|| addresses.first())
}

impl Slice for AddressesState {
    type Action = AddressesAction;

    fn reduce(&mut self, action: AddressesAction) {
        match action {
            AddressesAction::Pending => {
                self.loading = true;
                self.error = None;
            }
            AddressesAction::Fulfilled(items) => {
                self.loading = false;
                self.items = items;
            }
            AddressesAction::Rejected(message) => {
                self.loading = false;
                self.error = Some(message);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AddressesStore {
    state: SliceCell<AddressesState>,
    api: ApiClient,
}

impl AddressesStore {
    pub fn new(api: ApiClient) -> Self {
        AddressesStore {
            state: SliceCell::new(),
            api,
        }
    }

    pub fn snapshot(&self) -> AddressesState {
        self.state.snapshot()
    }

    pub async fn fetch_addresses(&self) -> StoreResult<Vec<Address>> {
        self.state.dispatch(AddressesAction::Pending);
        match self.api.addresses().list().await {
            Ok(items) => {
                self.state.dispatch(AddressesAction::Fulfilled(items.clone()));
                Ok(items)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load addresses");
                self.state
                    .dispatch(AddressesAction::Rejected(e.user_message()));
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(id: &str, is_default: bool) -> Address {
        Address {
            id: id.into(),
            name: "Asha".into(),
            phone: "9876543210".into(),
            address_line1: "12 MG Road".into(),
            address_line2: None,
            city: "Pune".into(),
            state: "MH".into(),
            pincode: "411001".into(),
            is_default,
        }
    }

    #[test]
    fn test_default_or_first() {
        let list = vec![address("a", false), address("b", true)];
        assert_eq!(default_or_first(&list).map(|a| a.id.as_str()), Some("b"));

        let list = vec![address("a", false), address("c", false)];
        assert_eq!(default_or_first(&list).map(|a| a.id.as_str()), Some("a"));

        assert!(default_or_first(&[]).is_none());
    }

    #[test]
    fn test_rejected_keeps_list() {
        let mut state = AddressesState::default();
        state.reduce(AddressesAction::Fulfilled(vec![address("a", true)]));
        state.reduce(AddressesAction::Pending);
        state.reduce(AddressesAction::Rejected("offline".into()));
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.error.as_deref(), Some("offline"));
    }
}
