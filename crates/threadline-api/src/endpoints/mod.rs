//! # Endpoint Groups
//!
//! One typed group per backend resource.
//!
//! ```text
//! cart()           GET /cart, POST /cart/items, PUT|DELETE /cart/items/:id,
//!                  DELETE /cart/clear
//! addresses()      GET /addresses
//! orders()         POST /orders/checkout, GET /orders, GET /orders/:id,
//!                  PUT /orders/:id/payment, PUT /orders/:id/cancel
//! payments()       POST /payments/create-order, /payments/verify,
//!                  /payments/failure
//! reseller()       GET /reseller/wallet, GET|POST /reseller/withdrawals
//! notifications()  GET /notifications, PUT /notifications/:id/read,
//!                  PUT /notifications/read-all
//! ```

mod addresses;
mod cart;
mod notifications;
mod orders;
mod payments;
mod reseller;

pub use addresses::AddressesApi;
pub use cart::CartApi;
pub use notifications::NotificationsApi;
pub use orders::OrdersApi;
pub use payments::PaymentsApi;
pub use reseller::ResellerApi;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::client::ApiClient;
    use crate::transport::MockTransport;

    pub fn client(transport: MockTransport) -> ApiClient {
        ApiClient::new(Arc::new(transport))
    }
}
