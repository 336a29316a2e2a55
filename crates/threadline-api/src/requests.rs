//! Request bodies and the few response shapes that are not core entities.

use serde::{Deserialize, Serialize};
use threadline_core::{
    Money, Notification, OrderStatus, PaymentMethod, PaymentStatus, ShippingAddress,
};

// =============================================================================
// Cart
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
    pub quantity: i64,
    /// Reseller markup per unit; zero for plain customers.
    pub resell_price: Money,
}

impl AddToCartRequest {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        AddToCartRequest {
            product_id: product_id.into(),
            quantity,
            resell_price: Money::zero(),
        }
    }

    pub fn with_resell_price(mut self, resell_price: Money) -> Self {
        self.resell_price = resell_price;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartItemRequest {
    pub quantity: i64,
    pub resell_price: Money,
}

// =============================================================================
// Orders
// =============================================================================

/// Body of `POST /orders/checkout`. The backend snapshots the cart itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentRequest {
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Query for `GET /orders`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

// =============================================================================
// Payments
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGatewayOrderRequest {
    pub order_id: String,
}

/// The gateway-side order the payment SDK is opened with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayOrder {
    #[serde(alias = "id")]
    pub gateway_order_id: String,
    pub amount: Money,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Public key the SDK needs to open checkout.
    #[serde(default)]
    pub key: Option<String>,
}

fn default_currency() -> String {
    "INR".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    pub order_id: String,
    pub gateway_order_id: String,
    pub payment_id: String,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFailureRequest {
    pub order_id: String,
    pub gateway_order_id: String,
    pub reason: String,
}

// =============================================================================
// Reseller
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    pub amount: Money,
}

// =============================================================================
// Notifications
// =============================================================================

/// `GET /notifications` payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFeed {
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub unread_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_to_cart_defaults_markup_to_zero() {
        let body = serde_json::to_value(AddToCartRequest::new("p-1", 2)).unwrap();
        assert_eq!(
            body,
            json!({"productId": "p-1", "quantity": 2, "resellPrice": 0.0})
        );
    }

    #[test]
    fn test_gateway_order_aliases() {
        let order: GatewayOrder =
            serde_json::from_value(json!({"id": "gw_1", "amount": 708})).unwrap();
        assert_eq!(order.gateway_order_id, "gw_1");
        assert_eq!(order.currency, "INR");
        assert_eq!(order.amount, Money::from_rupees(708));
    }

    #[test]
    fn test_notification_feed_defaults() {
        let feed: NotificationFeed = serde_json::from_value(json!({})).unwrap();
        assert!(feed.notifications.is_empty());
        assert_eq!(feed.unread_count, 0);
    }
}
