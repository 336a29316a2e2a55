//! # Domain Types
//!
//! Entities as the storefront backend returns them.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Cart       │   │     Order       │   │     Wallet      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  items[]        │   │  orderNo        │   │  available      │       │
//! │  │  totalItems     │   │  items[] (snap) │   │  pending        │       │
//! │  │  totalPrice     │   │  address (snap) │   │  totalEarned    │       │
//! │  └─────────────────┘   │  total          │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Address      │   │  OrderStatus    │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name, phone    │   │  pending        │   │  cod            │       │
//! │  │  line1, city    │   │  ...delivered   │   │  upi, card      │       │
//! │  │  pincode        │   │  cancelled      │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! Every entity here is owned and persisted by the backend. The client only
//! holds transient copies that are refetched whenever a flow is (re)entered.
//! Totals (`Cart::total_price`, `Order::total`) are taken verbatim from the
//! server and never recomputed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (1800 = 18%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Catalog Reference
// =============================================================================

/// Product data embedded in cart lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductRef {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    /// Catalog price per unit.
    pub price: Money,
}

// =============================================================================
// Cart
// =============================================================================

/// A line in the server-side cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    /// Cart line id (`itemId` in update/remove calls).
    #[serde(alias = "_id", alias = "itemId")]
    pub id: String,
    pub product: ProductRef,
    pub quantity: i64,
    /// Reseller markup per unit. Zero for plain customers.
    #[serde(default)]
    pub resell_price: Money,
    /// Server-computed price of the line.
    pub final_price: Money,
}

/// The cart exactly as the server echoed it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total_items: i64,
    #[serde(default)]
    pub total_price: Money,
}

impl Cart {
    /// Checks whether the server returned no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Finds a line by its cart item id.
    pub fn item(&self, item_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == item_id)
    }
}

// =============================================================================
// Addresses
// =============================================================================

/// A saved address from the user's profile.
///
/// Profile addresses can be incomplete. Missing or `null` text fields decode
/// as empty strings so one bad entry cannot fail the whole list; the
/// checkout gate names the blank field instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Address {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub phone: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub city: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub state: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub pincode: String,
    #[serde(default)]
    pub is_default: bool,
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Address snapshot captured into an order at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShippingAddress {
    pub name: String,
    pub phone: String,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl From<&Address> for ShippingAddress {
    fn from(address: &Address) -> Self {
        ShippingAddress {
            name: address.name.trim().to_string(),
            phone: address.phone.trim().to_string(),
            address_line1: address.address_line1.trim().to_string(),
            address_line2: address
                .address_line2
                .as_ref()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
            city: address.city.trim().to_string(),
            state: address.state.trim().to_string(),
            pincode: address.pincode.trim().to_string(),
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentMethod {
    /// Cash on delivery, settled outside the app.
    #[default]
    Cod,
    /// UPI through the payment gateway.
    Upi,
    /// Card through the payment gateway.
    Card,
}

impl PaymentMethod {
    /// Online methods go through the gateway handoff after order creation.
    pub const fn is_online(&self) -> bool {
        !matches!(self, PaymentMethod::Cod)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "cod",
            PaymentMethod::Upi => "upi",
            PaymentMethod::Card => "card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cod" | "cash" => Ok(PaymentMethod::Cod),
            "upi" => Ok(PaymentMethod::Upi),
            "card" => Ok(PaymentMethod::Card),
            other => Err(CoreError::UnknownVariant {
                kind: "payment method",
                value: other.to_string(),
            }),
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Fulfilment status, mutated server-side only.
///
/// ```text
/// pending ──► confirmed ──► processing ──► shipped ──► delivered ──► returned
///    │            │
///    └────────────┴──► cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
}

impl OrderStatus {
    /// Whether the cancel action should be offered. The server still decides.
    pub const fn is_cancellable(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Confirmed)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Returned => "returned",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            "returned" => Ok(OrderStatus::Returned),
            other => Err(CoreError::UnknownVariant {
                kind: "order status",
                value: other.to_string(),
            }),
        }
    }
}

// =============================================================================
// Payment Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" | "paid" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(CoreError::UnknownVariant {
                kind: "payment status",
                value: other.to_string(),
            }),
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// A line frozen into an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderItem {
    #[serde(alias = "product")]
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub quantity: i64,
    /// Unit price at time of order (frozen).
    pub price: Money,
    #[serde(default)]
    pub resell_price: Money,
    pub total: Money,
}

/// An order snapshot. Immutable except for the two status fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "orderNumber")]
    pub order_no: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub order_status: OrderStatus,
    pub subtotal: Money,
    #[serde(default)]
    pub shipping: Money,
    #[serde(default)]
    pub tax: Money,
    /// Authoritative total. Screens show this after creation, never a preview.
    pub total: Money,
    /// Gateway payment id once a payment was verified.
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Reseller Wallet
// =============================================================================

/// A reseller's commission ledger summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Wallet {
    /// Withdrawable now.
    #[serde(alias = "balance")]
    pub available_balance: Money,
    /// Commission still inside the lock period.
    #[serde(default)]
    pub pending_balance: Money,
    #[serde(default)]
    pub total_earned: Money,
    #[serde(default)]
    pub total_withdrawn: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum WithdrawalStatus {
    #[default]
    Pending,
    Approved,
    Completed,
    Rejected,
}

/// A payout request against the wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Withdrawal {
    #[serde(alias = "_id")]
    pub id: String,
    pub amount: Money,
    #[serde(default)]
    pub status: WithdrawalStatus,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub requested_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Notifications
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Notification {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub message: String,
    /// Free-form category (`order`, `commission`, `promo`, ...).
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// User Role
// =============================================================================

/// Role of the authenticated user; selects the navigation tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum UserRole {
    #[default]
    Customer,
    Reseller,
    Admin,
}

impl UserRole {
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl FromStr for UserRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "customer" | "user" => Ok(UserRole::Customer),
            "reseller" => Ok(UserRole::Reseller),
            "admin" => Ok(UserRole::Admin),
            other => Err(CoreError::UnknownVariant {
                kind: "user role",
                value: other.to_string(),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_deserializes_server_shape() {
        let json = r#"{
            "items": [{
                "_id": "line-1",
                "product": {"_id": "p-1", "name": "Linen Kurta", "images": [], "price": 499},
                "quantity": 2,
                "resellPrice": 50,
                "finalPrice": 1098
            }],
            "totalItems": 2,
            "totalPrice": 1098
        }"#;

        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].id, "line-1");
        assert_eq!(cart.items[0].resell_price, Money::from_rupees(50));
        assert_eq!(cart.total_price, Money::from_rupees(1098));
        assert!(cart.item("line-1").is_some());
    }

    #[test]
    fn test_empty_cart_payload() {
        let cart: Cart = serde_json::from_str("{}").unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items, 0);
    }

    #[test]
    fn test_shipping_address_snapshot_trims() {
        let address = Address {
            id: "a-1".into(),
            name: " Asha ".into(),
            phone: "9876543210".into(),
            address_line1: "12 MG Road".into(),
            address_line2: Some("  ".into()),
            city: "Pune".into(),
            state: "MH".into(),
            pincode: "411001".into(),
            is_default: true,
        };
        let snapshot = ShippingAddress::from(&address);
        assert_eq!(snapshot.name, "Asha");
        assert_eq!(snapshot.address_line2, None);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["addressLine1"], "12 MG Road");
        assert!(json.get("addressLine2").is_none());
    }

    #[test]
    fn test_incomplete_address_still_decodes() {
        let addresses: Vec<Address> = serde_json::from_str(
            r#"[
                {"_id": "a1", "name": "Asha", "phone": "9876543210", "addressLine1": "12 MG Road",
                 "city": "Pune", "state": "MH", "pincode": "411001", "isDefault": true},
                {"_id": "a2", "name": "Ravi", "phone": null, "city": "Kolkata"}
            ]"#,
        )
        .unwrap();

        assert_eq!(addresses.len(), 2);
        assert_eq!(addresses[1].phone, "");
        assert_eq!(addresses[1].pincode, "");
        assert!(!addresses[1].is_default);
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("cod".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cod);
        assert_eq!("UPI".parse::<PaymentMethod>().unwrap(), PaymentMethod::Upi);
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
        assert!(!PaymentMethod::Cod.is_online());
        assert!(PaymentMethod::Upi.is_online());
    }

    #[test]
    fn test_order_status_wire_names() {
        let status: OrderStatus = serde_json::from_str("\"shipped\"").unwrap();
        assert_eq!(status, OrderStatus::Shipped);
        assert!(OrderStatus::Pending.is_cancellable());
        assert!(!OrderStatus::Shipped.is_cancellable());
        assert_eq!("Canceled".parse::<OrderStatus>().unwrap(), OrderStatus::Cancelled);
        assert!("lost".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_wallet_balance_alias() {
        let wallet: Wallet = serde_json::from_str(r#"{"balance": 1200, "pendingBalance": 300}"#)
            .unwrap();
        assert_eq!(wallet.available_balance, Money::from_rupees(1200));
        assert_eq!(wallet.pending_balance, Money::from_rupees(300));
        assert!(wallet.total_earned.is_zero());
    }

    #[test]
    fn test_notification_type_field() {
        let n: Notification =
            serde_json::from_str(r#"{"_id": "n1", "title": "Shipped", "type": "order"}"#).unwrap();
        assert_eq!(n.kind, "order");
        assert!(!n.is_read);
    }

    #[test]
    fn test_user_role() {
        assert!("admin".parse::<UserRole>().unwrap().is_admin());
        assert_eq!(UserRole::default(), UserRole::Customer);
    }
}
