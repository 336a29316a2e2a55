//! # Navigation Routes
//!
//! Screens are addressed by a typed route carrying its required params,
//! never by a name plus an untyped bag.
//!
//! ## Route Trees
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Role → Tree                                     │
//! │                                                                         │
//! │  customer / reseller                    admin                           │
//! │  ───────────────────                    ─────                           │
//! │  Home                                   AdminDashboard                  │
//! │  Cart ──► Checkout ──┬► OrderSuccess    AdminOrders                     │
//! │                      └► PaymentGateway  AdminProducts                   │
//! │  Orders ──► OrderDetail                 AdminUsers                      │
//! │  Notifications                          Notifications                   │
//! │  Wallet (reseller only)                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use threadline_core::{Order, UserRole};

/// A screen plus the params it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Home,
    Cart,
    Checkout,
    OrderSuccess { order: Order },
    PaymentGateway { order: Order },
    Orders,
    OrderDetail { order_id: String },
    Wallet,
    Notifications,
    AdminDashboard,
    AdminOrders,
    AdminProducts,
    AdminUsers,
}

/// Param-free identity of a route, used for tree membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Home,
    Cart,
    Checkout,
    OrderSuccess,
    PaymentGateway,
    Orders,
    OrderDetail,
    Wallet,
    Notifications,
    AdminDashboard,
    AdminOrders,
    AdminProducts,
    AdminUsers,
}

impl Route {
    pub fn screen(&self) -> Screen {
        match self {
            Route::Home => Screen::Home,
            Route::Cart => Screen::Cart,
            Route::Checkout => Screen::Checkout,
            Route::OrderSuccess { .. } => Screen::OrderSuccess,
            Route::PaymentGateway { .. } => Screen::PaymentGateway,
            Route::Orders => Screen::Orders,
            Route::OrderDetail { .. } => Screen::OrderDetail,
            Route::Wallet => Screen::Wallet,
            Route::Notifications => Screen::Notifications,
            Route::AdminDashboard => Screen::AdminDashboard,
            Route::AdminOrders => Screen::AdminOrders,
            Route::AdminProducts => Screen::AdminProducts,
            Route::AdminUsers => Screen::AdminUsers,
        }
    }
}

const STOREFRONT: &[Screen] = &[
    Screen::Home,
    Screen::Cart,
    Screen::Checkout,
    Screen::OrderSuccess,
    Screen::PaymentGateway,
    Screen::Orders,
    Screen::OrderDetail,
    Screen::Notifications,
];

const ADMIN: &[Screen] = &[
    Screen::AdminDashboard,
    Screen::AdminOrders,
    Screen::AdminProducts,
    Screen::AdminUsers,
    Screen::Notifications,
];

/// The set of screens reachable for a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTree {
    role: UserRole,
    screens: Vec<Screen>,
}

impl RouteTree {
    pub fn for_role(role: UserRole) -> Self {
        let screens = match role {
            UserRole::Admin => ADMIN.to_vec(),
            UserRole::Customer => STOREFRONT.to_vec(),
            UserRole::Reseller => {
                let mut screens = STOREFRONT.to_vec();
                screens.push(Screen::Wallet);
                screens
            }
        };
        RouteTree { role, screens }
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn initial(&self) -> Route {
        if self.role.is_admin() {
            Route::AdminDashboard
        } else {
            Route::Home
        }
    }

    pub fn contains(&self, screen: Screen) -> bool {
        self.screens.contains(&screen)
    }

    pub fn allows(&self, route: &Route) -> bool {
        self.contains(route.screen())
    }

    /// Cart → Checkout → (OrderSuccess | PaymentGateway) is reachable.
    pub fn has_checkout_path(&self) -> bool {
        [
            Screen::Cart,
            Screen::Checkout,
            Screen::OrderSuccess,
            Screen::PaymentGateway,
        ]
        .iter()
        .all(|s| self.contains(*s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storefront_trees_have_checkout_path() {
        for role in [UserRole::Customer, UserRole::Reseller] {
            let tree = RouteTree::for_role(role);
            assert!(tree.has_checkout_path(), "{role:?}");
            assert_eq!(tree.initial(), Route::Home);
            assert!(!tree.contains(Screen::AdminDashboard));
        }
    }

    #[test]
    fn test_admin_tree_is_disjoint_from_storefront() {
        let tree = RouteTree::for_role(UserRole::Admin);
        assert!(!tree.has_checkout_path());
        assert!(!tree.allows(&Route::Cart));
        assert!(tree.allows(&Route::AdminOrders));
        assert_eq!(tree.initial(), Route::AdminDashboard);
    }

    #[test]
    fn test_wallet_is_reseller_only() {
        assert!(RouteTree::for_role(UserRole::Reseller).allows(&Route::Wallet));
        assert!(!RouteTree::for_role(UserRole::Customer).allows(&Route::Wallet));
    }

    #[test]
    fn test_order_detail_carries_id() {
        let route = Route::OrderDetail {
            order_id: "o-1".into(),
        };
        assert_eq!(route.screen(), Screen::OrderDetail);
    }
}
