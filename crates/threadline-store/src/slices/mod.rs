//! Per-domain state slices. Each owns a disjoint part of client state.

pub mod addresses;
pub mod cart;
pub mod notifications;
pub mod orders;
pub mod reseller;

pub use addresses::{default_or_first, AddressesState, AddressesStore};
pub use cart::{CartState, CartStore};
pub use notifications::{NotificationsState, NotificationsStore};
pub use orders::{OrdersState, OrdersStore};
pub use reseller::{ResellerState, ResellerStore};
