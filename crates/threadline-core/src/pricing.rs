//! # Checkout Price Preview
//!
//! Display-only estimate shown on the checkout screen before an order
//! exists. Once the backend creates the order, screens switch to the
//! order's own `subtotal/shipping/tax/total` and this preview is discarded.
//!
//! ```text
//! subtotal (server cart total)
//!     │
//!     ├── shipping = 0          if subtotal > ₹500
//!     │            = ₹50 flat   otherwise
//!     │
//!     ├── tax      = round(subtotal × 18%) to the whole rupee
//!     │
//!     └── total    = subtotal + shipping + tax
//! ```

use serde::Serialize;

use crate::money::Money;
use crate::types::TaxRate;
use crate::{FLAT_SHIPPING_FEE_PAISE, FREE_SHIPPING_THRESHOLD_PAISE, GST_RATE_BPS};

/// A client-side estimate of what checkout will cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePreview {
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
}

impl PricePreview {
    /// Builds the preview from the server-echoed cart total.
    ///
    /// Item count plays no part: only the subtotal matters.
    ///
    /// ```rust
    /// use threadline_core::money::Money;
    /// use threadline_core::pricing::PricePreview;
    ///
    /// let p = PricePreview::for_subtotal(Money::from_rupees(400));
    /// assert_eq!(p.shipping, Money::from_rupees(50));
    /// assert_eq!(p.tax, Money::from_rupees(72));
    /// assert_eq!(p.total, Money::from_rupees(522));
    /// ```
    pub fn for_subtotal(subtotal: Money) -> Self {
        let shipping = shipping_for(subtotal);
        let tax = subtotal.calculate_tax_to_rupee(TaxRate::from_bps(GST_RATE_BPS));

        PricePreview {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }

    pub fn has_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

fn shipping_for(subtotal: Money) -> Money {
    if subtotal.paise() > FREE_SHIPPING_THRESHOLD_PAISE {
        Money::zero()
    } else {
        Money::from_paise(FLAT_SHIPPING_FEE_PAISE)
    }
}
