//! # Validation Module
//!
//! Checks run before a request is sent.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE (client)                                         │
//! │  ├── Quantity bounds, markup sign                                      │
//! │  ├── Checkout address gate (name / phone / city)                       │
//! │  └── Shown immediately as an inline alert, no request sent             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Backend                                                       │
//! │  ├── Stock, price and discount rules                                   │
//! │  └── Rejections come back as business errors (non-2xx + message)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use threadline_core::validation::{validate_quantity, validate_resell_price};
//! use threadline_core::Money;
//!
//! assert!(validate_quantity(2).is_ok());
//! assert!(validate_resell_price(Money::zero()).is_ok());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Address;
use crate::{MAX_ITEM_QUANTITY, MIN_WITHDRAWAL_PAISE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Cart Validators
// =============================================================================

/// Validates a cart line quantity.
///
/// ## Rules
/// - Must be at least 1 (removal is a separate call, not quantity 0)
/// - Must not exceed `MAX_ITEM_QUANTITY`
///
/// ```rust
/// use threadline_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(11).is_err());
/// ```
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a reseller markup. Zero means "no markup".
pub fn validate_resell_price(resell_price: Money) -> ValidationResult<()> {
    if resell_price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "resellPrice".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Address Validators
// =============================================================================

/// The checkout gate for a selected address.
///
/// Only name, phone and city are required here; the rest of the address
/// was validated when it was saved to the profile.
pub fn validate_checkout_address(address: &Address) -> ValidationResult<()> {
    for (field, value) in [
        ("name", &address.name),
        ("phone", &address.phone),
        ("city", &address.city),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::Required {
                field: field.to_string(),
            });
        }
    }
    Ok(())
}

// =============================================================================
// Wallet Validators
// =============================================================================

/// Validates a withdrawal request against the wallet's available balance.
///
/// ```rust
/// use threadline_core::money::Money;
/// use threadline_core::validation::validate_withdrawal_amount;
///
/// let available = Money::from_rupees(1000);
/// assert!(validate_withdrawal_amount(Money::from_rupees(500), available).is_ok());
/// assert!(validate_withdrawal_amount(Money::from_rupees(50), available).is_err());
/// assert!(validate_withdrawal_amount(Money::from_rupees(1500), available).is_err());
/// ```
pub fn validate_withdrawal_amount(amount: Money, available: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    let minimum = Money::from_paise(MIN_WITHDRAWAL_PAISE);
    if amount < minimum {
        return Err(ValidationError::OutOfRange {
            field: "amount".to_string(),
            min: minimum.rupees(),
            max: available.rupees(),
        });
    }

    if amount > available {
        return Err(ValidationError::ExceedsAvailable {
            field: "amount".to_string(),
            available: available.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn address(name: &str, phone: &str, city: &str) -> Address {
        Address {
            id: "a-1".into(),
            name: name.into(),
            phone: phone.into(),
            address_line1: "12 MG Road".into(),
            address_line2: None,
            city: city.into(),
            state: "MH".into(),
            pincode: "411001".into(),
            is_default: false,
        }
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_resell_price() {
        assert!(validate_resell_price(Money::zero()).is_ok());
        assert!(validate_resell_price(Money::from_rupees(80)).is_ok());
        assert!(validate_resell_price(Money::from_paise(-1)).is_err());
    }

    #[test]
    fn test_checkout_address_gate() {
        assert!(validate_checkout_address(&address("Asha", "9876543210", "Pune")).is_ok());

        let err = validate_checkout_address(&address("Asha", "  ", "Pune")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Required {
                field: "phone".to_string()
            }
        );

        let err = validate_checkout_address(&address("", "9876543210", "")).unwrap_err();
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn test_validate_withdrawal_amount() {
        let available = Money::from_rupees(1000);
        assert!(validate_withdrawal_amount(Money::from_rupees(100), available).is_ok());
        assert!(validate_withdrawal_amount(Money::from_rupees(1000), available).is_ok());
        assert!(validate_withdrawal_amount(Money::zero(), available).is_err());
        assert!(matches!(
            validate_withdrawal_amount(Money::from_rupees(1001), available),
            Err(ValidationError::ExceedsAvailable { .. })
        ));
    }
}
