//! # Validation Module
//!
//! Input validation for merchant settings, coupons and carts.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  └── Shape and types of the JSON documents                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (opt-in)                                         │
//! │  ├── Settings::validate, CouponCode::validate, LineItem::validate      │
//! │  └── Run when configuration is LOADED, never while pricing             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Calculator                                                   │
//! │  └── Accepts anything; degrades to "no tax" / "no discount"            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use checkout_core::validation::{validate_currency, validate_quantity};
//!
//! validate_currency("EUR").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::Percentage;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use checkout_core::validation::validate_sku;
///
/// assert!(validate_sku("BOOK-001").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product type used in tax rules and coupons.
///
/// Matching is exact, so surrounding whitespace is rejected rather than
/// trimmed: `"book "` would never match an item of type `"book"`.
pub fn validate_product_type(product_type: &str) -> ValidationResult<()> {
    if product_type.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product type".to_string(),
        });
    }

    if product_type.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "product type".to_string(),
            max: 64,
        });
    }

    if product_type.trim() != product_type {
        return Err(ValidationError::InvalidFormat {
            field: "product type".to_string(),
            reason: "must not start or end with whitespace".to_string(),
        });
    }

    Ok(())
}

/// Validates a buyer country as used in tax rules.
///
/// Countries are free-form strings compared exactly (`"DE"`, `"Germany"`);
/// only emptiness and stray whitespace are rejected.
pub fn validate_country(country: &str) -> ValidationResult<()> {
    if country.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "country".to_string(),
        });
    }

    if country.trim() != country {
        return Err(ValidationError::InvalidFormat {
            field: "country".to_string(),
            reason: "must not start or end with whitespace".to_string(),
        });
    }

    Ok(())
}

/// Validates an ISO 4217 style currency code.
///
/// ## Example
/// ```rust
/// use checkout_core::validation::validate_currency;
///
/// assert!(validate_currency("EUR").is_ok());
/// assert!(validate_currency("eur").is_err());
/// assert!(validate_currency("EURO").is_err());
/// ```
pub fn validate_currency(currency: &str) -> ValidationResult<()> {
    if currency.is_empty() {
        return Err(ValidationError::Required {
            field: "currency".to_string(),
        });
    }

    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency".to_string(),
            reason: "must be three uppercase letters".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a tax percentage.
///
/// ## Rules
/// - Between 0 and 100 (0% is a valid "zero-rated" rule)
pub fn validate_tax_percentage(percentage: Percentage) -> ValidationResult<()> {
    validate_percentage("tax percentage", percentage)
}

/// Validates a coupon percentage.
///
/// ## Rules
/// - Between 0 and 100; a discount above 100% would exceed the line value
pub fn validate_coupon_percentage(percentage: Percentage) -> ValidationResult<()> {
    validate_percentage("coupon percentage", percentage)
}

fn validate_percentage(field: &str, percentage: Percentage) -> ValidationResult<()> {
    if percentage.value() > 100 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: u64) -> ValidationResult<()> {
    if qty == 0 || qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size (number of line items).
///
/// ## Rules
/// - Must not exceed MAX_CART_ITEMS
pub fn validate_cart_size(items: usize) -> ValidationResult<()> {
    if items > MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as u64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
