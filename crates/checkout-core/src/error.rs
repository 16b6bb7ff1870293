//! # Error Types
//!
//! Domain-specific error types for checkout-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  checkout-core errors (this file)                                      │
//! │  ├── CoreError        - Invalid settings, coupons, line items          │
//! │  └── ValidationError  - Single-field validation failures               │
//! │                                                                         │
//! │  checkout-cli errors (app)                                             │
//! │  └── CliError         - File, parse and configuration failures         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CliError → exit status            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pricing Never Fails
//! None of these errors can come out of the calculator. They are produced
//! only by the opt-in `validate` methods used when loading configuration
//! and carts.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Invalid pricing inputs, reported with the position of the culprit.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A tax rule in the merchant settings is malformed.
    #[error("Tax rule #{index} is invalid: {source}")]
    InvalidTaxRule {
        index: usize,
        #[source]
        source: ValidationError,
    },

    /// A line item of a cart is malformed.
    #[error("Line item #{index} ({sku}) is invalid: {source}")]
    InvalidLineItem {
        index: usize,
        sku: String,
        #[source]
        source: ValidationError,
    },

    /// The coupon is malformed.
    #[error("Coupon '{code}' is invalid: {source}")]
    InvalidCoupon {
        code: String,
        #[source]
        source: ValidationError,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: u64, max: u64 },

    /// Invalid format (e.g., lowercase currency code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
