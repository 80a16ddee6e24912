//! # Error Types
//!
//! Domain-specific error types for ordercart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  CoreError                                                              │
//! │  ├── InvalidPrice       - price input is not a finite decimal           │
//! │  ├── MalformedOrder     - restore given a structurally broken order     │
//! │  ├── AmountOutOfRange   - overflow while accumulating money             │
//! │  ├── Validation         - wraps ValidationError (settings)              │
//! │  └── Serialization      - JSON encoding failure                         │
//! │                                                                         │
//! │  Removing an item that is not in the cart is NOT an error.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors surfaced by order operations.
///
/// Every operation that returns one of these has left the order untouched.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A price could not be turned into an exact decimal.
    ///
    /// ## When This Occurs
    /// - `f64` input is NaN or infinite
    /// - String input is empty or not a decimal number
    /// - Value exceeds the 28-digit decimal range
    #[error("Invalid price '{input}': {reason}")]
    InvalidPrice { input: String, reason: String },

    /// A restored order does not have the shape the totals engine needs.
    #[error("Malformed order: {reason}")]
    MalformedOrder { reason: String },

    /// An amount left the representable range during arithmetic.
    #[error("Amount out of range while computing {field}")]
    AmountOutOfRange { field: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// JSON encoding of a snapshot failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        CoreError::MalformedOrder {
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_range(field: &str) -> Self {
        CoreError::AmountOutOfRange {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for settings.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

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
