//! Error types for command execution.
//!
//! All errors from command execution are represented by the [`Error`] enum.
//! These errors are:
//! - **Structured**: Each variant has typed fields for error details
//! - **Serializable**: Can be converted to/from JSON
//! - **Lossless**: No error information is lost in conversion from store errors

use bookstore_core::{FieldError, Isbn};
use serde::{Deserialize, Serialize};

/// Command execution errors.
///
/// # Categories
///
/// | Category | Variants | Description |
/// |----------|----------|-------------|
/// | Input | `NullInput`, `InvalidIsbn`, `InvalidField`, `InvalidQuantity`, `InvalidInput` | Bad request |
/// | Inventory | `DuplicateIsbn`, `IsbnNotFound`, `StockUnavailable` | Conflicts with stored titles |
/// | Locking | `LockTimeout`, `LockState` | Contention or protocol misuse |
/// | Other | `Unsupported`, `Serialization` | Unavailable operation or bad encoding |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Input Errors ====================
    /// A batch argument was absent
    #[error("null input")]
    NullInput,

    /// Key is not a valid ISBN
    #[error("invalid isbn: {isbn}")]
    InvalidIsbn { isbn: Isbn },

    /// New title carries an invalid field
    #[error("invalid book {isbn}: {field}")]
    InvalidField { isbn: Isbn, field: FieldError },

    /// Copy quantity not positive
    #[error("invalid quantity {quantity} for isbn {isbn}")]
    InvalidQuantity { isbn: Isbn, quantity: i32 },

    /// Request argument outside its domain
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    // ==================== Inventory Errors ====================
    /// Title already present or repeated in one batch
    #[error("duplicate isbn: {isbn}")]
    DuplicateIsbn { isbn: Isbn },

    /// Title not in the inventory
    #[error("isbn not found: {isbn}")]
    IsbnNotFound { isbn: Isbn },

    /// Purchase exceeded stock; every shortfall was recorded as a sale miss
    #[error("stock unavailable for {} title(s)", misses.len())]
    StockUnavailable { misses: Vec<(Isbn, i32)> },

    // ==================== Locking Errors ====================
    /// Lock not acquired within the configured timeout
    #[error("lock timeout after {waited_ms}ms")]
    LockTimeout { waited_ms: u64 },

    /// Lock protocol misuse (bug, never transient)
    #[error("lock state error: {reason}")]
    LockState { reason: String },

    // ==================== Other Errors ====================
    /// Operation not supported by the store
    #[error("unsupported operation: {operation}")]
    Unsupported { operation: String },

    /// Command or output could not be encoded or decoded
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization {
            reason: e.to_string(),
        }
    }
}
