//! Error types for the bookstore inventory
//!
//! This module defines all error types raised by store operations.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::types::Isbn;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Result type alias for bookstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Field of a new title that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    /// Title is empty or whitespace
    EmptyTitle,
    /// Author is empty or whitespace
    EmptyAuthor,
    /// Copy count below one
    NonPositiveCopies,
    /// Price negative or not a finite number
    NegativePrice,
    /// Seeded sale miss count below zero
    NegativeSaleMisses,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            FieldError::EmptyTitle => "empty title",
            FieldError::EmptyAuthor => "empty author",
            FieldError::NonPositiveCopies => "non-positive copy count",
            FieldError::NegativePrice => "negative price",
            FieldError::NegativeSaleMisses => "negative sale miss count",
        };
        f.write_str(reason)
    }
}

/// Error types for the bookstore inventory
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A batch argument was absent
    #[error("Null input")]
    NullInput,

    /// Key is not a valid ISBN
    #[error("ISBN {0} is invalid")]
    InvalidIsbn(Isbn),

    /// A new title carries an invalid field
    #[error("Book {isbn} is invalid: {field}")]
    InvalidField {
        /// Title carrying the bad field
        isbn: Isbn,
        /// Which check failed
        field: FieldError,
    },

    /// Title already present (add) or repeated within one add batch
    #[error("ISBN {0} is duplicated")]
    DuplicateIsbn(Isbn),

    /// Title not present in the inventory
    #[error("ISBN {0} is not available")]
    IsbnNotFound(Isbn),

    /// Quantity in a copy request is not positive
    #[error("Number of copies {quantity} for ISBN {isbn} is invalid")]
    InvalidQuantity {
        /// Title of the request
        isbn: Isbn,
        /// Rejected quantity
        quantity: i32,
    },

    /// Purchase exceeded stock; the shortfalls were recorded as sale misses
    #[error("Books are not available: {} title(s) short", misses.len())]
    StockUnavailable {
        /// Every short title with its shortfall
        misses: Vec<(Isbn, i32)>,
    },

    /// Request argument outside its domain
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Lock protocol misuse (release without acquire, unsupported upgrade)
    #[error("Lock state error: {0}")]
    LockState(String),

    /// Lock could not be acquired within the configured timeout
    #[error("Lock acquisition timed out after {0:?}")]
    LockTimeout(Duration),

    /// Operation not supported by this store
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),
}

impl Error {
    /// Whether this error signals lock protocol misuse
    ///
    /// Such errors indicate a bug in the caller or the store, never a
    /// transient condition.
    pub fn is_lock_state(&self) -> bool {
        matches!(self, Error::LockState(_))
    }

    /// Whether this error was raised by batch validation
    ///
    /// Validation errors leave the inventory untouched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::NullInput
                | Error::InvalidIsbn(_)
                | Error::InvalidField { .. }
                | Error::DuplicateIsbn(_)
                | Error::IsbnNotFound(_)
                | Error::InvalidQuantity { .. }
                | Error::InvalidRequest(_)
        )
    }
}
