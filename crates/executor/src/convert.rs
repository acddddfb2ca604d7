//! Error conversion from store errors.

use crate::Error;
use bookstore_core::Error as StoreError;

/// Convert a store error to an executor Error, keeping every detail.
impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NullInput => Error::NullInput,
            StoreError::InvalidIsbn(isbn) => Error::InvalidIsbn { isbn },
            StoreError::InvalidField { isbn, field } => Error::InvalidField { isbn, field },
            StoreError::DuplicateIsbn(isbn) => Error::DuplicateIsbn { isbn },
            StoreError::IsbnNotFound(isbn) => Error::IsbnNotFound { isbn },
            StoreError::InvalidQuantity { isbn, quantity } => {
                Error::InvalidQuantity { isbn, quantity }
            }
            StoreError::StockUnavailable { misses } => Error::StockUnavailable { misses },
            StoreError::InvalidRequest(reason) => Error::InvalidInput { reason },
            StoreError::LockState(reason) => Error::LockState { reason },
            StoreError::LockTimeout(waited) => Error::LockTimeout {
                waited_ms: u64::try_from(waited.as_millis()).unwrap_or(u64::MAX),
            },
            StoreError::Unsupported(operation) => Error::Unsupported {
                operation: operation.to_string(),
            },
        }
    }
}
