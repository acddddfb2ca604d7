//! Core types for the bookstore inventory
//!
//! This crate defines the foundational types used throughout the system:
//! - Isbn: Item key, valid when strictly positive
//! - StockBook: Full stock view of a title (immutable snapshot)
//! - Book: Minimal customer-facing view of a title
//! - BookCopy / BookEditorPick / BookRating: Batch request elements
//! - Error: Error type hierarchy shared by every layer
//! - Validation: Stateless field checks (key, title/author, copies, price)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;
pub mod validation;

pub use error::{Error, FieldError, Result};
pub use types::{Book, BookCopy, BookEditorPick, BookRating, Isbn, StockBook};
pub use validation::{validate_isbn, validate_new_book, validate_quantity};
