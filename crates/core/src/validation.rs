//! Stateless field validation
//!
//! Checks that depend only on the request itself. Checks against the current
//! inventory (presence, duplicates, stock) live with the store.

use crate::error::{Error, FieldError, Result};
use crate::types::{Isbn, StockBook};

/// Validate an ISBN used as an inventory key
pub fn validate_isbn(isbn: Isbn) -> Result<()> {
    if !isbn.is_valid() {
        return Err(Error::InvalidIsbn(isbn));
    }
    Ok(())
}

/// Validate the fields of a title about to be added
///
/// Checks, in order: key, title, author, copy count, price, sale misses.
pub fn validate_new_book(book: &StockBook) -> Result<()> {
    validate_isbn(book.isbn)?;

    let field = if is_blank(&book.title) {
        Some(FieldError::EmptyTitle)
    } else if is_blank(&book.author) {
        Some(FieldError::EmptyAuthor)
    } else if book.num_copies < 1 {
        Some(FieldError::NonPositiveCopies)
    } else if !(book.price.is_finite() && book.price >= 0.0) {
        Some(FieldError::NegativePrice)
    } else if book.sale_misses < 0 {
        Some(FieldError::NegativeSaleMisses)
    } else {
        None
    };

    match field {
        Some(field) => Err(Error::InvalidField {
            isbn: book.isbn,
            field,
        }),
        None => Ok(()),
    }
}

/// Validate a restock or purchase quantity
pub fn validate_quantity(isbn: Isbn, quantity: i32) -> Result<()> {
    if quantity < 1 {
        return Err(Error::InvalidQuantity { isbn, quantity });
    }
    Ok(())
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
