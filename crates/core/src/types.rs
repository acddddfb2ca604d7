//! Value types for the bookstore inventory
//!
//! This module defines the plain values that cross the store boundary:
//! - Isbn: The key identifying a title
//! - StockBook: Stock view of a title (counts, misses, editor pick)
//! - Book: Customer view of a title (no stock information)
//! - BookCopy, BookEditorPick, BookRating: Elements of batch requests
//!
//! All of these are immutable snapshots. The store never hands out references
//! into its live state; callers always receive copies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key identifying a title in the inventory (ISBN-equivalent)
///
/// Only strictly positive values are valid. Invalid keys can still be
/// constructed so that requests carrying them can be rejected with a
/// precise error instead of failing at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Isbn(i32);

impl Isbn {
    /// Create an ISBN from its raw value
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw numeric value
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Whether this ISBN is usable as an inventory key
    pub const fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl From<i32> for Isbn {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stock view of a title
///
/// Used both as the input to `add_books` and as the snapshot returned by
/// stock queries. `copies_in_stock` never exceeds `num_copies`, which counts
/// every copy ever stocked for the title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockBook {
    /// Inventory key
    pub isbn: Isbn,
    /// Title, must not be blank
    pub title: String,
    /// Author, must not be blank
    pub author: String,
    /// Unit price, must be finite and non-negative
    pub price: f32,
    /// Total copies ever stocked
    pub num_copies: i32,
    /// Copies currently available for sale
    pub copies_in_stock: i32,
    /// Accumulated shortfall of failed purchases
    pub sale_misses: i64,
    /// Whether the title is an editor pick
    pub editor_pick: bool,
}

impl StockBook {
    /// Create a stock entry with every stocked copy available
    pub fn new(
        isbn: impl Into<Isbn>,
        title: impl Into<String>,
        author: impl Into<String>,
        price: f32,
        num_copies: i32,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            price,
            num_copies,
            copies_in_stock: num_copies,
            sale_misses: 0,
            editor_pick: false,
        }
    }

    /// Set the editor pick flag (builder pattern)
    pub fn with_editor_pick(mut self, editor_pick: bool) -> Self {
        self.editor_pick = editor_pick;
        self
    }

    /// Set the initial sale miss count (builder pattern)
    pub fn with_sale_misses(mut self, sale_misses: i64) -> Self {
        self.sale_misses = sale_misses;
        self
    }

    /// Project to the customer-facing view
    pub fn to_book(&self) -> Book {
        Book {
            isbn: self.isbn,
            title: self.title.clone(),
            author: self.author.clone(),
            price: self.price,
        }
    }
}

/// Customer view of a title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Inventory key
    pub isbn: Isbn,
    /// Title
    pub title: String,
    /// Author
    pub author: String,
    /// Unit price
    pub price: f32,
}

/// A quantity of copies of one title (restock delta or purchase quantity)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookCopy {
    /// Inventory key
    pub isbn: Isbn,
    /// Number of copies, must be positive
    pub num_copies: i32,
}

impl BookCopy {
    /// Create a copy request
    pub fn new(isbn: impl Into<Isbn>, num_copies: i32) -> Self {
        Self {
            isbn: isbn.into(),
            num_copies,
        }
    }
}

/// New value of a title's editor pick flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookEditorPick {
    /// Inventory key
    pub isbn: Isbn,
    /// Flag value to set
    pub editor_pick: bool,
}

impl BookEditorPick {
    /// Create an editor pick update
    pub fn new(isbn: impl Into<Isbn>, editor_pick: bool) -> Self {
        Self {
            isbn: isbn.into(),
            editor_pick,
        }
    }
}

/// A customer rating for a title
///
/// Ratings are accepted at the boundary but the store does not support them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookRating {
    /// Inventory key
    pub isbn: Isbn,
    /// Rating value
    pub rating: i32,
}
