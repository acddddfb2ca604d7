//! Mutable per-title inventory state
//!
//! A `BookRecord` is owned by the store and only ever touched under the lock
//! that guards it. Callers see `StockBook`/`Book` snapshots.

use bookstore_core::{Book, Isbn, StockBook};

/// Live stock state of one title
///
/// Invariant: `0 <= copies_in_stock <= num_copies`.
#[derive(Debug, Clone, PartialEq)]
pub struct BookRecord {
    isbn: Isbn,
    title: String,
    author: String,
    price: f32,
    num_copies: i32,
    copies_in_stock: i32,
    sale_misses: i64,
    editor_pick: bool,
}

impl BookRecord {
    /// Create a record for a validated new title
    ///
    /// Every stocked copy starts out available.
    pub fn from_stock_book(book: &StockBook) -> Self {
        Self {
            isbn: book.isbn,
            title: book.title.clone(),
            author: book.author.clone(),
            price: book.price,
            num_copies: book.num_copies,
            copies_in_stock: book.num_copies,
            sale_misses: book.sale_misses,
            editor_pick: book.editor_pick,
        }
    }

    /// Inventory key
    pub fn isbn(&self) -> Isbn {
        self.isbn
    }

    /// Copies currently available
    pub fn copies_in_stock(&self) -> i32 {
        self.copies_in_stock
    }

    /// Copies ever stocked
    pub fn num_copies(&self) -> i32 {
        self.num_copies
    }

    /// Accumulated purchase shortfall
    pub fn sale_misses(&self) -> i64 {
        self.sale_misses
    }

    /// Whether the title is an editor pick
    pub fn is_editor_pick(&self) -> bool {
        self.editor_pick
    }

    /// Whether `n` more copies fit without overflowing the counters
    pub fn can_add_copies(&self, n: i32) -> bool {
        self.num_copies.checked_add(n).is_some()
    }

    /// Restock `n` copies
    pub fn add_copies(&mut self, n: i32) {
        debug_assert!(n > 0 && self.can_add_copies(n));
        self.num_copies += n;
        self.copies_in_stock += n;
    }

    /// Copies missing to satisfy a purchase of `n`, if any
    pub fn shortfall(&self, n: i32) -> Option<i32> {
        (n > self.copies_in_stock).then(|| n - self.copies_in_stock)
    }

    /// Sell `n` copies
    pub fn buy_copies(&mut self, n: i32) {
        debug_assert!(self.shortfall(n).is_none());
        self.copies_in_stock -= n;
    }

    /// Record a purchase shortfall
    pub fn add_sale_miss(&mut self, shortfall: i32) {
        self.sale_misses = self.sale_misses.saturating_add(i64::from(shortfall));
    }

    /// Set the editor pick flag
    pub fn set_editor_pick(&mut self, editor_pick: bool) {
        self.editor_pick = editor_pick;
    }

    /// Stock snapshot
    pub fn to_stock_book(&self) -> StockBook {
        StockBook {
            isbn: self.isbn,
            title: self.title.clone(),
            author: self.author.clone(),
            price: self.price,
            num_copies: self.num_copies,
            copies_in_stock: self.copies_in_stock,
            sale_misses: self.sale_misses,
            editor_pick: self.editor_pick,
        }
    }

    /// Customer snapshot
    pub fn to_book(&self) -> Book {
        Book {
            isbn: self.isbn,
            title: self.title.clone(),
            author: self.author.clone(),
            price: self.price,
        }
    }
}
