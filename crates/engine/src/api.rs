//! Operation contract shared by every locking strategy
//!
//! Both traits are implemented by store sessions. A session is the
//! execution context that owns lock holds: a successful call keeps what it
//! acquired until `release_all_locks`, a failed call gives back exactly what
//! it acquired.

use bookstore_concurrency::ContextId;
use bookstore_core::{Book, BookCopy, BookEditorPick, BookRating, Isbn, Result, StockBook};
use tracing::{debug, error, warn};

/// Explicit end of a multi-call critical section
pub trait LockScope {
    /// Drop every hold the session owns, at every granularity
    ///
    /// A no-op when nothing is held.
    fn release_all_locks(&mut self) -> Result<()>;

    /// Whether the session currently owns any hold
    fn holds_locks(&self) -> bool;
}

/// Customer-facing operations
pub trait BookStore: LockScope {
    /// Buy copies of one or more titles as one atomic batch
    ///
    /// Fails with `StockUnavailable` if any title is short; the shortfalls
    /// are recorded as sale misses and no stock changes.
    fn buy_books(&mut self, copies: &[BookCopy]) -> Result<()>;

    /// Customer view of the requested titles, in request order
    fn get_books(&mut self, isbns: &[Isbn]) -> Result<Vec<Book>>;

    /// Up to `n` distinct editor picks chosen uniformly at random
    fn get_editor_picks(&mut self, n: i32) -> Result<Vec<Book>>;

    /// Not supported by this store
    fn get_top_rated_books(&mut self, _n: i32) -> Result<Vec<Book>> {
        Err(bookstore_core::Error::Unsupported("get_top_rated_books"))
    }

    /// Not supported by this store
    fn rate_books(&mut self, _ratings: &[BookRating]) -> Result<()> {
        Err(bookstore_core::Error::Unsupported("rate_books"))
    }
}

/// Administrative operations
pub trait StockManager: LockScope {
    /// Insert new titles as one atomic batch
    fn add_books(&mut self, books: &[StockBook]) -> Result<()>;

    /// Restock existing titles
    fn add_copies(&mut self, copies: &[BookCopy]) -> Result<()>;

    /// Stock view of every title, ordered by ISBN
    fn get_all_books(&mut self) -> Result<Vec<StockBook>>;

    /// Stock view of the requested titles, in request order
    fn get_books_by_isbn(&mut self, isbns: &[Isbn]) -> Result<Vec<StockBook>>;

    /// Set or clear editor pick flags
    fn update_editor_picks(&mut self, picks: &[BookEditorPick]) -> Result<()>;

    /// Delete titles
    fn remove_books(&mut self, isbns: &[Isbn]) -> Result<()>;

    /// Delete every title
    fn remove_all_books(&mut self) -> Result<()>;

    /// Not supported by this store
    fn get_books_in_demand(&mut self) -> Result<Vec<StockBook>> {
        Err(bookstore_core::Error::Unsupported("get_books_in_demand"))
    }
}

/// Both roles behind one object
pub trait InventoryClient: BookStore + StockManager {}

impl<T: BookStore + StockManager> InventoryClient for T {}

/// Log the outcome of one operation on behalf of `context`
pub(crate) fn logged<T>(context: ContextId, op: &'static str, result: Result<T>) -> Result<T> {
    match &result {
        Ok(_) => debug!(target: "bookstore::store", %context, op, "committed"),
        Err(e) if e.is_lock_state() => {
            error!(target: "bookstore::store", %context, op, error = %e, "lock protocol violated")
        }
        Err(e) => warn!(target: "bookstore::store", %context, op, error = %e, "rejected"),
    }
    result
}
