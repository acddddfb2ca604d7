//! Bookstore - concurrent in-memory bookstore inventory
//!
//! An inventory of titles read and updated by many callers at once. Every
//! batch operation commits atomically; two interchangeable locking
//! strategies trade simplicity for concurrency: a single global lock, or
//! multi-granularity locking with per-title locks under an intention lock.
//!
//! # Quick Start
//!
//! ```ignore
//! use bookstore::{BookCopy, Command, Executor, InventoryStore, StockBook, StoreConfig};
//!
//! let store = Arc::new(InventoryStore::new(StoreConfig::default())?);
//! let executor = Executor::new(store);
//!
//! executor.execute(Command::AddBooks {
//!     books: Some(vec![StockBook::new(3044560, "Title", "Author", 10.0, 5)]),
//! })?;
//! executor.execute(Command::BuyBooks {
//!     copies: Some(vec![BookCopy::new(3044560, 1)]),
//! })?;
//! ```
//!
//! # Architecture
//!
//! Remote callers go through the [`Executor`] command interface. In-process
//! callers can open a session on an [`InventoryStore`] directly and use the
//! [`BookStore`]/[`StockManager`] traits.

// Re-export the command interface from bookstore-executor
pub use bookstore_executor::{Command, Error, Executor, Output, Result, Session};

// Re-export the store and its contract from bookstore-engine
pub use bookstore_engine::{
    BookStore, InventoryClient, InventoryStore, LockScope, LockingStrategy, StockManager,
    StoreConfig, StoreSession,
};

// Re-export value types so callers don't need bookstore-core directly
pub use bookstore_core::{Book, BookCopy, BookEditorPick, BookRating, FieldError, Isbn, StockBook};
