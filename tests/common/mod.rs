//! Shared test utilities for all integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from any test's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::sync::{Arc, Once};
use std::time::Duration;

pub use bookstore::{
    BookCopy, BookEditorPick, BookStore, InventoryStore, Isbn, LockScope, LockingStrategy,
    StockBook, StockManager, StoreConfig,
};
use tracing_subscriber::EnvFilter;

/// ISBN used by the canonical single-title scenarios.
pub const ISBN: i32 = 3044560;

/// Both locking strategies, for tests that must hold under either.
pub const STRATEGIES: [LockingStrategy; 2] =
    [LockingStrategy::SingleLock, LockingStrategy::TwoLevel];

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Install a test subscriber honoring RUST_LOG (default: warn).
///
/// Safe to call from every test.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Stores
// ============================================================================

/// Empty store for `strategy` with a 5s lock timeout.
pub fn test_store(strategy: LockingStrategy) -> Arc<InventoryStore> {
    init_tracing();
    let config = StoreConfig::for_testing()
        .with_strategy(strategy)
        .with_lock_timeout(Duration::from_secs(5));
    Arc::new(InventoryStore::new(config).unwrap())
}

/// Store holding `books`, with no session left open.
pub fn seeded_store(strategy: LockingStrategy, books: &[StockBook]) -> Arc<InventoryStore> {
    let store = test_store(strategy);
    store.session().add_books(books).unwrap();
    store
}

/// The canonical title: 5 copies, not an editor pick.
pub fn default_book() -> StockBook {
    StockBook::new(ISBN, "Harry Potter and JUnit", "JK Unit", 10.0, 5)
}

/// `count` titles with ISBNs 1..=count and `copies` copies each.
pub fn numbered_books(count: i32, copies: i32) -> Vec<StockBook> {
    (1..=count)
        .map(|isbn| StockBook::new(isbn, format!("Title {}", isbn), "Author", 1.0, copies))
        .collect()
}

/// Current stock view of one title, read in a throwaway session.
pub fn stock_of(store: &InventoryStore, isbn: i32) -> StockBook {
    store
        .session()
        .get_books_by_isbn(&[Isbn::new(isbn)])
        .unwrap()
        .remove(0)
}
