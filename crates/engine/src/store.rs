//! Strategy-selecting inventory store
//!
//! `InventoryStore` builds the locking strategy named by `StoreConfig` and
//! hands out sessions that implement the shared operation contract.

use crate::api::{BookStore, LockScope, StockManager};
use crate::config::{ConfigError, LockingStrategy, StoreConfig};
use crate::picks::EditorPickSampler;
use crate::single_lock::{SingleLockSession, SingleLockStore};
use crate::two_level::{TwoLevelSession, TwoLevelStore};
use bookstore_concurrency::ContextId;
use bookstore_core::{Book, BookCopy, BookEditorPick, BookRating, Isbn, Result, StockBook};
use tracing::info;

/// Inventory store behind either locking strategy
#[derive(Debug)]
pub enum InventoryStore {
    /// One global reader-writer lock
    SingleLock(SingleLockStore),
    /// Intention lock plus per-title locks
    TwoLevel(TwoLevelStore),
}

impl InventoryStore {
    /// Create an empty store using the configured strategy
    pub fn new(config: StoreConfig) -> std::result::Result<Self, ConfigError> {
        let sampler = EditorPickSampler::from_seed(config.rng_seed);
        Self::with_sampler(config, sampler)
    }

    /// Create an empty store with a caller-supplied editor pick sampler
    pub fn with_sampler(
        config: StoreConfig,
        sampler: EditorPickSampler,
    ) -> std::result::Result<Self, ConfigError> {
        let store = match config.strategy {
            LockingStrategy::SingleLock => {
                InventoryStore::SingleLock(SingleLockStore::with_sampler(&config, sampler)?)
            }
            LockingStrategy::TwoLevel => {
                InventoryStore::TwoLevel(TwoLevelStore::with_sampler(&config, sampler)?)
            }
        };
        info!(
            target: "bookstore::store",
            strategy = %config.strategy,
            lock_timeout_ms = ?config.lock_timeout_ms,
            "inventory store created"
        );
        Ok(store)
    }

    /// Strategy guarding this store
    pub fn strategy(&self) -> LockingStrategy {
        match self {
            InventoryStore::SingleLock(_) => LockingStrategy::SingleLock,
            InventoryStore::TwoLevel(_) => LockingStrategy::TwoLevel,
        }
    }

    /// Open a new execution context
    pub fn session(&self) -> StoreSession<'_> {
        match self {
            InventoryStore::SingleLock(store) => StoreSession::SingleLock(store.session()),
            InventoryStore::TwoLevel(store) => StoreSession::TwoLevel(store.session()),
        }
    }
}

/// Session on an `InventoryStore`
#[derive(Debug)]
pub enum StoreSession<'a> {
    /// Session on a single-lock store
    SingleLock(SingleLockSession<'a>),
    /// Session on a two-level store
    TwoLevel(TwoLevelSession<'a>),
}

macro_rules! dispatch {
    ($self:ident, $session:ident => $body:expr) => {
        match $self {
            StoreSession::SingleLock($session) => $body,
            StoreSession::TwoLevel($session) => $body,
        }
    };
}

impl StoreSession<'_> {
    /// Identity this session's holds are attributed to
    pub fn context(&self) -> ContextId {
        dispatch!(self, s => s.context())
    }
}

impl LockScope for StoreSession<'_> {
    fn release_all_locks(&mut self) -> Result<()> {
        dispatch!(self, s => s.release_all_locks())
    }

    fn holds_locks(&self) -> bool {
        dispatch!(self, s => s.holds_locks())
    }
}

impl StockManager for StoreSession<'_> {
    fn add_books(&mut self, books: &[StockBook]) -> Result<()> {
        dispatch!(self, s => s.add_books(books))
    }

    fn add_copies(&mut self, copies: &[BookCopy]) -> Result<()> {
        dispatch!(self, s => s.add_copies(copies))
    }

    fn get_all_books(&mut self) -> Result<Vec<StockBook>> {
        dispatch!(self, s => s.get_all_books())
    }

    fn get_books_by_isbn(&mut self, isbns: &[Isbn]) -> Result<Vec<StockBook>> {
        dispatch!(self, s => s.get_books_by_isbn(isbns))
    }

    fn update_editor_picks(&mut self, picks: &[BookEditorPick]) -> Result<()> {
        dispatch!(self, s => s.update_editor_picks(picks))
    }

    fn remove_books(&mut self, isbns: &[Isbn]) -> Result<()> {
        dispatch!(self, s => s.remove_books(isbns))
    }

    fn remove_all_books(&mut self) -> Result<()> {
        dispatch!(self, s => s.remove_all_books())
    }

    fn get_books_in_demand(&mut self) -> Result<Vec<StockBook>> {
        dispatch!(self, s => s.get_books_in_demand())
    }
}

impl BookStore for StoreSession<'_> {
    fn buy_books(&mut self, copies: &[BookCopy]) -> Result<()> {
        dispatch!(self, s => s.buy_books(copies))
    }

    fn get_books(&mut self, isbns: &[Isbn]) -> Result<Vec<Book>> {
        dispatch!(self, s => s.get_books(isbns))
    }

    fn get_editor_picks(&mut self, n: i32) -> Result<Vec<Book>> {
        dispatch!(self, s => s.get_editor_picks(n))
    }

    fn get_top_rated_books(&mut self, n: i32) -> Result<Vec<Book>> {
        dispatch!(self, s => s.get_top_rated_books(n))
    }

    fn rate_books(&mut self, ratings: &[BookRating]) -> Result<()> {
        dispatch!(self, s => s.rate_books(ratings))
    }
}
