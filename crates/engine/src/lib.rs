//! Inventory engine for the bookstore
//!
//! This crate implements the store operations on top of the locking
//! primitives in `bookstore-concurrency`:
//! - SingleLockStore: One reader-writer lock guards the whole inventory
//! - TwoLevelStore: Store-wide intention lock plus one lock per title
//! - InventoryStore: Strategy selected from `StoreConfig`
//! - BookStore / StockManager: The operation contract every strategy honors
//!
//! Callers open a session per execution context. Locks acquired by a
//! successful operation stay with the session until `release_all_locks`
//! or until the session is dropped; a failed operation gives back exactly
//! what it acquired.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod batch;
pub mod config;
pub mod picks;
pub mod record;
pub mod single_lock;
pub mod store;
pub mod two_level;

pub use api::{BookStore, InventoryClient, LockScope, StockManager};
pub use config::{ConfigError, LockingStrategy, StoreConfig};
pub use picks::EditorPickSampler;
pub use record::BookRecord;
pub use single_lock::{SingleLockSession, SingleLockStore};
pub use store::{InventoryStore, StoreSession};
pub use two_level::{TwoLevelSession, TwoLevelStore};
