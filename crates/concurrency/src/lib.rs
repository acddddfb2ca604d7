//! Concurrency layer for the bookstore
//!
//! This crate implements the locking primitives the store strategies are
//! built from:
//! - ContextId: Identity of the execution context that owns lock holds
//! - ReentrantRwLock / HoldSlot: Reader-writer lock whose holds are owned
//!   guards with per-context reentrant counts
//! - IntentionLock: Store-wide lock with IS/IX accounting for
//!   multi-granularity locking
//!
//! Holds are values. Dropping a `HoldSlot` releases whatever it holds, so
//! a context that goes away can never leak a lock.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod error;
pub mod intention;
pub mod reentrant;

pub use context::ContextId;
pub use error::{IntentionMode, LockError, LockMode};
pub use intention::IntentionLock;
pub use reentrant::{HoldSlot, ReentrantRwLock};
