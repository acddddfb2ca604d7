//! # Bookstore Executor
//!
//! The command boundary of the bookstore inventory. A transport (network
//! proxy, CLI, SDK) drives a store through this crate. It provides:
//! - [`Executor`] - One command per session, locks released afterwards
//! - [`Session`] - Multi-command critical sections with retained locks
//! - [`Command`]/[`Output`]/[`Error`] - Serializable instruction set
//!
//! ## Quick Start
//!
//! ```text
//! use bookstore_executor::{Command, Executor};
//!
//! let executor = Executor::new(Arc::new(InventoryStore::new(StoreConfig::default())?));
//! executor.execute(Command::AddBooks { books: Some(vec![book]) })?;
//! let picks = executor.execute(Command::GetEditorPicks { num_books: 3 })?;
//! ```

#![warn(missing_docs)]

mod command;
mod convert;
mod error;
mod executor;
mod output;
mod session;

// Test modules
#[cfg(test)]
mod tests;

pub use command::Command;
pub use error::Error;
pub use executor::Executor;
pub use output::Output;
pub use session::Session;

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;
