//! Output enum for command execution results.
//!
//! Every command produces exactly one output type. This mapping is
//! deterministic: the same command always produces the same output variant.

use bookstore_core::{Book, StockBook};
use serde::{Deserialize, Serialize};

/// Successful command execution results.
///
/// Each [`Command`](crate::Command) variant maps to exactly one `Output`
/// variant, documented on the command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// No return value (mutations, lock release)
    Unit,

    /// Stock view of titles
    StockBooks(Vec<StockBook>),

    /// Customer view of titles
    Books(Vec<Book>),
}
