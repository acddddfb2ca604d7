//! Command enum defining all store operations.
//!
//! Commands are the instruction set a transport marshals to a store. Every
//! operation of the `BookStore` and `StockManager` contracts is a variant.
//!
//! Commands are:
//! - **Self-contained**: All parameters needed for execution are in the variant
//! - **Serializable**: Can be converted to/from JSON for remote callers
//! - **Nullable batches**: A batch field may be absent, which fails with `NullInput`

use bookstore_core::{BookCopy, BookEditorPick, BookRating, Isbn, StockBook};
use serde::{Deserialize, Serialize};

/// A self-contained, serializable store operation.
///
/// # Command Categories
///
/// | Category | Count | Description |
/// |----------|-------|-------------|
/// | Stock | 8 | Administrative operations |
/// | Customer | 5 | Buying and browsing |
/// | Locks | 1 | End of a multi-command critical section |
///
/// # Example
///
/// ```ignore
/// use bookstore_executor::Command;
/// use bookstore_core::BookCopy;
///
/// let cmd = Command::BuyBooks {
///     copies: Some(vec![BookCopy::new(3044560, 1)]),
/// };
///
/// // A missing batch is rejected with Error::NullInput
/// let cmd = Command::BuyBooks { copies: None };
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    // ==================== Stock (8) ====================
    /// Insert new titles.
    /// Returns: `Output::Unit`
    AddBooks {
        #[serde(default)]
        books: Option<Vec<StockBook>>,
    },

    /// Restock existing titles.
    /// Returns: `Output::Unit`
    AddCopies {
        #[serde(default)]
        copies: Option<Vec<BookCopy>>,
    },

    /// List every title.
    /// Returns: `Output::StockBooks`
    GetAllBooks,

    /// Look up titles by ISBN.
    /// Returns: `Output::StockBooks`
    GetBooksByIsbn {
        #[serde(default)]
        isbns: Option<Vec<Isbn>>,
    },

    /// Set or clear editor pick flags.
    /// Returns: `Output::Unit`
    UpdateEditorPicks {
        #[serde(default)]
        picks: Option<Vec<BookEditorPick>>,
    },

    /// Delete titles.
    /// Returns: `Output::Unit`
    RemoveBooks {
        #[serde(default)]
        isbns: Option<Vec<Isbn>>,
    },

    /// Delete every title.
    /// Returns: `Output::Unit`
    RemoveAllBooks,

    /// Titles with sale misses. Always unsupported.
    GetBooksInDemand,

    // ==================== Customer (5) ====================
    /// Buy copies as one atomic batch.
    /// Returns: `Output::Unit`
    BuyBooks {
        #[serde(default)]
        copies: Option<Vec<BookCopy>>,
    },

    /// Customer view of titles by ISBN.
    /// Returns: `Output::Books`
    GetBooks {
        #[serde(default)]
        isbns: Option<Vec<Isbn>>,
    },

    /// Random sample of editor picks.
    /// Returns: `Output::Books`
    GetEditorPicks { num_books: i32 },

    /// Highest rated titles. Always unsupported.
    GetTopRatedBooks { num_books: i32 },

    /// Rate titles. Always unsupported.
    RateBooks {
        #[serde(default)]
        ratings: Option<Vec<BookRating>>,
    },

    // ==================== Locks (1) ====================
    /// Release every lock held by the session.
    /// Returns: `Output::Unit`
    ReleaseAllLocks,
}

impl Command {
    /// Operation name, as used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddBooks { .. } => "add_books",
            Command::AddCopies { .. } => "add_copies",
            Command::GetAllBooks => "get_all_books",
            Command::GetBooksByIsbn { .. } => "get_books_by_isbn",
            Command::UpdateEditorPicks { .. } => "update_editor_picks",
            Command::RemoveBooks { .. } => "remove_books",
            Command::RemoveAllBooks => "remove_all_books",
            Command::GetBooksInDemand => "get_books_in_demand",
            Command::BuyBooks { .. } => "buy_books",
            Command::GetBooks { .. } => "get_books",
            Command::GetEditorPicks { .. } => "get_editor_picks",
            Command::GetTopRatedBooks { .. } => "get_top_rated_books",
            Command::RateBooks { .. } => "rate_books",
            Command::ReleaseAllLocks => "release_all_locks",
        }
    }

    /// Whether the command can change the inventory
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Command::AddBooks { .. }
                | Command::AddCopies { .. }
                | Command::UpdateEditorPicks { .. }
                | Command::RemoveBooks { .. }
                | Command::RemoveAllBooks
                | Command::BuyBooks { .. }
                | Command::RateBooks { .. }
        )
    }
}
