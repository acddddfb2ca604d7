//! Stateful session for multi-command critical sections.
//!
//! A [`Session`] is one execution context on a store. Locks taken by a
//! successful command stay with the session, so a sequence of commands
//! observes and changes the inventory as one unit until
//! `Command::ReleaseAllLocks` or until the session is dropped.
//!
//! # Usage
//!
//! ```ignore
//! use bookstore_executor::{Command, Session};
//!
//! let mut session = Session::new(&store);
//!
//! // Read and buy inside one critical section
//! session.execute(Command::GetBooks { isbns: Some(vec![isbn]) })?;
//! session.execute(Command::BuyBooks { copies: Some(vec![BookCopy::new(isbn, 1)]) })?;
//!
//! // End it
//! session.execute(Command::ReleaseAllLocks)?;
//! ```

use bookstore_core::Error as StoreError;
use bookstore_engine::{BookStore, InventoryStore, LockScope, StockManager, StoreSession};
use tracing::debug;

use crate::{Command, Output, Result};

/// A stateful execution context that owns lock holds across commands.
///
/// Sessions are bound to the thread that opened them.
#[derive(Debug)]
pub struct Session<'a> {
    inner: StoreSession<'a>,
}

impl<'a> Session<'a> {
    /// Open a new session on `store`.
    pub fn new(store: &'a InventoryStore) -> Self {
        Self {
            inner: store.session(),
        }
    }

    /// Returns whether the session currently holds any lock.
    pub fn holds_locks(&self) -> bool {
        self.inner.holds_locks()
    }

    /// Execute a command within this session.
    pub fn execute(&mut self, cmd: Command) -> Result<Output> {
        let name = cmd.name();
        debug!(target: "bookstore::store", context = %self.inner.context(), command = name, "execute");
        self.dispatch(cmd)
    }

    /// Decode a JSON command, execute it, and encode the outcome.
    ///
    /// The response is either `{"Ok": <Output>}` or `{"Err": <Error>}`.
    pub fn execute_json(&mut self, request: &str) -> String {
        let outcome = serde_json::from_str::<Command>(request)
            .map_err(crate::Error::from)
            .and_then(|cmd| self.execute(cmd));
        serde_json::to_string(&outcome).unwrap_or_else(|e| {
            format!(r#"{{"Err":{{"Serialization":{{"reason":"{}"}}}}}}"#, e)
        })
    }

    fn dispatch(&mut self, cmd: Command) -> Result<Output> {
        let s = &mut self.inner;
        let output = match cmd {
            // Stock
            Command::AddBooks { books } => s.add_books(&required(books)?).map(|()| Output::Unit),
            Command::AddCopies { copies } => {
                s.add_copies(&required(copies)?).map(|()| Output::Unit)
            }
            Command::GetAllBooks => s.get_all_books().map(Output::StockBooks),
            Command::GetBooksByIsbn { isbns } => {
                s.get_books_by_isbn(&required(isbns)?).map(Output::StockBooks)
            }
            Command::UpdateEditorPicks { picks } => {
                s.update_editor_picks(&required(picks)?).map(|()| Output::Unit)
            }
            Command::RemoveBooks { isbns } => {
                s.remove_books(&required(isbns)?).map(|()| Output::Unit)
            }
            Command::RemoveAllBooks => s.remove_all_books().map(|()| Output::Unit),
            Command::GetBooksInDemand => s.get_books_in_demand().map(Output::StockBooks),

            // Customer
            Command::BuyBooks { copies } => s.buy_books(&required(copies)?).map(|()| Output::Unit),
            Command::GetBooks { isbns } => s.get_books(&required(isbns)?).map(Output::Books),
            Command::GetEditorPicks { num_books } => {
                s.get_editor_picks(num_books).map(Output::Books)
            }
            Command::GetTopRatedBooks { num_books } => {
                s.get_top_rated_books(num_books).map(Output::Books)
            }
            Command::RateBooks { ratings } => {
                s.rate_books(&required(ratings)?).map(|()| Output::Unit)
            }

            // Locks
            Command::ReleaseAllLocks => s.release_all_locks().map(|()| Output::Unit),
        };
        Ok(output?)
    }
}

/// Unwrap a batch argument, rejecting an absent one.
fn required<T>(batch: Option<Vec<T>>) -> std::result::Result<Vec<T>, StoreError> {
    batch.ok_or(StoreError::NullInput)
}
