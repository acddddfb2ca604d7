//! The Executor - single entry point to an inventory store.
//!
//! The Executor runs each command in a fresh [`Session`], so no lock
//! outlives the command. Callers that need a multi-command critical
//! section open a session explicitly.

use std::sync::Arc;

use bookstore_engine::InventoryStore;

use crate::{Command, Output, Result, Session};

/// The command executor - single entry point to a store.
///
/// The Executor is **stateless**: every command gets its own session, which
/// is dropped (releasing its locks) when the command returns.
///
/// # Thread Safety
///
/// Executor is `Send + Sync` and can be shared across threads.
///
/// # Example
///
/// ```ignore
/// use bookstore_executor::{Command, Executor};
///
/// let executor = Executor::new(store);
///
/// // Single command execution
/// let result = executor.execute(Command::GetAllBooks)?;
///
/// // Batch execution
/// let results = executor.execute_many(vec![
///     Command::GetEditorPicks { num_books: 3 },
///     Command::GetBooksInDemand,
/// ]);
/// ```
#[derive(Debug, Clone)]
pub struct Executor {
    store: Arc<InventoryStore>,
}

impl Executor {
    /// Create a new executor wrapping a store.
    pub fn new(store: Arc<InventoryStore>) -> Self {
        Self { store }
    }

    /// The wrapped store.
    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    /// Open a session for a multi-command critical section.
    pub fn session(&self) -> Session<'_> {
        Session::new(&self.store)
    }

    /// Execute a single command in its own session.
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        self.session().execute(cmd)
    }

    /// Execute commands one after another, each in its own session.
    ///
    /// A failing command does not stop the ones after it.
    pub fn execute_many(&self, cmds: Vec<Command>) -> Vec<Result<Output>> {
        cmds.into_iter().map(|cmd| self.execute(cmd)).collect()
    }
}
