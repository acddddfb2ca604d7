//! Lock protocol errors and lock modes

use std::fmt;
use std::time::Duration;

/// Mode of a reader-writer hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockMode {
    /// Shared (read) hold
    Shared,
    /// Exclusive (write) hold
    Exclusive,
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockMode::Shared => f.write_str("shared"),
            LockMode::Exclusive => f.write_str("exclusive"),
        }
    }
}

/// Level of an intention hold on the store-wide lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentionMode {
    /// Intention-shared (IS): the context will read-lock items
    Shared,
    /// Intention-exclusive (IX): the context will write-lock items
    Exclusive,
}

impl fmt::Display for IntentionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntentionMode::Shared => f.write_str("IS"),
            IntentionMode::Exclusive => f.write_str("IX"),
        }
    }
}

/// Errors raised by the lock primitives
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LockError {
    /// Release of a hold the context does not own
    #[error("{0} lock released without an outstanding hold")]
    NotHeld(LockMode),

    /// Release of an intention the context does not own
    #[error("{0} intention released without an outstanding hold")]
    IntentionNotHeld(IntentionMode),

    /// Exclusive requested while only a shared hold is owned
    #[error("shared hold cannot be upgraded to exclusive")]
    UpgradeUnsupported,

    /// Acquisition did not complete within the timeout
    #[error("lock acquisition timed out after {0:?}")]
    Timeout(Duration),
}

impl From<LockError> for bookstore_core::Error {
    fn from(e: LockError) -> Self {
        match e {
            LockError::Timeout(waited) => bookstore_core::Error::LockTimeout(waited),
            other => bookstore_core::Error::LockState(other.to_string()),
        }
    }
}
