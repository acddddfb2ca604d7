//! Store configuration.
//!
//! This module provides configuration for an inventory store: which locking
//! strategy guards the inventory, how long lock acquisition may block, and
//! how editor picks are sampled.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default bound on a single blocking lock acquisition (10s).
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 10_000;

/// Concurrency control strategy of a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockingStrategy {
    /// One reader-writer lock guards the whole inventory.
    SingleLock,
    /// Store-wide intention lock plus one reader-writer lock per title.
    #[default]
    TwoLevel,
}

impl std::fmt::Display for LockingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockingStrategy::SingleLock => f.write_str("single_lock"),
            LockingStrategy::TwoLevel => f.write_str("two_level"),
        }
    }
}

/// Store configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Locking strategy (default: two-level).
    pub strategy: LockingStrategy,

    /// Bound on each blocking lock acquisition, in milliseconds (default: 10s).
    ///
    /// `None` waits indefinitely.
    pub lock_timeout_ms: Option<u64>,

    /// Seed for editor pick sampling (default: seeded from entropy).
    pub rng_seed: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            strategy: LockingStrategy::default(),
            lock_timeout_ms: Some(DEFAULT_LOCK_TIMEOUT_MS),
            rng_seed: None,
        }
    }
}

impl StoreConfig {
    /// Create a new store configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set locking strategy (builder pattern).
    pub fn with_strategy(mut self, strategy: LockingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set lock acquisition timeout (builder pattern).
    ///
    /// Sub-millisecond precision is truncated.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Wait for locks indefinitely (builder pattern).
    pub fn without_lock_timeout(mut self) -> Self {
        self.lock_timeout_ms = None;
        self
    }

    /// Set editor pick sampling seed (builder pattern).
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Lock acquisition timeout, if bounded.
    pub fn lock_timeout(&self) -> Option<Duration> {
        self.lock_timeout_ms.map(Duration::from_millis)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lock_timeout_ms == Some(0) {
            return Err(ConfigError::ZeroLockTimeout);
        }
        Ok(())
    }

    /// Create a configuration suited to tests (short timeout, fixed seed).
    pub fn for_testing() -> Self {
        StoreConfig {
            strategy: LockingStrategy::default(),
            lock_timeout_ms: Some(2_000),
            rng_seed: Some(42),
        }
    }
}

/// Store configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A zero timeout would fail every contended acquisition.
    #[error("Lock timeout must be positive; use without_lock_timeout to wait indefinitely")]
    ZeroLockTimeout,
}
