//! Store-wide lock with intention accounting
//!
//! Multi-granularity locking announces item-level locks at the store level
//! before taking them. An `IntentionLock` wraps the store-wide
//! `ReentrantRwLock` and records, per context, how many intention-shared
//! (IS) and intention-exclusive (IX) holds are outstanding.
//!
//! ## Compatibility
//!
//! ```text
//!            IS    IX    X
//! IS         ok    ok    wait
//! IX         ok    ok    wait
//! X          wait  wait  wait
//! ```
//!
//! IS and IX are both compatible with each other and incompatible with a
//! store-wide exclusive hold, so either is taken as a shared hold on the
//! underlying lock. Acquiring an intention therefore blocks while another
//! context holds the store exclusively, and a store-wide exclusive request
//! waits until every intention holder has left.

use crate::context::ContextId;
use crate::error::{IntentionMode, LockError};
use crate::reentrant::{HoldSlot, ReentrantRwLock};
use dashmap::DashMap;
use std::time::Duration;
use tracing::trace;

/// Store-wide lock with per-context IS/IX hold counts
pub struct IntentionLock<T> {
    lock: ReentrantRwLock<T>,
    shared_holders: DashMap<ContextId, u32>,
    exclusive_holders: DashMap<ContextId, u32>,
}

impl<T> IntentionLock<T> {
    /// Create an intention lock protecting `value`
    pub fn new(value: T) -> Self {
        Self {
            lock: ReentrantRwLock::new(value),
            shared_holders: DashMap::new(),
            exclusive_holders: DashMap::new(),
        }
    }

    /// Underlying store-wide lock
    pub fn lock(&self) -> &ReentrantRwLock<T> {
        &self.lock
    }

    /// Acquire an intention hold for `context`
    ///
    /// The hold is reentrant. It blocks only while another context holds
    /// the store-wide lock exclusively.
    pub fn acquire(
        &self,
        context: ContextId,
        mode: IntentionMode,
        slot: &mut HoldSlot<T>,
        timeout: Option<Duration>,
    ) -> Result<(), LockError> {
        self.lock.acquire_shared(slot, timeout)?;
        *self.holders(mode).entry(context).or_insert(0) += 1;
        trace!(target: "bookstore::lock", %context, %mode, "intention acquired");
        Ok(())
    }

    /// Give back one intention hold of `mode`
    ///
    /// Fails with `IntentionNotHeld` if `context` has no outstanding hold of
    /// that mode. Entries are pruned when their count reaches zero.
    pub fn release(
        &self,
        context: ContextId,
        mode: IntentionMode,
        slot: &mut HoldSlot<T>,
    ) -> Result<(), LockError> {
        let holders = self.holders(mode);
        let now_zero = match holders.get_mut(&context) {
            Some(mut count) => {
                *count -= 1;
                *count == 0
            }
            None => return Err(LockError::IntentionNotHeld(mode)),
        };
        if now_zero {
            holders.remove_if(&context, |_, count| *count == 0);
        }
        slot.release_shared()?;
        trace!(target: "bookstore::lock", %context, %mode, "intention released");
        Ok(())
    }

    /// Acquire the store-wide lock exclusively
    ///
    /// Structural operations take this path directly, bypassing intention
    /// accounting. It waits for every intention holder to leave.
    pub fn acquire_exclusive(
        &self,
        slot: &mut HoldSlot<T>,
        timeout: Option<Duration>,
    ) -> Result<(), LockError> {
        self.lock.acquire_exclusive(slot, timeout)
    }

    /// Drop every store-level hold of `context`
    ///
    /// Returns the number of (IS, IX) holds that were outstanding.
    pub fn release_context(&self, context: ContextId, slot: &mut HoldSlot<T>) -> (u32, u32) {
        let shared = self
            .shared_holders
            .remove(&context)
            .map_or(0, |(_, count)| count);
        let exclusive = self
            .exclusive_holders
            .remove(&context)
            .map_or(0, |(_, count)| count);
        slot.release_all();
        (shared, exclusive)
    }

    /// Outstanding intention holds of `mode` for `context`
    pub fn hold_count(&self, context: ContextId, mode: IntentionMode) -> u32 {
        self.holders(mode).get(&context).map_or(0, |count| *count)
    }

    /// Whether any context other than `context` holds an intention of `mode`
    pub fn held_by_others(&self, context: ContextId, mode: IntentionMode) -> bool {
        self.holders(mode).iter().any(|entry| *entry.key() != context)
    }

    /// Number of contexts holding an intention of `mode`
    pub fn holder_count(&self, mode: IntentionMode) -> usize {
        self.holders(mode).len()
    }

    fn holders(&self, mode: IntentionMode) -> &DashMap<ContextId, u32> {
        match mode {
            IntentionMode::Shared => &self.shared_holders,
            IntentionMode::Exclusive => &self.exclusive_holders,
        }
    }
}

impl<T> std::fmt::Debug for IntentionLock<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentionLock")
            .field("lock", &self.lock)
            .field("is_holders", &self.shared_holders.len())
            .field("ix_holders", &self.exclusive_holders.len())
            .finish()
    }
}
