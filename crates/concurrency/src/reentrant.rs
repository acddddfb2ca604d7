//! Reentrant reader-writer lock with owned holds
//!
//! A `ReentrantRwLock` is shared by every context. Each context keeps its own
//! `HoldSlot` per lock: the slot owns the underlying guard and counts how
//! many times the context acquired the lock in each mode.
//!
//! ## Reentrancy rules
//!
//! ```text
//! slot holds      acquire_shared      acquire_exclusive
//! ----------      --------------      -----------------
//! nothing         blocks for S        blocks for X
//! shared          count += 1          UpgradeUnsupported
//! exclusive       count += 1          count += 1
//! ```
//!
//! When the exclusive count of a slot drops to zero while shared holds
//! remain, the guard is downgraded in place. When both counts reach zero,
//! the guard is dropped and the lock released.

use crate::error::{LockError, LockMode};
use parking_lot::lock_api::{ArcRwLockReadGuard, ArcRwLockWriteGuard};
use parking_lot::{RawRwLock, RwLock};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

type ReadGuard<T> = ArcRwLockReadGuard<RawRwLock, T>;
type WriteGuard<T> = ArcRwLockWriteGuard<RawRwLock, T>;

/// Reader-writer lock whose holds are owned by per-context slots
pub struct ReentrantRwLock<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> Clone for ReentrantRwLock<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> ReentrantRwLock<T> {
    /// Create a lock protecting `value`
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    /// Acquire a shared hold into `slot`
    ///
    /// Blocks until no other context holds the lock exclusively, or until
    /// `timeout` elapses. A slot that already holds the lock in either mode
    /// is re-entered without blocking.
    pub fn acquire_shared(
        &self,
        slot: &mut HoldSlot<T>,
        timeout: Option<Duration>,
    ) -> Result<(), LockError> {
        if let Some(held) = &slot.held {
            debug_assert!(held.belongs_to(&self.inner), "slot holds a different lock");
            slot.shared += 1;
            return Ok(());
        }

        let guard = match timeout {
            Some(limit) => self
                .inner
                .try_read_arc_for(limit)
                .ok_or(LockError::Timeout(limit))?,
            None => self.inner.read_arc(),
        };
        slot.held = Some(Held::Shared(guard));
        slot.shared = 1;
        Ok(())
    }

    /// Acquire an exclusive hold into `slot`
    ///
    /// Blocks until no other context holds the lock, or until `timeout`
    /// elapses. Fails with `UpgradeUnsupported` when the slot currently
    /// holds the lock only in shared mode.
    pub fn acquire_exclusive(
        &self,
        slot: &mut HoldSlot<T>,
        timeout: Option<Duration>,
    ) -> Result<(), LockError> {
        match &slot.held {
            Some(held @ Held::Exclusive(_)) => {
                debug_assert!(held.belongs_to(&self.inner), "slot holds a different lock");
                slot.exclusive += 1;
                return Ok(());
            }
            Some(Held::Shared(_)) => return Err(LockError::UpgradeUnsupported),
            None => {}
        }

        let guard = match timeout {
            Some(limit) => self
                .inner
                .try_write_arc_for(limit)
                .ok_or(LockError::Timeout(limit))?,
            None => self.inner.write_arc(),
        };
        slot.held = Some(Held::Exclusive(guard));
        slot.exclusive = 1;
        Ok(())
    }

    /// Whether any context holds the lock
    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }

    /// Whether some context holds the lock exclusively
    pub fn is_locked_exclusive(&self) -> bool {
        self.inner.is_locked_exclusive()
    }
}

impl<T> fmt::Debug for ReentrantRwLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReentrantRwLock")
            .field("locked", &self.is_locked())
            .field("exclusive", &self.is_locked_exclusive())
            .finish()
    }
}

enum Held<T> {
    Shared(ReadGuard<T>),
    Exclusive(WriteGuard<T>),
}

impl<T> Held<T> {
    fn belongs_to(&self, lock: &Arc<RwLock<T>>) -> bool {
        match self {
            Held::Shared(guard) => Arc::ptr_eq(ArcRwLockReadGuard::rwlock(guard), lock),
            Held::Exclusive(guard) => Arc::ptr_eq(ArcRwLockWriteGuard::rwlock(guard), lock),
        }
    }
}

/// One context's holds on one `ReentrantRwLock`
///
/// Dropping the slot releases the lock regardless of the counts.
pub struct HoldSlot<T> {
    held: Option<Held<T>>,
    shared: u32,
    exclusive: u32,
}

impl<T> Default for HoldSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HoldSlot<T> {
    /// Create an empty slot
    pub fn new() -> Self {
        Self {
            held: None,
            shared: 0,
            exclusive: 0,
        }
    }

    /// Whether the slot currently holds the lock
    pub fn is_held(&self) -> bool {
        self.held.is_some()
    }

    /// Whether the slot holds the lock exclusively
    pub fn is_exclusive(&self) -> bool {
        matches!(self.held, Some(Held::Exclusive(_)))
    }

    /// Number of outstanding shared acquisitions
    pub fn read_hold_count(&self) -> u32 {
        self.shared
    }

    /// Number of outstanding exclusive acquisitions
    pub fn write_hold_count(&self) -> u32 {
        self.exclusive
    }

    /// Protected value, if the slot holds the lock in any mode
    pub fn get(&self) -> Option<&T> {
        match &self.held {
            Some(Held::Shared(guard)) => Some(&**guard),
            Some(Held::Exclusive(guard)) => Some(&**guard),
            None => None,
        }
    }

    /// Protected value for mutation, if the slot holds the lock exclusively
    pub fn get_mut(&mut self) -> Option<&mut T> {
        match &mut self.held {
            Some(Held::Exclusive(guard)) => Some(&mut **guard),
            _ => None,
        }
    }

    /// Give back one shared acquisition
    pub fn release_shared(&mut self) -> Result<(), LockError> {
        if self.shared == 0 {
            return Err(LockError::NotHeld(LockMode::Shared));
        }
        self.shared -= 1;
        self.settle();
        Ok(())
    }

    /// Give back one exclusive acquisition
    pub fn release_exclusive(&mut self) -> Result<(), LockError> {
        if self.exclusive == 0 {
            return Err(LockError::NotHeld(LockMode::Exclusive));
        }
        self.exclusive -= 1;
        self.settle();
        Ok(())
    }

    /// Give back one acquisition of `mode`
    pub fn release(&mut self, mode: LockMode) -> Result<(), LockError> {
        match mode {
            LockMode::Shared => self.release_shared(),
            LockMode::Exclusive => self.release_exclusive(),
        }
    }

    /// Drop every hold in the slot, returning how many acquisitions were released
    pub fn release_all(&mut self) -> u32 {
        let released = self.shared + self.exclusive;
        self.held = None;
        self.shared = 0;
        self.exclusive = 0;
        released
    }

    fn settle(&mut self) {
        if self.shared == 0 && self.exclusive == 0 {
            self.held = None;
        } else if self.exclusive == 0 {
            self.held = self.held.take().map(|held| match held {
                Held::Exclusive(guard) => Held::Shared(ArcRwLockWriteGuard::downgrade(guard)),
                shared => shared,
            });
        }
    }
}

impl<T> fmt::Debug for HoldSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HoldSlot")
            .field("shared", &self.shared)
            .field("exclusive", &self.exclusive)
            .field("is_exclusive", &self.is_exclusive())
            .finish()
    }
}
