//! Single global lock strategy
//!
//! One `ReentrantRwLock` guards the whole inventory. Mutations hold it
//! exclusively, reads hold it shared. Writers are totally serialized and
//! readers run concurrently with each other but never with a writer.
//!
//! Each operation acquires the lock once into the session's slot. On
//! success the acquisition stays with the session; on failure a `CallHold`
//! gives it back when it goes out of scope.

use crate::api::{logged, BookStore, LockScope, StockManager};
use crate::batch;
use crate::config::{ConfigError, StoreConfig};
use crate::picks::EditorPickSampler;
use crate::record::BookRecord;
use bookstore_concurrency::{ContextId, HoldSlot, LockMode, ReentrantRwLock};
use bookstore_core::{Book, BookCopy, BookEditorPick, Error, Isbn, Result, StockBook};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, error};

/// Inventory contents guarded by the global lock
#[derive(Debug, Default)]
pub struct Inventory {
    books: BTreeMap<Isbn, BookRecord>,
}

impl Inventory {
    fn record(&self, isbn: Isbn) -> Result<&BookRecord> {
        self.books.get(&isbn).ok_or(Error::IsbnNotFound(isbn))
    }

    fn record_mut(&mut self, isbn: Isbn) -> Result<&mut BookRecord> {
        self.books.get_mut(&isbn).ok_or(Error::IsbnNotFound(isbn))
    }

    fn require<'i>(&self, isbns: impl IntoIterator<Item = &'i Isbn>) -> Result<()> {
        isbns.into_iter().try_for_each(|&isbn| self.record(isbn).map(|_| ()))
    }
}

/// Inventory guarded by one reader-writer lock
#[derive(Debug)]
pub struct SingleLockStore {
    inventory: ReentrantRwLock<Inventory>,
    sampler: EditorPickSampler,
    lock_timeout: Option<Duration>,
}

impl SingleLockStore {
    /// Create an empty store
    pub fn new(config: &StoreConfig) -> std::result::Result<Self, ConfigError> {
        Self::with_sampler(config, EditorPickSampler::from_seed(config.rng_seed))
    }

    /// Create an empty store sampling editor picks with `sampler`
    pub fn with_sampler(
        config: &StoreConfig,
        sampler: EditorPickSampler,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            inventory: ReentrantRwLock::new(Inventory::default()),
            sampler,
            lock_timeout: config.lock_timeout(),
        })
    }

    /// Open a new execution context
    pub fn session(&self) -> SingleLockSession<'_> {
        SingleLockSession {
            store: self,
            context: ContextId::next(),
            slot: HoldSlot::new(),
        }
    }

    /// Whether any session holds the global lock
    pub fn is_locked(&self) -> bool {
        self.inventory.is_locked()
    }

    /// Whether some session holds the global lock exclusively
    pub fn is_locked_exclusive(&self) -> bool {
        self.inventory.is_locked_exclusive()
    }
}

/// Execution context on a `SingleLockStore`
///
/// Dropping the session releases its hold on the global lock.
#[derive(Debug)]
pub struct SingleLockSession<'a> {
    store: &'a SingleLockStore,
    context: ContextId,
    slot: HoldSlot<Inventory>,
}

/// One operation's acquisition of the global lock
///
/// Released on drop unless the operation succeeded and called `keep`.
struct CallHold<'s> {
    slot: &'s mut HoldSlot<Inventory>,
    mode: LockMode,
    armed: bool,
}

impl CallHold<'_> {
    fn inventory(&self) -> Result<&Inventory> {
        self.slot.get().ok_or_else(unheld)
    }

    fn inventory_mut(&mut self) -> Result<&mut Inventory> {
        self.slot.get_mut().ok_or_else(unheld)
    }

    fn keep(mut self) {
        self.armed = false;
    }
}

impl Drop for CallHold<'_> {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = self.slot.release(self.mode) {
                error!(target: "bookstore::lock", mode = %self.mode, error = %e, "rollback failed");
            }
        }
    }
}

fn unheld() -> Error {
    Error::LockState("inventory accessed without a matching hold".to_string())
}

impl<'a> SingleLockSession<'a> {
    /// Identity this session's holds are attributed to
    pub fn context(&self) -> ContextId {
        self.context
    }

    /// Outstanding shared acquisitions of the global lock
    pub fn read_hold_count(&self) -> u32 {
        self.slot.read_hold_count()
    }

    /// Outstanding exclusive acquisitions of the global lock
    pub fn write_hold_count(&self) -> u32 {
        self.slot.write_hold_count()
    }

    fn read(&mut self) -> Result<CallHold<'_>> {
        self.store
            .inventory
            .acquire_shared(&mut self.slot, self.store.lock_timeout)?;
        Ok(CallHold {
            slot: &mut self.slot,
            mode: LockMode::Shared,
            armed: true,
        })
    }

    fn write(&mut self) -> Result<CallHold<'_>> {
        // Upgrade is unsupported: give up shared holds first
        if self.slot.is_held() && !self.slot.is_exclusive() {
            let dropped = self.slot.release_all();
            debug!(target: "bookstore::lock", context = %self.context, dropped, "shared holds dropped before exclusive");
        }
        self.store
            .inventory
            .acquire_exclusive(&mut self.slot, self.store.lock_timeout)?;
        Ok(CallHold {
            slot: &mut self.slot,
            mode: LockMode::Exclusive,
            armed: true,
        })
    }

    fn insert_books(&mut self, books: &[StockBook]) -> Result<()> {
        let books = batch::new_books(books)?;
        let mut hold = self.write()?;
        let inventory = hold.inventory_mut()?;
        if let Some(&isbn) = books.keys().find(|&isbn| inventory.books.contains_key(isbn)) {
            return Err(Error::DuplicateIsbn(isbn));
        }
        for (isbn, book) in books {
            inventory.books.insert(isbn, BookRecord::from_stock_book(book));
        }
        hold.keep();
        Ok(())
    }

    fn restock(&mut self, copies: &[BookCopy]) -> Result<()> {
        let quantities = batch::copy_quantities(copies)?;
        let mut hold = self.write()?;
        let inventory = hold.inventory_mut()?;
        inventory.require(quantities.keys())?;
        for (&isbn, &n) in &quantities {
            if !inventory.record(isbn)?.can_add_copies(n) {
                return Err(Error::InvalidQuantity { isbn, quantity: n });
            }
        }
        for (isbn, n) in quantities {
            inventory.record_mut(isbn)?.add_copies(n);
        }
        hold.keep();
        Ok(())
    }

    fn set_editor_picks(&mut self, picks: &[BookEditorPick]) -> Result<()> {
        let flags = batch::editor_picks(picks)?;
        let mut hold = self.write()?;
        let inventory = hold.inventory_mut()?;
        inventory.require(flags.keys())?;
        for (isbn, flag) in flags {
            inventory.record_mut(isbn)?.set_editor_pick(flag);
        }
        hold.keep();
        Ok(())
    }

    fn buy(&mut self, copies: &[BookCopy]) -> Result<()> {
        let quantities = batch::copy_quantities(copies)?;
        let mut hold = self.write()?;
        let inventory = hold.inventory_mut()?;
        inventory.require(quantities.keys())?;

        let mut misses = Vec::new();
        for (&isbn, &n) in &quantities {
            if let Some(short) = inventory.record(isbn)?.shortfall(n) {
                misses.push((isbn, short));
            }
        }
        if !misses.is_empty() {
            // Misses survive the failed purchase
            for &(isbn, short) in &misses {
                inventory.record_mut(isbn)?.add_sale_miss(short);
            }
            return Err(Error::StockUnavailable { misses });
        }

        for (isbn, n) in quantities {
            inventory.record_mut(isbn)?.buy_copies(n);
        }
        hold.keep();
        Ok(())
    }

    fn remove(&mut self, isbns: &[Isbn]) -> Result<()> {
        let isbns = batch::isbn_set(isbns)?;
        let mut hold = self.write()?;
        let inventory = hold.inventory_mut()?;
        inventory.require(&isbns)?;
        for isbn in &isbns {
            inventory.books.remove(isbn);
        }
        hold.keep();
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let mut hold = self.write()?;
        hold.inventory_mut()?.books.clear();
        hold.keep();
        Ok(())
    }

    fn snapshot(&mut self) -> Result<Vec<StockBook>> {
        let hold = self.read()?;
        let books = hold
            .inventory()?
            .books
            .values()
            .map(BookRecord::to_stock_book)
            .collect();
        hold.keep();
        Ok(books)
    }

    fn lookup<T>(&mut self, isbns: &[Isbn], view: impl Fn(&BookRecord) -> T) -> Result<Vec<T>> {
        let unique = batch::isbn_set(isbns)?;
        let hold = self.read()?;
        let inventory = hold.inventory()?;
        inventory.require(&unique)?;
        let views = isbns
            .iter()
            .map(|&isbn| inventory.record(isbn).map(&view))
            .collect::<Result<Vec<_>>>()?;
        hold.keep();
        Ok(views)
    }

    fn editor_picks(&mut self, n: i32) -> Result<Vec<Book>> {
        let n = batch::sample_size(n)?;
        let hold = self.read()?;
        let candidates: Vec<Book> = hold
            .inventory()?
            .books
            .values()
            .filter(|record| record.is_editor_pick())
            .map(BookRecord::to_book)
            .collect();
        hold.keep();
        Ok(self.store.sampler.sample(candidates, n))
    }
}

impl LockScope for SingleLockSession<'_> {
    fn release_all_locks(&mut self) -> Result<()> {
        let released = self.slot.release_all();
        if released > 0 {
            debug!(target: "bookstore::lock", context = %self.context, released, "global lock released");
        }
        Ok(())
    }

    fn holds_locks(&self) -> bool {
        self.slot.is_held()
    }
}

impl StockManager for SingleLockSession<'_> {
    fn add_books(&mut self, books: &[StockBook]) -> Result<()> {
        let result = self.insert_books(books);
        logged(self.context, "add_books", result)
    }

    fn add_copies(&mut self, copies: &[BookCopy]) -> Result<()> {
        let result = self.restock(copies);
        logged(self.context, "add_copies", result)
    }

    fn get_all_books(&mut self) -> Result<Vec<StockBook>> {
        let result = self.snapshot();
        logged(self.context, "get_all_books", result)
    }

    fn get_books_by_isbn(&mut self, isbns: &[Isbn]) -> Result<Vec<StockBook>> {
        let result = self.lookup(isbns, BookRecord::to_stock_book);
        logged(self.context, "get_books_by_isbn", result)
    }

    fn update_editor_picks(&mut self, picks: &[BookEditorPick]) -> Result<()> {
        let result = self.set_editor_picks(picks);
        logged(self.context, "update_editor_picks", result)
    }

    fn remove_books(&mut self, isbns: &[Isbn]) -> Result<()> {
        let result = self.remove(isbns);
        logged(self.context, "remove_books", result)
    }

    fn remove_all_books(&mut self) -> Result<()> {
        let result = self.clear();
        logged(self.context, "remove_all_books", result)
    }
}

impl BookStore for SingleLockSession<'_> {
    fn buy_books(&mut self, copies: &[BookCopy]) -> Result<()> {
        let result = self.buy(copies);
        logged(self.context, "buy_books", result)
    }

    fn get_books(&mut self, isbns: &[Isbn]) -> Result<Vec<Book>> {
        let result = self.lookup(isbns, BookRecord::to_book);
        logged(self.context, "get_books", result)
    }

    fn get_editor_picks(&mut self, n: i32) -> Result<Vec<Book>> {
        let result = self.editor_picks(n);
        logged(self.context, "get_editor_picks", result)
    }
}
