//! Two-level (multi-granularity) locking strategy
//!
//! The catalog of titles sits behind a store-wide `IntentionLock`; each
//! title has its own `ReentrantRwLock`. Lock order is fixed:
//!
//! 1. store-wide lock (IS/IX for item operations, X for structural ones)
//! 2. item locks, in ascending ISBN order
//!
//! Operations on disjoint titles run concurrently. Structural operations
//! (`add_books`, `remove_books`, `remove_all_books`) create or destroy item
//! locks and therefore take the store-wide lock exclusively, which waits
//! for every intention holder to leave.
//!
//! Every acquisition made by one call is recorded in an `Acquisition`. If
//! the call fails, dropping the acquisition undoes the log in reverse order;
//! on success `commit` hands the holds over to the session.

use crate::api::{logged, BookStore, LockScope, StockManager};
use crate::batch;
use crate::config::{ConfigError, StoreConfig};
use crate::picks::EditorPickSampler;
use crate::record::BookRecord;
use bookstore_concurrency::{
    ContextId, HoldSlot, IntentionLock, IntentionMode, LockMode, ReentrantRwLock,
};
use bookstore_core::{Book, BookCopy, BookEditorPick, Error, Isbn, Result, StockBook};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, error, trace};

/// Per-title locks guarded by the store-wide lock
#[derive(Default)]
pub struct Catalog {
    items: BTreeMap<Isbn, ReentrantRwLock<BookRecord>>,
}

/// Inventory guarded by an intention lock and one lock per title
#[derive(Debug)]
pub struct TwoLevelStore {
    catalog: IntentionLock<Catalog>,
    sampler: EditorPickSampler,
    lock_timeout: Option<Duration>,
}

impl TwoLevelStore {
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
            catalog: IntentionLock::new(Catalog::default()),
            sampler,
            lock_timeout: config.lock_timeout(),
        })
    }

    /// Open a new execution context
    pub fn session(&self) -> TwoLevelSession<'_> {
        TwoLevelSession {
            store: self,
            context: ContextId::next(),
            catalog: HoldSlot::new(),
            items: BTreeMap::new(),
        }
    }

    /// Number of contexts holding an intention of `mode`
    pub fn intention_holder_count(&self, mode: IntentionMode) -> usize {
        self.catalog.holder_count(mode)
    }

    /// Whether a context other than `context` holds an intention of `mode`
    pub fn intention_held_by_others(&self, context: ContextId, mode: IntentionMode) -> bool {
        self.catalog.held_by_others(context, mode)
    }

    /// Whether some session holds the store-wide lock exclusively
    pub fn is_locked_exclusive(&self) -> bool {
        self.catalog.lock().is_locked_exclusive()
    }
}

/// Execution context on a `TwoLevelStore`
///
/// Owns the context's hold on the store-wide lock and one slot per title it
/// currently holds. Dropping the session releases all of them.
pub struct TwoLevelSession<'a> {
    store: &'a TwoLevelStore,
    context: ContextId,
    catalog: HoldSlot<Catalog>,
    items: BTreeMap<Isbn, HoldSlot<BookRecord>>,
}

impl<'a> TwoLevelSession<'a> {
    /// Identity this session's holds are attributed to
    pub fn context(&self) -> ContextId {
        self.context
    }

    /// Outstanding intention holds of `mode`
    pub fn intention_count(&self, mode: IntentionMode) -> u32 {
        self.store.catalog.hold_count(self.context, mode)
    }

    /// Whether the session holds the store-wide lock exclusively
    pub fn holds_store_exclusive(&self) -> bool {
        self.catalog.is_exclusive()
    }

    /// Titles the session currently holds a lock on, in ISBN order
    pub fn held_items(&self) -> Vec<Isbn> {
        self.items.keys().copied().collect()
    }

    /// Outstanding (shared, exclusive) acquisitions of a title's lock
    pub fn item_hold_counts(&self, isbn: Isbn) -> (u32, u32) {
        self.items.get(&isbn).map_or((0, 0), |slot| {
            (slot.read_hold_count(), slot.write_hold_count())
        })
    }

    fn begin(&mut self) -> Acquisition<'_, 'a> {
        Acquisition {
            session: self,
            log: SmallVec::new(),
        }
    }

    /// Drop every hold, items first
    fn release_everything(&mut self) -> (usize, u32, u32) {
        let items = self.items.len();
        self.items.clear();
        let (is, ix) = self.store.catalog.release_context(self.context, &mut self.catalog);
        (items, is, ix)
    }

    fn insert_books(&mut self, books: &[StockBook]) -> Result<()> {
        let books = batch::new_books(books)?;
        let mut acq = self.begin();
        acq.store_exclusive()?;
        let catalog = acq.catalog_mut()?;
        if let Some(&isbn) = books.keys().find(|&isbn| catalog.items.contains_key(isbn)) {
            return Err(Error::DuplicateIsbn(isbn));
        }
        for (isbn, book) in books {
            let record = BookRecord::from_stock_book(book);
            catalog.items.insert(isbn, ReentrantRwLock::new(record));
        }
        acq.commit();
        Ok(())
    }

    fn restock(&mut self, copies: &[BookCopy]) -> Result<()> {
        let quantities = batch::copy_quantities(copies)?;
        let mut acq = self.begin();
        acq.lock_items(IntentionMode::Exclusive, quantities.keys())?;
        for (&isbn, &n) in &quantities {
            if !acq.record(isbn)?.can_add_copies(n) {
                return Err(Error::InvalidQuantity { isbn, quantity: n });
            }
        }
        for (isbn, n) in quantities {
            acq.record_mut(isbn)?.add_copies(n);
        }
        acq.commit();
        Ok(())
    }

    fn set_editor_picks(&mut self, picks: &[BookEditorPick]) -> Result<()> {
        let flags = batch::editor_picks(picks)?;
        let mut acq = self.begin();
        acq.lock_items(IntentionMode::Exclusive, flags.keys())?;
        for (isbn, flag) in flags {
            acq.record_mut(isbn)?.set_editor_pick(flag);
        }
        acq.commit();
        Ok(())
    }

    fn buy(&mut self, copies: &[BookCopy]) -> Result<()> {
        let quantities = batch::copy_quantities(copies)?;
        let mut acq = self.begin();
        acq.lock_items(IntentionMode::Exclusive, quantities.keys())?;

        let mut misses = Vec::new();
        for (&isbn, &n) in &quantities {
            if let Some(short) = acq.record(isbn)?.shortfall(n) {
                misses.push((isbn, short));
            }
        }
        if !misses.is_empty() {
            // Misses survive the failed purchase
            for &(isbn, short) in &misses {
                acq.record_mut(isbn)?.add_sale_miss(short);
            }
            return Err(Error::StockUnavailable { misses });
        }

        for (isbn, n) in quantities {
            acq.record_mut(isbn)?.buy_copies(n);
        }
        acq.commit();
        Ok(())
    }

    fn remove(&mut self, isbns: &[Isbn]) -> Result<()> {
        let isbns = batch::isbn_set(isbns)?;
        let mut acq = self.begin();
        acq.store_exclusive()?;
        let catalog = acq.catalog_mut()?;
        if let Some(&isbn) = isbns.iter().find(|&isbn| !catalog.items.contains_key(isbn)) {
            return Err(Error::IsbnNotFound(isbn));
        }
        for isbn in &isbns {
            catalog.items.remove(isbn);
        }
        acq.commit();
        for isbn in &isbns {
            self.items.remove(isbn);
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let mut acq = self.begin();
        acq.store_exclusive()?;
        acq.catalog_mut()?.items.clear();
        acq.commit();
        self.items.clear();
        Ok(())
    }

    fn snapshot(&mut self) -> Result<Vec<StockBook>> {
        let mut acq = self.begin();
        acq.lock_all_items()?;
        let books = acq.held_records()?.map(BookRecord::to_stock_book).collect();
        acq.commit();
        Ok(books)
    }

    fn lookup<T>(&mut self, isbns: &[Isbn], view: impl Fn(&BookRecord) -> T) -> Result<Vec<T>> {
        let unique = batch::isbn_set(isbns)?;
        let mut acq = self.begin();
        acq.lock_items(IntentionMode::Shared, &unique)?;
        let views = isbns
            .iter()
            .map(|&isbn| acq.record(isbn).map(&view))
            .collect::<Result<Vec<_>>>()?;
        acq.commit();
        Ok(views)
    }

    fn editor_picks(&mut self, n: i32) -> Result<Vec<Book>> {
        let n = batch::sample_size(n)?;
        let mut acq = self.begin();
        acq.lock_all_items()?;
        let candidates: Vec<Book> = acq
            .held_records()?
            .filter(|record| record.is_editor_pick())
            .map(BookRecord::to_book)
            .collect();
        acq.commit();
        Ok(self.store.sampler.sample(candidates, n))
    }
}

impl Drop for TwoLevelSession<'_> {
    fn drop(&mut self) {
        let (items, is, ix) = self.release_everything();
        if items > 0 || is > 0 || ix > 0 {
            trace!(target: "bookstore::lock", context = %self.context, items, is, ix, "session closed with holds");
        }
    }
}

impl std::fmt::Debug for TwoLevelSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwoLevelSession")
            .field("context", &self.context)
            .field("catalog", &self.catalog)
            .field("items", &self.items.len())
            .finish()
    }
}

/// One acquisition made by the current call
#[derive(Debug, Clone, Copy)]
enum Acquired {
    Intention(IntentionMode),
    Store,
    Item(Isbn, LockMode),
}

/// Holds taken by one call, undone on drop unless committed
struct Acquisition<'s, 'a> {
    session: &'s mut TwoLevelSession<'a>,
    log: SmallVec<[Acquired; 8]>,
}

impl Acquisition<'_, '_> {
    fn intention(&mut self, mode: IntentionMode) -> Result<()> {
        let s = &mut *self.session;
        s.store
            .catalog
            .acquire(s.context, mode, &mut s.catalog, s.store.lock_timeout)?;
        self.log.push(Acquired::Intention(mode));
        Ok(())
    }

    fn store_exclusive(&mut self) -> Result<()> {
        let s = &mut *self.session;
        // Upgrade is unsupported: give up every hold first
        if s.catalog.is_held() && !s.catalog.is_exclusive() {
            let (items, is, ix) = s.release_everything();
            debug!(target: "bookstore::lock", context = %s.context, items, is, ix, "holds dropped before store-wide exclusive");
        }
        s.store
            .catalog
            .acquire_exclusive(&mut s.catalog, s.store.lock_timeout)?;
        self.log.push(Acquired::Store);
        Ok(())
    }

    fn item(&mut self, isbn: Isbn, mode: LockMode) -> Result<()> {
        let s = &mut *self.session;
        let lock = s
            .catalog
            .get()
            .ok_or_else(unheld)?
            .items
            .get(&isbn)
            .cloned()
            .ok_or(Error::IsbnNotFound(isbn))?;

        let slot = s.items.entry(isbn).or_default();
        if mode == LockMode::Exclusive && slot.is_held() && !slot.is_exclusive() {
            slot.release_all();
        }
        let acquired = match mode {
            LockMode::Shared => lock.acquire_shared(slot, s.store.lock_timeout),
            LockMode::Exclusive => lock.acquire_exclusive(slot, s.store.lock_timeout),
        };
        if let Err(e) = acquired {
            if !slot.is_held() {
                s.items.remove(&isbn);
            }
            return Err(e.into());
        }
        self.log.push(Acquired::Item(isbn, mode));
        Ok(())
    }

    /// Intention of `mode`, then the matching item locks in ISBN order
    fn lock_items<'i>(
        &mut self,
        mode: IntentionMode,
        isbns: impl IntoIterator<Item = &'i Isbn>,
    ) -> Result<()> {
        self.intention(mode)?;
        let item_mode = match mode {
            IntentionMode::Shared => LockMode::Shared,
            IntentionMode::Exclusive => LockMode::Exclusive,
        };
        for &isbn in isbns {
            self.item(isbn, item_mode)?;
        }
        Ok(())
    }

    /// IS, then a shared lock on every title in the catalog
    fn lock_all_items(&mut self) -> Result<()> {
        self.intention(IntentionMode::Shared)?;
        let isbns: Vec<Isbn> = self.catalog()?.items.keys().copied().collect();
        for isbn in isbns {
            self.item(isbn, LockMode::Shared)?;
        }
        Ok(())
    }

    fn catalog(&self) -> Result<&Catalog> {
        self.session.catalog.get().ok_or_else(unheld)
    }

    fn catalog_mut(&mut self) -> Result<&mut Catalog> {
        self.session.catalog.get_mut().ok_or_else(unheld)
    }

    fn record(&self, isbn: Isbn) -> Result<&BookRecord> {
        self.session
            .items
            .get(&isbn)
            .and_then(HoldSlot::get)
            .ok_or_else(unheld)
    }

    fn record_mut(&mut self, isbn: Isbn) -> Result<&mut BookRecord> {
        self.session
            .items
            .get_mut(&isbn)
            .and_then(HoldSlot::get_mut)
            .ok_or_else(unheld)
    }

    /// Records of every title in the catalog, in ISBN order
    fn held_records(&self) -> Result<impl Iterator<Item = &BookRecord>> {
        let catalog = self.catalog()?;
        catalog
            .items
            .keys()
            .map(|&isbn| self.record(isbn))
            .collect::<Result<Vec<_>>>()
            .map(Vec::into_iter)
    }

    fn commit(mut self) {
        self.log.clear();
    }

    fn undo(&mut self, step: Acquired) -> std::result::Result<(), bookstore_concurrency::LockError> {
        let s = &mut *self.session;
        match step {
            Acquired::Intention(mode) => s.store.catalog.release(s.context, mode, &mut s.catalog),
            Acquired::Store => s.catalog.release_exclusive(),
            Acquired::Item(isbn, mode) => {
                let Some(slot) = s.items.get_mut(&isbn) else {
                    return Err(bookstore_concurrency::LockError::NotHeld(mode));
                };
                slot.release(mode)?;
                if !slot.is_held() {
                    s.items.remove(&isbn);
                }
                Ok(())
            }
        }
    }
}

impl Drop for Acquisition<'_, '_> {
    fn drop(&mut self) {
        while let Some(step) = self.log.pop() {
            if let Err(e) = self.undo(step) {
                error!(target: "bookstore::lock", context = %self.session.context, ?step, error = %e, "rollback failed");
            }
        }
    }
}

fn unheld() -> Error {
    Error::LockState("catalog or title accessed without a matching hold".to_string())
}

impl LockScope for TwoLevelSession<'_> {
    fn release_all_locks(&mut self) -> Result<()> {
        let (items, is, ix) = self.release_everything();
        if items > 0 || is > 0 || ix > 0 {
            debug!(target: "bookstore::lock", context = %self.context, items, is, ix, "all holds released");
        }
        Ok(())
    }

    fn holds_locks(&self) -> bool {
        self.catalog.is_held() || !self.items.is_empty()
    }
}

impl StockManager for TwoLevelSession<'_> {
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

impl BookStore for TwoLevelSession<'_> {
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
