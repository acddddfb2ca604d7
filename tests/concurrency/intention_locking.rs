//! Multi-granularity locking behavior of the two-level strategy.

use crate::common::*;
use bookstore::InventoryStore;
use bookstore_concurrency::IntentionMode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

fn intention_holders(store: &InventoryStore, mode: IntentionMode) -> usize {
    match store {
        InventoryStore::TwoLevel(store) => store.intention_holder_count(mode),
        InventoryStore::SingleLock(_) => panic!("two-level store expected"),
    }
}

/// Test: readers and writers of disjoint titles hold their locks at the same time
#[test]
fn test_disjoint_sections_overlap() {
    let store = seeded_store(LockingStrategy::TwoLevel, &numbered_books(4, 10));
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (1..=4)
        .map(|isbn| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut session = store.session();
                if isbn % 2 == 0 {
                    session.buy_books(&[BookCopy::new(isbn, 1)]).unwrap();
                } else {
                    session.get_books(&[Isbn::new(isbn)]).unwrap();
                }
                // All four sessions hold their locks here
                barrier.wait();
                session.release_all_locks().unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(intention_holders(&store, IntentionMode::Shared), 0);
    assert_eq!(intention_holders(&store, IntentionMode::Exclusive), 0);
}

/// Test: a structural operation waits until item-level sections end
#[test]
fn test_structural_waits_for_item_sections() {
    let store = seeded_store(LockingStrategy::TwoLevel, &numbered_books(2, 1));
    let mut reader = store.session();
    reader.get_books(&[Isbn::new(1)]).unwrap();
    assert_eq!(intention_holders(&store, IntentionMode::Shared), 1);

    let done = Arc::new(AtomicBool::new(false));
    let admin = {
        let store = Arc::clone(&store);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            store.session().remove_all_books().unwrap();
            done.store(true, Ordering::SeqCst);
        })
    };

    thread::sleep(Duration::from_millis(100));
    assert!(!done.load(Ordering::SeqCst), "structural change ran under an IS holder");

    reader.release_all_locks().unwrap();
    admin.join().unwrap();
    assert!(store.session().get_all_books().unwrap().is_empty());
}

/// Test: item operations wait while a structural section is open
#[test]
fn test_intention_blocks_against_structural_holder() {
    let store = seeded_store(LockingStrategy::TwoLevel, &numbered_books(2, 5));
    let mut admin = store.session();
    admin.add_books(&[StockBook::new(3, "Three", "C", 1.0, 1)]).unwrap();

    let done = Arc::new(AtomicBool::new(false));
    let buyer = {
        let store = Arc::clone(&store);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            store.session().buy_books(&[BookCopy::new(3, 1)]).unwrap();
            done.store(true, Ordering::SeqCst);
        })
    };

    thread::sleep(Duration::from_millis(100));
    assert!(!done.load(Ordering::SeqCst), "IX granted under a store-wide exclusive hold");

    admin.release_all_locks().unwrap();
    buyer.join().unwrap();
    assert_eq!(stock_of(&store, 3).copies_in_stock, 0);
}

/// Test: failed calls leave the intention table as they found it
#[test]
fn test_failures_leave_no_intentions() {
    let store = seeded_store(LockingStrategy::TwoLevel, &numbered_books(3, 1));
    let mut session = store.session();

    assert!(session.buy_books(&[BookCopy::new(1, 1), BookCopy::new(9, 1)]).is_err());
    assert!(session.get_books(&[Isbn::new(2), Isbn::new(8)]).is_err());
    assert!(session.buy_books(&[BookCopy::new(3, 2)]).is_err());

    assert!(!session.holds_locks());
    assert_eq!(intention_holders(&store, IntentionMode::Shared), 0);
    assert_eq!(intention_holders(&store, IntentionMode::Exclusive), 0);
}
