//! Multi-call critical sections: holds retained until release_all_locks.

use crate::common::*;
use bookstore_core::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Test: repeated reads inside a section see the same value
#[test]
fn test_repeatable_read_until_release() {
    for strategy in STRATEGIES {
        let store = seeded_store(strategy, &[default_book()]);
        let mut reader = store.session();
        let first = reader.get_books_by_isbn(&[Isbn::new(ISBN)]).unwrap();

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut session = store.session();
                session.buy_books(&[BookCopy::new(ISBN, 2)]).unwrap();
            })
        };

        thread::sleep(Duration::from_millis(100));
        let second = reader.get_books_by_isbn(&[Isbn::new(ISBN)]).unwrap();
        assert_eq!(first, second, "{}", strategy);

        reader.release_all_locks().unwrap();
        writer.join().unwrap();
        assert_eq!(stock_of(&store, ISBN).copies_in_stock, 3);
    }
}

/// Test: check-then-act across two calls cannot be interleaved
#[test]
fn test_check_then_buy_section() {
    for strategy in STRATEGIES {
        let store = seeded_store(strategy, &[default_book()]);
        let mut session = store.session();

        // Take the exclusive hold first, then read and act on what was read
        session.add_copies(&[BookCopy::new(ISBN, 1)]).unwrap();
        let stock = session.get_books_by_isbn(&[Isbn::new(ISBN)]).unwrap()[0].copies_in_stock;

        let intruded = Arc::new(AtomicBool::new(false));
        let intruder = {
            let store = Arc::clone(&store);
            let intruded = Arc::clone(&intruded);
            thread::spawn(move || {
                let result = store.session().buy_books(&[BookCopy::new(ISBN, 1)]);
                intruded.store(true, Ordering::SeqCst);
                result
            })
        };

        thread::sleep(Duration::from_millis(50));
        session.buy_books(&[BookCopy::new(ISBN, stock)]).unwrap();
        assert!(!intruded.load(Ordering::SeqCst));
        session.release_all_locks().unwrap();

        // The intruder now finds nothing left
        assert_eq!(
            intruder.join().unwrap(),
            Err(Error::StockUnavailable {
                misses: vec![(Isbn::new(ISBN), 1)],
            }),
            "{}",
            strategy
        );
        assert_eq!(stock_of(&store, ISBN).copies_in_stock, 0);
        assert_eq!(stock_of(&store, ISBN).sale_misses, 1);
    }
}

/// Test: dropping a session ends its section
#[test]
fn test_drop_ends_section() {
    for strategy in STRATEGIES {
        let store = seeded_store(strategy, &[default_book()]);
        {
            let mut session = store.session();
            session.remove_books(&[Isbn::new(ISBN)]).unwrap();
            assert!(session.holds_locks());
        }

        let mut other = store.session();
        other.add_books(&[default_book()]).unwrap();
        assert_eq!(other.get_all_books().unwrap(), vec![default_book()]);
    }
}
