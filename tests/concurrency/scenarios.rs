//! Canonical inventory scenarios, run under both strategies.

use crate::common::*;
use bookstore::FieldError;
use bookstore_core::Error;
use std::collections::BTreeSet;
use std::sync::{Arc, Barrier};
use std::thread;

/// Test: buy(5) racing add_copies(+5) on a title with 5 copies ends at 5
#[test]
fn test_buy_restock_race_ends_at_five() {
    for strategy in STRATEGIES {
        for trial in 0..100 {
            let store = seeded_store(strategy, &[default_book()]);
            let barrier = Arc::new(Barrier::new(2));

            let buy = {
                let (store, barrier) = (Arc::clone(&store), Arc::clone(&barrier));
                thread::spawn(move || {
                    let mut session = store.session();
                    barrier.wait();
                    session.buy_books(&[BookCopy::new(ISBN, 5)])
                })
            };
            let restock = {
                let (store, barrier) = (Arc::clone(&store), Arc::clone(&barrier));
                thread::spawn(move || {
                    let mut session = store.session();
                    barrier.wait();
                    session.add_copies(&[BookCopy::new(ISBN, 5)])
                })
            };
            buy.join().unwrap().unwrap();
            restock.join().unwrap().unwrap();

            let book = stock_of(&store, ISBN);
            assert_eq!(book.copies_in_stock, 5, "{} trial {}", strategy, trial);
            assert_eq!(book.num_copies, 10);
        }
    }
}

/// Test: editor picks return all picks once, or exactly n distinct ones
#[test]
fn test_editor_pick_sampling() {
    for strategy in STRATEGIES {
        let store = seeded_store(strategy, &numbered_books(10, 1));
        let mut session = store.session();
        let picked: Vec<_> = [2, 3, 5, 7].iter().map(|&i| BookEditorPick::new(i, true)).collect();
        session.update_editor_picks(&picked).unwrap();
        session.release_all_locks().unwrap();

        let all = session.get_editor_picks(4).unwrap();
        let isbns: BTreeSet<_> = all.iter().map(|b| b.isbn.get()).collect();
        assert_eq!(all.len(), 4);
        assert_eq!(isbns, BTreeSet::from([2, 3, 5, 7]));

        for n in 0..4 {
            let some = session.get_editor_picks(n).unwrap();
            let isbns: BTreeSet<_> = some.iter().map(|b| b.isbn.get()).collect();
            assert_eq!(some.len(), n as usize);
            assert_eq!(isbns.len(), n as usize);
            assert!(isbns.iter().all(|i| [2, 3, 5, 7].contains(i)));
        }
    }
}

/// Test: a negative price anywhere in the batch leaves the inventory unchanged
#[test]
fn test_negative_price_batch_rejected_whole() {
    for strategy in STRATEGIES {
        let store = seeded_store(strategy, &[default_book()]);
        let mut batch = numbered_books(3, 1);
        batch[2].price = -0.5;

        let mut session = store.session();
        assert_eq!(
            session.add_books(&batch),
            Err(Error::InvalidField {
                isbn: Isbn::new(3),
                field: FieldError::NegativePrice,
            })
        );
        assert_eq!(session.get_all_books().unwrap(), vec![default_book()]);
    }
}

/// Test: an over-quantity item fails the whole buy, but its miss is recorded
#[test]
fn test_over_quantity_buy() {
    for strategy in STRATEGIES {
        let store = seeded_store(strategy, &numbered_books(3, 2));
        let mut session = store.session();
        let result = session.buy_books(&[
            BookCopy::new(1, 1),
            BookCopy::new(2, 5),
            BookCopy::new(3, 1),
        ]);
        assert_eq!(
            result,
            Err(Error::StockUnavailable {
                misses: vec![(Isbn::new(2), 3)],
            })
        );
        drop(session);

        for isbn in 1..=3 {
            assert_eq!(stock_of(&store, isbn).copies_in_stock, 2);
        }
        assert_eq!(stock_of(&store, 2).sale_misses, 3);
        assert_eq!(stock_of(&store, 1).sale_misses, 0);
    }
}
