//! Sessions on separate threads sharing one executor.

use crate::common::*;
use bookstore::{Command, Executor, Output};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_concurrent_buyers_never_oversell() {
    for strategy in STRATEGIES {
        let executor = Executor::new(seeded_store(strategy, &numbered_books(1, 10)));
        let barrier = Arc::new(Barrier::new(16));
        let succeeded = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let executor = executor.clone();
                let barrier = Arc::clone(&barrier);
                let succeeded = Arc::clone(&succeeded);
                thread::spawn(move || {
                    barrier.wait();
                    let result = executor.execute(Command::BuyBooks {
                        copies: Some(vec![BookCopy::new(1, 1)]),
                    });
                    if result.is_ok() {
                        succeeded.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let book = stock_of(executor.store(), 1);
        assert_eq!(succeeded.load(Ordering::SeqCst), 10, "{}", strategy);
        assert_eq!(book.copies_in_stock, 0);
        assert_eq!(book.sale_misses, 6);
    }
}

#[test]
fn test_session_section_spans_commands() {
    for strategy in STRATEGIES {
        let executor = Executor::new(seeded_store(strategy, &[default_book()]));
        let mut session = executor.session();
        session
            .execute(Command::AddCopies {
                copies: Some(vec![BookCopy::new(ISBN, 5)]),
            })
            .unwrap();

        // Another thread's command waits for the section to end
        let other = {
            let executor = executor.clone();
            thread::spawn(move || executor.execute(Command::GetAllBooks))
        };
        session
            .execute(Command::BuyBooks {
                copies: Some(vec![BookCopy::new(ISBN, 10)]),
            })
            .unwrap();
        session.execute(Command::ReleaseAllLocks).unwrap();

        let Ok(Output::StockBooks(books)) = other.join().unwrap() else {
            panic!("listing failed under {}", strategy);
        };
        assert_eq!(books[0].copies_in_stock, 0);
        assert_eq!(books[0].num_copies, 10);
    }
}
