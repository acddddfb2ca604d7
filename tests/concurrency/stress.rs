//! Randomized multi-threaded workloads.
//!
//! Each thread runs a seeded mix of buys, restocks, lookups and editor pick
//! updates. Copies are never created or destroyed outside add_copies, so the
//! stock ledger must balance once every thread has finished.

use crate::common::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::thread;

const TITLES: i32 = 8;
const THREADS: u64 = 8;
const OPS_PER_THREAD: usize = 200;

fn random_isbns(rng: &mut StdRng) -> Vec<i32> {
    let all: Vec<i32> = (1..=TITLES).collect();
    let n = rng.gen_range(1..=3);
    let mut picked: Vec<i32> = all.choose_multiple(rng, n).copied().collect();
    // Unsorted batches exercise the ordered acquisition path
    picked.shuffle(rng);
    picked
}

fn run_workload(strategy: LockingStrategy) {
    let store = seeded_store(strategy, &numbered_books(TITLES, 20));
    let sold = Arc::new(AtomicI64::new(0));
    let restocked = Arc::new(AtomicI64::new(0));

    let handles: Vec<_> = (0..THREADS)
        .map(|seed| {
            let store = Arc::clone(&store);
            let sold = Arc::clone(&sold);
            let restocked = Arc::clone(&restocked);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut session = store.session();
                for _ in 0..OPS_PER_THREAD {
                    let isbns = random_isbns(&mut rng);
                    match rng.gen_range(0..4) {
                        0 => {
                            let copies: Vec<_> =
                                isbns.iter().map(|&i| BookCopy::new(i, 1)).collect();
                            if session.buy_books(&copies).is_ok() {
                                sold.fetch_add(copies.len() as i64, Ordering::SeqCst);
                            }
                        }
                        1 => {
                            let copies: Vec<_> =
                                isbns.iter().map(|&i| BookCopy::new(i, 2)).collect();
                            session.add_copies(&copies).unwrap();
                            restocked.fetch_add(2 * copies.len() as i64, Ordering::SeqCst);
                        }
                        2 => {
                            let keys: Vec<_> = isbns.iter().map(|&i| Isbn::new(i)).collect();
                            let books = session.get_books(&keys).unwrap();
                            assert_eq!(books.len(), keys.len());
                        }
                        _ => {
                            let picks: Vec<_> = isbns
                                .iter()
                                .map(|&i| BookEditorPick::new(i, rng.gen_bool(0.5)))
                                .collect();
                            session.update_editor_picks(&picks).unwrap();
                        }
                    }
                    session.release_all_locks().unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let books = store.session().get_all_books().unwrap();
    assert_eq!(books.len(), TITLES as usize);
    let in_stock: i64 = books.iter().map(|b| b.copies_in_stock as i64).sum();
    let total: i64 = books.iter().map(|b| b.num_copies as i64).sum();
    let seeded = (TITLES * 20) as i64;

    assert!(books.iter().all(|b| b.copies_in_stock >= 0), "{}", strategy);
    assert!(books.iter().all(|b| b.copies_in_stock <= b.num_copies));
    assert_eq!(total, seeded + restocked.load(Ordering::SeqCst));
    assert_eq!(
        in_stock,
        seeded + restocked.load(Ordering::SeqCst) - sold.load(Ordering::SeqCst)
    );
}

/// Test: random workload balances under the single lock
#[test]
fn test_random_workload_single_lock() {
    run_workload(LockingStrategy::SingleLock);
}

/// Test: random workload balances under two-level locking
#[test]
fn test_random_workload_two_level() {
    run_workload(LockingStrategy::TwoLevel);
}
