//! Stateless batch normalization
//!
//! Every batch is checked element by element, in request order, before any
//! lock is taken. The result is keyed and sorted by ISBN, which is also the
//! order item locks are acquired in. Checks against the live inventory
//! (presence, duplicates against stored titles) happen later, under the lock.

use bookstore_core::validation::{validate_isbn, validate_new_book, validate_quantity};
use bookstore_core::{BookCopy, BookEditorPick, Error, Isbn, Result, StockBook};
use std::collections::{BTreeMap, BTreeSet};

/// Validate new titles and reject ISBNs repeated within the batch
pub fn new_books(books: &[StockBook]) -> Result<BTreeMap<Isbn, &StockBook>> {
    let mut by_isbn = BTreeMap::new();
    for book in books {
        validate_new_book(book)?;
        if by_isbn.insert(book.isbn, book).is_some() {
            return Err(Error::DuplicateIsbn(book.isbn));
        }
    }
    Ok(by_isbn)
}

/// Validate copy requests and sum quantities per ISBN
pub fn copy_quantities(copies: &[BookCopy]) -> Result<BTreeMap<Isbn, i32>> {
    let mut totals: BTreeMap<Isbn, i32> = BTreeMap::new();
    for copy in copies {
        validate_isbn(copy.isbn)?;
        validate_quantity(copy.isbn, copy.num_copies)?;
        let total = totals.entry(copy.isbn).or_insert(0);
        *total = total.checked_add(copy.num_copies).ok_or_else(|| {
            Error::InvalidRequest(format!("total quantity for ISBN {} overflows", copy.isbn))
        })?;
    }
    Ok(totals)
}

/// Validate editor pick updates; the last update of an ISBN wins
pub fn editor_picks(picks: &[BookEditorPick]) -> Result<BTreeMap<Isbn, bool>> {
    let mut flags = BTreeMap::new();
    for pick in picks {
        validate_isbn(pick.isbn)?;
        flags.insert(pick.isbn, pick.editor_pick);
    }
    Ok(flags)
}

/// Validate ISBNs and return them sorted without repeats
pub fn isbn_set(isbns: &[Isbn]) -> Result<BTreeSet<Isbn>> {
    isbns
        .iter()
        .map(|&isbn| validate_isbn(isbn).map(|()| isbn))
        .collect()
}

/// Validate the size of an editor pick sample
pub fn sample_size(n: i32) -> Result<usize> {
    usize::try_from(n)
        .map_err(|_| Error::InvalidRequest(format!("numBooks = {}, but it must be non-negative", n)))
}
