//! Command dispatch through `Executor` and `Session`.

use crate::common::*;
use bookstore::{Command, Error, Executor, Output, Session};

fn executor(strategy: LockingStrategy) -> Executor {
    Executor::new(seeded_store(strategy, &[default_book()]))
}

#[test]
fn test_every_stock_command_dispatches() {
    for strategy in STRATEGIES {
        let executor = executor(strategy);
        let results = executor.execute_many(vec![
            Command::AddBooks {
                books: Some(numbered_books(2, 3)),
            },
            Command::AddCopies {
                copies: Some(vec![BookCopy::new(1, 2)]),
            },
            Command::UpdateEditorPicks {
                picks: Some(vec![BookEditorPick::new(2, true)]),
            },
            Command::RemoveBooks {
                isbns: Some(vec![Isbn::new(ISBN)]),
            },
            Command::GetAllBooks,
        ]);

        assert!(results[..4].iter().all(|r| *r == Ok(Output::Unit)), "{}", strategy);
        let Ok(Output::StockBooks(books)) = &results[4] else {
            panic!("unexpected result: {:?}", results[4]);
        };
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].num_copies, 5);
        assert!(books[1].editor_pick);
    }
}

#[test]
fn test_customer_commands_return_books() {
    for strategy in STRATEGIES {
        let executor = executor(strategy);
        executor
            .execute(Command::UpdateEditorPicks {
                picks: Some(vec![BookEditorPick::new(ISBN, true)]),
            })
            .unwrap();

        let picks = executor.execute(Command::GetEditorPicks { num_books: 5 });
        let Ok(Output::Books(picks)) = picks else {
            panic!("unexpected result: {:?}", picks);
        };
        assert_eq!(picks, vec![default_book().to_book()]);

        let books = executor.execute(Command::GetBooks {
            isbns: Some(vec![Isbn::new(ISBN)]),
        });
        assert_eq!(books, Ok(Output::Books(vec![default_book().to_book()])));
    }
}

#[test]
fn test_absent_batch_is_null_input() {
    let executor = executor(LockingStrategy::TwoLevel);
    for cmd in [
        Command::AddBooks { books: None },
        Command::AddCopies { copies: None },
        Command::BuyBooks { copies: None },
        Command::GetBooks { isbns: None },
        Command::RemoveBooks { isbns: None },
    ] {
        assert_eq!(executor.execute(cmd), Err(Error::NullInput));
    }
}

#[test]
fn test_unsupported_operations_are_reported() {
    let executor = executor(LockingStrategy::SingleLock);
    for cmd in [
        Command::GetBooksInDemand,
        Command::GetTopRatedBooks { num_books: 1 },
        Command::RateBooks {
            ratings: Some(vec![]),
        },
    ] {
        assert!(matches!(executor.execute(cmd), Err(Error::Unsupported { .. })));
    }
}

#[test]
fn test_json_session_round() {
    for strategy in STRATEGIES {
        let store = seeded_store(strategy, &[default_book()]);
        let mut session = Session::new(&store);

        let bought = session.execute_json(&format!(
            r#"{{"BuyBooks":{{"copies":[{{"isbn":{},"num_copies":2}}]}}}}"#,
            ISBN
        ));
        assert_eq!(bought, r#"{"Ok":"Unit"}"#);
        assert!(session.holds_locks());

        let response = session.execute_json(r#"{"GetBooksByIsbn":{"isbns":[-1]}}"#);
        let value: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert!(value["Err"]["InvalidIsbn"].is_object(), "{}", response);

        let released = session.execute_json(r#""ReleaseAllLocks""#);
        assert_eq!(released, r#"{"Ok":"Unit"}"#);
        assert!(!session.holds_locks());
        assert_eq!(stock_of(&store, ISBN).copies_in_stock, 3);
    }
}

#[test]
fn test_malformed_json_is_serialization_error() {
    let store = test_store(LockingStrategy::TwoLevel);
    let mut session = Session::new(&store);
    let response = session.execute_json(r#"{"BuyBooks":{"copies":[{"isbn":1,"#);
    let value: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert!(value["Err"]["Serialization"]["reason"].is_string(), "{}", response);
    assert!(!session.holds_locks());
}
