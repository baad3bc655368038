//! A built engine is shared across threads.

use std::sync::Arc;
use std::thread;

use ruleval_validator::{FieldErrors, RuleValidator};
use serde_json::json;

use super::engine;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn engine_is_send_and_sync() {
    assert_send_sync::<RuleValidator>();
}

#[test]
fn parallel_calls_see_only_their_own_subject() {
    let v = Arc::new(engine(&[
        &["id", "INT", "REQ:ID_REQ", "RANGE:0:*:ID_NEG"],
        &["tag", "STR", "IN:even,odd:TAG_BAD"],
    ]));

    let handles: Vec<_> = (0..8_i64)
        .map(|worker| {
            let v = Arc::clone(&v);
            thread::spawn(move || {
                for i in 0..200_i64 {
                    let id = worker * 1000 + i;
                    let tag = if id % 2 == 0 { "even" } else { "wrong" };
                    let errors = v.validate(&json!({ "id": -id - 1, "tag": tag })).unwrap();

                    let mut expected = vec![FieldErrors::new("id", ["ID_NEG"])];
                    if id % 2 != 0 {
                        expected.push(FieldErrors::new("tag", ["TAG_BAD"]));
                    }
                    assert_eq!(errors, expected);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }
}
