use std::thread;

use dblike::store::{Schema, TableDef};
use dblike::types::Value;
use dblike_telemetry::init_test_tracing;

#[test]
fn tables_accept_rows_from_many_threads() {
    init_test_tracing();
    let schema = Schema::new(vec![TableDef::new("events", "worker seq")]).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let schema = schema.clone();
            thread::spawn(move || {
                let events = schema.table("events").unwrap();
                for seq in 0..50 {
                    events
                        .add_row([
                            ("worker", Value::from(worker)),
                            ("seq", Value::from(seq)),
                            ("even", Value::from(seq % 2 == 0)),
                        ])
                        .unwrap();
                    events.find_rows("even", [true]).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let events = schema.table("events").unwrap();
    assert_eq!(events.len(), 200);
    assert_eq!(events.find_rows("even", [true]).unwrap().len(), 100);
    assert_eq!(events.find_rows("worker", [2]).unwrap().len(), 50);
}
