use dblike::error::ErrorKind;
use dblike::store::{Schema, Table, TableDef};
use dblike::types::{RowId, Value};
use dblike_telemetry::init_test_tracing;

#[test]
fn composite_key_rows_are_found_by_tuple() {
    init_test_tracing();
    let table = Table::new("versions", "row_id id_modif").unwrap();
    table
        .add_row([
            ("row_id", Value::from(1)),
            ("id_modif", Value::from(100)),
            ("val", Value::from("x")),
        ])
        .unwrap();

    let row = table.get((1, 100)).unwrap();
    assert_eq!(row.column("val").unwrap().value(), &Value::from("x"));
    assert!(table.contains((1, 100)));
    assert!(!table.contains(1));
    assert!(!table.contains((100, 1)));
    assert_eq!(
        row.row_id().unwrap(),
        RowId::Composite(vec![Value::from(1), Value::from(100)])
    );
}

#[test]
fn duplicate_primary_key_is_rejected() {
    init_test_tracing();
    let table = Table::new("versions", "row_id id_modif").unwrap();
    let first = table
        .add_row([("row_id", 1), ("id_modif", 100), ("val", 1)])
        .unwrap();

    let err = table
        .add_row([("row_id", 1), ("id_modif", 100), ("val", 2)])
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DuplicateKey);
    assert_eq!(table.len(), 1);

    let duplicate = err.duplicate_row().unwrap();
    assert_eq!(duplicate.existing, first);
    assert_eq!(
        duplicate.rejected.column("val").unwrap().value(),
        &Value::from(2)
    );
    assert_eq!(
        table.get((1, 100)).unwrap().column("val").unwrap().value(),
        &Value::from(1)
    );
}

#[test]
fn row_without_primary_key_column_is_rejected() {
    init_test_tracing();
    let table = Table::new("versions", "row_id id_modif").unwrap();

    let err = table.add_row([("row_id", 1), ("val", 2)]).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ContractViolation);
    assert!(table.is_empty());
}

#[test]
fn get_reports_missing_rows() {
    init_test_tracing();
    let table = Table::new("x", "row_id").unwrap();
    table.add_row([("row_id", 1)]).unwrap();

    let err = table.get(2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RowNotFound);
    assert!(err.kind().is_not_found());

    let err = table
        .get(RowId::Composite(vec![Value::from(1)]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContractViolation);
}

#[test]
fn iteration_yields_each_row_with_its_identifier() {
    init_test_tracing();
    let schema = Schema::new(vec![
        TableDef::new("single", "id"),
        TableDef::new("pair", "a b"),
    ])
    .unwrap();

    let single = schema.table("single").unwrap();
    for id in 1..=3 {
        single.add_row([("id", id)]).unwrap();
    }
    let mut ids: Vec<RowId> = single.iter().map(|(row_id, _)| row_id).collect();
    ids.sort_by_key(|row_id| match row_id {
        RowId::Single(value) => value.as_i64(),
        RowId::Composite(_) => None,
    });
    assert_eq!(ids, vec![RowId::from(1), RowId::from(2), RowId::from(3)]);

    let pair = schema.table("pair").unwrap();
    pair.add_row([("a", "x"), ("b", "y")]).unwrap();
    let (row_id, row) = pair.iter().next().unwrap();
    assert_eq!(row_id, RowId::from(("x", "y")));
    assert_eq!(row.table_name(), "pair");

    // Rows added while iterating do not disturb the snapshot.
    let mut seen = 0;
    for (id, (_, _)) in (10..).zip(single.iter()) {
        single.add_row([("id", id)]).unwrap();
        seen += 1;
    }
    assert_eq!(seen, 3);
    assert_eq!(single.len(), 6);
}

#[test]
fn column_values_follow_requested_order() {
    init_test_tracing();
    let table = Table::new("t", "k").unwrap();
    let row = table
        .add_row([("k", "a1"), ("b", "b1"), ("c", "c1")])
        .unwrap();

    let forward = row.column_values("b c").unwrap().into_values();
    let mut backward = row.column_values("c b").unwrap().into_values();
    backward.reverse();
    assert_eq!(forward, backward);

    assert_eq!(
        row.column_values("b b b").unwrap().into_values(),
        vec![Value::from("b1"); 3]
    );
}
