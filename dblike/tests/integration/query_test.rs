use std::collections::BTreeSet;

use dblike::error::ErrorKind;
use dblike::store::{LookupStrategy, Table};
use dblike::test_utils::table::{assert_row_set_eq, column_strings, x_table};
use dblike::types::{ColumnSpec, CompositeKey, Value};
use dblike_telemetry::init_test_tracing;

#[test]
fn multi_column_filter_matches_exact_rows() {
    init_test_tracing();
    let x = x_table();

    let rows = x.find_rows(["val", "row_id"], ("valueX", 3)).unwrap();
    assert_row_set_eq(&rows, &[x.get(3).unwrap()]);

    let rows = x.find_rows("val", ["valueX"]).unwrap();
    assert_row_set_eq(&rows, &[x.get(3).unwrap(), x.get(4).unwrap()]);
    assert_eq!(column_strings(&rows, "row_id"), vec!["3", "4"]);

    assert!(x.find_rows("val", ["valueY"]).unwrap().is_empty());
}

#[test]
fn index_and_scan_lookups_agree() {
    init_test_tracing();
    let table = Table::new("grid", "id").unwrap();
    let mut id = 0;
    for a in ["p", "q", ""] {
        for b in [0, 1, 2] {
            for c in [Value::Null, Value::from(true), Value::from("c")] {
                id += 1;
                table
                    .add_row([
                        ("id", Value::from(id)),
                        ("a", Value::from(a)),
                        ("b", Value::from(b)),
                        ("c", c.clone()),
                    ])
                    .unwrap();
            }
        }
    }

    let specs = ["a", "b", "c", "a b", "b a", "a c", "a b c", "c b a", "id a"];
    for spec in specs {
        let columns = ColumnSpec::parse(spec);
        let mut tuples = BTreeSet::new();
        let mut keys = Vec::new();
        for row in table.rows() {
            let key = row.column_values(&columns).unwrap();
            if tuples.insert(key.to_string()) {
                keys.push(key);
            }
        }

        for key in keys {
            let indexed = table
                .find_rows_with(&columns, key.clone(), LookupStrategy::Index)
                .unwrap();
            let scanned = table
                .find_rows_with(&columns, key.clone(), LookupStrategy::Scan)
                .unwrap();
            assert!(!indexed.is_empty(), "no rows for {spec} = {key}");
            assert_eq!(indexed, scanned, "index and scan disagree for {spec} = {key}");
        }

        // Tuples that match no row must come back empty from both strategies.
        let misses = [
            CompositeKey::new(vec![Value::from("zz"); columns.len()]),
            CompositeKey::new(
                (0..columns.len())
                    .map(|i| if i % 2 == 0 { Value::from("zz") } else { Value::from(9) })
                    .collect(),
            ),
            CompositeKey::new(vec![Value::U64(1); columns.len()]),
        ];
        for key in misses {
            let indexed = table
                .find_rows_with(&columns, key.clone(), LookupStrategy::Index)
                .unwrap();
            let scanned = table
                .find_rows_with(&columns, key.clone(), LookupStrategy::Scan)
                .unwrap();
            assert!(indexed.is_empty(), "unexpected rows for {spec} = {key}");
            assert!(scanned.is_empty(), "unexpected rows for {spec} = {key}");
        }
    }

    let stats = table.index_stats();
    assert_eq!(stats.build_count, specs.len() as u64);
    assert_eq!(stats.lookup_miss_count, 3 * specs.len() as u64);
    assert!(stats.scan_count > 0);
}

#[test]
fn every_row_is_found_by_its_own_identifier() {
    init_test_tracing();
    let x = x_table();
    let versions = Table::new("versions", "row_id id_modif").unwrap();
    for (row_id, id_modif) in [(1, 100), (1, 101), (2, 100)] {
        versions
            .add_row([("row_id", row_id), ("id_modif", id_modif)])
            .unwrap();
    }

    for table in [&x, &versions] {
        for row in table.rows() {
            let row_id = row.row_id().unwrap();
            assert!(table.contains(row_id.clone()));
            assert_eq!(table.get(row_id).unwrap(), row);
        }
        for (row_id, row) in table.iter() {
            assert_eq!(table.get(row_id).unwrap(), row);
        }
    }
}

#[test]
fn index_is_rebuilt_after_insert() {
    init_test_tracing();
    let x = x_table();

    assert_eq!(x.find_rows("val", ["valueX"]).unwrap().len(), 2);
    assert!(x.index_exists("val"));
    assert_eq!(x.index_stats().build_count, 1);

    let row = x.add_row([("row_id", Value::from(5)), ("val", "valueX".into())]).unwrap();
    assert!(!x.index_exists("val"));
    assert_eq!(x.index_stats().invalidation_count, 1);

    let rows = x.find_rows("val", ["valueX"]).unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.contains(&row));
    assert_eq!(x.index_stats().build_count, 2);
}

#[test]
fn cached_index_lookup_requires_built_index() {
    init_test_tracing();
    let x = x_table();

    let err = x.index_find_rows("val", ["valueX"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IndexNotFound);

    x.build_index("val").unwrap();
    assert_eq!(x.index_find_rows("val", ["valueX"]).unwrap().len(), 2);

    x.clear_indexes();
    assert!(!x.index_exists("val"));
}

#[test]
fn malformed_filters_are_rejected() {
    init_test_tracing();
    let x = x_table();

    let err = x.find_rows("val row_id", ["valueX"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContractViolation);

    let err = x
        .find_rows("", CompositeKey::new(Vec::new()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContractViolation);

    for strategy in [LookupStrategy::Index, LookupStrategy::Scan] {
        let err = x.find_rows_with("missing", ["a"], strategy).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ColumnNotFound);
    }
}

#[test]
fn equality_is_variant_sensitive() {
    init_test_tracing();
    let table = Table::new("t", "id").unwrap();
    table.add_row([("id", Value::from(1)), ("n", Value::from(7i64))]).unwrap();
    table.add_row([("id", Value::from(2)), ("n", Value::from("7"))]).unwrap();

    assert_eq!(table.find_rows("n", [7i64]).unwrap().len(), 1);
    assert_eq!(table.find_rows("n", ["7"]).unwrap().len(), 1);
    assert!(table.find_rows("n", [Value::U64(7)]).unwrap().is_empty());
}

#[test]
fn unsigned_filters_match_loaded_numbers() {
    init_test_tracing();
    let table = Table::new("t", "id").unwrap();
    table
        .add_row([("id", Value::from(1)), ("n", Value::from(serde_json::json!(7)))])
        .unwrap();

    assert_eq!(table.find_rows("n", [7u32]).unwrap().len(), 1);
    assert_eq!(table.find_rows("n", [7u64]).unwrap().len(), 1);
    assert!(table.contains(1u8));
}
