use std::fs;
use std::path::PathBuf;

use dblike::error::ErrorKind;
use dblike::load::{load_json_reader, load_json_str};
use dblike::store::Schema;
use dblike::types::Value;
use dblike_config::{load_schema_config, load_schema_config_from_file};
use dblike_telemetry::init_test_tracing;

fn scratch_dir(name: &str) -> PathBuf {
    let directory =
        std::env::temp_dir().join(format!("dblike-integration-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&directory);
    fs::create_dir_all(&directory).unwrap();
    directory
}

#[test]
fn schema_file_and_dump_load_together() {
    init_test_tracing();
    let directory = scratch_dir("inventory");
    fs::write(
        directory.join("schema.yaml"),
        "tables:\n  - name: owners\n    primary_key: owner_id\n  - name: items\n    primary_key: item_id\n  - name: versions\n    primary_key: [item_id, version]\n",
    )
    .unwrap();
    let dump_path = directory.join("dump.json");
    fs::write(
        &dump_path,
        r#"{
            "owners": [{"owner_id": 1, "owner_name": "Tom"}],
            "items": [
                {"item_id": 1, "name": "chair", "owner_id": 1},
                {"item_id": 2, "name": "house", "owner_id": 1}
            ],
            "versions": [
                {"item_id": 1, "version": 1, "color": "red"},
                {"item_id": 1, "version": 2, "color": "blue"}
            ]
        }"#,
    )
    .unwrap();

    let config = load_schema_config(&directory).unwrap();
    let schema = Schema::from_config(&config).unwrap();
    assert_eq!(schema.table_names(), vec!["owners", "items", "versions"]);

    let summary = load_json_reader(&schema, fs::File::open(&dump_path).unwrap()).unwrap();
    assert_eq!(summary.total_rows(), 5);
    assert_eq!(summary.rows_loaded("versions"), 2);

    let versions = schema.table("versions").unwrap();
    assert_eq!(
        versions.get((1, 2)).unwrap().column("color").unwrap().value(),
        &Value::from("blue")
    );

    let chair = schema.table("items").unwrap().get(1).unwrap();
    assert_eq!(chair.find_refs("versions", "item_id").unwrap().len(), 2);

    fs::remove_dir_all(&directory).unwrap();
}

#[test]
fn dump_rows_for_undeclared_tables_fail() {
    init_test_tracing();
    let directory = scratch_dir("undeclared");
    let path = directory.join("schema.json");
    fs::write(
        &path,
        r#"{"tables": [{"name": "owners", "primary_key": "owner_id"}]}"#,
    )
    .unwrap();

    let schema = Schema::from_config(&load_schema_config_from_file(&path).unwrap()).unwrap();
    let err = load_json_str(&schema, r#"{"items": [{"item_id": 1}]}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TableNotFound);

    fs::remove_dir_all(&directory).unwrap();
}
