use dblike::error::ErrorKind;
use dblike::test_utils::schema::owners_items_schema;
use dblike::test_utils::table::{assert_row_set_eq, column_strings};
use dblike::types::Value;
use dblike_telemetry::init_test_tracing;

#[test]
fn item_owner_is_resolved_through_its_reference() {
    init_test_tracing();
    let schema = owners_items_schema();
    let items = schema.table("items").unwrap();

    let owner = items
        .get(1)
        .unwrap()
        .column("owner_id")
        .unwrap()
        .deref("owners")
        .unwrap();

    assert_eq!(owner.column("owner_name").unwrap().value(), &Value::from("Tom"));
    assert_eq!(owner.table_name(), "owners");
}

#[test]
fn owner_finds_every_item_pointing_at_it() {
    init_test_tracing();
    let schema = owners_items_schema();
    let items = schema.table("items").unwrap();
    let owners = schema.table("owners").unwrap();

    let owned = owners.get(1).unwrap().find_refs("items", "owner_id").unwrap();

    assert_row_set_eq(&owned, &[items.get(1).unwrap(), items.get(2).unwrap()]);
    assert_eq!(column_strings(&owned, "name"), vec!["chair", "house"]);
}

#[test]
fn dangling_reference_is_reported() {
    init_test_tracing();
    let schema = owners_items_schema();
    let mixer = schema.table("items").unwrap().get(3).unwrap();

    let err = mixer.deref_column("owner_id", "owners").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BrokenReference);
    assert_eq!(
        err.detail(),
        Some("source: items (item_id) (3,), column: owner_id = 2, target: owners (owner_id) (2,)")
    );

    let err = mixer
        .column("owner_id")
        .unwrap()
        .deref("owners")
        .unwrap_err();
    assert!(err.detail().unwrap().contains("items (item_id) (3,)"));
}

#[test]
fn falsy_reference_never_resolves() {
    init_test_tracing();
    let schema = owners_items_schema();
    let items = schema.table("items").unwrap();
    let owners = schema.table("owners").unwrap();
    owners.add_row([("owner_id", 0)]).unwrap();

    for (item_id, owner_id) in [(10, Value::from(0)), (11, Value::from("")), (12, Value::Null)] {
        let item = items
            .add_row([("item_id", Value::from(item_id)), ("owner_id", owner_id)])
            .unwrap();
        let err = item.deref_column("owner_id", "owners").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FalsyReference);
    }
}

#[test]
fn unknown_tables_are_reported() {
    init_test_tracing();
    let schema = owners_items_schema();
    let item = schema.table("items").unwrap().get(1).unwrap();

    assert_eq!(
        item.deref_column("owner_id", "people").unwrap_err().kind(),
        ErrorKind::TableNotFound
    );
    assert_eq!(
        item.find_refs("people", "item_id").unwrap_err().kind(),
        ErrorKind::TableNotFound
    );
}

#[test]
fn rows_outlive_their_schema_but_cannot_resolve() {
    init_test_tracing();
    let schema = owners_items_schema();
    let item = schema.table("items").unwrap().get(1).unwrap();
    drop(schema);

    assert_eq!(item.column("name").unwrap().value(), &Value::from("chair"));
    assert_eq!(
        item.deref_column("owner_id", "owners").unwrap_err().kind(),
        ErrorKind::SchemaDropped
    );
}
