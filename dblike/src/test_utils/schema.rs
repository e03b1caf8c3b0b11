use crate::store::{Schema, TableDef};
use crate::types::Value;

/// Creates a schema with `items` (keyed by `item_id`) and `owners` (keyed by `owner_id`).
///
/// Owner 1 is Tom. Items 1 and 2 (chair, house) belong to Tom; item 3 (mixer) points at owner 2,
/// which does not exist.
pub fn owners_items_schema() -> Schema {
    let schema = Schema::new(vec![
        TableDef::new("items", "item_id"),
        TableDef::new("owners", "owner_id"),
    ])
    .expect("failed to create the owners/items schema");

    let owners = schema.table("owners").expect("owners table is declared");
    owners
        .add_row([("owner_id", Value::from(1)), ("owner_name", Value::from("Tom"))])
        .expect("failed to add owner");

    let items = schema.table("items").expect("items table is declared");
    for (item_id, name, owner_id) in [(1, "chair", 1), (2, "house", 1), (3, "mixer", 2)] {
        items
            .add_row([
                ("item_id", Value::from(item_id)),
                ("name", Value::from(name)),
                ("owner_id", Value::from(owner_id)),
            ])
            .expect("failed to add item");
    }

    schema
}
