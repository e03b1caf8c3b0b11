use crate::store::{RowRef, RowSet, Table};
use crate::types::Value;

/// Creates table `x` keyed by `row_id` with rows 1..=4, where rows 3 and 4 share `val`.
pub fn x_table() -> Table {
    let x = Table::new("x", "row_id").expect("failed to create table x");
    for (row_id, val) in [(1, "value1"), (2, "value2"), (3, "valueX"), (4, "valueX")] {
        x.add_row([("row_id", Value::from(row_id)), ("val", Value::from(val))])
            .expect("failed to add row to table x");
    }

    x
}

/// Returns the rendered values of `column` across `rows`, sorted.
///
/// Strings render without quotes so assertions read naturally.
pub fn column_strings<'a, I>(rows: I, column: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a RowRef>,
{
    let mut values: Vec<String> = rows
        .into_iter()
        .map(|row| {
            let value = row
                .column(column)
                .unwrap_or_else(|err| panic!("row {row:?} has no column '{column}': {err}"))
                .value();
            match value {
                Value::String(value) => value.clone(),
                other => other.to_string(),
            }
        })
        .collect();
    values.sort();

    values
}

/// Asserts that `actual` holds exactly the rows in `expected`, compared by identity.
pub fn assert_row_set_eq(actual: &RowSet, expected: &[RowRef]) {
    let expected: RowSet = expected.iter().cloned().collect();
    assert_eq!(
        actual.len(),
        expected.len(),
        "row set size mismatch: got {actual:?}, expected {expected:?}"
    );
    assert_eq!(actual, &expected, "row set mismatch");
}
