use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::tabular::Table;

/// One page of rows plus the total row count of the whole dataset.
#[derive(Debug, Serialize)]
pub struct Page {
    pub rows: Vec<IndexMap<String, Value>>,
    pub total: usize,
}

/// Slice rows `[(page-1)*page_size, page*page_size)` out of the table.
/// `page` is 1-indexed; out-of-range pages yield an empty slice. Missing
/// cells are normalized to the empty string, numeric cells to JSON numbers.
pub fn paginate(table: &Table, page: usize, page_size: usize) -> Page {
    let total = table.row_count();
    let start = page
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(total);
    let end = start.saturating_add(page_size).min(total);

    let rows = table.rows()[start..end]
        .iter()
        .map(|row| row_to_json(table, row))
        .collect();

    Page { rows, total }
}

fn row_to_json(table: &Table, row: &[Option<String>]) -> IndexMap<String, Value> {
    table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.clone(), cell_to_json(table, idx, &row[idx])))
        .collect()
}

fn cell_to_json(table: &Table, idx: usize, cell: &Option<String>) -> Value {
    let Some(raw) = cell else {
        return Value::String(String::new());
    };
    if table.is_numeric(idx) {
        if let Some(number) = raw
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
        {
            return Value::Number(number);
        }
    }
    Value::String(raw.clone())
}
