use anyhow::{bail, Result};
use std::io::Read;

/// Cell tokens treated as missing, mirroring the usual CSV conventions.
const NA_TOKENS: &[&str] = &["", "NaN", "nan", "NA", "null"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Numeric,
    Text,
}

/// An in-memory CSV table with a header row. Cells are kept as raw strings;
/// a column is numeric when every non-missing cell parses as a float, which
/// makes an all-missing column numeric as well.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<String>,
    column_types: Vec<ColumnType>,
    rows: Vec<Vec<Option<String>>>,
}

pub fn parse_csv<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        bail!("no columns found");
    }
    let columns: Vec<String> = headers.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(normalize_cell).collect());
    }

    let column_types = infer_column_types(columns.len(), &rows);
    Ok(Table {
        columns,
        column_types,
        rows,
    })
}

fn normalize_cell(cell: &str) -> Option<String> {
    if NA_TOKENS.contains(&cell.trim()) {
        None
    } else {
        Some(cell.to_string())
    }
}

fn infer_column_types(column_count: usize, rows: &[Vec<Option<String>>]) -> Vec<ColumnType> {
    (0..column_count)
        .map(|idx| {
            let all_numeric = rows.iter().all(|row| match &row[idx] {
                Some(raw) => raw.trim().parse::<f64>().is_ok(),
                None => true,
            });
            if all_numeric {
                ColumnType::Numeric
            } else {
                ColumnType::Text
            }
        })
        .collect()
}

impl Table {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_type(&self, idx: usize) -> ColumnType {
        self.column_types[idx]
    }

    pub fn is_numeric(&self, idx: usize) -> bool {
        self.column_types[idx] == ColumnType::Numeric
    }

    /// Non-missing values of a numeric column, in row order.
    pub fn numeric_values(&self, idx: usize) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|row| {
                row[idx]
                    .as_ref()
                    .and_then(|raw| raw.trim().parse::<f64>().ok())
            })
            .collect()
    }
}
