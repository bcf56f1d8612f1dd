use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::tabular::Table;

/// Statistics for one numeric column. Everything except `count` is null when
/// the column has no non-missing values; `std` additionally needs at least
/// two values (sample standard deviation, n-1 denominator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub count: u64,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub std: Option<f64>,
}

/// Per-column statistics for every numeric column, in column order.
/// Non-numeric columns are excluded entirely.
pub fn summarize(table: &Table) -> IndexMap<String, ColumnStats> {
    let mut summary = IndexMap::new();
    for (idx, name) in table.columns().iter().enumerate() {
        if !table.is_numeric(idx) {
            continue;
        }
        summary.insert(name.clone(), column_stats(&table.numeric_values(idx)));
    }
    summary
}

pub fn column_stats(values: &[f64]) -> ColumnStats {
    if values.is_empty() {
        return ColumnStats {
            count: 0,
            mean: None,
            median: None,
            min: None,
            max: None,
            std: None,
        };
    }

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    ColumnStats {
        count: count as u64,
        mean: Some(mean),
        median: Some(median(values)),
        min: Some(min),
        max: Some(max),
        std: sample_std(values, mean),
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn sample_std(values: &[f64], mean: f64) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(variance.sqrt())
}
