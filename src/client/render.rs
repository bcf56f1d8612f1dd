//! Pure rendering: turn a summary mapping and a rows sequence into draw
//! instructions (tables and a grouped bar chart), independent of any UI
//! toolkit. The text drawing below is what the terminal desktop mode shows.

use indexmap::IndexMap;
use serde_json::Value;
use std::fmt::Write as _;

use crate::summary::ColumnStats;

const STAT_LABELS: [&str; 4] = ["mean", "median", "min", "max"];
const BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One chart group per numeric column, values aligned with `series_labels`.
/// `None` marks a skipped (null or non-finite) value.
#[derive(Debug, Clone, PartialEq)]
pub struct BarGroup {
    pub column: String,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub series_labels: Vec<String>,
    pub groups: Vec<BarGroup>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedView {
    pub raw: TableView,
    pub summary: TableView,
    pub chart: BarChart,
}

pub fn render(
    summary: &IndexMap<String, ColumnStats>,
    rows: &[IndexMap<String, Value>],
) -> RenderedView {
    RenderedView {
        raw: raw_table(rows),
        summary: summary_table(summary),
        chart: chart(summary),
    }
}

fn raw_table(rows: &[IndexMap<String, Value>]) -> TableView {
    // One column per observed field, in first-seen order
    let mut headers: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let body = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|header| row.get(header).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect();

    TableView {
        title: "Given Data".to_string(),
        headers,
        rows: body,
    }
}

fn summary_table(summary: &IndexMap<String, ColumnStats>) -> TableView {
    let headers = vec![
        "Parameter".to_string(),
        "count".to_string(),
        "mean".to_string(),
        "median".to_string(),
        "min".to_string(),
        "max".to_string(),
        "std".to_string(),
    ];

    let rows = summary
        .iter()
        .map(|(column, stats)| {
            vec![
                column.clone(),
                stats.count.to_string(),
                stat_text(stats.mean),
                stat_text(stats.median),
                stat_text(stats.min),
                stat_text(stats.max),
                stat_text(stats.std),
            ]
        })
        .collect();

    TableView {
        title: "Output (Summary Statistics)".to_string(),
        headers,
        rows,
    }
}

fn chart(summary: &IndexMap<String, ColumnStats>) -> BarChart {
    let groups = summary
        .iter()
        .map(|(column, stats)| BarGroup {
            column: column.clone(),
            values: vec![
                finite(stats.mean),
                finite(stats.median),
                finite(stats.min),
                finite(stats.max),
            ],
        })
        .collect();

    BarChart {
        title: "Output Chart".to_string(),
        series_labels: STAT_LABELS.iter().map(|label| label.to_string()).collect(),
        groups,
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn stat_text(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}", v),
        None => String::new(),
    }
}

impl TableView {
    pub fn to_text(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.len()).collect();
        for row in &self.rows {
            for (idx, cell) in row.iter().enumerate() {
                widths[idx] = widths[idx].max(cell.len());
            }
        }

        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(out, "{}", format_row(&self.headers, &widths));
        let rule: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * 2;
        let _ = writeln!(out, "{}", "-".repeat(rule));
        for row in &self.rows {
            let _ = writeln!(out, "{}", format_row(row, &widths));
        }
        out
    }
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

impl BarChart {
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);

        let scale = self
            .groups
            .iter()
            .flat_map(|group| group.values.iter().flatten())
            .fold(0.0f64, |acc, v| acc.max(v.abs()));
        if scale == 0.0 || self.groups.is_empty() {
            let _ = writeln!(out, "No numeric columns to plot");
            return out;
        }

        let label_width = self
            .series_labels
            .iter()
            .map(|label| label.len())
            .max()
            .unwrap_or(0);

        for group in &self.groups {
            let _ = writeln!(out, "{}", group.column);
            for (label, value) in self.series_labels.iter().zip(&group.values) {
                let Some(value) = value else { continue };
                let len = ((value.abs() / scale) * BAR_WIDTH as f64).round() as usize;
                let _ = writeln!(
                    out,
                    "  {:<label_width$}  |{} {:.2}",
                    label,
                    "#".repeat(len),
                    value,
                    label_width = label_width
                );
            }
        }
        out
    }
}

impl RenderedView {
    pub fn to_text(&self) -> String {
        format!(
            "{}\n{}\n{}",
            self.raw.to_text(),
            self.summary.to_text(),
            self.chart.to_text()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::column_stats;
    use serde_json::json;

    fn sample() -> (IndexMap<String, ColumnStats>, Vec<IndexMap<String, Value>>) {
        let mut summary = IndexMap::new();
        summary.insert("flow".to_string(), column_stats(&[1.0, 2.0, 3.0, 4.0]));
        summary.insert("temp".to_string(), column_stats(&[10.0]));

        let mut row = IndexMap::new();
        row.insert("flow".to_string(), json!(1.0));
        row.insert("unit".to_string(), json!("kg"));
        (summary, vec![row])
    }

    #[test]
    fn raw_table_unions_observed_fields() {
        let mut first = IndexMap::new();
        first.insert("a".to_string(), json!(1.0));
        let mut second = IndexMap::new();
        second.insert("a".to_string(), json!(""));
        second.insert("b".to_string(), json!("x"));

        let view = raw_table(&[first, second]);
        assert_eq!(view.headers, vec!["a", "b"]);
        assert_eq!(view.rows[0], vec!["1.0", ""]);
        assert_eq!(view.rows[1], vec!["", "x"]);
    }

    #[test]
    fn summary_table_has_one_row_per_column() {
        let (summary, _) = sample();
        let view = summary_table(&summary);
        assert_eq!(view.headers[0], "Parameter");
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0][0], "flow");
        assert_eq!(view.rows[0][2], "2.5");
        // single-value column has a null std, rendered empty
        assert_eq!(view.rows[1][6], "");
    }

    #[test]
    fn chart_skips_null_values() {
        let mut summary = IndexMap::new();
        summary.insert("empty".to_string(), column_stats(&[]));
        summary.insert("flow".to_string(), column_stats(&[1.0, 2.0]));

        let chart = chart(&summary);
        assert_eq!(chart.series_labels, vec!["mean", "median", "min", "max"]);
        assert_eq!(chart.groups[0].values, vec![None, None, None, None]);
        assert_eq!(chart.groups[1].values[0], Some(1.5));
    }

    #[test]
    fn text_rendering_contains_everything() {
        let (summary, rows) = sample();
        let text = render(&summary, &rows).to_text();
        assert!(text.contains("Given Data"));
        assert!(text.contains("Output (Summary Statistics)"));
        assert!(text.contains("Output Chart"));
        assert!(text.contains("flow"));
        assert!(text.contains("2.50"));
    }

    #[test]
    fn empty_summary_has_no_bars() {
        let chart = chart(&IndexMap::new());
        assert!(chart.to_text().contains("No numeric columns to plot"));
    }
}
