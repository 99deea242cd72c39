//! ASCII table formatting for console output
//!
//! This module provides shared table rendering built on the [`tabled`] crate:
//! - [`GroupSummary`] rows describing the groups fed into Levene's test
//! - [`format_titled_table`] for derived row types
//! - [`format_matrix`] for labelled square matrices such as correlation matrices
//! - [`format_dataset_preview`] for a pandas-style head/tail view of the table

use super::data_structures::{Dataset, Group};
use tabled::builder::Builder;
use tabled::{Table, Tabled};

/// Rows shown around the `...` separator in the dataset preview
const PREVIEW_ROWS: usize = 5;

/// Describes one group of a grouped column
#[derive(Debug, Clone, Tabled)]
pub struct GroupSummary {
    #[tabled(rename = "Group")]
    pub group: String,
    #[tabled(rename = "N")]
    pub count: usize,
    #[tabled(rename = "Mean")]
    pub mean: String,
    #[tabled(rename = "Variance")]
    pub variance: String,
    #[tabled(rename = "Included")]
    pub included: bool,
}

impl GroupSummary {
    pub fn new(group: &Group, mean: f64, variance: f64, included: bool) -> Self {
        Self {
            group: group.label(),
            count: group.values.len(),
            mean: format!("{:.4}", mean),
            variance: format!("{:.4}", variance),
            included,
        }
    }
}

/// Formats rows as an ASCII table, optionally underlined with a title
pub fn format_titled_table<T: Tabled>(rows: &[T], title: Option<&str>) -> String {
    if rows.is_empty() {
        return "No data available".to_string();
    }

    let table = Table::new(rows).to_string();

    match title {
        Some(title) => format!("{}\n{}\n{}", title, "=".repeat(title.len()), table),
        None => table,
    }
}

/// Formats a square matrix with the same labels on both axes
pub fn format_matrix(labels: &[&str], values: &[Vec<f64>]) -> String {
    let mut builder = Builder::default();

    let mut header = vec![String::new()];
    header.extend(labels.iter().map(|label| label.to_string()));
    builder.push_record(header);

    for (label, row) in labels.iter().zip(values) {
        let mut record = vec![label.to_string()];
        record.extend(row.iter().map(|value| format!("{:.6}", value)));
        builder.push_record(record);
    }

    builder.build().to_string()
}

/// Formats the first and last rows of the dataset, pandas style
pub fn format_dataset_preview(dataset: &Dataset) -> String {
    let rows = dataset.row_count();
    let columns = dataset.column_count();

    let mut builder = Builder::default();
    let mut header = vec![String::new()];
    header.extend(dataset.column_names().map(String::from));
    builder.push_record(header);

    let push_row = |builder: &mut Builder, row: usize| {
        let mut record = vec![row.to_string()];
        record.extend((0..columns).map(|column| dataset.cell(row, column)));
        builder.push_record(record);
    };

    if rows <= PREVIEW_ROWS * 2 {
        for row in 0..rows {
            push_row(&mut builder, row);
        }
    } else {
        for row in 0..PREVIEW_ROWS {
            push_row(&mut builder, row);
        }
        builder.push_record(vec!["...".to_string(); columns + 1]);
        for row in rows - PREVIEW_ROWS..rows {
            push_row(&mut builder, row);
        }
    }

    format!(
        "{}\n[{} rows x {} columns]",
        builder.build(),
        rows,
        columns
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_titled_table() {
        let group = Group {
            key: 1.0,
            values: vec![1.0, 2.0, 3.0],
        };
        let rows = vec![GroupSummary::new(&group, 2.0, 1.0, true)];

        let table = format_titled_table(&rows, Some("Groups"));
        assert!(table.starts_with("Groups\n======\n"));
        assert!(table.contains("Variance"));
        assert!(table.contains("2.0000"));
        assert!(table.contains("true"));

        let table_no_title = format_titled_table(&rows, None);
        assert!(!table_no_title.contains("Groups"));

        let empty: Vec<GroupSummary> = Vec::new();
        assert_eq!(format_titled_table(&empty, None), "No data available");
    }

    #[test]
    fn test_format_matrix() {
        let table = format_matrix(&["X", "Y"], &[vec![1.0, 0.5], vec![0.5, 1.0]]);
        assert!(table.contains("X"));
        assert!(table.contains("1.000000"));
        assert!(table.contains("0.500000"));
    }

    #[test]
    fn test_format_dataset_preview_elides_middle_rows() {
        let values: Vec<f64> = (0..20).map(f64::from).collect();
        let dataset = Dataset::from_numeric(&[("A", &values)]).unwrap();
        let preview = format_dataset_preview(&dataset);

        assert!(preview.contains("..."));
        assert!(preview.contains("19"));
        assert!(!preview.contains(" 10 "));
        assert!(preview.ends_with("[20 rows x 1 columns]"));
    }
}
