//! In-memory representation of the survey dataset
//!
//! The table is stored column-major. Every column either holds numbers (missing
//! cells become `NaN`) or raw text, which is only rejected once something tries
//! to use it numerically.

use thiserror::Error;

/// Errors raised when accessing or modifying the table
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
    #[error("Column '{0}' does not exist in the dataset")]
    MissingColumn(String),

    #[error("Column '{column}' is not numeric (found value '{value}')")]
    NonNumericColumn { column: String, value: String },

    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Column '{0}' appears more than once")]
    DuplicateColumn(String),
}

type Result<T> = core::result::Result<T, DatasetError>;

/// Values stored in a single column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Parsed numbers; missing cells are `NaN`
    Numeric(Vec<f64>),
    /// Cells that could not all be parsed as numbers
    Text(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named column of the dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

/// Rows of one group produced by [`Dataset::group_by`]
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Value of the grouping column shared by every row in the group
    pub key: f64,
    /// Non-missing values of the value column, in row order
    pub values: Vec<f64>,
}

impl Group {
    /// Human readable group label; whole numbers print without a fraction.
    pub fn label(&self) -> String {
        format_value(self.key)
    }
}

/// Rectangular table of survey responses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    /// Builds a dataset from named columns, validating that names are unique
    /// and that every column has the same number of rows.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map_or(0, |column| column.data.len());
        let mut dataset = Self {
            columns: Vec::with_capacity(columns.len()),
            rows,
        };

        for column in columns {
            if dataset.position(&column.name).is_some() {
                return Err(DatasetError::DuplicateColumn(column.name));
            }
            if column.data.len() != rows {
                return Err(DatasetError::LengthMismatch {
                    column: column.name,
                    expected: rows,
                    actual: column.data.len(),
                });
            }
            dataset.columns.push(column);
        }

        Ok(dataset)
    }

    /// Convenience constructor for purely numeric tables.
    pub fn from_numeric<S: AsRef<[f64]>>(columns: &[(&str, S)]) -> Result<Self> {
        Self::from_columns(
            columns
                .iter()
                .map(|(name, values)| Column {
                    name: name.to_string(),
                    data: ColumnData::Numeric(values.as_ref().to_vec()),
                })
                .collect(),
        )
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.position(name)
            .map(|index| &self.columns[index])
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
    }

    /// Returns every value of a numeric column, including missing (`NaN`) cells.
    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        match &self.column(name)?.data {
            ColumnData::Numeric(values) => Ok(values),
            ColumnData::Text(values) => {
                let value = values
                    .iter()
                    .map(|value| value.trim())
                    .find(|value| !value.is_empty() && value.parse::<f64>().is_err())
                    .unwrap_or_default();

                Err(DatasetError::NonNumericColumn {
                    column: name.to_string(),
                    value: value.to_string(),
                })
            }
        }
    }

    /// Non-missing values of a numeric column, in row order.
    pub fn values(&self, name: &str) -> Result<Vec<f64>> {
        Ok(self
            .numeric(name)?
            .iter()
            .copied()
            .filter(|value| !value.is_nan())
            .collect())
    }

    /// Row-aligned `(x, y)` pairs, skipping rows where either value is missing.
    pub fn pairs(&self, x: &str, y: &str) -> Result<Vec<(f64, f64)>> {
        let xs = self.numeric(x)?;
        let ys = self.numeric(y)?;

        Ok(xs
            .iter()
            .zip(ys)
            .filter(|(x, y)| !x.is_nan() && !y.is_nan())
            .map(|(&x, &y)| (x, y))
            .collect())
    }

    /// Inserts a numeric column, replacing an existing column of the same name.
    pub fn set_numeric(&mut self, name: &str, values: Vec<f64>) -> Result<()> {
        if !self.columns.is_empty() && values.len() != self.rows {
            return Err(DatasetError::LengthMismatch {
                column: name.to_string(),
                expected: self.rows,
                actual: values.len(),
            });
        }

        if self.columns.is_empty() {
            self.rows = values.len();
        }

        let data = ColumnData::Numeric(values);
        match self.position(name) {
            Some(index) => self.columns[index].data = data,
            None => self.columns.push(Column {
                name: name.to_string(),
                data,
            }),
        }

        Ok(())
    }

    /// Groups the values of `value_column` by the distinct values of `key_column`.
    ///
    /// Groups are ordered by ascending key. Rows where either column is missing
    /// are skipped.
    pub fn group_by(&self, key_column: &str, value_column: &str) -> Result<Vec<Group>> {
        let mut pairs = self.pairs(key_column, value_column)?;
        // Stable sort keeps row order inside each group.
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut groups: Vec<Group> = Vec::new();
        for (key, value) in pairs {
            if let Some(group) = groups.last_mut().filter(|group| group.key == key) {
                group.values.push(value);
                continue;
            }

            groups.push(Group {
                key,
                values: vec![value],
            });
        }

        Ok(groups)
    }

    /// Cell rendered for display, as used by the dataset preview.
    pub fn cell(&self, row: usize, column: usize) -> String {
        match &self.columns[column].data {
            ColumnData::Numeric(values) => format_value(values[row]),
            ColumnData::Text(values) => values[row].clone(),
        }
    }
}

/// Formats a cell value; `NaN` is shown as `NaN` like pandas does.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_numeric(&[
            ("GROUP", [2.0, 1.0, 2.0, 1.0, f64::NAN]),
            ("VALUE", [10.0, 1.0, 20.0, f64::NAN, 5.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_missing_column() {
        let dataset = sample();
        assert_eq!(
            dataset.numeric("NOPE"),
            Err(DatasetError::MissingColumn("NOPE".to_string()))
        );
    }

    #[test]
    fn test_non_numeric_column_reports_offending_value() {
        let dataset = Dataset::from_columns(vec![Column {
            name: "NAME".to_string(),
            data: ColumnData::Text(vec!["1".into(), "".into(), "abc".into()]),
        }])
        .unwrap();

        assert_eq!(
            dataset.numeric("NAME"),
            Err(DatasetError::NonNumericColumn {
                column: "NAME".to_string(),
                value: "abc".to_string()
            })
        );
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let result = Dataset::from_numeric(&[("A", vec![1.0, 2.0]), ("B", vec![1.0])]);
        assert!(matches!(result, Err(DatasetError::LengthMismatch { .. })));

        let mut dataset = sample();
        let result = dataset.set_numeric("C", vec![1.0]);
        assert!(matches!(result, Err(DatasetError::LengthMismatch { .. })));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = Dataset::from_numeric(&[("A", [1.0]), ("A", [2.0])]);
        assert_eq!(result, Err(DatasetError::DuplicateColumn("A".to_string())));
    }

    #[test]
    fn test_set_numeric_replaces_existing_column() {
        let mut dataset = sample();
        dataset
            .set_numeric("VALUE", vec![0.0, 0.0, 0.0, 0.0, 0.0])
            .unwrap();

        assert_eq!(dataset.column_count(), 2);
        assert_eq!(dataset.numeric("VALUE").unwrap(), &[0.0; 5]);
    }

    #[test]
    fn test_pairs_skip_missing_rows() {
        let dataset = sample();
        let pairs = dataset.pairs("GROUP", "VALUE").unwrap();
        assert_eq!(pairs, vec![(2.0, 10.0), (1.0, 1.0), (2.0, 20.0)]);
    }

    #[test]
    fn test_group_by_sorts_keys_and_keeps_row_order() {
        let dataset = sample();
        let groups = dataset.group_by("GROUP", "VALUE").unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, 1.0);
        assert_eq!(groups[0].values, vec![1.0]);
        assert_eq!(groups[1].key, 2.0);
        assert_eq!(groups[1].values, vec![10.0, 20.0]);
        assert_eq!(groups[1].label(), "2");
    }
}
