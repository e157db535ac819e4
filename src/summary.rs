//! Per-column and dataset-level descriptive summaries.
//!
//! The summarizer classifies each column once (numeric, categorical,
//! boolean), counts missing and distinct values, and computes the
//! type-conditional statistics the quality rules and reports build on.
//!
//! # Example
//!
//! ```ignore
//! use perfilar::summary::{flatten_summary, summarize_dataset};
//!
//! let summary = summarize_dataset(&dataset)?;
//! println!("{} rows x {} columns", summary.n_rows, summary.n_cols);
//!
//! let table = flatten_summary(&summary);
//! for row in &table.rows {
//!     println!("{}", row.join("  "));
//! }
//! ```

// Statistical computation requires usize->f64 casts
#![allow(clippy::cast_precision_loss)]

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    dataset::{collect_columns, ArrowDataset, ColumnDtype, ColumnValues, Dataset},
    error::Result,
};

/// Descriptive statistics for a numeric column.
///
/// Present only when the column has at least one non-missing value.
#[derive(Debug, Clone, Serialize)]
pub struct NumericSummary {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation (divide by n, not n-1).
    pub std_dev: f64,
    /// Number of exact-zero values.
    pub zero_count: usize,
    /// Share of exact-zero values among non-missing values (0-1).
    pub zero_share: f64,
}

/// Descriptive statistics for a categorical column.
///
/// Present only when the column has at least one non-missing value.
#[derive(Debug, Clone, Serialize)]
pub struct CategoricalSummary {
    /// Most frequent value; ties broken by first-encountered order.
    pub mode: String,
    /// Occurrences of the mode.
    pub mode_count: usize,
    /// Number of distinct non-missing values.
    pub cardinality: usize,
}

/// Summary of a single column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    /// Column name, unique within the dataset.
    pub name: String,
    /// Semantic type tag.
    pub dtype: ColumnDtype,
    /// Number of non-missing values.
    pub count: usize,
    /// Number of missing values. `count + missing_count` equals the
    /// dataset row count.
    pub missing_count: usize,
    /// Number of distinct non-missing values.
    pub unique_count: usize,
    /// Numeric statistics, for numeric columns with data.
    pub numeric: Option<NumericSummary>,
    /// Categorical statistics, for categorical columns with data.
    pub categorical: Option<CategoricalSummary>,
}

impl ColumnSummary {
    /// Share of missing values among all rows (0-1); 0.0 for a
    /// zero-row column.
    pub fn missing_share(&self) -> f64 {
        let total = self.count + self.missing_count;
        if total == 0 {
            0.0
        } else {
            self.missing_count as f64 / total as f64
        }
    }

    /// Check if the column is constant: a single distinct value among
    /// non-missing rows. All-missing columns are not constant.
    pub fn is_constant(&self) -> bool {
        self.unique_count <= 1 && self.count > 0
    }
}

/// Summary of a whole dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    /// Number of rows.
    pub n_rows: usize,
    /// Number of columns.
    pub n_cols: usize,
    /// Per-column summaries, dataset column order.
    pub columns: Vec<ColumnSummary>,
}

impl DatasetSummary {
    /// Look up a column summary by name.
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Summarize every column of a dataset, schema order preserved.
///
/// An empty dataset (zero rows and/or zero columns) yields an
/// empty/zero summary, not an error.
pub fn summarize_dataset(dataset: &ArrowDataset) -> Result<DatasetSummary> {
    let n_rows = dataset.len();
    let n_cols = dataset.schema().fields().len();

    let columns = collect_columns(dataset)
        .iter()
        .map(|(name, values)| summarize_column(name, values))
        .collect();

    Ok(DatasetSummary {
        n_rows,
        n_cols,
        columns,
    })
}

/// Summarize a single extracted column.
///
/// Never fails: degenerate columns (all missing, zero rows) report
/// `None` statistics instead of raising.
pub fn summarize_column(name: &str, values: &ColumnValues) -> ColumnSummary {
    let count = values.count();

    let numeric = match values {
        ColumnValues::Numeric(v) if count > 0 => Some(numeric_summary(v)),
        _ => None,
    };

    let categorical = match values {
        ColumnValues::Categorical(v) if count > 0 => Some(categorical_summary(v)),
        _ => None,
    };

    ColumnSummary {
        name: name.to_string(),
        dtype: values.dtype(),
        count,
        missing_count: values.missing_count(),
        unique_count: values.unique_count(),
        numeric,
        categorical,
    }
}

fn numeric_summary(values: &[Option<f64>]) -> NumericSummary {
    let non_missing: Vec<f64> = values.iter().filter_map(|v| *v).collect();
    let n = non_missing.len() as f64;

    let min = non_missing.iter().copied().fold(f64::INFINITY, f64::min);
    let max = non_missing
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let mean = non_missing.iter().sum::<f64>() / n;

    let variance = non_missing.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    let zero_count = non_missing.iter().filter(|&&v| v == 0.0).count();
    let zero_share = zero_count as f64 / n;

    NumericSummary {
        min,
        max,
        mean,
        std_dev,
        zero_count,
        zero_share,
    }
}

fn categorical_summary(values: &[Option<String>]) -> CategoricalSummary {
    // (count, first-encountered order) per value
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for value in values.iter().flatten() {
        let next_order = counts.len();
        let entry = counts.entry(value.as_str()).or_insert((0, next_order));
        entry.0 += 1;
    }

    let cardinality = counts.len();
    let (mode, mode_count) = counts
        .iter()
        .max_by_key(|(_, &(count, order))| (count, std::cmp::Reverse(order)))
        .map(|(value, &(count, _))| ((*value).to_string(), count))
        .unwrap_or_default();

    CategoricalSummary {
        mode,
        mode_count,
        cardinality,
    }
}

/// Flat tabular projection of a [`DatasetSummary`] for display.
///
/// One row per column; cells are pre-rendered strings, with empty
/// cells for statistics that do not apply to the column's type.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryTable {
    /// Header names, `name` and `missing_share` included.
    pub columns: Vec<String>,
    /// One row of cells per dataset column, summary order preserved.
    pub rows: Vec<Vec<String>>,
}

impl SummaryTable {
    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Flatten a dataset summary into a table, one row per column.
///
/// Pure projection: no statistic is computed here beyond deriving
/// `missing_share` from the counts already in the summary, and nothing
/// is filtered out.
pub fn flatten_summary(summary: &DatasetSummary) -> SummaryTable {
    let columns: Vec<String> = [
        "name",
        "dtype",
        "count",
        "missing_count",
        "missing_share",
        "unique_count",
        "min",
        "max",
        "mean",
        "std",
        "zero_share",
        "mode",
        "cardinality",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect();

    let rows = summary
        .columns
        .iter()
        .map(|c| {
            let mut row = vec![
                c.name.clone(),
                c.dtype.name().to_string(),
                c.count.to_string(),
                c.missing_count.to_string(),
                fmt_float(c.missing_share()),
                c.unique_count.to_string(),
            ];

            match &c.numeric {
                Some(n) => {
                    row.push(fmt_float(n.min));
                    row.push(fmt_float(n.max));
                    row.push(fmt_float(n.mean));
                    row.push(fmt_float(n.std_dev));
                    row.push(fmt_float(n.zero_share));
                }
                None => row.extend(std::iter::repeat(String::new()).take(5)),
            }

            match &c.categorical {
                Some(cat) => {
                    row.push(cat.mode.clone());
                    row.push(cat.cardinality.to_string());
                }
                None => row.extend(std::iter::repeat(String::new()).take(2)),
            }

            row
        })
        .collect();

    SummaryTable { columns, rows }
}

fn fmt_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{:.4}", value)
    }
}
