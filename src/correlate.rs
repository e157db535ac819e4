//! Pairwise correlation and top-category reporting.
//!
//! Pearson correlation is computed over numeric columns only, using
//! pairwise-complete rows: a row contributes to a pair exactly when
//! both values are present and finite. Category tables count the most
//! frequent non-missing values of categorical columns.

// Statistical computation requires usize->f64 casts
#![allow(clippy::cast_precision_loss)]

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    dataset::{collect_columns, ArrowDataset, ColumnValues},
    error::Result,
};

/// Symmetric matrix of Pearson coefficients among numeric columns.
///
/// Empty when the dataset has fewer than two numeric columns.
/// Coefficients that are undefined (zero variance, fewer than two
/// complete pairs) are `NaN`; the diagonal is 1.0 only for columns
/// with nonzero variance.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    columns: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Numeric column names, dataset column order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Matrix values, row-major, indexed like [`Self::columns`].
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Returns true if no correlations were computed.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Look up the coefficient for a pair of columns by name.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

/// Compute pairwise Pearson correlation among numeric columns.
///
/// Fewer than two numeric columns yield an empty matrix, not an error.
pub fn correlation_matrix(dataset: &ArrowDataset) -> Result<CorrelationMatrix> {
    let numeric: Vec<(String, Vec<Option<f64>>)> = collect_columns(dataset)
        .into_iter()
        .filter_map(|(name, values)| match values {
            ColumnValues::Numeric(v) => Some((name, v)),
            _ => None,
        })
        .collect();

    if numeric.len() < 2 {
        return Ok(CorrelationMatrix {
            columns: vec![],
            values: vec![],
        });
    }

    let n = numeric.len();
    let mut values = vec![vec![f64::NAN; n]; n];

    for i in 0..n {
        for j in i..n {
            let r = pearson(&numeric[i].1, &numeric[j].1);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: numeric.into_iter().map(|(name, _)| name).collect(),
        values,
    })
}

/// Pearson coefficient over pairwise-complete finite rows.
///
/// `NaN` when fewer than two complete pairs exist or either side has
/// zero variance.
fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b.iter())
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((*x, *y)),
            _ => None,
        })
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        f64::NAN
    } else {
        (cov / denom).clamp(-1.0, 1.0)
    }
}

/// One value of a category frequency table.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    /// The category value.
    pub value: String,
    /// Number of occurrences.
    pub count: usize,
}

/// Frequency table for one categorical column, most frequent first.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnCategories {
    /// Column name.
    pub column: String,
    /// At most `top_k` rows, count descending, ties by
    /// first-encountered order.
    pub rows: Vec<CategoryCount>,
}

/// Top-category tables for the first categorical columns of a dataset.
#[derive(Debug, Clone, Serialize)]
pub struct TopCategoriesReport {
    tables: Vec<ColumnCategories>,
}

impl TopCategoriesReport {
    /// All tables, dataset column order.
    pub fn tables(&self) -> &[ColumnCategories] {
        &self.tables
    }

    /// Look up the table for a column by name.
    pub fn get(&self, column: &str) -> Option<&ColumnCategories> {
        self.tables.iter().find(|t| t.column == column)
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if no categorical columns were reported.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Build frequency tables for up to `max_columns` categorical columns
/// (dataset column order, first N taken), each with the `top_k` most
/// frequent non-missing values.
///
/// `top_k` or `max_columns` of zero are degenerate but valid and yield
/// empty tables/reports.
pub fn top_categories(
    dataset: &ArrowDataset,
    max_columns: usize,
    top_k: usize,
) -> Result<TopCategoriesReport> {
    let tables = collect_columns(dataset)
        .into_iter()
        .filter_map(|(name, values)| match values {
            ColumnValues::Categorical(v) => Some((name, v)),
            _ => None,
        })
        .take(max_columns)
        .map(|(column, values)| ColumnCategories {
            column,
            rows: count_top_values(&values, top_k),
        })
        .collect();

    Ok(TopCategoriesReport { tables })
}

fn count_top_values(values: &[Option<String>], top_k: usize) -> Vec<CategoryCount> {
    // (count, first-encountered order) per value
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for value in values.iter().flatten() {
        let next_order = counts.len();
        let entry = counts.entry(value.as_str()).or_insert((0, next_order));
        entry.0 += 1;
    }

    let mut rows: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(value, (count, order))| (value, count, order))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    rows.truncate(top_k);

    rows.into_iter()
        .map(|(value, count, _)| CategoryCount {
            value: value.to_string(),
            count,
        })
        .collect()
}
