//! Missing-value accounting for datasets.
//!
//! Builds a per-column table of missing counts and shares, and filters
//! it down to the columns whose missingness exceeds a caller-supplied
//! threshold.

// Statistical computation requires usize->f64 casts
#![allow(clippy::cast_precision_loss)]

use arrow::array::Array;
use serde::Serialize;

use crate::{
    dataset::{ArrowDataset, Dataset},
    error::{Error, Result},
};

/// Missing-value statistics for a single column.
#[derive(Debug, Clone, Serialize)]
pub struct MissingEntry {
    /// Column name.
    pub column: String,
    /// Number of missing values.
    pub missing_count: usize,
    /// Missing count divided by the dataset row count (0-1); 0.0 for a
    /// zero-row dataset.
    pub missing_share: f64,
}

/// Per-column missing-value table, one entry per dataset column in
/// dataset column order.
#[derive(Debug, Clone, Serialize)]
pub struct MissingTable {
    entries: Vec<MissingEntry>,
}

impl MissingTable {
    /// Build a table from entries, order preserved.
    pub fn from_entries(entries: Vec<MissingEntry>) -> Self {
        Self { entries }
    }

    /// All entries in dataset column order.
    pub fn entries(&self) -> &[MissingEntry] {
        &self.entries
    }

    /// Look up an entry by column name.
    pub fn get(&self, column: &str) -> Option<&MissingEntry> {
        self.entries.iter().find(|e| e.column == column)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mean missing share across all entries; 0.0 for an empty table.
    pub fn mean_missing_share(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        self.entries.iter().map(|e| e.missing_share).sum::<f64>() / self.entries.len() as f64
    }
}

/// Count missing entries per column and compute shares against the row
/// count. Entry order matches dataset column order.
pub fn missing_table(dataset: &ArrowDataset) -> MissingTable {
    let schema = dataset.schema();
    let n_rows = dataset.len();

    let mut entries: Vec<MissingEntry> = schema
        .fields()
        .iter()
        .map(|field| MissingEntry {
            column: field.name().clone(),
            missing_count: 0,
            missing_share: 0.0,
        })
        .collect();

    for batch in dataset.iter() {
        for (idx, entry) in entries.iter_mut().enumerate() {
            entry.missing_count += batch.column(idx).null_count();
        }
    }

    if n_rows > 0 {
        for entry in &mut entries {
            entry.missing_share = entry.missing_count as f64 / n_rows as f64;
        }
    }

    MissingTable { entries }
}

/// Filter a missing table down to the entries whose share is strictly
/// greater than `threshold`, order preserved.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] when `threshold` is not a finite
/// value within [0, 1].
pub fn problematic_columns(table: &MissingTable, threshold: f64) -> Result<MissingTable> {
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(Error::invalid_config(format!(
            "missing-share threshold must be within [0, 1], got {}",
            threshold
        )));
    }

    let entries = table
        .entries
        .iter()
        .filter(|e| e.missing_share > threshold)
        .cloned()
        .collect();

    Ok(MissingTable { entries })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::{
        array::{Int32Array, RecordBatch, StringArray},
        datatypes::{DataType, Field, Schema},
    };

    use super::*;

    fn sample_dataset() -> ArrowDataset {
        let schema = Arc::new(Schema::new(vec![
            Field::new("age", DataType::Int32, true),
            Field::new("height", DataType::Int32, true),
            Field::new("city", DataType::Utf8, true),
        ]));

        let batch = RecordBatch::try_new(
            Arc::clone(&schema),
            vec![
                Arc::new(Int32Array::from(vec![Some(10), Some(20), Some(30), None])),
                Arc::new(Int32Array::from(vec![
                    Some(140),
                    Some(150),
                    Some(160),
                    Some(170),
                ])),
                Arc::new(StringArray::from(vec![
                    Some("A"),
                    Some("B"),
                    Some("A"),
                    None,
                ])),
            ],
        )
        .expect("batch");

        ArrowDataset::from_batch(batch).expect("dataset")
    }

    /// Builds a 10-row dataset with 30%, 50% and 0% missing columns.
    fn shares_dataset() -> ArrowDataset {
        let schema = Arc::new(Schema::new(vec![
            Field::new("col_30pct", DataType::Int32, true),
            Field::new("col_50pct", DataType::Int32, true),
            Field::new("col_complete", DataType::Int32, true),
        ]));

        let col_30: Vec<Option<i32>> = (0..10).map(|i| (i % 10 < 7).then_some(i)).collect();
        let col_50: Vec<Option<i32>> = (0..10).map(|i| (i % 2 == 0).then_some(i)).collect();
        let col_full: Vec<Option<i32>> = (0..10).map(Some).collect();

        let batch = RecordBatch::try_new(
            Arc::clone(&schema),
            vec![
                Arc::new(Int32Array::from(col_30)),
                Arc::new(Int32Array::from(col_50)),
                Arc::new(Int32Array::from(col_full)),
            ],
        )
        .expect("batch");

        ArrowDataset::from_batch(batch).expect("dataset")
    }

    #[test]
    fn test_missing_counts() {
        let table = missing_table(&sample_dataset());

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("age").expect("age").missing_count, 1);
        assert_eq!(table.get("height").expect("height").missing_count, 0);
        assert_eq!(table.get("city").expect("city").missing_count, 1);
    }

    #[test]
    fn test_missing_shares() {
        let table = missing_table(&sample_dataset());

        assert!((table.get("age").expect("age").missing_share - 0.25).abs() < f64::EPSILON);
        assert!((table.get("height").expect("height").missing_share - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_order_matches_dataset() {
        let table = missing_table(&sample_dataset());
        let names: Vec<&str> = table.entries().iter().map(|e| e.column.as_str()).collect();
        assert_eq!(names, vec!["age", "height", "city"]);
    }

    #[test]
    fn test_empty_dataset_share_is_zero() {
        let schema = Arc::new(Schema::new(vec![Field::new("x", DataType::Int32, true)]));
        let table = missing_table(&ArrowDataset::empty(schema));

        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].missing_count, 0);
        assert!((table.entries()[0].missing_share - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_problematic_thresholds() {
        let table = missing_table(&shares_dataset());

        let at_025 = problematic_columns(&table, 0.25).expect("filter");
        assert_eq!(at_025.len(), 2);
        assert!(at_025.get("col_30pct").is_some());
        assert!(at_025.get("col_50pct").is_some());

        let at_040 = problematic_columns(&table, 0.4).expect("filter");
        assert_eq!(at_040.len(), 1);
        assert!(at_040.get("col_50pct").is_some());

        let at_060 = problematic_columns(&table, 0.6).expect("filter");
        assert!(at_060.is_empty());
    }

    #[test]
    fn test_problematic_boundary_is_strict() {
        let table = missing_table(&shares_dataset());

        // share exactly equal to the threshold is excluded
        let at_030 = problematic_columns(&table, 0.3).expect("filter");
        assert_eq!(at_030.len(), 1);
        assert!(at_030.get("col_30pct").is_none());
        assert!(at_030.get("col_50pct").is_some());
    }

    #[test]
    fn test_problematic_preserves_order() {
        let table = missing_table(&shares_dataset());
        let filtered = problematic_columns(&table, 0.1).expect("filter");

        let names: Vec<&str> = filtered
            .entries()
            .iter()
            .map(|e| e.column.as_str())
            .collect();
        assert_eq!(names, vec!["col_30pct", "col_50pct"]);
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let table = missing_table(&sample_dataset());

        assert!(problematic_columns(&table, -0.1).is_err());
        assert!(problematic_columns(&table, 1.5).is_err());
        assert!(problematic_columns(&table, f64::NAN).is_err());
    }

    #[test]
    fn test_mean_missing_share() {
        let table = missing_table(&shares_dataset());
        // (0.3 + 0.5 + 0.0) / 3
        assert!((table.mean_missing_share() - 0.8 / 3.0).abs() < 1e-10);

        let empty = MissingTable::from_entries(vec![]);
        assert!((empty.mean_missing_share() - 0.0).abs() < f64::EPSILON);
    }
}
