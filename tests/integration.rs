//! Integration tests for perfilar.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::uninlined_format_args,
    clippy::cast_lossless,
    clippy::float_cmp
)]

use std::{io::Write, sync::Arc};

use arrow::{
    array::{Int32Array, RecordBatch, StringArray},
    datatypes::{DataType, Field, Schema},
};
use perfilar::{
    compute_quality_flags, correlation_matrix, flatten_summary, missing_table,
    problematic_columns, summarize_dataset, top_categories, ArrowDataset, Dataset, QualityFlags,
};

/// Builds the 4-row sample dataset: age, height, city.
fn sample_dataset() -> ArrowDataset {
    let schema = Arc::new(Schema::new(vec![
        Field::new("age", DataType::Int32, true),
        Field::new("height", DataType::Int32, true),
        Field::new("city", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema,
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

fn flags_for(dataset: &ArrowDataset) -> QualityFlags {
    let summary = summarize_dataset(dataset).expect("summary");
    let missing = missing_table(dataset);
    compute_quality_flags(&summary, &missing, dataset).expect("flags")
}

#[test]
fn test_summarize_dataset_basic() {
    let dataset = sample_dataset();
    let summary = summarize_dataset(&dataset).expect("summary");

    assert_eq!(summary.n_rows, 4);
    assert_eq!(summary.n_cols, 3);
    assert!(summary.columns.iter().any(|c| c.name == "age"));
    assert!(summary.columns.iter().any(|c| c.name == "city"));

    let table = flatten_summary(&summary);
    assert!(table.columns.iter().any(|c| c == "name"));
    assert!(table.columns.iter().any(|c| c == "missing_share"));
}

#[test]
fn test_missing_table_and_quality_flags() {
    let dataset = sample_dataset();
    let missing = missing_table(&dataset);

    assert_eq!(missing.get("age").expect("age").missing_count, 1);
    assert_eq!(missing.get("city").expect("city").missing_count, 1);
    assert_eq!(missing.get("height").expect("height").missing_count, 0);

    let flags = flags_for(&dataset);
    assert!(flags.quality_score >= 0.0);
    assert!(flags.quality_score <= 1.0);
}

#[test]
fn test_constant_columns() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("constant_col", DataType::Int32, true),
        Field::new("normal_col", DataType::Int32, true),
    ]));

    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int32Array::from(vec![1, 1, 1, 1])),
            Arc::new(Int32Array::from(vec![10, 20, 30, 40])),
        ],
    )
    .expect("batch");
    let dataset = ArrowDataset::from_batch(batch).expect("dataset");

    let flags = flags_for(&dataset);
    assert!(flags.has_constant_columns);
}

#[test]
fn test_high_cardinality_categoricals() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int32, false),
        Field::new("category", DataType::Utf8, false),
        Field::new("normal", DataType::Int32, false),
    ]));

    let ids: Vec<i32> = (0..100).collect();
    let categories: Vec<String> = (0..100).map(|i| format!("cat_{}", i)).collect();
    let normals: Vec<i32> = vec![1; 100];

    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int32Array::from(ids)),
            Arc::new(StringArray::from(categories)),
            Arc::new(Int32Array::from(normals)),
        ],
    )
    .expect("batch");
    let dataset = ArrowDataset::from_batch(batch).expect("dataset");

    let flags = flags_for(&dataset);
    assert!(flags.has_high_cardinality_categoricals);
}

#[test]
fn test_suspicious_id_duplicates() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("user_id", DataType::Int32, true),
        Field::new("value", DataType::Int32, true),
    ]));

    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int32Array::from(vec![1, 2, 2, 3])),
            Arc::new(Int32Array::from(vec![10, 20, 30, 40])),
        ],
    )
    .expect("batch");
    let dataset = ArrowDataset::from_batch(batch).expect("dataset");

    let flags = flags_for(&dataset);
    assert!(flags.has_suspicious_id_duplicates);
}

#[test]
fn test_many_zero_values() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("sparse_col", DataType::Int32, true),
        Field::new("normal_col", DataType::Int32, true),
    ]));

    // 5 zeros of 8 values (62.5%, above the 30% cutoff)
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int32Array::from(vec![0, 0, 0, 0, 0, 1, 2, 3])),
            Arc::new(Int32Array::from(vec![1, 2, 3, 4, 5, 6, 7, 8])),
        ],
    )
    .expect("batch");
    let dataset = ArrowDataset::from_batch(batch).expect("dataset");

    let flags = flags_for(&dataset);
    assert!(flags.has_many_zero_values);
}

#[test]
fn test_problematic_columns_by_missing_share() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("col_30pct", DataType::Int32, true),
        Field::new("col_50pct", DataType::Int32, true),
        Field::new("col_complete", DataType::Int32, true),
    ]));

    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int32Array::from(vec![
                Some(1),
                Some(2),
                Some(3),
                None,
                None,
                None,
                Some(4),
                Some(5),
                Some(6),
                Some(7),
            ])),
            Arc::new(Int32Array::from(vec![
                Some(1),
                None,
                None,
                None,
                None,
                Some(6),
                Some(7),
                Some(8),
                Some(9),
                Some(10),
            ])),
            Arc::new(Int32Array::from((1..=10).map(Some).collect::<Vec<_>>())),
        ],
    )
    .expect("batch");
    let dataset = ArrowDataset::from_batch(batch).expect("dataset");

    let missing = missing_table(&dataset);

    let at_025 = problematic_columns(&missing, 0.25).expect("filter");
    assert_eq!(at_025.len(), 2);
    assert!(at_025.get("col_30pct").is_some());
    assert!(at_025.get("col_50pct").is_some());

    let at_040 = problematic_columns(&missing, 0.4).expect("filter");
    assert_eq!(at_040.len(), 1);
    assert!(at_040.get("col_50pct").is_some());

    let at_060 = problematic_columns(&missing, 0.6).expect("filter");
    assert_eq!(at_060.len(), 0);
}

#[test]
fn test_correlation_and_top_categories() {
    let dataset = sample_dataset();

    let matrix = correlation_matrix(&dataset).expect("matrix");
    assert!(!matrix.is_empty());
    assert!(matrix.columns().iter().any(|c| c == "age"));

    let report = top_categories(&dataset, 5, 2).expect("report");
    let city = report.get("city").expect("city table");
    assert!(city.rows.len() <= 2);
    assert_eq!(city.rows[0].value, "A");
    assert_eq!(city.rows[0].count, 2);
}

#[test]
fn test_csv_string_matches_arrow_batches() {
    let csv = "age,height\n10,140\n20,150\n30,160\n,170\n";
    let from_csv = ArrowDataset::from_csv_str(csv).expect("dataset");

    let schema = Arc::new(Schema::new(vec![
        Field::new("age", DataType::Int32, true),
        Field::new("height", DataType::Int32, true),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int32Array::from(vec![Some(10), Some(20), Some(30), None])),
            Arc::new(Int32Array::from(vec![
                Some(140),
                Some(150),
                Some(160),
                Some(170),
            ])),
        ],
    )
    .expect("batch");
    let from_arrow = ArrowDataset::from_batch(batch).expect("dataset");

    let csv_summary = summarize_dataset(&from_csv).expect("summary");
    let arrow_summary = summarize_dataset(&from_arrow).expect("summary");

    assert_eq!(csv_summary.n_rows, arrow_summary.n_rows);
    assert_eq!(csv_summary.n_cols, arrow_summary.n_cols);

    for (a, b) in csv_summary.columns.iter().zip(&arrow_summary.columns) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.count, b.count);
        assert_eq!(a.missing_count, b.missing_count);
        assert_eq!(a.unique_count, b.unique_count);
    }

    let csv_flags = flags_for(&from_csv);
    let arrow_flags = flags_for(&from_arrow);
    assert_eq!(csv_flags.quality_score, arrow_flags.quality_score);
}

#[test]
fn test_csv_file_loading() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sample.csv");

    let mut file = std::fs::File::create(&path).expect("create");
    file.write_all(b"user_id,score\n1,0.5\n2,0.7\n2,0.9\n")
        .expect("write");
    drop(file);

    let dataset = ArrowDataset::from_csv(&path).expect("dataset");
    assert_eq!(dataset.len(), 3);

    let flags = flags_for(&dataset);
    assert!(flags.has_suspicious_id_duplicates);
}

#[test]
fn test_end_to_end_report_pipeline() {
    let dataset = sample_dataset();

    let summary = summarize_dataset(&dataset).expect("summary");
    let missing = missing_table(&dataset);
    let flags = compute_quality_flags(&summary, &missing, &dataset).expect("flags");
    let matrix = correlation_matrix(&dataset).expect("matrix");
    let categories = top_categories(&dataset, 5, 10).expect("report");
    let table = flatten_summary(&summary);

    assert_eq!(summary.columns.len(), summary.n_cols);
    assert_eq!(missing.len(), summary.n_cols);
    assert_eq!(table.rows.len(), summary.n_cols);
    assert!(flags.quality_score <= 1.0);
    assert_eq!(matrix.columns().len(), 2);
    assert_eq!(categories.len(), 1);

    // everything above serializes directly
    let json = serde_json::json!({
        "summary": summary,
        "missing": missing,
        "flags": flags,
        "correlation": matrix,
        "top_categories": categories,
    });
    assert!(json.get("summary").is_some());
}

#[test]
fn test_empty_dataset_end_to_end() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("x", DataType::Int32, true),
        Field::new("label", DataType::Utf8, true),
    ]));
    let dataset = ArrowDataset::empty(schema);

    let summary = summarize_dataset(&dataset).expect("summary");
    assert_eq!(summary.n_rows, 0);
    assert_eq!(summary.n_cols, 2);

    let missing = missing_table(&dataset);
    assert!(missing
        .entries()
        .iter()
        .all(|e| e.missing_count == 0 && e.missing_share == 0.0));

    let flags = compute_quality_flags(&summary, &missing, &dataset).expect("flags");
    assert!(!flags.any_fired());
    assert_eq!(flags.quality_score, 1.0);

    let matrix = correlation_matrix(&dataset).expect("matrix");
    assert!(matrix.is_empty());

    let categories = top_categories(&dataset, 5, 3).expect("report");
    assert_eq!(categories.len(), 1);
}
