//! perfilar - Tabular Dataset Profiling and Quality Assessment in Pure Rust
//!
//! Computes descriptive summaries over a tabular dataset: per-column
//! statistics, missing-value accounting, heuristic quality flags,
//! numeric correlation, and top-category breakdowns. Built for ad-hoc
//! exploratory inspection of a dataset before deeper analysis.
//!
//! # Design Principles
//!
//! 1. **Pure functions** - every report is recomputed from the
//!    immutable input dataset; nothing is cached or mutated
//! 2. **Pure Rust** - no Python, no FFI
//! 3. **Ecosystem aligned** - Arrow `RecordBatch` throughout
//!
//! # Quick Start
//!
//! ```no_run
//! use perfilar::{summarize_dataset, ArrowDataset};
//!
//! // Load a CSV file
//! let dataset = ArrowDataset::from_csv("data/listings.csv").unwrap();
//!
//! // Summarize every column
//! let summary = summarize_dataset(&dataset).unwrap();
//! for column in &summary.columns {
//!     println!("{}: {} missing", column.name, column.missing_count);
//! }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::cast_lossless,
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::float_cmp,
        clippy::unreadable_literal
    )
)]
// Allow some pedantic lints for cleaner code
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::map_unwrap_or)]

/// CLI module for command-line interface
#[cfg(feature = "cli")]
pub mod cli;
pub mod correlate;
pub mod dataset;
pub mod error;
pub mod flags;
pub mod missing;
pub mod summary;

// Re-exports for convenience
// Re-export arrow types commonly needed
pub use arrow::{
    array::RecordBatch,
    datatypes::{Schema, SchemaRef},
};
pub use correlate::{
    correlation_matrix, top_categories, CategoryCount, ColumnCategories, CorrelationMatrix,
    TopCategoriesReport,
};
pub use dataset::{
    collect_columns, ArrowDataset, ColumnDtype, ColumnValues, CsvOptions, Dataset, JsonOptions,
};
pub use error::{Error, Result};
pub use flags::{compute_quality_flags, QualityFlags, QualityRules};
pub use missing::{missing_table, problematic_columns, MissingEntry, MissingTable};
pub use summary::{
    flatten_summary, summarize_column, summarize_dataset, CategoricalSummary, ColumnSummary,
    DatasetSummary, NumericSummary, SummaryTable,
};
