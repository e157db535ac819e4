//! Heuristic data-quality flags.
//!
//! Applies independent rules over a dataset summary, its missing-value
//! table, and the raw dataset, producing boolean signals and a single
//! quality score. The raw dataset is an explicit input because
//! duplicate detection re-scans values the summary does not capture.
//!
//! # Example
//!
//! ```ignore
//! use perfilar::flags::QualityRules;
//!
//! let flags = QualityRules::new().evaluate(&summary, &missing, &dataset)?;
//! if flags.has_suspicious_id_duplicates {
//!     println!("id columns contain duplicates");
//! }
//! println!("quality score: {:.2}", flags.quality_score);
//! ```

// Statistical computation requires usize->f64 casts
#![allow(clippy::cast_precision_loss)]

use serde::Serialize;

use crate::{
    dataset::{collect_column, ArrowDataset, ColumnDtype, Dataset},
    error::{Error, Result},
    missing::MissingTable,
    summary::DatasetSummary,
};

/// Default distinct-to-count ratio above which a categorical column is
/// considered high-cardinality.
pub const HIGH_CARDINALITY_RATIO: f64 = 0.9;

/// Default minimum non-missing count before the high-cardinality rule
/// applies; below this every value is trivially distinct.
pub const HIGH_CARDINALITY_MIN_COUNT: usize = 20;

/// Default zero-value share above which a numeric column is flagged.
pub const ZERO_SHARE_CUTOFF: f64 = 0.3;

/// Default missing share above which a column counts as mostly missing.
pub const MOSTLY_MISSING_SHARE: f64 = 0.5;

/// Score penalty per fired flag.
const FLAG_PENALTY: f64 = 0.15;

/// Score penalty weight on the mean missing share.
const MISSING_PENALTY_WEIGHT: f64 = 0.4;

/// Named heuristic quality signals plus an overall score.
///
/// Derived and stateless: recomputed on demand, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct QualityFlags {
    /// Any column holds a single distinct value among non-missing rows.
    pub has_constant_columns: bool,
    /// Any categorical column is nearly all-distinct (see
    /// [`HIGH_CARDINALITY_RATIO`]).
    pub has_high_cardinality_categoricals: bool,
    /// Any id-like column (`id` or `*_id`) contains duplicate
    /// non-missing values.
    pub has_suspicious_id_duplicates: bool,
    /// Any numeric column has a zero share above the cutoff.
    pub has_many_zero_values: bool,
    /// Any column is missing more than half of its values.
    pub has_mostly_missing_columns: bool,
    /// Overall score in [0, 1], higher is better. Starts at 1.0 and
    /// loses a fixed penalty per fired flag plus a weighted mean
    /// missing share, clamped at 0.
    pub quality_score: f64,
}

impl QualityFlags {
    /// Names of the flags that fired.
    pub fn fired(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.has_constant_columns {
            names.push("has_constant_columns");
        }
        if self.has_high_cardinality_categoricals {
            names.push("has_high_cardinality_categoricals");
        }
        if self.has_suspicious_id_duplicates {
            names.push("has_suspicious_id_duplicates");
        }
        if self.has_many_zero_values {
            names.push("has_many_zero_values");
        }
        if self.has_mostly_missing_columns {
            names.push("has_mostly_missing_columns");
        }
        names
    }

    /// Returns true if any flag fired.
    pub fn any_fired(&self) -> bool {
        !self.fired().is_empty()
    }
}

/// Thresholds for the quality rules.
///
/// Defaults are the named constants above; builders override them for
/// stricter or looser runs.
#[derive(Debug, Clone)]
pub struct QualityRules {
    high_cardinality_ratio: f64,
    high_cardinality_min_count: usize,
    zero_share_cutoff: f64,
    mostly_missing_share: f64,
}

impl Default for QualityRules {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityRules {
    /// Create rules with default thresholds.
    pub fn new() -> Self {
        Self {
            high_cardinality_ratio: HIGH_CARDINALITY_RATIO,
            high_cardinality_min_count: HIGH_CARDINALITY_MIN_COUNT,
            zero_share_cutoff: ZERO_SHARE_CUTOFF,
            mostly_missing_share: MOSTLY_MISSING_SHARE,
        }
    }

    /// Set the high-cardinality distinct-to-count ratio.
    #[must_use]
    pub fn high_cardinality_ratio(mut self, ratio: f64) -> Self {
        self.high_cardinality_ratio = ratio;
        self
    }

    /// Set the minimum non-missing count for the high-cardinality rule.
    #[must_use]
    pub fn high_cardinality_min_count(mut self, count: usize) -> Self {
        self.high_cardinality_min_count = count;
        self
    }

    /// Set the zero-share cutoff for numeric columns.
    #[must_use]
    pub fn zero_share_cutoff(mut self, cutoff: f64) -> Self {
        self.zero_share_cutoff = cutoff;
        self
    }

    /// Set the mostly-missing share threshold.
    #[must_use]
    pub fn mostly_missing_share(mut self, share: f64) -> Self {
        self.mostly_missing_share = share;
        self
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("high_cardinality_ratio", self.high_cardinality_ratio),
            ("zero_share_cutoff", self.zero_share_cutoff),
            ("mostly_missing_share", self.mostly_missing_share),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(Error::invalid_config(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Evaluate every rule against a dataset.
    ///
    /// All rules run unconditionally; an empty dataset degrades to all
    /// flags false and a neutral score of 1.0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when a threshold override is
    /// outside [0, 1].
    pub fn evaluate(
        &self,
        summary: &DatasetSummary,
        missing: &MissingTable,
        dataset: &ArrowDataset,
    ) -> Result<QualityFlags> {
        self.validate()?;

        let has_constant_columns = summary.columns.iter().any(|c| c.is_constant());

        let has_high_cardinality_categoricals = summary.columns.iter().any(|c| {
            c.dtype == ColumnDtype::Categorical
                && c.count >= self.high_cardinality_min_count
                && c.unique_count as f64 / c.count as f64 > self.high_cardinality_ratio
        });

        let has_suspicious_id_duplicates = self.id_columns_have_duplicates(dataset);

        let has_many_zero_values = summary.columns.iter().any(|c| {
            c.numeric
                .as_ref()
                .is_some_and(|n| n.zero_share > self.zero_share_cutoff)
        });

        let has_mostly_missing_columns = missing
            .entries()
            .iter()
            .any(|e| e.missing_share > self.mostly_missing_share);

        let fired = [
            has_constant_columns,
            has_high_cardinality_categoricals,
            has_suspicious_id_duplicates,
            has_many_zero_values,
            has_mostly_missing_columns,
        ]
        .iter()
        .filter(|&&f| f)
        .count();

        let quality_score = (1.0
            - FLAG_PENALTY * fired as f64
            - MISSING_PENALTY_WEIGHT * missing.mean_missing_share())
        .clamp(0.0, 1.0);

        Ok(QualityFlags {
            has_constant_columns,
            has_high_cardinality_categoricals,
            has_suspicious_id_duplicates,
            has_many_zero_values,
            has_mostly_missing_columns,
            quality_score,
        })
    }

    /// Re-scan id-like columns of the raw dataset for duplicate
    /// non-missing values.
    fn id_columns_have_duplicates(&self, dataset: &ArrowDataset) -> bool {
        let schema = dataset.schema();
        schema.fields().iter().enumerate().any(|(idx, field)| {
            is_id_like(field.name()) && collect_column(dataset, idx).has_duplicates()
        })
    }
}

/// Check whether a column name looks like an identifier column:
/// equals `id` or ends with `_id`, ASCII case-insensitive.
fn is_id_like(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower == "id" || lower.ends_with("_id")
}

/// Evaluate the default rules against a dataset.
pub fn compute_quality_flags(
    summary: &DatasetSummary,
    missing: &MissingTable,
    dataset: &ArrowDataset,
) -> Result<QualityFlags> {
    QualityRules::new().evaluate(summary, missing, dataset)
}
