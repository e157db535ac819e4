//! Dataset types for perfilar.
//!
//! Provides the [`Dataset`] trait and [`ArrowDataset`] implementation
//! for working with Arrow-based tabular data, plus the typed column
//! extraction ([`ColumnValues`]) the profiling modules operate on.

use std::{path::Path, sync::Arc};

use arrow::{
    array::{Array, ArrayRef, AsArray, RecordBatch},
    datatypes::{
        DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, SchemaRef,
        UInt16Type, UInt32Type, UInt64Type, UInt8Type,
    },
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Serialize;

use crate::error::{Error, Result};

/// A dataset that can be iterated over.
///
/// Datasets provide access to tabular data stored as Arrow RecordBatches.
/// All implementations must be thread-safe (Send + Sync).
pub trait Dataset: Send + Sync {
    /// Returns the total number of rows in the dataset.
    fn len(&self) -> usize;

    /// Returns true if the dataset contains no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the schema of the dataset.
    fn schema(&self) -> SchemaRef;

    /// Returns an iterator over all RecordBatches in the dataset.
    fn iter(&self) -> Box<dyn Iterator<Item = RecordBatch> + Send + '_>;
}

/// An in-memory dataset backed by Arrow RecordBatches.
///
/// This is the primary dataset type for perfilar. It stores data as a
/// collection of RecordBatches sharing one schema and is the immutable
/// input to every profiling operation.
///
/// # Example
///
/// ```no_run
/// use perfilar::{ArrowDataset, Dataset};
///
/// let dataset = ArrowDataset::from_csv("data.csv").unwrap();
/// println!("Dataset has {} rows", dataset.len());
/// ```
#[derive(Debug, Clone)]
pub struct ArrowDataset {
    batches: Vec<RecordBatch>,
    schema: SchemaRef,
    row_count: usize,
}

impl ArrowDataset {
    /// Creates a new ArrowDataset from a vector of RecordBatches.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The batches vector is empty
    /// - The batches have inconsistent schemas
    pub fn new(batches: Vec<RecordBatch>) -> Result<Self> {
        if batches.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let schema = batches[0].schema();

        // Verify all batches have the same schema
        for (i, batch) in batches.iter().enumerate().skip(1) {
            if batch.schema() != schema {
                return Err(Error::schema_mismatch(format!(
                    "Batch {} has different schema than batch 0",
                    i
                )));
            }
        }

        let row_count = batches.iter().map(|b| b.num_rows()).sum();

        Ok(Self {
            batches,
            schema,
            row_count,
        })
    }

    /// Creates an ArrowDataset from a single RecordBatch.
    ///
    /// # Errors
    ///
    /// Returns an error if batch construction fails.
    pub fn from_batch(batch: RecordBatch) -> Result<Self> {
        Self::new(vec![batch])
    }

    /// Creates a zero-row dataset with the given schema.
    ///
    /// Zero rows (and even zero columns) are valid input to every
    /// profiling operation, so an empty dataset must be constructible.
    pub fn empty(schema: SchemaRef) -> Self {
        let batch = RecordBatch::new_empty(Arc::clone(&schema));
        Self {
            batches: vec![batch],
            schema,
            row_count: 0,
        }
    }

    /// Loads a dataset from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be opened
    /// - The file is not valid CSV
    /// - The file is empty
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_csv_with_options(path, CsvOptions::default())
    }

    /// Loads a dataset from a CSV file with options.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the file is empty.
    pub fn from_csv_with_options(path: impl AsRef<Path>, options: CsvOptions) -> Result<Self> {
        use std::io::{BufReader, Seek, SeekFrom};

        use arrow_csv::{reader::Format, ReaderBuilder};

        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| Error::io(e, path))?;
        let mut buf_reader = BufReader::new(file);

        // Get schema (infer or use provided)
        let schema = if let Some(schema) = options.schema {
            Arc::new(schema)
        } else {
            // Infer schema from file
            let mut format = Format::default().with_header(options.has_header);
            if let Some(delim) = options.delimiter {
                format = format.with_delimiter(delim);
            }
            let (inferred, _) = format
                .infer_schema(&mut buf_reader, Some(1000))
                .map_err(Error::Arrow)?;

            // Reset file position
            buf_reader
                .seek(SeekFrom::Start(0))
                .map_err(|e| Error::io(e, path))?;

            Arc::new(inferred)
        };

        let mut builder = ReaderBuilder::new(schema)
            .with_batch_size(options.batch_size)
            .with_header(options.has_header);

        if let Some(delim) = options.delimiter {
            builder = builder.with_delimiter(delim);
        }

        let reader = builder.build(buf_reader).map_err(Error::Arrow)?;

        let batches: Vec<RecordBatch> = reader
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::Arrow)?;

        if batches.is_empty() {
            return Err(Error::EmptyDataset);
        }

        Self::new(batches)
    }

    /// Loads a dataset from a CSV string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid CSV.
    pub fn from_csv_str(data: &str) -> Result<Self> {
        use std::io::Cursor;

        use arrow_csv::{reader::Format, ReaderBuilder};

        // Infer schema
        let mut cursor_for_infer = Cursor::new(data.as_bytes());
        let format = Format::default().with_header(true);
        let (inferred, _) = format
            .infer_schema(&mut cursor_for_infer, Some(1000))
            .map_err(Error::Arrow)?;

        let schema = Arc::new(inferred);
        let cursor = Cursor::new(data.as_bytes());

        let builder = ReaderBuilder::new(schema)
            .with_batch_size(8192)
            .with_header(true);

        let reader = builder.build(cursor).map_err(Error::Arrow)?;

        let batches: Vec<RecordBatch> = reader
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::Arrow)?;

        if batches.is_empty() {
            return Err(Error::EmptyDataset);
        }

        Self::new(batches)
    }

    /// Loads a dataset from a JSON Lines (JSONL) file.
    ///
    /// Each line in the file should be a valid JSON object representing a row.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_with_options(path, JsonOptions::default())
    }

    /// Loads a dataset from a JSON Lines file with options.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the file is empty.
    pub fn from_json_with_options(path: impl AsRef<Path>, options: JsonOptions) -> Result<Self> {
        use std::io::BufReader;

        use arrow_json::ReaderBuilder;

        let path = path.as_ref();

        // Get schema (infer or use provided)
        let schema = if let Some(schema) = options.schema {
            Arc::new(schema)
        } else {
            // Infer schema from file
            let infer_file = std::fs::File::open(path).map_err(|e| Error::io(e, path))?;
            let infer_reader = BufReader::new(infer_file);
            let (inferred, _) = arrow_json::reader::infer_json_schema(infer_reader, Some(1000))
                .map_err(Error::Arrow)?;
            Arc::new(inferred)
        };

        // Open file for reading
        let file = std::fs::File::open(path).map_err(|e| Error::io(e, path))?;
        let buf_reader = BufReader::new(file);

        let builder = ReaderBuilder::new(schema).with_batch_size(options.batch_size);
        let reader = builder.build(buf_reader).map_err(Error::Arrow)?;

        let batches: Vec<RecordBatch> = reader
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::Arrow)?;

        if batches.is_empty() {
            return Err(Error::EmptyDataset);
        }

        Self::new(batches)
    }

    /// Loads a dataset from a Parquet file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be opened
    /// - The file is not valid Parquet
    /// - The file is empty
    pub fn from_parquet(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| Error::io(e, path))?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(Error::Parquet)?;

        let reader = builder.build().map_err(Error::Parquet)?;

        let batches: Vec<RecordBatch> = reader
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::Arrow)?;

        if batches.is_empty() {
            return Err(Error::EmptyDataset);
        }

        Self::new(batches)
    }

    /// Returns the underlying batches.
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }
}

impl Dataset for ArrowDataset {
    fn len(&self) -> usize {
        self.row_count
    }

    fn schema(&self) -> SchemaRef {
        Arc::clone(&self.schema)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = RecordBatch> + Send + '_> {
        Box::new(self.batches.iter().cloned())
    }
}

/// Options for CSV parsing.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Rows per RecordBatch.
    pub batch_size: usize,
    /// Whether the first row is a header.
    pub has_header: bool,
    /// Field delimiter (default: comma).
    pub delimiter: Option<u8>,
    /// Explicit schema; inferred from the file when `None`.
    pub schema: Option<arrow::datatypes::Schema>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            batch_size: 8192,
            has_header: true,
            delimiter: None,
            schema: None,
        }
    }
}

impl CsvOptions {
    /// Set the batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set whether the first row is a header.
    #[must_use]
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Set the field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Set an explicit schema instead of inferring one.
    #[must_use]
    pub fn with_schema(mut self, schema: arrow::datatypes::Schema) -> Self {
        self.schema = Some(schema);
        self
    }
}

/// Options for JSON Lines parsing.
#[derive(Debug, Clone)]
pub struct JsonOptions {
    /// Rows per RecordBatch.
    pub batch_size: usize,
    /// Explicit schema; inferred from the file when `None`.
    pub schema: Option<arrow::datatypes::Schema>,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            batch_size: 8192,
            schema: None,
        }
    }
}

impl JsonOptions {
    /// Set the batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set an explicit schema instead of inferring one.
    #[must_use]
    pub fn with_schema(mut self, schema: arrow::datatypes::Schema) -> Self {
        self.schema = Some(schema);
        self
    }
}

/// Semantic type of a column, decided once at extraction time.
///
/// Every profiling rule dispatches on this tag instead of re-inspecting
/// Arrow types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnDtype {
    /// Integer, unsigned integer, or floating-point values.
    Numeric,
    /// Textual values; also the fallback for Arrow types with no
    /// dedicated handling, rendered to strings.
    Categorical,
    /// Boolean values.
    Boolean,
}

impl ColumnDtype {
    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Boolean => "boolean",
        }
    }
}

/// Extracted values of a single column, missing markers preserved.
///
/// Positions align with dataset rows; `None` is an Arrow null.
#[derive(Debug, Clone)]
pub enum ColumnValues {
    /// Numeric column widened to f64.
    Numeric(Vec<Option<f64>>),
    /// Textual/categorical column.
    Categorical(Vec<Option<String>>),
    /// Boolean column.
    Boolean(Vec<Option<bool>>),
}

impl ColumnValues {
    /// The semantic type tag of these values.
    pub fn dtype(&self) -> ColumnDtype {
        match self {
            Self::Numeric(_) => ColumnDtype::Numeric,
            Self::Categorical(_) => ColumnDtype::Categorical,
            Self::Boolean(_) => ColumnDtype::Boolean,
        }
    }

    /// Total number of rows, missing included.
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Categorical(v) => v.len(),
            Self::Boolean(v) => v.len(),
        }
    }

    /// Returns true if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of non-missing values.
    pub fn count(&self) -> usize {
        match self {
            Self::Numeric(v) => v.iter().filter(|x| x.is_some()).count(),
            Self::Categorical(v) => v.iter().filter(|x| x.is_some()).count(),
            Self::Boolean(v) => v.iter().filter(|x| x.is_some()).count(),
        }
    }

    /// Number of missing values.
    pub fn missing_count(&self) -> usize {
        self.len() - self.count()
    }

    /// Number of distinct non-missing values.
    pub fn unique_count(&self) -> usize {
        use std::collections::HashSet;

        match self {
            // Distinct by bit pattern so that a column of NaNs still
            // counts as one value.
            Self::Numeric(v) => v
                .iter()
                .filter_map(|x| x.map(f64::to_bits))
                .collect::<HashSet<_>>()
                .len(),
            Self::Categorical(v) => v
                .iter()
                .filter_map(|x| x.as_deref())
                .collect::<HashSet<_>>()
                .len(),
            Self::Boolean(v) => v.iter().filter_map(|x| *x).collect::<HashSet<_>>().len(),
        }
    }

    /// Returns true if any non-missing value occurs more than once.
    pub fn has_duplicates(&self) -> bool {
        self.unique_count() < self.count()
    }
}

/// Extracts every column of the dataset into typed [`ColumnValues`],
/// schema order preserved.
pub fn collect_columns(dataset: &ArrowDataset) -> Vec<(String, ColumnValues)> {
    let schema = dataset.schema();
    schema
        .fields()
        .iter()
        .enumerate()
        .map(|(idx, field)| (field.name().clone(), collect_column(dataset, idx)))
        .collect()
}

/// Extracts a single column by index into typed [`ColumnValues`].
///
/// # Panics
///
/// Panics if `index` is out of bounds for the dataset schema; callers
/// iterate schema fields, so the index is always valid.
pub fn collect_column(dataset: &ArrowDataset, index: usize) -> ColumnValues {
    let schema = dataset.schema();
    let data_type = schema.field(index).data_type().clone();

    match data_type {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float32
        | DataType::Float64 => {
            let mut out = Vec::with_capacity(dataset.len());
            for batch in dataset.iter() {
                extend_numeric(&mut out, batch.column(index), &data_type);
            }
            ColumnValues::Numeric(out)
        }
        DataType::Boolean => {
            let mut out = Vec::with_capacity(dataset.len());
            for batch in dataset.iter() {
                out.extend(batch.column(index).as_boolean().iter());
            }
            ColumnValues::Boolean(out)
        }
        DataType::Utf8 => {
            let mut out = Vec::with_capacity(dataset.len());
            for batch in dataset.iter() {
                out.extend(
                    batch
                        .column(index)
                        .as_string::<i32>()
                        .iter()
                        .map(|v| v.map(String::from)),
                );
            }
            ColumnValues::Categorical(out)
        }
        DataType::LargeUtf8 => {
            let mut out = Vec::with_capacity(dataset.len());
            for batch in dataset.iter() {
                out.extend(
                    batch
                        .column(index)
                        .as_string::<i64>()
                        .iter()
                        .map(|v| v.map(String::from)),
                );
            }
            ColumnValues::Categorical(out)
        }
        // No dedicated handling: render to strings and treat as
        // categorical. Unrenderable cells degrade to missing.
        _ => {
            use arrow::util::display::array_value_to_string;

            let mut out = Vec::with_capacity(dataset.len());
            for batch in dataset.iter() {
                let array = batch.column(index);
                for i in 0..array.len() {
                    if array.is_null(i) {
                        out.push(None);
                    } else {
                        out.push(array_value_to_string(array, i).ok());
                    }
                }
            }
            ColumnValues::Categorical(out)
        }
    }
}

// Widening to f64 loses precision for the largest 64-bit integers,
// which is acceptable for descriptive statistics.
#[allow(clippy::cast_precision_loss)]
fn extend_numeric(out: &mut Vec<Option<f64>>, array: &ArrayRef, data_type: &DataType) {
    match data_type {
        DataType::Int8 => out.extend(
            array
                .as_primitive::<Int8Type>()
                .iter()
                .map(|v| v.map(f64::from)),
        ),
        DataType::Int16 => out.extend(
            array
                .as_primitive::<Int16Type>()
                .iter()
                .map(|v| v.map(f64::from)),
        ),
        DataType::Int32 => out.extend(
            array
                .as_primitive::<Int32Type>()
                .iter()
                .map(|v| v.map(f64::from)),
        ),
        DataType::Int64 => out.extend(
            array
                .as_primitive::<Int64Type>()
                .iter()
                .map(|v| v.map(|x| x as f64)),
        ),
        DataType::UInt8 => out.extend(
            array
                .as_primitive::<UInt8Type>()
                .iter()
                .map(|v| v.map(f64::from)),
        ),
        DataType::UInt16 => out.extend(
            array
                .as_primitive::<UInt16Type>()
                .iter()
                .map(|v| v.map(f64::from)),
        ),
        DataType::UInt32 => out.extend(
            array
                .as_primitive::<UInt32Type>()
                .iter()
                .map(|v| v.map(f64::from)),
        ),
        DataType::UInt64 => out.extend(
            array
                .as_primitive::<UInt64Type>()
                .iter()
                .map(|v| v.map(|x| x as f64)),
        ),
        DataType::Float32 => out.extend(
            array
                .as_primitive::<Float32Type>()
                .iter()
                .map(|v| v.map(f64::from)),
        ),
        DataType::Float64 => out.extend(array.as_primitive::<Float64Type>().iter()),
        _ => out.extend(std::iter::repeat(None).take(array.len())),
    }
}
