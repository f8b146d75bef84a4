use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int16Array, Int32Array, Int64Array, Int8Array,
    StringArray, UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{EmigrantDataset, EmigrantRecord, YearlyAggregates};

// ---------------------------------------------------------------------------
// Data service boundary
// ---------------------------------------------------------------------------

/// Where the dashboard gets its two datasets from.
pub trait DataSource: Send + Sync {
    /// Every raw emigrant record, in source order.
    fn all_records(&self) -> Result<Vec<EmigrantRecord>>;
    /// The pre-aggregated year → counts mapping.
    fn yearly_aggregates(&self) -> Result<YearlyAggregates>;
}

/// Failure of a joint fetch. Either request failing discards both results.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("fetching emigrant records: {0:#}")]
    Records(anyhow::Error),
    #[error("fetching yearly aggregates: {0:#}")]
    Yearly(anyhow::Error),
    #[error("fetch worker stopped before delivering a result")]
    Interrupted,
}

/// Run both reads concurrently and reconcile only once both have settled.
pub fn fetch_all(source: &dyn DataSource) -> Result<EmigrantDataset, FetchError> {
    let (records, yearly) = rayon::join(|| source.all_records(), || source.yearly_aggregates());

    let records = records.map_err(FetchError::Records)?;
    let yearly = yearly.map_err(FetchError::Yearly)?;

    log::info!(
        "Fetched {} emigrant records and {} yearly aggregates",
        records.len(),
        yearly.len()
    );
    Ok(EmigrantDataset::new(records, yearly))
}

/// Run [`fetch_all`] on a worker thread. `on_done` fires after the result is
/// sent (the UI uses it to request a repaint).
pub fn spawn_fetch<F>(
    source: Arc<dyn DataSource>,
    on_done: F,
) -> Receiver<Result<EmigrantDataset, FetchError>>
where
    F: FnOnce() + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let result = fetch_all(source.as_ref());
        // The receiver is gone if the app closed mid-fetch; nothing to do then.
        let _ = tx.send(result);
        on_done();
    });
    rx
}

// ---------------------------------------------------------------------------
// File-backed source
// ---------------------------------------------------------------------------

/// Reads records and yearly aggregates from two files on disk.
#[derive(Debug, Clone)]
pub struct FileDataSource {
    pub records_path: PathBuf,
    pub yearly_path: PathBuf,
}

impl FileDataSource {
    pub fn new(records_path: impl Into<PathBuf>, yearly_path: impl Into<PathBuf>) -> Self {
        Self {
            records_path: records_path.into(),
            yearly_path: yearly_path.into(),
        }
    }
}

impl DataSource for FileDataSource {
    fn all_records(&self) -> Result<Vec<EmigrantRecord>> {
        load_records(&self.records_path)
    }

    fn yearly_aggregates(&self) -> Result<YearlyAggregates> {
        load_yearly(&self.yearly_path)
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Load raw records from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – flat columns, one row per record
/// * `.json`    – `[{ "year": 1981, "male": 10, ... }, ...]`
/// * `.csv`     – header row, one record per line
pub fn load_records(path: &Path) -> Result<Vec<EmigrantRecord>> {
    let records = match extension(path).as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            parse_records_json(&text)
        }
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            parse_records_csv(file)
        }
        other => bail!("Unsupported records file extension: .{other}"),
    }?;
    log::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Load the yearly mapping. JSON may be keyed by year or be an array of
/// rows with a `year` column; CSV is one row per year.
pub fn load_yearly(path: &Path) -> Result<YearlyAggregates> {
    match extension(path).as_str() {
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            parse_yearly_json(&text)
        }
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            Ok(key_by_year(parse_records_csv(file)?))
        }
        other => bail!("Unsupported yearly file extension: .{other}"),
    }
}

/// Merge rows into a year-keyed mapping, summing rows that share a year.
fn key_by_year(rows: Vec<EmigrantRecord>) -> YearlyAggregates {
    let mut yearly = YearlyAggregates::new();
    for row in rows {
        let Some(year) = row.year else {
            log::debug!("skipping yearly row without a year");
            continue;
        };
        let entry = yearly
            .entry(year)
            .or_insert_with(|| EmigrantRecord::new(Some(year)));
        for (col, value) in row.fields {
            *entry.fields.entry(col).or_insert(0.0) += value;
        }
    }
    yearly
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

/// Parse a numeric cell. Thousands separators are stripped; empty or
/// non-numeric text is treated as absent.
fn parse_number(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// A year must be integral.
fn parse_year(value: f64) -> Option<i32> {
    (value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64)
        .then_some(value as i32)
}

fn json_number(val: &JsonValue) -> Option<f64> {
    match val {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => parse_number(s),
        _ => None,
    }
}

fn is_year_column(name: &str) -> bool {
    name.eq_ignore_ascii_case("year")
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

fn record_from_json(obj: &Map<String, JsonValue>) -> EmigrantRecord {
    let mut record = EmigrantRecord::default();
    for (key, val) in obj {
        if is_year_column(key) {
            record.year = json_number(val).and_then(parse_year);
            continue;
        }
        match json_number(val) {
            Some(v) => record.insert(key, v),
            None if !val.is_null() => log::debug!("ignoring non-numeric column '{key}'"),
            None => {}
        }
    }
    record
}

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "year": 1981, "male": 21000, "female": 27000, "elementary": 5000 },
///   ...
/// ]
/// ```
pub fn parse_records_json(text: &str) -> Result<Vec<EmigrantRecord>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            row.as_object()
                .map(record_from_json)
                .with_context(|| format!("Row {i} is not a JSON object"))
        })
        .collect()
}

/// Either `{ "1981": { "total": 48000, ... }, ... }` or an array of rows.
pub fn parse_yearly_json(text: &str) -> Result<YearlyAggregates> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    match root {
        JsonValue::Object(map) => {
            let mut yearly = YearlyAggregates::new();
            for (key, val) in &map {
                let year = parse_number(key)
                    .and_then(parse_year)
                    .with_context(|| format!("'{key}' is not a year"))?;
                let obj = val
                    .as_object()
                    .with_context(|| format!("Entry for {year} is not a JSON object"))?;
                let mut record = record_from_json(obj);
                record.year = Some(year);
                yearly.insert(year, record);
            }
            Ok(yearly)
        }
        JsonValue::Array(_) => Ok(key_by_year(parse_records_json(text)?)),
        _ => bail!("Expected a JSON object keyed by year or an array of rows"),
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one of which is `year`.
/// Every other column is read as a count; non-numeric cells are skipped.
pub fn parse_records_csv<R: Read>(input: R) -> Result<Vec<EmigrantRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_ascii_lowercase())
        .collect();

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;

        let mut record = EmigrantRecord::default();
        for (col, cell) in headers.iter().zip(row.iter()) {
            let Some(value) = parse_number(cell) else {
                continue;
            };
            if is_year_column(col) {
                record.year = parse_year(value);
            } else {
                record.insert(col, value);
            }
        }
        records.push(record);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat columns: an integer or string `year` column
/// and numeric count columns. Other column types are ignored.
fn load_parquet(path: &Path) -> Result<Vec<EmigrantRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let columns: Vec<(String, &Arc<dyn Array>)> = schema
            .fields()
            .iter()
            .zip(batch.columns())
            .filter(|(f, _)| {
                let readable = is_numeric_type(f.data_type());
                if !readable {
                    log::debug!("ignoring column '{}' of type {:?}", f.name(), f.data_type());
                }
                readable
            })
            .map(|(f, col)| (f.name().to_ascii_lowercase(), col))
            .collect();

        for row in 0..batch.num_rows() {
            let mut record = EmigrantRecord::default();
            for (name, col) in &columns {
                let Some(value) = extract_number(col, row) else {
                    continue;
                };
                if is_year_column(name) {
                    record.year = parse_year(value);
                } else {
                    record.insert(name, value);
                }
            }
            records.push(record);
        }
    }

    Ok(records)
}

/// Column types [`extract_number`] can read.
fn is_numeric_type(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
            | DataType::Utf8
            | DataType::LargeUtf8
    )
}

/// Extract a numeric cell from an Arrow column at a given row.
fn extract_number(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Int8 => any.downcast_ref::<Int8Array>().map(|a| a.value(row) as f64),
        DataType::Int16 => any
            .downcast_ref::<Int16Array>()
            .map(|a| a.value(row) as f64),
        DataType::UInt8 => any
            .downcast_ref::<UInt8Array>()
            .map(|a| a.value(row) as f64),
        DataType::UInt16 => any
            .downcast_ref::<UInt16Array>()
            .map(|a| a.value(row) as f64),
        DataType::UInt32 => any
            .downcast_ref::<UInt32Array>()
            .map(|a| a.value(row) as f64),
        DataType::UInt64 => any
            .downcast_ref::<UInt64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .and_then(|s| parse_number(s.value(row))),
        DataType::LargeUtf8 => parse_number(col.as_string::<i64>().value(row)),
        _ => None,
    }
}
