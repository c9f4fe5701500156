use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow::util::display::array_value_to_string;
use bytes::Bytes;
use flate2::read::MultiGzDecoder;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{CellValue, Column, LiftRecord, LiftType};
use super::LiftDataset;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Dataset source
// ---------------------------------------------------------------------------

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    File(PathBuf),
    Url(String),
}

impl DatasetSource {
    /// `http://` and `https://` locations are fetched over the network,
    /// everything else is a local path.
    pub fn parse(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DatasetSource::Url(location.to_string())
        } else {
            DatasetSource::File(PathBuf::from(location))
        }
    }

    /// Final path segment, used for extension-based format detection.
    fn file_name(&self) -> String {
        match self {
            DatasetSource::File(path) => path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("")
                .to_string(),
            DatasetSource::Url(url) => {
                let path = url.split(['?', '#']).next().unwrap_or("");
                path.rsplit('/').next().unwrap_or("").to_string()
            }
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::File(path) => write!(f, "{}", path.display()),
            DatasetSource::Url(url) => write!(f, "{url}"),
        }
    }
}

impl From<&str> for DatasetSource {
    fn from(location: &str) -> Self {
        DatasetSource::parse(location)
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Fetch, decode and index a dataset.
///
/// Every call builds a fresh [`LiftDataset`]; nothing is shared with earlier
/// loads.
pub fn load(source: &DatasetSource) -> Result<LiftDataset, LoadError> {
    let raw = fetch(source)?;
    let rows = decode(raw, &source.file_name())?;
    let dataset = LiftDataset::from_rows(rows);
    log::info!(
        "Loaded {} rows from {source} ({} bench, {} squat, {} deadlift)",
        dataset.len(),
        dataset.index().partition_len(LiftType::Bench),
        dataset.index().partition_len(LiftType::Squat),
        dataset.index().partition_len(LiftType::Deadlift),
    );
    Ok(dataset)
}

/// Convenience wrapper for local files.
pub fn load_file(path: &Path) -> Result<LiftDataset, LoadError> {
    load(&DatasetSource::File(path.to_path_buf()))
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

fn fetch(source: &DatasetSource) -> Result<Vec<u8>, LoadError> {
    let fetched = match source {
        DatasetSource::File(path) => std::fs::read(path).map_err(anyhow::Error::from),
        DatasetSource::Url(url) => fetch_url(url),
    };
    fetched.map_err(|e| LoadError::Fetch {
        location: source.to_string(),
        reason: format!("{e:#}"),
    })
}

fn fetch_url(url: &str) -> Result<Vec<u8>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("building HTTP client")?;
    let response = client
        .get(url)
        .send()
        .context("sending request")?
        .error_for_status()
        .context("server returned an error status")?;
    let body = response.bytes().context("reading response body")?;
    log::debug!("Fetched {} bytes from {url}", body.len());
    Ok(body.to_vec())
}

// ---------------------------------------------------------------------------
// Format detection
// ---------------------------------------------------------------------------

/// Encodings the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Parquet,
    Csv,
    Json,
    Gzip,
}

/// Detect the encoding of `bytes`: magic numbers first, then the file
/// extension, then a look at the leading text.
pub fn detect_format(bytes: &[u8], extension: Option<&str>) -> Option<Format> {
    if bytes.starts_with(b"PAR1") {
        return Some(Format::Parquet);
    }
    if bytes.starts_with(&[0x1f, 0x8b]) {
        return Some(Format::Gzip);
    }
    let by_extension = extension.and_then(|ext| match ext.to_ascii_lowercase().as_str() {
        "parquet" | "pq" => Some(Format::Parquet),
        "csv" => Some(Format::Csv),
        "json" => Some(Format::Json),
        "gz" => Some(Format::Gzip),
        _ => None,
    });
    by_extension.or_else(|| sniff_text(bytes))
}

fn sniff_text(bytes: &[u8]) -> Option<Format> {
    let head = &bytes[..bytes.len().min(4096)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    if text.starts_with('[') {
        Some(Format::Json)
    } else if text.lines().next().is_some_and(|line| line.contains(',')) {
        Some(Format::Csv)
    } else {
        None
    }
}

/// `"lift-data.csv.gz"` → `(Some("gz"), Some("csv"))`.
fn extensions(file_name: &str) -> (Option<&str>, Option<&str>) {
    let segments: Vec<&str> = file_name.split('.').collect();
    let n = segments.len();
    let outer = (n >= 2).then(|| segments[n - 1]);
    let inner = (n >= 3).then(|| segments[n - 2]);
    (outer, inner)
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

fn decode(bytes: Vec<u8>, file_name: &str) -> Result<Vec<LiftRecord>, LoadError> {
    let (outer_ext, inner_ext) = extensions(file_name);
    let format = detect_format(&bytes, outer_ext).ok_or_else(|| {
        LoadError::UnsupportedFormat(format!("cannot determine the encoding of '{file_name}'"))
    })?;
    log::debug!("Decoding '{file_name}' as {format:?}");

    if format != Format::Gzip {
        return decode_as(format, bytes);
    }

    let inflated = gunzip(&bytes).map_err(LoadError::decode)?;
    match detect_format(&inflated, inner_ext) {
        Some(inner) => {
            log::debug!("Decompressed {} bytes, payload is {inner:?}", inflated.len());
            decode_as(inner, inflated)
        }
        None => Err(LoadError::UnsupportedFormat(format!(
            "cannot determine the encoding inside '{file_name}'"
        ))),
    }
}

fn decode_as(format: Format, bytes: Vec<u8>) -> Result<Vec<LiftRecord>, LoadError> {
    let rows = match format {
        Format::Parquet => decode_parquet(bytes),
        Format::Csv => decode_csv(&bytes),
        Format::Json => decode_json(&bytes),
        Format::Gzip => {
            return Err(LoadError::UnsupportedFormat(
                "nested gzip streams are not supported".to_string(),
            ))
        }
    };
    rows.map_err(LoadError::decode)
}

fn gunzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    MultiGzDecoder::new(bytes)
        .read_to_end(&mut out)
        .context("decompressing gzip stream")?;
    Ok(out)
}

/// Map source headers onto known columns; unknown headers are skipped.
fn resolve_columns<'a>(headers: impl IntoIterator<Item = &'a str>) -> Vec<Option<Column>> {
    headers
        .into_iter()
        .map(|header| {
            let column = Column::from_name(header.trim());
            if column.is_none() {
                log::debug!("Skipping unknown column '{header}'");
            }
            column
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CSV decoder
// ---------------------------------------------------------------------------

/// Header row with column names, one result per line. Every cell is handed
/// over as text and typed by the column it lands in.
fn decode_csv(bytes: &[u8]) -> Result<Vec<LiftRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);
    let headers = reader.headers().context("reading CSV headers")?.clone();
    let columns = resolve_columns(headers.iter());

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let mut row = LiftRecord::default();
        for (value, column) in record.iter().zip(&columns) {
            if let Some(column) = column {
                row.assign(*column, text_cell(value));
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

fn text_cell(s: &str) -> CellValue {
    if s.is_empty() {
        CellValue::Null
    } else {
        CellValue::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// JSON decoder
// ---------------------------------------------------------------------------

/// Records-oriented JSON: `[{"Name": "...", "Best3BenchKg": 140.0, ...}, ...]`.
fn decode_json(bytes: &[u8]) -> Result<Vec<LiftRecord>> {
    let root: JsonValue = serde_json::from_slice(bytes).context("parsing JSON")?;
    let records = root.as_array().context("expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("row {i} is not a JSON object"))?;
        let mut row = LiftRecord::default();
        for (key, val) in obj {
            if let Some(column) = Column::from_name(key) {
                row.assign(column, json_to_cell(val));
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => text_cell(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet decoder
// ---------------------------------------------------------------------------

/// Parquet with one flat column per record field. Columns declared without
/// a type (Arrow `Null`) and unknown columns are skipped.
fn decode_parquet(bytes: Vec<u8>) -> Result<Vec<LiftRecord>> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(Bytes::from(bytes))
        .context("reading parquet metadata")?;

    let columns: Vec<(usize, Column)> = {
        let schema = builder.schema();
        let names = schema.fields().iter().map(|f| f.name().as_str());
        resolve_columns(names)
            .into_iter()
            .enumerate()
            .filter_map(|(i, column)| {
                let field = schema.field(i);
                if *field.data_type() == DataType::Null {
                    log::debug!("Skipping untyped column '{}'", field.name());
                    return None;
                }
                column.map(|c| (i, c))
            })
            .collect()
    };

    let reader = builder.build().context("building parquet reader")?;
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let mut rec = LiftRecord::default();
            for &(col_idx, column) in &columns {
                rec.assign(column, extract_cell(batch.column(col_idx), row));
            }
            rows.push(rec);
        }
    }

    Ok(rows)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row) as i64),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => CellValue::Integer(col.as_primitive::<UInt8Type>().value(row) as i64),
        DataType::UInt16 => CellValue::Integer(col.as_primitive::<UInt16Type>().value(row) as i64),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row) as i64),
        DataType::UInt64 => CellValue::Float(col.as_primitive::<UInt64Type>().value(row) as f64),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        // Dictionary strings, dates, decimals: use Arrow's own formatting.
        _ => array_value_to_string(col, row)
            .map(CellValue::Text)
            .unwrap_or(CellValue::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_parsing() {
        assert_eq!(
            DatasetSource::parse("https://example.org/lift-data.gz"),
            DatasetSource::Url("https://example.org/lift-data.gz".into())
        );
        assert_eq!(
            DatasetSource::parse("data/lifts.parquet"),
            DatasetSource::File(PathBuf::from("data/lifts.parquet"))
        );
        assert_eq!(
            DatasetSource::parse("https://example.org/a/b.csv.gz?v=2").file_name(),
            "b.csv.gz"
        );
    }

    #[test]
    fn extension_split() {
        assert_eq!(extensions("lift-data.csv.gz"), (Some("gz"), Some("csv")));
        assert_eq!(extensions("lift-data.gz"), (Some("gz"), None));
        assert_eq!(extensions("lifts"), (None, None));
    }

    #[test]
    fn format_detection_prefers_magic_bytes() {
        assert_eq!(detect_format(b"PAR1....", Some("csv")), Some(Format::Parquet));
        assert_eq!(detect_format(&[0x1f, 0x8b, 8, 0], None), Some(Format::Gzip));
        assert_eq!(detect_format(b"Name,Sex\n", Some("csv")), Some(Format::Csv));
        assert_eq!(detect_format(b"Name,Sex\n", None), Some(Format::Csv));
        assert_eq!(detect_format(b"  [{\"Sex\":\"M\"}]", None), Some(Format::Json));
        assert_eq!(detect_format(b"hello", None), None);
    }

    #[test]
    fn csv_cells_are_typed_by_column() {
        let csv = "Name,Sex,WeightClassKg,Best3BenchKg,Place,Unknown\n\
                   A,M,93,140.5,1,x\n\
                   B,F,120+,,DQ,y\n";
        let rows = decode_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].weight_class_kg, "93");
        assert_eq!(rows[0].best3_bench_kg, Some(140.5));
        assert_eq!(rows[0].place, Some(1.0));
        assert_eq!(rows[1].weight_class_kg, "120+");
        assert_eq!(rows[1].best3_bench_kg, None);
        assert_eq!(rows[1].place, None);
    }

    #[test]
    fn json_records() {
        let json = br#"[{"Sex":"F","MaxLift":"Squat","Best3SquatKg":150,"Extra":[1]}]"#;
        let rows = decode_json(json).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sex, "F");
        assert_eq!(rows[0].best3_squat_kg, Some(150.0));
    }

    #[test]
    fn unknown_encoding_is_unsupported() {
        let err = decode(b"just some words".to_vec(), "mystery").unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_file_is_a_fetch_error() {
        let err = load_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Fetch { .. }));
        assert_eq!(err.kind(), crate::data::ErrorKind::DataUnavailable);
    }
}
