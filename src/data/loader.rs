use std::path::Path;

use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::RawRecord;

/// Why a layout sheet could not be decoded. Any of these aborts the whole load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("malformed input: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Decode a layout sheet into raw text rows.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one layout per line (recommended)
/// * `.json`    – `[{ "Type": "...", "BUA (in sqft)": "...", ... }, ...]`
/// * `.parquet` – any column types; every cell is read back as text
pub fn load_file(path: &Path) -> Result<Vec<RawRecord>, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }?;

    log::info!("Decoded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn clean_header(h: &str) -> String {
    h.trim_start_matches('\u{feff}').trim().to_string()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row with column names; cells are kept verbatim, including
/// quoted thousands separators (`"12,500"`). Short rows are accepted.
fn load_csv(path: &Path) -> Result<Vec<RawRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(clean_header).collect();

    let mut rows: Vec<RawRecord> = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.as_str(), v))
                .collect(),
        );
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Type": "Beach Villa", "Config": "5 Bed", "BUA (in sqft)": "7,500" },
///   ...
/// ]
/// ```
///
/// Numbers and booleans are kept as their text form; `null` is a missing cell.
fn load_json(path: &Path) -> Result<Vec<RawRecord>, LoadError> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root
        .as_array()
        .ok_or_else(|| LoadError::Malformed("expected a top-level JSON array".into()))?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let obj = rec
                .as_object()
                .ok_or_else(|| LoadError::Malformed(format!("row {i} is not a JSON object")))?;
            let record: RawRecord = obj
                .iter()
                .filter_map(|(key, val)| Some((clean_header(key), json_cell(val)?)))
                .collect();
            Ok(record)
        })
        .collect()
}

fn json_cell(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet export of the sheet. Columns of any primitive type are cast
/// to text; null cells are treated as missing.
fn load_parquet(path: &Path) -> Result<Vec<RawRecord>, LoadError> {
    let file = std::fs::File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let mut text_columns = Vec::with_capacity(batch.num_columns());
        for (field, col) in schema.fields().iter().zip(batch.columns()) {
            let as_text = cast(col, &DataType::Utf8)?;
            text_columns.push((clean_header(field.name()), as_text));
        }

        for row in 0..batch.num_rows() {
            let mut record = RawRecord::new();
            for (name, col) in &text_columns {
                let strings = col.as_string_opt::<i32>().ok_or_else(|| {
                    LoadError::Malformed(format!("column '{name}' could not be read as text"))
                })?;
                if !strings.is_null(row) {
                    record.insert(name.clone(), strings.value(row));
                }
            }
            rows.push(record);
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::model::columns;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn csv_keeps_quoted_separators_and_short_rows() {
        let file = write_temp(
            ".csv",
            "\u{feff}Type, Layout Name ,BUA (in sqft),Launched Price (in AED)\n\
             Beach Villa,B-1,\"7,500\",18.5M\n\
             Plots,P-1\n\
             \n\
             ,orphan,1,1\n",
        );

        let rows = load_file(file.path()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get(columns::TYPE), Some("Beach Villa"));
        assert_eq!(rows[0].get(columns::LAYOUT_NAME), Some("B-1"));
        assert_eq!(rows[0].get(columns::BUA), Some("7,500"));
        assert_eq!(rows[1].get(columns::BUA), None);
        // Blank-Type rows are decoded; ingestion drops them later.
        assert_eq!(rows[2].get(columns::TYPE), Some(""));
    }

    #[test]
    fn json_records_become_text_cells() {
        let file = write_temp(
            ".json",
            r#"[{"Type": "Villa", "BUA (in sqft)": 4200, "Factors": null, "Config": "4 Bed"}]"#,
        );

        let rows = load_file(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(columns::BUA), Some("4200"));
        assert_eq!(rows[0].get(columns::FACTORS), None);
        assert_eq!(rows[0].get(columns::CONFIG), Some("4 Bed"));
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        let file = write_temp(".json", r#"{"Type": "Villa"}"#);
        assert!(matches!(load_file(file.path()), Err(LoadError::Malformed(_))));

        let file = write_temp(".json", r#"[1, 2]"#);
        assert!(matches!(load_file(file.path()), Err(LoadError::Malformed(_))));
    }

    #[test]
    fn parquet_columns_are_read_as_text() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(columns::TYPE, DataType::Utf8, false),
            Field::new(columns::BUA, DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Villa", "Plots"])),
                Arc::new(Float64Array::from(vec![Some(4200.5), None])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let rows = load_file(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(columns::TYPE), Some("Villa"));
        assert_eq!(rows[0].get(columns::BUA), Some("4200.5"));
        assert_eq!(rows[1].get(columns::BUA), None);
    }

    #[test]
    fn unknown_extension_and_missing_file_fail() {
        let err = load_file(Path::new("layouts.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "xlsx"));

        let err = load_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }
}
