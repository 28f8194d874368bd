use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Float32Type, Float64Type, Int32Type, Int64Type,
};
use chrono::{NaiveDate, TimeDelta};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{columns, CellValue, Dataset, Record};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the PPP / thesis table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the sheet's column names
/// * `.json`    – `[{ "facultad": "...", "fecha_inicio_ppp": 44197, ... }, ...]`
/// * `.parquet` – one flat scalar column per sheet column
///
/// Workbooks (`.xlsx`) are exported to one of these first.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path)?,
        "json" => load_json(path)?,
        "csv" => load_csv(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let dataset = Dataset::from_records(records);
    log::info!("Loaded {} records from {}", dataset.len(), path.display());
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the shape a sheet-to-JSON export produces:
///
/// ```json
/// [
///   {
///     "hizo_ppp": "Sí",
///     "facultad": "Ingeniería",
///     "fecha_inicio_ppp": 44197,
///     "calificacion_final": "N/A"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

pub fn parse_json(text: &str) -> Result<Vec<Record>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let obj = row
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            let cells: BTreeMap<String, CellValue> = obj
                .iter()
                .map(|(key, val)| (key.clone(), json_to_cell(val)))
                .collect();
            Ok(Record::from_row(cells))
        })
        .collect()
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => match n.as_f64() {
            Some(f) => CellValue::Number(f),
            None => CellValue::Text(n.to_string()),
        },
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per line.
/// Cells are typed by guessing, so serial dates arrive as numbers.
fn load_csv(path: &Path) -> Result<Vec<Record>> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    read_csv(reader)
}

pub fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<Record>> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;

        let cells: BTreeMap<String, CellValue> = headers
            .iter()
            .zip(row.iter())
            .map(|(name, value)| (name.clone(), csv_cell(name, value)))
            .collect();

        records.push(Record::from_row(cells));
    }

    Ok(records)
}

/// Only date and grade columns are typed; categorical codes such as `0101`
/// must not collapse into `101`.
fn csv_cell(column: &str, value: &str) -> CellValue {
    if columns::is_numeric(column) {
        CellValue::guess(value)
    } else if value.trim().is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per sheet column.
///
/// Strings, integers, floats, booleans and `Date32` are understood; other
/// column types are read as empty cells. Works with files written by
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for field in schema.fields() {
            if !is_supported(field.data_type()) {
                log::warn!(
                    "Column '{}' has unsupported type {:?}; its cells are read as empty",
                    field.name(),
                    field.data_type()
                );
            }
        }

        for row in 0..batch.num_rows() {
            let cells: BTreeMap<String, CellValue> = schema
                .fields()
                .iter()
                .zip(batch.columns())
                .map(|(field, col)| (field.name().clone(), extract_cell(col, row)))
                .collect();
            records.push(Record::from_row(cells));
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

fn is_supported(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Utf8
            | DataType::LargeUtf8
            | DataType::Int32
            | DataType::Int64
            | DataType::Float32
            | DataType::Float64
            | DataType::Boolean
            | DataType::Date32
    )
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Empty;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Number(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Int64 => CellValue::Number(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Float32 => {
            CellValue::Number(col.as_primitive::<Float32Type>().value(row) as f64)
        }
        DataType::Float64 => CellValue::Number(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        DataType::Date32 => {
            let days = col.as_primitive::<Date32Type>().value(row);
            unix_days_to_text(days)
        }
        _ => CellValue::Empty,
    }
}

/// Arrow `Date32` counts days since 1970-01-01; hand it on as ISO text.
fn unix_days_to_text(days: i32) -> CellValue {
    NaiveDate::from_ymd_opt(1970, 1, 1)
        .and_then(|epoch| epoch.checked_add_signed(TimeDelta::try_days(days.into())?))
        .map(|d| CellValue::Text(d.format("%Y-%m-%d").to_string()))
        .unwrap_or_default()
}
