use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, ArrayRef, AsArray, Float32Array, Float64Array, Int32Array, Int64Array,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use super::error::DataError;
use super::model::{Column, Structure, StructureTable};

/// Columns every source must provide. `Feet` is derived from `Metres` when
/// absent; `Type`, `Main use` and `Remarks` default to empty.
pub const REQUIRED_COLUMNS: [Column; 7] = [
    Column::Name,
    Column::Metres,
    Column::Year,
    Column::Country,
    Column::City,
    Column::Lat,
    Column::Lon,
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a structure table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one structure per line
/// * `.json`    – `[{ "Name": ..., "Metres": ..., ... }, ...]`
/// * `.parquet` – one structure per row, columns named like the CSV headers
pub fn load_file(path: &Path) -> std::result::Result<StructureTable, DataError> {
    let result = read_file(path).with_context(|| format!("loading {}", path.display()));
    finish(result)
}

/// Parse CSV text from any reader (header row required).
pub fn parse_csv<R: Read>(reader: R) -> std::result::Result<StructureTable, DataError> {
    finish(read_csv(csv::Reader::from_reader(reader)))
}

/// Parse records-oriented JSON text.
pub fn parse_json(text: &str) -> std::result::Result<StructureTable, DataError> {
    finish(read_json(text))
}

fn finish(result: Result<StructureTable>) -> std::result::Result<StructureTable, DataError> {
    match result {
        Ok(table) => {
            log::info!("Loaded {} structures", table.len());
            Ok(table)
        }
        Err(e) => {
            log::error!("Failed to load structures: {e:#}");
            Err(DataError::Load(e))
        }
    }
}

fn read_file(path: &Path) -> Result<StructureTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            read_json(&text)
        }
        "csv" => read_csv(csv::Reader::from_path(path).context("opening CSV")?),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Raw record shared by every format
// ---------------------------------------------------------------------------

/// One source row before validation. Field names are the canonical headers.
#[derive(Debug, Clone, Deserialize)]
struct RawStructure {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Metres")]
    metres: f64,
    #[serde(rename = "Feet", default)]
    feet: Option<f64>,
    /// Spreadsheet exports sometimes write years as `1974.0`.
    #[serde(rename = "Year")]
    year: f64,
    #[serde(rename = "Type", default)]
    kind: Option<String>,
    #[serde(rename = "Main use", default)]
    main_use: Option<String>,
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "Remarks", default)]
    remarks: Option<String>,
    #[serde(rename = "Lat")]
    lat: f64,
    #[serde(rename = "Lon")]
    lon: f64,
}

impl RawStructure {
    /// Validate one row. `row` is 1-based, for error messages.
    fn into_structure(self, row: usize) -> Result<Structure> {
        let name = non_empty(self.name, row, Column::Name)?;
        let country = non_empty(self.country, row, Column::Country)?;
        let city = non_empty(self.city, row, Column::City)?;

        if !self.metres.is_finite() || self.metres < 0.0 {
            bail!("Row {row}: invalid height {} m", self.metres);
        }
        if self.year.fract() != 0.0 || !self.year.is_finite() {
            bail!("Row {row}: year {} is not a whole number", self.year);
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            bail!("Row {row}: latitude {} is outside [-90, 90]", self.lat);
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            bail!("Row {row}: longitude {} is outside [-180, 180]", self.lon);
        }

        let mut structure = Structure::new(
            name,
            self.metres,
            self.year as i64,
            country,
            city,
            self.lat,
            self.lon,
        )
        .with_type(self.kind.unwrap_or_default().trim())
        .with_use(self.main_use.unwrap_or_default().trim())
        .with_remarks(self.remarks.unwrap_or_default().trim());

        if let Some(feet) = self.feet {
            if !feet.is_finite() || feet < 0.0 {
                bail!("Row {row}: invalid height {feet} ft");
            }
            structure = structure.with_feet(feet);
        }
        Ok(structure)
    }
}

fn non_empty(value: String, row: usize, column: Column) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("Row {row}: '{column}' is empty");
    }
    Ok(trimmed.to_string())
}

/// Map a source header to its canonical name; unknown headers pass through
/// unchanged and are ignored by deserialization.
fn canonical_header(header: &str) -> String {
    header
        .parse::<Column>()
        .map(|c| c.header().to_string())
        .unwrap_or_else(|_| header.to_string())
}

fn check_required<'a>(headers: impl IntoIterator<Item = &'a str>, source: &str) -> Result<()> {
    let present: BTreeSet<Column> = headers
        .into_iter()
        .filter_map(|h| h.parse::<Column>().ok())
        .collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !present.contains(c))
        .map(|c| c.header())
        .collect();
    if !missing.is_empty() {
        bail!("{source} missing required column(s): {}", missing.join(", "));
    }
    Ok(())
}

fn build_table(raws: impl IntoIterator<Item = Result<RawStructure>>) -> Result<StructureTable> {
    let structures = raws
        .into_iter()
        .enumerate()
        .map(|(i, raw)| raw?.into_structure(i + 1))
        .collect::<Result<Vec<_>>>()?;
    Ok(StructureTable::from_structures(structures))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names (case-insensitive), then one
/// structure per line.
fn read_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<StructureTable> {
    let headers = reader.headers().context("reading CSV headers")?.clone();
    check_required(headers.iter(), "CSV")?;

    let canonical: csv::StringRecord = headers.iter().map(canonical_header).collect();
    reader.set_headers(canonical);

    build_table(
        reader
            .deserialize::<RawStructure>()
            .enumerate()
            .map(|(i, r)| r.with_context(|| format!("CSV row {}", i + 1))),
    )
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `to_json(orient='records')`):
///
/// ```json
/// [
///   { "Name": "CN Tower", "Metres": 553, "Feet": 1815, "Year": 1976, ... },
///   ...
/// ]
/// ```
fn read_json(text: &str) -> Result<StructureTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    build_table(records.iter().enumerate().map(|(i, rec)| {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {} is not a JSON object", i + 1))?;
        check_required(obj.keys().map(String::as_str), &format!("JSON row {}", i + 1))?;

        let normalized: Map<String, JsonValue> = obj
            .iter()
            .map(|(k, v)| (canonical_header(k), v.clone()))
            .collect();
        serde_json::from_value(JsonValue::Object(normalized))
            .with_context(|| format!("JSON row {}", i + 1))
    }))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of structures.
///
/// Numeric columns may be Int32, Int64, Float32 or Float64; text columns
/// Utf8 or LargeUtf8. Nulls are allowed only in optional columns.
fn load_parquet(path: &Path) -> Result<StructureTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    // A file with zero row groups yields no batches, so check the schema here.
    check_required(
        builder.schema().fields().iter().map(|f| f.name().as_str()),
        "Parquet file",
    )?;
    let reader = builder.build().context("building parquet reader")?;

    let mut raws: Vec<RawStructure> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let name = required_column(&batch, Column::Name)?;
        let metres = required_column(&batch, Column::Metres)?;
        let year = required_column(&batch, Column::Year)?;
        let country = required_column(&batch, Column::Country)?;
        let city = required_column(&batch, Column::City)?;
        let lat = required_column(&batch, Column::Lat)?;
        let lon = required_column(&batch, Column::Lon)?;
        let feet = find_column(&batch, Column::Feet);
        let kind = find_column(&batch, Column::Type);
        let main_use = find_column(&batch, Column::MainUse);
        let remarks = find_column(&batch, Column::Remarks);

        for row in 0..batch.num_rows() {
            let row_no = raws.len() + 1;
            let need_f64 = |col: &ArrayRef, c: Column| -> Result<f64> {
                extract_f64(col, row)?.with_context(|| format!("Row {row_no}: '{c}' is null"))
            };
            let need_str = |col: &ArrayRef, c: Column| -> Result<String> {
                extract_string(col, row)?.with_context(|| format!("Row {row_no}: '{c}' is null"))
            };
            let optional_str = |col: Option<&ArrayRef>| -> Result<Option<String>> {
                Ok(col.map(|c| extract_string(c, row)).transpose()?.flatten())
            };

            raws.push(RawStructure {
                name: need_str(name, Column::Name)?,
                metres: need_f64(metres, Column::Metres)?,
                feet: feet.map(|c| extract_f64(c, row)).transpose()?.flatten(),
                year: need_f64(year, Column::Year)?,
                kind: optional_str(kind)?,
                main_use: optional_str(main_use)?,
                country: need_str(country, Column::Country)?,
                city: need_str(city, Column::City)?,
                remarks: optional_str(remarks)?,
                lat: need_f64(lat, Column::Lat)?,
                lon: need_f64(lon, Column::Lon)?,
            });
        }
    }

    build_table(raws.into_iter().map(Ok))
}

// -- Parquet / Arrow helpers --

fn find_column(batch: &RecordBatch, wanted: Column) -> Option<&ArrayRef> {
    batch
        .schema()
        .fields()
        .iter()
        .position(|f| f.name().parse::<Column>().ok() == Some(wanted))
        .map(|i| batch.column(i))
}

fn required_column(batch: &RecordBatch, wanted: Column) -> Result<&ArrayRef> {
    find_column(batch, wanted).with_context(|| format!("Parquet file missing '{wanted}' column"))
}

/// Read a numeric cell as `f64`; `Ok(None)` for null.
fn extract_f64(col: &ArrayRef, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .value(row),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .context("expected Float32Array")?
            .value(row) as f64,
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .value(row) as f64,
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .value(row) as f64,
        other => bail!("Expected a numeric column, got {other:?}"),
    };
    Ok(Some(value))
}

/// Read a text cell; `Ok(None)` for null.
fn extract_string(col: &ArrayRef, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        other => bail!("Expected a text column, got {other:?}"),
    };
    Ok(Some(value))
}
