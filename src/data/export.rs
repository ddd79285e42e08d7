use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use super::model::{Column, StructureTable};

/// Arrow schema for the source columns (derived columns are recomputed on load).
pub fn schema() -> Schema {
    Schema::new(
        Column::SOURCE
            .iter()
            .map(|c| {
                let data_type = match c {
                    Column::Year => DataType::Int64,
                    c if c.is_numeric() => DataType::Float64,
                    _ => DataType::Utf8,
                };
                Field::new(c.header(), data_type, false)
            })
            .collect::<Vec<_>>(),
    )
}

/// Convert the table to a single record batch.
pub fn to_record_batch(table: &StructureTable) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = Column::SOURCE
        .iter()
        .map(|&c| -> ArrayRef {
            match c {
                Column::Year => {
                    Arc::new(Int64Array::from_iter_values(table.iter().map(|s| s.year))) as ArrayRef
                }
                c if c.is_numeric() => Arc::new(Float64Array::from_iter_values(
                    table.iter().filter_map(|s| s.number(c)),
                )) as ArrayRef,
                c => Arc::new(StringArray::from_iter_values(
                    table.iter().map(|s| s.value(c).to_string()),
                )) as ArrayRef,
            }
        })
        .collect();

    RecordBatch::try_new(Arc::new(schema()), columns).context("building record batch")
}

/// Write the table to a Parquet file.
pub fn write_parquet(table: &StructureTable, path: &Path) -> Result<()> {
    let batch = to_record_batch(table)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    log::info!("Wrote {} structures to {}", table.len(), path.display());
    Ok(())
}
