//! CSV output: expanded listings and the sample upload template.

use std::path::Path;

use csv::{QuoteStyle, WriterBuilder};

use crate::error::{ExportError, ExportResult};
use crate::models::{ListingSchema, Table};

/// Serialize `table` as comma-separated text with a header row.
///
/// Cells are quoted only when they need to be.
pub fn write_csv(table: &Table) -> ExportResult<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Finalize(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Write `table` to `path`, replacing any existing file.
pub fn write_csv_file(table: &Table, path: &Path) -> ExportResult<()> {
    let content = write_csv(table)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// One-row example sheet covering every column of `schema`.
pub fn sample_table(schema: &ListingSchema) -> Table {
    let row: Vec<String> = schema.fields.iter().map(|f| f.sample.clone()).collect();
    Table::new(schema.headers()).with_rows([row])
}

/// [`sample_table`] rendered as CSV.
pub fn sample_csv(schema: &ListingSchema) -> ExportResult<String> {
    write_csv(&sample_table(schema))
}
