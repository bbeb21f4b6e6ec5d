//! CSV export for report tables.

use std::io::Write;
use std::path::Path;

use crate::DeltasError;
use crate::report::tables::Table;

/// CSV exporter for summary and detail tables.
///
/// Spanning header cells are repeated once per covered column so every CSV
/// row has the same width.
#[derive(Debug, Clone, Default)]
pub struct CsvExporter;

impl CsvExporter {
    /// Create a new CsvExporter.
    pub fn new() -> Self {
        CsvExporter
    }

    /// Export tables to a CSV file, one after the other.
    ///
    /// # Errors
    /// Returns an error if file operations or CSV writing fails.
    pub fn export(&self, tables: &[&Table], output: &Path) -> Result<(), DeltasError> {
        // Ensure parent directory exists
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DeltasError::Message(format!("failed to create directory: {e}")))?;
            }
        }

        let file = std::fs::File::create(output)
            .map_err(|e| DeltasError::Message(format!("failed to create file: {e}")))?;

        self.export_to_writer(tables, file)
    }

    /// Export tables to any writer implementing Write.
    ///
    /// # Errors
    /// Returns an error if CSV writing fails.
    pub fn export_to_writer<W: Write>(&self, tables: &[&Table], writer: W) -> Result<(), DeltasError> {
        let mut csv_writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);

        for table in tables {
            for header_row in &table.header {
                csv_writer
                    .write_record(expand_header(header_row))
                    .map_err(|e| DeltasError::Message(format!("failed to write CSV headers: {e}")))?;
            }

            for row in &table.rows {
                csv_writer
                    .write_record(row)
                    .map_err(|e| DeltasError::Message(format!("failed to write CSV row: {e}")))?;
            }
        }

        csv_writer
            .flush()
            .map_err(|e| DeltasError::Message(format!("failed to flush CSV writer: {e}")))?;

        Ok(())
    }
}

fn expand_header(row: &[crate::report::tables::HeaderCell]) -> Vec<&str> {
    row.iter()
        .flat_map(|cell| std::iter::repeat_n(cell.text.as_str(), cell.span.max(1)))
        .collect()
}
