use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;

use crate::table::MeasurementTable;

use super::error::ExportError;

/// UTF-8 byte-order mark written ahead of the CSV so spreadsheets pick the
/// right encoding
pub const BOM: &str = "\u{FEFF}";

/// Write the table as CSV: a BOM, the column labels, then every row's cell text
/// in column order.
pub fn write_csv<W: Write>(table: &MeasurementTable, mut writer: W) -> Result<(), ExportError> {
    writer.write_all(BOM.as_bytes())?;

    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(writer);

    csv_writer.write_record(table.schema().labels())?;
    for row in table.rows() {
        csv_writer.write_record(row.cells())?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// CSV export as a string, BOM included
pub fn to_csv_string(table: &MeasurementTable) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| ExportError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// File name for an export taken at `at`, e.g.
/// `measurements_2024-03-05T14-02-09.csv`
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("measurements_{}.csv", at.format("%Y-%m-%dT%H-%M-%S"))
}

/// Write the table to a timestamped CSV file inside `dir`
pub fn export_to_dir(
    table: &MeasurementTable,
    dir: &Path,
    at: DateTime<Utc>,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(export_file_name(at));
    let file = File::create(&path)?;
    write_csv(table, BufWriter::new(file))?;
    info!("Exported {} rows to {}", table.len(), path.display());
    Ok(path)
}
