/// Errors while exporting or charting the table
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// I/O error writing the export file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV encoder error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// No row holds a number in both selected columns
    #[error("Table is empty or the selected columns hold no numbers")]
    NoPoints,

    /// Selected axis is not a column of the table
    #[error("No column at position {position} (table has {len} columns)")]
    AxisOutOfRange {
        /// Requested position
        position: usize,
        /// Number of columns
        len: usize,
    },
}
