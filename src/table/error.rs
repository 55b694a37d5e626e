/// Errors raised by structural or sampling operations on the measurement table
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    /// Column position outside the schema
    #[error("Column {position} is out of range (table has {len} columns)")]
    ColumnOutOfRange {
        /// Requested position
        position: usize,
        /// Current column count
        len: usize,
    },

    /// Row index outside the table
    #[error("Row {index} is out of range (table has {len} rows)")]
    RowOutOfRange {
        /// Requested row index
        index: usize,
        /// Current row count
        len: usize,
    },

    /// Auto-record interval text did not parse or is below the minimum
    #[error("Interval must be a number of seconds >= {min} (got '{input}')")]
    InvalidInterval {
        /// Text the user entered
        input: String,
        /// Smallest accepted interval in seconds
        min: f64,
    },

    /// Auto-record start requested while a timer is already active
    #[error("Auto-record is already running")]
    AlreadyRunning,

    /// Unrecognised column kind name
    #[error("Unknown column kind '{0}'")]
    UnknownKind(String),
}
