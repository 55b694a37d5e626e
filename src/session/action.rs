use std::path::PathBuf;
use std::time::Duration;

use crate::client::Command;
use crate::device::Device;
use crate::export::PointSeries;
use crate::table::ColumnKind;

use super::controller::View;
use super::error::SessionError;

/// One user interaction.
///
/// Free-text inputs are carried verbatim and validated by the
/// [`Controller`](super::Controller).
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Press a device's connect button
    Connect(Device),
    /// Start voltmeter measurement
    StartMeasuring,
    /// Stop voltmeter measurement
    StopMeasuring,
    /// Tare the voltmeter
    Tare,
    /// Select a voltmeter range
    SetRange(u8),
    /// Set the voltmeter sampling frequency (Hz, as typed)
    SetFrequency(String),
    /// Set the resistance box total (ohms, as typed)
    SetResistance(String),
    /// Flip one resistance-box pin
    TogglePin {
        /// Pin number
        pin: u8,
        /// New state
        on: bool,
    },
    /// Change the excitation voltage field
    SetExcitation(String),
    /// Record one row from the latest readings
    Record,
    /// Append a row of empty cells
    AddEmptyRow,
    /// Delete one row
    DeleteRow(usize),
    /// Overwrite one cell
    EditCell {
        /// Row index
        row: usize,
        /// Column position
        column: usize,
        /// New text
        text: String,
    },
    /// Add a column
    InsertColumn {
        /// Column kind
        kind: ColumnKind,
        /// Label; the kind's default when absent
        label: Option<String>,
        /// Position; after the last column when absent
        position: Option<usize>,
    },
    /// Delete a column and its cells
    DeleteColumn {
        /// Column position
        position: usize,
        /// Whether the user confirmed
        confirmed: bool,
    },
    /// Change a column's kind
    RetypeColumn {
        /// Column position
        position: usize,
        /// New kind
        kind: ColumnKind,
    },
    /// Change a column's label
    RenameColumn {
        /// Column position
        position: usize,
        /// New label
        label: String,
    },
    /// Remove every row and restart the session
    ClearTable {
        /// Whether the user confirmed
        confirmed: bool,
    },
    /// Tare the ΔR columns at the last row
    Calibrate,
    /// Start auto-recording (interval in seconds, as typed)
    StartAuto(String),
    /// Stop auto-recording
    StopAuto,
    /// Write the table to a CSV file
    Export,
    /// Project two columns into a chart; the current selection when absent
    DrawChart {
        /// X column
        x: Option<usize>,
        /// Y column
        y: Option<usize>,
    },
    /// End the session
    Quit,
}

/// Something the user should be told about
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// A row was appended; scroll it into view
    RowRecorded(usize),
    /// Calibration applied
    Calibrated {
        /// Delta just added
        delta: f64,
        /// Cumulative offset
        offset: f64,
    },
    /// CSV written
    Exported(PathBuf),
    /// A new chart replaced the previous one
    ChartDrawn(PointSeries),
    /// Auto-record started; the immediate first row is `row`
    AutoStarted {
        /// Timer period
        interval: Duration,
        /// Index of the first recorded row
        row: usize,
    },
    /// Auto-record stopped
    AutoStopped,
    /// Table cleared and session restarted
    TableCleared,
    /// The user declined a confirmation; nothing changed
    Declined,
}

/// What handling an [`Action`] produced
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Local state changed, nothing else to do
    Updated,
    /// Local state changed; send this command to the backend
    Send(Command),
    /// Local state changed; tell the user
    Notice(Notice),
    /// The session should end
    Quit,
}

/// Messages from the event loop to the front end
#[derive(Debug)]
pub enum Event {
    /// Something worth telling the user
    Notice(Notice),
    /// An action or command failed; show a blocking alert
    Alert(SessionError),
    /// State changed; redraw
    Refreshed(Box<View>),
}
