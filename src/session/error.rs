use crate::calibration::CalibrationError;
use crate::client::ClientError;
use crate::device::Device;
use crate::export::ExportError;
use crate::table::TableError;

/// Anything a user action can fail with. Every variant is recoverable: retry
/// the action or wait for the next poll.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Bad user input
    #[error("{0}")]
    Validation(String),

    /// The control behind the action is currently disabled
    #[error("{0} is not available right now")]
    Disabled(&'static str),

    /// The action needs a connected device
    #[error("{0} is not connected")]
    NotConnected(Device),

    /// The backend replied `status: error`
    #[error("{command} rejected: {message}")]
    Rejected {
        /// Command that was refused
        command: String,
        /// Backend message
        message: String,
    },

    /// Table edit failed
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// Calibration could not be applied
    #[error("Calibration failed: {0}")]
    Calibration(#[from] CalibrationError),

    /// Backend request failed
    #[error("Backend error: {0}")]
    Client(#[from] ClientError),

    /// Export or chart projection failed
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}
