//! # wheatstone - Bridge Measurement Rig Control Surface
//!
//! `wheatstone` is the client side of a quarter-bridge measurement rig. A backend
//! service owns two devices, a pin-switched resistance box and a wireless
//! voltmeter; this crate polls that backend, keeps a deterministic control
//! panel in sync with it and records measurements into a formula-driven table.
//!
//! ## Key Features
//!
//! - **Stale-poll-proof device state**: each device has an explicit
//!   `Idle → Connecting → Connected` link state, so a poll that arrives during a
//!   connect attempt never flashes the disconnected baseline.
//!
//! - **Typed, reconfigurable table**: columns carry a kind (time, voltage,
//!   resistance, exact ΔR, linear ΔR, free text). Columns can be inserted,
//!   deleted, retyped and renamed at any time and every row stays aligned.
//!
//! - **Tare support**: a cumulative calibration offset is subtracted from every
//!   later derived value and from the live read-out.
//!
//! - **Auto-record**: fixed-period sampling with an immediate first row.
//!
//! - **Export**: CSV with a byte-order mark, plus an X/Y point projection for
//!   charts.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Instant;
//! use wheatstone::device::StatusReport;
//! use wheatstone::session::{Controller, SessionConfig};
//!
//! let mut session = Controller::new(SessionConfig::default(), Instant::now());
//!
//! let report = StatusReport::from_json(r#"{
//!     "resistanceBox": {"connected": true, "pins": {"5": true}},
//!     "voltmeter": {"connected": true, "status": "ok", "voltage": 0.01, "isMeasuring": true}
//! }"#)?;
//! session.apply_poll(Ok(report));
//!
//! session.record_point(Instant::now());
//! let row = session.table().last_row().unwrap();
//! assert_eq!(row.cell(2), Some("400"));
//! assert_eq!(row.cell(3), Some("8.0000"));
//! # Ok::<(), serde_json::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`formula`]: exact and linear ΔR, voltage formatting, lenient number parsing
//! - [`calibration`]: the tare offset and the live read-out
//! - [`table`]: column schema, rows, sampling and the auto-record state machine
//! - [`device`]: status snapshots, link state machine, control panel, reconciler
//! - [`client`]: the [`Backend`](client::Backend) seam and its HTTP implementation
//! - [`export`]: CSV export, chart projection and axis picker
//! - [`session`]: the application controller and its event loop

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod calibration;
pub mod client;
pub mod device;
pub mod export;
pub mod formula;
pub mod session;
pub mod table;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::calibration::{CalibrationError, CalibrationStore};
    pub use crate::client::{Backend, BackendConfig, ClientError, Command, HttpBackend};
    pub use crate::device::{ControlPanel, Device, LinkState, Reconciler, StatusReport};
    pub use crate::export::{AxisSelection, ExportError, PointSeries};
    pub use crate::formula::{DerivedValue, Formula, DEFAULT_EXCITATION_VOLTS};
    pub use crate::session::{Action, Controller, EventLoop, Notice, SessionConfig, SessionError};
    pub use crate::table::{ColumnKind, ColumnSchema, ColumnSpec, MeasurementTable, TableError};
}
