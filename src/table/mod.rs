//! # Measurement Table
//!
//! The dynamic, typed table that holds recorded measurements.
//!
//! - [`ColumnSchema`]: ordered [`ColumnSpec`]s, each a [`ColumnKind`] plus a label.
//! - [`MeasurementTable`]: rows of rendered cell text kept positionally aligned
//!   with the schema, plus the session clock behind the time column.
//! - [`Sample`]: one snapshot of the rig resolved into every column kind's value.
//! - [`AutoRecorder`]: the `Stopped ⇄ Running` auto-record state machine.
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use wheatstone::table::{MeasurementTable, Sample};
//!
//! let mut table = MeasurementTable::new(Instant::now());
//! let sample = Sample::take(Duration::from_millis(1500), 2.0, 0.01, 400, 0.0);
//! table.record(&sample);
//!
//! let row = table.last_row().unwrap();
//! assert_eq!(row.cells(), ["1.50", "10.00mV", "400", "8.0000", ""]);
//! ```

mod auto_record;
mod error;
mod rows;
mod schema;


pub use auto_record::{AutoRecordControls, AutoRecordState, AutoRecorder, MIN_INTERVAL_SECS};
pub use error::TableError;
pub use rows::{MeasurementTable, Row, Sample};
pub use schema::{ColumnKind, ColumnSchema, ColumnSpec};
