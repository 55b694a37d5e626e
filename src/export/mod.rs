//! # Export and Chart Adapters
//!
//! Read-only views over the [`MeasurementTable`](crate::table::MeasurementTable):
//!
//! - CSV export: BOM, one header line of column labels, then the literal cell
//!   text of every row. Files are named `measurements_<UTC timestamp>.csv`.
//! - Chart projection: two columns parsed as numbers into a [`PointSeries`];
//!   rows without a number in both columns are skipped.
//! - [`AxisSelection`]: the X/Y picker, kept in step with the column schema.

mod chart;
mod csv_export;
mod error;


pub use chart::{project, AxisSelection, PointSeries};
pub use csv_export::{export_file_name, export_to_dir, to_csv_string, write_csv, BOM};
pub use error::ExportError;
