//! Tare (calibration) offset for ΔR values.
//!
//! The offset is cumulative: each [`CalibrationStore::calibrate`] adds the ΔR
//! currently shown in the last row, so that reading becomes the new zero. It is
//! subtracted from every later table sample and from the live read-out, and only
//! goes back to zero when the table is cleared.

use log::info;

use crate::formula::{BridgeReading, Formula};
use crate::table::MeasurementTable;

/// Why a calibration could not be applied
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalibrationError {
    /// No row to read a baseline from
    #[error("Table is empty, record a point before calibrating")]
    EmptyTable,

    /// Neither an exact nor a linear ΔR column exists
    #[error("No ΔR column to calibrate against")]
    NoDerivedColumn,

    /// The baseline cell does not hold a finite number
    #[error("Cell in column {column} of the last row is not a number: '{text}'")]
    NotANumber {
        /// Column that was read
        column: usize,
        /// Its text
        text: String,
    },
}

/// Running tare offset for the current session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalibrationStore {
    offset: f64,
}

impl CalibrationStore {
    /// Store with a zero offset
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cumulative offset
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Add the last row's ΔR to the offset and return the applied delta.
    ///
    /// The first exact ΔR column is read; without one, the first linear ΔR column.
    /// On error the offset is left untouched.
    pub fn calibrate(&mut self, table: &MeasurementTable) -> Result<f64, CalibrationError> {
        let row = table.last_row().ok_or(CalibrationError::EmptyTable)?;
        let column = table
            .schema()
            .calibration_column()
            .ok_or(CalibrationError::NoDerivedColumn)?;
        let delta = row
            .number(column)
            .ok_or_else(|| CalibrationError::NotANumber {
                column,
                text: row.cell(column).unwrap_or_default().to_string(),
            })?;

        self.offset += delta;
        info!(
            "Calibrated: applied {:.4}, cumulative offset {:.4}",
            delta, self.offset
        );
        Ok(delta)
    }

    /// Zero the offset
    pub fn reset(&mut self) {
        self.offset = 0.0;
    }

    /// Live ΔR read-out: exact formula minus the offset, or `0.0` when the exact
    /// denominator vanishes.
    pub fn live_readout(&self, reading: &BridgeReading) -> f64 {
        Formula::Exact
            .evaluate(reading, self.offset)
            .value()
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::table::{ColumnKind, ColumnSchema, ColumnSpec, Sample};

    fn record(table: &mut MeasurementTable, store: &CalibrationStore, voltage: f64) {
        let sample = Sample::take(Duration::ZERO, 2.0, voltage, 400, store.offset());
        table.record(&sample);
    }

    #[test]
    fn test_calibrate_is_cumulative() {
        let mut table = MeasurementTable::new(Instant::now());
        let mut store = CalibrationStore::new();

        record(&mut table, &store, 0.01);
        let d1 = store.calibrate(&table).unwrap();
        assert!((d1 - 8.0).abs() < 1e-9);

        record(&mut table, &store, 0.02);
        // 16.0 - 8.0
        assert_eq!(table.last_row().unwrap().cell(3), Some("8.0000"));
        let d2 = store.calibrate(&table).unwrap();
        assert!((store.offset() - (d1 + d2)).abs() < 1e-9);

        record(&mut table, &store, 0.02);
        assert_eq!(table.last_row().unwrap().cell(3), Some("0.0000"));
    }

    #[test]
    fn test_calibrate_prefers_exact_column() {
        let mut table = MeasurementTable::new(Instant::now());
        table
            .insert_column(ColumnSpec::of_kind(ColumnKind::DerivedExact), None)
            .unwrap();
        let mut store = CalibrationStore::new();
        record(&mut table, &store, 0.01);

        let delta = store.calibrate(&table).unwrap();
        assert!((delta - 8.0808).abs() < 1e-9);
    }

    #[test]
    fn test_calibrate_errors_leave_offset() {
        let mut store = CalibrationStore::new();

        let table = MeasurementTable::new(Instant::now());
        assert_eq!(store.calibrate(&table), Err(CalibrationError::EmptyTable));

        let mut table = MeasurementTable::with_schema(
            ColumnSchema::from_columns(vec![ColumnSpec::of_kind(ColumnKind::Time)]),
            Instant::now(),
        );
        table.add_empty_row();
        assert_eq!(store.calibrate(&table), Err(CalibrationError::NoDerivedColumn));

        let mut table = MeasurementTable::with_schema(
            ColumnSchema::from_columns(vec![ColumnSpec::of_kind(ColumnKind::DerivedExact)]),
            Instant::now(),
        );
        record(&mut table, &store, 1.0);
        assert!(matches!(
            store.calibrate(&table),
            Err(CalibrationError::NotANumber { column: 0, .. })
        ));
        assert_eq!(store.offset(), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut table = MeasurementTable::new(Instant::now());
        let mut store = CalibrationStore::new();
        record(&mut table, &store, 0.01);
        store.calibrate(&table).unwrap();
        store.reset();
        assert_eq!(store.offset(), 0.0);
    }

    #[test]
    fn test_live_readout() {
        let mut store = CalibrationStore::new();
        let reading = BridgeReading::new(2.0, 0.01, 400.0);
        assert!((store.live_readout(&reading) - 8.080808).abs() < 1e-5);

        store.offset = 0.0808;
        assert!((store.live_readout(&reading) - 8.000008).abs() < 1e-5);

        let degenerate = BridgeReading::new(2.0, 1.0, 400.0);
        assert_eq!(store.live_readout(&degenerate), 0.0);
    }
}
