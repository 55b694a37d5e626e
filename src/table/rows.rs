use std::time::{Duration, Instant};

use crate::formula::{format_voltage_cell, parse_number, BridgeReading, DerivedValue, Formula};

use super::error::TableError;
use super::schema::{ColumnKind, ColumnSchema, ColumnSpec};

/// Everything one sampled row needs, resolved once per sample.
///
/// Each [`ColumnKind`] then picks its rendered cell from the precomputed values,
/// so a row with two linear columns computes the formula once.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Time since the session started
    pub elapsed: Duration,
    /// Bridge voltage in volts
    pub voltage: f64,
    /// Resistance-box total in ohms
    pub resistance: u32,
    /// Offset-corrected exact ΔR
    pub exact: DerivedValue,
    /// Offset-corrected linear ΔR
    pub linear: DerivedValue,
}

impl Sample {
    /// Compute a sample from the latest readings and the current offset
    pub fn take(
        elapsed: Duration,
        excitation: f64,
        voltage: f64,
        resistance: u32,
        offset: f64,
    ) -> Self {
        let reading = BridgeReading::new(excitation, voltage, f64::from(resistance));
        Self {
            elapsed,
            voltage,
            resistance,
            exact: Formula::Exact.evaluate(&reading, offset),
            linear: Formula::Linear.evaluate(&reading, offset),
        }
    }

    /// Rendered cell text for a column of `kind`
    pub fn cell(&self, kind: ColumnKind) -> String {
        match kind {
            ColumnKind::Time => format!("{:.2}", self.elapsed.as_secs_f64()),
            ColumnKind::Voltage => format_voltage_cell(Some(self.voltage)),
            ColumnKind::Resistance => self.resistance.to_string(),
            ColumnKind::DerivedExact => self.exact.to_string(),
            ColumnKind::DerivedLinear => self.linear.to_string(),
            ColumnKind::Custom => String::new(),
        }
    }
}

/// One table row: rendered cell texts positionally aligned with the schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<String>,
}

impl Row {
    /// Row from explicit cells
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Row of `width` empty cells
    pub fn empty(width: usize) -> Self {
        Self {
            cells: vec![String::new(); width],
        }
    }

    /// All cells in column order
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Cell text at `column`
    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Leading number of the cell at `column`, if any
    pub fn number(&self, column: usize) -> Option<f64> {
        self.cell(column).and_then(parse_number)
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// The measurement table: column schema, rows and the session clock.
///
/// Column insertion and deletion edit every row at the same position in the same
/// call, so rows always have exactly one cell per column.
#[derive(Debug, Clone)]
pub struct MeasurementTable {
    schema: ColumnSchema,
    rows: Vec<Row>,
    session_start: Instant,
}

impl MeasurementTable {
    /// Table with the default columns, session starting at `now`
    pub fn new(now: Instant) -> Self {
        Self::with_schema(ColumnSchema::with_defaults(), now)
    }

    /// Empty table with the given columns
    pub fn with_schema(schema: ColumnSchema, now: Instant) -> Self {
        Self {
            schema,
            rows: Vec::new(),
            session_start: now,
        }
    }

    /// Column schema
    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    /// All rows in order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Row at `index`
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Most recently appended row
    pub fn last_row(&self) -> Option<&Row> {
        self.rows.last()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// When the current session started
    pub fn session_start(&self) -> Instant {
        self.session_start
    }

    /// Time since the session started
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.session_start)
    }

    /// Shape a sample into a row following the current column order
    pub fn sample_row(&self, sample: &Sample) -> Row {
        Row::new(self.schema.kinds().map(|kind| sample.cell(kind)).collect())
    }

    /// Append a sampled row; returns its index
    pub fn record(&mut self, sample: &Sample) -> usize {
        let row = self.sample_row(sample);
        self.push(row)
    }

    /// Append a row of empty cells; returns its index
    pub fn add_empty_row(&mut self) -> usize {
        let row = Row::empty(self.schema.len());
        self.push(row)
    }

    /// Remove one row
    pub fn delete_row(&mut self, index: usize) -> Result<Row, TableError> {
        if index >= self.rows.len() {
            return Err(TableError::RowOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        Ok(self.rows.remove(index))
    }

    /// Overwrite one cell's text
    pub fn edit_cell(
        &mut self,
        row: usize,
        column: usize,
        text: impl Into<String>,
    ) -> Result<(), TableError> {
        let len = self.rows.len();
        let width = self.schema.len();
        let target = self
            .rows
            .get_mut(row)
            .ok_or(TableError::RowOutOfRange { index: row, len })?;
        let cell = target
            .cells
            .get_mut(column)
            .ok_or(TableError::ColumnOutOfRange {
                position: column,
                len: width,
            })?;
        *cell = text.into();
        Ok(())
    }

    /// Drop every row and restart the session clock at `now`
    pub fn clear(&mut self, now: Instant) {
        self.rows.clear();
        self.session_start = now;
    }

    /// Insert a column at `position` (default: after the last column); every
    /// existing row gains an empty cell at that position. Returns the position.
    pub fn insert_column(
        &mut self,
        spec: ColumnSpec,
        position: Option<usize>,
    ) -> Result<usize, TableError> {
        let position = position.unwrap_or(self.schema.len());
        self.schema.insert(position, spec)?;
        for row in &mut self.rows {
            let at = position.min(row.cells.len());
            row.cells.insert(at, String::new());
        }
        Ok(position)
    }

    /// Remove the column at `position` and its cell from every row
    pub fn delete_column(&mut self, position: usize) -> Result<ColumnSpec, TableError> {
        let spec = self.schema.remove(position)?;
        for row in &mut self.rows {
            if position < row.cells.len() {
                row.cells.remove(position);
            }
        }
        Ok(spec)
    }

    /// Change a column's kind (label reset to the kind's default)
    pub fn retype_column(&mut self, position: usize, kind: ColumnKind) -> Result<(), TableError> {
        self.schema.retype(position, kind)
    }

    /// Change a column's label
    pub fn rename_column(
        &mut self,
        position: usize,
        label: impl Into<String>,
    ) -> Result<(), TableError> {
        self.schema.rename(position, label)
    }

    fn push(&mut self, row: Row) -> usize {
        self.rows.push(row);
        self.rows.len() - 1
    }
}
