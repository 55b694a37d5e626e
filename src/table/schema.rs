use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::formula::Formula;

use super::error::TableError;

/// Semantic type of a table column.
///
/// The kind decides both the column's default label and what a sampled row
/// writes into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Seconds since the session started
    Time,
    /// Latest voltmeter reading
    Voltage,
    /// Latest resistance-box total in ohms
    Resistance,
    /// ΔR from the exact bridge formula
    DerivedExact,
    /// ΔR from the linearised bridge formula
    DerivedLinear,
    /// Free text, filled in by hand
    Custom,
}

impl ColumnKind {
    /// Every kind, in picker order
    pub const ALL: [ColumnKind; 6] = [
        ColumnKind::Time,
        ColumnKind::Voltage,
        ColumnKind::Resistance,
        ColumnKind::DerivedExact,
        ColumnKind::DerivedLinear,
        ColumnKind::Custom,
    ];

    /// Label a column of this kind gets when created or retyped
    pub fn default_label(self) -> &'static str {
        match self {
            ColumnKind::Time => "Time (s)",
            ColumnKind::Voltage => "Voltage (V)",
            ColumnKind::Resistance => "R0 (Ω)",
            ColumnKind::DerivedExact => "ΔR (exact)",
            ColumnKind::DerivedLinear => "ΔR (linear)",
            ColumnKind::Custom => "",
        }
    }

    /// Formula computed by a derived column
    pub fn formula(self) -> Option<Formula> {
        match self {
            ColumnKind::DerivedExact => Some(Formula::Exact),
            ColumnKind::DerivedLinear => Some(Formula::Linear),
            _ => None,
        }
    }

    /// Whether this kind holds a ΔR value
    pub fn is_derived(self) -> bool {
        self.formula().is_some()
    }

    /// Short machine name, as accepted by [`FromStr`]
    pub fn name(self) -> &'static str {
        match self {
            ColumnKind::Time => "time",
            ColumnKind::Voltage => "voltage",
            ColumnKind::Resistance => "resistance",
            ColumnKind::DerivedExact => "exact",
            ColumnKind::DerivedLinear => "linear",
            ColumnKind::Custom => "custom",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColumnKind {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "time" => Ok(ColumnKind::Time),
            "voltage" => Ok(ColumnKind::Voltage),
            "resistance" | "r0" => Ok(ColumnKind::Resistance),
            "exact" | "derived_exact" | "calc_strict" => Ok(ColumnKind::DerivedExact),
            "linear" | "derived_linear" | "calc_linear" => Ok(ColumnKind::DerivedLinear),
            "custom" => Ok(ColumnKind::Custom),
            other => Err(TableError::UnknownKind(other.to_string())),
        }
    }
}

/// One column of the table: its kind and its (user-editable) label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Semantic type
    pub kind: ColumnKind,
    /// Header text
    pub label: String,
}

impl ColumnSpec {
    /// Column with an explicit label
    pub fn new(kind: ColumnKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
        }
    }

    /// Column labelled with its kind's default label
    pub fn of_kind(kind: ColumnKind) -> Self {
        Self::new(kind, kind.default_label())
    }
}

/// Ordered column layout of the measurement table.
///
/// Order is significant: it is the row layout, the CSV header order and the
/// index space of the chart axis picker. Row-shape changes go through
/// [`MeasurementTable`](super::MeasurementTable), which keeps every row aligned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    columns: Vec<ColumnSpec>,
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ColumnSchema {
    /// Schema without any column
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// The five startup columns: time, voltage, R0, linear ΔR and a notes column
    pub fn with_defaults() -> Self {
        Self {
            columns: vec![
                ColumnSpec::of_kind(ColumnKind::Time),
                ColumnSpec::of_kind(ColumnKind::Voltage),
                ColumnSpec::of_kind(ColumnKind::Resistance),
                ColumnSpec::of_kind(ColumnKind::DerivedLinear),
                ColumnSpec::new(ColumnKind::Custom, "Notes"),
            ],
        }
    }

    /// Build a schema from explicit columns
    pub fn from_columns(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    /// Number of data columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether there are no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// All columns in order
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Column at `position`
    pub fn get(&self, position: usize) -> Option<&ColumnSpec> {
        self.columns.get(position)
    }

    /// Column kinds in order
    pub fn kinds(&self) -> impl Iterator<Item = ColumnKind> + '_ {
        self.columns.iter().map(|c| c.kind)
    }

    /// Column labels in order
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|c| c.label.as_str())
    }

    /// Column used by calibration: the first exact ΔR column, else the first
    /// linear ΔR column.
    pub fn calibration_column(&self) -> Option<usize> {
        self.position_of(ColumnKind::DerivedExact)
            .or_else(|| self.position_of(ColumnKind::DerivedLinear))
    }

    /// First position holding `kind`
    pub fn position_of(&self, kind: ColumnKind) -> Option<usize> {
        self.columns.iter().position(|c| c.kind == kind)
    }

    /// Change a column's kind; the label is always replaced by the new kind's
    /// default label.
    pub fn retype(&mut self, position: usize, kind: ColumnKind) -> Result<(), TableError> {
        let column = self.get_mut(position)?;
        column.kind = kind;
        column.label = kind.default_label().to_string();
        Ok(())
    }

    /// Replace a column's label
    pub fn rename(&mut self, position: usize, label: impl Into<String>) -> Result<(), TableError> {
        self.get_mut(position)?.label = label.into();
        Ok(())
    }

    pub(crate) fn insert(&mut self, position: usize, spec: ColumnSpec) -> Result<(), TableError> {
        if position > self.columns.len() {
            return Err(TableError::ColumnOutOfRange {
                position,
                len: self.columns.len(),
            });
        }
        self.columns.insert(position, spec);
        Ok(())
    }

    pub(crate) fn remove(&mut self, position: usize) -> Result<ColumnSpec, TableError> {
        self.check(position)?;
        Ok(self.columns.remove(position))
    }

    fn get_mut(&mut self, position: usize) -> Result<&mut ColumnSpec, TableError> {
        self.check(position)?;
        Ok(&mut self.columns[position])
    }

    fn check(&self, position: usize) -> Result<(), TableError> {
        if position < self.columns.len() {
            Ok(())
        } else {
            Err(TableError::ColumnOutOfRange {
                position,
                len: self.columns.len(),
            })
        }
    }
}
