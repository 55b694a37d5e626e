//! # Formula Engine
//!
//! Pure functions turning a bridge reading into a derived resistance change (ΔR).
//!
//! The rig is a quarter bridge: an excitation voltage `Us` drives the bridge, the
//! voltmeter reports the differential bridge voltage `Ug`, and the resistance box
//! supplies the arm resistance `R0`. Two estimates of ΔR are offered:
//!
//! | Formula | Expression | Degenerate when |
//! |---------|------------|-----------------|
//! | [`Formula::Linear`] | `4·R0·Ug / Us` | never |
//! | [`Formula::Exact`]  | `4·Ug·R0 / (Us − 2·Ug)` | `|Us − 2·Ug| < 1e-4` |
//!
//! A degenerate exact result is the [`DerivedValue::Err`] sentinel, rendered as the
//! literal text `Err`. It is never a number, so it can not leak into a chart.
//!
//! Displayed values are `formula − offset`, computed in full `f64` precision and
//! rounded to four decimals only when rendered.

mod number;
mod voltage;

#[cfg(test)]
mod tests;

use std::fmt;

pub use number::{parse_integer, parse_number};
pub use voltage::{format_voltage, format_voltage_cell, NO_READING};

/// Excitation voltage used whenever the configured value is absent, zero,
/// negative or not a number. Shared by manual recording, auto recording and
/// the live read-out.
pub const DEFAULT_EXCITATION_VOLTS: f64 = 2.0;

/// Below this magnitude the exact formula's denominator is treated as zero.
pub const DENOMINATOR_EPSILON: f64 = 1e-4;

/// Rendered text of a degenerate derived value.
pub const ERROR_SENTINEL: &str = "Err";

/// Decimal places used when rendering derived values.
pub const DERIVED_DECIMALS: usize = 4;

/// Linearised ΔR estimate: `4·R0·Ug / Us`.
pub fn linear(excitation: f64, measured: f64, resistance: f64) -> f64 {
    4.0 * resistance * measured / excitation
}

/// Exact ΔR: `4·Ug·R0 / (Us − 2·Ug)`, or `None` when the denominator vanishes.
pub fn exact(excitation: f64, measured: f64, resistance: f64) -> Option<f64> {
    let denominator = excitation - 2.0 * measured;
    if denominator.abs() < DENOMINATOR_EPSILON {
        None
    } else {
        Some(4.0 * measured * resistance / denominator)
    }
}

/// Resolve the user-supplied excitation voltage text.
///
/// Falls back to [`DEFAULT_EXCITATION_VOLTS`] when the input is missing, does not
/// parse, is not finite, or is not strictly positive.
pub fn resolve_excitation(input: Option<&str>) -> f64 {
    input
        .and_then(parse_number)
        .filter(|volts| *volts > 0.0)
        .unwrap_or(DEFAULT_EXCITATION_VOLTS)
}

/// One bridge reading: everything a formula needs except the calibration offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BridgeReading {
    /// Excitation voltage `Us` in volts
    pub excitation: f64,
    /// Measured bridge voltage `Ug` in volts (signed)
    pub measured: f64,
    /// Arm resistance `R0` in ohms
    pub resistance: f64,
}

impl BridgeReading {
    /// Create a reading from its three inputs
    pub fn new(excitation: f64, measured: f64, resistance: f64) -> Self {
        Self {
            excitation,
            measured,
            resistance,
        }
    }
}

/// The two ΔR estimates a table column can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Formula {
    /// `4·Ug·R0 / (Us − 2·Ug)`
    Exact,
    /// `4·R0·Ug / Us`
    Linear,
}

impl Formula {
    /// Raw formula output, before any calibration offset.
    pub fn raw(self, reading: &BridgeReading) -> Option<f64> {
        match self {
            Formula::Exact => exact(reading.excitation, reading.measured, reading.resistance),
            Formula::Linear => Some(linear(
                reading.excitation,
                reading.measured,
                reading.resistance,
            )),
        }
    }

    /// Evaluate the formula and subtract the calibration offset.
    pub fn evaluate(self, reading: &BridgeReading, offset: f64) -> DerivedValue {
        match self.raw(reading) {
            Some(value) => DerivedValue::Value(value - offset),
            None => DerivedValue::Err,
        }
    }
}

/// Result of a derived-quantity computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DerivedValue {
    /// Offset-corrected value at full precision
    Value(f64),
    /// The exact formula's denominator vanished
    Err,
}

impl DerivedValue {
    /// Numeric value, or `None` for the sentinel
    pub fn value(self) -> Option<f64> {
        match self {
            DerivedValue::Value(v) => Some(v),
            DerivedValue::Err => None,
        }
    }

    /// Whether this is the error sentinel
    pub fn is_err(self) -> bool {
        matches!(self, DerivedValue::Err)
    }
}

impl fmt::Display for DerivedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DerivedValue::Value(v) => write!(f, "{:.*}", DERIVED_DECIMALS, v),
            DerivedValue::Err => f.write_str(ERROR_SENTINEL),
        }
    }
}
