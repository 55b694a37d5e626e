use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Resistor weight, in ohms, switched in by each digital pin of the box
pub const PIN_WEIGHTS: [(u8, u32); 5] = [(2, 50), (3, 100), (4, 200), (5, 400), (6, 800)];

/// Largest resistance the box can switch in (all pins on)
pub const MAX_RESISTANCE: u32 = 1550;

/// Ohms contributed by `pin`; unknown pins contribute nothing
pub fn pin_weight(pin: u8) -> u32 {
    PIN_WEIGHTS
        .iter()
        .find(|(p, _)| *p == pin)
        .map(|(_, ohms)| *ohms)
        .unwrap_or(0)
}

/// Whether `pin` drives a resistor of the box
pub fn is_known_pin(pin: u8) -> bool {
    PIN_WEIGHTS.iter().any(|(p, _)| *p == pin)
}

/// Sum of the weights of every pin that is on
pub fn total_resistance(pins: &BTreeMap<u8, bool>) -> u32 {
    pins.iter()
        .filter(|(_, on)| **on)
        .map(|(pin, _)| pin_weight(*pin))
        .sum()
}

/// Polled state of the resistance box. Replaced whole on every poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResistanceBoxSnapshot {
    /// Whether the backend holds an open connection to the box
    pub connected: bool,
    /// On/off state per pin; keys that are not pin numbers are dropped
    #[serde(default, deserialize_with = "numbered_pins")]
    pub pins: BTreeMap<u8, bool>,
    /// Serial port the backend uses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    /// Last backend-side error text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResistanceBoxSnapshot {
    /// Total switched-in resistance in ohms
    pub fn total_resistance(&self) -> u32 {
        total_resistance(&self.pins)
    }
}

/// Polled state of the wireless voltmeter. Replaced whole on every poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoltmeterSnapshot {
    /// Whether the backend holds an open connection to the meter
    pub connected: bool,
    /// Backend status text
    #[serde(rename = "status", default)]
    pub status_text: String,
    /// Latest bridge voltage in volts
    #[serde(default, deserialize_with = "null_as_zero")]
    pub voltage: f64,
    /// Whether the meter is streaming measurements
    #[serde(rename = "isMeasuring", alias = "is_measuring", default)]
    pub is_measuring: bool,
    /// Active measurement range index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_idx: Option<u8>,
}

/// One `GET status` document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Resistance box state
    #[serde(rename = "resistanceBox", alias = "arduino")]
    pub resistance_box: ResistanceBoxSnapshot,
    /// Voltmeter state
    #[serde(alias = "ble")]
    pub voltmeter: VoltmeterSnapshot,
}

impl StatusReport {
    /// Decode a status document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn numbered_pins<'de, D>(deserializer: D) -> Result<BTreeMap<u8, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, bool>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, on)| key.trim().parse::<u8>().ok().map(|pin| (pin, on)))
        .collect())
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}
