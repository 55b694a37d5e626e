use std::collections::BTreeMap;
use std::fmt;

use crate::formula::NO_READING;

use super::link::LinkState;
use super::snapshot::PIN_WEIGHTS;

/// Connect button caption for a link state
pub fn connect_label(device_name: &str, state: LinkState) -> String {
    match state {
        LinkState::Idle => format!("Connect {}", device_name),
        LinkState::Connecting => "Connecting...".to_string(),
        LinkState::Connected => format!("{} connected (click to reconnect)", device_name),
    }
}

/// Resistance-box half of the control panel
#[derive(Debug, Clone, PartialEq)]
pub struct ResistanceBoxPanel {
    /// Link state behind the connect button
    pub link: LinkState,
    /// Connect button enabled
    pub connect_enabled: bool,
    /// Status line text
    pub status_line: String,
    /// Resistance input, set button and pin toggles enabled
    pub controls_enabled: bool,
    /// Pin toggle states
    pub pins: BTreeMap<u8, bool>,
    /// Resistance read-out text
    pub resistance_display: String,
}

impl ResistanceBoxPanel {
    /// Panel with the box disconnected
    pub fn disconnected() -> Self {
        Self {
            link: LinkState::Idle,
            connect_enabled: true,
            status_line: "offline".to_string(),
            controls_enabled: false,
            pins: BTreeMap::new(),
            resistance_display: "0 Ω".to_string(),
        }
    }

    /// Revert to the disconnected baseline, keeping the last resistance read-out
    pub(crate) fn reset(&mut self, error: Option<&str>) {
        let display = std::mem::take(&mut self.resistance_display);
        *self = Self::disconnected();
        self.resistance_display = display;
        if let Some(error) = error.filter(|e| !e.is_empty()) {
            self.status_line = format!("offline ({})", error);
        }
    }

    /// Connect button caption
    pub fn connect_label(&self) -> String {
        connect_label("resistance box", self.link)
    }
}

/// Voltmeter half of the control panel
#[derive(Debug, Clone, PartialEq)]
pub struct VoltmeterPanel {
    /// Link state behind the connect button
    pub link: LinkState,
    /// Connect button enabled
    pub connect_enabled: bool,
    /// Backend status text
    pub status_text: String,
    /// Active range index reported by the backend
    pub range_idx: Option<u8>,
    /// Voltage read-out text
    pub voltage_display: String,
    /// Start button enabled
    pub start_enabled: bool,
    /// Stop button enabled
    pub stop_enabled: bool,
    /// Tare button enabled
    pub tare_enabled: bool,
    /// Range and frequency controls locked while measuring
    pub settings_locked: bool,
}

impl VoltmeterPanel {
    /// Panel with the meter disconnected
    pub fn disconnected() -> Self {
        Self {
            link: LinkState::Idle,
            connect_enabled: true,
            status_text: String::new(),
            range_idx: None,
            voltage_display: NO_READING.to_string(),
            start_enabled: false,
            stop_enabled: false,
            tare_enabled: false,
            settings_locked: false,
        }
    }

    /// Revert to the disconnected baseline, keeping backend-provided text
    pub(crate) fn reset(&mut self) {
        self.link = LinkState::Idle;
        self.connect_enabled = true;
        self.start_enabled = false;
        self.stop_enabled = false;
        self.tare_enabled = false;
    }

    /// Apply a measuring flag to the start/stop/tare buttons
    pub(crate) fn set_measuring(&mut self, measuring: bool) {
        self.start_enabled = !measuring;
        self.stop_enabled = measuring;
        self.tare_enabled = true;
    }

    /// Connect button caption
    pub fn connect_label(&self) -> String {
        connect_label("voltmeter", self.link)
    }
}

/// Everything the device side of the UI shows.
///
/// Rendering reads only this struct, so identical poll sequences always produce
/// identical screens.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPanel {
    /// Resistance box controls
    pub resistance_box: ResistanceBoxPanel,
    /// Voltmeter controls
    pub voltmeter: VoltmeterPanel,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            resistance_box: ResistanceBoxPanel::disconnected(),
            voltmeter: VoltmeterPanel::disconnected(),
        }
    }
}

fn flag(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

impl fmt::Display for ControlPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rb = &self.resistance_box;
        writeln!(f, "Resistance box")?;
        writeln!(
            f,
            "  [{}]{}",
            rb.connect_label(),
            if rb.connect_enabled { "" } else { " (busy)" }
        )?;
        writeln!(f, "  Status: {}", rb.status_line)?;
        writeln!(f, "  R0: {}", rb.resistance_display)?;
        let pins: Vec<String> = PIN_WEIGHTS
            .iter()
            .map(|(pin, ohms)| {
                let on = rb.pins.get(pin).copied().unwrap_or(false);
                format!("{}:{}Ω={}", pin, ohms, flag(on))
            })
            .collect();
        writeln!(
            f,
            "  Pins: {}{}",
            pins.join(" "),
            if rb.controls_enabled { "" } else { " (locked)" }
        )?;

        let vm = &self.voltmeter;
        writeln!(f, "Voltmeter")?;
        writeln!(
            f,
            "  [{}]{}",
            vm.connect_label(),
            if vm.connect_enabled { "" } else { " (busy)" }
        )?;
        match vm.range_idx {
            Some(range) => writeln!(f, "  Status: {} (range {})", vm.status_text, range)?,
            None => writeln!(f, "  Status: {}", vm.status_text)?,
        }
        writeln!(f, "  Ug: {}", vm.voltage_display)?;
        write!(
            f,
            "  start={} stop={} tare={}",
            flag(vm.start_enabled),
            flag(vm.stop_enabled),
            flag(vm.tare_enabled)
        )
    }
}
