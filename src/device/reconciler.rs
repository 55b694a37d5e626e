use std::fmt;

use log::{debug, info, warn};

use crate::formula::{format_voltage, NO_READING};

use super::link::{Device, DeviceLink, LinkState, Observation};
use super::panel::ControlPanel;
use super::snapshot::{ResistanceBoxSnapshot, StatusReport, VoltmeterSnapshot};

/// Merges polled device snapshots into local state without undoing the user's
/// own in-flight connect attempts.
///
/// Holds the last known voltage and resistance for sampling, one [`DeviceLink`]
/// per device and the [`ControlPanel`] the UI renders.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    resistance_box: DeviceLink,
    voltmeter: DeviceLink,
    latest_voltage: f64,
    latest_resistance: u32,
    panel: ControlPanel,
}

impl Reconciler {
    /// Both devices disconnected, no readings yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Last voltage reported while the voltmeter was connected
    pub fn latest_voltage(&self) -> f64 {
        self.latest_voltage
    }

    /// Last resistance total reported while the box was connected
    pub fn latest_resistance(&self) -> u32 {
        self.latest_resistance
    }

    /// Link state of `device`
    pub fn link(&self, device: Device) -> LinkState {
        match device {
            Device::ResistanceBox => self.resistance_box.state(),
            Device::Voltmeter => self.voltmeter.state(),
        }
    }

    /// Current panel contents
    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    /// Fold in one poll result
    pub fn apply(&mut self, report: &StatusReport) {
        self.apply_resistance_box(&report.resistance_box);
        self.apply_voltmeter(&report.voltmeter);
    }

    /// A poll failed at the transport level; nothing changes
    pub fn poll_failed(&self, error: &dyn fmt::Display) {
        warn!("Status poll failed: {}", error);
    }

    /// Optimistically enter `Connecting` and lock the connect button
    pub fn begin_connect(&mut self, device: Device) {
        info!("Connecting {}", device);
        match device {
            Device::ResistanceBox => {
                self.resistance_box.begin_connect();
                let panel = &mut self.panel.resistance_box;
                panel.link = LinkState::Connecting;
                panel.connect_enabled = false;
            }
            Device::Voltmeter => {
                self.voltmeter.begin_connect();
                let panel = &mut self.panel.voltmeter;
                panel.link = LinkState::Connecting;
                panel.connect_enabled = false;
            }
        }
    }

    /// The connect command failed; restore the disconnected baseline now
    /// instead of waiting for the next poll
    pub fn connect_failed(&mut self, device: Device) {
        warn!("Connecting {} failed", device);
        match device {
            Device::ResistanceBox => {
                self.resistance_box.fail();
                self.panel.resistance_box.reset(None);
            }
            Device::Voltmeter => {
                self.voltmeter.fail();
                self.panel.voltmeter.reset();
            }
        }
    }

    /// Reflect a START/STOP the user just issued, ahead of the next poll
    pub fn set_measuring(&mut self, measuring: bool) {
        let panel = &mut self.panel.voltmeter;
        panel.set_measuring(measuring);
        panel.settings_locked = measuring;
    }

    fn apply_resistance_box(&mut self, snapshot: &ResistanceBoxSnapshot) {
        match self.resistance_box.observe(snapshot.connected) {
            Observation::Connected => {
                let total = snapshot.total_resistance();
                if self.panel.resistance_box.link != LinkState::Connected {
                    info!("Resistance box connected");
                }
                let panel = &mut self.panel.resistance_box;
                panel.link = LinkState::Connected;
                panel.connect_enabled = true;
                panel.status_line = match &snapshot.port {
                    Some(port) => format!("online ({})", port),
                    None => "online".to_string(),
                };
                panel.controls_enabled = true;
                panel.pins = snapshot.pins.clone();
                panel.resistance_display = format!("{} Ω", total);
                self.latest_resistance = total;
            }
            Observation::Disconnected => {
                self.panel.resistance_box.reset(snapshot.error.as_deref());
            }
            Observation::Suppressed => {
                debug!("Ignoring disconnected resistance box while connecting");
            }
        }
    }

    fn apply_voltmeter(&mut self, snapshot: &VoltmeterSnapshot) {
        self.panel.voltmeter.status_text = snapshot.status_text.clone();
        self.panel.voltmeter.range_idx = snapshot.range_idx;

        match self.voltmeter.observe(snapshot.connected) {
            Observation::Connected => {
                if self.panel.voltmeter.link != LinkState::Connected {
                    info!("Voltmeter connected");
                }
                self.latest_voltage = snapshot.voltage;
                let panel = &mut self.panel.voltmeter;
                panel.link = LinkState::Connected;
                panel.connect_enabled = true;
                panel.voltage_display = format_voltage(Some(snapshot.voltage));
                panel.set_measuring(snapshot.is_measuring);
            }
            Observation::Disconnected => {
                self.panel.voltmeter.reset();
                self.panel.voltmeter.voltage_display = NO_READING.to_string();
            }
            Observation::Suppressed => {
                debug!("Ignoring disconnected voltmeter while connecting");
                self.panel.voltmeter.voltage_display = NO_READING.to_string();
            }
        }
    }
}
