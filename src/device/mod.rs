//! # Device State
//!
//! Client-side view of the two devices the backend owns.
//!
//! The backend is polled on a fixed cadence and every poll returns a complete
//! [`StatusReport`]; nothing is ever patched in place. The [`Reconciler`] folds
//! each report into local state:
//!
//! - the last known voltage and resistance, used when sampling table rows;
//! - one [`DeviceLink`] per device (`Idle`, `Connecting`, `Connected`);
//! - the [`ControlPanel`], the data contract the UI renders from.
//!
//! A poll that reports a device disconnected is ignored while that device is
//! `Connecting`: backend connection latency must not bounce the connect button
//! back to its idle state. Only a poll reporting `connected` or a failed connect
//! command ends the `Connecting` state.

mod link;
mod panel;
mod reconciler;
mod snapshot;


pub use link::{Device, DeviceLink, LinkState, Observation};
pub use panel::{connect_label, ControlPanel, ResistanceBoxPanel, VoltmeterPanel};
pub use reconciler::Reconciler;
pub use snapshot::{
    is_known_pin, pin_weight, total_resistance, ResistanceBoxSnapshot, StatusReport,
    VoltmeterSnapshot, MAX_RESISTANCE, PIN_WEIGHTS,
};
