//! # Backend Client
//!
//! The backend service owns both devices; this crate only ever talks to it
//! through the [`Backend`] trait:
//!
//! | Request | Path | Body | Reply |
//! |---------|------|------|-------|
//! | status poll | `GET api/status` | – | [`StatusReport`] |
//! | connect resistance box | `POST api/arduino/connect` | – | `{status, msg?}` |
//! | pin toggle | `POST api/arduino/control` | `{pin, state}` | ignored |
//! | set resistance | `POST api/arduino/set_resistance` | `{val}` | `{status, msg?}` |
//! | connect voltmeter | `POST api/ble/connect` | – | ignored |
//! | voltmeter control | `POST api/ble/control` | `{cmd, val}` | ignored |
//!
//! [`HttpBackend`] is the JSON-over-HTTP implementation. Requests are blocking;
//! the session event loop runs each one on a worker thread.

mod config;
mod error;
mod http;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::device::StatusReport;

pub use config::{BackendConfig, DEFAULT_BASE_URL, DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT};
pub use error::ClientError;
pub use http::HttpBackend;

/// Access to the backend service
pub trait Backend: Send + Sync {
    /// Fetch the current status of both devices
    fn status(&self) -> Result<StatusReport, ClientError>;

    /// Issue one command and return the backend's reply
    fn send(&self, command: &Command) -> Result<CommandReply, ClientError>;
}

/// Commands accepted by the voltmeter control endpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoltmeterCommand {
    /// Start streaming measurements
    Start,
    /// Stop streaming measurements
    Stop,
    /// Zero the meter at its current reading
    Tare,
    /// Select a measurement range by index
    SetRange(u8),
    /// Set the sampling frequency in hertz
    SetFrequency(f64),
}

impl VoltmeterCommand {
    /// Wire name of the command
    pub fn name(&self) -> &'static str {
        match self {
            VoltmeterCommand::Start => "START",
            VoltmeterCommand::Stop => "STOP",
            VoltmeterCommand::Tare => "TARE",
            VoltmeterCommand::SetRange(_) => "SET_RANGE",
            VoltmeterCommand::SetFrequency(_) => "SET_FREQ",
        }
    }

    fn value(&self) -> Value {
        match self {
            VoltmeterCommand::SetRange(range) => json!(range),
            VoltmeterCommand::SetFrequency(hz) => json!(hz),
            _ => Value::Null,
        }
    }
}

/// One user-issued request to the backend
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Open the resistance box connection
    ConnectResistanceBox,
    /// Open the voltmeter connection
    ConnectVoltmeter,
    /// Voltmeter control command
    Voltmeter(VoltmeterCommand),
    /// Switch pins so the box totals `ohms`
    SetResistance(u32),
    /// Switch one pin of the box
    TogglePin {
        /// Pin number
        pin: u8,
        /// New state
        on: bool,
    },
}

impl Command {
    /// API path, relative to the base URL
    pub fn path(&self) -> &'static str {
        match self {
            Command::ConnectResistanceBox => "api/arduino/connect",
            Command::ConnectVoltmeter => "api/ble/connect",
            Command::Voltmeter(_) => "api/ble/control",
            Command::SetResistance(_) => "api/arduino/set_resistance",
            Command::TogglePin { .. } => "api/arduino/control",
        }
    }

    /// JSON request body, if the endpoint takes one
    pub fn body(&self) -> Option<Value> {
        match self {
            Command::ConnectResistanceBox | Command::ConnectVoltmeter => None,
            Command::Voltmeter(cmd) => Some(json!({ "cmd": cmd.name(), "val": cmd.value() })),
            Command::SetResistance(ohms) => Some(json!({ "val": ohms })),
            Command::TogglePin { pin, on } => Some(json!({ "pin": pin, "state": on })),
        }
    }

    /// Whether the endpoint answers with a `{status, msg?}` document. Replies
    /// to the other commands are not read beyond their HTTP status.
    pub fn expects_reply(&self) -> bool {
        matches!(
            self,
            Command::ConnectResistanceBox | Command::SetResistance(_)
        )
    }
}

/// Reply status reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    /// Command accepted
    #[default]
    Ok,
    /// Command rejected; see the message
    Error,
    /// Anything else; treated as accepted
    #[serde(other)]
    Unknown,
}

/// Body of a command reply. Endpoints without a reply contract yield the
/// default (accepted, no message).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CommandReply {
    /// Outcome
    #[serde(default)]
    pub status: ReplyStatus,
    /// Human-readable detail
    #[serde(default)]
    pub msg: Option<String>,
}

impl CommandReply {
    /// Accepted reply without message
    pub fn ok() -> Self {
        Self::default()
    }

    /// Rejected reply carrying `msg`
    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            status: ReplyStatus::Error,
            msg: Some(msg.into()),
        }
    }

    /// Whether the backend rejected the command
    pub fn is_error(&self) -> bool {
        self.status == ReplyStatus::Error
    }

    /// Decode a reply body; an empty body is an accepted reply
    pub fn from_body(body: &str) -> Result<Self, ClientError> {
        if body.trim().is_empty() {
            return Ok(Self::ok());
        }
        Ok(serde_json::from_str(body)?)
    }
}
