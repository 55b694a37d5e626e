use std::fmt;

/// The two devices the backend owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    /// Pin-switched resistance box
    ResistanceBox,
    /// Wireless voltmeter
    Voltmeter,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::ResistanceBox => f.write_str("resistance box"),
            Device::Voltmeter => f.write_str("voltmeter"),
        }
    }
}

/// Connection state of one device, as the client sees it.
///
/// ```text
///            connect              poll: connected
///   Idle ─────────────▶ Connecting ────────────────▶ Connected
///    ▲                    │   ▲ poll: disconnected      │
///    │  command failed    │   └──(suppressed)           │ poll: disconnected
///    └────────────────────┘                             │
///    ▲──────────────────────────────────────────────────┘
/// ```
///
/// `Connected` also accepts `connect` (forced reconnect).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    /// Not connected, no attempt in flight
    #[default]
    Idle,
    /// A connect command was issued and has not been confirmed by a poll
    Connecting,
    /// Last poll reported the device connected
    Connected,
}

/// What a poll did to a link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Device reported connected
    Connected,
    /// Device reported disconnected and the link dropped to `Idle`
    Disconnected,
    /// Device reported disconnected during a connect attempt; ignored
    Suppressed,
}

/// Per-device link state machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceLink {
    state: LinkState,
}

impl DeviceLink {
    /// Current state
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Whether a connect attempt is in flight
    pub fn is_connecting(&self) -> bool {
        self.state == LinkState::Connecting
    }

    /// User issued a connect command
    pub fn begin_connect(&mut self) {
        self.state = LinkState::Connecting;
    }

    /// Fold in the `connected` flag of a poll
    pub fn observe(&mut self, connected: bool) -> Observation {
        match (connected, self.state) {
            (true, _) => {
                self.state = LinkState::Connected;
                Observation::Connected
            }
            (false, LinkState::Connecting) => Observation::Suppressed,
            (false, _) => {
                self.state = LinkState::Idle;
                Observation::Disconnected
            }
        }
    }

    /// The connect command failed (error reply or transport failure)
    pub fn fail(&mut self) {
        self.state = LinkState::Idle;
    }
}
