use std::time::Duration;

use log::info;

use crate::formula::parse_number;

use super::error::TableError;

/// Shortest accepted auto-record interval, in seconds
pub const MIN_INTERVAL_SECS: f64 = 0.1;

/// Auto-record state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoRecordState {
    /// No timer active
    #[default]
    Stopped,
    /// Sampling on a fixed-period timer
    Running {
        /// Timer period
        interval: Duration,
    },
}

/// Enablement of the auto-record controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoRecordControls {
    /// Start button enabled
    pub start_enabled: bool,
    /// Stop button enabled
    pub stop_enabled: bool,
    /// Interval field editable
    pub interval_editable: bool,
}

/// Auto-record state machine: `Stopped ⇄ Running`.
///
/// Only the state lives here; the owner arms a repeating timer with the returned
/// interval and takes the immediate first sample itself.
#[derive(Debug, Clone, Default)]
pub struct AutoRecorder {
    state: AutoRecordState,
}

impl AutoRecorder {
    /// A stopped recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an interval in seconds, rejecting anything below
    /// [`MIN_INTERVAL_SECS`] or too large for a [`Duration`]
    pub fn parse_interval(input: &str) -> Result<Duration, TableError> {
        parse_number(input)
            .filter(|secs| *secs >= MIN_INTERVAL_SECS)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .ok_or_else(|| TableError::InvalidInterval {
                input: input.to_string(),
                min: MIN_INTERVAL_SECS,
            })
    }

    /// Enter `Running`. Fails without changing state on a bad interval or when
    /// a timer is already active.
    pub fn start(&mut self, input: &str) -> Result<Duration, TableError> {
        if self.is_running() {
            return Err(TableError::AlreadyRunning);
        }
        let interval = Self::parse_interval(input)?;
        self.state = AutoRecordState::Running { interval };
        info!("Auto-record started every {:?}", interval);
        Ok(interval)
    }

    /// Return to `Stopped`; reports whether a timer was active
    pub fn stop(&mut self) -> bool {
        let was_running = self.is_running();
        self.state = AutoRecordState::Stopped;
        if was_running {
            info!("Auto-record stopped");
        }
        was_running
    }

    /// Current state
    pub fn state(&self) -> AutoRecordState {
        self.state
    }

    /// Whether a timer is active
    pub fn is_running(&self) -> bool {
        matches!(self.state, AutoRecordState::Running { .. })
    }

    /// Active timer period
    pub fn interval(&self) -> Option<Duration> {
        match self.state {
            AutoRecordState::Running { interval } => Some(interval),
            AutoRecordState::Stopped => None,
        }
    }

    /// Control enablement for the current state
    pub fn controls(&self) -> AutoRecordControls {
        let running = self.is_running();
        AutoRecordControls {
            start_enabled: !running,
            stop_enabled: running,
            interval_editable: !running,
        }
    }
}
