use std::path::PathBuf;

/// Default auto-record interval text, in seconds
pub const DEFAULT_AUTO_INTERVAL: &str = "1.0";

/// Session defaults
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Initial excitation voltage field text
    pub excitation: String,
    /// Initial auto-record interval field text, in seconds
    pub auto_interval: String,
    /// Directory CSV exports are written to
    pub export_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            excitation: "2.0".to_string(),
            auto_interval: DEFAULT_AUTO_INTERVAL.to_string(),
            export_dir: PathBuf::from("."),
        }
    }
}

impl SessionConfig {
    /// Set the initial excitation voltage text
    pub fn with_excitation(mut self, excitation: impl Into<String>) -> Self {
        self.excitation = excitation.into();
        self
    }

    /// Set the initial auto-record interval text
    pub fn with_auto_interval(mut self, interval: impl Into<String>) -> Self {
        self.auto_interval = interval.into();
        self
    }

    /// Set the export directory
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }
}
