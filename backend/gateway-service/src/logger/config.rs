//!
//! Logger-specific config.
//!

use serde::{Deserialize, Serialize};

/// Log config settings.
#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
pub struct Log {
    /// Logging to a console.
    pub console: LogConsole,
    /// Logging to a rolling file.
    #[serde(default)]
    pub file: LogFile,
    /// Logs a scrubbed transcript of every gateway call at debug level.
    #[serde(default)]
    pub transcripts: bool,
}

/// Logging to a console.
#[derive(Debug, Deserialize, Clone, Serialize, PartialEq, Eq)]
pub struct LogConsole {
    /// Whether you want to see log in your terminal.
    pub enabled: bool,
    /// What you see in your terminal.
    #[serde(default)]
    pub level: Level,
    /// Log format
    #[serde(default)]
    pub log_format: LogFormat,
    /// Directive which sets the log level for one or more crates/modules.
    pub filtering_directive: Option<String>,
}

/// Logging to a file.
#[derive(Debug, Deserialize, Clone, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogFile {
    pub enabled: bool,
    /// Directory of the log files, relative to the workspace.
    pub path: String,
    pub file_name: String,
    pub level: Level,
}

impl Default for LogFile {
    fn default() -> Self {
        Self {
            enabled: false,
            path: "logs".to_string(),
            file_name: "gateway.log".to_string(),
            level: Level::default(),
        }
    }
}

/// Describes the level of verbosity of a span or event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level(pub(super) tracing::Level);

impl Serialize for Level {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl Level {
    /// Returns the most verbose [`tracing::Level`]
    pub fn into_level(&self) -> tracing::Level {
        self.0
    }
}

impl Default for Level {
    fn default() -> Self {
        Self(tracing::Level::INFO)
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use std::str::FromStr as _;

        let s = String::deserialize(deserializer)?;
        tracing::Level::from_str(&s)
            .map(Level)
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Default, Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Default pretty log format
    Default,
    /// JSON based structured logging
    #[default]
    Json,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn log_config_defaults_file_and_transcripts() {
        let log: Log = serde_json::from_value(serde_json::json!({
            "console": { "enabled": true, "level": "DEBUG", "log_format": "default" }
        }))
        .unwrap();

        assert_eq!(log.console.level.into_level(), tracing::Level::DEBUG);
        assert_eq!(log.console.log_format, LogFormat::Default);
        assert_eq!(log.file, LogFile::default());
        assert!(!log.transcripts);
    }

    #[test]
    fn unknown_level_is_rejected() {
        let result = serde_json::from_value::<LogConsole>(serde_json::json!({
            "enabled": true,
            "level": "LOUD"
        }));
        assert!(result.is_err());
    }
}
