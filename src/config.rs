//! Configuration for the presswatch agent.

use crate::core::PressPattern;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration for the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// How often the signal line is sampled
    #[serde(with = "duration_millis")]
    pub sample_period: Duration,

    /// Release-to-press gap beyond which a press series closes
    #[serde(with = "duration_millis")]
    pub multi_press_interval: Duration,

    /// Continuous assertion at or past this duration classifies as a hold
    #[serde(with = "duration_millis")]
    pub hold_threshold: Duration,

    /// The line backing the button
    pub line: LineSettings,

    /// Commands bound to classified events
    pub actions: ActionsConfig,

    /// Path for storing state and telemetry
    pub data_path: PathBuf,

    /// Whether classification is currently paused
    pub paused: bool,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("presswatch");

        Self {
            sample_period: Duration::from_millis(10),
            multi_press_interval: Duration::from_millis(400),
            hold_threshold: Duration::from_secs(10),
            line: LineSettings::default(),
            actions: ActionsConfig::default(),
            data_path: data_dir,
            paused: false,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(&config_path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("presswatch")
            .join("config.json")
    }

    /// Ensure all required directories exist.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.data_path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }
}

/// Settings for the signal line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSettings {
    /// BCM pin number
    pub pin: u8,
    /// Whether the line reads low when pressed (pull-up wiring)
    pub active_low: bool,
}

impl Default for LineSettings {
    fn default() -> Self {
        Self {
            pin: 16,
            active_low: true,
        }
    }
}

/// Command lines bound to classified events.
///
/// Unset kinds stay unbound; the defaults mirror a kiosk deployment where
/// one short press refreshes the browser and a hold reboots the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionsConfig {
    pub one_short: Option<Vec<String>>,
    pub two_short: Option<Vec<String>>,
    pub three_short: Option<Vec<String>>,
    pub many_short: Option<Vec<String>>,
    pub hold: Option<Vec<String>>,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            one_short: Some(
                [
                    "xdotool",
                    "search",
                    "--onlyvisible",
                    "--class",
                    "chromium",
                    "windowactivate",
                    "--sync",
                    "key",
                    "F5",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ),
            two_short: None,
            three_short: None,
            many_short: None,
            hold: Some(vec!["sudo".to_string(), "reboot".to_string()]),
        }
    }
}

impl ActionsConfig {
    /// The command bound to an event kind, if any.
    pub fn command_for(&self, pattern: PressPattern) -> Option<&Vec<String>> {
        match pattern {
            PressPattern::OneShort => self.one_short.as_ref(),
            PressPattern::TwoShort => self.two_short.as_ref(),
            PressPattern::ThreeShort => self.three_short.as_ref(),
            PressPattern::ManyShort => self.many_short.as_ref(),
            PressPattern::Hold => self.hold.as_ref(),
        }
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Serde support for Duration as integer milliseconds.
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sample_period, Duration::from_millis(10));
        assert_eq!(config.multi_press_interval, Duration::from_millis(400));
        assert_eq!(config.hold_threshold, Duration::from_secs(10));
        assert_eq!(config.line.pin, 16);
        assert!(config.line.active_low);
        assert!(!config.paused);
    }

    #[test]
    fn test_duration_millis_roundtrip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).expect("serialize");
        assert!(json.contains("\"multi_press_interval\":400"));

        let back: Config = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.hold_threshold, Duration::from_secs(10));
        assert_eq!(back.sample_period, Duration::from_millis(10));
    }

    #[test]
    fn test_default_action_bindings() {
        let actions = ActionsConfig::default();
        assert!(actions.command_for(PressPattern::OneShort).is_some());
        assert!(actions.command_for(PressPattern::TwoShort).is_none());
        assert_eq!(
            actions.command_for(PressPattern::Hold).map(|v| v[1].as_str()),
            Some("reboot")
        );
    }
}
