//! # Scan Configuration
//!
//! Configuration for the scan session and label generation.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     SHELFMARK_POLL_INTERVAL_MS=100                                      │
//! │     SHELFMARK_SHUTDOWN_GRACE_MS=2000                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/shelfmark/scan.toml (Linux)                               │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # scan.toml
//! [session]
//! poll_interval_ms = 100
//! shutdown_grace_ms = 2000
//! event_buffer = 64
//!
//! [label]
//! qr_size = 250
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{ScanError, ScanResult};

// =============================================================================
// Session Settings
// =============================================================================

/// Scan session behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Interval between frame polls (milliseconds).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// How long shutdown waits for the worker before aborting it
    /// (milliseconds).
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_ms: u64,

    /// Capacity of the session event channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

fn default_poll_interval() -> u64 {
    100
}
fn default_shutdown_grace() -> u64 {
    2000
}
fn default_event_buffer() -> usize {
    64
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            poll_interval_ms: default_poll_interval(),
            shutdown_grace_ms: default_shutdown_grace(),
            event_buffer: default_event_buffer(),
        }
    }
}

// =============================================================================
// Label Settings
// =============================================================================

/// QR label generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelSettings {
    /// Rendered QR image size in pixels (square). Zero means default.
    #[serde(default = "default_qr_size")]
    pub qr_size: u32,
}

fn default_qr_size() -> u32 {
    250
}

impl Default for LabelSettings {
    fn default() -> Self {
        LabelSettings {
            qr_size: default_qr_size(),
        }
    }
}

// =============================================================================
// Main Scan Configuration
// =============================================================================

/// Complete scan configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Session behavior settings.
    #[serde(default)]
    pub session: SessionSettings,

    /// Label generation settings.
    #[serde(default)]
    pub label: LabelSettings,
}

impl ScanConfig {
    /// Creates a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (scan.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ScanResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading scan config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load scan config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ScanResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ScanError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Scan config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ScanResult<()> {
        if self.session.poll_interval_ms == 0 {
            return Err(ScanError::InvalidConfig(
                "poll_interval_ms must be greater than 0".into(),
            ));
        }

        if self.session.event_buffer == 0 {
            return Err(ScanError::InvalidConfig(
                "event_buffer must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(interval) = std::env::var("SHELFMARK_POLL_INTERVAL_MS") {
            if let Ok(ms) = interval.parse::<u64>() {
                debug!(poll_interval_ms = ms, "Overriding poll interval from environment");
                self.session.poll_interval_ms = ms;
            }
        }

        if let Ok(grace) = std::env::var("SHELFMARK_SHUTDOWN_GRACE_MS") {
            if let Ok(ms) = grace.parse::<u64>() {
                debug!(shutdown_grace_ms = ms, "Overriding shutdown grace from environment");
                self.session.shutdown_grace_ms = ms;
            }
        }

        if let Ok(size) = std::env::var("SHELFMARK_QR_SIZE") {
            if let Ok(px) = size.parse::<u32>() {
                self.label.qr_size = px;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "shelfmark", "shelfmark")
            .map(|dirs| dirs.config_dir().join("scan.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the poll interval as a Duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.session.poll_interval_ms)
    }

    /// Returns the shutdown grace as a Duration.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.session.shutdown_grace_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert_eq!(config.session.poll_interval_ms, 100);
        assert_eq!(config.session.shutdown_grace_ms, 2000);
        assert_eq!(config.label.qr_size, 250);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ScanConfig::default();

        config.session.poll_interval_ms = 0;
        assert!(config.validate().is_err());

        config.session.poll_interval_ms = 100;
        config.session.event_buffer = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ScanConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[session]"));
        assert!(toml_str.contains("[label]"));

        let parsed: ScanConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.session.poll_interval_ms, 100);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: ScanConfig = toml::from_str("[session]\npoll_interval_ms = 50\n").unwrap();
        assert_eq!(parsed.session.poll_interval_ms, 50);
        assert_eq!(parsed.session.shutdown_grace_ms, 2000);
        assert_eq!(parsed.label.qr_size, 250);
    }
}
