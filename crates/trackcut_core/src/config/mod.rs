//! Configuration management for trackcut.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Validation on load with automatic defaults
//!
//! # Example
//!
//! ```no_run
//! use trackcut_core::config::{ConfigManager, ConfigSection};
//!
//! // Create manager and load (or create default) config
//! let mut config = ConfigManager::new("trackcut.toml");
//! config.load_or_create().unwrap();
//!
//! // Read settings
//! println!("Work dir: {}", config.settings().paths.work_dir);
//!
//! // Modify a setting
//! config.settings_mut().audio.bitrate = "256k".to_string();
//!
//! // Save just the audio section atomically
//! config.update_section(ConfigSection::Audio).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    AudioSettings, ConfigSection, LoggingSettings, PathSettings, Settings, ToolSettings,
};
