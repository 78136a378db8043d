//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use serde::{Deserialize, Serialize};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// External tool locations.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Audio output settings.
    #[serde(default)]
    pub audio: AudioSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            paths: PathSettings::default(),
            tools: ToolSettings::default(),
            audio: AudioSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Path configuration for the scratch area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Root folder under which each job gets its own directory.
    #[serde(default = "default_work_dir")]
    pub work_dir: String,
}

fn default_work_dir() -> String {
    "trackcut_work".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
        }
    }
}

/// Locations of the external tools, resolved through PATH when bare.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSettings {
    /// ffmpeg binary.
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,

    /// ffprobe binary.
    #[serde(default = "default_ffprobe")]
    pub ffprobe: String,

    /// yt-dlp binary.
    #[serde(default = "default_ytdlp")]
    pub ytdlp: String,
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

fn default_ytdlp() -> String {
    "yt-dlp".to_string()
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            ffprobe: default_ffprobe(),
            ytdlp: default_ytdlp(),
        }
    }
}

/// Audio encoding configuration for the produced segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    /// ffmpeg audio codec name.
    #[serde(default = "default_codec")]
    pub codec: String,

    /// Target audio bitrate.
    #[serde(default = "default_bitrate")]
    pub bitrate: String,

    /// File extension and yt-dlp audio format of the outputs.
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_codec() -> String {
    "libmp3lame".to_string()
}

fn default_bitrate() -> String {
    "192k".to_string()
}

fn default_format() -> String {
    "mp3".to_string()
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            codec: default_codec(),
            bitrate: default_bitrate(),
            format: default_format(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default filter level when RUST_LOG is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Paths,
    Tools,
    Audio,
    Logging,
}

impl ConfigSection {
    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Tools => "tools",
            ConfigSection::Audio => "audio",
            ConfigSection::Logging => "logging",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serializes() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        assert!(toml.contains("[paths]"));
        assert!(toml.contains("[tools]"));
        assert!(toml.contains("[audio]"));
        assert!(toml.contains("work_dir"));
    }

    #[test]
    fn settings_round_trip() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.paths.work_dir, settings.paths.work_dir);
        assert_eq!(parsed.audio.codec, settings.audio.codec);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let minimal = "[paths]\nwork_dir = \"custom_work\"";
        let parsed: Settings = toml::from_str(minimal).unwrap();
        assert_eq!(parsed.paths.work_dir, "custom_work");
        // Everything the file does not mention gets its default
        assert_eq!(parsed.tools.ffmpeg, "ffmpeg");
        assert_eq!(parsed.audio.bitrate, "192k");
        assert_eq!(parsed.logging.level, "info");
    }
}
