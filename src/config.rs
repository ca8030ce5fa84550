use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::sequencer::ToneShape;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// cpal host names tried before the platform default.
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default = "AudioConfig::default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default = "AudioConfig::default_tail_ms")]
    pub tail_ms: u32,
    /// Rate used for offline renders.
    #[serde(default = "AudioConfig::default_sample_rate")]
    pub sample_rate: u32,
}

impl AudioConfig {
    fn default_queue_capacity() -> usize {
        64
    }
    fn default_tail_ms() -> u32 {
        50
    }
    fn default_sample_rate() -> u32 {
        48_000
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            queue_capacity: Self::default_queue_capacity(),
            tail_ms: Self::default_tail_ms(),
            sample_rate: Self::default_sample_rate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set.
    #[serde(default = "LogConfig::default_filter")]
    pub filter: String,
}

impl LogConfig {
    fn default_filter() -> String {
        "info".to_string()
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: Self::default_filter(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub voicing: ToneShape,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.voicing
            .validate()
            .map_err(|err| ConfigError::Invalid(format!("voicing: {err}")))?;
        if self.audio.queue_capacity == 0 {
            return Err(ConfigError::Invalid("audio.queue_capacity must be > 0".into()));
        }
        if self.audio.sample_rate == 0 {
            return Err(ConfigError::Invalid("audio.sample_rate must be > 0".into()));
        }
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::Waveform;

    #[test]
    fn empty_file_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.voicing.peak_gain, 0.3);
        assert_eq!(config.voicing.floor_gain, 0.01);
        assert_eq!(config.voicing.waveform, Waveform::Sine);
        assert_eq!(config.audio.queue_capacity, 64);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [voicing]
            waveform = "triangle"

            [audio]
            hosts = ["ALSA"]
            "#,
        )
        .unwrap();

        assert_eq!(config.voicing.waveform, Waveform::Triangle);
        assert_eq!(config.voicing.peak_gain, 0.3);
        assert_eq!(config.audio.hosts, vec!["ALSA".to_string()]);
        assert_eq!(config.audio.tail_ms, 50);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn rejects_inverted_gains() {
        let err = AppConfig::from_toml_str("[voicing]\npeak_gain = 0.01\nfloor_gain = 0.3\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = AppConfig::from_toml_str("[voicing]\npeak_gain = 0.2\nfloor_gain = 0.2\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.starts_with("voicing")));
    }

    #[test]
    fn rejects_unknown_waveform() {
        let err = AppConfig::from_toml_str("[voicing]\nwaveform = \"pulse\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_default() {
        let config = AppConfig::load_or_default("/nonexistent/clockly.toml").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn serializes_back_to_toml() {
        let text = AppConfig::default().to_toml_string().unwrap();
        let parsed = AppConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }
}
