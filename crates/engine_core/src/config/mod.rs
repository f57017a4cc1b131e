//! Configuration system
//!
//! Settings are plain serde structs loadable from TOML or RON. A scheduler
//! reads them once at construction and treats them as constants afterwards.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value that parsed but cannot be used
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Default fixed simulation rate in steps per second
pub const DEFAULT_FIXED_STEP_RATE: f64 = 60.0;

/// Default cap on fixed steps run in a single frame
pub const DEFAULT_MAX_FIXED_STEPS_PER_FRAME: u32 = 5;

/// # Scheduler Configuration
///
/// Timing parameters for the systems scheduler plus optional priority
/// overrides keyed by system name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Duration of one fixed step in seconds
    pub fixed_step_seconds: f64,
    /// Maximum fixed steps per frame; 0 means unlimited
    pub max_fixed_steps_per_frame: u32,
    /// Priority overrides; every name must match a registered system
    pub system_priorities: BTreeMap<String, i32>,
}

impl SchedulerConfig {
    /// Create a configuration with the default 60 Hz step
    pub fn new() -> Self {
        Self {
            fixed_step_seconds: 1.0 / DEFAULT_FIXED_STEP_RATE,
            max_fixed_steps_per_frame: DEFAULT_MAX_FIXED_STEPS_PER_FRAME,
            system_priorities: BTreeMap::new(),
        }
    }

    /// Set the fixed step duration in seconds
    pub fn with_fixed_step(mut self, seconds: f64) -> Self {
        self.fixed_step_seconds = seconds;
        self
    }

    /// Set the per-frame fixed step cap (0 = unlimited)
    pub fn with_max_fixed_steps(mut self, max_steps: u32) -> Self {
        self.max_fixed_steps_per_frame = max_steps;
        self
    }

    /// Override the priority of a named system
    pub fn with_priority(mut self, system: impl Into<String>, priority: i32) -> Self {
        self.system_priorities.insert(system.into(), priority);
        self
    }

    /// Fixed step as a `Duration`, rounded down to whole nanoseconds
    ///
    /// Rounding down keeps `n` steps within `n` times the configured step, so a
    /// frame of exactly three 1/60 s steps simulates three steps. Fails when the
    /// configured step is not a positive finite number of seconds.
    pub fn fixed_step(&self) -> Result<Duration, ConfigError> {
        let seconds = self.fixed_step_seconds;
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "fixed_step_seconds must be positive and finite, got {seconds}"
            )));
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let step = Duration::from_nanos((seconds * 1e9).floor() as u64);
        if step.is_zero() {
            return Err(ConfigError::Invalid(format!(
                "fixed_step_seconds {seconds} rounds to zero"
            )));
        }
        Ok(step)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fixed_step().map(|_| ())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for SchedulerConfig {}

/// # Logging Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log filter (e.g. "info", "engine_core=debug")
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// # Engine Configuration
///
/// Top-level configuration file layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Scheduler timing and ordering
    pub scheduler: SchedulerConfig,
    /// Logging setup
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scheduler.validate()
    }
}

impl Config for EngineConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let config = SchedulerConfig::default();
        assert_relative_eq!(config.fixed_step_seconds, 1.0 / 60.0);
        assert_eq!(config.max_fixed_steps_per_frame, 5);
        assert!(config.system_priorities.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_step() {
        for seconds in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = SchedulerConfig::new().with_fixed_step(seconds);
            assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        }
    }

    #[test]
    fn test_fixed_step_rounds_down_to_nanoseconds() {
        let step = SchedulerConfig::new().fixed_step().unwrap();
        assert_eq!(step, Duration::from_nanos(16_666_666));
        assert!(step * 3 <= Duration::from_millis(50));

        let tiny = SchedulerConfig::new().with_fixed_step(1e-10);
        assert!(matches!(tiny.fixed_step(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_parse_toml() {
        let text = r#"
            [scheduler]
            fixed_step_seconds = 0.02
            max_fixed_steps_per_frame = 0

            [scheduler.system_priorities]
            physics = 3

            [logging]
            level = "debug"
        "#;
        let config: EngineConfig = toml::from_str(text).unwrap();

        assert_relative_eq!(config.scheduler.fixed_step_seconds, 0.02);
        assert_eq!(config.scheduler.max_fixed_steps_per_frame, 0);
        assert_eq!(config.scheduler.system_priorities.get("physics"), Some(&3));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: EngineConfig = ron::from_str("(scheduler: (max_fixed_steps_per_frame: 2))").unwrap();

        assert_eq!(config.scheduler.max_fixed_steps_per_frame, 2);
        assert_relative_eq!(config.scheduler.fixed_step_seconds, 1.0 / 60.0);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = std::env::temp_dir();
        let config = EngineConfig {
            scheduler: SchedulerConfig::new().with_max_fixed_steps(8).with_priority("movement", -4),
            logging: LoggingConfig { level: "trace".to_string() },
        };

        for name in ["engine_core_config_test.toml", "engine_core_config_test.ron"] {
            let path = dir.join(name);
            config.save_to_file(&path).unwrap();
            let loaded = EngineConfig::load_from_file(&path).unwrap();
            std::fs::remove_file(&path).ok();
            assert_eq!(loaded, config);
        }
    }

    #[test]
    fn test_unsupported_extension() {
        let result = EngineConfig::load_from_file("settings.yaml");
        assert!(result.is_err());
    }
}
