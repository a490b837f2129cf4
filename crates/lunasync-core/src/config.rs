//! Configuration loading and typed config structures for lunasync.
//!
//! The configuration lives in `lunasync-config.yaml`. This module defines
//! strongly-typed structs that mirror the YAML structure, and provides a
//! loader that reads and validates the file. Every field has a default, so
//! an empty file (or no file) yields the standard real-sky setup.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use lunasync_types::WorldName;
use serde::Deserialize;

use crate::constants::MOON_CYCLE_SECONDS;
use crate::convert::TimeConverter;

/// Environment variable that overrides `time.reference_offset`.
pub const REFERENCE_OFFSET_ENV: &str = "LUNASYNC_REFERENCE_OFFSET";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but holds an unusable value.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `lunasync-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SyncConfig {
    /// How local command values are interpreted.
    #[serde(default)]
    pub time: TimeSettings,

    /// Lunar anchor and cycle length.
    #[serde(default)]
    pub lunar: LunarConfig,

    /// Worlds known to the built-in host.
    #[serde(default)]
    pub host: HostConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Result rendering for the command-line tool.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Values that take precedence over the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Replaces `time.reference_offset` when set.
    pub reference_offset: Option<String>,
}

impl ConfigOverrides {
    /// Read overrides from the process environment
    /// (`LUNASYNC_REFERENCE_OFFSET`).
    pub fn from_env() -> Self {
        Self {
            reference_offset: std::env::var(REFERENCE_OFFSET_ENV).ok(),
        }
    }
}

impl SyncConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `LUNASYNC_REFERENCE_OFFSET` overrides `time.reference_offset` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_file_with(path, &ConfigOverrides::from_env())
    }

    /// Load configuration from a YAML file, then apply `overrides`.
    ///
    /// # Errors
    ///
    /// Same as [`SyncConfig::from_file`].
    pub fn from_file_with(path: &Path, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_with(&contents, overrides)
    }

    /// Parse configuration from a YAML string.
    ///
    /// `LUNASYNC_REFERENCE_OFFSET` overrides `time.reference_offset` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse_with(yaml, &ConfigOverrides::from_env())
    }

    /// Parse configuration from a YAML string, then apply `overrides`.
    ///
    /// # Errors
    ///
    /// Same as [`SyncConfig::parse`].
    pub fn parse_with(yaml: &str, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.with_overrides(overrides)
    }

    /// The default configuration with `overrides` applied, for running
    /// without a file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if an override is unusable.
    pub fn defaults_with(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        Self::default().with_overrides(overrides)
    }

    fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        self.time.apply_overrides(overrides);
        self.validate()?;
        Ok(self)
    }

    /// Check every value that can be well-formed YAML yet unusable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.time.offset()?;
        self.converter()?;
        if let Some(world) = &self.host.default_world
            && !self.host.worlds.contains(world)
        {
            return Err(ConfigError::Invalid {
                reason: format!("default_world {world} is not listed in host.worlds"),
            });
        }
        Ok(())
    }

    /// Build the converter described by the `lunar` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the cycle length is unusable.
    pub fn converter(&self) -> Result<TimeConverter, ConfigError> {
        TimeConverter::new(&self.lunar.full_moon_reference, self.lunar.cycle_seconds).map_err(
            |err| ConfigError::Invalid {
                reason: err.to_string(),
            },
        )
    }
}

/// Interpretation of local command values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeSettings {
    /// Offset local times and date-times are read in, as `+HH:MM` or `Z`.
    #[serde(default = "default_reference_offset")]
    pub reference_offset: String,
}

impl TimeSettings {
    /// Replace the reference offset when `overrides` carries one.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(val) = &overrides.reference_offset {
            self.reference_offset.clone_from(val);
        }
    }

    /// Parse the reference offset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the offset is not `Z` or `±HH:MM`.
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        parse_offset(&self.reference_offset)
    }
}

impl Default for TimeSettings {
    fn default() -> Self {
        Self {
            reference_offset: default_reference_offset(),
        }
    }
}

/// Lunar anchor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LunarConfig {
    /// An RFC 3339 instant of full moon.
    #[serde(default = "default_full_moon_reference")]
    pub full_moon_reference: DateTime<FixedOffset>,

    /// Lunar cycle length in seconds.
    #[serde(default = "default_cycle_seconds")]
    pub cycle_seconds: u64,
}

impl Default for LunarConfig {
    fn default() -> Self {
        Self {
            full_moon_reference: default_full_moon_reference(),
            cycle_seconds: default_cycle_seconds(),
        }
    }
}

/// Worlds served by the built-in in-memory host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostConfig {
    /// World targeted when a command names none. `None` behaves like a
    /// console sender, which must always name a world.
    #[serde(default = "default_world")]
    pub default_world: Option<WorldName>,

    /// Every world the host knows.
    #[serde(default = "default_worlds")]
    pub worlds: Vec<WorldName>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            default_world: default_world(),
            worlds: default_worlds(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes
    /// precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit structured JSON log lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// How the command-line tool prints results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,
}

/// Result rendering format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One confirmation sentence.
    #[default]
    Text,
    /// One JSON object per result.
    Json,
}

/// Parse `Z` or a `±HH:MM` offset.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] for anything else.
pub fn parse_offset(value: &str) -> Result<FixedOffset, ConfigError> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0).ok_or_else(|| ConfigError::Invalid {
            reason: "UTC offset out of range".to_owned(),
        });
    }
    FixedOffset::from_str(trimmed).map_err(|err| ConfigError::Invalid {
        reason: format!("invalid reference offset {value:?}: {err}"),
    })
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_reference_offset() -> String {
    "+00:00".to_owned()
}

fn default_full_moon_reference() -> DateTime<FixedOffset> {
    TimeConverter::standard().full_moon_reference().fixed_offset()
}

const fn default_cycle_seconds() -> u64 {
    MOON_CYCLE_SECONDS.unsigned_abs()
}

fn default_world() -> Option<WorldName> {
    Some(WorldName::from("world"))
}

fn default_worlds() -> Vec<WorldName> {
    vec![
        WorldName::from("world"),
        WorldName::from("world_nether"),
        WorldName::from("world_the_end"),
    ]
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Result<SyncConfig, ConfigError> {
        SyncConfig::parse_with(yaml, &ConfigOverrides::default())
    }

    fn offset_override(value: &str) -> ConfigOverrides {
        ConfigOverrides {
            reference_offset: Some(value.to_owned()),
        }
    }

    #[test]
    fn default_config_is_valid() {
        let config = SyncConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.time.reference_offset, "+00:00");
        assert_eq!(config.lunar.cycle_seconds, 2_548_800);
        assert_eq!(config.host.worlds.len(), 3);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert_eq!(config.converter().unwrap(), TimeConverter::standard());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
time:
  reference_offset: "+02:00"

lunar:
  full_moon_reference: "2024-02-24T12:30:00Z"
  cycle_seconds: 2551443

host:
  default_world: "overworld"
  worlds:
    - overworld
    - caves

logging:
  level: "debug"
  json: true

output:
  format: json
"#;

        let config = parse(yaml);
        assert!(config.is_ok(), "{config:?}");
        let config = config.unwrap();

        assert_eq!(config.lunar.cycle_seconds, 2_551_443);
        assert_eq!(
            config.lunar.full_moon_reference.to_rfc3339(),
            "2024-02-24T12:30:00+00:00"
        );
        assert_eq!(config.host.default_world, Some(WorldName::from("overworld")));
        assert_eq!(config.host.worlds.len(), 2);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "logging:\n  level: warn\n";
        let config = parse(yaml).unwrap();

        // Level is overridden
        assert_eq!(config.logging.level, "warn");
        // Everything else uses defaults
        assert_eq!(config.lunar, LunarConfig::default());
        assert_eq!(config.host, HostConfig::default());
    }

    #[test]
    fn parse_empty_yaml() {
        let config = parse("");
        assert!(config.is_ok());
    }

    #[test]
    fn zero_cycle_is_invalid() {
        let yaml = "lunar:\n  cycle_seconds: 0\n";
        let err = parse(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn unlisted_default_world_is_invalid() {
        let yaml = "host:\n  default_world: lobby\n  worlds: [world]\n";
        let err = parse(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn null_default_world_is_console_mode() {
        let yaml = "host:\n  default_world: null\n";
        let config = parse(yaml).unwrap();
        assert_eq!(config.host.default_world, None);
    }

    #[test]
    fn offsets_parse() {
        assert_eq!(parse_offset("Z").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_offset("+00:00").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_offset("+12:00").unwrap().local_minus_utc(), 12 * 3600);
        assert_eq!(parse_offset("-05:30").unwrap().local_minus_utc(), -(5 * 3600 + 1800));
        assert!(parse_offset("EST").is_err());
        assert!(parse_offset("+25:00").is_err());
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        let err = parse("lunar: [").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("lunasync-config.yaml");
        if path.exists() {
            let config = SyncConfig::from_file_with(&path, &ConfigOverrides::default());
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }

    #[test]
    fn reference_offset_override_replaces_file_value() {
        let yaml = "time:\n  reference_offset: \"+02:00\"\n";
        let config = SyncConfig::parse_with(yaml, &offset_override("-05:30")).unwrap();
        assert_eq!(config.time.reference_offset, "-05:30");
        assert_eq!(
            config.time.offset().unwrap().local_minus_utc(),
            -(5 * 3600 + 1800)
        );

        let config = parse(yaml).unwrap();
        assert_eq!(config.time.reference_offset, "+02:00");
    }

    #[test]
    fn reference_offset_override_applies_to_defaults() {
        let config = SyncConfig::defaults_with(&offset_override("Z")).unwrap();
        assert_eq!(config.time.reference_offset, "Z");
        assert_eq!(config.time.offset().unwrap().local_minus_utc(), 0);

        let config = SyncConfig::defaults_with(&ConfigOverrides::default()).unwrap();
        assert_eq!(config, SyncConfig::default());
    }

    #[test]
    fn invalid_reference_offset_override_is_rejected() {
        let err = SyncConfig::defaults_with(&offset_override("EST")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        let err = SyncConfig::parse_with("", &offset_override("+25:00")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
