//! Command-line front end for lunasync.
//!
//! Runs one sync command against an in-memory host built from the
//! configuration, and prints the confirmation:
//!
//! ```text
//! lunasync <time|datetime> <value|now> [world]
//! ```
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `lunasync-config.yaml` (or `LUNASYNC_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the converter from the lunar config
//! 4. Create the in-memory host with the configured worlds
//! 5. Parse and apply the command, then print the result

mod error;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Utc;
use lunasync_core::command::{self, USAGE};
use lunasync_core::config::{ConfigOverrides, LoggingConfig, OutputFormat, SyncConfig};
use lunasync_core::host::InMemoryHost;
use lunasync_core::service::{Applied, DateAndTimeService};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Environment variable naming the configuration file.
const CONFIG_PATH_ENV: &str = "LUNASYNC_CONFIG";

/// Configuration file read when `LUNASYNC_CONFIG` is not set.
const DEFAULT_CONFIG_FILE: &str = "lunasync-config.yaml";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            if let CliError::Command { source } = &err
                && source.is_usage()
            {
                eprintln!("usage: lunasync {USAGE}");
            }
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(args: &[String]) -> Result<(), CliError> {
    // 1. Load configuration.
    let (config, config_source) = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        source = %config_source,
        reference_offset = config.time.reference_offset,
        cycle_seconds = config.lunar.cycle_seconds,
        "Configuration loaded"
    );

    // 3. Build the converter.
    let converter = config.converter()?;
    let offset = config.time.offset()?;
    debug!(
        full_moon_reference = %converter.full_moon_reference(),
        "Converter initialized"
    );

    // 4. Create the in-memory host.
    let host = InMemoryHost::with_worlds(config.host.worlds.iter().cloned());
    info!(world_count = host.world_count(), "Host initialized");

    // 5. Parse and apply the command.
    let mut service = DateAndTimeService::new(converter, host);
    let applied = command::run_command(
        &mut service,
        args,
        config.host.default_world.as_ref(),
        offset,
        Utc::now(),
    )?;

    println!("{}", render_applied(&applied, config.output.format)?);
    Ok(())
}

fn load_config() -> Result<(SyncConfig, String), CliError> {
    resolve_config(
        std::env::var(CONFIG_PATH_ENV).ok(),
        Path::new(DEFAULT_CONFIG_FILE),
        &ConfigOverrides::from_env(),
    )
}

/// Load `explicit` if given, else `default_path` if it exists, else the
/// built-in defaults. An explicitly named file must exist.
fn resolve_config(
    explicit: Option<String>,
    default_path: &Path,
    overrides: &ConfigOverrides,
) -> Result<(SyncConfig, String), CliError> {
    if let Some(path) = explicit {
        let config = SyncConfig::from_file_with(&PathBuf::from(&path), overrides)?;
        return Ok((config, path));
    }

    if default_path.exists() {
        let config = SyncConfig::from_file_with(default_path, overrides)?;
        return Ok((config, default_path.display().to_string()));
    }

    Ok((SyncConfig::defaults_with(overrides)?, "defaults".to_owned()))
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Render the result in the configured output format.
fn render_applied(applied: &Applied, format: OutputFormat) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Text => applied.message(),
        OutputFormat::Json => serde_json::to_string(applied)?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, FixedOffset, NaiveDate};
    use lunasync_core::config::ConfigError;
    use lunasync_core::convert::TimeConverter;

    use super::*;

    fn apply(args: &[&str]) -> Applied {
        let now: DateTime<Utc> = NaiveDate::from_ymd_opt(2024, 1, 25)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap()
            .and_utc();
        let mut service = DateAndTimeService::new(
            TimeConverter::standard(),
            InMemoryHost::with_worlds(["world"]),
        );
        command::run_command(
            &mut service,
            args,
            None,
            FixedOffset::east_opt(0).unwrap(),
            now,
        )
        .unwrap()
    }

    #[test]
    fn text_output_is_the_confirmation_message() {
        let applied = apply(&["datetime", "2024-02-20T21:53:36", "world"]);
        let rendered = render_applied(&applied, OutputFormat::Text).unwrap();
        assert_eq!(
            rendered,
            "Minecraft time is set to 183893 for 2024-02-20T21:53:36"
        );
    }

    #[test]
    fn json_output_carries_every_field() {
        let applied = apply(&["datetime", "2024-02-20T21:53:36", "world"]);
        let rendered = render_applied(&applied, OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(json["kind"], "date_time_set");
        assert_eq!(json["world"], "world");
        assert_eq!(json["ticks"], 183_893);
        assert!(json["moon_phase"].is_string());
        assert_eq!(json["value"], "2024-02-20T21:53:36");

        let applied = apply(&["time", "06:00", "world"]);
        let rendered = render_applied(&applied, OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(json["kind"], "time_set");
        assert_eq!(json["ticks"], 0);
        assert!(json["moon_phase"].is_null());
    }

    #[test]
    fn missing_default_file_falls_back_to_defaults() {
        let (config, source) = resolve_config(
            None,
            Path::new("does-not-exist/lunasync-config.yaml"),
            &ConfigOverrides::default(),
        )
        .unwrap();
        assert_eq!(source, "defaults");
        assert_eq!(config, SyncConfig::default());
    }

    #[test]
    fn defaults_still_take_overrides() {
        let overrides = ConfigOverrides {
            reference_offset: Some("+09:00".to_owned()),
        };
        let (config, _) =
            resolve_config(None, Path::new("does-not-exist.yaml"), &overrides).unwrap();
        assert_eq!(config.time.offset().unwrap().local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn existing_default_file_is_loaded() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("lunasync-config.yaml");
        if path.exists() {
            let (config, source) =
                resolve_config(None, &path, &ConfigOverrides::default()).unwrap();
            assert_eq!(source, path.display().to_string());
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = resolve_config(
            Some("does-not-exist/custom.yaml".to_owned()),
            Path::new("does-not-exist.yaml"),
            &ConfigOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CliError::Config {
                source: ConfigError::Io { .. }
            }
        ));
    }
}
