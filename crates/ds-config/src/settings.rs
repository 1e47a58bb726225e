//! Environment-sourced generation settings.
//!
//! All settings are read from `DAG_STRESS_*` environment variables; there is
//! no CLI flag surface. Resolution goes through an injectable lookup so
//! tests never touch the process environment.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use ds_common::{Error, Result};

/// Prefix for every recognized environment variable.
pub const ENV_PREFIX: &str = "DAG_STRESS_";

/// Timestamp format used for partition bounds and window metadata (UTC).
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

const DEFAULT_WINDOW_DAYS: u32 = 3;
const DEFAULT_MAX_CONCURRENT: u32 = 4;

/// How partition schemes are derived for managed datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PartitionMode {
    /// Always a plain daily partition, ignoring the dataset's own cadence.
    Daily,
    /// Map the dataset's partition seconds through the cron lookup table.
    Actual,
}

impl PartitionMode {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(PartitionMode::Daily),
            "actual" => Ok(PartitionMode::Actual),
            other => Err(Error::ConfigValue {
                var: format!("{ENV_PREFIX}PARTITION_MODE"),
                reason: format!("unknown partition mode {other:?} (expected daily or actual)"),
            }),
        }
    }
}

/// Default activation state for generated trigger watchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SensorStatus {
    Running,
    Stopped,
}

impl SensorStatus {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "running" => Ok(SensorStatus::Running),
            "stopped" => Ok(SensorStatus::Stopped),
            other => Err(Error::ConfigValue {
                var: format!("{ENV_PREFIX}SENSOR_DEFAULT_STATUS"),
                reason: format!("unknown sensor status {other:?} (expected running or stopped)"),
            }),
        }
    }
}

/// Settings for one definition build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub partition_mode: PartitionMode,
    /// Length of the partition window in days, counted back from "today".
    pub window_days: u32,
    pub sensor_default_status: SensorStatus,
    /// Worker cap for the downstream execution pool.
    pub max_concurrent: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            partition_mode: PartitionMode::Actual,
            window_days: DEFAULT_WINDOW_DAYS,
            sensor_default_status: SensorStatus::Running,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

impl GeneratorConfig {
    /// Resolve settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::resolve(|name| std::env::var(name).ok())
    }

    /// Resolve settings through an arbitrary lookup.
    ///
    /// Unset variables fall back to defaults; set-but-invalid values are
    /// fatal rather than silently defaulted.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = GeneratorConfig::default();

        let partition_mode = match lookup(&env_var("PARTITION_MODE")) {
            Some(raw) => PartitionMode::parse(&raw)?,
            None => defaults.partition_mode,
        };
        let sensor_default_status = match lookup(&env_var("SENSOR_DEFAULT_STATUS")) {
            Some(raw) => SensorStatus::parse(&raw)?,
            None => defaults.sensor_default_status,
        };
        let window_days = match lookup(&env_var("WINDOW_DAYS")) {
            Some(raw) => parse_count(&env_var("WINDOW_DAYS"), &raw)?,
            None => defaults.window_days,
        };
        let max_concurrent = match lookup(&env_var("MAX_CONCURRENT")) {
            Some(raw) => parse_count(&env_var("MAX_CONCURRENT"), &raw)?,
            None => defaults.max_concurrent,
        };

        let config = GeneratorConfig {
            partition_mode,
            window_days,
            sensor_default_status,
            max_concurrent,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.window_days < 1 {
            return Err(Error::ConfigValue {
                var: format!("{ENV_PREFIX}WINDOW_DAYS"),
                reason: "must be at least 1".into(),
            });
        }
        if self.max_concurrent < 1 {
            return Err(Error::ConfigValue {
                var: format!("{ENV_PREFIX}MAX_CONCURRENT"),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Generation window ending at (the midnight preceding) `today`.
    pub fn window(&self, today: DateTime<Utc>) -> GenerationWindow {
        GenerationWindow::ending_at(today, self.window_days)
    }
}

fn env_var(name: &str) -> String {
    format!("{ENV_PREFIX}{name}")
}

fn parse_count(var: &str, raw: &str) -> Result<u32> {
    let value: u32 = raw.trim().parse().map_err(|_| Error::ConfigValue {
        var: var.to_string(),
        reason: format!("expected a positive integer, got {raw:?}"),
    })?;
    if value == 0 {
        return Err(Error::ConfigValue {
            var: var.to_string(),
            reason: "must be at least 1".into(),
        });
    }
    Ok(value)
}

/// Partition window bounds, preformatted with [`DATETIME_FORMAT`].
///
/// Computed once by the caller and threaded through the generation pass;
/// generation code never reads the clock itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GenerationWindow {
    pub start: String,
    pub end: String,
}

impl GenerationWindow {
    /// Window of `days` whole days ending at the midnight preceding `today`.
    pub fn ending_at(today: DateTime<Utc>, days: u32) -> Self {
        let end = today.date_naive().and_time(NaiveTime::MIN);
        let start = end - Duration::days(i64::from(days));
        GenerationWindow {
            start: start.format(DATETIME_FORMAT).to_string(),
            end: end.format(DATETIME_FORMAT).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (format!("{ENV_PREFIX}{k}"), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = GeneratorConfig::resolve(|_| None).unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.partition_mode, PartitionMode::Actual);
        assert_eq!(config.window_days, 3);
        assert_eq!(config.max_concurrent, 4);
    }

    #[test]
    fn test_resolve_reads_all_variables() {
        let lookup = lookup_from(&[
            ("PARTITION_MODE", "daily"),
            ("WINDOW_DAYS", "7"),
            ("SENSOR_DEFAULT_STATUS", "stopped"),
            ("MAX_CONCURRENT", "16"),
        ]);
        let config = GeneratorConfig::resolve(lookup).unwrap();
        assert_eq!(config.partition_mode, PartitionMode::Daily);
        assert_eq!(config.window_days, 7);
        assert_eq!(config.sensor_default_status, SensorStatus::Stopped);
        assert_eq!(config.max_concurrent, 16);
    }

    #[test]
    fn test_invalid_mode_is_fatal() {
        let lookup = lookup_from(&[("PARTITION_MODE", "hourly")]);
        let err = GeneratorConfig::resolve(lookup).unwrap_err();
        assert_eq!(err.code(), 11);
    }

    #[test]
    fn test_zero_window_days_is_fatal() {
        let lookup = lookup_from(&[("WINDOW_DAYS", "0")]);
        assert!(GeneratorConfig::resolve(lookup).is_err());
    }

    #[test]
    fn test_window_bounds_are_midnight_aligned() {
        let today = Utc.with_ymd_and_hms(2026, 8, 6, 15, 42, 7).unwrap();
        let window = GenerationWindow::ending_at(today, 3);
        assert_eq!(window.end, "2026-08-06T00-00-00");
        assert_eq!(window.start, "2026-08-03T00-00-00");
    }
}
