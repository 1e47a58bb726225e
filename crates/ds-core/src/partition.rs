//! Partition scheme derivation.
//!
//! Managed datasets declare their cadence as a timeslice duration in
//! seconds; the orchestration engine wants a cron-shaped time-window
//! partition definition. Only the cadences that actually occur in the
//! production table are mapped; anything else falls back to daily.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use ds_config::{GenerationWindow, PartitionMode, DATETIME_FORMAT};

/// Daily cadence, also the fallback for unrecognized durations.
pub const DAILY_CRON: &str = "0 0 * * *";

/// Cron schedule for a timeslice duration.
pub fn cron_schedule_for(partition_seconds: u32) -> &'static str {
    match partition_seconds {
        300 => "*/5 * * * *",
        600 => "*/10 * * * *",
        900 => "*/15 * * * *",
        1200 => "*/20 * * * *",
        1800 => "*/30 * * * *",
        3600 => "0 * * * *",
        10800 => "0 */3 * * *",
        21600 => "0 */6 * * *",
        _ => DAILY_CRON,
    }
}

/// Declarative partition scheme attached to a work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PartitionSpec {
    /// Cron-shaped time-window partitions bounded by the window.
    TimeWindow {
        cron_schedule: String,
        start: String,
        end: String,
        fmt: String,
        timezone: String,
    },
    /// Plain daily partitions over the same window.
    Daily { start_date: String, end_date: String },
}

impl PartitionSpec {
    /// Derive the scheme for one dataset under the configured mode.
    pub fn derive(mode: PartitionMode, partition_seconds: u32, window: &GenerationWindow) -> Self {
        match mode {
            PartitionMode::Actual => PartitionSpec::TimeWindow {
                cron_schedule: cron_schedule_for(partition_seconds).to_string(),
                start: window.start.clone(),
                end: window.end.clone(),
                fmt: DATETIME_FORMAT.to_string(),
                timezone: "UTC".to_string(),
            },
            PartitionMode::Daily => PartitionSpec::Daily {
                start_date: window.start.clone(),
                end_date: window.end.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> GenerationWindow {
        GenerationWindow {
            start: "2026-08-03T00-00-00".to_string(),
            end: "2026-08-06T00-00-00".to_string(),
        }
    }

    #[test]
    fn test_known_cadences_map_to_cron() {
        assert_eq!(cron_schedule_for(300), "*/5 * * * *");
        assert_eq!(cron_schedule_for(3600), "0 * * * *");
        assert_eq!(cron_schedule_for(21600), "0 */6 * * *");
        assert_eq!(cron_schedule_for(86400), DAILY_CRON);
    }

    #[test]
    fn test_unrecognized_cadence_falls_back_to_daily() {
        assert_eq!(cron_schedule_for(999_999), DAILY_CRON);
        assert_eq!(cron_schedule_for(0), DAILY_CRON);
    }

    #[test]
    fn test_actual_mode_uses_lookup_and_window() {
        let spec = PartitionSpec::derive(PartitionMode::Actual, 300, &window());
        match spec {
            PartitionSpec::TimeWindow {
                cron_schedule,
                start,
                end,
                timezone,
                ..
            } => {
                assert_eq!(cron_schedule, "*/5 * * * *");
                assert_eq!(start, "2026-08-03T00-00-00");
                assert_eq!(end, "2026-08-06T00-00-00");
                assert_eq!(timezone, "UTC");
            }
            other => panic!("expected time-window spec, got {other:?}"),
        }
    }

    #[test]
    fn test_daily_mode_ignores_cadence() {
        let spec = PartitionSpec::derive(PartitionMode::Daily, 300, &window());
        assert_eq!(
            spec,
            PartitionSpec::Daily {
                start_date: "2026-08-03T00-00-00".to_string(),
                end_date: "2026-08-06T00-00-00".to_string(),
            }
        );
    }
}
