//! Config snapshots.
//!
//! Every emitted bundle embeds the settings that produced it, so a bundle
//! on disk can be traced back to a generation configuration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::settings::{GeneratorConfig, PartitionMode, SensorStatus};

/// Point-in-time copy of the settings a bundle was generated under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConfigSnapshot {
    pub partition_mode: PartitionMode,
    pub window_days: u32,
    pub sensor_default_status: SensorStatus,
    pub max_concurrent: u32,
}

impl ConfigSnapshot {
    pub fn of(config: &GeneratorConfig) -> Self {
        ConfigSnapshot {
            partition_mode: config.partition_mode,
            window_days: config.window_days,
            sensor_default_status: config.sensor_default_status,
            max_concurrent: config.max_concurrent,
        }
    }
}
