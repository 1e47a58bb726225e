//! Evaluation trigger watchers.
//!
//! A fixed pool of 50 trigger indices spreads automation evaluation across
//! watchers. Each location publishes one watcher per index in its
//! contiguous slice of the pool; a watcher targets every work item tagged
//! with its index, wherever that item was emitted. One catch-all watcher
//! covers everything outside the generated group.

use std::ops::Range;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use ds_config::SensorStatus;

use crate::shard::{LocationId, Topology};
use crate::GRAPH_GROUP;

/// Size of the evaluation-trigger index pool.
pub const EVALUATION_TRIGGER_COUNT: u32 = 50;

/// Minimum re-evaluation interval for the catch-all watcher, in seconds.
pub const CATCH_ALL_MIN_INTERVAL_SECONDS: u64 = 120;

/// What a trigger watcher evaluates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WatcherTarget {
    /// Work items whose `eval_sensor_index` equals `index`, across all
    /// locations.
    TriggerIndex { index: u32 },
    /// Everything outside the named group.
    OutsideGroup { group: String },
}

/// Declarative trigger-watcher descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TriggerWatcher {
    pub name: String,
    pub target: WatcherTarget,
    pub default_status: SensorStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_interval_seconds: Option<u64>,
}

/// Contiguous slice of the trigger pool owned by `location`.
///
/// Integer division keeps the slices a partition of `[0, 50)` for any
/// location count; counts that do not divide 50 evenly get ragged slice
/// sizes rather than an error.
pub fn sensor_range(location: LocationId, topology: &Topology) -> Range<u32> {
    let n = topology.location_count();
    let k = location.0;
    ((k - 1) * EVALUATION_TRIGGER_COUNT / n)..(k * EVALUATION_TRIGGER_COUNT / n)
}

fn index_watcher(index: u32, status: SensorStatus) -> TriggerWatcher {
    TriggerWatcher {
        name: format!("eval_automation_sensor_{index}"),
        target: WatcherTarget::TriggerIndex { index },
        default_status: status,
        minimum_interval_seconds: None,
    }
}

/// Watchers for the slice of the pool `location` owns.
pub fn location_watchers(
    location: LocationId,
    topology: &Topology,
    status: SensorStatus,
) -> Vec<TriggerWatcher> {
    sensor_range(location, topology)
        .map(|index| index_watcher(index, status))
        .collect()
}

/// Watchers for the whole pool, used by the unsharded full-graph build.
pub fn all_watchers(status: SensorStatus) -> Vec<TriggerWatcher> {
    (0..EVALUATION_TRIGGER_COUNT)
        .map(|index| index_watcher(index, status))
        .collect()
}

/// The catch-all watcher for assets outside the generated graph's group.
pub fn catch_all_watcher(status: SensorStatus) -> TriggerWatcher {
    TriggerWatcher {
        name: "eval_automation_sensor_default".to_string(),
        target: WatcherTarget::OutsideGroup {
            group: GRAPH_GROUP.to_string(),
        },
        default_status: status,
        minimum_interval_seconds: Some(CATCH_ALL_MIN_INTERVAL_SECONDS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_locations_split_evenly() {
        let topology = Topology::new(5).unwrap();
        let ranges: Vec<Range<u32>> = topology
            .locations()
            .map(|loc| sensor_range(loc, &topology))
            .collect();
        assert_eq!(ranges, vec![0..10, 10..20, 20..30, 30..40, 40..50]);
    }

    #[test]
    fn test_ragged_split_still_partitions_the_pool() {
        for n in 1..=50 {
            let topology = Topology::new(n).unwrap();
            let mut covered: Vec<u32> = topology
                .locations()
                .flat_map(|loc| sensor_range(loc, &topology))
                .collect();
            covered.sort_unstable();
            let expected: Vec<u32> = (0..EVALUATION_TRIGGER_COUNT).collect();
            assert_eq!(covered, expected, "pool not partitioned for n={n}");
        }
    }

    #[test]
    fn test_watcher_names_carry_the_index() {
        let topology = Topology::new(5).unwrap();
        let watchers = location_watchers(LocationId(3), &topology, SensorStatus::Running);
        assert_eq!(watchers.len(), 10);
        assert_eq!(watchers[0].name, "eval_automation_sensor_20");
        assert_eq!(
            watchers[0].target,
            WatcherTarget::TriggerIndex { index: 20 }
        );
        assert_eq!(watchers[9].name, "eval_automation_sensor_29");
    }

    #[test]
    fn test_catch_all_excludes_the_graph_group() {
        let watcher = catch_all_watcher(SensorStatus::Stopped);
        assert_eq!(watcher.name, "eval_automation_sensor_default");
        assert_eq!(
            watcher.target,
            WatcherTarget::OutsideGroup {
                group: GRAPH_GROUP.to_string()
            }
        );
        assert_eq!(
            watcher.minimum_interval_seconds,
            Some(CATCH_ALL_MIN_INTERVAL_SECONDS)
        );
    }

    #[test]
    fn test_full_pool_watchers() {
        let watchers = all_watchers(SensorStatus::Running);
        assert_eq!(watchers.len(), EVALUATION_TRIGGER_COUNT as usize);
        assert_eq!(watchers[49].name, "eval_automation_sensor_49");
    }
}
