//! Definition bundles: the composition root.
//!
//! A bundle is everything one code location publishes to the orchestration
//! engine: its owned work items, its trigger watchers, the executor
//! settings, and a snapshot of the configuration that produced it. The
//! window is injected by the caller; nothing below this point reads the
//! clock or the environment.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use ds_common::{Result, BUNDLE_SCHEMA_VERSION};
use ds_config::{ConfigSnapshot, GenerationWindow, GeneratorConfig};

use crate::emit::{Emitter, LocationFilter, WorkItem};
use crate::graph::DatasetGraph;
use crate::sensors::{all_watchers, catch_all_watcher, location_watchers, TriggerWatcher};
use crate::shard::{LocationId, Topology};
use crate::table::DatasetRow;

/// Worker cap forwarded to the downstream execution pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExecutorSettings {
    pub max_concurrent: u32,
}

/// Everything one code location publishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LocationDefinitions {
    pub schema_version: String,
    /// `None` for the unsharded full-graph build.
    pub location: Option<LocationId>,
    pub config: ConfigSnapshot,
    pub executor: ExecutorSettings,
    pub work_items: Vec<WorkItem>,
    pub watchers: Vec<TriggerWatcher>,
}

/// The aggregate over all locations plus the shared catch-all watcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DefinitionSet {
    pub schema_version: String,
    pub location_count: u32,
    pub locations: Vec<LocationDefinitions>,
    pub catch_all: TriggerWatcher,
}

fn bundle(
    config: &GeneratorConfig,
    location: Option<LocationId>,
    work_items: Vec<WorkItem>,
    watchers: Vec<TriggerWatcher>,
) -> LocationDefinitions {
    LocationDefinitions {
        schema_version: BUNDLE_SCHEMA_VERSION.to_string(),
        location,
        config: ConfigSnapshot::of(config),
        executor: ExecutorSettings {
            max_concurrent: config.max_concurrent,
        },
        work_items,
        watchers,
    }
}

/// Build the bundle for one location.
///
/// The graph is rebuilt from the rows on every call: each location process
/// derives the full table independently and agrees with its peers only
/// through the sharder.
pub fn build_location(
    rows: &[DatasetRow],
    config: &GeneratorConfig,
    window: &GenerationWindow,
    location: LocationId,
    topology: Topology,
) -> LocationDefinitions {
    let graph = DatasetGraph::from_rows(rows);
    let filter = LocationFilter::Only { location, topology };
    let work_items = Emitter::new(&graph, config, window, filter).emit_all();
    let watchers = location_watchers(location, &topology, config.sensor_default_status);
    info!(
        location = %location,
        work_items = work_items.len(),
        watchers = watchers.len(),
        datasets = graph.len(),
        "built location bundle"
    );
    bundle(config, Some(location), work_items, watchers)
}

/// Build the unsharded full-graph bundle (single-location deployments).
pub fn build_full(
    rows: &[DatasetRow],
    config: &GeneratorConfig,
    window: &GenerationWindow,
) -> LocationDefinitions {
    let graph = DatasetGraph::from_rows(rows);
    let work_items = Emitter::new(&graph, config, window, LocationFilter::All).emit_all();
    let watchers = all_watchers(config.sensor_default_status);
    info!(
        work_items = work_items.len(),
        datasets = graph.len(),
        "built full-graph bundle"
    );
    bundle(config, None, work_items, watchers)
}

/// Build bundles for every location `1..=location_count` plus the shared
/// catch-all watcher.
pub fn build_set(
    rows: &[DatasetRow],
    config: &GeneratorConfig,
    window: &GenerationWindow,
    location_count: u32,
) -> Result<DefinitionSet> {
    let topology = Topology::new(location_count)?;
    let locations = topology
        .locations()
        .map(|location| build_location(rows, config, window, location, topology))
        .collect();
    Ok(DefinitionSet {
        schema_version: BUNDLE_SCHEMA_VERSION.to_string(),
        location_count,
        locations,
        catch_all: catch_all_watcher(config.sensor_default_status),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::WatcherTarget;

    fn rows() -> Vec<DatasetRow> {
        ["managed.a", "managed.b", "managed.c"]
            .iter()
            .map(|name| DatasetRow {
                dataset_name: name.to_string(),
                parent_dataset_name: "source.x".to_string(),
                end_date: None,
                start_date: None,
                queue_binding: "q".to_string(),
                partition_seconds: Some(3600.0),
                max_contiguous_seconds: None,
            })
            .collect()
    }

    fn window() -> GenerationWindow {
        GenerationWindow {
            start: "2026-08-03T00-00-00".to_string(),
            end: "2026-08-06T00-00-00".to_string(),
        }
    }

    #[test]
    fn test_set_has_one_bundle_per_location() {
        let set = build_set(&rows(), &GeneratorConfig::default(), &window(), 5).unwrap();
        assert_eq!(set.locations.len(), 5);
        assert_eq!(set.locations[0].location, Some(LocationId(1)));
        assert_eq!(set.locations[4].location, Some(LocationId(5)));
        for bundle in &set.locations {
            assert_eq!(bundle.schema_version, BUNDLE_SCHEMA_VERSION);
            assert_eq!(bundle.watchers.len(), 10);
            assert_eq!(bundle.executor.max_concurrent, 4);
        }
    }

    #[test]
    fn test_zero_locations_is_fatal() {
        assert!(build_set(&rows(), &GeneratorConfig::default(), &window(), 0).is_err());
    }

    #[test]
    fn test_full_build_owns_every_item() {
        let full = build_full(&rows(), &GeneratorConfig::default(), &window());
        assert_eq!(full.location, None);
        // Three managed datasets plus one shared source parent.
        assert_eq!(full.work_items.len(), 4);
        assert_eq!(full.watchers.len(), 50);
    }

    #[test]
    fn test_catch_all_is_shared_not_per_location() {
        let set = build_set(&rows(), &GeneratorConfig::default(), &window(), 5).unwrap();
        assert!(matches!(
            set.catch_all.target,
            WatcherTarget::OutsideGroup { .. }
        ));
        for bundle in &set.locations {
            assert!(bundle
                .watchers
                .iter()
                .all(|w| matches!(w.target, WatcherTarget::TriggerIndex { .. })));
        }
    }

    #[test]
    fn test_bundle_round_trips_through_json() {
        let set = build_set(&rows(), &GeneratorConfig::default(), &window(), 2).unwrap();
        let encoded = serde_json::to_string(&set.locations[0]).unwrap();
        let decoded: LocationDefinitions = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, set.locations[0]);
    }
}
