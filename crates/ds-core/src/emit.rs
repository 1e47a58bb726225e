//! Work-item emission.
//!
//! One pass over the canonical dataset records produces the location's
//! work items: a managed item per owned dataset, and a source item the
//! first time an owned, non-managed parent is referenced. Dependency lists
//! deliberately reference identifiers the current location never
//! materializes; the consuming engine resolves them across locations.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use ds_common::{AssetName, DatasetName};
use ds_config::{GenerationWindow, GeneratorConfig};

use crate::graph::{DatasetGraph, DatasetRecord};
use crate::partition::PartitionSpec;
use crate::sensors::EVALUATION_TRIGGER_COUNT;
use crate::shard::{LocationId, Topology};
use crate::GRAPH_GROUP;

/// Kind of work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemKind {
    /// Dataset with its own metadata row; carries dependencies and an
    /// automation rule.
    Managed,
    /// Placeholder for an externally produced parent dataset.
    Source,
}

/// Synthetic row-count hint the downstream executor draws from when
/// fabricating materialization results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RowCountRange {
    pub min: u64,
    pub max: u64,
}

const SOURCE_ROW_COUNT: RowCountRange = RowCountRange { min: 500, max: 2000 };
const MANAGED_ROW_COUNT: RowCountRange = RowCountRange {
    min: 2000,
    max: 10000,
};

/// Automation rule reference attached to managed items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AutomationRule {
    /// Eager evaluation without the latest-time-window restriction.
    EagerAllPartitions,
}

/// Window and batching metadata echoed on managed items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ManagedMetadata {
    pub start_date: String,
    pub end_date: String,
    pub max_contiguous_seconds: Option<u64>,
    pub max_partitions_per_batch: u32,
}

/// Declarative work-item descriptor consumed by the orchestration engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WorkItem {
    pub name: AssetName,
    pub kind: WorkItemKind,
    pub group: String,
    pub dependencies: Vec<AssetName>,
    pub partitions: PartitionSpec,
    pub max_partitions_per_batch: u32,
    /// Round-robin evaluation-trigger index in `[0, 50)`. A load-spreading
    /// rotation over watchers, unrelated to which location owns the item.
    pub eval_sensor_index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_binding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automation: Option<AutomationRule>,
    pub row_count_hint: RowCountRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ManagedMetadata>,
}

/// Which slice of the graph an emission pass keeps.
#[derive(Debug, Clone, Copy)]
pub enum LocationFilter {
    /// Unsharded full-graph build.
    All,
    /// Keep only assets `location` owns under `topology`.
    Only {
        location: LocationId,
        topology: Topology,
    },
}

impl LocationFilter {
    fn keeps(&self, identifier: &AssetName) -> bool {
        match self {
            LocationFilter::All => true,
            LocationFilter::Only { location, topology } => {
                topology.owns(identifier.as_str(), *location)
            }
        }
    }

    fn code_location(&self) -> Option<String> {
        match self {
            LocationFilter::All => None,
            LocationFilter::Only { location, .. } => Some(location.to_string()),
        }
    }
}

/// One emission pass over a dataset graph.
///
/// The evaluation-trigger counter is an explicit accumulator scoped to the
/// pass: it increments once per emitted item and is local to the emitting
/// location, so two locations assign their own rotations independently.
pub struct Emitter<'a> {
    graph: &'a DatasetGraph,
    config: &'a GeneratorConfig,
    window: &'a GenerationWindow,
    filter: LocationFilter,
    emitted: u64,
    sources_done: HashSet<DatasetName>,
}

impl<'a> Emitter<'a> {
    pub fn new(
        graph: &'a DatasetGraph,
        config: &'a GeneratorConfig,
        window: &'a GenerationWindow,
        filter: LocationFilter,
    ) -> Self {
        Emitter {
            graph,
            config,
            window,
            filter,
            emitted: 0,
            sources_done: HashSet::new(),
        }
    }

    /// Run the pass and return the emitted work items in emission order.
    pub fn emit_all(mut self) -> Vec<WorkItem> {
        let mut items = Vec::new();
        for record in self.graph.records() {
            self.emit_dataset(record, &mut items);
        }
        items
    }

    fn emit_dataset(&mut self, record: &DatasetRecord, items: &mut Vec<WorkItem>) {
        let partitions = PartitionSpec::derive(
            self.config.partition_mode,
            record.partition_seconds,
            self.window,
        );
        let mut dependencies = Vec::new();

        let parents: Vec<DatasetName> = self.graph.parents_of(&record.name).cloned().collect();
        for parent in parents {
            if parent.is_managed() && !self.graph.is_known(&parent) {
                // Managed reference without a metadata row: no placeholder
                // item, no dependency edge.
                debug!(parent = %parent, dataset = %record.name, "skipping unknown managed parent");
                continue;
            }

            let parent_asset = parent.asset_name();
            dependencies.push(parent_asset.clone());

            if !parent.is_managed()
                && !self.sources_done.contains(&parent)
                && self.filter.keeps(&parent_asset)
            {
                let item = self.source_item(parent_asset, partitions.clone());
                items.push(item);
                self.sources_done.insert(parent);
            }
        }

        let asset_name = record.name.asset_name();
        if self.filter.keeps(&asset_name) {
            let item = self.managed_item(record, asset_name, dependencies, partitions);
            items.push(item);
        }
    }

    fn source_item(&mut self, name: AssetName, partitions: PartitionSpec) -> WorkItem {
        WorkItem {
            name,
            kind: WorkItemKind::Source,
            group: GRAPH_GROUP.to_string(),
            dependencies: Vec::new(),
            partitions,
            max_partitions_per_batch: 1,
            eval_sensor_index: self.next_trigger_index(),
            queue_binding: None,
            code_location: self.filter.code_location(),
            automation: None,
            row_count_hint: SOURCE_ROW_COUNT,
            metadata: None,
        }
    }

    fn managed_item(
        &mut self,
        record: &DatasetRecord,
        name: AssetName,
        dependencies: Vec<AssetName>,
        partitions: PartitionSpec,
    ) -> WorkItem {
        let max_partitions_per_batch = record.max_partitions_per_batch();
        WorkItem {
            name,
            kind: WorkItemKind::Managed,
            group: GRAPH_GROUP.to_string(),
            dependencies,
            partitions,
            max_partitions_per_batch,
            eval_sensor_index: self.next_trigger_index(),
            queue_binding: Some(record.queue_binding.clone()),
            code_location: self.filter.code_location(),
            automation: Some(AutomationRule::EagerAllPartitions),
            row_count_hint: MANAGED_ROW_COUNT,
            metadata: Some(ManagedMetadata {
                start_date: self.window.start.clone(),
                end_date: self.window.end.clone(),
                max_contiguous_seconds: record.max_contiguous_seconds,
                max_partitions_per_batch,
            }),
        }
    }

    fn next_trigger_index(&mut self) -> u32 {
        self.emitted += 1;
        (self.emitted % u64::from(EVALUATION_TRIGGER_COUNT)) as u32
    }
}
