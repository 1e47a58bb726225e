//! Dataset dependency graph.
//!
//! Rows are grouped into one canonical record per distinct dataset (first
//! occurrence wins for metadata) plus a deduplicated parent set per dataset.
//! The graph is assumed acyclic by construction of the source table; no
//! cycle detection is performed.

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;

use ds_common::DatasetName;

use crate::table::DatasetRow;

/// Canonical per-dataset scheduling metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRecord {
    pub name: DatasetName,
    pub queue_binding: String,
    pub partition_seconds: u32,
    pub max_contiguous_seconds: Option<u64>,
}

impl DatasetRecord {
    fn from_row(row: &DatasetRow) -> Self {
        DatasetRecord {
            name: DatasetName::new(row.dataset_name.clone()),
            queue_binding: row.queue_binding.clone(),
            partition_seconds: truncate_seconds(row.partition_seconds).unwrap_or(0),
            max_contiguous_seconds: truncate_seconds(row.max_contiguous_seconds)
                .map(u64::from),
        }
    }

    /// Backfill batching limit: how many contiguous partitions one run may
    /// cover. Datasets with unusable metadata fall back to single-partition
    /// batches rather than failing.
    pub fn max_partitions_per_batch(&self) -> u32 {
        match self.max_contiguous_seconds {
            Some(contiguous) if self.partition_seconds > 0 => {
                let batch = contiguous / u64::from(self.partition_seconds);
                (batch.min(u64::from(u32::MAX)) as u32).max(1)
            }
            _ => 1,
        }
    }
}

fn truncate_seconds(raw: Option<f64>) -> Option<u32> {
    raw.filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.min(f64::from(u32::MAX)) as u32)
}

/// Parent adjacency plus canonical records for the whole table.
#[derive(Debug, Clone, Default)]
pub struct DatasetGraph {
    records: Vec<DatasetRecord>,
    parents: HashMap<DatasetName, IndexSet<DatasetName>>,
    known: HashSet<DatasetName>,
}

impl DatasetGraph {
    pub fn from_rows(rows: &[DatasetRow]) -> Self {
        let mut graph = DatasetGraph::default();
        for row in rows {
            let name = DatasetName::new(row.dataset_name.clone());
            let entry = graph.parents.entry(name.clone()).or_default();
            if !row.parent_dataset_name.is_empty() {
                entry.insert(DatasetName::new(row.parent_dataset_name.clone()));
            }
            if graph.known.insert(name) {
                graph.records.push(DatasetRecord::from_row(row));
            }
        }
        graph
    }

    /// Canonical records in table order.
    pub fn records(&self) -> &[DatasetRecord] {
        &self.records
    }

    /// Distinct parents of `name` in first-reference order.
    pub fn parents_of(&self, name: &DatasetName) -> impl Iterator<Item = &DatasetName> {
        self.parents.get(name).into_iter().flatten()
    }

    /// Whether `name` has its own metadata row in the table.
    pub fn is_known(&self, name: &DatasetName) -> bool {
        self.known.contains(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
