//! dag-stress core: declarative definition generation for an external
//! data-orchestration engine.
//!
//! The generator reads a tabular dataset description once, derives a
//! dependency graph with partition schemes and backfill batching limits,
//! and emits work-item and trigger-watcher descriptors sharded across N
//! independent "code locations". Execution, retry, and trigger-evaluation
//! semantics all belong to the consuming engine; everything here is pure,
//! single-threaded data derivation.
//!
//! Locations agree on asset ownership without communicating: the sharder is
//! a pure function of the asset name, so every location rebuilds the full
//! graph and keeps exactly its own slice.

pub mod definitions;
pub mod emit;
pub mod exit_codes;
pub mod graph;
pub mod partition;
pub mod sensors;
pub mod shard;
pub mod table;

pub use definitions::{build_full, build_location, build_set, DefinitionSet, LocationDefinitions};
pub use emit::{Emitter, LocationFilter, WorkItem, WorkItemKind};
pub use graph::{DatasetGraph, DatasetRecord};
pub use partition::PartitionSpec;
pub use sensors::{TriggerWatcher, EVALUATION_TRIGGER_COUNT};
pub use shard::{LocationId, Topology};
pub use table::{read_table, DatasetRow};

/// Group every generated work item is registered under; the catch-all
/// trigger watcher targets everything outside it.
pub const GRAPH_GROUP: &str = "dag_stress_graph";
