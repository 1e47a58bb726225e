//! dag-stress generation settings.
//!
//! This crate provides:
//! - Typed settings resolved from `DAG_STRESS_*` environment variables
//! - Range validation with fatal errors on misconfiguration
//! - Generation-window derivation (the partition start/end range)
//! - Config snapshots embedded in emitted definition bundles

pub mod settings;
pub mod snapshot;

pub use settings::{
    GenerationWindow, GeneratorConfig, PartitionMode, SensorStatus, DATETIME_FORMAT, ENV_PREFIX,
};
pub use snapshot::ConfigSnapshot;
