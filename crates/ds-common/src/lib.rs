//! dag-stress common types, names, and errors.
//!
//! This crate provides foundational types shared across ds-core modules:
//! - Dataset and asset naming with normalization guarantees
//! - Unified error types
//! - Definition-bundle schema versioning

pub mod error;
pub mod name;
pub mod schema;

pub use error::{Error, Result};
pub use name::{AssetName, DatasetName, MANAGED_PREFIX};
pub use schema::BUNDLE_SCHEMA_VERSION;
