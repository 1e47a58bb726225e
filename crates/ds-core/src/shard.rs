//! Deterministic asset-to-location assignment.
//!
//! Each code location runs as an independent process and rebuilds the full
//! dataset graph on its own, so ownership must be decided without any
//! coordination: `location_of` is a pure function of the asset name bytes.
//! It must never depend on process memory addresses, random seeds, or
//! iteration order — two processes started years apart have to agree.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use ds_common::{Error, Result};

/// 1-indexed code-location id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct LocationId(pub u32);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "location_{}", self.0)
    }
}

/// Validated location topology: how many code locations share the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    location_count: u32,
}

impl Topology {
    /// A zero location count makes ownership undecidable and is fatal.
    pub fn new(location_count: u32) -> Result<Self> {
        if location_count == 0 {
            return Err(Error::LocationCount {
                count: location_count,
            });
        }
        Ok(Topology { location_count })
    }

    pub fn location_count(&self) -> u32 {
        self.location_count
    }

    /// All location ids, in order.
    pub fn locations(&self) -> impl Iterator<Item = LocationId> {
        (1..=self.location_count).map(LocationId)
    }

    /// The location that owns `identifier`.
    ///
    /// A 256-bit digest of the name is reduced to its first 128 bits and
    /// taken modulo the location count. Any string is valid input.
    pub fn location_of(&self, identifier: &str) -> LocationId {
        let digest = Sha256::digest(identifier.as_bytes());
        let mut wide = [0u8; 16];
        wide.copy_from_slice(&digest[..16]);
        let value = u128::from_be_bytes(wide);
        LocationId((value % u128::from(self.location_count)) as u32 + 1)
    }

    /// Whether `location` owns `identifier`.
    pub fn owns(&self, identifier: &str, location: LocationId) -> bool {
        self.location_of(identifier) == location
    }
}
