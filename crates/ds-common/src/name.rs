//! Dataset and asset naming.
//!
//! Dataset names arrive from the source table in dotted form
//! (`managed.<id>` or `source.<id>`). The orchestration engine's identifier
//! grammar only admits ASCII alphanumerics and underscores, so the dotted
//! separator is normalized to an underscore before a name is used as a
//! work-item identifier or dependency reference.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace prefix for datasets that carry their own metadata row.
pub const MANAGED_PREFIX: &str = "managed.";

/// Raw dataset name as it appears in the source table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetName(String);

impl DatasetName {
    pub fn new(name: impl Into<String>) -> Self {
        DatasetName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for names in the managed namespace. Everything else is treated
    /// as an externally produced source dataset.
    pub fn is_managed(&self) -> bool {
        self.0.starts_with(MANAGED_PREFIX)
    }

    /// The normalized identifier this dataset is registered under.
    pub fn asset_name(&self) -> AssetName {
        AssetName::normalized(&self.0)
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Work-item identifier: a dataset name with the reserved `.` separator
/// replaced by `_`.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct AssetName(String);

impl AssetName {
    /// Normalize a raw dataset name into an identifier.
    pub fn normalized(raw: &str) -> Self {
        AssetName(raw.replace('.', "_"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a string already satisfies the engine's identifier grammar.
    pub fn is_valid(s: &str) -> bool {
        !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

impl fmt::Display for AssetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_managed_prefix_detection() {
        assert!(DatasetName::new("managed.abc123").is_managed());
        assert!(!DatasetName::new("source.abc123").is_managed());
        assert!(!DatasetName::new("managed_abc123").is_managed());
    }

    #[test]
    fn test_normalization_replaces_all_separators() {
        let name = DatasetName::new("managed.team.abc123");
        assert_eq!(name.asset_name().as_str(), "managed_team_abc123");
    }

    #[test]
    fn test_normalized_names_satisfy_grammar() {
        let asset = DatasetName::new("source.raw_events").asset_name();
        assert!(AssetName::is_valid(asset.as_str()));
        assert!(!AssetName::is_valid(""));
        assert!(!AssetName::is_valid("source.raw"));
    }
}
