//! Definition-bundle schema versioning.

/// Current schema version stamped on every emitted bundle.
///
/// Follows semver: MAJOR.MINOR.PATCH
/// - MAJOR: Breaking changes (field removals, type changes)
/// - MINOR: Additive changes (new optional fields)
/// - PATCH: Bug fixes, documentation
pub const BUNDLE_SCHEMA_VERSION: &str = "1.0.0";

fn major(version: &str) -> u32 {
    version
        .split('.')
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(0)
}

/// Check whether a bundle produced under `version` can be consumed by a
/// reader built against the current schema.
pub fn is_compatible(version: &str) -> bool {
    major(version) == major(BUNDLE_SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_major_is_compatible() {
        assert!(is_compatible("1.0.0"));
        assert!(is_compatible("1.4.2"));
    }

    #[test]
    fn test_other_major_is_incompatible() {
        assert!(!is_compatible("0.9.0"));
        assert!(!is_compatible("2.0.0"));
        assert!(!is_compatible("garbage"));
    }
}
