//! Folder hierarchy behaviour.

use serde::{Deserialize, Serialize};

/// How far a folder rename, move, or delete reaches below the folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CascadeMode {
    /// Every descendant, at any depth.
    #[default]
    Subtree,
    /// Direct children only. Deeper descendants keep their old `folderPath`.
    Shallow,
}

/// What `create` does when the target name is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Pick the next free `name (n).ext`.
    #[default]
    Rename,
    /// Delete the existing record first.
    Overwrite,
    /// Fail with `DuplicateName`.
    Reject,
}

/// Hierarchy configuration, fixed at startup.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HierarchyConfig {
    /// Cascade depth for structural mutations.
    #[serde(default)]
    pub cascade: CascadeMode,
    /// Conflict policy used when a caller does not pick one.
    #[serde(default)]
    pub default_conflict_policy: ConflictPolicy,
    /// Tenant namespace applied when a request carries none.
    #[serde(default)]
    pub namespace: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HierarchyConfig::default();
        assert_eq!(config.cascade, CascadeMode::Subtree);
        assert_eq!(config.default_conflict_policy, ConflictPolicy::Rename);
        assert!(config.namespace.is_none());
    }

    #[test]
    fn test_lowercase_names() {
        let mode: CascadeMode = serde_json::from_str("\"shallow\"").unwrap();
        assert_eq!(mode, CascadeMode::Shallow);
        let policy: ConflictPolicy = serde_json::from_str("\"overwrite\"").unwrap();
        assert_eq!(policy, ConflictPolicy::Overwrite);
    }
}
