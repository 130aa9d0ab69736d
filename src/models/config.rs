//! Config file model.

use crate::models::policy::PolicySection;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub policy: PolicySection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSection {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub key_match: KeyMatch,
}

/// How a key is looked up in the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMatch {
    /// Compare against the parsed key field of each record.
    #[default]
    Exact,
    /// Any space-separated fragment of the file containing the key matches.
    /// Deletion removes `<key> - .* (.*)` patterns from the raw contents.
    Substring,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_defaults() {
        let config: ConfigFile = toml::from_str("").unwrap();
        assert!(config.store.path.is_none());
        assert_eq!(config.store.key_match, KeyMatch::Exact);
        assert!(config.policy.audit);
        assert!(!config.policy.reveal);
        assert!(!config.policy.clip);
    }

    #[test]
    fn test_parse_full_config() {
        let config: ConfigFile = toml::from_str(
            r#"
            [store]
            path = "/tmp/pw.txt"
            key_match = "substring"

            [policy]
            audit = false
            reveal = true
            clip = true
            "#,
        )
        .unwrap();
        assert_eq!(config.store.path, Some(PathBuf::from("/tmp/pw.txt")));
        assert_eq!(config.store.key_match, KeyMatch::Substring);
        assert!(!config.policy.audit);
        assert!(config.policy.reveal);
        assert!(config.policy.clip);
    }
}
