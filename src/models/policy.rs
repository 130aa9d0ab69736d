//! Policy configuration for store operations.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySection {
    /// Record generate/delete actions in the audit trail.
    #[serde(default = "default_audit")]
    pub audit: bool,

    /// Print the generated password after storing it.
    #[serde(default)]
    pub reveal: bool,

    /// Copy the generated password to the clipboard after storing it.
    #[serde(default)]
    pub clip: bool,
}

impl Default for PolicySection {
    fn default() -> Self {
        Self {
            audit: default_audit(),
            reveal: false,
            clip: false,
        }
    }
}

fn default_audit() -> bool {
    true
}
