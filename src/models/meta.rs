// Meta block of the persisted document: workspace root, timestamps and schema version

use serde::{Deserialize, Serialize};

/// Document metadata. `basePath` anchors every relative path in the tree;
/// `version` is reserved for future migrations and is currently always 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub basePath: String,
    #[serde(default)]
    pub createdAt: String,
    #[serde(default)]
    pub updatedAt: String,
    #[serde(default = "defaultVersion")]
    pub version: i64,
}

fn defaultVersion() -> i64 {
    1
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            basePath: String::new(),
            createdAt: String::new(),
            updatedAt: String::new(),
            version: 1,
        }
    }
}

impl Meta {
    /// Fresh meta for the given workspace root, both timestamps set to now.
    pub fn forBase(basePath: &str) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            basePath: basePath.to_string(),
            createdAt: now.clone(),
            updatedAt: now,
            version: 1,
        }
    }
}
