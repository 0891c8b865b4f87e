// Group model: a named tree node owning a file list and child groups
// UUID string for stable identity; name is display-only and may repeat

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::file_entry::FileEntry;

/// A group node. `children` forms a forest: a group is owned by exactly one
/// parent list at a time and carries no back-pointer, so the tree stays
/// acyclic by construction (parents are derived by search).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub files: Vec<FileEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Group>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iconId: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colorName: Option<String>,
}

impl Group {
    /// New empty group with a fresh UUID.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            ..Default::default()
        }
    }
}
