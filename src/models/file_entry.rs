// File entry model: one path owned by exactly one group's file list

use serde::{Deserialize, Serialize};

/// Whether an entry points at a file or is a folder kept as a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    #[default]
    File,
    Folder,
}

/// A workspace path stored relative to `meta.basePath` (POSIX separators),
/// with an optional display alias, description and normalized tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FileEntry {
    pub rel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub kind: FileKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl FileEntry {
    pub fn file(rel: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            kind: FileKind::File,
            ..Default::default()
        }
    }

    pub fn folder(rel: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            kind: FileKind::Folder,
            ..Default::default()
        }
    }

    pub fn withKind(rel: impl Into<String>, kind: FileKind) -> Self {
        Self {
            rel: rel.into(),
            kind,
            ..Default::default()
        }
    }

    /// Label shown in the tree: alias when set, else the relative path.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.rel)
    }
}
