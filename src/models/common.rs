// Common derived types shared across commands and the view layer

use serde::Serialize;

/// Per-tag usage counts over the whole tree. Derived, never persisted.
/// `groupCount` counts distinct groups carrying the tag; `fileCount` counts
/// file entries carrying it (repeats across groups are not deduplicated).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagStat {
    pub tag: String,
    pub groupCount: usize,
    pub fileCount: usize,
}

/// Sort key for a group's direct file list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    Alphabetical,
    Folder,
    FileType,
}

/// How selected folders are expanded when added to a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderHandlingMode {
    /// Keep each folder as a single entry.
    Folders,
    /// Add the folder's first-level files only.
    FirstLevel,
    /// Add every file under the folder recursively.
    Recursive,
}

/// Reference to one file entry: the owning group plus its stored path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub groupId: String,
    pub rel: String,
}

impl FileRef {
    pub fn new(groupId: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            groupId: groupId.into(),
            rel: rel.into(),
        }
    }
}
