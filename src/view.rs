// Tree view projection: turns session state into renderable items.

use crate::filter::{filteredRoots, getTagStats, isSameTag};
use crate::models::{FileEntry, Group, TagStat};
use crate::session::Session;
use crate::tree::findGroupById;

/// One renderable node. Groups and files are cloned out of the state so the
/// host never holds a reference into the session lock.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeItem {
    /// Collapsible "Tags" header; present when any tags exist or a tag
    /// filter is still active.
    TagSummary {
        tags: Vec<TagStat>,
        activeTag: Option<String>,
    },
    /// "Clear tag filter" action row, shown only while a filter is active.
    TagClear,
    TagEntry {
        stat: TagStat,
        active: bool,
    },
    Group(Group),
    File {
        groupId: String,
        entry: FileEntry,
    },
}

impl Session {
    fn buildTagSummary(&self) -> Option<TreeItem> {
        let stats = self.withState(|s| getTagStats(&s.groups));
        let active = self.tagFilter.read().clone();
        if stats.is_empty() && active.is_none() {
            return None;
        }
        Some(TreeItem::TagSummary {
            tags: stats,
            activeTag: active,
        })
    }

    /// Root listing: the tag summary (when present) followed by the
    /// filtered root groups.
    pub fn getRoots(&self) -> Vec<TreeItem> {
        let mut items = Vec::new();
        if let Some(summary) = self.buildTagSummary() {
            items.push(summary);
        }
        let nameFilter = self.groupFilter.read().clone();
        let tagFilter = self.tagFilter.read().clone();
        let roots = self.withState(|s| {
            filteredRoots(&s.groups, nameFilter.as_deref(), tagFilter.as_deref())
        });
        items.extend(roots.into_iter().map(TreeItem::Group));
        items
    }

    pub fn getChildren(&self, item: &TreeItem) -> Vec<TreeItem> {
        match item {
            TreeItem::TagSummary { tags, activeTag } => {
                let mut items = Vec::new();
                if activeTag.is_some() {
                    items.push(TreeItem::TagClear);
                }
                for stat in tags {
                    let active = activeTag
                        .as_deref()
                        .map(|t| isSameTag(&stat.tag, t))
                        .unwrap_or(false);
                    items.push(TreeItem::TagEntry {
                        stat: stat.clone(),
                        active,
                    });
                }
                items
            }
            TreeItem::Group(group) => {
                let mut items = Vec::new();
                for child in &group.children {
                    items.push(TreeItem::Group(child.clone()));
                }
                for entry in &group.files {
                    items.push(TreeItem::File {
                        groupId: group.id.clone(),
                        entry: entry.clone(),
                    });
                }
                items
            }
            _ => Vec::new(),
        }
    }

    /// Parent lookup for reveal support.
    pub fn getParent(&self, item: &TreeItem) -> Option<TreeItem> {
        match item {
            TreeItem::TagEntry { .. } | TreeItem::TagClear => self.buildTagSummary(),
            TreeItem::TagSummary { .. } => None,
            TreeItem::File { groupId, .. } => self.withState(|s| {
                findGroupById(&s.groups, groupId).map(|f| TreeItem::Group(f.group.clone()))
            }),
            TreeItem::Group(group) => self.withState(|s| {
                findGroupById(&s.groups, &group.id)
                    .and_then(|f| f.parent)
                    .map(|p| TreeItem::Group(p.clone()))
            }),
        }
    }
}
