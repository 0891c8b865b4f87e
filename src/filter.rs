// Tag statistics and filtered tree views
// Everything here is a read-only projection: pruned views are fresh clones
// and the live tree is never touched. Mutation commands always resolve
// through tree::findGroupById against the live state, never against a view.

use std::collections::HashSet;

use crate::models::{FileEntry, Group, TagStat};

/// Case-insensitive tag equality after trimming.
pub fn isSameTag(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn groupHasTag(group: &Group, tag: &str) -> bool {
    group.tags.iter().any(|t| isSameTag(t, tag))
}

fn fileHasTag(file: &FileEntry, tag: &str) -> bool {
    file.tags.iter().any(|t| isSameTag(t, tag))
}

fn groupHasFileWithTag(group: &Group, tag: &str) -> bool {
    group.files.iter().any(|f| fileHasTag(f, tag))
}

/// OR semantics up the tree: the group carries the tag, owns a tagged file,
/// or has a matching descendant.
pub fn groupMatchesTag(group: &Group, tag: &str) -> bool {
    if groupHasTag(group, tag) || groupHasFileWithTag(group, tag) {
        return true;
    }
    group.children.iter().any(|c| groupMatchesTag(c, tag))
}

/// Per-tag usage over the whole forest: distinct groups as a set, file
/// occurrences as a raw count. Sorted case-insensitively, zero-total entries
/// excluded.
pub fn getTagStats(groups: &[Group]) -> Vec<TagStat> {
    struct Acc {
        tag: String,
        groupIds: HashSet<String>,
        fileCount: usize,
    }
    let mut accs: Vec<Acc> = Vec::new();
    fn entryIndex(accs: &mut Vec<Acc>, rawTag: &str) -> Option<usize> {
        let trimmed = rawTag.trim();
        if trimmed.is_empty() {
            return None;
        }
        let key = trimmed.to_lowercase();
        if let Some(idx) = accs.iter().position(|a| a.tag.to_lowercase() == key) {
            return Some(idx);
        }
        accs.push(Acc {
            tag: trimmed.to_string(),
            groupIds: HashSet::new(),
            fileCount: 0,
        });
        Some(accs.len() - 1)
    }
    fn visit(accs: &mut Vec<Acc>, nodes: &[Group]) {
        for g in nodes {
            for tag in &g.tags {
                if let Some(idx) = entryIndex(accs, tag) {
                    accs[idx].groupIds.insert(g.id.clone());
                }
            }
            for file in &g.files {
                for tag in &file.tags {
                    if let Some(idx) = entryIndex(accs, tag) {
                        accs[idx].fileCount += 1;
                    }
                }
            }
            visit(accs, &g.children);
        }
    }
    visit(&mut accs, groups);
    let mut stats: Vec<TagStat> = accs
        .into_iter()
        .map(|a| TagStat {
            tag: a.tag,
            groupCount: a.groupIds.len(),
            fileCount: a.fileCount,
        })
        .filter(|s| s.groupCount > 0 || s.fileCount > 0)
        .collect();
    stats.sort_by(|a, b| {
        a.tag
            .to_lowercase()
            .cmp(&b.tag.to_lowercase())
            .then_with(|| a.tag.cmp(&b.tag))
    });
    stats
}

/// Prunes a group for the active tag filter. A direct match keeps its whole
/// file list (children still pruned; the original subtree is reused when
/// pruning removed nothing); an indirect match keeps only matching files and
/// pruned children; no match at all drops the group from the view.
pub fn pruneGroupForTagFilter(group: &Group, tag: &str) -> Option<Group> {
    let directMatch = groupHasTag(group, tag);
    let matchingFiles: Vec<FileEntry> = group
        .files
        .iter()
        .filter(|f| fileHasTag(f, tag))
        .cloned()
        .collect();
    let prunedChildren: Vec<Group> = group
        .children
        .iter()
        .filter_map(|c| pruneGroupForTagFilter(c, tag))
        .collect();

    if directMatch {
        if prunedChildren.len() == group.children.len() {
            return Some(group.clone());
        }
        let mut kept = group.clone();
        kept.children = prunedChildren;
        return Some(kept);
    }

    if !matchingFiles.is_empty() || !prunedChildren.is_empty() {
        let mut kept = group.clone();
        kept.files = matchingFiles;
        kept.children = prunedChildren;
        return Some(kept);
    }

    None
}

/// Root listing for the view: tag restriction first, then the name filter
/// (applied only at the root level, by design), then tag pruning of each
/// surviving root.
pub fn filteredRoots(
    groups: &[Group],
    nameFilter: Option<&str>,
    tagFilter: Option<&str>,
) -> Vec<Group> {
    let mut results: Vec<&Group> = groups.iter().collect();
    if let Some(tag) = tagFilter {
        results.retain(|g| groupMatchesTag(g, tag));
    }
    if let Some(needle) = nameFilter {
        let needle = needle.to_lowercase();
        results.retain(|g| g.name.to_lowercase().contains(&needle));
    }
    if let Some(tag) = tagFilter {
        results
            .iter()
            .filter_map(|g| pruneGroupForTagFilter(g, tag))
            .collect()
    } else {
        results.into_iter().cloned().collect()
    }
}
