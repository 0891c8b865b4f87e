// Group mutation commands.

use std::time::Instant;

use crate::commands::common::{isValidHex, normalizeHex, parseTagInput};
use crate::host::{Dialogs, PickItem, ThemeTokenAllocator};
use crate::models::{Group, SortMode};
use crate::normalize::{fromRelativeToAbs, isSameRel, labelForTopFolder, normalizeTags};
use crate::session::Session;
use crate::tree::{findGroupById, findGroupByIdMut, removeGroupById, suggestGroupName};

pub const ICON_DEFAULT: &str = "__default__";
pub const ICON_NONE: &str = "__none__";
pub const COLOR_DEFAULT: &str = "__default__";
pub const COLOR_CUSTOM_HEX: &str = "__custom_hex__";

/// Creates a group under `parent` (or at the root) with an auto-suggested
/// name over its direct siblings. Returns the new group id so the view can
/// reveal it.
pub fn addGroup(
    session: &Session,
    dialogs: &dyn Dialogs,
    parent: Option<&str>,
    now: Instant,
) -> Option<String> {
    let suggested = session.withState(|s| {
        let siblings = parent
            .and_then(|id| findGroupById(&s.groups, id))
            .map(|f| f.group.children.as_slice())
            .unwrap_or(&s.groups);
        suggestGroupName(siblings)
    });
    let name = dialogs.inputBox("Group name", &suggested, None)?;
    let finalName = if name.trim().is_empty() {
        suggested
    } else {
        name.trim().to_string()
    };
    let newGroup = Group::new(finalName);
    let newId = newGroup.id.clone();

    let mut next = session.snapshot();
    match parent.and_then(|id| findGroupByIdMut(&mut next.groups, id)) {
        Some(parentGroup) => parentGroup.children.push(newGroup),
        None => next.groups.push(newGroup),
    }
    session.setStateAt(next, now);
    session.view.refresh(Some(&newId));
    println!("[addGroup] created {}", newId);
    Some(newId)
}

pub fn addSubGroup(
    session: &Session,
    dialogs: &dyn Dialogs,
    parent: &str,
    now: Instant,
) -> Option<String> {
    addGroup(session, dialogs, Some(parent), now)
}

pub fn renameGroup(session: &Session, dialogs: &dyn Dialogs, groupId: &str, now: Instant) {
    let current = session.withState(|s| {
        findGroupById(&s.groups, groupId).map(|f| f.group.name.clone())
    });
    let Some(current) = current else { return };
    let Some(name) = dialogs.inputBox("Rename group", &current, None) else {
        return;
    };
    if name.is_empty() {
        return;
    }
    let mut next = session.snapshot();
    if let Some(group) = findGroupByIdMut(&mut next.groups, groupId) {
        group.name = name;
        session.setStateAt(next, now);
        session.view.refresh(Some(groupId));
    }
}

/// Name + optional description in one flow. An empty name keeps the old one;
/// an empty description clears it.
pub fn editGroupMeta(session: &Session, dialogs: &dyn Dialogs, groupId: &str, now: Instant) {
    let current = session.withState(|s| {
        findGroupById(&s.groups, groupId)
            .map(|f| (f.group.name.clone(), f.group.description.clone()))
    });
    let Some((name, description)) = current else { return };
    let Some(nextName) = dialogs.inputBox("Group name", &name, None) else {
        return;
    };
    let Some(nextDescription) =
        dialogs.inputBox("Description (optional)", description.as_deref().unwrap_or(""), None)
    else {
        return;
    };
    let mut next = session.snapshot();
    if let Some(group) = findGroupByIdMut(&mut next.groups, groupId) {
        let trimmedName = nextName.trim();
        if !trimmedName.is_empty() {
            group.name = trimmedName.to_string();
        }
        let trimmedDescription = nextDescription.trim();
        group.description = if trimmedDescription.is_empty() {
            None
        } else {
            Some(trimmedDescription.to_string())
        };
        session.setStateAt(next, now);
        session.view.refresh(Some(groupId));
    }
}

pub fn editGroupTags(session: &Session, dialogs: &dyn Dialogs, groupId: &str, now: Instant) {
    let current = session.withState(|s| {
        findGroupById(&s.groups, groupId).map(|f| f.group.tags.join(", "))
    });
    let Some(current) = current else { return };
    let Some(value) = dialogs.inputBox(
        "Group tags",
        &current,
        Some("Comma-separated, e.g. api, backend"),
    ) else {
        return;
    };
    let mut next = session.snapshot();
    if let Some(group) = findGroupByIdMut(&mut next.groups, groupId) {
        group.tags = normalizeTags(parseTagInput(&value));
        session.setStateAt(next, now);
        session.view.refresh(Some(groupId));
    }
}

/// One removable selection entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RemoveTarget {
    Group(String),
    File { groupId: String, rel: String },
}

/// Removes the selected groups (cascade) and files, deduplicating repeat
/// selections. Returns the number of selection entries actually removed.
pub fn removeItems(
    session: &Session,
    dialogs: &dyn Dialogs,
    targets: &[RemoveTarget],
    confirmBeforeRemove: bool,
    now: Instant,
) -> usize {
    if targets.is_empty() {
        return 0;
    }
    if confirmBeforeRemove {
        let message = describeRemoval(session, targets);
        if !dialogs.confirm(&message, "Remove") {
            return 0;
        }
    }
    let mut next = session.snapshot();
    let base = next.meta.basePath.clone();
    let mut removed = 0;
    let mut seen = std::collections::HashSet::new();
    for target in targets {
        if !seen.insert(target.clone()) {
            continue;
        }
        match target {
            RemoveTarget::Group(id) => {
                if removeGroupById(&mut next.groups, id) {
                    removed += 1;
                }
            }
            RemoveTarget::File { groupId, rel } => {
                if let Some(group) = findGroupByIdMut(&mut next.groups, groupId) {
                    let before = group.files.len();
                    group.files.retain(|f| !isSameRel(&f.rel, rel, &base));
                    if group.files.len() != before {
                        removed += 1;
                    }
                }
            }
        }
    }
    if removed == 0 {
        return 0;
    }
    session.setStateAt(next, now);
    session.view.refresh(None);
    if targets.len() > 1 {
        dialogs.showInfo(&format!("Removed {} items.", targets.len()));
    }
    removed
}

fn describeRemoval(session: &Session, targets: &[RemoveTarget]) -> String {
    if targets.len() == 1 {
        return match &targets[0] {
            RemoveTarget::Group(id) => {
                let name = session.withState(|s| {
                    findGroupById(&s.groups, id).map(|f| f.group.name.clone())
                });
                format!(
                    "Remove group \"{}\" and everything in it?",
                    name.unwrap_or_default()
                )
            }
            RemoveTarget::File { rel, .. } => format!("Remove \"{}\" from its group?", rel),
        };
    }
    let groupCount = targets
        .iter()
        .filter(|t| matches!(t, RemoveTarget::Group(_)))
        .count();
    let fileCount = targets.len() - groupCount;
    let mut parts = Vec::new();
    if groupCount > 0 {
        parts.push(format!("{} groups", groupCount));
    }
    if fileCount > 0 {
        parts.push(format!("{} items", fileCount));
    }
    format!("Remove {}?", parts.join(", "))
}

/// Interactive sort: picks a mode, then reorders the group's files.
pub fn sortGroup(session: &Session, dialogs: &dyn Dialogs, groupId: &str, now: Instant) {
    let items = [
        PickItem::new("Alphabetical", "alphabetical"),
        PickItem::new("By folder", "folder"),
        PickItem::new("By file type", "fileType"),
    ];
    let mode = match dialogs.quickPick(&items, "Sort files by").as_deref() {
        Some("folder") => SortMode::Folder,
        Some("fileType") => SortMode::FileType,
        Some(_) => SortMode::Alphabetical,
        None => return,
    };
    sortGroupFiles(session, groupId, mode, now);
}

pub fn sortGroupFiles(session: &Session, groupId: &str, mode: SortMode, now: Instant) {
    let mut next = session.snapshot();
    let base = next.meta.basePath.clone();
    let Some(group) = findGroupByIdMut(&mut next.groups, groupId) else {
        return;
    };
    let key = |rel: &str| -> String {
        let abs = fromRelativeToAbs(rel, &base);
        match mode {
            SortMode::FileType => abs
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default()
                .to_lowercase(),
            SortMode::Alphabetical => abs
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default()
                .to_lowercase(),
            SortMode::Folder => {
                labelForTopFolder(&abs.to_string_lossy(), &base).to_lowercase()
            }
        }
    };
    group.files.sort_by(|a, b| key(&a.rel).cmp(&key(&b.rel)));
    session.setStateAt(next, now);
    session.view.refresh(Some(groupId));
}

/// Interactive icon change over one or more groups. `icons` is the host's
/// available icon id list.
pub fn setGroupIcon(
    session: &Session,
    dialogs: &dyn Dialogs,
    targets: &[String],
    icons: &[String],
    now: Instant,
) {
    if targets.is_empty() {
        return;
    }
    let mut items = vec![
        PickItem::new("Default icon", ICON_DEFAULT),
        PickItem::new("No icon", ICON_NONE),
    ];
    items.extend(icons.iter().map(|id| PickItem::new(id.clone(), id.clone())));
    let placeholder = if targets.len() > 1 {
        "Select an icon for the selected groups"
    } else {
        "Select an icon"
    };
    let Some(picked) = dialogs.quickPick(&items, placeholder) else {
        return;
    };
    let changed = applyGroupIcon(session, targets, &picked, now);
    if changed > 0 && targets.len() > 1 {
        dialogs.showInfo(&format!("Updated icons on {} groups.", targets.len()));
    }
}

/// Applies an icon choice. `__default__` clears the field; any other value
/// (including the explicit `__none__` marker) is stored as-is.
pub fn applyGroupIcon(session: &Session, targets: &[String], choice: &str, now: Instant) -> usize {
    let mut next = session.snapshot();
    let mut changed = 0;
    for id in targets {
        let Some(group) = findGroupByIdMut(&mut next.groups, id) else {
            continue;
        };
        if choice == ICON_DEFAULT {
            if group.iconId.take().is_some() {
                changed += 1;
            }
        } else if group.iconId.as_deref() != Some(choice) {
            group.iconId = Some(choice.to_string());
            changed += 1;
        }
    }
    if changed > 0 {
        session.setStateAt(next, now);
        session.view.refresh(None);
    }
    changed
}

/// Interactive color change. `palette` lists the host's named theme colors
/// as (label, value) pairs; hex values route through the token allocator.
pub fn setGroupColor(
    session: &Session,
    dialogs: &dyn Dialogs,
    allocator: &dyn ThemeTokenAllocator,
    targets: &[String],
    palette: &[(String, String)],
    now: Instant,
) {
    if targets.is_empty() {
        return;
    }
    let mut items = vec![PickItem::new("Default color", COLOR_DEFAULT)];
    items.extend(
        palette
            .iter()
            .map(|(label, value)| PickItem::new(label.clone(), value.clone())),
    );
    items.push(PickItem::new("Custom hex...", COLOR_CUSTOM_HEX));
    let placeholder = if targets.len() > 1 {
        "Select a color for the selected groups"
    } else {
        "Select a color"
    };
    let Some(picked) = dialogs.quickPick(&items, placeholder) else {
        return;
    };
    let choice = if picked == COLOR_CUSTOM_HEX {
        let Some(hex) = dialogs.inputBoxValidated(
            "Hex color",
            Some("#RRGGBB or #RGB"),
            &|v| {
                if isValidHex(v) {
                    None
                } else {
                    Some("Enter a hex color like #AABBCC".to_string())
                }
            },
        ) else {
            return;
        };
        hex
    } else {
        picked
    };
    match applyGroupColor(session, allocator, targets, &choice, now) {
        Ok(changed) => {
            if changed > 0 && targets.len() > 1 {
                dialogs.showInfo(&format!("Updated colors on {} groups.", targets.len()));
            }
        }
        Err(e) => dialogs.showError(&e),
    }
}

/// Applies a color choice. `__default__` clears; hex values are normalized
/// and mapped to a theme token first. Err leaves every group untouched.
pub fn applyGroupColor(
    session: &Session,
    allocator: &dyn ThemeTokenAllocator,
    targets: &[String],
    choice: &str,
    now: Instant,
) -> Result<usize, String> {
    let resolved: Option<String> = if choice == COLOR_DEFAULT {
        None
    } else if isValidHex(choice) {
        let token = allocator.ensureTokenForHex(&normalizeHex(choice))?;
        Some(token)
    } else {
        Some(choice.to_string())
    };
    let mut next = session.snapshot();
    let mut changed = 0;
    for id in targets {
        let Some(group) = findGroupByIdMut(&mut next.groups, id) else {
            continue;
        };
        match &resolved {
            None => {
                if group.colorName.take().is_some() {
                    changed += 1;
                }
            }
            Some(value) => {
                if group.colorName.as_deref() != Some(value.as_str()) {
                    group.colorName = Some(value.clone());
                    changed += 1;
                }
            }
        }
    }
    if changed > 0 {
        session.setStateAt(next, now);
        session.view.refresh(None);
    }
    Ok(changed)
}
