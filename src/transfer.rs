// Drag-and-drop payloads and the drop mutations they drive.

use serde::{Deserialize, Serialize};

use crate::models::{FileEntry, FileKind, State};
use crate::normalize::{hasFileRel, isSameRel};
use crate::tree::{detachGroupById, findGroupById, findGroupByIdMut, isAncestor};

pub const TREE_MIME: &str = "application/vnd.tree.worksceneView";
pub const URI_LIST_MIME: &str = "text/uri-list";

/// One dragged node, as serialized into the tree MIME payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DragEntry {
    File {
        rel: String,
        from: String,
        #[serde(default)]
        kind: FileKind,
    },
    Group {
        id: String,
    },
}

/// Where a drop landed. A drop onto a file row resolves to its owning group.
#[derive(Debug, Clone)]
pub enum DropTarget {
    Group(String),
    File { groupId: String },
}

impl DropTarget {
    fn groupId(&self) -> &str {
        match self {
            DropTarget::Group(id) => id,
            DropTarget::File { groupId } => groupId,
        }
    }

    fn isGroup(&self) -> bool {
        matches!(self, DropTarget::Group(_))
    }
}

pub fn buildDragPayload(entries: &[DragEntry]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }
    serde_json::to_string(entries).ok()
}

/// Malformed payloads are swallowed; a bad drop must never corrupt state.
pub fn parseDragPayload(raw: &str) -> Vec<DragEntry> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// Applies an in-tree drop. Returns true when anything moved.
///
/// Files always leave their source group; they are appended to the target
/// only when no equivalent path is already there. Group moves require a group
/// target and skip self-drops and drops into the group's own subtree.
pub fn applyInternalDrop(state: &mut State, entries: &[DragEntry], target: &DropTarget) -> bool {
    let base = state.meta.basePath.clone();
    let toId = target.groupId().to_string();
    if findGroupById(&state.groups, &toId).is_none() {
        return false;
    }
    let mut changed = false;
    for entry in entries {
        match entry {
            DragEntry::File { rel, from, kind } => {
                if let Some(fromGroup) = findGroupByIdMut(&mut state.groups, from) {
                    let before = fromGroup.files.len();
                    fromGroup
                        .files
                        .retain(|f| !isSameRel(&f.rel, rel, &base));
                    changed |= fromGroup.files.len() != before;
                }
                let toGroup = match findGroupByIdMut(&mut state.groups, &toId) {
                    Some(g) => g,
                    None => continue,
                };
                if !hasFileRel(toGroup, rel, &base) {
                    toGroup.files.push(FileEntry::withKind(rel, *kind));
                    changed = true;
                }
            }
            DragEntry::Group { id } => {
                if !target.isGroup() {
                    continue;
                }
                if *id == toId {
                    continue;
                }
                if isAncestor(&state.groups, id, &toId) {
                    continue;
                }
                if let Some(movedGroup) = detachGroupById(&mut state.groups, id) {
                    if let Some(toGroup) = findGroupByIdMut(&mut state.groups, &toId) {
                        toGroup.children.push(movedGroup);
                        changed = true;
                    }
                }
            }
        }
    }
    changed
}

/// Splits a uri-list payload into its non-empty lines.
pub fn parseUriList(raw: &str) -> Vec<String> {
    raw.split(['\r', '\n'])
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Group;

    fn stateWith(groups: Vec<Group>) -> State {
        let mut s = State::default();
        s.meta.basePath = "/ws".to_string();
        s.groups = groups;
        s
    }

    fn groupWithFile(name: &str, rel: &str) -> Group {
        let mut g = Group::new(name);
        g.files.push(FileEntry::file(rel));
        g
    }

    #[test]
    fn test_payload_round_trip() {
        let entries = vec![
            DragEntry::File {
                rel: "src/a.rs".into(),
                from: "g1".into(),
                kind: FileKind::File,
            },
            DragEntry::Group { id: "g2".into() },
        ];
        let raw = buildDragPayload(&entries).unwrap();
        assert_eq!(parseDragPayload(&raw), entries);
    }

    #[test]
    fn test_file_kind_defaults_to_file_in_payload() {
        let parsed = parseDragPayload(r#"[{"type":"file","rel":"a.rs","from":"g1"}]"#);
        assert_eq!(
            parsed,
            vec![DragEntry::File {
                rel: "a.rs".into(),
                from: "g1".into(),
                kind: FileKind::File,
            }]
        );
    }

    #[test]
    fn test_file_move_between_groups() {
        let src = groupWithFile("Src", "a.rs");
        let dst = Group::new("Dst");
        let fromId = src.id.clone();
        let toId = dst.id.clone();
        let mut state = stateWith(vec![src, dst]);

        let moved = applyInternalDrop(
            &mut state,
            &[DragEntry::File {
                rel: "a.rs".into(),
                from: fromId,
                kind: FileKind::File,
            }],
            &DropTarget::Group(toId),
        );
        assert!(moved);
        assert!(state.groups[0].files.is_empty());
        assert_eq!(state.groups[1].files.len(), 1);
    }

    #[test]
    fn test_file_move_onto_duplicate_dedupes() {
        let src = groupWithFile("Src", "a.rs");
        let dst = groupWithFile("Dst", "a.rs");
        let fromId = src.id.clone();
        let toId = dst.id.clone();
        let mut state = stateWith(vec![src, dst]);

        applyInternalDrop(
            &mut state,
            &[DragEntry::File {
                rel: "a.rs".into(),
                from: fromId,
                kind: FileKind::File,
            }],
            &DropTarget::Group(toId),
        );
        // removed from the source, not doubled in the destination
        assert!(state.groups[0].files.is_empty());
        assert_eq!(state.groups[1].files.len(), 1);
    }

    #[test]
    fn test_drop_onto_file_targets_owning_group() {
        let src = groupWithFile("Src", "a.rs");
        let dst = groupWithFile("Dst", "b.rs");
        let fromId = src.id.clone();
        let toId = dst.id.clone();
        let mut state = stateWith(vec![src, dst]);

        applyInternalDrop(
            &mut state,
            &[DragEntry::File {
                rel: "a.rs".into(),
                from: fromId,
                kind: FileKind::File,
            }],
            &DropTarget::File { groupId: toId },
        );
        assert_eq!(state.groups[1].files.len(), 2);
    }

    #[test]
    fn test_group_move_into_descendant_is_noop() {
        let mut parent = Group::new("P");
        let child = Group::new("C");
        let parentId = parent.id.clone();
        let childId = child.id.clone();
        parent.children.push(child);
        let mut state = stateWith(vec![parent]);

        let moved = applyInternalDrop(
            &mut state,
            &[DragEntry::Group { id: parentId }],
            &DropTarget::Group(childId),
        );
        assert!(!moved);
        assert_eq!(state.groups.len(), 1);
        assert_eq!(state.groups[0].name, "P");
    }

    #[test]
    fn test_group_move_onto_self_is_noop() {
        let g = Group::new("G");
        let id = g.id.clone();
        let mut state = stateWith(vec![g]);
        let moved = applyInternalDrop(
            &mut state,
            &[DragEntry::Group { id: id.clone() }],
            &DropTarget::Group(id),
        );
        assert!(!moved);
    }

    #[test]
    fn test_group_move_ignores_file_targets() {
        let dragged = Group::new("Dragged");
        let owner = groupWithFile("Owner", "a.rs");
        let draggedId = dragged.id.clone();
        let ownerId = owner.id.clone();
        let mut state = stateWith(vec![dragged, owner]);

        let moved = applyInternalDrop(
            &mut state,
            &[DragEntry::Group { id: draggedId }],
            &DropTarget::File { groupId: ownerId },
        );
        assert!(!moved);
        assert_eq!(state.groups.len(), 2);
    }

    #[test]
    fn test_group_reparent() {
        let dragged = Group::new("Dragged");
        let dest = Group::new("Dest");
        let draggedId = dragged.id.clone();
        let destId = dest.id.clone();
        let mut state = stateWith(vec![dragged, dest]);

        let moved = applyInternalDrop(
            &mut state,
            &[DragEntry::Group { id: draggedId }],
            &DropTarget::Group(destId),
        );
        assert!(moved);
        assert_eq!(state.groups.len(), 1);
        assert_eq!(state.groups[0].children.len(), 1);
        assert_eq!(state.groups[0].children[0].name, "Dragged");
    }

    #[test]
    fn test_uri_list_split() {
        let lines = parseUriList("file:///a.rs\r\nfile:///b.rs\n\n");
        assert_eq!(lines, vec!["file:///a.rs", "file:///b.rs"]);
    }
}
