// File entry commands: adding, moving, alias/description/tag edits.

use std::path::PathBuf;
use std::time::Instant;

use crate::collect::{anyFolder, expandSelection};
use crate::commands::common::{parseTagInput, pickFolderHandlingMode, pickGroup};
use crate::host::{Dialogs, HostFs};
use crate::models::{FileEntry, FileRef, FolderHandlingMode};
use crate::normalize::{hasFileRel, isSameRel, normalizeTags};
use crate::session::Session;
use crate::tree::findGroupByIdMut;

/// Appends the expanded selection to a group, skipping paths it already
/// holds. Returns the number of entries actually added.
fn appendEntries(
    session: &Session,
    groupId: &str,
    entries: &[(String, crate::models::FileKind)],
    now: Instant,
) -> usize {
    let mut next = session.snapshot();
    let base = next.meta.basePath.clone();
    let Some(group) = findGroupByIdMut(&mut next.groups, groupId) else {
        return 0;
    };
    let mut added = 0;
    for (rel, kind) in entries {
        if rel.is_empty() || hasFileRel(group, rel, &base) {
            continue;
        }
        group.files.push(FileEntry::withKind(rel, *kind));
        added += 1;
    }
    if added > 0 {
        session.setStateAt(next, now);
        session.view.refresh(Some(groupId));
    }
    added
}

/// Open-dialog flow: pick a group (unless targeted), pick files or folders,
/// choose a folder-handling mode when needed.
pub fn addFilesToGroup(
    session: &Session,
    dialogs: &dyn Dialogs,
    fs: &dyn HostFs,
    target: Option<&str>,
    now: Instant,
) {
    let groupId = match target {
        Some(id) => id.to_string(),
        None => match pickGroup(session, dialogs) {
            Some(id) => id,
            None => return,
        },
    };
    let Some(picked) = dialogs.openDialog(true, true, "Add to group") else {
        return;
    };
    let mode = if anyFolder(fs, &picked) {
        match pickFolderHandlingMode(dialogs) {
            Some(mode) => mode,
            None => return,
        }
    } else {
        FolderHandlingMode::Folders
    };
    let base = session.basePath.clone();
    let entries = expandSelection(fs, &base, &picked, mode);
    let added = appendEntries(session, &groupId, &entries, now);
    println!("[addFilesToGroup] added {} entries", added);
}

/// Explorer-selection flow: paths arrive from the host rather than a dialog.
/// All-file selections skip the mode prompt and use first-level semantics.
pub fn addPathsToGroup(
    session: &Session,
    dialogs: &dyn Dialogs,
    fs: &dyn HostFs,
    paths: &[PathBuf],
    now: Instant,
) {
    if paths.is_empty() {
        return;
    }
    let Some(groupId) = pickGroup(session, dialogs) else {
        return;
    };
    let mode = if anyFolder(fs, paths) {
        match pickFolderHandlingMode(dialogs) {
            Some(mode) => mode,
            None => return,
        }
    } else {
        FolderHandlingMode::FirstLevel
    };
    let base = session.basePath.clone();
    let entries = expandSelection(fs, &base, paths, mode);
    let added = appendEntries(session, &groupId, &entries, now);
    if added > 0 {
        dialogs.showInfo(&format!("Added {} items.", added));
    }
}

/// External drop (file manager, explorer view) of a uri-list onto a group.
/// Non-file schemes and unparseable lines are dropped; a folder anywhere in
/// the selection raises the mode prompt.
pub fn dropUrisOnGroup(
    session: &Session,
    dialogs: &dyn Dialogs,
    fs: &dyn HostFs,
    groupId: &str,
    uriList: &str,
    now: Instant,
) {
    let paths: Vec<PathBuf> = crate::transfer::parseUriList(uriList)
        .iter()
        .filter_map(|raw| crate::normalize::uriToFsPath(raw))
        .map(PathBuf::from)
        .collect();
    if paths.is_empty() {
        return;
    }
    let mode = if anyFolder(fs, &paths) {
        match pickFolderHandlingMode(dialogs) {
            Some(mode) => mode,
            None => return,
        }
    } else {
        FolderHandlingMode::Folders
    };
    let base = session.basePath.clone();
    let entries = expandSelection(fs, &base, &paths, mode);
    let added = appendEntries(session, groupId, &entries, now);
    println!("[dropUrisOnGroup] added {} entries", added);
}

/// Moves the selected file entries into a picked destination group. The
/// source entry always leaves; the append is skipped when the destination
/// already holds an equal path. Repeat selections are deduplicated.
pub fn moveToGroup(
    session: &Session,
    dialogs: &dyn Dialogs,
    targets: &[FileRef],
    now: Instant,
) {
    if targets.is_empty() {
        return;
    }
    let Some(destId) = pickGroup(session, dialogs) else {
        return;
    };
    let moved = moveFilesToGroup(session, targets, &destId, now);
    if moved > 0 {
        let destName = session.withState(|s| {
            crate::tree::findGroupById(&s.groups, &destId)
                .map(|f| f.group.name.clone())
                .unwrap_or_default()
        });
        dialogs.showInfo(&format!("Moved {} items to \"{}\".", moved, destName));
    }
}

pub fn moveFilesToGroup(
    session: &Session,
    targets: &[FileRef],
    destId: &str,
    now: Instant,
) -> usize {
    let mut next = session.snapshot();
    let base = next.meta.basePath.clone();
    if findGroupByIdMut(&mut next.groups, destId).is_none() {
        return 0;
    }
    let mut seen = std::collections::HashSet::new();
    let mut moved = 0;
    for target in targets {
        let key = format!("{}|{}", target.groupId, target.rel);
        if !seen.insert(key) {
            continue;
        }
        let removedEntry = {
            let Some(src) = findGroupByIdMut(&mut next.groups, &target.groupId) else {
                continue;
            };
            let idx = src
                .files
                .iter()
                .position(|f| isSameRel(&f.rel, &target.rel, &base));
            match idx {
                Some(idx) => src.files.remove(idx),
                None => continue,
            }
        };
        // second lookup: src and dst borrows must not overlap
        let Some(dst) = findGroupByIdMut(&mut next.groups, destId) else {
            continue;
        };
        if !hasFileRel(dst, &removedEntry.rel, &base) {
            dst.files.push(removedEntry);
        }
        moved += 1;
    }
    if moved > 0 {
        session.setStateAt(next, now);
        session.view.refresh(None);
    }
    moved
}

/// Alias + description in one flow; blank input clears the field.
pub fn editFileAliasDescription(
    session: &Session,
    dialogs: &dyn Dialogs,
    target: &FileRef,
    now: Instant,
) {
    let current = session.withState(|s| {
        crate::tree::findGroupById(&s.groups, &target.groupId).and_then(|f| {
            f.group
                .files
                .iter()
                .find(|fe| fe.rel == target.rel)
                .map(|fe| (fe.name.clone(), fe.description.clone()))
        })
    });
    let Some((name, description)) = current else { return };
    let Some(nextName) = dialogs.inputBox(
        "Alias (optional)",
        name.as_deref().unwrap_or(""),
        Some(&target.rel),
    ) else {
        return;
    };
    let Some(nextDescription) = dialogs.inputBox(
        "Description (optional)",
        description.as_deref().unwrap_or(""),
        None,
    ) else {
        return;
    };
    let mut next = session.snapshot();
    let Some(group) = findGroupByIdMut(&mut next.groups, &target.groupId) else {
        return;
    };
    let Some(entry) = group.files.iter_mut().find(|fe| fe.rel == target.rel) else {
        return;
    };
    let trimmedName = nextName.trim();
    entry.name = if trimmedName.is_empty() {
        None
    } else {
        Some(trimmedName.to_string())
    };
    let trimmedDescription = nextDescription.trim();
    entry.description = if trimmedDescription.is_empty() {
        None
    } else {
        Some(trimmedDescription.to_string())
    };
    session.setStateAt(next, now);
    session.view.refresh(None);
}

pub fn editFileTags(session: &Session, dialogs: &dyn Dialogs, target: &FileRef, now: Instant) {
    let current = session.withState(|s| {
        crate::tree::findGroupById(&s.groups, &target.groupId).and_then(|f| {
            f.group
                .files
                .iter()
                .find(|fe| fe.rel == target.rel)
                .map(|fe| fe.tags.join(", "))
        })
    });
    let Some(current) = current else { return };
    let Some(value) = dialogs.inputBox(
        "File tags",
        &current,
        Some("Comma-separated, e.g. api, backend"),
    ) else {
        return;
    };
    let mut next = session.snapshot();
    let Some(group) = findGroupByIdMut(&mut next.groups, &target.groupId) else {
        return;
    };
    let Some(entry) = group.files.iter_mut().find(|fe| fe.rel == target.rel) else {
        return;
    };
    entry.tags = normalizeTags(parseTagInput(&value));
    session.setStateAt(next, now);
    session.view.refresh(None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{NullViewSink, StdFs};
    use crate::models::{FileKind, Group};
    use crate::session::{initSession, SessionState};
    use std::sync::Arc;

    fn freshSession() -> (tempfile::TempDir, SessionState) {
        let dir = tempfile::tempdir().unwrap();
        let session = initSession(
            dir.path().to_str().unwrap(),
            Arc::new(StdFs),
            Arc::new(NullViewSink),
        );
        (dir, session)
    }

    fn seedGroups(session: &Session, groups: Vec<Group>) {
        let mut next = session.snapshot();
        next.groups = groups;
        session.setStateAt(next, Instant::now());
    }

    #[test]
    fn test_append_entries_dedupes_existing_paths() {
        let (_dir, session) = freshSession();
        let mut g = Group::new("G");
        g.files.push(FileEntry::file("a.rs"));
        let id = g.id.clone();
        seedGroups(&session, vec![g]);

        let entries = vec![
            ("a.rs".to_string(), FileKind::File),
            ("b.rs".to_string(), FileKind::File),
        ];
        let added = appendEntries(&session, &id, &entries, Instant::now());
        assert_eq!(added, 1);
        assert_eq!(session.withState(|s| s.groups[0].files.len()), 2);
    }

    struct NoDialogs;

    impl Dialogs for NoDialogs {
        fn inputBox(&self, _: &str, _: &str, _: Option<&str>) -> Option<String> {
            None
        }
        fn inputBoxValidated(
            &self,
            _: &str,
            _: Option<&str>,
            _: &dyn Fn(&str) -> Option<String>,
        ) -> Option<String> {
            None
        }
        fn quickPick(&self, _: &[crate::host::PickItem], _: &str) -> Option<String> {
            None
        }
        fn openDialog(&self, _: bool, _: bool, _: &str) -> Option<Vec<PathBuf>> {
            None
        }
        fn saveDialog(
            &self,
            _: Option<&std::path::Path>,
            _: &str,
        ) -> Option<PathBuf> {
            None
        }
        fn confirm(&self, _: &str, _: &str) -> bool {
            false
        }
        fn showInfo(&self, _: &str) {}
        fn showError(&self, _: &str) {}
    }

    #[test]
    fn test_drop_uris_appends_files_to_group() {
        let (dir, session) = freshSession();
        std::fs::write(dir.path().join("a.rs"), b"x").unwrap();
        std::fs::write(dir.path().join("b.rs"), b"y").unwrap();
        let g = Group::new("G");
        let id = g.id.clone();
        seedGroups(&session, vec![g]);

        let uriList = format!(
            "file://{}\r\nfile://{}\nhttps://example.com/skip",
            dir.path().join("a.rs").display(),
            dir.path().join("b.rs").display(),
        );
        dropUrisOnGroup(&session, &NoDialogs, &StdFs, &id, &uriList, Instant::now());
        session.withState(|s| {
            let rels: Vec<&str> = s.groups[0].files.iter().map(|f| f.rel.as_str()).collect();
            assert_eq!(rels, vec!["a.rs", "b.rs"]);
        });
    }

    #[test]
    fn test_move_files_keeps_entry_metadata() {
        let (_dir, session) = freshSession();
        let mut src = Group::new("Src");
        let mut entry = FileEntry::file("a.rs");
        entry.name = Some("alias".into());
        entry.tags = vec!["api".into()];
        src.files.push(entry);
        let dst = Group::new("Dst");
        let srcId = src.id.clone();
        let dstId = dst.id.clone();
        seedGroups(&session, vec![src, dst]);

        let moved = moveFilesToGroup(
            &session,
            &[FileRef::new(srcId, "a.rs")],
            &dstId,
            Instant::now(),
        );
        assert_eq!(moved, 1);
        session.withState(|s| {
            assert!(s.groups[0].files.is_empty());
            assert_eq!(s.groups[1].files[0].name.as_deref(), Some("alias"));
            assert_eq!(s.groups[1].files[0].tags, vec!["api".to_string()]);
        });
    }

    #[test]
    fn test_move_onto_duplicate_counts_but_does_not_double() {
        let (_dir, session) = freshSession();
        let mut src = Group::new("Src");
        src.files.push(FileEntry::file("a.rs"));
        let mut dst = Group::new("Dst");
        dst.files.push(FileEntry::file("a.rs"));
        let srcId = src.id.clone();
        let dstId = dst.id.clone();
        seedGroups(&session, vec![src, dst]);

        let moved = moveFilesToGroup(
            &session,
            &[FileRef::new(srcId, "a.rs")],
            &dstId,
            Instant::now(),
        );
        assert_eq!(moved, 1);
        session.withState(|s| {
            assert!(s.groups[0].files.is_empty());
            assert_eq!(s.groups[1].files.len(), 1);
        });
    }

    #[test]
    fn test_move_to_missing_destination_is_noop() {
        let (_dir, session) = freshSession();
        let mut src = Group::new("Src");
        src.files.push(FileEntry::file("a.rs"));
        let srcId = src.id.clone();
        seedGroups(&session, vec![src]);

        let moved = moveFilesToGroup(
            &session,
            &[FileRef::new(srcId, "a.rs")],
            "nope",
            Instant::now(),
        );
        assert_eq!(moved, 0);
        assert_eq!(session.withState(|s| s.groups[0].files.len()), 1);
    }
}
