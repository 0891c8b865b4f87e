// Open-editor integration: capture tabs into groups, open groups as tabs.

use std::time::Instant;

use crate::host::{Dialogs, Editors, PickItem};
use crate::models::{FileEntry, FileKind, Group};
use crate::normalize::{hasFileRel, isSameRel, toRelativeFromFsPath};
use crate::session::Session;
use crate::tree::{findGroupByIdMut, flattenGroups, suggestGroupName};

const NEW_GROUP_ID: &str = "__new__";

/// Adds every open file tab to a group. Without a target the user picks an
/// existing group or creates a new one inline.
pub fn addOpenTabsToGroup(
    session: &Session,
    dialogs: &dyn Dialogs,
    editors: &dyn Editors,
    target: Option<&str>,
    now: Instant,
) {
    let filePaths = editors.openEditorFilePaths();
    if filePaths.is_empty() {
        dialogs.showInfo("No open tabs to add.");
        return;
    }
    let base = session.basePath.clone();
    let rels: Vec<String> = filePaths
        .iter()
        .map(|p| toRelativeFromFsPath(p, &base))
        .filter(|r| !r.is_empty())
        .collect();

    let mut next = session.snapshot();
    let groupId = match target {
        Some(id) => id.to_string(),
        None => {
            let mut items = vec![PickItem::new("$(plus) New group...", NEW_GROUP_ID)];
            items.extend(
                flattenGroups(&next.groups, "")
                    .into_iter()
                    .map(|(id, pathLabel)| PickItem::new(pathLabel, id)),
            );
            let Some(picked) = dialogs.quickPick(&items, "Add open tabs to which group?") else {
                return;
            };
            if picked == NEW_GROUP_ID {
                let suggested = suggestGroupName(&next.groups);
                let Some(name) = dialogs.inputBox("New group name", &suggested, None) else {
                    return;
                };
                let finalName = if name.trim().is_empty() {
                    suggested
                } else {
                    name.trim().to_string()
                };
                let newGroup = Group::new(finalName);
                let newId = newGroup.id.clone();
                next.groups.push(newGroup);
                newId
            } else {
                picked
            }
        }
    };

    let Some(group) = findGroupByIdMut(&mut next.groups, &groupId) else {
        return;
    };
    let mut added = 0;
    for rel in &rels {
        if !hasFileRel(group, rel, &base) {
            group.files.push(FileEntry::file(rel));
            added += 1;
        }
    }
    let groupName = group.name.clone();
    if added > 0 {
        session.setStateAt(next, now);
        session.view.refresh(Some(&groupId));
    }
    dialogs.showInfo(&format!("Added {} tabs to \"{}\".", added, groupName));
}

/// Opens every file entry of a group, reusing already open tabs. Folder
/// entries are skipped and reported. With `autoClose` the current tabs are
/// closed first and buffered for a short undo window.
pub fn openAllInGroup(
    session: &Session,
    dialogs: &dyn Dialogs,
    editors: &dyn Editors,
    groupId: &str,
    autoClose: bool,
    now: Instant,
) {
    let entries = session.withState(|s| {
        crate::tree::findGroupById(&s.groups, groupId).map(|f| f.group.files.clone())
    });
    let Some(entries) = entries else { return };
    let fileEntries: Vec<&FileEntry> = entries
        .iter()
        .filter(|fe| fe.kind != FileKind::Folder)
        .collect();
    if fileEntries.is_empty() {
        dialogs.showInfo("This group has no files to open.");
        return;
    }
    let skippedFolders = entries.len() - fileEntries.len();

    if autoClose {
        session.armUndoClose(editors.openEditorFilePaths(), now);
        editors.closeAllEditors();
    }
    let base = session.basePath.clone();
    for (i, fe) in fileEntries.iter().enumerate() {
        let abs = crate::normalize::fromRelativeToAbs(&fe.rel, &base);
        if editors.revealExistingTab(&abs) {
            continue;
        }
        // unopenable files are skipped, the rest of the group still opens
        if let Err(e) = editors.openFile(&abs, i != 0) {
            println!("[openAllInGroup] could not open {:?}: {}", abs, e);
        }
    }
    if skippedFolders > 0 {
        dialogs.showInfo(&format!("Skipped {} folder entries.", skippedFolders));
    }
}

/// Restores the tabs buffered by the last auto-closing openAllInGroup.
pub fn undoCloseEditors(session: &Session, dialogs: &dyn Dialogs, editors: &dyn Editors) {
    let paths = session.takeUndoClose();
    if paths.is_empty() {
        return;
    }
    for p in &paths {
        let abs = std::path::PathBuf::from(p);
        if editors.revealExistingTab(&abs) {
            continue;
        }
        if let Err(e) = editors.openFile(&abs, false) {
            println!("[undoCloseEditors] could not reopen {:?}: {}", abs, e);
        }
    }
    dialogs.showInfo("Closed tabs restored.");
}

/// Open file tabs that belong to no group yet, as workspace-relative paths.
pub fn ungroupedOpenFiles(session: &Session, editors: &dyn Editors) -> Vec<String> {
    let base = session.basePath.clone();
    session.withState(|s| {
        let mut grouped: Vec<String> = Vec::new();
        fn visit(groups: &[Group], out: &mut Vec<String>) {
            for g in groups {
                for fe in &g.files {
                    out.push(fe.rel.clone());
                }
                visit(&g.children, out);
            }
        }
        visit(&s.groups, &mut grouped);
        editors
            .openEditorFilePaths()
            .iter()
            .map(|p| toRelativeFromFsPath(p, &base))
            .filter(|rel| !rel.is_empty())
            .filter(|rel| !grouped.iter().any(|g| isSameRel(g, rel, &base)))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{NullViewSink, StdFs};
    use crate::session::{initSession, SessionState};
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    struct FakeEditors {
        open: RefCell<Vec<String>>,
        opened: RefCell<Vec<PathBuf>>,
    }

    impl FakeEditors {
        fn with(open: Vec<&str>) -> Self {
            Self {
                open: RefCell::new(open.into_iter().map(String::from).collect()),
                opened: RefCell::new(Vec::new()),
            }
        }
    }

    impl Editors for FakeEditors {
        fn openEditorFilePaths(&self) -> Vec<String> {
            self.open.borrow().clone()
        }
        fn revealExistingTab(&self, abs: &Path) -> bool {
            self.open
                .borrow()
                .iter()
                .any(|p| Path::new(p) == abs)
        }
        fn openFile(&self, abs: &Path, _preserveFocus: bool) -> Result<(), String> {
            self.opened.borrow_mut().push(abs.to_path_buf());
            Ok(())
        }
        fn closeAllEditors(&self) {
            self.open.borrow_mut().clear();
        }
    }

    struct SilentDialogs;

    impl Dialogs for SilentDialogs {
        fn inputBox(&self, _p: &str, _v: &str, _ph: Option<&str>) -> Option<String> {
            None
        }
        fn inputBoxValidated(
            &self,
            _p: &str,
            _ph: Option<&str>,
            _v: &dyn Fn(&str) -> Option<String>,
        ) -> Option<String> {
            None
        }
        fn quickPick(&self, _i: &[PickItem], _ph: &str) -> Option<String> {
            None
        }
        fn openDialog(&self, _m: bool, _f: bool, _l: &str) -> Option<Vec<PathBuf>> {
            None
        }
        fn saveDialog(&self, _d: Option<&Path>, _l: &str) -> Option<PathBuf> {
            None
        }
        fn confirm(&self, _m: &str, _a: &str) -> bool {
            true
        }
        fn showInfo(&self, _m: &str) {}
        fn showError(&self, _m: &str) {}
    }

    fn freshSession() -> (tempfile::TempDir, SessionState) {
        let dir = tempfile::tempdir().unwrap();
        let session = initSession(
            dir.path().to_str().unwrap(),
            Arc::new(StdFs),
            Arc::new(NullViewSink),
        );
        (dir, session)
    }

    fn absUnder(session: &Session, rel: &str) -> String {
        Path::new(&session.basePath)
            .join(rel)
            .to_string_lossy()
            .to_string()
    }

    #[test]
    fn test_add_open_tabs_to_targeted_group() {
        let (_dir, session) = freshSession();
        let g = Group::new("G");
        let id = g.id.clone();
        let mut next = session.snapshot();
        next.groups.push(g);
        session.setStateAt(next, Instant::now());

        let editors = FakeEditors::with(vec![]);
        editors
            .open
            .borrow_mut()
            .push(absUnder(&session, "src/a.rs"));
        addOpenTabsToGroup(&session, &SilentDialogs, &editors, Some(&id), Instant::now());
        session.withState(|s| {
            assert_eq!(s.groups[0].files.len(), 1);
            assert_eq!(s.groups[0].files[0].rel, "src/a.rs");
        });
    }

    #[test]
    fn test_open_all_skips_folders_and_existing_tabs() {
        let (_dir, session) = freshSession();
        let mut g = Group::new("G");
        g.files.push(FileEntry::file("a.rs"));
        g.files.push(FileEntry::folder("src"));
        g.files.push(FileEntry::file("b.rs"));
        let id = g.id.clone();
        let mut next = session.snapshot();
        next.groups.push(g);
        session.setStateAt(next, Instant::now());

        let editors = FakeEditors::with(vec![]);
        editors.open.borrow_mut().push(absUnder(&session, "a.rs"));
        openAllInGroup(&session, &SilentDialogs, &editors, &id, false, Instant::now());
        // a.rs was already open, only b.rs goes through openFile
        let opened = editors.opened.borrow();
        assert_eq!(opened.len(), 1);
        assert!(opened[0].ends_with("b.rs"));
    }

    #[test]
    fn test_auto_close_round_trip_via_undo() {
        let (_dir, session) = freshSession();
        let mut g = Group::new("G");
        g.files.push(FileEntry::file("a.rs"));
        let id = g.id.clone();
        let mut next = session.snapshot();
        next.groups.push(g);
        session.setStateAt(next, Instant::now());

        let previous = absUnder(&session, "old.rs");
        let editors = FakeEditors::with(vec![]);
        editors.open.borrow_mut().push(previous.clone());
        openAllInGroup(&session, &SilentDialogs, &editors, &id, true, Instant::now());

        undoCloseEditors(&session, &SilentDialogs, &editors);
        let opened = editors.opened.borrow();
        assert!(opened.iter().any(|p| p.to_string_lossy() == previous));
    }

    #[test]
    fn test_ungrouped_open_files_excludes_grouped() {
        let (_dir, session) = freshSession();
        let mut g = Group::new("G");
        g.files.push(FileEntry::file("a.rs"));
        let mut next = session.snapshot();
        next.groups.push(g);
        session.setStateAt(next, Instant::now());

        let editors = FakeEditors::with(vec![]);
        editors.open.borrow_mut().push(absUnder(&session, "a.rs"));
        editors.open.borrow_mut().push(absUnder(&session, "b.rs"));
        let ungrouped = ungroupedOpenFiles(&session, &editors);
        assert_eq!(ungrouped, vec!["b.rs".to_string()]);
    }
}
