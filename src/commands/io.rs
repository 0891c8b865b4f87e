// Group tree export and import.

use std::path::Path;
use std::time::Instant;

use uuid::Uuid;

use crate::host::{Dialogs, HostFs};
use crate::models::{Group, State};
use crate::normalize::ensureStateWithMeta;
use crate::session::Session;

const EXPORT_BASENAME: &str = "workscene-export.json";

/// Writes the whole state (metadata included) to a user-picked file.
pub fn exportGroupsToFile(session: &Session, dialogs: &dyn Dialogs, fs: &dyn HostFs) {
    let defaultPath = Path::new(&session.basePath).join(EXPORT_BASENAME);
    let Some(target) = dialogs.saveDialog(Some(&defaultPath), "Export groups") else {
        return;
    };
    let result = session.withState(|s| serde_json::to_vec_pretty(s).map_err(|e| e.to_string()));
    match result.and_then(|bytes| fs.writeFile(&target, &bytes)) {
        Ok(()) => dialogs.showInfo("Groups exported."),
        Err(e) => {
            println!("[exportGroupsToFile] failed: {}", e);
            dialogs.showError("Could not export groups.");
        }
    }
}

/// Every imported group gets a fresh id so repeated imports never collide
/// with existing nodes.
fn reId(g: &Group) -> Group {
    Group {
        id: Uuid::new_v4().to_string(),
        name: g.name.clone(),
        description: g.description.clone(),
        files: g.files.clone(),
        children: g.children.iter().map(reId).collect(),
        tags: g.tags.clone(),
        iconId: g.iconId.clone(),
        colorName: g.colorName.clone(),
    }
}

/// Appends the groups of an exported file to the current tree. Malformed
/// JSON surfaces as a visible, recoverable error and changes nothing.
pub fn importGroupsFromFile(
    session: &Session,
    dialogs: &dyn Dialogs,
    fs: &dyn HostFs,
    now: Instant,
) {
    let Some(picked) = dialogs.openDialog(false, false, "Import groups") else {
        return;
    };
    let Some(source) = picked.first() else { return };
    let parsed = fs
        .readFile(source)
        .ok()
        .and_then(|bytes| serde_json::from_slice::<State>(&bytes).ok());
    let Some(data) = parsed else {
        dialogs.showError("Invalid JSON file. Import failed.");
        return;
    };
    let imported = ensureStateWithMeta(Some(data), &session.basePath);
    let mut next = session.snapshot();
    for g in &imported.groups {
        next.groups.push(reId(g));
    }
    session.setStateAt(next, now);
    session.view.refresh(None);
    dialogs.showInfo("Groups imported.");
    println!("[importGroupsFromFile] imported {} root groups", imported.groups.len());
}
