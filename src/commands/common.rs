// Shared helpers for the command layer.

use crate::host::{Dialogs, PickItem};
use crate::models::FolderHandlingMode;
use crate::session::Session;
use crate::tree::flattenGroups;

/// Flattened path-label group picker. None on cancel or when no groups exist
/// yet (the latter shows a hint instead of an empty pick).
pub fn pickGroup(session: &Session, dialogs: &dyn Dialogs) -> Option<String> {
    let flat = session.withState(|s| flattenGroups(&s.groups, ""));
    if flat.is_empty() {
        dialogs.showInfo("Add a group first.");
        return None;
    }
    let items: Vec<PickItem> = flat
        .into_iter()
        .map(|(id, pathLabel)| PickItem::new(pathLabel, id))
        .collect();
    dialogs.quickPick(&items, "Select a group")
}

pub fn pickFolderHandlingMode(dialogs: &dyn Dialogs) -> Option<FolderHandlingMode> {
    let items = [
        PickItem::new("Add folders as single entries", "folders"),
        PickItem::new("Add first-level files", "first"),
        PickItem::new("Add all files recursively", "recursive"),
    ];
    match dialogs.quickPick(&items, "How should folders be handled?") {
        Some(id) if id == "first" => Some(FolderHandlingMode::FirstLevel),
        Some(id) if id == "recursive" => Some(FolderHandlingMode::Recursive),
        Some(_) => Some(FolderHandlingMode::Folders),
        None => None,
    }
}

/// Comma-separated tag input, trimmed with empties dropped. Normalization
/// proper happens in normalizeTags.
pub fn parseTagInput(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn isValidHex(value: &str) -> bool {
    let t = value.trim();
    let Some(digits) = t.strip_prefix('#') else {
        return false;
    };
    (digits.len() == 3 || digits.len() == 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// `#RGB` to `#RRGGBB`, uppercased.
pub fn normalizeHex(value: &str) -> String {
    let t = value.trim();
    let digits: Vec<char> = t.chars().skip(1).collect();
    if digits.len() == 3 {
        let (r, g, b) = (digits[0], digits[1], digits[2]);
        format!("#{r}{r}{g}{g}{b}{b}").to_uppercase()
    } else {
        t.to_uppercase()
    }
}
