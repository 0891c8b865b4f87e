// Filter commands over the session filter state.

use crate::host::Dialogs;
use crate::session::Session;

pub fn setGroupFilter(session: &Session, dialogs: &dyn Dialogs) {
    let current = session.groupFilter.read().clone().unwrap_or_default();
    let Some(filter) = dialogs.inputBox(
        "Filter groups by name",
        &current,
        Some("Substring match over root groups"),
    ) else {
        return;
    };
    let trimmed = filter.trim();
    session.setGroupFilter(if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    });
}

/// Clears both filters; the toolbar exposes this as one reset action.
pub fn clearGroupFilter(session: &Session) {
    session.setGroupFilter(None);
    session.clearTagFilter();
}

pub fn applyTagFilter(session: &Session, tag: &str) {
    if tag.trim().is_empty() {
        return;
    }
    session.applyTagFilter(tag);
}

pub fn clearTagFilter(session: &Session) {
    session.clearTagFilter();
}
