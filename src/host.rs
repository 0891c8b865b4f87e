// Host collaborator traits
// The editor supplies these surfaces; the core only sees the boundary.
// Every dialog request may come back cancelled, and cancellation must be a
// total no-op for the command that asked.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

/// Result of a stat call, collapsed to what the core cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Unknown,
}

/// Filesystem access. The core never assumes atomic rename-based writes; a
/// direct overwrite with a single retry is its whole durability story.
pub trait HostFs: Send + Sync {
    fn readFile(&self, path: &Path) -> Result<Vec<u8>, String>;
    fn writeFile(&self, path: &Path, bytes: &[u8]) -> Result<(), String>;
    fn stat(&self, path: &Path) -> Result<EntryKind, String>;
    fn readDirectory(&self, path: &Path) -> Result<Vec<(String, EntryKind)>, String>;
}

/// Standard library implementation used outside of tests.
pub struct StdFs;

impl HostFs for StdFs {
    fn readFile(&self, path: &Path) -> Result<Vec<u8>, String> {
        fs::read(path).map_err(|e| e.to_string())
    }

    fn writeFile(&self, path: &Path, bytes: &[u8]) -> Result<(), String> {
        fs::write(path, bytes).map_err(|e| e.to_string())
    }

    fn stat(&self, path: &Path) -> Result<EntryKind, String> {
        let meta = fs::metadata(path).map_err(|e| e.to_string())?;
        if meta.is_dir() {
            Ok(EntryKind::Directory)
        } else if meta.is_file() {
            Ok(EntryKind::File)
        } else {
            Ok(EntryKind::Unknown)
        }
    }

    fn readDirectory(&self, path: &Path) -> Result<Vec<(String, EntryKind)>, String> {
        let mut out = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| e.to_string())? {
            let entry = entry.map_err(|e| e.to_string())?;
            let kind = match entry.file_type() {
                Ok(t) if t.is_dir() => EntryKind::Directory,
                Ok(t) if t.is_file() => EntryKind::File,
                _ => EntryKind::Unknown,
            };
            out.push((entry.file_name().to_string_lossy().to_string(), kind));
        }
        Ok(out)
    }
}

/// One labeled option in a quick pick.
#[derive(Debug, Clone)]
pub struct PickItem {
    pub label: String,
    pub id: String,
}

impl PickItem {
    pub fn new(label: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            id: id.into(),
        }
    }
}

/// Prompt surface. `None` always means the user cancelled.
pub trait Dialogs {
    fn inputBox(&self, prompt: &str, value: &str, placeholder: Option<&str>) -> Option<String>;
    /// Input with a validation predicate; the validator returns an error
    /// message for invalid input, which blocks submission on the host side.
    fn inputBoxValidated(
        &self,
        prompt: &str,
        placeholder: Option<&str>,
        validate: &dyn Fn(&str) -> Option<String>,
    ) -> Option<String>;
    /// Returns the id of the picked item.
    fn quickPick(&self, items: &[PickItem], placeholder: &str) -> Option<String>;
    fn openDialog(
        &self,
        canSelectMany: bool,
        canSelectFolders: bool,
        openLabel: &str,
    ) -> Option<Vec<PathBuf>>;
    fn saveDialog(&self, defaultPath: Option<&Path>, saveLabel: &str) -> Option<PathBuf>;
    /// Modal yes/no with a named affirmative action.
    fn confirm(&self, message: &str, action: &str) -> bool;
    fn showInfo(&self, message: &str);
    fn showError(&self, message: &str);
}

/// Open-editor surface for the tab commands.
pub trait Editors {
    /// Absolute fs paths of every open file tab.
    fn openEditorFilePaths(&self) -> Vec<String>;
    /// Brings an already open tab for the path to front; false when absent.
    fn revealExistingTab(&self, abs: &Path) -> bool;
    fn openFile(&self, abs: &Path, preserveFocus: bool) -> Result<(), String>;
    fn closeAllEditors(&self);
}

/// Change-notification sink for the tree view and its command contexts.
pub trait ViewSink: Send + Sync {
    /// Re-render request, optionally asking the view to reveal a group id.
    fn refresh(&self, revealGroupId: Option<&str>);
    fn updateCanSave(&self, canSave: bool);
    fn updateFilterContext(&self, hasFilter: bool, activeTag: Option<&str>);
    fn updateCanUndoClose(&self, canUndo: bool);
}

/// Sink that drops every notification; handy for headless use and tests.
pub struct NullViewSink;

impl ViewSink for NullViewSink {
    fn refresh(&self, _revealGroupId: Option<&str>) {}
    fn updateCanSave(&self, _canSave: bool) {}
    fn updateFilterContext(&self, _hasFilter: bool, _activeTag: Option<&str>) {}
    fn updateCanUndoClose(&self, _canUndo: bool) {}
}

/// Maps custom hex colors onto reusable host theme tokens.
pub trait ThemeTokenAllocator: Send + Sync {
    /// Returns the token bound to `hex`, reusing an existing binding or
    /// allocating a free slot. Err means the host configuration could not be
    /// updated; the caller must not apply the color.
    fn ensureTokenForHex(&self, hex: &str) -> Result<String, String>;
}

const TOKEN_POOL_SIZE: usize = 10;

/// Fixed 10-slot token pool. A slot already bound to the identical hex is
/// reused before a new one is taken; with every slot taken the last slot is
/// rebound (matching the host-config pool behavior).
pub struct TokenPool {
    bindings: RwLock<BTreeMap<String, String>>,
}

impl TokenPool {
    pub fn new() -> Self {
        Self {
            bindings: RwLock::new(BTreeMap::new()),
        }
    }

    fn tokenName(slot: usize) -> String {
        format!("workscene.color.custom{}", slot + 1)
    }
}

impl Default for TokenPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeTokenAllocator for TokenPool {
    fn ensureTokenForHex(&self, hex: &str) -> Result<String, String> {
        let mut bindings = self.bindings.write();
        let wanted = hex.to_uppercase();
        for slot in 0..TOKEN_POOL_SIZE {
            let token = Self::tokenName(slot);
            if bindings.get(&token).map(|h| h.to_uppercase()) == Some(wanted.clone()) {
                return Ok(token);
            }
        }
        let free = (0..TOKEN_POOL_SIZE)
            .map(Self::tokenName)
            .find(|t| !bindings.contains_key(t))
            .unwrap_or_else(|| Self::tokenName(TOKEN_POOL_SIZE - 1));
        bindings.insert(free.clone(), wanted);
        Ok(free)
    }
}
