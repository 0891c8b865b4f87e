// Directory expansion for the folder-handling modes.

use std::path::{Path, PathBuf};

use crate::host::{EntryKind, HostFs};
use crate::models::{FileKind, FolderHandlingMode};
use crate::normalize::toRelativeFromFsPath;

/// Every file under `root`, depth first. Unreadable subdirectories are
/// skipped rather than aborting the whole walk.
pub fn collectFilesRecursively(fs: &dyn HostFs, root: &Path) -> Vec<PathBuf> {
    let mut collected = Vec::new();
    let entries = match fs.readDirectory(root) {
        Ok(entries) => entries,
        Err(_) => return collected,
    };
    for (name, kind) in entries {
        let child = root.join(&name);
        match kind {
            EntryKind::File => collected.push(child),
            EntryKind::Directory => collected.extend(collectFilesRecursively(fs, &child)),
            EntryKind::Unknown => {}
        }
    }
    collected
}

/// Only the direct file children of `root`.
pub fn collectFilesFirstLevel(fs: &dyn HostFs, root: &Path) -> Vec<PathBuf> {
    match fs.readDirectory(root) {
        Ok(entries) => entries
            .into_iter()
            .filter(|(_, kind)| *kind == EntryKind::File)
            .map(|(name, _)| root.join(name))
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// True when any of the picked paths is a directory. Stat failures count as
/// plain files so a vanished path never forces the mode prompt.
pub fn anyFolder(fs: &dyn HostFs, paths: &[PathBuf]) -> bool {
    paths
        .iter()
        .any(|p| matches!(fs.stat(p), Ok(EntryKind::Directory)))
}

/// Expands a user selection according to the chosen mode, yielding
/// workspace-relative entries ready to append to a group.
pub fn expandSelection(
    fs: &dyn HostFs,
    base: &str,
    paths: &[PathBuf],
    mode: FolderHandlingMode,
) -> Vec<(String, FileKind)> {
    let mut out = Vec::new();
    match mode {
        FolderHandlingMode::Folders => {
            for p in paths {
                let kind = match fs.stat(p) {
                    Ok(EntryKind::Directory) => FileKind::Folder,
                    _ => FileKind::File,
                };
                out.push((toRelativeFromFsPath(&p.to_string_lossy(), base), kind));
            }
        }
        FolderHandlingMode::FirstLevel | FolderHandlingMode::Recursive => {
            for p in paths {
                match fs.stat(p) {
                    Ok(EntryKind::Directory) => {
                        let files = if mode == FolderHandlingMode::Recursive {
                            collectFilesRecursively(fs, p)
                        } else {
                            collectFilesFirstLevel(fs, p)
                        };
                        for f in files {
                            out.push((
                                toRelativeFromFsPath(&f.to_string_lossy(), base),
                                FileKind::File,
                            ));
                        }
                    }
                    _ => out.push((
                        toRelativeFromFsPath(&p.to_string_lossy(), base),
                        FileKind::File,
                    )),
                }
            }
        }
    }
    out
}
