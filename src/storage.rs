// Sidecar persistence for the group tree.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::host::HostFs;
use crate::models::State;
use crate::normalize::ensureStateWithMeta;

pub const CONFIG_FILE_BASENAME: &str = "workscene.config.json";

/// Absolute path of the sidecar file for a workspace root.
pub fn configPath(basePath: &str) -> PathBuf {
    Path::new(basePath).join(CONFIG_FILE_BASENAME)
}

/// Loads and normalizes the persisted state. Missing or malformed files fall
/// back to an empty forest with fresh metadata rather than failing the caller.
pub fn loadState(fs: &dyn HostFs, basePath: &str) -> State {
    let path = configPath(basePath);
    let parsed = fs
        .readFile(&path)
        .ok()
        .and_then(|bytes| serde_json::from_slice::<State>(&bytes).ok());
    if parsed.is_none() {
        println!("[loadState] no usable config at {:?}, starting empty", path);
    }
    ensureStateWithMeta(parsed, basePath)
}

/// Strict variant for watcher-driven reloads: a read or parse failure is an
/// error instead of an empty fallback, so the caller can keep its current
/// tree. The empty fallback belongs to startup only.
pub fn tryLoadState(fs: &dyn HostFs, basePath: &str) -> Result<State, String> {
    let bytes = fs.readFile(&configPath(basePath))?;
    let parsed = serde_json::from_slice::<State>(&bytes).map_err(|e| e.to_string())?;
    Ok(ensureStateWithMeta(Some(parsed), basePath))
}

pub fn serializeState(state: &State) -> Result<Vec<u8>, String> {
    serde_json::to_vec_pretty(state).map_err(|e| e.to_string())
}

/// Writes the serialized state, retrying once on failure. Editors and sync
/// tools hold short-lived locks on the sidecar often enough that a single
/// retry removes almost all spurious failures.
pub fn writeWithRetry(fs: &dyn HostFs, path: &Path, bytes: &[u8]) -> Result<(), String> {
    let started = Instant::now();
    match fs.writeFile(path, bytes) {
        Ok(()) => {
            println!(
                "[writeWithRetry] wrote {} bytes in {:?}",
                bytes.len(),
                started.elapsed()
            );
            Ok(())
        }
        Err(first) => {
            println!("[writeWithRetry] first attempt failed: {}", first);
            fs.writeFile(path, bytes).map_err(|e| e.to_string())
        }
    }
}
