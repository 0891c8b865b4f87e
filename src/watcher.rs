// Sidecar file watcher: debounced reload on external edits, reset on delete.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use notify::event::{EventKind, RemoveKind};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use crate::session::SessionState;
use crate::storage::{configPath, CONFIG_FILE_BASENAME};

/// External edits settle this long before the reload runs, so editors that
/// write in several syscalls trigger a single reload.
const RELOAD_DEBOUNCE: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigEvent {
    Changed,
    Deleted,
}

/// Keeps the notify watcher and its worker thread alive for the session.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
}

/// Watches the workspace root for sidecar changes and feeds them back into
/// the session. Dropping the returned handle stops the watch.
pub fn watchConfig(session: SessionState) -> Result<ConfigWatcher, String> {
    let configFile = configPath(&session.basePath);
    let (tx, rx) = mpsc::channel::<ConfigEvent>();

    let watchedName = configFile.clone();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                println!("[watchConfig] watch error: {}", e);
                return;
            }
        };
        if !event.paths.iter().any(|p| p == &watchedName) {
            return;
        }
        let mapped = match event.kind {
            EventKind::Remove(RemoveKind::File) | EventKind::Remove(RemoveKind::Any) => {
                ConfigEvent::Deleted
            }
            EventKind::Create(_) | EventKind::Modify(_) => ConfigEvent::Changed,
            _ => return,
        };
        let _ = tx.send(mapped);
    })
    .map_err(|e| e.to_string())?;

    // watch the parent directory: the sidecar may not exist yet
    watcher
        .watch(std::path::Path::new(&session.basePath), RecursiveMode::NonRecursive)
        .map_err(|e| e.to_string())?;

    thread::spawn(move || runLoop(session, rx));
    println!("[watchConfig] watching {}", CONFIG_FILE_BASENAME);
    Ok(ConfigWatcher { _watcher: watcher })
}

/// Collapses a burst of change events into one; a delete is never debounced
/// and cuts any in-flight burst short. None means the sender hung up.
fn coalesce(first: ConfigEvent, rx: &mpsc::Receiver<ConfigEvent>) -> Option<ConfigEvent> {
    if first == ConfigEvent::Deleted {
        return Some(ConfigEvent::Deleted);
    }
    loop {
        match rx.recv_timeout(RELOAD_DEBOUNCE) {
            Ok(ConfigEvent::Deleted) => return Some(ConfigEvent::Deleted),
            Ok(ConfigEvent::Changed) => {}
            Err(mpsc::RecvTimeoutError::Timeout) => return Some(ConfigEvent::Changed),
            Err(mpsc::RecvTimeoutError::Disconnected) => return None,
        }
    }
}

fn runLoop(session: SessionState, rx: mpsc::Receiver<ConfigEvent>) {
    loop {
        let first = match rx.recv() {
            Ok(event) => event,
            Err(_) => return,
        };
        match coalesce(first, &rx) {
            Some(ConfigEvent::Changed) => session.reloadFromDiskNow(Instant::now()),
            Some(ConfigEvent::Deleted) => session.resetToEmptyState(),
            None => return,
        }
    }
}
