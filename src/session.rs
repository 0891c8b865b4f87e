// Workspace session: in-memory state, dirty tracking, debounced persistence.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::debounce::Debounce;
use crate::host::{HostFs, ViewSink};
use crate::models::State;
use crate::normalize::ensureStateWithMeta;
use crate::signature::computeSignature;
use crate::storage::{configPath, loadState, serializeState, tryLoadState, writeWithRetry};

/// Save runs this long after the last mutation.
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(200);
/// The canSave context is recomputed this long after the last mutation.
pub const CONTEXT_DEBOUNCE: Duration = Duration::from_millis(150);
/// External-change reloads are ignored this long after our own write.
pub const WRITE_GUARD: Duration = Duration::from_millis(200);
/// Closed tabs stay restorable for this long after openAllInGroup.
pub const UNDO_CLOSE_WINDOW: Duration = Duration::from_secs(5);

pub type SessionState = Arc<Session>;

pub struct Session {
    pub basePath: String,
    pub state: RwLock<State>,
    pub groupFilter: RwLock<Option<String>>,
    pub tagFilter: RwLock<Option<String>>,
    lastSavedSignature: RwLock<String>,
    saveTimer: RwLock<Debounce>,
    contextTimer: RwLock<Debounce>,
    writingGuardUntil: RwLock<Option<Instant>>,
    recentlyClosed: RwLock<Vec<String>>,
    undoCloseUntil: RwLock<Option<Instant>>,
    pub fs: Arc<dyn HostFs>,
    pub view: Arc<dyn ViewSink>,
}

/// Loads the sidecar (or starts empty) and builds a live session.
pub fn initSession(
    basePath: impl Into<String>,
    fs: Arc<dyn HostFs>,
    view: Arc<dyn ViewSink>,
) -> SessionState {
    let basePath = basePath.into();
    let state = loadState(fs.as_ref(), &basePath);
    let signature = computeSignature(&state);
    println!("[initSession] loaded {} root groups", state.groups.len());
    Arc::new(Session {
        basePath,
        state: RwLock::new(state),
        groupFilter: RwLock::new(None),
        tagFilter: RwLock::new(None),
        lastSavedSignature: RwLock::new(signature),
        saveTimer: RwLock::new(Debounce::new(SAVE_DEBOUNCE)),
        contextTimer: RwLock::new(Debounce::new(CONTEXT_DEBOUNCE)),
        writingGuardUntil: RwLock::new(None),
        recentlyClosed: RwLock::new(Vec::new()),
        undoCloseUntil: RwLock::new(None),
        fs,
        view,
    })
}

impl Session {
    /// Replaces the state after a user edit: metadata is re-stamped and the
    /// save and context timers are armed. Loading and reloading never go
    /// through here, so timestamps only move on real mutations.
    pub fn setStateAt(&self, next: State, now: Instant) {
        {
            let mut state = self.state.write();
            let createdAt = state.meta.createdAt.clone();
            let version = state.meta.version;
            *state = next;
            state.meta.basePath = self.basePath.clone();
            state.meta.createdAt = createdAt;
            state.meta.updatedAt = chrono::Utc::now().to_rfc3339();
            state.meta.version = version;
        }
        self.saveTimer.write().trigger(now);
        self.contextTimer.write().trigger(now);
    }

    /// Runs a read-only closure against the current state.
    pub fn withState<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        f(&self.state.read())
    }

    /// Clones the state for a mutate-then-commit edit.
    pub fn snapshot(&self) -> State {
        self.state.read().clone()
    }

    pub fn isDirty(&self) -> bool {
        let sig = computeSignature(&self.state.read());
        sig != *self.lastSavedSignature.read()
    }

    /// Fires any timers that have come due. Hosts call this from their event
    /// loop (or from `spawnPump`); tests call it with fabricated instants.
    pub fn pump(&self, now: Instant) {
        if self.contextTimer.write().fireDue(now) {
            self.view.updateCanSave(self.isDirty());
        }
        if self.saveTimer.write().fireDue(now) {
            self.saveToDisk(now);
        }
        let expired = self
            .undoCloseUntil
            .read()
            .map(|until| now >= until)
            .unwrap_or(false);
        if expired {
            self.clearUndoClose();
        }
    }

    /// Immediate save; the explicit save command lands here. Skips the write
    /// entirely when the tree matches what is already on disk.
    pub fn saveNow(&self, now: Instant) {
        self.saveTimer.write().cancel();
        if !self.isDirty() {
            self.view.updateCanSave(false);
            return;
        }
        self.saveToDisk(now);
    }

    /// Serializes and writes the sidecar. Write failures are logged and
    /// swallowed; the saved signature is stamped either way (matching the
    /// write we attempted), so a later edit re-arms the save rather than the
    /// failure itself looping.
    fn saveToDisk(&self, now: Instant) {
        let started = Instant::now();
        let (bytes, signature) = {
            let state = self.state.read();
            // updatedAt reflects the write, not the last mutation
            let mut toWrite = state.clone();
            toWrite.meta.updatedAt = chrono::Utc::now().to_rfc3339();
            match serializeState(&toWrite) {
                Ok(bytes) => (bytes, computeSignature(&state)),
                Err(e) => {
                    println!("[saveToDisk] serialize failed: {}", e);
                    return;
                }
            }
        };
        let path = configPath(&self.basePath);
        *self.writingGuardUntil.write() = Some(now + WRITE_GUARD);
        if let Err(e) = writeWithRetry(self.fs.as_ref(), &path, &bytes) {
            println!("[saveToDisk] write failed: {}", e);
        }
        *self.lastSavedSignature.write() = signature;
        self.view.updateCanSave(false);
        println!("[saveToDisk] finished in {:?}", started.elapsed());
    }

    /// Re-reads the sidecar after an external change. Skipped while the
    /// write guard is active so our own save does not bounce back as a
    /// reload. Unreadable or malformed content leaves the current tree and
    /// signature untouched; only the delete event clears the tree.
    /// Metadata is taken as-is from disk, not re-stamped.
    pub fn reloadFromDiskNow(&self, now: Instant) {
        let guarded = self
            .writingGuardUntil
            .read()
            .map(|until| now < until)
            .unwrap_or(false);
        if guarded {
            println!("[reloadFromDiskNow] skipped, own write still settling");
            return;
        }
        let next = match tryLoadState(self.fs.as_ref(), &self.basePath) {
            Ok(next) => next,
            Err(e) => {
                println!("[reloadFromDiskNow] config unreadable, keeping state: {}", e);
                return;
            }
        };
        let signature = computeSignature(&next);
        *self.state.write() = next;
        *self.lastSavedSignature.write() = signature;
        self.view.refresh(None);
        self.view.updateCanSave(false);
        println!("[reloadFromDiskNow] state replaced from disk");
    }

    /// Deleting the sidecar resets the tree to an empty forest. The saved
    /// signature is left alone, so the empty tree reads as unsaved until the
    /// user persists or repopulates it.
    pub fn resetToEmptyState(&self) {
        *self.state.write() = ensureStateWithMeta(None, &self.basePath);
        self.view.refresh(None);
        println!("[resetToEmptyState] config removed, starting empty");
    }

    pub fn setGroupFilter(&self, filter: Option<String>) {
        *self.groupFilter.write() = filter;
        self.publishFilterContext();
    }

    /// Toggle semantics: applying the already active tag clears it.
    pub fn applyTagFilter(&self, tag: &str) {
        let mut current = self.tagFilter.write();
        let same = current
            .as_deref()
            .map(|active| crate::filter::isSameTag(active, tag))
            .unwrap_or(false);
        if same {
            *current = None;
        } else {
            *current = Some(tag.to_string());
        }
        drop(current);
        self.publishFilterContext();
    }

    pub fn clearTagFilter(&self) {
        *self.tagFilter.write() = None;
        self.publishFilterContext();
    }

    fn publishFilterContext(&self) {
        let hasFilter =
            self.groupFilter.read().is_some() || self.tagFilter.read().is_some();
        let tag = self.tagFilter.read().clone();
        self.view.updateFilterContext(hasFilter, tag.as_deref());
        self.view.refresh(None);
    }

    /// Arms the undo-close buffer with the paths that were just closed.
    pub fn armUndoClose(&self, closedAbsPaths: Vec<String>, now: Instant) {
        *self.recentlyClosed.write() = closedAbsPaths;
        *self.undoCloseUntil.write() = Some(now + UNDO_CLOSE_WINDOW);
        self.view.updateCanUndoClose(true);
    }

    /// Drains the buffer; empty when expired or never armed.
    pub fn takeUndoClose(&self) -> Vec<String> {
        let paths = std::mem::take(&mut *self.recentlyClosed.write());
        *self.undoCloseUntil.write() = None;
        self.view.updateCanUndoClose(false);
        paths
    }

    fn clearUndoClose(&self) {
        self.recentlyClosed.write().clear();
        *self.undoCloseUntil.write() = None;
        self.view.updateCanUndoClose(false);
    }
}

/// Background pump for hosts without their own timer loop.
pub fn spawnPump(session: SessionState) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || loop {
        std::thread::sleep(Duration::from_millis(50));
        session.pump(Instant::now());
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{EntryKind, NullViewSink, StdFs};
    use crate::models::Group;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingFs {
        inner: StdFs,
        writes: AtomicUsize,
    }

    impl CountingFs {
        fn new() -> Self {
            Self {
                inner: StdFs,
                writes: AtomicUsize::new(0),
            }
        }
    }

    impl HostFs for CountingFs {
        fn readFile(&self, path: &Path) -> Result<Vec<u8>, String> {
            self.inner.readFile(path)
        }
        fn writeFile(&self, path: &Path, bytes: &[u8]) -> Result<(), String> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.writeFile(path, bytes)
        }
        fn stat(&self, path: &Path) -> Result<EntryKind, String> {
            self.inner.stat(path)
        }
        fn readDirectory(&self, path: &Path) -> Result<Vec<(String, EntryKind)>, String> {
            self.inner.readDirectory(path)
        }
    }

    fn sessionIn(dir: &tempfile::TempDir, fs: Arc<dyn HostFs>) -> SessionState {
        initSession(
            dir.path().to_str().unwrap(),
            fs,
            Arc::new(NullViewSink),
        )
    }

    #[test]
    fn test_burst_of_edits_produces_single_write() {
        let dir = tempfile::tempdir().unwrap();
        let fs = Arc::new(CountingFs::new());
        let session = sessionIn(&dir, fs.clone());
        let t0 = Instant::now();

        for i in 0..5 {
            let mut next = session.snapshot();
            next.groups.push(Group::new(format!("G{}", i)));
            session.setStateAt(next, t0 + Duration::from_millis(i * 20));
        }
        // inside the debounce window: nothing written yet
        session.pump(t0 + Duration::from_millis(150));
        assert_eq!(fs.writes.load(Ordering::SeqCst), 0);
        // past the window from the last edit: exactly one write
        session.pump(t0 + Duration::from_millis(400));
        assert_eq!(fs.writes.load(Ordering::SeqCst), 1);
        session.pump(t0 + Duration::from_millis(800));
        assert_eq!(fs.writes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_save_now_skips_clean_state() {
        let dir = tempfile::tempdir().unwrap();
        let fs = Arc::new(CountingFs::new());
        let session = sessionIn(&dir, fs.clone());
        let t0 = Instant::now();

        let mut next = session.snapshot();
        next.groups.push(Group::new("A"));
        session.setStateAt(next, t0);
        session.saveNow(t0 + Duration::from_millis(10));
        assert_eq!(fs.writes.load(Ordering::SeqCst), 1);
        // same tree again: signature matches, no second write
        session.saveNow(t0 + Duration::from_millis(20));
        assert_eq!(fs.writes.load(Ordering::SeqCst), 1);
        assert!(!session.isDirty());
    }

    #[test]
    fn test_reload_skipped_inside_write_guard() {
        let dir = tempfile::tempdir().unwrap();
        let fs: Arc<dyn HostFs> = Arc::new(StdFs);
        let session = sessionIn(&dir, fs);
        let t0 = Instant::now();

        let mut next = session.snapshot();
        next.groups.push(Group::new("Kept"));
        session.setStateAt(next, t0);
        session.saveNow(t0);

        // clobber the sidecar externally
        std::fs::write(configPath(&session.basePath), b"{}").unwrap();
        // still inside the guard: external content ignored
        session.reloadFromDiskNow(t0 + Duration::from_millis(100));
        assert_eq!(session.withState(|s| s.groups.len()), 1);
        // past the guard: disk wins
        session.reloadFromDiskNow(t0 + Duration::from_millis(300));
        assert_eq!(session.withState(|s| s.groups.len()), 0);
    }

    #[test]
    fn test_reload_keeps_state_on_malformed_config() {
        let dir = tempfile::tempdir().unwrap();
        let fs: Arc<dyn HostFs> = Arc::new(StdFs);
        let session = sessionIn(&dir, fs);
        let t0 = Instant::now();

        let mut next = session.snapshot();
        next.groups.push(Group::new("Kept"));
        session.setStateAt(next, t0);
        session.saveNow(t0);

        // external edit corrupts the sidecar
        std::fs::write(configPath(&session.basePath), b"{not json").unwrap();
        session.reloadFromDiskNow(t0 + Duration::from_millis(300));
        // tree and saved signature stay as they were
        assert_eq!(session.withState(|s| s.groups.len()), 1);
        assert!(!session.isDirty());
    }

    #[test]
    fn test_delete_reset_keeps_dirty_signature() {
        let dir = tempfile::tempdir().unwrap();
        let fs: Arc<dyn HostFs> = Arc::new(StdFs);
        let session = sessionIn(&dir, fs);
        let t0 = Instant::now();

        let mut next = session.snapshot();
        next.groups.push(Group::new("A"));
        session.setStateAt(next, t0);
        session.saveNow(t0);
        assert!(!session.isDirty());

        session.resetToEmptyState();
        // the empty forest no longer matches the saved signature
        assert!(session.isDirty());
    }

    #[test]
    fn test_tag_filter_toggles() {
        let dir = tempfile::tempdir().unwrap();
        let session = sessionIn(&dir, Arc::new(StdFs));
        session.applyTagFilter("api");
        assert_eq!(session.tagFilter.read().as_deref(), Some("api"));
        session.applyTagFilter("api");
        assert_eq!(*session.tagFilter.read(), None);
    }

    #[test]
    fn test_undo_close_buffer_expires_via_pump() {
        let dir = tempfile::tempdir().unwrap();
        let session = sessionIn(&dir, Arc::new(StdFs));
        let t0 = Instant::now();
        session.armUndoClose(vec!["/tmp/a.rs".into()], t0);
        session.pump(t0 + Duration::from_secs(6));
        assert!(session.takeUndoClose().is_empty());
    }
}
