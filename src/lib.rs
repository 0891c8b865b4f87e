// Allow non-snake_case names for JSON serialization compatibility with the editor frontend
#![allow(non_snake_case)]

pub mod collect;
pub mod commands;
pub mod debounce;
pub mod filter;
pub mod host;
pub mod models;
pub mod normalize;
pub mod session;
pub mod signature;
pub mod storage;
pub mod transfer;
pub mod tree;
pub mod view;
pub mod watcher;

pub use host::{Dialogs, Editors, HostFs, NullViewSink, StdFs, ThemeTokenAllocator, ViewSink};
pub use models::{FileEntry, FileKind, FileRef, FolderHandlingMode, Group, Meta, SortMode, State, TagStat};
pub use session::{initSession, Session, SessionState};
pub use storage::CONFIG_FILE_BASENAME;
pub use view::TreeItem;
pub use watcher::{watchConfig, ConfigWatcher};
