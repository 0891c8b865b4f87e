// Models module for the Workscene persisted document
// All fields use camelCase for direct JSON compatibility with the editor frontend

pub mod common;
pub mod file_entry;
pub mod group;
pub mod meta;
pub mod state;

pub use common::{FileRef, FolderHandlingMode, SortMode, TagStat};
pub use file_entry::{FileEntry, FileKind};
pub use group::Group;
pub use meta::Meta;
pub use state::State;
