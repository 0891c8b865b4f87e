// Deterministic state signature for dirty tracking
// Only meaningful fields participate: timestamps are excluded and ordering is
// canonicalized, so reloading identical disk content or reordering siblings
// never flips the dirty flag.

use serde::Serialize;

use crate::models::{Group, State};

#[derive(Serialize)]
struct SigFile {
    rel: String,
    name: String,
    description: String,
    kind: String,
    tags: Vec<String>,
}

#[derive(Serialize)]
struct SigGroup {
    id: String,
    name: String,
    description: String,
    iconId: String,
    colorName: String,
    tags: Vec<String>,
    files: Vec<SigFile>,
    children: Vec<SigGroup>,
}

#[derive(Serialize)]
struct SigRoot {
    basePath: String,
    version: i64,
    groups: Vec<SigGroup>,
}

fn simplifyGroup(g: &Group) -> SigGroup {
    let mut children: Vec<SigGroup> = g.children.iter().map(simplifyGroup).collect();
    children.sort_by(|a, b| a.name.cmp(&b.name));
    let mut files: Vec<SigFile> = g
        .files
        .iter()
        .map(|fe| SigFile {
            rel: fe.rel.clone(),
            name: fe.name.clone().unwrap_or_default(),
            description: fe.description.clone().unwrap_or_default(),
            kind: match fe.kind {
                crate::models::FileKind::Folder => "folder".to_string(),
                crate::models::FileKind::File => "file".to_string(),
            },
            tags: fe.tags.clone(),
        })
        .collect();
    files.sort_by_key(|f| serde_json::to_string(f).unwrap_or_default());
    SigGroup {
        id: g.id.clone(),
        name: g.name.clone(),
        description: g.description.clone().unwrap_or_default(),
        iconId: g.iconId.clone().unwrap_or_default(),
        colorName: g.colorName.clone().unwrap_or_default(),
        tags: g.tags.clone(),
        files,
        children,
    }
}

/// Canonical signature of the state. Equal trees (up to sibling and file
/// ordering) produce equal strings; any semantic change produces a different
/// one. Used only for equality comparison, never stored.
pub fn computeSignature(state: &State) -> String {
    let mut groups: Vec<SigGroup> = state.groups.iter().map(simplifyGroup).collect();
    groups.sort_by(|a, b| a.name.cmp(&b.name));
    let root = SigRoot {
        basePath: state.meta.basePath.clone(),
        version: state.meta.version,
        groups,
    };
    serde_json::to_string(&root).unwrap_or_default()
}
