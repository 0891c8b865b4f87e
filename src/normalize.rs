// Path and tag normalization
// All paths in the persisted document are POSIX-relative to meta.basePath;
// this module is the single place that converts to and from that form.

use std::path::{Component, Path, PathBuf};

use crate::models::{FileEntry, Group, Meta, State};

/// Converts a native path string to POSIX separators.
pub fn toPosix(p: &str) -> String {
    p.split(std::path::MAIN_SEPARATOR)
        .collect::<Vec<_>>()
        .join("/")
}

/// Makes an absolute filesystem path relative to `base`, POSIX-normalized.
/// Without a base the absolute path is returned POSIX-normalized.
pub fn toRelativeFromFsPath(absFsPath: &str, base: &str) -> String {
    if absFsPath.is_empty() {
        return String::new();
    }
    if base.is_empty() {
        return toPosix(absFsPath);
    }
    let rel = relativePath(Path::new(base), Path::new(absFsPath));
    toPosix(&rel.to_string_lossy())
}

/// Component-wise relative path: walk up from `base` with `..`, then down to
/// `target`. Paths with no common prefix (other roots/drives) come back as-is.
fn relativePath(base: &Path, target: &Path) -> PathBuf {
    let baseComps: Vec<Component> = base.components().collect();
    let targetComps: Vec<Component> = target.components().collect();
    let mut shared = 0;
    while shared < baseComps.len()
        && shared < targetComps.len()
        && baseComps[shared] == targetComps[shared]
    {
        shared += 1;
    }
    if shared == 0 {
        return target.to_path_buf();
    }
    let mut out = PathBuf::new();
    for _ in shared..baseComps.len() {
        out.push("..");
    }
    for comp in &targetComps[shared..] {
        out.push(comp.as_os_str());
    }
    out
}

/// Joins a stored relative path back onto the base. An empty base treats the
/// input as already absolute.
pub fn fromRelativeToAbs(rel: &str, base: &str) -> PathBuf {
    if base.is_empty() {
        PathBuf::from(rel)
    } else {
        Path::new(base).join(rel)
    }
}

/// Resolves a `file:` URI to a filesystem path: strips the scheme and
/// authority, percent-decodes, and unwraps the Windows `/C:/` drive form.
fn fileUriToFsPath(uri: &str) -> Option<String> {
    let rest = uri
        .strip_prefix("file://")
        .map(|r| r.strip_prefix("localhost").unwrap_or(r))
        .or_else(|| uri.strip_prefix("file:"))?;
    if !rest.starts_with('/') {
        return None;
    }
    let decoded = urlencoding::decode(rest).ok()?.into_owned();
    let bytes = decoded.as_bytes();
    if bytes.len() >= 3 && bytes[2] == b':' && bytes[0] == b'/' {
        Some(decoded[1..].to_string())
    } else {
        Some(decoded)
    }
}

/// Resolves a `file:` URI to an absolute filesystem path; None for other
/// schemes or malformed input.
pub fn uriToFsPath(uri: &str) -> Option<String> {
    fileUriToFsPath(uri)
}

/// Normalizes any path representation (URI, absolute, relative) into the
/// canonical relative form. Fails soft: malformed input comes back unchanged.
pub fn normalizeEntry(input: &str, base: &str) -> String {
    if input.is_empty() {
        return input.to_string();
    }
    if input.starts_with("file:") {
        return match fileUriToFsPath(input) {
            Some(fsPath) => toRelativeFromFsPath(&fsPath, base),
            None => input.to_string(),
        };
    }
    if Path::new(input).is_absolute() {
        return toRelativeFromFsPath(input, base);
    }
    toPosix(input)
}

/// Lexically collapses `.` and `..` components, without touching the
/// filesystem. Stored rels may carry dot segments (normalizeEntry leaves
/// relative inputs as-is), so equality has to see through them.
fn collapseDots(p: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in p.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                let poppable =
                    matches!(out.components().next_back(), Some(Component::Normal(_)));
                if poppable {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Path equality as the tree sees it: both sides resolved against the base,
/// dot segments collapsed, POSIX-normalized and compared case-insensitively
/// (uniform behavior across case-insensitive filesystems).
pub fn isSameRel(a: &str, b: &str, base: &str) -> bool {
    let ua = collapseDots(&fromRelativeToAbs(a, base));
    let ub = collapseDots(&fromRelativeToAbs(b, base));
    toPosix(&ua.to_string_lossy()).to_lowercase() == toPosix(&ub.to_string_lossy()).to_lowercase()
}

/// True when the group already holds an entry equal to `rel` under path
/// equality (not literal string comparison).
pub fn hasFileRel(group: &Group, rel: &str, base: &str) -> bool {
    group.files.iter().any(|fe| isSameRel(&fe.rel, rel, base))
}

/// Top-level folder label of an absolute path relative to the workspace root;
/// files directly under the root map to "Root".
pub fn labelForTopFolder(absPath: &str, base: &str) -> String {
    let mut relative = absPath.to_string();
    if !base.is_empty()
        && toPosix(absPath)
            .to_lowercase()
            .starts_with(&toPosix(base).to_lowercase())
    {
        relative = relativePath(Path::new(base), Path::new(absPath))
            .to_string_lossy()
            .to_string();
    }
    let normalized = toPosix(&relative);
    let segs: Vec<&str> = normalized.split('/').collect();
    if segs.len() > 1 {
        segs[0].to_string()
    } else {
        "Root".to_string()
    }
}

/// Normalizes a tag list: trims, drops empties, and deduplicates by
/// lowercased key while keeping the first-seen casing and insertion order.
/// Idempotent.
pub fn normalizeTags<I, S>(input: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seenKeys: Vec<String> = Vec::new();
    let mut out: Vec<String> = Vec::new();
    for raw in input {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        let key = trimmed.to_lowercase();
        if !seenKeys.contains(&key) {
            seenKeys.push(key);
            out.push(trimmed.to_string());
        }
    }
    out
}

/// Normalizes one file entry in place: canonical rel, default kind, clean tags.
pub fn normalizeFileEntry(entry: &FileEntry, base: &str) -> FileEntry {
    FileEntry {
        rel: normalizeEntry(&entry.rel, base),
        name: entry.name.clone(),
        description: entry.description.clone(),
        kind: entry.kind,
        tags: normalizeTags(&entry.tags),
    }
}

/// Normalizes every path and tag inside a group (recursive).
pub fn normalizeGroup(g: &Group, base: &str) -> Group {
    Group {
        id: g.id.clone(),
        name: g.name.clone(),
        description: g.description.clone(),
        files: g.files.iter().map(|f| normalizeFileEntry(f, base)).collect(),
        children: g.children.iter().map(|c| normalizeGroup(c, base)).collect(),
        tags: normalizeTags(&g.tags),
        iconId: g.iconId.clone(),
        colorName: g.colorName.clone(),
    }
}

/// Normalizes every entry in the state against its own basePath.
pub fn normalizeStateEntries(state: State) -> State {
    let base = state.meta.basePath.clone();
    State {
        groups: state
            .groups
            .iter()
            .map(|g| normalizeGroup(g, &base))
            .collect(),
        meta: state.meta,
    }
}

/// Completes a partially parsed state: fills missing meta fields from the
/// active workspace root and normalizes every entry. `None` yields the empty
/// default forest.
pub fn ensureStateWithMeta(input: Option<State>, basePath: &str) -> State {
    let defaults = Meta::forBase(basePath);
    let parsed = input.unwrap_or_default();
    let meta = Meta {
        basePath: if parsed.meta.basePath.is_empty() {
            defaults.basePath
        } else {
            parsed.meta.basePath
        },
        createdAt: if parsed.meta.createdAt.is_empty() {
            defaults.createdAt
        } else {
            parsed.meta.createdAt
        },
        updatedAt: if parsed.meta.updatedAt.is_empty() {
            defaults.updatedAt
        } else {
            parsed.meta.updatedAt
        },
        version: parsed.meta.version,
    };
    normalizeStateEntries(State {
        meta,
        groups: parsed.groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tags_dedupes_case_insensitively() {
        let tags = normalizeTags(["Bug", "bug", " UI ", "", "  "]);
        assert_eq!(tags, vec!["Bug".to_string(), "UI".to_string()]);
    }

    #[test]
    fn test_normalize_tags_idempotent() {
        let once = normalizeTags(["Alpha", "ALPHA", " beta", "Beta "]);
        let twice = normalizeTags(&once);
        assert_eq!(once, twice);
        assert_eq!(once, vec!["Alpha".to_string(), "beta".to_string()]);
    }

    #[test]
    fn test_normalize_entry_uri_absolute_relative_agree() {
        let base = "/ws";
        let fromUri = normalizeEntry("file:///ws/src/a.ts", base);
        let fromAbs = normalizeEntry("/ws/src/a.ts", base);
        let fromRel = normalizeEntry("src/a.ts", base);
        assert_eq!(fromUri, "src/a.ts");
        assert_eq!(fromUri, fromAbs);
        assert_eq!(fromUri, fromRel);
    }

    #[test]
    fn test_normalize_entry_decodes_percent_escapes() {
        assert_eq!(
            normalizeEntry("file:///ws/my%20dir/a.ts", "/ws"),
            "my dir/a.ts"
        );
    }

    #[test]
    fn test_normalize_entry_malformed_uri_unchanged() {
        assert_eq!(normalizeEntry("file:broken", "/ws"), "file:broken");
    }

    #[test]
    fn test_relative_climbs_out_of_base() {
        assert_eq!(toRelativeFromFsPath("/other/x.ts", "/ws"), "../other/x.ts");
    }

    #[test]
    fn test_relative_without_base_stays_absolute() {
        assert_eq!(toRelativeFromFsPath("/ws/a.ts", ""), "/ws/a.ts");
    }

    #[test]
    fn test_is_same_rel_case_insensitive() {
        assert!(isSameRel("src/A.ts", "src/a.ts", "/ws"));
        assert!(!isSameRel("src/a.ts", "src/b.ts", "/ws"));
    }

    #[test]
    fn test_is_same_rel_collapses_dot_segments() {
        assert!(isSameRel("src/../a.ts", "a.ts", "/ws"));
        assert!(isSameRel("./src/a.ts", "src/a.ts", "/ws"));
        assert!(isSameRel("src/sub/../../a.ts", "a.ts", "/ws"));
        assert!(!isSameRel("src/a.ts", "a.ts", "/ws"));
    }

    #[test]
    fn test_has_file_rel_sees_through_dot_segments() {
        let mut g = Group::new("G");
        g.files.push(FileEntry::file("a.ts"));
        assert!(hasFileRel(&g, "src/../a.ts", "/ws"));
    }

    #[test]
    fn test_has_file_rel_uses_path_equality() {
        let mut g = Group::new("G");
        g.files.push(FileEntry::file("src/Main.rs"));
        assert!(hasFileRel(&g, "src/main.rs", "/ws"));
        assert!(!hasFileRel(&g, "src/other.rs", "/ws"));
    }

    #[test]
    fn test_label_for_top_folder() {
        assert_eq!(labelForTopFolder("/ws/src/deep/a.ts", "/ws"), "src");
        assert_eq!(labelForTopFolder("/ws/a.ts", "/ws"), "Root");
    }

    #[test]
    fn test_ensure_state_fills_missing_meta() {
        let state = ensureStateWithMeta(None, "/ws");
        assert_eq!(state.meta.basePath, "/ws");
        assert_eq!(state.meta.version, 1);
        assert!(!state.meta.createdAt.is_empty());
        assert!(state.groups.is_empty());
    }

    #[test]
    fn test_ensure_state_normalizes_entries() {
        let mut g = Group::new("G");
        g.files.push(FileEntry::file("/ws/src/a.ts"));
        g.tags = vec!["One".into(), "one".into()];
        let mut parsed = State::default();
        parsed.meta.basePath = "/ws".into();
        parsed.groups.push(g);
        let state = ensureStateWithMeta(Some(parsed), "/ws");
        assert_eq!(state.groups[0].files[0].rel, "src/a.ts");
        assert_eq!(state.groups[0].tags, vec!["One".to_string()]);
    }
}
