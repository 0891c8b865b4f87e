// Tree search and structural primitives over the group forest
// Parents are derived by search rather than stored, so cycles cannot be
// represented; every structural command funnels through these helpers.

use std::collections::VecDeque;

use crate::models::Group;

/// Result of a lookup: the node plus its parent (None for roots).
pub struct FoundGroup<'a> {
    pub group: &'a Group,
    pub parent: Option<&'a Group>,
}

/// Breadth-first search by id. Ids are unique, first match is definitive.
pub fn findGroupById<'a>(groups: &'a [Group], id: &str) -> Option<FoundGroup<'a>> {
    let mut queue: VecDeque<(&Group, Option<&Group>)> =
        groups.iter().map(|g| (g, None)).collect();
    while let Some((node, parent)) = queue.pop_front() {
        if node.id == id {
            return Some(FoundGroup { group: node, parent });
        }
        for child in &node.children {
            queue.push_back((child, Some(node)));
        }
    }
    None
}

/// Mutable lookup by id (depth-first).
pub fn findGroupByIdMut<'a>(groups: &'a mut [Group], id: &str) -> Option<&'a mut Group> {
    for g in groups.iter_mut() {
        if g.id == id {
            return Some(g);
        }
        if let Some(found) = findGroupByIdMut(&mut g.children, id) {
            return Some(found);
        }
    }
    None
}

/// Removes a group (with its whole subtree) from wherever it lives.
pub fn removeGroupById(groups: &mut Vec<Group>, id: &str) -> bool {
    if let Some(idx) = groups.iter().position(|g| g.id == id) {
        groups.remove(idx);
        return true;
    }
    for g in groups.iter_mut() {
        if removeGroupById(&mut g.children, id) {
            return true;
        }
    }
    false
}

/// Like remove, but hands the detached subtree back for re-insertion.
pub fn detachGroupById(groups: &mut Vec<Group>, id: &str) -> Option<Group> {
    if let Some(idx) = groups.iter().position(|g| g.id == id) {
        return Some(groups.remove(idx));
    }
    for g in groups.iter_mut() {
        if let Some(found) = detachGroupById(&mut g.children, id) {
            return Some(found);
        }
    }
    None
}

/// True when `nodeId` lives anywhere under `ancestorId`. Used to reject moves
/// that would make a group its own descendant.
pub fn isAncestor(groups: &[Group], ancestorId: &str, nodeId: &str) -> bool {
    let Some(found) = findGroupById(groups, ancestorId) else {
        return false;
    };
    let mut stack: Vec<&Group> = found.group.children.iter().collect();
    while let Some(node) = stack.pop() {
        if node.id == nodeId {
            return true;
        }
        stack.extend(node.children.iter());
    }
    false
}

/// Flattens the forest to `(id, "Parent/Child")` path labels for pickers.
pub fn flattenGroups(groups: &[Group], prefix: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for g in groups {
        let label = if prefix.is_empty() {
            g.name.clone()
        } else {
            format!("{}/{}", prefix, g.name)
        };
        out.push((g.id.clone(), label.clone()));
        if !g.children.is_empty() {
            out.extend(flattenGroups(&g.children, &label));
        }
    }
    out
}

/// Suggests a unique name among direct siblings: "Group", "Group.001", ...
/// The scan is sibling-local on purpose; other levels may reuse names.
pub fn suggestGroupName(siblings: &[Group]) -> String {
    let base = "Group";
    let names: Vec<String> = siblings.iter().map(|g| g.name.trim().to_string()).collect();
    if !names.iter().any(|n| n == base) {
        return base.to_string();
    }
    for i in 1..1000 {
        let candidate = format!("{}.{:03}", base, i);
        if !names.iter().any(|n| *n == candidate) {
            return candidate;
        }
    }
    format!("{}.{}", base, chrono::Utc::now().timestamp_millis())
}
