//! Tabular input: id/parent-id rows and materialized-path rows.

use crate::accessor::Accessor;
use crate::error::{Error, Result};
use crate::hierarchy::{Hierarchy, PendingNode};
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
enum Slot {
    Unique(usize),
    Ambiguous,
}

fn row_label(id: Option<&str>, row: usize) -> String {
    match id {
        Some(id) => id.to_string(),
        None => format!("#{row}"),
    }
}

/// Links `pending` rows through `parents` (`None` = root candidate) and assembles the tree.
///
/// `collapse` is used by path addressing to skip imputed roots with a single child.
fn link<'a>(
    mut pending: Vec<PendingNode<'a>>,
    parents: &[Option<String>],
    collapse: bool,
) -> Result<Hierarchy<'a>> {
    let mut by_id: FxHashMap<&str, Slot> = FxHashMap::default();
    for (i, p) in pending.iter().enumerate() {
        let Some(id) = p.id.as_deref() else {
            continue;
        };
        by_id
            .entry(id)
            .and_modify(|slot| *slot = Slot::Ambiguous)
            .or_insert(Slot::Unique(i));
    }

    let mut edges: Vec<(usize, usize)> = Vec::new();
    let mut root: Option<usize> = None;
    for (i, parent_id) in parents.iter().enumerate() {
        match parent_id.as_deref() {
            Some(parent_id) => match by_id.get(parent_id) {
                Some(Slot::Unique(p)) => edges.push((*p, i)),
                Some(Slot::Ambiguous) => {
                    return Err(Error::AmbiguousParent {
                        parent_id: parent_id.to_string(),
                    });
                }
                None => {
                    return Err(Error::MissingParent {
                        child: row_label(pending[i].id.as_deref(), i),
                        parent_id: parent_id.to_string(),
                    });
                }
            },
            None => {
                if let Some(first) = root {
                    return Err(Error::MultipleRoots {
                        first: row_label(pending[first].id.as_deref(), first),
                        second: row_label(pending[i].id.as_deref(), i),
                    });
                }
                root = Some(i);
            }
        }
    }
    drop(by_id);

    let Some(mut root) = root else {
        return Err(Error::NoRoot);
    };

    for (parent, child) in edges {
        pending[parent].children.push(child);
    }

    let mut collapsed: Vec<usize> = Vec::new();
    if collapse {
        while pending[root].data.is_none() && pending[root].children.len() == 1 {
            collapsed.push(root);
            root = pending[root].children[0];
        }
    }

    let total = pending.len();
    let labels: Vec<String> = pending
        .iter()
        .enumerate()
        .map(|(i, p)| row_label(p.id.as_deref(), i))
        .collect();
    let (hierarchy, reached) = Hierarchy::assemble(pending, root);
    if hierarchy.len() + collapsed.len() != total {
        let ids: Vec<String> = reached
            .iter()
            .zip(labels)
            .enumerate()
            .filter(|(i, (reached, _))| !**reached && !collapsed.contains(i))
            .map(|(_, (_, label))| label)
            .collect();
        return Err(Error::Cycle { ids });
    }
    Ok(hierarchy)
}

/// Builds a hierarchy from `(id, parentId)` rows.
pub(crate) fn stratify<'a>(
    rows: &'a [Value],
    id: &Accessor,
    parent_id: &Accessor,
) -> Result<Hierarchy<'a>> {
    let mut pending: Vec<PendingNode<'a>> = Vec::with_capacity(rows.len());
    let mut parents: Vec<Option<String>> = Vec::with_capacity(rows.len());
    for row in rows {
        pending.push(PendingNode {
            data: Some(row),
            id: id.get(row),
            children: Vec::new(),
        });
        parents.push(parent_id.get(row));
    }
    let hierarchy = link(pending, &parents, false)?;
    debug!(
        rows = rows.len(),
        height = hierarchy.height(),
        "stratified id/parent-id rows"
    );
    Ok(hierarchy)
}

/// Builds a hierarchy from slash-delimited path rows.
///
/// Missing ancestors are imputed as data-less nodes when `impute_missing` is set; otherwise they
/// are reported as missing parents.
pub(crate) fn stratify_paths<'a>(
    rows: &'a [Value],
    path: &Accessor,
    impute_missing: bool,
) -> Result<Hierarchy<'a>> {
    let mut pending: Vec<PendingNode<'a>> = Vec::with_capacity(rows.len());
    let mut parents: Vec<Option<String>> = Vec::with_capacity(rows.len());
    let mut known: FxHashSet<String> = FxHashSet::default();

    for (i, row) in rows.iter().enumerate() {
        let Some(raw) = path.get(row) else {
            return Err(Error::UnaddressableRow {
                row: i,
                key: "path",
            });
        };
        let id = normalize(&raw);
        parents.push(non_empty(parent_of(&id)));
        known.insert(id.clone());
        pending.push(PendingNode {
            data: Some(row),
            id: Some(id),
            children: Vec::new(),
        });
    }

    let mut i = 0usize;
    let mut imputed = 0usize;
    while i < parents.len() {
        if let Some(parent) = parents[i].clone() {
            if !known.contains(&parent) {
                if !impute_missing {
                    return Err(Error::MissingParent {
                        child: row_label(pending[i].id.as_deref(), i),
                        parent_id: parent,
                    });
                }
                known.insert(parent.clone());
                parents.push(non_empty(parent_of(&parent)));
                pending.push(PendingNode {
                    data: None,
                    id: Some(parent),
                    children: Vec::new(),
                });
                imputed += 1;
            }
        }
        i += 1;
    }
    if imputed > 0 {
        warn!(imputed, "imputed missing path ancestors");
    }

    let hierarchy = link(pending, &parents, true)?;
    debug!(
        rows = rows.len(),
        imputed,
        height = hierarchy.height(),
        "stratified path rows"
    );
    Ok(hierarchy)
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// True when `path[i]` is a slash not escaped by an odd run of backslashes.
pub(crate) fn is_slash(path: &[u8], i: usize) -> bool {
    if path.get(i) != Some(&b'/') {
        return false;
    }
    let mut k = 0usize;
    let mut j = i;
    while j > 0 && path[j - 1] == b'\\' {
        k += 1;
        j -= 1;
    }
    k % 2 == 0
}

/// Drops one trailing (unescaped) slash and ensures a leading slash.
pub(crate) fn normalize(path: &str) -> String {
    let bytes = path.as_bytes();
    let n = bytes.len();
    let trimmed = if n >= 1 && is_slash(bytes, n - 1) && !(n >= 2 && is_slash(bytes, n - 2)) {
        &path[..n - 1]
    } else {
        path
    };
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// `/a/b` -> `/a`, `/a` -> `/`, `/` -> `` (no parent).
pub(crate) fn parent_of(path: &str) -> &str {
    let bytes = path.as_bytes();
    let mut i = bytes.len();
    if i < 2 {
        return "";
    }
    loop {
        i -= 1;
        if i <= 1 || is_slash(bytes, i) {
            break;
        }
    }
    &path[..i]
}
