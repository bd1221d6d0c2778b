//! `allGroups` / `rootGroups` maintenance.
//!
//! Rebuild is O(live documents); reads are O(1) once the two sets are
//! materialised as `StoredDocument::GroupSet` entries.

use std::collections::BTreeSet;

use crate::storage::{GroupKind, StoredDocument};

/// Scans every live document, extracts `groupId`, and returns the full
/// set plus the set of first dotted segments ("root groups").
pub fn compute_groups(documents: &[StoredDocument]) -> (Vec<String>, Vec<String>) {
    let mut all = BTreeSet::new();
    let mut root = BTreeSet::new();

    for doc in documents {
        let StoredDocument::Live(fields) = doc else {
            continue;
        };
        let Some(group_id) = fields.get("g") else {
            continue;
        };
        all.insert(group_id.to_string());
        if let Some(first) = group_id.split('.').next() {
            root.insert(first.to_string());
        }
    }

    (all.into_iter().collect(), root.into_iter().collect())
}

/// Replaces any existing `GroupSet` documents in `documents` with freshly
/// computed ones, appending them if none existed.
pub fn rebuild(documents: &mut Vec<StoredDocument>) {
    let (all, root) = compute_groups(documents);
    documents.retain(|doc| !matches!(doc, StoredDocument::GroupSet { .. }));
    documents.push(StoredDocument::GroupSet {
        kind: GroupKind::All,
        groups: all,
    });
    documents.push(StoredDocument::GroupSet {
        kind: GroupKind::Root,
        groups: root,
    });
}

pub fn read(documents: &[StoredDocument], kind: GroupKind) -> Vec<String> {
    documents
        .iter()
        .find_map(|doc| doc.as_group_set(kind))
        .map(|g| g.to_vec())
        .unwrap_or_default()
}
