//! `IndexDirectory` — the persistence seam `IndexingContext` writes
//! through, and `StoredDocument`, the distinguished document shapes
//! that live behind it.
//!
//! The reference system persists one untyped document type where
//! `DESCRIPTOR`, `DELETED`, and `UINFO` are all optional fields on the
//! same record, which only an invariant ("never both") keeps coherent.
//! Modelling the four document shapes as a closed enum instead makes
//! that invariant a property of the type rather than of caller
//! discipline.

use std::path::Path;

use crate::core::error::Result;
use crate::schema::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GroupKind {
    All,
    Root,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum StoredDocument {
    /// A live artifact document, as produced by the `CreatorRegistry`.
    Live(Document),
    /// `DELETED == uinfo`; marks a prior live document as removed.
    Tombstone { uinfo: String },
    /// The single per-context marker document. `IDXINFO = "<version>|<repositoryId>"`.
    Descriptor { version: u32, repository_id: String },
    /// `allGroups` or `rootGroups`, persisted as a unit-separator-joined list.
    GroupSet { kind: GroupKind, groups: Vec<String> },
}

impl StoredDocument {
    pub fn uinfo(&self) -> Option<&str> {
        match self {
            StoredDocument::Live(doc) => doc.get("u"),
            _ => None,
        }
    }

    pub fn tombstone_uinfo(&self) -> Option<&str> {
        match self {
            StoredDocument::Tombstone { uinfo } => Some(uinfo),
            _ => None,
        }
    }

    pub fn is_descriptor(&self) -> bool {
        matches!(self, StoredDocument::Descriptor { .. })
    }

    pub fn as_group_set(&self, kind: GroupKind) -> Option<&[String]> {
        match self {
            StoredDocument::GroupSet { kind: k, groups } if *k == kind => Some(groups),
            _ => None,
        }
    }
}

/// Abstracts where a context's documents physically live: on disk or
/// purely in memory. `IndexingContext` is the only caller; everything
/// else operates on `StoredDocument` values in memory.
pub trait IndexDirectory: Send + Sync {
    fn load(&self) -> Result<Vec<StoredDocument>>;
    fn save(&self, documents: &[StoredDocument]) -> Result<()>;
    fn exists(&self) -> bool;
    fn clear(&self) -> Result<()>;

    /// Write the distinguished `timestamp` file required by the
    /// external on-disk interface. A no-op for directories with no
    /// backing filesystem path.
    fn write_timestamp(&self, timestamp: chrono::DateTime<chrono::Utc>) -> Result<()>;
    fn read_timestamp(&self) -> Result<Option<chrono::DateTime<chrono::Utc>>>;

    /// Filesystem root, if any — used by `replace`/`merge` to copy
    /// files directly instead of round-tripping through `load`/`save`.
    fn root_path(&self) -> Option<&Path>;
}
