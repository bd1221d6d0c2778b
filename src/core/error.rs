//! Error taxonomy for the indexing core.
//!
//! `ParseError` never escapes the public API: `QueryCreator` always falls
//! back to the legacy construction path instead of surfacing a parse
//! failure. `LimitExceeded` is not an error at all; it is represented in
//! the flat-search return type (`search::results::FlatOutcome`).

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structural integrity of the on-disk index was violated. The owning
    /// context must be closed (without deleting files) and reopened with
    /// `purge` or `replace` to recover.
    #[error("corrupt index at {path}: {reason}")]
    CorruptIndex { path: PathBuf, reason: String },

    /// The descriptor document found on open does not match the context's
    /// `repositoryId`, or is absent from a non-empty directory, and
    /// `reclaim_index` was not requested.
    #[error("unsupported existing index in {path}: {reason}")]
    UnsupportedExistingIndex { path: PathBuf, reason: String },

    /// The descriptor's `IDXINFO` version is newer than this
    /// implementation understands.
    #[error("unsupported descriptor version {found} (supported: {supported}) in {path}")]
    UnsupportedDescriptorVersion {
        path: PathBuf,
        found: u32,
        supported: u32,
    },

    /// A context operation was attempted while the context was closed.
    #[error("index context {id} is closed")]
    ContextClosed { id: String },

    /// Transient filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] bincode::Error),

    #[error("invalid field: {0}")]
    InvalidField(String),

    #[error("invalid coordinate path: {0}")]
    InvalidCoordinate(String),
}

pub type Result<T> = std::result::Result<T, Error>;
