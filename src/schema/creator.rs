//! `IndexCreator` trait and the on-disk context handed to it while
//! populating an `ArtifactInfo`.

use std::path::{Path, PathBuf};

use crate::coordinate::{ArtifactInfo, Gav};
use crate::core::error::Result;
use crate::schema::document::Document;
use crate::schema::field::IndexerField;

/// Everything a creator needs to compute fields for one artifact. The
/// scanner that walks a repository and resolves coordinates to files is
/// external to this crate; it hands each artifact in as a context.
pub struct ArtifactContext {
    pub repository_id: String,
    pub context_id: String,
    pub gav: Gav,
    /// Absolute path of the artifact file on disk.
    pub path: PathBuf,
    pub size: u64,
    pub last_modified: chrono::DateTime<chrono::Utc>,
}

impl ArtifactContext {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A schema plug-in: declares the `IndexerField`s it owns and implements
/// the three operations that keep `ArtifactInfo` and `Document` in sync.
pub trait IndexCreator: Send + Sync {
    /// Fields this creator contributes, in declaration order.
    fn fields(&self) -> Vec<IndexerField>;

    /// Compute this creator's slice of an `ArtifactInfo` from the
    /// on-disk artifact. Creators run in registry order; later creators
    /// see fields populated by earlier ones on the same `ArtifactInfo`.
    fn populate_artifact_info(&self, ctx: &ArtifactContext, info: &mut ArtifactInfo) -> Result<()>;

    /// Write this creator's fields into `doc` from a populated
    /// `ArtifactInfo`.
    fn update_document(&self, info: &ArtifactInfo, doc: &mut Document);

    /// Read this creator's fields back out of `doc` into `info`.
    /// Returns whether any field recognised by this creator was present.
    fn update_artifact_info(&self, doc: &Document, info: &mut ArtifactInfo) -> bool;
}
