//! `CreatorRegistry` — an ordered set of `IndexCreator`s and the
//! orchestration of populate/write/read across them.

use crate::coordinate::ArtifactInfo;
use crate::core::error::Result;
use crate::schema::creator::{ArtifactContext, IndexCreator};
use crate::schema::document::Document;
use crate::schema::field::FieldRegistry;

pub struct CreatorRegistry {
    creators: Vec<Box<dyn IndexCreator>>,
    fields: FieldRegistry,
}

impl CreatorRegistry {
    /// Builds a registry from an explicit, ordered creator list. Field
    /// declarations are collected in the same order so resolution ties
    /// ("return the last declared") respect it.
    pub fn new(creators: Vec<Box<dyn IndexCreator>>) -> Self {
        let mut fields = FieldRegistry::new();
        for creator in &creators {
            for field in creator.fields() {
                fields.declare(field);
            }
        }
        CreatorRegistry { creators, fields }
    }

    /// The default set: `MinimalArtifactInfoIndexCreator` then
    /// `JarFileContentsIndexCreator`.
    pub fn default_set() -> Self {
        use crate::schema::creators::{JarFileContentsIndexCreator, MinimalArtifactInfoIndexCreator};
        CreatorRegistry::new(vec![
            Box::new(MinimalArtifactInfoIndexCreator::new()),
            Box::new(JarFileContentsIndexCreator::new()),
        ])
    }

    pub fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    /// Runs `populate_artifact_info` across every creator in declared
    /// order, each seeing fields the earlier ones already populated.
    pub fn populate(&self, ctx: &ArtifactContext, info: &mut ArtifactInfo) -> Result<()> {
        for creator in &self.creators {
            creator.populate_artifact_info(ctx, info)?;
        }
        Ok(())
    }

    /// Runs `update_document` across every creator in declared order.
    /// The resulting document is the merge of every creator's
    /// contribution.
    pub fn write(&self, info: &ArtifactInfo, doc: &mut Document) {
        for creator in &self.creators {
            creator.update_document(info, doc);
        }
    }

    /// Reduces `update_artifact_info` over every creator; returns
    /// whether any creator recognised a field in `doc`.
    pub fn read(&self, doc: &Document, info: &mut ArtifactInfo) -> bool {
        let mut recognised = false;
        for creator in &self.creators {
            recognised |= creator.update_artifact_info(doc, info);
        }
        recognised
    }
}
