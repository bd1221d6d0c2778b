//! `MinimalArtifactInfoIndexCreator` — the coordinate, size, timestamp
//! and checksum fields every artifact carries.

use std::fs;
use std::io::Read;

use crate::coordinate::ArtifactInfo;
use crate::core::error::Result;
use crate::schema::creator::{ArtifactContext, IndexCreator};
use crate::schema::document::Document;
use crate::schema::field::IndexerField;

const FLD_UINFO: &str = "u";
const FLD_GROUP_KW: &str = "g";
const FLD_GROUP_TOK: &str = "groupId";
const FLD_ARTIFACT_KW: &str = "a";
const FLD_ARTIFACT_TOK: &str = "artifactId";
const FLD_VERSION_KW: &str = "v";
const FLD_VERSION_TOK: &str = "version";
const FLD_PACKAGING: &str = "p";
const FLD_SIZE: &str = "size";
const FLD_LAST_MODIFIED: &str = "lm";
const FLD_SHA1: &str = "1";
const FLD_MD5: &str = "md5";
const FLD_NAME: &str = "n";
const FLD_DESCRIPTION: &str = "d";

#[derive(Debug, Default)]
pub struct MinimalArtifactInfoIndexCreator {
    pub compute_checksums: bool,
}

impl MinimalArtifactInfoIndexCreator {
    pub fn new() -> Self {
        MinimalArtifactInfoIndexCreator {
            compute_checksums: true,
        }
    }

    fn digest(path: &std::path::Path) -> Result<(String, String)> {
        use md5::{Digest as Md5Digest, Md5};
        use sha1::{Digest as Sha1Digest, Sha1};

        let mut file = fs::File::open(path)?;
        let mut buf = [0u8; 8192];
        let mut sha1 = Sha1::new();
        let mut md5 = Md5::new();
        loop {
            let n = file.read(&mut buf)?;
            if n == 0 {
                break;
            }
            sha1.update(&buf[..n]);
            md5.update(&buf[..n]);
        }
        Ok((
            crate::core::hex::encode(&sha1.finalize()),
            crate::core::hex::encode(&md5.finalize()),
        ))
    }
}

impl IndexCreator for MinimalArtifactInfoIndexCreator {
    fn fields(&self) -> Vec<IndexerField> {
        vec![
            IndexerField::keyword("groupId", FLD_GROUP_KW),
            IndexerField::tokenized("groupId", FLD_GROUP_TOK),
            IndexerField::keyword("artifactId", FLD_ARTIFACT_KW),
            IndexerField::tokenized("artifactId", FLD_ARTIFACT_TOK),
            IndexerField::keyword("version", FLD_VERSION_KW),
            IndexerField::tokenized("version", FLD_VERSION_TOK),
            IndexerField::keyword("packaging", FLD_PACKAGING),
            IndexerField::keyword("sha1", FLD_SHA1),
            IndexerField::keyword("name", FLD_NAME),
            IndexerField::tokenized("name", FLD_NAME),
            IndexerField::tokenized("description", FLD_DESCRIPTION),
        ]
    }

    fn populate_artifact_info(&self, ctx: &ArtifactContext, info: &mut ArtifactInfo) -> Result<()> {
        info.group_id = ctx.gav.group_id.clone();
        info.artifact_id = ctx.gav.artifact_id.clone();
        info.version = ctx.gav.version.clone();
        info.classifier = ctx.gav.classifier.clone();
        info.extension = ctx.gav.extension.clone();
        info.packaging = if ctx.gav.extension == "jar" {
            "jar".to_string()
        } else {
            ctx.gav.extension.clone()
        };
        info.repository_id = ctx.repository_id.clone();
        info.context_id = ctx.context_id.clone();
        info.file_name = ctx
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info.size = ctx.size;
        info.last_modified = ctx.last_modified;

        if self.compute_checksums && ctx.path.exists() {
            let (sha1, md5) = Self::digest(&ctx.path)?;
            info.sha1 = Some(sha1);
            info.md5 = Some(md5);
        }
        Ok(())
    }

    fn update_document(&self, info: &ArtifactInfo, doc: &mut Document) {
        doc.set(FLD_UINFO, info.uinfo());
        doc.set(FLD_GROUP_KW, &info.group_id);
        doc.set(FLD_GROUP_TOK, &info.group_id);
        doc.set(FLD_ARTIFACT_KW, &info.artifact_id);
        doc.set(FLD_ARTIFACT_TOK, &info.artifact_id);
        doc.set(FLD_VERSION_KW, &info.version);
        doc.set(FLD_VERSION_TOK, &info.version);
        doc.set(FLD_PACKAGING, &info.packaging);
        doc.set(FLD_SIZE, info.size.to_string());
        doc.set(FLD_LAST_MODIFIED, info.last_modified.to_rfc3339());
        if let Some(sha1) = &info.sha1 {
            doc.set(FLD_SHA1, sha1);
        }
        if let Some(md5) = &info.md5 {
            doc.set(FLD_MD5, md5);
        }
        if let Some(name) = &info.name {
            doc.set(FLD_NAME, name);
        }
        if let Some(description) = &info.description {
            doc.set(FLD_DESCRIPTION, description);
        }
    }

    fn update_artifact_info(&self, doc: &Document, info: &mut ArtifactInfo) -> bool {
        let Some(uinfo) = doc.get(FLD_UINFO) else {
            return false;
        };
        if let Some((g, a, v, c, e)) = crate::coordinate::split_uinfo(uinfo) {
            info.group_id = g;
            info.artifact_id = a;
            info.version = v;
            info.classifier = c;
            info.extension = e;
        }
        if let Some(p) = doc.get(FLD_PACKAGING) {
            info.packaging = p.to_string();
        }
        if let Some(size) = doc.get(FLD_SIZE).and_then(|s| s.parse().ok()) {
            info.size = size;
        }
        if let Some(lm) = doc.get(FLD_LAST_MODIFIED) {
            if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(lm) {
                info.last_modified = parsed.with_timezone(&chrono::Utc);
            }
        }
        info.sha1 = doc.get(FLD_SHA1).map(str::to_string);
        info.md5 = doc.get(FLD_MD5).map(str::to_string);
        info.name = doc.get(FLD_NAME).map(str::to_string);
        info.description = doc.get(FLD_DESCRIPTION).map(str::to_string);
        true
    }
}
