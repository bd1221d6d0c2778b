//! `JarFileContentsIndexCreator` — enumerates a jar's class entries and
//! writes both a tokenized and a keyword field for them.
//!
//! There is no full zip-decompression dependency in this crate's stack;
//! listing entry names only requires the central directory, which is
//! stored uncompressed regardless of how individual entries are
//! compressed, so a small reader over just that structure is enough.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::coordinate::ArtifactInfo;
use crate::core::error::Result;
use crate::schema::creator::{ArtifactContext, IndexCreator};
use crate::schema::document::Document;
use crate::schema::field::IndexerField;

const FLD_CLASSNAMES_TOK: &str = "classnames";
const FLD_CLASSNAMES_KW: &str = "classnames_kw";

const EOCD_SIGNATURE: [u8; 4] = [0x50, 0x4b, 0x05, 0x06];
const CDFH_SIGNATURE: [u8; 4] = [0x50, 0x4b, 0x01, 0x02];

#[derive(Debug, Default)]
pub struct JarFileContentsIndexCreator;

impl JarFileContentsIndexCreator {
    pub fn new() -> Self {
        JarFileContentsIndexCreator
    }
}

impl IndexCreator for JarFileContentsIndexCreator {
    fn fields(&self) -> Vec<IndexerField> {
        vec![
            IndexerField::tokenized("classnames", FLD_CLASSNAMES_TOK),
            IndexerField::keyword("classnames", FLD_CLASSNAMES_KW),
        ]
    }

    fn populate_artifact_info(&self, ctx: &ArtifactContext, info: &mut ArtifactInfo) -> Result<()> {
        if ctx.gav.extension != "jar" || !ctx.path.exists() {
            return Ok(());
        }
        info.class_names = read_class_entries(&ctx.path).unwrap_or_default();
        Ok(())
    }

    fn update_document(&self, info: &ArtifactInfo, doc: &mut Document) {
        if info.class_names.is_empty() {
            return;
        }
        doc.set_many(FLD_CLASSNAMES_TOK, info.class_names.clone());
        doc.set_many(FLD_CLASSNAMES_KW, info.class_names.clone());
    }

    fn update_artifact_info(&self, doc: &Document, info: &mut ArtifactInfo) -> bool {
        let names = doc.get_all(FLD_CLASSNAMES_TOK);
        if names.is_empty() {
            return false;
        }
        info.class_names = names.to_vec();
        true
    }
}

/// Reads the central directory of a zip/jar file and returns the
/// slash-separated fully-qualified name of every `.class` entry, minus
/// the extension (`com/foo/Bar.class` -> `com/foo/Bar`).
pub(crate) fn read_class_entries(path: &Path) -> std::io::Result<Vec<String>> {
    let mut file = File::open(path)?;
    let len = file.seek(SeekFrom::End(0))?;
    let eocd_offset = find_eocd(&mut file, len)?;

    file.seek(SeekFrom::Start(eocd_offset + 10))?;
    let mut header = [0u8; 8];
    file.read_exact(&mut header)?;
    let entry_count = u16::from_le_bytes([header[0], header[1]]) as usize;
    let cd_offset = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as u64;

    file.seek(SeekFrom::Start(cd_offset))?;
    let mut names = Vec::new();
    for _ in 0..entry_count {
        let mut sig = [0u8; 4];
        if file.read_exact(&mut sig).is_err() || sig != CDFH_SIGNATURE {
            break;
        }
        let mut fixed = [0u8; 42];
        file.read_exact(&mut fixed)?;
        let name_len = u16::from_le_bytes([fixed[24], fixed[25]]) as usize;
        let extra_len = u16::from_le_bytes([fixed[26], fixed[27]]) as usize;
        let comment_len = u16::from_le_bytes([fixed[28], fixed[29]]) as usize;

        let mut name_buf = vec![0u8; name_len];
        file.read_exact(&mut name_buf)?;
        let name = String::from_utf8_lossy(&name_buf).into_owned();
        if let Some(class) = name.strip_suffix(".class") {
            if !class.ends_with("package-info") && !name.contains("META-INF") {
                names.push(class.to_string());
            }
        }
        file.seek(SeekFrom::Current((extra_len + comment_len) as i64))?;
    }
    Ok(names)
}

fn find_eocd(file: &mut File, len: u64) -> std::io::Result<u64> {
    let search_window = 65_557.min(len);
    let start = len - search_window;
    file.seek(SeekFrom::Start(start))?;
    let mut buf = vec![0u8; search_window as usize];
    file.read_exact(&mut buf)?;

    for i in (0..buf.len().saturating_sub(4)).rev() {
        if buf[i..i + 4] == EOCD_SIGNATURE {
            return Ok(start + i as u64);
        }
    }
    Err(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        "not a zip archive: no end-of-central-directory record found",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_document_skips_empty_class_names() {
        let creator = JarFileContentsIndexCreator::new();
        let info = ArtifactInfo {
            group_id: "g".into(),
            artifact_id: "a".into(),
            version: "1".into(),
            classifier: None,
            packaging: "jar".into(),
            extension: "jar".into(),
            repository_id: "r".into(),
            context_id: "r".into(),
            file_name: "a-1.jar".into(),
            size: 0,
            last_modified: chrono::Utc::now(),
            name: None,
            description: None,
            sha1: None,
            md5: None,
            class_names: Vec::new(),
        };
        let mut doc = Document::new();
        creator.update_document(&info, &mut doc);
        assert!(!doc.contains(FLD_CLASSNAMES_TOK));
    }

    #[test]
    fn update_artifact_info_reads_back_class_names() {
        let creator = JarFileContentsIndexCreator::new();
        let mut doc = Document::new();
        doc.set_many(
            FLD_CLASSNAMES_TOK,
            vec!["com/example/Widget".to_string()],
        );
        let mut info = ArtifactInfo {
            group_id: String::new(),
            artifact_id: String::new(),
            version: String::new(),
            classifier: None,
            packaging: String::new(),
            extension: String::new(),
            repository_id: String::new(),
            context_id: String::new(),
            file_name: String::new(),
            size: 0,
            last_modified: chrono::Utc::now(),
            name: None,
            description: None,
            sha1: None,
            md5: None,
            class_names: Vec::new(),
        };
        assert!(creator.update_artifact_info(&doc, &mut info));
        assert_eq!(info.class_names, vec!["com/example/Widget".to_string()]);
    }
}
