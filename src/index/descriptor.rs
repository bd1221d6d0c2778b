//! Index descriptor document handling. Some index producers read but
//! never enforce `IDXINFO`'s version byte; this implementation rejects
//! a version it does not understand instead.

use std::path::Path;

use crate::core::error::{Error, Result};
use crate::storage::StoredDocument;

/// The only descriptor version this implementation writes or accepts.
pub const SUPPORTED_DESCRIPTOR_VERSION: u32 = 1;

pub fn encode_idxinfo(version: u32, repository_id: &str) -> String {
    format!("{version}|{repository_id}")
}

pub fn decode_idxinfo(idxinfo: &str) -> Option<(u32, &str)> {
    let (version, repository_id) = idxinfo.split_once('|')?;
    Some((version.parse().ok()?, repository_id))
}

pub fn find_descriptor(documents: &[StoredDocument]) -> Option<(u32, &str)> {
    documents.iter().find_map(|doc| match doc {
        StoredDocument::Descriptor {
            version,
            repository_id,
        } => Some((*version, repository_id.as_str())),
        _ => None,
    })
}

/// Validates the descriptor found (if any) in a freshly loaded document
/// set against the context being opened.
///
/// Returns `Ok(true)` when a descriptor should be (re)written — either
/// none was found, or `reclaim` allows overwriting a mismatched one.
pub fn validate_on_open(
    documents: &[StoredDocument],
    path: &std::path::Path,
    repository_id: &str,
    reclaim: bool,
) -> Result<bool> {
    match find_descriptor(documents) {
        None => {
            if documents.is_empty() || reclaim {
                Ok(true)
            } else {
                Err(Error::UnsupportedExistingIndex {
                    path: path.to_path_buf(),
                    reason: "non-empty index directory has no descriptor document".to_string(),
                })
            }
        }
        Some((version, found_repo)) => {
            if version > SUPPORTED_DESCRIPTOR_VERSION {
                if reclaim {
                    return Ok(true);
                }
                return Err(Error::UnsupportedDescriptorVersion {
                    path: path.to_path_buf(),
                    found: version,
                    supported: SUPPORTED_DESCRIPTOR_VERSION,
                });
            }
            if found_repo != repository_id {
                if reclaim {
                    return Ok(true);
                }
                return Err(Error::UnsupportedExistingIndex {
                    path: path.to_path_buf(),
                    reason: format!(
                        "descriptor repositoryId '{found_repo}' does not match '{repository_id}'"
                    ),
                });
            }
            Ok(false)
        }
    }
}
