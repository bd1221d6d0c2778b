//! `<INDEX_FILE>.properties` — the textual publication state (spec
//! §4.G, §6). Plain `key=value` lines, write-then-rename, matching the
//! teacher's `Checkpoint::save` atomicity but in the text format the
//! external interface mandates rather than `bincode`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::core::error::{Error, Result};

pub const KEY_ID: &str = "nexus.index.id";
pub const KEY_TIMESTAMP: &str = "nexus.index.timestamp";
pub const KEY_CHAIN_ID: &str = "nexus.index.chain-id";
pub const KEY_LAST_INCREMENTAL: &str = "nexus.index.last-incremental";
const KEY_INCREMENTAL_PREFIX: &str = "nexus.index.incremental-";

#[derive(Debug, Clone, PartialEq)]
pub struct PublicationState {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub chain_id: String,
    pub last_incremental: u64,
    /// `incrementals[0]` is `incremental-0`, the most recently emitted
    /// chunk counter; oldest retained counter last.
    pub incrementals: Vec<u64>,
}

pub fn load(path: &Path) -> Result<Option<PublicationState>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)?;
    let mut map = std::collections::BTreeMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            map.insert(k.trim().to_string(), v.trim().to_string());
        }
    }

    let corrupt = |reason: &str| Error::CorruptIndex {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let id = map.get(KEY_ID).cloned().unwrap_or_default();
    let timestamp = map
        .get(KEY_TIMESTAMP)
        .ok_or_else(|| corrupt("missing nexus.index.timestamp"))?;
    let timestamp = DateTime::parse_from_rfc3339(timestamp)
        .map_err(|_| corrupt("unparsable nexus.index.timestamp"))?
        .with_timezone(&Utc);
    let chain_id = map
        .get(KEY_CHAIN_ID)
        .cloned()
        .ok_or_else(|| corrupt("missing nexus.index.chain-id"))?;
    let last_incremental: u64 = map
        .get(KEY_LAST_INCREMENTAL)
        .ok_or_else(|| corrupt("missing nexus.index.last-incremental"))?
        .parse()
        .map_err(|_| corrupt("unparsable nexus.index.last-incremental"))?;

    let mut incrementals = Vec::new();
    let mut n = 0usize;
    while let Some(value) = map.get(&format!("{KEY_INCREMENTAL_PREFIX}{n}")) {
        incrementals.push(
            value
                .parse()
                .map_err(|_| corrupt("unparsable nexus.index.incremental-n"))?,
        );
        n += 1;
    }

    Ok(Some(PublicationState {
        id,
        timestamp,
        chain_id,
        last_incremental,
        incrementals,
    }))
}

pub fn save(path: &Path, state: &PublicationState) -> Result<()> {
    let mut text = String::new();
    text.push_str(&format!("{KEY_ID}={}\n", state.id));
    text.push_str(&format!("{KEY_TIMESTAMP}={}\n", state.timestamp.to_rfc3339()));
    text.push_str(&format!("{KEY_CHAIN_ID}={}\n", state.chain_id));
    text.push_str(&format!("{KEY_LAST_INCREMENTAL}={}\n", state.last_incremental));
    for (n, counter) in state.incrementals.iter().enumerate() {
        text.push_str(&format!("{KEY_INCREMENTAL_PREFIX}{n}={counter}\n"));
    }

    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    fs::write(&tmp, text)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.properties");
        let state = PublicationState {
            id: "central".into(),
            timestamp: Utc::now(),
            chain_id: "abc-123".into(),
            last_incremental: 2,
            incrementals: vec![2, 1],
        };
        save(&path, &state).unwrap();
        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded.chain_id, "abc-123");
        assert_eq!(loaded.last_incremental, 2);
        assert_eq!(loaded.incrementals, vec![2, 1]);
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("absent.properties")).unwrap().is_none());
    }
}
