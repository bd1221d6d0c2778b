//! Internal sidecar recording the packer's last-pack baseline: the live
//! `UINFO` set diffed against to compute the next incremental delta, and
//! the context generation it was captured at.
//!
//! Not part of the external publication interface (that's only the
//! `.gz`/`.zip`/`.properties`/checksum siblings) — this is how
//! `IndexPacker` computes deltas by persisted baseline rather than by
//! docId, recorded in `DESIGN.md`. A generation mismatch against
//! `IndexingContext::generation()` is how the packer notices a
//! `purge`/`replace` happened since the last pack and the baseline is no
//! longer meaningful.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Baseline {
    pub generation: u64,
    pub uinfo: Vec<String>,
}

impl Baseline {
    pub fn uinfo_set(&self) -> HashSet<String> {
        self.uinfo.iter().cloned().collect()
    }
}

pub fn load(path: &Path) -> Result<Option<Baseline>> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(path)?;
    Ok(Some(bincode::deserialize(&bytes)?))
}

pub fn save(path: &Path, baseline: &Baseline) -> Result<()> {
    let bytes = bincode::serialize(baseline)?;
    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.baseline");
        let baseline = Baseline {
            generation: 3,
            uinfo: vec!["a".into(), "b".into()],
        };
        save(&path, &baseline).unwrap();
        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded.generation, 3);
        assert_eq!(loaded.uinfo_set(), baseline.uinfo_set());
    }
}
