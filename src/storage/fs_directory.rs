//! On-disk `IndexDirectory`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::core::error::Result;
use crate::storage::directory::{IndexDirectory, StoredDocument};

const DOCUMENTS_FILE: &str = "documents.bin";
const TIMESTAMP_FILE: &str = "timestamp";

pub struct FsDirectory {
    root: PathBuf,
}

impl FsDirectory {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(FsDirectory { root })
    }

    fn documents_path(&self) -> PathBuf {
        self.root.join(DOCUMENTS_FILE)
    }

    fn timestamp_path(&self) -> PathBuf {
        self.root.join(TIMESTAMP_FILE)
    }
}

impl IndexDirectory for FsDirectory {
    fn load(&self) -> Result<Vec<StoredDocument>> {
        let path = self.documents_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let bytes = fs::read(&path)?;
        let docs = bincode::deserialize(&bytes).map_err(|e| {
            crate::core::error::Error::CorruptIndex {
                path: path.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(docs)
    }

    fn save(&self, documents: &[StoredDocument]) -> Result<()> {
        let bytes = bincode::serialize(documents)?;
        let final_path = self.documents_path();
        let tmp_path = self.root.join(format!("{DOCUMENTS_FILE}.tmp"));
        fs::write(&tmp_path, &bytes)?;
        fs::rename(&tmp_path, &final_path)?;
        Ok(())
    }

    fn exists(&self) -> bool {
        self.documents_path().exists()
    }

    fn clear(&self) -> Result<()> {
        let path = self.documents_path();
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn write_timestamp(&self, timestamp: DateTime<Utc>) -> Result<()> {
        let formatted = timestamp.format("%Y%m%d%H%M%S%.3f Z").to_string();
        fs::write(self.timestamp_path(), formatted)?;
        Ok(())
    }

    fn read_timestamp(&self) -> Result<Option<DateTime<Utc>>> {
        let path = self.timestamp_path();
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)?;
        let parsed = DateTime::parse_from_str(text.trim(), "%Y%m%d%H%M%S%.3f %Z")
            .map(|dt| dt.with_timezone(&Utc))
            .ok();
        Ok(parsed)
    }

    fn root_path(&self) -> Option<&Path> {
        Some(&self.root)
    }
}
