//! In-memory `IndexDirectory`, mainly for tests and ephemeral contexts
//! that never need to survive a process restart.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::core::error::Result;
use crate::storage::directory::{IndexDirectory, StoredDocument};

#[derive(Default)]
pub struct RamDirectory {
    documents: Mutex<Vec<StoredDocument>>,
    timestamp: Mutex<Option<DateTime<Utc>>>,
}

impl RamDirectory {
    pub fn new() -> Self {
        RamDirectory::default()
    }
}

impl IndexDirectory for RamDirectory {
    fn load(&self) -> Result<Vec<StoredDocument>> {
        Ok(self.documents.lock().unwrap().clone())
    }

    fn save(&self, documents: &[StoredDocument]) -> Result<()> {
        *self.documents.lock().unwrap() = documents.to_vec();
        Ok(())
    }

    fn exists(&self) -> bool {
        !self.documents.lock().unwrap().is_empty()
    }

    fn clear(&self) -> Result<()> {
        self.documents.lock().unwrap().clear();
        Ok(())
    }

    fn write_timestamp(&self, timestamp: DateTime<Utc>) -> Result<()> {
        *self.timestamp.lock().unwrap() = Some(timestamp);
        Ok(())
    }

    fn read_timestamp(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(*self.timestamp.lock().unwrap())
    }

    fn root_path(&self) -> Option<&Path> {
        None
    }
}
