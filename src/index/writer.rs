//! The per-context writer singleton: exactly one writer per context,
//! serialising append/delete/commit.
//!
//! Callers obtain writer access under a shared context lease; safety
//! comes from the writer's own mutex, not from exclusivity at the
//! context level.

use parking_lot::Mutex;

use crate::storage::StoredDocument;

#[derive(Default)]
struct Buffer {
    adds: Vec<StoredDocument>,
    deletes: Vec<String>,
}

#[derive(Default)]
pub struct Writer {
    buffer: Mutex<Buffer>,
}

impl Writer {
    pub fn new() -> Self {
        Writer::default()
    }

    pub fn add(&self, document: StoredDocument) {
        self.buffer.lock().adds.push(document);
    }

    pub fn delete(&self, uinfo: impl Into<String>) {
        self.buffer.lock().deletes.push(uinfo.into());
    }

    pub fn is_empty(&self) -> bool {
        let buf = self.buffer.lock();
        buf.adds.is_empty() && buf.deletes.is_empty()
    }

    /// Drains the buffered adds and deletes for `commit` to apply.
    /// Leaves the writer empty.
    pub fn drain(&self) -> (Vec<StoredDocument>, Vec<String>) {
        let mut buf = self.buffer.lock();
        (std::mem::take(&mut buf.adds), std::mem::take(&mut buf.deletes))
    }

    /// Discards buffered work without applying it (`rollback`).
    pub fn clear(&self) {
        let mut buf = self.buffer.lock();
        buf.adds.clear();
        buf.deletes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_buffer_and_returns_contents() {
        let writer = Writer::new();
        writer.add(StoredDocument::Tombstone { uinfo: "x".into() });
        writer.delete("y");
        assert!(!writer.is_empty());

        let (adds, deletes) = writer.drain();
        assert_eq!(adds.len(), 1);
        assert_eq!(deletes, vec!["y".to_string()]);
        assert!(writer.is_empty());
    }

    #[test]
    fn clear_discards_buffered_work() {
        let writer = Writer::new();
        writer.add(StoredDocument::Tombstone { uinfo: "x".into() });
        writer.clear();
        assert!(writer.is_empty());
    }
}
