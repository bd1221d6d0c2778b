//! `IndexingContext` — the stateful per-repository handle.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};

use crate::coordinate::{ArtifactInfo, GavCalculator};
use crate::core::error::{Error, Result};
use crate::index::descriptor::{self, SUPPORTED_DESCRIPTOR_VERSION};
use crate::index::group_cache;
use crate::index::writer::Writer;
use crate::schema::{CreatorRegistry, Document};
use crate::storage::{FileLock, IndexDirectory, StoredDocument};

struct ContextState {
    committed: Arc<Vec<StoredDocument>>,
    timestamp: DateTime<Utc>,
}

pub struct IndexingContext {
    id: String,
    repository_id: String,
    repository_path: PathBuf,
    repository_url: Option<String>,
    index_update_url: Option<String>,
    directory: Arc<dyn IndexDirectory>,
    gav_calculator: Arc<dyn GavCalculator>,
    creators: Arc<CreatorRegistry>,
    state: RwLock<ContextState>,
    writer: Writer,
    file_lock: Mutex<Option<FileLock>>,
    closed: AtomicBool,
    searchable: AtomicBool,
    /// Bumped whenever the document baseline is wholesale replaced
    /// (`purge`, `replace`); the packer reads this to decide whether an
    /// incremental chain can still be extended, or must reset.
    generation: AtomicU64,
}

impl IndexingContext {
    #[allow(clippy::too_many_arguments)]
    pub fn open(
        id: impl Into<String>,
        repository_id: impl Into<String>,
        repository_path: impl Into<PathBuf>,
        directory: Arc<dyn IndexDirectory>,
        gav_calculator: Arc<dyn GavCalculator>,
        creators: Arc<CreatorRegistry>,
        reclaim: bool,
    ) -> Result<Self> {
        let repository_id = repository_id.into();
        let error_path = directory
            .root_path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(":memory:"));

        let file_lock = match directory.root_path() {
            Some(root) => Some(FileLock::acquire(root, true)?),
            None => None,
        };

        let mut documents = directory.load()?;
        let needs_descriptor =
            descriptor::validate_on_open(&documents, &error_path, &repository_id, reclaim)?;
        if needs_descriptor {
            documents.retain(|d| !d.is_descriptor());
            documents.push(StoredDocument::Descriptor {
                version: SUPPORTED_DESCRIPTOR_VERSION,
                repository_id: repository_id.clone(),
            });
        }
        let has_groups = documents
            .iter()
            .any(|d| matches!(d, StoredDocument::GroupSet { .. }));
        if !has_groups {
            group_cache::rebuild(&mut documents);
        }

        let timestamp = directory.read_timestamp()?.unwrap_or_else(Utc::now);
        if needs_descriptor || !has_groups {
            directory.save(&documents)?;
            directory.write_timestamp(timestamp)?;
        }

        Ok(IndexingContext {
            id: id.into(),
            repository_id,
            repository_path: repository_path.into(),
            repository_url: None,
            index_update_url: None,
            directory,
            gav_calculator,
            creators,
            state: RwLock::new(ContextState {
                committed: Arc::new(documents),
                timestamp,
            }),
            writer: Writer::new(),
            file_lock: Mutex::new(file_lock),
            closed: AtomicBool::new(false),
            searchable: AtomicBool::new(true),
            generation: AtomicU64::new(0),
        })
    }

    fn guard_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::ContextClosed { id: self.id.clone() });
        }
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn repository_id(&self) -> &str {
        &self.repository_id
    }

    pub fn repository_path(&self) -> &std::path::Path {
        &self.repository_path
    }

    pub fn repository_url(&self) -> Option<&str> {
        self.repository_url.as_deref()
    }

    pub fn set_repository_url(&mut self, url: impl Into<String>) {
        self.repository_url = Some(url.into());
    }

    pub fn index_update_url(&self) -> Option<&str> {
        self.index_update_url.as_deref()
    }

    pub fn set_index_update_url(&mut self, url: impl Into<String>) {
        self.index_update_url = Some(url.into());
    }

    pub fn is_searchable(&self) -> bool {
        self.searchable.load(Ordering::Acquire)
    }

    pub fn set_searchable(&self, searchable: bool) {
        self.searchable.store(searchable, Ordering::Release);
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.state.read().timestamp
    }

    /// `updateTimestamp(null)`: resets the clock without touching any
    /// documents.
    pub fn reset_timestamp(&self) {
        self.state.write().timestamp = DateTime::<Utc>::default();
    }

    pub fn gav_calculator(&self) -> &Arc<dyn GavCalculator> {
        &self.gav_calculator
    }

    pub fn creators(&self) -> &Arc<CreatorRegistry> {
        &self.creators
    }

    /// Shared-lease read: an `Arc` clone of the currently committed
    /// document set. The lock behind it is only held for the instant of
    /// the clone, not for however long the caller keeps the `Arc` — see
    /// `DESIGN.md` for why that still satisfies the reader/searcher
    /// snapshot guarantees.
    pub fn snapshot(&self) -> Result<Arc<Vec<StoredDocument>>> {
        self.guard_open()?;
        Ok(self.state.read().committed.clone())
    }

    pub fn add_artifact(&self, info: &ArtifactInfo) -> Result<()> {
        self.guard_open()?;
        let mut doc = Document::new();
        self.creators.write(info, &mut doc);
        self.writer.add(StoredDocument::Live(doc));
        Ok(())
    }

    pub fn delete_artifact(&self, uinfo: impl Into<String>) -> Result<()> {
        self.guard_open()?;
        self.writer.delete(uinfo);
        Ok(())
    }

    pub fn commit(&self) -> Result<()> {
        self.guard_open()?;
        let (adds, deletes) = self.writer.drain();
        if adds.is_empty() && deletes.is_empty() {
            return Ok(());
        }
        let mut state = self.state.write();
        let mut documents = (*state.committed).clone();
        apply_pending(&mut documents, adds, deletes);
        group_cache::rebuild(&mut documents);
        self.directory.save(&documents)?;
        let now = advance(state.timestamp);
        self.directory.write_timestamp(now)?;
        state.timestamp = now;
        state.committed = Arc::new(documents);
        warm_up(&state.committed);
        Ok(())
    }

    pub fn rollback(&self) -> Result<()> {
        self.guard_open()?;
        self.writer.clear();
        Ok(())
    }

    pub fn optimize(&self) -> Result<()> {
        self.guard_open()?;
        let (adds, deletes) = self.writer.drain();
        let mut state = self.state.write();
        let mut documents = (*state.committed).clone();
        apply_pending(&mut documents, adds, deletes);
        let mut documents = compact(documents);
        group_cache::rebuild(&mut documents);
        self.directory.save(&documents)?;
        let now = advance(state.timestamp);
        self.directory.write_timestamp(now)?;
        state.timestamp = now;
        state.committed = Arc::new(std::mem::take(&mut documents));
        Ok(())
    }

    pub fn purge(&self) -> Result<()> {
        self.guard_open()?;
        self.writer.clear();
        let mut state = self.state.write();
        let mut documents = vec![StoredDocument::Descriptor {
            version: SUPPORTED_DESCRIPTOR_VERSION,
            repository_id: self.repository_id.clone(),
        }];
        group_cache::rebuild(&mut documents);
        self.directory.clear()?;
        self.directory.save(&documents)?;
        let now = Utc::now();
        self.directory.write_timestamp(now)?;
        state.committed = Arc::new(documents);
        state.timestamp = now;
        self.generation.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    /// Merge semantics: add non-duplicate, non-filtered live
    /// documents from `source`; tombstones delete the matching `UINFO`
    /// and are themselves persisted; groups are rebuilt and the index is
    /// compacted afterward (mirroring `optimize`).
    pub fn merge(
        &self,
        source: &dyn IndexDirectory,
        filter: Option<&dyn Fn(&ArtifactInfo) -> bool>,
    ) -> Result<()> {
        self.guard_open()?;
        let source_docs = source.load()?;
        let mut state = self.state.write();
        let mut documents = (*state.committed).clone();
        let mut existing: HashSet<String> = documents
            .iter()
            .filter_map(|d| d.uinfo().map(str::to_string))
            .collect();

        for doc in source_docs {
            match doc {
                StoredDocument::Live(fields) => {
                    let Some(uinfo) = fields.get("u").map(str::to_string) else {
                        continue;
                    };
                    if existing.contains(&uinfo) {
                        continue;
                    }
                    let mut info = ArtifactInfo::default();
                    self.creators.read(&fields, &mut info);
                    if let Some(filter) = filter {
                        if !filter(&info) {
                            continue;
                        }
                    }
                    let mut normalised = Document::new();
                    self.creators.write(&info, &mut normalised);
                    existing.insert(uinfo);
                    documents.push(StoredDocument::Live(normalised));
                }
                StoredDocument::Tombstone { uinfo } => {
                    documents.retain(|d| d.uinfo() != Some(uinfo.as_str()));
                    existing.remove(&uinfo);
                    documents.push(StoredDocument::Tombstone { uinfo });
                }
                StoredDocument::Descriptor { .. } | StoredDocument::GroupSet { .. } => {}
            }
        }

        let mut documents = compact(documents);
        group_cache::rebuild(&mut documents);
        self.directory.save(&documents)?;

        let source_timestamp = source.read_timestamp()?;
        let merged_timestamp = match source_timestamp {
            Some(ts) if ts > state.timestamp => ts,
            _ => state.timestamp,
        };
        self.directory.write_timestamp(merged_timestamp)?;
        state.timestamp = merged_timestamp;
        state.committed = Arc::new(std::mem::take(&mut documents));
        Ok(())
    }

    /// Replace: wholesale adoption of an external directory's
    /// contents, reclaiming the descriptor and the source timestamp.
    pub fn replace(&self, source: &dyn IndexDirectory) -> Result<()> {
        self.guard_open()?;
        self.writer.clear();
        let mut state = self.state.write();
        let mut documents = source.load()?;
        documents.retain(|d| !d.is_descriptor());
        documents.push(StoredDocument::Descriptor {
            version: SUPPORTED_DESCRIPTOR_VERSION,
            repository_id: self.repository_id.clone(),
        });
        let has_groups = documents
            .iter()
            .any(|d| matches!(d, StoredDocument::GroupSet { .. }));
        if !has_groups {
            group_cache::rebuild(&mut documents);
        }

        self.directory.clear()?;
        self.directory.save(&documents)?;
        let adopted_timestamp = source.read_timestamp()?.unwrap_or_else(Utc::now);
        self.directory.write_timestamp(adopted_timestamp)?;
        state.committed = Arc::new(documents);
        state.timestamp = adopted_timestamp;
        self.generation.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    pub fn close(&self, delete_files: bool) -> Result<()> {
        self.guard_open()?;
        let timestamp = self.state.read().timestamp;
        self.directory.write_timestamp(timestamp)?;
        if delete_files {
            self.directory.clear()?;
        }
        self.closed.store(true, Ordering::Release);
        *self.file_lock.lock() = None;
        Ok(())
    }

    pub fn all_groups(&self) -> Result<Vec<String>> {
        self.guard_open()?;
        let documents = self.state.read().committed.clone();
        Ok(group_cache::read(&documents, crate::storage::GroupKind::All))
    }

    pub fn root_groups(&self) -> Result<Vec<String>> {
        self.guard_open()?;
        let documents = self.state.read().committed.clone();
        Ok(group_cache::read(&documents, crate::storage::GroupKind::Root))
    }

    pub fn rebuild_groups(&self) -> Result<()> {
        self.guard_open()?;
        let mut state = self.state.write();
        let mut documents = (*state.committed).clone();
        group_cache::rebuild(&mut documents);
        self.directory.save(&documents)?;
        state.committed = Arc::new(documents);
        Ok(())
    }
}

fn advance(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + chrono::Duration::milliseconds(1)
    }
}

fn apply_pending(documents: &mut Vec<StoredDocument>, adds: Vec<StoredDocument>, deletes: Vec<String>) {
    for uinfo in &deletes {
        documents.retain(|d| d.uinfo() != Some(uinfo.as_str()));
        documents.push(StoredDocument::Tombstone {
            uinfo: uinfo.clone(),
        });
    }
    documents.extend(adds);
}

/// Drops live documents shadowed by a tombstone, dedups tombstones for
/// the same `UINFO`, and keeps a single descriptor. Strips any
/// `GroupSet` documents; callers rebuild groups afterward.
fn compact(documents: Vec<StoredDocument>) -> Vec<StoredDocument> {
    let tombstoned: HashSet<String> = documents
        .iter()
        .filter_map(|d| d.tombstone_uinfo().map(str::to_string))
        .collect();
    let mut seen_tombstones = HashSet::new();
    let mut seen_descriptor = false;
    let mut documents = documents;
    documents.retain(|d| match d {
        StoredDocument::Live(fields) => match fields.get("u") {
            Some(uinfo) => !tombstoned.contains(uinfo),
            None => true,
        },
        StoredDocument::Tombstone { uinfo } => seen_tombstones.insert(uinfo.clone()),
        StoredDocument::Descriptor { .. } => {
            let first = !seen_descriptor;
            seen_descriptor = true;
            first
        }
        StoredDocument::GroupSet { .. } => false,
    });
    documents
}

fn warm_up(documents: &Arc<Vec<StoredDocument>>) {
    for doc in documents.iter() {
        let _ = doc.uinfo();
    }
}
