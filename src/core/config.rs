use std::path::PathBuf;
use std::time::Duration;

/// Engine-wide configuration. Individual `IndexingContext`s may override
/// sizing knobs; this struct carries the defaults a host process would
/// read from its own configuration layer before constructing contexts.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory under which per-repository index directories live.
    pub storage_root: PathBuf,

    /// Maximum number of concurrently open reader snapshots a context
    /// will retain before the oldest is dropped.
    pub max_readers: usize,

    /// Number of documents buffered by a writer before an implicit flush.
    pub writer_batch_size: usize,

    /// Wall-clock interval after which a writer with pending documents
    /// flushes even if `writer_batch_size` has not been reached.
    pub writer_commit_interval: Duration,

    /// Default cap on incremental chunks retained by the packer
    /// (`maxIndexChunks`).
    pub max_index_chunks: usize,

    /// Whether the packer writes `.sha1`/`.md5` sibling files by default.
    pub create_checksum_files: bool,

    /// Override for scratch-file placement; mirrors the `INDEXER_TMPDIR`
    /// environment variable.
    pub tmp_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage_root: PathBuf::from("./data/index"),
            max_readers: 10,
            writer_batch_size: 1000,
            writer_commit_interval: Duration::from_secs(60),
            max_index_chunks: 20,
            create_checksum_files: true,
            tmp_dir: std::env::var_os("INDEXER_TMPDIR").map(PathBuf::from),
        }
    }
}
