pub mod directory;
pub mod file_lock;
pub mod fs_directory;
pub mod ram_directory;

pub use directory::{GroupKind, IndexDirectory, StoredDocument};
pub use file_lock::FileLock;
pub use fs_directory::FsDirectory;
pub use ram_directory::RamDirectory;
