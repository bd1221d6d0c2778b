//! Process-level exclusion over an on-disk index directory: the
//! on-disk directory may be opened by only one process at a time.
//!
//! `flock` advisory locks are released by the kernel when the holding
//! process exits or crashes, so detecting and forcibly clearing a stale
//! lock falls out for free: a non-blocking attempt either finds the
//! lock genuinely held by a live process, or finds it free regardless
//! of whatever a dead process last wrote to the file.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::core::error::{Error, Result};

pub struct FileLock {
    _file: File,
    path: PathBuf,
    exclusive: bool,
}

impl FileLock {
    pub fn acquire(dir: &Path, exclusive: bool) -> Result<Self> {
        let path = dir.join(".lock");
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&path)?;

        #[cfg(unix)]
        {
            use std::os::unix::io::AsRawFd;

            let fd = file.as_raw_fd();
            let operation = (if exclusive { libc::LOCK_EX } else { libc::LOCK_SH }) | libc::LOCK_NB;
            let rc = unsafe { libc::flock(fd, operation) };
            if rc != 0 {
                return Err(Error::Io(std::io::Error::last_os_error()));
            }
        }

        Ok(FileLock {
            _file: file,
            path,
            exclusive,
        })
    }

    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            use std::os::unix::io::AsRawFd;
            unsafe {
                libc::flock(self._file.as_raw_fd(), libc::LOCK_UN);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_locks_do_not_exclude_each_other() {
        let dir = tempfile::tempdir().unwrap();
        let a = FileLock::acquire(dir.path(), false).unwrap();
        let b = FileLock::acquire(dir.path(), false).unwrap();
        assert!(!a.is_exclusive());
        assert!(!b.is_exclusive());
    }

    #[test]
    fn exclusive_lock_rejects_concurrent_exclusive() {
        let dir = tempfile::tempdir().unwrap();
        let _a = FileLock::acquire(dir.path(), true).unwrap();
        let b = FileLock::acquire(dir.path(), true);
        assert!(b.is_err());
    }
}
