//! File-based document store for persistent storage.
//!
//! Directory layout:
//!
//! ```text
//! <dir>/
//! ├─ LOCK          # Advisory lock for the single local writer
//! ├─ <key>         # One file per document
//! └─ <key>.tmp     # Transient, only present during a write
//! ```

use crate::backend::{validate_key, DocumentStore};
use crate::error::{StorageError, StorageResult};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const LOCK_FILE: &str = "LOCK";
const TEMP_SUFFIX: &str = ".tmp";

/// A directory-backed document store.
///
/// Every write goes through a temporary file which is synced and then
/// renamed over the target, so a crash or a full disk never leaves a
/// truncated document behind.
///
/// # Thread Safety
///
/// The store holds an exclusive advisory lock on its directory. Only one
/// `FileStore` can be open per directory at a time, across processes.
///
/// # Example
///
/// ```no_run
/// use academy_storage::{DocumentStore, FileStore};
/// use std::path::Path;
///
/// let mut store = FileStore::open(Path::new("academy-data")).unwrap();
/// store.write("state", b"{}").unwrap();
/// ```
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    _lock_file: File,
}

impl FileStore {
    /// Opens or creates a document store in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory cannot be created
    /// - Another process holds the lock (returns `Locked`)
    /// - I/O errors occur
    pub fn open(dir: &Path) -> StorageResult<Self> {
        fs::create_dir_all(dir)?;

        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))?;

        if lock_file.try_lock_exclusive().is_err() {
            return Err(StorageError::Locked);
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            _lock_file: lock_file,
        })
    }

    /// Returns the directory holding the documents.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file path used for `key`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if the key cannot be used as a file name.
    pub fn document_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(key))
    }

    #[cfg(unix)]
    fn sync_directory(&self) -> StorageResult<()> {
        File::open(&self.dir)?.sync_all()?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_directory(&self) -> StorageResult<()> {
        // NTFS journals metadata; directory handles cannot be fsynced.
        Ok(())
    }
}

impl DocumentStore for FileStore {
    fn read(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let path = self.document_path(key)?;
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.document_path(key)?;
        let temp_path = self.dir.join(format!("{key}{TEMP_SUFFIX}"));

        let written = (|| -> StorageResult<()> {
            let mut file = File::create(&temp_path)?;
            file.write_all(data)?;
            file.sync_all()?;
            Ok(())
        })();
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        fs::rename(&temp_path, &path)?;
        self.sync_directory()
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let path = self.document_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => self.sync_directory(),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_missing_document_reads_none() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.read("state").unwrap().is_none());
        assert!(!store.contains("state").unwrap());
    }

    #[test]
    fn file_write_and_read() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();

        store.write("state", b"first").unwrap();
        store.write("state", b"second").unwrap();

        assert_eq!(store.read("state").unwrap().unwrap(), b"second");
        assert!(!dir.path().join("state.tmp").exists());
    }

    #[test]
    fn file_persistence() {
        let dir = tempdir().unwrap();

        {
            let mut store = FileStore::open(dir.path()).unwrap();
            store.write("state", b"persistent data").unwrap();
        }

        {
            let store = FileStore::open(dir.path()).unwrap();
            assert_eq!(store.read("state").unwrap().unwrap(), b"persistent data");
        }
    }

    #[test]
    fn file_stale_temp_does_not_shadow_document() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.write("state", b"committed").unwrap();

        // Simulates a crash between temp write and rename.
        fs::write(dir.path().join("state.tmp"), b"half-writ").unwrap();

        assert_eq!(store.read("state").unwrap().unwrap(), b"committed");
        store.write("state", b"next").unwrap();
        assert_eq!(store.read("state").unwrap().unwrap(), b"next");
    }

    #[test]
    fn file_remove() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.write("state", b"data").unwrap();

        store.remove("state").unwrap();
        assert!(store.read("state").unwrap().is_none());

        // Removing again is fine.
        store.remove("state").unwrap();
    }

    #[test]
    fn file_rejects_invalid_key() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        let result = store.write("../outside", b"x");
        assert!(matches!(result, Err(StorageError::InvalidKey { .. })));
    }

    #[test]
    fn file_creates_nested_dirs() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested").join("data");
        let store = FileStore::open(&nested).unwrap();
        assert_eq!(store.dir(), nested);
        assert!(nested.join(LOCK_FILE).exists());
    }

    #[test]
    fn lock_prevents_second_open() {
        let dir = tempdir().unwrap();
        let _first = FileStore::open(dir.path()).unwrap();
        let second = FileStore::open(dir.path());
        assert!(matches!(second, Err(StorageError::Locked)));
    }

    #[test]
    fn lock_released_on_drop() {
        let dir = tempdir().unwrap();
        {
            let _store = FileStore::open(dir.path()).unwrap();
        }
        assert!(FileStore::open(dir.path()).is_ok());
    }
}
