//! Single-file local store
//!
//! The whole keyspace is kept as one JSON document. Every mutation loads the
//! file, applies the change, and replaces the file through a temp file and a
//! rename, so readers see either the old or the new keyspace.
//!
//! Load/modify/save cycles hold an exclusive lock on `<data file>.lock`, and
//! reads hold a shared one. The lock is an OS file lock, so it also orders
//! other processes and other `FileStore`s on the same path.

use crate::error::{NotesError, Result};
use crate::infrastructure::store::{KeyValueStore, Keyspace};
use fd_lock::RwLock;
use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

const DEFAULT_FILE_NAME: &str = "store.json";

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes load/modify/save cycles within this process
    guard: Mutex<()>,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        FileStore {
            path,
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lock file shared by every store opened on this path
    pub fn lock_path(&self) -> PathBuf {
        self.path.with_file_name(format!("{}.lock", self.file_name()))
    }

    fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(DEFAULT_FILE_NAME)
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    fn open_lock_file(&self) -> Result<RwLock<File>> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path())?;
        Ok(RwLock::new(file))
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.guard
            .lock()
            .map_err(|_| NotesError::StoreUnavailable("file store lock poisoned".to_string()))
    }

    /// Read the keyspace (empty when the file does not exist yet)
    fn load(&self) -> Result<Keyspace> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Keyspace::new()),
            Err(e) => return Err(NotesError::Io(e)),
        };

        if contents.trim().is_empty() {
            return Ok(Keyspace::new());
        }

        serde_json::from_str(&contents).map_err(|e| NotesError::CorruptRecord {
            key: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Write the keyspace using a best-effort atomic replace:
    /// write to a temp file in the same directory, then rename into place.
    ///
    /// On Windows, `rename` does not overwrite existing files, so we remove the destination first.
    fn save(&self, keyspace: &Keyspace) -> Result<()> {
        let tmp_name = format!(
            "{}.kvnotes-tmp-{}",
            self.file_name(),
            Uuid::new_v4().simple()
        );
        let tmp_path = self.path.with_file_name(tmp_name);

        fs::write(&tmp_path, serde_json::to_string_pretty(keyspace)?)?;

        if cfg!(windows) && self.path.exists() {
            fs::remove_file(&self.path)?;
        }

        fs::rename(&tmp_path, &self.path)?;
        debug!(path = %self.path.display(), keys = keyspace.len(), "saved file store");
        Ok(())
    }

    fn modify<T>(&self, f: impl FnOnce(&mut Keyspace) -> Result<T>) -> Result<T> {
        let _guard = self.lock()?;
        self.ensure_parent()?;
        let mut lock = self.open_lock_file()?;
        let _exclusive = lock.write()?;

        let mut keyspace = self.load()?;
        let result = f(&mut keyspace)?;
        self.save(&keyspace)?;
        Ok(result)
    }

    fn read<T>(&self, f: impl FnOnce(&Keyspace) -> Result<T>) -> Result<T> {
        let _guard = self.lock()?;

        // Nothing has ever been written here
        let missing_parent = self
            .path
            .parent()
            .is_some_and(|p| !p.as_os_str().is_empty() && !p.exists());
        if missing_parent {
            return f(&Keyspace::new());
        }

        let lock = self.open_lock_file()?;
        let _shared = lock.read()?;

        let keyspace = self.load()?;
        f(&keyspace)
    }
}

impl KeyValueStore for FileStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.modify(|ks| {
            ks.set(key, value);
            Ok(())
        })
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.read(|ks| ks.get(key))
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.modify(|ks| {
            ks.delete(key);
            Ok(())
        })
    }

    fn add_to_set(&self, key: &str, member: &str) -> Result<()> {
        self.modify(|ks| ks.add_to_set(key, member))
    }

    fn remove_from_set(&self, key: &str, member: &str) -> Result<()> {
        self.modify(|ks| ks.remove_from_set(key, member))
    }

    fn members_of(&self, key: &str) -> Result<BTreeSet<String>> {
        self.read(|ks| ks.members_of(key))
    }

    fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        self.read(|ks| keys.iter().map(|key| ks.get(key)).collect())
    }
}
