//! File-backed storage backend
//!
//! Layout: one `<key>.json` file per record inside a data directory.
//!
//! A batch is committed in three phases:
//! 1. every value is written to a hidden `.tmp` file next to its target;
//! 2. every existing target the batch touches is copied to a hidden `.bak`;
//! 3. staged files are renamed into place and deletions applied.
//!
//! A failure in phase 1 or 2 leaves the previous files untouched. A failure
//! in phase 3 restores the targets already replaced from their backups and
//! removes the ones that did not exist before.

use crate::error::StoreError;
use crate::storage::{validate_key, Batch, Storage, Write};
use parking_lot::Mutex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "json";

/// Store persisting each key as a JSON file in a directory
#[derive(Debug)]
pub struct FileStorage {
    root: PathBuf,
    commit_lock: Mutex<()>,
}

impl FileStorage {
    /// Open (and create if needed) a data directory
    ///
    /// # Errors
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StoreError::io_error(&root, e))?;
        tracing::debug!(path = %root.display(), "opened file storage");
        Ok(Self {
            root,
            commit_lock: Mutex::new(()),
        })
    }

    /// Data directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.{EXTENSION}"))
    }

    fn staging_path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!(".{key}.{EXTENSION}.tmp"))
    }

    fn backup_path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!(".{key}.{EXTENSION}.bak"))
    }

    fn discard_staged(staged: &[(PathBuf, String)]) {
        for (tmp, _) in staged {
            let _ = fs::remove_file(tmp);
        }
    }

    fn discard_backups(backups: &[Backup]) {
        for backup in backups {
            if let Some(copy) = &backup.copy {
                let _ = fs::remove_file(copy);
            }
        }
    }

    /// Put applied targets back the way they were before the commit
    fn roll_back(applied: &[&Backup]) {
        for backup in applied.iter().rev() {
            let restored = match &backup.copy {
                Some(copy) => fs::rename(copy, &backup.target),
                None => match fs::remove_file(&backup.target) {
                    Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                    other => other,
                },
            };
            if let Err(e) = restored {
                tracing::error!(path = %backup.target.display(), error = %e, "rollback failed");
            }
        }
    }

    /// Copy `target` aside if it holds a record
    fn back_up(target: PathBuf, copy: PathBuf) -> Result<Backup, StoreError> {
        let exists = match fs::metadata(&target) {
            Ok(meta) => meta.is_file(),
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(StoreError::io_error(target, e)),
        };
        if !exists {
            return Ok(Backup { target, copy: None });
        }
        match fs::copy(&target, &copy) {
            Ok(_) => Ok(Backup {
                target,
                copy: Some(copy),
            }),
            Err(e) => {
                let _ = fs::remove_file(&copy);
                Err(StoreError::io_error(target, e))
            }
        }
    }
}

/// Target touched by a commit and its pre-commit copy, if it existed
#[derive(Debug)]
struct Backup {
    target: PathBuf,
    copy: Option<PathBuf>,
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io_error(path, e)),
        }
    }

    fn commit(&self, batch: Batch) -> Result<(), StoreError> {
        for key in batch.keys() {
            validate_key(key)?;
        }

        let _guard = self.commit_lock.lock();

        let mut staged = Vec::new();
        let mut deletions = Vec::new();
        for (key, write) in batch {
            match write {
                Write::Put(value) => {
                    let tmp = self.staging_path_for(&key);
                    if let Err(e) = fs::write(&tmp, value.as_bytes()) {
                        Self::discard_staged(&staged);
                        let _ = fs::remove_file(&tmp);
                        return Err(StoreError::io_error(tmp, e));
                    }
                    staged.push((tmp, key));
                }
                Write::Delete => deletions.push(key),
            }
        }

        let mut backups = Vec::with_capacity(staged.len() + deletions.len());
        for key in staged.iter().map(|(_, key)| key).chain(&deletions) {
            match Self::back_up(self.path_for(key), self.backup_path_for(key)) {
                Ok(backup) => backups.push(backup),
                Err(e) => {
                    Self::discard_backups(&backups);
                    Self::discard_staged(&staged);
                    return Err(e);
                }
            }
        }

        let (put_backups, delete_backups) = backups.split_at(staged.len());
        let mut applied: Vec<&Backup> = Vec::with_capacity(backups.len());
        let mut failure = None;
        for ((tmp, _), backup) in staged.iter().zip(put_backups) {
            if let Err(e) = fs::rename(tmp, &backup.target) {
                failure = Some(StoreError::io_error(&backup.target, e));
                break;
            }
            applied.push(backup);
        }
        if failure.is_none() {
            for backup in delete_backups {
                match fs::remove_file(&backup.target) {
                    Ok(()) => applied.push(backup),
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => {
                        failure = Some(StoreError::io_error(&backup.target, e));
                        break;
                    }
                }
            }
        }

        if let Some(err) = failure {
            tracing::warn!(error = %err, applied = applied.len(), "commit failed, rolling back");
            Self::roll_back(&applied);
            Self::discard_staged(&staged);
            Self::discard_backups(&backups);
            return Err(err);
        }

        Self::discard_backups(&backups);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.commit_lock.lock();
        let entries = fs::read_dir(&self.root).map_err(|e| StoreError::io_error(&self.root, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io_error(&self.root, e))?;
            let path = entry.path();
            let is_record = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some(EXTENSION | "tmp" | "bak")
            );
            if is_record && path.is_file() {
                fs::remove_file(&path).map_err(|e| StoreError::io_error(&path, e))?;
            }
        }
        tracing::info!(path = %self.root.display(), "cleared file storage");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStorage::open(dir.path()).unwrap();
        assert_eq!(store.get("trd_history_v2").unwrap(), None);
    }

    #[test]
    fn commit_leaves_no_staging_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStorage::open(dir.path()).unwrap();

        let mut batch = Batch::new();
        batch.put("a", "1").put("b", "2");
        store.commit(batch).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.iter().all(|n| !n.ends_with(".tmp")));
    }

    #[test]
    fn overwrite_leaves_no_backups() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStorage::open(dir.path()).unwrap();
        store.set("a", "1".to_string()).unwrap();

        let mut batch = Batch::new();
        batch.put("a", "2").delete("missing");
        store.commit(batch).unwrap();

        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json".to_string()]);
    }
}
