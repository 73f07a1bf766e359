use arcana_core::{HistoryStore, KeyValueStore, StoreError};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// One JSON file per key inside a directory. Each write goes to a fresh temp
/// file in the same directory, is synced, then renamed over the key's file.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(body) => Ok(Some(body)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Backend(format!("read {}: {err}", path.display()))),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)
            .map_err(|err| StoreError::Backend(format!("create {}: {err}", self.dir.display())))?;
        let path = self.path_for(key);
        let mut tmp = NamedTempFile::new_in(&self.dir)
            .map_err(|err| StoreError::Backend(format!("temp file in {}: {err}", self.dir.display())))?;
        tmp.write_all(value.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|err| StoreError::Backend(format!("write {}: {err}", tmp.path().display())))?;
        tmp.persist(&path)
            .map_err(|err| StoreError::Backend(format!("replace {}: {}", path.display(), err.error)))?;
        tracing::debug!(path = %path.display(), bytes = value.len(), "store written");
        Ok(())
    }
}

pub fn open_history(dir: impl Into<PathBuf>) -> HistoryStore<FileStore> {
    HistoryStore::open(FileStore::new(dir))
}
