use linklet::{DurableStore, MappingRecord, ShortCode, StoreError};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

/// A [`DurableStore`] over an append-only JSON-lines file.
///
/// One record per line. Writers within the process are serialized; `put`
/// checks for an existing code, appends, and syncs the file before returning.
/// Concurrent writers in *different* processes are not coordinated.
///
/// A missing file reads as an empty store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<MappingRecord>, StoreError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(&e)),
        };

        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str(line).map_err(|e| {
                    StoreError::unavailable(format!("{}:{}: {e}", self.path.display(), i + 1))
                })
            })
            .collect()
    }

    fn io_error(&self, e: &std::io::Error) -> StoreError {
        StoreError::unavailable(format!("{}: {e}", self.path.display()))
    }
}

impl DurableStore for FileStore {
    async fn put(&self, record: &MappingRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        if self.load().await?.iter().any(|r| r.code == record.code) {
            return Err(StoreError::Conflict {
                code: record.code.clone(),
            });
        }

        let mut line = serde_json::to_string(record)
            .map_err(|e| StoreError::unavailable(format!("encode record: {e}")))?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(&e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| self.io_error(&e))?;
        file.sync_data().await.map_err(|e| self.io_error(&e))?;

        tracing::debug!(code = %record.code, path = %self.path.display(), "appended record");
        Ok(())
    }

    async fn get(&self, code: &ShortCode) -> Result<Option<MappingRecord>, StoreError> {
        Ok(self.load().await?.into_iter().find(|r| &r.code == code))
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<MappingRecord>, StoreError> {
        let mut owned: Vec<_> = self
            .load()
            .await?
            .into_iter()
            .filter(|r| r.owner.as_deref() == Some(owner))
            .collect();
        owned.sort_by(MappingRecord::newest_first);
        Ok(owned)
    }
}
