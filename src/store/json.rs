//! JSON-file target store.
//!
//! The whole table lives in one file:
//!
//! ```json
//! {"targets": [{"id": 1, "url": "https://example.com", "keyword": "launch",
//!               "last_notified_article": null, "last_notified_at": null}]}
//! ```
//!
//! The file is the source of truth. The running watcher and the management
//! commands are separate processes sharing it, so every listing and every
//! mutation re-reads the file first; the in-memory table is only the last
//! state seen.
//!
//! A mutation is applied to the freshly read table, written to a temporary
//! file next to the store and renamed over it. An async mutex serializes
//! the read-modify-write within one process, so concurrent per-target
//! updates within a tick never lose each other's writes.

use super::{TargetStore, TargetTable};
use crate::error::StoreError;
use crate::models::Target;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    table: Mutex<TargetTable>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store; the file
    /// is created on the first write.
    #[instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let table = read_table(&path).await?;
        info!(targets = table.targets.len(), "Opened target store");
        Ok(Self {
            path,
            table: Mutex::new(table),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    async fn persist(&self, table: &TargetTable) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let json = serde_json::to_string_pretty(table).map_err(|source| StoreError::Serde {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.tmp_path();
        fs::write(&tmp, json).await.map_err(io_err)?;
        if let Err(source) = fs::rename(&tmp, &self.path).await {
            if let Err(e) = fs::remove_file(&tmp).await {
                warn!(path = %tmp.display(), error = %e, "Could not remove temporary store file");
            }
            return Err(io_err(source));
        }
        debug!(
            path = %self.path.display(),
            targets = table.targets.len(),
            "Persisted target store"
        );
        Ok(())
    }

    /// Re-read the file, apply `change`, persist, then remember the result.
    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut TargetTable) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.table.lock().await;
        let mut next = read_table(&self.path).await?;
        let out = change(&mut next)?;
        self.persist(&next).await?;
        *guard = next;
        Ok(out)
    }
}

/// Load the table at `path`; a missing or blank file is an empty table.
async fn read_table(path: &Path) -> Result<TargetTable, StoreError> {
    match fs::read_to_string(path).await {
        Ok(raw) if raw.trim().is_empty() => Ok(TargetTable::default()),
        Ok(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Serde {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TargetTable::default()),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl TargetStore for JsonFileStore {
    async fn list_targets(&self) -> Result<Vec<Target>, StoreError> {
        let mut guard = self.table.lock().await;
        *guard = read_table(&self.path).await?;
        Ok(guard.sorted())
    }

    #[instrument(level = "debug", skip(self))]
    async fn update_notification_state(
        &self,
        id: u64,
        article: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.mutate(|table| table.record(id, article, at)).await
    }

    async fn add_target(&self, url: &str, keyword: &str) -> Result<Target, StoreError> {
        self.mutate(|table| table.add(url, keyword)).await
    }

    async fn edit_target(&self, id: u64, url: &str, keyword: &str) -> Result<Target, StoreError> {
        self.mutate(|table| table.edit(id, url, keyword)).await
    }

    async fn remove_target(&self, id: u64) -> Result<(), StoreError> {
        self.mutate(|table| table.remove(id)).await
    }
}
