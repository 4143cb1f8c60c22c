use super::{TargetStore, TargetTable};
use crate::error::StoreError;
use crate::models::Target;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// In-memory store that counts notification-state writes and can be told
/// to fail reads or writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: Mutex<TargetTable>,
    pub state_writes: AtomicUsize,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn with_targets(targets: Vec<Target>) -> Self {
        Self {
            table: Mutex::new(TargetTable { targets }),
            ..Self::default()
        }
    }

    pub async fn get(&self, id: u64) -> Option<Target> {
        self.table
            .lock()
            .await
            .targets
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    pub fn writes(&self) -> usize {
        self.state_writes.load(Ordering::SeqCst)
    }

    fn io_failure() -> StoreError {
        StoreError::Io {
            path: "memory".into(),
            source: std::io::Error::other("injected failure"),
        }
    }
}

impl TargetStore for MemoryStore {
    async fn list_targets(&self) -> Result<Vec<Target>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::io_failure());
        }
        Ok(self.table.lock().await.sorted())
    }

    async fn update_notification_state(
        &self,
        id: u64,
        article: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::io_failure());
        }
        self.table.lock().await.record(id, article, at)?;
        self.state_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn add_target(&self, url: &str, keyword: &str) -> Result<Target, StoreError> {
        self.table.lock().await.add(url, keyword)
    }

    async fn edit_target(&self, id: u64, url: &str, keyword: &str) -> Result<Target, StoreError> {
        self.table.lock().await.edit(id, url, keyword)
    }

    async fn remove_target(&self, id: u64) -> Result<(), StoreError> {
        self.table.lock().await.remove(id)
    }
}
