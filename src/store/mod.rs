//! Durable record of tracked targets.
//!
//! The scan pipeline only calls [`TargetStore::list_targets`] and
//! [`TargetStore::update_notification_state`]; the remaining operations back
//! the management commands. Every write touches exactly one target.
//!
//! - [`json::JsonFileStore`]: the on-disk store used by the binary
//! - `memory::MemoryStore`: an in-memory store for tests

pub mod json;
#[cfg(test)]
pub mod memory;

use crate::error::StoreError;
use crate::models::Target;
use crate::normalize::normalize;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub trait TargetStore {
    /// All tracked targets, in id order.
    async fn list_targets(&self) -> Result<Vec<Target>, StoreError>;

    /// Record that `article` was alerted for target `id` at `at`.
    ///
    /// Returns [`StoreError::NotFound`] if the target was deleted meanwhile.
    async fn update_notification_state(
        &self,
        id: u64,
        article: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    async fn add_target(&self, url: &str, keyword: &str) -> Result<Target, StoreError>;

    /// Replace url and keyword; the target's notification state is reset.
    async fn edit_target(&self, id: u64, url: &str, keyword: &str) -> Result<Target, StoreError>;

    async fn remove_target(&self, id: u64) -> Result<(), StoreError>;
}

/// The set of targets and the mutations every store shares.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetTable {
    pub targets: Vec<Target>,
}

impl TargetTable {
    fn next_id(&self) -> u64 {
        self.targets.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut Target, StoreError> {
        self.targets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    pub fn sorted(&self) -> Vec<Target> {
        let mut targets = self.targets.clone();
        targets.sort_by_key(|t| t.id);
        targets
    }

    pub fn add(&mut self, url: &str, keyword: &str) -> Result<Target, StoreError> {
        let (url, keyword) = validate(url, keyword)?;
        let target = Target::new(self.next_id(), url, keyword);
        self.targets.push(target.clone());
        Ok(target)
    }

    pub fn edit(&mut self, id: u64, url: &str, keyword: &str) -> Result<Target, StoreError> {
        let (url, keyword) = validate(url, keyword)?;
        let target = self.get_mut(id)?;
        target.url = url;
        target.keyword = keyword;
        target.last_notified_article = None;
        target.last_notified_at = None;
        Ok(target.clone())
    }

    pub fn remove(&mut self, id: u64) -> Result<(), StoreError> {
        let before = self.targets.len();
        self.targets.retain(|t| t.id != id);
        if self.targets.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    pub fn record(&mut self, id: u64, article: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        let target = self.get_mut(id)?;
        target.last_notified_article = Some(normalize(article));
        target.last_notified_at = Some(at);
        Ok(())
    }
}

/// Check and clean a url/keyword pair before it is stored.
fn validate(url: &str, keyword: &str) -> Result<(String, String), StoreError> {
    let url = url.trim();
    let keyword = keyword.trim();
    if url.is_empty() {
        return Err(StoreError::Invalid("url must not be empty".into()));
    }
    if keyword.is_empty() {
        return Err(StoreError::Invalid("keyword must not be empty".into()));
    }
    let parsed = url::Url::parse(url)
        .map_err(|e| StoreError::Invalid(format!("`{url}` is not a valid URL: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(StoreError::Invalid(format!(
            "`{url}` must be an http or https URL"
        )));
    }
    Ok((url.to_string(), keyword.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_assigns_increasing_ids() {
        let mut table = TargetTable::default();
        let a = table.add("https://a.example", "rust").unwrap();
        let b = table.add("https://b.example", "tokio").unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);

        table.remove(2).unwrap();
        let c = table.add("https://c.example", "serde").unwrap();
        assert_eq!(c.id, 2);
    }

    #[test]
    fn test_add_rejects_invalid_input() {
        let mut table = TargetTable::default();
        assert!(matches!(
            table.add("", "rust"),
            Err(StoreError::Invalid(_))
        ));
        assert!(matches!(
            table.add("https://a.example", "  "),
            Err(StoreError::Invalid(_))
        ));
        assert!(matches!(
            table.add("ftp://a.example", "rust"),
            Err(StoreError::Invalid(_))
        ));
        assert!(matches!(
            table.add("a.example", "rust"),
            Err(StoreError::Invalid(_))
        ));
        assert!(table.targets.is_empty());
    }

    #[test]
    fn test_edit_resets_notification_state() {
        let mut table = TargetTable::default();
        let t = table.add("https://a.example", "rust").unwrap();
        table.record(t.id, "https://a.example/1", Utc::now()).unwrap();

        let edited = table.edit(t.id, "https://a.example", "tokio").unwrap();
        assert_eq!(edited.keyword, "tokio");
        assert_eq!(edited.last_notified_article, None);
        assert_eq!(edited.last_notified_at, None);
    }

    #[test]
    fn test_record_stores_normalized_article() {
        let mut table = TargetTable::default();
        let t = table.add("https://a.example", "rust").unwrap();
        table.record(t.id, "HTTPS://A.example/posts/1/", Utc::now()).unwrap();
        assert_eq!(
            table.targets[0].last_notified_article.as_deref(),
            Some("https://a.example/posts/1")
        );
    }

    #[test]
    fn test_missing_target_is_not_found() {
        let mut table = TargetTable::default();
        assert!(matches!(
            table.record(9, "https://a.example", Utc::now()),
            Err(StoreError::NotFound(9))
        ));
        assert!(matches!(table.remove(9), Err(StoreError::NotFound(9))));
        assert!(matches!(
            table.edit(9, "https://a.example", "x"),
            Err(StoreError::NotFound(9))
        ));
    }
}
