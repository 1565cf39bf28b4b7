//! Collaborator interfaces consumed by the friends core.
//!
//! The discovery service and the friend record store live outside this
//! workspace. The core talks to them through the traits below; the
//! in-memory implementations back the CLI shell and the tests.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use qm_core::error::{QmError, QmResult};
use qm_models::{FeedPage, RelationshipRecord};

/// Failure reported by a [`DiscoverySource`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The backing service could not be reached. Retryable.
    #[error("source unavailable: {0}")]
    Unavailable(String),
    /// Definitive signal that the feed has no more data.
    #[error("no more data")]
    Exhausted,
}

/// Paginated supplier of discovery records.
#[async_trait]
pub trait DiscoverySource: Send + Sync {
    /// Fetch up to `limit` records starting at `offset`.
    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<FeedPage, SourceError>;
}

/// Read-only supplier of the user's current friend records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn friend_records(&self) -> Vec<RelationshipRecord>;
}

/// Parse a JSON fixture: either a bare array of records or a saved
/// discovery response body (`{ "data": [...], "metadata": {...} }`).
pub fn parse_records(json: &serde_json::Value) -> QmResult<Vec<RelationshipRecord>> {
    match json {
        serde_json::Value::Array(items) => {
            items.iter().map(RelationshipRecord::from_server_map).collect()
        }
        serde_json::Value::Object(_) => Ok(FeedPage::from_server_map(json, 0)?.records),
        _ => Err(QmError::Serialization("expected an array of records".into())),
    }
}

/// Friend records held in memory for the lifetime of a session.
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    inner: Arc<RwLock<Vec<RelationshipRecord>>>,
}

impl MemoryRecordStore {
    pub fn new(records: Vec<RelationshipRecord>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(records)),
        }
    }

    /// Swap in a fresh collection, e.g. after the shell re-fetched friends.
    pub async fn replace(&self, records: Vec<RelationshipRecord>) {
        *self.inner.write().await = records;
    }

    /// Toggle the client-local roster flag. Returns false if the id is unknown.
    pub async fn set_selected(&self, id: &str, selected: bool) -> bool {
        let mut records = self.inner.write().await;
        match records.iter_mut().find(|r| r.id.as_deref() == Some(id)) {
            Some(record) => {
                record.selected = selected;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn friend_records(&self) -> Vec<RelationshipRecord> {
        self.inner.read().await.clone()
    }
}

/// Discovery source that serves slices of a fixed record list.
///
/// Can be told to fail its next fetch, and counts every fetch it serves.
pub struct FixtureSource {
    records: Vec<RelationshipRecord>,
    fail_next: AtomicBool,
    fetches: AtomicUsize,
}

impl FixtureSource {
    pub fn new(records: Vec<RelationshipRecord>) -> Self {
        Self {
            records,
            fail_next: AtomicBool::new(false),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Load records from a JSON fixture file.
    pub fn from_json_file(path: &Path) -> QmResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let json: serde_json::Value = serde_json::from_str(&contents)?;
        Ok(Self::new(parse_records(&json)?))
    }

    /// Make the next fetch fail with `SourceError::Unavailable`.
    pub fn fail_next_fetch(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Number of fetches served so far, failures included.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn records(&self) -> &[RelationshipRecord] {
        &self.records
    }
}

#[async_trait]
impl DiscoverySource for FixtureSource {
    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<FeedPage, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(SourceError::Unavailable("fixture configured to fail".into()));
        }

        let total = self.records.len();
        let start = (offset as usize).min(total);
        let end = start.saturating_add(limit as usize).min(total);
        debug!("fixture serving records {start}..{end} of {total}");

        Ok(FeedPage::new(
            self.records[start..end].to_vec(),
            Some(total as u64),
            end < total,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture(n: usize) -> FixtureSource {
        FixtureSource::new((0..n).map(|i| RelationshipRecord::new(format!("u{i}"))).collect())
    }

    #[tokio::test]
    async fn test_fixture_pages() {
        let source = fixture(25);

        let first = source.fetch_page(0, 20).await.unwrap();
        assert_eq!(first.len(), 20);
        assert!(first.has_more);

        let second = source.fetch_page(20, 20).await.unwrap();
        assert_eq!(second.len(), 5);
        assert!(!second.has_more);

        let past_end = source.fetch_page(40, 20).await.unwrap();
        assert!(past_end.is_empty());
        assert_eq!(source.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_fixture_fails_once() {
        let source = fixture(3);
        source.fail_next_fetch();

        assert!(matches!(source.fetch_page(0, 20).await, Err(SourceError::Unavailable(_))));
        assert!(source.fetch_page(0, 20).await.is_ok());
    }

    #[tokio::test]
    async fn test_memory_store_selection() {
        let store = MemoryRecordStore::new(vec![RelationshipRecord::new("a")]);
        assert!(store.set_selected("a", true).await);
        assert!(!store.set_selected("missing", true).await);
        assert!(store.friend_records().await[0].selected);
    }

    #[test]
    fn test_parse_records_accepts_both_shapes() {
        let bare = json!([{"id": "a"}, {"id": "b"}]);
        assert_eq!(parse_records(&bare).unwrap().len(), 2);

        let wrapped = json!({"data": [{"id": "a"}]});
        assert_eq!(parse_records(&wrapped).unwrap().len(), 1);

        let response = json!({
            "data": [{"id": 7, "status": "pending"}, {"id": "b"}],
            "metadata": {"total": 40, "hasMore": true}
        });
        let records = parse_records(&response).unwrap();
        assert_eq!(records[0].id.as_deref(), Some("7"));
        assert_eq!(records[0].status, qm_models::RelationshipStatus::Pending);

        assert!(parse_records(&json!("nope")).is_err());

        assert!(parse_records(&json!({"nope": 1})).is_err());
        assert!(parse_records(&json!([{"status": "pending"}])).is_err());
    }

    #[test]
    fn test_fixture_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("friends.json");
        std::fs::write(&path, r#"[{"id": "a", "status": "accepted"}]"#).unwrap();

        let source = FixtureSource::from_json_file(&path).unwrap();
        assert_eq!(source.records().len(), 1);
    }
}
