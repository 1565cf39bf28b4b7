//! Shared test utilities for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use qm_core::config::AppConfig;
use qm_models::{FeedPage, RelationshipRecord, RelationshipStatus};
use qm_services::event_bus::{AppEvent, EventBus};
use qm_services::source::{DiscoverySource, FixtureSource, SourceError};

/// Create `n` discovery records with ids `u0..u{n-1}`.
pub fn make_records(n: usize) -> Vec<RelationshipRecord> {
    (0..n).map(|i| RelationshipRecord::new(format!("u{i}"))).collect()
}

pub fn record(id: &str, status: RelationshipStatus) -> RelationshipRecord {
    RelationshipRecord::new(id).with_status(status)
}

/// Create an EventBus with a small buffer suitable for tests.
pub fn create_test_event_bus() -> EventBus {
    EventBus::new(64)
}

/// Default configuration with the given page size.
pub fn config_with_page_size(page_size: u32) -> AppConfig {
    let mut config = AppConfig::default();
    config.feed.page_size = page_size;
    config
}

/// Drain every event currently buffered on `rx`.
pub fn drain(rx: &mut tokio::sync::broadcast::Receiver<AppEvent>) -> Vec<AppEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Discovery source whose fetches block until the test releases them.
///
/// Fetches are released in the order they were issued.
pub struct GatedSource {
    inner: FixtureSource,
    gate: Semaphore,
    calls: AtomicUsize,
    offsets: Mutex<Vec<u32>>,
}

impl GatedSource {
    pub fn new(n: usize) -> Arc<Self> {
        Arc::new(Self {
            inner: FixtureSource::new(make_records(n)),
            gate: Semaphore::new(0),
            calls: AtomicUsize::new(0),
            offsets: Mutex::new(Vec::new()),
        })
    }

    /// Let the next `n` blocked (or future) fetches complete.
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    pub fn fail_next_fetch(&self) {
        self.inner.fail_next_fetch();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn offsets(&self) -> Vec<u32> {
        self.offsets.lock().unwrap().clone()
    }

    /// Yield until `n` fetches have been issued.
    pub async fn wait_for_calls(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.calls() < n {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("timed out waiting for fetches");
    }
}

#[async_trait]
impl DiscoverySource for GatedSource {
    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<FeedPage, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.offsets.lock().unwrap().push(offset);

        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| SourceError::Unavailable("gate closed".into()))?;
        permit.forget();

        self.inner.fetch_page(offset, limit).await
    }
}
