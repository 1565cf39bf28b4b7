//! Integration tests for the discovery feed under interleaved requests.
//!
//! Covers load-more gating while a fetch is in flight, refresh coalescing,
//! stale responses after a refresh, failure recovery, and feed events.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use common::GatedSource;
use qm_core::error::QmError;
use qm_models::FeedPage;
use qm_services::event_bus::AppEvent;
use qm_services::feed::{DiscoveryFeed, FetchOutcome};
use qm_services::source::{DiscoverySource, FixtureSource, SourceError};

/// Serves one full page claiming more data, then reports `Exhausted`.
struct OnePageSource {
    calls: AtomicUsize,
}

#[async_trait]
impl DiscoverySource for OnePageSource {
    async fn fetch_page(&self, _offset: u32, limit: u32) -> Result<FeedPage, SourceError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            let records = common::make_records(limit as usize);
            Ok(FeedPage::new(records, None, true))
        } else {
            Err(SourceError::Exhausted)
        }
    }
}

fn gated_feed(n: usize, limit: u32) -> (Arc<GatedSource>, DiscoveryFeed) {
    let source = GatedSource::new(n);
    let feed = DiscoveryFeed::new(source.clone(), limit, common::create_test_event_bus());
    (source, feed)
}

// ---- Paging ----

#[tokio::test]
async fn two_pages_then_no_more_fetches() {
    let (source, feed) = gated_feed(25, 20);
    source.release(10);

    let first = feed.load_more().await.unwrap();
    assert!(matches!(first, FetchOutcome::Appended { appended: 20, has_more: true, .. }));

    let second = feed.load_more().await.unwrap();
    assert!(matches!(second, FetchOutcome::Appended { appended: 5, total: 25, has_more: false, .. }));

    for _ in 0..3 {
        assert_eq!(feed.load_more().await.unwrap(), FetchOutcome::Skipped);
    }

    assert_eq!(source.offsets(), vec![0, 20]);
    assert_eq!(feed.records().await.len(), 25);
    assert!(!feed.state().await.has_more);
}

#[tokio::test]
async fn load_more_while_fetching_issues_no_fetch() {
    let (source, feed) = gated_feed(50, 10);

    let pending = tokio::spawn({
        let feed = feed.clone();
        async move { feed.load_more().await }
    });
    source.wait_for_calls(1).await;

    assert!(feed.is_fetching().await);
    for _ in 0..5 {
        assert_eq!(feed.load_more().await.unwrap(), FetchOutcome::Skipped);
    }
    assert_eq!(source.calls(), 1);
    assert_eq!(feed.fetches_issued().await, 1);

    source.release(1);
    let outcome = pending.await.unwrap().unwrap();
    assert!(matches!(outcome, FetchOutcome::Appended { appended: 10, .. }));
    assert!(!feed.is_fetching().await);
}

// ---- Refresh ----

#[tokio::test]
async fn concurrent_refreshes_are_coalesced() {
    let (source, feed) = gated_feed(30, 10);

    let first = tokio::spawn({
        let feed = feed.clone();
        async move { feed.refresh().await }
    });
    source.wait_for_calls(1).await;

    assert_eq!(feed.refresh().await.unwrap(), FetchOutcome::Coalesced);
    assert_eq!(feed.refresh().await.unwrap(), FetchOutcome::Coalesced);
    assert_eq!(source.calls(), 1);

    source.release(1);
    assert!(matches!(first.await.unwrap().unwrap(), FetchOutcome::Appended { .. }));
}

#[tokio::test]
async fn refresh_discards_records_even_when_exhausted() {
    let (source, feed) = gated_feed(5, 10);
    source.release(1);

    feed.load_more().await.unwrap();
    assert!(!feed.state().await.has_more);
    assert_eq!(feed.records().await.len(), 5);

    let pending = tokio::spawn({
        let feed = feed.clone();
        async move { feed.refresh().await }
    });
    source.wait_for_calls(2).await;

    let state = feed.state().await;
    assert_eq!(state.offset, 0);
    assert!(state.has_more);
    assert!(feed.records().await.is_empty());

    source.release(1);
    pending.await.unwrap().unwrap();
    assert_eq!(feed.records().await.len(), 5);
    assert_eq!(source.offsets(), vec![0, 0]);
}

#[tokio::test]
async fn refresh_supersedes_in_flight_load_more() {
    let (source, feed) = gated_feed(30, 10);
    source.release(1);
    feed.load_more().await.unwrap();
    assert_eq!(feed.records().await.len(), 10);

    let stale = tokio::spawn({
        let feed = feed.clone();
        async move { feed.load_more().await }
    });
    source.wait_for_calls(2).await;

    let fresh = tokio::spawn({
        let feed = feed.clone();
        async move { feed.refresh().await }
    });
    source.wait_for_calls(3).await;

    // Refresh has already reset the cursor and dropped the old records.
    let state = feed.state().await;
    assert_eq!(state.offset, 0);
    assert!(state.is_fetching);
    assert!(feed.records().await.is_empty());

    // The superseded load-more (offset 10) completes first and is dropped.
    source.release(1);
    let outcome = stale.await.unwrap().unwrap();
    assert!(matches!(outcome, FetchOutcome::Stale { generation: 0, current: 1 }));
    assert!(feed.records().await.is_empty());
    assert!(feed.is_fetching().await);

    source.release(1);
    let outcome = fresh.await.unwrap().unwrap();
    assert!(matches!(outcome, FetchOutcome::Appended { generation: 1, appended: 10, .. }));

    let records = feed.records().await;
    assert_eq!(records.len(), 10);
    assert_eq!(records[0].id.as_deref(), Some("u0"));
    assert_eq!(feed.state().await.offset, 10);
    assert_eq!(source.offsets(), vec![0, 10, 0]);
}

#[tokio::test]
async fn reset_makes_in_flight_response_stale() {
    let (source, feed) = gated_feed(30, 10);

    let pending = tokio::spawn({
        let feed = feed.clone();
        async move { feed.load_more().await }
    });
    source.wait_for_calls(1).await;

    feed.reset().await;
    source.release(1);

    assert!(matches!(pending.await.unwrap().unwrap(), FetchOutcome::Stale { .. }));
    assert!(feed.records().await.is_empty());
    assert_eq!(feed.state().await.offset, 0);
}

// ---- Failures ----

#[tokio::test]
async fn failed_fetch_is_retryable_and_keeps_records() {
    let source = Arc::new(FixtureSource::new(common::make_records(30)));
    let bus = common::create_test_event_bus();
    let mut rx = bus.subscribe();
    let feed = DiscoveryFeed::new(source.clone(), 10, bus);

    feed.load_more().await.unwrap();
    source.fail_next_fetch();

    let err = feed.load_more().await.unwrap_err();
    assert!(matches!(err, QmError::FetchFailed(_)));

    let state = feed.state().await;
    assert_eq!(state.offset, 10);
    assert!(state.has_more);
    assert!(!state.is_fetching);
    assert_eq!(feed.records().await.len(), 10);

    let retried = feed.load_more().await.unwrap();
    assert!(matches!(retried, FetchOutcome::Appended { total: 20, .. }));
    assert_eq!(source.fetch_count(), 3);

    let events = common::drain(&mut rx);
    assert!(matches!(events[0], AppEvent::FeedUpdated { appended: 10, .. }));
    assert!(matches!(events[1], AppEvent::FeedFailed { generation: 0, .. }));
    assert!(matches!(events[2], AppEvent::FeedUpdated { total: 20, .. }));
}

#[tokio::test]
async fn failed_refresh_leaves_feed_retryable() {
    let (source, feed) = gated_feed(30, 10);
    source.release(10);
    feed.load_more().await.unwrap();

    source.fail_next_fetch();
    assert!(feed.refresh().await.is_err());

    let state = feed.state().await;
    assert_eq!(state.offset, 0);
    assert!(state.has_more);
    assert!(!state.is_fetching);

    assert!(matches!(feed.refresh().await.unwrap(), FetchOutcome::Appended { total: 10, .. }));
}

#[tokio::test]
async fn stale_responses_emit_no_events() {
    let source = GatedSource::new(30);
    let bus = common::create_test_event_bus();
    let mut rx = bus.subscribe();
    let feed = DiscoveryFeed::new(source.clone(), 10, bus);

    let pending = tokio::spawn({
        let feed = feed.clone();
        async move { feed.load_more().await }
    });
    source.wait_for_calls(1).await;
    feed.reset().await;
    source.release(1);
    pending.await.unwrap().unwrap();

    assert!(common::drain(&mut rx).is_empty());
}

#[tokio::test]
async fn exhausted_source_stops_feed_and_emits_event() {
    let source = Arc::new(OnePageSource { calls: AtomicUsize::new(0) });
    let bus = common::create_test_event_bus();
    let mut rx = bus.subscribe();
    let feed = DiscoveryFeed::new(source.clone(), 10, bus);

    assert!(matches!(
        feed.load_more().await.unwrap(),
        FetchOutcome::Appended { appended: 10, has_more: true, .. }
    ));
    assert_eq!(feed.load_more().await.unwrap(), FetchOutcome::Exhausted { generation: 0 });
    assert_eq!(feed.load_more().await.unwrap(), FetchOutcome::Skipped);

    let state = feed.state().await;
    assert!(!state.has_more);
    assert!(!state.is_fetching);
    assert_eq!(state.offset, 10);
    assert_eq!(feed.records().await.len(), 10);
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);

    let events = common::drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], AppEvent::FeedUpdated { generation: 0, appended: 10, .. }));
    assert_eq!(events[1], AppEvent::FeedExhausted { generation: 0 });
}
