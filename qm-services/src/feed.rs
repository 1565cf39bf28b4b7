//! Paginated discovery feed.
//!
//! [`PaginatedFeed`] is the synchronous state machine over
//! `{offset, limit, has_more, is_fetching}`. Every fetch is split into a
//! *begin* step, which hands out a [`FetchTicket`] stamped with the current
//! generation, and an *apply* step, which consumes the ticket together with
//! the source's result. `refresh()` and `reset()` bump the generation, so a
//! response carrying an older ticket is discarded without touching state.
//!
//! [`DiscoveryFeed`] is the shared async handle the screen uses. It runs
//! begin, awaits the source, then applies, and never holds its lock across
//! the await.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use qm_core::error::{QmError, QmResult};
use qm_models::{FeedPage, FeedState, RelationshipRecord};

use crate::event_bus::{AppEvent, EventBus};
use crate::source::{DiscoverySource, SourceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    LoadMore,
    Refresh,
}

/// Permission to perform one fetch, issued by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub offset: u32,
    pub limit: u32,
    had_more: bool,
    kind: FetchKind,
}

/// What a load-more or refresh call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A page was applied.
    Appended {
        generation: u64,
        appended: usize,
        total: usize,
        has_more: bool,
    },
    /// The source reported that there is no more data.
    Exhausted { generation: u64 },
    /// Nothing was fetched: a fetch is in flight or the feed is exhausted.
    Skipped,
    /// A refresh was already in flight; this one was folded into it.
    Coalesced,
    /// The response belonged to a superseded generation and was dropped.
    Stale { generation: u64, current: u64 },
}

/// Offset-based feed state machine. Idle → Fetching → Idle.
#[derive(Debug)]
pub struct PaginatedFeed {
    state: FeedState,
    records: Vec<RelationshipRecord>,
    generation: u64,
    in_flight: Option<FetchKind>,
    fetches_issued: u64,
}

impl PaginatedFeed {
    pub fn new(limit: u32) -> Self {
        Self {
            state: FeedState::new(limit),
            records: Vec::new(),
            generation: 0,
            in_flight: None,
            fetches_issued: 0,
        }
    }

    /// Start a fetch at the current offset.
    ///
    /// Returns `None`, and issues nothing, while a fetch is in flight or
    /// after the feed ran out of data.
    pub fn begin_load_more(&mut self) -> Option<FetchTicket> {
        if self.state.is_fetching {
            debug!("load_more skipped: fetch in flight (generation {})", self.generation);
            return None;
        }
        if !self.state.has_more {
            debug!("load_more skipped: feed exhausted at offset {}", self.state.offset);
            return None;
        }
        Some(self.issue(FetchKind::LoadMore))
    }

    /// Restart the feed from offset 0, discarding accumulated records.
    ///
    /// Returns `None` if a refresh is already in flight. A load-more in
    /// flight is superseded: its response will come back stale.
    pub fn begin_refresh(&mut self) -> Option<FetchTicket> {
        if self.in_flight == Some(FetchKind::Refresh) {
            debug!("refresh coalesced into generation {}", self.generation);
            return None;
        }

        self.generation += 1;
        self.state.offset = 0;
        self.state.has_more = true;
        self.records.clear();
        debug!("refresh started generation {}", self.generation);
        Some(self.issue(FetchKind::Refresh))
    }

    fn issue(&mut self, kind: FetchKind) -> FetchTicket {
        self.state.is_fetching = true;
        self.in_flight = Some(kind);
        self.fetches_issued += 1;
        FetchTicket {
            generation: self.generation,
            offset: self.state.offset,
            limit: self.state.limit,
            had_more: self.state.has_more,
            kind,
        }
    }

    /// Apply the source's answer to a ticket.
    ///
    /// Stale tickets change nothing. On `Unavailable` the offset, the
    /// has-more flag and the accumulated records are kept and
    /// `FetchFailed` is returned.
    pub fn apply(
        &mut self,
        ticket: FetchTicket,
        result: Result<FeedPage, SourceError>,
    ) -> QmResult<FetchOutcome> {
        if ticket.generation != self.generation {
            debug!(
                "discarding stale {:?} response (generation {} < {})",
                ticket.kind, ticket.generation, self.generation
            );
            return Ok(FetchOutcome::Stale {
                generation: ticket.generation,
                current: self.generation,
            });
        }

        self.state.is_fetching = false;
        self.in_flight = None;

        match result {
            Ok(page) => {
                let appended = page.records.len();
                self.records.extend(page.records);
                let mut cursor_overflow = false;
                if ticket.had_more {
                    match self.state.offset.checked_add(ticket.limit) {
                        Some(next) => self.state.offset = next,
                        None => {
                            warn!(
                                "offset {} + {} overflows, treating feed as exhausted",
                                self.state.offset, ticket.limit
                            );
                            cursor_overflow = true;
                        }
                    }
                }
                self.state.has_more = page.has_more && !cursor_overflow;
                debug!(
                    "applied page: +{appended} records, offset={}, has_more={}",
                    self.state.offset, self.state.has_more
                );
                Ok(FetchOutcome::Appended {
                    generation: self.generation,
                    appended,
                    total: self.records.len(),
                    has_more: self.state.has_more,
                })
            }
            Err(SourceError::Exhausted) => {
                self.state.has_more = false;
                debug!("source exhausted at offset {}", self.state.offset);
                Ok(FetchOutcome::Exhausted {
                    generation: self.generation,
                })
            }
            Err(SourceError::Unavailable(reason)) => {
                warn!("discovery fetch at offset {} failed: {reason}", ticket.offset);
                Err(QmError::FetchFailed(reason))
            }
        }
    }

    /// Back to the initial state. In-flight responses become stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = FeedState::new(self.state.limit);
        self.records.clear();
        self.in_flight = None;
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    pub fn records(&self) -> &[RelationshipRecord] {
        &self.records
    }

    pub fn is_fetching(&self) -> bool {
        self.state.is_fetching
    }

    pub fn has_more(&self) -> bool {
        self.state.has_more
    }

    pub fn offset(&self) -> u32 {
        self.state.offset
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Total number of tickets handed out since creation.
    pub fn fetches_issued(&self) -> u64 {
        self.fetches_issued
    }
}

/// Shared handle pairing a [`PaginatedFeed`] with its discovery source.
#[derive(Clone)]
pub struct DiscoveryFeed {
    inner: Arc<Mutex<PaginatedFeed>>,
    source: Arc<dyn DiscoverySource>,
    event_bus: EventBus,
}

impl DiscoveryFeed {
    pub fn new(source: Arc<dyn DiscoverySource>, limit: u32, event_bus: EventBus) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PaginatedFeed::new(limit))),
            source,
            event_bus,
        }
    }

    /// Fetch the next page, unless a fetch is in flight or the feed is exhausted.
    pub async fn load_more(&self) -> QmResult<FetchOutcome> {
        let ticket = self.inner.lock().await.begin_load_more();
        match ticket {
            Some(ticket) => self.run(ticket).await,
            None => Ok(FetchOutcome::Skipped),
        }
    }

    /// Discard everything and fetch from offset 0.
    pub async fn refresh(&self) -> QmResult<FetchOutcome> {
        let ticket = self.inner.lock().await.begin_refresh();
        match ticket {
            Some(ticket) => {
                info!("refreshing discovery feed (generation {})", ticket.generation);
                self.run(ticket).await
            }
            None => Ok(FetchOutcome::Coalesced),
        }
    }

    pub async fn reset(&self) {
        self.inner.lock().await.reset();
    }

    async fn run(&self, ticket: FetchTicket) -> QmResult<FetchOutcome> {
        let result = self.source.fetch_page(ticket.offset, ticket.limit).await;
        let outcome = self.inner.lock().await.apply(ticket, result);

        match &outcome {
            Ok(FetchOutcome::Appended { generation, appended, total, has_more }) => {
                self.event_bus.emit(AppEvent::FeedUpdated {
                    generation: *generation,
                    appended: *appended,
                    total: *total,
                    has_more: *has_more,
                });
            }
            Ok(FetchOutcome::Exhausted { generation }) => {
                self.event_bus.emit(AppEvent::FeedExhausted { generation: *generation });
            }
            Ok(_) => {}
            Err(e) => {
                self.event_bus.emit(AppEvent::FeedFailed {
                    generation: ticket.generation,
                    error: e.to_string(),
                });
            }
        }

        outcome
    }

    pub async fn state(&self) -> FeedState {
        self.inner.lock().await.state()
    }

    pub async fn is_fetching(&self) -> bool {
        self.inner.lock().await.is_fetching()
    }

    pub async fn records(&self) -> Vec<RelationshipRecord> {
        self.inner.lock().await.records().to_vec()
    }

    /// State and records read under a single lock.
    pub async fn snapshot(&self) -> (FeedState, Vec<RelationshipRecord>) {
        let feed = self.inner.lock().await;
        (feed.state(), feed.records().to_vec())
    }

    pub async fn fetches_issued(&self) -> u64 {
        self.inner.lock().await.fetches_issued()
    }
}
