//! Friends screen controller.
//!
//! Owns the discovery feed and the invite ledger for one mounted screen,
//! reads the friend roster from the record store, and produces the
//! [`ViewModel`] the rendering layer draws from.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use qm_core::config::{AppConfig, InviteConfig};
use qm_core::error::{QmError, QmResult};
use qm_models::{LedgerEntry, RelationshipRecord, RelationshipStatus, Role};

use crate::event_bus::{AppEvent, EventBus};
use crate::feed::{DiscoveryFeed, FetchOutcome};
use crate::ledger::{InsertOutcome, InviteLedger};
use crate::presenter::{self, Category};
use crate::selector;
use crate::service::{Service, ServiceState};
use crate::source::{DiscoverySource, RecordStore};

/// One discovery row as the rendering layer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewRow {
    pub record: RelationshipRecord,
    pub label: &'static str,
    pub category: Category,
    pub disabled: bool,
}

/// Everything needed to draw the friends screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub rows: Vec<ViewRow>,
    pub invites: Vec<LedgerEntry>,
    pub is_fetching: bool,
    pub has_more: bool,
    pub is_waiting: bool,
    pub accepted_count: usize,
}

/// Result of an invite action.
#[derive(Debug)]
pub struct InviteOutcome {
    pub inserted: bool,
    /// Outcome of the follow-up refresh, when one was triggered.
    pub refresh: Option<QmResult<FetchOutcome>>,
}

/// Controller for a friends/discovery screen.
pub struct FriendsScreen {
    state: ServiceState,
    context: Role,
    feed: DiscoveryFeed,
    ledger: InviteLedger,
    store: Arc<dyn RecordStore>,
    event_bus: EventBus,
    invites: InviteConfig,
    prefetch_threshold: usize,
}

impl FriendsScreen {
    /// Build a screen from configuration.
    ///
    /// Fails with `Config` if the configured page size is zero.
    pub fn new(
        config: &AppConfig,
        context: Role,
        source: Arc<dyn DiscoverySource>,
        store: Arc<dyn RecordStore>,
        event_bus: EventBus,
    ) -> QmResult<Self> {
        let page_size = config.feed.validated_page_size()?;
        Ok(Self {
            state: ServiceState::Created,
            context,
            feed: DiscoveryFeed::new(source, page_size, event_bus.clone()),
            ledger: InviteLedger::new(),
            store,
            event_bus,
            invites: config.invites.clone(),
            prefetch_threshold: config.feed.prefetch_threshold as usize,
        })
    }

    pub fn context(&self) -> Role {
        self.context
    }

    /// Shared handle to the feed, for shells that drive it from other tasks.
    pub fn feed(&self) -> &DiscoveryFeed {
        &self.feed
    }

    pub fn ledger(&self) -> &InviteLedger {
        &self.ledger
    }

    pub async fn load_more(&self) -> QmResult<FetchOutcome> {
        self.feed.load_more().await
    }

    pub async fn refresh(&self) -> QmResult<FetchOutcome> {
        self.feed.refresh().await
    }

    /// Refresh, then keep loading until `pages` pages are in or the feed
    /// runs dry. Returns the number of pages applied.
    pub async fn load_pages(&self, pages: u32) -> QmResult<u32> {
        if pages == 0 {
            return Ok(0);
        }

        let mut loaded = match self.feed.refresh().await? {
            FetchOutcome::Appended { .. } => 1,
            _ => 0,
        };
        while loaded < pages {
            match self.feed.load_more().await? {
                FetchOutcome::Appended { .. } => loaded += 1,
                _ => break,
            }
        }
        debug!("loaded {loaded} of {pages} requested page(s)");
        Ok(loaded)
    }

    /// Infinite-scroll trigger for the row at `visible_index`.
    pub async fn should_prefetch(&self, visible_index: usize) -> bool {
        let (state, records) = self.feed.snapshot().await;
        state.has_more
            && !state.is_fetching
            && visible_index.saturating_add(self.prefetch_threshold) >= records.len()
    }

    /// Record an invite for `record` and, if configured, refresh the feed.
    pub async fn invite(&mut self, record: &RelationshipRecord) -> QmResult<InviteOutcome> {
        let InsertOutcome { inserted } = self.ledger.try_insert(record)?;
        if !inserted {
            return Ok(InviteOutcome { inserted, refresh: None });
        }

        let record_id = record.require_id()?.to_string();
        if self.invites.confirm_new_invites {
            self.event_bus.emit(AppEvent::InviteRecorded { record_id: record_id.clone() });
        }

        let refresh = if self.invites.refresh_after_invite {
            let result = self.feed.refresh().await;
            if let Err(e) = &result {
                warn!("refresh after inviting {record_id} failed: {e}");
            }
            Some(result)
        } else {
            None
        };

        Ok(InviteOutcome { inserted, refresh })
    }

    /// Current view model, recomputed from the feed, the ledger and the store.
    pub async fn snapshot(&self) -> ViewModel {
        let (state, records) = self.feed.snapshot().await;
        let friends = self.store.friend_records().await;
        let selection = selector::derive(&friends, &self.ledger);

        let rows = records
            .into_iter()
            .map(|record| self.present_row(record))
            .collect();

        ViewModel {
            rows,
            invites: selection.merged_sorted_list,
            is_fetching: state.is_fetching,
            has_more: state.has_more,
            is_waiting: selection.is_waiting,
            accepted_count: selection.accepted_count,
        }
    }

    /// Present a fetched row. A record the source has no status for, but
    /// which the user already invited, is shown with the ledger's status.
    fn present_row(&self, record: RelationshipRecord) -> ViewRow {
        let shadow = record
            .id
            .as_deref()
            .and_then(|id| self.ledger.get(id))
            .filter(|_| record.status == RelationshipStatus::Undefined);

        let presentation = match shadow {
            Some(entry) => {
                let overlay = record.clone().with_status(entry.status);
                presenter::present(&overlay, self.context)
            }
            None => presenter::present(&record, self.context),
        };

        ViewRow {
            record,
            label: presentation.label,
            category: presentation.category,
            disabled: presentation.disabled,
        }
    }

    /// Leave the screen: stop the service and discard feed state.
    pub async fn teardown(&mut self) -> QmResult<()> {
        self.shutdown()?;
        self.feed.reset().await;
        Ok(())
    }
}

impl Service for FriendsScreen {
    fn name(&self) -> &str {
        "friends_screen"
    }

    fn state(&self) -> ServiceState {
        self.state
    }

    fn init(&mut self) -> QmResult<()> {
        if self.state == ServiceState::Running {
            return Err(QmError::Service("friends screen already initialized".into()));
        }
        self.state = ServiceState::Running;
        info!("friends screen initialized (context={})", self.context.as_str());
        Ok(())
    }

    fn shutdown(&mut self) -> QmResult<()> {
        let count = self.ledger.reset();
        self.event_bus.emit(AppEvent::InvitesCleared { count });
        self.state = ServiceState::Stopped;
        info!("friends screen stopped");
        Ok(())
    }
}
