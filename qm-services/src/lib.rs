//! Quizmates Services - The friend relationship and invitation core.
//!
//! This crate provides:
//! - Status presentation (labels, categories, affordances per role)
//! - The local invite ledger (deduplicated, priority sorted)
//! - The paginated discovery feed (generation-stamped fetches)
//! - Roster selection (accepted invites, waiting flag)
//! - Collaborator traits for the discovery source and record store
//! - The friends screen controller producing the view model
//! - Event bus and service lifecycle

pub mod service;
pub mod event_bus;
pub mod presenter;
pub mod ledger;
pub mod source;
pub mod feed;
pub mod selector;
pub mod screen;

// Re-export key types
pub use service::{Service, ServiceState};
pub use event_bus::{AppEvent, EventBus};
pub use presenter::{present, Category, Presentation};
pub use ledger::{InsertOutcome, InviteLedger};
pub use source::{DiscoverySource, FixtureSource, MemoryRecordStore, RecordStore, SourceError};
pub use feed::{DiscoveryFeed, FetchOutcome, FetchTicket, PaginatedFeed};
pub use selector::{derive, Selection};
pub use screen::{FriendsScreen, InviteOutcome, ViewModel, ViewRow};
