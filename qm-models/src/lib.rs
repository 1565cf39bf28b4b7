//! Quizmates Models - Relationship records, feed pages, and invite ledger entries.
//!
//! This crate owns the client-side data model of the friends subsystem:
//! relationship records as delivered by the discovery service, the
//! paginated feed page/state types, and the shadow entries created for
//! locally issued invites. Parsing from server JSON maps lives here too.

pub mod models;

// Re-export key types
pub use models::relationship::{RelationshipRecord, RelationshipStatus, Role, SchoolAffiliation};
pub use models::feed::{FeedPage, FeedState};
pub use models::ledger_entry::LedgerEntry;
