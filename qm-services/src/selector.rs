//! Aggregate view state over friend records and the invite ledger.

use qm_models::{LedgerEntry, RelationshipRecord, RelationshipStatus};

use crate::ledger::InviteLedger;

/// Derived, read-only view of the friends roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Selected records whose invite was accepted.
    pub accepted_invites: Vec<RelationshipRecord>,
    /// No accepted participant yet and an invite is outstanding.
    pub is_waiting: bool,
    /// The outstanding invite `is_waiting` was decided on.
    pub waiting_on: Option<RelationshipRecord>,
    /// Locally tracked invites, accepted first, then pending, then rejected.
    pub merged_sorted_list: Vec<LedgerEntry>,
    pub accepted_count: usize,
    pub pending_count: usize,
    /// Accepted records regardless of roster selection.
    pub mutual_count: usize,
}

/// Derive the roster view from `friend_records` and `ledger`.
///
/// `is_waiting` looks at the first pending record only, which assumes a
/// single outstanding invite at a time.
pub fn derive(friend_records: &[RelationshipRecord], ledger: &InviteLedger) -> Selection {
    let accepted_invites: Vec<RelationshipRecord> = friend_records
        .iter()
        .filter(|r| r.selected && r.status == RelationshipStatus::Accepted)
        .cloned()
        .collect();

    let first_pending = friend_records
        .iter()
        .find(|r| r.status == RelationshipStatus::Pending);

    let is_waiting = accepted_invites.is_empty() && first_pending.is_some();

    Selection {
        accepted_count: accepted_invites.len(),
        pending_count: friend_records
            .iter()
            .filter(|r| r.status == RelationshipStatus::Pending)
            .count(),
        mutual_count: friend_records
            .iter()
            .filter(|r| r.status == RelationshipStatus::Accepted)
            .count(),
        waiting_on: if is_waiting { first_pending.cloned() } else { None },
        is_waiting,
        accepted_invites,
        merged_sorted_list: ledger.list_sorted(),
    }
}
