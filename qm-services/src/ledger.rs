//! Local invite ledger.
//!
//! Records invites the user issued from this screen as shadow entries,
//! separate from the records the discovery source returned. A fetched
//! record is never rewritten; confirmation of an invite arrives through a
//! later fetch.

use tracing::{debug, info};

use qm_core::error::QmResult;
use qm_models::{LedgerEntry, RelationshipRecord, RelationshipStatus};

/// Result of [`InviteLedger::try_insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertOutcome {
    /// False when an entry for the same id already existed.
    pub inserted: bool,
}

/// Sort priority of a ledger status. Lower sorts first.
pub fn status_priority(status: RelationshipStatus) -> u8 {
    match status {
        RelationshipStatus::Accepted => 1,
        RelationshipStatus::Pending => 2,
        RelationshipStatus::Rejected => 3,
        _ => 4,
    }
}

/// In-memory set of locally created invites, at most one per target id.
///
/// Entries are kept in insertion order; [`list_sorted`](Self::list_sorted)
/// applies the status priority with a stable sort on top of that.
#[derive(Debug, Default)]
pub struct InviteLedger {
    entries: Vec<LedgerEntry>,
}

impl InviteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pending invite for `record` unless its id is already tracked.
    ///
    /// Fails with `InvalidRecord` if the record has no id.
    pub fn try_insert(&mut self, record: &RelationshipRecord) -> QmResult<InsertOutcome> {
        let id = record.require_id()?;

        if self.contains(id) {
            debug!("invite for {id} already recorded");
            return Ok(InsertOutcome { inserted: false });
        }

        self.entries.push(LedgerEntry::pending(id, record.clone()));
        info!("recorded invite for {id} ({} tracked)", self.entries.len());
        Ok(InsertOutcome { inserted: true })
    }

    /// All entries, accepted first, then pending, then rejected.
    pub fn list_sorted(&self) -> Vec<LedgerEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by_key(|e| status_priority(e.status));
        sorted
    }

    /// Drop every entry. Returns how many were removed.
    pub fn reset(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        if count > 0 {
            info!("cleared {count} invite(s) from ledger");
        }
        count
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.target_id == id)
    }

    pub fn get(&self, id: &str) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| e.target_id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn push_with_status(&mut self, id: &str, status: RelationshipStatus) {
        let mut entry = LedgerEntry::pending(id, RelationshipRecord::new(id));
        entry.status = status;
        self.entries.push(entry);
    }
}
