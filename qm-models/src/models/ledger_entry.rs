//! Shadow entries for locally issued invites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::relationship::{RelationshipRecord, RelationshipStatus};

/// A locally created invite, layered over the server's view of the target.
///
/// The snapshot keeps whatever status the source reported; `status` is the
/// ledger's own, always `Pending` at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Local identifier for this entry.
    pub entry_id: String,
    /// Identifier of the invited record.
    pub target_id: String,
    /// Snapshot of the record at invite time.
    pub record: RelationshipRecord,
    pub status: RelationshipStatus,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Create a pending shadow entry for `record`, whose id has been validated.
    pub fn pending(target_id: impl Into<String>, record: RelationshipRecord) -> Self {
        Self {
            entry_id: format!("local-{}", uuid::Uuid::new_v4()),
            target_id: target_id.into(),
            record,
            status: RelationshipStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
