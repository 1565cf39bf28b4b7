//! Discovery feed page and paging state.

use serde::{Deserialize, Serialize};
use qm_core::error::{QmError, QmResult};

use super::relationship::RelationshipRecord;

/// One page returned by the discovery service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPage {
    pub records: Vec<RelationshipRecord>,
    /// Total number of records the service knows about, if reported.
    pub total_count: Option<u64>,
    pub has_more: bool,
}

impl FeedPage {
    pub fn new(records: Vec<RelationshipRecord>, total_count: Option<u64>, has_more: bool) -> Self {
        Self {
            records,
            total_count,
            has_more,
        }
    }

    /// Parse a `{ data: [...], metadata: { total, hasMore } }` response body.
    ///
    /// When `hasMore` is absent it is derived from `total`, treating the page
    /// as starting at `offset`. Any record without an id fails the whole page.
    pub fn from_server_map(map: &serde_json::Value, offset: u32) -> QmResult<Self> {
        let data = map
            .get("data")
            .and_then(|v| v.as_array())
            .ok_or_else(|| QmError::Serialization("feed page missing data array".into()))?;

        let records = data
            .iter()
            .map(RelationshipRecord::from_server_map)
            .collect::<QmResult<Vec<_>>>()?;

        let metadata = map.get("metadata");
        let total_count = metadata
            .and_then(|m| m.get("total"))
            .and_then(|v| v.as_u64());
        let has_more = metadata
            .and_then(|m| m.get("hasMore"))
            .and_then(|v| v.as_bool())
            .unwrap_or_else(|| match total_count {
                Some(total) => (offset as u64) + (records.len() as u64) < total,
                None => false,
            });

        Ok(Self {
            records,
            total_count,
            has_more,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Paging cursor for a discovery feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedState {
    pub offset: u32,
    pub limit: u32,
    pub has_more: bool,
    pub is_fetching: bool,
}

impl FeedState {
    /// Initial state: offset 0, more data assumed, idle.
    pub fn new(limit: u32) -> Self {
        Self {
            offset: 0,
            limit,
            has_more: true,
            is_fetching: false,
        }
    }
}
