//! Relationship record entity model.

use serde::{Deserialize, Serialize};
use qm_core::error::{QmError, QmResult};

/// Status of the relationship between the current user and another user.
///
/// Set by the discovery service for fetched records, and by the invite
/// ledger for locally created shadow entries. Unknown strings parse to
/// `Undefined`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipStatus {
    Pending,
    Accepted,
    Rejected,
    Invite,
    Following,
    #[default]
    #[serde(other)]
    Undefined,
}

impl RelationshipStatus {
    /// Parse a server status string. Never fails.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "accepted" => Self::Accepted,
            "rejected" => Self::Rejected,
            "invite" => Self::Invite,
            "following" => Self::Following,
            _ => Self::Undefined,
        }
    }

    /// Wire representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Invite => "invite",
            Self::Following => "following",
            Self::Undefined => "undefined",
        }
    }
}

impl std::fmt::Display for RelationshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The framing a screen shows a record in.
///
/// Follow lists, invite lists and the student verification list all render
/// the same records with different labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Follow,
    Invite,
    Student,
}

impl Role {
    /// Parse a role name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "follow" => Some(Self::Follow),
            "invite" => Some(Self::Invite),
            "student" => Some(Self::Student),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Invite => "invite",
            Self::Student => "student",
        }
    }
}

/// School a user claims to attend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolAffiliation {
    pub name: String,
    #[serde(default)]
    pub verified: bool,
}

/// A friend, suggestion, or invite target as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipRecord {
    /// Stable identifier across pages. `None` only for malformed input.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: RelationshipStatus,
    /// Student verification flag. Only meaningful in the student role.
    #[serde(default)]
    pub verified: Option<bool>,
    /// Client-local: part of the active game roster.
    #[serde(default)]
    pub selected: bool,
    #[serde(default, rename = "school")]
    pub school_affiliation: Option<SchoolAffiliation>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl RelationshipRecord {
    /// Create a record with the given id and an undefined status.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            status: RelationshipStatus::Undefined,
            verified: None,
            selected: false,
            school_affiliation: None,
            display_name: None,
            username: None,
        }
    }

    pub fn with_status(mut self, status: RelationshipStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_verified(mut self, verified: bool) -> Self {
        self.verified = Some(verified);
        self
    }

    pub fn with_school(mut self, name: impl Into<String>, verified: bool) -> Self {
        self.school_affiliation = Some(SchoolAffiliation {
            name: name.into(),
            verified,
        });
        self
    }

    /// The record identifier, or `InvalidRecord` if it is missing or blank.
    pub fn require_id(&self) -> QmResult<&str> {
        match self.id.as_deref() {
            Some(id) if !id.trim().is_empty() => Ok(id),
            _ => Err(QmError::InvalidRecord(format!(
                "record {} has no identifier",
                self.display_name.as_deref().unwrap_or("<unnamed>")
            ))),
        }
    }

    /// School name, only when the affiliation has been verified.
    pub fn visible_school_name(&self) -> Option<&str> {
        self.school_affiliation
            .as_ref()
            .filter(|s| s.verified)
            .map(|s| s.name.as_str())
    }

    /// Whether the record carries a school affiliation that is not verified.
    pub fn has_unverified_school(&self) -> bool {
        self.school_affiliation.as_ref().is_some_and(|s| !s.verified)
    }

    /// Create a record from a server JSON map.
    ///
    /// Accepts string or integer ids. Fails with `InvalidRecord` when no
    /// id is present.
    pub fn from_server_map(map: &serde_json::Value) -> QmResult<Self> {
        let id = match map.get("id") {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => {
                return Err(QmError::InvalidRecord("record missing id".into()));
            }
        };

        let school_affiliation = map.get("school").and_then(|s| {
            let name = s.get("name").and_then(|v| v.as_str())?;
            Some(SchoolAffiliation {
                name: name.to_string(),
                verified: s.get("verified").and_then(|v| v.as_bool()).unwrap_or(false),
            })
        });

        Ok(Self {
            id: Some(id),
            status: map
                .get("status")
                .and_then(|v| v.as_str())
                .map(RelationshipStatus::from_str_lossy)
                .unwrap_or_default(),
            verified: map.get("verified").and_then(|v| v.as_bool()),
            selected: map.get("selected").and_then(|v| v.as_bool()).unwrap_or(false),
            school_affiliation,
            display_name: map.get("displayName").and_then(|v| v.as_str()).map(String::from),
            username: map.get("username").and_then(|v| v.as_str()).map(String::from),
        })
    }
}
