//! Status presentation for relationship records.
//!
//! Maps a record's status, the screen's role, and verification flags to a
//! label, a visual category, and whether the action button is enabled.
//! Resolution is an ordered rule table: the first rule whose status matches
//! wins. The student role bypasses the table entirely and branches on the
//! record's `verified` flag.

use serde::Serialize;
use qm_core::constants::labels;
use qm_models::{RelationshipRecord, RelationshipStatus, Role};

/// Visual category tag. The rendering layer owns the actual colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Neutral,
    Warning,
    Success,
    Danger,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Warning => "warning",
            Self::Success => "success",
            Self::Danger => "danger",
        }
    }
}

/// Label, category and affordance for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub label: &'static str,
    pub category: Category,
    /// Suppresses the action button without changing the label.
    pub disabled: bool,
}

/// One row of the resolution table.
struct StatusRule {
    status: RelationshipStatus,
    resolve: fn(Role) -> (&'static str, Category),
}

/// Resolution order. `Undefined` must stay last; it doubles as the fallback.
const RULES: &[StatusRule] = &[
    StatusRule {
        status: RelationshipStatus::Pending,
        resolve: |role| match role {
            Role::Follow => (labels::FOLLOWING, Category::Success),
            Role::Invite => (labels::INVITE, Category::Neutral),
            Role::Student => (labels::PENDING, Category::Neutral),
        },
    },
    StatusRule {
        status: RelationshipStatus::Rejected,
        resolve: |_| (labels::REJECTED, Category::Danger),
    },
    StatusRule {
        status: RelationshipStatus::Accepted,
        resolve: |role| match role {
            Role::Follow => (labels::MUTUAL, Category::Success),
            _ => (labels::ACCEPTED, Category::Success),
        },
    },
    StatusRule {
        status: RelationshipStatus::Following,
        resolve: |_| (labels::FOLLOWING, Category::Neutral),
    },
    StatusRule {
        status: RelationshipStatus::Invite,
        resolve: |_| (labels::FOLLOW, Category::Success),
    },
    StatusRule {
        status: RelationshipStatus::Undefined,
        resolve: fallback,
    },
];

fn fallback(role: Role) -> (&'static str, Category) {
    match role {
        Role::Follow => (labels::FOLLOW, Category::Success),
        _ => (labels::INVITE, Category::Success),
    }
}

/// Student verification list: the relationship status is ignored.
fn student_override(record: &RelationshipRecord) -> (&'static str, Category) {
    if record.verified.unwrap_or(false) {
        (labels::VERIFIED, Category::Neutral)
    } else {
        (labels::VERIFY, Category::Success)
    }
}

/// Present `record` as it should appear on a screen framed by `context`.
pub fn present(record: &RelationshipRecord, context: Role) -> Presentation {
    let (label, category) = if context == Role::Student {
        student_override(record)
    } else {
        present_status(record.status, context)
    };

    Presentation {
        label,
        category,
        disabled: context == Role::Follow && record.has_unverified_school(),
    }
}

/// Table lookup for a bare status.
pub fn present_status(status: RelationshipStatus, context: Role) -> (&'static str, Category) {
    RULES
        .iter()
        .find(|rule| rule.status == status)
        .map(|rule| (rule.resolve)(context))
        .unwrap_or_else(|| fallback(context))
}
