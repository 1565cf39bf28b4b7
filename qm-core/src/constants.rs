//! Application-wide constants.

/// Application name, also used for platform directory names.
pub const APP_NAME: &str = "Quizmates";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name prefix for the rotated log files.
pub const LOG_FILE_NAME: &str = "quizmates.log";

/// Default number of records requested per discovery page.
pub const DEFAULT_FEED_PAGE_SIZE: u32 = 20;

/// Default distance (in rows from the end of the list) that triggers a prefetch.
pub const DEFAULT_PREFETCH_THRESHOLD: u32 = 5;

/// Default broadcast capacity for the application event bus.
pub const EVENT_BUS_CAPACITY: usize = 256;

/// Button and status labels shown next to a relationship record.
pub mod labels {
    pub const FOLLOWING: &str = "Following";
    pub const FOLLOW: &str = "Follow";
    pub const INVITE: &str = "Invite";
    pub const PENDING: &str = "Pending";
    pub const REJECTED: &str = "Rejected";
    pub const MUTUAL: &str = "Mutual";
    pub const ACCEPTED: &str = "Accepted";
    pub const VERIFY: &str = "Verify";
    pub const VERIFIED: &str = "Verified";
}
