//! Entity model definitions.

pub mod relationship;
pub mod feed;
pub mod ledger_entry;
