//! Core domain types for sqldemo

use serde::{Deserialize, Serialize};

/// One row of the `email` table.
///
/// Values are read-only snapshots of the seed database; nothing in the
/// crate constructs one for writing back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email {
    /// Assigned by the store on insertion, never reused
    pub id: i64,
    pub subject: String,
    pub sender: String,
    /// Free-form grouping label ("Inbox", "Sent", ...)
    pub folder: String,
    pub starred: bool,
    pub read: bool,
    /// Integer timestamp, unit defined by whoever authored the seed
    pub received: i64,
}
