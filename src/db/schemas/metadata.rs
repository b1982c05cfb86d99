//! Lifecycle metadata embedded in every document
//!
//! Documents are never hard-deleted. Removal flips `is_deleted` and every
//! read through the collection wrapper filters on it, so queries elsewhere
//! in the codebase never have to remember the soft-delete rule.

use bson::DateTime;
use serde::{Deserialize, Serialize};

/// Timestamps and soft-delete flag carried by all collections
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Metadata {
    /// Creation instant, stamped at insert
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,

    /// Last modification instant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,

    /// Soft-delete flag, honored by all reads
    #[serde(default)]
    pub is_deleted: bool,

    /// Set when `is_deleted` flips, absent otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime>,
}

impl Metadata {
    /// Fresh metadata stamped with the current time
    pub fn new() -> Self {
        let now = DateTime::now();
        Self {
            created_at: Some(now),
            updated_at: Some(now),
            is_deleted: false,
            deleted_at: None,
        }
    }

    /// Record a modification time
    pub fn touch(&mut self) {
        self.updated_at = Some(DateTime::now());
    }
}
