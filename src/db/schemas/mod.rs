//! Database schemas for Steadfast
//!
//! Defines MongoDB document structures for users, daily activity, journal
//! entries, assessments, and seeded reference data.

use bson::Document;
use mongodb::options::IndexOptions;

mod activity;
mod assessment;
mod helpline;
mod journal;
mod metadata;
mod quote;
mod user;

pub use activity::{ActivityDoc, ACTIVITY_COLLECTION};
pub use assessment::{AssessmentDoc, ASSESSMENT_COLLECTION};
pub use helpline::{HelplineDoc, HELPLINE_COLLECTION};
pub use journal::{JournalEntryDoc, Mood, JOURNAL_COLLECTION};
pub use metadata::Metadata;
pub use quote::{QuoteDoc, QUOTE_COLLECTION};
pub use user::{EmergencyContact, UserDoc, USER_COLLECTION};

/// Named secondary index
pub(crate) fn index(keys: Document, name: &str) -> (Document, Option<IndexOptions>) {
    let options = IndexOptions::builder().name(name.to_string()).build();
    (keys, Some(options))
}

/// Named unique index
pub(crate) fn unique_index(keys: Document, name: &str) -> (Document, Option<IndexOptions>) {
    let options = IndexOptions::builder()
        .unique(true)
        .name(name.to_string())
        .build();
    (keys, Some(options))
}
