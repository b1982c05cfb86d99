//! Daily activity document schema
//!
//! One document per user per UTC day, created lazily by the activity
//! upsert. The unique compound index on (user_id, date) is what makes
//! concurrent first-writes of a day safe.

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::{unique_index, Metadata};

/// Collection name for daily activity records
pub const ACTIVITY_COLLECTION: &str = "activities";

/// Daily activity record stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ActivityDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Owning user
    pub user_id: ObjectId,

    /// Day key: midnight UTC of the day this record covers
    pub date: DateTime,

    /// Glasses of water logged today (incremented one per event)
    #[serde(default)]
    pub water_glasses: i32,

    /// Hours slept last night
    #[serde(default)]
    pub sleep_hours: f64,

    /// Minutes of meditation today
    #[serde(default)]
    pub meditation_minutes: f64,

    /// Minutes of exercise today
    #[serde(default)]
    pub exercise_minutes: f64,

    /// When the user checked in, if they have
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_time: Option<DateTime>,

    /// When the user checked out, if they have
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out_time: Option<DateTime>,
}

// Manual impl because `bson::DateTime` has no `Default`; only exists to
// satisfy the `Default` bound on `MongoCollection`.
impl Default for ActivityDoc {
    fn default() -> Self {
        Self {
            _id: None,
            metadata: Metadata::default(),
            user_id: ObjectId::default(),
            date: DateTime::from_millis(0),
            water_glasses: 0,
            sleep_hours: 0.0,
            meditation_minutes: 0.0,
            exercise_minutes: 0.0,
            check_in_time: None,
            check_out_time: None,
        }
    }
}

impl IntoIndexes for ActivityDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        // One record per user per day
        vec![unique_index(doc! { "user_id": 1, "date": 1 }, "user_date_unique")]
    }
}

impl MutMetadata for ActivityDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
