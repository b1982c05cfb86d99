//! Intake assessment document schema
//!
//! One submission per POST; the newest one is what GET returns. The raw
//! sobriety date string is kept as the client sent it.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::{index, Metadata};

/// Collection name for assessments
pub const ASSESSMENT_COLLECTION: &str = "assessments";

/// Intake assessment stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct AssessmentDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Owning user
    pub user_id: ObjectId,

    /// Substance the user is recovering from
    pub substance: String,

    /// Sobriety start date as entered by the user (free-form string)
    pub sobriety_date: String,

    /// Known relapse triggers
    pub triggers: String,

    /// Support network description
    pub support: String,

    /// Recovery goals
    pub goals: String,
}

impl AssessmentDoc {
    /// Create a new assessment submission
    pub fn new(
        user_id: ObjectId,
        substance: String,
        sobriety_date: String,
        triggers: String,
        support: String,
        goals: String,
    ) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            user_id,
            substance,
            sobriety_date,
            triggers,
            support,
            goals,
        }
    }
}

impl IntoIndexes for AssessmentDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        // Newest submission per user
        vec![index(
            doc! { "user_id": 1, "metadata.created_at": -1 },
            "user_created_index",
        )]
    }
}

impl MutMetadata for AssessmentDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
