//! User account document schema
//!
//! Stores account credentials, the sobriety profile, and emergency contacts.

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::{unique_index, Metadata};

/// Collection holding user accounts
pub const USER_COLLECTION: &str = "users";

/// Emergency contact embedded in the user document
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EmergencyContact {
    /// Stable ID so individual contacts can be removed later
    pub id: ObjectId,

    pub name: String,

    /// Relationship to the user (e.g. "Sponsor", "Sister")
    pub relation: String,

    pub phone: String,
}

impl EmergencyContact {
    /// Create a new contact with a fresh ID
    pub fn new(name: String, relation: String, phone: String) -> Self {
        Self {
            id: ObjectId::new(),
            name,
            relation,
            phone,
        }
    }
}

/// User account stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UserDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Lifecycle timestamps and soft-delete flag
    #[serde(default)]
    pub metadata: Metadata,

    /// Name shown in the app
    pub name: String,

    /// Login email, stored lowercase (unique)
    pub email: String,

    /// Argon2 PHC string for the password
    pub password_hash: String,

    /// Start of the current sobriety streak.
    /// Defaults to the account creation instant at signup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sobriety_start_date: Option<DateTime>,

    /// What the user is recovering from (e.g. "Alcohol")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substance_type: Option<String>,

    /// Whether the intake assessment has been submitted
    #[serde(default)]
    pub has_completed_assessment: bool,

    /// Emergency contacts, newest last
    #[serde(default)]
    pub emergency_contacts: Vec<EmergencyContact>,
}

impl UserDoc {
    /// Create a new user document.
    ///
    /// The caller normalizes the email; a missing sobriety start date
    /// falls back to now so new accounts start a streak immediately.
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        sobriety_start_date: Option<DateTime>,
        substance_type: Option<String>,
    ) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            name,
            email,
            password_hash,
            sobriety_start_date: Some(sobriety_start_date.unwrap_or_else(DateTime::now)),
            substance_type,
            has_completed_assessment: false,
            emergency_contacts: Vec::new(),
        }
    }
}

impl IntoIndexes for UserDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![unique_index(doc! { "email": 1 }, "email_unique")]
    }
}

impl MutMetadata for UserDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
