//! Helpline document schema
//!
//! Read-only reference data, seeded at startup when the collection is empty.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::{index, Metadata};

/// Collection name for helplines
pub const HELPLINE_COLLECTION: &str = "helplines";

/// Crisis helpline stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct HelplineDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Organization name
    pub name: String,

    /// Phone number(s), as displayed to the user
    pub phone: String,

    /// What the helpline offers
    pub description: String,

    /// Geographic scope (e.g. "India")
    #[serde(default)]
    pub scope: String,
}

impl HelplineDoc {
    /// Create a new helpline entry
    pub fn new(name: &str, phone: &str, description: &str, scope: &str) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            name: name.to_string(),
            phone: phone.to_string(),
            description: description.to_string(),
            scope: scope.to_string(),
        }
    }
}

impl IntoIndexes for HelplineDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        // Scope lookups (e.g. filter by country later)
        vec![index(doc! { "scope": 1 }, "scope_index")]
    }
}

impl MutMetadata for HelplineDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
