//! Motivational quote document schema
//!
//! Read-only reference data, seeded at startup when the collection is empty.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::{unique_index, Metadata};

/// Collection name for quotes
pub const QUOTE_COLLECTION: &str = "quotes";

/// Motivational quote stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct QuoteDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Quote text (unique)
    pub text: String,
}

impl QuoteDoc {
    /// Create a new quote entry
    pub fn new(text: &str) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            text: text.to_string(),
        }
    }
}

impl IntoIndexes for QuoteDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        // Dedupe on exact text so reseeding cannot double-insert
        vec![unique_index(doc! { "text": 1 }, "text_unique")]
    }
}

impl MutMetadata for QuoteDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
