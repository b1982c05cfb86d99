//! Journal entry document schema

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::{index, Metadata};

/// Collection name for journal entries
pub const JOURNAL_COLLECTION: &str = "journal_entries";

/// Mood reported alongside a journal entry.
///
/// The six values here are the full catalog the client offers; anything
/// else is rejected at the route boundary.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mood {
    Happy,
    Sad,
    #[default]
    Neutral,
    Anxious,
    Calm,
    Proud,
}

impl Mood {
    /// Parse a mood from its exact wire string
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Happy" => Some(Self::Happy),
            "Sad" => Some(Self::Sad),
            "Neutral" => Some(Self::Neutral),
            "Anxious" => Some(Self::Anxious),
            "Calm" => Some(Self::Calm),
            "Proud" => Some(Self::Proud),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "Happy",
            Self::Sad => "Sad",
            Self::Neutral => "Neutral",
            Self::Anxious => "Anxious",
            Self::Calm => "Calm",
            Self::Proud => "Proud",
        }
    }
}

/// Journal entry stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct JournalEntryDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Owning user
    pub user_id: ObjectId,

    /// Free-form entry text
    pub content: String,

    /// Mood the user picked for this entry
    #[serde(default)]
    pub mood: Mood,

    /// Wordlist sentiment score computed from the content at write time
    #[serde(default)]
    pub sentiment_score: i32,
}

impl JournalEntryDoc {
    /// Create a new journal entry
    pub fn new(user_id: ObjectId, content: String, mood: Mood, sentiment_score: i32) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            user_id,
            content,
            mood,
            sentiment_score,
        }
    }
}

impl IntoIndexes for JournalEntryDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        // Newest-first listing per user
        vec![index(
            doc! { "user_id": 1, "metadata.created_at": -1 },
            "user_created_index",
        )]
    }
}

impl MutMetadata for JournalEntryDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_parse_accepts_catalog() {
        for name in ["Happy", "Sad", "Neutral", "Anxious", "Calm", "Proud"] {
            let mood = Mood::parse(name).unwrap();
            assert_eq!(mood.as_str(), name);
        }
    }

    #[test]
    fn test_mood_parse_rejects_unknown() {
        assert_eq!(Mood::parse("Ecstatic"), None);
        assert_eq!(Mood::parse("happy"), None);
        assert_eq!(Mood::parse(""), None);
    }
}
