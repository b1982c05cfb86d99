//! Startup seeding of reference data
//!
//! Helplines and motivational quotes are read-only content the app serves
//! under /api/resources. Seeding is idempotent: each collection is only
//! populated when it is empty, so restarts never duplicate rows.

use bson::doc;
use tracing::info;

use crate::db::mongo::MongoCollection;
use crate::db::schemas::{HelplineDoc, QuoteDoc};
use crate::types::Result;

/// Crisis helplines shown on the emergency screen
fn helpline_seed() -> Vec<HelplineDoc> {
    vec![
        HelplineDoc::new(
            "Vandrevala Foundation",
            "1860-2662-345 / 1800-2333-330",
            "Mental health and crisis intervention helpline",
            "India",
        ),
        HelplineDoc::new(
            "KIRAN Helpline (Govt of India)",
            "1800-599-0019",
            "Mental health rehabilitation helpline",
            "India",
        ),
        HelplineDoc::new(
            "AASRA",
            "09820466726",
            "Suicide prevention and emotional distress helpline",
            "India",
        ),
    ]
}

/// Motivational quotes rotated on the dashboard
fn quote_seed() -> Vec<QuoteDoc> {
    [
        "Recovery is not one and done. It is a lifelong journey that takes place one day, one step at a time.",
        "The goal isn't to be sober. The goal is to love yourself so much you don't need to drink.",
        "One day you will tell your story of how you overcame what you went through and it will be someone else's survival guide.",
        "Recovery is about progress, not perfection.",
        "Your best days are ahead of you.",
        "Believe you can and you're halfway there.",
        "The only way out is through.",
        "Small steps every day lead to big changes.",
        "You are stronger than you think.",
        "Don't let yesterday take up too much of today.",
        "Fall seven times, stand up eight.",
        "The best way to predict the future is to create it.",
        "You don't have to be perfect to start, but you have to start to be perfect.",
        "Hardships often prepare ordinary people for an extraordinary destiny.",
        "It does not matter how slowly you go as long as you do not stop.",
    ]
    .into_iter()
    .map(QuoteDoc::new)
    .collect()
}

/// Seed helplines and quotes if their collections are empty.
///
/// Failures here are reported to the caller but should not stop the
/// server; the resource endpoints just return empty lists until the
/// next successful run.
pub async fn seed_reference_data(
    helplines: &MongoCollection<HelplineDoc>,
    quotes: &MongoCollection<QuoteDoc>,
) -> Result<()> {
    if helplines.count(doc! {}).await? == 0 {
        let inserted = helplines.insert_many(helpline_seed()).await?;
        info!("Seeded {} helplines", inserted);
    } else {
        info!("Helplines already seeded, skipping");
    }

    if quotes.count(doc! {}).await? == 0 {
        let inserted = quotes.insert_many(quote_seed()).await?;
        info!("Seeded {} quotes", inserted);
    } else {
        info!("Quotes already seeded, skipping");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_helpline_seed_is_complete() {
        let helplines = helpline_seed();
        assert_eq!(helplines.len(), 3);

        for helpline in &helplines {
            assert!(!helpline.name.is_empty());
            assert!(!helpline.phone.is_empty());
            assert!(!helpline.description.is_empty());
            assert_eq!(helpline.scope, "India");
        }
    }

    #[test]
    fn test_quote_seed_has_no_duplicates() {
        let quotes = quote_seed();
        assert_eq!(quotes.len(), 15);

        // The unique index on text would reject duplicates at insert time
        let distinct: HashSet<&str> = quotes.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(distinct.len(), quotes.len());
    }
}
