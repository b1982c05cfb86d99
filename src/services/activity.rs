//! Daily activity event dispatch
//!
//! Each POST /api/activity event mutates one field of today's record via
//! a single atomic upsert, so the first event of a day creates the record
//! and concurrent events never clobber each other.

use bson::{doc, oid::ObjectId, Document};
use chrono::Utc;

use crate::db::mongo::MongoCollection;
use crate::db::schemas::ActivityDoc;
use crate::services::streak::{day_key, day_start};
use crate::types::{Result, SteadfastError};

/// Activity event types accepted on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityType {
    Water,
    Sleep,
    Meditation,
    Exercise,
    CheckIn,
    CheckOut,
}

impl ActivityType {
    /// Parse a wire name, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "water" => Some(Self::Water),
            "sleep" => Some(Self::Sleep),
            "meditation" => Some(Self::Meditation),
            "exercise" => Some(Self::Exercise),
            "checkin" => Some(Self::CheckIn),
            "checkout" => Some(Self::CheckOut),
            _ => None,
        }
    }
}

/// Clamp an optional gauge value: anything missing or negative falls
/// back to the event's default.
fn gauge(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v >= 0.0 => v,
        _ => default,
    }
}

/// Build the upsert update document for one activity event.
///
/// A field may appear under only one update operator, so $setOnInsert
/// seeds exactly the fields the event itself does not touch.
pub fn update_document(
    event: ActivityType,
    value: Option<f64>,
    user_id: ObjectId,
    day: bson::DateTime,
    now: bson::DateTime,
) -> Document {
    let mut set = doc! { "metadata.updated_at": now };
    let mut set_on_insert = doc! {
        "user_id": user_id,
        "date": day,
        "metadata.is_deleted": false,
        "metadata.created_at": now,
    };
    let mut inc = Document::new();

    match event {
        ActivityType::Water => {
            inc.insert("water_glasses", 1_i32);
        }
        ActivityType::Sleep => {
            set.insert("sleep_hours", gauge(value, 8.0));
        }
        ActivityType::Meditation => {
            set.insert("meditation_minutes", gauge(value, 10.0));
        }
        ActivityType::Exercise => {
            set.insert("exercise_minutes", gauge(value, 30.0));
        }
        ActivityType::CheckIn => {
            set.insert("check_in_time", now);
        }
        ActivityType::CheckOut => {
            set.insert("check_out_time", now);
        }
    }

    // Insert-time defaults for the counters this event leaves alone
    if event != ActivityType::Water {
        set_on_insert.insert("water_glasses", 0_i32);
    }
    if event != ActivityType::Sleep {
        set_on_insert.insert("sleep_hours", 0.0);
    }
    if event != ActivityType::Meditation {
        set_on_insert.insert("meditation_minutes", 0.0);
    }
    if event != ActivityType::Exercise {
        set_on_insert.insert("exercise_minutes", 0.0);
    }

    let mut update = doc! {
        "$set": set,
        "$setOnInsert": set_on_insert,
    };
    if !inc.is_empty() {
        update.insert("$inc", inc);
    }

    update
}

/// Apply one activity event to today's record, creating it on first use
pub async fn apply_event(
    activities: &MongoCollection<ActivityDoc>,
    user_id: ObjectId,
    event: ActivityType,
    value: Option<f64>,
) -> Result<ActivityDoc> {
    let now = Utc::now();
    let day = bson::DateTime::from_chrono(day_start(day_key(now)));
    let stamp = bson::DateTime::from_chrono(now);

    let filter = doc! { "user_id": user_id, "date": day };
    let update = update_document(event, value, user_id, day, stamp);

    activities
        .upsert_one(filter, update)
        .await?
        .ok_or_else(|| SteadfastError::Internal("Activity upsert returned no document".to_string()))
}

/// Fetch today's record for a user, if one exists yet
pub async fn today_record(
    activities: &MongoCollection<ActivityDoc>,
    user_id: ObjectId,
) -> Result<Option<ActivityDoc>> {
    let day = bson::DateTime::from_chrono(day_start(day_key(Utc::now())));
    activities
        .find_one(doc! { "user_id": user_id, "date": day })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL_EVENTS: [ActivityType; 6] = [
        ActivityType::Water,
        ActivityType::Sleep,
        ActivityType::Meditation,
        ActivityType::Exercise,
        ActivityType::CheckIn,
        ActivityType::CheckOut,
    ];

    fn build(event: ActivityType, value: Option<f64>) -> Document {
        update_document(
            event,
            value,
            ObjectId::new(),
            bson::DateTime::from_millis(1_700_000_000_000),
            bson::DateTime::from_millis(1_700_000_050_000),
        )
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(ActivityType::parse("water"), Some(ActivityType::Water));
        assert_eq!(ActivityType::parse("WATER"), Some(ActivityType::Water));
        assert_eq!(ActivityType::parse("Sleep"), Some(ActivityType::Sleep));
        assert_eq!(ActivityType::parse("checkIn"), Some(ActivityType::CheckIn));
        assert_eq!(ActivityType::parse("checkOut"), Some(ActivityType::CheckOut));
        assert_eq!(ActivityType::parse("running"), None);
        assert_eq!(ActivityType::parse(""), None);
    }

    #[test]
    fn test_water_increments_instead_of_setting() {
        let update = build(ActivityType::Water, None);

        let inc = update.get_document("$inc").unwrap();
        assert_eq!(inc.get_i32("water_glasses").unwrap(), 1);

        // The incremented counter must not be seeded on insert
        let on_insert = update.get_document("$setOnInsert").unwrap();
        assert!(!on_insert.contains_key("water_glasses"));
        assert_eq!(on_insert.get_f64("sleep_hours").unwrap(), 0.0);
        assert_eq!(on_insert.get_f64("meditation_minutes").unwrap(), 0.0);
        assert_eq!(on_insert.get_f64("exercise_minutes").unwrap(), 0.0);
    }

    #[test]
    fn test_sleep_uses_value_when_valid() {
        let update = build(ActivityType::Sleep, Some(7.5));
        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_f64("sleep_hours").unwrap(), 7.5);
    }

    #[test]
    fn test_gauges_fall_back_to_defaults() {
        // Missing value
        let update = build(ActivityType::Sleep, None);
        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_f64("sleep_hours").unwrap(), 8.0);

        // Negative value
        let update = build(ActivityType::Sleep, Some(-1.0));
        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_f64("sleep_hours").unwrap(), 8.0);

        let update = build(ActivityType::Meditation, None);
        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_f64("meditation_minutes").unwrap(), 10.0);

        let update = build(ActivityType::Exercise, None);
        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_f64("exercise_minutes").unwrap(), 30.0);
    }

    #[test]
    fn test_zero_is_a_valid_gauge_value() {
        let update = build(ActivityType::Sleep, Some(0.0));
        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_f64("sleep_hours").unwrap(), 0.0);
    }

    #[test]
    fn test_check_in_sets_timestamp_and_seeds_all_counters() {
        let update = build(ActivityType::CheckIn, None);

        let set = update.get_document("$set").unwrap();
        assert!(set.contains_key("check_in_time"));

        let on_insert = update.get_document("$setOnInsert").unwrap();
        for field in [
            "water_glasses",
            "sleep_hours",
            "meditation_minutes",
            "exercise_minutes",
        ] {
            assert!(on_insert.contains_key(field), "missing {}", field);
        }

        // Check-out stays unset until its own event
        assert!(!on_insert.contains_key("check_out_time"));
        assert!(!set.contains_key("check_out_time"));
    }

    #[test]
    fn test_operators_never_share_a_field() {
        for event in ALL_EVENTS {
            let update = build(event, Some(5.0));
            let mut seen = HashSet::new();

            for operator in ["$set", "$setOnInsert", "$inc"] {
                if let Ok(section) = update.get_document(operator) {
                    for key in section.keys() {
                        assert!(
                            seen.insert(key.clone()),
                            "{} appears twice for {:?}",
                            key,
                            event
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_every_event_stamps_updated_at() {
        for event in ALL_EVENTS {
            let update = build(event, None);
            let set = update.get_document("$set").unwrap();
            assert!(set.contains_key("metadata.updated_at"));

            let on_insert = update.get_document("$setOnInsert").unwrap();
            assert!(on_insert.contains_key("metadata.created_at"));
        }
    }
}
