//! Activity endpoints: log daily events and read today's record
//!
//! Events accumulate into one record per user per UTC day. Logging never
//! returns history; GET always answers for today, with a zeroed record
//! when nothing has been logged yet.

use chrono::Utc;
use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::db::schemas::ActivityDoc;
use crate::routes::helpers::{
    cors_preflight, error_response, json_response, parse_json_body, require_user, BoxBody,
    ErrorResponse,
};
use crate::server::AppState;
use crate::services::activity::{apply_event, today_record, ActivityType};
use crate::services::streak::{day_key, day_start};
use crate::types::{Result, SteadfastError};

/// Activity event request body.
///
/// `value` stays a raw JSON value so a wrong-typed field falls back to
/// the event's default instead of failing the whole request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEventRequest {
    #[serde(default)]
    pub activity_type: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Daily activity record as returned to the client
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub date: String,
    pub water_glasses: i32,
    pub sleep_hours: f64,
    pub meditation_minutes: f64,
    pub exercise_minutes: f64,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
}

impl ActivityResponse {
    pub fn from_doc(record: &ActivityDoc) -> Self {
        Self {
            id: record._id.map(|id| id.to_hex()),
            date: record.date.to_chrono().to_rfc3339(),
            water_glasses: record.water_glasses,
            sleep_hours: record.sleep_hours,
            meditation_minutes: record.meditation_minutes,
            exercise_minutes: record.exercise_minutes,
            check_in_time: record.check_in_time.map(|d| d.to_chrono().to_rfc3339()),
            check_out_time: record.check_out_time.map(|d| d.to_chrono().to_rfc3339()),
        }
    }

    /// Zeroed record for days with no events yet
    pub fn empty_today() -> Self {
        Self {
            id: None,
            date: day_start(day_key(Utc::now())).to_rfc3339(),
            water_glasses: 0,
            sleep_hours: 0.0,
            meditation_minutes: 0.0,
            exercise_minutes: 0.0,
            check_in_time: None,
            check_out_time: None,
        }
    }
}

/// POST /api/activity, logs one event against today
async fn log_event(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>> {
    let user_id = require_user(&req, &state)?;
    let body: ActivityEventRequest = parse_json_body(req).await?;

    if body.activity_type.is_empty() {
        return Err(SteadfastError::MissingField("activityType".into()));
    }
    let event = ActivityType::parse(&body.activity_type)
        .ok_or(SteadfastError::InvalidActivityType(body.activity_type))?;

    let record = apply_event(&state.activities, user_id, event, body.value.as_f64()).await?;
    Ok(json_response(
        StatusCode::OK,
        &ActivityResponse::from_doc(&record),
    ))
}

/// GET /api/activity, today's record (zeroed if nothing logged yet)
async fn today(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>> {
    let user_id = require_user(&req, &state)?;

    let body = match today_record(&state.activities, user_id).await? {
        Some(record) => ActivityResponse::from_doc(&record),
        None => ActivityResponse::empty_today(),
    };
    Ok(json_response(StatusCode::OK, &body))
}

/// Handle activity HTTP requests.
///
/// Returns Some(response) if the request was handled, None if not an
/// activity route.
pub async fn handle_activity_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Option<Response<BoxBody>> {
    if !req.uri().path().starts_with("/api/activity") {
        return None;
    }
    if req.method() == Method::OPTIONS {
        return Some(cors_preflight());
    }

    let path = req.uri().path().to_string();

    let result = match (req.method(), path.as_str()) {
        (&Method::POST, "/api/activity") => log_event(req, state).await,
        (&Method::GET, "/api/activity") => today(req, state).await,
        (_, "/api/activity") => Ok(json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            &ErrorResponse {
                error: "Method not allowed".into(),
                code: None,
            },
        )),
        _ => Err(SteadfastError::NotFound(
            "Activity endpoint not found".into(),
        )),
    };

    Some(result.unwrap_or_else(|e| {
        warn!("Activity request failed: {}", e);
        error_response(&e)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_today_serializes_zeroes_and_nulls() {
        let json = serde_json::to_value(ActivityResponse::empty_today()).unwrap();

        assert_eq!(json["waterGlasses"], 0);
        assert_eq!(json["sleepHours"], 0.0);
        assert!(json["checkInTime"].is_null());
        assert!(json["checkOutTime"].is_null());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_event_value_tolerates_wrong_types() {
        let body: ActivityEventRequest =
            serde_json::from_str(r#"{"activityType": "water", "value": "three"}"#).unwrap();
        assert_eq!(body.activity_type, "water");
        assert!(body.value.as_f64().is_none());

        let body: ActivityEventRequest =
            serde_json::from_str(r#"{"activityType": "sleep", "value": 7.5}"#).unwrap();
        assert_eq!(body.value.as_f64(), Some(7.5));
    }
}
