//! Dashboard endpoint: streak, milestones, and profile in one response

use bson::doc;
use chrono::Utc;
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::routes::auth_routes::ContactResponse;
use crate::routes::helpers::{
    cors_preflight, error_response, json_response, require_user, BoxBody, ErrorResponse,
};
use crate::server::AppState;
use crate::services::streak::{achieved_milestones, day_key, sober_days, Milestone};
use crate::types::{Result, SteadfastError};

/// Everything the dashboard screen needs in one response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub sober_days: i64,
    pub milestones: Vec<Milestone>,
    pub user: DashboardUser,
}

/// Profile slice shown on the dashboard
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardUser {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sobriety_start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substance_type: Option<String>,
    pub emergency_contacts: Vec<ContactResponse>,
}

/// GET /api/dashboard
async fn dashboard(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>> {
    let user_id = require_user(&req, &state)?;

    let user = state
        .users
        .find_one(doc! { "_id": user_id })
        .await?
        .ok_or_else(|| SteadfastError::NotFound("User not found".into()))?;

    // No start date yet means day zero, not an error
    let days = match user.sobriety_start_date {
        Some(start) => sober_days(day_key(start.to_chrono()), Utc::now()),
        None => 0,
    };

    let body = DashboardResponse {
        sober_days: days,
        milestones: achieved_milestones(days),
        user: DashboardUser {
            name: user.name.clone(),
            email: user.email.clone(),
            sobriety_start_date: user.sobriety_start_date.map(|d| d.to_chrono().to_rfc3339()),
            substance_type: user.substance_type.clone(),
            emergency_contacts: user
                .emergency_contacts
                .iter()
                .map(ContactResponse::from_contact)
                .collect(),
        },
    };
    Ok(json_response(StatusCode::OK, &body))
}

/// Handle dashboard HTTP requests.
///
/// Returns Some(response) if the request was handled, None if not a
/// dashboard route.
pub async fn handle_dashboard_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Option<Response<BoxBody>> {
    if !req.uri().path().starts_with("/api/dashboard") {
        return None;
    }
    if req.method() == Method::OPTIONS {
        return Some(cors_preflight());
    }

    let path = req.uri().path().to_string();

    let result = match (req.method(), path.as_str()) {
        (&Method::GET, "/api/dashboard") => dashboard(req, state).await,
        (_, "/api/dashboard") => Ok(json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            &ErrorResponse {
                error: "Method not allowed".into(),
                code: None,
            },
        )),
        _ => Err(SteadfastError::NotFound(
            "Dashboard endpoint not found".into(),
        )),
    };

    Some(result.unwrap_or_else(|e| {
        warn!("Dashboard request failed: {}", e);
        error_response(&e)
    }))
}
