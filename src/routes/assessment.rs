//! Assessment endpoints: intake submission and latest retrieval
//!
//! Submitting an assessment also updates the user's profile: it marks the
//! assessment complete, records the substance, and resets the sobriety
//! start date when the submitted date parses.

use bson::doc;
use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::db::schemas::AssessmentDoc;
use crate::routes::helpers::{
    cors_preflight, error_response, json_response, parse_json_body, require_user, BoxBody,
    ErrorResponse,
};
use crate::server::AppState;
use crate::services::streak::parse_start_date;
use crate::types::{Result, SteadfastError};

/// Assessment submission body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRequest {
    #[serde(default)]
    pub substance: String,
    #[serde(default)]
    pub sobriety_date: String,
    #[serde(default)]
    pub triggers: String,
    #[serde(default)]
    pub support: String,
    #[serde(default)]
    pub goals: String,
}

impl AssessmentRequest {
    /// All five answers are mandatory; name the first one missing
    fn require_complete(&self) -> Result<()> {
        for (field, value) in [
            ("substance", &self.substance),
            ("sobrietyDate", &self.sobriety_date),
            ("triggers", &self.triggers),
            ("support", &self.support),
            ("goals", &self.goals),
        ] {
            if value.trim().is_empty() {
                return Err(SteadfastError::MissingField(field.into()));
            }
        }
        Ok(())
    }
}

/// Assessment as returned to the client
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResponse {
    pub id: String,
    pub substance: String,
    pub sobriety_date: String,
    pub triggers: String,
    pub support: String,
    pub goals: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl AssessmentResponse {
    pub fn from_doc(assessment: &AssessmentDoc) -> Self {
        Self {
            id: assessment._id.map(|id| id.to_hex()).unwrap_or_default(),
            substance: assessment.substance.clone(),
            sobriety_date: assessment.sobriety_date.clone(),
            triggers: assessment.triggers.clone(),
            support: assessment.support.clone(),
            goals: assessment.goals.clone(),
            created_at: assessment
                .metadata
                .created_at
                .map(|d| d.to_chrono().to_rfc3339()),
        }
    }
}

/// POST /api/assessment
async fn submit(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>> {
    let user_id = require_user(&req, &state)?;
    let body: AssessmentRequest = parse_json_body(req).await?;
    body.require_complete()?;

    let mut assessment = AssessmentDoc::new(
        user_id,
        body.substance.clone(),
        body.sobriety_date.clone(),
        body.triggers,
        body.support,
        body.goals,
    );
    assessment._id = Some(state.assessments.insert_one(assessment.clone()).await?);

    // Fold the answers back into the profile
    let mut set = doc! {
        "has_completed_assessment": true,
        "substance_type": &body.substance,
        "metadata.updated_at": bson::DateTime::now(),
    };
    match parse_start_date(&body.sobriety_date) {
        Some(start) => {
            set.insert("sobriety_start_date", bson::DateTime::from_chrono(start));
        }
        None => {
            warn!(
                "Unparseable sobriety date, keeping existing start: {}",
                body.sobriety_date
            );
        }
    }
    state
        .users
        .update_one(doc! { "_id": user_id }, doc! { "$set": set })
        .await?;

    Ok(json_response(
        StatusCode::CREATED,
        &AssessmentResponse::from_doc(&assessment),
    ))
}

/// GET /api/assessment, newest submission
async fn latest(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>> {
    let user_id = require_user(&req, &state)?;

    let submissions = state
        .assessments
        .find_many(
            doc! { "user_id": user_id },
            Some(doc! { "metadata.created_at": -1 }),
        )
        .await?;

    let newest = submissions
        .first()
        .ok_or_else(|| SteadfastError::NotFound("No assessment found".into()))?;
    Ok(json_response(
        StatusCode::OK,
        &AssessmentResponse::from_doc(newest),
    ))
}

/// Handle assessment HTTP requests.
///
/// Returns Some(response) if the request was handled, None if not an
/// assessment route.
pub async fn handle_assessment_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Option<Response<BoxBody>> {
    if !req.uri().path().starts_with("/api/assessment") {
        return None;
    }
    if req.method() == Method::OPTIONS {
        return Some(cors_preflight());
    }

    let path = req.uri().path().to_string();

    let result = match (req.method(), path.as_str()) {
        (&Method::POST, "/api/assessment") => submit(req, state).await,
        (&Method::GET, "/api/assessment") => latest(req, state).await,
        (_, "/api/assessment") => Ok(json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            &ErrorResponse {
                error: "Method not allowed".into(),
                code: None,
            },
        )),
        _ => Err(SteadfastError::NotFound(
            "Assessment endpoint not found".into(),
        )),
    };

    Some(result.unwrap_or_else(|e| {
        warn!("Assessment request failed: {}", e);
        error_response(&e)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_complete_names_missing_field() {
        let body = AssessmentRequest {
            substance: "Alcohol".into(),
            sobriety_date: "2026-01-01".into(),
            triggers: "  ".into(),
            support: "family".into(),
            goals: "stay sober".into(),
        };

        let err = body.require_complete().unwrap_err();
        assert!(err.to_string().contains("triggers"));
        assert_eq!(err.code(), "MISSING_FIELD");
    }

    #[test]
    fn test_require_complete_accepts_filled_form() {
        let body = AssessmentRequest {
            substance: "Alcohol".into(),
            sobriety_date: "2026-01-01".into(),
            triggers: "stress".into(),
            support: "family".into(),
            goals: "stay sober".into(),
        };
        assert!(body.require_complete().is_ok());
    }
}
