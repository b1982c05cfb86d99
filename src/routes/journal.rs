//! Journal endpoints: write entries, list them, fetch a single one
//!
//! Entries are scored for sentiment at write time and always returned
//! newest first. Every entry belongs to exactly one user; reading someone
//! else's entry is a 403 even when the id is valid.

use bson::{doc, oid::ObjectId};
use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::db::schemas::{JournalEntryDoc, Mood};
use crate::routes::helpers::{
    cors_preflight, error_response, json_response, parse_json_body, require_user, BoxBody,
    ErrorResponse,
};
use crate::server::AppState;
use crate::services::sentiment;
use crate::types::{Result, SteadfastError};

/// Journal entry request body
#[derive(Debug, Deserialize)]
pub struct JournalRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub mood: String,
}

/// Journal entry as returned to the client
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryResponse {
    pub id: String,
    pub content: String,
    pub mood: &'static str,
    pub sentiment_score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl JournalEntryResponse {
    pub fn from_doc(entry: &JournalEntryDoc) -> Self {
        Self {
            id: entry._id.map(|id| id.to_hex()).unwrap_or_default(),
            content: entry.content.clone(),
            mood: entry.mood.as_str(),
            sentiment_score: entry.sentiment_score,
            created_at: entry
                .metadata
                .created_at
                .map(|d| d.to_chrono().to_rfc3339()),
        }
    }
}

/// POST /api/journal
async fn create_entry(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>> {
    let user_id = require_user(&req, &state)?;
    let body: JournalRequest = parse_json_body(req).await?;

    if body.content.trim().is_empty() {
        return Err(SteadfastError::MissingField("content".into()));
    }
    if body.mood.is_empty() {
        return Err(SteadfastError::MissingField("mood".into()));
    }
    let mood =
        Mood::parse(&body.mood).ok_or_else(|| SteadfastError::InvalidMood(body.mood.clone()))?;

    let score = sentiment::score(&body.content);
    let mut entry = JournalEntryDoc::new(user_id, body.content, mood, score);
    entry._id = Some(state.journal.insert_one(entry.clone()).await?);

    Ok(json_response(
        StatusCode::CREATED,
        &JournalEntryResponse::from_doc(&entry),
    ))
}

/// GET /api/journal, newest first
async fn list_entries(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>> {
    let user_id = require_user(&req, &state)?;

    let entries = state
        .journal
        .find_many(
            doc! { "user_id": user_id },
            Some(doc! { "metadata.created_at": -1 }),
        )
        .await?;

    let body: Vec<JournalEntryResponse> =
        entries.iter().map(JournalEntryResponse::from_doc).collect();
    Ok(json_response(StatusCode::OK, &body))
}

/// GET /api/journal/{id}
async fn get_entry(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    entry_id: &str,
) -> Result<Response<BoxBody>> {
    let user_id = require_user(&req, &state)?;
    let entry_oid = ObjectId::parse_str(entry_id)?;

    let entry = state
        .journal
        .find_one(doc! { "_id": entry_oid })
        .await?
        .ok_or_else(|| SteadfastError::NotFound("Journal entry not found".into()))?;

    if entry.user_id != user_id {
        return Err(SteadfastError::Forbidden(
            "Not authorized to view this entry".into(),
        ));
    }

    Ok(json_response(
        StatusCode::OK,
        &JournalEntryResponse::from_doc(&entry),
    ))
}

/// Handle journal HTTP requests.
///
/// Returns Some(response) if the request was handled, None if not a
/// journal route.
pub async fn handle_journal_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Option<Response<BoxBody>> {
    if !req.uri().path().starts_with("/api/journal") {
        return None;
    }
    if req.method() == Method::OPTIONS {
        return Some(cors_preflight());
    }

    let path = req.uri().path().to_string();

    let result = match (req.method(), path.as_str()) {
        (&Method::POST, "/api/journal") => create_entry(req, state).await,
        (&Method::GET, "/api/journal") => list_entries(req, state).await,
        (&Method::GET, p) if p.starts_with("/api/journal/") => {
            let entry_id = p.trim_start_matches("/api/journal/").to_string();
            get_entry(req, state, &entry_id).await
        }
        (_, "/api/journal") => Ok(json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            &ErrorResponse {
                error: "Method not allowed".into(),
                code: None,
            },
        )),
        _ => Err(SteadfastError::NotFound("Journal endpoint not found".into())),
    };

    Some(result.unwrap_or_else(|e| {
        warn!("Journal request failed: {}", e);
        error_response(&e)
    }))
}
