//! Resource endpoints: crisis helplines and motivational quotes
//!
//! Read-only reference data seeded at startup. Both endpoints sit behind
//! the same token check as the rest of the API.

use bson::doc;
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::db::schemas::{HelplineDoc, QuoteDoc};
use crate::routes::helpers::{
    cors_preflight, error_response, json_response, require_user, BoxBody, ErrorResponse,
};
use crate::server::AppState;
use crate::types::{Result, SteadfastError};

/// Helpline as returned to the client
#[derive(Debug, Serialize)]
pub struct HelplineResponse {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub description: String,
    pub scope: String,
}

impl HelplineResponse {
    pub fn from_doc(helpline: &HelplineDoc) -> Self {
        Self {
            id: helpline._id.map(|id| id.to_hex()).unwrap_or_default(),
            name: helpline.name.clone(),
            phone: helpline.phone.clone(),
            description: helpline.description.clone(),
            scope: helpline.scope.clone(),
        }
    }
}

/// Quote as returned to the client
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub id: String,
    pub text: String,
}

impl QuoteResponse {
    pub fn from_doc(quote: &QuoteDoc) -> Self {
        Self {
            id: quote._id.map(|id| id.to_hex()).unwrap_or_default(),
            text: quote.text.clone(),
        }
    }
}

/// GET /api/resources/helplines
async fn helplines(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>> {
    require_user(&req, &state)?;

    let rows = state.helplines.find_many(doc! {}, None).await?;
    let body: Vec<HelplineResponse> = rows.iter().map(HelplineResponse::from_doc).collect();
    Ok(json_response(StatusCode::OK, &body))
}

/// GET /api/resources/quotes
async fn quotes(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>> {
    require_user(&req, &state)?;

    let rows = state.quotes.find_many(doc! {}, None).await?;
    let body: Vec<QuoteResponse> = rows.iter().map(QuoteResponse::from_doc).collect();
    Ok(json_response(StatusCode::OK, &body))
}

/// Handle resource HTTP requests.
///
/// Returns Some(response) if the request was handled, None if not a
/// resource route.
pub async fn handle_resources_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Option<Response<BoxBody>> {
    if !req.uri().path().starts_with("/api/resources") {
        return None;
    }
    if req.method() == Method::OPTIONS {
        return Some(cors_preflight());
    }

    let path = req.uri().path().to_string();

    let result = match (req.method(), path.as_str()) {
        (&Method::GET, "/api/resources/helplines") => helplines(req, state).await,
        (&Method::GET, "/api/resources/quotes") => quotes(req, state).await,
        (_, "/api/resources/helplines") | (_, "/api/resources/quotes") => Ok(json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            &ErrorResponse {
                error: "Method not allowed".into(),
                code: None,
            },
        )),
        _ => Err(SteadfastError::NotFound(
            "Resource endpoint not found".into(),
        )),
    };

    Some(result.unwrap_or_else(|e| {
        warn!("Resource request failed: {}", e);
        error_response(&e)
    }))
}
