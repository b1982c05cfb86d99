//! Shared response plumbing for HTTP route handlers
//!
//! Every route module builds its responses through these helpers so that
//! JSON bodies and CORS headers stay uniform across the API.

use bson::oid::ObjectId;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::http::response::Builder;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::auth::extract_token_from_header;
use crate::server::AppState;
use crate::types::{Result, SteadfastError};

pub type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// Request bodies above this size are rejected outright
const MAX_BODY_BYTES: usize = 10 * 1024;

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.into(),
            code: Some(code.to_string()),
        }
    }
}

/// Generic acknowledgement body
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

// =============================================================================
// Response Helpers
// =============================================================================

/// The browser client calls the API cross-origin, so every response
/// carries the same permissive CORS headers.
fn with_cors(builder: Builder) -> Builder {
    builder
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, DELETE, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
}

/// Build a JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<BoxBody> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());

    with_cors(Response::builder().status(status))
        .header("Content-Type", "application/json")
        .body(boxed(json))
        .unwrap()
}

/// Map a handler error onto the uniform error body
pub fn error_response(err: &SteadfastError) -> Response<BoxBody> {
    json_response(
        err.status_code(),
        &ErrorResponse::new(err.to_string(), err.code()),
    )
}

/// Build a CORS preflight response
pub fn cors_preflight() -> Response<BoxBody> {
    with_cors(Response::builder().status(StatusCode::NO_CONTENT))
        .header("Access-Control-Max-Age", "86400")
        .body(boxed(Bytes::new()))
        .unwrap()
}

fn boxed(data: impl Into<Bytes>) -> BoxBody {
    Full::new(data.into()).map_err(|never| match never {}).boxed()
}

/// Read and deserialize a JSON request body, capped at [`MAX_BODY_BYTES`]
pub async fn parse_json_body<T: for<'de> Deserialize<'de>>(req: Request<Incoming>) -> Result<T> {
    let bytes = req
        .into_body()
        .collect()
        .await
        .map_err(|e| SteadfastError::Http(format!("Failed to read body: {}", e)))?
        .to_bytes();

    if bytes.len() > MAX_BODY_BYTES {
        return Err(SteadfastError::Http("Request body too large".to_string()));
    }

    serde_json::from_slice(&bytes).map_err(|e| SteadfastError::Http(format!("Invalid JSON: {}", e)))
}

/// Extract the Authorization header value from a request
pub fn get_auth_header(req: &Request<Incoming>) -> Option<&str> {
    req.headers()
        .get(hyper::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

// =============================================================================
// Token Guard
// =============================================================================

/// Resolve the bearer token on a request to the calling user's id.
///
/// Every failure becomes an Auth error, which renders as 401 with code
/// AUTH_ERROR.
pub fn require_user(req: &Request<Incoming>, state: &AppState) -> Result<ObjectId> {
    let token = extract_token_from_header(get_auth_header(req))
        .ok_or_else(|| SteadfastError::Auth("No token provided".to_string()))?;

    let claims = state.jwt.verify_token(token)?;

    ObjectId::parse_str(&claims.user_id)
        .map_err(|_| SteadfastError::Auth("Invalid token subject".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_uses_error_status() {
        let err = SteadfastError::NotFound("Entry not found".to_string());
        let resp = error_response(&err);

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()["Content-Type"], "application/json");
        assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "*");
    }

    #[test]
    fn preflight_is_no_content() {
        let resp = cors_preflight();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers()["Access-Control-Max-Age"], "86400");
    }
}
