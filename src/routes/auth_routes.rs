//! Account endpoints: signup, login, logout, profile, emergency contacts
//!
//! Signup and login issue a JWT carrying the user's id and email; the
//! other endpoints resolve the caller through that token. Login failures
//! deliberately return the same body for unknown emails and wrong
//! passwords so account existence can't be probed.

use bson::{doc, oid::ObjectId};
use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{hash_password, verify_password};
use crate::db::schemas::{EmergencyContact, UserDoc};
use crate::routes::helpers::{
    cors_preflight, error_response, json_response, parse_json_body, require_user, BoxBody,
    ErrorResponse, SuccessResponse,
};
use crate::server::AppState;
use crate::services::streak::parse_start_date;
use crate::types::{Result, SteadfastError};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Signup request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Sobriety start as a bare date or RFC 3339 timestamp
    #[serde(default)]
    pub sobriety_start_date: Option<String>,
    #[serde(default)]
    pub substance_type: Option<String>,
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Emergency contact request body
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub relation: String,
    #[serde(default)]
    pub phone: String,
}

/// Token plus profile, returned by signup and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Public view of a user account
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sobriety_start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substance_type: Option<String>,
    pub has_completed_assessment: bool,
    pub emergency_contacts: Vec<ContactResponse>,
}

impl UserProfile {
    pub fn from_doc(user: &UserDoc) -> Self {
        Self {
            id: user._id.map(|id| id.to_hex()).unwrap_or_default(),
            name: user.name.clone(),
            email: user.email.clone(),
            sobriety_start_date: user.sobriety_start_date.map(|d| d.to_chrono().to_rfc3339()),
            substance_type: user.substance_type.clone(),
            has_completed_assessment: user.has_completed_assessment,
            emergency_contacts: user
                .emergency_contacts
                .iter()
                .map(ContactResponse::from_contact)
                .collect(),
        }
    }
}

/// Single emergency contact in responses
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub id: String,
    pub name: String,
    pub relation: String,
    pub phone: String,
}

impl ContactResponse {
    pub fn from_contact(contact: &EmergencyContact) -> Self {
        Self {
            id: contact.id.to_hex(),
            name: contact.name.clone(),
            relation: contact.relation.clone(),
            phone: contact.phone.clone(),
        }
    }
}

/// Contact list, returned after contact mutations
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactListResponse {
    pub emergency_contacts: Vec<ContactResponse>,
}

// =============================================================================
// Account Handlers
// =============================================================================

/// Reject the request naming the first empty field
fn require_fields(fields: &[(&str, &str)]) -> Result<()> {
    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(SteadfastError::MissingField((*name).to_string()));
        }
    }
    Ok(())
}

/// The one body both signup paths return when the email is taken
fn user_exists() -> Response<BoxBody> {
    json_response(
        StatusCode::BAD_REQUEST,
        &ErrorResponse::new("User already exists", "USER_EXISTS"),
    )
}

/// Identical body for unknown email and wrong password
fn invalid_credentials() -> Response<BoxBody> {
    json_response(
        StatusCode::UNAUTHORIZED,
        &ErrorResponse::new("Invalid credentials", "INVALID_CREDENTIALS"),
    )
}

fn is_duplicate_key(err: &SteadfastError) -> bool {
    let text = err.to_string();
    text.contains("duplicate key") || text.contains("E11000")
}

/// POST /api/users/signup
async fn signup(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>> {
    let body: SignupRequest = parse_json_body(req).await?;

    require_fields(&[("name", &body.name), ("email", &body.email)])?;
    if body.password.is_empty() {
        return Err(SteadfastError::MissingField("password".into()));
    }

    let email = body.email.trim().to_lowercase();

    // Check first so the common case gets a clean error; the unique index
    // on email is the backstop for races
    if state.users.find_one(doc! { "email": &email }).await?.is_some() {
        return Ok(user_exists());
    }

    let password_hash = hash_password(&body.password)?;

    // Unparseable dates are treated as absent; the assessment can set
    // the start date later
    let start_date = body
        .sobriety_start_date
        .as_deref()
        .and_then(parse_start_date)
        .map(bson::DateTime::from_chrono);

    let mut user = UserDoc::new(
        body.name.trim().to_string(),
        email,
        password_hash,
        start_date,
        body.substance_type.clone(),
    );

    match state.users.insert_one(user.clone()).await {
        Ok(id) => user._id = Some(id),
        Err(e) if is_duplicate_key(&e) => return Ok(user_exists()),
        Err(e) => return Err(e),
    }

    info!("New signup: {}", user.email);
    generate_auth_response(&state, &user, StatusCode::CREATED)
}

/// POST /api/users/login
async fn login(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>> {
    let body: LoginRequest = parse_json_body(req).await?;

    require_fields(&[("email", &body.email)])?;
    if body.password.is_empty() {
        return Err(SteadfastError::MissingField("password".into()));
    }

    let email = body.email.trim().to_lowercase();

    let user = match state.users.find_one(doc! { "email": &email }).await? {
        Some(user) => user,
        None => {
            warn!("Login failed for unknown email: {}", email);
            return Ok(invalid_credentials());
        }
    };

    if !verify_password(&body.password, &user.password_hash)? {
        warn!("Login failed for {}: wrong password", email);
        return Ok(invalid_credentials());
    }

    info!("Login: {}", user.email);
    generate_auth_response(&state, &user, StatusCode::OK)
}

/// POST /api/users/logout
///
/// Tokens are not tracked server side; the client drops its copy and
/// expiry handles the rest.
async fn logout(
    _req: Request<hyper::body::Incoming>,
    _state: Arc<AppState>,
) -> Result<Response<BoxBody>> {
    Ok(json_response(
        StatusCode::OK,
        &SuccessResponse {
            success: true,
            message: "Logged out successfully".to_string(),
        },
    ))
}

/// GET /api/users/me
async fn me(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>> {
    let user_id = require_user(&req, &state)?;

    let user = state
        .users
        .find_one(doc! { "_id": user_id })
        .await?
        .ok_or_else(|| SteadfastError::NotFound("User not found".into()))?;

    Ok(json_response(StatusCode::OK, &UserProfile::from_doc(&user)))
}

// =============================================================================
// Emergency Contact Handlers
// =============================================================================

/// POST /api/users/me/contacts
async fn add_contact(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>> {
    let user_id = require_user(&req, &state)?;
    let body: ContactRequest = parse_json_body(req).await?;

    require_fields(&[
        ("name", &body.name),
        ("relation", &body.relation),
        ("phone", &body.phone),
    ])?;

    let contact = EmergencyContact::new(
        body.name.trim().to_string(),
        body.relation.trim().to_string(),
        body.phone.trim().to_string(),
    );
    let contact_bson = bson::to_bson(&contact)?;

    let update = doc! {
        "$push": { "emergency_contacts": contact_bson },
        "$set": { "metadata.updated_at": bson::DateTime::now() },
    };
    state
        .users
        .update_one(doc! { "_id": user_id }, update)
        .await?;

    contact_list_response(&state, user_id, StatusCode::CREATED).await
}

/// DELETE /api/users/me/contacts/{id}
async fn remove_contact(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    contact_id: &str,
) -> Result<Response<BoxBody>> {
    let user_id = require_user(&req, &state)?;
    let contact_oid = ObjectId::parse_str(contact_id)?;

    // Pulling an id that isn't in the list is a no-op; the response is
    // the current list either way
    let update = doc! {
        "$pull": { "emergency_contacts": { "id": contact_oid } },
        "$set": { "metadata.updated_at": bson::DateTime::now() },
    };
    state
        .users
        .update_one(doc! { "_id": user_id }, update)
        .await?;

    contact_list_response(&state, user_id, StatusCode::OK).await
}

/// Fetch the caller's contact list after a mutation
async fn contact_list_response(
    state: &AppState,
    user_id: ObjectId,
    status: StatusCode,
) -> Result<Response<BoxBody>> {
    let user = state
        .users
        .find_one(doc! { "_id": user_id })
        .await?
        .ok_or_else(|| SteadfastError::NotFound("User not found".into()))?;

    Ok(json_response(
        status,
        &ContactListResponse {
            emergency_contacts: user
                .emergency_contacts
                .iter()
                .map(ContactResponse::from_contact)
                .collect(),
        },
    ))
}

/// Issue a JWT for the user and wrap it with their profile
fn generate_auth_response(
    state: &AppState,
    user: &UserDoc,
    status: StatusCode,
) -> Result<Response<BoxBody>> {
    let profile = UserProfile::from_doc(user);
    let token = state.jwt.generate_token(&profile.id, &profile.email)?;

    Ok(json_response(
        status,
        &AuthResponse {
            token,
            user: profile,
        },
    ))
}

// =============================================================================
// Route Dispatcher
// =============================================================================

/// Handle account-related HTTP requests.
///
/// Returns Some(response) if the request was handled, None if not a user
/// route.
pub async fn handle_user_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Option<Response<BoxBody>> {
    if !req.uri().path().starts_with("/api/users") {
        return None;
    }
    if req.method() == Method::OPTIONS {
        return Some(cors_preflight());
    }

    let path = req.uri().path().to_string();

    let result = match (req.method(), path.as_str()) {
        (&Method::POST, "/api/users/signup") => signup(req, state).await,
        (&Method::POST, "/api/users/login") => login(req, state).await,
        (&Method::POST, "/api/users/logout") => logout(req, state).await,
        (&Method::GET, "/api/users/me") => me(req, state).await,

        // Emergency contacts
        (&Method::POST, "/api/users/me/contacts") => add_contact(req, state).await,
        (&Method::DELETE, p) if p.starts_with("/api/users/me/contacts/") => {
            let contact_id = p.trim_start_matches("/api/users/me/contacts/").to_string();
            remove_contact(req, state, &contact_id).await
        }

        (_, "/api/users/signup")
        | (_, "/api/users/login")
        | (_, "/api/users/logout")
        | (_, "/api/users/me")
        | (_, "/api/users/me/contacts") => Ok(json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            &ErrorResponse {
                error: "Method not allowed".into(),
                code: None,
            },
        )),

        _ => Err(SteadfastError::NotFound("User endpoint not found".into())),
    };

    Some(result.unwrap_or_else(|e| {
        warn!("User request failed: {}", e);
        error_response(&e)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_fields_flags_first_empty() {
        let err = require_fields(&[("name", "Asha"), ("email", " ")]).unwrap_err();
        assert!(err.to_string().contains("email"));
        assert_eq!(err.code(), "MISSING_FIELD");

        assert!(require_fields(&[("name", "Asha"), ("email", "a@b.c")]).is_ok());
    }

    #[test]
    fn test_duplicate_key_detection() {
        let dup = SteadfastError::Database(
            "E11000 duplicate key error collection: steadfast.users".into(),
        );
        assert!(is_duplicate_key(&dup));

        let other = SteadfastError::Database("connection closed".into());
        assert!(!is_duplicate_key(&other));
    }
}
