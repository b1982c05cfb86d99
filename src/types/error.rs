//! Error types for Steadfast
//!
//! Every handler funnels failures through [`SteadfastError`] so that HTTP
//! status and machine-readable code are decided in exactly one place.

use hyper::StatusCode;

/// Main error type for Steadfast operations
#[derive(Debug, thiserror::Error)]
pub enum SteadfastError {
    // Request validation
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid activity type: {0}")]
    InvalidActivityType(String),

    #[error("Unknown mood: {0}")]
    InvalidMood(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("HTTP error: {0}")]
    Http(String),

    // Authentication and access control
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // Infrastructure
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SteadfastError {
    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingField(_)
            | Self::InvalidActivityType(_)
            | Self::InvalidMood(_)
            | Self::BadRequest(_)
            | Self::Http(_) => StatusCode::BAD_REQUEST,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Serialization(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable code included in error response bodies.
    ///
    /// Clients branch on these, so they must never change once shipped.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidActivityType(_) => "INVALID_ACTIVITY_TYPE",
            Self::InvalidMood(_) => "INVALID_MOOD",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Http(_) => "HTTP_ERROR",
            Self::Auth(_) => "AUTH_ERROR",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DB_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

// Conversions from library error types

impl From<std::io::Error> for SteadfastError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for SteadfastError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest(format!("Invalid JSON: {}", err))
    }
}

impl From<hyper::Error> for SteadfastError {
    fn from(err: hyper::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<mongodb::error::Error> for SteadfastError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<bson::ser::Error> for SteadfastError {
    fn from(err: bson::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<bson::de::Error> for SteadfastError {
    fn from(err: bson::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<bson::oid::Error> for SteadfastError {
    fn from(_: bson::oid::Error) -> Self {
        Self::BadRequest("Invalid id format".to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for SteadfastError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Auth(format!("JWT error: {}", err))
    }
}

/// Result type alias for Steadfast operations
pub type Result<T> = std::result::Result<T, SteadfastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_400() {
        let missing = SteadfastError::MissingField("content".to_string());
        assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(missing.code(), "MISSING_FIELD");

        let activity = SteadfastError::InvalidActivityType("jogging".to_string());
        assert_eq!(activity.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(activity.code(), "INVALID_ACTIVITY_TYPE");
    }

    #[test]
    fn auth_failures_are_unauthorized() {
        let err = SteadfastError::Auth("Token has expired".to_string());
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.code(), "AUTH_ERROR");
    }

    #[test]
    fn database_failures_are_service_unavailable() {
        let err = SteadfastError::Database("connection reset".to_string());
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.code(), "DB_ERROR");
    }

    #[test]
    fn malformed_object_id_becomes_bad_request() {
        let parse_err = bson::oid::ObjectId::parse_str("not-an-id").unwrap_err();
        let err = SteadfastError::from(parse_err);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
