//! JWT issue and verification
//!
//! Tokens are HS256-signed and carry the user id and email. They are
//! issued at signup and login and checked on every protected route.
//! Outside dev mode the signing secret must come from configuration and
//! be at least [`MIN_SECRET_LEN`] characters.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::{Result, SteadfastError};

/// Minimum accepted signing secret length
pub const MIN_SECRET_LEN: usize = 32;

/// Well-known secret for dev mode only
const DEV_SECRET: &str = "dev-mode-secret-not-for-production-use-123456";

/// Dev mode token lifetime (7 days, matching the production default)
const DEV_TOKEN_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Payload carried in every token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User document ID (ObjectId hex string)
    pub user_id: String,
    /// User email at issue time
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Issues and verifies tokens with a single shared secret
#[derive(Clone)]
pub struct JwtValidator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_seconds: u64,
}

impl JwtValidator {
    /// Build a validator from a configured secret
    pub fn new(secret: &str, expiry_seconds: u64) -> Result<Self> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(SteadfastError::Config(format!(
                "JWT_SECRET must be at least {} characters",
                MIN_SECRET_LEN
            )));
        }
        Ok(Self::from_secret(secret, expiry_seconds))
    }

    /// Validator with a fixed well-known secret, for dev mode only
    pub fn new_dev() -> Self {
        Self::from_secret(DEV_SECRET, DEV_TOKEN_TTL_SECONDS)
    }

    fn from_secret(secret: &str, expiry_seconds: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_seconds,
        }
    }

    /// Sign a token for an authenticated user
    pub fn generate_token(&self, user_id: &str, email: &str) -> Result<String> {
        let iat = unix_now()?;
        let claims = Claims {
            user_id: user_id.to_string(),
            email: email.to_string(),
            iat,
            exp: iat + self.expiry_seconds,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| SteadfastError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verify a token and return its claims.
    ///
    /// Failures collapse to a few fixed messages so responses never leak
    /// parser detail to the client.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|err| {
                use jsonwebtoken::errors::ErrorKind;
                let reason = match err.kind() {
                    ErrorKind::ExpiredSignature => "Token expired",
                    ErrorKind::InvalidSignature => "Invalid signature",
                    ErrorKind::InvalidToken => "Invalid token",
                    _ => "Token validation failed",
                };
                SteadfastError::Auth(reason.to_string())
            })
    }
}

fn unix_now() -> Result<u64> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| SteadfastError::Internal(format!("System clock error: {}", e)))?;
    Ok(now.as_secs())
}

/// Pull the token out of an Authorization header value.
///
/// Accepts "Bearer <token>" and, for older clients, a bare token. Any
/// other scheme is ignored.
pub fn extract_token_from_header(header: Option<&str>) -> Option<&str> {
    let value = header?;
    let token = if let Some(rest) = value.strip_prefix("Bearer ") {
        rest.trim()
    } else if value.contains(' ') {
        return None;
    } else {
        value.trim()
    };
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret-with-enough-length-0123";

    fn validator() -> JwtValidator {
        JwtValidator::new(SECRET, 3600).unwrap()
    }

    #[test]
    fn round_trips_claims() {
        let v = validator();
        let token = v
            .generate_token("64b5f0a1c2d3e4f5a6b7c8d9", "sam@example.com")
            .unwrap();

        let claims = v.verify_token(&token).unwrap();
        assert_eq!(claims.user_id, "64b5f0a1c2d3e4f5a6b7c8d9");
        assert_eq!(claims.email, "sam@example.com");
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn rejects_garbage() {
        assert!(validator().verify_token("not.a.jwt").is_err());
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let other = JwtValidator::new("a-completely-different-32-char-secret!!", 3600).unwrap();
        let token = other.generate_token("abc", "a@b.c").unwrap();

        assert!(validator().verify_token(&token).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        // Expired an hour ago, past the default validation leeway
        let now = unix_now().unwrap();
        let claims = Claims {
            user_id: "abc".into(),
            email: "a@b.c".into(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let err = validator().verify_token(&token).unwrap_err();
        assert!(err.to_string().contains("Token expired"));
    }

    #[test]
    fn short_secrets_are_refused() {
        assert!(JwtValidator::new("too-short", 3600).is_err());
        assert!(JwtValidator::new("", 3600).is_err());
    }

    #[test]
    fn dev_validator_round_trips() {
        let v = JwtValidator::new_dev();
        let token = v.generate_token("abc", "dev@example.com").unwrap();
        assert!(v.verify_token(&token).is_ok());
    }

    #[test]
    fn bearer_header_parsing() {
        assert_eq!(
            extract_token_from_header(Some("Bearer tok123")),
            Some("tok123")
        );
        assert_eq!(extract_token_from_header(Some("tok123")), Some("tok123"));
        assert_eq!(extract_token_from_header(Some("Bearer ")), None);
        assert_eq!(extract_token_from_header(Some("Basic dXNlcg==")), None);
        assert_eq!(extract_token_from_header(Some("")), None);
        assert_eq!(extract_token_from_header(None), None);
    }
}
