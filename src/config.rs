//! Configuration for Steadfast
//!
//! Everything arrives through clap, so every setting can come from a
//! flag or an environment variable and `--help` documents the lot.

use clap::Parser;
use std::net::SocketAddr;

use crate::auth::jwt::JwtValidator;
use crate::types::{Result, SteadfastError};

/// Steadfast - sobriety support backend
///
/// "One day at a time"
#[derive(Parser, Debug, Clone)]
#[command(name = "steadfast")]
#[command(about = "Backend API for the Steadfast recovery companion")]
pub struct Args {
    /// Listen address for the HTTP server
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:5001")]
    pub listen: SocketAddr,

    /// MongoDB connection string
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// Database holding the Steadfast collections
    #[arg(long, env = "MONGODB_DB", default_value = "steadfast")]
    pub mongodb_db: String,

    /// JWT secret for token signing (required outside dev mode)
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: Option<String>,

    /// JWT token expiry in seconds (default 7 days)
    #[arg(long, env = "JWT_EXPIRY_SECONDS", default_value = "604800")]
    pub jwt_expiry_seconds: u64,

    /// Enable development mode (allows running without JWT_SECRET)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Minimum log level for this crate (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON instead of human-readable lines
    #[arg(long, env = "LOG_JSON", default_value = "false")]
    pub log_json: bool,
}

impl Args {
    /// Build the JWT validator for this configuration.
    ///
    /// Dev mode without an explicit secret falls back to a fixed
    /// development secret so local runs need no setup.
    pub fn jwt_validator(&self) -> Result<JwtValidator> {
        match &self.jwt_secret {
            Some(secret) => JwtValidator::new(secret, self.jwt_expiry_seconds),
            None if self.dev_mode => Ok(JwtValidator::new_dev()),
            None => Err(SteadfastError::Config(
                "JWT_SECRET is required outside dev mode".to_string(),
            )),
        }
    }

    /// Reject configurations that cannot possibly serve traffic
    pub fn validate(&self) -> Result<()> {
        if !self.dev_mode && self.jwt_secret.is_none() {
            return Err(SteadfastError::Config(
                "JWT_SECRET is required outside dev mode".to_string(),
            ));
        }

        if self.jwt_expiry_seconds == 0 {
            return Err(SteadfastError::Config(
                "JWT_EXPIRY_SECONDS must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args::parse_from(["steadfast", "--jwt-secret", "0123456789abcdef0123456789abcdef"])
    }

    #[test]
    fn production_requires_a_secret() {
        let mut args = base_args();
        args.dev_mode = false;
        assert!(args.validate().is_ok());

        args.jwt_secret = None;
        let err = args.validate().unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");

        args.dev_mode = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn zero_expiry_is_rejected() {
        let mut args = base_args();
        args.jwt_expiry_seconds = 0;
        assert!(args.validate().is_err());
    }

    #[test]
    fn dev_fallback_builds_a_validator() {
        let mut args = base_args();
        args.jwt_secret = None;
        args.dev_mode = true;
        assert!(args.jwt_validator().is_ok());
    }
}
