//! Health and version endpoints
//!
//! /health is a liveness probe: 200 whenever the process is up, with the
//! MongoDB reachability in the body for callers that care. /version
//! reports the build metadata baked in by build.rs.

use chrono::Utc;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use crate::routes::helpers::{json_response, BoxBody};
use crate::server::AppState;

/// Body of the /health probe
#[derive(Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    /// "online" when the store answers a ping, "degraded" otherwise
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub mode: &'static str,
    pub database: DatabaseHealth,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    pub connected: bool,
}

/// Handle the liveness probe (/health, /healthz).
///
/// Stays 200 even when the store is down; load balancers keep the
/// process alive and the body says what is degraded.
pub async fn health_check(state: Arc<AppState>) -> Response<BoxBody> {
    let connected = state.mongo.ping().await.is_ok();

    let body = HealthResponse {
        healthy: true,
        status: if connected { "online" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
        mode: if state.args.dev_mode {
            "development"
        } else {
            "production"
        },
        database: DatabaseHealth { connected },
    };

    json_response(StatusCode::OK, &body)
}

/// Body of the /version endpoint
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
    pub commit: &'static str,
    pub commit_full: &'static str,
    pub build_time: &'static str,
    pub service: &'static str,
}

impl VersionResponse {
    /// Build metadata captured at compile time.
    ///
    /// The git fields fall back to "unknown" when the build ran outside
    /// a checkout.
    fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            commit: option_env!("GIT_COMMIT_SHORT").unwrap_or("unknown"),
            commit_full: option_env!("GIT_COMMIT_FULL").unwrap_or("unknown"),
            build_time: option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
            service: "steadfast",
        }
    }
}

/// Handle the version endpoint (/version), used to verify deployments
pub fn version_info() -> Response<BoxBody> {
    json_response(StatusCode::OK, &VersionResponse::current())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_metadata_never_has_empty_fields() {
        let v = VersionResponse::current();
        assert_eq!(v.service, "steadfast");
        assert!(!v.version.is_empty());
        assert!(!v.commit.is_empty());
        assert!(!v.build_time.is_empty());
    }
}
