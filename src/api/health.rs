// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Explorer Insights

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Readiness response listing the capabilities registered during bootstrap.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    pub status: String,
    pub checks: HealthChecks,
}

/// Individual capability checks.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Primary database pool registration.
    pub database: String,
    /// Shadow database pool registration, when configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_database: Option<String>,
    /// Redis client registration.
    pub cache: String,
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running. Does not inspect
/// dependencies - use readiness for that.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness probe handler.
///
/// Reports the capabilities wired onto the shared state during bootstrap.
/// Because state construction precedes route registration, a serving process
/// is by definition fully registered; no backend I/O is performed here.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse)
    )
)]
pub async fn readiness(State(state): State<AppState>) -> Json<ReadyResponse> {
    Json(ReadyResponse {
        status: "ok".to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            database: "registered".to_string(),
            shadow_database: state
                .shadow_db
                .as_ref()
                .map(|_| "registered".to_string()),
            cache: "registered".to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn liveness_is_ok() {
        let Json(body) = liveness().await;
        assert_eq!(body.status, "ok");
    }

    #[tokio::test]
    async fn readiness_reports_registered_capabilities() {
        let Json(body) = readiness(State(AppState::for_tests())).await;

        assert_eq!(body.status, "ok");
        assert_eq!(body.checks.database, "registered");
        assert_eq!(body.checks.shadow_database.as_deref(), Some("registered"));
        assert_eq!(body.checks.cache, "registered");
    }
}
