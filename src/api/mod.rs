// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Explorer Insights

//! Route registration and API documentation.
//!
//! `router` is the explicit route registration list: every route module is
//! mounted here, after the plugin list has been installed on top of them.
//! The aggregated OpenAPI document for all registered routes is served at
//! `GET /docs/json`, with an interactive UI at `/docs`.

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    api::health::{HealthChecks, HealthResponse, ReadyResponse},
    plugins,
    state::AppState,
};

pub mod health;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    let router = routes
        .route("/docs/json", get(docs_json))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()));

    plugins::install_all(router)
}

/// Machine-readable API description for all registered routes.
///
/// Read-only and idempotent: the document is derived from the static
/// registration list, so concurrent calls always return identical content.
async fn docs_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[derive(OpenApi)]
#[openapi(
    paths(health::liveness, health::readiness),
    components(schemas(HealthResponse, ReadyResponse, HealthChecks)),
    tags(
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(AppState::for_tests());
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn docs_json_returns_the_openapi_document() {
        let response = router(AppState::for_tests())
            .oneshot(
                Request::builder()
                    .uri("/docs/json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(doc["openapi"].is_string());
        assert!(doc["paths"]["/health/live"].is_object());
        assert!(doc["paths"]["/health/ready"].is_object());
    }

    #[tokio::test]
    async fn docs_json_is_idempotent() {
        async fn fetch() -> Vec<u8> {
            let response = router(AppState::for_tests())
                .oneshot(
                    Request::builder()
                        .uri("/docs/json")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap()
                .to_vec()
        }

        assert_eq!(fetch().await, fetch().await);
    }

    #[tokio::test]
    async fn health_routes_are_mounted_behind_plugins() {
        let response = router(AppState::for_tests())
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        // Plugin layers wrap every registered route.
        assert!(response.headers().contains_key("x-request-id"));
        assert!(response.headers().contains_key(header::ETAG));
    }

    #[tokio::test]
    async fn unknown_routes_return_404() {
        let response = router(AppState::for_tests())
            .oneshot(
                Request::builder()
                    .uri("/definitely/not/here")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
