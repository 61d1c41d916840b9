// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Explorer Insights

//! ETag / conditional-request plugin.
//!
//! Hashes the body of every successful GET or HEAD response and attaches the
//! digest as a strong `ETag`. When the client presents a matching
//! `If-None-Match`, the body is dropped and `304 Not Modified` is returned
//! instead. Responses that already carry an `ETag` are left untouched so
//! route modules can supply their own validators.

use std::fmt::Write as _;

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha256};

pub async fn set_etag(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let if_none_match = request
        .headers()
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let response = next.run(request).await;

    if !(method == Method::GET || method == Method::HEAD)
        || !response.status().is_success()
        || response.headers().contains_key(header::ETAG)
    {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(error = %err, "failed to buffer response body for etag");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let tag = strong_etag(&bytes);
    // Quoted lowercase hex is always a valid header value.
    if let Ok(header_value) = HeaderValue::from_str(&tag) {
        parts.headers.insert(header::ETAG, header_value);
    }

    if if_none_match
        .as_deref()
        .is_some_and(|candidates| etag_matches(candidates, &tag))
    {
        parts.status = StatusCode::NOT_MODIFIED;
        parts.headers.remove(header::CONTENT_LENGTH);
        return Response::from_parts(parts, Body::empty());
    }

    Response::from_parts(parts, Body::from(bytes))
}

/// Strong ETag: quoted lowercase hex of the SHA-256 body digest.
fn strong_etag(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut tag = String::with_capacity(66);
    tag.push('"');
    for byte in digest {
        let _ = write!(tag, "{byte:02x}");
    }
    tag.push('"');
    tag
}

/// `If-None-Match` may list several validators or `*`.
fn etag_matches(candidates: &str, tag: &str) -> bool {
    candidates
        .split(',')
        .map(str::trim)
        .any(|candidate| candidate == "*" || candidate == tag)
}

#[cfg(test)]
mod tests {
    use axum::{
        http::{Method, Request, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use tower::ServiceExt;

    use super::*;

    fn test_app() -> Router {
        Router::new()
            .route("/data", get(|| async { Json(serde_json::json!({"n": 1})) }))
            .route("/data", post(|| async { Json(serde_json::json!({"n": 1})) }))
            .route(
                "/missing",
                get(|| async { (StatusCode::NOT_FOUND, "nope") }),
            )
            .layer(axum::middleware::from_fn(set_etag))
    }

    async fn etag_of(app: Router, uri: &str) -> String {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        response
            .headers()
            .get(header::ETAG)
            .expect("etag header present")
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn successful_get_gets_a_stable_etag() {
        let first = etag_of(test_app(), "/data").await;
        let second = etag_of(test_app(), "/data").await;
        assert_eq!(first, second);
        assert!(first.starts_with('"') && first.ends_with('"'));
    }

    #[tokio::test]
    async fn matching_if_none_match_returns_304_with_empty_body() {
        let tag = etag_of(test_app(), "/data").await;

        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/data")
                    .header(header::IF_NONE_MATCH, &tag)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(
            response.headers().get(header::ETAG).unwrap().to_str().unwrap(),
            tag
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn wildcard_if_none_match_matches() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/data")
                    .header(header::IF_NONE_MATCH, "*")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn stale_if_none_match_returns_full_body() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/data")
                    .header(header::IF_NONE_MATCH, "\"deadbeef\"")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(!bytes.is_empty());
    }

    #[tokio::test]
    async fn non_get_responses_are_untouched() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/data")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(!response.headers().contains_key(header::ETAG));
    }

    #[tokio::test]
    async fn error_responses_are_untouched() {
        let response = test_app()
            .oneshot(Request::builder().uri("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(!response.headers().contains_key(header::ETAG));
    }
}
