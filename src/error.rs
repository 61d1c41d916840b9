// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Explorer Insights

//! Centralized error translation.
//!
//! Two tiers of request-path failures exist:
//!
//! - **Application errors** are raised intentionally by handlers, carry a
//!   caller-meaningful status code and an optional structured payload, and
//!   are rendered verbatim as `{message, payload}`.
//! - **Unexpected errors** (database failures, I/O errors, anything converted
//!   through [`From`]) collapse to `500 {message}` so internals never leak
//!   beyond the message text.
//!
//! Every failure is logged exactly once, in [`IntoResponse`], immediately
//! before the response is emitted. Handlers return `Result<_, ApiError>`, so
//! no failure reaches the transport layer untranslated.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

/// Message used when an unexpected failure carries no message of its own.
const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub payload: Option<Value>,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            payload: None,
        }
    }

    /// Attach a structured payload for the client.
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    /// Unexpected failure, collapsed to 500. An empty message falls back to
    /// `"Internal Server Error"`.
    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            if message.is_empty() {
                INTERNAL_SERVER_ERROR.to_string()
            } else {
                message
            },
        )
    }
}

/// Any error type not explicitly translated becomes an internal error, which
/// lets handlers use `?` on sqlx/redis/serde failures.
impl<E: std::error::Error> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self::internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // The single log entry for this failure; handlers must not log again.
        tracing::error!(status = %self.status, message = %self.message, "request failed");

        let body = Json(ErrorBody {
            message: self.message,
            payload: self.payload,
        });
        (self.status, body).into_response()
    }
}
