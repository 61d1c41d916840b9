// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Explorer Insights

//! Explorer API Server - HTTP bootstrap for the Explorer platform.
//!
//! This crate wires environment-derived configuration, an ordered plugin
//! list, a centralized error translator, and route modules into a single
//! axum application, then exposes the aggregated OpenAPI document at
//! `GET /docs/json`.
//!
//! ## Modules
//!
//! - `api` - route registration and HTTP handlers (Axum)
//! - `config` - schema-validated environment configuration
//! - `error` - application/unexpected error translation
//! - `plugins` - ordered cross-cutting plugin list (trace, request-id, cors, etag)
//! - `state` - shared application state (config, MySQL pools, Redis)
//! - `telemetry` - tracing subscriber setup

pub mod api;
pub mod config;
pub mod error;
pub mod plugins;
pub mod state;
pub mod telemetry;
