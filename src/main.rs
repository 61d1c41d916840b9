// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Explorer Insights

//! Bootstrap entry point.
//!
//! Startup is a strictly ordered, one-shot sequence: environment file, then
//! telemetry, then configuration, then shared state, then plugin and route
//! registration, then the listener. Each step completes before the next
//! begins; any failure before binding exits non-zero without opening a port.

use std::{env, net::SocketAddr, process::ExitCode};

use explorer_api_server::{api, config::AppConfig, state::AppState, telemetry};
use sqlx::mysql::MySqlPoolOptions;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    telemetry::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    // Lazy pools: URL shape is validated now, connections open on first use.
    let db = match MySqlPoolOptions::new().connect_lazy(&config.database_url) {
        Ok(pool) => pool,
        Err(err) => {
            tracing::error!(error = %err, "DATABASE_URL is not a valid MySQL url");
            return ExitCode::FAILURE;
        }
    };
    let shadow_db = match MySqlPoolOptions::new().connect_lazy(&config.shadow_database_url) {
        Ok(pool) => Some(pool),
        Err(err) => {
            tracing::error!(error = %err, "SHADOW_DATABASE_URL is not a valid MySQL url");
            return ExitCode::FAILURE;
        }
    };
    let redis = match redis::Client::open(config.redis_url.as_str()) {
        Ok(client) => client,
        Err(err) => {
            tracing::error!(error = %err, "REDIS_URL is not a valid Redis url");
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::new(config, db, shadow_db, redis);
    let app = api::router(state);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = match format!("{host}:{port}").parse() {
        Ok(addr) => addr,
        Err(err) => {
            tracing::error!(error = %err, %host, port, "failed to parse bind address");
            return ExitCode::FAILURE;
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, %addr, "failed to bind listener");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%addr, "explorer api server listening (docs at /docs)");

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %err, "server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
