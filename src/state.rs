// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Explorer Insights

//! Shared application state.
//!
//! Constructed exactly once during bootstrap, after configuration validation
//! and before any plugin or route registration, so every route module sees a
//! fully populated state. Pools are created lazily; registration order, not
//! backend connectivity, gates startup.

use std::sync::Arc;

use sqlx::MySqlPool;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    /// Validated configuration, immutable for the process lifetime.
    pub config: Arc<AppConfig>,
    /// Primary MySQL pool.
    pub db: MySqlPool,
    /// Shadow MySQL pool, used by route modules that mirror reads.
    pub shadow_db: Option<MySqlPool>,
    /// Redis client; connections are established per use.
    pub redis: redis::Client,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: MySqlPool,
        shadow_db: Option<MySqlPool>,
        redis: redis::Client,
    ) -> Self {
        Self {
            config: Arc::new(config),
            db,
            shadow_db,
            redis,
        }
    }

    /// State backed by lazy pools that never connect; for router-level tests.
    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        use sqlx::mysql::MySqlPoolOptions;

        let config = AppConfig::for_tests();
        let db = MySqlPoolOptions::new()
            .connect_lazy(&config.database_url)
            .expect("test database url parses");
        let shadow_db = MySqlPoolOptions::new()
            .connect_lazy(&config.shadow_database_url)
            .expect("test shadow database url parses");
        let redis = redis::Client::open(config.redis_url.as_str()).expect("test redis url parses");

        Self::new(config, db, Some(shadow_db), redis)
    }
}
