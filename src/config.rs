// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Explorer Insights

//! # Application Configuration
//!
//! Typed configuration loaded from the process environment once at startup
//! and never mutated afterwards. Every field is validated against the schema
//! below before the server binds a port; a violation of any field is a fatal
//! startup error whose message enumerates all offending fields at once.
//!
//! ## Environment Variables
//!
//! | Variable | Type | Constraint |
//! |----------|------|------------|
//! | `CONFIGS_PATH`, `ADMIN_EMAIL`, `DATABASE_URL`, `SHADOW_DATABASE_URL`, `REDIS_URL`, `API_BASE_URL` | string | required, non-empty |
//! | `PLAYGROUND_DATABASE_URL`, `PLAYGROUND_SHADOW_DATABASE_URL` | string | required, non-empty |
//! | `OPENAI_API_KEY`, `AUTH0_DOMAIN`, `AUTH0_SECRET`, `EMBEDDING_SERVICE_ENDPOINT`, `PROMPT_TEMPLATE_NAME` | string | required, non-empty |
//! | `ENABLE_CACHE`, `EXPLORER_OUTPUT_ANSWER_IN_STREAM`, `JWT_COOKIE_SECURE`, `JWT_COOKIE_SAME_SITE`, `PREFETCH_EXECUTE_IMMEDIATELY` | bool | optional, default `false` |
//! | `PLAYGROUND_DAILY_QUESTIONS_LIMIT`, `EXPLORER_USER_MAX_QUESTIONS_PER_HOUR`, `EXPLORER_USER_MAX_QUESTIONS_ON_GOING`, `EXPLORER_GENERATE_SQL_CACHE_TTL`, `EXPLORER_QUERY_SQL_CACHE_TTL` | integer | required, >= 0 |
//! | `PLAYGROUND_TRUSTED_GITHUB_LOGINS`, `GITHUB_ACCESS_TOKENS` | comma-separated list | optional, default empty |
//! | `GITHUB_OAUTH_CLIENT_ID`, `GITHUB_OAUTH_CLIENT_SECRET`, `JWT_SECRET`, `JWT_COOKIE_NAME`, `JWT_COOKIE_DOMAIN`, `PREFETCH_ONLY_QUERY` | string | optional |
//! | `PREFETCH_ONLY_PARAMS` | JSON object | optional, default `{}` |
//!
//! A `.env` file in the working directory is honored via `dotenvy` before the
//! environment is read (see `main.rs`).

use std::collections::HashMap;
use std::env;

use serde_json::{Map, Value};
use thiserror::Error;

/// Fatal configuration failure listing every violated field.
#[derive(Debug, Error)]
#[error("invalid configuration: {}", .violations.join("; "))]
pub struct ConfigError {
    /// One human-readable entry per violated field.
    pub violations: Vec<String>,
}

/// Immutable application configuration, shared as `Arc<AppConfig>` for the
/// process lifetime.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub configs_path: String,
    pub admin_email: String,
    pub database_url: String,
    pub shadow_database_url: String,
    pub redis_url: String,
    pub api_base_url: String,
    pub enable_cache: bool,
    pub playground_database_url: String,
    pub playground_shadow_database_url: String,
    pub playground_daily_questions_limit: u32,
    pub playground_trusted_github_logins: Vec<String>,
    pub explorer_user_max_questions_per_hour: u32,
    pub explorer_user_max_questions_on_going: u32,
    pub explorer_generate_sql_cache_ttl: u32,
    pub explorer_query_sql_cache_ttl: u32,
    pub explorer_output_answer_in_stream: bool,
    pub github_oauth_client_id: Option<String>,
    pub github_oauth_client_secret: Option<String>,
    pub github_access_tokens: Vec<String>,
    pub jwt_secret: Option<String>,
    pub jwt_cookie_name: Option<String>,
    pub jwt_cookie_domain: Option<String>,
    pub jwt_cookie_secure: bool,
    pub jwt_cookie_same_site: bool,
    pub openai_api_key: String,
    pub auth0_domain: String,
    pub auth0_secret: String,
    pub embedding_service_endpoint: String,
    pub prompt_template_name: String,
    pub prefetch_only_query: Option<String>,
    pub prefetch_only_params: Map<String, Value>,
    pub prefetch_execute_immediately: bool,
}

impl AppConfig {
    /// Load and validate the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Load and validate the configuration from an explicit variable map.
    ///
    /// All schema violations are collected before returning, so a single
    /// failed startup reports every missing or malformed field.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut loader = Loader {
            vars,
            violations: Vec::new(),
        };

        let config = AppConfig {
            configs_path: loader.required("CONFIGS_PATH"),
            admin_email: loader.required("ADMIN_EMAIL"),
            database_url: loader.required("DATABASE_URL"),
            shadow_database_url: loader.required("SHADOW_DATABASE_URL"),
            redis_url: loader.required("REDIS_URL"),
            api_base_url: loader.required("API_BASE_URL"),
            enable_cache: loader.flag("ENABLE_CACHE"),
            playground_database_url: loader.required("PLAYGROUND_DATABASE_URL"),
            playground_shadow_database_url: loader.required("PLAYGROUND_SHADOW_DATABASE_URL"),
            playground_daily_questions_limit: loader
                .non_negative_int("PLAYGROUND_DAILY_QUESTIONS_LIMIT"),
            playground_trusted_github_logins: loader.list("PLAYGROUND_TRUSTED_GITHUB_LOGINS"),
            explorer_user_max_questions_per_hour: loader
                .non_negative_int("EXPLORER_USER_MAX_QUESTIONS_PER_HOUR"),
            explorer_user_max_questions_on_going: loader
                .non_negative_int("EXPLORER_USER_MAX_QUESTIONS_ON_GOING"),
            explorer_generate_sql_cache_ttl: loader
                .non_negative_int("EXPLORER_GENERATE_SQL_CACHE_TTL"),
            explorer_query_sql_cache_ttl: loader.non_negative_int("EXPLORER_QUERY_SQL_CACHE_TTL"),
            explorer_output_answer_in_stream: loader.flag("EXPLORER_OUTPUT_ANSWER_IN_STREAM"),
            github_oauth_client_id: loader.optional("GITHUB_OAUTH_CLIENT_ID"),
            github_oauth_client_secret: loader.optional("GITHUB_OAUTH_CLIENT_SECRET"),
            github_access_tokens: loader.list("GITHUB_ACCESS_TOKENS"),
            jwt_secret: loader.optional("JWT_SECRET"),
            jwt_cookie_name: loader.optional("JWT_COOKIE_NAME"),
            jwt_cookie_domain: loader.optional("JWT_COOKIE_DOMAIN"),
            jwt_cookie_secure: loader.flag("JWT_COOKIE_SECURE"),
            jwt_cookie_same_site: loader.flag("JWT_COOKIE_SAME_SITE"),
            openai_api_key: loader.required("OPENAI_API_KEY"),
            auth0_domain: loader.required("AUTH0_DOMAIN"),
            auth0_secret: loader.required("AUTH0_SECRET"),
            embedding_service_endpoint: loader.required("EMBEDDING_SERVICE_ENDPOINT"),
            prompt_template_name: loader.required("PROMPT_TEMPLATE_NAME"),
            prefetch_only_query: loader.optional("PREFETCH_ONLY_QUERY"),
            prefetch_only_params: loader.json_object("PREFETCH_ONLY_PARAMS"),
            prefetch_execute_immediately: loader.flag("PREFETCH_EXECUTE_IMMEDIATELY"),
        };

        if loader.violations.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError {
                violations: loader.violations,
            })
        }
    }
}

/// Schema-driven reader over a variable map. Accessors record violations
/// instead of failing early so the whole schema is checked in one pass.
struct Loader<'a> {
    vars: &'a HashMap<String, String>,
    violations: Vec<String>,
}

impl Loader<'_> {
    fn raw(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(|value| value.trim())
    }

    /// Required non-empty string.
    fn required(&mut self, key: &'static str) -> String {
        match self.raw(key) {
            Some(value) if !value.is_empty() => value.to_string(),
            Some(_) => {
                self.violations.push(format!("{key} must not be empty"));
                String::new()
            }
            None => {
                self.violations.push(format!("{key} is required"));
                String::new()
            }
        }
    }

    /// Optional string; empty values count as absent.
    fn optional(&self, key: &'static str) -> Option<String> {
        self.raw(key)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// Optional boolean, default `false`. Accepts `true`/`false`/`1`/`0`,
    /// case-insensitive.
    fn flag(&mut self, key: &'static str) -> bool {
        let Some(value) = self.raw(key) else {
            return false;
        };
        match value.to_ascii_lowercase().as_str() {
            "true" | "1" => true,
            "false" | "0" | "" => false,
            _ => {
                self.violations
                    .push(format!("{key} must be a boolean (true/false/1/0)"));
                false
            }
        }
    }

    /// Required non-negative integer.
    fn non_negative_int(&mut self, key: &'static str) -> u32 {
        match self.raw(key) {
            Some(value) => value.parse().unwrap_or_else(|_| {
                self.violations
                    .push(format!("{key} must be a non-negative integer"));
                0
            }),
            None => {
                self.violations.push(format!("{key} is required"));
                0
            }
        }
    }

    /// Optional comma-separated list, default empty.
    fn list(&self, key: &'static str) -> Vec<String> {
        match self.raw(key) {
            Some(value) => value
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Optional JSON object, default empty.
    fn json_object(&mut self, key: &'static str) -> Map<String, Value> {
        let Some(value) = self.raw(key).filter(|value| !value.is_empty()) else {
            return Map::new();
        };
        match serde_json::from_str::<Value>(value) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                self.violations.push(format!("{key} must be a JSON object"));
                Map::new()
            }
            Err(_) => {
                self.violations.push(format!("{key} must be valid JSON"));
                Map::new()
            }
        }
    }
}

#[cfg(test)]
impl AppConfig {
    /// Minimal valid configuration for tests.
    pub(crate) fn for_tests() -> Self {
        Self::from_vars(&tests::base_vars()).expect("test configuration is valid")
    }
}
