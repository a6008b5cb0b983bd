// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use crate::calendar::parse_canonical;
use chrono::NaiveDate;
use std::env;

/// Default heatmap anchor: the dashboard grid starts on this date.
const DEFAULT_HEATMAP_ANCHOR: &str = "2026-01-01";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL for CORS allow-listing
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// JWT signing key shared with the identity provider (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// First date rendered on the dashboard heatmap
    pub heatmap_anchor: NaiveDate,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let anchor_raw =
            env::var("HEATMAP_ANCHOR").unwrap_or_else(|_| DEFAULT_HEATMAP_ANCHOR.to_string());
        let heatmap_anchor =
            parse_canonical(&anchor_raw).ok_or(ConfigError::Invalid("HEATMAP_ANCHOR"))?;

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            heatmap_anchor,
        })
    }

    /// Default config for tests only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            heatmap_anchor: NaiveDate::from_ymd_opt(2026, 1, 1)
                .expect("default anchor is a valid date"),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
