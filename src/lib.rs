// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Dayplan-Tracker: plan daily activities, check them off, watch the trend.
//!
//! This crate provides the backend API for the daily planner: per-date
//! activity plans, a two-day completion window, and the dashboard stats
//! and heatmap derived from them.

pub mod calendar;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod routes;
pub mod services;

use config::Config;
use services::PlannerService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub planner: PlannerService,
}
