// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::calendar::{add_days, canonical_date, parse_canonical};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{DailyStats, PlannedActivity, RollingStats};
use crate::policy;
use crate::services::dashboard::{self, HeatmapCell};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Default rolling-stats window: the last 30 days plus today.
const DEFAULT_WINDOW_DAYS: i64 = 30;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/day/{date}", get(get_day))
        .route("/api/day/{date}/activities", post(add_activity))
        .route("/api/day/{date}/activities/{id}", delete(delete_activity))
        .route("/api/day/{date}/reorder", post(reorder_activity))
        .route(
            "/api/day/{date}/completions/{id}/toggle",
            post(toggle_completion),
        )
        .route("/api/catalog/suggestions", get(get_suggestions))
        .route("/api/stats/daily/{date}", get(get_daily_stats))
        .route("/api/stats/rolling", get(get_rolling_stats))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/data", delete(reset_all))
}

fn parse_date_param(raw: &str) -> Result<NaiveDate> {
    parse_canonical(raw).ok_or_else(|| {
        crate::error::AppError::BadRequest(format!("Invalid date '{}': expected YYYY-MM-DD", raw))
    })
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub user_id: String,
    /// Today's canonical date in the reference timezone.
    pub today: String,
}

/// Get the authenticated user's id and the server's notion of today.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    Ok(Json(UserResponse {
        user_id: user.user_id,
        today: canonical_date(state.planner.today()),
    }))
}

// ─── Day View ────────────────────────────────────────────────

/// Everything the date panel needs for one day.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DayResponse {
    pub date: String,
    pub plan: Vec<PlannedActivity>,
    pub completion: HashMap<String, bool>,
    pub stats: DailyStats,
    pub can_edit_plan: bool,
    pub can_edit_completion: bool,
}

async fn get_day(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> Result<Json<DayResponse>> {
    let date = parse_date_param(&date)?;
    let today = state.planner.today();

    let (plan, completion, stats) = state
        .planner
        .with_state(&user.user_id, |s| {
            let key = canonical_date(date);
            (s.plan(&key).to_vec(), s.completion(&key), s.daily_stats(&key))
        })
        .await;

    Ok(Json(DayResponse {
        date: canonical_date(date),
        plan,
        completion,
        stats,
        can_edit_plan: policy::can_edit_plan(date, today),
        can_edit_completion: policy::can_edit_completion(date, today),
    }))
}

// ─── Plan Mutations ──────────────────────────────────────────

#[derive(Deserialize, Validate)]
struct AddActivityRequest {
    #[validate(length(min = 1, max = 200))]
    name: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AddActivityResponse {
    pub activity: PlannedActivity,
    pub stats: DailyStats,
}

/// Add an activity to a date's plan (policy permitting) and register its
/// name in the catalog.
async fn add_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
    Json(payload): Json<AddActivityRequest>,
) -> Result<Json<AddActivityResponse>> {
    let date = parse_date_param(&date)?;
    payload
        .validate()
        .map_err(|e| crate::error::AppError::BadRequest(e.to_string()))?;

    let activity = state
        .planner
        .add_activity(&user.user_id, date, &payload.name)
        .await?;
    let stats = state.planner.daily_stats(&user.user_id, date).await;

    Ok(Json(AddActivityResponse { activity, stats }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteActivityResponse {
    pub removed: bool,
    pub stats: DailyStats,
}

/// Delete an activity by id. Idempotent: an unknown id reports
/// `removed: false`.
async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((date, id)): Path<(String, String)>,
) -> Result<Json<DeleteActivityResponse>> {
    let date = parse_date_param(&date)?;

    let removed = state
        .planner
        .delete_activity(&user.user_id, date, &id)
        .await?;
    let stats = state.planner.daily_stats(&user.user_id, date).await;

    Ok(Json(DeleteActivityResponse { removed, stats }))
}

#[derive(Deserialize, Validate)]
struct ReorderRequest {
    #[validate(length(min = 1))]
    moved_id: String,
    #[validate(length(min = 1))]
    target_id: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ReorderResponse {
    pub plan: Vec<PlannedActivity>,
}

/// Move an activity onto the position held by another; both positions are
/// resolved by id, never by display index.
async fn reorder_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
    Json(payload): Json<ReorderRequest>,
) -> Result<Json<ReorderResponse>> {
    let date = parse_date_param(&date)?;
    payload
        .validate()
        .map_err(|e| crate::error::AppError::BadRequest(e.to_string()))?;

    let plan = state
        .planner
        .reorder_activity(&user.user_id, date, &payload.moved_id, &payload.target_id)
        .await?;

    Ok(Json(ReorderResponse { plan }))
}

// ─── Completion ──────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ToggleResponse {
    pub completed: bool,
    pub stats: DailyStats,
}

/// Flip an activity's completion flag within the two-day check window.
async fn toggle_completion(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((date, id)): Path<(String, String)>,
) -> Result<Json<ToggleResponse>> {
    let date = parse_date_param(&date)?;

    let completed = state
        .planner
        .toggle_completion(&user.user_id, date, &id)
        .await?;
    let stats = state.planner.daily_stats(&user.user_id, date).await;

    Ok(Json(ToggleResponse { completed, stats }))
}

// ─── Catalog Suggestions ─────────────────────────────────────

#[derive(Deserialize)]
struct SuggestionsQuery {
    #[serde(default)]
    q: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
    /// Whether the query matches a catalog entry case-insensitively in
    /// full; when false the UI offers a "create new" entry.
    pub exact_match: bool,
}

async fn get_suggestions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<SuggestionsQuery>,
) -> Result<Json<SuggestionsResponse>> {
    let set = state.planner.suggestions(&user.user_id, &params.q).await;
    Ok(Json(SuggestionsResponse {
        suggestions: set.names,
        exact_match: set.exact_match,
    }))
}

// ─── Stats & Dashboard ───────────────────────────────────────

async fn get_daily_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> Result<Json<DailyStats>> {
    let date = parse_date_param(&date)?;
    Ok(Json(state.planner.daily_stats(&user.user_id, date).await))
}

#[derive(Deserialize)]
struct RollingQuery {
    start: Option<String>,
    end: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RollingStatsResponse {
    pub window_start: String,
    pub window_end: String,
    pub stats: RollingStats,
}

/// Rolling-window stats; defaults to the last 30 days through today.
async fn get_rolling_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<RollingQuery>,
) -> Result<Json<RollingStatsResponse>> {
    let today = state.planner.today();
    let end = match params.end.as_deref() {
        Some(raw) => parse_date_param(raw)?,
        None => today,
    };
    let start = match params.start.as_deref() {
        Some(raw) => parse_date_param(raw)?,
        None => add_days(end, -DEFAULT_WINDOW_DAYS),
    };
    if start > end {
        return Err(crate::error::AppError::BadRequest(
            "Window start must not be after window end".to_string(),
        ));
    }

    let stats = state
        .planner
        .with_state(&user.user_id, |s| dashboard::rolling_stats(s, start, end))
        .await;

    Ok(Json(RollingStatsResponse {
        window_start: canonical_date(start),
        window_end: canonical_date(end),
        stats,
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardResponse {
    pub stats: RollingStats,
    pub window_start: String,
    pub window_end: String,
    /// Week columns from the anchor's week through today's week.
    pub heatmap: Vec<Vec<HeatmapCell>>,
}

/// Dashboard view: last-30-days stats plus the anchored heatmap grid.
async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DashboardResponse>> {
    let today = state.planner.today();
    let start = add_days(today, -DEFAULT_WINDOW_DAYS);
    let anchor = state.config.heatmap_anchor;

    let (stats, heatmap) = state
        .planner
        .with_state(&user.user_id, |s| {
            (
                dashboard::rolling_stats(s, start, today),
                dashboard::heatmap_weeks(s, anchor, today),
            )
        })
        .await;

    Ok(Json(DashboardResponse {
        stats,
        window_start: canonical_date(start),
        window_end: canonical_date(today),
        heatmap,
    }))
}

// ─── Reset All Data ──────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ResetResponse {
    pub success: bool,
    pub message: String,
}

/// Delete all catalog entries, plans, and completions for the user.
///
/// The three per-table deletes are independent; on partial failure the
/// request fails with a generic message and the tables that succeeded
/// remain deleted.
async fn reset_all(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ResetResponse>> {
    tracing::info!(user_id = %user.user_id, "User-initiated data reset");

    state.planner.reset_all(&user.user_id).await?;

    Ok(Json(ResetResponse {
        success: true,
        message: "All data has been deleted.".to_string(),
    }))
}
