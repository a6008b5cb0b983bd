// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Planner service: hydration, policy-checked commands, optimistic persistence.
//!
//! Mutations happen in two explicit phases: a synchronous pure apply on the
//! in-memory [`DayState`], then an asynchronously spawned persist of the
//! affected rows. The in-memory state is the apparent truth immediately; a
//! failed persist is logged and never surfaced, so a later reload can
//! silently revert the change. Only reset-all awaits persistence and
//! surfaces its failure.

use crate::calendar::{canonical_date, Calendar};
use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::day_state::{DayState, SuggestionSet};
use crate::models::{CatalogEntryDoc, CompletionDoc, DailyStats, PlanDoc, PlannedActivity};
use crate::policy;
use chrono::NaiveDate;
use dashmap::DashMap;
use std::collections::HashMap;

/// Per-user planner state backed by Firestore.
///
/// Constructed once at startup and threaded through `AppState`; holds no
/// ambient globals. Within one instance mutations to a user's state are
/// serialized by the map entry lock; across instances the remote store is
/// last-writer-wins.
pub struct PlannerService {
    db: FirestoreDb,
    calendar: Calendar,
    states: DashMap<String, DayState>,
}

impl PlannerService {
    pub fn new(db: FirestoreDb) -> Self {
        Self {
            db,
            calendar: Calendar::ist(),
            states: DashMap::new(),
        }
    }

    /// Today in the reference timezone.
    pub fn today(&self) -> NaiveDate {
        self.calendar.today()
    }

    // ─── Hydration ───────────────────────────────────────────────

    /// Ensure a user's state is loaded. Each category degrades to empty
    /// on load failure so the app keeps serving with partial data.
    async fn ensure_hydrated(&self, user_id: &str) {
        if self.states.contains_key(user_id) {
            return;
        }

        let (catalog, plans, completions) = tokio::join!(
            self.db.get_catalog(user_id),
            self.db.get_plans(user_id),
            self.db.get_completions(user_id),
        );

        let catalog = match catalog {
            Ok(rows) => rows.into_iter().map(|r| r.activity_name).collect(),
            Err(e) => {
                tracing::error!(user_id, error = %e, "Failed to load catalog, starting empty");
                Vec::new()
            }
        };
        let plans = match plans {
            Ok(rows) => rows.into_iter().map(|r| (r.date, r.activities)).collect(),
            Err(e) => {
                tracing::error!(user_id, error = %e, "Failed to load plans, starting empty");
                HashMap::new()
            }
        };
        let completions = match completions {
            Ok(rows) => rows
                .into_iter()
                .map(|r| (r.date, r.completion_data))
                .collect(),
            Err(e) => {
                tracing::error!(user_id, error = %e, "Failed to load completions, starting empty");
                HashMap::new()
            }
        };

        // A racing request may have hydrated meanwhile; first insert wins.
        self.states
            .entry(user_id.to_string())
            .or_insert(DayState::from_parts(catalog, plans, completions));
    }

    fn state_mut(&self, user_id: &str) -> dashmap::mapref::one::RefMut<'_, String, DayState> {
        self.states.entry(user_id.to_string()).or_default()
    }

    // ─── Queries ─────────────────────────────────────────────────

    pub async fn plan(&self, user_id: &str, date: NaiveDate) -> Vec<PlannedActivity> {
        self.ensure_hydrated(user_id).await;
        self.state_mut(user_id).plan(&canonical_date(date)).to_vec()
    }

    pub async fn completion(&self, user_id: &str, date: NaiveDate) -> HashMap<String, bool> {
        self.ensure_hydrated(user_id).await;
        self.state_mut(user_id).completion(&canonical_date(date))
    }

    pub async fn daily_stats(&self, user_id: &str, date: NaiveDate) -> DailyStats {
        self.ensure_hydrated(user_id).await;
        self.state_mut(user_id).daily_stats(&canonical_date(date))
    }

    pub async fn suggestions(&self, user_id: &str, query: &str) -> SuggestionSet {
        self.ensure_hydrated(user_id).await;
        self.state_mut(user_id).suggestions(query)
    }

    /// Run a read-only closure against the user's hydrated state.
    pub async fn with_state<T>(&self, user_id: &str, f: impl FnOnce(&DayState) -> T) -> T {
        self.ensure_hydrated(user_id).await;
        f(&self.state_mut(user_id))
    }

    // ─── Commands ────────────────────────────────────────────────

    /// Add an activity to a date's plan and register its name in the
    /// catalog. Rejected when the planning window is closed or the name
    /// is blank.
    pub async fn add_activity(
        &self,
        user_id: &str,
        date: NaiveDate,
        name: &str,
    ) -> Result<PlannedActivity, AppError> {
        self.check_plan_window(date)?;
        self.ensure_hydrated(user_id).await;

        let key = canonical_date(date);
        let (activity, plan, catalog_grew) = {
            let mut state = self.state_mut(user_id);
            let Some(outcome) = state.add_activity(&key, name) else {
                return Err(AppError::BadRequest(
                    "Activity name must not be empty".to_string(),
                ));
            };
            (
                outcome.activity,
                state.plan(&key).to_vec(),
                outcome.catalog_grew,
            )
        };

        self.persist_plan(user_id, &key, plan);
        if catalog_grew {
            self.persist_catalog_entry(user_id, &activity.name);
        }

        tracing::debug!(user_id, date = %key, activity_id = %activity.id, "Activity added");
        Ok(activity)
    }

    /// Delete an activity by id. Idempotent; unknown ids report
    /// `Ok(false)`. The completion map is not touched.
    pub async fn delete_activity(
        &self,
        user_id: &str,
        date: NaiveDate,
        id: &str,
    ) -> Result<bool, AppError> {
        self.check_plan_window(date)?;
        self.ensure_hydrated(user_id).await;

        let key = canonical_date(date);
        let (removed, plan) = {
            let mut state = self.state_mut(user_id);
            let removed = state.delete_activity(&key, id);
            (removed, state.plan(&key).to_vec())
        };

        if removed {
            self.persist_plan(user_id, &key, plan);
            tracing::debug!(user_id, date = %key, activity_id = id, "Activity deleted");
        }
        Ok(removed)
    }

    /// Move an activity onto the position held by another. Unknown ids
    /// report `Ok` with the unchanged plan.
    pub async fn reorder_activity(
        &self,
        user_id: &str,
        date: NaiveDate,
        moved_id: &str,
        target_id: &str,
    ) -> Result<Vec<PlannedActivity>, AppError> {
        self.check_plan_window(date)?;
        self.ensure_hydrated(user_id).await;

        let key = canonical_date(date);
        let (changed, plan) = {
            let mut state = self.state_mut(user_id);
            let changed = state.reorder_activity(&key, moved_id, target_id);
            (changed, state.plan(&key).to_vec())
        };

        if changed {
            self.persist_plan(user_id, &key, plan.clone());
        }
        Ok(plan)
    }

    /// Flip an activity's completion flag. Returns the new value.
    pub async fn toggle_completion(
        &self,
        user_id: &str,
        date: NaiveDate,
        id: &str,
    ) -> Result<bool, AppError> {
        if !policy::can_edit_completion(date, self.today()) {
            return Err(AppError::WindowClosed(
                "Only today and yesterday can be checked off".to_string(),
            ));
        }
        self.ensure_hydrated(user_id).await;

        let key = canonical_date(date);
        let (completed, map) = {
            let mut state = self.state_mut(user_id);
            let completed = state.toggle_completion(&key, id);
            (completed, state.completion(&key))
        };

        self.persist_completion(user_id, &key, map);
        Ok(completed)
    }

    /// Delete all remote data for a user: three independent per-table
    /// deletes, no cross-table transaction. On partial failure the tables
    /// that succeeded stay deleted and the local state is kept.
    pub async fn reset_all(&self, user_id: &str) -> Result<(), AppError> {
        let catalog = self.db.delete_catalog_for_user(user_id).await;
        let plans = self.db.delete_plans_for_user(user_id).await;
        let completions = self.db.delete_completions_for_user(user_id).await;

        for (table, result) in [
            ("activity_catalog", &catalog),
            ("plans", &plans),
            ("completions", &completions),
        ] {
            if let Err(e) = result {
                tracing::error!(user_id, table, error = %e, "Reset delete failed");
            }
        }

        catalog?;
        plans?;
        completions?;

        if let Some(mut state) = self.states.get_mut(user_id) {
            state.clear();
        }

        tracing::info!(user_id, "All user data deleted");
        Ok(())
    }

    // ─── Persistence (fire-and-forget) ───────────────────────────

    fn check_plan_window(&self, date: NaiveDate) -> Result<(), AppError> {
        if !policy::can_edit_plan(date, self.today()) {
            return Err(AppError::WindowClosed(
                "Plans for past dates are read-only".to_string(),
            ));
        }
        Ok(())
    }

    fn persist_plan(&self, user_id: &str, date: &str, activities: Vec<PlannedActivity>) {
        let db = self.db.clone();
        let doc = PlanDoc {
            user_id: user_id.to_string(),
            date: date.to_string(),
            activities,
        };
        tokio::spawn(async move {
            if let Err(e) = db.upsert_plan(&doc).await {
                tracing::error!(
                    user_id = %doc.user_id,
                    date = %doc.date,
                    error = %e,
                    "Failed to persist plan; in-memory state kept"
                );
            }
        });
    }

    fn persist_completion(&self, user_id: &str, date: &str, completion_data: HashMap<String, bool>) {
        let db = self.db.clone();
        let doc = CompletionDoc {
            user_id: user_id.to_string(),
            date: date.to_string(),
            completion_data,
        };
        tokio::spawn(async move {
            if let Err(e) = db.upsert_completion(&doc).await {
                tracing::error!(
                    user_id = %doc.user_id,
                    date = %doc.date,
                    error = %e,
                    "Failed to persist completion; in-memory state kept"
                );
            }
        });
    }

    fn persist_catalog_entry(&self, user_id: &str, name: &str) {
        let db = self.db.clone();
        let entry = CatalogEntryDoc {
            user_id: user_id.to_string(),
            activity_name: name.to_string(),
        };
        tokio::spawn(async move {
            if let Err(e) = db.insert_catalog_entry(&entry).await {
                tracing::error!(
                    user_id = %entry.user_id,
                    error = %e,
                    "Failed to persist catalog entry; in-memory state kept"
                );
            }
        });
    }
}
