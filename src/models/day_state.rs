// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user day state: ordered plans, completion maps, activity catalog.
//!
//! This is the in-memory source of truth the API serves from. All
//! mutations here are synchronous and pure; the service layer applies a
//! mutation locally first and persists the result afterwards, so this
//! module never touches the database or the clock (activity ids excepted).

use crate::models::plan::{next_activity_id, PlannedActivity};
use crate::models::stats::DailyStats;
use std::collections::HashMap;

/// Maximum number of autocomplete suggestions returned.
const MAX_SUGGESTIONS: usize = 5;

/// One user's complete planner state, keyed by canonical date strings.
#[derive(Debug, Clone, Default)]
pub struct DayState {
    /// Previously-used activity names, in insertion order.
    catalog: Vec<String>,
    plans: HashMap<String, Vec<PlannedActivity>>,
    completions: HashMap<String, HashMap<String, bool>>,
}

/// Result of adding an activity to a plan.
#[derive(Debug, Clone)]
pub struct AddOutcome {
    pub activity: PlannedActivity,
    /// Whether the name was new to the catalog (and needs persisting).
    pub catalog_grew: bool,
}

/// Catalog entries matching an autocomplete query.
#[derive(Debug, Clone)]
pub struct SuggestionSet {
    pub names: Vec<String>,
    /// Whether the query matches a catalog entry case-insensitively in
    /// full. When false and the query is non-empty, the UI offers a
    /// "create new" affordance.
    pub exact_match: bool,
}

impl DayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild state from hydrated storage rows.
    pub fn from_parts(
        catalog: Vec<String>,
        plans: HashMap<String, Vec<PlannedActivity>>,
        completions: HashMap<String, HashMap<String, bool>>,
    ) -> Self {
        Self {
            catalog,
            plans,
            completions,
        }
    }

    // ─── Catalog ─────────────────────────────────────────────────

    pub fn catalog(&self) -> &[String] {
        &self.catalog
    }

    /// Register a name, skipping exact (case-sensitive) duplicates.
    ///
    /// Returns true when the catalog grew.
    pub fn add_to_catalog(&mut self, name: &str) -> bool {
        if self.catalog.iter().any(|n| n == name) {
            return false;
        }
        self.catalog.push(name.to_string());
        true
    }

    /// Catalog entries containing `query` case-insensitively, in stored
    /// order, capped at [`MAX_SUGGESTIONS`]. An empty query matches all.
    pub fn suggestions(&self, query: &str) -> SuggestionSet {
        let needle = query.to_lowercase();
        let names = self
            .catalog
            .iter()
            .filter(|name| needle.is_empty() || name.to_lowercase().contains(&needle))
            .take(MAX_SUGGESTIONS)
            .cloned()
            .collect();
        let exact_match =
            !needle.is_empty() && self.catalog.iter().any(|name| name.to_lowercase() == needle);
        SuggestionSet { names, exact_match }
    }

    // ─── Plans ───────────────────────────────────────────────────

    /// Ordered plan for a date; empty when none exists.
    pub fn plan(&self, date: &str) -> &[PlannedActivity] {
        self.plans.get(date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace the entire ordered sequence for a date. This is the only
    /// plan mutation primitive; add/delete/reorder are expressed through
    /// it.
    pub fn set_plan(&mut self, date: &str, activities: Vec<PlannedActivity>) {
        self.plans.insert(date.to_string(), activities);
    }

    /// Append a freshly-identified activity and register its name in the
    /// catalog. Returns `None` for an empty or whitespace-only name.
    pub fn add_activity(&mut self, date: &str, name: &str) -> Option<AddOutcome> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let activity = PlannedActivity {
            id: next_activity_id(),
            name: name.to_string(),
        };
        let mut plan = self.plan(date).to_vec();
        plan.push(activity.clone());
        self.set_plan(date, plan);
        let catalog_grew = self.add_to_catalog(name);
        Some(AddOutcome {
            activity,
            catalog_grew,
        })
    }

    /// Remove an activity by id; no-op when the id is absent.
    ///
    /// The completion map is left untouched: entries for removed ids go
    /// inert rather than being pruned.
    pub fn delete_activity(&mut self, date: &str, id: &str) -> bool {
        let mut plan = self.plan(date).to_vec();
        let before = plan.len();
        plan.retain(|a| a.id != id);
        if plan.len() == before {
            return false;
        }
        self.set_plan(date, plan);
        true
    }

    /// Move `moved_id` to the position held by `target_id`, shifting the
    /// rest. Positions are resolved by id lookup, never by display index.
    /// No-op when either id is absent.
    pub fn reorder_activity(&mut self, date: &str, moved_id: &str, target_id: &str) -> bool {
        if moved_id == target_id {
            return false;
        }
        let mut plan = self.plan(date).to_vec();
        let Some(from) = plan.iter().position(|a| a.id == moved_id) else {
            return false;
        };
        let Some(to) = plan.iter().position(|a| a.id == target_id) else {
            return false;
        };
        let moved = plan.remove(from);
        plan.insert(to, moved);
        self.set_plan(date, plan);
        true
    }

    // ─── Completions ─────────────────────────────────────────────

    /// Completion map for a date; empty when none exists.
    pub fn completion(&self, date: &str) -> HashMap<String, bool> {
        self.completions.get(date).cloned().unwrap_or_default()
    }

    /// Replace the entire completion map for a date.
    pub fn set_completion(&mut self, date: &str, map: HashMap<String, bool>) {
        self.completions.insert(date.to_string(), map);
    }

    /// Flip the completion flag for `id` (absent entries count as false).
    /// Returns the new value.
    pub fn toggle_completion(&mut self, date: &str, id: &str) -> bool {
        let map = self.completions.entry(date.to_string()).or_default();
        let flag = map.entry(id.to_string()).or_insert(false);
        *flag = !*flag;
        *flag
    }

    // ─── Stats ───────────────────────────────────────────────────

    /// Per-day totals. An empty plan yields all zeros, never a division
    /// error.
    pub fn daily_stats(&self, date: &str) -> DailyStats {
        let plan = self.plan(date);
        if plan.is_empty() {
            return DailyStats::default();
        }

        let completion = self.completions.get(date);
        let completed = plan
            .iter()
            .filter(|a| {
                completion
                    .and_then(|m| m.get(&a.id))
                    .copied()
                    .unwrap_or(false)
            })
            .count() as u32;
        let total = plan.len() as u32;
        let percentage = ((completed as f64 / total as f64) * 100.0).round() as u32;

        DailyStats {
            total,
            completed,
            percentage,
        }
    }

    /// Drop everything (after a successful remote reset).
    pub fn clear(&mut self) {
        self.catalog.clear();
        self.plans.clear();
        self.completions.clear();
    }
}
