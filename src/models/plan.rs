// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Planned-activity model and storage documents.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A single activity planned for one date.
///
/// The id is unique within its date's plan and stable across reorders and
/// save/reload; completion records are keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlannedActivity {
    pub id: String,
    pub name: String,
}

/// High-water mark of issued ids, in milliseconds since the epoch.
static LAST_ID_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Generate a fresh activity id.
///
/// Wall-clock milliseconds rendered as a decimal string, forced strictly
/// increasing within the process so rapid additions never collide. Ids only
/// need to be unique within one date's plan.
pub fn next_activity_id() -> String {
    let now = chrono::Utc::now().timestamp_millis();
    let prev = LAST_ID_MILLIS
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |prev| {
            Some(now.max(prev + 1))
        })
        .unwrap_or(0);
    now.max(prev + 1).to_string()
}

/// Row in the `plans` collection, upserted by `(user_id, date)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDoc {
    pub user_id: String,
    /// Canonical `YYYY-MM-DD` date key.
    pub date: String,
    pub activities: Vec<PlannedActivity>,
}

/// Row in the `completions` collection, upserted by `(user_id, date)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionDoc {
    pub user_id: String,
    /// Canonical `YYYY-MM-DD` date key.
    pub date: String,
    /// Activity id → completed flag. Absent ids count as not completed.
    pub completion_data: HashMap<String, bool>,
}

/// Row in the `activity_catalog` collection, unique per `(user_id, name)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntryDoc {
    pub user_id: String,
    pub activity_name: String,
}
