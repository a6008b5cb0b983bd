// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Completion statistics types and heat-level buckets.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Per-day completion totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DailyStats {
    pub total: u32,
    pub completed: u32,
    /// `round(completed / total * 100)`; 0 when the plan is empty.
    pub percentage: u32,
}

/// The best-scoring day in a rolling window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct BestDay {
    /// Canonical `YYYY-MM-DD` date key.
    pub date: String,
    pub percentage: u32,
}

/// Aggregates over an inclusive window of days.
///
/// Days without a plan are excluded from the average rather than counted
/// as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RollingStats {
    /// Rounded mean of per-day percentages across planned days.
    pub average_score: u32,
    /// Sum of completed counts across planned days.
    pub total_completed: u32,
    pub best_day: Option<BestDay>,
}

/// Map a completion percentage to its 0–4 heatmap bucket.
///
/// Boundaries are strict: 25 is level 1, 26 is level 2.
pub fn heat_level(percentage: u32) -> u8 {
    match percentage {
        0 => 0,
        1..=25 => 1,
        26..=50 => 2,
        51..=75 => 3,
        _ => 4,
    }
}
