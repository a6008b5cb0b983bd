// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod day_state;
pub mod plan;
pub mod stats;

pub use day_state::{DayState, SuggestionSet};
pub use plan::{CatalogEntryDoc, CompletionDoc, PlanDoc, PlannedActivity};
pub use stats::{BestDay, DailyStats, RollingStats};
