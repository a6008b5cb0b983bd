// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard aggregation: rolling-window stats and the heatmap grid.
//!
//! Read-only over [`DayState`]; nothing here mutates the store.

use crate::calendar::{add_days, canonical_date};
use crate::models::day_state::DayState;
use crate::models::stats::{heat_level, BestDay, DailyStats, RollingStats};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Aggregate daily stats over the inclusive `start..=end` window.
///
/// Days without a plan are skipped entirely: they contribute nothing to
/// the completed total and are excluded from the average rather than
/// counted as 0%. The best day is the first day whose percentage strictly
/// exceeds the running best, so a window of all-zero planned days has no
/// best day.
pub fn rolling_stats(state: &DayState, start: NaiveDate, end: NaiveDate) -> RollingStats {
    let mut total_completed = 0u32;
    let mut percentages: Vec<u32> = Vec::new();
    let mut best_day: Option<BestDay> = None;

    let mut day = start;
    while day <= end {
        let stats = state.daily_stats(&canonical_date(day));
        if stats.total > 0 {
            total_completed += stats.completed;
            percentages.push(stats.percentage);

            let best = best_day.as_ref().map_or(0, |b| b.percentage);
            if stats.percentage > best {
                best_day = Some(BestDay {
                    date: canonical_date(day),
                    percentage: stats.percentage,
                });
            }
        }
        day = add_days(day, 1);
    }

    let average_score = if percentages.is_empty() {
        0
    } else {
        (percentages.iter().map(|&p| f64::from(p)).sum::<f64>() / percentages.len() as f64).round()
            as u32
    };

    RollingStats {
        average_score,
        total_completed,
        best_day,
    }
}

/// One tile in the week-aligned heatmap grid.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeatmapCell {
    /// Grid padding before the anchor date.
    Empty,
    /// After today; rendered non-interactive.
    Future { date: String },
    /// A live day with its stats and 0–4 heat level.
    Day {
        date: String,
        level: u8,
        stats: DailyStats,
        is_today: bool,
    },
}

/// Build the heatmap grid from `anchor` through `today` as Sunday-started
/// week columns. Padding cells before the anchor come back as `Empty` and
/// cells after today as `Future`; neither class feeds aggregation.
pub fn heatmap_weeks(state: &DayState, anchor: NaiveDate, today: NaiveDate) -> Vec<Vec<HeatmapCell>> {
    let lead = i64::from(anchor.weekday().num_days_from_sunday());
    let grid_start = add_days(anchor, -lead);
    let tail = 6 - i64::from(today.weekday().num_days_from_sunday());
    let grid_end = add_days(today, tail);

    let mut weeks = Vec::new();
    let mut day = grid_start;
    while day <= grid_end {
        let mut week = Vec::with_capacity(7);
        for _ in 0..7 {
            let cell = if day < anchor {
                HeatmapCell::Empty
            } else if day > today {
                HeatmapCell::Future {
                    date: canonical_date(day),
                }
            } else {
                let stats = state.daily_stats(&canonical_date(day));
                HeatmapCell::Day {
                    date: canonical_date(day),
                    level: heat_level(stats.percentage),
                    stats,
                    is_today: day == today,
                }
            };
            week.push(cell);
            day = add_days(day, 1);
        }
        weeks.push(week);
    }
    weeks
}
