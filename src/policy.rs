// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Edit-window policy.
//!
//! Planning looks forward: today and every future date accept plan edits,
//! past dates are read-only. Checking off reflects reality and only a
//! two-day rolling window (today and yesterday) may be toggled, so the
//! previous evening's items can still be marked the next morning.

use crate::calendar::add_days;
use chrono::NaiveDate;

/// True when `date` accepts plan mutations (add/delete/reorder).
pub fn can_edit_plan(date: NaiveDate, today: NaiveDate) -> bool {
    date >= today
}

/// True when `date` accepts completion toggles.
pub fn can_edit_completion(date: NaiveDate, today: NaiveDate) -> bool {
    date == today || date == add_days(today, -1)
}
