// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fixed-offset calendar: the single reference timezone for all date keys.
//!
//! Every plan and completion lookup is keyed by the `YYYY-MM-DD` form of a
//! calendar day in IST (UTC+5:30). The host timezone never participates:
//! [`Calendar`] projects the wall clock into its fixed offset once, and all
//! downstream date math works on plain [`NaiveDate`] values.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};

/// IST offset from UTC in seconds (5 hours 30 minutes).
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// A calendar anchored to a constant UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct Calendar {
    offset: FixedOffset,
}

impl Calendar {
    /// The production calendar (IST, UTC+5:30).
    pub fn ist() -> Self {
        Self {
            // Constant is a valid offset; east_opt only fails beyond ±24h.
            offset: FixedOffset::east_opt(IST_OFFSET_SECS).expect("IST offset is valid"),
        }
    }

    /// A calendar at an arbitrary fixed offset.
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Current instant projected into the fixed offset.
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    /// Today's calendar day in the fixed offset.
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::ist()
    }
}

/// Format a calendar day as its canonical `YYYY-MM-DD` key.
///
/// Pure projection of the day's own components; no offset shifting.
pub fn canonical_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a canonical `YYYY-MM-DD` key back into a calendar day.
pub fn parse_canonical(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Calendar arithmetic; rolls over month and year boundaries.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}
