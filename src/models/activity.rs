// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily study activity model for storage and API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Minimum minutes for a day to count toward a streak.
///
/// Domain rule, not per-user configurable. Exactly 29 minutes does not
/// qualify; exactly 30 does.
pub const QUALIFYING_MINUTES: u32 = 30;

/// One calendar day of recorded study time, stored in Firestore.
///
/// Document ID: `{user_id}_{YYYY-MM-DD}`; at most one document per
/// user-day. The document is mutated in place as sessions complete and
/// is never deleted by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyActivity {
    /// Owning user ID
    pub user_id: String,
    /// Calendar day (serialized as `YYYY-MM-DD`, sorts lexicographically)
    pub date: NaiveDate,
    /// Total focused-study minutes recorded that day
    pub minutes: u32,
    /// Number of sessions contributing to `minutes`
    pub session_count: u32,
    /// Last mutation timestamp (RFC3339)
    pub updated_at: String,
}

impl DailyActivity {
    /// Firestore document ID for a user-day.
    pub fn doc_id(user_id: &str, date: NaiveDate) -> String {
        format!("{}_{}", user_id, date)
    }

    /// Whether this day counts toward a streak.
    pub fn qualifies(&self) -> bool {
        self.minutes >= QUALIFYING_MINUTES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: &str, minutes: u32) -> DailyActivity {
        DailyActivity {
            user_id: "u1".to_string(),
            date: date.parse().unwrap(),
            minutes,
            session_count: 1,
            updated_at: "2026-08-28T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_qualifying_threshold_is_strict() {
        assert!(!day("2026-08-28", 29).qualifies());
        assert!(day("2026-08-28", 30).qualifies());
        assert!(!day("2026-08-28", 0).qualifies());
    }

    #[test]
    fn test_doc_id_format() {
        let d: NaiveDate = "2026-08-28".parse().unwrap();
        assert_eq!(DailyActivity::doc_id("u1", d), "u1_2026-08-28");
    }

    #[test]
    fn test_date_serializes_as_iso_day() {
        let json = serde_json::to_value(day("2026-08-28", 45)).unwrap();
        assert_eq!(json["date"], "2026-08-28");
    }
}
