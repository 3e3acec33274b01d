// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Streak calculator.
//!
//! Pure functions over the per-day study series. The caller supplies the
//! reference day explicitly; nothing here reads the clock. Missing
//! calendar days are zero-minute days, not "no information": a gap in
//! the series breaks a streak.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};

use crate::models::{DailyActivity, StreakStats};
use crate::services::average::average_minutes_per_day;

/// Upper bound on the backward walk, against corrupt or cyclic data.
///
/// The walk is inclusive of today, so it inspects `MAX_LOOKBACK_DAYS + 1`
/// calendar days and the current streak caps at 366. Intentional; see
/// `test_lookback_bounded_at_a_year`.
pub const MAX_LOOKBACK_DAYS: u32 = 365;

/// Compute all streak statistics for one user.
///
/// `records` is the user's daily series in any order; days dated after
/// `today` are ignored (clamped, not an error, since this is a display
/// statistic). `lifetime_total_minutes` is the raw lifetime aggregate,
/// deliberately not derived from `records`.
pub fn compute_streak_stats(
    records: &[DailyActivity],
    signup_date: NaiveDate,
    lifetime_total_minutes: u64,
    today: NaiveDate,
) -> StreakStats {
    let qualifying = qualifying_days(records, today);

    StreakStats {
        current_streak: current_streak(&qualifying, today),
        longest_streak: longest_streak(&qualifying),
        total_study_days: qualifying.len() as u32,
        average_minutes_per_day: average_minutes_per_day(
            lifetime_total_minutes,
            signup_date,
            today,
        ),
    }
}

/// Days meeting the qualifying threshold, future dates dropped.
fn qualifying_days(records: &[DailyActivity], today: NaiveDate) -> BTreeSet<NaiveDate> {
    records
        .iter()
        .filter(|r| r.qualifies() && r.date <= today)
        .map(|r| r.date)
        .collect()
}

/// Walk backward from `today`, counting consecutive qualifying days.
///
/// Today with no qualifying record is "still open": skipped without
/// breaking the run. Any earlier day without one terminates the walk.
fn current_streak(qualifying: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0u32;
    let mut day = today;

    for _ in 0..=MAX_LOOKBACK_DAYS {
        if qualifying.contains(&day) {
            streak += 1;
        } else if day != today {
            break;
        }

        match day.checked_sub_days(Days::new(1)) {
            Some(prev) => day = prev,
            None => break,
        }
    }

    streak
}

/// Longest consecutive run across the whole observed history.
fn longest_streak(qualifying: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;

    for &day in qualifying {
        run = match prev {
            Some(p) if p.checked_add_days(Days::new(1)) == Some(day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }

    longest
}
