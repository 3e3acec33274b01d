// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Average-minutes recalculator.
//!
//! Fed by the lifetime-total aggregate on the user document rather than
//! the per-day series, so it can update the moment a session lands
//! without waiting for a full series refetch. Kept separate from the
//! qualifying-day logic: raw lifetime minutes over all days since
//! signup, not just qualifying or active days.

use chrono::NaiveDate;

/// Lifetime minutes divided by days since signup (inclusive), rounded to
/// the nearest integer.
///
/// A same-day signup or a signup date after `today` clamps the
/// denominator to 1 rather than erroring.
pub fn average_minutes_per_day(
    lifetime_total_minutes: u64,
    signup_date: NaiveDate,
    today: NaiveDate,
) -> u32 {
    let days_since_signup = (today - signup_date).num_days() + 1;
    let days = days_since_signup.max(1) as u64;

    // Round-to-nearest integer division, no float
    let avg = (lifetime_total_minutes + days / 2) / days;
    u32::try_from(avg).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_exact_division() {
        // 600 minutes over 9 days inclusive
        assert_eq!(
            average_minutes_per_day(600, date("2026-08-20"), date("2026-08-28")),
            60
        );
    }

    #[test]
    fn test_rounds_to_nearest() {
        // 100 / 3 = 33.33 -> 33; 101 / 3 = 33.67 -> 34
        assert_eq!(
            average_minutes_per_day(100, date("2026-08-26"), date("2026-08-28")),
            33
        );
        assert_eq!(
            average_minutes_per_day(101, date("2026-08-26"), date("2026-08-28")),
            34
        );
    }

    #[test]
    fn test_same_day_signup() {
        assert_eq!(
            average_minutes_per_day(45, date("2026-08-28"), date("2026-08-28")),
            45
        );
    }

    #[test]
    fn test_signup_after_today_clamps() {
        assert_eq!(
            average_minutes_per_day(45, date("2026-09-10"), date("2026-08-28")),
            45
        );
    }

    #[test]
    fn test_zero_lifetime_total() {
        assert_eq!(
            average_minutes_per_day(0, date("2025-01-01"), date("2026-08-28")),
            0
        );
    }
}
