// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived streak statistics.
//!
//! Never persisted; recomputed on every refresh from the daily series
//! and the lifetime-total aggregate.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Streak statistics for one user.
///
/// Invariant: `current_streak <= longest_streak`, and `total_study_days`
/// never exceeds the number of distinct days in the queried range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StreakStats {
    /// Consecutive qualifying days ending at today (or the most recent
    /// qualifying day while today is still open)
    pub current_streak: u32,
    /// Longest qualifying-day run across the observed history
    pub longest_streak: u32,
    /// Count of qualifying days
    pub total_study_days: u32,
    /// Lifetime minutes over all days since signup (inclusive), rounded
    pub average_minutes_per_day: u32,
}
