// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity heatmap grid types (53 weeks x 7 days).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Number of week columns in the heatmap.
pub const GRID_WEEKS: usize = 53;
/// Rows per week column.
pub const DAYS_PER_WEEK: usize = 7;
/// Total cells: 53 weeks x 7 days.
pub const GRID_DAYS: usize = GRID_WEEKS * DAYS_PER_WEEK;

/// One day cell in the heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityGridCell {
    /// Calendar day (`YYYY-MM-DD`)
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    /// Minutes recorded that day; 0 if absent or in the future
    pub value: u32,
    /// True for any date after the reference day
    pub is_future: bool,
}

/// Year-long activity heatmap, always exactly 53 x 7 cells.
///
/// `month_labels` has one entry per week column; all but the first week
/// of each month carry an empty label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityGrid {
    pub weeks: Vec<Vec<ActivityGridCell>>,
    pub month_labels: Vec<String>,
}
