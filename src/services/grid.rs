// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity grid builder.
//!
//! Projects the trailing year onto a fixed 53-week heatmap. A pure
//! function of `(today, record set)`: identical inputs always produce
//! an identical grid.

use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate};

use crate::models::grid::{ActivityGrid, ActivityGridCell, DAYS_PER_WEEK, GRID_DAYS};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// First cell of the grid: the Sunday on or before `today - 365 days`,
/// so columns always align to week boundaries.
pub fn grid_start(today: NaiveDate) -> NaiveDate {
    let anchor = today
        .checked_sub_days(Days::new(365))
        .unwrap_or(NaiveDate::MIN);
    let back = anchor.weekday().num_days_from_sunday();
    anchor
        .checked_sub_days(Days::new(u64::from(back)))
        .unwrap_or(anchor)
}

/// Build the 53x7 heatmap for one user.
///
/// Days absent from `minutes_by_day` render as 0. Dates after `today`
/// are marked future and forced to 0 even if a stored value exists.
pub fn build_activity_grid(
    today: NaiveDate,
    minutes_by_day: &HashMap<NaiveDate, u32>,
) -> ActivityGrid {
    let start = grid_start(today);

    let cells: Vec<ActivityGridCell> = (0..GRID_DAYS as u64)
        .map(|offset| {
            // In-range for any realistic `today`; clamp instead of panicking
            let date = start.checked_add_days(Days::new(offset)).unwrap_or(start);
            let is_future = date > today;
            let value = if is_future {
                0
            } else {
                minutes_by_day.get(&date).copied().unwrap_or(0)
            };
            ActivityGridCell {
                date,
                value,
                is_future,
            }
        })
        .collect();

    let weeks: Vec<Vec<ActivityGridCell>> = cells
        .chunks(DAYS_PER_WEEK)
        .map(|week| week.to_vec())
        .collect();

    let month_labels = month_labels(&weeks);

    ActivityGrid {
        weeks,
        month_labels,
    }
}

/// Sparse month headers: a week is labeled only when its first day falls
/// in a month different from the previously labeled week's.
fn month_labels(weeks: &[Vec<ActivityGridCell>]) -> Vec<String> {
    let mut labels = Vec::with_capacity(weeks.len());
    let mut last_labeled: Option<u32> = None;

    for week in weeks {
        let month = week.first().map(|c| c.date.month());
        match month {
            Some(m) if last_labeled != Some(m) => {
                labels.push(MONTH_NAMES[(m - 1) as usize].to_string());
                last_labeled = Some(m);
            }
            _ => labels.push(String::new()),
        }
    }

    labels
}
