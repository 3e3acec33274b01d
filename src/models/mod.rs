// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod grid;
pub mod stats;
pub mod user;

pub use activity::DailyActivity;
pub use grid::{ActivityGrid, ActivityGridCell};
pub use stats::StreakStats;
pub use user::User;
