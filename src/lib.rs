// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! StudyStreak: streak analytics backend for a study-collaboration app
//!
//! This crate derives consecutive-day study streaks, longest-streak
//! records, and rolling averages from per-day study-minute totals, and
//! projects a year of activity onto a 53-week heatmap grid.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use db::FirestoreDb;
use services::{SessionProcessor, StreakEngine};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub engine: Arc<StreakEngine>,
    pub sessions: SessionProcessor,
}
