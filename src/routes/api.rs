// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{ActivityGrid, StreakStats};
use crate::services::StreakSnapshot;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/streaks", get(get_streaks))
        .route("/api/streaks/refresh", post(refresh_streaks))
        .route("/api/sessions", post(record_session))
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub user_id: String,
    pub display_name: String,
    pub signup_date: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub lifetime_focus_minutes: u64,
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let profile = state.db.get_user(&user.user_id).await?.ok_or_else(|| {
        crate::error::AppError::NotFound(format!("User {} not found", user.user_id))
    })?;

    Ok(Json(UserResponse {
        user_id: profile.user_id,
        display_name: profile.display_name,
        signup_date: profile.signup_date.to_string(),
        lifetime_focus_minutes: profile.lifetime_focus_minutes,
    }))
}

// ─── Streaks ─────────────────────────────────────────────────

/// Streak snapshot response served to the presentation layer.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StreakResponse {
    pub stats: StreakStats,
    pub grid: ActivityGrid,
    pub loading: bool,
    pub error: Option<String>,
    pub refreshed_at: Option<String>,
}

impl From<StreakSnapshot> for StreakResponse {
    fn from(snap: StreakSnapshot) -> Self {
        Self {
            stats: snap.stats,
            grid: snap.grid,
            loading: snap.loading,
            error: snap.error,
            refreshed_at: snap.refreshed_at,
        }
    }
}

/// Get streak stats and the activity grid for the current user.
///
/// The first call for a user ("mount") tracks them and runs the initial
/// refresh cycle; later calls serve the latest snapshot, which the
/// background poller keeps fresh.
async fn get_streaks(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StreakResponse>> {
    let snapshot = match state.engine.snapshot(&user.user_id) {
        Some(snap) if snap.refreshed_at.is_some() => snap,
        _ => {
            tracing::debug!(user_id = %user.user_id, "First streak request, running initial refresh");
            state.engine.track(&user.user_id);
            state.engine.refresh(&user.user_id).await
        }
    };

    Ok(Json(snapshot.into()))
}

/// Manually trigger an immediate refresh cycle.
async fn refresh_streaks(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StreakResponse>> {
    state.engine.track(&user.user_id);
    let snapshot = state.engine.refresh(&user.user_id).await;
    Ok(Json(snapshot.into()))
}

// ─── Sessions ────────────────────────────────────────────────

#[derive(Deserialize)]
struct RecordSessionRequest {
    /// Focused minutes in the completed session
    minutes: u32,
    /// Session day (`YYYY-MM-DD`); defaults to today
    date: Option<NaiveDate>,
}

/// Session recording response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecordSessionResponse {
    pub date: String,
    /// Day total after this session
    pub minutes: u32,
    pub session_count: u32,
}

/// Record a completed study session for the current user.
async fn record_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<RecordSessionRequest>,
) -> Result<Json<RecordSessionResponse>> {
    tracing::debug!(
        user_id = %user.user_id,
        minutes = payload.minutes,
        date = ?payload.date,
        "Session submitted via API"
    );

    let record = state
        .sessions
        .record_session(&user.user_id, payload.date, payload.minutes, "api")
        .await?;

    Ok(Json(RecordSessionResponse {
        date: record.date.to_string(),
        minutes: record.minutes,
        session_count: record.session_count,
    }))
}
