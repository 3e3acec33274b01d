// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Study session ingest.
//!
//! Handles the core mutation workflow:
//! 1. Clamp the incoming session data
//! 2. Atomically mutate the day's record and the lifetime-total aggregate
//! 3. Recompute the average-minutes statistic synchronously
//! 4. Trigger a full streak refresh in the background

use std::sync::Arc;

use chrono::NaiveDate;

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::DailyActivity;
use crate::services::refresh::StreakEngine;
use crate::time_utils::today_utc;

/// Upper bound on a single session's minutes (one full day).
pub const SESSION_MAX_MINUTES: u32 = 24 * 60;

/// Records completed study sessions and keeps derived state in step.
#[derive(Clone)]
pub struct SessionProcessor {
    db: FirestoreDb,
    engine: Arc<StreakEngine>,
}

impl SessionProcessor {
    pub fn new(db: FirestoreDb, engine: Arc<StreakEngine>) -> Self {
        Self { db, engine }
    }

    /// Record a completed session for a user.
    ///
    /// Args:
    /// - date: session day; absent or future dates clamp to today
    /// - minutes: focused minutes; capped at [`SESSION_MAX_MINUTES`]
    /// - source: "api" or "webhook"
    pub async fn record_session(
        &self,
        user_id: &str,
        date: Option<NaiveDate>,
        minutes: u32,
        source: &str,
    ) -> Result<DailyActivity> {
        if minutes == 0 {
            return Err(AppError::BadRequest(
                "Session must have at least one minute".to_string(),
            ));
        }

        let today = today_utc();
        let minutes = minutes.min(SESSION_MAX_MINUTES);
        // Display statistics clamp rather than reject slightly-off dates
        let date = date.unwrap_or(today).min(today);

        tracing::info!(user_id, date = %date, minutes, source, "Recording study session");

        let (record, user) = self.db.record_session_atomic(user_id, date, minutes).await?;

        // The lifetime total changed: update the average immediately,
        // without waiting for the series refetch below.
        self.engine.recompute_average(
            user_id,
            user.lifetime_focus_minutes,
            user.signup_date,
            today,
        );

        // Mutation notification: full refresh, off the request path.
        // Concurrent triggers collapse inside the engine.
        let engine = Arc::clone(&self.engine);
        let user_id = user_id.to_string();
        tokio::spawn(async move {
            engine.refresh(&user_id).await;
        });

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_processor() -> SessionProcessor {
        let db = FirestoreDb::new_mock();
        let engine = Arc::new(StreakEngine::new(db.clone()));
        SessionProcessor::new(db, engine)
    }

    #[tokio::test]
    async fn test_zero_minute_session_rejected() {
        let processor = offline_processor();
        let err = processor
            .record_session("u1", None, 0, "api")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_offline_db_surfaces_database_error() {
        let processor = offline_processor();
        let err = processor
            .record_session("u1", None, 25, "api")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
