// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile + lifetime-total aggregate)
//! - Daily activity (one document per user-day)
//! - Atomic session recording (day document + lifetime total together)

use chrono::NaiveDate;

use crate::db::collections;
use crate::error::AppError;
use crate::models::{DailyActivity, User};
use crate::time_utils::format_utc_rfc3339;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.user_id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Daily Activity Operations ───────────────────────────────

    /// Get a single user-day document.
    pub async fn get_daily_activity(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyActivity>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::DAILY_ACTIVITY)
            .obj()
            .one(&DailyActivity::doc_id(user_id, date))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Range query: one user's daily series over `[start, end]`,
    /// ascending by date.
    ///
    /// Dates are stored as `YYYY-MM-DD` strings, so lexicographic
    /// comparison matches calendar order.
    pub async fn query_daily_activity(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyActivity>, AppError> {
        let user_id = user_id.to_string();
        let start = start.to_string();
        let end = end.to_string();

        self.get_client()?
            .fluent()
            .select()
            .from(collections::DAILY_ACTIVITY)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id.clone()),
                    q.field("date").greater_than_or_equal(start.clone()),
                    q.field("date").less_than_or_equal(end.clone()),
                ])
            })
            .order_by([("date", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a user-day document.
    pub async fn upsert_daily_activity(&self, record: &DailyActivity) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::DAILY_ACTIVITY)
            .document_id(&DailyActivity::doc_id(&record.user_id, record.date))
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Atomic Session Recording ────────────────────────────────

    /// Atomically record a completed study session: mutate the day's
    /// document and the user's lifetime-total aggregate together.
    ///
    /// Uses a Firestore transaction so both writes succeed or fail as a
    /// unit. If another request mutates the same documents concurrently,
    /// Firestore retries with fresh data, preventing lost minutes.
    ///
    /// Returns the updated day record and user profile.
    pub async fn record_session_atomic(
        &self,
        user_id: &str,
        date: NaiveDate,
        minutes: u32,
    ) -> Result<(DailyActivity, User), AppError> {
        let now = format_utc_rfc3339(chrono::Utc::now());

        // Begin a transaction
        let mut transaction = self
            .get_client()?
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // 1. Read the user profile; registers the doc for conflict detection
        let mut user = self
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {}", user_id)))?;

        // 2. Read the day's document (may not exist yet)
        let mut record = self
            .get_daily_activity(user_id, date)
            .await?
            .unwrap_or(DailyActivity {
                user_id: user_id.to_string(),
                date,
                minutes: 0,
                session_count: 0,
                updated_at: now.clone(),
            });

        // 3. Mutate both in memory
        record.minutes = record.minutes.saturating_add(minutes);
        record.session_count = record.session_count.saturating_add(1);
        record.updated_at = now.clone();

        user.lifetime_focus_minutes = user.lifetime_focus_minutes.saturating_add(u64::from(minutes));
        user.last_active = now.clone();

        // 4. Add the day write to the transaction
        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::DAILY_ACTIVITY)
            .document_id(&DailyActivity::doc_id(user_id, date))
            .object(&record)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add day record to transaction: {}", e))
            })?;

        // 5. Add the user write to the transaction
        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(user_id)
            .object(&user)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add user to transaction: {}", e))
            })?;

        // 6. Commit atomically
        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(
            user_id,
            date = %date,
            minutes,
            day_total = record.minutes,
            "Study session recorded atomically"
        );

        Ok((record, user))
    }
}
