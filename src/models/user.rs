// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// User profile stored in Firestore.
///
/// `lifetime_focus_minutes` is a running aggregate kept in step with the
/// daily activity documents by the session-ingest transaction. It feeds
/// the average-minutes statistic directly so that stat can update
/// without refetching the daily series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID from the identity layer (also used as document ID)
    pub user_id: String,
    /// Email address (may be None if not shared)
    pub email: Option<String>,
    /// Display name
    pub display_name: String,
    /// Signup day (`YYYY-MM-DD`)
    pub signup_date: NaiveDate,
    /// Total focused-study minutes ever recorded
    #[serde(default)]
    pub lifetime_focus_minutes: u64,
    /// When the user first connected (RFC3339)
    pub created_at: String,
    /// Last activity timestamp (RFC3339)
    pub last_active: String,
}
