// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// One document per user-day, keyed `{user_id}_{YYYY-MM-DD}`
    pub const DAILY_ACTIVITY: &str = "daily_activity";
}
