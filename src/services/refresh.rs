// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Live refresh controller.
//!
//! Holds the derived streak state per tracked user and recomputes it on
//! a fixed poll interval, on session mutations, and on manual refresh.
//! Snapshots are replaced wholesale after a successful fetch+compute,
//! never mutated incrementally, so overlapping refreshes reduce to
//! last-write-wins over idempotent recomputation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use tokio::time::MissedTickBehavior;

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{ActivityGrid, StreakStats};
use crate::services::average::average_minutes_per_day;
use crate::services::grid::{build_activity_grid, grid_start};
use crate::services::streaks::compute_streak_stats;
use crate::time_utils::{format_utc_rfc3339, today_utc};

/// Poll period for background refreshes.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Users whose snapshot has not been requested for this long are
/// dropped from the poll set, keeping the per-user maps bounded by
/// recently active users rather than every user ever seen.
pub const IDLE_EVICT_AFTER: Duration = Duration::from_secs(3 * REFRESH_INTERVAL.as_secs());

/// Derived state for one user, served to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct StreakSnapshot {
    pub stats: StreakStats,
    pub grid: ActivityGrid,
    pub loading: bool,
    /// Code of the last fetch failure, if any (see [`AppError::code`]).
    /// Stats stay stale-but-available; details go to the log only.
    pub error: Option<String>,
    /// When the snapshot was last successfully recomputed (RFC3339)
    pub refreshed_at: Option<String>,
}

impl StreakSnapshot {
    fn empty(today: NaiveDate) -> Self {
        Self {
            stats: StreakStats::default(),
            grid: build_activity_grid(today, &HashMap::new()),
            loading: true,
            error: None,
            refreshed_at: None,
        }
    }
}

/// Process-wide controller for streak snapshots.
///
/// Shared via `Arc` in `AppState`; the maps are shared across all
/// requests within an instance.
pub struct StreakEngine {
    db: FirestoreDb,
    /// Latest derived snapshot per tracked user
    snapshots: DashMap<String, StreakSnapshot>,
    /// Marker per user with a fetch+recompute in flight
    in_flight: DashMap<String, ()>,
    /// When each tracked user's snapshot was last requested
    last_seen: DashMap<String, Instant>,
}

impl StreakEngine {
    pub fn new(db: FirestoreDb) -> Self {
        Self {
            db,
            snapshots: DashMap::new(),
            in_flight: DashMap::new(),
            last_seen: DashMap::new(),
        }
    }

    /// Start tracking a user (consumer mount). Returns the current
    /// snapshot, creating an empty loading one if this is the first call.
    pub fn track(&self, user_id: &str) -> StreakSnapshot {
        self.last_seen.insert(user_id.to_string(), Instant::now());
        self.snapshots
            .entry(user_id.to_string())
            .or_insert_with(|| StreakSnapshot::empty(today_utc()))
            .clone()
    }

    /// Stop tracking a user (consumer teardown). Any refresh still in
    /// flight for them discards its result on arrival.
    pub fn evict(&self, user_id: &str) {
        self.last_seen.remove(user_id);
        self.snapshots.remove(user_id);
    }

    /// Latest snapshot for a user, if tracked.
    pub fn snapshot(&self, user_id: &str) -> Option<StreakSnapshot> {
        let snap = self.snapshots.get(user_id).map(|s| s.clone());
        if snap.is_some() {
            self.last_seen.insert(user_id.to_string(), Instant::now());
        }
        snap
    }

    /// Evict every user whose snapshot has not been requested within
    /// `ttl`. Run by the poller so the poll set only covers users still
    /// looking at their dashboard.
    fn evict_idle(&self, ttl: Duration) {
        let now = Instant::now();
        let idle: Vec<String> = self
            .last_seen
            .iter()
            .filter(|entry| now.duration_since(*entry.value()) >= ttl)
            .map(|entry| entry.key().clone())
            .collect();
        for user_id in idle {
            tracing::debug!(user_id = %user_id, "Evicting idle user from poll set");
            self.evict(&user_id);
        }
    }

    /// Full refresh cycle: fetch the trailing daily series, recompute
    /// stats and grid, swap the snapshot.
    ///
    /// Concurrent calls for the same user collapse: a trigger arriving
    /// while a cycle is in flight returns the current snapshot and is
    /// superseded by the in-flight cycle completing.
    ///
    /// A failed fetch keeps the previous stats and sets `error`; the
    /// next tick or trigger may succeed.
    pub async fn refresh(&self, user_id: &str) -> StreakSnapshot {
        match self.in_flight.entry(user_id.to_string()) {
            Entry::Occupied(_) => {
                tracing::debug!(user_id, "Refresh already in flight, collapsing");
                return self.track(user_id);
            }
            Entry::Vacant(entry) => {
                entry.insert(());
            }
        }

        if let Some(mut snap) = self.snapshots.get_mut(user_id) {
            snap.loading = true;
        }

        let today = today_utc();
        let result = self.fetch_and_compute(user_id, today).await;
        self.in_flight.remove(user_id);

        // Discard the result if the user was evicted mid-flight
        let mut entry = match self.snapshots.entry(user_id.to_string()) {
            Entry::Occupied(entry) => entry,
            Entry::Vacant(_) => {
                tracing::debug!(user_id, "User evicted during refresh, discarding result");
                return StreakSnapshot::empty(today);
            }
        };

        let mut snapshot = entry.get().clone();
        match result {
            Ok((stats, grid)) => {
                snapshot = StreakSnapshot {
                    stats,
                    grid,
                    loading: false,
                    error: None,
                    refreshed_at: Some(format_utc_rfc3339(chrono::Utc::now())),
                };
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Streak refresh failed, keeping stale stats");
                snapshot.loading = false;
                // Clients get the code only; the message may carry
                // backend internals and stays in the log.
                snapshot.error = Some(e.code().to_string());
            }
        }

        entry.insert(snapshot.clone());
        snapshot
    }

    /// Recompute only the average-minutes statistic, synchronously.
    ///
    /// Driven by the lifetime-total aggregate rather than the daily
    /// series, so it runs the moment a session lands (or the signup date
    /// changes) without waiting for a full refetch.
    pub fn recompute_average(
        &self,
        user_id: &str,
        lifetime_total_minutes: u64,
        signup_date: NaiveDate,
        today: NaiveDate,
    ) {
        if let Some(mut snap) = self.snapshots.get_mut(user_id) {
            snap.stats.average_minutes_per_day =
                average_minutes_per_day(lifetime_total_minutes, signup_date, today);
            self.last_seen.insert(user_id.to_string(), Instant::now());
        }
    }

    async fn fetch_and_compute(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<(StreakStats, ActivityGrid), AppError> {
        let user = self
            .db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {}", user_id)))?;

        // The grid window starts on or before today-365, so one fetch
        // covers both the calculator and the grid builder.
        let records = self
            .db
            .query_daily_activity(user_id, grid_start(today), today)
            .await?;

        let stats = compute_streak_stats(
            &records,
            user.signup_date,
            user.lifetime_focus_minutes,
            today,
        );

        let minutes_by_day: HashMap<NaiveDate, u32> =
            records.iter().map(|r| (r.date, r.minutes)).collect();
        let grid = build_activity_grid(today, &minutes_by_day);

        tracing::debug!(
            user_id,
            days = records.len(),
            current_streak = stats.current_streak,
            "Streak snapshot recomputed"
        );

        Ok((stats, grid))
    }

    /// Spawn the background poller: every [`REFRESH_INTERVAL`], drop
    /// users idle past [`IDLE_EVICT_AFTER`] and refresh the rest. One
    /// task per process.
    pub fn spawn_poller(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let engine = self;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(REFRESH_INTERVAL);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // Consume the immediate first tick; initial refreshes happen
            // on consumer mount, not here.
            interval.tick().await;

            loop {
                interval.tick().await;
                engine.evict_idle(IDLE_EVICT_AFTER);
                let users: Vec<String> =
                    engine.snapshots.iter().map(|e| e.key().clone()).collect();
                tracing::debug!(count = users.len(), "Polling refresh tick");
                for user_id in users {
                    engine.refresh(&user_id).await;
                }
            }
        })
    }
}
