// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook routes for study-timer session events.
//!
//! The timer service elsewhere in the application delivers completed
//! sessions here; each event funnels into the same ingest path as the
//! authenticated API and triggers an immediate streak refresh.

use crate::AppState;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Webhook routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/webhook/{uuid}", get(verify).post(handle_event))
}

/// Webhook verification query params (hub-challenge style).
#[derive(Deserialize)]
struct VerifyParams {
    #[serde(rename = "hub.mode")]
    mode: String,
    #[serde(rename = "hub.challenge")]
    challenge: String,
    #[serde(rename = "hub.verify_token")]
    verify_token: String,
}

/// Verification response.
#[derive(Serialize, Default)]
struct VerifyResponse {
    #[serde(rename = "hub.challenge")]
    challenge: String,
}

/// Verify webhook subscription (GET).
async fn verify(
    State(state): State<Arc<AppState>>,
    Path(uuid): Path<String>,
    Query(params): Query<VerifyParams>,
) -> impl IntoResponse {
    if uuid != state.config.webhook_path_uuid {
        tracing::warn!(
            received_uuid = %uuid,
            "Security Alert: Webhook path UUID mismatch (verify)"
        );
        return (StatusCode::NOT_FOUND, Json(VerifyResponse::default()));
    }

    if params.mode == "subscribe" && params.verify_token == state.config.webhook_verify_token {
        tracing::info!("Webhook subscription verified");
        (
            StatusCode::OK,
            Json(VerifyResponse {
                challenge: params.challenge,
            }),
        )
    } else {
        tracing::warn!(mode = %params.mode, "Webhook verification failed");
        (StatusCode::FORBIDDEN, Json(VerifyResponse::default()))
    }
}

/// Session event delivered by the timer service.
#[derive(Debug, Deserialize)]
struct SessionEvent {
    user_id: String,
    /// Focused minutes in the completed session
    minutes: u32,
    /// Session day; defaults to today when omitted
    date: Option<NaiveDate>,
}

/// Handle a session event (POST).
///
/// Always returns 200 for valid-shaped events on the correct path, even
/// when processing fails: the timer service retries on non-2xx and the
/// next poll tick recovers derived state anyway.
async fn handle_event(
    State(state): State<Arc<AppState>>,
    Path(uuid): Path<String>,
    Json(event): Json<SessionEvent>,
) -> impl IntoResponse {
    if uuid != state.config.webhook_path_uuid {
        tracing::warn!(
            received_uuid = %uuid,
            "Security Alert: Webhook path UUID mismatch (event)"
        );
        return StatusCode::NOT_FOUND;
    }

    tracing::info!(
        user_id = %event.user_id,
        minutes = event.minutes,
        date = ?event.date,
        "Session event received"
    );

    match state
        .sessions
        .record_session(&event.user_id, event.date, event.minutes, "webhook")
        .await
    {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::error!(user_id = %event.user_id, error = %e, "Failed to process session event");
            StatusCode::OK
        }
    }
}
