// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Journey routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Journey, JourneyUpdate, NewJourney};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Journey routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/journeys", get(list_journeys).post(create_journey))
        .route(
            "/api/journeys/{id}",
            get(get_journey).put(update_journey).delete(delete_journey),
        )
        .route("/api/me/goal", get(get_goal))
}

// ─── Journeys ────────────────────────────────────────────────

/// Create a journey owned by the caller.
async fn create_journey(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<NewJourney>,
) -> Result<(StatusCode, Json<Journey>)> {
    let journey = state.journeys.create_journey(input, &user.user_id).await?;
    Ok((StatusCode::CREATED, Json(journey)))
}

/// List the caller's journeys.
async fn list_journeys(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Journey>>> {
    let journeys = state.journeys.get_journeys_by_user_id(&user.user_id).await?;
    Ok(Json(journeys))
}

/// Get any journey by ID.
async fn get_journey(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Journey>> {
    state
        .journeys
        .get_journey_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Journey {} not found", id)))
}

/// Update one of the caller's journeys.
async fn update_journey(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<u64>,
    Json(mut update): Json<JourneyUpdate>,
) -> Result<Json<Journey>> {
    update.id = id;
    state
        .journeys
        .update_journey(update, &user.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Journey {} not found", id)))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteJourneyResponse {
    pub deleted: bool,
}

/// Delete one of the caller's journeys.
async fn delete_journey(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteJourneyResponse>> {
    if !state.journeys.delete_journey(id, &user.user_id).await? {
        return Err(AppError::NotFound(format!("Journey {} not found", id)));
    }
    Ok(Json(DeleteJourneyResponse { deleted: true }))
}

// ─── Daily Goal ──────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GoalResponse {
    pub user_id: String,
    pub daily_goal_achieved: bool,
}

/// Get the caller's derived daily goal status.
async fn get_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<GoalResponse>> {
    let profile = state
        .journeys
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    Ok(Json(GoalResponse {
        user_id: profile.id,
        daily_goal_achieved: profile.daily_goal_achieved,
    }))
}
