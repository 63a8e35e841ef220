// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin reporting routes (require the `Admin` role).

use crate::error::{AppError, Result};
use crate::models::{Journey, JourneyFilter, MonthlyRouteDistance};
use crate::time_utils::parse_date_or_datetime;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

/// Admin routes. Auth and role middleware are applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/journeys", get(get_filtered_journeys))
        .route(
            "/api/admin/stats/monthly-distance",
            get(get_monthly_route_distance),
        )
}

#[derive(Debug, Default, Deserialize)]
struct FilterParams {
    user_id: Option<String>,
    user_name: Option<String>,
    /// Integer mode code; empty means any mode
    transportation_type: Option<String>,
    /// `YYYY-MM-DD` or RFC 3339
    start_date: Option<String>,
    /// `YYYY-MM-DD` or RFC 3339
    end_date: Option<String>,
}

fn parse_date_param(name: &str, raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    match raw.filter(|r| !r.is_empty()) {
        None => Ok(None),
        Some(raw) => parse_date_or_datetime(raw).map(Some).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Invalid '{}' parameter: expected YYYY-MM-DD or RFC3339",
                name
            ))
        }),
    }
}

fn parse_mode_param(raw: Option<&str>) -> Result<Option<i32>> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| {
            AppError::BadRequest(format!(
                "Invalid 'transportation_type' parameter: expected an integer, got '{}'",
                raw
            ))
        }),
    }
}

impl FilterParams {
    fn into_filter(self) -> Result<JourneyFilter> {
        Ok(JourneyFilter {
            start_date: parse_date_param("start_date", self.start_date.as_deref())?,
            end_date: parse_date_param("end_date", self.end_date.as_deref())?,
            user_id: self.user_id,
            user_name: self.user_name,
            transportation_type: parse_mode_param(self.transportation_type.as_deref())?,
        })
    }
}

/// Search journeys across all users.
async fn get_filtered_journeys(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<Journey>>> {
    let filter = params.into_filter()?;
    let journeys = state.journeys.get_filtered_journeys(&filter).await?;
    Ok(Json(journeys))
}

/// Monthly distance per user over the trailing twelve months.
async fn get_monthly_route_distance(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MonthlyRouteDistance>>> {
    let rows = state.journeys.get_monthly_route_distance().await?;
    Ok(Json(rows))
}
