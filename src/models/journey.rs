// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Journey model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

/// Stored journey record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Journey {
    /// Store-assigned ID (also used as document ID)
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    /// Owning user ID
    pub user_id: String,
    pub starting_location: String,
    pub arrival_location: String,
    pub start_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    /// Transportation mode code
    pub transportation_type: i32,
    /// Route distance in kilometers
    pub route_distance: f64,
}

impl Journey {
    /// Build a journey record from validated create input.
    pub fn from_new(id: u64, user_id: &str, input: &NewJourney) -> Self {
        Self {
            id,
            user_id: user_id.to_string(),
            starting_location: input.starting_location.clone(),
            arrival_location: input.arrival_location.clone(),
            start_time: input.start_time,
            arrival_time: input.arrival_time,
            transportation_type: input.transportation_type,
            route_distance: input.route_distance,
        }
    }

    /// Overwrite every mutable field from an update.
    pub fn apply_update(&mut self, update: &JourneyUpdate) {
        self.starting_location = update.starting_location.clone();
        self.arrival_location = update.arrival_location.clone();
        self.start_time = update.start_time;
        self.arrival_time = update.arrival_time;
        self.transportation_type = update.transportation_type;
        self.route_distance = update.route_distance;
    }
}

/// Input for creating a journey. The owner comes from the caller identity.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_new_journey_times"))]
pub struct NewJourney {
    #[validate(length(min = 1, message = "Starting location is required"))]
    pub starting_location: String,
    #[validate(length(min = 1, message = "Arrival location is required"))]
    pub arrival_location: String,
    pub start_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub transportation_type: i32,
    #[validate(range(exclusive_min = 0.0, message = "Route distance must be greater than 0"))]
    pub route_distance: f64,
}

/// Input for replacing the mutable fields of an existing journey.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_update_times"))]
pub struct JourneyUpdate {
    /// Journey to update; taken from the request path when called over HTTP
    #[serde(default)]
    pub id: u64,
    #[validate(length(min = 1, message = "Starting location is required"))]
    pub starting_location: String,
    #[validate(length(min = 1, message = "Arrival location is required"))]
    pub arrival_location: String,
    pub start_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub transportation_type: i32,
    #[validate(range(min = 0.0, message = "Route distance cannot be negative"))]
    pub route_distance: f64,
}

fn validate_new_journey_times(input: &NewJourney) -> Result<(), ValidationError> {
    check_time_order(input.start_time, input.arrival_time)
}

fn validate_update_times(input: &JourneyUpdate) -> Result<(), ValidationError> {
    check_time_order(input.start_time, input.arrival_time)
}

fn check_time_order(
    start_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if start_time > arrival_time {
        return Err(ValidationError::new("time_order")
            .with_message("StartTime cannot be greater than ArrivalTime".into()));
    }
    Ok(())
}
