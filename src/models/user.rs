//! User model for storage and API.
//!
//! Users are created by the identity provider; this service only reads them
//! and maintains the derived daily goal flag.

use serde::{Deserialize, Serialize};

/// Distance a user's logged journeys must exceed to reach the daily goal.
pub const DAILY_GOAL_DISTANCE: f64 = 20.0;

/// User profile stored in the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Identity provider user ID (also used as document ID)
    pub id: String,
    /// Display name
    pub username: String,
    pub email: Option<String>,
    /// Derived from the user's journeys; never set by clients
    #[serde(default)]
    pub daily_goal_achieved: bool,
}

impl User {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            email: None,
            daily_goal_achieved: false,
        }
    }
}

/// Whether a summed journey distance reaches the daily goal.
pub fn is_daily_goal_achieved(total_route_distance: f64) -> bool {
    total_route_distance > DAILY_GOAL_DISTANCE
}
