// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{DateTime, Utc};
use journey_tracker::config::Config;
use journey_tracker::db::{FirestoreDb, MemoryStore};
use journey_tracker::middleware::auth::create_jwt;
use journey_tracker::models::{Journey, NewJourney};
use journey_tracker::routes::create_router;
use journey_tracker::services::{JourneyService, TtlCache};
use journey_tracker::AppState;
use std::sync::Arc;

#[allow(dead_code)]
pub const USER_ID: &str = "ae962c62-b8fe-4126-8675-5eed354a8030";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a service over a fresh memory store.
#[allow(dead_code)]
pub fn test_service() -> (JourneyService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let service = JourneyService::new(store.clone(), Arc::new(TtlCache::new()));
    (service, store)
}

/// Create a test app over a fresh memory store.
/// Returns the router, the shared state and the store.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = Arc::new(AppState::new(Config::test_default(), store.clone()));
    (create_router(state.clone()), state, store)
}

/// Create a session token the way the identity provider does.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, roles: &[&str], signing_key: &[u8]) -> String {
    create_jwt(user_id, "tester", roles, signing_key).expect("Failed to create JWT")
}

#[allow(dead_code)]
pub fn new_journey(
    start_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
    route_distance: f64,
) -> NewJourney {
    NewJourney {
        starting_location: "Location A".to_string(),
        arrival_location: "Location B".to_string(),
        start_time,
        arrival_time,
        transportation_type: 1,
        route_distance,
    }
}

/// Journey fixture with a one-hour duration.
#[allow(dead_code)]
pub fn journey(
    id: u64,
    user_id: &str,
    transportation_type: i32,
    start_time: DateTime<Utc>,
    route_distance: f64,
) -> Journey {
    Journey {
        id,
        user_id: user_id.to_string(),
        starting_location: "Location A".to_string(),
        arrival_location: "Location B".to_string(),
        start_time,
        arrival_time: start_time + chrono::Duration::hours(1),
        transportation_type,
        route_distance,
    }
}
