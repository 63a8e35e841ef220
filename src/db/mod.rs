//! Database layer.
//!
//! The journey service talks to storage only through [`JourneyStore`].
//! `FirestoreDb` is the production backend; `MemoryStore` backs local
//! development and tests.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Journey, JourneyQuery, NewJourney, User};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const JOURNEYS: &str = "journeys";
    /// ID allocation counters (one document per counted collection)
    pub const COUNTERS: &str = "counters";
}

/// Persistence contract consumed by the journey service.
#[async_trait]
pub trait JourneyStore: Send + Sync {
    /// Insert a journey owned by `owner_id`, returning it with its assigned ID.
    async fn add_journey(&self, owner_id: &str, input: &NewJourney) -> Result<Journey>;

    /// Overwrite a stored journey.
    async fn update_journey(&self, journey: &Journey) -> Result<()>;

    /// Remove a stored journey.
    async fn remove_journey(&self, journey: &Journey) -> Result<()>;

    /// Look up a journey by ID, regardless of owner.
    async fn find_journey(&self, journey_id: u64) -> Result<Option<Journey>>;

    /// Look up a journey by ID, only if it belongs to `owner_id`.
    async fn find_journey_for_owner(
        &self,
        owner_id: &str,
        journey_id: u64,
    ) -> Result<Option<Journey>>;

    /// All journeys matching every predicate in `query`, ascending by ID.
    async fn query_journeys(&self, query: &JourneyQuery) -> Result<Vec<Journey>>;

    async fn find_user(&self, user_id: &str) -> Result<Option<User>>;

    async fn save_user(&self, user: &User) -> Result<()>;
}
