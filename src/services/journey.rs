// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Journey service.
//!
//! Orchestrates every journey operation:
//! 1. Validate input
//! 2. Read through the cache or write to the store
//! 3. Invalidate cached reads affected by a write
//! 4. Recompute the owner's daily goal flag after a write

use futures_util::{stream, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

use crate::db::JourneyStore;
use crate::error::Result;
use crate::models::stats::{monthly_route_distances, owner_ids, total_route_distance};
use crate::models::user::is_daily_goal_achieved;
use crate::models::{
    Journey, JourneyFilter, JourneyQuery, JourneyUpdate, MonthlyRouteDistance, NewJourney, User,
};
use crate::services::cache::{default_ttl, CacheKey, CachedValue, Mutation, TtlCache};
use crate::time_utils::rollup_window_start;

const MAX_CONCURRENT_USER_LOOKUPS: usize = 16;

/// Journey operations over a store and a shared read cache.
pub struct JourneyService {
    store: Arc<dyn JourneyStore>,
    cache: Arc<TtlCache>,
}

impl JourneyService {
    pub fn new(store: Arc<dyn JourneyStore>, cache: Arc<TtlCache>) -> Self {
        Self { store, cache }
    }

    pub fn cache(&self) -> &Arc<TtlCache> {
        &self.cache
    }

    // ─── Writes ──────────────────────────────────────────────────

    /// Create a journey owned by `owner_id`.
    pub async fn create_journey(&self, input: NewJourney, owner_id: &str) -> Result<Journey> {
        input.validate()?;

        let journey = self.store.add_journey(owner_id, &input).await?;
        tracing::info!(
            journey_id = journey.id,
            user_id = owner_id,
            route_distance = journey.route_distance,
            "Journey created"
        );

        self.cache.invalidate(&Mutation::Created { owner_id });
        self.recompute_daily_goal(owner_id).await?;

        Ok(journey)
    }

    /// Delete a journey owned by `owner_id`.
    ///
    /// Returns `false` when no journey with that ID belongs to the owner.
    pub async fn delete_journey(&self, journey_id: u64, owner_id: &str) -> Result<bool> {
        let Some(journey) = self
            .store
            .find_journey_for_owner(owner_id, journey_id)
            .await?
        else {
            tracing::debug!(journey_id, user_id = owner_id, "No journey to delete");
            return Ok(false);
        };

        self.store.remove_journey(&journey).await?;
        tracing::info!(journey_id, user_id = owner_id, "Journey deleted");

        self.cache.invalidate(&Mutation::Deleted {
            journey_id,
            owner_id,
        });
        self.recompute_daily_goal(owner_id).await?;

        Ok(true)
    }

    /// Replace the mutable fields of a journey owned by `owner_id`.
    ///
    /// Returns `None` when no journey with `update.id` belongs to the owner.
    pub async fn update_journey(
        &self,
        update: JourneyUpdate,
        owner_id: &str,
    ) -> Result<Option<Journey>> {
        let Some(mut journey) = self
            .store
            .find_journey_for_owner(owner_id, update.id)
            .await?
        else {
            return Ok(None);
        };

        update.validate()?;

        journey.apply_update(&update);
        self.store.update_journey(&journey).await?;
        tracing::info!(journey_id = journey.id, user_id = owner_id, "Journey updated");

        self.cache.invalidate(&Mutation::Updated {
            journey_id: journey.id,
            owner_id,
        });
        self.recompute_daily_goal(owner_id).await?;

        Ok(Some(journey))
    }

    // ─── Cached Reads ────────────────────────────────────────────

    /// Get a journey by ID. No ownership check is applied.
    pub async fn get_journey_by_id(&self, journey_id: u64) -> Result<Option<Journey>> {
        let key = CacheKey::Journey(journey_id);
        if let Some(CachedValue::Journey(journey)) = self.cache.get(&key) {
            tracing::debug!(journey_id, "Journey cache hit");
            return Ok(Some(journey));
        }

        let journey = self.store.find_journey(journey_id).await?;
        if let Some(journey) = &journey {
            self.cache
                .set(key, CachedValue::Journey(journey.clone()), default_ttl());
        }
        Ok(journey)
    }

    /// Get all journeys owned by `user_id`, in store order.
    pub async fn get_journeys_by_user_id(&self, user_id: &str) -> Result<Vec<Journey>> {
        let key = CacheKey::UserJourneys(user_id.to_string());
        if let Some(CachedValue::Journeys(journeys)) = self.cache.get(&key) {
            tracing::debug!(user_id, "User journeys cache hit");
            return Ok(journeys);
        }

        let journeys = self
            .store
            .query_journeys(&JourneyQuery::for_owner(user_id))
            .await?;
        if !journeys.is_empty() {
            self.cache
                .set(key, CachedValue::Journeys(journeys.clone()), default_ttl());
        }
        Ok(journeys)
    }

    /// Monthly distance per user over the trailing twelve months.
    pub async fn get_monthly_route_distance(&self) -> Result<Vec<MonthlyRouteDistance>> {
        let key = CacheKey::MonthlyRouteDistances;
        if let Some(CachedValue::MonthlyRouteDistances(rows)) = self.cache.get(&key) {
            tracing::debug!("Monthly route distance cache hit");
            return Ok(rows);
        }

        let since = rollup_window_start(chrono::Utc::now().date_naive());
        let journeys = self
            .store
            .query_journeys(&JourneyQuery::started_since(since))
            .await?;
        let owners = self.resolve_users(owner_ids(&journeys)).await?;
        let rows = monthly_route_distances(&journeys, &owners);

        tracing::debug!(
            since = %since,
            journeys = journeys.len(),
            rows = rows.len(),
            "Computed monthly route distances"
        );

        if !rows.is_empty() {
            self.cache.set(
                key,
                CachedValue::MonthlyRouteDistances(rows.clone()),
                default_ttl(),
            );
        }
        Ok(rows)
    }

    // ─── Uncached Reads ──────────────────────────────────────────

    /// Search journeys with optional, conjunctive criteria.
    pub async fn get_filtered_journeys(&self, filter: &JourneyFilter) -> Result<Vec<Journey>> {
        let query = filter.to_query()?;
        tracing::debug!(query = ?query, "Filtering journeys");
        self.store.query_journeys(&query).await
    }

    /// Get a user record (for exposing the derived goal flag).
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        self.store.find_user(user_id).await
    }

    // ─── Derived State ───────────────────────────────────────────

    /// Recompute `daily_goal_achieved` for `user_id` from all of their journeys.
    ///
    /// The user record is written only when the flag changes. A user that
    /// cannot be found is skipped.
    async fn recompute_daily_goal(&self, user_id: &str) -> Result<()> {
        let Some(mut user) = self.store.find_user(user_id).await? else {
            tracing::debug!(user_id, "User not found, skipping daily goal recompute");
            return Ok(());
        };

        let journeys = self
            .store
            .query_journeys(&JourneyQuery::for_owner(user_id))
            .await?;
        let total = total_route_distance(&journeys);
        let achieved = is_daily_goal_achieved(total);

        if user.daily_goal_achieved != achieved {
            user.daily_goal_achieved = achieved;
            self.store.save_user(&user).await?;
            tracing::info!(user_id, total, achieved, "Daily goal status changed");
        }

        Ok(())
    }

    /// Look up users by ID with bounded concurrency, skipping unknown IDs.
    async fn resolve_users(&self, user_ids: Vec<String>) -> Result<HashMap<String, User>> {
        let store = &self.store;

        let users = stream::iter(user_ids)
            .map(|user_id| async move { store.find_user(&user_id).await })
            .buffer_unordered(MAX_CONCURRENT_USER_LOOKUPS)
            .collect::<Vec<Result<Option<User>>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<Option<User>>>>()?;

        Ok(users
            .into_iter()
            .flatten()
            .map(|u| (u.id.clone(), u))
            .collect())
    }
}
