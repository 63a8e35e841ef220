// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process journey store.
//!
//! Keeps journeys in ID order so listing matches the store-natural order of
//! the Firestore backend. Read and user-write counters let tests observe
//! cache hits and skipped goal writes.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::db::JourneyStore;
use crate::error::Result;
use crate::models::{Journey, JourneyQuery, NewJourney, User};

#[derive(Default)]
struct State {
    journeys: BTreeMap<u64, Journey>,
    users: HashMap<String, User>,
    last_id: u64,
}

/// Journey store held entirely in memory.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
    journey_reads: AtomicUsize,
    user_writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of journey lookups and queries served so far.
    pub fn journey_reads(&self) -> usize {
        self.journey_reads.load(Ordering::SeqCst)
    }

    /// Number of `save_user` calls so far.
    pub fn user_writes(&self) -> usize {
        self.user_writes.load(Ordering::SeqCst)
    }

    /// Number of stored journeys.
    pub async fn journey_count(&self) -> usize {
        self.state.read().await.journeys.len()
    }

    /// Insert a journey with a caller-chosen ID (fixtures).
    pub async fn insert_journey(&self, journey: Journey) {
        let mut state = self.state.write().await;
        state.last_id = state.last_id.max(journey.id);
        state.journeys.insert(journey.id, journey);
    }

    /// Insert a user without counting it as a write (fixtures).
    pub async fn insert_user(&self, user: User) {
        self.state.write().await.users.insert(user.id.clone(), user);
    }

    fn count_read(&self) {
        self.journey_reads.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl JourneyStore for MemoryStore {
    async fn add_journey(&self, owner_id: &str, input: &NewJourney) -> Result<Journey> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let journey = Journey::from_new(state.last_id, owner_id, input);
        state.journeys.insert(journey.id, journey.clone());
        Ok(journey)
    }

    async fn update_journey(&self, journey: &Journey) -> Result<()> {
        self.state
            .write()
            .await
            .journeys
            .insert(journey.id, journey.clone());
        Ok(())
    }

    async fn remove_journey(&self, journey: &Journey) -> Result<()> {
        self.state.write().await.journeys.remove(&journey.id);
        Ok(())
    }

    async fn find_journey(&self, journey_id: u64) -> Result<Option<Journey>> {
        self.count_read();
        Ok(self.state.read().await.journeys.get(&journey_id).cloned())
    }

    async fn find_journey_for_owner(
        &self,
        owner_id: &str,
        journey_id: u64,
    ) -> Result<Option<Journey>> {
        self.count_read();
        Ok(self
            .state
            .read()
            .await
            .journeys
            .get(&journey_id)
            .filter(|j| j.user_id == owner_id)
            .cloned())
    }

    async fn query_journeys(&self, query: &JourneyQuery) -> Result<Vec<Journey>> {
        self.count_read();
        let state = self.state.read().await;
        Ok(state
            .journeys
            .values()
            .filter(|j| {
                let owner = if query.needs_owner() {
                    state.users.get(&j.user_id)
                } else {
                    None
                };
                query.matches(j, owner)
            })
            .cloned()
            .collect())
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self.state.read().await.users.get(user_id).cloned())
    }

    async fn save_user(&self, user: &User) -> Result<()> {
        self.user_writes.fetch_add(1, Ordering::SeqCst);
        self.state
            .write()
            .await
            .users
            .insert(user.id.clone(), user.clone());
        Ok(())
    }
}
