// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Journey Tracker: record trips and report distance statistics
//!
//! This crate provides the backend API for logging journeys, searching them,
//! aggregating monthly distances, and tracking each user's daily goal.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::JourneyStore;
use services::{JourneyService, TtlCache};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub journeys: JourneyService,
}

impl AppState {
    /// Build state around a store with a fresh, empty cache.
    pub fn new(config: Config, store: Arc<dyn JourneyStore>) -> Self {
        let cache = Arc::new(TtlCache::new());
        Self {
            config,
            journeys: JourneyService::new(store, cache),
        }
    }
}
