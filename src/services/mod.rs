// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod cache;
pub mod journey;

pub use cache::{CacheKey, CachedValue, Mutation, TtlCache};
pub use journey::JourneyService;
