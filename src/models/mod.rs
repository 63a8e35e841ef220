// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod filter;
pub mod journey;
pub mod stats;
pub mod user;

pub use filter::{JourneyFilter, JourneyQuery};
pub use journey::{Journey, JourneyUpdate, NewJourney};
pub use stats::MonthlyRouteDistance;
pub use user::User;
