// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Journey search filters.
//!
//! `JourneyFilter` is the admin-facing search input. It is validated and
//! lowered into a `JourneyQuery`, the conjunctive predicate set that both
//! store implementations evaluate with [`JourneyQuery::matches`].

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{AppError, Result};
use crate::models::{Journey, User};

/// Optional search criteria; absent fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JourneyFilter {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    /// `Some(0)` filters for mode 0; `None` means any mode
    pub transportation_type: Option<i32>,
    /// Lower bound, compared by calendar date against `start_time`
    pub start_date: Option<DateTime<Utc>>,
    /// Upper bound, compared by calendar date against `arrival_time`
    pub end_date: Option<DateTime<Utc>>,
}

impl JourneyFilter {
    /// Validate the filter and lower it to store predicates.
    pub fn to_query(&self) -> Result<JourneyQuery> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(AppError::Validation(
                    "Start date cannot be greater than end date".to_string(),
                ));
            }
        }

        Ok(JourneyQuery {
            owner_id: non_empty(self.user_id.as_deref()),
            owner_username: non_empty(self.user_name.as_deref()),
            transportation_type: self.transportation_type,
            start_date_from: self.start_date.map(|d| d.date_naive()),
            arrival_date_to: self.end_date.map(|d| d.date_naive()),
            started_at_or_after: None,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Conjunctive journey predicates understood by `JourneyStore::query_journeys`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JourneyQuery {
    pub owner_id: Option<String>,
    /// Matched against the owning user's username
    pub owner_username: Option<String>,
    pub transportation_type: Option<i32>,
    pub start_date_from: Option<NaiveDate>,
    pub arrival_date_to: Option<NaiveDate>,
    pub started_at_or_after: Option<DateTime<Utc>>,
}

impl JourneyQuery {
    /// All journeys owned by `owner_id`.
    pub fn for_owner(owner_id: &str) -> Self {
        Self {
            owner_id: Some(owner_id.to_string()),
            ..Self::default()
        }
    }

    /// All journeys whose start time is at or after `instant`.
    pub fn started_since(instant: DateTime<Utc>) -> Self {
        Self {
            started_at_or_after: Some(instant),
            ..Self::default()
        }
    }

    /// Whether evaluating this query requires the journey owner record.
    pub fn needs_owner(&self) -> bool {
        self.owner_username.is_some()
    }

    /// Evaluate every present predicate against `journey`.
    ///
    /// `owner` is only consulted when [`needs_owner`](Self::needs_owner) is
    /// true; a username predicate never matches an unresolved owner.
    pub fn matches(&self, journey: &Journey, owner: Option<&User>) -> bool {
        if let Some(owner_id) = &self.owner_id {
            if &journey.user_id != owner_id {
                return false;
            }
        }
        if let Some(username) = &self.owner_username {
            match owner {
                Some(user) if &user.username == username && user.id == journey.user_id => {}
                _ => return false,
            }
        }
        if let Some(mode) = self.transportation_type {
            if journey.transportation_type != mode {
                return false;
            }
        }
        if let Some(from) = self.start_date_from {
            if journey.start_time.date_naive() < from {
                return false;
            }
        }
        if let Some(to) = self.arrival_date_to {
            if journey.arrival_time.date_naive() > to {
                return false;
            }
        }
        if let Some(instant) = self.started_at_or_after {
            if journey.start_time < instant {
                return false;
            }
        }
        true
    }
}
