//! Distance aggregates derived from journeys.
//!
//! Nothing here is persisted: every aggregate is recomputed from the stored
//! journeys, which keeps it consistent with deletes and updates.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{Journey, User};

/// Total distance for one user in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MonthlyRouteDistance {
    pub year: i32,
    /// Calendar month, 1-12
    pub month: u32,
    pub user_id: String,
    pub user_name: String,
    pub total_route_distance: f64,
}

/// Sum of route distances.
pub fn total_route_distance(journeys: &[Journey]) -> f64 {
    journeys.iter().map(|j| j.route_distance).sum()
}

/// Distinct owner IDs in first-seen order.
pub fn owner_ids(journeys: &[Journey]) -> Vec<String> {
    let mut seen = HashSet::new();
    journeys
        .iter()
        .filter(|j| seen.insert(j.user_id.as_str()))
        .map(|j| j.user_id.clone())
        .collect()
}

/// Group journeys by (year, month, owner) of their start time and sum distances.
///
/// Journeys whose owner is missing from `owners` are skipped. Rows come back
/// most recent month first, then by username.
pub fn monthly_route_distances(
    journeys: &[Journey],
    owners: &HashMap<String, User>,
) -> Vec<MonthlyRouteDistance> {
    let mut totals: HashMap<(i32, u32, &str), f64> = HashMap::new();

    for journey in journeys {
        if !owners.contains_key(&journey.user_id) {
            continue;
        }
        let key = (
            journey.start_time.year(),
            journey.start_time.month(),
            journey.user_id.as_str(),
        );
        *totals.entry(key).or_insert(0.0) += journey.route_distance;
    }

    let mut rows: Vec<MonthlyRouteDistance> = totals
        .into_iter()
        .filter_map(|((year, month, user_id), total)| {
            owners.get(user_id).map(|owner| MonthlyRouteDistance {
                year,
                month,
                user_id: user_id.to_string(),
                user_name: owner.username.clone(),
                total_route_distance: total,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        (b.year, b.month)
            .cmp(&(a.year, a.month))
            .then_with(|| a.user_name.cmp(&b.user_name))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    rows
}
