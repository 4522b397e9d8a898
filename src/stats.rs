// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Journal-wide statistics and trip rankings

use crate::journal::Journal;
use crate::ordering::undated_last;
use crate::types::{LegType, Trip, TripId, DEFAULT_STOP_CATEGORIES};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};

#[allow(clippy::cast_possible_truncation)]
fn round_miles(miles: f64) -> i64 {
    miles.round() as i64
}

/// Aggregate numbers over the whole journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalStats {
    /// Number of trips
    pub trip_count: usize,
    /// Miles over every leg, rounded
    pub all_trip_miles: i64,
    /// Distinct places among visible nodes (by OSM id, else per node)
    pub unique_destination_count: usize,
    /// Distinct countries among nodes
    pub country_count: usize,
    /// Distinct states among nodes
    pub state_count: usize,
    /// Rounded miles per leg type; flight and car always present
    pub miles_by_type: BTreeMap<String, i64>,
    /// Nights on the road, overlapping trips counted once
    pub total_nights: i64,
    /// Visible states per country, sorted
    pub states_by_country: BTreeMap<String, Vec<String>>,
    /// Distinct OSM places per country among visible nodes
    pub destinations_by_country: BTreeMap<String, usize>,
    /// Stop count per category; default categories always present
    pub stops_by_category: BTreeMap<String, usize>,
}

impl JournalStats {
    /// Compute every statistic in one pass over the journal
    #[must_use]
    pub fn compute(journal: &Journal) -> Self {
        let all_miles: f64 = journal.legs.iter().filter_map(|l| l.miles).sum();

        let mut type_miles: BTreeMap<String, f64> = BTreeMap::new();
        for leg in &journal.legs {
            *type_miles.entry(leg.leg_type.code().to_string()).or_default() += leg.miles.unwrap_or(0.0);
        }
        for required in [LegType::Flight, LegType::Car] {
            type_miles.entry(required.code().to_string()).or_default();
        }
        let miles_by_type = type_miles
            .into_iter()
            .map(|(code, miles)| (code, round_miles(miles)))
            .collect();

        let visible: Vec<_> = journal.nodes.iter().filter(|n| n.is_visible()).collect();
        let osm_ids: HashSet<&str> = visible.iter().filter_map(|n| n.osm_id.as_deref()).collect();
        let without_osm = visible.iter().filter(|n| n.osm_id.is_none()).count();

        let countries: HashSet<&str> = journal.nodes.iter().filter_map(|n| n.osm_country.as_deref()).collect();
        let states: HashSet<&str> = journal.nodes.iter().filter_map(|n| n.osm_state.as_deref()).collect();

        let mut states_by_country: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut places_by_country: BTreeMap<String, HashSet<&str>> = BTreeMap::new();
        for node in &visible {
            let Some(country) = node.osm_country.as_deref() else {
                continue;
            };
            let states = states_by_country.entry(country.to_string()).or_default();
            if let Some(state) = &node.osm_state {
                states.insert(state.clone());
            }
            if let Some(osm_id) = node.osm_id.as_deref() {
                places_by_country.entry(country.to_string()).or_default().insert(osm_id);
            }
        }

        let mut stops_by_category: BTreeMap<String, usize> = DEFAULT_STOP_CATEGORIES
            .iter()
            .map(|c| ((*c).to_string(), 0))
            .collect();
        for stop in &journal.stops {
            *stops_by_category.entry(stop.category.clone()).or_default() += 1;
        }

        Self {
            trip_count: journal.trips.len(),
            all_trip_miles: round_miles(all_miles),
            unique_destination_count: osm_ids.len() + without_osm,
            country_count: countries.len(),
            state_count: states.len(),
            miles_by_type,
            total_nights: merged_nights(&journal.trips),
            states_by_country: states_by_country
                .into_iter()
                .map(|(country, states)| (country, states.into_iter().collect()))
                .collect(),
            destinations_by_country: places_by_country
                .into_iter()
                .map(|(country, places)| (country, places.len()))
                .collect(),
            stops_by_category,
        }
    }
}

/// Nights covered by the union of all trip ranges
#[must_use]
pub fn merged_nights(trips: &[Trip]) -> i64 {
    let mut ranges: Vec<(NaiveDate, NaiveDate)> = trips
        .iter()
        .filter_map(|t| t.start_date.zip(t.end_date))
        .filter(|(start, end)| end > start)
        .collect();
    ranges.sort_unstable();

    let mut merged: Vec<(NaiveDate, NaiveDate)> = Vec::new();
    for (start, end) in ranges {
        match merged.last_mut() {
            Some((_, last_end)) if start <= *last_end => {
                if end > *last_end {
                    *last_end = end;
                }
            }
            _ => merged.push((start, end)),
        }
    }

    merged.iter().map(|(s, e)| (*e - *s).num_days()).sum()
}

/// A trip with a ranking value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripRank {
    /// Trip
    pub id: TripId,
    /// Trip name
    pub name: String,
    /// Rounded miles or nights, depending on the ranking
    pub value: i64,
}

fn rank(journal: &Journal, value: impl Fn(&Trip) -> i64) -> Vec<TripRank> {
    let mut trips: Vec<(&Trip, i64)> = journal.trips.iter().map(|t| (t, value(t))).collect();
    trips.sort_by(|(a, av), (b, bv)| bv.cmp(av).then_with(|| undated_last(a.start_date, b.start_date)));
    trips
        .into_iter()
        .map(|(trip, value)| TripRank {
            id: trip.id,
            name: trip.name.clone(),
            value,
        })
        .collect()
}

/// Trips by total leg miles, longest first; ties by earlier start
#[must_use]
pub fn trips_by_miles(journal: &Journal) -> Vec<TripRank> {
    rank(journal, |trip| {
        round_miles(
            journal
                .legs
                .iter()
                .filter(|l| l.trip_id == trip.id)
                .filter_map(|l| l.miles)
                .sum(),
        )
    })
}

/// Trips by nights, longest first; ties by earlier start
#[must_use]
pub fn trips_by_nights(journal: &Journal) -> Vec<TripRank> {
    rank(journal, |trip| trip.nights().unwrap_or(0))
}
