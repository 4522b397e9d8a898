// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Journal store: the in-memory snapshot of trips, nodes, legs and stops

use crate::error::{Result, TriplineError};
use crate::types::{Leg, Node, Stop, Trip, TripId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Data access seam: anything that can hand out trips and per-trip snapshots
pub trait TripSource {
    /// All trips known to the source
    fn trips(&self) -> &[Trip];

    /// Immutable snapshot of one trip with its nodes, legs and stops
    fn snapshot(&self, trip_id: TripId) -> Option<TripSnapshot>;
}

/// One trip and everything attached to it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripSnapshot {
    /// The trip
    pub trip: Trip,
    /// Destinations and waypoints
    pub nodes: Vec<Node>,
    /// Transport segments
    pub legs: Vec<Leg>,
    /// Points of interest
    pub stops: Vec<Stop>,
}

/// The complete journal document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    /// All trips
    #[serde(default)]
    pub trips: Vec<Trip>,
    /// All nodes
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// All legs
    #[serde(default)]
    pub legs: Vec<Leg>,
    /// All stops
    #[serde(default)]
    pub stops: Vec<Stop>,
}

impl Journal {
    /// Load a journal from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| TriplineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let journal: Self =
            serde_json::from_str(&content).map_err(|source| TriplineError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(
            "Loaded {} trips, {} nodes, {} legs, {} stops from {}",
            journal.trips.len(),
            journal.nodes.len(),
            journal.legs.len(),
            journal.stops.len(),
            path.display()
        );
        Ok(journal)
    }

    /// Get a trip by id
    #[must_use]
    pub fn trip(&self, id: TripId) -> Option<&Trip> {
        self.trips.iter().find(|t| t.id == id)
    }

    /// Resolve a trip by id or (case-insensitive) name
    pub fn resolve_trip(&self, id_or_name: &str) -> Option<&Trip> {
        if let Ok(id) = id_or_name.parse::<TripId>() {
            if let Some(trip) = self.trip(id) {
                return Some(trip);
            }
        }
        self.trips
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(id_or_name))
    }

    /// Snapshot of one trip, or an error naming the missing id
    pub fn require_snapshot(&self, trip_id: TripId) -> Result<TripSnapshot> {
        self.snapshot(trip_id)
            .ok_or(TriplineError::UnknownTrip(trip_id))
    }
}

impl TripSource for Journal {
    fn trips(&self) -> &[Trip] {
        &self.trips
    }

    fn snapshot(&self, trip_id: TripId) -> Option<TripSnapshot> {
        let trip = self.trip(trip_id)?.clone();
        Some(TripSnapshot {
            trip,
            nodes: self.nodes.iter().filter(|n| n.trip_id == trip_id).cloned().collect(),
            legs: self.legs.iter().filter(|l| l.trip_id == trip_id).cloned().collect(),
            stops: self.stops.iter().filter(|s| s.trip_id == trip_id).cloned().collect(),
        })
    }
}
