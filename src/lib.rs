// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Tripline library - itinerary grouping and calendar layout for travel journals
//!
//! This crate turns a trip's destinations (nodes), transport segments (legs)
//! and points of interest (stops) into render-ready view models: a linear
//! itinerary with travel groups collapsed across invisible waypoints, a
//! day-by-day column layout, and monthly/yearly calendar grids with stable
//! row assignment for multi-day spans.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod calendar;
pub mod commands;
pub mod config;
pub mod error;
pub mod graph;
pub mod itinerary;
pub mod journal;
pub mod ordering;
pub mod render;
pub mod stats;

/// Core data types for trips, nodes, legs and stops
pub mod types {
    use chrono::NaiveDate;
    use serde::{Deserialize, Serialize};

    /// Trip identifier
    pub type TripId = i64;
    /// Node identifier
    pub type NodeId = i64;
    /// Leg identifier
    pub type LegId = i64;
    /// Stop identifier
    pub type StopId = i64;

    // =========================================================================
    // Trip
    // =========================================================================

    /// A trip owning a date range and its nodes, legs and stops
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct Trip {
        /// Unique identifier
        pub id: TripId,
        /// Display name
        pub name: String,
        /// Free-form description
        #[serde(default)]
        pub description: Option<String>,
        /// First day of the trip
        pub start_date: Option<NaiveDate>,
        /// Last day of the trip (inclusive)
        pub end_date: Option<NaiveDate>,
    }

    impl Trip {
        /// Inclusive date range, if both ends are set and ordered
        #[must_use]
        pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
            match (self.start_date, self.end_date) {
                (Some(start), Some(end)) if end >= start => Some((start, end)),
                _ => None,
            }
        }

        /// Whether the trip is underway on `date`
        #[must_use]
        pub fn covers(&self, date: NaiveDate) -> bool {
            self.date_range()
                .is_some_and(|(start, end)| start <= date && date <= end)
        }

        /// Number of nights (end - start), never negative
        #[must_use]
        pub fn nights(&self) -> Option<i64> {
            match (self.start_date, self.end_date) {
                (Some(start), Some(end)) => Some((end - start).num_days().max(0)),
                _ => None,
            }
        }
    }

    // =========================================================================
    // Node (destination)
    // =========================================================================

    /// A destination in a trip, or an invisible routing waypoint
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct Node {
        /// Unique identifier within the trip
        pub id: NodeId,
        /// Owning trip
        pub trip_id: TripId,
        /// Display name
        pub name: String,
        /// Arrival day
        pub arrival_date: Option<NaiveDate>,
        /// Departure day
        pub departure_date: Option<NaiveDate>,
        /// Waypoint used only for routing continuity
        #[serde(default)]
        pub invisible: bool,
        /// OpenStreetMap place id
        #[serde(default)]
        pub osm_id: Option<String>,
        /// OpenStreetMap country
        #[serde(default)]
        pub osm_country: Option<String>,
        /// OpenStreetMap state/region
        #[serde(default)]
        pub osm_state: Option<String>,
        /// Latitude
        #[serde(default)]
        pub latitude: Option<f64>,
        /// Longitude
        #[serde(default)]
        pub longitude: Option<f64>,
    }

    impl Node {
        /// Create an undated, visible node
        #[must_use]
        pub fn new(id: NodeId, trip_id: TripId, name: &str) -> Self {
            Self {
                id,
                trip_id,
                name: name.into(),
                ..Self::default()
            }
        }

        /// Whether the node is shown to the user
        #[must_use]
        pub fn is_visible(&self) -> bool {
            !self.invisible
        }

        /// A multi-night stay: both dates present and departure after arrival
        #[must_use]
        pub fn has_stay(&self) -> bool {
            matches!(
                (self.arrival_date, self.departure_date),
                (Some(arr), Some(dep)) if dep > arr
            )
        }

        /// Record carries a departure but no arrival (e.g. "Home")
        #[must_use]
        pub fn is_departure_only(&self) -> bool {
            self.arrival_date.is_none() && self.departure_date.is_some()
        }

        /// First day the node shows up: arrival, else departure
        #[must_use]
        pub fn first_date(&self) -> Option<NaiveDate> {
            self.arrival_date.or(self.departure_date)
        }

        /// Whether the node arrives, departs, or is staying on `date`
        #[must_use]
        pub fn appears_on(&self, date: NaiveDate) -> bool {
            if self.arrival_date == Some(date) || self.departure_date == Some(date) {
                return true;
            }
            matches!(
                (self.arrival_date, self.departure_date),
                (Some(arr), Some(dep)) if arr < date && date < dep
            )
        }
    }

    // =========================================================================
    // Leg (transport segment)
    // =========================================================================

    /// Transport mode of a leg
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum LegType {
        /// Air travel
        Flight,
        /// Driving
        Car,
        /// Rail
        Train,
        /// Coach or bus
        Bus,
        /// Ferry or cruise
        Boat,
        /// Anything else
        #[default]
        #[serde(other)]
        Other,
    }

    impl LegType {
        /// Lowercase code as stored in the journal
        #[must_use]
        pub fn code(&self) -> &'static str {
            match self {
                Self::Flight => "flight",
                Self::Car => "car",
                Self::Train => "train",
                Self::Bus => "bus",
                Self::Boat => "boat",
                Self::Other => "other",
            }
        }

        /// Human-readable prefix for "<label> A to B"
        #[must_use]
        pub fn label(&self) -> &'static str {
            match self {
                Self::Flight => "Flight from",
                Self::Car => "Driving from",
                Self::Train => "Train from",
                Self::Boat => "Travel by sea from",
                Self::Bus => "Bus from",
                Self::Other => "Travel from",
            }
        }
    }

    /// Driving detail for car legs
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct CarDetails {
        /// Driving time as entered, e.g. "3h 20m"
        pub driving_time: Option<String>,
        /// Encoded route polyline
        pub polyline: Option<String>,
    }

    /// Flight detail for flight legs
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct FlightDetails {
        /// Flight number
        pub flight_number: Option<String>,
        /// Operating airline
        pub airline: Option<String>,
        /// Departure airport code
        pub start_airport: Option<String>,
        /// Arrival airport code
        pub end_airport: Option<String>,
    }

    /// A directed transport segment between two nodes
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct Leg {
        /// Unique identifier
        pub id: LegId,
        /// Owning trip
        pub trip_id: TripId,
        /// Transport mode
        #[serde(rename = "type", default)]
        pub leg_type: LegType,
        /// Origin node
        pub start_node_id: NodeId,
        /// Destination node
        pub end_node_id: NodeId,
        /// Day the leg occurs
        pub date: Option<NaiveDate>,
        /// Distance in miles
        #[serde(default)]
        pub miles: Option<f64>,
        /// Notes
        #[serde(default)]
        pub notes: Option<String>,
        /// Car-specific detail
        #[serde(default)]
        pub car_details: Option<CarDetails>,
        /// Flight-specific detail
        #[serde(default)]
        pub flight_details: Option<FlightDetails>,
    }

    impl Leg {
        /// Create an undated leg of type `other`
        #[must_use]
        pub fn new(id: LegId, trip_id: TripId, start_node_id: NodeId, end_node_id: NodeId) -> Self {
            Self {
                id,
                trip_id,
                start_node_id,
                end_node_id,
                ..Self::default()
            }
        }
    }

    // =========================================================================
    // Stop (point of interest)
    // =========================================================================

    /// Categories always reported by statistics, even when empty
    pub const DEFAULT_STOP_CATEGORIES: [&str; 5] =
        ["hotel", "restaurant", "attraction", "park", "other"];

    fn default_category() -> String {
        "other".into()
    }

    /// What a stop is attached to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum StopAnchor {
        /// Attached to a node
        Node(NodeId),
        /// Attached to a leg
        Leg(LegId),
    }

    /// A point of interest attached to a node or a leg
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Stop {
        /// Unique identifier
        pub id: StopId,
        /// Owning trip
        pub trip_id: TripId,
        /// Display name
        pub name: String,
        /// Category name (hotel, restaurant, ...)
        #[serde(default = "default_category")]
        pub category: String,
        /// Parent node
        #[serde(default)]
        pub node_id: Option<NodeId>,
        /// Parent leg
        #[serde(default)]
        pub leg_id: Option<LegId>,
        /// First day
        #[serde(default)]
        pub start_date: Option<NaiveDate>,
        /// Last day (inclusive)
        #[serde(default)]
        pub end_date: Option<NaiveDate>,
        /// Notes
        #[serde(default)]
        pub notes: Option<String>,
        /// OpenStreetMap country
        #[serde(default)]
        pub osm_country: Option<String>,
        /// OpenStreetMap state/region
        #[serde(default)]
        pub osm_state: Option<String>,
        /// Latitude
        #[serde(default)]
        pub latitude: Option<f64>,
        /// Longitude
        #[serde(default)]
        pub longitude: Option<f64>,
    }

    impl Default for Stop {
        fn default() -> Self {
            Self {
                id: 0,
                trip_id: 0,
                name: String::new(),
                category: default_category(),
                node_id: None,
                leg_id: None,
                start_date: None,
                end_date: None,
                notes: None,
                osm_country: None,
                osm_state: None,
                latitude: None,
                longitude: None,
            }
        }
    }

    impl Stop {
        /// The node or leg this stop belongs to; a node wins if both are set
        #[must_use]
        pub fn anchor(&self) -> Option<StopAnchor> {
            self.node_id
                .map(StopAnchor::Node)
                .or(self.leg_id.map(StopAnchor::Leg))
        }

        /// `end_date` strictly after `start_date` (e.g. a hotel booking)
        #[must_use]
        pub fn is_multi_day(&self) -> bool {
            matches!(
                (self.start_date, self.end_date),
                (Some(start), Some(end)) if end > start
            )
        }
    }
}
