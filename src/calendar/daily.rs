// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Day-by-day columns for a single trip

use super::{nest_spans, RowAssigner, SpanDef, SpanKey, SpanPhase};
use crate::itinerary::{Segment, TravelGroup, MAX_HOPS};
use crate::ordering::sort_chronologically;
use crate::types::{Leg, LegId, Node, NodeId, Stop, StopAnchor, Trip};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// What a span row represents
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SpanSubject<'a> {
    /// A multi-night stay at a node
    Stay {
        /// The node
        node: &'a Node,
    },
    /// A multi-day stop (hotel booking, festival, ...)
    Stop {
        /// The stop
        stop: &'a Stop,
    },
}

/// A span's appearance on one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanCell<'a> {
    /// Span identity
    pub key: SpanKey,
    /// Position of the day in the span
    pub phase: SpanPhase,
    /// The node or stop
    pub subject: SpanSubject<'a>,
    /// Single-day stops of a stay shown on this day
    pub stops: Vec<&'a Stop>,
}

/// Whether a node item marks an arrival or a departure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeEvent {
    /// Arriving today
    Arrival,
    /// Leaving today
    Departure,
}

/// Shape of a node's dates, used for the "Arriving at"/"Departing from" labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SingleType {
    /// Only an arrival date
    ArrivalOnly,
    /// Only a departure date
    DepartureOnly,
    /// Arrives and leaves the same day
    SingleDay,
}

/// A single-day entry in a day column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DayItem<'a> {
    /// A node that arrived earlier and is left today by leg
    Stay {
        /// The node
        node: &'a Node,
        /// Stops shown with it
        stops: Vec<&'a Stop>,
    },
    /// A node arriving or departing today
    Node {
        /// The node
        node: &'a Node,
        /// Arrival or departure
        event: NodeEvent,
        /// Date shape, if it warrants a label
        single_type: Option<SingleType>,
        /// Stops shown with it
        stops: Vec<&'a Stop>,
    },
    /// A leg travelled today
    Leg {
        /// The leg
        leg: &'a Leg,
        /// Stops along the leg today
        stops: Vec<&'a Stop>,
    },
    /// Legs through invisible waypoints collapsed for the day
    TravelGroup(TravelGroup<'a>),
    /// A waypoint outside any travel group
    InvisibleNode {
        /// The waypoint
        node: &'a Node,
    },
}

/// One row of a day column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "row", rename_all = "kebab-case")]
pub enum DayRow<'a> {
    /// A multi-day span at its assigned row
    Span(SpanCell<'a>),
    /// Empty row keeping spans aligned with neighbouring days
    Placeholder,
    /// A single-day entry below the spans
    Item(DayItem<'a>),
}

/// Everything shown for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayColumn<'a> {
    /// The day
    pub date: NaiveDate,
    /// 1-based day of the trip
    pub day_number: usize,
    /// Rows top to bottom
    pub rows: Vec<DayRow<'a>>,
}

impl<'a> DayColumn<'a> {
    /// Single-day items in display order
    pub fn items(&self) -> impl Iterator<Item = &DayItem<'a>> {
        self.rows.iter().filter_map(|row| match row {
            DayRow::Item(item) => Some(item),
            _ => None,
        })
    }

    /// Span cells in row order
    pub fn spans(&self) -> impl Iterator<Item = &SpanCell<'a>> {
        self.rows.iter().filter_map(|row| match row {
            DayRow::Span(cell) => Some(cell),
            _ => None,
        })
    }

    /// Row index of a span on this day
    #[must_use]
    pub fn row_of(&self, key: &SpanKey) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| matches!(row, DayRow::Span(cell) if cell.key == *key))
    }

    /// Check if the day has neither spans nor items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Order a day's legs into a chain: start where no other leg ends, follow
/// end -> start links, then append leftovers by id
fn chain_legs<'a>(day_legs: &[&'a Leg]) -> Vec<&'a Leg> {
    if day_legs.len() <= 1 {
        return day_legs.to_vec();
    }

    let mut remaining = day_legs.to_vec();
    let end_ids: HashSet<NodeId> = remaining.iter().map(|l| l.end_node_id).collect();
    let first = remaining
        .iter()
        .position(|l| !end_ids.contains(&l.start_node_id))
        .unwrap_or(0);

    let mut ordered = vec![remaining.remove(first)];
    while let Some(pos) = ordered
        .last()
        .and_then(|prev| remaining.iter().position(|l| l.start_node_id == prev.end_node_id))
    {
        ordered.push(remaining.remove(pos));
    }

    remaining.sort_by_key(|l| l.id);
    ordered.extend(remaining);
    ordered
}

/// Read-only lookups shared by every day of one pass
struct TripIndex<'a> {
    sorted_nodes: Vec<&'a Node>,
    nodes: HashMap<NodeId, &'a Node>,
    legs: HashMap<LegId, &'a Leg>,
    stops: &'a [Stop],
    stays: HashSet<NodeId>,
}

impl<'a> TripIndex<'a> {
    /// Dated single-day stops on their day; undated ones on the node's first day
    fn stops_for_node(&self, node: &Node, date: NaiveDate) -> Vec<&'a Stop> {
        if !node.appears_on(date) {
            return Vec::new();
        }
        let first = node.first_date();
        self.stops
            .iter()
            .filter(|s| s.anchor() == Some(StopAnchor::Node(node.id)) && !s.is_multi_day())
            .filter(|s| match s.start_date {
                Some(start) => start == date,
                None => first == Some(date),
            })
            .collect()
    }

    /// Dated single-day stops on their day; undated ones on the leg's day
    fn stops_for_leg(&self, leg: &Leg, date: NaiveDate) -> Vec<&'a Stop> {
        self.stops
            .iter()
            .filter(|s| s.anchor() == Some(StopAnchor::Leg(leg.id)) && !s.is_multi_day())
            .filter(|s| match s.start_date {
                Some(start) => start == date,
                None => leg.date == Some(date),
            })
            .collect()
    }

    fn has_stay(&self, node: &Node) -> bool {
        self.stays.contains(&node.id)
    }
}

/// Builder for the single-day items of one date
struct DayBuilder<'i, 'a> {
    index: &'i TripIndex<'a>,
    date: NaiveDate,
    day_legs: Vec<&'a Leg>,
    items: Vec<DayItem<'a>>,
    processed: HashSet<NodeId>,
    emitted: HashSet<LegId>,
}

impl<'i, 'a> DayBuilder<'i, 'a> {
    fn new(index: &'i TripIndex<'a>, date: NaiveDate, day_legs: Vec<&'a Leg>) -> Self {
        Self {
            index,
            date,
            day_legs,
            items: Vec::new(),
            processed: HashSet::new(),
            emitted: HashSet::new(),
        }
    }

    fn node_item(&self, node: &'a Node, event: NodeEvent) -> DayItem<'a> {
        if node.invisible {
            return DayItem::InvisibleNode { node };
        }
        let single_type = match event {
            NodeEvent::Arrival => match (node.arrival_date, node.departure_date) {
                (Some(_), None) => Some(SingleType::ArrivalOnly),
                (Some(arr), Some(dep)) if arr == dep => Some(SingleType::SingleDay),
                _ => None,
            },
            NodeEvent::Departure => node.is_departure_only().then_some(SingleType::DepartureOnly),
        };
        DayItem::Node {
            node,
            event,
            single_type,
            stops: self.index.stops_for_node(node, self.date),
        }
    }

    /// Push a node event unless the node is drawn as a span row
    fn push_node(&mut self, node: &'a Node, event: NodeEvent) {
        self.processed.insert(node.id);
        if !self.index.has_stay(node) {
            let item = self.node_item(node, event);
            self.items.push(item);
        }
    }

    fn push_arrival_of(&mut self, node_id: NodeId) {
        if let Some(node) = self.index.nodes.get(&node_id).copied() {
            if node.arrival_date == Some(self.date) && !self.processed.contains(&node.id) {
                self.push_node(node, NodeEvent::Arrival);
            }
        }
    }

    fn next_day_leg(&self, from: NodeId) -> Option<&'a Leg> {
        self.day_legs
            .iter()
            .copied()
            .find(|l| l.start_node_id == from && !self.emitted.contains(&l.id))
    }

    /// Emit a leg, following today's legs through invisible waypoints
    fn push_leg(&mut self, leg: &'a Leg) {
        if !self.emitted.insert(leg.id) {
            return;
        }
        let end = self.index.nodes.get(&leg.end_node_id).copied();
        if !end.is_some_and(|n| n.invisible) {
            let stops = self.index.stops_for_leg(leg, self.date);
            self.items.push(DayItem::Leg { leg, stops });
            self.push_arrival_of(leg.end_node_id);
            return;
        }

        let mut sequence = vec![Segment::Leg { leg }];
        let mut current = leg;
        let mut to_node = None;
        for _ in 1..MAX_HOPS {
            let Some(node) = self.index.nodes.get(&current.end_node_id).copied() else {
                break;
            };
            if !node.invisible {
                to_node = Some(node);
                break;
            }
            self.processed.insert(node.id);
            sequence.push(Segment::Node { node });
            let Some(next) = self.next_day_leg(node.id) else {
                break;
            };
            self.emitted.insert(next.id);
            sequence.push(Segment::Leg { leg: next });
            current = next;
        }

        let from_node = self
            .index
            .nodes
            .get(&leg.start_node_id)
            .copied()
            .filter(|n| n.is_visible());
        match (from_node, to_node) {
            (Some(from_node), Some(to_node)) => {
                self.items.push(DayItem::TravelGroup(TravelGroup {
                    from_node,
                    to_node,
                    sequence,
                }));
                self.push_arrival_of(to_node.id);
            }
            _ => {
                for segment in sequence {
                    let item = match segment {
                        Segment::Leg { leg } => DayItem::Leg {
                            leg,
                            stops: self.index.stops_for_leg(leg, self.date),
                        },
                        Segment::Node { node } => DayItem::InvisibleNode { node },
                    };
                    self.items.push(item);
                }
                if let Some(to_node) = to_node {
                    self.push_arrival_of(to_node.id);
                }
            }
        }
    }

    fn build(mut self) -> Vec<DayItem<'a>> {
        let date = self.date;
        let index = self.index;
        let mut on_day: HashSet<NodeId> = index
            .sorted_nodes
            .iter()
            .filter(|n| n.arrival_date == Some(date) || n.departure_date == Some(date))
            .map(|n| n.id)
            .collect();
        for leg in &self.day_legs {
            on_day.insert(leg.start_node_id);
            on_day.insert(leg.end_node_id);
        }
        // Waypoints entered by one of today's legs belong to that leg's walk
        let walked: HashSet<NodeId> = self
            .day_legs
            .iter()
            .map(|l| l.end_node_id)
            .filter(|id| index.nodes.get(id).is_some_and(|n| n.invisible))
            .collect();

        // Departures first, each followed by its outbound legs and their arrivals
        for &node in &index.sorted_nodes {
            if !on_day.contains(&node.id)
                || self.processed.contains(&node.id)
                || walked.contains(&node.id)
            {
                continue;
            }
            if node.departure_date == Some(date) && node.arrival_date != Some(date) {
                self.push_node(node, NodeEvent::Departure);
                let outbound: Vec<&'a Leg> = self
                    .day_legs
                    .iter()
                    .copied()
                    .filter(|l| l.start_node_id == node.id)
                    .collect();
                for leg in outbound {
                    self.push_leg(leg);
                }
            }
        }

        for &node in &index.sorted_nodes {
            if on_day.contains(&node.id)
                && !self.processed.contains(&node.id)
                && !walked.contains(&node.id)
                && node.arrival_date == Some(date)
            {
                self.push_node(node, NodeEvent::Arrival);
            }
        }

        let day_legs = self.day_legs.clone();
        for leg in day_legs {
            if self.emitted.contains(&leg.id) {
                continue;
            }
            if let Some(start) = index.nodes.get(&leg.start_node_id).copied() {
                let arrived_earlier = start.arrival_date.is_some_and(|arr| arr < date);
                if arrived_earlier && !self.processed.contains(&start.id) {
                    self.processed.insert(start.id);
                    if !index.has_stay(start) {
                        let stops = index.stops_for_node(start, date);
                        self.items.push(DayItem::Stay { node: start, stops });
                    }
                }
            }
            self.push_leg(leg);
        }

        self.items
    }
}

/// Multi-day spans of a trip: stays first (chronological), then stops
fn collect_spans<'a>(trip: &Trip, index: &TripIndex<'a>) -> Vec<SpanDef<SpanSubject<'a>>> {
    let mut spans = Vec::new();

    for &node in &index.sorted_nodes {
        if let (true, Some(start), Some(end)) =
            (index.has_stay(node), node.arrival_date, node.departure_date)
        {
            spans.push(SpanDef::new(
                SpanKey::Stay {
                    trip_id: trip.id,
                    node_id: node.id,
                },
                None,
                start,
                end,
                SpanSubject::Stay { node },
            ));
        }
    }

    let mut stops: Vec<&Stop> = index.stops.iter().filter(|s| s.is_multi_day()).collect();
    stops.sort_by_key(|s| (s.start_date, s.id));
    for stop in stops {
        let parent = match stop.anchor() {
            Some(StopAnchor::Node(node_id)) => match index.nodes.get(&node_id) {
                Some(node) if index.has_stay(node) => Some(SpanKey::Stay {
                    trip_id: trip.id,
                    node_id,
                }),
                Some(_) => None,
                None => {
                    debug!("Stop {} references missing node {}; skipping", stop.id, node_id);
                    continue;
                }
            },
            Some(StopAnchor::Leg(leg_id)) if index.legs.contains_key(&leg_id) => None,
            _ => {
                debug!("Stop {} has no anchor in this trip; skipping", stop.id);
                continue;
            }
        };
        let (Some(start), Some(end)) = (stop.start_date, stop.end_date) else {
            continue;
        };
        spans.push(SpanDef::new(
            SpanKey::Stop {
                trip_id: trip.id,
                stop_id: stop.id,
            },
            parent,
            start,
            end,
            SpanSubject::Stop { stop },
        ));
    }

    nest_spans(&mut spans);
    spans
}

/// Lay out a trip day by day from its start date to its end date
///
/// Returns no columns when the trip lacks a valid date range.
#[must_use]
pub fn build_day_columns<'a>(
    trip: &Trip,
    nodes: &'a [Node],
    legs: &'a [Leg],
    stops: &'a [Stop],
) -> Vec<DayColumn<'a>> {
    let Some((first_day, last_day)) = trip.date_range() else {
        debug!("Trip {} has no usable date range", trip.id);
        return Vec::new();
    };

    let mut sorted_nodes: Vec<&Node> = nodes.iter().collect();
    sort_chronologically(&mut sorted_nodes);

    let index = TripIndex {
        stays: nodes
            .iter()
            .filter(|n| n.is_visible() && n.has_stay())
            .map(|n| n.id)
            .collect(),
        nodes: nodes.iter().map(|n| (n.id, n)).collect(),
        legs: legs.iter().map(|l| (l.id, l)).collect(),
        sorted_nodes,
        stops,
    };

    let mut legs_by_date: HashMap<NaiveDate, Vec<&Leg>> = HashMap::new();
    for leg in legs {
        if let Some(date) = leg.date {
            legs_by_date.entry(date).or_default().push(leg);
        }
    }

    let spans = collect_spans(trip, &index);
    let by_key: HashMap<SpanKey, &SpanDef<SpanSubject<'a>>> =
        spans.iter().map(|s| (s.key, s)).collect();
    let mut assigner = RowAssigner::new();

    first_day
        .iter_days()
        .take_while(|date| *date <= last_day)
        .enumerate()
        .map(|(idx, date)| {
            let active: Vec<_> = spans
                .iter()
                .filter(|s| s.covers(date))
                .map(SpanDef::request)
                .collect();

            let mut rows: Vec<DayRow<'a>> = assigner
                .process_day(&active)
                .into_iter()
                .map(|slot| match slot.and_then(|key| by_key.get(&key)) {
                    Some(span) => {
                        let stops = match span.subject {
                            SpanSubject::Stay { node } => index.stops_for_node(node, date),
                            SpanSubject::Stop { .. } => Vec::new(),
                        };
                        DayRow::Span(SpanCell {
                            key: span.key,
                            phase: span.phase(date),
                            subject: span.subject.clone(),
                            stops,
                        })
                    }
                    None => DayRow::Placeholder,
                })
                .collect();

            let day_legs = legs_by_date
                .get(&date)
                .map(|l| chain_legs(l))
                .unwrap_or_default();
            let items = DayBuilder::new(&index, date, day_legs).build();
            rows.extend(items.into_iter().map(DayRow::Item));

            DayColumn {
                date,
                day_number: idx + 1,
                rows,
            }
        })
        .collect()
}
