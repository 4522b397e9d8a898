// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Invariant tests for itinerary grouping and calendar layout
//!
//! These tests verify critical invariants:
//! 1. Determinism - the same input always yields the same output
//! 2. Coverage - every leg lands in an entry or a diagnostic, exactly once
//! 3. Row stability - a span keeps one row for its whole lifetime
//! 4. Nesting - a stop is drawn below the stay it belongs to

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use proptest::test_runner::Config;
use std::collections::{HashMap, HashSet};
use tripline::calendar::{build_day_columns, layout_month, DayRow, SpanKey};
use tripline::itinerary::{build_itinerary, build_itinerary_report, Diagnostic, Entry, Segment, MAX_HOPS};
use tripline::journal::TripSnapshot;
use tripline::ordering::undated_last;
use tripline::types::{Leg, Node, NodeId, Stop, Trip};

// =============================================================================
// Test Helpers
// =============================================================================

const MISSING_NODE: NodeId = 999;

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn day(offset: u64) -> NaiveDate {
    base() + Days::new(offset)
}

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn make_node(id: NodeId, invisible: bool, arrival: Option<NaiveDate>, departure: Option<NaiveDate>) -> Node {
    Node {
        invisible,
        arrival_date: arrival,
        departure_date: departure,
        ..Node::new(id, 1, &format!("node-{id}"))
    }
}

fn make_leg(id: i64, from: NodeId, to: NodeId, date: Option<NaiveDate>) -> Leg {
    Leg {
        date,
        ..Leg::new(id, 1, from, to)
    }
}

fn test_trip() -> Trip {
    Trip {
        id: 1,
        name: "Generated".into(),
        start_date: Some(day(0)),
        end_date: Some(day(19)),
        ..Trip::default()
    }
}

type NodeShape = (bool, Option<u64>, Option<u64>);
type LegShape = (usize, usize, Option<u64>);
type StopShape = (usize, u64, u64);

fn build_nodes(shapes: &[NodeShape]) -> Vec<Node> {
    shapes
        .iter()
        .enumerate()
        .map(|(idx, &(invisible, a, b))| {
            let (arrival, departure) = match (a, b) {
                (Some(a), Some(b)) if b < a => (Some(day(b)), Some(day(a))),
                _ => (a.map(day), b.map(day)),
            };
            make_node(idx as NodeId + 1, invisible, arrival, departure)
        })
        .collect()
}

fn build_legs(node_count: usize, shapes: &[LegShape]) -> Vec<Leg> {
    let node_id = |idx: usize| {
        if idx == node_count {
            MISSING_NODE
        } else {
            idx as NodeId + 1
        }
    };
    shapes
        .iter()
        .enumerate()
        .filter(|(_, (from, to, _))| from != to)
        .map(|(idx, &(from, to, date))| make_leg(idx as i64 + 100, node_id(from), node_id(to), date.map(day)))
        .collect()
}

fn build_stops(shapes: &[StopShape]) -> Vec<Stop> {
    shapes
        .iter()
        .enumerate()
        .map(|(idx, &(node_idx, start, len))| Stop {
            id: idx as i64 + 1,
            trip_id: 1,
            name: format!("stop-{idx}"),
            category: "hotel".into(),
            node_id: Some(node_idx as NodeId + 1),
            start_date: Some(day(start)),
            end_date: (len > 0).then(|| day(start + len)),
            ..Stop::default()
        })
        .collect()
}

fn trip_strategy() -> impl Strategy<Value = (Vec<NodeShape>, Vec<LegShape>, Vec<StopShape>)> {
    (1usize..10).prop_flat_map(|n| {
        (
            prop::collection::vec((any::<bool>(), prop::option::of(0u64..20), prop::option::of(0u64..20)), n),
            prop::collection::vec((0..=n, 0..=n, prop::option::of(0u64..20)), 0..20),
            prop::collection::vec((0..n, 0u64..20, 0u64..5), 0..6),
        )
    })
}

/// Ids of every leg that appears somewhere in the output
fn accounted_legs(entries: &[Entry<'_>], diagnostics: &[Diagnostic]) -> Vec<i64> {
    let mut ids: Vec<i64> = entries.iter().flat_map(Entry::leg_ids).collect();
    for diagnostic in diagnostics {
        match diagnostic {
            Diagnostic::DanglingLeg { dropped, .. } => ids.extend(dropped),
            Diagnostic::Unreached { leg_id } => ids.push(*leg_id),
            Diagnostic::HopLimitReached { .. } | Diagnostic::DeadEnd { .. } => {}
        }
    }
    ids
}

// =============================================================================
// Itinerary Properties
// =============================================================================

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn itinerary_is_deterministic((node_shapes, leg_shapes, _) in trip_strategy()) {
        let nodes = build_nodes(&node_shapes);
        let legs = build_legs(nodes.len(), &leg_shapes);

        prop_assert_eq!(build_itinerary(&nodes, &legs), build_itinerary(&nodes, &legs));
    }

    #[test]
    fn every_leg_accounted_for_once((node_shapes, leg_shapes, _) in trip_strategy()) {
        let nodes = build_nodes(&node_shapes);
        let legs = build_legs(nodes.len(), &leg_shapes);

        let report = build_itinerary_report(&nodes, &legs);
        let mut seen = accounted_legs(&report.entries, &report.diagnostics);
        seen.sort_unstable();
        let mut expected: Vec<i64> = legs.iter().map(|l| l.id).collect();
        expected.sort_unstable();

        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn visible_nodes_listed_once_in_arrival_order((node_shapes, leg_shapes, _) in trip_strategy()) {
        let nodes = build_nodes(&node_shapes);
        let legs = build_legs(nodes.len(), &leg_shapes);

        let entries = build_itinerary(&nodes, &legs);
        let listed: Vec<&Node> = entries
            .iter()
            .filter_map(|e| match e {
                Entry::Node { node } => Some(*node),
                _ => None,
            })
            .collect();

        let visible: HashSet<NodeId> = nodes.iter().filter(|n| n.is_visible()).map(|n| n.id).collect();
        let listed_ids: HashSet<NodeId> = listed.iter().map(|n| n.id).collect();
        prop_assert_eq!(listed.len(), visible.len());
        prop_assert_eq!(listed_ids, visible);
        for pair in listed.windows(2) {
            prop_assert_ne!(
                undated_last(pair[0].arrival_date, pair[1].arrival_date),
                std::cmp::Ordering::Greater
            );
        }
    }

    #[test]
    fn travel_groups_are_well_formed((node_shapes, leg_shapes, _) in trip_strategy()) {
        let nodes = build_nodes(&node_shapes);
        let legs = build_legs(nodes.len(), &leg_shapes);

        for entry in build_itinerary(&nodes, &legs) {
            let Entry::TravelGroup(group) = entry else { continue };
            prop_assert!(group.from_node.is_visible());
            prop_assert!(group.to_node.is_visible());
            prop_assert!(matches!(group.sequence.first(), Some(Segment::Leg { .. })), "sequence must start with a Leg");
            prop_assert!(matches!(group.sequence.last(), Some(Segment::Leg { .. })), "sequence must end with a Leg");
            prop_assert!(group.waypoints().count() >= 1);
            prop_assert!(group.waypoints().all(|n| n.invisible));
            for (idx, segment) in group.sequence.iter().enumerate() {
                prop_assert_eq!(idx % 2 == 0, matches!(segment, Segment::Leg { .. }));
            }
            prop_assert!(group.legs().count() <= MAX_HOPS);
        }
    }
}

// =============================================================================
// Calendar Properties
// =============================================================================

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn day_rows_are_stable((node_shapes, _, stop_shapes) in trip_strategy()) {
        let nodes = build_nodes(&node_shapes);
        let stops: Vec<Stop> = build_stops(&stop_shapes)
            .into_iter()
            .filter(|s| s.node_id.is_some_and(|id| id as usize <= nodes.len()))
            .collect();
        let trip = test_trip();

        let columns = build_day_columns(&trip, &nodes, &[], &stops);

        let mut rows: HashMap<SpanKey, usize> = HashMap::new();
        for column in &columns {
            for (row, cell) in column.rows.iter().enumerate() {
                if let DayRow::Span(cell) = cell {
                    let first = *rows.entry(cell.key).or_insert(row);
                    prop_assert_eq!(first, row);
                }
            }
        }

        for node in nodes.iter().filter(|n| n.is_visible() && n.has_stay()) {
            let key = SpanKey::Stay { trip_id: 1, node_id: node.id };
            for column in &columns {
                let covered = node.arrival_date <= Some(column.date) && Some(column.date) <= node.departure_date;
                prop_assert_eq!(column.row_of(&key).is_some(), covered);
            }
        }
    }

    #[test]
    fn stops_sit_below_their_stay((node_shapes, _, stop_shapes) in trip_strategy()) {
        let nodes = build_nodes(&node_shapes);
        let stops: Vec<Stop> = build_stops(&stop_shapes)
            .into_iter()
            .filter(|s| s.node_id.is_some_and(|id| id as usize <= nodes.len()))
            .collect();
        let trip = test_trip();

        let columns = build_day_columns(&trip, &nodes, &[], &stops);

        for stop in stops.iter().filter(|s| s.is_multi_day()) {
            let Some(node) = nodes.iter().find(|n| Some(n.id) == stop.node_id) else { continue };
            if !(node.is_visible() && node.has_stay()) {
                continue;
            }
            let parent = SpanKey::Stay { trip_id: 1, node_id: node.id };
            let child = SpanKey::Stop { trip_id: 1, stop_id: stop.id };
            for column in &columns {
                if let (Some(p), Some(c)) = (column.row_of(&parent), column.row_of(&child)) {
                    prop_assert!(c > p, "stop row {} not below stay row {} on {}", c, p, column.date);
                }
            }
        }
    }

    #[test]
    fn month_rows_are_stable(
        ranges in prop::collection::vec((0u64..40, 0u64..10), 1..8)
    ) {
        let trips: Vec<Trip> = ranges
            .iter()
            .enumerate()
            .map(|(idx, &(start, len))| Trip {
                id: idx as i64 + 1,
                name: format!("trip-{idx}"),
                start_date: Some(day(start)),
                end_date: Some(day(start + len)),
                ..Trip::default()
            })
            .collect();
        let details: HashMap<i64, TripSnapshot> = HashMap::new();

        let layout = layout_month(&trips, &details, 2024, 3).unwrap();

        let mut rows: HashMap<SpanKey, usize> = HashMap::new();
        for month_day in &layout.days {
            for trip in &trips {
                let key = SpanKey::Trip { trip_id: trip.id };
                let row = month_day.row_of(&key);
                prop_assert_eq!(row.is_some(), trip.covers(month_day.date));
                if let Some(row) = row {
                    let first = *rows.entry(key).or_insert(row);
                    prop_assert_eq!(first, row);
                }
            }
        }
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn scenario_travel_group_between_destinations() {
    let nodes = vec![
        make_node(1, false, Some(d("2024-01-01")), Some(d("2024-01-01"))),
        make_node(2, true, None, None),
        make_node(3, false, Some(d("2024-01-03")), Some(d("2024-01-03"))),
    ];
    let legs = vec![
        make_leg(10, 1, 2, Some(d("2024-01-01"))),
        make_leg(11, 2, 3, Some(d("2024-01-02"))),
    ];

    let entries = build_itinerary(&nodes, &legs);

    assert_eq!(entries.len(), 3);
    assert!(matches!(entries[0], Entry::Node { node } if node.id == 1));
    let Entry::TravelGroup(group) = &entries[1] else {
        panic!("expected travel group, got {:?}", entries[1]);
    };
    assert_eq!(group.key(), "group:1-3");
    assert_eq!(group.legs().map(|l| l.id).collect::<Vec<_>>(), vec![10, 11]);
    assert_eq!(group.waypoints().map(|n| n.id).collect::<Vec<_>>(), vec![2]);
    assert!(matches!(entries[2], Entry::Node { node } if node.id == 3));
}

#[test]
fn scenario_hotel_keeps_row_inside_stay() {
    let nodes = vec![
        make_node(1, false, Some(d("2024-02-09")), Some(d("2024-02-14"))),
        make_node(2, false, Some(d("2024-02-14")), Some(d("2024-02-16"))),
    ];
    let stops = vec![Stop {
        id: 1,
        trip_id: 1,
        name: "Hotel".into(),
        category: "hotel".into(),
        node_id: Some(1),
        start_date: Some(d("2024-02-10")),
        end_date: Some(d("2024-02-13")),
        ..Stop::default()
    }];
    let trip = Trip {
        id: 1,
        start_date: Some(d("2024-02-09")),
        end_date: Some(d("2024-02-16")),
        ..Trip::default()
    };

    let columns = build_day_columns(&trip, &nodes, &[], &stops);

    let stay = SpanKey::Stay { trip_id: 1, node_id: 1 };
    let hotel = SpanKey::Stop { trip_id: 1, stop_id: 1 };
    let hotel_rows: Vec<_> = columns.iter().map(|c| c.row_of(&hotel)).collect();
    assert_eq!(
        hotel_rows,
        vec![None, Some(1), Some(1), Some(1), Some(1), None, None, None]
    );
    let stay_rows: Vec<_> = columns.iter().map(|c| c.row_of(&stay)).collect();
    assert_eq!(
        stay_rows,
        vec![Some(0), Some(0), Some(0), Some(0), Some(0), Some(0), None, None]
    );

    // The next stay takes the hotel's freed row and the first stay does not move
    let next = SpanKey::Stay { trip_id: 1, node_id: 2 };
    let next_rows: Vec<_> = columns.iter().map(|c| c.row_of(&next)).collect();
    assert_eq!(
        next_rows,
        vec![None, None, None, None, None, Some(1), Some(1), Some(1)]
    );
    assert!(matches!(columns[6].rows[0], DayRow::Placeholder));
}

#[test]
fn scenario_departure_only_tie_break() {
    use tripline::ordering::sort_chronologically;

    let home = make_node(1, false, None, Some(d("2024-06-02")));
    let hotel = make_node(2, false, Some(d("2024-06-02")), None);
    let earlier = make_node(3, false, Some(d("2024-06-01")), None);

    let mut nodes = vec![&hotel, &earlier, &home];
    sort_chronologically(&mut nodes);

    assert_eq!(nodes.iter().map(|n| n.id).collect::<Vec<_>>(), vec![3, 1, 2]);
}

/// A straight chain A -> w1 -> ... -> B with `legs` legs
fn waypoint_chain(legs: usize) -> (Vec<Node>, Vec<Leg>) {
    let last = legs as NodeId;
    let mut nodes = vec![make_node(0, false, Some(d("2024-01-01")), None)];
    nodes.extend((1..last).map(|id| make_node(id, true, None, None)));
    nodes.push(make_node(last, false, Some(d("2024-01-02")), None));
    let legs = (0..last)
        .map(|id| make_leg(id + 1000, id, id + 1, Some(d("2024-01-01"))))
        .collect();
    (nodes, legs)
}

#[test]
fn chain_of_max_hops_still_groups() {
    let (nodes, legs) = waypoint_chain(MAX_HOPS);

    let report = build_itinerary_report(&nodes, &legs);

    assert!(report.diagnostics.is_empty());
    let groups: Vec<_> = report
        .entries
        .iter()
        .filter_map(|e| match e {
            Entry::TravelGroup(g) => Some(g),
            _ => None,
        })
        .collect();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].legs().count(), MAX_HOPS);
}

#[test]
fn chain_past_max_hops_is_truncated() {
    let (nodes, legs) = waypoint_chain(MAX_HOPS + 1);

    let report = build_itinerary_report(&nodes, &legs);

    assert!(report
        .entries
        .iter()
        .all(|e| !matches!(e, Entry::TravelGroup(_))));
    assert!(report
        .diagnostics
        .contains(&Diagnostic::HopLimitReached { from_node_id: 0, hops: MAX_HOPS }));
    assert!(report
        .diagnostics
        .contains(&Diagnostic::Unreached { leg_id: 1000 + MAX_HOPS as i64 }));
    let loose_legs = report
        .entries
        .iter()
        .filter(|e| matches!(e, Entry::Leg { .. }))
        .count();
    assert_eq!(loose_legs, MAX_HOPS);
}

#[test]
fn cycle_through_waypoints_terminates() {
    let nodes = vec![
        make_node(1, false, Some(d("2024-01-01")), None),
        make_node(2, true, None, None),
        make_node(3, true, None, None),
    ];
    let legs = vec![
        make_leg(10, 1, 2, None),
        make_leg(11, 2, 3, None),
        make_leg(12, 3, 2, None),
    ];

    let report = build_itinerary_report(&nodes, &legs);

    assert!(report.cyclic);
    assert!(report
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::DeadEnd { .. })));
}
