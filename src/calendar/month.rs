// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Month grid with trip bars, nested stays and stops, and the year overview

use super::{nest_spans, RowAssigner, SpanDef, SpanKey, SpanPhase};
use crate::error::{Result, TriplineError};
use crate::journal::TripSnapshot;
use crate::ordering::sort_chronologically;
use crate::types::{Node, Stop, StopAnchor, Trip, TripId};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// English month names, January first
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Cells in a mini month grid (six weeks)
pub const MINI_GRID_CELLS: usize = 42;

/// Stable display colour of a trip
#[must_use]
pub fn trip_color(trip_id: TripId) -> String {
    format!("hsl({} 65% 45%)", trip_id.wrapping_mul(57).rem_euclid(360))
}

/// First and last day of a month
fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    if !(1..=12).contains(&month) {
        return Err(TriplineError::InvalidMonth(month));
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(TriplineError::InvalidYear(year))?;
    let next = if month == 12 {
        year.checked_add(1)
            .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1))
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next
        .and_then(|d| d.pred_opt())
        .ok_or(TriplineError::InvalidYear(year))?;
    Ok((first, last))
}

fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month as usize - 1) % 12]
}

/// One row of a month day cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MonthRow<'a> {
    /// Slice of a trip bar
    TripBar {
        /// The trip
        trip: &'a Trip,
        /// Bar colour
        color: String,
        /// Start/end caps
        phase: SpanPhase,
        /// Trip name, only on the trip's first day
        label: Option<&'a str>,
    },
    /// Slice of a node stay nested under its trip
    Stay {
        /// Owning trip
        trip_id: TripId,
        /// The node
        node: &'a Node,
        /// Start/end caps
        phase: SpanPhase,
    },
    /// Slice of a multi-day stop
    Stop {
        /// Owning trip
        trip_id: TripId,
        /// The stop
        stop: &'a Stop,
        /// Start/end caps
        phase: SpanPhase,
    },
    /// Empty row keeping bars aligned across the week
    Placeholder,
    /// A node arriving this day without a stay
    NodePill {
        /// Owning trip
        trip_id: TripId,
        /// The node
        node: &'a Node,
    },
    /// A single-day stop on this day
    StopPill {
        /// Owning trip
        trip_id: TripId,
        /// The stop
        stop: &'a Stop,
    },
}

/// One day cell of the month grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthDay<'a> {
    /// The day
    pub date: NaiveDate,
    /// Day of month
    pub day: u32,
    /// Span rows followed by pills
    pub rows: Vec<MonthRow<'a>>,
}

impl MonthDay<'_> {
    /// Row index of a span on this day
    #[must_use]
    pub fn row_of(&self, key: &SpanKey) -> Option<usize> {
        self.rows.iter().position(|row| row_key(row).as_ref() == Some(key))
    }
}

fn row_key(row: &MonthRow<'_>) -> Option<SpanKey> {
    match row {
        MonthRow::TripBar { trip, .. } => Some(SpanKey::Trip { trip_id: trip.id }),
        MonthRow::Stay { trip_id, node, .. } => Some(SpanKey::Stay {
            trip_id: *trip_id,
            node_id: node.id,
        }),
        MonthRow::Stop { trip_id, stop, .. } => Some(SpanKey::Stop {
            trip_id: *trip_id,
            stop_id: stop.id,
        }),
        MonthRow::Placeholder | MonthRow::NodePill { .. } | MonthRow::StopPill { .. } => None,
    }
}

/// Legend line for a trip shown in the month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    /// Trip
    pub trip_id: TripId,
    /// Trip name
    pub name: String,
    /// Bar colour
    pub color: String,
}

/// A laid-out month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthLayout<'a> {
    /// Year
    pub year: i32,
    /// Month (1-12)
    pub month: u32,
    /// Month name
    pub name: &'static str,
    /// Empty cells before the 1st in a Sunday-first week
    pub leading_blanks: u32,
    /// Day cells, 1st to last
    pub days: Vec<MonthDay<'a>>,
    /// Trips shown, in display order
    pub legend: Vec<LegendEntry>,
}

#[derive(Debug, Clone, Copy)]
enum MonthSubject<'a> {
    Trip(&'a Trip),
    Stay(TripId, &'a Node),
    Stop(TripId, &'a Stop),
}

fn trip_spans<'a>(
    trip: &'a Trip,
    start: NaiveDate,
    end: NaiveDate,
    snapshot: Option<&'a TripSnapshot>,
    spans: &mut Vec<SpanDef<MonthSubject<'a>>>,
) {
    let trip_key = SpanKey::Trip { trip_id: trip.id };
    spans.push(SpanDef::new(trip_key, None, start, end, MonthSubject::Trip(trip)));

    let Some(snapshot) = snapshot else {
        return;
    };

    let mut nodes: Vec<&Node> = snapshot.nodes.iter().collect();
    sort_chronologically(&mut nodes);
    for node in nodes {
        if let (true, true, Some(arr), Some(dep)) = (
            node.is_visible(),
            node.has_stay(),
            node.arrival_date,
            node.departure_date,
        ) {
            spans.push(SpanDef::new(
                SpanKey::Stay {
                    trip_id: trip.id,
                    node_id: node.id,
                },
                Some(trip_key),
                arr,
                dep,
                MonthSubject::Stay(trip.id, node),
            ));
        }
    }

    let mut stops: Vec<&Stop> = snapshot.stops.iter().filter(|s| s.is_multi_day()).collect();
    stops.sort_by_key(|s| (s.start_date, s.id));
    for stop in stops {
        let parent = match stop.anchor() {
            Some(StopAnchor::Node(node_id)) => match snapshot.nodes.iter().find(|n| n.id == node_id) {
                Some(node) if node.is_visible() && node.has_stay() => SpanKey::Stay {
                    trip_id: trip.id,
                    node_id,
                },
                Some(_) => trip_key,
                None => {
                    debug!("Stop {} references missing node {}; skipping", stop.id, node_id);
                    continue;
                }
            },
            Some(StopAnchor::Leg(leg_id)) if snapshot.legs.iter().any(|l| l.id == leg_id) => trip_key,
            _ => continue,
        };
        if let (Some(start), Some(end)) = (stop.start_date, stop.end_date) {
            spans.push(SpanDef::new(
                SpanKey::Stop {
                    trip_id: trip.id,
                    stop_id: stop.id,
                },
                Some(parent),
                start,
                end,
                MonthSubject::Stop(trip.id, stop),
            ));
        }
    }
}

fn pills<'a>(trip: &Trip, snapshot: &'a TripSnapshot, date: NaiveDate) -> Vec<MonthRow<'a>> {
    let mut nodes: Vec<&Node> = snapshot
        .nodes
        .iter()
        .filter(|n| n.is_visible() && !n.has_stay() && n.arrival_date == Some(date))
        .collect();
    sort_chronologically(&mut nodes);

    let node_ids: Vec<_> = snapshot.nodes.iter().map(|n| n.id).collect();
    let anchored = |stop: &Stop| match stop.anchor() {
        Some(StopAnchor::Node(id)) => node_ids.contains(&id),
        Some(StopAnchor::Leg(id)) => snapshot.legs.iter().any(|l| l.id == id),
        None => false,
    };

    let mut rows: Vec<MonthRow<'a>> = nodes
        .into_iter()
        .map(|node| MonthRow::NodePill {
            trip_id: trip.id,
            node,
        })
        .collect();
    rows.extend(
        snapshot
            .stops
            .iter()
            .filter(|s| !s.is_multi_day() && s.start_date == Some(date) && anchored(*s))
            .map(|stop| MonthRow::StopPill {
                trip_id: trip.id,
                stop,
            }),
    );
    rows
}

/// Lay out every trip overlapping a month
///
/// `details` supplies nodes and stops per trip; trips without an entry only
/// get their bar. Span rows stay stable across the whole month.
pub fn layout_month<'a>(
    trips: &'a [Trip],
    details: &'a HashMap<TripId, TripSnapshot>,
    year: i32,
    month: u32,
) -> Result<MonthLayout<'a>> {
    let (first, last) = month_bounds(year, month)?;

    let mut month_trips: Vec<(&Trip, NaiveDate, NaiveDate)> = trips
        .iter()
        .filter_map(|t| t.date_range().map(|(s, e)| (t, s, e)))
        .filter(|(_, s, e)| *s <= last && *e >= first)
        .collect();
    month_trips.sort_by_key(|(t, s, _)| (*s, t.id));
    debug!("{} trips overlap {}-{:02}", month_trips.len(), year, month);

    let mut spans = Vec::new();
    for &(trip, start, end) in &month_trips {
        trip_spans(trip, start, end, details.get(&trip.id), &mut spans);
    }
    nest_spans(&mut spans);
    let by_key: HashMap<SpanKey, &SpanDef<MonthSubject<'a>>> =
        spans.iter().map(|s| (s.key, s)).collect();

    let mut assigner = RowAssigner::new();
    let days = first
        .iter_days()
        .take_while(|date| *date <= last)
        .map(|date| {
            let active: Vec<_> = spans
                .iter()
                .filter(|s| s.covers(date))
                .map(SpanDef::request)
                .collect();

            let mut rows: Vec<MonthRow<'a>> = assigner
                .process_day(&active)
                .into_iter()
                .map(|slot| match slot.and_then(|key| by_key.get(&key)) {
                    Some(span) => {
                        let phase = span.phase(date);
                        match span.subject {
                            MonthSubject::Trip(trip) => MonthRow::TripBar {
                                trip,
                                color: trip_color(trip.id),
                                phase,
                                label: (span.start == date).then_some(trip.name.as_str()),
                            },
                            MonthSubject::Stay(trip_id, node) => MonthRow::Stay {
                                trip_id,
                                node,
                                phase,
                            },
                            MonthSubject::Stop(trip_id, stop) => MonthRow::Stop {
                                trip_id,
                                stop,
                                phase,
                            },
                        }
                    }
                    None => MonthRow::Placeholder,
                })
                .collect();

            for &(trip, _, _) in &month_trips {
                if let Some(snapshot) = details.get(&trip.id) {
                    rows.extend(pills(trip, snapshot, date));
                }
            }

            MonthDay {
                date,
                day: date.day(),
                rows,
            }
        })
        .collect();

    let legend = month_trips
        .iter()
        .map(|(trip, _, _)| LegendEntry {
            trip_id: trip.id,
            name: trip.name.clone(),
            color: trip_color(trip.id),
        })
        .collect();

    Ok(MonthLayout {
        year,
        month,
        name: month_name(month),
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
        legend,
    })
}

/// One cell of a mini month grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MiniDay {
    /// Day of month, `None` for padding cells
    pub day: Option<u32>,
    /// Trips active on the day
    pub trip_ids: Vec<TripId>,
}

/// A six-week mini month for the year view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MiniMonth {
    /// Month (1-12)
    pub month: u32,
    /// Month name
    pub name: &'static str,
    /// Always [`MINI_GRID_CELLS`] cells, Sunday first
    pub cells: Vec<MiniDay>,
}

/// Twelve mini grids marking the days each trip covers
pub fn year_overview(trips: &[Trip], year: i32) -> Result<Vec<MiniMonth>> {
    (1..=12)
        .map(|month| -> Result<MiniMonth> {
            let (first, last) = month_bounds(year, month)?;
            let leading = first.weekday().num_days_from_sunday() as usize;
            let cells = (0..MINI_GRID_CELLS)
                .map(|cell| {
                    let date = cell
                        .checked_sub(leading)
                        .and_then(|offset| first.checked_add_days(Days::new(offset as u64)))
                        .filter(|date| *date <= last);
                    match date {
                        Some(date) => MiniDay {
                            day: Some(date.day()),
                            trip_ids: trips.iter().filter(|t| t.covers(date)).map(|t| t.id).collect(),
                        },
                        None => MiniDay {
                            day: None,
                            trip_ids: Vec::new(),
                        },
                    }
                })
                .collect();
            Ok(MiniMonth {
                month,
                name: month_name(month),
                cells,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn trip(id: TripId, name: &str, start: &str, end: &str) -> Trip {
        Trip {
            id,
            name: name.into(),
            start_date: Some(d(start)),
            end_date: Some(d(end)),
            ..Trip::default()
        }
    }

    fn day<'l, 'a>(layout: &'l MonthLayout<'a>, n: u32) -> &'l MonthDay<'a> {
        &layout.days[n as usize - 1]
    }

    #[test]
    fn test_invalid_month() {
        let details = HashMap::new();
        assert!(matches!(
            layout_month(&[], &details, 2024, 13),
            Err(TriplineError::InvalidMonth(13))
        ));
        assert!(matches!(
            layout_month(&[], &details, 2024, 0),
            Err(TriplineError::InvalidMonth(0))
        ));
    }

    #[test]
    fn test_month_shape() {
        let details = HashMap::new();
        let layout = layout_month(&[], &details, 2024, 2).unwrap();

        assert_eq!(layout.name, "February");
        assert_eq!(layout.days.len(), 29);
        // 2024-02-01 is a Thursday
        assert_eq!(layout.leading_blanks, 4);
        assert!(layout.legend.is_empty());
    }

    #[test]
    fn test_trip_bar_label_only_on_true_first_day() {
        let trips = vec![trip(3, "Winter", "2024-01-30", "2024-02-02"), trip(4, "Spring", "2024-02-02", "2024-02-04")];
        let details = HashMap::new();

        let layout = layout_month(&trips, &details, 2024, 2).unwrap();

        let MonthRow::TripBar { label, phase, color, .. } = &day(&layout, 1).rows[0] else {
            panic!("expected trip bar");
        };
        assert_eq!(*label, None);
        assert_eq!(*phase, SpanPhase::Middle);
        assert_eq!(color, "hsl(171 65% 45%)");

        let MonthRow::TripBar { label, .. } = &day(&layout, 2).rows[1] else {
            panic!("expected trip bar");
        };
        assert_eq!(*label, Some("Spring"));
        assert_eq!(layout.legend.len(), 2);
        assert_eq!(layout.legend[0].trip_id, 3);
    }

    #[test]
    fn test_trip_keeps_row_after_neighbour_ends() {
        let trips = vec![trip(1, "A", "2024-03-01", "2024-03-02"), trip(2, "B", "2024-03-01", "2024-03-05")];
        let details = HashMap::new();

        let layout = layout_month(&trips, &details, 2024, 3).unwrap();

        let b = SpanKey::Trip { trip_id: 2 };
        assert_eq!(day(&layout, 1).row_of(&b), Some(1));
        assert_eq!(day(&layout, 3).row_of(&b), Some(1));
        assert_eq!(day(&layout, 3).rows[0], MonthRow::Placeholder);
        assert!(day(&layout, 6).rows.is_empty());
    }

    #[test]
    fn test_stays_and_pills_nest_under_trip() {
        let trips = vec![trip(1, "Italy", "2024-04-01", "2024-04-05")];
        let mut rome = Node::new(10, 1, "Rome");
        rome.arrival_date = Some(d("2024-04-01"));
        rome.departure_date = Some(d("2024-04-03"));
        let mut pisa = Node::new(11, 1, "Pisa");
        pisa.arrival_date = Some(d("2024-04-04"));
        let snapshot = TripSnapshot {
            trip: trips[0].clone(),
            nodes: vec![rome, pisa],
            legs: Vec::new(),
            stops: vec![Stop {
                id: 7,
                trip_id: 1,
                name: "Tower".into(),
                node_id: Some(11),
                start_date: Some(d("2024-04-04")),
                ..Stop::default()
            }],
        };
        let details: HashMap<_, _> = [(1, snapshot)].into_iter().collect();

        let layout = layout_month(&trips, &details, 2024, 4).unwrap();

        let stay = SpanKey::Stay { trip_id: 1, node_id: 10 };
        assert_eq!(day(&layout, 1).row_of(&SpanKey::Trip { trip_id: 1 }), Some(0));
        assert_eq!(day(&layout, 1).row_of(&stay), Some(1));
        assert_eq!(day(&layout, 3).row_of(&stay), Some(1));

        let fourth = &day(&layout, 4).rows;
        assert_eq!(fourth.len(), 3);
        assert!(matches!(fourth[1], MonthRow::NodePill { node, .. } if node.id == 11));
        assert!(matches!(fourth[2], MonthRow::StopPill { stop, .. } if stop.id == 7));
    }

    #[test]
    fn test_early_stay_waits_for_its_trip() {
        let trips = vec![trip(2, "Coast", "2024-05-03", "2024-05-08")];
        let mut inn = Node::new(20, 2, "Inn");
        inn.arrival_date = Some(d("2024-05-01"));
        inn.departure_date = Some(d("2024-05-05"));
        let snapshot = TripSnapshot {
            trip: trips[0].clone(),
            nodes: vec![inn],
            legs: Vec::new(),
            stops: Vec::new(),
        };
        let details: HashMap<_, _> = [(2, snapshot)].into_iter().collect();

        let layout = layout_month(&trips, &details, 2024, 5).unwrap();

        let stay = SpanKey::Stay { trip_id: 2, node_id: 20 };
        assert!(day(&layout, 1).rows.is_empty());
        assert!(day(&layout, 2).rows.is_empty());
        for n in 3..=5 {
            assert_eq!(day(&layout, n).row_of(&SpanKey::Trip { trip_id: 2 }), Some(0));
            assert_eq!(day(&layout, n).row_of(&stay), Some(1));
        }
        assert_eq!(day(&layout, 6).row_of(&stay), None);
    }

    #[test]
    fn test_year_overview() {
        let trips = vec![trip(1, "NYE", "2023-12-30", "2024-01-02")];

        let months = year_overview(&trips, 2024).unwrap();

        assert_eq!(months.len(), 12);
        assert!(months.iter().all(|m| m.cells.len() == MINI_GRID_CELLS));
        let january = &months[0];
        // 2024-01-01 is a Monday
        assert_eq!(january.cells[0].day, None);
        assert_eq!(january.cells[1].day, Some(1));
        assert_eq!(january.cells[1].trip_ids, vec![1]);
        assert_eq!(january.cells[2].trip_ids, vec![1]);
        assert!(january.cells[3].trip_ids.is_empty());
        assert_eq!(january.cells.iter().filter(|c| c.day.is_some()).count(), 31);
    }

    #[test]
    fn test_trip_color_wraps() {
        assert_eq!(trip_color(0), "hsl(0 65% 45%)");
        assert_eq!(trip_color(7), "hsl(39 65% 45%)");
        assert_eq!(trip_color(-1), "hsl(303 65% 45%)");
    }
}
