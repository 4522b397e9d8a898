// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Plain-text rendering of the view models for the terminal

use crate::calendar::{
    DayColumn, DayItem, DayRow, MiniMonth, MonthLayout, MonthRow, NodeEvent, SpanPhase, SpanSubject,
};
use crate::itinerary::{Diagnostic, Entry, ItineraryReport, TravelGroup};
use crate::stats::{JournalStats, TripRank};
use crate::types::{Leg, Node, NodeId, Stop};
use owo_colors::OwoColorize;
use std::collections::HashMap;

/// Terminal styling, disabled with `--no-color`
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    color: bool,
}

impl Palette {
    /// Create a palette; `color = false` yields undecorated text
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn heading(self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn place(self, text: &str) -> String {
        if self.color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    fn warn(self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Node names for leg descriptions
struct Names<'a>(HashMap<NodeId, &'a str>);

impl<'a> Names<'a> {
    fn new(nodes: &'a [Node]) -> Self {
        Self(nodes.iter().map(|n| (n.id, n.name.as_str())).collect())
    }

    fn get(&self, id: NodeId) -> String {
        self.0
            .get(&id)
            .map_or_else(|| format!("#{id}"), |name| (*name).to_string())
    }
}

fn date_span(node: &Node) -> String {
    match (node.arrival_date, node.departure_date) {
        (Some(arr), Some(dep)) if arr == dep => arr.to_string(),
        (Some(arr), Some(dep)) => format!("{arr} - {dep}"),
        (Some(arr), None) => format!("from {arr}"),
        (None, Some(dep)) => format!("until {dep}"),
        (None, None) => "undated".to_string(),
    }
}

fn describe_leg(leg: &Leg, names: &Names<'_>) -> String {
    let mut text = format!(
        "{} {} to {}",
        leg.leg_type.label(),
        names.get(leg.start_node_id),
        names.get(leg.end_node_id)
    );
    if let Some(date) = leg.date {
        text.push_str(&format!(" on {date}"));
    }
    if let Some(miles) = leg.miles {
        text.push_str(&format!(" ({miles:.0} mi)"));
    }
    text
}

fn describe_group(group: &TravelGroup<'_>) -> String {
    let via: Vec<&str> = group.waypoints().map(|n| n.name.as_str()).collect();
    let legs = group.legs().count();
    format!(
        "{} to {} via {} ({legs} legs)",
        group.from_node.name,
        group.to_node.name,
        via.join(", ")
    )
}

fn stop_list(stops: &[&Stop]) -> String {
    if stops.is_empty() {
        return String::new();
    }
    let names: Vec<String> = stops
        .iter()
        .map(|s| format!("{} [{}]", s.name, s.category))
        .collect();
    format!("  + {}", names.join(", "))
}

fn describe_diagnostic(diagnostic: &Diagnostic) -> String {
    match diagnostic {
        Diagnostic::DanglingLeg {
            leg_id,
            missing_node_id,
            dropped,
        } => format!(
            "leg {leg_id} points at missing node {missing_node_id}; dropped {} leg(s)",
            dropped.len()
        ),
        Diagnostic::HopLimitReached { from_node_id, hops } => {
            format!("travel from node {from_node_id} stopped after {hops} legs")
        }
        Diagnostic::DeadEnd { node_id } => {
            format!("waypoint {node_id} has no onward leg")
        }
        Diagnostic::Unreached { leg_id } => format!("leg {leg_id} is not connected to any destination"),
    }
}

/// Render an itinerary report as an indented list
#[must_use]
pub fn itinerary(report: &ItineraryReport<'_>, nodes: &[Node], palette: Palette) -> String {
    let names = Names::new(nodes);
    let mut out = String::new();

    for entry in &report.entries {
        let line = match entry {
            Entry::Node { node } => format!(
                "* {}  {}",
                palette.place(&node.name),
                palette.dim(&date_span(node))
            ),
            Entry::Leg { leg } => format!("  > {}", describe_leg(leg, &names)),
            Entry::InvisibleNode { node } => format!("  . {}", palette.dim(&node.name)),
            Entry::TravelGroup(group) => format!("  > {}", describe_group(group)),
        };
        out.push_str(&format!("{line}\n"));
    }

    if report.cyclic {
        out.push_str(&format!("{}\n", palette.warn("note: legs form a loop")));
    }
    for diagnostic in &report.diagnostics {
        let warning = format!("warning: {}", describe_diagnostic(diagnostic));
        out.push_str(&format!("{}\n", palette.warn(&warning)));
    }
    out
}

fn phase_marks(phase: SpanPhase) -> (&'static str, &'static str) {
    match phase {
        SpanPhase::Start => ("[", "="),
        SpanPhase::Middle => ("=", "="),
        SpanPhase::End => ("=", "]"),
        SpanPhase::Single => ("[", "]"),
    }
}

fn describe_item(item: &DayItem<'_>, names: &Names<'_>, palette: Palette) -> String {
    match item {
        DayItem::Stay { node, stops } => {
            format!("Staying at {}{}", palette.place(&node.name), stop_list(stops))
        }
        DayItem::Node { node, event, stops, .. } => {
            let verb = match event {
                NodeEvent::Arrival => "Arriving at",
                NodeEvent::Departure => "Departing from",
            };
            format!("{verb} {}{}", palette.place(&node.name), stop_list(stops))
        }
        DayItem::Leg { leg, stops } => format!("{}{}", describe_leg(leg, names), stop_list(stops)),
        DayItem::TravelGroup(group) => describe_group(group),
        DayItem::InvisibleNode { node } => palette.dim(&format!("via {}", node.name)),
    }
}

/// Render day columns one block per day
#[must_use]
pub fn days(columns: &[DayColumn<'_>], nodes: &[Node], palette: Palette) -> String {
    let names = Names::new(nodes);
    let mut out = String::new();

    for column in columns {
        let title = format!("Day {} - {} {}", column.day_number, column.date.format("%a"), column.date);
        out.push_str(&format!("{}\n", palette.heading(&title)));
        for row in &column.rows {
            let line = match row {
                DayRow::Span(cell) => {
                    let (open, close) = phase_marks(cell.phase);
                    let label = match &cell.subject {
                        SpanSubject::Stay { node } => palette.place(&node.name),
                        SpanSubject::Stop { stop } => format!("{} [{}]", stop.name, stop.category),
                    };
                    format!("{open}{label}{close}{}", stop_list(&cell.stops))
                }
                DayRow::Placeholder => palette.dim("-"),
                DayRow::Item(item) => describe_item(item, &names, palette),
            };
            out.push_str(&format!("  {line}\n"));
        }
        out.push('\n');
    }
    out
}

/// Render a month layout as a day-by-day listing with a legend
#[must_use]
pub fn month(layout: &MonthLayout<'_>, palette: Palette) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", palette.heading(&format!("{} {}", layout.name, layout.year))));

    for day in &layout.days {
        let rows: Vec<String> = day
            .rows
            .iter()
            .map(|row| match row {
                MonthRow::TripBar { trip, phase, label, .. } => {
                    let (open, close) = phase_marks(*phase);
                    let text = label.map_or_else(|| format!("trip {}", trip.id), str::to_string);
                    format!("{open}{}{close}", palette.heading(&text))
                }
                MonthRow::Stay { node, phase, .. } => {
                    let (open, close) = phase_marks(*phase);
                    format!("{open}{}{close}", palette.place(&node.name))
                }
                MonthRow::Stop { stop, phase, .. } => {
                    let (open, close) = phase_marks(*phase);
                    format!("{open}{}{close}", stop.name)
                }
                MonthRow::Placeholder => palette.dim("-"),
                MonthRow::NodePill { node, .. } => format!("({})", palette.place(&node.name)),
                MonthRow::StopPill { stop, .. } => format!("({})", stop.name),
            })
            .collect();
        out.push_str(&format!(
            "{:>2} {}  {}\n",
            day.day,
            day.date.format("%a"),
            rows.join(" | ")
        ));
    }

    if !layout.legend.is_empty() {
        out.push('\n');
        for entry in &layout.legend {
            out.push_str(&format!("  {} {}\n", palette.dim(&entry.color), entry.name));
        }
    }
    out
}

/// Render twelve mini grids; days inside a trip are starred
#[must_use]
pub fn year(year: i32, months: &[MiniMonth], palette: Palette) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", palette.heading(&year.to_string())));

    for mini in months {
        out.push_str(&format!("\n{}\n", palette.heading(mini.name)));
        out.push_str(" Su  Mo  Tu  We  Th  Fr  Sa\n");
        for week in mini.cells.chunks(7) {
            if week.iter().all(|c| c.day.is_none()) {
                continue;
            }
            let line: Vec<String> = week
                .iter()
                .map(|cell| match cell.day {
                    Some(day) if !cell.trip_ids.is_empty() => palette.place(&format!("{day:>2}*")),
                    Some(day) => format!("{day:>2} "),
                    None => "   ".to_string(),
                })
                .collect();
            out.push_str(&format!("{}\n", line.join(" ").trim_end()));
        }
    }
    out
}

/// Render journal statistics
#[must_use]
pub fn stats(stats: &JournalStats, palette: Palette) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", palette.heading("Journal")));
    out.push_str(&format!("  trips:        {}\n", stats.trip_count));
    out.push_str(&format!("  miles:        {}\n", stats.all_trip_miles));
    out.push_str(&format!("  nights:       {}\n", stats.total_nights));
    out.push_str(&format!("  destinations: {}\n", stats.unique_destination_count));
    out.push_str(&format!("  countries:    {}\n", stats.country_count));
    out.push_str(&format!("  states:       {}\n", stats.state_count));

    out.push_str(&format!("{}\n", palette.heading("Miles by type")));
    for (code, miles) in &stats.miles_by_type {
        out.push_str(&format!("  {code:<8} {miles}\n"));
    }

    out.push_str(&format!("{}\n", palette.heading("Stops by category")));
    for (category, count) in &stats.stops_by_category {
        out.push_str(&format!("  {category:<12} {count}\n"));
    }

    if !stats.states_by_country.is_empty() {
        out.push_str(&format!("{}\n", palette.heading("Countries")));
        for (country, states) in &stats.states_by_country {
            let places = stats.destinations_by_country.get(country).copied().unwrap_or(0);
            out.push_str(&format!("  {country}: {places} places; {}\n", states.join(", ")));
        }
    }
    out
}

/// Render a trip ranking
#[must_use]
pub fn ranking(title: &str, unit: &str, ranks: &[TripRank], palette: Palette) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", palette.heading(title)));
    for (position, rank) in ranks.iter().enumerate() {
        out.push_str(&format!("{:>3}. {} ({} {unit})\n", position + 1, rank.name, rank.value));
    }
    out
}
