// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Calendar layouts: per-trip day columns and the multi-trip month/year grids
//!
//! Every layout pass owns one [`RowAssigner`]; multi-day spans keep the row
//! they were given on their first visible day until they end.

pub mod daily;
pub mod month;
pub mod rows;

pub use daily::{build_day_columns, DayColumn, DayItem, DayRow, NodeEvent, SingleType, SpanCell, SpanSubject};
pub use month::{
    layout_month, trip_color, year_overview, LegendEntry, MiniDay, MiniMonth, MonthDay, MonthLayout, MonthRow, MONTH_NAMES,
};
pub use rows::{RowAssigner, SpanRequest};

use crate::types::{NodeId, StopId, TripId};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Identity of a multi-day span, scoped by trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SpanKey {
    /// A whole trip (month grid only)
    Trip {
        /// Trip
        trip_id: TripId,
    },
    /// A node stay from arrival to departure
    Stay {
        /// Owning trip
        trip_id: TripId,
        /// Node
        node_id: NodeId,
    },
    /// A multi-day stop such as a hotel booking
    Stop {
        /// Owning trip
        trip_id: TripId,
        /// Stop
        stop_id: StopId,
    },
}

/// Where a day falls within a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanPhase {
    /// First day
    Start,
    /// Neither first nor last
    Middle,
    /// Last day
    End,
    /// Starts and ends on the same day
    Single,
}

impl SpanPhase {
    /// Phase of `date` within the inclusive range `start..=end`
    #[must_use]
    pub fn of(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> Self {
        if start == end {
            Self::Single
        } else if date <= start {
            Self::Start
        } else if date >= end {
            Self::End
        } else {
            Self::Middle
        }
    }
}

/// A span definition feeding the row assigner
#[derive(Debug, Clone, Copy)]
pub(crate) struct SpanDef<S> {
    pub key: SpanKey,
    pub parent: Option<SpanKey>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// First day the span holds a row; never before its parent's
    pub row_start: NaiveDate,
    pub subject: S,
}

impl<S> SpanDef<S> {
    pub fn new(
        key: SpanKey,
        parent: Option<SpanKey>,
        start: NaiveDate,
        end: NaiveDate,
        subject: S,
    ) -> Self {
        Self {
            key,
            parent,
            start,
            end,
            row_start: start,
            subject,
        }
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.row_start <= date && date <= self.end
    }

    pub fn phase(&self, date: NaiveDate) -> SpanPhase {
        SpanPhase::of(date, self.start, self.end)
    }

    pub fn request(&self) -> SpanRequest<SpanKey> {
        SpanRequest {
            key: self.key,
            parent: self.parent,
        }
    }
}

/// Hold back child spans that start before their parent
///
/// A child takes its row on its parent's first day, so it lands below the
/// parent. A child that ends before its parent starts is laid out unnested.
/// `spans` must list parents before their children.
pub(crate) fn nest_spans<S>(spans: &mut [SpanDef<S>]) {
    let mut row_starts: HashMap<SpanKey, NaiveDate> = HashMap::new();
    for span in spans.iter_mut() {
        if let Some(parent_start) = span.parent.and_then(|p| row_starts.get(&p).copied()) {
            if parent_start > span.end {
                span.parent = None;
            } else {
                span.row_start = span.row_start.max(parent_start);
            }
        }
        row_starts.insert(span.key, span.row_start);
    }
}
