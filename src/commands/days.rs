// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Days command - day-by-day layout of one trip

use super::{load_journal, trip_snapshot, Output};
use crate::calendar::build_day_columns;
use crate::render;
use anyhow::Result;
use std::path::Path;

/// Run the days command
pub fn run(journal_path: &Path, trip: &str, out: Output) -> Result<()> {
    let journal = load_journal(journal_path)?;
    let snapshot = trip_snapshot(&journal, trip)?;

    let columns = build_day_columns(&snapshot.trip, &snapshot.nodes, &snapshot.legs, &snapshot.stops);
    if columns.is_empty() && !out.json {
        eprintln!("Trip '{}' has no start and end date.", snapshot.trip.name);
        return Ok(());
    }
    out.emit(&columns, || render::days(&columns, &snapshot.nodes, out.palette()))
}
