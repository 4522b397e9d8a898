// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Itinerary command - list a trip's destinations and travel in order

use super::{load_journal, trip_snapshot, Output};
use crate::itinerary::build_itinerary_report;
use crate::render;
use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Run the itinerary command
pub fn run(journal_path: &Path, trip: &str, out: Output) -> Result<()> {
    let journal = load_journal(journal_path)?;
    let snapshot = trip_snapshot(&journal, trip)?;
    info!("Building itinerary for {}", snapshot.trip.name);

    let report = build_itinerary_report(&snapshot.nodes, &snapshot.legs);
    out.emit(&report, || {
        format!(
            "{}\n{}",
            snapshot.trip.name,
            render::itinerary(&report, &snapshot.nodes, out.palette())
        )
    })
}
