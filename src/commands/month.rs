// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Month command - every trip overlapping a calendar month

use super::{load_journal, Output};
use crate::calendar::layout_month;
use crate::journal::{TripSnapshot, TripSource};
use crate::render;
use crate::types::TripId;
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

/// Run the month command
pub fn run(journal_path: &Path, year: i32, month: u32, out: Output) -> Result<()> {
    let journal = load_journal(journal_path)?;
    let details: HashMap<TripId, TripSnapshot> = journal
        .trips()
        .iter()
        .filter_map(|t| journal.snapshot(t.id).map(|s| (t.id, s)))
        .collect();

    let layout = layout_month(journal.trips(), &details, year, month)?;
    out.emit(&layout, || render::month(&layout, out.palette()))
}
