// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Year command - twelve mini months with trip days marked

use super::{load_journal, Output};
use crate::calendar::year_overview;
use crate::render;
use anyhow::Result;
use std::path::Path;

/// Run the year command
pub fn run(journal_path: &Path, year: i32, out: Output) -> Result<()> {
    let journal = load_journal(journal_path)?;
    let months = year_overview(&journal.trips, year)?;
    out.emit(&months, || render::year(year, &months, out.palette()))
}
