// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Stats command - journal totals and trip rankings

use super::{load_journal, Output};
use crate::render;
use crate::stats::{trips_by_miles, trips_by_nights, JournalStats};
use anyhow::Result;
use std::path::Path;

/// Which ranking to print instead of the totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Ranking {
    /// Trips by total leg miles
    Miles,
    /// Trips by nights away
    Nights,
}

/// Run the stats command
pub fn run(journal_path: &Path, ranking: Option<Ranking>, out: Output) -> Result<()> {
    let journal = load_journal(journal_path)?;

    match ranking {
        None => {
            let stats = JournalStats::compute(&journal);
            out.emit(&stats, || render::stats(&stats, out.palette()))
        }
        Some(Ranking::Miles) => {
            let ranks = trips_by_miles(&journal);
            out.emit(&ranks, || render::ranking("Trips by miles", "mi", &ranks, out.palette()))
        }
        Some(Ranking::Nights) => {
            let ranks = trips_by_nights(&journal);
            out.emit(&ranks, || render::ranking("Trips by nights", "nights", &ranks, out.palette()))
        }
    }
}
