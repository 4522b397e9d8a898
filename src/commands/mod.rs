// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod completions;
pub mod config;
pub mod days;
pub mod graph;
pub mod itinerary;
pub mod month;
pub mod stats;
pub mod year;

use crate::journal::{Journal, TripSnapshot};
use crate::render::Palette;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Output settings shared by every command
#[derive(Debug, Clone, Copy)]
pub struct Output {
    /// Emit JSON instead of text
    pub json: bool,
    /// Colored text output
    pub color: bool,
}

impl Output {
    /// Palette for text rendering
    #[must_use]
    pub fn palette(self) -> Palette {
        Palette::new(self.color)
    }

    /// Print either the JSON form of `value` or the rendered text
    pub fn emit<T: Serialize>(self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        let content = if self.json {
            serde_json::to_string_pretty(value)?
        } else {
            text()
        };
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        if !content.ends_with('\n') {
            stdout.write_all(b"\n")?;
        }
        Ok(())
    }
}

/// Load the journal, naming the file on failure
pub fn load_journal(path: &Path) -> Result<Journal> {
    Journal::load(path).with_context(|| format!("Failed to load journal from {}", path.display()))
}

/// Resolve a trip by id or name and take its snapshot
pub fn trip_snapshot(journal: &Journal, trip: &str) -> Result<TripSnapshot> {
    let found = journal
        .resolve_trip(trip)
        .ok_or_else(|| anyhow::anyhow!("Trip not found: {}", trip))?;
    Ok(journal.require_snapshot(found.id)?)
}
