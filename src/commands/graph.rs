// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Graph command - export a trip's node/leg graph as Graphviz DOT

use super::{load_journal, trip_snapshot};
use crate::graph::TripGraph;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

/// Run the graph command
pub fn run(journal_path: &std::path::Path, trip: &str, output: Option<PathBuf>) -> Result<()> {
    let journal = load_journal(journal_path)?;
    let snapshot = trip_snapshot(&journal, trip)?;

    let graph = TripGraph::build(&snapshot.nodes, &snapshot.legs);
    if graph.is_empty() {
        eprintln!("Warning: trip '{}' has no nodes.", snapshot.trip.name);
    }
    for leg in graph.dangling_legs() {
        warn!(
            "Leg {} ({} -> {}) references a missing node; drawn dashed",
            leg.id, leg.start_node_id, leg.end_node_id
        );
    }
    info!(
        "Exporting {} nodes and {} legs",
        graph.node_count(),
        graph.leg_count()
    );
    let content = graph.to_dot();

    match output {
        Some(path) => {
            fs::write(&path, &content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
        }
    }

    Ok(())
}
