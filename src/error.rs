// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for the fallible library surfaces (journal I/O, calendar arguments)

use crate::types::TripId;
use std::path::PathBuf;

/// Errors raised by tripline
///
/// Grouping and layout never fail on degenerate data; these errors only
/// cover loading journals and invalid caller arguments.
#[derive(Debug, thiserror::Error)]
pub enum TriplineError {
    /// Reading a journal file failed
    #[error("failed to access {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A journal file is not valid JSON for the expected shape
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// A trip id was not found in the journal
    #[error("trip not found: {0}")]
    UnknownTrip(TripId),

    /// Month outside 1..=12
    #[error("invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    /// Year outside the supported calendar range
    #[error("invalid year: {0}")]
    InvalidYear(i32),
}

/// Result alias for library operations
pub type Result<T> = std::result::Result<T, TriplineError>;
