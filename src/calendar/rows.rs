// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Stable row assignment for overlapping multi-day spans

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// A span that is active on the day being processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanRequest<K> {
    /// Span identity
    pub key: K,
    /// Enclosing span; the child is placed strictly below it
    pub parent: Option<K>,
}

/// Row assignments for one layout pass, processed day by day in date order
///
/// A span keeps its row for as long as it stays active. Rows freed by ended
/// spans are reused by spans starting later, but rows are never compacted.
#[derive(Debug, Clone)]
pub struct RowAssigner<K> {
    assignments: HashMap<K, usize>,
}

impl<K> Default for RowAssigner<K> {
    fn default() -> Self {
        Self {
            assignments: HashMap::new(),
        }
    }
}

impl<K: Clone + Eq + Hash> RowAssigner<K> {
    /// Start a fresh layout pass
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the next day and return its rows top to bottom
    ///
    /// `active` lists every span covering the day, parents before children.
    /// `None` entries are placeholder rows kept for vertical alignment.
    pub fn process_day(&mut self, active: &[SpanRequest<K>]) -> Vec<Option<K>> {
        let active_keys: HashSet<&K> = active.iter().map(|r| &r.key).collect();
        self.assignments.retain(|key, _| active_keys.contains(key));

        let mut used: HashSet<usize> = self.assignments.values().copied().collect();
        for request in active {
            if self.assignments.contains_key(&request.key) {
                continue;
            }
            let min_row = request
                .parent
                .as_ref()
                .and_then(|p| self.assignments.get(p))
                .map_or(0, |row| row + 1);
            let mut row = min_row;
            while used.contains(&row) {
                row += 1;
            }
            used.insert(row);
            self.assignments.insert(request.key.clone(), row);
        }

        let mut rows = vec![None; self.height()];
        for (key, &row) in &self.assignments {
            rows[row] = Some(key.clone());
        }
        rows
    }

    /// Row currently held by `key`
    #[must_use]
    pub fn row_of(&self, key: &K) -> Option<usize> {
        self.assignments.get(key).copied()
    }

    /// Rows needed to hold every current assignment (max row + 1)
    #[must_use]
    pub fn height(&self) -> usize {
        self.assignments.values().max().map_or(0, |max| max + 1)
    }
}
