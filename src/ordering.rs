// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Chronological ordering rules shared by the itinerary and calendar views
//!
//! Undated nodes always sort after every dated node (the "latest" sentinel),
//! in both the itinerary order and the chronological order. Undated legs sort
//! before dated ones within a node's outbound list. All sorts are stable, so
//! ties keep their input order.

use crate::types::{Leg, Node};
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Compare two optional dates with `None` treated as later than any date
#[must_use]
pub fn undated_last(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Date a node is placed at in the chronological order: departure, else arrival
#[must_use]
pub fn chronological_key(node: &Node) -> Option<NaiveDate> {
    node.departure_date.or(node.arrival_date)
}

/// Chronological comparison used by the calendar views
///
/// Primary key is [`chronological_key`]. On a tie, a node that only has a
/// departure date (already in progress, like "Home") comes first.
#[must_use]
pub fn chronological(a: &Node, b: &Node) -> Ordering {
    undated_last(chronological_key(a), chronological_key(b))
        .then_with(|| b.is_departure_only().cmp(&a.is_departure_only()))
}

/// Itinerary comparison: ascending arrival date, undated last
#[must_use]
pub fn by_arrival(a: &Node, b: &Node) -> Ordering {
    undated_last(a.arrival_date, b.arrival_date)
}

/// Sort node references chronologically (stable)
pub fn sort_chronologically(nodes: &mut [&Node]) {
    nodes.sort_by(|a, b| chronological(a, b));
}

/// Sort legs by date (stable); undated legs come first
pub fn sort_legs_by_date(legs: &mut [&Leg]) {
    legs.sort_by_key(|l| l.date);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> Option<NaiveDate> {
        Some(s.parse().unwrap())
    }

    fn node(id: i64, arrival: Option<NaiveDate>, departure: Option<NaiveDate>) -> Node {
        Node {
            arrival_date: arrival,
            departure_date: departure,
            ..Node::new(id, 1, &format!("n{id}"))
        }
    }

    #[test]
    fn test_departure_only_wins_tie() {
        let home = node(1, None, date("2024-03-01"));
        let arriving = node(2, date("2024-03-01"), None);

        assert_eq!(chronological(&home, &arriving), Ordering::Less);
        assert_eq!(chronological(&arriving, &home), Ordering::Greater);
    }

    #[test]
    fn test_primary_date_beats_tie_break() {
        let home = node(1, None, date("2024-03-02"));
        let earlier = node(2, date("2024-03-01"), None);

        assert_eq!(chronological(&earlier, &home), Ordering::Less);
    }

    #[test]
    fn test_departure_is_primary_key() {
        // Arrives first but leaves last
        let long_stay = node(1, date("2024-03-01"), date("2024-03-10"));
        let short = node(2, date("2024-03-04"), date("2024-03-05"));

        let mut nodes = vec![&long_stay, &short];
        sort_chronologically(&mut nodes);
        assert_eq!(nodes[0].id, 2);
    }

    #[test]
    fn test_undated_sorts_last() {
        let undated = node(1, None, None);
        let dated = node(2, date("2030-01-01"), None);

        assert_eq!(chronological(&undated, &dated), Ordering::Greater);
        assert_eq!(by_arrival(&undated, &dated), Ordering::Greater);
        assert_eq!(by_arrival(&undated, &undated), Ordering::Equal);
    }

    #[test]
    fn test_undated_legs_first_and_stable() {
        let mut a = Leg::new(1, 1, 1, 2);
        a.date = date("2024-01-02");
        let b = Leg::new(2, 1, 1, 3);
        let mut c = Leg::new(3, 1, 1, 4);
        c.date = date("2024-01-01");
        let d = Leg::new(4, 1, 1, 5);

        let mut legs = vec![&a, &b, &c, &d];
        sort_legs_by_date(&mut legs);
        let ids: Vec<_> = legs.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![2, 4, 3, 1]);
    }
}
