// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Itinerary grouping: a chronological list of destinations where chains of
//! legs through invisible waypoints collapse into travel groups

use crate::graph::TripGraph;
use crate::ordering::by_arrival;
use crate::types::{Leg, LegId, Node, NodeId};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Maximum legs followed in a single walk before it is cut short
pub const MAX_HOPS: usize = 100;

/// One step inside a travel group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Segment<'a> {
    /// A leg of the chain
    Leg {
        /// The leg
        leg: &'a Leg,
    },
    /// An invisible waypoint passed through
    Node {
        /// The waypoint
        node: &'a Node,
    },
}

/// Chain of legs between two visible nodes through invisible waypoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelGroup<'a> {
    /// Visible origin
    pub from_node: &'a Node,
    /// Visible destination
    pub to_node: &'a Node,
    /// Alternating legs and waypoints, starting and ending with a leg
    pub sequence: Vec<Segment<'a>>,
}

impl<'a> TravelGroup<'a> {
    /// Expansion key used by the UI to remember open/closed state
    #[must_use]
    pub fn key(&self) -> String {
        format!("group:{}-{}", self.from_node.id, self.to_node.id)
    }

    /// Legs in travel order
    pub fn legs(&self) -> impl Iterator<Item = &'a Leg> + '_ {
        self.sequence.iter().filter_map(|s| match s {
            Segment::Leg { leg } => Some(*leg),
            Segment::Node { .. } => None,
        })
    }

    /// Waypoints in travel order
    pub fn waypoints(&self) -> impl Iterator<Item = &'a Node> + '_ {
        self.sequence.iter().filter_map(|s| match s {
            Segment::Node { node } => Some(*node),
            Segment::Leg { .. } => None,
        })
    }
}

/// One itinerary entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Entry<'a> {
    /// A visible destination
    Node {
        /// The destination
        node: &'a Node,
    },
    /// A direct leg between visible nodes (or a loose leg of a broken chain)
    Leg {
        /// The leg
        leg: &'a Leg,
    },
    /// A waypoint from a chain that never reached a visible node
    InvisibleNode {
        /// The waypoint
        node: &'a Node,
    },
    /// Collapsed chain through invisible waypoints
    TravelGroup(TravelGroup<'a>),
}

impl Entry<'_> {
    /// Ids of every leg carried by this entry
    #[must_use]
    pub fn leg_ids(&self) -> Vec<LegId> {
        match self {
            Self::Leg { leg } => vec![leg.id],
            Self::TravelGroup(group) => group.legs().map(|l| l.id).collect(),
            Self::Node { .. } | Self::InvisibleNode { .. } => Vec::new(),
        }
    }
}

/// Non-fatal data problems found while grouping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Diagnostic {
    /// A leg points at a node that does not exist; its walk was discarded
    DanglingLeg {
        /// Offending leg
        leg_id: LegId,
        /// Missing end node
        missing_node_id: NodeId,
        /// Every leg of the discarded walk
        dropped: Vec<LegId>,
    },
    /// A walk hit the hop ceiling and was cut short
    HopLimitReached {
        /// Visible node the walk started from
        from_node_id: NodeId,
        /// Legs followed
        hops: usize,
    },
    /// A walk stopped at an invisible node with no unconsumed outbound leg
    DeadEnd {
        /// The waypoint the chain stopped at
        node_id: NodeId,
    },
    /// A leg no walk ever reached (e.g. starting at an orphaned waypoint)
    Unreached {
        /// The leg
        leg_id: LegId,
    },
}

/// Itinerary entries plus the diagnostics collected while building them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItineraryReport<'a> {
    /// Ordered entries
    pub entries: Vec<Entry<'a>>,
    /// Problems found along the way
    pub diagnostics: Vec<Diagnostic>,
    /// Whether the legs form a directed cycle
    pub cyclic: bool,
}

enum WalkEnd<'a> {
    Visible(&'a Node),
    Dangling { leg_id: LegId, missing: NodeId },
    DeadEnd(&'a Node),
    HopLimit,
}

struct Walk<'a> {
    sequence: Vec<Segment<'a>>,
    found_invisible: bool,
    end: WalkEnd<'a>,
}

/// Follow `first` through invisible nodes until a visible node, a break, or the hop ceiling
fn walk<'a>(graph: &TripGraph<'a>, first: &'a Leg, consumed: &mut HashSet<LegId>) -> Walk<'a> {
    let mut sequence = Vec::new();
    let mut found_invisible = false;
    let mut current = first;
    let mut hops = 0;

    let end = loop {
        if hops == MAX_HOPS {
            break WalkEnd::HopLimit;
        }
        hops += 1;

        sequence.push(Segment::Leg { leg: current });
        consumed.insert(current.id);

        let Some(next) = graph.node(current.end_node_id) else {
            break WalkEnd::Dangling {
                leg_id: current.id,
                missing: current.end_node_id,
            };
        };

        if !next.invisible {
            break WalkEnd::Visible(next);
        }

        found_invisible = true;
        sequence.push(Segment::Node { node: next });
        match graph.first_unconsumed(next.id, consumed) {
            Some(leg) => current = leg,
            None => break WalkEnd::DeadEnd(next),
        }
    };

    Walk {
        sequence,
        found_invisible,
        end,
    }
}

fn loose_entries<'a>(sequence: Vec<Segment<'a>>) -> impl Iterator<Item = Entry<'a>> {
    sequence.into_iter().map(|seg| match seg {
        Segment::Leg { leg } => Entry::Leg { leg },
        Segment::Node { node } => Entry::InvisibleNode { node },
    })
}

/// Build the itinerary and report data problems
#[must_use]
pub fn build_itinerary_report<'a>(nodes: &'a [Node], legs: &'a [Leg]) -> ItineraryReport<'a> {
    let graph = TripGraph::build(nodes, legs);

    let mut visible: Vec<&Node> = nodes.iter().filter(|n| n.is_visible()).collect();
    visible.sort_by(|a, b| by_arrival(a, b));

    let mut entries = Vec::new();
    let mut diagnostics = Vec::new();
    let mut consumed: HashSet<LegId> = HashSet::new();

    for start in visible {
        entries.push(Entry::Node { node: start });

        for &first in graph.outbound(start.id) {
            if consumed.contains(&first.id) {
                continue;
            }

            let Walk {
                sequence,
                found_invisible,
                end,
            } = walk(&graph, first, &mut consumed);

            match end {
                WalkEnd::Visible(to_node) if found_invisible => {
                    entries.push(Entry::TravelGroup(TravelGroup {
                        from_node: start,
                        to_node,
                        sequence,
                    }));
                }
                WalkEnd::Visible(_) => entries.push(Entry::Leg { leg: first }),
                WalkEnd::Dangling { leg_id, missing } => {
                    warn!("Leg {} points at missing node {}; dropping chain", leg_id, missing);
                    let dropped = sequence
                        .iter()
                        .filter_map(|s| match s {
                            Segment::Leg { leg } => Some(leg.id),
                            Segment::Node { .. } => None,
                        })
                        .collect();
                    diagnostics.push(Diagnostic::DanglingLeg {
                        leg_id,
                        missing_node_id: missing,
                        dropped,
                    });
                }
                WalkEnd::DeadEnd(node) => {
                    debug!("Chain from {} stops at waypoint {}", start.id, node.id);
                    diagnostics.push(Diagnostic::DeadEnd { node_id: node.id });
                    entries.extend(loose_entries(sequence));
                }
                WalkEnd::HopLimit => {
                    warn!("Chain from node {} exceeded {} hops; truncating", start.id, MAX_HOPS);
                    diagnostics.push(Diagnostic::HopLimitReached {
                        from_node_id: start.id,
                        hops: MAX_HOPS,
                    });
                    entries.extend(loose_entries(sequence));
                }
            }
        }
    }

    for leg in legs.iter().filter(|l| !consumed.contains(&l.id)) {
        debug!("Leg {} is not reachable from any visible node", leg.id);
        diagnostics.push(Diagnostic::Unreached { leg_id: leg.id });
    }

    debug!(
        "Built itinerary: {} entries from {} nodes and {} legs",
        entries.len(),
        nodes.len(),
        legs.len()
    );

    ItineraryReport {
        entries,
        diagnostics,
        cyclic: graph.has_cycle(),
    }
}

/// Build the ordered itinerary for a trip's nodes and legs
#[must_use]
pub fn build_itinerary<'a>(nodes: &'a [Node], legs: &'a [Leg]) -> Vec<Entry<'a>> {
    build_itinerary_report(nodes, legs).entries
}
