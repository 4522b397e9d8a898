// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Leg adjacency for one trip, built once per grouping or layout call

use crate::ordering::sort_legs_by_date;
use crate::types::{Leg, LegId, Node, NodeId};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// Node/leg graph of a trip with petgraph backing for algorithms
pub struct TripGraph<'a> {
    /// The underlying directed graph (node id weights, leg id edge weights)
    graph: DiGraph<NodeId, LegId>,
    /// Map from node id to graph index
    node_indices: HashMap<NodeId, NodeIndex>,
    /// Node lookup
    nodes: HashMap<NodeId, &'a Node>,
    /// Outbound legs per start node, sorted by date
    outbound: HashMap<NodeId, Vec<&'a Leg>>,
    /// Legs with a start or end node missing from the node set
    dangling: Vec<&'a Leg>,
}

impl<'a> TripGraph<'a> {
    /// Build the adjacency from raw node and leg slices
    #[must_use]
    pub fn build(nodes: &'a [Node], legs: &'a [Leg]) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();
        let mut by_id = HashMap::new();

        for node in nodes {
            node_indices
                .entry(node.id)
                .or_insert_with(|| graph.add_node(node.id));
            by_id.insert(node.id, node);
        }

        let mut outbound: HashMap<NodeId, Vec<&'a Leg>> = HashMap::new();
        let mut dangling = Vec::new();
        for leg in legs {
            outbound.entry(leg.start_node_id).or_default().push(leg);

            match (
                node_indices.get(&leg.start_node_id),
                node_indices.get(&leg.end_node_id),
            ) {
                (Some(&from), Some(&to)) => {
                    graph.add_edge(from, to, leg.id);
                }
                _ => dangling.push(leg),
            }
        }

        for list in outbound.values_mut() {
            sort_legs_by_date(list);
        }

        Self {
            graph,
            node_indices,
            nodes: by_id,
            outbound,
            dangling,
        }
    }

    /// Get a node by id
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&'a Node> {
        self.nodes.get(&id).copied()
    }

    /// Outbound legs of a node, ascending by date
    #[must_use]
    pub fn outbound(&self, id: NodeId) -> &[&'a Leg] {
        self.outbound.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First outbound leg of `id` not yet in `consumed`
    #[must_use]
    pub fn first_unconsumed(&self, id: NodeId, consumed: &HashSet<LegId>) -> Option<&'a Leg> {
        self.outbound(id)
            .iter()
            .copied()
            .find(|l| !consumed.contains(&l.id))
    }

    /// Legs that reference a node not present in the trip
    #[must_use]
    pub fn dangling_legs(&self) -> &[&'a Leg] {
        &self.dangling
    }

    /// Whether the legs form at least one directed cycle
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.graph)
    }

    /// Get node count
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get count of legs with both endpoints present
    #[must_use]
    pub fn leg_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check if the graph is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_indices.is_empty()
    }

    /// Export to DOT format for Graphviz; invisible nodes are drawn as points
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph trip {\n");
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  node [shape=box, style=rounded];\n\n");

        let mut ids: Vec<_> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            let node = self.nodes[&id];
            if node.invisible {
                dot.push_str(&format!(
                    "  \"{id}\" [shape=point, xlabel=\"{}\"];\n",
                    escape(&node.name)
                ));
            } else {
                dot.push_str(&format!("  \"{id}\" [label=\"{}\"];\n", escape(&node.name)));
            }
        }

        dot.push('\n');

        let mut legs: Vec<&Leg> = self.outbound.values().flatten().copied().collect();
        legs.sort_by_key(|l| l.id);
        for leg in legs {
            let label = match leg.date {
                Some(date) => format!("{} {date}", leg.leg_type.code()),
                None => leg.leg_type.code().to_string(),
            };
            let style = if self.dangling.iter().any(|d| d.id == leg.id) {
                ", style=dashed"
            } else {
                ""
            };
            dot.push_str(&format!(
                "  \"{}\" -> \"{}\" [label=\"{label}\"{style}];\n",
                leg.start_node_id, leg.end_node_id
            ));
        }

        dot.push_str("}\n");
        dot
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
