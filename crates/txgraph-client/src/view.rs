//! Client-side graph state with incremental layout.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use tracing::debug;
use txgraph_graph::{GraphEdge, GraphNode, Transaction};

use crate::highlight::HighlightTracker;
use crate::layout::{circle_positions, ForceLayout, Point, NODE_RADIUS};
use crate::style::{edge_style, EdgeStyle};

/// Where a view is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// No data with nodes has arrived yet.
    Empty,
    /// Every node has a cached position.
    LaidOut,
    /// New nodes are being placed around the cached ones.
    Updating,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    pub node: GraphNode,
    pub position: Point,
    pub radius: f64,
}

/// What a snapshot changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SnapshotOutcome {
    pub new_nodes: usize,
    pub new_edges: usize,
    pub laid_out: bool,
}

/// Local copy of the graph plus cached node positions.
///
/// Snapshots replace nodes and edges wholesale, so applying the same one
/// twice is harmless. Known nodes never move on a snapshot; only
/// [`GraphView::refresh_layout`] rearranges them.
#[derive(Debug, Clone)]
pub struct GraphView {
    state: ViewState,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    positions: HashMap<String, Point>,
    seen_edges: HashSet<String>,
    highlights: HighlightTracker,
    last_transaction: Option<Transaction>,
}

impl Default for GraphView {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphView {
    pub fn new() -> Self {
        Self {
            state: ViewState::Empty,
            nodes: Vec::new(),
            edges: Vec::new(),
            positions: HashMap::new(),
            seen_edges: HashSet::new(),
            highlights: HighlightTracker::default(),
            last_transaction: None,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    pub fn last_transaction(&self) -> Option<&Transaction> {
        self.last_transaction.as_ref()
    }

    pub fn positioned_nodes(&self) -> Vec<PositionedNode> {
        self.nodes
            .iter()
            .map(|node| PositionedNode {
                node: node.clone(),
                position: self.positions.get(&node.id).copied().unwrap_or_default(),
                radius: NODE_RADIUS,
            })
            .collect()
    }

    fn node_order(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    fn edge_pairs(&self) -> Vec<(String, String)> {
        self.edges.iter().map(|e| (e.source.clone(), e.target.clone())).collect()
    }

    /// Replace the local graph with a pushed snapshot.
    pub fn apply_snapshot(
        &mut self,
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
        new_transaction: Option<&Transaction>,
        now: Instant,
    ) -> SnapshotOutcome {
        let mut outcome = SnapshotOutcome::default();

        let edge_keys: HashSet<String> = edges.iter().map(GraphEdge::key).collect();
        if self.state != ViewState::Empty {
            for key in edge_keys.difference(&self.seen_edges) {
                self.highlights.mark_at(key.clone(), now, false);
                outcome.new_edges += 1;
            }
        }
        if let Some(tx) = new_transaction {
            self.highlights.mark_at(tx.edge_key(), now, true);
            self.last_transaction = Some(tx.clone());
        }
        self.seen_edges = edge_keys;

        self.nodes = nodes;
        self.edges = edges;

        match self.state {
            ViewState::Empty => {
                if !self.nodes.is_empty() {
                    self.layout_everything();
                    outcome.new_nodes = self.nodes.len();
                    outcome.laid_out = true;
                }
            }
            ViewState::LaidOut | ViewState::Updating => {
                let present: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
                self.positions.retain(|id, _| present.contains(id.as_str()));

                let fresh: Vec<String> = self
                    .nodes
                    .iter()
                    .filter(|n| !self.positions.contains_key(&n.id))
                    .map(|n| n.id.clone())
                    .collect();
                outcome.new_nodes = fresh.len();
                if !fresh.is_empty() {
                    if self.positions.is_empty() {
                        // Nothing left to anchor on, e.g. after a reseed with new ids.
                        self.layout_everything();
                    } else {
                        self.place_new_nodes(&fresh);
                    }
                    outcome.laid_out = true;
                }
            }
        }

        debug!(
            new_nodes = outcome.new_nodes,
            new_edges = outcome.new_edges,
            laid_out = outcome.laid_out,
            "Applied graph snapshot"
        );
        outcome
    }

    fn layout_everything(&mut self) {
        let order = self.node_order();
        let mut positions = circle_positions(&order);
        ForceLayout::full().run(&mut positions, &order, &self.edge_pairs(), |_| true);
        self.positions = positions;
        self.state = ViewState::LaidOut;
    }

    /// Seed each new node next to a known neighbour (or the centroid) and
    /// let an incremental layout settle only the new ones.
    fn place_new_nodes(&mut self, fresh: &[String]) {
        self.state = ViewState::Updating;

        let centroid = centroid(self.positions.values());
        for (i, id) in fresh.iter().enumerate() {
            let anchor = self
                .edges
                .iter()
                .filter_map(|e| {
                    if &e.source == id {
                        self.positions.get(&e.target)
                    } else if &e.target == id {
                        self.positions.get(&e.source)
                    } else {
                        None
                    }
                })
                .next()
                .copied()
                .unwrap_or(centroid);
            let angle = i as f64 * 2.399;
            let offset = NODE_RADIUS * 3.0;
            self.positions.insert(
                id.clone(),
                Point::new(anchor.x + offset * angle.cos(), anchor.y + offset * angle.sin()),
            );
        }

        let movable: HashSet<&str> = fresh.iter().map(String::as_str).collect();
        let order = self.node_order();
        let pairs = self.edge_pairs();
        ForceLayout::incremental().run(&mut self.positions, &order, &pairs, |id| movable.contains(id));

        self.state = ViewState::LaidOut;
    }

    /// Re-run a layout over every node, starting from the current positions.
    pub fn refresh_layout(&mut self) {
        if self.nodes.is_empty() {
            return;
        }
        let order = self.node_order();
        let pairs = self.edge_pairs();
        ForceLayout::refresh().run(&mut self.positions, &order, &pairs, |_| true);
    }

    pub fn has_active_highlights(&self) -> bool {
        self.highlights.has_entries()
    }

    pub fn edge_progress(&self, key: &str, now: Instant) -> Option<f64> {
        self.highlights.progress_at(key, now)
    }

    /// Age out expired highlights. Returns whether any remain.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.highlights.prune_at(now);
        if self.highlights.active_at(now).is_empty() {
            self.last_transaction = None;
        }
        self.highlights.has_entries()
    }

    /// Every edge with its current style.
    pub fn styled_edges(&self, now: Instant) -> Vec<(GraphEdge, EdgeStyle)> {
        self.edges
            .iter()
            .map(|edge| {
                let key = edge.key();
                let progress = self.highlights.progress_at(&key, now);
                let style = edge_style(edge.transaction_count, progress, self.highlights.is_emphasized(&key));
                (edge.clone(), style)
            })
            .collect()
    }
}

fn centroid<'a>(points: impl Iterator<Item = &'a Point>) -> Point {
    let (sum, count) = points.fold((Point::default(), 0usize), |(acc, n), p| {
        (Point::new(acc.x + p.x, acc.y + p.y), n + 1)
    });
    if count == 0 {
        return Point::default();
    }
    Point::new(sum.x / count as f64, sum.y / count as f64)
}
