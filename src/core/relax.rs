//! Dijkstra relaxation step shared by every search
//!
//! One call pops one frontier entry and relaxes the edges incident to it.
//! Searches differ only in the [`Relaxation`] rule they pass: traversal
//! direction and an optional arc-flag region filter.

use serde::{Deserialize, Serialize};

use super::frontier::Frontier;
use super::graph::{Edge, EdgeId, Graph, VertexIdx};
use super::trace::SearchTracer;

/// Traversal direction of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Follow outgoing edges from the root
    Forward,
    /// Follow incoming edges toward the root
    Reverse,
}

impl Direction {
    /// Edges a search in this direction expands from `vertex`
    #[inline]
    pub fn incident(self, graph: &Graph, vertex: VertexIdx) -> &[EdgeId] {
        match self {
            Direction::Forward => graph.outgoing(vertex),
            Direction::Reverse => graph.incoming(vertex),
        }
    }

    /// Endpoint of `edge` the search reaches by relaxing it
    #[inline]
    pub fn far_end(self, edge: &Edge) -> VertexIdx {
        match self {
            Direction::Forward => edge.to,
            Direction::Reverse => edge.from,
        }
    }

    /// Endpoint of `edge` the search relaxes it from
    #[inline]
    pub fn near_end(self, edge: &Edge) -> VertexIdx {
        match self {
            Direction::Forward => edge.from,
            Direction::Reverse => edge.to,
        }
    }
}

/// How a search relaxes edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relaxation {
    pub direction: Direction,
    /// Skip edges whose flag for this region is false
    pub target_region: Option<usize>,
}

impl Relaxation {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            target_region: None,
        }
    }

    /// Restrict relaxation to edges flagged for `region`
    pub fn with_arc_flags(mut self, region: usize) -> Self {
        self.target_region = Some(region);
        self
    }
}

/// Work counters for one search
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Frontier entries expanded
    pub settled: usize,
    /// Frontier entries discarded as outdated
    pub stale: usize,
    /// Edges examined
    pub scanned: usize,
    /// Edges skipped by the arc-flag filter
    pub pruned: usize,
    /// Successful relaxations
    pub improved: usize,
}

/// Per-search state: distances, predecessors, frontier and optional visited set
#[derive(Debug, Clone)]
pub struct SearchSpace {
    pub root: VertexIdx,
    pub distances: Vec<Option<f64>>,
    pub predecessors: Vec<Option<EdgeId>>,
    pub frontier: Frontier,
    visited: Option<Vec<bool>>,
    settled_order: Vec<VertexIdx>,
    pub stats: SearchStats,
}

impl SearchSpace {
    /// Fresh search over `vertex_count` vertices rooted at `root` (distance 0)
    pub fn new(vertex_count: usize, root: VertexIdx) -> Self {
        let mut distances = vec![None; vertex_count];
        distances[root] = Some(0.0);
        let mut frontier = Frontier::with_capacity(vertex_count);
        frontier.push(root, 0.0);
        Self {
            root,
            distances,
            predecessors: vec![None; vertex_count],
            frontier,
            visited: None,
            settled_order: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    /// Record settled vertices in a visited set
    pub fn with_visited(mut self) -> Self {
        self.visited = Some(vec![false; self.distances.len()]);
        self
    }

    #[inline]
    pub fn distance(&self, vertex: VertexIdx) -> Option<f64> {
        self.distances[vertex]
    }

    /// Whether `vertex` is in the visited set (always false without one)
    #[inline]
    pub fn is_visited(&self, vertex: VertexIdx) -> bool {
        self.visited.as_ref().is_some_and(|v| v[vertex])
    }

    /// Visited vertices in settle order
    pub fn visited(&self) -> &[VertexIdx] {
        &self.settled_order
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.frontier.is_empty()
    }
}

/// Pop one frontier entry and relax its incident edges.
///
/// Returns the settled vertex, or `None` when the frontier was empty or the
/// popped entry was outdated. An empty frontier is a no-op.
pub fn step(
    graph: &Graph,
    space: &mut SearchSpace,
    rule: &Relaxation,
    tracer: &mut dyn SearchTracer,
) -> Option<VertexIdx> {
    let entry = space.frontier.pop()?;
    let u = entry.vertex;

    // A better entry for u was already expanded
    let dist_u = match space.distances[u] {
        Some(d) if entry.distance <= d => d,
        _ => {
            space.stats.stale += 1;
            return None;
        }
    };

    space.stats.settled += 1;
    tracer.settled(rule.direction, u, dist_u);

    for &edge_id in rule.direction.incident(graph, u) {
        let edge = graph.edge(edge_id);
        space.stats.scanned += 1;

        if let Some(region) = rule.target_region {
            if !edge.flag(region) {
                space.stats.pruned += 1;
                tracer.pruned(rule.direction, edge_id, region);
                continue;
            }
        }

        let v = rule.direction.far_end(edge);
        let candidate = dist_u + edge.weight;
        let old = space.distances[v];
        if old.map_or(true, |d| candidate < d) {
            space.distances[v] = Some(candidate);
            space.predecessors[v] = Some(edge_id);
            space.frontier.push(v, candidate);
            space.stats.improved += 1;
            tracer.improved(rule.direction, edge_id, v, old, candidate);
        }
    }

    if let Some(visited) = space.visited.as_mut() {
        if !visited[u] {
            visited[u] = true;
            space.settled_order.push(u);
        }
    }

    Some(u)
}
