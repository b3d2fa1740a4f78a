//! Point-to-point query options, results and dispatch

use log::warn;
use serde::{Deserialize, Serialize};

use super::bidirectional::bidirectional;
use super::error::Result;
use super::graph::{EdgeId, Graph, VertexIdx};
use super::relax::SearchStats;
use super::trace::SearchTracer;
use super::unidirectional::unidirectional;

/// Which search drives a point-to-point query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Forward search from the start, run to exhaustion
    #[default]
    Unidirectional,
    /// Interleaved forward and reverse searches
    Bidirectional,
}

/// Options for point-to-point queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    pub algorithm: Algorithm,
    /// Skip edges not flagged for the target's region.
    ///
    /// The graph must have been preprocessed after its last edge insertion;
    /// otherwise no edge is flagged and every target looks unreachable.
    pub use_arc_flags: bool,
}

impl QueryOptions {
    pub fn unidirectional() -> Self {
        Self {
            algorithm: Algorithm::Unidirectional,
            use_arc_flags: false,
        }
    }

    pub fn bidirectional() -> Self {
        Self {
            algorithm: Algorithm::Bidirectional,
            use_arc_flags: false,
        }
    }

    pub fn with_arc_flags(mut self, enabled: bool) -> Self {
        self.use_arc_flags = enabled;
        self
    }
}

/// Work done by a query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryStats {
    pub forward: SearchStats,
    /// Reverse search counters (bidirectional only)
    pub reverse: Option<SearchStats>,
    /// First vertex settled by both searches (bidirectional only)
    pub meeting_vertex: Option<VertexIdx>,
    /// The edge scan found a path shorter than the one through the meeting vertex
    pub improved_by_scan: bool,
}

impl QueryStats {
    /// Vertices settled across both searches
    pub fn settled(&self) -> usize {
        self.forward.settled + self.reverse.map_or(0, |r| r.settled)
    }
}

/// Distance and route between two vertices
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// `f64::INFINITY` when the target is unreachable
    pub distance: f64,
    /// Edges from start to end; empty when unreachable or `start == end`
    pub path: Vec<EdgeId>,
    pub stats: QueryStats,
}

impl QueryResult {
    pub(crate) fn unreachable(stats: QueryStats) -> Self {
        Self {
            distance: f64::INFINITY,
            path: Vec::new(),
            stats,
        }
    }

    #[inline]
    pub fn is_reachable(&self) -> bool {
        self.distance.is_finite()
    }
}

/// Run a point-to-point query with the configured algorithm
pub fn query(
    graph: &Graph,
    start: VertexIdx,
    end: VertexIdx,
    options: &QueryOptions,
    tracer: &mut dyn SearchTracer,
) -> Result<QueryResult> {
    match options.algorithm {
        Algorithm::Unidirectional => unidirectional(graph, start, end, options.use_arc_flags, tracer),
        Algorithm::Bidirectional => bidirectional(graph, start, end, options.use_arc_flags, tracer),
    }
}

/// Validate query endpoints and warn about stale flags
pub(crate) fn check_endpoints(
    graph: &Graph,
    start: VertexIdx,
    end: VertexIdx,
    use_arc_flags: bool,
) -> Result<()> {
    graph.check_vertex(start)?;
    graph.check_vertex(end)?;
    if use_arc_flags && !graph.is_preprocessed() {
        warn!("Arc-flag query on a graph without current flags; results will miss paths");
    }
    Ok(())
}
