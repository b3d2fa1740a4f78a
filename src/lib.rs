//! # Butterfly-arcflags Library
//!
//! Shortest paths on directed, positively weighted graphs whose vertices are
//! partitioned into regions, accelerated by arc flags.
//!
//! ## Features
//!
//! - **Dijkstra relaxation core**: one step routine shared by every search,
//!   parameterized by direction and an optional arc-flag filter
//! - **Arc-flag preprocessing**: per-region edge flags from reverse
//!   shortest-path trees rooted at every vertex
//! - **Unidirectional and bidirectional queries**: both optionally pruned by
//!   the flags of the target's region
//! - **Tracing hooks**: step-by-step search events through an injected
//!   [`SearchTracer`]
//!
//! ## Basic Usage
//!
//! ```rust
//! use butterfly_arcflags::{Graph, Vertex};
//!
//! # fn main() -> butterfly_arcflags::Result<()> {
//! let vertices = vec![Vertex::new("A", 0), Vertex::new("B", 0), Vertex::new("C", 1)];
//! let mut graph = butterfly_arcflags::build(2, vertices, [(0, 1, 1.0), (1, 2, 1.0), (0, 2, 5.0)])?;
//! butterfly_arcflags::preprocess(&mut graph);
//!
//! let result = butterfly_arcflags::query_bidirectional(&graph, "A", "C", true)?;
//! assert_eq!(result.distance, 2.0);
//!
//! let ids: Vec<_> = butterfly_arcflags::path_to_vertex_sequence(&graph, &result.path)
//!     .iter()
//!     .map(|v| v.id.as_str())
//!     .collect();
//! assert_eq!(ids, ["A", "B", "C"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Preconditions
//!
//! - Edge weights must be non-negative. The core does not check this.
//! - Arc-flag queries require [`preprocess`] to have run after the last edge
//!   was added. On a graph without flags every filtered edge is skipped and
//!   targets look unreachable.
//! - An unreachable target is not an error: the result has an infinite
//!   distance and an empty path.

pub mod core;
pub mod graph_file;

pub use crate::core::path::{describe_path, is_contiguous, path_to_vertex_sequence, total_weight};
pub use crate::core::{
    flag_table, preprocess_with_progress, query, single_source, Algorithm, ArcFlagSummary,
    Direction, Edge, EdgeId, Error, Graph, LogTracer, NoTrace, QueryOptions, QueryResult,
    QueryStats, RecordingTracer, Result, SearchStats, SearchTracer, ShortestPathTree, Vertex,
    VertexIdx,
};

/// Build a graph from vertices and `(from, to, weight)` index triples
///
/// # Examples
/// ```rust
/// # fn main() -> butterfly_arcflags::Result<()> {
/// use butterfly_arcflags::Vertex;
///
/// let graph = butterfly_arcflags::build(1, vec![Vertex::new("A", 0), Vertex::new("B", 0)], [(0, 1, 2.0)])?;
/// assert_eq!(graph.edge_count(), 1);
/// # Ok(())
/// # }
/// ```
pub fn build<I>(regions: usize, vertices: Vec<Vertex>, edges: I) -> Result<Graph>
where
    I: IntoIterator<Item = (VertexIdx, VertexIdx, f64)>,
{
    Graph::build(regions, vertices, edges)
}

/// Compute arc flags for every edge of `graph`, in place
pub fn preprocess(graph: &mut Graph) -> ArcFlagSummary {
    crate::core::preprocess(graph)
}

/// Unidirectional query between two vertex ids
pub fn query_unidirectional(graph: &Graph, start: &str, end: &str, use_flags: bool) -> Result<QueryResult> {
    query_by_ids(graph, start, end, QueryOptions::unidirectional().with_arc_flags(use_flags))
}

/// Bidirectional query between two vertex ids
pub fn query_bidirectional(graph: &Graph, start: &str, end: &str, use_flags: bool) -> Result<QueryResult> {
    query_by_ids(graph, start, end, QueryOptions::bidirectional().with_arc_flags(use_flags))
}

fn query_by_ids(graph: &Graph, start: &str, end: &str, options: QueryOptions) -> Result<QueryResult> {
    let start = graph.index_of(start)?;
    let end = graph.index_of(end)?;
    query(graph, start, end, &options, &mut NoTrace)
}
