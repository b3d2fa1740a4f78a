//! Single-source shortest-path trees

use log::debug;

use super::error::Result;
use super::graph::{EdgeId, Graph, VertexIdx};
use super::path::trace_back;
use super::relax::{step, Direction, Relaxation, SearchSpace, SearchStats};
use super::trace::{NoTrace, SearchTracer};

/// Complete result of a search run until its frontier is empty
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    pub root: VertexIdx,
    pub direction: Direction,
    pub distances: Vec<Option<f64>>,
    pub predecessors: Vec<Option<EdgeId>>,
    pub stats: SearchStats,
}

impl ShortestPathTree {
    /// Distance between the root and `vertex`, if connected
    #[inline]
    pub fn distance(&self, vertex: VertexIdx) -> Option<f64> {
        self.distances[vertex]
    }

    /// Tree path between the root and `vertex`, in travel order
    pub fn path_to(&self, graph: &Graph, vertex: VertexIdx) -> Vec<EdgeId> {
        trace_back(graph, &self.predecessors, self.root, vertex, self.direction)
    }

    /// Edges of the tree: the predecessor edge of every reached non-root vertex
    pub fn tree_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.predecessors.iter().filter_map(|p| *p)
    }

    /// Number of vertices connected to the root, root included
    pub fn reached(&self) -> usize {
        self.distances.iter().filter(|d| d.is_some()).count()
    }
}

/// Run the relaxation core from `root` until the frontier is empty
pub fn single_source(graph: &Graph, root: VertexIdx, direction: Direction) -> Result<ShortestPathTree> {
    single_source_with(graph, root, Relaxation::new(direction), &mut NoTrace)
}

/// Single-source search with an explicit relaxation rule and tracer
pub fn single_source_with(
    graph: &Graph,
    root: VertexIdx,
    rule: Relaxation,
    tracer: &mut dyn SearchTracer,
) -> Result<ShortestPathTree> {
    graph.check_vertex(root)?;

    let mut space = SearchSpace::new(graph.vertex_count(), root);
    while !space.is_exhausted() {
        step(graph, &mut space, &rule, tracer);
    }

    debug!(
        "{:?} search from {}: {} settled, {} edges scanned",
        rule.direction,
        graph.vertex(root).id,
        space.stats.settled,
        space.stats.scanned
    );

    Ok(ShortestPathTree {
        root,
        direction: rule.direction,
        distances: space.distances,
        predecessors: space.predecessors,
        stats: space.stats,
    })
}
