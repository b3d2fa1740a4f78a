//! Unidirectional point-to-point query
//!
//! The forward search runs until its frontier is empty, even after the target
//! has been settled, so it shares the exact relaxation loop used by
//! preprocessing.

use log::debug;

use super::error::Result;
use super::graph::{Graph, VertexIdx};
use super::path::trace_back;
use super::query::{check_endpoints, QueryResult, QueryStats};
use super::relax::{step, Direction, Relaxation, SearchSpace};
use super::trace::SearchTracer;

/// Shortest path from `start` to `end` with a single forward search
pub fn unidirectional(
    graph: &Graph,
    start: VertexIdx,
    end: VertexIdx,
    use_arc_flags: bool,
    tracer: &mut dyn SearchTracer,
) -> Result<QueryResult> {
    check_endpoints(graph, start, end, use_arc_flags)?;

    let mut rule = Relaxation::new(Direction::Forward);
    if use_arc_flags {
        rule = rule.with_arc_flags(graph.region_of(end));
    }

    let mut space = SearchSpace::new(graph.vertex_count(), start);
    while !space.is_exhausted() {
        step(graph, &mut space, &rule, tracer);
    }

    let stats = QueryStats {
        forward: space.stats,
        ..QueryStats::default()
    };

    debug!(
        "Unidirectional {} -> {} (arc flags: {}): {} settled, {} pruned",
        graph.vertex(start).id,
        graph.vertex(end).id,
        use_arc_flags,
        stats.forward.settled,
        stats.forward.pruned
    );

    let Some(distance) = space.distance(end) else {
        return Ok(QueryResult::unreachable(stats));
    };

    Ok(QueryResult {
        distance,
        path: trace_back(graph, &space.predecessors, start, end, Direction::Forward),
        stats,
    })
}
