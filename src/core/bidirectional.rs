//! Bidirectional point-to-point query
//!
//! A forward search from `start` and a reverse search from `end` take turns,
//! one relaxation step each, until a vertex has been settled by both or one
//! frontier runs dry. The meeting vertex only yields a candidate length: the
//! shortest path can cross between the two searches along an edge whose
//! endpoints were settled by different sides. Every edge leaving a
//! forward-settled vertex toward a vertex with a known reverse distance is
//! therefore checked before the answer is returned.
//!
//! With arc flags, both sides filter on the region of `end`. Flags mark edges
//! on shortest paths *into* a region, and every edge of a shortest path to
//! `end` carries `region(end)`, whichever side relaxes it.

use log::debug;

use super::error::Result;
use super::graph::{EdgeId, Graph, VertexIdx};
use super::path::{total_weight, trace_back};
use super::query::{check_endpoints, QueryResult, QueryStats};
use super::relax::{step, Direction, Relaxation, SearchSpace};
use super::trace::SearchTracer;

/// Best path found so far, as its crossing point between the two searches
#[derive(Debug, Clone, Copy)]
enum Crossing {
    /// Through a vertex settled by both searches
    Vertex(VertexIdx),
    /// Along an edge from a forward-settled vertex into the reverse search
    Edge(EdgeId),
}

/// Shortest path from `start` to `end` with two interleaved searches
pub fn bidirectional(
    graph: &Graph,
    start: VertexIdx,
    end: VertexIdx,
    use_arc_flags: bool,
    tracer: &mut dyn SearchTracer,
) -> Result<QueryResult> {
    check_endpoints(graph, start, end, use_arc_flags)?;

    let mut forward_rule = Relaxation::new(Direction::Forward);
    let mut reverse_rule = Relaxation::new(Direction::Reverse);
    if use_arc_flags {
        let region = graph.region_of(end);
        forward_rule = forward_rule.with_arc_flags(region);
        reverse_rule = reverse_rule.with_arc_flags(region);
    }

    let n = graph.vertex_count();
    let mut forward = SearchSpace::new(n, start).with_visited();
    let mut reverse = SearchSpace::new(n, end).with_visited();

    let mut meeting = None;
    while !forward.is_exhausted() && !reverse.is_exhausted() {
        if let Some(u) = step(graph, &mut forward, &forward_rule, tracer) {
            if reverse.is_visited(u) {
                meeting = Some(u);
                break;
            }
        }
        if let Some(u) = step(graph, &mut reverse, &reverse_rule, tracer) {
            if forward.is_visited(u) {
                meeting = Some(u);
                break;
            }
        }
    }

    let mut stats = QueryStats {
        forward: forward.stats,
        reverse: Some(reverse.stats),
        meeting_vertex: meeting,
        improved_by_scan: false,
    };

    let Some(z) = meeting else {
        debug!(
            "Bidirectional {} -> {}: searches never met, no path",
            graph.vertex(start).id,
            graph.vertex(end).id
        );
        return Ok(QueryResult::unreachable(stats));
    };

    let (Some(to_z), Some(from_z)) = (forward.distance(z), reverse.distance(z)) else {
        // Both searches settled z, so both know its distance
        return Ok(QueryResult::unreachable(stats));
    };
    let mut best_length = to_z + from_z;
    let mut best = Crossing::Vertex(z);
    tracer.met(z, best_length);

    // The meeting vertex need not lie on the shortest path
    for &u in forward.visited() {
        let Some(dist_u) = forward.distance(u) else {
            continue;
        };
        for &edge_id in graph.outgoing(u) {
            let edge = graph.edge(edge_id);
            if let Some(region) = forward_rule.target_region {
                if !edge.flag(region) {
                    continue;
                }
            }
            let Some(dist_v) = reverse.distance(edge.to) else {
                continue;
            };
            let length = dist_u + edge.weight + dist_v;
            if length < best_length {
                best_length = length;
                best = Crossing::Edge(edge_id);
                tracer.candidate(edge_id, length);
            }
        }
    }

    let path = match best {
        Crossing::Vertex(z) => {
            let mut path = trace_back(graph, &forward.predecessors, start, z, Direction::Forward);
            path.extend(trace_back(graph, &reverse.predecessors, end, z, Direction::Reverse));
            path
        }
        Crossing::Edge(edge_id) => {
            stats.improved_by_scan = true;
            let edge = graph.edge(edge_id);
            let mut path =
                trace_back(graph, &forward.predecessors, start, edge.from, Direction::Forward);
            path.push(edge_id);
            path.extend(trace_back(graph, &reverse.predecessors, end, edge.to, Direction::Reverse));
            path
        }
    };
    // Summed from start to end, matching the forward accumulation order
    let distance = total_weight(graph, &path);

    debug!(
        "Bidirectional {} -> {} (arc flags: {}): met at {}, length {}, {} settled",
        graph.vertex(start).id,
        graph.vertex(end).id,
        use_arc_flags,
        graph.vertex(z).id,
        distance,
        stats.settled()
    );

    Ok(QueryResult {
        distance,
        path,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::arc_flags::preprocess;
    use crate::core::path::{is_contiguous, total_weight};
    use crate::core::trace::{NoTrace, RecordingTracer, TraceEvent};
    use crate::core::unidirectional::unidirectional;

    fn graph(regions: usize, vertices: &[(&str, usize)], edges: &[(usize, usize, f64)]) -> Graph {
        let mut g = Graph::new(regions).unwrap();
        for &(id, region) in vertices {
            g.add_vertex(id, region).unwrap();
        }
        for &(from, to, weight) in edges {
            g.add_edge(from, to, weight).unwrap();
        }
        g
    }

    #[test]
    fn test_chain_prefers_two_hops() {
        let g = graph(
            1,
            &[("A", 0), ("B", 0), ("C", 0)],
            &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 5.0)],
        );
        let result = bidirectional(&g, 0, 2, false, &mut NoTrace).unwrap();
        assert_eq!(result.distance, 2.0);
        assert_eq!(result.path, vec![EdgeId(0), EdgeId(1)]);
    }

    #[test]
    fn test_meeting_vertex_is_not_the_answer() {
        // The searches meet at a (s -> a -> t costs 6) while s -> b -> c -> t
        // costs 5 and is only found by the edge scan.
        let g = graph(
            1,
            &[("s", 0), ("a", 0), ("t", 0), ("b", 0), ("c", 0)],
            &[
                (0, 1, 3.0),
                (1, 2, 3.0),
                (0, 3, 1.0),
                (3, 4, 3.0),
                (4, 2, 1.0),
            ],
        );
        let mut tracer = RecordingTracer::new();
        let result = bidirectional(&g, 0, 2, false, &mut tracer).unwrap();

        assert_eq!(result.distance, 5.0);
        assert_eq!(result.path, vec![EdgeId(2), EdgeId(3), EdgeId(4)]);
        assert!(result.stats.improved_by_scan);
        assert!(tracer
            .events
            .iter()
            .any(|e| matches!(e, TraceEvent::Met { length, .. } if *length > 5.0)));
        assert!(tracer
            .events
            .contains(&TraceEvent::Candidate { edge: EdgeId(2), length: 5.0 }));
    }

    #[test]
    fn test_same_vertex() {
        let g = graph(1, &[("A", 0), ("B", 0)], &[(0, 1, 1.0), (1, 0, 1.0)]);
        let result = bidirectional(&g, 0, 0, false, &mut NoTrace).unwrap();
        assert_eq!(result.distance, 0.0);
        assert!(result.path.is_empty());
        assert_eq!(result.stats.meeting_vertex, Some(0));
    }

    #[test]
    fn test_disjoint_components() {
        let g = graph(
            1,
            &[("A", 0), ("B", 0), ("C", 0), ("D", 0)],
            &[(0, 1, 1.0), (2, 3, 1.0)],
        );
        let result = bidirectional(&g, 0, 3, false, &mut NoTrace).unwrap();
        assert!(result.distance.is_infinite());
        assert!(result.path.is_empty());
        assert_eq!(result.stats.meeting_vertex, None);
    }

    #[test]
    fn test_one_way_edge() {
        let g = graph(1, &[("A", 0), ("B", 0)], &[(0, 1, 4.0)]);
        assert_eq!(bidirectional(&g, 0, 1, false, &mut NoTrace).unwrap().distance, 4.0);
        assert!(bidirectional(&g, 1, 0, false, &mut NoTrace).unwrap().distance.is_infinite());
    }

    #[test]
    fn test_arc_flags_match_unidirectional() {
        let mut g = graph(
            3,
            &[("A", 0), ("B", 0), ("C", 1), ("D", 1), ("E", 2), ("F", 2)],
            &[
                (0, 1, 2.0),
                (1, 0, 2.0),
                (1, 2, 4.0),
                (0, 3, 9.0),
                (2, 3, 1.0),
                (3, 4, 2.0),
                (2, 5, 7.0),
                (4, 5, 1.0),
                (5, 0, 3.0),
                (4, 1, 6.0),
            ],
        );
        preprocess(&mut g);

        for start in 0..g.vertex_count() {
            for end in 0..g.vertex_count() {
                let reference = unidirectional(&g, start, end, false, &mut NoTrace).unwrap();
                for flags in [false, true] {
                    let result = bidirectional(&g, start, end, flags, &mut NoTrace).unwrap();
                    assert_eq!(result.distance, reference.distance, "{start} -> {end} flags={flags}");
                    assert!(is_contiguous(&g, &result.path));
                    if result.is_reachable() {
                        assert_eq!(total_weight(&g, &result.path), result.distance);
                    }
                }
            }
        }
    }

    #[test]
    fn test_fractional_weights_match_forward_sum() {
        // 0.1 + 0.2 + 0.3 rounds differently from 0.1 + (0.2 + 0.3)
        let g = graph(
            1,
            &[("A", 0), ("B", 0), ("C", 0), ("D", 0)],
            &[(0, 1, 0.1), (1, 2, 0.2), (2, 3, 0.3)],
        );
        let reference = unidirectional(&g, 0, 3, false, &mut NoTrace).unwrap();
        let result = bidirectional(&g, 0, 3, false, &mut NoTrace).unwrap();

        assert_eq!(result.path, vec![EdgeId(0), EdgeId(1), EdgeId(2)]);
        assert_eq!(result.distance, reference.distance);
        assert_eq!(result.distance, total_weight(&g, &result.path));
        assert_eq!(result.distance, 0.1 + 0.2 + 0.3);
    }
}
