//! Paths as edge sequences, and helpers for displaying them

use std::fmt::Write;

use super::graph::{EdgeId, Graph, Vertex, VertexIdx};
use super::relax::Direction;

/// Follow predecessor edges from `vertex` back to the search root.
///
/// Forward searches yield the path `root -> vertex`; reverse searches yield
/// `vertex -> root`. Both come back in travel order. Unreached vertices and
/// the root itself give an empty path.
pub fn trace_back(
    graph: &Graph,
    predecessors: &[Option<EdgeId>],
    root: VertexIdx,
    vertex: VertexIdx,
    direction: Direction,
) -> Vec<EdgeId> {
    let mut edges = Vec::new();
    let mut current = vertex;

    // A predecessor chain never repeats a vertex, so it is at most |V| long
    while current != root && edges.len() < predecessors.len() {
        let Some(edge_id) = predecessors[current] else {
            break;
        };
        edges.push(edge_id);
        current = direction.near_end(graph.edge(edge_id));
    }

    if direction == Direction::Forward {
        edges.reverse();
    }
    edges
}

/// Summed weight of a path, added up in travel order from `0.0`.
///
/// This is the order in which a forward search accumulates distances, so the
/// result is bit-identical to the distance of the search that found the path.
pub fn total_weight(graph: &Graph, path: &[EdgeId]) -> f64 {
    path.iter().fold(0.0, |sum, &e| sum + graph.edge(e).weight)
}

/// Vertex indices visited by a path, including both endpoints
pub fn vertex_indices(graph: &Graph, path: &[EdgeId]) -> Vec<VertexIdx> {
    let Some(&first) = path.first() else {
        return Vec::new();
    };
    let mut vertices = Vec::with_capacity(path.len() + 1);
    vertices.push(graph.edge(first).from);
    vertices.extend(path.iter().map(|&e| graph.edge(e).to));
    vertices
}

/// Vertices visited by a path, including both endpoints
pub fn path_to_vertex_sequence<'g>(graph: &'g Graph, path: &[EdgeId]) -> Vec<&'g Vertex> {
    vertex_indices(graph, path)
        .into_iter()
        .map(|idx| graph.vertex(idx))
        .collect()
}

/// Whether each edge starts where the previous one ends
pub fn is_contiguous(graph: &Graph, path: &[EdgeId]) -> bool {
    path.windows(2)
        .all(|pair| graph.edge(pair[0]).to == graph.edge(pair[1]).from)
}

/// Human-readable route, e.g. `A -1-> B -1-> C. (total weight: 2)`
pub fn describe_path(graph: &Graph, path: &[EdgeId]) -> String {
    let mut out = String::new();
    let Some(&last) = path.last() else {
        return "(empty path)".to_string();
    };
    for &e in path {
        let edge = graph.edge(e);
        let _ = write!(out, "{} -{}-> ", graph.vertex(edge.from).id, edge.weight);
    }
    let _ = write!(
        out,
        "{}. (total weight: {})",
        graph.vertex(graph.edge(last).to).id,
        total_weight(graph, path)
    );
    out
}
