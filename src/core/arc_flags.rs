//! Arc-flag preprocessing
//!
//! For every vertex `r`, a reverse search rooted at `r` yields a shortest-path
//! tree of everything that can reach `r`. Each edge of that tree gets its flag
//! for `region(r)` set. Afterwards `edge.flags[g]` is true iff the edge lies on
//! some tree path ending in region `g`, so a query toward region `g` can skip
//! every edge whose flag is false without losing a shortest path.
//!
//! Flags are cached facts about the current edge set: rerun [`preprocess`]
//! after adding or reweighting edges.

use log::info;
use serde::Serialize;

use super::graph::{EdgeId, Graph, VertexIdx};
use super::relax::{step, Direction, Relaxation, SearchSpace};
use super::trace::NoTrace;

/// Outcome of a preprocessing run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArcFlagSummary {
    /// Reverse searches run, one per vertex
    pub roots: usize,
    pub edges: usize,
    /// Number of edges flagged for each region
    pub flagged_per_region: Vec<usize>,
    /// Edges without any flag set
    pub unflagged_edges: usize,
}

impl ArcFlagSummary {
    fn collect(graph: &Graph, roots: usize) -> Self {
        let mut flagged_per_region = vec![0; graph.regions()];
        let mut unflagged_edges = 0;
        for (_, edge) in graph.edges() {
            if edge.flags.count() == 0 {
                unflagged_edges += 1;
            }
            for (region, set) in edge.flags.iter().enumerate() {
                if set {
                    flagged_per_region[region] += 1;
                }
            }
        }
        Self {
            roots,
            edges: graph.edge_count(),
            flagged_per_region,
            unflagged_edges,
        }
    }
}

/// Compute arc flags for every edge of `graph`
pub fn preprocess(graph: &mut Graph) -> ArcFlagSummary {
    preprocess_with_progress(graph, |_, _| {})
}

/// Compute arc flags, reporting `(roots_done, roots_total)` after each root
pub fn preprocess_with_progress<F>(graph: &mut Graph, mut progress: F) -> ArcFlagSummary
where
    F: FnMut(usize, usize),
{
    let total = graph.vertex_count();
    info!(
        "Computing arc flags: {} vertices, {} edges, {} regions",
        total,
        graph.edge_count(),
        graph.regions()
    );

    graph.clear_flags();

    let mut tree_edges: Vec<EdgeId> = Vec::new();
    for root in 0..total {
        let region = graph.region_of(root);
        stamp_tree(graph, root, &mut tree_edges);
        for &edge_id in &tree_edges {
            graph.edge_mut(edge_id).flags.set(region);
        }
        progress(root + 1, total);
    }

    graph.mark_preprocessed();
    let summary = ArcFlagSummary::collect(graph, total);
    info!(
        "Arc flags ready: {:?} edges flagged per region, {} edges never on a shortest path",
        summary.flagged_per_region, summary.unflagged_edges
    );
    summary
}

/// Collect the edges of the reverse shortest-path tree rooted at `root`.
///
/// Every reached vertex other than `root` contributes its predecessor edge;
/// the union of the tree paths from all reached vertices to `root` is exactly
/// this edge set.
fn stamp_tree(graph: &Graph, root: VertexIdx, out: &mut Vec<EdgeId>) {
    let rule = Relaxation::new(Direction::Reverse);
    let mut space = SearchSpace::new(graph.vertex_count(), root);
    while !space.is_exhausted() {
        step(graph, &mut space, &rule, &mut NoTrace);
    }
    out.clear();
    out.extend(space.predecessors.iter().flatten().copied());
}

/// One row of the flag table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagRow {
    pub edge: EdgeId,
    pub from: String,
    pub to: String,
    pub flags: Vec<bool>,
}

/// Flags of every edge, in edge order
pub fn flag_table(graph: &Graph) -> Vec<FlagRow> {
    graph
        .edges()
        .map(|(id, edge)| FlagRow {
            edge: id,
            from: graph.vertex(edge.from).id.clone(),
            to: graph.vertex(edge.to).id.clone(),
            flags: edge.flags.iter().collect(),
        })
        .collect()
}
