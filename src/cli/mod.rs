//! CLI-specific code for butterfly-arcflags
//!
//! Argument definitions and the command handlers, kept apart from the core
//! library functionality.

pub mod progress;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use butterfly_arcflags::core::trace::TraceEvent;
use butterfly_arcflags::core::FlagRow;
use butterfly_arcflags::graph_file::load_graph;
use butterfly_arcflags::{
    describe_path, is_contiguous, path_to_vertex_sequence, preprocess, preprocess_with_progress,
    query, single_source, total_weight, Algorithm, ArcFlagSummary, Direction, Graph, LogTracer,
    QueryOptions, QueryResult, QueryStats, RecordingTracer, VertexIdx,
};
use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};
use serde::Serialize;

pub use progress::ProgressManager;

/// Command-line interface for butterfly-arcflags
#[derive(Parser)]
#[command(name = "butterfly-arcflags")]
#[command(about = "Shortest paths on region-partitioned graphs with arc flags")]
#[command(long_about = "Shortest-path queries over a JSON graph description:
  butterfly-arcflags route cities.json --from Seattle --to Boston
  butterfly-arcflags route cities.json --from Seattle --to Boston --algorithm bidirectional --arc-flags
  butterfly-arcflags flags cities.json          # Compute and print arc flags
  butterfly-arcflags tree cities.json --root Chicago --reverse
  butterfly-arcflags check cities.json          # Cross-check every query variant")]
#[command(version = env!("BUTTERFLY_VERSION"))]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find the shortest path between two vertices
    Route {
        /// Graph description (JSON)
        graph: PathBuf,
        /// Start vertex id
        #[arg(long)]
        from: String,
        /// Target vertex id
        #[arg(long)]
        to: String,
        /// Search strategy
        #[arg(long, value_enum, default_value_t = AlgorithmArg::Unidirectional)]
        algorithm: AlgorithmArg,
        /// Preprocess the graph and prune edges with arc flags
        #[arg(long)]
        arc_flags: bool,
        /// Print every search event to stderr
        #[arg(long)]
        trace: bool,
        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },
    /// Compute arc flags and print the flag table
    Flags {
        /// Graph description (JSON)
        graph: PathBuf,
        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print single-source distances from (or, with --reverse, to) a vertex
    Tree {
        /// Graph description (JSON)
        graph: PathBuf,
        /// Root vertex id
        #[arg(long)]
        root: String,
        /// Follow edges backwards: distances to the root
        #[arg(long)]
        reverse: bool,
    },
    /// Run every query variant on every vertex pair and compare the answers
    Check {
        /// Graph description (JSON)
        graph: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlgorithmArg {
    Unidirectional,
    Bidirectional,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Unidirectional => Algorithm::Unidirectional,
            AlgorithmArg::Bidirectional => Algorithm::Bidirectional,
        }
    }
}

/// Dispatch a parsed command line
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Route {
            graph,
            from,
            to,
            algorithm,
            arc_flags,
            trace,
            json,
        } => {
            let options = QueryOptions {
                algorithm: algorithm.into(),
                use_arc_flags: arc_flags,
            };
            route(&graph, &from, &to, options, trace, json)
        }
        Commands::Flags { graph, json } => flags(&graph, json),
        Commands::Tree {
            graph,
            root,
            reverse,
        } => tree(&graph, &root, reverse),
        Commands::Check { graph } => check(&graph),
    }
}

fn load(path: &Path) -> Result<Graph> {
    let graph = load_graph(path)
        .with_context(|| format!("Failed to load graph from {}", path.display()))?;
    info!(
        "Loaded {}: {} vertices, {} edges, {} regions",
        path.display(),
        graph.vertex_count(),
        graph.edge_count(),
        graph.regions()
    );
    Ok(graph)
}

/// JSON report for `route`
#[derive(Debug, Serialize)]
pub struct RouteReport {
    pub from: String,
    pub to: String,
    pub options: QueryOptions,
    pub reachable: bool,
    /// `None` when unreachable
    pub distance: Option<f64>,
    pub vertices: Vec<String>,
    pub meeting_vertex: Option<String>,
    pub stats: QueryStats,
}

impl RouteReport {
    pub fn new(graph: &Graph, from: &str, to: &str, options: QueryOptions, result: &QueryResult) -> Self {
        let mut vertices: Vec<String> = path_to_vertex_sequence(graph, &result.path)
            .into_iter()
            .map(|v| v.id.clone())
            .collect();
        if result.is_reachable() && vertices.is_empty() {
            vertices.push(from.to_string());
        }
        Self {
            from: from.to_string(),
            to: to.to_string(),
            options,
            reachable: result.is_reachable(),
            distance: result.is_reachable().then_some(result.distance),
            vertices,
            meeting_vertex: result
                .stats
                .meeting_vertex
                .map(|v| graph.vertex(v).id.clone()),
            stats: result.stats.clone(),
        }
    }
}

fn route(path: &Path, from: &str, to: &str, options: QueryOptions, trace: bool, json: bool) -> Result<()> {
    let mut graph = load(path)?;
    if options.use_arc_flags {
        preprocess(&mut graph);
    }
    let start = graph.index_of(from)?;
    let end = graph.index_of(to)?;

    let result = if trace {
        let mut tracer = RecordingTracer::new();
        let result = query(&graph, start, end, &options, &mut tracer)?;
        for event in &tracer.events {
            eprintln!("{}", format_event(&graph, event));
        }
        for direction in [Direction::Forward, Direction::Reverse] {
            if let Some(line) = settle_order(&graph, &tracer, direction) {
                eprintln!("{line}");
            }
        }
        result
    } else {
        query(&graph, start, end, &options, &mut LogTracer)?
    };

    if json {
        let report = RouteReport::new(&graph, from, to, options, &result);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let algorithm = match options.algorithm {
        Algorithm::Unidirectional => "unidirectional",
        Algorithm::Bidirectional => "bidirectional",
    };
    let flags = if options.use_arc_flags { ", arc flags" } else { "" };
    println!("🦋 Route {from} -> {to} ({algorithm}{flags})");
    if !result.is_reachable() {
        println!("No path from {from} to {to}");
    } else {
        println!("{}", describe_path(&graph, &result.path));
        println!("Distance: {}", result.distance);
    }
    let stats = &result.stats;
    match stats.reverse {
        Some(reverse) => println!(
            "Settled: {} (forward {}, reverse {}), pruned: {}",
            stats.settled(),
            stats.forward.settled,
            reverse.settled,
            stats.forward.pruned + reverse.pruned
        ),
        None => println!(
            "Settled: {}, pruned: {}",
            stats.forward.settled, stats.forward.pruned
        ),
    }
    Ok(())
}

/// One line per search event, naming vertices by id
pub fn format_event(graph: &Graph, event: &TraceEvent) -> String {
    let name = |v: VertexIdx| graph.vertex(v).id.as_str();
    let side = |d: Direction| match d {
        Direction::Forward => "forward",
        Direction::Reverse => "reverse",
    };
    match *event {
        TraceEvent::Settled {
            direction,
            vertex,
            distance,
        } => format!("[{}] settle {} at {}", side(direction), name(vertex), distance),
        TraceEvent::Improved {
            direction,
            edge,
            vertex,
            old,
            new,
        } => {
            let e = graph.edge(edge);
            let old = old.map_or_else(|| "∞".to_string(), |d| d.to_string());
            format!(
                "[{}] improve {} via {} -> {}: {} -> {}",
                side(direction),
                name(vertex),
                name(e.from),
                name(e.to),
                old,
                new
            )
        }
        TraceEvent::Pruned {
            direction,
            edge,
            region,
        } => {
            let e = graph.edge(edge);
            format!(
                "[{}] prune {} -> {} (no flag for region {})",
                side(direction),
                name(e.from),
                name(e.to),
                region
            )
        }
        TraceEvent::Met { vertex, length } => {
            format!("meet at {}, candidate length {}", name(vertex), length)
        }
        TraceEvent::Candidate { edge, length } => {
            let e = graph.edge(edge);
            format!("scan improves via {} -> {}: length {}", name(e.from), name(e.to), length)
        }
    }
}

/// Settle order of one search side, `None` if it settled nothing
pub fn settle_order(graph: &Graph, tracer: &RecordingTracer, direction: Direction) -> Option<String> {
    let order = tracer.settled_in(direction);
    if order.is_empty() {
        return None;
    }
    let ids: Vec<&str> = order.iter().map(|&v| graph.vertex(v).id.as_str()).collect();
    let side = match direction {
        Direction::Forward => "forward",
        Direction::Reverse => "reverse",
    };
    Some(format!("{side} settle order: {}", ids.join(", ")))
}

#[derive(Debug, Serialize)]
struct FlagsReport {
    summary: ArcFlagSummary,
    edges: Vec<FlagRow>,
}

fn flags(path: &Path, json: bool) -> Result<()> {
    let mut graph = load(path)?;
    let manager = ProgressManager::new(
        graph.vertex_count() as u64,
        &format!("🚩 Computing arc flags for {} vertices", graph.vertex_count()),
    );
    let summary = preprocess_with_progress(&mut graph, manager.callback());
    let edges = butterfly_arcflags::flag_table(&graph);

    if json {
        let report = FlagsReport { summary, edges };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for row in &edges {
        println!("{:>6}  {} -> {}  {}", row.edge.to_string(), row.from, row.to, flag_bits(&row.flags));
    }
    println!(
        "{} edges, flagged per region: {:?}, never on a shortest path: {}",
        summary.edges, summary.flagged_per_region, summary.unflagged_edges
    );
    Ok(())
}

/// Flags as a bit string, region 0 first
pub fn flag_bits(flags: &[bool]) -> String {
    flags.iter().map(|&set| if set { '1' } else { '0' }).collect()
}

fn tree(path: &Path, root: &str, reverse: bool) -> Result<()> {
    let graph = load(path)?;
    let root_idx = graph.index_of(root)?;
    let direction = if reverse {
        Direction::Reverse
    } else {
        Direction::Forward
    };
    let tree = single_source(&graph, root_idx, direction)?;

    let heading = if reverse { "to" } else { "from" };
    println!(
        "🌳 Distances {heading} {root}: {} of {} vertices reached",
        tree.reached(),
        graph.vertex_count()
    );
    for (idx, vertex) in graph.vertices().iter().enumerate() {
        match tree.distance(idx) {
            Some(d) if idx == root_idx => println!("{:<16} {d}", vertex.id),
            Some(d) => println!("{:<16} {d}  {}", vertex.id, describe_path(&graph, &tree.path_to(&graph, idx))),
            None => println!("{:<16} unreachable", vertex.id),
        }
    }
    Ok(())
}

/// Query variants compared by `check`
const VARIANTS: [(Algorithm, bool); 4] = [
    (Algorithm::Unidirectional, false),
    (Algorithm::Unidirectional, true),
    (Algorithm::Bidirectional, false),
    (Algorithm::Bidirectional, true),
];

/// Everything wrong with `result` as an answer for `start -> end`
pub fn inconsistencies(
    graph: &Graph,
    start: VertexIdx,
    end: VertexIdx,
    reference: f64,
    result: &QueryResult,
) -> Vec<String> {
    let mut problems = Vec::new();
    if result.distance != reference {
        problems.push(format!("distance {} differs from {}", result.distance, reference));
    }
    if !result.is_reachable() {
        if !result.path.is_empty() {
            problems.push("unreachable target with a non-empty path".to_string());
        }
        return problems;
    }
    if !is_contiguous(graph, &result.path) {
        problems.push("path is not contiguous".to_string());
    }
    match (result.path.first(), result.path.last()) {
        (Some(&first), Some(&last)) => {
            if graph.edge(first).from != start || graph.edge(last).to != end {
                problems.push("path does not join start and end".to_string());
            }
        }
        _ if start != end => problems.push("reachable target with an empty path".to_string()),
        _ => {}
    }
    let weight = total_weight(graph, &result.path);
    if weight != result.distance {
        problems.push(format!("path weight {weight} differs from distance {}", result.distance));
    }
    problems
}

fn check(path: &Path) -> Result<()> {
    let mut graph = load(path)?;
    preprocess(&mut graph);

    let n = graph.vertex_count();
    let mut mismatches = 0usize;
    for start in 0..n {
        for end in 0..n {
            let reference = query(&graph, start, end, &QueryOptions::default(), &mut LogTracer)?.distance;
            for (algorithm, use_arc_flags) in VARIANTS {
                let options = QueryOptions {
                    algorithm,
                    use_arc_flags,
                };
                let result = query(&graph, start, end, &options, &mut LogTracer)?;
                for problem in inconsistencies(&graph, start, end, reference, &result) {
                    mismatches += 1;
                    error!(
                        "{} -> {} ({:?}, arc flags: {}): {}",
                        graph.vertex(start).id,
                        graph.vertex(end).id,
                        algorithm,
                        use_arc_flags,
                        problem
                    );
                }
            }
        }
    }

    if mismatches > 0 {
        bail!("{mismatches} inconsistent answers across {} vertex pairs", n * n);
    }
    println!(
        "✅ {} vertex pairs, {} query variants each: all answers agree",
        n * n,
        VARIANTS.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use butterfly_arcflags::{EdgeId, Vertex};

    fn chain() -> Graph {
        let vertices = vec![Vertex::new("A", 0), Vertex::new("B", 0), Vertex::new("C", 1)];
        butterfly_arcflags::build(2, vertices, [(0, 1, 1.0), (1, 2, 1.0), (0, 2, 5.0)]).unwrap()
    }

    #[test]
    fn test_cli_parses_route() {
        let cli = Cli::try_parse_from([
            "butterfly-arcflags",
            "route",
            "g.json",
            "--from",
            "A",
            "--to",
            "C",
            "--algorithm",
            "bidirectional",
            "--arc-flags",
        ])
        .unwrap();
        match cli.command {
            Commands::Route {
                algorithm,
                arc_flags,
                trace,
                ..
            } => {
                assert_eq!(algorithm, AlgorithmArg::Bidirectional);
                assert!(arc_flags);
                assert!(!trace);
            }
            _ => panic!("Expected route command"),
        }
    }

    #[test]
    fn test_cli_requires_endpoints() {
        assert!(Cli::try_parse_from(["butterfly-arcflags", "route", "g.json", "--from", "A"]).is_err());
    }

    #[test]
    fn test_flag_bits() {
        assert_eq!(flag_bits(&[true, false, true]), "101");
        assert_eq!(flag_bits(&[]), "");
    }

    #[test]
    fn test_format_event() {
        let g = chain();
        let event = TraceEvent::Improved {
            direction: Direction::Forward,
            edge: EdgeId(0),
            vertex: 1,
            old: None,
            new: 1.0,
        };
        assert_eq!(format_event(&g, &event), "[forward] improve B via A -> B: ∞ -> 1");
        let event = TraceEvent::Pruned {
            direction: Direction::Reverse,
            edge: EdgeId(2),
            region: 1,
        };
        assert_eq!(format_event(&g, &event), "[reverse] prune A -> C (no flag for region 1)");
    }

    #[test]
    fn test_inconsistencies() {
        let g = chain();
        let good = query(&g, 0, 2, &QueryOptions::default(), &mut LogTracer).unwrap();
        assert!(inconsistencies(&g, 0, 2, 2.0, &good).is_empty());

        let wrong = QueryResult {
            distance: 5.0,
            path: vec![EdgeId(2)],
            stats: QueryStats::default(),
        };
        let problems = inconsistencies(&g, 0, 2, 2.0, &wrong);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].starts_with("distance 5"));

        let broken = QueryResult {
            distance: 2.0,
            path: vec![EdgeId(1), EdgeId(0)],
            stats: QueryStats::default(),
        };
        assert_eq!(inconsistencies(&g, 0, 2, 2.0, &broken).len(), 2);
    }

    #[test]
    fn test_route_report_single_vertex() {
        let g = chain();
        let result = query(&g, 1, 1, &QueryOptions::default(), &mut LogTracer).unwrap();
        let report = RouteReport::new(&g, "B", "B", QueryOptions::default(), &result);
        assert_eq!(report.distance, Some(0.0));
        assert_eq!(report.vertices, vec!["B".to_string()]);
    }

    #[test]
    fn test_settle_order() {
        let g = chain();
        let mut tracer = RecordingTracer::new();
        query(&g, 0, 2, &QueryOptions::bidirectional(), &mut tracer).unwrap();
        assert_eq!(
            settle_order(&g, &tracer, Direction::Forward).unwrap(),
            "forward settle order: A, B"
        );
        assert_eq!(
            settle_order(&g, &tracer, Direction::Reverse).unwrap(),
            "reverse settle order: C, B"
        );

        let mut tracer = RecordingTracer::new();
        query(&g, 0, 2, &QueryOptions::unidirectional(), &mut tracer).unwrap();
        assert!(settle_order(&g, &tracer, Direction::Reverse).is_none());
    }

    #[test]
    fn test_inconsistencies_compare_exactly() {
        let g = chain();
        let good = query(&g, 0, 2, &QueryOptions::default(), &mut LogTracer).unwrap();
        let off_by_one_ulp = f64::from_bits(good.distance.to_bits() + 1);
        assert_eq!(inconsistencies(&g, 0, 2, off_by_one_ulp, &good).len(), 1);
    }
}
