//! Core library modules for butterfly-arcflags
//!
//! Graph store, relaxation core, arc-flag preprocessing and the two
//! point-to-point queries built on them.

pub mod arc_flags;
pub mod bidirectional;
pub mod error;
pub mod frontier;
pub mod graph;
pub mod path;
pub mod query;
pub mod relax;
pub mod search;
pub mod trace;
pub mod unidirectional;

// Re-export main types for internal use
pub use arc_flags::{flag_table, preprocess, preprocess_with_progress, ArcFlagSummary, FlagRow};
pub use bidirectional::bidirectional;
pub use error::{Error, Result};
pub use frontier::Frontier;
pub use graph::{Edge, EdgeId, Graph, RegionFlags, Vertex, VertexIdx};
pub use query::{query, Algorithm, QueryOptions, QueryResult, QueryStats};
pub use relax::{step, Direction, Relaxation, SearchSpace, SearchStats};
pub use search::{single_source, single_source_with, ShortestPathTree};
pub use trace::{LogTracer, NoTrace, RecordingTracer, SearchTracer, TraceEvent};
pub use unidirectional::unidirectional;
