//! Error types for butterfly-arcflags
//!
//! Unreachable targets are not errors: queries report them as an infinite
//! distance with an empty path. Everything here is a caller mistake or an
//! input problem.

use thiserror::Error;

/// Errors raised while building, loading or querying a graph
#[derive(Debug, Error)]
pub enum Error {
    /// Vertex id not present in the graph
    #[error("unknown vertex '{0}'")]
    UnknownVertex(String),

    /// Vertex index past the end of the vertex sequence
    #[error("vertex index {index} out of range (graph has {count} vertices)")]
    VertexOutOfRange { index: usize, count: usize },

    /// Two vertices share one id
    #[error("duplicate vertex id '{0}'")]
    DuplicateVertex(String),

    /// Region tag outside `[0, K)`
    #[error("region {region} out of range (graph has {regions} regions)")]
    RegionOutOfRange { region: usize, regions: usize },

    /// A graph needs at least one region
    #[error("graph must have at least one region")]
    NoRegions,

    /// Negative or non-finite weight in a graph description
    #[error("invalid weight {weight} on edge '{from}' -> '{to}'")]
    InvalidWeight { from: String, to: String, weight: f64 },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed graph description
    #[error("invalid graph description: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for butterfly-arcflags operations
pub type Result<T> = std::result::Result<T, Error>;
