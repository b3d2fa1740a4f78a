//! JSON graph descriptions
//!
//! ```json
//! {
//!   "regions": 2,
//!   "vertices": [{"id": "A", "region": 0}, {"id": "B", "region": 1}],
//!   "edges": [{"from": "A", "to": "B", "weight": 3.5, "bidirectional": true}]
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Graph, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexEntry {
    pub id: String,
    pub region: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeEntry {
    pub from: String,
    pub to: String,
    pub weight: f64,
    /// Also add the edge `to -> from` with the same weight
    #[serde(default)]
    pub bidirectional: bool,
}

/// Serialized form of a region-partitioned graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphFile {
    pub regions: usize,
    pub vertices: Vec<VertexEntry>,
    #[serde(default)]
    pub edges: Vec<EdgeEntry>,
}

impl GraphFile {
    /// Read a graph description from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Parse a graph description from a JSON string
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the graph, rejecting negative or non-finite weights
    pub fn to_graph(&self) -> Result<Graph> {
        let mut graph = Graph::new(self.regions)?;
        for vertex in &self.vertices {
            graph.add_vertex(vertex.id.as_str(), vertex.region)?;
        }
        for edge in &self.edges {
            if !edge.weight.is_finite() || edge.weight < 0.0 {
                return Err(Error::InvalidWeight {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    weight: edge.weight,
                });
            }
            graph.add_edge_by_ids(&edge.from, &edge.to, edge.weight)?;
            if edge.bidirectional {
                graph.add_edge_by_ids(&edge.to, &edge.from, edge.weight)?;
            }
        }
        Ok(graph)
    }
}

/// Load and build a graph in one go
pub fn load_graph<P: AsRef<Path>>(path: P) -> Result<Graph> {
    GraphFile::load(path)?.to_graph()
}
