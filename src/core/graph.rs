//! Region-partitioned directed graph
//!
//! Edges live in a single arena and are referenced by [`EdgeId`] from both the
//! forward (outgoing) and reverse (incoming) adjacency lists, so an edge's arc
//! flags are shared by both traversal directions.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::error::{Error, Result};

/// Index of a vertex in the graph's vertex sequence
pub type VertexIdx = usize;

/// Position of an edge in the graph's edge arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EdgeId(pub usize);

impl EdgeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// A vertex: an opaque id plus its region tag in `[0, K)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Vertex {
    pub id: String,
    pub region: usize,
}

impl Vertex {
    pub fn new(id: impl Into<String>, region: usize) -> Self {
        Self {
            id: id.into(),
            region,
        }
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (region {})", self.id, self.region)
    }
}

/// Fixed-width bit set with one bit per region.
///
/// Sized once from the graph's region count and never grown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionFlags {
    words: Box<[u64]>,
    len: usize,
}

impl RegionFlags {
    /// All-false flags for `len` regions
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0u64; len.div_ceil(64)].into_boxed_slice(),
            len,
        }
    }

    /// Number of regions covered
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bit for `region`; regions past the end read as false
    #[inline]
    pub fn get(&self, region: usize) -> bool {
        region < self.len && self.words[region / 64] & (1u64 << (region % 64)) != 0
    }

    #[inline]
    pub fn set(&mut self, region: usize) {
        debug_assert!(region < self.len, "region {region} >= {}", self.len);
        self.words[region / 64] |= 1u64 << (region % 64);
    }

    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }

    /// Number of set bits
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterate bits in region order
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |r| self.get(r))
    }
}

/// A directed, weighted edge carrying one arc flag per region
#[derive(Debug, Clone)]
pub struct Edge {
    pub from: VertexIdx,
    pub to: VertexIdx,
    pub weight: f64,
    pub flags: RegionFlags,
}

impl Edge {
    /// True iff this edge lies on some shortest path into `region`
    #[inline]
    pub fn flag(&self, region: usize) -> bool {
        self.flags.get(region)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Directed graph with forward and reverse adjacency.
///
/// Weights must be non-negative; this is not checked here.
#[derive(Debug, Clone)]
pub struct Graph {
    regions: usize,
    vertices: Vec<Vertex>,
    index: HashMap<String, VertexIdx>,
    edges: Vec<Edge>,
    forward: Vec<Vec<EdgeId>>,
    reverse: Vec<Vec<EdgeId>>,
    preprocessed: bool,
}

impl Graph {
    /// Create an empty graph with `regions` regions
    pub fn new(regions: usize) -> Result<Self> {
        if regions == 0 {
            return Err(Error::NoRegions);
        }
        Ok(Self {
            regions,
            vertices: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            forward: Vec::new(),
            reverse: Vec::new(),
            preprocessed: false,
        })
    }

    /// Build a graph from vertices and `(from, to, weight)` index triples
    pub fn build<I>(regions: usize, vertices: Vec<Vertex>, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (VertexIdx, VertexIdx, f64)>,
    {
        let mut graph = Self::new(regions)?;
        for vertex in vertices {
            graph.add_vertex(vertex.id, vertex.region)?;
        }
        for (from, to, weight) in edges {
            graph.add_edge(from, to, weight)?;
        }
        Ok(graph)
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, id: impl Into<String>, region: usize) -> Result<VertexIdx> {
        let id = id.into();
        if region >= self.regions {
            return Err(Error::RegionOutOfRange {
                region,
                regions: self.regions,
            });
        }
        if self.index.contains_key(&id) {
            return Err(Error::DuplicateVertex(id));
        }

        let idx = self.vertices.len();
        self.index.insert(id.clone(), idx);
        self.vertices.push(Vertex { id, region });
        self.forward.push(Vec::new());
        self.reverse.push(Vec::new());
        Ok(idx)
    }

    /// Add a directed edge between two vertex indices.
    ///
    /// Invalidates previously computed arc flags.
    pub fn add_edge(&mut self, from: VertexIdx, to: VertexIdx, weight: f64) -> Result<EdgeId> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;

        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            from,
            to,
            weight,
            flags: RegionFlags::new(self.regions),
        });
        self.forward[from].push(id);
        self.reverse[to].push(id);
        self.preprocessed = false;
        Ok(id)
    }

    /// Add a directed edge between two vertex ids
    pub fn add_edge_by_ids(&mut self, from: &str, to: &str, weight: f64) -> Result<EdgeId> {
        let from = self.index_of(from)?;
        let to = self.index_of(to)?;
        self.add_edge(from, to, weight)
    }

    /// Find the index of the vertex with the given id
    pub fn index_of(&self, id: &str) -> Result<VertexIdx> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownVertex(id.to_string()))
    }

    /// Fail unless `idx` names a vertex of this graph
    pub fn check_vertex(&self, idx: VertexIdx) -> Result<()> {
        if idx < self.vertices.len() {
            Ok(())
        } else {
            Err(Error::VertexOutOfRange {
                index: idx,
                count: self.vertices.len(),
            })
        }
    }

    /// Region count `K`
    #[inline]
    pub fn regions(&self) -> usize {
        self.regions
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of directed edges
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn vertex(&self, idx: VertexIdx) -> &Vertex {
        &self.vertices[idx]
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Region of the vertex at `idx`
    #[inline]
    pub fn region_of(&self, idx: VertexIdx) -> usize {
        self.vertices[idx].region
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    #[inline]
    pub(crate) fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        &mut self.edges[id.0]
    }

    /// All edges with their ids, in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeId(i), e))
    }

    /// Ids of the edges leaving `idx`
    #[inline]
    pub fn outgoing(&self, idx: VertexIdx) -> &[EdgeId] {
        &self.forward[idx]
    }

    /// Ids of the edges entering `idx`
    #[inline]
    pub fn incoming(&self, idx: VertexIdx) -> &[EdgeId] {
        &self.reverse[idx]
    }

    /// Heads and weights of the edges leaving `idx`
    pub fn neighbors(&self, idx: VertexIdx) -> impl Iterator<Item = (VertexIdx, f64)> + '_ {
        self.forward[idx].iter().map(move |&e| {
            let edge = &self.edges[e.0];
            (edge.to, edge.weight)
        })
    }

    /// Reset every arc flag to false
    pub fn clear_flags(&mut self) {
        for edge in &mut self.edges {
            edge.flags.clear();
        }
        self.preprocessed = false;
    }

    /// Whether arc flags were computed after the last edge insertion
    #[inline]
    pub fn is_preprocessed(&self) -> bool {
        self.preprocessed
    }

    pub(crate) fn mark_preprocessed(&mut self) {
        self.preprocessed = true;
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, vertex) in self.vertices.iter().enumerate() {
            write!(f, "{vertex} ->")?;
            for (n, (to, weight)) in self.neighbors(idx).enumerate() {
                let sep = if n == 0 { " " } else { ", " };
                write!(f, "{sep}{} ({weight})", self.vertices[to].id)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
