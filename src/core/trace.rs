//! Search tracing hooks
//!
//! Queries take a `&mut dyn SearchTracer` so verbose step-by-step output is
//! chosen per call instead of through a process-wide switch.

use log::trace;

use super::graph::{EdgeId, VertexIdx};
use super::relax::Direction;

/// Observer of relaxation-core and query events. All hooks default to no-ops.
pub trait SearchTracer {
    /// A vertex was popped with a current distance and expanded
    fn settled(&mut self, _direction: Direction, _vertex: VertexIdx, _distance: f64) {}

    /// An edge improved the tentative distance of `vertex`
    fn improved(
        &mut self,
        _direction: Direction,
        _edge: EdgeId,
        _vertex: VertexIdx,
        _old: Option<f64>,
        _new: f64,
    ) {
    }

    /// An edge was skipped because its flag for `region` is false
    fn pruned(&mut self, _direction: Direction, _edge: EdgeId, _region: usize) {}

    /// Forward and reverse searches both settled `vertex`
    fn met(&mut self, _vertex: VertexIdx, _length: f64) {}

    /// The meeting scan found a shorter path through `edge`
    fn candidate(&mut self, _edge: EdgeId, _length: f64) {}
}

/// Tracer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl SearchTracer for NoTrace {}

/// Tracer forwarding every event to `log::trace!`
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTracer;

impl SearchTracer for LogTracer {
    fn settled(&mut self, direction: Direction, vertex: VertexIdx, distance: f64) {
        trace!(target: "butterfly_arcflags::search", "{direction:?}: settle {vertex} at {distance}");
    }

    fn improved(
        &mut self,
        direction: Direction,
        edge: EdgeId,
        vertex: VertexIdx,
        old: Option<f64>,
        new: f64,
    ) {
        trace!(
            target: "butterfly_arcflags::search",
            "{direction:?}: {edge} improves {vertex}: {old:?} -> {new}"
        );
    }

    fn pruned(&mut self, direction: Direction, edge: EdgeId, region: usize) {
        trace!(
            target: "butterfly_arcflags::search",
            "{direction:?}: {edge} pruned, not on a shortest path into region {region}"
        );
    }

    fn met(&mut self, vertex: VertexIdx, length: f64) {
        trace!(target: "butterfly_arcflags::search", "searches met at {vertex}, candidate length {length}");
    }

    fn candidate(&mut self, edge: EdgeId, length: f64) {
        trace!(target: "butterfly_arcflags::search", "shorter path via {edge}: {length}");
    }
}

/// One recorded search event
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    Settled {
        direction: Direction,
        vertex: VertexIdx,
        distance: f64,
    },
    Improved {
        direction: Direction,
        edge: EdgeId,
        vertex: VertexIdx,
        old: Option<f64>,
        new: f64,
    },
    Pruned {
        direction: Direction,
        edge: EdgeId,
        region: usize,
    },
    Met {
        vertex: VertexIdx,
        length: f64,
    },
    Candidate {
        edge: EdgeId,
        length: f64,
    },
}

/// Tracer keeping every event in memory
#[derive(Debug, Default, Clone)]
pub struct RecordingTracer {
    pub events: Vec<TraceEvent>,
}

impl RecordingTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertices settled in `direction`, in settle order
    pub fn settled_in(&self, direction: Direction) -> Vec<VertexIdx> {
        self.events
            .iter()
            .filter_map(|event| match event {
                TraceEvent::Settled {
                    direction: d,
                    vertex,
                    ..
                } if *d == direction => Some(*vertex),
                _ => None,
            })
            .collect()
    }

    /// Number of pruned-edge events
    pub fn pruned_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Pruned { .. }))
            .count()
    }
}

impl SearchTracer for RecordingTracer {
    fn settled(&mut self, direction: Direction, vertex: VertexIdx, distance: f64) {
        self.events.push(TraceEvent::Settled {
            direction,
            vertex,
            distance,
        });
    }

    fn improved(
        &mut self,
        direction: Direction,
        edge: EdgeId,
        vertex: VertexIdx,
        old: Option<f64>,
        new: f64,
    ) {
        self.events.push(TraceEvent::Improved {
            direction,
            edge,
            vertex,
            old,
            new,
        });
    }

    fn pruned(&mut self, direction: Direction, edge: EdgeId, region: usize) {
        self.events.push(TraceEvent::Pruned {
            direction,
            edge,
            region,
        });
    }

    fn met(&mut self, vertex: VertexIdx, length: f64) {
        self.events.push(TraceEvent::Met { vertex, length });
    }

    fn candidate(&mut self, edge: EdgeId, length: f64) {
        self.events.push(TraceEvent::Candidate { edge, length });
    }
}
