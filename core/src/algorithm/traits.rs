//! Core solver trait definitions for the adaptive flow engine
//!
//! This module establishes the contract every maximum-flow strategy
//! implements, together with the algorithm catalogue used by the selector
//! and the error taxonomy shared by the whole crate.
//!
//! # Key Design Principles
//! - One `solve(network, source, sink)` entry per strategy
//! - Enum-tagged dispatch instead of integer constants
//! - Scratch state owned by the solver, residual state owned by the graph

use std::fmt::{self, Debug, Display};
use serde::{Serialize, Deserialize};

use crate::config::EngineConfig;
use crate::data_structures::graph::{Capacity, ResidualNetwork, VertexId};
use crate::execution::statistics::FlowStatistics;
use crate::optimization::parallel::WorkerPool;

/// Comprehensive error types for flow engine operations
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Invalid vertex: {vertex} (graph has {vertex_count} vertices)")]
    InvalidVertex { vertex: VertexId, vertex_count: usize },

    #[error("Negative capacity {capacity} on edge {from} -> {to}")]
    NegativeCapacity { from: VertexId, to: VertexId, capacity: Capacity },

    #[error("Invalid endpoints: source {source_vertex}, sink {sink_vertex} ({vertex_count} vertices)")]
    InvalidEndpoint {
        source_vertex: VertexId,
        sink_vertex: VertexId,
        vertex_count: usize,
    },

    #[error("Residual invariant violated: {0}")]
    Invariant(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Maximum flow algorithm variants, in tie-break priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmKind {
    /// Sequential Dinic's for small graphs
    StandardDinic,
    /// Dinic's with wave-parallel level construction ("Kyng-Dinic")
    AdaptiveDinic,
    /// Goldberg-Tarjan push-relabel with gap relabeling
    PushRelabel,
    /// Improved shortest augmenting path with gap relabeling
    Isap,
    /// Unit-capacity specialization of the adaptive Dinic's variant
    UnitCapacity,
}

impl AlgorithmKind {
    /// Every kind, in the order used to break score ties
    pub const ALL: [AlgorithmKind; 5] = [
        AlgorithmKind::StandardDinic,
        AlgorithmKind::AdaptiveDinic,
        AlgorithmKind::PushRelabel,
        AlgorithmKind::Isap,
        AlgorithmKind::UnitCapacity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AlgorithmKind::StandardDinic => "Standard Dinic's",
            AlgorithmKind::AdaptiveDinic => "Kyng-Dinic's (Adaptive)",
            AlgorithmKind::PushRelabel => "Push-Relabel",
            AlgorithmKind::Isap => "ISAP",
            AlgorithmKind::UnitCapacity => "Unit Capacity Optimized",
        }
    }

    /// Instantiate the solver implementing this kind
    pub fn solver(self) -> Box<dyn FlowAlgorithm> {
        use crate::algorithm::graph::{
            AdaptiveDinic, Isap, PushRelabel, StandardDinic, UnitCapacityDinic,
        };

        match self {
            AlgorithmKind::StandardDinic => Box::new(StandardDinic::new()),
            AlgorithmKind::AdaptiveDinic => Box::new(AdaptiveDinic::new()),
            AlgorithmKind::PushRelabel => Box::new(PushRelabel::new()),
            AlgorithmKind::Isap => Box::new(Isap::new()),
            AlgorithmKind::UnitCapacity => Box::new(UnitCapacityDinic::new()),
        }
    }
}

impl Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a solver run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Termination {
    /// No augmenting path remains; the value is the maximum flow
    #[default]
    Complete,
    /// The phase cap was hit; the value is the best flow accumulated so far
    PhaseLimit { phases: usize },
}

/// Result of a single solver invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowOutcome {
    pub value: Capacity,
    pub termination: Termination,
}

impl FlowOutcome {
    pub fn complete(value: Capacity) -> Self {
        Self { value, termination: Termination::Complete }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.termination == Termination::Complete
    }
}

/// Algorithm complexity information
#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmComplexity {
    pub time_complexity: &'static str,
    pub space_complexity: &'static str,
}

/// Everything a solver may touch besides the residual network
#[derive(Debug)]
pub struct SolveContext<'a> {
    pub config: &'a EngineConfig,
    pub pool: &'a mut WorkerPool,
    pub stats: &'a mut FlowStatistics,
}

/// Main solver trait
///
/// # Invariants
/// - `solve` only moves capacity between an edge and its reverse twin
/// - Returned value equals the net flow added out of `source` by this call
/// - `source` and `sink` are already validated, distinct and in range
pub trait FlowAlgorithm: Debug + Send {
    /// Returns the catalogue entry this solver implements
    fn kind(&self) -> AlgorithmKind;

    /// Returns the solver's descriptive name
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Returns the solver's formal description
    fn description(&self) -> &'static str;

    /// Returns the solver's asymptotic complexity
    fn complexity(&self) -> AlgorithmComplexity;

    /// Pushes as much additional flow from `source` to `sink` as possible
    fn solve(
        &mut self,
        network: &mut ResidualNetwork,
        source: VertexId,
        sink: VertexId,
        ctx: &mut SolveContext<'_>,
    ) -> FlowOutcome;
}
