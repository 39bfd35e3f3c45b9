//! Adaptive maximum-flow engine
//!
//! Builds a residual network from caller-supplied edges and answers
//! maximum-flow queries, choosing among Dinic's, push-relabel, ISAP and a
//! unit-capacity specialization from measured graph structure.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod config;
pub mod data_structures;
pub mod engine;
pub mod execution;
pub mod optimization;
pub mod selection;

#[cfg(test)]
mod testing;

pub use crate::algorithm::traits::{
    AlgorithmComplexity, AlgorithmKind, FlowAlgorithm, FlowError, FlowOutcome, SolveContext,
    Termination,
};
pub use crate::config::EngineConfig;
pub use crate::data_structures::graph::{Capacity, EdgeFlow, EdgeRef, MinCut, ResidualNetwork, VertexId};
pub use crate::engine::Graph;
pub use crate::execution::statistics::FlowStatistics;
pub use crate::selection::{AlgorithmSelector, GraphAnalysisMetrics, GraphAnalyzer, GraphClass, Selection};
