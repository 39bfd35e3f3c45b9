//! Post-run statistics for maximum-flow executions
//!
//! Counters are reset at the start of every `max_flow` call and describe the
//! most recent run only. Formatting is left to the caller; the snapshot is
//! serializable so a reporter can emit it as JSON.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::time::Duration;

use serde::{Serialize, Deserialize};

use crate::algorithm::traits::{AlgorithmKind, FlowError, Termination};
use crate::data_structures::graph::Capacity;
use crate::selection::selector::GraphClass;

/// Statistics snapshot for the most recent run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowStatistics {
    /// Algorithm executed
    pub algorithm: Option<AlgorithmKind>,

    /// Structural class assigned from the selection
    pub graph_class: Option<GraphClass>,

    /// Number of vertices at run time
    pub vertices: usize,

    /// Number of original edges at run time
    pub edges: usize,

    /// Level graphs built (Dinic's variants)
    pub bfs_phases: usize,

    /// Augmenting paths found (Dinic's variants and ISAP)
    pub dfs_iterations: usize,

    /// Waves processed by the parallel level builder
    pub parallel_waves: usize,

    /// Push operations performed (push-relabel)
    pub pushes: usize,

    /// Relabel operations performed (push-relabel and ISAP)
    pub relabels: usize,

    /// Gap heuristic triggers
    pub gap_optimizations: usize,

    /// Highest vertex label reached
    pub max_height: usize,

    /// Flow added by the run
    pub flow_value: Capacity,

    /// How the run ended
    pub termination: Termination,

    /// Wall-clock time spent in analysis, selection and solving
    pub compute_time: Duration,
}

impl FlowStatistics {
    /// Clear counters ahead of a new run
    pub(crate) fn begin_run(&mut self, vertices: usize, edges: usize) {
        *self = Self { vertices, edges, ..Self::default() };
    }

    /// Edges per squared vertex count
    pub fn density_ratio(&self) -> f64 {
        if self.vertices == 0 {
            return 0.0;
        }
        self.edges as f64 / (self.vertices as f64 * self.vertices as f64)
    }

    pub fn to_json(&self) -> Result<String, FlowError> {
        Ok(serde_json::to_string(self)?)
    }
}
