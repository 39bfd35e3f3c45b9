//! Engine configuration
//!
//! Every threshold the selector and solvers consult lives here, so that
//! graphs with different workloads can be tuned without recompiling.
//! Configurations deserialize from JSON; absent fields fall back to the
//! defaults below.

use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::algorithm::traits::FlowError;

/// Vertex count below which analysis is skipped and Standard Dinic's runs
pub const SMALL_GRAPH_THRESHOLD: usize = 100;

/// Vertex count above which level graphs are built by the worker pool
pub const PARALLEL_THRESHOLD: usize = 1000;

/// Fraction of unit-capacity edges that enables the unit-capacity solver
pub const UNIT_CAPACITY_RATIO: f64 = 0.8;

/// Density above which a graph is classified as dense
pub const DENSE_GRAPH_RATIO: f64 = 0.25;

/// Planarity score above which a sparse graph is classified as planar
pub const PLANAR_SCORE_THRESHOLD: f64 = 0.7;

/// Phase cap for the Dinic's-style outer loop
pub const MAX_PHASES: usize = 1000;

/// Engine configuration with tunable thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Graphs with fewer vertices take the Standard Dinic's fast path
    pub small_graph_threshold: usize,

    /// Graphs with more vertices build level graphs in parallel
    pub parallel_threshold: usize,

    /// Unit-capacity edge fraction required before the unit solver scores
    pub unit_capacity_ratio: f64,

    /// Density at or above which graphs are classified dense
    pub dense_graph_ratio: f64,

    /// Planarity score above which graphs are classified planar
    pub planar_score_threshold: f64,

    /// Maximum number of level-graph phases per Dinic's run
    pub max_phases: usize,

    /// Worker pool size (defaults to the number of logical CPUs)
    pub worker_threads: Option<usize>,

    /// Gap relabeling for push-relabel and ISAP
    pub gap_optimization: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            small_graph_threshold: SMALL_GRAPH_THRESHOLD,
            parallel_threshold: PARALLEL_THRESHOLD,
            unit_capacity_ratio: UNIT_CAPACITY_RATIO,
            dense_graph_ratio: DENSE_GRAPH_RATIO,
            planar_score_threshold: PLANAR_SCORE_THRESHOLD,
            max_phases: MAX_PHASES,
            worker_threads: None,
            gap_optimization: true,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self, FlowError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, FlowError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json(&self) -> Result<String, FlowError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations no solver can run under
    pub fn validate(&self) -> Result<(), FlowError> {
        if self.max_phases == 0 {
            return Err(FlowError::InvalidConfig("max_phases must be positive".to_string()));
        }
        if self.worker_threads == Some(0) {
            return Err(FlowError::InvalidConfig(
                "worker_threads must be positive when set".to_string(),
            ));
        }
        for (name, value) in [
            ("unit_capacity_ratio", self.unit_capacity_ratio),
            ("dense_graph_ratio", self.dense_graph_ratio),
            ("planar_score_threshold", self.planar_score_threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(FlowError::InvalidConfig(format!(
                    "{name} must lie in (0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}
