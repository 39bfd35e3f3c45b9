//! Adaptive maximum-flow engine
//!
//! `Graph` owns the residual network, its configuration, its worker pool and
//! the statistics of the latest run. A `max_flow` call validates the
//! terminals, selects an algorithm (analysis is skipped for small graphs),
//! runs it on the residual network and records what happened.
//!
//! Flow persists between calls: a second query on the same terminals finds
//! no augmenting path and adds nothing. `reset_flow` restores the empty flow.
//!
//! # Example
//! ```
//! use adaptive_flow::Graph;
//!
//! let mut graph = Graph::new(4);
//! graph.add_edge(0, 1, 3).unwrap();
//! graph.add_edge(1, 3, 3).unwrap();
//! graph.add_edge(0, 2, 2).unwrap();
//! graph.add_edge(2, 3, 2).unwrap();
//!
//! assert_eq!(graph.max_flow(0, 3), 5);
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::time::Instant;

use crate::algorithm::traits::{AlgorithmKind, FlowError, FlowOutcome, SolveContext};
use crate::config::EngineConfig;
use crate::data_structures::graph::{
    Capacity, EdgeFlow, EdgeRef, MinCut, ResidualNetwork, VertexId,
};
use crate::execution::statistics::FlowStatistics;
use crate::optimization::parallel::WorkerPool;
use crate::selection::analyzer::{GraphAnalysisMetrics, GraphAnalyzer};
use crate::selection::selector::{AlgorithmSelector, Selection};

/// Directed capacitated graph with adaptive maximum-flow queries
#[derive(Debug, Clone)]
pub struct Graph {
    network: ResidualNetwork,
    config: EngineConfig,
    /// Graph-owned pool for parallel level construction
    pool: WorkerPool,
    stats: FlowStatistics,
}

impl Graph {
    /// Create an empty graph with the default configuration
    pub fn new(vertex_count: usize) -> Self {
        let config = EngineConfig::default();
        Self {
            network: ResidualNetwork::new(vertex_count),
            pool: WorkerPool::new(config.worker_threads),
            config,
            stats: FlowStatistics::default(),
        }
    }

    /// Create an empty graph with a validated custom configuration
    pub fn with_config(vertex_count: usize, config: EngineConfig) -> Result<Self, FlowError> {
        config.validate()?;
        Ok(Self {
            network: ResidualNetwork::new(vertex_count),
            pool: WorkerPool::new(config.worker_threads),
            config,
            stats: FlowStatistics::default(),
        })
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.network.vertex_count()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.network.edge_count()
    }

    /// Add a directed edge; rejects unknown vertices and negative capacities
    pub fn add_edge(
        &mut self,
        from: VertexId,
        to: VertexId,
        capacity: Capacity,
    ) -> Result<EdgeRef, FlowError> {
        self.network.add_edge(from, to, capacity)
    }

    /// Current flow on an inserted edge
    pub fn flow(&self, edge: EdgeRef) -> Option<Capacity> {
        self.network.get(edge).map(|e| e.flow)
    }

    /// Original edges with their current flow, in insertion order per vertex
    pub fn edges(&self) -> impl Iterator<Item = EdgeFlow> + '_ {
        self.network.original_edges()
    }

    /// Zero every flow so the next query starts from scratch
    pub fn reset_flow(&mut self) {
        self.network.reset_flow();
    }

    pub fn network(&self) -> &ResidualNetwork {
        &self.network
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Statistics of the most recent run
    pub fn statistics(&self) -> &FlowStatistics {
        &self.stats
    }

    /// Structural metrics of the graph as built so far
    pub fn analyze(&self) -> GraphAnalysisMetrics {
        GraphAnalyzer::new().analyze(&self.network)
    }

    /// Algorithm the next `max_flow` call would run
    pub fn select_algorithm(&self) -> Selection {
        AlgorithmSelector::new(&self.config).select_for(&self.network)
    }

    /// Maximum flow from `source` to `sink`
    ///
    /// Out-of-range terminals or `source == sink` yield `0` without running
    /// any algorithm. If the phase cap is reached the best flow found so far
    /// is returned; `statistics().termination` tells the two apart.
    pub fn max_flow(&mut self, source: VertexId, sink: VertexId) -> Capacity {
        match self.try_max_flow(source, sink) {
            Ok(outcome) => outcome.value,
            Err(err) => {
                log::debug!("max_flow rejected: {}", err);
                0
            }
        }
    }

    /// Maximum flow with invalid terminals reported as an error
    pub fn try_max_flow(&mut self, source: VertexId, sink: VertexId) -> Result<FlowOutcome, FlowError> {
        self.check_endpoints(source, sink)?;
        let started = Instant::now();
        self.stats.begin_run(self.network.vertex_count(), self.network.edge_count());

        let selection = AlgorithmSelector::new(&self.config).select_for(&self.network);
        self.stats.graph_class = Some(selection.class);

        Ok(self.execute(selection.algorithm, source, sink, started))
    }

    /// Maximum flow with a caller-chosen algorithm, bypassing selection
    ///
    /// No analysis runs, so the recorded graph class stays unset.
    pub fn max_flow_with(
        &mut self,
        kind: AlgorithmKind,
        source: VertexId,
        sink: VertexId,
    ) -> Result<FlowOutcome, FlowError> {
        self.check_endpoints(source, sink)?;
        let started = Instant::now();
        self.stats.begin_run(self.network.vertex_count(), self.network.edge_count());

        Ok(self.execute(kind, source, sink, started))
    }

    /// Residual reachability cut from `source` under the current flow
    pub fn min_cut(&self, source: VertexId) -> Result<MinCut, FlowError> {
        self.network.min_cut(source)
    }

    fn execute(
        &mut self,
        kind: AlgorithmKind,
        source: VertexId,
        sink: VertexId,
        started: Instant,
    ) -> FlowOutcome {
        let mut solver = kind.solver();
        let outcome = {
            let mut ctx = SolveContext {
                config: &self.config,
                pool: &mut self.pool,
                stats: &mut self.stats,
            };
            solver.solve(&mut self.network, source, sink, &mut ctx)
        };

        self.stats.algorithm = Some(kind);
        self.stats.flow_value = outcome.value;
        self.stats.termination = outcome.termination;
        self.stats.compute_time = started.elapsed();

        log::info!(
            "{} routed {} units from {} to {} in {:?}",
            kind,
            outcome.value,
            source,
            sink,
            self.stats.compute_time
        );
        outcome
    }

    fn check_endpoints(&self, source: VertexId, sink: VertexId) -> Result<(), FlowError> {
        let vertex_count = self.network.vertex_count();
        if source >= vertex_count || sink >= vertex_count || source == sink {
            return Err(FlowError::InvalidEndpoint {
                source_vertex: source,
                sink_vertex: sink,
                vertex_count,
            });
        }
        Ok(())
    }
}
