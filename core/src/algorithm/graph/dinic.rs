//! Blocking-flow maximum flow (Dinic's algorithm and its adaptive variant)
//!
//! Every run alternates two phases until the sink falls out of reach:
//! a breadth-first level phase over residual arcs, then a blocking-flow phase
//! that repeatedly walks admissible arcs (`level(v) == level(u) + 1`) from the
//! source to the sink and saturates the bottleneck of each path found.
//!
//! The adaptive variant differs only in how levels are assigned: large graphs
//! use the graph-owned worker pool for wave-parallel BFS. The blocking-flow
//! walk is always sequential, because every augmentation rewrites residual
//! capacities the next walk depends on.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use crate::algorithm::state::LevelGraph;
use crate::algorithm::traits::{
    AlgorithmComplexity, AlgorithmKind, FlowAlgorithm, FlowOutcome, SolveContext, Termination,
};
use crate::data_structures::graph::{Capacity, ResidualNetwork, VertexId};
use crate::optimization::parallel;

/// How level graphs are constructed during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LevelStrategy {
    Sequential,
    ParallelAboveThreshold,
}

/// Sequential Dinic's, preferred for small graphs
#[derive(Debug, Default)]
pub struct StandardDinic;

impl StandardDinic {
    pub fn new() -> Self {
        Self
    }
}

impl FlowAlgorithm for StandardDinic {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::StandardDinic
    }

    fn description(&self) -> &'static str {
        "Dinic's blocking-flow algorithm with sequential BFS level graphs and current-arc DFS."
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity { time_complexity: "O(V^2 E)", space_complexity: "O(V + E)" }
    }

    fn solve(
        &mut self,
        network: &mut ResidualNetwork,
        source: VertexId,
        sink: VertexId,
        ctx: &mut SolveContext<'_>,
    ) -> FlowOutcome {
        run_phases(network, source, sink, ctx, LevelStrategy::Sequential)
    }
}

/// Dinic's with wave-parallel level construction on large graphs
#[derive(Debug, Default)]
pub struct AdaptiveDinic;

impl AdaptiveDinic {
    pub fn new() -> Self {
        Self
    }
}

impl FlowAlgorithm for AdaptiveDinic {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::AdaptiveDinic
    }

    fn description(&self) -> &'static str {
        "Dinic's blocking-flow algorithm whose level graphs are built by a bounded worker pool \
         once the graph exceeds the parallel threshold."
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity { time_complexity: "O(V^2 E)", space_complexity: "O(V + E)" }
    }

    fn solve(
        &mut self,
        network: &mut ResidualNetwork,
        source: VertexId,
        sink: VertexId,
        ctx: &mut SolveContext<'_>,
    ) -> FlowOutcome {
        run_phases(network, source, sink, ctx, LevelStrategy::ParallelAboveThreshold)
    }
}

fn run_phases(
    network: &mut ResidualNetwork,
    source: VertexId,
    sink: VertexId,
    ctx: &mut SolveContext<'_>,
    strategy: LevelStrategy,
) -> FlowOutcome {
    let vertex_count = network.vertex_count();
    let parallel = strategy == LevelStrategy::ParallelAboveThreshold
        && vertex_count > ctx.config.parallel_threshold;
    let mut levels = LevelGraph::new(vertex_count);
    let mut total: Capacity = 0;
    let mut phases = 0;

    loop {
        if !build_levels(network, source, sink, &mut levels, parallel, ctx) {
            return FlowOutcome::complete(total);
        }
        if phases == ctx.config.max_phases {
            log::warn!(
                "Phase limit {} reached with {} units routed; stopping early",
                ctx.config.max_phases,
                total
            );
            return FlowOutcome { value: total, termination: Termination::PhaseLimit { phases } };
        }
        phases += 1;
        ctx.stats.bfs_phases += 1;

        levels.reset_cursors();
        loop {
            let pushed = augment(network, &mut levels, source, sink);
            if pushed == 0 {
                break;
            }
            total += pushed;
            ctx.stats.dfs_iterations += 1;
        }
        log::trace!("Phase {} complete, {} units routed so far", phases, total);
    }
}

fn build_levels(
    network: &ResidualNetwork,
    source: VertexId,
    sink: VertexId,
    levels: &mut LevelGraph,
    parallel: bool,
    ctx: &mut SolveContext<'_>,
) -> bool {
    if parallel {
        if let Some(pool) = ctx.pool.handle() {
            let report = parallel::build_level_graph(&pool, network, source, sink, levels);
            ctx.stats.parallel_waves += report.waves;
            return report.sink_reached;
        }
    }
    levels.build_sequential(network, source, sink)
}

/// Find one augmenting path in the level graph and saturate its bottleneck
///
/// Walks forward along current arcs with an explicit path stack. A vertex
/// with no admissible arc left is a dead end: the walk retreats and the
/// parent's cursor moves past the arc that led there, so no arc is examined
/// twice within the phase after it has been proven useless.
pub(crate) fn augment(
    network: &mut ResidualNetwork,
    levels: &mut LevelGraph,
    source: VertexId,
    sink: VertexId,
) -> Capacity {
    let mut path: Vec<(VertexId, usize)> = Vec::new();
    let mut vertex = source;

    loop {
        if vertex == sink {
            let bottleneck = path
                .iter()
                .map(|&(from, index)| network.residual(from, index))
                .min()
                .unwrap_or(0);
            debug_assert!(bottleneck > 0, "augmenting path with zero bottleneck");
            for &(from, index) in &path {
                network.push_flow(from, index, bottleneck);
            }
            return bottleneck;
        }

        let arcs = network.edges_from(vertex).len();
        while levels.current[vertex] < arcs && !levels.is_admissible(network, vertex, levels.current[vertex]) {
            levels.current[vertex] += 1;
        }

        if levels.current[vertex] < arcs {
            let index = levels.current[vertex];
            path.push((vertex, index));
            vertex = network.edge(vertex, index).to;
            continue;
        }

        // Dead end: retreat and skip the arc that led here
        match path.pop() {
            Some((parent, index)) => {
                debug_assert_eq!(levels.current[parent], index, "current-arc desynchronized");
                levels.current[parent] += 1;
                vertex = parent;
            }
            None => return 0,
        }
    }
}
