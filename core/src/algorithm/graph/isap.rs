//! Improved shortest augmenting path (ISAP) with gap relabeling
//!
//! Distances to the sink are computed once by reverse BFS. The search then
//! advances from the source along admissible arcs (`d(u) == d(v) + 1`),
//! augmenting whenever it reaches the sink. A vertex with no admissible arc
//! left is relabeled in place and the search retreats one step, so labels are
//! maintained incrementally instead of by repeated BFS.

use crate::algorithm::state::HeightLabels;
use crate::algorithm::traits::{
    AlgorithmComplexity, AlgorithmKind, FlowAlgorithm, FlowOutcome, SolveContext,
};
use crate::data_structures::graph::{Capacity, ResidualNetwork, VertexId};

#[derive(Debug, Default)]
pub struct Isap {
    /// Current-arc cursor per vertex
    current: Vec<usize>,
    /// Arcs from the source to the search head
    path: Vec<(VertexId, usize)>,
    /// Distance labels towards the sink
    labels: HeightLabels,
}

impl Isap {
    pub fn new() -> Self {
        Self::default()
    }

    fn augment_path(&mut self, network: &mut ResidualNetwork) -> Capacity {
        let bottleneck = self
            .path
            .iter()
            .map(|&(from, index)| network.residual(from, index))
            .min()
            .unwrap_or(0);
        debug_assert!(bottleneck > 0, "augmenting path with zero bottleneck");
        for &(from, index) in &self.path {
            network.push_flow(from, index, bottleneck);
        }
        self.path.clear();
        bottleneck
    }

    /// Move the cursor of `vertex` to its next admissible arc, if any
    fn advance(&mut self, network: &ResidualNetwork, vertex: VertexId) -> Option<usize> {
        let arcs = network.edges_from(vertex);
        let height = self.labels.height(vertex);
        while self.current[vertex] < arcs.len() {
            let edge = &arcs[self.current[vertex]];
            if edge.residual() > 0 && height == self.labels.height(edge.to) + 1 {
                return Some(self.current[vertex]);
            }
            self.current[vertex] += 1;
        }
        None
    }
}

impl FlowAlgorithm for Isap {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::Isap
    }

    fn description(&self) -> &'static str {
        "Improved shortest augmenting path with exact sink distances, current arcs and \
         gap relabeling."
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
        let vertex_count = network.vertex_count();
        self.labels =
            HeightLabels::from_sink_distances(network, sink, ctx.config.gap_optimization);
        self.current = vec![0; vertex_count];
        self.path.clear();

        let mut total: Capacity = 0;
        let mut vertex = source;

        while self.labels.height(source) < vertex_count {
            if vertex == sink {
                total += self.augment_path(network);
                ctx.stats.dfs_iterations += 1;
                vertex = source;
                continue;
            }

            if let Some(index) = self.advance(network, vertex) {
                self.path.push((vertex, index));
                vertex = network.edge(vertex, index).to;
                continue;
            }

            // Retreat: relabel in place, rewind the cursor and step back
            let labels = &mut self.labels;
            let new_height = labels
                .min_neighbour_height(network, vertex)
                .map_or(vertex_count, |h| h.min(vertex_count));
            if new_height > labels.height(vertex) {
                ctx.stats.relabels += 1;
                if let Some(gap) = labels.relabel(vertex, new_height) {
                    let promoted = labels.apply_gap(gap);
                    ctx.stats.gap_optimizations += 1;
                    log::trace!("Gap at distance {}: {} vertices lifted", gap, promoted);
                }
            } else {
                debug_assert_eq!(vertex, source, "distance labels lost validity at {vertex}");
                break;
            }
            self.current[vertex] = 0;
            if let Some((parent, _)) = self.path.pop() {
                vertex = parent;
            }
        }

        ctx.stats.max_height = ctx.stats.max_height.max(self.labels.max_height());
        FlowOutcome::complete(total)
    }
}
