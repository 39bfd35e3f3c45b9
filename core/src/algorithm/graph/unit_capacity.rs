//! Unit-capacity specialization
//!
//! On networks where almost every edge has capacity one, each augmenting
//! path saturates all its arcs and Dinic's needs only O(sqrt(E)) phases.
//! The solver therefore runs the adaptive Dinic's machinery unchanged; it is
//! a distinct catalogue entry so selection and statistics can tell the cases
//! apart.

use crate::algorithm::graph::dinic::AdaptiveDinic;
use crate::algorithm::traits::{
    AlgorithmComplexity, AlgorithmKind, FlowAlgorithm, FlowOutcome, SolveContext,
};
use crate::data_structures::graph::{ResidualNetwork, VertexId};

#[derive(Debug, Default)]
pub struct UnitCapacityDinic {
    inner: AdaptiveDinic,
}

impl UnitCapacityDinic {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlowAlgorithm for UnitCapacityDinic {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::UnitCapacity
    }

    fn description(&self) -> &'static str {
        "Blocking-flow solver for unit-capacity networks such as bipartite matching instances."
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity {
            time_complexity: "O(min(V^(2/3), E^(1/2)) E)",
            space_complexity: "O(V + E)",
        }
    }

    fn solve(
        &mut self,
        network: &mut ResidualNetwork,
        source: VertexId,
        sink: VertexId,
        ctx: &mut SolveContext<'_>,
    ) -> FlowOutcome {
        self.inner.solve(network, source, sink, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::graph::tests::run_with;
    use crate::config::EngineConfig;
    use crate::testing::{assert_valid_max_flow, matching_network};

    #[test]
    fn test_bipartite_matching_size() {
        // Left {a0, a1, a2, a3}, right {b0, b1, b2}; a3 and a0 compete for b0
        let adjacency = [(0, 0), (0, 1), (1, 0), (2, 1), (2, 2), (3, 0)];
        let (mut network, source, sink) = matching_network(4, 3, &adjacency);

        let (outcome, stats) = run_with(
            &mut UnitCapacityDinic::new(),
            &mut network,
            source,
            sink,
            &EngineConfig::default(),
        );

        assert_eq!(outcome.value, 3);
        assert!(stats.bfs_phases >= 1);
        assert_valid_max_flow(&network, source, sink, 3);
    }

    #[test]
    fn test_perfect_matching_blocked_by_hall_violation() {
        // Three left vertices share only two right neighbours
        let adjacency = [(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)];
        let (mut network, source, sink) = matching_network(3, 3, &adjacency);

        let (outcome, _) = run_with(
            &mut UnitCapacityDinic::new(),
            &mut network,
            source,
            sink,
            &EngineConfig::default(),
        );

        assert_eq!(outcome.value, 2);
    }
}
