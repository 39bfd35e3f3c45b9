//! Structural graph analysis feeding algorithm selection
//!
//! Every metric is computed in O(V + E) over original edges only; reverse
//! twins carry no information about the caller's graph.
//!
//! # Metrics
//! - Density `E / V^2` and average degree `E / V`
//! - Capacity mean, extremes and population variance
//! - Unit-capacity ratio and bottleneck factor (capacities below half the mean)
//! - Bipartite score: out-degree variance over mean degree, clamped to `[0, 1]`
//! - Layered structure: a BFS from vertex 0 with at least three non-empty levels
//! - Planarity score: slack against the Euler bound `E <= 3V - 6`

use std::collections::VecDeque;

use serde::{Serialize, Deserialize};

use crate::data_structures::graph::{Capacity, ResidualNetwork};

/// Snapshot of structural metrics for one graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphAnalysisMetrics {
    pub vertices: usize,
    pub edges: usize,
    pub density: f64,
    pub avg_capacity: f64,
    pub min_capacity: Capacity,
    pub max_capacity: Capacity,
    pub capacity_variance: f64,
    pub unit_capacity_ratio: f64,
    pub avg_degree: f64,
    pub max_degree: usize,
    pub bipartite_score: f64,
    pub bottleneck_factor: f64,
    pub layered_structure: bool,
    pub planarity_score: f64,
}

/// Stateless analyzer over a residual network
#[derive(Debug, Default, Clone, Copy)]
pub struct GraphAnalyzer;

impl GraphAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Compute every metric for `network`; never mutates it
    pub fn analyze(&self, network: &ResidualNetwork) -> GraphAnalysisMetrics {
        let vertices = network.vertex_count();
        let edges = network.edge_count();
        let capacities: Vec<Capacity> = network.original_edges().map(|edge| edge.capacity).collect();
        let degrees = out_degrees(network);

        let mut metrics = GraphAnalysisMetrics {
            vertices,
            edges,
            density: ratio(edges as f64, vertices as f64 * vertices as f64),
            avg_degree: ratio(edges as f64, vertices as f64),
            max_degree: degrees.iter().copied().max().unwrap_or(0),
            min_capacity: capacities.iter().copied().min().unwrap_or(0),
            max_capacity: capacities.iter().copied().max().unwrap_or(0),
            ..GraphAnalysisMetrics::default()
        };

        if !capacities.is_empty() {
            let count = capacities.len() as f64;
            // Summed in floating point: capacities near `i64::MAX` would overflow
            let mean = capacities.iter().map(|&c| c as f64).sum::<f64>() / count;
            metrics.avg_capacity = mean;
            metrics.capacity_variance = capacities
                .iter()
                .map(|&c| (c as f64 - mean).powi(2))
                .sum::<f64>()
                / count;
            metrics.unit_capacity_ratio =
                capacities.iter().filter(|&&c| c == 1).count() as f64 / count;
            metrics.bottleneck_factor =
                capacities.iter().filter(|&&c| (c as f64) < mean * 0.5).count() as f64 / count;
        }

        metrics.bipartite_score = bipartite_score(&degrees);
        metrics.layered_structure = has_layered_structure(network);
        metrics.planarity_score = planarity_score(vertices, edges);

        log::debug!("Graph metrics: {:?}", metrics);
        metrics
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

fn out_degrees(network: &ResidualNetwork) -> Vec<usize> {
    (0..network.vertex_count())
        .map(|v| network.edges_from(v).iter().filter(|edge| edge.is_original).count())
        .collect()
}

/// Degree variance normalized by mean degree
///
/// Two well-separated degree classes push the variance up, which is what a
/// bipartite-like source/target split tends to look like.
fn bipartite_score(degrees: &[usize]) -> f64 {
    if degrees.len() < 4 {
        return 0.0;
    }
    let count = degrees.len() as f64;
    let mean = degrees.iter().sum::<usize>() as f64 / count;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = degrees.iter().map(|&d| (d as f64 - mean).powi(2)).sum::<f64>() / count;
    (variance / mean).min(1.0)
}

fn has_layered_structure(network: &ResidualNetwork) -> bool {
    let vertices = network.vertex_count();
    if vertices < 4 {
        return false;
    }

    let mut level = vec![usize::MAX; vertices];
    level[0] = 0;
    let mut queue = VecDeque::from([0]);
    let mut max_level = 0;

    while let Some(vertex) = queue.pop_front() {
        for edge in network.edges_from(vertex).iter().filter(|edge| edge.is_original) {
            if level[edge.to] == usize::MAX {
                level[edge.to] = level[vertex] + 1;
                max_level = max_level.max(level[edge.to]);
                queue.push_back(edge.to);
            }
        }
    }

    if max_level < 2 {
        return false;
    }
    let mut layer_sizes = vec![0usize; max_level + 1];
    for &l in level.iter().filter(|&&l| l != usize::MAX) {
        layer_sizes[l] += 1;
    }
    layer_sizes.iter().all(|&size| size > 0)
}

fn planarity_score(vertices: usize, edges: usize) -> f64 {
    if vertices < 3 {
        return 1.0;
    }
    let limit = 3 * vertices - 6;
    if edges <= limit {
        1.0 - edges as f64 / limit as f64
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::testing::{matching_network, network_from};

    #[test]
    fn test_capacity_statistics() {
        let network = network_from(4, &[(0, 1, 1), (1, 2, 1), (2, 3, 4), (0, 3, 2)]);
        let metrics = GraphAnalyzer::new().analyze(&network);

        assert_eq!(metrics.vertices, 4);
        assert_eq!(metrics.edges, 4);
        assert_relative_eq!(metrics.density, 0.25);
        assert_relative_eq!(metrics.avg_capacity, 2.0);
        assert_eq!(metrics.min_capacity, 1);
        assert_eq!(metrics.max_capacity, 4);
        assert_relative_eq!(metrics.capacity_variance, 1.5);
        assert_relative_eq!(metrics.unit_capacity_ratio, 0.5);
        // Half the mean is 1.0, which no capacity falls below
        assert_relative_eq!(metrics.bottleneck_factor, 0.0);
        assert_relative_eq!(metrics.avg_degree, 1.0);
        assert_eq!(metrics.max_degree, 2);
    }

    #[test]
    fn test_bottleneck_factor() {
        let network = network_from(3, &[(0, 1, 10), (1, 2, 10), (0, 2, 1), (2, 0, 11)]);
        let metrics = GraphAnalyzer::new().analyze(&network);

        // Mean 8, threshold 4: only the capacity-1 edge qualifies
        assert_relative_eq!(metrics.bottleneck_factor, 0.25);
    }

    #[test]
    fn test_huge_capacities_do_not_overflow() {
        let network = network_from(
            120,
            &[(0, 1, 5), (2, 3, Capacity::MAX), (3, 4, Capacity::MAX)],
        );
        let metrics = GraphAnalyzer::new().analyze(&network);

        let max = Capacity::MAX as f64;
        assert_relative_eq!(metrics.avg_capacity, (5.0 + 2.0 * max) / 3.0, max_relative = 1e-12);
        assert_eq!(metrics.max_capacity, Capacity::MAX);
        assert!(metrics.capacity_variance.is_finite());
        assert_relative_eq!(metrics.bottleneck_factor, 1.0 / 3.0);
    }

    #[test]
    fn test_degenerate_graphs() {
        let empty = GraphAnalyzer::new().analyze(&ResidualNetwork::new(0));
        assert_eq!(empty.edges, 0);
        assert_relative_eq!(empty.density, 0.0);
        assert_relative_eq!(empty.planarity_score, 1.0);

        let pair = GraphAnalyzer::new().analyze(&network_from(2, &[(0, 1, 5)]));
        assert_relative_eq!(pair.planarity_score, 1.0);
        assert_relative_eq!(pair.bipartite_score, 0.0);
        assert!(!pair.layered_structure);
        assert_eq!(pair.min_capacity, 5);
    }

    #[test]
    fn test_planarity_score_against_euler_bound() {
        // 5 vertices: bound is 9 edges
        let sparse = network_from(5, &[(0, 1, 1), (1, 2, 1), (2, 3, 1)]);
        assert_relative_eq!(GraphAnalyzer::new().analyze(&sparse).planarity_score, 1.0 - 3.0 / 9.0);

        let complete: Vec<_> = (0..5)
            .flat_map(|u| (0..5).filter(move |&v| v != u).map(move |v| (u, v, 1)))
            .collect();
        let dense = network_from(5, &complete);
        assert_relative_eq!(GraphAnalyzer::new().analyze(&dense).planarity_score, 0.0);
    }

    #[test]
    fn test_layered_structure() {
        let chain = network_from(5, &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 4, 1)]);
        assert!(GraphAnalyzer::new().analyze(&chain).layered_structure);

        // Star from 0 only reaches depth 1
        let star = network_from(5, &[(0, 1, 1), (0, 2, 1), (0, 3, 1), (0, 4, 1)]);
        assert!(!GraphAnalyzer::new().analyze(&star).layered_structure);
    }

    #[test]
    fn test_bipartite_score_on_matching_instance() {
        let (network, _, _) = matching_network(3, 3, &[(0, 0), (0, 1), (0, 2), (1, 1), (2, 2)]);
        let metrics = GraphAnalyzer::new().analyze(&network);

        assert!(metrics.bipartite_score > 0.0);
        assert!(metrics.bipartite_score <= 1.0);
        assert_relative_eq!(metrics.unit_capacity_ratio, 1.0);
    }

    #[test]
    fn test_uniform_degrees_score_zero() {
        let cycle = network_from(4, &[(0, 1, 2), (1, 2, 2), (2, 3, 2), (3, 0, 2)]);
        let metrics = GraphAnalyzer::new().analyze(&cycle);
        assert_relative_eq!(metrics.bipartite_score, 0.0);
        assert_relative_eq!(metrics.capacity_variance, 0.0);
    }
}
