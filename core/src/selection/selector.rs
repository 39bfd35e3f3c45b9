//! Heuristic algorithm selection
//!
//! Each candidate algorithm gets an independent, non-negative suitability
//! score computed from `GraphAnalysisMetrics`. The highest score wins; equal
//! scores resolve to the kind listed first in `AlgorithmKind::ALL`, so the
//! choice is deterministic for a given graph and configuration.
//!
//! Graphs below the small-graph threshold skip analysis entirely and run
//! Standard Dinic's.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt::{self, Display};

use serde::{Serialize, Deserialize};

use crate::algorithm::traits::AlgorithmKind;
use crate::config::EngineConfig;
use crate::data_structures::graph::ResidualNetwork;
use crate::selection::analyzer::{GraphAnalysisMetrics, GraphAnalyzer};

/// Density at which the ISAP score peaks
const ISAP_SWEET_SPOT_DENSITY: f64 = 0.1;

/// Unit-capacity ratio above which push-relabel is penalized
const PUSH_RELABEL_UNIT_PENALTY_RATIO: f64 = 0.7;

/// Structural class assigned to a graph after selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphClass {
    Small,
    Sparse,
    Dense,
    UnitCapacity,
    Planar,
}

impl Display for GraphClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GraphClass::Small => "Small",
            GraphClass::Sparse => "Sparse",
            GraphClass::Dense => "Dense",
            GraphClass::UnitCapacity => "Unit Capacity",
            GraphClass::Planar => "Planar",
        };
        f.write_str(name)
    }
}

/// Result of selecting an algorithm for one graph
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub algorithm: AlgorithmKind,
    pub class: GraphClass,
    /// Metrics behind the choice; `None` on the small-graph fast path
    pub metrics: Option<GraphAnalysisMetrics>,
}

/// Score-based selector parameterized by engine thresholds
#[derive(Debug, Clone)]
pub struct AlgorithmSelector {
    small_graph_threshold: usize,
    unit_capacity_ratio: f64,
    dense_graph_ratio: f64,
    planar_score_threshold: f64,
}

impl AlgorithmSelector {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            small_graph_threshold: config.small_graph_threshold,
            unit_capacity_ratio: config.unit_capacity_ratio,
            dense_graph_ratio: config.dense_graph_ratio,
            planar_score_threshold: config.planar_score_threshold,
        }
    }

    /// Choose an algorithm for `network`, analyzing it only when it is large enough
    pub fn select_for(&self, network: &ResidualNetwork) -> Selection {
        if network.vertex_count() < self.small_graph_threshold {
            log::trace!(
                "Small graph ({} vertices): skipping analysis",
                network.vertex_count()
            );
            return Selection {
                algorithm: AlgorithmKind::StandardDinic,
                class: GraphClass::Small,
                metrics: None,
            };
        }

        let metrics = GraphAnalyzer::new().analyze(network);
        let algorithm = self.select(&metrics);
        let class = self.classify(algorithm, &metrics);
        Selection { algorithm, class, metrics: Some(metrics) }
    }

    /// Highest-scoring kind for `metrics`
    pub fn select(&self, metrics: &GraphAnalysisMetrics) -> AlgorithmKind {
        let scores = self.scores(metrics);
        let selected = best_of(&scores);
        log::debug!("Algorithm scores {:?}; selected {}", scores, selected);
        selected
    }

    /// Score every kind, in tie-break order
    pub fn scores(&self, metrics: &GraphAnalysisMetrics) -> [(AlgorithmKind, f64); 5] {
        AlgorithmKind::ALL.map(|kind| (kind, self.score(kind, metrics)))
    }

    pub fn score(&self, kind: AlgorithmKind, metrics: &GraphAnalysisMetrics) -> f64 {
        let score = match kind {
            AlgorithmKind::StandardDinic => self.score_standard(metrics),
            AlgorithmKind::AdaptiveDinic => score_adaptive(metrics),
            AlgorithmKind::PushRelabel => score_push_relabel(metrics),
            AlgorithmKind::Isap => score_isap(metrics),
            AlgorithmKind::UnitCapacity => self.score_unit_capacity(metrics),
        };
        score.max(0.0)
    }

    /// Structural class implied by the chosen algorithm
    pub fn classify(&self, kind: AlgorithmKind, metrics: &GraphAnalysisMetrics) -> GraphClass {
        let dense_or_sparse = if metrics.density >= self.dense_graph_ratio {
            GraphClass::Dense
        } else {
            GraphClass::Sparse
        };

        match kind {
            AlgorithmKind::StandardDinic => GraphClass::Small,
            AlgorithmKind::UnitCapacity => GraphClass::UnitCapacity,
            AlgorithmKind::PushRelabel => GraphClass::Dense,
            AlgorithmKind::AdaptiveDinic if metrics.planarity_score > self.planar_score_threshold => {
                GraphClass::Planar
            }
            AlgorithmKind::AdaptiveDinic | AlgorithmKind::Isap => dense_or_sparse,
        }
    }

    fn score_standard(&self, metrics: &GraphAnalysisMetrics) -> f64 {
        let mut score = 100.0;
        if metrics.vertices < self.small_graph_threshold {
            score += 200.0;
        } else {
            score -= metrics.vertices as f64 / 10.0;
        }
        if metrics.capacity_variance < 5.0 {
            score += 50.0;
        }
        score
    }

    fn score_unit_capacity(&self, metrics: &GraphAnalysisMetrics) -> f64 {
        if metrics.unit_capacity_ratio <= self.unit_capacity_ratio {
            return 0.0;
        }
        300.0
            + (metrics.unit_capacity_ratio - self.unit_capacity_ratio) * 500.0
            + metrics.bipartite_score * 100.0
    }
}

fn score_adaptive(metrics: &GraphAnalysisMetrics) -> f64 {
    let mut score = 100.0 + (1.0 - metrics.density) * 150.0 + metrics.planarity_score * 80.0;
    if metrics.capacity_variance > 10.0 {
        score += 60.0;
    }
    if metrics.vertices < 50 {
        score -= 100.0;
    }
    score
}

fn score_push_relabel(metrics: &GraphAnalysisMetrics) -> f64 {
    let mut score = 100.0 + metrics.density * 200.0;
    if metrics.max_degree > metrics.vertices / 4 {
        score += 100.0;
    }
    if metrics.vertices > 200 {
        score += 80.0;
    }
    if metrics.unit_capacity_ratio > PUSH_RELABEL_UNIT_PENALTY_RATIO {
        score -= 120.0;
    }
    score
}

fn score_isap(metrics: &GraphAnalysisMetrics) -> f64 {
    let closeness =
        1.0 - (metrics.density - ISAP_SWEET_SPOT_DENSITY).abs() / ISAP_SWEET_SPOT_DENSITY;
    let mut score = 100.0 + closeness * 120.0;
    if metrics.layered_structure {
        score += 90.0;
    }
    score + metrics.bottleneck_factor * 70.0
}

/// First kind holding the maximum score; later kinds must be strictly better
fn best_of(scores: &[(AlgorithmKind, f64)]) -> AlgorithmKind {
    let mut best = scores[0];
    for &candidate in &scores[1..] {
        if candidate.1 > best.1 {
            best = candidate;
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{network_from, random_edges};

    fn selector() -> AlgorithmSelector {
        AlgorithmSelector::new(&EngineConfig::default())
    }

    fn metrics(vertices: usize, edges: usize) -> GraphAnalysisMetrics {
        GraphAnalysisMetrics {
            vertices,
            edges,
            density: edges as f64 / (vertices as f64 * vertices as f64),
            ..GraphAnalysisMetrics::default()
        }
    }

    #[test]
    fn test_unit_capacity_graph_selects_unit_solver() {
        let m = GraphAnalysisMetrics {
            unit_capacity_ratio: 1.0,
            bipartite_score: 0.5,
            ..metrics(500, 2000)
        };
        assert_eq!(selector().select(&m), AlgorithmKind::UnitCapacity);
        assert_eq!(selector().classify(AlgorithmKind::UnitCapacity, &m), GraphClass::UnitCapacity);
    }

    #[test]
    fn test_unit_score_requires_ratio_above_threshold() {
        let at_threshold = GraphAnalysisMetrics { unit_capacity_ratio: 0.8, ..metrics(500, 2000) };
        assert_eq!(selector().score(AlgorithmKind::UnitCapacity, &at_threshold), 0.0);
    }

    #[test]
    fn test_dense_graph_selects_push_relabel() {
        let m = GraphAnalysisMetrics {
            max_degree: 200,
            capacity_variance: 100.0,
            ..metrics(300, 45_000)
        };
        assert_eq!(selector().select(&m), AlgorithmKind::PushRelabel);
        assert_eq!(selector().classify(AlgorithmKind::PushRelabel, &m), GraphClass::Dense);
    }

    #[test]
    fn test_large_sparse_graph_selects_adaptive() {
        let m = GraphAnalysisMetrics {
            max_degree: 10,
            capacity_variance: 50.0,
            planarity_score: 1.0 - 4000.0 / 5994.0,
            layered_structure: true,
            bottleneck_factor: 0.2,
            ..metrics(2000, 4000)
        };
        assert_eq!(selector().select(&m), AlgorithmKind::AdaptiveDinic);
        assert_eq!(selector().classify(AlgorithmKind::AdaptiveDinic, &m), GraphClass::Sparse);
    }

    #[test]
    fn test_layered_medium_density_selects_isap() {
        let m = GraphAnalysisMetrics {
            max_degree: 20,
            capacity_variance: 2.0,
            layered_structure: true,
            bottleneck_factor: 0.5,
            ..metrics(150, 2250)
        };
        assert_eq!(selector().select(&m), AlgorithmKind::Isap);
        assert_eq!(selector().classify(AlgorithmKind::Isap, &m), GraphClass::Sparse);
    }

    #[test]
    fn test_classification_thresholds() {
        let planar = GraphAnalysisMetrics { planarity_score: 0.9, ..metrics(1000, 100) };
        assert_eq!(selector().classify(AlgorithmKind::AdaptiveDinic, &planar), GraphClass::Planar);

        let dense = metrics(100, 5000);
        assert_eq!(selector().classify(AlgorithmKind::AdaptiveDinic, &dense), GraphClass::Dense);
        assert_eq!(selector().classify(AlgorithmKind::Isap, &dense), GraphClass::Dense);
        assert_eq!(selector().classify(AlgorithmKind::StandardDinic, &dense), GraphClass::Small);
    }

    #[test]
    fn test_scores_are_non_negative() {
        // Density far from the ISAP sweet spot drives its raw score negative
        let m = GraphAnalysisMetrics { unit_capacity_ratio: 0.9, ..metrics(10, 100) };
        for (kind, score) in selector().scores(&m) {
            assert!(score >= 0.0, "{kind} scored {score}");
        }
        assert_eq!(selector().score(AlgorithmKind::Isap, &m), 0.0);
    }

    #[test]
    fn test_ties_resolve_in_priority_order() {
        let tied = [
            (AlgorithmKind::StandardDinic, 10.0),
            (AlgorithmKind::AdaptiveDinic, 250.0),
            (AlgorithmKind::PushRelabel, 250.0),
            (AlgorithmKind::Isap, 100.0),
            (AlgorithmKind::UnitCapacity, 250.0),
        ];
        assert_eq!(best_of(&tied), AlgorithmKind::AdaptiveDinic);

        let all_zero = AlgorithmKind::ALL.map(|kind| (kind, 0.0));
        assert_eq!(best_of(&all_zero), AlgorithmKind::StandardDinic);
    }

    #[test]
    fn test_small_graph_fast_path_skips_analysis() {
        let network = network_from(4, &[(0, 1, 1), (1, 2, 1), (2, 3, 1)]);
        let selection = selector().select_for(&network);

        assert_eq!(selection.algorithm, AlgorithmKind::StandardDinic);
        assert_eq!(selection.class, GraphClass::Small);
        assert!(selection.metrics.is_none());
    }

    #[test]
    fn test_large_graph_is_analyzed() {
        let network = network_from(400, &random_edges(400, 4, 100, 1));
        let selection = selector().select_for(&network);

        let metrics = selection.metrics.expect("large graphs are analyzed");
        assert_eq!(metrics.vertices, 400);
        assert_eq!(selection.algorithm, selector().select(&metrics));
        assert_ne!(selection.class, GraphClass::Small);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let network = network_from(300, &random_edges(300, 6, 20, 9));
        let first = selector().select_for(&network);
        for _ in 0..5 {
            assert_eq!(selector().select_for(&network), first);
        }
    }
}
