//! Shared fixtures for unit tests: seeded graph generators and flow checkers

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data_structures::graph::{Capacity, ResidualNetwork, VertexId};
use crate::engine::Graph;

pub(crate) type EdgeList = Vec<(VertexId, VertexId, Capacity)>;

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn network_from(vertices: usize, edges: &[(VertexId, VertexId, Capacity)]) -> ResidualNetwork {
    let mut network = ResidualNetwork::new(vertices);
    for &(from, to, capacity) in edges {
        network.add_edge(from, to, capacity).unwrap();
    }
    network
}

pub(crate) fn graph_from(vertices: usize, edges: &[(VertexId, VertexId, Capacity)]) -> Graph {
    let mut graph = Graph::new(vertices);
    for &(from, to, capacity) in edges {
        graph.add_edge(from, to, capacity).unwrap();
    }
    graph
}

/// Sparse random digraph: `out_degree` edges per vertex, capacities in `1..=max_capacity`
pub(crate) fn random_edges(
    vertices: usize,
    out_degree: usize,
    max_capacity: Capacity,
    seed: u64,
) -> EdgeList {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = Vec::with_capacity(vertices * out_degree);
    for from in 0..vertices {
        for _ in 0..out_degree {
            let mut to = rng.gen_range(0..vertices);
            if to == from {
                to = (to + 1) % vertices;
            }
            edges.push((from, to, rng.gen_range(1..=max_capacity)));
        }
    }
    edges
}

/// Random digraph with edge probability `density`
pub(crate) fn dense_edges(vertices: usize, density: f64, max_capacity: Capacity, seed: u64) -> EdgeList {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = Vec::new();
    for from in 0..vertices {
        for to in 0..vertices {
            if from != to && rng.gen_bool(density) {
                edges.push((from, to, rng.gen_range(1..=max_capacity)));
            }
        }
    }
    edges
}

/// Bipartite matching instance: source 0, left `1..=left`, right after, sink last
pub(crate) fn matching_edges(left: usize, right: usize, adjacency: &[(usize, usize)]) -> (usize, EdgeList) {
    let sink = left + right + 1;
    let mut edges = Vec::new();
    for l in 0..left {
        edges.push((0, 1 + l, 1));
    }
    for &(l, r) in adjacency {
        edges.push((1 + l, 1 + left + r, 1));
    }
    for r in 0..right {
        edges.push((1 + left + r, sink, 1));
    }
    (sink + 1, edges)
}

pub(crate) fn matching_network(
    left: usize,
    right: usize,
    adjacency: &[(usize, usize)],
) -> (ResidualNetwork, VertexId, VertexId) {
    let (vertices, edges) = matching_edges(left, right, adjacency);
    (network_from(vertices, &edges), 0, vertices - 1)
}

/// Check conservation, capacity bounds, twin symmetry and the min-cut certificate
pub(crate) fn assert_valid_max_flow(
    network: &ResidualNetwork,
    source: VertexId,
    sink: VertexId,
    value: Capacity,
) {
    network.check_invariants().unwrap();

    for edge in network.original_edges() {
        assert!(
            0 <= edge.flow && edge.flow <= edge.capacity,
            "edge {} -> {} carries {} of {}",
            edge.from,
            edge.to,
            edge.flow,
            edge.capacity
        );
    }

    for vertex in 0..network.vertex_count() {
        if vertex != source && vertex != sink {
            assert_eq!(network.net_outflow(vertex), 0, "conservation broken at {vertex}");
        }
    }
    assert_eq!(network.net_outflow(source), value);
    assert_eq!(network.net_outflow(sink), -value);

    let cut = network.min_cut(source).unwrap();
    assert!(!cut.contains(sink), "sink still reachable after max flow");
    assert_eq!(cut.capacity, value, "cut capacity differs from flow value");
}
