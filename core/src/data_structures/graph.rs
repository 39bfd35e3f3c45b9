//! Residual graph storage for maximum-flow computation
//!
//! Arena-style adjacency lists in which every inserted arc owns a paired
//! reverse arc. Twins refer to one another by index into the neighbour's
//! list, so no pointers or lifetimes cross between vertices.
//!
//! # Invariants
//! - `flow(e) == -flow(reverse(e))` for every arc
//! - `capacity(e) - flow(e) >= 0` for every arc
//! - Vertices and arcs are never removed once inserted
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::VecDeque;

use serde::{Serialize, Deserialize};

use crate::algorithm::traits::FlowError;

/// Vertex identifier (dense, `0..vertex_count`)
pub type VertexId = usize;

/// Capacity and flow type
pub type Capacity = i64;

/// Stable handle to an inserted arc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeRef {
    /// Tail vertex owning the adjacency list
    pub from: VertexId,
    /// Position within `from`'s adjacency list
    pub index: usize,
}

/// Residual arc
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Head vertex
    pub to: VertexId,
    /// Capacity (zero for reverse arcs)
    pub capacity: Capacity,
    /// Current flow, negative on reverse arcs carrying cancellation room
    pub flow: Capacity,
    /// Index of the twin within `to`'s adjacency list
    pub reverse: usize,
    /// True for caller-inserted arcs, false for their reverse twins
    pub is_original: bool,
}

impl Edge {
    /// Remaining capacity on this arc
    #[inline]
    pub fn residual(&self) -> Capacity {
        let residual = self.capacity - self.flow;
        debug_assert!(residual >= 0, "negative residual capacity {residual} on arc to {}", self.to);
        residual
    }
}

/// Flow snapshot of one original edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeFlow {
    pub edge: EdgeRef,
    pub from: VertexId,
    pub to: VertexId,
    pub capacity: Capacity,
    pub flow: Capacity,
}

/// Source side of an s-t cut together with its capacity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinCut {
    /// `source_side[v]` is true when `v` is residually reachable from the source
    pub source_side: Vec<bool>,
    /// Sum of original capacities leaving the source side
    pub capacity: Capacity,
}

impl MinCut {
    pub fn contains(&self, vertex: VertexId) -> bool {
        self.source_side.get(vertex).copied().unwrap_or(false)
    }
}

/// Residual network with paired forward/reverse arcs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResidualNetwork {
    /// Adjacency list indexed by vertex
    adjacency: Vec<Vec<Edge>>,
    /// Number of vertices
    vertex_count: usize,
    /// Number of original (caller-inserted) edges
    edge_count: usize,
}

impl ResidualNetwork {
    /// Create an empty network over `vertex_count` vertices
    pub fn new(vertex_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); vertex_count],
            vertex_count,
            edge_count: 0,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of original edges (reverse twins are not counted)
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Add a directed edge together with its zero-capacity reverse twin
    pub fn add_edge(
        &mut self,
        from: VertexId,
        to: VertexId,
        capacity: Capacity,
    ) -> Result<EdgeRef, FlowError> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        if capacity < 0 {
            return Err(FlowError::NegativeCapacity { from, to, capacity });
        }

        let forward_index = self.adjacency[from].len();
        // A self-loop stores both arcs in the same list
        let reverse_index = if from == to {
            forward_index + 1
        } else {
            self.adjacency[to].len()
        };

        self.adjacency[from].push(Edge {
            to,
            capacity,
            flow: 0,
            reverse: reverse_index,
            is_original: true,
        });
        self.adjacency[to].push(Edge {
            to: from,
            capacity: 0,
            flow: 0,
            reverse: forward_index,
            is_original: false,
        });
        self.edge_count += 1;

        Ok(EdgeRef { from, index: forward_index })
    }

    /// Arcs leaving `vertex`, reverse twins included
    #[inline]
    pub fn edges_from(&self, vertex: VertexId) -> &[Edge] {
        &self.adjacency[vertex]
    }

    #[inline]
    pub fn edge(&self, from: VertexId, index: usize) -> &Edge {
        &self.adjacency[from][index]
    }

    /// Look up an arc by handle
    pub fn get(&self, edge: EdgeRef) -> Option<&Edge> {
        self.adjacency.get(edge.from).and_then(|list| list.get(edge.index))
    }

    /// Residual capacity of the arc at `(from, index)`
    #[inline]
    pub fn residual(&self, from: VertexId, index: usize) -> Capacity {
        self.adjacency[from][index].residual()
    }

    /// Move `amount` units along the arc at `(from, index)`, updating its twin
    #[inline]
    pub(crate) fn push_flow(&mut self, from: VertexId, index: usize, amount: Capacity) {
        debug_assert!(amount >= 0, "negative push {amount}");
        let (to, reverse) = {
            let edge = &mut self.adjacency[from][index];
            edge.flow += amount;
            debug_assert!(
                edge.flow <= edge.capacity,
                "push of {amount} overflows arc {from} -> {}",
                edge.to
            );
            (edge.to, edge.reverse)
        };
        let twin = &mut self.adjacency[to][reverse];
        twin.flow -= amount;
        debug_assert_eq!(twin.reverse, index, "twin of {from}[{index}] points elsewhere");
    }

    /// Iterate over original edges with their current flow
    pub fn original_edges(&self) -> impl Iterator<Item = EdgeFlow> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(from, list)| {
            list.iter()
                .enumerate()
                .filter(|(_, edge)| edge.is_original)
                .map(move |(index, edge)| EdgeFlow {
                    edge: EdgeRef { from, index },
                    from,
                    to: edge.to,
                    capacity: edge.capacity,
                    flow: edge.flow,
                })
        })
    }

    /// Zero every flow value, restoring the freshly built network
    pub fn reset_flow(&mut self) {
        for edge in self.adjacency.iter_mut().flatten() {
            edge.flow = 0;
        }
    }

    /// Net flow leaving `vertex` (outflow minus inflow)
    pub fn net_outflow(&self, vertex: VertexId) -> Capacity {
        // Reverse arcs carry the negated flow of their twin, so summing every
        // arc in the list yields outflow minus inflow.
        self.adjacency[vertex].iter().map(|edge| edge.flow).sum()
    }

    /// Residual reachability cut from `source`
    pub fn min_cut(&self, source: VertexId) -> Result<MinCut, FlowError> {
        self.check_vertex(source)?;

        let mut source_side = vec![false; self.vertex_count];
        source_side[source] = true;
        let mut queue = VecDeque::from([source]);

        while let Some(vertex) = queue.pop_front() {
            for edge in &self.adjacency[vertex] {
                if !source_side[edge.to] && edge.residual() > 0 {
                    source_side[edge.to] = true;
                    queue.push_back(edge.to);
                }
            }
        }

        let capacity = self
            .original_edges()
            .filter(|edge| source_side[edge.from] && !source_side[edge.to])
            .map(|edge| edge.capacity)
            .sum();

        Ok(MinCut { source_side, capacity })
    }

    /// Audit every arc for the residual invariants
    pub fn check_invariants(&self) -> Result<(), FlowError> {
        for (from, list) in self.adjacency.iter().enumerate() {
            for (index, edge) in list.iter().enumerate() {
                if edge.capacity - edge.flow < 0 {
                    return Err(FlowError::Invariant(format!(
                        "arc {from}[{index}] -> {} has flow {} above capacity {}",
                        edge.to, edge.flow, edge.capacity
                    )));
                }
                let twin = self
                    .adjacency
                    .get(edge.to)
                    .and_then(|twins| twins.get(edge.reverse))
                    .ok_or_else(|| {
                        FlowError::Invariant(format!("arc {from}[{index}] has a dangling twin"))
                    })?;
                if twin.to != from || twin.reverse != index {
                    return Err(FlowError::Invariant(format!(
                        "arc {from}[{index}] and its twin disagree on pairing"
                    )));
                }
                if twin.flow != -edge.flow {
                    return Err(FlowError::Invariant(format!(
                        "arc {from}[{index}] carries {} but its twin carries {}",
                        edge.flow, twin.flow
                    )));
                }
                if twin.is_original == edge.is_original && from != edge.to {
                    return Err(FlowError::Invariant(format!(
                        "arc {from}[{index}] is paired with an arc of the same kind"
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_vertex(&self, vertex: VertexId) -> Result<(), FlowError> {
        if vertex < self.vertex_count {
            Ok(())
        } else {
            Err(FlowError::InvalidVertex { vertex, vertex_count: self.vertex_count })
        }
    }
}
