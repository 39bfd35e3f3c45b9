//! Per-phase scratch state shared by the flow solvers
//!
//! Level graphs with current-arc cursors drive the Dinic's variants; height
//! labels with per-height bucket counts drive push-relabel and ISAP. Both are
//! rebuilt from scratch by every run, never shared between graphs.
//!
//! # Mathematical Foundations
//! A labelling `h` is valid when `h(u) <= h(v) + 1` for every residual arc
//! `(u, v)`. If some height `k` holds no vertex, no vertex above `k` can reach
//! the sink in the residual graph, so all of them may jump straight to `n`
//! (the gap heuristic).

use std::collections::VecDeque;

use crate::data_structures::graph::{ResidualNetwork, VertexId};

/// Marker for vertices not reached by the current BFS
pub const UNREACHED: i32 = -1;

/// BFS levels from the source plus per-vertex current-arc cursors
#[derive(Debug, Clone)]
pub struct LevelGraph {
    /// Distance from the source, or `UNREACHED`
    pub(crate) level: Vec<i32>,
    /// Next arc to examine in each adjacency list
    pub(crate) current: Vec<usize>,
}

impl LevelGraph {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            level: vec![UNREACHED; vertex_count],
            current: vec![0; vertex_count],
        }
    }

    #[inline]
    pub fn level(&self, vertex: VertexId) -> i32 {
        self.level[vertex]
    }

    #[inline]
    pub fn reached(&self, vertex: VertexId) -> bool {
        self.level[vertex] != UNREACHED
    }

    /// Clear every level and seed the source at distance zero
    pub fn reset_levels(&mut self, source: VertexId) {
        self.level.fill(UNREACHED);
        self.level[source] = 0;
    }

    /// Rewind every current-arc cursor to the head of its list
    pub fn reset_cursors(&mut self) {
        self.current.fill(0);
    }

    /// Full BFS over arcs with positive residual capacity
    ///
    /// Returns whether the sink was reached.
    pub fn build_sequential(
        &mut self,
        network: &ResidualNetwork,
        source: VertexId,
        sink: VertexId,
    ) -> bool {
        self.reset_levels(source);
        let mut queue = VecDeque::with_capacity(network.vertex_count());
        queue.push_back(source);

        while let Some(vertex) = queue.pop_front() {
            let next_level = self.level[vertex] + 1;
            for edge in network.edges_from(vertex) {
                if self.level[edge.to] == UNREACHED && edge.residual() > 0 {
                    self.level[edge.to] = next_level;
                    queue.push_back(edge.to);
                }
            }
        }

        self.reached(sink)
    }

    /// Whether the arc at `(from, index)` belongs to the level graph
    #[inline]
    pub fn is_admissible(&self, network: &ResidualNetwork, from: VertexId, index: usize) -> bool {
        let edge = network.edge(from, index);
        self.level[edge.to] == self.level[from] + 1 && edge.residual() > 0
    }
}

/// Vertex heights with bucket counts for gap detection
#[derive(Debug, Clone, Default)]
pub struct HeightLabels {
    height: Vec<usize>,
    /// Number of vertices at each height, sized `2n + 1`
    count: Vec<usize>,
    max_height: usize,
    vertex_count: usize,
    gap_enabled: bool,
}

impl HeightLabels {
    /// Push-relabel start: every vertex at 0 except the source at `n`
    pub fn for_preflow(vertex_count: usize, source: VertexId, gap_enabled: bool) -> Self {
        let mut height = vec![0; vertex_count];
        let mut count = vec![0; 2 * vertex_count + 1];
        height[source] = vertex_count;
        count[0] = vertex_count - 1;
        count[vertex_count] = 1;

        Self {
            height,
            count,
            max_height: vertex_count,
            vertex_count,
            gap_enabled,
        }
    }

    /// Exact distances to `sink` by reverse BFS; unreachable vertices sit at `n`
    pub fn from_sink_distances(
        network: &ResidualNetwork,
        sink: VertexId,
        gap_enabled: bool,
    ) -> Self {
        let vertex_count = network.vertex_count();
        let mut height = vec![vertex_count; vertex_count];
        height[sink] = 0;

        let mut queue = VecDeque::with_capacity(vertex_count);
        queue.push_back(sink);
        while let Some(vertex) = queue.pop_front() {
            for edge in network.edges_from(vertex) {
                // The twin runs from `edge.to` back into `vertex`
                let twin = network.edge(edge.to, edge.reverse);
                if height[edge.to] == vertex_count && twin.residual() > 0 {
                    height[edge.to] = height[vertex] + 1;
                    queue.push_back(edge.to);
                }
            }
        }

        let mut count = vec![0; 2 * vertex_count + 1];
        for &h in &height {
            count[h] += 1;
        }
        let max_height = height.iter().copied().max().unwrap_or(0);

        Self {
            height,
            count,
            max_height,
            vertex_count,
            gap_enabled,
        }
    }

    #[inline]
    pub fn height(&self, vertex: VertexId) -> usize {
        self.height[vertex]
    }

    #[inline]
    pub fn max_height(&self) -> usize {
        self.max_height
    }

    #[inline]
    pub fn count_at(&self, height: usize) -> usize {
        self.count[height]
    }

    /// Move `vertex` to `new_height`, returning the emptied height if it opens a gap
    pub fn relabel(&mut self, vertex: VertexId, new_height: usize) -> Option<usize> {
        let old_height = self.height[vertex];
        debug_assert!(
            new_height > old_height,
            "relabel of {vertex} must raise its height ({old_height} -> {new_height})"
        );

        self.count[old_height] -= 1;
        self.height[vertex] = new_height;
        self.count[new_height] += 1;
        self.max_height = self.max_height.max(new_height);

        let opens_gap = self.gap_enabled
            && self.count[old_height] == 0
            && old_height < self.max_height
            && old_height < self.vertex_count;
        opens_gap.then_some(old_height)
    }

    /// Promote every vertex strictly between `gap` and `n` to `n`
    ///
    /// Returns the number of promoted vertices.
    pub fn apply_gap(&mut self, gap: usize) -> usize {
        let unreachable = self.vertex_count;
        let mut promoted = 0;

        for h in self.height.iter_mut() {
            if *h > gap && *h < unreachable {
                self.count[*h] -= 1;
                *h = unreachable;
                self.count[unreachable] += 1;
                promoted += 1;
            }
        }
        for bucket in &mut self.count[gap + 1..unreachable] {
            *bucket = 0;
        }

        promoted
    }

    /// Lowest label among residual out-neighbours of `vertex`, plus one
    pub fn min_neighbour_height(&self, network: &ResidualNetwork, vertex: VertexId) -> Option<usize> {
        network
            .edges_from(vertex)
            .iter()
            .filter(|edge| edge.residual() > 0)
            .map(|edge| self.height[edge.to] + 1)
            .min()
    }

    /// Check `h(u) <= h(v) + 1` on every residual arc between labelled vertices below `n`
    #[cfg(test)]
    pub(crate) fn is_valid_labelling(&self, network: &ResidualNetwork) -> bool {
        (0..self.vertex_count).all(|u| {
            self.height[u] >= self.vertex_count
                || network
                    .edges_from(u)
                    .iter()
                    .filter(|edge| edge.residual() > 0)
                    .all(|edge| self.height[u] <= self.height[edge.to] + 1)
        })
    }
}
