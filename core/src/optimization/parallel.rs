//! Bounded worker pool for wave-parallel level-graph construction
//!
//! Only breadth-first level assignment runs in parallel. Each BFS wave (one
//! distance level) is split into contiguous chunks of the frontier, one chunk
//! per task; the scope join at the end of the wave is the barrier before the
//! next wave begins.
//!
//! # Synchronization
//! - Workers read the residual network through a shared reference
//! - Discovered vertices are claimed check-then-set under a single mutex that
//!   also guards the level array and the next-frontier buffer
//! - Candidate neighbours are gathered lock-free per chunk, so contention is
//!   limited to one lock acquisition per chunk

use std::sync::{Arc, Mutex, PoisonError};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::algorithm::state::{LevelGraph, UNREACHED};
use crate::data_structures::graph::{ResidualNetwork, VertexId};

/// Lazily built, graph-owned worker pool
#[derive(Debug)]
pub struct WorkerPool {
    /// Configured worker count
    threads: usize,
    /// Pool handle, built on first parallel phase
    pool: Option<Arc<ThreadPool>>,
    /// Set once a build attempt has failed; further phases stay sequential
    unavailable: bool,
}

impl WorkerPool {
    /// Create a pool description; `None` sizes it to the logical CPU count
    pub fn new(threads: Option<usize>) -> Self {
        Self {
            threads: threads.unwrap_or_else(num_cpus::get).max(1),
            pool: None,
            unavailable: false,
        }
    }

    #[inline]
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Pool handle, building it on first use
    pub fn handle(&mut self) -> Option<Arc<ThreadPool>> {
        if self.unavailable {
            return None;
        }
        if self.pool.is_none() {
            let built = ThreadPoolBuilder::new()
                .num_threads(self.threads)
                .thread_name(|index| format!("flow-bfs-{index}"))
                .build();
            match built {
                Ok(pool) => {
                    log::debug!("Worker pool started with {} threads", self.threads);
                    self.pool = Some(Arc::new(pool));
                }
                Err(err) => {
                    log::warn!("Worker pool unavailable, using sequential BFS: {}", err);
                    self.unavailable = true;
                    return None;
                }
            }
        }
        self.pool.clone()
    }
}

/// A clone keeps the sizing but builds its own pool on first use
impl Clone for WorkerPool {
    fn clone(&self) -> Self {
        Self::new(Some(self.threads))
    }
}

/// Outcome of one parallel level construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveReport {
    /// Whether the sink received a level
    pub sink_reached: bool,
    /// Number of waves processed
    pub waves: usize,
}

/// Lock-protected state written by workers during one wave
struct WaveState<'a> {
    level: &'a mut [i32],
    visited: &'a mut [bool],
    next: Vec<VertexId>,
    sink_reached: bool,
}

/// Assign BFS levels from `source`, one wave at a time, on `pool`
///
/// Stops after the wave that reaches `sink`; vertices beyond it keep
/// `UNREACHED`, which no blocking-flow search will need.
pub fn build_level_graph(
    pool: &ThreadPool,
    network: &ResidualNetwork,
    source: VertexId,
    sink: VertexId,
    levels: &mut LevelGraph,
) -> WaveReport {
    levels.reset_levels(source);
    let mut visited = vec![false; network.vertex_count()];
    visited[source] = true;

    let workers = pool.current_num_threads().max(1);
    let mut frontier = vec![source];
    let mut depth = 0;
    let mut waves = 0;
    let mut sink_reached = source == sink;

    while !frontier.is_empty() && !sink_reached {
        depth += 1;
        waves += 1;

        let chunk_size = (frontier.len() / workers).max(1);
        let shared = Mutex::new(WaveState {
            level: &mut levels.level,
            visited: &mut visited,
            next: Vec::with_capacity(frontier.len()),
            sink_reached: false,
        });

        pool.scope(|scope| {
            for chunk in frontier.chunks(chunk_size) {
                let shared = &shared;
                scope.spawn(move |_| expand_chunk(network, chunk, depth, sink, shared));
            }
        });

        let state = shared.into_inner().unwrap_or_else(PoisonError::into_inner);
        sink_reached = state.sink_reached;
        frontier = state.next;
    }

    WaveReport { sink_reached, waves }
}

fn expand_chunk(
    network: &ResidualNetwork,
    chunk: &[VertexId],
    depth: i32,
    sink: VertexId,
    shared: &Mutex<WaveState<'_>>,
) {
    let candidates: Vec<VertexId> = chunk
        .iter()
        .flat_map(|&vertex| network.edges_from(vertex))
        .filter(|edge| edge.residual() > 0)
        .map(|edge| edge.to)
        .collect();
    if candidates.is_empty() {
        return;
    }

    let mut state = shared.lock().unwrap_or_else(PoisonError::into_inner);
    for vertex in candidates {
        if !state.visited[vertex] {
            state.visited[vertex] = true;
            debug_assert_eq!(state.level[vertex], UNREACHED);
            state.level[vertex] = depth;
            state.next.push(vertex);
            if vertex == sink {
                state.sink_reached = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{network_from, random_edges};

    #[test]
    fn test_pool_defaults_to_cpu_count() {
        let pool = WorkerPool::new(None);
        assert_eq!(pool.threads(), num_cpus::get().max(1));
        assert_eq!(WorkerPool::new(Some(3)).threads(), 3);
    }

    #[test]
    fn test_pool_is_built_once() {
        let mut pool = WorkerPool::new(Some(2));
        let first = pool.handle().unwrap();
        let second = pool.handle().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.current_num_threads(), 2);
    }

    #[test]
    fn test_clone_owns_a_separate_pool() {
        let mut pool = WorkerPool::new(Some(2));
        let original = pool.handle().unwrap();

        let mut copy = pool.clone();
        assert_eq!(copy.threads(), 2);
        let copied = copy.handle().unwrap();

        assert!(!Arc::ptr_eq(&original, &copied));
        assert!(Arc::ptr_eq(&original, &pool.handle().unwrap()));
    }

    #[test]
    fn test_parallel_levels_match_sequential_up_to_sink() {
        let n = 2000;
        let network = network_from(n, &random_edges(n, 4, 10, 7));
        let sink = n - 1;

        let mut sequential = LevelGraph::new(n);
        let reached = sequential.build_sequential(&network, 0, sink);

        let mut pool = WorkerPool::new(Some(4));
        let handle = pool.handle().unwrap();
        let mut parallel = LevelGraph::new(n);
        let report = build_level_graph(&handle, &network, 0, sink, &mut parallel);

        assert_eq!(report.sink_reached, reached);
        assert_eq!(parallel.level(sink), sequential.level(sink));
        for v in 0..n {
            if parallel.reached(v) {
                assert_eq!(parallel.level(v), sequential.level(v), "vertex {v}");
            } else if reached {
                assert!(!sequential.reached(v) || sequential.level(v) >= sequential.level(sink));
            }
        }
    }

    #[test]
    fn test_unreachable_sink() {
        let network = network_from(4, &[(0, 1, 3), (2, 3, 3)]);
        let mut pool = WorkerPool::new(Some(2));
        let handle = pool.handle().unwrap();
        let mut levels = LevelGraph::new(4);

        let report = build_level_graph(&handle, &network, 0, 3, &mut levels);

        assert!(!report.sink_reached);
        assert_eq!(report.waves, 2);
        assert_eq!(levels.level(1), 1);
        assert!(!levels.reached(3));
    }
}
