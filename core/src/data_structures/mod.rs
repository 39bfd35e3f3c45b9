//! Core graph storage

pub mod graph;

pub use self::graph::{Capacity, Edge, EdgeFlow, EdgeRef, MinCut, ResidualNetwork, VertexId};
