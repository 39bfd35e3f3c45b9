//! Maximum flow solvers
//!
//! Blocking-flow (Dinic's family), push-relabel and ISAP solvers sharing the
//! `FlowAlgorithm` contract.

pub mod dinic;
pub mod isap;
pub mod push_relabel;
pub mod unit_capacity;

pub use self::dinic::{AdaptiveDinic, StandardDinic};
pub use self::isap::Isap;
pub use self::push_relabel::PushRelabel;
pub use self::unit_capacity::UnitCapacityDinic;
