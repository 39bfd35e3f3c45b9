//! Parallel execution support

pub mod parallel;

pub use self::parallel::WorkerPool;
