//! Run bookkeeping

pub mod statistics;

pub use self::statistics::FlowStatistics;
