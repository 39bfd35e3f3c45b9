//! Graph analysis and algorithm selection
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod analyzer;
pub mod selector;

pub use self::analyzer::{GraphAnalysisMetrics, GraphAnalyzer};
pub use self::selector::{AlgorithmSelector, GraphClass, Selection};
