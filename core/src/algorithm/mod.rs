//! Maximum flow algorithm framework
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod traits;
pub mod state;
pub mod graph;

pub use self::traits::*;
pub use self::graph::*;
