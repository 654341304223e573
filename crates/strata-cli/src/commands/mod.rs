//! CLI command implementations

pub mod graph;
pub mod plan;
pub mod slots;
