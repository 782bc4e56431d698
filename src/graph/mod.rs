// src/graph/mod.rs
// =============================================================================
// This module contains the link graph and everything we do with it.
//
// Submodules:
// - link_graph: the directed graph of page titles (wraps petgraph)
// - analysis: in-degree ranking and simrank similarity
// - export: Graphviz DOT output for rendering
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

// Declare submodules (tells Rust to include these files)
mod analysis;
mod export;
mod link_graph;

// Re-export public items from submodules
// This lets users write `graph::LinkGraph` instead of
// `graph::link_graph::LinkGraph`
pub use analysis::{simrank, top_indegree, SimilarPair, Similarity};
pub use export::{to_dot, write_dot};
pub use link_graph::{GraphDump, GraphStats, LinkGraph};
