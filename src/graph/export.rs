// src/graph/export.rs
// =============================================================================
// This module exports a link graph in Graphviz DOT format.
//
// We don't render anything ourselves. Drawing a thousand-node graph well
// is a job for dedicated layout engines, so we hand off a .dot file and
// let Graphviz do the work:
//
//   wikigraph crawl "Missouri S&T" --dot graph.dot
//   sfdp -Tsvg graph.dot -o graph.svg
//
// petgraph ships a Dot wrapper that formats any graph, so the export is
// a direct call into the library.
// =============================================================================

use crate::graph::LinkGraph;
use anyhow::{Context, Result};
use petgraph::dot::{Config, Dot};
use std::path::Path;

// Formats the graph as a DOT document
//
// Node labels are the page titles; edge labels are suppressed since our
// edges carry no data worth printing
pub fn to_dot(graph: &LinkGraph) -> String {
    format!(
        "{:?}",
        Dot::with_config(graph.inner(), &[Config::EdgeNoLabel])
    )
}

// Writes the DOT document to a file
pub fn write_dot(graph: &LinkGraph, path: &Path) -> Result<()> {
    std::fs::write(path, to_dot(graph))
        .with_context(|| format!("Failed to write DOT file to {}", path.display()))
}
