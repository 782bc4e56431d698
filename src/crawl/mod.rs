// src/crawl/mod.rs
// =============================================================================
// This module builds a link graph by crawling.
//
// Features:
// - Breadth-first traversal from a seed title, layer by layer
// - Depth limit plus an optional alphabetic cutoff
// - Deny-list filtering of citation/identifier plumbing pages
// - Fetch failures are skipped, not fatal, and reported back
// - Final pruning: self-loops removed, degree >= 2 core kept
//
// The crawl is fully sequential: one page is fetched and processed at a
// time, and the frontier queue has exactly one reader and writer.
// =============================================================================

mod builder;

// Re-export the public API
pub use builder::{build_graph, CrawlConfig, CrawlReport};
