// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Every knob of the crawl (seed, depth, cutoff, deny behavior) is a flag
// here, so different explorations don't require editing code.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "wikigraph",
    version = "0.1.0",
    about = "A CLI tool to crawl Wikipedia's link graph and analyze it",
    long_about = "wikigraph crawls Wikipedia breadth-first from a seed page, builds the \
                  directed graph of page-to-page links, prunes it down to its degree >= 2 \
                  core, and then ranks, compares, or exports the result."
)]
pub struct Cli {
    // The #[command(subcommand)] attribute tells clap that this field
    // will hold one of the subcommands defined in the Commands enum
    #[command(subcommand)]
    pub command: Commands,
}

// Options shared by every subcommand that performs a crawl
//
// #[command(flatten)] below splices these fields into each subcommand,
// so we write them once instead of three times
#[derive(Args, Debug, Clone)]
pub struct CrawlOpts {
    /// Maximum crawl depth (0 = seed page only, 1 = seed + its links, ...)
    ///
    /// Each layer multiplies the page count considerably; depth 2 on a
    /// well-linked seed already reaches thousands of pages
    #[arg(long, default_value_t = 1)]
    pub max_depth: usize,

    /// Stop the whole crawl once a crawled (non-seed) title sorts past
    /// this value alphabetically
    ///
    /// An "enough already" stop rule for keeping crawls small: pass
    /// --cutoff C to only explore pages up to the C's
    #[arg(long)]
    pub cutoff: Option<String>,

    /// Don't fall back to search suggestions when a title doesn't exist
    #[arg(long)]
    pub no_suggest: bool,

    /// MediaWiki Action API endpoint to crawl
    #[arg(long, default_value = "https://en.wikipedia.org/w/api.php")]
    pub api_url: String,
}

// This enum defines our subcommands (crawl, similar, compare)
//
// Each variant represents a different subcommand the user can run
// The fields inside each variant become the arguments for that subcommand
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl from a seed page and report the pruned link graph
    ///
    /// Example: wikigraph crawl "Missouri S&T" --cutoff C --top 100
    Crawl {
        /// Title of the Wikipedia page to start from
        ///
        /// This is a positional argument (required, no flag needed)
        seed: String,

        #[command(flatten)]
        opts: CrawlOpts,

        /// How many pages to list in the in-degree ranking
        #[arg(long, default_value_t = 20)]
        top: usize,

        /// Write the pruned graph to this path in Graphviz DOT format
        #[arg(long)]
        dot: Option<PathBuf>,

        /// Output the full report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Crawl from a seed page and rank page pairs by simrank similarity
    ///
    /// Example: wikigraph similar "Missouri S&T" --top 10
    Similar {
        /// Title of the Wikipedia page to start from
        seed: String,

        #[command(flatten)]
        opts: CrawlOpts,

        /// How many similar pairs to list
        #[arg(long, default_value_t = 20)]
        top: usize,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Crawl from two seeds and intersect the resulting graphs
    ///
    /// Example: wikigraph compare "Missouri S&T" "Rolla, Missouri"
    Compare {
        /// Title of the first seed page
        seed_a: String,

        /// Title of the second seed page
        seed_b: String,

        #[command(flatten)]
        opts: CrawlOpts,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does #[command(flatten)] do?
//    - It splices another Args struct's fields into this subcommand
//    - All three subcommands crawl, so they share CrawlOpts; flatten keeps
//      the shared flags defined in exactly one place
//
// 2. Why Option<String> for --cutoff?
//    - The flag is genuinely optional: no cutoff means "crawl to the
//      depth limit with no alphabetic stop"
//    - clap maps a missing optional flag to None automatically
//
// 3. Why PathBuf instead of String for --dot?
//    - PathBuf is the owned type for filesystem paths
//    - clap parses it for free, and APIs like std::fs::write take paths,
//      not strings
// -----------------------------------------------------------------------------
