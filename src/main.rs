// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Dispatch to the appropriate subcommand handler
// 3. Crawl, analyze, and print the results
// 4. Exit with proper code (0 = clean, 1 = pages skipped, 2 = error)
//
// The exit codes matter: a fetch failure during the crawl is non-fatal
// (the page is skipped and the crawl continues), which means the graph can
// be silently thinner than it should be. Exit code 1 is how a script
// caller finds out that happened.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod crawl; // src/crawl/ - the breadth-first graph builder
mod graph; // src/graph/ - link graph, analysis, DOT export
mod wiki; // src/wiki/ - MediaWiki API client

// Import items we need from our modules
use clap::Parser; // Parser trait enables the parse() method
use cli::{Cli, Commands, CrawlOpts};
use crawl::{CrawlConfig, CrawlReport};
use graph::{GraphDump, GraphStats, SimilarPair};
use serde::Serialize;
use wiki::WikiClient;

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::{anyhow, Result};

// When listing common nodes of two graphs, don't flood the terminal
const COMPARE_LISTING_LIMIT: usize = 50;

// The #[tokio::main] attribute transforms our async main into a real main
// function. It creates a tokio runtime and runs our async code inside it.
#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = crawl completed cleanly
//   Ok(1) = crawl completed but some pages failed to fetch
//   Err = unexpected error (exit code 2)
async fn run() -> Result<i32> {
    // Parse command-line arguments into our Cli struct
    // This will automatically handle --help, --version, etc.
    let cli = Cli::parse();

    // Match on which subcommand was used
    match cli.command {
        Commands::Crawl {
            seed,
            opts,
            top,
            dot,
            json,
        } => handle_crawl(&seed, &opts, top, dot.as_deref(), json).await,
        Commands::Similar {
            seed,
            opts,
            top,
            json,
        } => handle_similar(&seed, &opts, top, json).await,
        Commands::Compare {
            seed_a,
            seed_b,
            opts,
            json,
        } => handle_compare(&seed_a, &seed_b, &opts, json).await,
    }
}

// Runs one crawl with the shared options: builds the client and config,
// prints the progress banner, and hands back the report
async fn run_crawl(seed: &str, opts: &CrawlOpts) -> Result<CrawlReport> {
    if seed.trim().is_empty() {
        return Err(anyhow!("Seed title must not be empty"));
    }

    println!("🔍 Crawling Wikipedia from seed: {}", seed);
    println!("📊 Max crawl depth: {}", opts.max_depth);
    if let Some(cutoff) = &opts.cutoff {
        println!("✂️  Alphabetic cutoff: {}", cutoff);
    }

    let client = WikiClient::new(&opts.api_url, !opts.no_suggest)?;
    let config = CrawlConfig::new(opts.max_depth, opts.cutoff.clone());

    // The crawl itself never fails - fetch errors become skipped pages
    Ok(crawl::build_graph(&client, seed, &config).await)
}

// Prints the crawl summary shared by all subcommands and returns the
// exit code the crawl deserves (0 clean, 1 truncated)
fn summarize(report: &CrawlReport) -> i32 {
    println!();
    println!("📊 Summary:");
    println!("   📄 Pages fetched: {}", report.pages_fetched);
    println!(
        "   🕸️  Full graph: {} nodes, {} edges",
        report.full.node_count, report.full.edge_count
    );
    println!(
        "   ✂️  Core graph (degree >= 2): {} nodes, {} edges",
        report.graph.node_count(),
        report.graph.edge_count()
    );
    if report.skipped.is_empty() {
        println!("   ✅ No pages skipped");
        0
    } else {
        println!("   ⚠️  Skipped {} page(s):", report.skipped.len());
        for title in &report.skipped {
            println!("      - {}", title);
        }
        1
    }
}

// --- crawl subcommand --------------------------------------------------------

// JSON shape for `wikigraph crawl --json`
#[derive(Serialize)]
struct CrawlOutput {
    seed: String,
    full: GraphStats,
    core: GraphStats,
    pages_fetched: usize,
    skipped: Vec<String>,
    top_indegree: Vec<(String, usize)>,
    graph: GraphDump,
}

// Handles the 'crawl' subcommand: build the graph, rank by in-degree,
// optionally export DOT
async fn handle_crawl(
    seed: &str,
    opts: &CrawlOpts,
    top: usize,
    dot: Option<&std::path::Path>,
    json: bool,
) -> Result<i32> {
    let report = run_crawl(seed, opts).await?;

    let ranked = graph::top_indegree(&report.graph, top);

    if let Some(path) = dot {
        graph::write_dot(&report.graph, path)?;
        println!("💾 Wrote DOT file: {}", path.display());
    }

    if json {
        let output = CrawlOutput {
            seed: seed.to_string(),
            full: report.full,
            core: report.graph.stats(),
            pages_fetched: report.pages_fetched,
            skipped: report.skipped.clone(),
            top_indegree: ranked,
            graph: report.graph.dump(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(if report.skipped.is_empty() { 0 } else { 1 });
    }

    if !ranked.is_empty() {
        println!();
        println!("🏆 Top {} pages by in-degree:", ranked.len());
        print_indegree_table(&ranked);
    }

    Ok(summarize(&report))
}

// Prints the in-degree ranking as a table in the terminal
fn print_indegree_table(ranked: &[(String, usize)]) {
    println!("{:<60} {:>10}", "PAGE", "IN-DEGREE");
    println!("{}", "=".repeat(71));
    for (title, indegree) in ranked {
        println!("{:<60} {:>10}", truncate(title, 57), indegree);
    }
}

// --- similar subcommand ------------------------------------------------------

// JSON shape for `wikigraph similar --json`
#[derive(Serialize)]
struct SimilarOutput {
    seed: String,
    core: GraphStats,
    pages_fetched: usize,
    skipped: Vec<String>,
    pairs: Vec<SimilarPair>,
}

// Handles the 'similar' subcommand: crawl, then rank page pairs by simrank
async fn handle_similar(seed: &str, opts: &CrawlOpts, top: usize, json: bool) -> Result<i32> {
    let report = run_crawl(seed, opts).await?;

    println!(
        "🧮 Computing simrank over {} nodes...",
        report.graph.node_count()
    );
    let similarity = graph::simrank(&report.graph);
    let pairs = similarity.top_pairs(top);

    if json {
        let output = SimilarOutput {
            seed: seed.to_string(),
            core: report.graph.stats(),
            pages_fetched: report.pages_fetched,
            skipped: report.skipped.clone(),
            pairs,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(if report.skipped.is_empty() { 0 } else { 1 });
    }

    if pairs.is_empty() {
        println!("No similar pairs found (the core graph may be empty)");
    } else {
        println!();
        println!("👯 Top {} similar page pairs:", pairs.len());
        println!("{:<40} {:<40} {:>8}", "PAGE A", "PAGE B", "SCORE");
        println!("{}", "=".repeat(90));
        for pair in &pairs {
            println!(
                "{:<40} {:<40} {:>8.4}",
                truncate(&pair.a, 37),
                truncate(&pair.b, 37),
                pair.score
            );
        }
    }

    Ok(summarize(&report))
}

// --- compare subcommand ------------------------------------------------------

// JSON shape for `wikigraph compare --json`
#[derive(Serialize)]
struct CompareOutput {
    seed_a: String,
    seed_b: String,
    graph_a: GraphStats,
    graph_b: GraphStats,
    common: GraphDump,
    skipped: Vec<String>,
}

// Handles the 'compare' subcommand: crawl both seeds with the same
// parameters, then intersect the two pruned graphs
async fn handle_compare(seed_a: &str, seed_b: &str, opts: &CrawlOpts, json: bool) -> Result<i32> {
    let report_a = run_crawl(seed_a, opts).await?;
    println!();
    let report_b = run_crawl(seed_b, opts).await?;

    let common = report_a.graph.intersection(&report_b.graph);

    // A skip in either crawl makes the comparison suspect, so both count
    let mut skipped = report_a.skipped.clone();
    skipped.extend(report_b.skipped.iter().cloned());

    if json {
        let output = CompareOutput {
            seed_a: seed_a.to_string(),
            seed_b: seed_b.to_string(),
            graph_a: report_a.graph.stats(),
            graph_b: report_b.graph.stats(),
            common: common.dump(),
            skipped: skipped.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(if skipped.is_empty() { 0 } else { 1 });
    }

    println!();
    println!("🔗 Intersection of '{}' and '{}':", seed_a, seed_b);
    println!(
        "   {} common node(s), {} common edge(s)",
        common.node_count(),
        common.edge_count()
    );

    let dump = common.dump();
    for title in dump.nodes.iter().take(COMPARE_LISTING_LIMIT) {
        println!("   - {}", title);
    }
    if dump.nodes.len() > COMPARE_LISTING_LIMIT {
        println!(
            "   ... and {} more (use --json for the full list)",
            dump.nodes.len() - COMPARE_LISTING_LIMIT
        );
    }

    if skipped.is_empty() {
        Ok(0)
    } else {
        println!("   ⚠️  {} page(s) were skipped across both crawls", skipped.len());
        Ok(1)
    }
}

// Truncates long titles so table columns stay aligned
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}
