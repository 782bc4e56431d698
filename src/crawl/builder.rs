// src/crawl/builder.rs
// =============================================================================
// This module implements the breadth-first link-graph crawl.
//
// How it works:
// 1. Start with the seed title in a queue at layer 0
// 2. Pop the front entry, fetch that page's outbound links
// 3. Add an edge (page -> link) for every link that isn't filtered out
// 4. Enqueue each newly seen link at layer + 1
// 5. Repeat until the queue empties, the next entry is past the depth
//    limit, or a popped title sails past the alphabetic cutoff
// 6. Prune: drop self-loops, then keep only the degree >= 2 core
//
// Filtering:
// - Link titles are normalized to title case first
// - A fixed deny-list drops citation/identifier/archive plumbing pages
//   ("Pubmed Identifier", "Wayback Machine", ...) that every article links
//   to and that would otherwise dominate the graph
// - "List Of ..." pages are index pages, not subjects, and are skipped too
//
// Failure:
// - A page that fails to fetch is skipped and the crawl moves on; the
//   skipped titles are surfaced in the report so callers can tell a clean
//   crawl from a truncated one
//
// Rust concepts:
// - VecDeque: Double-ended queue for breadth-first ordering
// - HashSet: O(1) membership tests for the discovered/completed sets
// - Generics with a trait bound: build_graph works against any FetchPage
// =============================================================================

use crate::graph::{GraphStats, LinkGraph};
use crate::wiki::FetchPage;
use std::collections::{HashSet, VecDeque};

// Only nodes with total degree (in + out) at least this survive pruning
const MIN_CORE_DEGREE: usize = 2;

// Link titles starting with this are index pages and never become nodes.
// The comparison runs on the title-cased form, so the capital O matters.
const LIST_PREFIX: &str = "List Of";

// Auxiliary/metadata pages to ignore (they're just citation extras).
// Matched against title-cased link titles.
pub const DEFAULT_STOPS: &[&str] = &[
    "International Standard Serial Number",
    "Issn (Identifier)",
    "International Standard Book Number",
    "Isbn (Identifier)",
    "International Standard Name Identifier",
    "Isni (Identifier)",
    "International Standard Book Number (Identifier)",
    "Pubmed Identifier",
    "Pubmed Central",
    "Viaf (Identifier)",
    "Ndl (Identifier)",
    "Gnd (Identifier)",
    "S2Cid (Identifier)",
    "Geographic Coordinate System",
    "Bibcode (Identifier)",
    "Digital Object Identifer",
    "Doi (Identifier)",
    "Arxiv",
    "Wayback Machine",
    "Citeseerx (Identifier)",
    "Proc Natl Acad Sci Usa",
    "Worldcat Identities (Identifier)",
    "Library of Congress Control Number",
    "Lccn (Identifier)",
    "Jstor",
];

// Parameters for one crawl
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Inclusive upper bound on the layer number processed
    /// (0 = seed only, 1 = seed + its direct links, ...)
    pub max_depth: usize,
    /// Optional alphabetic stop: the first popped NON-seed entry whose
    /// title sorts after this ends the whole crawl
    pub cutoff: Option<String>,
    /// Link titles to ignore entirely (checked after title-casing)
    pub deny_list: HashSet<String>,
}

impl CrawlConfig {
    // Builds a config with the standard deny-list
    pub fn new(max_depth: usize, cutoff: Option<String>) -> Self {
        Self {
            max_depth,
            cutoff,
            deny_list: DEFAULT_STOPS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// What one crawl produced
pub struct CrawlReport {
    /// The pruned graph: no self-loops, every node has degree >= 2
    pub graph: LinkGraph,
    /// Size of the raw graph before any pruning
    pub full: GraphStats,
    /// Pages whose links were successfully fetched and processed
    pub pages_fetched: usize,
    /// Titles that failed to fetch and were skipped (the crawl is silently
    /// thinner wherever these appear)
    pub skipped: Vec<String>,
}

// One unit of crawl work: a page title and its distance from the seed
#[derive(Debug, Clone)]
struct FrontierEntry {
    layer: usize,
    title: String,
}

// Crawls the link graph breadth-first from a seed title
//
// The traversal state (frontier queue, discovered set, completed set) is
// all local to this call - run it twice and the runs can't interfere.
//
// Every entry is popped BEFORE its page is fetched, so a fetch failure
// only ever means "skip this one and take the next" - the queue is never
// re-read to recover
pub async fn build_graph<F: FetchPage>(fetcher: &F, seed: &str, config: &CrawlConfig) -> CrawlReport {
    let mut frontier: VecDeque<FrontierEntry> = VecDeque::new();
    frontier.push_back(FrontierEntry {
        layer: 0,
        title: seed.to_string(),
    });

    // Titles ever enqueued; guarantees each title joins the frontier at most once
    let mut discovered: HashSet<String> = HashSet::new();
    discovered.insert(seed.to_string());

    // Titles already popped and processed (or attempted)
    let mut completed: HashSet<String> = HashSet::new();

    let mut graph = LinkGraph::new();
    let mut skipped: Vec<String> = Vec::new();
    let mut pages_fetched = 0;

    while let Some(entry) = frontier.pop_front() {
        // Entries are enqueued in layer order, so the first too-deep entry
        // means everything left is too deep as well
        if entry.layer > config.max_depth {
            break;
        }

        let FrontierEntry { layer, title } = entry;
        completed.insert(title.clone());

        println!("  Crawling [layer {}]: {}", layer, title);

        // The alphabetic cutoff: once a non-seed title sorts past it, the
        // whole crawl stops. Which branches got explored first decides what
        // made it in - this is a blunt stop rule, not a per-page filter.
        if layer > 0 {
            if let Some(cutoff) = &config.cutoff {
                if title.as_str() > cutoff.as_str() {
                    println!("  Reached cutoff '{}' at '{}', stopping", cutoff, title);
                    break;
                }
            }
        }

        let page = match fetcher.fetch_page(&title).await {
            Ok(page) => page,
            Err(e) => {
                // Non-fatal: this page's links just never enter the graph
                eprintln!("  Warning: Could not load page '{}': {}", title, e);
                skipped.push(title);
                continue;
            }
        };
        pages_fetched += 1;

        // The API resolves redirects, so the canonical title can differ
        // from what we asked for; edges still hang off the requested title
        if page.title != title {
            println!("    (redirected to: {})", page.title);
        }

        for link in &page.links {
            let link = title_case(link);

            // Deny-listed plumbing pages and "List Of ..." index pages are
            // dropped entirely - no edge, no node
            if config.deny_list.contains(&link) || link.starts_with(LIST_PREFIX) {
                continue;
            }

            graph.add_link(&title, &link);

            if !discovered.contains(&link) && !completed.contains(&link) {
                discovered.insert(link.clone());
                frontier.push_back(FrontierEntry {
                    layer: layer + 1,
                    title: link,
                });
            }
        }
    }

    // Snapshot the raw size, then prune: self-loops first, so the degree
    // filter runs on the loop-free graph
    let full = graph.stats();
    graph.remove_self_loops();
    let graph = graph.core(MIN_CORE_DEGREE);

    CrawlReport {
        graph,
        full,
        pages_fetched,
        skipped,
    }
}

// Normalizes a link title to title case: a letter directly after a
// non-letter is uppercased, every other letter is lowercased.
// "missouri s&t" -> "Missouri S&T"
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_was_letter = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_was_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_was_letter = true;
        } else {
            out.push(ch);
            prev_was_letter = false;
        }
    }
    out
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why both a discovered set AND a completed set?
//    - discovered answers "has this title ever been enqueued?"
//    - completed answers "has this title been processed?"
//    - Together they guarantee a title is fetched at most once per crawl,
//      even when hundreds of pages link to it
//
// 2. Why does the depth check pop the entry first?
//    - The frontier is FIFO, so layers arrive in order: the moment one
//      entry is past max_depth, all remaining entries are too
//    - Popping it before breaking is harmless - the queue is dropped when
//      the function returns
//
// 3. What does <F: FetchPage> buy us?
//    - build_graph never names the real Wikipedia client
//    - Production passes WikiClient; the tests below pass a fake with a
//      fixed title -> links table and get fully deterministic crawls
//
// 4. Why is the whole crawl sequential?
//    - One page is fetched and processed at a time, awaited inline
//    - At this tool's scale (hundreds of pages) that's plenty, and it
//      keeps the frontier a plain VecDeque with a single writer
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::Page;
    use anyhow::anyhow;
    use std::cell::RefCell;
    use std::collections::HashMap;

    // Deterministic FetchPage fake: a fixed title -> links table, a set of
    // titles that fail, and a log of every fetch call
    struct FakeFetcher {
        pages: HashMap<String, Vec<String>>,
        fail: HashSet<String>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        fn new(pages: &[(&str, &[&str])]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(t, links)| {
                        (t.to_string(), links.iter().map(|l| l.to_string()).collect())
                    })
                    .collect(),
                fail: HashSet::new(),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn failing_on(mut self, title: &str) -> Self {
            self.fail.insert(title.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl FetchPage for FakeFetcher {
        async fn fetch_page(&self, title: &str) -> anyhow::Result<Page> {
            self.calls.borrow_mut().push(title.to_string());
            if self.fail.contains(title) {
                return Err(anyhow!("simulated fetch failure"));
            }
            match self.pages.get(title) {
                Some(links) => Ok(Page {
                    title: title.to_string(),
                    links: links.clone(),
                }),
                None => Err(anyhow!("Page '{}' does not exist", title)),
            }
        }
    }

    #[tokio::test]
    async fn test_self_loop_and_pendant_edge_pruned_away() {
        // X links to itself and to Y. The loop is removed, and the lone
        // X -> Y edge leaves both ends at degree 1, so everything is pruned.
        let fetcher = FakeFetcher::new(&[("X", &["X", "Y"]), ("Y", &[])]);
        let report = build_graph(&fetcher, "X", &CrawlConfig::new(1, None)).await;

        assert_eq!(report.full.node_count, 2);
        assert_eq!(report.full.edge_count, 2);
        assert_eq!(report.graph.node_count(), 0);
        assert_eq!(report.graph.edge_count(), 0);
    }

    #[tokio::test]
    async fn test_mutual_links_are_retained() {
        // X -> Y and Y -> X give both nodes degree 2
        let fetcher = FakeFetcher::new(&[("X", &["Y"]), ("Y", &["X"])]);
        let report = build_graph(&fetcher, "X", &CrawlConfig::new(1, None)).await;

        assert_eq!(report.graph.node_count(), 2);
        assert_eq!(report.graph.edge_count(), 2);
        assert!(report.graph.has_link("X", "Y"));
        assert!(report.graph.has_link("Y", "X"));
        assert_eq!(report.graph.degree("X"), 2);
        assert_eq!(report.graph.degree("Y"), 2);
    }

    #[tokio::test]
    async fn test_deny_listed_links_never_enter_the_graph() {
        let fetcher = FakeFetcher::new(&[
            ("X", &["Pubmed Identifier", "Y"]),
            ("Y", &["X", "Pubmed Identifier"]),
        ]);
        let report = build_graph(&fetcher, "X", &CrawlConfig::new(1, None)).await;

        assert!(!report.graph.contains("Pubmed Identifier"));
        assert!(report.graph.has_link("X", "Y"));
        // the denied title was never enqueued either
        assert!(!fetcher.calls().contains(&"Pubmed Identifier".to_string()));
    }

    #[tokio::test]
    async fn test_list_of_pages_skipped_regardless_of_deny_list() {
        // "list of foo" title-cases to "List Of Foo", which is not in the
        // deny-list but matches the prefix rule
        let fetcher = FakeFetcher::new(&[("X", &["list of foo", "Y"]), ("Y", &["X"])]);
        let report = build_graph(&fetcher, "X", &CrawlConfig::new(1, None)).await;

        assert!(!report.graph.contains("List Of Foo"));
        assert_eq!(report.full.edge_count, 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_and_continues() {
        // B fails mid-frontier; A and C still get crawled and the failure
        // never surfaces as an error
        let fetcher = FakeFetcher::new(&[
            ("X", &["A", "B", "C"]),
            ("A", &["X", "C"]),
            ("C", &["X", "A"]),
        ])
        .failing_on("B");
        let report = build_graph(&fetcher, "X", &CrawlConfig::new(1, None)).await;

        assert_eq!(report.skipped, vec!["B".to_string()]);
        // C was processed after the failure
        assert!(fetcher.calls().contains(&"C".to_string()));
        assert!(report.graph.has_link("A", "C"));
        // B contributed no outbound edges
        assert_eq!(report.graph.in_degree("B"), report.graph.degree("B"));
    }

    #[tokio::test]
    async fn test_each_title_fetched_at_most_once() {
        // Z is linked from X and Y both; it must be enqueued only once
        let fetcher = FakeFetcher::new(&[
            ("X", &["Y", "Z"]),
            ("Y", &["Z", "X"]),
            ("Z", &["X"]),
        ]);
        let report = build_graph(&fetcher, "X", &CrawlConfig::new(2, None)).await;

        let calls = fetcher.calls();
        for title in ["X", "Y", "Z"] {
            let count = calls.iter().filter(|c| c.as_str() == title).count();
            assert!(count <= 1, "{} fetched {} times", title, count);
        }
        assert!(report.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_max_depth_bounds_the_crawl() {
        // With max_depth 0 only the seed itself is processed
        let fetcher = FakeFetcher::new(&[("X", &["Y"]), ("Y", &["Z"]), ("Z", &[])]);
        build_graph(&fetcher, "X", &CrawlConfig::new(0, None)).await;
        assert_eq!(fetcher.calls(), vec!["X".to_string()]);
    }

    #[tokio::test]
    async fn test_cutoff_stops_the_whole_crawl() {
        // Frontier order after the seed: Apple, Zebra, Banana.
        // "Zebra" > "C" ends the crawl, so Banana is never reached even
        // though it would have passed the cutoff itself.
        let fetcher = FakeFetcher::new(&[
            ("M", &["Apple", "Zebra", "Banana"]),
            ("Apple", &["M"]),
            ("Zebra", &["M"]),
            ("Banana", &["M"]),
        ]);
        build_graph(&fetcher, "M", &CrawlConfig::new(1, Some("C".to_string()))).await;

        let calls = fetcher.calls();
        assert_eq!(calls, vec!["M".to_string(), "Apple".to_string()]);
    }

    #[tokio::test]
    async fn test_cutoff_does_not_apply_to_the_seed() {
        // The seed sorts after the cutoff but is layer 0, so it's exempt
        let fetcher = FakeFetcher::new(&[("Zzz", &["Aa", "Ab"]), ("Aa", &["Ab"]), ("Ab", &["Aa"])]);
        let report = build_graph(&fetcher, "Zzz", &CrawlConfig::new(1, Some("C".to_string()))).await;
        assert!(report.pages_fetched >= 1);
        assert!(fetcher.calls().contains(&"Aa".to_string()));
    }

    #[tokio::test]
    async fn test_crawl_is_deterministic() {
        let pages: &[(&str, &[&str])] = &[
            ("X", &["B", "A", "C"]),
            ("A", &["X", "B"]),
            ("B", &["C", "A"]),
            ("C", &["X"]),
        ];
        let first = build_graph(&FakeFetcher::new(pages), "X", &CrawlConfig::new(2, None)).await;
        let second = build_graph(&FakeFetcher::new(pages), "X", &CrawlConfig::new(2, None)).await;
        assert_eq!(first.graph.dump(), second.graph.dump());
    }

    #[test]
    fn test_title_case_basic() {
        assert_eq!(title_case("missouri s&t"), "Missouri S&T");
        assert_eq!(title_case("HELLO WORLD"), "Hello World");
        assert_eq!(title_case("rolla, missouri"), "Rolla, Missouri");
    }

    #[test]
    fn test_title_case_non_letter_boundaries() {
        // every letter after a non-letter gets uppercased
        assert_eq!(title_case("they're"), "They'Re");
        assert_eq!(title_case("foo3bar"), "Foo3Bar");
        assert_eq!(title_case("isbn (identifier)"), "Isbn (Identifier)");
    }

    #[test]
    fn test_title_case_empty() {
        assert_eq!(title_case(""), "");
    }
}
