// src/graph/link_graph.rs
// =============================================================================
// This module wraps petgraph's directed graph with a title-keyed API.
//
// Why a wrapper?
// - petgraph addresses nodes by NodeIndex, but our domain speaks in page
//   titles ("Missouri S&T", "Rust (Programming Language)", ...)
// - We keep a HashMap from title -> NodeIndex so lookups stay O(1)
// - The wrapper also enforces our simple-graph rule: discovering the same
//   link twice must NOT create a second parallel edge
//
// Rust concepts:
// - Newtype-style wrapping: hide the library type behind our own API
// - HashMap: For the title -> index lookup table
// - Iterators with lifetimes: nodes() and edges() borrow from the graph
// =============================================================================

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

// A directed graph of page titles
//
// An edge (A -> B) means "page A contains a link to page B".
// The graph is simple: at most one edge per ordered pair, and callers
// are expected to strip self-loops before analysis (see remove_self_loops).
pub struct LinkGraph {
    // The underlying petgraph structure; node weights are the page titles
    graph: DiGraph<String, ()>,
    // Lookup table so we can find a node by title without scanning
    index: HashMap<String, NodeIndex>,
}

// Node and edge counts, used for progress output and JSON reports
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
}

// A serializable snapshot of the whole graph for --json output
//
// Nodes and edges are sorted so two identical graphs always dump
// identically (handy for tests and for diffing runs)
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GraphDump {
    pub nodes: Vec<String>,
    pub edges: Vec<(String, String)>,
}

impl LinkGraph {
    // Creates an empty graph
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
        }
    }

    // Looks up a node by title, inserting it if it doesn't exist yet
    //
    // Returns the NodeIndex either way. This is the only place nodes
    // are created, so the index map can never go stale.
    fn intern(&mut self, title: &str) -> NodeIndex {
        if let Some(&ix) = self.index.get(title) {
            ix
        } else {
            let ix = self.graph.add_node(title.to_string());
            self.index.insert(title.to_string(), ix);
            ix
        }
    }

    // Adds a node without any edges (used when inducing subgraphs)
    pub fn add_node(&mut self, title: &str) {
        self.intern(title);
    }

    // Adds a directed edge from -> to, creating both nodes if needed
    //
    // Adding the same edge twice is a no-op: multiple discoveries of the
    // same link collapse to one edge (simple graph, no multi-edges)
    pub fn add_link(&mut self, from: &str, to: &str) {
        let a = self.intern(from);
        let b = self.intern(to);
        if self.graph.find_edge(a, b).is_none() {
            self.graph.add_edge(a, b, ());
        }
    }

    // Returns true if a page title is present in the graph
    pub fn contains(&self, title: &str) -> bool {
        self.index.contains_key(title)
    }

    // Returns true if the directed edge from -> to exists
    pub fn has_link(&self, from: &str, to: &str) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
        }
    }

    // Iterates over all page titles in the graph
    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph
            .node_indices()
            .map(move |ix| self.graph[ix].as_str())
    }

    // Iterates over all edges as (from_title, to_title) pairs
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.graph.edge_indices().filter_map(move |e| {
            self.graph
                .edge_endpoints(e)
                .map(|(a, b)| (self.graph[a].as_str(), self.graph[b].as_str()))
        })
    }

    // Iterates over the titles of pages that link TO the given page
    pub fn in_neighbors<'a>(&'a self, title: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.index
            .get(title)
            .copied()
            .into_iter()
            .flat_map(move |ix| {
                self.graph
                    .neighbors_directed(ix, Direction::Incoming)
                    .map(move |n| self.graph[n].as_str())
            })
    }

    // Number of edges pointing at this page
    pub fn in_degree(&self, title: &str) -> usize {
        match self.index.get(title) {
            Some(&ix) => self.graph.edges_directed(ix, Direction::Incoming).count(),
            None => 0,
        }
    }

    // Total degree: edges in + edges out
    //
    // This is the degree definition our pruning rule uses
    pub fn degree(&self, title: &str) -> usize {
        match self.index.get(title) {
            Some(&ix) => {
                self.graph.edges_directed(ix, Direction::Incoming).count()
                    + self.graph.edges_directed(ix, Direction::Outgoing).count()
            }
            None => 0,
        }
    }

    // Removes all self-loop edges (A -> A)
    //
    // Wikipedia pages often exist under more than one name (redirects),
    // so a page can appear to link to itself once titles are normalized
    pub fn remove_self_loops(&mut self) {
        // retain_edges keeps node indices stable, so the title index
        // stays valid after this call
        self.graph.retain_edges(|g, e| match g.edge_endpoints(e) {
            Some((a, b)) => a != b,
            None => false,
        });
    }

    // Returns the induced subgraph over nodes with total degree >= min_degree
    //
    // Degrees are computed once, up front, on the current graph - so the
    // order in which nodes would be dropped can't change the outcome.
    // Kept nodes stay even if all their edges led to dropped nodes; edges
    // survive only when BOTH endpoints are kept (that's what "induced" means)
    pub fn core(&self, min_degree: usize) -> LinkGraph {
        let keep: HashSet<&str> = self
            .nodes()
            .filter(|title| self.degree(title) >= min_degree)
            .collect();

        let mut core = LinkGraph::new();
        for &title in &keep {
            core.add_node(title);
        }
        for (from, to) in self.edges() {
            if keep.contains(from) && keep.contains(to) {
                core.add_link(from, to);
            }
        }
        core
    }

    // Set-style intersection of two graphs
    //
    // The result contains the nodes present in both graphs, and the edges
    // present in both graphs (which implies both endpoints are common)
    pub fn intersection(&self, other: &LinkGraph) -> LinkGraph {
        let mut out = LinkGraph::new();
        for title in self.nodes() {
            if other.contains(title) {
                out.add_node(title);
            }
        }
        for (from, to) in self.edges() {
            if other.has_link(from, to) {
                out.add_link(from, to);
            }
        }
        out
    }

    // Produces the sorted, serializable snapshot used for --json output
    pub fn dump(&self) -> GraphDump {
        let mut nodes: Vec<String> = self.nodes().map(String::from).collect();
        nodes.sort();
        let mut edges: Vec<(String, String)> = self
            .edges()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect();
        edges.sort();
        GraphDump { nodes, edges }
    }

    // Gives the DOT exporter access to the raw petgraph structure
    pub(crate) fn inner(&self) -> &DiGraph<String, ()> {
        &self.graph
    }
}

impl Default for LinkGraph {
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why not use petgraph's GraphMap instead of the HashMap index?
//    - GraphMap keys must implement Copy, and String doesn't
//    - DiGraph + our own HashMap<String, NodeIndex> is the usual pattern
//      for string-keyed graphs
//
// 2. What is NodeIndex?
//    - petgraph's handle to a node (basically a typed integer)
//    - Stable across edge removals, but NOT across node removals -
//      which is why core() builds a fresh graph instead of deleting nodes
//
// 3. What does impl Iterator<Item = &str> + '_ mean?
//    - "returns some iterator over string slices borrowed from self"
//    - The '_ ties the iterator's lifetime to the &self borrow
//    - Callers can loop over it without us allocating a Vec
//
// 4. Why does add_link check find_edge first?
//    - petgraph's add_edge happily creates parallel edges
//    - Our domain wants a simple graph, so we guard against duplicates here,
//      in one place, instead of at every call site
// -----------------------------------------------------------------------------
