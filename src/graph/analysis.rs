// src/graph/analysis.rs
// =============================================================================
// This module analyzes a crawled link graph.
//
// Two analyses are offered:
// - top_indegree: which pages do the most other pages link to?
//   (a crude "importance" measure - the Wikipedia equivalent of citations)
// - simrank: which pairs of pages are "similar", in the sense that
//   similar pages are linked to by similar pages?
//
// Simrank is the classic Jeh & Widom measure. petgraph doesn't ship it,
// so we run the textbook fixed-point iteration here with the customary
// parameters (importance factor 0.9, at most 100 iterations, stop once
// nothing moves by more than 1e-4).
//
// Rust concepts:
// - sort_by with comparator chains (.then_with) for deterministic ordering
// - Nested Vec<Vec<f64>> as a small dense matrix
// - partial_cmp: floats aren't totally ordered (NaN), so sorting takes care
// =============================================================================

use crate::graph::LinkGraph;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

// How much of a neighbor pair's similarity carries over to the pair itself
const IMPORTANCE_FACTOR: f64 = 0.9;
// Hard stop for the fixed-point iteration
const MAX_ITERATIONS: usize = 100;
// Converged once no score moves by more than this between iterations
const TOLERANCE: f64 = 1e-4;

// Ranks pages by in-degree, highest first
//
// Ties are broken alphabetically so the ranking is deterministic -
// two runs over the same graph always print the same table
pub fn top_indegree(graph: &LinkGraph, n: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = graph
        .nodes()
        .map(|title| (title.to_string(), graph.in_degree(title)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked
}

// A pair of pages with their simrank score
#[derive(Debug, Clone, Serialize)]
pub struct SimilarPair {
    pub a: String,
    pub b: String,
    pub score: f64,
}

// All-pairs simrank scores for one graph
//
// Titles are sorted, and scores[i][j] is the similarity between
// titles[i] and titles[j]. Scores live in [0, 1]; sim(a, a) = 1.
pub struct Similarity {
    titles: Vec<String>,
    scores: Vec<Vec<f64>>,
}

impl Similarity {
    // Looks up the score for a pair of titles
    //
    // Returns None if either title isn't in the graph
    pub fn score(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.titles.binary_search_by(|t| t.as_str().cmp(a)).ok()?;
        let j = self.titles.binary_search_by(|t| t.as_str().cmp(b)).ok()?;
        Some(self.scores[i][j])
    }

    // Returns the n most similar DISTINCT pairs, highest score first
    //
    // Self-pairs always score 1.0 and are not interesting, so only pairs
    // with a < b (each unordered pair once) are considered
    pub fn top_pairs(&self, n: usize) -> Vec<SimilarPair> {
        let mut pairs = Vec::new();
        for (a, title_a) in self.titles.iter().enumerate() {
            for title_b in self.titles.iter().skip(a + 1) {
                match self.score(title_a, title_b) {
                    Some(score) if score > 0.0 => pairs.push(SimilarPair {
                        a: title_a.clone(),
                        b: title_b.clone(),
                        score,
                    }),
                    _ => {}
                }
            }
        }
        pairs.sort_by(|x, y| {
            y.score
                .partial_cmp(&x.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| x.a.cmp(&y.a))
                .then_with(|| x.b.cmp(&y.b))
        });
        pairs.truncate(n);
        pairs
    }
}

// Computes all-pairs simrank for the graph
//
// The recurrence: two distinct pages are similar when the pages linking
// to them are similar -
//
//   sim(a, b) = C / (|In(a)| * |In(b)|) * sum over (i, j) of sim(i, j)
//
// where i ranges over In(a), j over In(b), and C is the importance factor.
// A page with no inbound links is similar to nothing but itself.
//
// Cost is O(n^2 * d^2) per iteration, which is fine at this tool's scale
// (the pruned graphs are a few hundred to low thousands of nodes)
pub fn simrank(graph: &LinkGraph) -> Similarity {
    // Fix a sorted node order so the matrix layout is deterministic
    let mut titles: Vec<String> = graph.nodes().map(String::from).collect();
    titles.sort();
    let position: HashMap<&str, usize> = titles
        .iter()
        .enumerate()
        .map(|(i, t)| (t.as_str(), i))
        .collect();
    let n = titles.len();

    // Pre-collect in-neighbor positions per node; the inner loop below
    // walks these lists many times
    let in_neighbors: Vec<Vec<usize>> = titles
        .iter()
        .map(|title| {
            graph
                .in_neighbors(title)
                .map(|neighbor| position[neighbor])
                .collect()
        })
        .collect();

    // Start from the identity: every page is fully similar to itself
    let mut scores = vec![vec![0.0f64; n]; n];
    for (i, row) in scores.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    for _ in 0..MAX_ITERATIONS {
        let mut next = vec![vec![0.0f64; n]; n];
        for (i, row) in next.iter_mut().enumerate() {
            row[i] = 1.0;
        }

        let mut delta = 0.0f64;
        for a in 0..n {
            for b in 0..n {
                if a == b {
                    continue;
                }
                let ins_a = &in_neighbors[a];
                let ins_b = &in_neighbors[b];
                if ins_a.is_empty() || ins_b.is_empty() {
                    continue;
                }
                let mut sum = 0.0;
                for &i in ins_a {
                    for &j in ins_b {
                        sum += scores[i][j];
                    }
                }
                let score = IMPORTANCE_FACTOR * sum / (ins_a.len() as f64 * ins_b.len() as f64);
                next[a][b] = score;
                delta = delta.max((score - scores[a][b]).abs());
            }
        }

        scores = next;
        if delta < TOLERANCE {
            break;
        }
    }

    Similarity { titles, scores }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why sort before ranking?
//    - HashMap iteration order is random in Rust (on purpose!)
//    - Without an explicit tie-break, two runs could print rank tables
//      in different orders for equal in-degrees
//
// 2. Why partial_cmp for floats?
//    - f64 only implements PartialOrd because NaN compares to nothing
//    - Our scores are never NaN, so treating an incomparable pair as
//      Equal is safe here
//
// 3. What is a fixed-point iteration?
//    - Start with a guess, apply the recurrence, repeat until the answer
//      stops changing (within a tolerance)
//    - Simrank is defined as the fixed point of its recurrence
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn fan_graph() -> LinkGraph {
        // A links to both X and Y; nothing links to A
        let mut g = LinkGraph::new();
        g.add_link("A", "X");
        g.add_link("A", "Y");
        g
    }

    #[test]
    fn test_top_indegree_ranks_highest_first() {
        let mut g = LinkGraph::new();
        g.add_link("A", "Hub");
        g.add_link("B", "Hub");
        g.add_link("C", "Hub");
        g.add_link("A", "Mid");
        g.add_link("B", "Mid");
        let ranked = top_indegree(&g, 10);
        assert_eq!(ranked[0], ("Hub".to_string(), 3));
        assert_eq!(ranked[1], ("Mid".to_string(), 2));
    }

    #[test]
    fn test_top_indegree_breaks_ties_alphabetically() {
        let mut g = LinkGraph::new();
        g.add_link("Z", "Beta");
        g.add_link("Z", "Alpha");
        let ranked = top_indegree(&g, 2);
        assert_eq!(ranked[0].0, "Alpha");
        assert_eq!(ranked[1].0, "Beta");
    }

    #[test]
    fn test_top_indegree_truncates() {
        let mut g = LinkGraph::new();
        g.add_link("A", "B");
        g.add_link("B", "C");
        assert_eq!(top_indegree(&g, 1).len(), 1);
    }

    #[test]
    fn test_simrank_self_similarity_is_one() {
        let sim = simrank(&fan_graph());
        assert_eq!(sim.score("A", "A"), Some(1.0));
        assert_eq!(sim.score("X", "X"), Some(1.0));
    }

    #[test]
    fn test_simrank_siblings_are_similar() {
        // X and Y share their single in-neighbor A, so
        // sim(X, Y) = 0.9 * sim(A, A) = 0.9
        let sim = simrank(&fan_graph());
        let score = sim.score("X", "Y").unwrap();
        assert!((score - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_simrank_is_symmetric() {
        let mut g = fan_graph();
        g.add_link("B", "X");
        let sim = simrank(&g);
        assert_eq!(sim.score("X", "Y"), sim.score("Y", "X"));
    }

    #[test]
    fn test_simrank_no_common_ancestry_scores_zero() {
        let mut g = LinkGraph::new();
        g.add_link("A", "X");
        g.add_link("B", "Y");
        let sim = simrank(&g);
        // A and B have no in-neighbors at all
        assert_eq!(sim.score("A", "B"), Some(0.0));
    }

    #[test]
    fn test_simrank_unknown_title() {
        let sim = simrank(&fan_graph());
        assert_eq!(sim.score("A", "Nope"), None);
    }

    #[test]
    fn test_top_pairs_orders_by_score() {
        let mut g = LinkGraph::new();
        // X and Y share one parent; P and Q share two
        g.add_link("A", "X");
        g.add_link("A", "Y");
        g.add_link("B", "P");
        g.add_link("B", "Q");
        g.add_link("C", "P");
        g.add_link("C", "Q");
        let sim = simrank(&g);
        let pairs = sim.top_pairs(50);
        assert!(!pairs.is_empty());
        // every listed pair is distinct and scores descend
        for window in pairs.windows(2) {
            assert!(window[0].score >= window[1].score);
        }
        for pair in &pairs {
            assert_ne!(pair.a, pair.b);
        }
    }
}
