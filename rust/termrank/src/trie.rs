//! Trie-backed autocompletion with best-first pruned search.
//!
//! The vocabulary is stored as a character trie held in an arena: nodes live
//! in a single `Vec`, refer to each other by index, and are never removed.
//! Each node caches `subtree_max`, the maximum weight among all words ending
//! at or below it. The cache is the engine's load-bearing invariant:
//!
//! - [`TrieAutocomplete::add`] maintains it incrementally. Walking down the
//!   insertion path can only raise cached maxima, so the descent folds the new
//!   weight into every visited node; a final bottom-up pass repairs the path
//!   when a re-inserted word's weight was lowered, stopping at the first
//!   ancestor whose cache is already exact.
//! - [`Autocomplete::top_matches`] exploits it for branch-and-bound. The
//!   search expands descendants of the prefix node best-first, ordered by
//!   `subtree_max`, and stops as soon as the best unvisited subtree cannot
//!   beat the weakest of k retained candidates. Because `subtree_max` is an
//!   exact upper bound rather than an estimate, stopping never discards a
//!   true top-k word.
//!
//! Construction is the only mutating phase; a built trie can be queried from
//! multiple threads without synchronization.

use std::collections::{BTreeMap, BinaryHeap};

use ordered_float::OrderedFloat;
use termrank_common::{Result, verify_arg};
use termrank_topk::TopK;

use crate::term::{RankedTerm, Term};
use crate::{Autocomplete, EngineKind};

/// Index of a node within the trie's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct NodeId(usize);

const ROOT: NodeId = NodeId(0);

/// Placeholder stored in the root's character slot; the root spells the empty
/// prefix and carries no character of its own.
const ROOT_SENTINEL: char = '\0';

#[derive(Debug, Clone)]
struct Node {
    ch: char,
    /// Non-owning back-reference, used for upward cache repair and for
    /// diagnostics; `None` only for the root.
    parent: Option<NodeId>,
    children: BTreeMap<char, NodeId>,
    /// The word ending at this node, if any.
    term: Option<Term>,
    /// Maximum weight among all words ending at or below this node; 0.0 when
    /// the subtree holds no words, which only the empty trie's root does.
    subtree_max: f64,
}

/// Frontier entry of the best-first search, ordered by the subtree bound so
/// that a max-heap pops the most promising node first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Visit {
    bound: OrderedFloat<f64>,
    node: NodeId,
}

/// Prefix-autocompletion engine backed by a weighted trie.
///
/// Unlike [`BinarySearchAutocomplete`](crate::BinarySearchAutocomplete), the
/// trie engine also supports incremental insertion after construction via
/// [`add`](TrieAutocomplete::add); both engines answer the same queries with
/// identical results on the same corpus.
///
/// # Examples
///
/// ```
/// use termrank::{Autocomplete, TrieAutocomplete};
///
/// let engine = TrieAutocomplete::new(
///     &["air", "bat", "bell", "boy"],
///     &[3.0, 2.0, 4.0, 1.0],
/// )
/// .unwrap();
///
/// assert_eq!(engine.top_matches("b", 2), ["bell", "bat"]);
/// assert_eq!(engine.top_match("b"), "bell");
/// ```
#[derive(Debug, Clone)]
pub struct TrieAutocomplete {
    /// Node arena; index 0 is the root. Nodes are created along insertion
    /// paths and never removed.
    nodes: Vec<Node>,
    /// Number of distinct words, i.e. terminal nodes.
    word_count: usize,
}

impl TrieAutocomplete {
    /// Builds an engine from parallel word and weight sequences.
    ///
    /// Words are inserted in order, so a word appearing more than once keeps
    /// its last weight.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error if the sequences differ in length,
    /// if any word is empty, or if any weight is negative or NaN.
    pub fn new<S: AsRef<str>>(words: &[S], weights: &[f64]) -> Result<TrieAutocomplete> {
        verify_arg!(weights, words.len() == weights.len());
        let mut trie = TrieAutocomplete {
            nodes: vec![Node {
                ch: ROOT_SENTINEL,
                parent: None,
                children: BTreeMap::new(),
                term: None,
                subtree_max: 0.0,
            }],
            word_count: 0,
        };
        for (word, &weight) in words.iter().zip(weights) {
            trie.add(word.as_ref(), weight)?;
        }
        Ok(trie)
    }

    /// Inserts a word, or updates its weight if it is already present.
    ///
    /// Re-inserting an existing word creates no nodes; it replaces the stored
    /// weight and restores the `subtree_max` invariant along the word's path,
    /// including the case where the new weight is lower than the old one.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error if the word is empty, or if the
    /// weight is negative or NaN.
    pub fn add(&mut self, word: &str, weight: f64) -> Result<()> {
        let term = Term::new(word, weight)?;

        // Descend, creating missing nodes. The new word can only raise the
        // true maximum of each node on its path, so folding the weight in
        // top-down keeps every visited cache exact for fresh inserts.
        let mut current = ROOT;
        if self.node(ROOT).subtree_max < weight {
            self.node_mut(ROOT).subtree_max = weight;
        }
        for ch in word.chars() {
            let child = match self.node(current).children.get(&ch).copied() {
                Some(child) => child,
                None => self.add_child(current, ch, weight),
            };
            if self.node(child).subtree_max < weight {
                self.node_mut(child).subtree_max = weight;
            }
            current = child;
        }

        if self.node(current).term.is_none() {
            self.word_count += 1;
        }
        self.node_mut(current).term = Some(term);

        // A lowered re-insertion leaves stale maxima on the path; recompute
        // upward until a node's cache is already exact.
        self.repair_upward(current);
        Ok(())
    }

    /// Returns the number of distinct words in the vocabulary.
    pub fn len(&self) -> usize {
        self.word_count
    }

    /// Returns `true` if the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    /// Verifies the internal consistency of the trie.
    ///
    /// Recomputes every node's subtree maximum from scratch and checks it
    /// against the cached value, re-spells every stored word through the
    /// parent back-references, and validates the child/parent links.
    ///
    /// # Panics
    ///
    /// Panics if any invariant does not hold.
    pub fn verify(&self) {
        assert_eq!(self.node(ROOT).ch, ROOT_SENTINEL);
        assert_eq!(self.node(ROOT).parent, None);
        assert!(self.node(ROOT).term.is_none());

        for (index, node) in self.nodes.iter().enumerate() {
            let id = NodeId(index);
            for (&ch, &child) in &node.children {
                assert_eq!(self.node(child).ch, ch);
                assert_eq!(self.node(child).parent, Some(id));
            }
            assert_eq!(
                node.subtree_max,
                self.recursive_max(id),
                "stale subtree maximum at node {index}"
            );
            if let Some(term) = &node.term {
                assert_eq!(self.spell(id), term.word());
            }
        }

        let terminals = self.nodes.iter().filter(|node| node.term.is_some()).count();
        assert_eq!(terminals, self.word_count);
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn add_child(&mut self, parent: NodeId, ch: char, weight: f64) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            ch,
            parent: Some(parent),
            children: BTreeMap::new(),
            term: None,
            subtree_max: weight,
        });
        self.node_mut(parent).children.insert(ch, id);
        id
    }

    /// Walks from `from` along the characters of `path`, returning the node
    /// reached or `None` as soon as a required child is missing.
    fn descend(&self, from: NodeId, path: &str) -> Option<NodeId> {
        let mut current = from;
        for ch in path.chars() {
            current = self.node(current).children.get(&ch).copied()?;
        }
        Some(current)
    }

    /// Recomputes a single node's subtree maximum from its own term and its
    /// children's caches.
    fn recompute_max(&self, id: NodeId) -> f64 {
        let node = self.node(id);
        let own = node.term.as_ref().map_or(0.0, Term::weight);
        node.children
            .values()
            .fold(own, |max, &child| max.max(self.node(child).subtree_max))
    }

    /// Restores the cache invariant from `start` toward the root, stopping at
    /// the first node whose cached value is already exact. The early stop is
    /// sound because an unchanged cache leaves every ancestor's inputs
    /// unchanged as well.
    fn repair_upward(&mut self, start: NodeId) {
        let mut current = Some(start);
        while let Some(id) = current {
            let fresh = self.recompute_max(id);
            if self.node(id).subtree_max == fresh {
                break;
            }
            self.node_mut(id).subtree_max = fresh;
            current = self.node(id).parent;
        }
    }

    /// Recomputes a node's subtree maximum by full recursion, ignoring all
    /// caches. Used by [`verify`](TrieAutocomplete::verify) as the independent
    /// reference value.
    fn recursive_max(&self, id: NodeId) -> f64 {
        let node = self.node(id);
        let own = node.term.as_ref().map_or(0.0, Term::weight);
        node.children
            .values()
            .fold(own, |max, &child| max.max(self.recursive_max(child)))
    }

    /// Reconstructs the word spelled by the path from the root to `id` by
    /// following parent back-references.
    fn spell(&self, id: NodeId) -> String {
        let mut chars = Vec::new();
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            chars.push(self.node(current).ch);
            current = parent;
        }
        chars.iter().rev().collect()
    }
}

impl Autocomplete for TrieAutocomplete {
    fn top_matches(&self, prefix: &str, k: usize) -> Vec<String> {
        if k == 0 {
            return Vec::new();
        }
        let Some(prefix_root) = self.descend(ROOT, prefix) else {
            return Vec::new();
        };

        let mut frontier = BinaryHeap::new();
        frontier.push(Visit {
            bound: OrderedFloat(self.node(prefix_root).subtree_max),
            node: prefix_root,
        });
        let mut candidates: TopK<RankedTerm<'_>> = TopK::new(k);

        while let Some(visit) = frontier.pop() {
            // The popped bound is the best any unvisited subtree can offer;
            // once it falls strictly below the weakest retained weight, no
            // remaining word can enter the candidate set.
            if candidates.is_full()
                && candidates
                    .weakest()
                    .is_some_and(|weakest| visit.bound.into_inner() < weakest.0.weight())
            {
                break;
            }
            let node = self.node(visit.node);
            if let Some(term) = &node.term {
                candidates.insert(RankedTerm(term));
            }
            for &child in node.children.values() {
                frontier.push(Visit {
                    bound: OrderedFloat(self.node(child).subtree_max),
                    node: child,
                });
            }
        }

        candidates
            .into_sorted_vec()
            .into_iter()
            .map(|ranked| ranked.0.word().to_string())
            .collect()
    }

    fn top_match(&self, prefix: &str) -> String {
        let Some(prefix_root) = self.descend(ROOT, prefix) else {
            return String::new();
        };
        // Greedy single-path descent: follow the subtree maximum downward,
        // checking each node's own word first so that among equally weighted
        // words the shortest (lexicographically smallest) one wins.
        let target = self.node(prefix_root).subtree_max;
        let mut current = prefix_root;
        loop {
            let node = self.node(current);
            if let Some(term) = &node.term {
                if term.weight() == target {
                    return term.word().to_string();
                }
            }
            let next = node
                .children
                .values()
                .copied()
                .find(|&child| self.node(child).subtree_max == target);
            match next {
                Some(child) => current = child,
                // Only reachable when the trie holds no words at all.
                None => return String::new(),
            }
        }
    }

    fn weight_of(&self, word: &str) -> f64 {
        self.descend(ROOT, word)
            .and_then(|id| self.node(id).term.as_ref())
            .map_or(0.0, Term::weight)
    }

    fn kind(&self) -> EngineKind {
        EngineKind::Trie
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn example_engine() -> TrieAutocomplete {
        TrieAutocomplete::new(&["air", "bat", "bell", "boy"], &[3.0, 2.0, 4.0, 1.0]).unwrap()
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let result = TrieAutocomplete::new(&["air", "bat"], &[1.0]);
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_negative_weight() {
        let result = TrieAutocomplete::new(&["air", "bat"], &[1.0, -2.0]);
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_nan_weight() {
        let result = TrieAutocomplete::new(&["air"], &[f64::NAN]);
        assert!(result.is_err());
    }

    #[test]
    fn test_add_rejects_empty_word() {
        let mut trie = TrieAutocomplete::new::<&str>(&[], &[]).unwrap();
        assert!(trie.add("", 1.0).is_err());
        assert!(trie.is_empty());
        trie.verify();
    }

    #[test]
    fn test_len_counts_distinct_words() {
        let engine = example_engine();
        assert_eq!(engine.len(), 4);
        assert!(!engine.is_empty());
    }

    #[test]
    fn test_shared_prefixes_share_nodes() {
        // "bat", "bell" and "boy" share the 'b' node: eleven path characters
        // plus the root.
        let engine = example_engine();
        assert_eq!(engine.nodes.len(), 12);
        engine.verify();
    }

    #[test]
    fn test_top_matches_example_corpus() {
        let engine = example_engine();
        assert_eq!(engine.top_matches("b", 2), ["bell", "bat"]);
        assert_eq!(engine.top_matches("a", 2), ["air"]);
        assert_eq!(engine.top_matches("b", 10), ["bell", "bat", "boy"]);
    }

    #[test]
    fn test_top_matches_k_zero() {
        let engine = example_engine();
        assert!(engine.top_matches("b", 0).is_empty());
        assert!(engine.top_matches("", 0).is_empty());
    }

    #[test]
    fn test_top_matches_huge_k() {
        // k far beyond the corpus size is legal and must not reserve memory
        // proportional to k.
        let engine = example_engine();
        assert_eq!(engine.top_matches("b", usize::MAX), ["bell", "bat", "boy"]);
    }

    #[test]
    fn test_top_matches_absent_prefix() {
        let engine = example_engine();
        assert!(engine.top_matches("z", 3).is_empty());
        assert!(engine.top_matches("bells", 3).is_empty());
    }

    #[test]
    fn test_top_matches_empty_prefix_ranks_whole_corpus() {
        let engine = example_engine();
        assert_eq!(engine.top_matches("", 10), ["bell", "air", "bat", "boy"]);
    }

    #[test]
    fn test_top_matches_full_word_prefix() {
        let engine = example_engine();
        assert_eq!(engine.top_matches("bell", 3), ["bell"]);
    }

    #[test]
    fn test_top_matches_weight_tie_prefers_smaller_word() {
        let engine =
            TrieAutocomplete::new(&["beta", "alpha", "gamma"], &[3.0, 3.0, 3.0]).unwrap();
        assert_eq!(engine.top_matches("", 2), ["alpha", "beta"]);
    }

    #[test]
    fn test_top_matches_nested_words() {
        let engine = TrieAutocomplete::new(
            &["bat", "batch", "batcher", "batting"],
            &[1.0, 4.0, 2.0, 3.0],
        )
        .unwrap();
        assert_eq!(
            engine.top_matches("bat", 4),
            ["batch", "batting", "batcher", "bat"]
        );
        assert_eq!(engine.top_matches("batc", 4), ["batch", "batcher"]);
    }

    #[test]
    fn test_top_match() {
        let engine = example_engine();
        assert_eq!(engine.top_match("b"), "bell");
        assert_eq!(engine.top_match("bo"), "boy");
        assert_eq!(engine.top_match(""), "bell");
        assert_eq!(engine.top_match("z"), "");
    }

    #[test]
    fn test_top_match_descends_past_lighter_terminal() {
        let engine = TrieAutocomplete::new(&["bat", "batter"], &[2.0, 5.0]).unwrap();
        assert_eq!(engine.top_match("bat"), "batter");
    }

    #[test]
    fn test_top_match_tie_prefers_shorter_word() {
        let engine = TrieAutocomplete::new(&["bat", "batter"], &[5.0, 5.0]).unwrap();
        assert_eq!(engine.top_match("bat"), "bat");
        assert_eq!(engine.top_matches("bat", 1), ["bat"]);
    }

    #[test]
    fn test_weight_of_is_case_sensitive() {
        let engine = example_engine();
        assert_eq!(engine.weight_of("bell"), 4.0);
        assert_eq!(engine.weight_of("Bell"), 0.0);
        assert_eq!(engine.weight_of("cat"), 0.0);
    }

    #[test]
    fn test_weight_of_proper_prefix_is_not_a_word() {
        let engine = example_engine();
        assert_eq!(engine.weight_of("bel"), 0.0);
        assert_eq!(engine.weight_of("bells"), 0.0);
    }

    #[test]
    fn test_add_new_word_updates_queries() {
        let mut engine = example_engine();
        engine.add("bonus", 9.0).unwrap();
        assert_eq!(engine.len(), 5);
        assert_eq!(engine.top_match("b"), "bonus");
        assert_eq!(engine.weight_of("bonus"), 9.0);
        engine.verify();
    }

    #[test]
    fn test_reinsert_updates_weight_in_place() {
        let mut engine = example_engine();
        let nodes_before = engine.nodes.len();
        engine.add("bat", 6.0).unwrap();
        assert_eq!(engine.len(), 4);
        assert_eq!(engine.nodes.len(), nodes_before);
        assert_eq!(engine.weight_of("bat"), 6.0);
        assert_eq!(engine.top_matches("b", 2), ["bat", "bell"]);
        engine.verify();
    }

    #[test]
    fn test_reinsert_with_lower_weight_repairs_caches() {
        let mut engine = example_engine();
        engine.add("bell", 0.5).unwrap();
        engine.verify();
        assert_eq!(engine.weight_of("bell"), 0.5);
        assert_eq!(engine.top_matches("b", 2), ["bat", "boy"]);
        assert_eq!(engine.top_match("b"), "bat");
    }

    #[test]
    fn test_lowering_shared_prefix_keeps_sibling_maxima() {
        let mut engine =
            TrieAutocomplete::new(&["bat", "batch", "bath"], &[9.0, 7.0, 5.0]).unwrap();
        engine.add("bat", 1.0).unwrap();
        engine.verify();
        assert_eq!(engine.top_match("bat"), "batch");
        assert_eq!(engine.top_matches("bat", 3), ["batch", "bath", "bat"]);
    }

    #[test]
    fn test_zero_weight_words() {
        let engine = TrieAutocomplete::new(&["ant", "ape"], &[0.0, 0.0]).unwrap();
        engine.verify();
        assert_eq!(engine.top_matches("a", 2), ["ant", "ape"]);
        assert_eq!(engine.top_match("a"), "ant");
        assert_eq!(engine.weight_of("ant"), 0.0);
    }

    #[test]
    fn test_empty_corpus_queries() {
        let engine = TrieAutocomplete::new::<&str>(&[], &[]).unwrap();
        engine.verify();
        assert!(engine.top_matches("a", 3).is_empty());
        assert!(engine.top_matches("", 3).is_empty());
        assert_eq!(engine.top_match(""), "");
        assert_eq!(engine.top_match("a"), "");
        assert_eq!(engine.weight_of("a"), 0.0);
    }

    #[test]
    #[should_panic(expected = "stale subtree maximum")]
    fn test_verify_detects_stale_cache() {
        let mut engine = example_engine();
        engine.nodes[1].subtree_max = 100.0;
        engine.verify();
    }

    #[test]
    fn test_randomized_inserts_keep_invariants() {
        fastrand::seed(0x7219);
        for _ in 0..30 {
            let mut engine = TrieAutocomplete::new::<&str>(&[], &[]).unwrap();
            let mut reference: HashMap<String, f64> = HashMap::new();

            for _ in 0..fastrand::usize(1..120) {
                let len = fastrand::usize(1..7);
                let word: String = (0..len).map(|_| fastrand::char('a'..='e')).collect();
                let weight = f64::from(fastrand::u32(0..16));
                engine.add(&word, weight).unwrap();
                reference.insert(word, weight);
            }

            engine.verify();
            assert_eq!(engine.len(), reference.len());
            for (word, &weight) in &reference {
                assert_eq!(engine.weight_of(word), weight, "weight of {word:?}");
            }
        }
    }
}
