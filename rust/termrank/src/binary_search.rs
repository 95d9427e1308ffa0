//! Autocompletion over a lexicographically sorted term array.
//!
//! [`BinarySearchAutocomplete`] keeps the vocabulary as a single `Vec<Term>`
//! sorted by word. A query locates the contiguous run of terms sharing the
//! queried prefix with two binary searches ([`first_index_of`] and
//! [`last_index_of`], each bounded by `1 + ceil(log2 n)` comparator calls)
//! and then scans only that run, retaining the k strongest candidates in a
//! bounded [`TopK`] set.
//!
//! The array is immutable after construction; queries never mutate shared
//! state, so a built engine can be shared freely across threads.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use termrank_common::{Result, verify_arg};
use termrank_topk::TopK;

use crate::term::{RankedTerm, Term};
use crate::{Autocomplete, EngineKind};

/// Prefix-autocompletion engine backed by a sorted array of terms.
///
/// # Examples
///
/// ```
/// use termrank::{Autocomplete, BinarySearchAutocomplete};
///
/// let engine = BinarySearchAutocomplete::new(
///     &["air", "bat", "bell", "boy"],
///     &[3.0, 2.0, 4.0, 1.0],
/// )
/// .unwrap();
///
/// assert_eq!(engine.top_matches("b", 2), ["bell", "bat"]);
/// assert_eq!(engine.weight_of("boy"), 1.0);
/// ```
pub struct BinarySearchAutocomplete {
    /// Terms sorted by `Term::lexicographic_order`, fixed after construction.
    terms: Vec<Term>,
}

impl BinarySearchAutocomplete {
    /// Builds an engine from parallel word and weight sequences.
    ///
    /// A word appearing more than once keeps its last weight, so the engine
    /// agrees with repeated [`TrieAutocomplete::add`](crate::TrieAutocomplete::add)
    /// calls on the same corpus.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error if the sequences differ in length,
    /// if any word is empty, or if any weight is negative or NaN.
    pub fn new<S: AsRef<str>>(words: &[S], weights: &[f64]) -> Result<BinarySearchAutocomplete> {
        verify_arg!(weights, words.len() == weights.len());
        let mut vocabulary: BTreeMap<String, Term> = BTreeMap::new();
        for (word, &weight) in words.iter().zip(weights) {
            let term = Term::new(word.as_ref(), weight)?;
            vocabulary.insert(word.as_ref().to_string(), term);
        }
        Ok(BinarySearchAutocomplete {
            terms: vocabulary.into_values().collect(),
        })
    }

    /// Returns the number of distinct words in the vocabulary.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Locates the inclusive index range of terms whose words start with
    /// `prefix`, or `None` if no word does.
    fn prefix_range(&self, prefix: &str) -> Option<(usize, usize)> {
        let first = first_index_of(&self.terms, |term| prefix_compare(term.word(), prefix))?;
        let last = last_index_of(&self.terms, |term| prefix_compare(term.word(), prefix))?;
        Some((first, last))
    }
}

impl Autocomplete for BinarySearchAutocomplete {
    fn top_matches(&self, prefix: &str, k: usize) -> Vec<String> {
        if k == 0 {
            return Vec::new();
        }
        let Some((first, last)) = self.prefix_range(prefix) else {
            return Vec::new();
        };
        let mut candidates = TopK::new(k);
        for term in &self.terms[first..=last] {
            candidates.insert(RankedTerm(term));
        }
        candidates
            .into_sorted_vec()
            .into_iter()
            .map(|ranked| ranked.0.word().to_string())
            .collect()
    }

    fn top_match(&self, prefix: &str) -> String {
        let Some((first, last)) = self.prefix_range(prefix) else {
            return String::new();
        };
        // Strict comparison: among equal weights the earliest term wins, which
        // is the lexicographically smallest since the array is word-sorted.
        let mut best = &self.terms[first];
        for term in &self.terms[first + 1..=last] {
            if term.weight() > best.weight() {
                best = term;
            }
        }
        best.word().to_string()
    }

    fn weight_of(&self, word: &str) -> f64 {
        self.terms
            .iter()
            .find(|term| eq_ignore_case(term.word(), word))
            .map_or(0.0, Term::weight)
    }

    fn kind(&self) -> EngineKind {
        EngineKind::BinarySearch
    }
}

/// Returns the index of the first element matching the searched key, or `None`
/// if no element matches.
///
/// `compare` positions an element relative to the key: `Less` means the
/// element precedes every match, `Equal` means it matches, and `Greater` means
/// it follows every match. The slice must be partitioned accordingly (all
/// `Less` elements, then all `Equal`, then all `Greater`), which any
/// comparator derived from the slice's sort order satisfies.
///
/// Invokes `compare` at most `1 + ceil(log2 n)` times for a slice of `n`
/// elements: the search keeps halving a closed interval instead of stopping
/// at an arbitrary match, so runs of equal elements cost no extra scans.
pub fn first_index_of<T, F>(items: &[T], compare: F) -> Option<usize>
where
    F: Fn(&T) -> Ordering,
{
    if items.is_empty() {
        return None;
    }
    let mut lo = 0;
    let mut hi = items.len() - 1;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if compare(&items[mid]) == Ordering::Less {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    (compare(&items[lo]) == Ordering::Equal).then_some(lo)
}

/// Returns the index of the last element matching the searched key, or `None`
/// if no element matches.
///
/// The comparator contract and the `1 + ceil(log2 n)` bound are the same as
/// for [`first_index_of`]; the midpoint is biased upward so the interval
/// converges on the last match instead of the first.
pub fn last_index_of<T, F>(items: &[T], compare: F) -> Option<usize>
where
    F: Fn(&T) -> Ordering,
{
    if items.is_empty() {
        return None;
    }
    let mut lo = 0;
    let mut hi = items.len() - 1;
    while lo < hi {
        let mid = lo + (hi - lo).div_ceil(2);
        if compare(&items[mid]) == Ordering::Greater {
            hi = mid - 1;
        } else {
            lo = mid;
        }
    }
    (compare(&items[lo]) == Ordering::Equal).then_some(lo)
}

/// Compares `word`, truncated to the character length of `prefix`, against
/// `prefix`. `Equal` therefore means "`word` starts with `prefix`"; a word
/// shorter than the prefix orders before every word that extends it.
fn prefix_compare(word: &str, prefix: &str) -> Ordering {
    let mut word_chars = word.chars();
    for prefix_ch in prefix.chars() {
        let Some(word_ch) = word_chars.next() else {
            return Ordering::Less;
        };
        match word_ch.cmp(&prefix_ch) {
            Ordering::Equal => (),
            non_eq => return non_eq,
        }
    }
    Ordering::Equal
}

/// Character-wise case-insensitive equality over full words.
fn eq_ignore_case(left: &str, right: &str) -> bool {
    let mut left = left.chars();
    let mut right = right.chars();
    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (Some(lch), Some(rch)) if to_upper(lch) == to_upper(rch) => (),
            _ => return false,
        }
    }
}

/// Uppercases a single character, leaving characters whose uppercase form
/// expands to multiple code points unchanged.
fn to_upper(c: char) -> char {
    if c.is_lowercase() {
        let mut uppercase = c.to_uppercase();
        match (uppercase.next(), uppercase.next()) {
            (Some(ch), None) => ch,
            _ => c,
        }
    } else {
        c
    }
}
