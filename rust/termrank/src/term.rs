//! Vocabulary terms and the orderings used to rank them.
//!
//! A [`Term`] pairs a word with a non-negative weight. Two total orders over
//! terms are used throughout the engines:
//!
//! - [`Term::lexicographic_order`] orders by word alone and defines prefix
//!   ranges over a sorted term array.
//! - [`Term::weight_order`] orders by descending weight with an ascending-word
//!   tie-break, and defines the output order of top-matches queries.
//!
//! Weights are validated at construction (non-negative, never NaN), so
//! comparing them through [`ordered_float::OrderedFloat`] agrees with the
//! ordinary IEEE comparison on every stored value.

use std::cmp::Ordering;
use std::fmt;

use ordered_float::OrderedFloat;
use termrank_common::{Result, verify_arg};

/// An immutable (word, weight) pair, the atomic unit of a vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    word: String,
    weight: f64,
}

impl Term {
    /// Creates a term from a word and its weight.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidArgument`](termrank_common::error::ErrorKind) error
    /// if the word is empty, or if the weight is negative or NaN.
    pub fn new(word: impl Into<String>, weight: f64) -> Result<Term> {
        let word = word.into();
        verify_arg!(word, !word.is_empty());
        verify_arg!(weight, weight >= 0.0);
        Ok(Term { word, weight })
    }

    /// Returns the word.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Returns the weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Consumes the term and returns its word.
    pub fn into_word(self) -> String {
        self.word
    }

    /// Orders terms by their words alone.
    pub fn lexicographic_order(a: &Term, b: &Term) -> Ordering {
        a.word.cmp(&b.word)
    }

    /// Orders terms by descending weight, breaking weight ties by ascending
    /// word, so `Less` means "ranks earlier in top-matches output". Sorting a
    /// sequence of terms with this ordering puts the strongest term first.
    pub fn weight_order(a: &Term, b: &Term) -> Ordering {
        OrderedFloat(b.weight)
            .cmp(&OrderedFloat(a.weight))
            .then_with(|| a.word.cmp(&b.word))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.word, self.weight)
    }
}

/// A borrowed term ordered for candidate retention: greater means "ranks
/// earlier in the output", i.e. higher weight, then lexicographically smaller
/// word. This is the element type fed to `TopK` by both engines, so that the
/// weakest retained candidate is always the heap head and weight ties evict
/// the lexicographically larger word first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RankedTerm<'a>(pub &'a Term);

impl Eq for RankedTerm<'_> {}

impl PartialOrd for RankedTerm<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankedTerm<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        Term::weight_order(other.0, self.0)
    }
}
