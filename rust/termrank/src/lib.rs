//! Prefix autocompletion over a static weighted vocabulary.
//!
//! Given a corpus of (word, weight) pairs, an engine answers three queries:
//! the k highest-weight words starting with a prefix ([`top_matches`]), the
//! single best such word ([`top_match`]), and the weight of an exact word
//! ([`weight_of`]). Results are ordered by descending weight, with weight ties
//! broken by ascending word.
//!
//! [`top_matches`]: Autocomplete::top_matches
//! [`top_match`]: Autocomplete::top_match
//! [`weight_of`]: Autocomplete::weight_of
//!
//! # Available Engines
//!
//! - **Trie** (`"trie"`): a character trie whose nodes cache the maximum
//!   weight within their subtree. Queries run a best-first branch-and-bound
//!   search that skips any subtree which provably cannot reach the top k,
//!   so large low-weight regions of the vocabulary are never visited. Also
//!   supports incremental insertion after construction.
//! - **Binary search** (`"binary-search"`): a word-sorted term array. Queries
//!   locate the prefix range with two binary searches and scan only that
//!   range, retaining candidates in a bounded set.
//!
//! Both engines satisfy the same [`Autocomplete`] contract and return
//! identical results for the same corpus.
//!
//! # Quick Start
//!
//! ```rust
//! use termrank::{Autocomplete, create_engine};
//!
//! let engine = create_engine(
//!     "trie",
//!     &["air", "bat", "bell", "boy"],
//!     &[3.0, 2.0, 4.0, 1.0],
//! )
//! .unwrap();
//!
//! assert_eq!(engine.top_matches("b", 2), ["bell", "bat"]);
//! assert_eq!(engine.top_match("b"), "bell");
//! assert_eq!(engine.weight_of("boy"), 1.0);
//! ```

pub mod binary_search;
pub mod term;
pub mod trie;

use termrank_common::error::Error;

pub use binary_search::{BinarySearchAutocomplete, first_index_of, last_index_of};
pub use term::Term;
pub use termrank_common::Result;
pub use trie::TrieAutocomplete;

/// Query capability shared by every autocompletion engine.
///
/// Queries are infallible: a prefix or word absent from the vocabulary is a
/// normal outcome reported through an empty or zero result, never an error.
/// Engines are immutable during queries and safe to share across threads.
pub trait Autocomplete: Send + Sync {
    /// Returns at most `k` words starting with `prefix`, ordered by strictly
    /// descending weight with weight ties broken by ascending word. Returns
    /// fewer than `k` words only when fewer match; returns no words when the
    /// prefix is absent from the vocabulary or `k` is zero.
    fn top_matches(&self, prefix: &str, k: usize) -> Vec<String>;

    /// Returns the highest-weight word starting with `prefix`, or the empty
    /// string when no word matches. Among equally weighted matches the
    /// lexicographically smallest word is returned.
    fn top_match(&self, prefix: &str) -> String;

    /// Returns the weight of `word`, or 0.0 when it is not in the vocabulary.
    /// The trie engine matches the word case-sensitively; the binary-search
    /// engine ignores case.
    fn weight_of(&self, word: &str) -> f64;

    /// Returns the kind of the engine.
    fn kind(&self) -> EngineKind;
}

/// Enum representing the available engine kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    /// Trie engine with best-first pruned search.
    Trie,
    /// Sorted-array engine with binary-search range location.
    BinarySearch,
}

/// Convert a string name to an EngineKind enum variant.
impl TryFrom<&str> for EngineKind {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self> {
        match name {
            "trie" => Ok(EngineKind::Trie),
            "binary-search" => Ok(EngineKind::BinarySearch),
            _ => Err(Error::invalid_arg(
                "name",
                format!("Unrecognized engine: {name}"),
            )),
        }
    }
}

impl EngineKind {
    /// Get the name of the engine kind as a static string.
    pub const fn name(&self) -> &'static str {
        match self {
            EngineKind::Trie => "trie",
            EngineKind::BinarySearch => "binary-search",
        }
    }
}

/// Creates an autocompletion engine by name over the given corpus.
///
/// This factory function provides configuration-driven engine selection;
/// callers depend only on the [`Autocomplete`] capability, not on the
/// concrete engine type.
///
/// # Arguments
/// * `name` - The name of the engine to create (case-sensitive)
/// * `words` - The vocabulary words
/// * `weights` - A weight per word, parallel to `words`
///
/// # Errors
///
/// Returns an `InvalidArgument` error if the engine name is not recognized,
/// or if the corpus is rejected by the engine's constructor (mismatched
/// lengths, empty word, negative or NaN weight).
pub fn create_engine<S: AsRef<str>>(
    name: &str,
    words: &[S],
    weights: &[f64],
) -> Result<Box<dyn Autocomplete>> {
    match name.try_into()? {
        EngineKind::Trie => Ok(Box::new(TrieAutocomplete::new(words, weights)?)),
        EngineKind::BinarySearch => Ok(Box::new(BinarySearchAutocomplete::new(words, weights)?)),
    }
}
