//! # autocomplete-trie
//!
//! Prefix autocomplete over a compressed trie.
//!
//! Words are stored in a [`CompressedTrie`] whose nodes index their outgoing
//! edges with a small Robin Hood hashtable ([`EdgeTable`]). Each word carries
//! an importance counter, and [`PrefixAnalyzer`] answers three queries over a
//! prefix:
//!
//! - the `k` most important words starting with it,
//! - the average importance of those words,
//! - the most probable next letter.
//!
//! ## Example
//!
//! ```rust
//! use autocomplete_trie::{CompressedTrie, PrefixAnalyzer};
//!
//! let mut trie = CompressedTrie::new();
//! for word in ["cat", "car", "cap"] {
//!     trie.insert(word).unwrap();
//! }
//! trie.set_importance("cat", 5);
//! trie.set_importance("car", 5);
//! trie.set_importance("cap", 3);
//!
//! let analyzer = PrefixAnalyzer::new(&trie);
//! assert_eq!(analyzer.top_k_frequent_words_with_prefix("ca", 2), vec!["car", "cat"]);
//! assert_eq!(analyzer.predict_next_letter("c").unwrap(), 'a');
//! ```

pub mod analyzer;
pub mod dictionary;
pub mod edge_table;
pub mod error;
pub mod heap;
pub mod trie;

pub use analyzer::PrefixAnalyzer;
pub use dictionary::{clean_word, has_special, Dictionary, LoadStats};
pub use edge_table::{Edge, EdgeTable, Slot};
pub use error::{AutocompleteError, Result};
pub use heap::{BoundedMinHeap, HeapEntry};
pub use trie::{CompressedTrie, PrefixResult, TrieNode};

#[cfg(test)]
mod proptests;
