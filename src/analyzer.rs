//! Prefix queries over a [`CompressedTrie`]: top-k completions, average
//! importance and next-letter prediction.

use crate::error::{AutocompleteError, Result};
use crate::heap::{BoundedMinHeap, HeapEntry};
use crate::trie::{CompressedTrie, TrieNode};

#[derive(Clone, Copy, Debug)]
pub struct PrefixAnalyzer<'a> {
    trie: &'a CompressedTrie,
}

impl<'a> PrefixAnalyzer<'a> {
    pub fn new(trie: &'a CompressedTrie) -> Self {
        Self { trie }
    }

    pub fn trie(&self) -> &'a CompressedTrie {
        self.trie
    }

    /// The `k` most important words starting with `prefix`, best first.
    ///
    /// Equal importance is broken by ascending word order. Returns fewer than
    /// `k` words when fewer share the prefix, and nothing when none do.
    pub fn top_k_frequent_words_with_prefix(&self, prefix: &str, k: usize) -> Vec<String> {
        if k == 0 {
            return Vec::new();
        }
        let Some(found) = self.trie.find_prefix_node(prefix) else {
            return Vec::new();
        };

        let mut heap = BoundedMinHeap::new(k);
        let mut word = String::with_capacity(prefix.len() + found.suffix.len());
        word.push_str(prefix);
        word.push_str(found.suffix);
        fill_heap(&mut heap, found.node, &mut word);
        heap.drain_sorted()
    }

    /// Mean importance of the words starting with `prefix`, or 0 when there
    /// are none.
    pub fn average_frequency_of_prefix(&self, prefix: &str) -> f64 {
        match self.trie.find_prefix_node(prefix) {
            Some(found) => average(sum_and_count(found.node)),
            None => 0.0,
        }
    }

    /// The character most likely to follow `prefix`.
    ///
    /// If every word under the prefix continues the same way, that character
    /// is returned directly. Otherwise each outgoing edge is scored by the
    /// average importance of the words below it and the first strictly best
    /// one wins.
    pub fn predict_next_letter(&self, prefix: &str) -> Result<char> {
        let found = self
            .trie
            .find_prefix_node(prefix)
            .ok_or_else(|| AutocompleteError::UnknownPrefix(prefix.to_string()))?;

        if let Some(forced) = found.suffix.chars().next() {
            return Ok(forced);
        }

        let mut best: Option<(char, f64)> = None;
        for edge in found.node.edges().edges() {
            // Sibling edges never share a first character, so the child's
            // subtree is exactly the words under `prefix` + that character.
            let score = average(sum_and_count(edge.child()));
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((edge.first_char(), score));
            }
        }

        best.map(|(c, _)| c)
            .ok_or_else(|| AutocompleteError::NoContinuation(prefix.to_string()))
    }
}

fn fill_heap(heap: &mut BoundedMinHeap, node: &TrieNode, word: &mut String) {
    if node.is_end_of_word() && heap.admits(word, node.importance()) {
        heap.offer(HeapEntry::new(word.as_str(), node.importance()));
    }

    for edge in node.edges().edges() {
        let len = word.len();
        word.push_str(edge.label());
        fill_heap(heap, edge.child(), word);
        word.truncate(len);
    }
}

/// Total importance and word count of the subtree under `node`.
fn sum_and_count(node: &TrieNode) -> (u64, u64) {
    let (mut sum, mut count) = if node.is_end_of_word() {
        (u64::from(node.importance()), 1)
    } else {
        (0, 0)
    };
    for edge in node.edges().edges() {
        let (s, c) = sum_and_count(edge.child());
        sum += s;
        count += c;
    }
    (sum, count)
}

fn average((sum, count): (u64, u64)) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}
