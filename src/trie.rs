//! Compressed trie over ASCII-letter words.
//!
//! Chains of single-child nodes are folded into one edge labelled with the
//! whole chain. Edges are split on insertion when a new word diverges partway
//! through a label, so every non-root node either ends a word or branches.

use std::fmt;

use crate::edge_table::{Edge, EdgeTable};
use crate::error::{AutocompleteError, Result};

#[derive(Clone, Debug, Default)]
pub struct TrieNode {
    pub(crate) edges: EdgeTable,
    pub(crate) is_end_of_word: bool,
    pub(crate) importance: u32,
}

impl TrieNode {
    pub fn new() -> Self {
        Self::default()
    }

    fn terminal() -> Self {
        Self {
            is_end_of_word: true,
            ..Self::default()
        }
    }

    pub fn edges(&self) -> &EdgeTable {
        &self.edges
    }

    pub fn is_end_of_word(&self) -> bool {
        self.is_end_of_word
    }

    pub fn importance(&self) -> u32 {
        self.importance
    }

    pub fn is_leaf(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Where a prefix lands in the trie.
///
/// When the prefix ends partway through an edge label, `node` is that edge's
/// child and `suffix` is the unmatched rest of the label: every word under the
/// prefix continues with `suffix`.
#[derive(Clone, Copy, Debug)]
pub struct PrefixResult<'a> {
    pub node: &'a TrieNode,
    pub suffix: &'a str,
}

impl PrefixResult<'_> {
    /// True when the prefix stopped inside an edge label.
    pub fn has_forced_suffix(&self) -> bool {
        !self.suffix.is_empty()
    }
}

#[inline]
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.bytes().zip(b.bytes()).take_while(|(x, y)| x == y).count()
}

#[inline]
fn first_char(s: &str) -> Option<char> {
    s.as_bytes().first().map(|&b| b as char)
}

// =============================================================================
// CompressedTrie
// =============================================================================

#[derive(Clone, Default)]
pub struct CompressedTrie {
    root: TrieNode,
    len: usize,
}

impl CompressedTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct words stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Nodes in the trie, root included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.edges.edges().map(Edge::child));
        }
        count
    }

    /// Inserts `word`, splitting edges as needed.
    ///
    /// Returns `false` if the word was already present. Words must consist of
    /// ASCII letters only; the empty word marks the root.
    pub fn insert(&mut self, word: &str) -> Result<bool> {
        if !word.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(AutocompleteError::InvalidWord(word.to_string()));
        }
        let added = Self::insert_at(&mut self.root, word)?;
        if added {
            self.len += 1;
        }
        Ok(added)
    }

    fn insert_at(node: &mut TrieNode, word: &str) -> Result<bool> {
        let Some(first) = first_char(word) else {
            let added = !node.is_end_of_word;
            node.is_end_of_word = true;
            return Ok(added);
        };

        let Some(edge) = node.edges.search_mut(first) else {
            node.edges
                .insert(Edge::from_parts(word.to_string(), Box::new(TrieNode::terminal())))?;
            return Ok(true);
        };

        let common = common_prefix_len(&edge.label, word);
        if common == edge.label.len() {
            return Self::insert_at(&mut edge.child, &word[common..]);
        }

        let middle = edge.split_at(common);
        let rest = &word[common..];
        if rest.is_empty() {
            middle.is_end_of_word = true;
            Ok(true)
        } else {
            Self::insert_at(middle, rest)
        }
    }

    /// Exact membership. Every edge on the path must match in full.
    pub fn search(&self, word: &str) -> bool {
        self.word_node(word).is_some()
    }

    pub fn importance(&self, word: &str) -> Option<u32> {
        self.word_node(word).map(TrieNode::importance)
    }

    /// Adds one to the importance of `word`. Returns `false` if it is not a
    /// stored word.
    pub fn increment_importance(&mut self, word: &str) -> bool {
        match self.word_node_mut(word) {
            Some(node) => {
                node.importance = node.importance.saturating_add(1);
                true
            }
            None => false,
        }
    }

    pub fn set_importance(&mut self, word: &str, importance: u32) -> bool {
        match self.word_node_mut(word) {
            Some(node) => {
                node.importance = importance;
                true
            }
            None => false,
        }
    }

    fn word_node(&self, word: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        let mut rest = word;
        while let Some(first) = first_char(rest) {
            let edge = node.edges.search(first)?;
            rest = rest.strip_prefix(edge.label.as_str())?;
            node = edge.child();
        }
        node.is_end_of_word.then_some(node)
    }

    fn word_node_mut(&mut self, word: &str) -> Option<&mut TrieNode> {
        let mut node = &mut self.root;
        let mut rest = word;
        while let Some(first) = first_char(rest) {
            let edge = node.edges.search_mut(first)?;
            rest = rest.strip_prefix(edge.label.as_str())?;
            node = &mut *edge.child;
        }
        if node.is_end_of_word {
            Some(node)
        } else {
            None
        }
    }

    /// Resolves `prefix` to a position in the trie.
    ///
    /// Returns `None` when no stored path spells the prefix.
    pub fn find_prefix_node<'a>(&'a self, prefix: &str) -> Option<PrefixResult<'a>> {
        let mut node = &self.root;
        let mut rest = prefix;
        loop {
            let Some(first) = first_char(rest) else {
                return Some(PrefixResult { node, suffix: "" });
            };
            let edge = node.edges.search(first)?;
            if rest.len() <= edge.label.len() {
                let child: &TrieNode = &edge.child;
                return edge
                    .label
                    .strip_prefix(rest)
                    .map(|suffix| PrefixResult { node: child, suffix });
            }
            rest = rest.strip_prefix(edge.label.as_str())?;
            node = edge.child();
        }
    }

    /// All stored words with their importance, in no particular order.
    pub fn words(&self) -> Words<'_> {
        Words {
            stack: vec![(&self.root, String::new())],
        }
    }
}

impl fmt::Debug for CompressedTrie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.words()).finish()
    }
}

pub struct Words<'a> {
    stack: Vec<(&'a TrieNode, String)>,
}

impl Iterator for Words<'_> {
    type Item = (String, u32);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, word)) = self.stack.pop() {
            for edge in node.edges.edges() {
                let mut child_word = String::with_capacity(word.len() + edge.label.len());
                child_word.push_str(&word);
                child_word.push_str(&edge.label);
                self.stack.push((edge.child(), child_word));
            }
            if node.is_end_of_word {
                return Some((word, node.importance));
            }
        }
        None
    }
}
