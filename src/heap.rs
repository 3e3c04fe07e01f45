//! Fixed-capacity binary min-heap keeping the best `k` ranked words.
//!
//! The minimum is the least valuable entry, so when the heap is full a new
//! candidate only needs to beat the root to get in.

use std::cmp::Ordering;

use crate::error::{AutocompleteError, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeapEntry {
    pub word: String,
    pub importance: u32,
}

impl HeapEntry {
    pub fn new(word: impl Into<String>, importance: u32) -> Self {
        Self {
            word: word.into(),
            importance,
        }
    }

    /// Higher importance wins; equal importance goes to the lexicographically
    /// smaller word.
    pub fn outranks(&self, other: &HeapEntry) -> bool {
        self > other
    }
}

/// Ordered by rank: `a > b` iff `a` outranks `b`.
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.importance
            .cmp(&other.importance)
            .then_with(|| other.word.cmp(&self.word))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Clone, Debug)]
pub struct BoundedMinHeap {
    entries: Vec<HeapEntry>,
    capacity: usize,
}

impl BoundedMinHeap {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn peek_min(&self) -> Option<&HeapEntry> {
        self.entries.first()
    }

    pub fn insert(&mut self, entry: HeapEntry) -> Result<()> {
        if self.is_full() {
            return Err(AutocompleteError::HeapFull {
                capacity: self.capacity,
            });
        }
        self.entries.push(entry);
        self.sift_up(self.entries.len() - 1);
        Ok(())
    }

    pub fn delete_min(&mut self) -> Option<HeapEntry> {
        if self.entries.is_empty() {
            return None;
        }
        let min = self.entries.swap_remove(0);
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some(min)
    }

    /// Whether a candidate with this rank would be kept.
    pub fn admits(&self, word: &str, importance: u32) -> bool {
        if !self.is_full() {
            return true;
        }
        match self.peek_min() {
            Some(min) => {
                importance > min.importance
                    || (importance == min.importance && word < min.word.as_str())
            }
            None => false,
        }
    }

    /// Keeps `entry` if it is among the best `capacity` seen, evicting the
    /// current minimum when full. Returns whether it was kept.
    pub fn offer(&mut self, entry: HeapEntry) -> bool {
        if !self.admits(&entry.word, entry.importance) {
            return false;
        }
        if self.is_full() {
            self.entries[0] = entry;
            self.sift_down(0);
        } else {
            self.entries.push(entry);
            self.sift_up(self.entries.len() - 1);
        }
        true
    }

    /// Empties the heap, returning words from best to worst rank.
    pub fn drain_sorted(&mut self) -> Vec<String> {
        let mut words = Vec::with_capacity(self.entries.len());
        while let Some(entry) = self.delete_min() {
            words.push(entry.word);
        }
        words.reverse();
        words
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.entries[index] >= self.entries[parent] {
                break;
            }
            self.entries.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.entries[right] < self.entries[left] {
                right
            } else {
                left
            };
            if self.entries[child] >= self.entries[index] {
                break;
            }
            self.entries.swap(index, child);
            index = child;
        }
    }
}
