//! Robin Hood open-addressing table mapping a leading character to an [`Edge`].
//!
//! Each trie node keeps its outgoing edges here. Keys are the first character
//! of each edge label and hash to their position in the alphabet, with upper
//! and lower case sharing a home slot.
//!
//! Capacities follow the fixed sequence 3, 7, 11, 17, 23, 29. A node over a
//! letters-only vocabulary has at most 26 distinct first characters, so 29 is
//! the terminal capacity. A mixed-case vocabulary can exceed it, which
//! surfaces as [`AutocompleteError::EdgeTableFull`].

use std::fmt;
use std::mem;

use crate::error::{AutocompleteError, Result};
use crate::trie::TrieNode;

// =============================================================================
// Configuration
// =============================================================================

/// Capacities the table grows through. The last one is terminal.
pub const CAPACITY_SEQUENCE: [usize; 6] = [3, 7, 11, 17, 23, 29];

/// Grow before an insertion would push used slots to this fraction of capacity.
pub const MAX_LOAD_FACTOR: f64 = 0.9;

#[inline]
fn alphabet_index(c: char) -> usize {
    match c {
        'A'..='Z' => c as usize - 'A' as usize,
        'a'..='z' => c as usize - 'a' as usize,
        // Never a stored key; any deterministic slot works for a miss.
        _ => c as usize,
    }
}

#[inline]
fn home_slot(c: char, capacity: usize) -> usize {
    alphabet_index(c) % capacity
}

/// Distance travelled from `home` to `index`, wrapping around the table.
#[inline]
fn probe_distance(home: usize, index: usize, capacity: usize) -> usize {
    (index + capacity - home) % capacity
}

fn next_capacity(current: usize) -> usize {
    CAPACITY_SEQUENCE
        .iter()
        .copied()
        .find(|&c| c > current)
        .unwrap_or(current)
}

// =============================================================================
// Edge
// =============================================================================

/// A labelled connection from a node to the child it owns.
#[derive(Clone, Debug)]
pub struct Edge {
    pub(crate) label: String,
    pub(crate) child: Box<TrieNode>,
}

impl Edge {
    pub fn new(label: impl Into<String>, child: TrieNode) -> Result<Self> {
        let label = label.into();
        if label.is_empty() {
            return Err(AutocompleteError::EmptyLabel);
        }
        if !label.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(AutocompleteError::InvalidLabel(label));
        }
        Ok(Self::from_parts(label, Box::new(child)))
    }

    #[inline]
    pub(crate) fn from_parts(label: String, child: Box<TrieNode>) -> Self {
        debug_assert!(!label.is_empty(), "edge labels are never empty");
        Self { label, child }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn child(&self) -> &TrieNode {
        &self.child
    }

    /// Labels are non-empty ASCII, so the first byte is the first character.
    #[inline]
    pub fn first_char(&self) -> char {
        self.label.as_bytes()[0] as char
    }

    /// Cuts the label after `at` bytes and inserts a fresh node between this
    /// edge and its old child, reached through the cut-off tail.
    ///
    /// Returns the fresh node.
    pub(crate) fn split_at(&mut self, at: usize) -> &mut TrieNode {
        debug_assert!(at > 0 && at < self.label.len());
        let tail = self.label.split_off(at);
        let old_child = mem::replace(&mut self.child, Box::new(TrieNode::new()));
        self.child.edges = EdgeTable::singleton(Edge::from_parts(tail, old_child));
        &mut self.child
    }
}

// =============================================================================
// Slots
// =============================================================================

#[derive(Clone, Debug, Default)]
pub enum Slot {
    #[default]
    Empty,
    /// A removed edge. Probing continues past it; rehash drops it.
    Tombstone,
    Occupied(Edge),
}

impl Slot {
    #[inline]
    fn edge(&self) -> Option<&Edge> {
        match self {
            Slot::Occupied(edge) => Some(edge),
            _ => None,
        }
    }
}

// =============================================================================
// EdgeTable
// =============================================================================

#[derive(Clone, Debug)]
pub struct EdgeTable {
    slots: Vec<Slot>,
    len: usize,
    tombstones: usize,
    max_probe_distance: usize,
}

impl EdgeTable {
    pub fn new() -> Self {
        Self::with_capacity(CAPACITY_SEQUENCE[0])
    }

    fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, Slot::default);
        Self {
            slots,
            len: 0,
            tombstones: 0,
            max_probe_distance: 0,
        }
    }

    pub(crate) fn singleton(edge: Edge) -> Self {
        let mut table = Self::new();
        table.place(edge);
        table
    }

    /// Number of live edges.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Longest distance any edge sits from its home slot. Lookups never probe
    /// further than this.
    pub fn max_probe_distance(&self) -> usize {
        self.max_probe_distance
    }

    /// Stores `edge` under its first character.
    ///
    /// If an edge with the same first character is already stored it is
    /// replaced in place and returned.
    pub fn insert(&mut self, edge: Edge) -> Result<Option<Edge>> {
        if let Some(index) = self.find_index(edge.first_char()) {
            let old = mem::replace(&mut self.slots[index], Slot::Occupied(edge));
            return Ok(match old {
                Slot::Occupied(old) => Some(old),
                _ => None,
            });
        }

        let used = self.len + self.tombstones + 1;
        if used as f64 / self.capacity() as f64 >= MAX_LOAD_FACTOR {
            self.grow();
        }
        if self.len >= self.capacity() {
            return Err(AutocompleteError::EdgeTableFull {
                capacity: self.capacity(),
            });
        }

        self.place(edge);
        Ok(None)
    }

    pub fn search(&self, first: char) -> Option<&Edge> {
        let index = self.find_index(first)?;
        self.slots[index].edge()
    }

    pub fn search_mut(&mut self, first: char) -> Option<&mut Edge> {
        let index = self.find_index(first)?;
        match &mut self.slots[index] {
            Slot::Occupied(edge) => Some(edge),
            _ => None,
        }
    }

    /// Soft delete: the slot becomes a tombstone and keeps its place in the
    /// table until the next rehash.
    pub fn remove(&mut self, first: char) -> Option<Edge> {
        let index = self.find_index(first)?;
        match mem::replace(&mut self.slots[index], Slot::Tombstone) {
            Slot::Occupied(edge) => {
                self.len -= 1;
                self.tombstones += 1;
                Some(edge)
            }
            other => {
                self.slots[index] = other;
                None
            }
        }
    }

    /// Live edges in slot order.
    pub fn edges(&self) -> Edges<'_> {
        Edges {
            slots: self.slots.iter(),
        }
    }

    fn find_index(&self, first: char) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let capacity = self.capacity();
        let home = home_slot(first, capacity);
        for step in 0..=self.max_probe_distance {
            let index = (home + step) % capacity;
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Tombstone => {}
                Slot::Occupied(edge) if edge.first_char() == first => return Some(index),
                Slot::Occupied(_) => {}
            }
        }
        None
    }

    /// Robin Hood placement. The caller guarantees a free slot exists and that
    /// no live edge shares the first character.
    fn place(&mut self, mut edge: Edge) {
        let capacity = self.capacity();
        let mut index = home_slot(edge.first_char(), capacity);
        let mut distance = 0;

        loop {
            let slot = &mut self.slots[index];
            match slot {
                Slot::Occupied(resident) => {
                    let resident_home = home_slot(resident.first_char(), capacity);
                    let resident_distance = probe_distance(resident_home, index, capacity);
                    if distance > resident_distance {
                        mem::swap(resident, &mut edge);
                        self.max_probe_distance = self.max_probe_distance.max(distance);
                        distance = resident_distance;
                    }
                }
                _ => {
                    if matches!(slot, Slot::Tombstone) {
                        self.tombstones -= 1;
                    }
                    *slot = Slot::Occupied(edge);
                    self.len += 1;
                    self.max_probe_distance = self.max_probe_distance.max(distance);
                    return;
                }
            }
            index = (index + 1) % capacity;
            distance += 1;
        }
    }

    fn grow(&mut self) {
        let old_capacity = self.capacity();
        let new_capacity = next_capacity(old_capacity);
        log::trace!("edge table rehash: {old_capacity} -> {new_capacity} slots");

        let old = mem::replace(self, Self::with_capacity(new_capacity));
        for slot in old.slots {
            if let Slot::Occupied(edge) = slot {
                self.place(edge);
            }
        }
    }
}

impl Default for EdgeTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders each slot as its label, or `_` when it holds no live edge.
impl fmt::Display for EdgeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match slot.edge() {
                Some(edge) => f.write_str(&edge.label)?,
                None => f.write_str("_")?,
            }
        }
        Ok(())
    }
}

pub struct Edges<'a> {
    slots: std::slice::Iter<'a, Slot>,
}

impl<'a> Iterator for Edges<'a> {
    type Item = &'a Edge;

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.by_ref().find_map(Slot::edge)
    }
}
