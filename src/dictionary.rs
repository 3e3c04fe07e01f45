//! Loading a vocabulary and its usage counts from plain text.
//!
//! Input is split on whitespace. Each token is cleaned with [`clean_word`];
//! tokens that are empty or still contain non-letters afterwards are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::analyzer::PrefixAnalyzer;
use crate::error::{AutocompleteError, Result};
use crate::trie::CompressedTrie;

/// Lower-cases `word` and strips leading and trailing characters outside
/// `a..=z`. Interior characters are kept, so `"Don't!"` becomes `"don't"`.
pub fn clean_word(word: &str) -> String {
    let lower = word.to_lowercase();
    lower
        .trim_matches(|c: char| !c.is_ascii_lowercase())
        .to_string()
}

/// True if `word` has any character that is not an ASCII letter.
pub fn has_special(word: &str) -> bool {
    !word.chars().all(|c| c.is_ascii_alphabetic())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Tokens inserted, duplicates included.
    pub accepted: usize,
    /// Tokens dropped as empty or containing non-letters after cleaning.
    pub skipped: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Dictionary {
    trie: CompressedTrie,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trie(&self) -> &CompressedTrie {
        &self.trie
    }

    pub fn into_trie(self) -> CompressedTrie {
        self.trie
    }

    pub fn analyzer(&self) -> PrefixAnalyzer<'_> {
        PrefixAnalyzer::new(&self.trie)
    }

    pub fn load_words<R: BufRead>(&mut self, reader: R) -> Result<LoadStats> {
        let mut stats = LoadStats::default();
        for line in reader.lines() {
            let line = line?;
            for token in line.split_whitespace() {
                let word = clean_word(token);
                if word.is_empty() || has_special(&word) {
                    log::debug!("skipping dictionary token {token:?}");
                    stats.skipped += 1;
                    continue;
                }
                self.trie.insert(&word)?;
                stats.accepted += 1;
            }
        }
        log::info!(
            "loaded {} words ({} tokens skipped, {} distinct)",
            stats.accepted,
            stats.skipped,
            self.trie.len()
        );
        Ok(stats)
    }

    pub fn load_words_file(&mut self, path: impl AsRef<Path>) -> Result<LoadStats> {
        let reader = open(path.as_ref())?;
        self.load_words(reader)
    }

    /// Counts one use of every dictionary word found in `reader`.
    ///
    /// Returns the number of importance increments made.
    pub fn update_importance<R: BufRead>(&mut self, reader: R) -> Result<usize> {
        let mut hits = 0;
        let mut misses = 0;
        for line in reader.lines() {
            let line = line?;
            for token in line.split_whitespace() {
                let word = clean_word(token);
                if word.is_empty() || has_special(&word) {
                    continue;
                }
                if self.trie.increment_importance(&word) {
                    hits += 1;
                } else {
                    misses += 1;
                }
            }
        }
        log::info!("importance updated from {hits} tokens ({misses} not in dictionary)");
        Ok(hits)
    }

    pub fn update_importance_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let reader = open(path.as_ref())?;
        self.update_importance(reader)
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| AutocompleteError::ReadFile {
            path: path.to_path_buf(),
            source,
        })
}
