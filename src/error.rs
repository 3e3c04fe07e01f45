//! Error type shared by every module of the crate.

use std::path::PathBuf;

/// Result alias defaulting to [`AutocompleteError`].
pub type Result<T, E = AutocompleteError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum AutocompleteError {
    /// The trie only stores words made of ASCII letters.
    #[error("word {0:?} contains characters outside the ASCII alphabet")]
    InvalidWord(String),

    #[error("edge labels must not be empty")]
    EmptyLabel,

    #[error("edge label {0:?} contains characters outside the ASCII alphabet")]
    InvalidLabel(String),

    /// Every slot of a terminal-capacity edge table is live.
    #[error("edge table is full ({capacity} slots)")]
    EdgeTableFull { capacity: usize },

    /// Insert into a heap that already holds `capacity` entries.
    #[error("heap is full ({capacity} entries)")]
    HeapFull { capacity: usize },

    #[error("cannot predict next letter: no words start with {0:?}")]
    UnknownPrefix(String),

    #[error("cannot predict next letter: no word continues past {0:?}")]
    NoContinuation(String),

    #[error("failed to read {}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
