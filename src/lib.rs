//! In-memory word store indexed by prefix, with frequency-ranked completion.
//!
//! [`trie::Trie`] holds the words, [`ranking`] orders completions, and
//! [`dictionary`] reads and writes the line-oriented dictionary file the
//! command line tool keeps in sync with the tree.

pub mod dictionary;
pub mod ranking;
pub mod trie;

pub use ranking::Completion;
pub use trie::{Longest, Trie, TrieError};

#[cfg(test)]
mod proptests;
