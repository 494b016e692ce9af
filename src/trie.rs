//! Prefix tree over the lowercase ASCII alphabet.
//!
//! Every operation validates its input up front: ASCII letters are accepted and
//! folded to lower case, anything else is rejected with [`TrieError`] before the
//! tree is touched. The tree is single-writer; share it across threads only
//! behind an external lock.

use thiserror::Error;

use crate::ranking::{Completion, RankedCollector};

pub const ALPHABET_SIZE: usize = 26;

/// Longest accepted word or prefix. Traversals recurse once per letter, so this
/// also bounds their stack depth.
pub const MAX_WORD_LEN: usize = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrieError {
    #[error("'{input}' contains '{ch}' at position {position}; only the letters a-z are supported")]
    InvalidCharacter {
        input: String,
        ch: char,
        position: usize,
    },

    #[error("An empty word cannot be stored or removed")]
    EmptyWord,

    #[error("'{input}...' is {len} letters long; at most {max} are supported")]
    TooLong {
        input: String,
        len: usize,
        max: usize,
    },
}

/// Outcome of [`Trie::longest_under_prefix`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Longest {
    /// No stored word starts with the prefix.
    NoMatch,
    /// The prefix exists but nothing strictly longer is stored under it.
    NoLongerWord,
    Found(String),
}

/// Lower-cases `input`, rejecting anything outside `a-z`/`A-Z` and anything
/// longer than [`MAX_WORD_LEN`].
pub fn normalize(input: &str) -> Result<String, TrieError> {
    let len = input.chars().count();
    if len > MAX_WORD_LEN {
        return Err(TrieError::TooLong {
            input: input.chars().take(16).collect(),
            len,
            max: MAX_WORD_LEN,
        });
    }

    input
        .chars()
        .enumerate()
        .map(|(position, ch)| {
            if ch.is_ascii_alphabetic() {
                Ok(ch.to_ascii_lowercase())
            } else {
                Err(TrieError::InvalidCharacter {
                    input: input.to_string(),
                    ch,
                    position,
                })
            }
        })
        .collect()
}

fn normalize_word(word: &str) -> Result<String, TrieError> {
    if word.is_empty() {
        return Err(TrieError::EmptyWord);
    }
    normalize(word)
}

/// Child slot offsets of a normalized key.
fn slots(key: &str) -> impl Iterator<Item = usize> + '_ {
    key.bytes().map(|b| usize::from(b - b'a'))
}

#[derive(Debug, Default)]
struct Node {
    children: [Option<Box<Node>>; ALPHABET_SIZE],
    terminal: bool,
    frequency: i64,
}

impl Node {
    fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    /// A node that holds no word and leads to none.
    fn is_dead(&self) -> bool {
        !self.terminal && self.is_leaf()
    }

    /// Children paired with the letter of the edge leading to them, in `a..=z` order.
    fn edges(&self) -> impl Iterator<Item = (char, &Node)> {
        self.children
            .iter()
            .zip(b'a'..=b'z')
            .filter_map(|(child, letter)| child.as_deref().map(|c| (char::from(letter), c)))
    }

    fn count_terminals(&self) -> usize {
        usize::from(self.terminal) + self.edges().map(|(_, c)| c.count_terminals()).sum::<usize>()
    }

    fn count_nodes(&self) -> usize {
        1 + self.edges().map(|(_, c)| c.count_nodes()).sum::<usize>()
    }

    fn collect(&self, path: &mut String, out: &mut RankedCollector) {
        if self.terminal {
            out.push(path.as_str(), self.frequency);
        }
        for (letter, child) in self.edges() {
            path.push(letter);
            child.collect(path, out);
            path.pop();
        }
    }

    /// Depth-first, `a..=z`. Only a strictly longer word replaces `best`, so the
    /// first word of maximal length wins.
    fn longest(&self, path: &mut String, best: &mut String) {
        if self.terminal && path.len() > best.len() {
            best.clone_from(path);
        }
        for (letter, child) in self.edges() {
            path.push(letter);
            child.longest(path, best);
            path.pop();
        }
    }

    /// Unmarks the word at `path` below this node and drops every node on the way
    /// back up that no longer holds or leads to a word. Returns whether the word
    /// was stored.
    fn remove(&mut self, mut path: impl Iterator<Item = usize>) -> bool {
        let Some(idx) = path.next() else {
            if !self.terminal {
                return false;
            }
            self.terminal = false;
            self.frequency = 0;
            return true;
        };

        let slot = &mut self.children[idx];
        let Some(child) = slot.as_deref_mut() else {
            return false;
        };
        if !child.remove(path) {
            return false;
        }
        if child.is_dead() {
            *slot = None;
        }
        true
    }

    /// Whether a non-root node below holds no word and leads to none.
    #[cfg(test)]
    fn has_dead_branch(&self) -> bool {
        self.edges()
            .any(|(_, child)| child.is_dead() || child.has_dead_branch())
    }
}

#[derive(Debug, Default)]
pub struct Trie {
    root: Node,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `word` with `frequency`, replacing the frequency if the word is
    /// already present. Returns the replaced frequency.
    pub fn insert(&mut self, word: &str, frequency: i64) -> Result<Option<i64>, TrieError> {
        let key = normalize_word(word)?;

        let mut node = &mut self.root;
        for idx in slots(&key) {
            node = &mut **node.children[idx].get_or_insert_with(Box::default);
        }

        let previous = node.terminal.then_some(node.frequency);
        node.terminal = true;
        node.frequency = frequency;
        Ok(previous)
    }

    /// Removes `word`, pruning the branch it leaves behind. Returns `false`
    /// without touching the tree if the word is not stored.
    pub fn remove(&mut self, word: &str) -> Result<bool, TrieError> {
        let key = normalize_word(word)?;
        Ok(self.root.remove(slots(&key)))
    }

    pub fn contains(&self, word: &str) -> Result<bool, TrieError> {
        Ok(self.frequency(word)?.is_some())
    }

    /// Frequency of a stored word.
    pub fn frequency(&self, word: &str) -> Result<Option<i64>, TrieError> {
        let key = normalize_word(word)?;
        Ok(self
            .find(&key)
            .filter(|node| node.terminal)
            .map(|node| node.frequency))
    }

    /// Whether any stored word starts with `prefix`. The empty prefix always exists.
    pub fn has_prefix(&self, prefix: &str) -> Result<bool, TrieError> {
        let key = normalize(prefix)?;
        Ok(self.find(&key).is_some())
    }

    pub fn count_words(&self) -> usize {
        self.root.count_terminals()
    }

    /// Number of stored words starting with `prefix`, the prefix itself included.
    pub fn count_with_prefix(&self, prefix: &str) -> Result<usize, TrieError> {
        let key = normalize(prefix)?;
        Ok(self.find(&key).map_or(0, Node::count_terminals))
    }

    pub fn longest_under_prefix(&self, prefix: &str) -> Result<Longest, TrieError> {
        let key = normalize(prefix)?;
        let Some(node) = self.find(&key) else {
            return Ok(Longest::NoMatch);
        };

        let mut path = key.clone();
        let mut best = key.clone();
        node.longest(&mut path, &mut best);

        if best.len() == key.len() {
            Ok(Longest::NoLongerWord)
        } else {
            Ok(Longest::Found(best))
        }
    }

    /// Every word starting with `prefix`, highest frequency first.
    pub fn autocomplete(&self, prefix: &str) -> Result<Vec<Completion>, TrieError> {
        self.autocomplete_limited(prefix, None)
    }

    /// Like [`Trie::autocomplete`], but stops collecting after `limit` matches.
    /// Matches are gathered in alphabetical order, so a limit keeps the
    /// alphabetically first words rather than the most frequent ones.
    pub fn autocomplete_limited(
        &self,
        prefix: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Completion>, TrieError> {
        Ok(self.collect(prefix, limit)?.rank())
    }

    /// Unranked matches under `prefix` in depth-first alphabetical order.
    pub fn collect(
        &self,
        prefix: &str,
        limit: Option<usize>,
    ) -> Result<RankedCollector, TrieError> {
        let key = normalize(prefix)?;
        let mut collector = RankedCollector::with_limit(limit);
        if let Some(node) = self.find(&key) {
            let mut path = key.clone();
            node.collect(&mut path, &mut collector);
        }
        Ok(collector)
    }

    /// Number of nodes in the tree, root included.
    pub fn node_count(&self) -> usize {
        self.root.count_nodes()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_leaf() && !self.root.terminal
    }

    /// Drops every stored word.
    pub fn clear(&mut self) {
        self.root = Node::default();
    }

    fn find(&self, key: &str) -> Option<&Node> {
        let mut node = &self.root;
        for idx in slots(key) {
            node = node.children[idx].as_deref()?;
        }
        Some(node)
    }

    #[cfg(test)]
    pub(crate) fn has_dead_branch(&self) -> bool {
        self.root.has_dead_branch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Trie {
        let mut trie = Trie::new();
        trie.insert("cat", 5).unwrap();
        trie.insert("car", 3).unwrap();
        trie.insert("cart", 9).unwrap();
        trie
    }

    fn pairs(completions: &[Completion]) -> Vec<(&str, i64)> {
        completions
            .iter()
            .map(|c| (c.word.as_str(), c.frequency))
            .collect()
    }

    #[test]
    fn test_scenario() {
        let mut trie = sample();

        let ranked = trie.autocomplete("ca").unwrap();
        assert_eq!(pairs(&ranked), [("cart", 9), ("cat", 5), ("car", 3)]);
        assert_eq!(trie.count_with_prefix("ca").unwrap(), 3);
        assert_eq!(
            trie.longest_under_prefix("ca").unwrap(),
            Longest::Found("cart".into())
        );

        assert!(trie.remove("cart").unwrap());
        assert_eq!(trie.count_with_prefix("ca").unwrap(), 2);
        // "car" and "cat" tie on length; "car" is reached first going a..=z.
        assert_eq!(
            trie.longest_under_prefix("ca").unwrap(),
            Longest::Found("car".into())
        );
    }

    #[test]
    fn test_insert_replaces_frequency() {
        let mut trie = Trie::new();
        assert_eq!(trie.insert("hello", 1).unwrap(), None);
        assert_eq!(trie.insert("hello", 7).unwrap(), Some(1));
        assert_eq!(trie.count_words(), 1);

        let ranked = trie.autocomplete("hello").unwrap();
        assert_eq!(pairs(&ranked), [("hello", 7)]);
    }

    #[test]
    fn test_insert_accepts_any_frequency() {
        let mut trie = Trie::new();
        trie.insert("zero", 0).unwrap();
        trie.insert("neg", -12).unwrap();
        assert_eq!(trie.frequency("zero").unwrap(), Some(0));
        assert_eq!(trie.frequency("neg").unwrap(), Some(-12));
    }

    #[test]
    fn test_case_is_folded() {
        let mut trie = Trie::new();
        trie.insert("HeLLo", 2).unwrap();
        assert!(trie.contains("hello").unwrap());
        assert!(trie.contains("HELLO").unwrap());
        assert_eq!(pairs(&trie.autocomplete("HE").unwrap()), [("hello", 2)]);
    }

    #[test]
    fn test_invalid_characters_rejected_everywhere() {
        let mut trie = sample();
        let nodes = trie.node_count();

        let err = trie.insert("foo-bar", 1).unwrap_err();
        assert_eq!(
            err,
            TrieError::InvalidCharacter {
                input: "foo-bar".into(),
                ch: '-',
                position: 3,
            }
        );
        assert!(trie.remove("ca t").is_err());
        assert!(trie.count_with_prefix("c4").is_err());
        assert!(trie.longest_under_prefix("é").is_err());
        assert!(trie.autocomplete("c!").is_err());
        assert!(trie.has_prefix("1").is_err());

        assert_eq!(trie.node_count(), nodes);
        assert_eq!(trie.count_words(), 3);
    }

    #[test]
    fn test_empty_word_rejected() {
        let mut trie = Trie::new();
        assert_eq!(trie.insert("", 1), Err(TrieError::EmptyWord));
        assert_eq!(trie.remove(""), Err(TrieError::EmptyWord));
        assert!(trie.is_empty());
    }

    #[test]
    fn test_word_length_limit() {
        let mut trie = Trie::new();
        let longest = "z".repeat(MAX_WORD_LEN);
        trie.insert(&longest, 1).unwrap();
        assert_eq!(trie.count_words(), 1);
        assert_eq!(
            trie.longest_under_prefix("z").unwrap(),
            Longest::Found(longest.clone())
        );
        assert!(trie.remove(&longest).unwrap());
        assert_eq!(trie.node_count(), 1);

        let huge = "a".repeat(200_000);
        assert!(matches!(
            trie.insert(&huge, 1),
            Err(TrieError::TooLong { len: 200_000, max: MAX_WORD_LEN, .. })
        ));
        assert!(trie.count_with_prefix(&huge).is_err());
        assert!(trie.is_empty());
        assert_eq!(trie.count_words(), 0);
    }

    #[test]
    fn test_non_ascii_letters_rejected() {
        let mut trie = Trie::new();
        // KELVIN SIGN lower-cases to an ASCII 'k' under Unicode rules.
        let kelvin = "\u{212A}at";
        assert!(matches!(
            trie.insert(kelvin, 1),
            Err(TrieError::InvalidCharacter { ch: '\u{212A}', position: 0, .. })
        ));
        assert!(trie.insert(&kelvin.to_ascii_lowercase(), 1).is_err());
        assert!(!trie.has_prefix("k").unwrap());
    }

    #[test]
    fn test_remove_missing_word() {
        let mut trie = sample();
        let nodes = trie.node_count();

        assert!(!trie.remove("dog").unwrap());
        // Path exists but "ca" is not a stored word.
        assert!(!trie.remove("ca").unwrap());
        assert!(!trie.remove("carts").unwrap());

        assert_eq!(trie.count_words(), 3);
        assert_eq!(trie.node_count(), nodes);
    }

    #[test]
    fn test_remove_prunes_unshared_branch() {
        let mut trie = Trie::new();
        trie.insert("car", 3).unwrap();
        let before = trie.node_count();

        trie.insert("carpet", 1).unwrap();
        assert_eq!(trie.node_count(), before + 3);

        assert!(trie.remove("carpet").unwrap());
        assert_eq!(trie.node_count(), before);
        assert!(!trie.has_dead_branch());
    }

    #[test]
    fn test_remove_keeps_prefix_used_by_others() {
        let mut trie = sample();
        let nodes = trie.node_count();

        // "car" still leads to "cart".
        assert!(trie.remove("car").unwrap());
        assert_eq!(trie.node_count(), nodes);
        assert!(!trie.contains("car").unwrap());
        assert!(trie.contains("cart").unwrap());
        assert!(!trie.has_dead_branch());
    }

    #[test]
    fn test_remove_last_word_leaves_bare_root() {
        let mut trie = Trie::new();
        trie.insert("solo", 1).unwrap();
        assert!(trie.remove("solo").unwrap());
        assert_eq!(trie.node_count(), 1);
        assert!(trie.is_empty());
        assert!(!trie.has_prefix("s").unwrap());
    }

    #[test]
    fn test_count_with_empty_prefix_matches_count_words() {
        let trie = sample();
        assert_eq!(trie.count_with_prefix("").unwrap(), trie.count_words());
        assert_eq!(Trie::new().count_with_prefix("").unwrap(), 0);
    }

    #[test]
    fn test_count_with_prefix_includes_prefix_word() {
        let trie = sample();
        assert_eq!(trie.count_with_prefix("car").unwrap(), 2);
        assert_eq!(trie.count_with_prefix("cart").unwrap(), 1);
        assert_eq!(trie.count_with_prefix("dog").unwrap(), 0);
    }

    #[test]
    fn test_longest_outcomes() {
        let trie = sample();
        assert_eq!(trie.longest_under_prefix("x").unwrap(), Longest::NoMatch);
        assert_eq!(
            trie.longest_under_prefix("cart").unwrap(),
            Longest::NoLongerWord
        );
        assert_eq!(
            trie.longest_under_prefix("").unwrap(),
            Longest::Found("cart".into())
        );
        assert_eq!(
            Trie::new().longest_under_prefix("").unwrap(),
            Longest::NoLongerWord
        );
    }

    #[test]
    fn test_autocomplete_missing_prefix_is_empty() {
        let trie = sample();
        assert!(trie.autocomplete("dog").unwrap().is_empty());
        assert!(!trie.has_prefix("dog").unwrap());
        assert!(trie.has_prefix("").unwrap());
    }

    #[test]
    fn test_collect_order_is_alphabetical() {
        let mut trie = Trie::new();
        for (word, freq) in [("b", 1), ("abc", 1), ("ab", 1), ("a", 1)] {
            trie.insert(word, freq).unwrap();
        }
        let ranked = trie.autocomplete("").unwrap();
        assert_eq!(pairs(&ranked), [("a", 1), ("ab", 1), ("abc", 1), ("b", 1)]);
    }

    #[test]
    fn test_autocomplete_limited() {
        let trie = sample();
        let ranked = trie.autocomplete_limited("ca", Some(2)).unwrap();
        // Collected a..=z: "car", "cart"; "cat" falls past the limit.
        assert_eq!(pairs(&ranked), [("cart", 9), ("car", 3)]);

        let collector = trie.collect("ca", Some(2)).unwrap();
        assert_eq!(collector.dropped(), 1);
    }

    #[test]
    fn test_clear() {
        let mut trie = sample();
        trie.clear();
        assert!(trie.is_empty());
        assert_eq!(trie.count_words(), 0);
        assert_eq!(trie.node_count(), 1);
    }
}
