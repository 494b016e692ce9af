use super::*;

use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(String, i64),
    Remove(String),
}

fn word_strategy() -> impl Strategy<Value = String> + Clone {
    // A small alphabet keeps prefixes shared, so removals exercise pruning.
    "[abc]{1,6}"
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let word = word_strategy();
    let op = prop_oneof![
        60 => (word.clone(), -50i64..50).prop_map(|(w, f)| Op::Insert(w, f)),
        40 => word.prop_map(Op::Remove),
    ];
    prop::collection::vec(op, 0..=300)
}

/// Model words under `prefix` in the order a ranked completion must return them:
/// descending frequency, ties alphabetical (the trie collects a..=z).
fn model_completions(m: &BTreeMap<String, i64>, prefix: &str) -> Vec<Completion> {
    let collected: Vec<Completion> = m
        .range(prefix.to_string()..)
        .take_while(|(w, _)| w.starts_with(prefix))
        .map(|(w, f)| Completion::new(w.as_str(), *f))
        .collect();
    ranking::rank(collected)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_matches_model(ops in ops_strategy()) {
        let mut t = Trie::new();
        let mut m: BTreeMap<String, i64> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(word, freq) => {
                    let old_t = t.insert(&word, freq).unwrap();
                    let old_m = m.insert(word, freq);
                    prop_assert_eq!(old_t, old_m);
                }
                Op::Remove(word) => {
                    let removed = t.remove(&word).unwrap();
                    prop_assert_eq!(removed, m.remove(&word).is_some());
                }
            }

            prop_assert_eq!(t.count_words(), m.len());
            prop_assert!(!t.has_dead_branch(), "dead branch left behind");
        }

        prop_assert_eq!(t.count_with_prefix("").unwrap(), t.count_words());
        for prefix in ["", "a", "b", "c", "ab", "ca", "abc"] {
            let expected = model_completions(&m, prefix);
            prop_assert_eq!(t.count_with_prefix(prefix).unwrap(), expected.len());
            prop_assert_eq!(t.autocomplete(prefix).unwrap(), expected);
        }
    }

    #[test]
    fn prop_remove_restores_node_count(
        base in prop::collection::vec(word_strategy(), 0..40),
        extra in "[a-z]{1,10}",
    ) {
        let mut t = Trie::new();
        for word in &base {
            t.insert(word, 1).unwrap();
        }
        prop_assume!(!t.contains(&extra).unwrap());

        let nodes = t.node_count();
        t.insert(&extra, 7).unwrap();
        prop_assert!(t.remove(&extra).unwrap());
        prop_assert_eq!(t.node_count(), nodes);
    }

    #[test]
    fn prop_longest_is_first_maximal_word(words in prop::collection::vec(word_strategy(), 1..30)) {
        let mut t = Trie::new();
        for word in &words {
            t.insert(word, 0).unwrap();
        }

        // Alphabetical order equals depth-first a..=z order; keep the first longest.
        let mut sorted = words.clone();
        sorted.sort();
        sorted.dedup();
        let mut best = "";
        for word in &sorted {
            if word.len() > best.len() {
                best = word;
            }
        }

        prop_assert_eq!(t.longest_under_prefix("").unwrap(), Longest::Found(best.to_string()));
    }
}
