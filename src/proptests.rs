use super::*;

use crate::edge_table::CAPACITY_SEQUENCE;
use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::{BTreeMap, BTreeSet};

fn validate_trie(t: &CompressedTrie) {
    let mut stack: Vec<(&TrieNode, bool)> = vec![(t.root(), true)];
    let mut word_count = 0usize;

    while let Some((node, is_root)) = stack.pop() {
        let table = node.edges();
        assert!(
            CAPACITY_SEQUENCE.contains(&table.capacity()),
            "capacity {} outside growth sequence",
            table.capacity()
        );
        assert!(
            table.max_probe_distance() < table.capacity(),
            "probe distance {} must stay below capacity {}",
            table.max_probe_distance(),
            table.capacity()
        );

        let mut first_chars = BTreeSet::new();
        for edge in table.edges() {
            assert!(!edge.label().is_empty(), "empty edge label");
            assert!(
                first_chars.insert(edge.first_char()),
                "sibling edges share first char {:?}",
                edge.first_char()
            );
            let found = table.search(edge.first_char());
            assert!(
                found.is_some_and(|f| std::ptr::eq(f, edge)),
                "table lookup must find stored edge {:?}",
                edge.label()
            );
            stack.push((edge.child(), false));
        }
        assert_eq!(first_chars.len(), table.len(), "table len must match live edges");

        if !is_root && !node.is_end_of_word() {
            assert!(
                table.len() >= 2,
                "pass-through node with {} edge(s) should have been compressed",
                table.len()
            );
        }
        if node.is_end_of_word() {
            word_count += 1;
        }
    }

    assert_eq!(word_count, t.len(), "end-of-word nodes must match len");
}

fn word_strategy() -> impl Strategy<Value = String> {
    // Small alphabet so words share prefixes and edges split often.
    "[a-e]{0,6}"
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 5)]
    Insert(#[proptest(strategy = "word_strategy()")] String),
    #[proptest(weight = 2)]
    Bump(#[proptest(strategy = "word_strategy()")] String),
    #[proptest(weight = 3)]
    Search(#[proptest(strategy = "word_strategy()")] String),
}

fn weighted_words() -> impl Strategy<Value = BTreeMap<String, u32>> {
    prop::collection::btree_map("[a-d]{1,5}", 0u32..6, 0..=40)
}

fn build(words: &BTreeMap<String, u32>) -> CompressedTrie {
    let mut t = CompressedTrie::new();
    for (w, &i) in words {
        t.insert(w).unwrap();
        assert!(t.set_importance(w, i));
    }
    t
}

fn reference_top_k(words: &BTreeMap<String, u32>, prefix: &str, k: usize) -> Vec<String> {
    let mut matching: Vec<HeapEntry> = words
        .iter()
        .filter(|(w, _)| w.starts_with(prefix))
        .map(|(w, &i)| HeapEntry::new(w.as_str(), i))
        .collect();
    matching.sort_by(|a, b| b.cmp(a));
    matching.into_iter().take(k).map(|e| e.word).collect()
}

fn reference_average<'a>(words: impl Iterator<Item = (&'a String, &'a u32)>) -> f64 {
    let (sum, count) = words.fold((0u64, 0u64), |(s, c), (_, &i)| (s + u64::from(i), c + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 20_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in prop::collection::vec(any::<Op>(), 0..=400)) {
        let mut t = CompressedTrie::new();
        let mut m: BTreeMap<String, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(w) => {
                    let added = t.insert(&w).unwrap();
                    prop_assert_eq!(added, !m.contains_key(&w));
                    m.entry(w).or_insert(0);
                }
                Op::Bump(w) => {
                    let bumped = t.increment_importance(&w);
                    prop_assert_eq!(bumped, m.contains_key(&w));
                    if let Some(i) = m.get_mut(&w) {
                        *i += 1;
                    }
                }
                Op::Search(w) => {
                    prop_assert_eq!(t.search(&w), m.contains_key(&w));
                    prop_assert_eq!(t.importance(&w), m.get(&w).copied());
                }
            }
            prop_assert_eq!(t.len(), m.len());
        }

        validate_trie(&t);
        let mut got: Vec<(String, u32)> = t.words().collect();
        got.sort();
        let expected: Vec<(String, u32)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_find_prefix_node(words in weighted_words(), prefix in "[a-d]{0,4}") {
        let t = build(&words);
        let under: Vec<&String> = words.keys().filter(|w| w.starts_with(&prefix)).collect();
        match t.find_prefix_node(&prefix) {
            None => prop_assert!(under.is_empty() && !prefix.is_empty()),
            Some(found) => {
                prop_assert!(prefix.is_empty() || !under.is_empty());
                let extended = format!("{}{}", prefix, found.suffix);
                for w in &under {
                    prop_assert!(
                        w.starts_with(&extended),
                        "{} lacks forced suffix {:?}",
                        w,
                        found.suffix
                    );
                }
                prop_assert_eq!(found.node.is_end_of_word(), words.contains_key(&extended));
            }
        }
    }

    #[test]
    fn prop_top_k_matches_reference(
        words in weighted_words(),
        prefix in "[a-d]{0,3}",
        k in 1usize..8,
    ) {
        let t = build(&words);
        let got = PrefixAnalyzer::new(&t).top_k_frequent_words_with_prefix(&prefix, k);
        prop_assert_eq!(got, reference_top_k(&words, &prefix, k));
    }

    #[test]
    fn prop_average_matches_reference(words in weighted_words(), prefix in "[a-d]{0,3}") {
        let t = build(&words);
        let got = PrefixAnalyzer::new(&t).average_frequency_of_prefix(&prefix);
        let under = words.iter().filter(|(w, _)| w.starts_with(&prefix));
        let expected = reference_average(under);
        prop_assert!((got - expected).abs() < 1e-9, "got {} expected {}", got, expected);
    }

    #[test]
    fn prop_predict_picks_best_average(words in weighted_words(), prefix in "[a-d]{0,3}") {
        let t = build(&words);
        let result = PrefixAnalyzer::new(&t).predict_next_letter(&prefix);

        let resolvable = prefix.is_empty() || words.keys().any(|w| w.starts_with(&prefix));
        let mut by_next: BTreeMap<char, Vec<(&String, &u32)>> = BTreeMap::new();
        for (w, i) in &words {
            if let Some(rest) = w.strip_prefix(prefix.as_str()) {
                if let Some(c) = rest.chars().next() {
                    by_next.entry(c).or_default().push((w, i));
                }
            }
        }

        match result {
            Ok(c) => {
                let averages: BTreeMap<char, f64> = by_next
                    .iter()
                    .map(|(&c, ws)| (c, reference_average(ws.iter().copied())))
                    .collect();
                let best = averages.values().copied().fold(f64::NEG_INFINITY, f64::max);
                prop_assert_eq!(averages.get(&c).copied(), Some(best));
            }
            Err(AutocompleteError::UnknownPrefix(_)) => prop_assert!(!resolvable),
            Err(AutocompleteError::NoContinuation(_)) => {
                prop_assert!(resolvable && by_next.is_empty());
            }
            Err(e) => prop_assert!(false, "unexpected error {}", e),
        }
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let words = ["car", "ca", "cat", "dog", "door", "do"];

    for_each_permutation(&words, |perm| {
        let mut t = CompressedTrie::new();
        for w in &perm {
            assert!(t.insert(w).unwrap());
        }

        validate_trie(&t);
        for w in words {
            assert!(t.search(w), "{w} missing after inserting {perm:?}");
        }
        for w in ["c", "d", "cart", "doe", "dooor"] {
            assert!(!t.search(w), "{w} found after inserting {perm:?}");
        }
        // The compressed shape does not depend on insertion order.
        assert_eq!(t.node_count(), 7, "shape after inserting {perm:?}");
    });
}

#[test]
fn full_alphabet_fan_out() {
    let mut t = CompressedTrie::new();
    for c in ('a'..='z').rev() {
        t.insert(&format!("{c}{c}")).unwrap();
        t.insert(&format!("x{c}")).unwrap();
    }
    validate_trie(&t);
    assert_eq!(t.root().edges().len(), 26);
    assert_eq!(t.root().edges().capacity(), 29);
    assert_eq!(t.len(), 52 - 1); // "xx" inserted twice
}

#[test]
fn randomized_words_against_model() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(3);
    let mut t = CompressedTrie::new();
    let mut m: BTreeMap<String, u32> = BTreeMap::new();

    for _ in 0..20_000 {
        let len = rng.gen_range(1..10);
        let word: String = (0..len)
            .map(|_| (b'a' + rng.gen_range(0..26u8)) as char)
            .collect();
        if rng.gen_bool(0.7) {
            assert_eq!(t.insert(&word).unwrap(), !m.contains_key(&word));
            m.entry(word).or_insert(0);
        } else {
            assert_eq!(t.increment_importance(&word), m.contains_key(&word));
            if let Some(i) = m.get_mut(&word) {
                *i += 1;
            }
        }
    }

    validate_trie(&t);
    assert_eq!(t.len(), m.len());
    for (w, i) in &m {
        assert_eq!(t.importance(w), Some(*i), "importance of {w}");
    }

    let analyzer = PrefixAnalyzer::new(&t);
    for prefix in ["", "a", "qu", "zz", "mno"] {
        assert_eq!(
            analyzer.top_k_frequent_words_with_prefix(prefix, 10),
            reference_top_k(&m, prefix, 10),
            "top-k for {prefix:?}"
        );
    }
}
