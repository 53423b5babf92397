//! Greedy key matching shared by key-matched sequences and sets.
//!
//! Each actual element, in order, claims the first unclaimed expected element
//! with an equal key. Unmatched actual elements are reported actual-only as
//! they are encountered; unclaimed expected elements follow, expected-only,
//! in their original order. Duplicate keys resolve in encounter order. This
//! is first-match, not a globally optimal assignment, and costs
//! `O(actual * expected)` key comparisons.

use tdiff_types::{DiffResult, Keyer, MatchKey, Presence};
use tracing::trace;

use crate::differ::Differ;

/// Pair `actual` with `expected` by key and diff each pair with `item_differ`.
///
/// Keys are compared with `same_key`, never with the item differ.
pub fn match_by_key<'a, T, K>(
    actual: &[&'a T],
    expected: &[&'a T],
    key_of: impl Fn(&'a T) -> K,
    same_key: impl Fn(&K, &K) -> bool,
    item_differ: &dyn Differ<T>,
) -> Vec<DiffResult> {
    let expected_keys: Vec<K> = expected.iter().map(|e| key_of(*e)).collect();
    let mut claimed = vec![false; expected.len()];
    let mut results = Vec::with_capacity(actual.len().max(expected.len()));
    let mut matched = 0usize;

    for &a in actual {
        let key = key_of(a);
        let hit = (0..expected.len()).find(|&i| !claimed[i] && same_key(&key, &expected_keys[i]));
        match hit {
            Some(i) => {
                claimed[i] = true;
                matched += 1;
                results.push(item_differ.diff(Presence::Both(a, expected[i])));
            }
            None => results.push(item_differ.diff(Presence::ActualOnly(a))),
        }
    }

    for (i, &e) in expected.iter().enumerate() {
        if !claimed[i] {
            results.push(item_differ.diff(Presence::ExpectedOnly(e)));
        }
    }

    trace!(
        matched,
        actual_only = actual.len() - matched,
        expected_only = expected.len() - matched,
        "matched collection elements by key"
    );
    results
}

/// Match elements by their own equality.
pub fn match_by_identity<T: PartialEq>(
    actual: &[&T],
    expected: &[&T],
    item_differ: &dyn Differ<T>,
) -> Vec<DiffResult> {
    match_by_key(actual, expected, |item| item, |a, b| a == b, item_differ)
}

/// Match elements by the key derived through `keyer`.
pub fn match_by_keyer<T>(
    actual: &[&T],
    expected: &[&T],
    keyer: &Keyer<T>,
    item_differ: &dyn Differ<T>,
) -> Vec<DiffResult> {
    match_by_key(
        actual,
        expected,
        |item| keyer.key_of(item),
        |a: &Box<dyn MatchKey>, b: &Box<dyn MatchKey>| (**a).key_eq(&**b),
        item_differ,
    )
}
