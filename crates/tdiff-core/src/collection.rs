//! Adapters exposing standard collections to the collection differs.
//!
//! Element order returned here is the order used for one-sided comparisons
//! and for the actual side of key matching.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};

/// An ordered collection.
pub trait SeqLike<T> {
    fn elements(&self) -> Vec<&T>;
}

impl<T> SeqLike<T> for Vec<T> {
    fn elements(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

impl<T> SeqLike<T> for VecDeque<T> {
    fn elements(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

impl<T> SeqLike<T> for Box<[T]> {
    fn elements(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

/// An unordered collection.
pub trait SetLike<T> {
    fn elements(&self) -> Vec<&T>;
}

impl<T, S> SetLike<T> for HashSet<T, S> {
    fn elements(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

impl<T> SetLike<T> for BTreeSet<T> {
    fn elements(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

/// A keyed collection.
pub trait MapLike<K, V> {
    fn entries(&self) -> Vec<(&K, &V)>;

    fn lookup(&self, key: &K) -> Option<&V>;
}

impl<K: Eq + Hash, V, S: BuildHasher> MapLike<K, V> for HashMap<K, V, S> {
    fn entries(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }

    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }
}

impl<K: Ord, V> MapLike<K, V> for BTreeMap<K, V> {
    fn entries(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }

    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }
}
