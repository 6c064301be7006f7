//-
// Copyright (c) 2026, Jason Lingle
//
// This file is part of Hdrfold.
//
// Hdrfold is free software: you can  redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free
// Software Foundation, either version 3 of the License, or (at your option)
// any later version.
//
// Hdrfold is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without  even the implied  warranty of MERCHANTABILITY  or FITNESS
// FOR  A PARTICULAR  PURPOSE.  See the  GNU General  Public  License for  more
// details.
//
// You should have received a copy of the GNU General Public License along with
// Hdrfold. If not, see <http://www.gnu.org/licenses/>.

use std::fmt;

use indexmap::map::{Entry, IndexMap};
use serde::{Deserialize, Serialize};

/// An ordered, string-keyed property container.
///
/// Entries are kept in insertion order. Overwriting a key keeps its original
/// position; deleting a key keeps the order of everything else.
///
/// `get` is the strict accessor: a missing key is `None`, distinct from a
/// stored value that happens to mean "nothing" (e.g. `PropertyBag<Option<T>>`
/// holding `None`). `get_or` and `get_or_default` are the lenient forms.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag<V> {
    entries: IndexMap<String, V>,
}

impl<V> Default for PropertyBag<V> {
    fn default() -> Self {
        PropertyBag {
            entries: IndexMap::new(),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for PropertyBag<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<V> PropertyBag<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, returning the stored value.
    pub fn set(&mut self, key: impl Into<String>, value: V) -> &V {
        match self.entries.entry(key.into()) {
            Entry::Occupied(mut e) => {
                e.insert(value);
                e.into_mut()
            },
            Entry::Vacant(e) => e.insert(value),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Return the value under `key`, or `fallback` if there is none.
    pub fn get_or<'a>(&'a self, key: &str, fallback: &'a V) -> &'a V {
        self.entries.get(key).unwrap_or(fallback)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove `key`, returning its value if it was present.
    pub fn delete(&mut self, key: &str) -> Option<V> {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Snapshot of the current keys, in order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Iterate the current content in order.
    ///
    /// Every call starts a fresh pass.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a str, &'a V)> + 'a {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V: Clone> PropertyBag<V> {
    /// Snapshot of the current values, in key order.
    pub fn values(&self) -> Vec<V> {
        self.entries.values().cloned().collect()
    }
}

impl<V: Clone + Default> PropertyBag<V> {
    /// Return a copy of the value under `key`, or `V::default()`.
    pub fn get_or_default(&self, key: &str) -> V {
        self.entries.get(key).cloned().unwrap_or_default()
    }
}

impl<K: Into<String>, V> std::iter::FromIterator<(K, V)> for PropertyBag<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = PropertyBag::new();
        for (k, v) in iter {
            bag.set(k, v);
        }
        bag
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn basic_operations() {
        let mut bag = PropertyBag::new();
        assert!(bag.is_empty());

        assert_eq!(&1, bag.set("one", 1));
        assert_eq!(&2, bag.set("two", 2));
        assert_eq!(&3, bag.set("three", 3));
        assert_eq!(3, bag.len());

        assert_eq!(Some(&2), bag.get("two"));
        assert_eq!(None, bag.get("four"));
        assert!(bag.contains("one"));
        assert!(!bag.contains("four"));

        // Overwriting keeps the position
        assert_eq!(&22, bag.set("two", 22));
        assert_eq!(vec!["one", "two", "three"], bag.keys());

        assert_eq!(Some(1), bag.delete("one"));
        assert_eq!(None, bag.delete("one"));
        assert_eq!(vec!["two", "three"], bag.keys());
        assert_eq!(vec![22, 3], bag.values());
    }

    #[test]
    fn absent_is_distinct_from_stored_none() {
        let mut bag: PropertyBag<Option<&str>> = PropertyBag::new();
        bag.set("present", None);

        assert_eq!(Some(&None), bag.get("present"));
        assert_eq!(None, bag.get("absent"));

        let fallback = Some("fallback");
        assert_eq!(&None, bag.get_or("present", &fallback));
        assert_eq!(&fallback, bag.get_or("absent", &fallback));
        assert_eq!(None, bag.get_or_default("absent"));
    }

    #[test]
    fn snapshots_are_independent() {
        let mut bag: PropertyBag<i32> =
            vec![("a", 1), ("b", 2)].into_iter().collect();
        let keys = bag.keys();
        let values = bag.values();
        bag.set("c", 3);
        bag.delete("a");

        assert_eq!(vec!["a", "b"], keys);
        assert_eq!(vec![1, 2], values);
    }

    #[test]
    fn iteration_is_restartable() {
        let mut bag = PropertyBag::new();
        bag.set("x", "1");
        bag.set("y", "2");

        let first = bag.iter().collect::<Vec<_>>();
        let second = bag.iter().collect::<Vec<_>>();
        assert_eq!(vec![("x", &"1"), ("y", &"2")], first);
        assert_eq!(first, second);

        bag.set("z", "3");
        assert_eq!(3, bag.iter().count());
    }

    #[test]
    fn deserialises_from_toml() {
        let bag: PropertyBag<String> =
            toml::from_str("zebra = \"z\"\napple = \"a\"\n").unwrap();
        assert_eq!(Some(&"z".to_owned()), bag.get("zebra"));
        assert_eq!(Some(&"a".to_owned()), bag.get("apple"));
    }
}
