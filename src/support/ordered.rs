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

//! Binary-search insertion into a sorted `Vec`.
//!
//! These keep small ordered lists (recently used time zones, the distinct
//! header names of a message) sorted without re-sorting after every change.
//! Insertion is O(n) because of the shift, which is fine at these sizes.

use std::cmp::Ordering;

/// The comparator used when the caller has nothing more specific.
///
/// Values which cannot be ordered relative to each other compare equal.
pub fn default_cmp<T: PartialOrd>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// Find where `item` belongs in `items`, which must be sorted under `cmp`.
///
/// `cmp` is always called with `item` as the first argument. If some element
/// compares equal to `item`, the index of that element is returned.
/// Otherwise the result is the index at which inserting `item` keeps `items`
/// sorted.
///
/// Returns `None` if `items` is empty.
pub fn locate<T>(
    items: &[T],
    item: &T,
    mut cmp: impl FnMut(&T, &T) -> Ordering,
) -> Option<usize> {
    if items.is_empty() {
        return None;
    }

    let mut low = 0;
    let mut high = items.len() - 1;
    while low < high {
        let mid = low + (high - low) / 2;
        match cmp(item, &items[mid]) {
            Ordering::Greater => low = mid + 1,
            Ordering::Less => high = mid,
            Ordering::Equal => return Some(mid),
        }
    }

    Some(match cmp(item, &items[low]) {
        Ordering::Greater => low + 1,
        Ordering::Less | Ordering::Equal => low,
    })
}

/// Insert `item` into `items`, which must be sorted under `cmp`.
///
/// If `discard_duplicates` is true and an element comparing equal to `item`
/// is already at the located position (or immediately before it), `items`
/// is left untouched and the index of that element is returned. Otherwise
/// the index at which `item` now resides is returned.
pub fn insert<T>(
    items: &mut Vec<T>,
    item: T,
    mut cmp: impl FnMut(&T, &T) -> Ordering,
    discard_duplicates: bool,
) -> usize {
    let ix = match locate(items, &item, &mut cmp) {
        Some(ix) => ix,
        None => {
            items.push(item);
            return 0;
        },
    };

    if discard_duplicates {
        let at = ix.min(items.len() - 1);
        if Ordering::Equal == cmp(&item, &items[at]) {
            return at;
        }
        if at > 0 && Ordering::Equal == cmp(&item, &items[at - 1]) {
            return at - 1;
        }
    }

    items.insert(ix, item);
    ix
}

/// `locate` with `default_cmp`.
pub fn locate_default<T: PartialOrd>(items: &[T], item: &T) -> Option<usize> {
    locate(items, item, default_cmp)
}

/// `insert` with `default_cmp`.
pub fn insert_default<T: PartialOrd>(
    items: &mut Vec<T>,
    item: T,
    discard_duplicates: bool,
) -> usize {
    insert(items, item, default_cmp, discard_duplicates)
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn locate_in_empty() {
        assert_eq!(None, locate_default::<i32>(&[], &42));

        let mut v = Vec::new();
        assert_eq!(0, insert_default(&mut v, 42, true));
        assert_eq!(vec![42], v);
    }

    #[test]
    fn locate_positions() {
        let v = [10, 20, 30, 40];
        assert_eq!(Some(0), locate_default(&v, &5));
        assert_eq!(Some(1), locate_default(&v, &15));
        assert_eq!(Some(4), locate_default(&v, &45));
        // Equal elements are the match point
        assert_eq!(Some(0), locate_default(&v, &10));
        assert_eq!(Some(2), locate_default(&v, &30));
        assert_eq!(Some(3), locate_default(&v, &40));
    }

    #[test]
    fn insert_keeps_or_discards_duplicates() {
        let mut v = vec![1, 3, 5];
        assert_eq!(1, insert_default(&mut v, 3, true));
        assert_eq!(vec![1, 3, 5], v);
        assert_eq!(2, insert_default(&mut v, 5, true));
        assert_eq!(vec![1, 3, 5], v);

        assert_eq!(1, insert_default(&mut v, 3, false));
        assert_eq!(vec![1, 3, 3, 5], v);

        assert_eq!(4, insert_default(&mut v, 9, true));
        assert_eq!(vec![1, 3, 3, 5, 9], v);
    }

    #[test]
    fn custom_comparator() {
        // Time zone ids kept in case-insensitive order
        let cmp = |a: &&str, b: &&str| {
            a.to_lowercase().cmp(&b.to_lowercase())
        };
        let mut zones = Vec::new();
        insert(&mut zones, "Europe/Berlin", cmp, true);
        insert(&mut zones, "america/New_York", cmp, true);
        insert(&mut zones, "Asia/Tokyo", cmp, true);
        insert(&mut zones, "EUROPE/BERLIN", cmp, true);
        assert_eq!(
            vec!["america/New_York", "Asia/Tokyo", "Europe/Berlin"],
            zones
        );
    }

    #[test]
    fn default_cmp_treats_unordered_as_equal() {
        assert_eq!(Ordering::Equal, default_cmp(&f64::NAN, &1.0));
        assert_eq!(Ordering::Less, default_cmp(&0.5, &1.0));
    }

    proptest! {
        #[test]
        fn insert_preserves_order(
            mut items in prop::collection::vec(-50i32..50, 0..40),
            item in -60i32..60,
        ) {
            items.sort();
            let before = items.len();
            let ix = insert_default(&mut items, item, false);

            prop_assert_eq!(before + 1, items.len());
            prop_assert_eq!(item, items[ix]);
            prop_assert!(items.windows(2).all(|w| w[0] <= w[1]));
        }

        #[test]
        fn discarding_insert_never_duplicates(
            mut items in prop::collection::vec(-50i32..50, 0..40),
            item in -60i32..60,
        ) {
            items.sort();
            items.dedup();
            let before = items.len();
            let present = items.contains(&item);
            let ix = insert_default(&mut items, item, true);

            prop_assert_eq!(item, items[ix]);
            if present {
                prop_assert_eq!(before, items.len());
            } else {
                prop_assert_eq!(before + 1, items.len());
            }
            prop_assert!(items.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
