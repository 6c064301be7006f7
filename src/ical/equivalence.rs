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

//! Decides whether two versions of an item are the same content.
//!
//! This is not an RFC 5545 comparison. Each component is flattened into a
//! string with its properties and children sorted, leaving out whatever only
//! tracks revisions (sequence numbers, stamps, generation counters), and the
//! two strings are compared.

use std::collections::{BTreeMap, BTreeSet};

use lazy_static::lazy_static;

use super::document::{Component, Property};

lazy_static! {
    static ref DEFAULT_IGNORE_PROPS: BTreeSet<String> = [
        "SEQUENCE",
        "DTSTAMP",
        "LAST-MODIFIED",
        "X-MOZ-GENERATION",
        "X-MICROSOFT-DISALLOW-COUNTER",
        "X-MOZ-SEND-INVITATIONS",
        "X-MOZ-SEND-INVITATIONS-UNDISCLOSED",
    ]
    .iter()
    .map(|&s| s.to_owned())
    .collect();
    static ref DEFAULT_IGNORE_PARAMS: BTreeMap<String, BTreeSet<String>> = {
        let cn = || {
            let mut set = BTreeSet::new();
            set.insert("CN".to_owned());
            set
        };

        let mut map = BTreeMap::new();
        map.insert("ATTENDEE".to_owned(), cn());
        map.insert("ORGANIZER".to_owned(), cn());
        map
    };
}

/// What to leave out when comparing items.
///
/// Names are matched exactly, so they should be given in the upper case used
/// by serialised iCalendar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EquivalenceSpec {
    ignore_props: BTreeSet<String>,
    ignore_params: BTreeMap<String, BTreeSet<String>>,
}

impl Default for EquivalenceSpec {
    fn default() -> Self {
        EquivalenceSpec::new(None, None)
    }
}

impl EquivalenceSpec {
    /// Create a spec from the given property and parameter exclusions.
    ///
    /// Either one that is `None` takes its default: the revision properties
    /// (`SEQUENCE`, `DTSTAMP`, `LAST-MODIFIED`, `X-MOZ-GENERATION`,
    /// `X-MICROSOFT-DISALLOW-COUNTER`, `X-MOZ-SEND-INVITATIONS`,
    /// `X-MOZ-SEND-INVITATIONS-UNDISCLOSED`), and the `CN` parameter of
    /// `ATTENDEE` and `ORGANIZER`. An empty collection ignores nothing.
    pub fn new(
        ignore_props: Option<BTreeSet<String>>,
        ignore_params: Option<BTreeMap<String, BTreeSet<String>>>,
    ) -> Self {
        EquivalenceSpec {
            ignore_props: ignore_props
                .unwrap_or_else(|| DEFAULT_IGNORE_PROPS.clone()),
            ignore_params: ignore_params
                .unwrap_or_else(|| DEFAULT_IGNORE_PARAMS.clone()),
        }
    }

    /// A spec which ignores nothing at all.
    pub fn strict() -> Self {
        EquivalenceSpec::new(Some(BTreeSet::new()), Some(BTreeMap::new()))
    }

    pub fn ignore_props(&self) -> &BTreeSet<String> {
        &self.ignore_props
    }

    pub fn ignore_params(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.ignore_params
    }

    pub fn ignores_prop(&self, prop: &str) -> bool {
        self.ignore_props.contains(prop)
    }

    pub fn ignores_param(&self, prop: &str, param: &str) -> bool {
        self.ignore_params
            .get(prop)
            .map_or(false, |params| params.contains(param))
    }
}

/// Return whether `a` and `b` have the same content under `spec`.
pub fn equivalent(
    a: &Component,
    b: &Component,
    spec: &EquivalenceSpec,
) -> bool {
    normalize_component(a, spec) == normalize_component(b, spec)
}

/// Like `equivalent`, but for items which may not exist.
///
/// Two missing items are equivalent; a missing item is never equivalent to
/// one that exists.
pub fn equivalent_items(
    a: Option<&Component>,
    b: Option<&Component>,
    spec: &EquivalenceSpec,
) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => equivalent(a, b, spec),
        _ => false,
    }
}

/// Produce the canonical string `equivalent` compares.
pub fn normalize_component(comp: &Component, spec: &EquivalenceSpec) -> String {
    let mut props = comp
        .properties
        .iter()
        .filter(|p| !spec.ignores_prop(&p.name))
        .map(|p| normalize_property(p, spec))
        .collect::<Vec<_>>();
    props.sort();

    let mut children = comp
        .children
        .iter()
        .map(|c| normalize_component(c, spec))
        .collect::<Vec<_>>();
    children.sort();

    let mut ret = comp.kind.clone();
    ret.push_str(&props.join("\r\n"));
    ret.push_str(&children.join("\r\n"));
    ret
}

fn normalize_property(prop: &Property, spec: &EquivalenceSpec) -> String {
    let mut params = prop
        .params
        .iter()
        .filter(|&(k, _)| !spec.ignores_param(&prop.name, k))
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>();
    params.sort();

    format!("{};{}:{}", prop.name, params.join(";"), prop.value)
}
