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

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::error::Error;
use crate::ical::EquivalenceSpec;

/// Policy for header aggregation and content comparison.
///
/// Typically embedded in the host application's TOML configuration. Every
/// field is optional; anything missing takes the default described on the
/// field.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub aggregation: AggregationConfig,

    #[serde(default)]
    pub equivalence: EquivalenceConfig,
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn parse(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Headers whose repeated occurrences are joined with `,` into a single
    /// entry, rather than stored under numbered keys.
    ///
    /// Names are case-insensitive. Default is `to` and `cc`.
    pub concatenated_headers: BTreeSet<String>,

    /// Headers stored under `user-agent` instead of their own name.
    ///
    /// Names are case-insensitive. Default is `x-mailer`, `x-mimeole` and
    /// `x-newsreader`.
    pub user_agent_synonyms: BTreeSet<String>,

    /// The first number used for the keys of repeated headers, e.g. with 0
    /// the second `Received` header becomes `received0`.
    ///
    /// The counter is shared by all header names within one message.
    pub duplicate_index_start: u32,

    /// If true, `text/x-vcard` attachments are not listed, since the display
    /// layer renders them inline.
    pub hide_inline_vcards: bool,

    /// If true, a message without a `Subject` header gets an empty one when
    /// the headers end, so that display code can rely on its presence.
    pub ensure_subject: bool,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        AggregationConfig {
            concatenated_headers: ["to", "cc"]
                .iter()
                .map(|&s| s.to_owned())
                .collect(),
            user_agent_synonyms: ["x-mailer", "x-mimeole", "x-newsreader"]
                .iter()
                .map(|&s| s.to_owned())
                .collect(),
            duplicate_index_start: 0,
            hide_inline_vcards: false,
            ensure_subject: false,
        }
    }
}

/// The TOML form of an `EquivalenceSpec`.
///
/// Leaving out either field means the default for that field, while an empty
/// list or table means "ignore nothing".
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EquivalenceConfig {
    pub ignore_props: Option<BTreeSet<String>>,
    pub ignore_params: Option<BTreeMap<String, BTreeSet<String>>>,
}

impl EquivalenceConfig {
    pub fn to_spec(&self) -> EquivalenceSpec {
        EquivalenceSpec::new(
            self.ignore_props.clone(),
            self.ignore_params.clone(),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(AggregationConfig::default(), config.aggregation);
        assert_eq!(EquivalenceSpec::default(), config.equivalence.to_spec());

        assert!(config.aggregation.concatenated_headers.contains("cc"));
        assert!(config.aggregation.user_agent_synonyms.contains("x-mimeole"));
    }

    #[test]
    fn parse_full_config() {
        let config = Config::parse(
            r#"
[aggregation]
concatenated_headers = ["to", "cc", "bcc"]
duplicate_index_start = 5
hide_inline_vcards = true

[equivalence]
ignore_props = []

[equivalence.ignore_params]
ATTENDEE = ["CN", "RSVP"]
"#,
        )
        .unwrap();

        let agg = &config.aggregation;
        assert_eq!(3, agg.concatenated_headers.len());
        assert!(agg.concatenated_headers.contains("bcc"));
        // Not mentioned, so still the default
        assert_eq!(3, agg.user_agent_synonyms.len());
        assert_eq!(5, agg.duplicate_index_start);
        assert!(agg.hide_inline_vcards);
        assert!(!agg.ensure_subject);

        let spec = config.equivalence.to_spec();
        assert!(spec.ignore_props().is_empty());
        assert!(spec.ignores_param("ATTENDEE", "RSVP"));
        assert!(!spec.ignores_param("ORGANIZER", "CN"));
        assert_eq!(
            vec!["ATTENDEE"],
            spec.ignore_params()
                .keys()
                .map(String::as_str)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn bad_config_is_an_error() {
        assert_matches!(
            Err(Error::Config(_)),
            Config::parse("[aggregation]\nduplicate_index_start = \"x\"\n")
        );
    }
}
