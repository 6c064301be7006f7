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

use super::header;
use super::model::Address;

/// Extracts the bare mailbox addresses from an address header.
///
/// Implementations return lower-case `local@domain` strings in the order they
/// appear in the value, without display names.
pub trait MailboxExtractor {
    fn extract_mailboxes(&self, header_value: &str) -> Vec<String>;
}

impl<F: Fn(&str) -> Vec<String>> MailboxExtractor for F {
    fn extract_mailboxes(&self, header_value: &str) -> Vec<String> {
        self(header_value)
    }
}

/// The `MailboxExtractor` used by default, which understands RFC 2822
/// address lists including the obsolete syntax.
///
/// If the value as a whole does not parse, each comma-separated piece is
/// tried on its own. A piece which still does not parse is kept as its
/// trimmed, lower-cased text, so that a bare token such as `nobody` still
/// counts as a mailbox.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rfc2822Mailboxes;

impl MailboxExtractor for Rfc2822Mailboxes {
    fn extract_mailboxes(&self, header_value: &str) -> Vec<String> {
        if let Some(list) = header::parse_address_list(header_value.as_bytes())
        {
            return bare_addresses(&list);
        }

        let mut ret = Vec::new();
        for piece in header_value.split(',') {
            if let Some(list) = header::parse_address_list(piece.as_bytes()) {
                ret.extend(bare_addresses(&list));
            } else {
                let piece = piece.trim();
                if !piece.is_empty() {
                    ret.push(piece.to_lowercase());
                }
            }
        }
        ret
    }
}

fn bare_addresses(list: &[Address]) -> Vec<String> {
    list.iter()
        .flat_map(Address::mailboxes)
        .map(|m| m.addr.to_bare_address())
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extract_in_order() {
        assert_eq!(
            vec!["b@x".to_owned(), "a@x".to_owned()],
            Rfc2822Mailboxes.extract_mailboxes("Bob <B@x>, a@X")
        );
        assert!(Rfc2822Mailboxes.extract_mailboxes("").is_empty());
    }

    #[test]
    fn partially_broken_list() {
        assert_eq!(
            vec!["a@x".to_owned(), "<<broken".to_owned(), "c@x".to_owned()],
            Rfc2822Mailboxes.extract_mailboxes("a@x, <<Broken, Cee <c@x>")
        );
    }

    #[test]
    fn bare_tokens_are_kept() {
        assert_eq!(
            vec!["nobody".to_owned()],
            Rfc2822Mailboxes.extract_mailboxes(" Nobody ")
        );
        assert_eq!(
            vec!["somebody else".to_owned()],
            Rfc2822Mailboxes.extract_mailboxes("somebody else")
        );
        assert_eq!(
            vec!["a@x".to_owned(), "undisclosed".to_owned()],
            Rfc2822Mailboxes.extract_mailboxes("a@x,, undisclosed")
        );
    }

    #[test]
    fn closures_are_extractors() {
        let upper = |v: &str| vec![v.to_uppercase()];
        assert_eq!(vec!["A@X".to_owned()], upper.extract_mailboxes("a@x"));
    }
}
