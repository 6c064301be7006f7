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

//! The RFC 2822 address grammar, including the obsolete syntax.
//!
//! Only as much of the header syntax as is needed to pull mailboxes out of
//! address headers is defined here. Header values arrive already unfolded,
//! so line endings are simply whitespace.

use nom::{
    branch::alt,
    bytes::complete::{is_a, is_not, take, take_while1},
    character::complete::char,
    combinator::{map, opt},
    multi::{
        fold_many0, many0, many0_count, many1_count, separated_nonempty_list,
    },
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use super::model::*;

type PResult<'a, T> = IResult<&'a [u8], T>;

/// Parse a complete address list, such as the value of a `To` header.
///
/// Returns `None` if any part of the value is not understood.
pub fn parse_address_list(value: &[u8]) -> Option<Vec<Address>> {
    match address_list(value) {
        Ok((rest, list)) if rest.is_empty() => Some(list),
        _ => None,
    }
}

// RFC 2822 3.2.2 "quoted-pair", including the 8-bit clean "obsolete" syntax
fn quoted_pair(i: &[u8]) -> PResult<&[u8]> {
    preceded(char('\\'), take(1usize))(i)
}

// RFC 2822 3.2.3 "Folding white space".
fn fws(i: &[u8]) -> PResult<&[u8]> {
    map(is_a(" \t\r\n"), |_| &b" "[..])(i)
}

// RFC 2822 3.2.3 "Comment text".
fn ctext(i: &[u8]) -> PResult<&[u8]> {
    is_not("()\\ \t\r\n")(i)
}

// RFC 2822 3.2.3 "Comment content".
// FWS is moved in here from the comment definition to keep it simple.
fn ccontent(i: &[u8]) -> PResult<()> {
    alt((
        map(ctext, |_| ()),
        map(quoted_pair, |_| ()),
        map(fws, |_| ()),
        comment,
    ))(i)
}

// RFC 2822 3.2.3 "Comment". Note it is recursive.
fn comment(i: &[u8]) -> PResult<()> {
    map(delimited(char('('), many0_count(ccontent), char(')')), |_| ())(i)
}

// RFC 2822 3.2.3 "Comment or folding white space". Always succeeds.
fn cfws(i: &[u8]) -> PResult<()> {
    map(many0_count(alt((map(fws, |_| ()), comment))), |_| ())(i)
}

// RFC 2822 3.2.4 "Atom text"
// Amended by RFC 6532 to include all non-ASCII characters
fn is_atext(ch: u8) -> bool {
    ch.is_ascii_alphanumeric()
        || b"!#$%&'*+-/=?^_`{|}~".contains(&ch)
        || ch >= 0x80
}

fn atext(i: &[u8]) -> PResult<&[u8]> {
    take_while1(is_atext)(i)
}

// RFC 2822 3.2.4 "Atom"
fn atom(i: &[u8]) -> PResult<&[u8]> {
    delimited(cfws, atext, cfws)(i)
}

// RFC 2822 3.2.5 "Quoted [string] text"
fn qtext(i: &[u8]) -> PResult<&[u8]> {
    is_not(" \t\r\n\\\"")(i)
}

// RFC 2822 3.2.5 "Quoted [string] content"
fn qcontent(i: &[u8]) -> PResult<&[u8]> {
    alt((qtext, quoted_pair, fws))(i)
}

// RFC 2822 3.2.5 "Quoted string"
fn quoted_string(i: &[u8]) -> PResult<Vec<u8>> {
    delimited(
        pair(cfws, char('"')),
        fold_many0(qcontent, Vec::new(), |mut acc: Vec<u8>, item| {
            acc.extend_from_slice(item);
            acc
        }),
        pair(char('"'), cfws),
    )(i)
}

// RFC 2822 3.2.6 "word"
fn word(i: &[u8]) -> PResult<Vec<u8>> {
    alt((map(atom, |a: &[u8]| a.to_vec()), quoted_string))(i)
}

// The '.' that many agents put unquoted into display names, part of the
// `obs-phrase` grammar.
fn obs_dot(i: &[u8]) -> PResult<Vec<u8>> {
    terminated(map(char('.'), |_| b".".to_vec()), cfws)(i)
}

// RFC 2822 3.2.6 "phrase", plus "obsolete phrase" syntax
fn phrase(i: &[u8]) -> PResult<Vec<Vec<u8>>> {
    map(
        pair(word, many0(alt((word, obs_dot)))),
        |(head, mut tail): (Vec<u8>, Vec<Vec<u8>>)| {
            tail.insert(0, head);
            tail
        },
    )(i)
}

// RFC 2822 3.4.1 local part of address
// Any dot-atom or quoted-string conforms to obs-local-part, so we just parse
// that.
fn local_part(i: &[u8]) -> PResult<Vec<Vec<u8>>> {
    separated_nonempty_list(char('.'), word)(i)
}

// RFC 2822 4.4 obsolete domain format, which encompasses dot-atom
fn obs_domain(i: &[u8]) -> PResult<Vec<Vec<u8>>> {
    separated_nonempty_list(char('.'), map(atom, |a: &[u8]| a.to_vec()))(i)
}

// RFC 2822 3.4.1 domain name text
fn dtext(i: &[u8]) -> PResult<&[u8]> {
    is_not("[]\\ \t\r\n")(i)
}

// RFC 2822 3.4.1 domain literal content
fn dcontent(i: &[u8]) -> PResult<&[u8]> {
    alt((dtext, quoted_pair, fws))(i)
}

// RFC 2822 3.4.1 domain literal, kept with its brackets
fn domain_literal(i: &[u8]) -> PResult<Vec<u8>> {
    map(
        delimited(
            pair(cfws, char('[')),
            fold_many0(dcontent, vec![b'['], |mut acc: Vec<u8>, item| {
                acc.extend_from_slice(item);
                acc
            }),
            pair(char(']'), cfws),
        ),
        |mut res: Vec<u8>| {
            res.push(b']');
            res
        },
    )(i)
}

// RFC 2822 3.4.1 domain
fn domain(i: &[u8]) -> PResult<Vec<Vec<u8>>> {
    alt((obs_domain, map(domain_literal, |v: Vec<u8>| vec![v])))(i)
}

// RFC 2822 3.4.1 address specification
fn addr_spec(i: &[u8]) -> PResult<AddrSpec> {
    map(
        pair(local_part, preceded(char('@'), domain)),
        |(local, domain)| AddrSpec { local, domain },
    )(i)
}

fn route_delim(i: &[u8]) -> PResult<()> {
    alt((map(char(','), |_| ()), map(fws, |_| ()), comment))(i)
}

// RFC 2822 4.4 obsolete routing information
// We just discard all this
fn obs_route(i: &[u8]) -> PResult<()> {
    map(
        tuple((
            preceded(char('@'), domain),
            many0_count(preceded(
                many1_count(route_delim),
                preceded(char('@'), domain),
            )),
            char(':'),
        )),
        |_| (),
    )(i)
}

// RFC 2822 3.4 angle-delimited address, including the 4.4 obsolete routing
// information.
fn angle_addr(i: &[u8]) -> PResult<AddrSpec> {
    delimited(
        tuple((cfws, char('<'), opt(obs_route))),
        addr_spec,
        pair(char('>'), cfws),
    )(i)
}

// RFC 2822 3.4 mailbox
fn mailbox(i: &[u8]) -> PResult<MailboxSpec> {
    map(
        alt((
            pair(opt(phrase), angle_addr),
            map(addr_spec, |a: AddrSpec| (None, a)),
        )),
        |(name, addr): (Option<Vec<Vec<u8>>>, AddrSpec)| MailboxSpec {
            name: name.unwrap_or_default(),
            addr,
        },
    )(i)
}

// Used in obsolete list syntax
fn obs_list_delim(i: &[u8]) -> PResult<()> {
    map(many1_count(tuple((cfws, char(','), cfws))), |_| ())(i)
}

// RFC 2822 3.4 mailbox list, including 4.4 obsolete syntax
fn mailbox_list(i: &[u8]) -> PResult<Vec<MailboxSpec>> {
    delimited(
        opt(obs_list_delim),
        separated_nonempty_list(obs_list_delim, mailbox),
        opt(obs_list_delim),
    )(i)
}

// RFC 2822 3.4 group
fn group(i: &[u8]) -> PResult<GroupSpec> {
    map(
        pair(
            terminated(phrase, char(':')),
            terminated(opt(mailbox_list), tuple((cfws, char(';'), cfws))),
        ),
        |(name, boxes)| GroupSpec {
            name,
            boxes: boxes.unwrap_or_default(),
        },
    )(i)
}

// RFC 2822 3.4 address
fn address(i: &[u8]) -> PResult<Address> {
    alt((map(mailbox, Address::Mailbox), map(group, Address::Group)))(i)
}

// RFC 2822 3.4 address list, including 4.4 obsolete syntax
fn address_list(i: &[u8]) -> PResult<Vec<Address>> {
    delimited(
        opt(obs_list_delim),
        separated_nonempty_list(obs_list_delim, address),
        opt(obs_list_delim),
    )(i)
}

#[cfg(test)]
mod test {
    use super::*;

    fn bare(value: &str) -> Option<Vec<String>> {
        parse_address_list(value.as_bytes()).map(|list| {
            list.iter()
                .flat_map(Address::mailboxes)
                .map(|m| m.addr.to_bare_address())
                .collect()
        })
    }

    fn s(v: &[&str]) -> Option<Vec<String>> {
        Some(v.iter().map(|&s| s.to_owned()).collect())
    }

    #[test]
    fn simple_mailboxes() {
        assert_eq!(s(&["a@x.com"]), bare("a@x.com"));
        assert_eq!(s(&["a@x.com"]), bare("  A@X.com  "));
        assert_eq!(s(&["alice@x.com"]), bare("Alice <alice@x.com>"));
        assert_eq!(
            s(&["jqp@example.com"]),
            bare("John Q. Public <JQP@example.com>")
        );
        assert_eq!(
            s(&["first.last@sub.example.com"]),
            bare("first.last@sub.example.com")
        );
    }

    #[test]
    fn address_lists() {
        assert_eq!(
            s(&["a@x", "j@y", "b@z"]),
            bare("a@x, \"Doe, John\" <j@y>,Bob <b@z>")
        );
        // Obsolete list syntax allows empty elements
        assert_eq!(s(&["a@x", "b@x"]), bare(",a@x,, ,b@x,"));
    }

    #[test]
    fn display_name_words() {
        let list =
            parse_address_list(b"\"Doe, John\" (ceo) <j@y>").unwrap();
        assert_eq!(1, list.len());
        match list[0] {
            Address::Mailbox(ref m) => {
                assert_eq!(vec![b"Doe, John".to_vec()], m.name);
                assert_eq!(vec![b"j".to_vec()], m.addr.local);
                assert_eq!(vec![b"y".to_vec()], m.addr.domain);
            },
            ref a => panic!("Unexpected address: {:?}", a),
        }
    }

    #[test]
    fn comments_and_quoting() {
        assert_eq!(s(&["a@x"]), bare("(hi) a@x (there (nested))"));
        assert_eq!(s(&["a b@x"]), bare("\"a b\"@x"));
        assert_eq!(s(&["a\"b@x"]), bare("\"a\\\"b\"@x"));
    }

    #[test]
    fn groups() {
        assert_eq!(
            s(&["a@x", "b@x", "c@y"]),
            bare("Team: a@x, Bee <b@x>;, c@y")
        );
        assert_eq!(s(&[]), bare("undisclosed-recipients:;"));
    }

    #[test]
    fn obsolete_forms() {
        assert_eq!(s(&["a@x"]), bare("<@route1,@route2:a@x>"));
        assert_eq!(s(&["a@[127.0.0.1]"]), bare("a@[127.0.0.1]"));
    }

    #[test]
    fn garbage() {
        assert_eq!(None, bare(""));
        assert_eq!(None, bare("not an address"));
        assert_eq!(None, bare("a@x <"));
        assert_eq!(None, bare("<a@x"));
    }
}
