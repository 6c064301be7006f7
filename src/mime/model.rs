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

/// An RFC 2822 `addr-spec`, split on the dots of each half.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddrSpec {
    pub local: Vec<Vec<u8>>,
    pub domain: Vec<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailboxSpec {
    pub addr: AddrSpec,
    /// The words of the display name; empty if there is none.
    pub name: Vec<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupSpec {
    pub name: Vec<Vec<u8>>,
    pub boxes: Vec<MailboxSpec>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Address {
    Mailbox(MailboxSpec),
    Group(GroupSpec),
}

impl AddrSpec {
    /// Render as a bare `local@domain` address, lower-cased.
    ///
    /// Bytes which are not valid UTF-8 are replaced.
    pub fn to_bare_address(&self) -> String {
        let mut ret = join_dotted(&self.local);
        ret.push('@');
        ret.push_str(&join_dotted(&self.domain));
        ret.to_lowercase()
    }
}

impl Address {
    /// The mailboxes in this address, in order, with groups flattened.
    pub fn mailboxes(&self) -> Vec<&MailboxSpec> {
        match *self {
            Address::Mailbox(ref mailbox) => vec![mailbox],
            Address::Group(ref group) => group.boxes.iter().collect(),
        }
    }
}

fn join_dotted(parts: &[Vec<u8>]) -> String {
    parts
        .iter()
        .map(|p| String::from_utf8_lossy(p))
        .collect::<Vec<_>>()
        .join(".")
}
