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

//! Header aggregation for mail display and content comparison of calendar
//! items.
//!
//! The MIME parser that produces the header stream, and whatever renders the
//! result, live outside this crate. They talk to it through
//! `mime::HeaderSink` and the read-only `CanonicalHeaderMap`.

#[cfg(test)]
macro_rules! assert_matches {
    ($expected:pat, $actual:expr) => {
        match $actual {
            $expected => (),
            unexpected => panic!(
                "Expected {} matches {}, got {:?}",
                stringify!($expected),
                stringify!($actual),
                unexpected
            ),
        }
    };
}

pub mod ical;
pub mod mime;
pub mod support;

pub use crate::ical::{equivalent, Component, EquivalenceSpec, Property};
pub use crate::mime::{
    AttachmentInfo, CanonicalHeaderMap, HeaderAggregator, HeaderField,
    HeaderListener, HeaderSink, MailboxExtractor, MessageSummary,
    Rfc2822Mailboxes,
};
pub use crate::support::error::Error;
pub use crate::support::listeners::ListenerRegistry;
pub use crate::support::property_bag::PropertyBag;

#[cfg(test)]
static INIT_TEST_LOG: std::sync::Once = std::sync::Once::new();

#[cfg(test)]
fn init_test_log() {
    INIT_TEST_LOG.call_once(|| {
        fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{} [{}][{}] {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    message,
                ))
            })
            .level(log::LevelFilter::Debug)
            .chain(std::io::stderr())
            .apply()
            .unwrap();
    })
}
