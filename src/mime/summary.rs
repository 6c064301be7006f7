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

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// The typed fields of a message, picked out of its headers as they arrive.
///
/// This is what a message list needs for a message that is not in any
/// folder, e.g. one opened from a file. Most fields hold the value of the
/// last occurrence of their header. `recipients` and `cc_list` hold every
/// occurrence, joined with `,` in arrival order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSummary {
    pub author: Option<String>,
    pub recipients: Option<String>,
    pub cc_list: Option<String>,
    pub subject: Option<String>,
    pub reply_to: Option<String>,
    pub message_id: Option<String>,
    pub list_post: Option<String>,
    pub delivered_to: Option<String>,
    /// The `Date` header, if it parsed as an RFC 2822 date.
    pub date: Option<DateTime<FixedOffset>>,
}

impl MessageSummary {
    /// Record one header. `name` must already be normalised.
    ///
    /// Returns false if the header was a `Date` whose value could not be
    /// parsed, in which case `date` is cleared.
    pub fn record(&mut self, name: &str, value: &str) -> bool {
        let slot = match name {
            "from" => &mut self.author,
            "to" => {
                append(&mut self.recipients, value);
                return true;
            },
            "cc" => {
                append(&mut self.cc_list, value);
                return true;
            },
            "subject" => &mut self.subject,
            "reply-to" => &mut self.reply_to,
            "message-id" => &mut self.message_id,
            "list-post" => &mut self.list_post,
            "delivered-to" => &mut self.delivered_to,
            "date" => {
                self.date = DateTime::parse_from_rfc2822(value.trim()).ok();
                return self.date.is_some();
            },
            _ => return true,
        };

        *slot = Some(value.to_owned());
        true
    }

    /// The date as microseconds since the epoch.
    pub fn date_micros(&self) -> Option<i64> {
        self.date.map(|d| {
            d.timestamp() * 1_000_000 + i64::from(d.timestamp_subsec_micros())
        })
    }
}

fn append(slot: &mut Option<String>, value: &str) {
    match *slot {
        Some(ref mut existing) => {
            existing.push(',');
            existing.push_str(value);
        },
        None => *slot = Some(value.to_owned()),
    }
}
