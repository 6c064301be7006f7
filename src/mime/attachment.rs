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

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref TRAILING_PART: Regex = Regex::new("[?&]part=[^&]+$").unwrap();
    static ref PART: Regex = Regex::new("[?&]part=([^&]+)(?:&|$)").unwrap();
}

/// The content type the MIME layer gives to attachments that have been
/// deleted from the message.
pub const DELETED_CONTENT_TYPE: &str = "text/x-moz-deleted";
/// Field carrying the size the MIME layer computed for a part.
pub const PART_SIZE_FIELD: &str = "X-Mozilla-PartSize";
/// Field which is `0` if the part body was not actually downloaded.
pub const PART_DOWNLOADED_FIELD: &str = "X-Mozilla-PartDownloaded";

/// Two to the 53rd power minus one, the largest size that can be passed on to
/// a display layer working in doubles.
const MAX_SIZE: u64 = (1 << 53) - 1;
/// External sizes of 10^21 or more are rejected rather than capped.
const MAX_EXTERNAL_DIGITS: usize = 21;

/// An attachment annotation collected alongside the headers of a message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentInfo {
    pub content_type: String,
    /// The URL of the part. For `http` and `file` URLs, any trailing `part=`
    /// query parameter has been moved into `part_id`.
    pub url: String,
    pub part_id: Option<String>,
    /// The name to display, usually the file name.
    pub name: String,
    /// The URI of the message containing the attachment.
    pub uri: String,
    /// Whether the attachment has been detached from the message.
    pub is_external: bool,
    /// The size in bytes, if known.
    pub size: Option<u64>,
}

impl AttachmentInfo {
    pub fn new(
        content_type: impl Into<String>,
        url: impl Into<String>,
        name: impl Into<String>,
        uri: impl Into<String>,
        is_external: bool,
    ) -> Self {
        let mut url = url.into();
        let part_id;

        if url.starts_with("http") || url.starts_with("file") {
            let found = TRAILING_PART
                .find(&url)
                .map(|m| (m.start(), m.as_str().to_owned()));
            part_id = found.as_ref().and_then(|&(_, ref m)| {
                m.splitn(2, "part=").nth(1).map(str::to_owned)
            });
            if let Some((start, _)) = found {
                url.truncate(start);
            }
        } else {
            part_id = PART
                .captures(&url)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_owned());
        }

        AttachmentInfo {
            content_type: content_type.into(),
            url,
            part_id,
            name: name.into(),
            uri: uri.into(),
            is_external,
            size: None,
        }
    }

    /// Set a size known up front, such as that of a detached file.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn is_deleted(&self) -> bool {
        DELETED_CONTENT_TYPE == self.content_type
    }

    /// Apply one of the annotation fields the MIME layer emits after the
    /// attachment itself. Unknown fields are ignored.
    pub fn apply_field(&mut self, field: &str, value: &str) {
        if PART_SIZE_FIELD == field
            && !self.url.starts_with("file")
            && !self.is_deleted()
        {
            let size = if self.is_external && self.url.starts_with("http") {
                parse_external_size(value)
            } else {
                parse_leading_size(value)
            };

            if let Some(size) = size {
                self.size = Some(size);
            }
        } else if PART_DOWNLOADED_FIELD == field && "0" == value {
            // A size for a part that was never fetched is not trustworthy.
            // The MIME layer always emits this after the size.
            self.size = None;
        }
    }
}

/// Sizes reported for external links are often placeholders, so anything
/// that is not a plain decimal number of at least 2 is dropped, as are
/// absurdly long numbers.
fn parse_external_size(value: &str) -> Option<u64> {
    if value.is_empty()
        || value.len() > MAX_EXTERNAL_DIGITS
        || !value.bytes().all(|b| b.is_ascii_digit())
        || (value.len() > 1 && value.starts_with('0'))
    {
        return None;
    }

    let size = value.parse::<u64>().unwrap_or(MAX_SIZE).min(MAX_SIZE);
    if size < 2 {
        None
    } else {
        Some(size)
    }
}

/// Parses the integer at the start of `value`, ignoring anything after it.
/// Negative values (the MIME layer uses -1) mean the size is unknown.
fn parse_leading_size(value: &str) -> Option<u64> {
    let value = value.trim_start();
    let (negative, digits) = if let Some(rest) = value.strip_prefix('-') {
        (true, rest)
    } else {
        (false, value.strip_prefix('+').unwrap_or(value))
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or_else(|| digits.len());
    if 0 == end || negative {
        return None;
    }

    Some(digits[..end].parse::<u64>().unwrap_or(MAX_SIZE).min(MAX_SIZE))
}
