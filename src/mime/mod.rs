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

//! Aggregation of message headers and attachment annotations.

mod addressing;
mod aggregate;
mod attachment;
pub mod header;
pub mod model;
mod summary;

pub use addressing::{MailboxExtractor, Rfc2822Mailboxes};
pub use aggregate::{
    normalize_name, AggregatorState, CanonicalHeaderMap, HeaderAggregator,
    HeaderField, HeaderListener, HeaderSink,
};
pub use attachment::{
    AttachmentInfo, DELETED_CONTENT_TYPE, PART_DOWNLOADED_FIELD,
    PART_SIZE_FIELD,
};
pub use summary::MessageSummary;
