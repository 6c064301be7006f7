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

//! Folding the raw header stream of a message into a map for display.
//!
//! The MIME layer pushes `(name, value)` pairs into a `HeaderSink` in the
//! order they occur in the message. `HeaderAggregator` is the sink that
//! normalises the names, decides what to do with repeated headers, and
//! finally drops derived headers that would only repeat what is already
//! shown (a `Sender` equal to `From`, a `Reply-To` equal to `From` or `To`).

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::addressing::{MailboxExtractor, Rfc2822Mailboxes};
use super::attachment::AttachmentInfo;
use super::summary::MessageSummary;
use crate::support::config::AggregationConfig;
use crate::support::error::Error;
use crate::support::listeners::{ListenerRegistry, ListenerResult};
use crate::support::log_prefix::LogPrefix;
use crate::support::ordered;
use crate::support::property_bag::PropertyBag;

const USER_AGENT: &str = "user-agent";
const SUBJECT: &str = "subject";
const MESSAGE_ID: &str = "message-id";
const INLINE_VCARD: &str = "text/x-vcard";

/// One header as stored in a `CanonicalHeaderMap`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderField {
    /// The normalised name. For an entry stored under a synthesized key such
    /// as `received0`, this is still the plain name (`received`).
    pub name: String,
    /// The raw value, or the comma-joined values for concatenated headers.
    pub value: String,
}

/// The result of aggregating the headers of one message.
pub type CanonicalHeaderMap = PropertyBag<HeaderField>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregatorState {
    /// No message has been started.
    Idle,
    /// Between `on_start` and `on_end`.
    Collecting,
    /// The headers of the current message are complete and read-only.
    Closed,
}

/// Normalise a header name for use as a map key.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Receives the headers of a message as they are parsed.
///
/// Calls arrive as `on_start`, any number of `on_header`, then `on_end`, once
/// per message.
pub trait HeaderSink {
    /// Begin a new message, abandoning any message in progress.
    fn on_start(&mut self);
    fn on_header(&mut self, name: &str, value: &str) -> Result<(), Error>;
    fn on_end(&mut self) -> Result<(), Error>;
}

/// Observes a `HeaderAggregator`.
///
/// Every method does nothing by default. Errors are reported and otherwise
/// ignored; they never affect the aggregator or other listeners.
pub trait HeaderListener {
    fn on_start_headers(&self) -> ListenerResult {
        Ok(())
    }

    fn on_end_headers(&self, _headers: &CanonicalHeaderMap) -> ListenerResult {
        Ok(())
    }

    fn on_first_attachment(
        &self,
        _attachment: &AttachmentInfo,
    ) -> ListenerResult {
        Ok(())
    }

    fn on_end_attachments(
        &self,
        _attachments: &[AttachmentInfo],
    ) -> ListenerResult {
        Ok(())
    }
}

/// The `HeaderSink` that builds a `CanonicalHeaderMap`.
pub struct HeaderAggregator {
    extractor: Box<dyn MailboxExtractor>,
    config: AggregationConfig,
    listeners: ListenerRegistry<dyn HeaderListener>,
    log_prefix: LogPrefix,

    state: AggregatorState,
    headers: CanonicalHeaderMap,
    summary: MessageSummary,
    /// The suffix for the next repeated header. Shared by all names.
    next_duplicate_index: u32,
    /// Every distinct normalised name seen, sorted.
    header_names: Vec<String>,
    attachments: Vec<AttachmentInfo>,
    /// Set while the most recent attachment was not accepted, so that its
    /// fields are not applied to the one before it.
    skip_attachment: bool,
}

impl fmt::Debug for HeaderAggregator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("HeaderAggregator")
            .field("config", &self.config)
            .field("log_prefix", &self.log_prefix)
            .field("state", &self.state)
            .field("headers", &self.headers)
            .field("summary", &self.summary)
            .field("attachments", &self.attachments)
            .finish()
    }
}

impl Default for HeaderAggregator {
    fn default() -> Self {
        HeaderAggregator::new(
            Box::new(Rfc2822Mailboxes),
            AggregationConfig::default(),
        )
    }
}

impl HeaderAggregator {
    /// Create an aggregator. Header names in `config` are matched
    /// case-insensitively.
    pub fn new(
        extractor: Box<dyn MailboxExtractor>,
        mut config: AggregationConfig,
    ) -> Self {
        config.concatenated_headers =
            normalize_names(&config.concatenated_headers);
        config.user_agent_synonyms =
            normalize_names(&config.user_agent_synonyms);

        let next_duplicate_index = config.duplicate_index_start;
        HeaderAggregator {
            extractor,
            config,
            listeners: ListenerRegistry::new(),
            log_prefix: LogPrefix::new("headers".to_owned()),
            state: AggregatorState::Idle,
            headers: CanonicalHeaderMap::new(),
            summary: MessageSummary::default(),
            next_duplicate_index,
            header_names: Vec::new(),
            attachments: Vec::new(),
            skip_attachment: false,
        }
    }

    pub fn state(&self) -> AggregatorState {
        self.state
    }

    pub fn log_prefix(&self) -> &LogPrefix {
        &self.log_prefix
    }

    /// The headers of the current message, available once `on_end` has
    /// completed.
    pub fn headers(&self) -> Result<&CanonicalHeaderMap, Error> {
        self.require("headers", AggregatorState::Closed)?;
        Ok(&self.headers)
    }

    /// The typed fields of the current message, available once `on_end` has
    /// completed.
    pub fn summary(&self) -> Result<&MessageSummary, Error> {
        self.require("summary", AggregatorState::Closed)?;
        Ok(&self.summary)
    }

    /// All distinct normalised header names of the current message, sorted.
    pub fn header_names(&self) -> &[String] {
        &self.header_names
    }

    pub fn attachments(&self) -> &[AttachmentInfo] {
        &self.attachments
    }

    pub fn add_listener(&mut self, listener: Rc<dyn HeaderListener>) -> bool {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, listener: &Rc<dyn HeaderListener>) {
        self.listeners.remove(listener)
    }

    /// Aggregate a complete in-memory header list as one message.
    pub fn process_headers<I, N, V>(
        &mut self,
        headers: I,
    ) -> Result<&CanonicalHeaderMap, Error>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: AsRef<str>,
    {
        self.on_start();
        for (name, value) in headers {
            self.on_header(name.as_ref(), value.as_ref())?;
        }
        self.on_end()?;
        self.headers()
    }

    /// Add an attachment of the current message.
    ///
    /// Attachments are reported after the headers, but may also arrive while
    /// they are still being collected.
    pub fn on_attachment(&mut self, info: AttachmentInfo) -> Result<(), Error> {
        self.require_started("on_attachment")?;

        self.skip_attachment = true;
        if self.config.hide_inline_vcards && INLINE_VCARD == info.content_type
        {
            debug!("{} Hiding inline vCard {:?}", self.log_prefix, info.name);
            return Ok(());
        }

        self.attachments.push(info);
        self.skip_attachment = false;

        if 1 == self.attachments.len() {
            let first = &self.attachments[0];
            self.listeners.notify("on_first_attachment", |l| {
                l.on_first_attachment(first)
            });
        }

        Ok(())
    }

    /// Apply an annotation field to the most recent attachment.
    pub fn on_attachment_field(
        &mut self,
        field: &str,
        value: &str,
    ) -> Result<(), Error> {
        self.require_started("on_attachment_field")?;

        if self.skip_attachment {
            return Ok(());
        }

        if let Some(last) = self.attachments.last_mut() {
            last.apply_field(field, value);
        } else {
            warn!(
                "{} Attachment field {} without an attachment",
                self.log_prefix, field
            );
        }

        Ok(())
    }

    pub fn on_end_attachments(&mut self) -> Result<(), Error> {
        self.require_started("on_end_attachments")?;

        let attachments = &self.attachments;
        self.listeners.notify("on_end_attachments", |l| {
            l.on_end_attachments(attachments)
        });
        Ok(())
    }

    fn require(
        &self,
        operation: &'static str,
        state: AggregatorState,
    ) -> Result<(), Error> {
        if state == self.state {
            Ok(())
        } else {
            Err(Error::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    fn require_started(&self, operation: &'static str) -> Result<(), Error> {
        if AggregatorState::Idle == self.state {
            Err(Error::InvalidState {
                operation,
                state: self.state,
            })
        } else {
            Ok(())
        }
    }

    fn mailboxes(&self, header: &str) -> Option<Vec<String>> {
        self.headers
            .get(header)
            .map(|h| self.extractor.extract_mailboxes(&h.value))
    }

    fn collapse_sender(&mut self) {
        let (from, sender) =
            match (self.mailboxes("from"), self.mailboxes("sender")) {
                (Some(from), Some(sender)) => (from, sender),
                _ => return,
            };

        let from = from.into_iter().collect::<BTreeSet<_>>();
        let sender = sender.into_iter().collect::<BTreeSet<_>>();
        if from == sender {
            debug!("{} Sender is the same as From", self.log_prefix);
            self.headers.delete("sender");
        }
    }

    fn collapse_reply_to(&mut self) {
        let (from, to, reply_to) = match (
            self.mailboxes("from"),
            self.mailboxes("to"),
            self.mailboxes("reply-to"),
        ) {
            (Some(from), Some(to), Some(reply_to)) => {
                (from.join(", "), to.join(", "), reply_to.join(", "))
            },
            _ => return,
        };

        // The lists are compared as strings, so order matters.
        if reply_to == from || reply_to == to {
            debug!(
                "{} Reply-To {:?} repeats From or To",
                self.log_prefix, reply_to
            );
            self.headers.delete("reply-to");
        }
    }

    fn ensure_subject(&mut self) {
        if self.config.ensure_subject && !self.headers.contains(SUBJECT) {
            self.headers.set(
                SUBJECT,
                HeaderField {
                    name: SUBJECT.to_owned(),
                    value: String::new(),
                },
            );
        }
    }
}

impl HeaderSink for HeaderAggregator {
    fn on_start(&mut self) {
        if AggregatorState::Collecting == self.state {
            debug!("{} Abandoning incomplete message", self.log_prefix);
        }

        self.log_prefix.clear_message();
        self.headers.clear();
        self.summary = MessageSummary::default();
        self.next_duplicate_index = self.config.duplicate_index_start;
        self.header_names.clear();
        self.attachments.clear();
        self.skip_attachment = false;
        self.state = AggregatorState::Collecting;

        self.listeners
            .notify("on_start_headers", |l| l.on_start_headers());
    }

    fn on_header(&mut self, name: &str, value: &str) -> Result<(), Error> {
        self.require("on_header", AggregatorState::Collecting)?;

        let mut name = normalize_name(name);
        if let Err(e) = check_name(&name) {
            warn!("{} {}", self.log_prefix, e);
            return Ok(());
        }

        if !self.summary.record(&name, value) {
            debug!("{} Unparseable date {:?}", self.log_prefix, value);
        }

        if self.config.user_agent_synonyms.contains(&name) {
            name = USER_AGENT.to_owned();
        }

        if MESSAGE_ID == name {
            self.log_prefix.set_message_id(value.to_owned());
        }

        if !self.headers.contains(&name) {
            self.headers.set(
                name.clone(),
                HeaderField {
                    name: name.clone(),
                    value: value.to_owned(),
                },
            );
        } else if self.config.concatenated_headers.contains(&name) {
            if let Some(existing) = self.headers.get_mut(&name) {
                existing.value.push(',');
                existing.value.push_str(value);
            }
        } else {
            let key = format!("{}{}", name, self.next_duplicate_index);
            self.next_duplicate_index =
                self.next_duplicate_index.saturating_add(1);
            self.headers.set(
                key,
                HeaderField {
                    name: name.clone(),
                    value: value.to_owned(),
                },
            );
        }

        ordered::insert(&mut self.header_names, name, Ord::cmp, true);
        Ok(())
    }

    fn on_end(&mut self) -> Result<(), Error> {
        self.require("on_end", AggregatorState::Collecting)?;

        self.collapse_sender();
        self.collapse_reply_to();
        self.ensure_subject();
        self.state = AggregatorState::Closed;

        let headers = &self.headers;
        self.listeners
            .notify("on_end_headers", |l| l.on_end_headers(headers));
        Ok(())
    }
}

fn normalize_names(names: &BTreeSet<String>) -> BTreeSet<String> {
    names.iter().map(|n| normalize_name(n)).collect()
}

fn check_name(name: &str) -> Result<(), Error> {
    if name.is_empty()
        || name.chars().any(|c| ':' == c || !('!'..='~').contains(&c))
    {
        Err(Error::MalformedField(format!("Bad header name {:?}", name)))
    } else {
        Ok(())
    }
}
