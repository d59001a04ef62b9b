//! Message and mailbox capabilities required by the virtual machine.
//!
//! The storage layer is an external collaborator; the VM only relies on the
//! [`Message`] and [`Mailbox`] traits. [`MemoryMessage`] and
//! [`MemoryMailbox`] are in-memory implementations used by tests and by
//! embedders that already hold messages in memory.

use crate::error::{SieveError, SieveResult};

/// Read access to one message, plus the single mutation actions need.
///
/// Header lookup is case-insensitive on the field name.
pub trait Message {
    /// Message number within its mailbox (1-based).
    fn uid(&self) -> usize;

    /// Names of every header field, in order of appearance.
    fn header_names(&self) -> SieveResult<Vec<String>>;

    /// Values of every field called `name`, in order of appearance.
    fn header_values(&self, name: &str) -> SieveResult<Vec<String>>;

    /// Whether at least one field called `name` exists.
    fn has_header(&self, name: &str) -> SieveResult<bool> {
        Ok(!self.header_values(name)?.is_empty())
    }

    /// Number of MIME parts; zero for a single-part message.
    fn part_count(&self) -> SieveResult<usize>;

    /// Values of header `name` in MIME part `part` (0-based).
    fn part_header_values(&self, part: usize, name: &str) -> SieveResult<Vec<String>>;

    /// Total size of the message in bytes.
    fn size(&self) -> SieveResult<u64>;

    /// Envelope sender (`MAIL FROM`).
    fn envelope_sender(&self) -> SieveResult<Option<String>>;

    /// Envelope recipient (`RCPT TO`), when the store knows it.
    fn envelope_recipient(&self) -> SieveResult<Option<String>> {
        Ok(None)
    }

    /// Envelope date.
    fn envelope_date(&self) -> SieveResult<Option<String>>;

    /// Flags the message for deletion.
    fn mark_deleted(&mut self) -> SieveResult<()>;
}

/// Sequential access to the messages of a mailbox.
pub trait Mailbox {
    /// Number of messages.
    fn message_count(&self) -> SieveResult<usize>;

    /// The message at `index` (0-based).
    fn message_mut(&mut self, index: usize) -> SieveResult<&mut dyn Message>;
}

/// A message held entirely in memory.
///
/// # Examples
///
/// ```
/// use core_types::{MemoryMessage, Message};
///
/// let msg = MemoryMessage::parse(1, "Subject: ping\nFrom: a@example.org\n\nhello\n");
/// assert_eq!(msg.header_values("subject").unwrap(), vec!["ping".to_string()]);
/// assert_eq!(msg.size().unwrap(), 41);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryMessage {
    uid: usize,
    headers: Vec<(String, String)>,
    body: String,
    parts: Vec<MemoryMessage>,
    sender: Option<String>,
    recipient: Option<String>,
    date: Option<String>,
    raw_size: Option<u64>,
    deleted: bool,
}

impl MemoryMessage {
    /// Creates an empty message.
    pub fn new(uid: usize) -> Self {
        Self {
            uid,
            ..Self::default()
        }
    }

    /// Reads a message from its RFC 5322 text.
    ///
    /// Header fields run up to the first empty line; continuation lines are
    /// unfolded. The size is the length of `text`.
    pub fn parse(uid: usize, text: &str) -> Self {
        let mut msg = Self::new(uid);
        let mut lines = text.split('\n');

        for line in lines.by_ref() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                break;
            }
            if line.starts_with([' ', '\t']) {
                if let Some((_, value)) = msg.headers.last_mut() {
                    value.push(' ');
                    value.push_str(line.trim());
                }
                continue;
            }
            if let Some((name, value)) = line.split_once(':') {
                msg.headers
                    .push((name.trim().to_string(), value.trim().to_string()));
            }
        }

        msg.body = lines.collect::<Vec<_>>().join("\n");
        msg.raw_size = Some(text.len() as u64);
        msg
    }

    /// Adds a header field.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self.raw_size = None;
        self
    }

    /// Sets the body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self.raw_size = None;
        self
    }

    /// Appends a MIME part.
    pub fn with_part(mut self, part: MemoryMessage) -> Self {
        self.parts.push(part);
        self.raw_size = None;
        self
    }

    /// Sets the envelope sender.
    pub fn with_envelope_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Sets the envelope recipient.
    pub fn with_envelope_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    /// Sets the envelope date.
    pub fn with_envelope_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Whether an action flagged this message for deletion.
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// The message body.
    pub fn body(&self) -> &str {
        &self.body
    }

    fn rendered_size(&self) -> u64 {
        let headers: usize = self
            .headers
            .iter()
            .map(|(name, value)| name.len() + value.len() + 3)
            .sum();
        let parts: u64 = self.parts.iter().map(MemoryMessage::rendered_size).sum();
        (headers + 1 + self.body.len()) as u64 + parts
    }

    fn values_of(headers: &[(String, String)], name: &str) -> Vec<String> {
        headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
            .collect()
    }
}

impl Message for MemoryMessage {
    fn uid(&self) -> usize {
        self.uid
    }

    fn header_names(&self) -> SieveResult<Vec<String>> {
        Ok(self.headers.iter().map(|(n, _)| n.clone()).collect())
    }

    fn header_values(&self, name: &str) -> SieveResult<Vec<String>> {
        Ok(Self::values_of(&self.headers, name))
    }

    fn part_count(&self) -> SieveResult<usize> {
        Ok(self.parts.len())
    }

    fn part_header_values(&self, part: usize, name: &str) -> SieveResult<Vec<String>> {
        let part = self
            .parts
            .get(part)
            .ok_or_else(|| SieveError::Message(format!("no MIME part {}", part)))?;
        Ok(Self::values_of(&part.headers, name))
    }

    fn size(&self) -> SieveResult<u64> {
        Ok(self.raw_size.unwrap_or_else(|| self.rendered_size()))
    }

    fn envelope_sender(&self) -> SieveResult<Option<String>> {
        Ok(self.sender.clone())
    }

    fn envelope_recipient(&self) -> SieveResult<Option<String>> {
        Ok(self.recipient.clone())
    }

    fn envelope_date(&self) -> SieveResult<Option<String>> {
        Ok(self.date.clone())
    }

    fn mark_deleted(&mut self) -> SieveResult<()> {
        self.deleted = true;
        Ok(())
    }
}

/// A mailbox held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryMailbox {
    messages: Vec<MemoryMessage>,
}

impl MemoryMailbox {
    /// Creates an empty mailbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message.
    pub fn push(&mut self, message: MemoryMessage) {
        self.messages.push(message);
    }

    /// The stored messages.
    pub fn messages(&self) -> &[MemoryMessage] {
        &self.messages
    }
}

impl FromIterator<MemoryMessage> for MemoryMailbox {
    fn from_iter<I: IntoIterator<Item = MemoryMessage>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

impl Mailbox for MemoryMailbox {
    fn message_count(&self) -> SieveResult<usize> {
        Ok(self.messages.len())
    }

    fn message_mut(&mut self, index: usize) -> SieveResult<&mut dyn Message> {
        self.messages
            .get_mut(index)
            .map(|m| m as &mut dyn Message)
            .ok_or_else(|| SieveError::Message(format!("no message at index {}", index)))
    }
}
