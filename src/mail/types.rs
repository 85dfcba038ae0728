use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::HTML_WRAP_WIDTH;
use crate::error::SyncError;

/// Address of a remote inbox. Opaque to the engine: only compared and forwarded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MailboxId(String);

impl MailboxId {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MailboxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A message as listed by the remote service.
///
/// Only `read_at` is ever changed locally (optimistic read marking).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub from_name: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,
}

impl Message {
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }

    /// Sender name, then subject, then a placeholder.
    pub fn display_title(&self) -> &str {
        non_empty(self.from_name.as_deref())
            .or_else(|| non_empty(self.subject.as_deref()))
            .unwrap_or("Untitled")
    }

    pub fn subject(&self) -> &str {
        self.subject.as_deref().unwrap_or("")
    }

    /// When the message was sent, or when the service stored it if the date header was missing.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.date.or(self.created_at)
    }

    /// Get displayable text content.
    /// HTML is preferred and converted to text; plain text is the fallback.
    pub fn body_text(&self) -> String {
        if let Some(html) = non_empty(self.html.as_deref()) {
            html2text::from_read(html.as_bytes(), HTML_WRAP_WIDTH)
                .unwrap_or_else(|_| html.to_string())
        } else if let Some(text) = non_empty(self.text.as_deref()) {
            text.to_string()
        } else {
            "No content".to_string()
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// One page of a mailbox listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub total: u64,
    pub list: Vec<Message>,
}

impl PageResult {
    pub fn contains(&self, id: &MessageId) -> bool {
        self.list.iter().any(|m| &m.id == id)
    }

    pub fn get_mut(&mut self, id: &MessageId) -> Option<&mut Message> {
        self.list.iter_mut().find(|m| &m.id == id)
    }
}

/// Identity of a listing request. Results are only ever applied to the view whose key
/// they were requested for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub mailbox: MailboxId,
    pub page: u32,
    pub page_size: u32,
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} p{}/{}", self.mailbox, self.page, self.page_size)
    }
}

/// Outgoing message as submitted to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Message being composed. The sender is fixed when the draft is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    from: MailboxId,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Partial update to a draft; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftPatch {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub html: Option<String>,
}

impl Draft {
    pub fn new(from: MailboxId) -> Self {
        Self {
            from,
            to: String::new(),
            subject: String::new(),
            html: String::new(),
        }
    }

    pub fn from(&self) -> &MailboxId {
        &self.from
    }

    pub fn apply(&mut self, patch: DraftPatch) {
        if let Some(to) = patch.to {
            self.to = to;
        }
        if let Some(subject) = patch.subject {
            self.subject = subject;
        }
        if let Some(html) = patch.html {
            self.html = html;
        }
    }

    /// Check required fields and build the envelope to submit.
    pub fn to_envelope(&self) -> Result<Envelope, SyncError> {
        if self.to.trim().is_empty() {
            return Err(SyncError::validation("Recipient is required"));
        }
        if self.subject.trim().is_empty() {
            return Err(SyncError::validation("Subject is required"));
        }
        if self.html.trim().is_empty() {
            return Err(SyncError::validation("Message body is required"));
        }
        Ok(Envelope {
            from: self.from.to_string(),
            to: self.to.trim().to_string(),
            subject: self.subject.clone(),
            html: self.html.clone(),
        })
    }
}

impl DraftPatch {
    pub fn to(value: impl Into<String>) -> Self {
        Self {
            to: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn subject(value: impl Into<String>) -> Self {
        Self {
            subject: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn html(value: impl Into<String>) -> Self {
        Self {
            html: Some(value.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
pub(crate) fn make_message(id: &str, read: bool) -> Message {
    Message {
        id: MessageId::new(id),
        subject: Some(format!("Subject {}", id)),
        from: Some("sender@example.com".to_string()),
        from_name: Some("Sender".to_string()),
        to: None,
        html: None,
        text: Some(format!("Body of {}", id)),
        date: None,
        created_at: DateTime::from_timestamp(1_700_000_000, 0),
        read_at: if read {
            DateTime::from_timestamp(1_700_000_100, 0)
        } else {
            None
        },
    }
}
