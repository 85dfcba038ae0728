//! Inbox state types
//!
//! All state types live here so the engine and the terminal front end share one model:
//! the front end only ever sees `InboxView` snapshots.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::mail::types::{Draft, MailboxId, Message, MessageId, PageKey, PageResult};

/// Number of pages needed to show `total` messages; zero when there is nothing to show.
pub fn page_count(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size as u64)
}

/// Current position in the listing.
///
/// `page` is not clamped when the total shrinks; a page past the end simply lists nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub page: u32,
    pub page_size: u32,
}

impl PaginationState {
    pub fn new(page_size: u32) -> Self {
        Self { page: 1, page_size }
    }

    pub fn key(&self, mailbox: &MailboxId) -> PageKey {
        PageKey {
            mailbox: mailbox.clone(),
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// The open message and the checkbox set used for bulk actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    /// Always refers to a message on the current page, or is `None`.
    pub selected: Option<MessageId>,
    /// May span pages; only cleared explicitly.
    pub bulk: BTreeSet<MessageId>,
}

impl SelectionState {
    /// Add `id` if absent, remove it if present.
    pub fn toggle_bulk(&mut self, id: MessageId) {
        if !self.bulk.remove(&id) {
            self.bulk.insert(id);
        }
    }

    pub fn clear_bulk(&mut self) {
        self.bulk.clear();
    }

    /// Drop the open message if the fresh page no longer lists it.
    /// Returns true if the selection was reset.
    pub fn reconcile(&mut self, page: &PageResult) -> bool {
        match &self.selected {
            Some(id) if !page.contains(id) => {
                tracing::debug!("Selected message {} no longer listed, closing it", id);
                self.selected = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshState {
    pub auto_refresh: bool,
    pub interval: Duration,
}

/// Loading, error, and notice state
#[derive(Debug, Clone, Default)]
pub struct StatusState {
    /// A fetch for the active key is outstanding.
    pub loading: bool,
    pub error: Option<String>,
    notices: Vec<String>,
}

impl StatusState {
    pub fn set_error(&mut self, error: impl ToString) {
        self.error = Some(error.to_string());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn push_notice(&mut self, msg: impl ToString) {
        self.notices.push(msg.to_string());
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComposeState {
    pub draft: Option<Draft>,
    pub sending: bool,
}

/// A read flag set locally ahead of the server.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OptimisticRead {
    pub read_at: DateTime<Utc>,
    /// Set once the server acknowledged the mark-read: listings requested with a sequence
    /// number at or past this value already reflect it and are taken as-is.
    pub confirmed_from_seq: Option<u64>,
}

pub(crate) type OptimisticReads = HashMap<MessageId, OptimisticRead>;

/// Snapshot handed to the presentation layer after every engine step.
#[derive(Debug, Clone, PartialEq)]
pub struct InboxView {
    pub mailbox: Option<MailboxId>,
    pub page: u32,
    pub page_size: u32,
    /// `None` until the first listing for the active key arrives.
    pub total: Option<u64>,
    pub page_count: u64,
    pub messages: Vec<Message>,
    pub selected: Option<MessageId>,
    pub bulk_selected: Vec<MessageId>,
    pub auto_refresh: bool,
    pub loading: bool,
    pub bulk_pending: bool,
    pub draft: Option<Draft>,
    pub sending: bool,
    pub error: Option<String>,
}

impl InboxView {
    pub fn selected_message(&self) -> Option<&Message> {
        let id = self.selected.as_ref()?;
        self.messages.iter().find(|m| &m.id == id)
    }

    /// Pagination controls are only needed with more than one page.
    pub fn needs_pagination(&self) -> bool {
        self.page_count > 1
    }

    pub fn is_bulk_selected(&self, id: &MessageId) -> bool {
        self.bulk_selected.contains(id)
    }
}
