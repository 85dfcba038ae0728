//! Inbox core - the reconciliation state machine
//!
//! `InboxState` owns everything about the current view: mailbox, pagination, selection,
//! refresh mode, drafts and the last accepted listing. Transitions are plain methods that
//! mutate the state and return the side effects the engine must run; nothing in here
//! performs I/O.

mod actions;
mod event_loop;
mod handlers;
pub mod state;

use std::time::Duration;

use crate::mail::types::{DraftPatch, Envelope, MailboxId, MessageId, PageKey, PageResult};
use state::{
    ComposeState, InboxView, OptimisticReads, PaginationState, RefreshState, SelectionState,
    StatusState, page_count,
};

pub use event_loop::Session;
pub use handlers::Completion;

/// User intents forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// `None` leaves the inbox with no mailbox selected.
    SelectMailbox(Option<MailboxId>),
    SelectMessage(Option<MessageId>),
    /// Explicit "mark as read" from the message view.
    MarkRead(MessageId),
    SetPage(u32),
    SetPageSize(u32),
    SetAutoRefresh(bool),
    Refresh,
    ToggleBulk(MessageId),
    ClearBulk,
    MarkSelectedRead,
    OpenDraft,
    UpdateDraft(DraftPatch),
    CancelDraft,
    SendDraft,
}

/// A listing request tagged with the key it was made for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub key: PageKey,
    /// Monotonic per engine; orders results for the same key.
    pub seq: u64,
    /// Skip the dedup window: used to resynchronize after a mutation.
    pub revalidate: bool,
}

/// A listing together with the request that loaded it from the service.
///
/// Requests answered inside the dedup window share an earlier load, so `origin_seq` can be
/// older than the ticket that received the page. Freshness is judged by the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub origin_seq: u64,
    pub page: PageResult,
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(FetchTicket),
    MarkRead(MessageId),
    MarkReadBulk(Vec<MessageId>),
    Send(Envelope),
    /// Replace any running poll timer with a new one.
    StartPolling { generation: u64, interval: Duration },
    StopPolling,
}

pub struct InboxState {
    pub(crate) mailbox: Option<MailboxId>,
    pub(crate) pagination: PaginationState,
    pub(crate) selection: SelectionState,
    pub(crate) refresh: RefreshState,
    /// Last accepted listing for the active key.
    pub(crate) page: Option<PageResult>,
    pub(crate) status: StatusState,
    pub(crate) compose: ComposeState,
    pub(crate) bulk_pending: bool,
    pub(crate) optimistic: OptimisticReads,
    next_seq: u64,
    /// Listings requested before the view moved to the active key are stale.
    accept_from_seq: u64,
    /// Origin of the listing on screen.
    applied_seq: Option<u64>,
    /// Sequence number of the newest listing requested for the active key.
    latest_seq: Option<u64>,
    pub(crate) poll_generation: u64,
}

impl InboxState {
    pub fn new(page_size: u32, poll_interval: Duration) -> Self {
        Self {
            mailbox: None,
            pagination: PaginationState::new(page_size),
            selection: SelectionState::default(),
            refresh: RefreshState {
                auto_refresh: false,
                interval: poll_interval,
            },
            page: None,
            status: StatusState::default(),
            compose: ComposeState::default(),
            bulk_pending: false,
            optimistic: OptimisticReads::new(),
            next_seq: 1,
            accept_from_seq: 0,
            applied_seq: None,
            latest_seq: None,
            poll_generation: 0,
        }
    }

    pub fn active_key(&self) -> Option<PageKey> {
        self.mailbox.as_ref().map(|m| self.pagination.key(m))
    }

    /// Sequence number the next fetch ticket will carry.
    pub(crate) fn peek_seq(&self) -> u64 {
        self.next_seq
    }

    /// Request the active page. Returns no effect when no mailbox is selected.
    pub(crate) fn fetch_active(&mut self, revalidate: bool) -> Vec<Effect> {
        let Some(key) = self.active_key() else {
            return Vec::new();
        };
        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest_seq = Some(seq);
        self.status.loading = true;
        vec![Effect::Fetch(FetchTicket {
            key,
            seq,
            revalidate,
        })]
    }

    /// The active key changed: forget the old listing and fetch the new one.
    pub(crate) fn switch_key(&mut self) -> Vec<Effect> {
        self.page = None;
        self.applied_seq = None;
        self.latest_seq = None;
        self.accept_from_seq = self.next_seq;
        self.status.loading = false;
        self.fetch_active(false)
    }

    /// Results for another key, or requested before the view last moved to this key.
    pub(crate) fn is_stale(&self, ticket: &FetchTicket) -> bool {
        self.active_key().as_ref() != Some(&ticket.key) || ticket.seq < self.accept_from_seq
    }

    /// Data loaded before the listing on screen is older than what the user sees.
    pub(crate) fn is_superseded(&self, origin_seq: u64) -> bool {
        matches!(self.applied_seq, Some(applied) if origin_seq < applied)
    }

    pub(crate) fn mark_applied(&mut self, origin_seq: u64) {
        self.applied_seq = Some(origin_seq);
    }

    /// The request `seq` completed, whatever became of its result.
    pub(crate) fn settle(&mut self, seq: u64) {
        if self.latest_seq.is_none_or(|latest| seq >= latest) {
            self.status.loading = false;
        }
    }

    pub(crate) fn start_polling(&mut self) -> Vec<Effect> {
        if self.mailbox.is_none() {
            return self.stop_polling();
        }
        self.poll_generation += 1;
        vec![Effect::StartPolling {
            generation: self.poll_generation,
            interval: self.refresh.interval,
        }]
    }

    pub(crate) fn stop_polling(&mut self) -> Vec<Effect> {
        self.poll_generation += 1;
        vec![Effect::StopPolling]
    }

    pub fn status_mut(&mut self) -> &mut StatusState {
        &mut self.status
    }

    pub fn view(&self) -> InboxView {
        let total = self.page.as_ref().map(|p| p.total);
        InboxView {
            mailbox: self.mailbox.clone(),
            page: self.pagination.page,
            page_size: self.pagination.page_size,
            total,
            page_count: page_count(total.unwrap_or(0), self.pagination.page_size),
            messages: self
                .page
                .as_ref()
                .map(|p| p.list.clone())
                .unwrap_or_default(),
            selected: self.selection.selected.clone(),
            bulk_selected: self.selection.bulk.iter().cloned().collect(),
            auto_refresh: self.refresh.auto_refresh,
            loading: self.status.loading,
            bulk_pending: self.bulk_pending,
            draft: self.compose.draft.clone(),
            sending: self.compose.sending,
            error: self.status.error.clone(),
        }
    }
}
